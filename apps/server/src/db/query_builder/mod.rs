//! SQL generation for listing queries.
//!
//! Translates a [`QueryDescriptor`] into a parameterized PostgreSQL statement
//! over the `listings` table. Every user value travels as a bind parameter.

mod bind;

use bind::{contains_pattern, push};
use nodepop_query::{Criterion, Direction, Filter, ListingField, QueryDescriptor, Scalar, SortSpec};
use rust_decimal::Decimal;

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Bool(bool),
    Decimal(Decimal),
    BigInt(i64),
}

pub(crate) const LISTING_COLUMNS: &str = "id, title, for_sale, price, photo_reference, tags";

pub(crate) fn column(field: ListingField) -> &'static str {
    match field {
        ListingField::Title => "title",
        ListingField::ForSale => "for_sale",
        ListingField::Price => "price",
        ListingField::PhotoReference => "photo_reference",
        ListingField::Tags => "tags",
    }
}

/// `ORDER BY` key for `field`. Text sorts use byte order so both stores
/// agree regardless of the database collation.
fn sort_key(field: ListingField) -> &'static str {
    match field {
        ListingField::Title => "title COLLATE \"C\"",
        ListingField::PhotoReference => "photo_reference COLLATE \"C\"",
        other => column(other),
    }
}

/// Builds `SELECT` and `COUNT(*)` statements from a descriptor.
#[derive(Debug, Clone)]
pub struct ListingSqlBuilder<'a> {
    filter: &'a Filter,
    skip: Option<u64>,
    limit: Option<u64>,
    sort: Option<SortSpec>,
}

impl<'a> ListingSqlBuilder<'a> {
    pub fn search(query: &'a QueryDescriptor) -> Self {
        Self {
            filter: &query.filter,
            skip: query.skip,
            limit: query.limit,
            sort: query.sort,
        }
    }

    pub fn count(filter: &'a Filter) -> Self {
        Self {
            filter,
            skip: None,
            limit: None,
            sort: None,
        }
    }

    /// Row query with ordering and paging. Ties, and unsorted queries, fall
    /// back to insertion order.
    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let mut sql = format!("SELECT {LISTING_COLUMNS} FROM listings");
        self.push_where(&mut sql, &mut bind_params);

        match self.sort {
            Some(sort) => {
                let direction = match sort.direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                };
                sql.push_str(&format!(
                    " ORDER BY {} {direction}, seq ASC",
                    sort_key(sort.field.listing_field())
                ));
            }
            None => sql.push_str(" ORDER BY seq ASC"),
        }

        if let Some(skip) = self.skip {
            let idx = push(&mut bind_params, BindValue::BigInt(clamp_i64(skip)));
            sql.push_str(&format!(" OFFSET ${idx}"));
        }
        if let Some(limit) = self.limit {
            let idx = push(&mut bind_params, BindValue::BigInt(clamp_i64(limit)));
            sql.push_str(&format!(" LIMIT ${idx}"));
        }

        (sql, bind_params)
    }

    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let mut sql = "SELECT COUNT(*) FROM listings".to_string();
        self.push_where(&mut sql, &mut bind_params);
        (sql, bind_params)
    }

    fn push_where(&self, sql: &mut String, bind_params: &mut Vec<BindValue>) {
        let conditions: Vec<String> = self
            .filter
            .iter()
            .map(|(field, criterion)| condition(field, criterion, bind_params))
            .collect();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
    }
}

fn condition(field: ListingField, criterion: &Criterion, bind_params: &mut Vec<BindValue>) -> String {
    let col = column(field);
    match (criterion, field) {
        (Criterion::Equals(Scalar::Bool(b)), ListingField::ForSale) => {
            let idx = push(bind_params, BindValue::Bool(*b));
            format!("{col} = ${idx}")
        }
        (Criterion::Equals(Scalar::Number(n)), ListingField::Price) => {
            let idx = push(bind_params, BindValue::Decimal(*n));
            format!("{col} = ${idx}")
        }
        (
            Criterion::Equals(Scalar::Text(t)),
            ListingField::Title | ListingField::PhotoReference,
        ) => {
            let idx = push(bind_params, BindValue::Text(t.clone()));
            format!("{col} = ${idx}")
        }
        (
            Criterion::ContainsIgnoreCase(fragment),
            ListingField::Title | ListingField::PhotoReference,
        ) => {
            let idx = push(bind_params, BindValue::Text(contains_pattern(fragment)));
            format!("{col} ILIKE ${idx} ESCAPE E'\\\\'")
        }
        (Criterion::Range { min, max }, ListingField::Price) => {
            let mut parts = Vec::new();
            if let Some(min) = min {
                let idx = push(bind_params, BindValue::Decimal(*min));
                parts.push(format!("{col} >= ${idx}"));
            }
            if let Some(max) = max {
                let idx = push(bind_params, BindValue::Decimal(*max));
                parts.push(format!("{col} <= ${idx}"));
            }
            if parts.is_empty() {
                "TRUE".to_string()
            } else {
                format!("({})", parts.join(" AND "))
            }
        }
        (Criterion::Includes(tag), ListingField::Tags) => {
            let idx = push(bind_params, BindValue::Text(tag.as_str().to_string()));
            format!("${idx} = ANY({col})")
        }
        // Same rule as in-memory evaluation: a criterion on the wrong field type matches nothing.
        _ => "FALSE".to_string(),
    }
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
