//! PostgreSQL listing storage

use super::query_builder::{BindValue, ListingSqlBuilder};
use super::ListingStore;
use crate::config::DatabaseConfig;
use crate::{models::ListingRecord, Error, Result};
use async_trait::async_trait;
use nodepop_query::{Filter, Listing, NewListing, QueryDescriptor, Tag, ValidationErrors};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

const CHECK_VIOLATION: &str = "23514";

/// Listings in the `listings` table, see `migrations/`.
#[derive(Debug, Clone)]
pub struct PostgresListingStore {
    pool: PgPool,
}

impl PostgresListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the connection pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| Error::Internal("database.url is not set".to_string()))?;

        let mut options = PgConnectOptions::from_str(url)?;
        if config.statement_timeout_seconds > 0 {
            options = options.options([(
                "statement_timeout",
                format!("{}s", config.statement_timeout_seconds),
            )]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
            .connect_with(options)
            .await?;

        tracing::info!(
            max_connections = config.pool_max_size,
            "Connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ListingStore for PostgresListingStore {
    async fn search(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>> {
        let (sql, bind_values) = ListingSqlBuilder::search(query).build_sql();
        tracing::debug!(sql = %sql, binds = bind_values.len(), "Searching listings");

        let mut statement = sqlx::query(&sql);
        for value in bind_values {
            statement = match value {
                BindValue::Text(v) => statement.bind(v),
                BindValue::Bool(v) => statement.bind(v),
                BindValue::Decimal(v) => statement.bind(v),
                BindValue::BigInt(v) => statement.bind(v),
            };
        }

        let rows = statement.fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let (sql, bind_values) = ListingSqlBuilder::count(filter).build_count_sql();

        let mut statement = sqlx::query_scalar::<_, i64>(&sql);
        for value in bind_values {
            statement = match value {
                BindValue::Text(v) => statement.bind(v),
                BindValue::Bool(v) => statement.bind(v),
                BindValue::Decimal(v) => statement.bind(v),
                BindValue::BigInt(v) => statement.bind(v),
            };
        }

        let total = statement.fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn save(&self, listing: Listing) -> Result<ListingRecord> {
        let tags: Vec<String> = listing
            .tags()
            .iter()
            .map(|tag| tag.as_str().to_string())
            .collect();

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO listings (id, title, for_sale, price, photo_reference, tags) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(listing.title())
        .bind(listing.for_sale())
        .bind(listing.price())
        .bind(listing.photo_reference())
        .bind(tags)
        .fetch_one(&self.pool)
        .await
        .map_err(constraint_error)?;

        Ok(ListingRecord::new(id, listing))
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

fn record_from_row(row: &PgRow) -> Result<ListingRecord> {
    let id: Uuid = row.try_get("id")?;
    let listing = Listing::new(NewListing {
        title: row.try_get("title")?,
        for_sale: row.try_get("for_sale")?,
        price: row.try_get::<Decimal, _>("price")?,
        photo_reference: row.try_get("photo_reference")?,
        tags: row.try_get::<Vec<String>, _>("tags")?.into_iter().collect(),
    })
    .map_err(|e| Error::Internal(format!("stored listing {id} is invalid: {e}")))?;
    Ok(ListingRecord::new(id, listing))
}

/// Table CHECK violations become field errors; everything else stays a
/// database error.
fn constraint_error(err: sqlx::Error) -> Error {
    let field = match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(CHECK_VIOLATION) => {
            db.constraint().and_then(constraint_field)
        }
        _ => None,
    };
    match field {
        Some("tags") => Error::Validation(ValidationErrors::single(
            "tags",
            format!("tags must contain one or several of {}", Tag::allowed()),
        )),
        Some(field) => Error::Validation(ValidationErrors::single(
            field,
            format!("{field} was rejected by storage"),
        )),
        None => Error::Database(err),
    }
}

fn constraint_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "listings_tags_check" => Some("tags"),
        "listings_price_check" => Some("price"),
        "listings_photo_reference_check" => Some("photoReference"),
        "listings_title_check" => Some("title"),
        _ => None,
    }
}
