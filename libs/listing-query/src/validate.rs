//! Parameter validation
//!
//! Each mode has a table of field rules. Every rule runs against the bag and
//! every failure is kept, so one request reports all of its problems at once.

use crate::bag::ParamBag;
use crate::error::{Result, ValidationError, ValidationErrors};
use crate::listing::{has_photo_extension, ListingField, NewListing, TagsInput};
use crate::params::{QueryParameters, SortSpec};
use crate::price::PriceRange;
use crate::tag::Tag;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Which rule table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Search request: every field optional.
    Read,
    /// New listing submission: every field required.
    Create,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Read(QueryParameters),
    Create(NewListing),
}

/// Validate `bag` against the rule table for `mode`.
pub fn validate(bag: &ParamBag, mode: Mode) -> Result<Validated> {
    match mode {
        Mode::Read => validate_query(bag).map(Validated::Read),
        Mode::Create => validate_new_listing(bag).map(Validated::Create),
    }
}

pub fn validate_query(bag: &ParamBag) -> Result<QueryParameters> {
    let (params, errors) = apply_rules(bag, READ_RULES);
    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(params),
    }
}

pub fn validate_new_listing(bag: &ParamBag) -> Result<NewListing> {
    let (draft, errors) = apply_rules(bag, CREATE_RULES);
    if let Some(errors) = ValidationErrors::from_vec(errors) {
        return Err(errors);
    }
    draft.complete()
}

/// One row of a rule table.
struct FieldRule<T> {
    /// Accepted parameter names; the first is canonical.
    names: &'static [&'static str],
    required: bool,
    /// Parse, normalize and store the value. `None` rejects it.
    apply: fn(&mut T, &JsonValue) -> Option<()>,
    message: &'static str,
}

impl<T> FieldRule<T> {
    fn lookup<'a>(&self, bag: &'a ParamBag) -> Option<(&'static str, &'a JsonValue)> {
        self.names
            .iter()
            .find_map(|name| bag.get(name).map(|value| (*name, value)))
    }

    /// Names present in `bag` that lose to `used`, the one `lookup` picked.
    fn shadowed(&self, bag: &ParamBag, used: &str) -> Vec<&'static str> {
        self.names
            .iter()
            .copied()
            .filter(|name| *name != used && bag.contains(name))
            .collect()
    }
}

fn apply_rules<T: Default>(bag: &ParamBag, rules: &[FieldRule<T>]) -> (T, Vec<ValidationError>) {
    let mut target = T::default();
    let mut errors = Vec::new();

    for rule in rules {
        match rule.lookup(bag) {
            Some((name, value)) => {
                for ignored in rule.shadowed(bag, name) {
                    tracing::debug!(
                        parameter = ignored,
                        used = name,
                        "Ignoring duplicate parameter alias"
                    );
                }
                if (rule.apply)(&mut target, value).is_none() {
                    errors.push(ValidationError::new(name, rule.message));
                }
            }
            None if rule.required => {
                errors.push(ValidationError::new(rule.names[0], rule.message));
            }
            None => {}
        }
    }

    for name in bag.names() {
        if !rules.iter().any(|r| r.names.contains(&name)) {
            tracing::debug!(parameter = name, "Ignoring unknown parameter");
        }
    }

    (target, errors)
}

const READ_RULES: &[FieldRule<QueryParameters>] = &[
    FieldRule {
        names: &["item", "itemText"],
        required: false,
        apply: read_item,
        message: "item must be a string",
    },
    FieldRule {
        names: &["forSale", "sale"],
        required: false,
        apply: read_for_sale,
        message: "forSale must be true or false",
    },
    FieldRule {
        names: &["tag"],
        required: false,
        apply: read_tag,
        message: "tag must be just one of: lifestyle, work, mobile, motor",
    },
    FieldRule {
        names: &["price", "priceRange"],
        required: false,
        apply: read_price,
        message: "price must be N, N-M, N- or -M with 1 to 7 digits per number",
    },
    FieldRule {
        names: &["skip"],
        required: false,
        apply: read_skip,
        message: "skip must be a non-negative integer",
    },
    FieldRule {
        names: &["limit"],
        required: false,
        apply: read_limit,
        message: "limit must be a non-negative integer",
    },
    FieldRule {
        names: &["sort", "sortSpec"],
        required: false,
        apply: read_sort,
        message: "sort must be one of: item, -item, price, -price, sale, -sale",
    },
    FieldRule {
        names: &["fields", "fieldList"],
        required: false,
        apply: read_fields,
        message: "fields must list one or more of: title, forSale, price, photoReference, tags",
    },
];

fn read_item(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    let text = value.as_str()?.trim().to_lowercase();
    params.item = (!text.is_empty()).then_some(text);
    Some(())
}

fn read_for_sale(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    params.for_sale = Some(parse_bool(value)?);
    Some(())
}

fn read_tag(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    params.tag = Some(Tag::parse(value.as_str()?)?);
    Some(())
}

fn read_price(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    params.price = Some(PriceRange::parse(&scalar_text(value)?)?);
    Some(())
}

fn read_skip(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    params.skip = Some(parse_u64(value)?);
    Some(())
}

fn read_limit(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    params.limit = Some(parse_u64(value)?);
    Some(())
}

fn read_sort(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    params.sort = Some(SortSpec::parse(value.as_str()?)?);
    Some(())
}

fn read_fields(params: &mut QueryParameters, value: &JsonValue) -> Option<()> {
    let mut fields = Vec::new();
    for name in value
        .as_str()?
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        let field = ListingField::parse(name)?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    if fields.is_empty() {
        return None;
    }
    params.fields = Some(fields);
    Some(())
}

/// Create-mode accumulator; every slot is filled once all rules pass.
#[derive(Debug, Default)]
struct ListingDraft {
    title: Option<String>,
    for_sale: Option<bool>,
    price: Option<Decimal>,
    photo_reference: Option<String>,
    tags: Option<BTreeSet<String>>,
}

impl ListingDraft {
    fn complete(self) -> Result<NewListing> {
        match (
            self.title,
            self.for_sale,
            self.price,
            self.photo_reference,
            self.tags,
        ) {
            (Some(title), Some(for_sale), Some(price), Some(photo_reference), Some(tags)) => {
                Ok(NewListing {
                    title,
                    for_sale,
                    price,
                    photo_reference,
                    tags,
                })
            }
            _ => Err(ValidationErrors::single(
                "body",
                "listing is missing required fields",
            )),
        }
    }
}

const CREATE_RULES: &[FieldRule<ListingDraft>] = &[
    FieldRule {
        names: &["title", "item"],
        required: true,
        apply: create_title,
        message: "title must exist and be a string",
    },
    FieldRule {
        names: &["forSale", "sale"],
        required: true,
        apply: create_for_sale,
        message: "forSale must exist and be true or false",
    },
    FieldRule {
        names: &["price"],
        required: true,
        apply: create_price,
        message: "price must exist and be an integer or decimal number",
    },
    FieldRule {
        names: &["photoReference", "photo"],
        required: true,
        apply: create_photo,
        message: "photoReference must exist and be a jpg, jpeg or png file",
    },
    FieldRule {
        names: &["tags"],
        required: true,
        apply: create_tags,
        message: "tags must be a string or an array of strings from: lifestyle, work, mobile, motor",
    },
];

fn create_title(draft: &mut ListingDraft, value: &JsonValue) -> Option<()> {
    draft.title = Some(value.as_str()?.trim().to_lowercase());
    Some(())
}

fn create_for_sale(draft: &mut ListingDraft, value: &JsonValue) -> Option<()> {
    draft.for_sale = Some(parse_bool(value)?);
    Some(())
}

fn create_price(draft: &mut ListingDraft, value: &JsonValue) -> Option<()> {
    draft.price = Some(parse_decimal(&scalar_text(value)?)?);
    Some(())
}

fn create_photo(draft: &mut ListingDraft, value: &JsonValue) -> Option<()> {
    let photo = value.as_str()?.trim().to_lowercase();
    if !has_photo_extension(&photo) {
        return None;
    }
    draft.photo_reference = Some(photo);
    Some(())
}

fn create_tags(draft: &mut ListingDraft, value: &JsonValue) -> Option<()> {
    draft.tags = Some(TagsInput::from_value(value)?.normalize());
    Some(())
}

/// Text of a string or number value.
fn scalar_text(value: &JsonValue) -> Option<Cow<'_, str>> {
    match value {
        JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
        JsonValue::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

fn parse_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_u64(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => {
            let s = s.trim();
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        }
        _ => None,
    }
}

/// Exact decimal parse. Input needing more than `Decimal::MAX_SCALE`
/// fractional digits is rejected rather than rounded.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => {
            let scale = i64::from(Decimal::from_str_exact(mantissa).ok()?.scale())
                - exponent.parse::<i64>().ok()?;
            if scale > i64::from(Decimal::MAX_SCALE) {
                return None;
            }
            Decimal::from_scientific(text).ok()
        }
        None => Decimal::from_str_exact(text).ok(),
    }
}
