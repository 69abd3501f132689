use crate::error::{Result, ValidationError, ValidationErrors};
use crate::tag::Tag;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Listing attributes addressable by filters, sorting and projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingField {
    Title,
    ForSale,
    Price,
    PhotoReference,
    Tags,
}

impl ListingField {
    pub const ALL: [ListingField; 5] = [
        ListingField::Title,
        ListingField::ForSale,
        ListingField::Price,
        ListingField::PhotoReference,
        ListingField::Tags,
    ];

    /// Wire name used in JSON bodies and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ForSale => "forSale",
            Self::Price => "price",
            Self::PhotoReference => "photoReference",
            Self::Tags => "tags",
        }
    }

    /// Accepts wire names and the short legacy names (`item`, `sale`, `photo`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" | "item" => Some(Self::Title),
            "forsale" | "sale" => Some(Self::ForSale),
            "price" => Some(Self::Price),
            "photoreference" | "photo" => Some(Self::PhotoReference),
            "tags" => Some(Self::Tags),
            _ => None,
        }
    }
}

/// `true` when the text after the last `.` is an accepted image extension.
pub(crate) fn has_photo_extension(photo: &str) -> bool {
    photo
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && PHOTO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false)
}

/// Tags as submitted: one text value or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsInput {
    One(String),
    Many(Vec<String>),
}

impl TagsInput {
    /// `None` unless the value is a string or an array made only of strings.
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::String(s) => Some(Self::One(s.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Many),
            _ => None,
        }
    }

    /// Trimmed, lowercased, deduplicated. Blank entries are dropped.
    pub fn normalize(self) -> BTreeSet<String> {
        let values = match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        };
        values
            .into_iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

/// Create-mode parameters after validation, before entity checks.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub for_sale: bool,
    pub price: Decimal,
    pub photo_reference: String,
    pub tags: BTreeSet<String>,
}

/// A classified ad.
///
/// Only [`Listing::new`] builds one, so every value has a non-empty title, a
/// non-negative price, an image photo reference and at least one known tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    title: String,
    for_sale: bool,
    #[serde(serialize_with = "serialize_price")]
    price: Decimal,
    photo_reference: String,
    tags: BTreeSet<Tag>,
}

impl Listing {
    /// Enforce the entity invariants, reporting every violated field.
    pub fn new(new: NewListing) -> Result<Self> {
        let mut errors = Vec::new();

        let title = new.title.trim().to_lowercase();
        if title.is_empty() {
            errors.push(ValidationError::new("title", "title must not be empty"));
        }

        if new.price < Decimal::ZERO {
            errors.push(ValidationError::new(
                "price",
                "price must be a non-negative number",
            ));
        }

        let photo_reference = new.photo_reference.trim().to_lowercase();
        if !has_photo_extension(&photo_reference) {
            errors.push(ValidationError::new(
                "photoReference",
                "photo file must be a jpg, jpeg or png image",
            ));
        }

        let mut tags = BTreeSet::new();
        let mut unknown = Vec::new();
        for raw in &new.tags {
            match Tag::parse(raw) {
                Some(tag) => {
                    tags.insert(tag);
                }
                None => unknown.push(raw.as_str()),
            }
        }
        if !unknown.is_empty() {
            errors.push(ValidationError::new(
                "tags",
                format!(
                    "tags contain values outside {}: {}",
                    Tag::allowed(),
                    unknown.join(", ")
                ),
            ));
        } else if tags.is_empty() {
            errors.push(ValidationError::new(
                "tags",
                format!("tags must contain one or several of {}", Tag::allowed()),
            ));
        }

        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Err(errors);
        }

        Ok(Self {
            title,
            for_sale: new.for_sale,
            price: new.price,
            photo_reference,
            tags,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn for_sale(&self) -> bool {
        self.for_sale
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn photo_reference(&self) -> &str {
        &self.photo_reference
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// JSON value of one field, shaped as in the serialized listing.
    pub fn field_value(&self, field: ListingField) -> JsonValue {
        match field {
            ListingField::Title => JsonValue::String(self.title.clone()),
            ListingField::ForSale => JsonValue::Bool(self.for_sale),
            ListingField::Price => decimal_to_json(self.price),
            ListingField::PhotoReference => JsonValue::String(self.photo_reference.clone()),
            ListingField::Tags => JsonValue::Array(
                self.tags
                    .iter()
                    .map(|t| JsonValue::String(t.as_str().to_string()))
                    .collect(),
            ),
        }
    }

    /// Every field as a JSON object.
    pub fn to_json_map(&self) -> Map<String, JsonValue> {
        ListingField::ALL
            .iter()
            .map(|f| (f.as_str().to_string(), self.field_value(*f)))
            .collect()
    }
}

fn serialize_price<S: Serializer>(
    price: &Decimal,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    decimal_to_json(*price).serialize(serializer)
}

/// Integers stay integers; fractional prices become JSON floats. Whole
/// prices past `u64` keep their exact digits as a string.
fn decimal_to_json(value: Decimal) -> JsonValue {
    let normalized = value.normalize();
    if normalized.scale() == 0 {
        let mantissa = normalized.mantissa();
        if let Ok(int) = i64::try_from(mantissa) {
            return JsonValue::from(int);
        }
        if let Ok(int) = u64::try_from(mantissa) {
            return JsonValue::from(int);
        }
        return JsonValue::String(normalized.to_string());
    }
    normalized
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(normalized.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_listing(tags: &[&str]) -> NewListing {
        NewListing {
            title: "Bike".to_string(),
            for_sale: true,
            price: Decimal::from(150),
            photo_reference: "bike.PNG".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn photo_extension_is_checked_on_the_last_segment() {
        assert!(has_photo_extension("bike.png"));
        assert!(has_photo_extension("bike.final.JPEG"));
        assert!(!has_photo_extension("bike.gif"));
        assert!(!has_photo_extension("png"));
        assert!(!has_photo_extension(".png"));
        assert!(!has_photo_extension("bike.png.txt"));
    }

    #[test]
    fn tags_input_accepts_string_or_array_of_strings() {
        assert_eq!(
            TagsInput::from_value(&json!("motor")),
            Some(TagsInput::One("motor".to_string()))
        );
        assert_eq!(
            TagsInput::from_value(&json!(["work", "Mobile"])),
            Some(TagsInput::Many(vec!["work".to_string(), "Mobile".to_string()]))
        );
        assert_eq!(TagsInput::from_value(&json!(["work", 3])), None);
        assert_eq!(TagsInput::from_value(&json!(7)), None);
    }

    #[test]
    fn tags_input_normalizes_to_a_lowercase_set() {
        let set = TagsInput::Many(vec![
            "Work".to_string(),
            "work ".to_string(),
            " ".to_string(),
        ])
        .normalize();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["work"]);
    }

    #[test]
    fn new_lowercases_title_and_photo() {
        let listing = Listing::new(new_listing(&["motor"])).unwrap();
        assert_eq!(listing.title(), "bike");
        assert_eq!(listing.photo_reference(), "bike.png");
        assert!(listing.has_tag(Tag::Motor));
    }

    #[test]
    fn new_rejects_unknown_and_empty_tags() {
        let err = Listing::new(new_listing(&["motor", "sports"])).unwrap_err();
        assert_eq!(err.fields(), vec!["tags"]);
        assert!(err.iter().next().unwrap().message.contains("sports"));

        let err = Listing::new(new_listing(&[])).unwrap_err();
        assert_eq!(err.fields(), vec!["tags"]);
    }

    #[test]
    fn new_reports_every_broken_invariant() {
        let err = Listing::new(NewListing {
            title: "  ".to_string(),
            for_sale: false,
            price: Decimal::from(-1),
            photo_reference: "bike.gif".to_string(),
            tags: BTreeSet::new(),
        })
        .unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["title", "price", "photoReference", "tags"]
        );
    }

    #[test]
    fn serializes_with_camel_case_and_numeric_price() {
        let mut new = new_listing(&["work", "motor"]);
        new.price = Decimal::new(1995, 1);
        let listing = Listing::new(new).unwrap();
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["forSale"], json!(true));
        assert_eq!(value["photoReference"], json!("bike.png"));
        assert_eq!(value["price"], json!(199.5));
        assert_eq!(value["tags"], json!(["work", "motor"]));
        assert_eq!(JsonValue::Object(listing.to_json_map()), value);
    }

    #[test]
    fn large_whole_prices_keep_every_digit() {
        assert_eq!(
            decimal_to_json(Decimal::from(u64::MAX)),
            json!(18_446_744_073_709_551_615u64)
        );
        let beyond = Decimal::from(u64::MAX) * Decimal::from(10);
        assert_eq!(decimal_to_json(beyond), json!("184467440737095516150"));
    }

    #[test]
    fn whole_prices_serialize_as_integers() {
        let listing = Listing::new(new_listing(&["motor"])).unwrap();
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["price"], json!(150));
    }

    #[test]
    fn field_names_accept_legacy_aliases() {
        assert_eq!(ListingField::parse("item"), Some(ListingField::Title));
        assert_eq!(ListingField::parse("Sale"), Some(ListingField::ForSale));
        assert_eq!(
            ListingField::parse("photoReference"),
            Some(ListingField::PhotoReference)
        );
        assert_eq!(ListingField::parse("owner"), None);
    }
}
