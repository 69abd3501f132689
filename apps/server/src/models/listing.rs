use nodepop_query::{Listing, Projection};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// A stored listing and its storage-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub listing: Listing,
}

impl ListingRecord {
    pub fn new(id: Uuid, listing: Listing) -> Self {
        Self { id, listing }
    }

    /// JSON object with `id` and the projected fields.
    pub fn to_json(&self, projection: &Projection) -> JsonValue {
        let mut object = Map::new();
        object.insert("id".to_string(), JsonValue::String(self.id.to_string()));
        object.extend(projection.project(&self.listing));
        JsonValue::Object(object)
    }
}
