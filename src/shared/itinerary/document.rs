//! Travel Documents
//!
//! Documents reference their file either inline as a `data:` URL (local-only
//! mode) or as a server-hosted URL (API mode).

use crate::shared::error::{require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Passport,
    Visa,
    Insurance,
    Booking,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub trip_id: String,
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
    /// Inline `data:` URL or server-hosted URL; empty when the inline
    /// content was dropped to fit local storage
    #[serde(default)]
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Document {
    /// Whether the file content is embedded in `file_url`
    pub fn is_inline(&self) -> bool {
        self.file_url.starts_with("data:")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub trip_id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub doc_type: Option<DocumentType>,
    pub file_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl NewDocument {
    pub fn new(
        trip_id: impl Into<String>,
        title: impl Into<String>,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            title: title.into(),
            doc_type: None,
            file_url: file_url.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn into_document(self, id: String) -> Document {
        Document {
            id,
            trip_id: self.trip_id,
            title: self.title,
            doc_type: self.doc_type,
            file_url: self.file_url,
            file_name: self.file_name,
            mime_type: self.mime_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
}

impl EntityPatch<Document> for DocumentPatch {
    fn apply_to(&self, target: &mut Document) {
        merge_fields!(self, target; title; optional doc_type);
    }
}

impl TripEntity for Document {
    type Patch = DocumentPatch;
    const KIND: EntityKind = EntityKind::Document;
    const COLLECTION: &'static str = "documents";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("title", &self.title)
    }
}
