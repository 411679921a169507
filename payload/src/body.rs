use serde::{Deserialize, Serialize};

use crate::model::{FeatureSpec, FileTypeKey};

/// Inline sample data as the service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub data: String,
}

/// The encoded sample, keyed by its file type when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Media {
    Image(InlineData),
    Document(InlineData),
}

impl Media {
    pub fn new(file_type: FileTypeKey, data: String) -> Self {
        let data = InlineData { data };
        match file_type {
            FileTypeKey::Image => Self::Image(data),
            FileTypeKey::Document => Self::Document(data),
        }
    }

    pub fn file_type(&self) -> FileTypeKey {
        match self {
            Self::Image(_) => FileTypeKey::Image,
            Self::Document(_) => FileTypeKey::Document,
        }
    }

    pub fn data(&self) -> &str {
        match self {
            Self::Image(inline) | Self::Document(inline) => &inline.data,
        }
    }
}

/// The JSON payload posted to the prediction endpoint.
///
/// Serializes as
/// `{"features": [...], "<image|document>": {"data": "..."}, "maxResults"?: 5}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub features: Vec<FeatureSpec>,
    #[serde(flatten)]
    pub media: Media,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl RequestBody {
    pub fn new(feature: FeatureSpec, media: Media, max_results: Option<u32>) -> Self {
        Self {
            features: vec![feature],
            media,
            max_results,
        }
    }
}
