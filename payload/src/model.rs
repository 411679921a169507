use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PayloadErr, Result};

/// `maxResults` sent for the classification and detection style models.
pub const MAX_RESULTS: u32 = 5;

/// Identifier tokens in lookup priority order. An identifier containing several
/// of them resolves to the first one listed here.
const TOKENS: [(&str, ModelType); 7] = [
    ("ic", ModelType::ImageClassification),
    ("dc", ModelType::DocumentClassification),
    ("od", ModelType::ObjectDetection),
    ("ld", ModelType::LanguageClassification),
    ("kv", ModelType::KeyValueDetection),
    ("ocr", ModelType::TextDetection),
    ("td", ModelType::TableDetection),
];

/// The vision capability a prediction service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    ImageClassification,
    DocumentClassification,
    ObjectDetection,
    LanguageClassification,
    KeyValueDetection,
    TextDetection,
    TableDetection,
}

impl ModelType {
    pub const ALL: [ModelType; 7] = [
        ModelType::ImageClassification,
        ModelType::DocumentClassification,
        ModelType::ObjectDetection,
        ModelType::LanguageClassification,
        ModelType::KeyValueDetection,
        ModelType::TextDetection,
        ModelType::TableDetection,
    ];

    /// Resolves a free-form model identifier by first-match token lookup.
    ///
    /// # Arguments
    /// * `identifier` - The configured model name, e.g. `"ic-resnet50"`.
    ///
    /// # Returns
    /// The model type of the highest priority token found in `identifier`.
    ///
    /// # Errors
    /// `EmptyModelIdentifier` for an empty string and `UnrecognizedModel` when
    /// no token occurs in it.
    pub fn resolve(identifier: &str) -> Result<Self> {
        if identifier.is_empty() {
            return Err(PayloadErr::EmptyModelIdentifier);
        }

        TOKENS
            .iter()
            .find(|(token, _)| identifier.contains(token))
            .map(|&(_, model_type)| model_type)
            .ok_or_else(|| PayloadErr::UnrecognizedModel {
                identifier: identifier.to_string(),
            })
    }

    /// The identifier token this model type is matched by.
    pub fn token(self) -> &'static str {
        TOKENS
            .iter()
            .find(|&&(_, model_type)| model_type == self)
            .map(|&(token, _)| token)
            .unwrap_or_default()
    }

    /// The media key the service expects the sample under.
    pub fn file_type(self) -> FileTypeKey {
        match self {
            Self::ImageClassification | Self::ObjectDetection => FileTypeKey::Image,
            _ => FileTypeKey::Document,
        }
    }

    /// The `maxResults` carried by this model's feature, if any.
    pub fn max_results(self) -> Option<u32> {
        match self {
            Self::ImageClassification
            | Self::DocumentClassification
            | Self::ObjectDetection
            | Self::LanguageClassification => Some(MAX_RESULTS),
            Self::KeyValueDetection | Self::TextDetection | Self::TableDetection => None,
        }
    }

    pub fn feature(self) -> FeatureSpec {
        FeatureSpec {
            feature_type: self,
            max_results: self.max_results(),
        }
    }

    /// The tag used on the wire, e.g. `IMAGE_CLASSIFICATION`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::ImageClassification => "IMAGE_CLASSIFICATION",
            Self::DocumentClassification => "DOCUMENT_CLASSIFICATION",
            Self::ObjectDetection => "OBJECT_DETECTION",
            Self::LanguageClassification => "LANGUAGE_CLASSIFICATION",
            Self::KeyValueDetection => "KEY_VALUE_DETECTION",
            Self::TextDetection => "TEXT_DETECTION",
            Self::TableDetection => "TABLE_DETECTION",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Key under which the encoded sample is placed in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTypeKey {
    Image,
    Document,
}

/// A single requested feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSpec {
    pub feature_type: ModelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}
