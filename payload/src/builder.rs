use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    asset::{self, AssetRecord},
    body::{Media, RequestBody},
    cycle::BodyCycle,
    error::{PayloadErr, Result},
    model::{MAX_RESULTS, ModelType},
};

const LOW_RES_IMAGE: &str = "load-test-low-res-image_computer.jpg";
const BOOK_PAGE: &str = "book-page.jpg";
const RECEIPT: &str = "load-test-detect-text-image_receipt.jpg";
const SAMPLES_DIR: &str = "images";

/// Where the sample assets for every model type live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Stock sample per model type.
    #[serde(default)]
    pub defaults: BTreeMap<ModelType, PathBuf>,
    /// Per-deployment replacements, preferred over `defaults`.
    #[serde(default)]
    pub overrides: BTreeMap<ModelType, PathBuf>,
    /// Used for a model type with neither a default nor an override.
    pub fallback: PathBuf,
    /// Directory enumerated in multi-body mode.
    pub samples_dir: PathBuf,
}

impl ResourceConfig {
    /// The stock sample layout rooted at `root`.
    ///
    /// # Arguments
    /// * `root` - Directory holding the bundled samples.
    ///
    /// # Returns
    /// A configuration without overrides.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let defaults = ModelType::ALL
            .into_iter()
            .map(|model_type| {
                let file = match model_type {
                    ModelType::ImageClassification | ModelType::ObjectDetection => LOW_RES_IMAGE,
                    ModelType::DocumentClassification | ModelType::LanguageClassification => {
                        BOOK_PAGE
                    }
                    ModelType::KeyValueDetection
                    | ModelType::TextDetection
                    | ModelType::TableDetection => RECEIPT,
                };
                (model_type, root.join(file))
            })
            .collect();

        Self {
            defaults,
            overrides: BTreeMap::new(),
            fallback: root.join(LOW_RES_IMAGE),
            samples_dir: root.join(SAMPLES_DIR),
        }
    }

    /// Replaces the sample used for `model_type`.
    pub fn with_override(mut self, model_type: ModelType, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(model_type, path.into());
        self
    }

    /// The single sample designated for `model_type`.
    pub fn sample_for(&self, model_type: ModelType) -> &Path {
        self.overrides
            .get(&model_type)
            .or_else(|| self.defaults.get(&model_type))
            .unwrap_or(&self.fallback)
    }
}

/// How many bodies a simulated user cycles through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    /// One body built from the designated sample.
    Single,
    /// One body per file of the samples directory.
    #[default]
    Multi,
}

impl FromStr for BodyMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            other => Err(format!("unknown body mode: {other}, use 'single' or 'multi'")),
        }
    }
}

impl fmt::Display for BodyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// The bodies built for one model identifier.
#[derive(Debug, Clone)]
pub struct Payload {
    pub model_type: ModelType,
    pub bodies: Vec<RequestBody>,
    /// Sample path of each body, in body order.
    pub sources: Vec<PathBuf>,
}

impl Payload {
    /// Names of the samples behind the bodies, for logging.
    pub fn source_names(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            })
            .collect()
    }

    pub fn into_cycle(self) -> Result<BodyCycle> {
        BodyCycle::new(self.bodies)
    }
}

/// Turns a model identifier into the request bodies a simulated user sends.
#[derive(Debug, Clone, Copy)]
pub struct PayloadBuilder<'a> {
    resources: &'a ResourceConfig,
    mode: BodyMode,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(resources: &'a ResourceConfig, mode: BodyMode) -> Self {
        Self { resources, mode }
    }

    /// Builds the bodies for `identifier`.
    ///
    /// The identifier is resolved before any file is touched, so an unknown
    /// model never causes asset I/O.
    ///
    /// # Arguments
    /// * `identifier` - The configured model name.
    ///
    /// # Returns
    /// One body in single mode, one body per sample file in multi mode.
    ///
    /// # Errors
    /// A configuration error for an unknown identifier or an empty samples
    /// directory, a resource error when a sample cannot be read.
    pub fn build(&self, identifier: &str) -> Result<Payload> {
        let model_type = ModelType::resolve(identifier)?;
        debug!(
            "model {identifier} resolved to {model_type} by token `{}`",
            model_type.token()
        );

        let payload = match self.mode {
            BodyMode::Single => self.single(model_type)?,
            BodyMode::Multi => self.multi(model_type)?,
        };

        info!(
            "testing model: {identifier}, testing samples: {}",
            payload.source_names().join(", ")
        );
        Ok(payload)
    }

    fn single(&self, model_type: ModelType) -> Result<Payload> {
        let asset = asset::load_file(self.resources.sample_for(model_type))?;
        Ok(Self::assemble(model_type, vec![asset], None))
    }

    fn multi(&self, model_type: ModelType) -> Result<Payload> {
        let assets = asset::load_dir(&self.resources.samples_dir)?;
        if assets.is_empty() {
            return Err(PayloadErr::EmptyBodySet);
        }

        Ok(Self::assemble(model_type, assets, Some(MAX_RESULTS)))
    }

    fn assemble(
        model_type: ModelType,
        assets: Vec<AssetRecord>,
        max_results: Option<u32>,
    ) -> Payload {
        let feature = model_type.feature();
        let file_type = model_type.file_type();

        let (bodies, sources) = assets
            .into_iter()
            .map(|asset| {
                let path = asset.path().to_path_buf();
                let media = Media::new(file_type, asset.into_encoded());
                (RequestBody::new(feature, media, max_results), path)
            })
            .unzip();

        Payload {
            model_type,
            bodies,
            sources,
        }
    }
}
