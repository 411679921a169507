use std::{
    env, fs,
    path::{Path, PathBuf},
};

use payload::{BodyMode, ModelType, ResourceConfig};

use crate::error::{LoadgenErr, Result};

pub const MODEL_NAME: &str = "MODEL_NAME";
pub const SERVICE_NAME: &str = "SERVICE_NAME";
pub const SERVICE_NAMESPACE: &str = "SERVICE_NAMESPACE";
pub const SERVICE_PORT: &str = "SERVICE_PORT";
pub const LOADTEST_MODE: &str = "LOADTEST_MODE";
pub const LOADTEST_RESOURCES: &str = "LOADTEST_RESOURCES";
pub const LOADTEST_SAMPLE: &str = "LOADTEST_SAMPLE";
pub const LOADTEST_SAMPLES_DIR: &str = "LOADTEST_SAMPLES_DIR";
pub const LOADTEST_CONFIG: &str = "LOADTEST_CONFIG";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RESOURCES: &str = "resources";

/// Named samples shipped in the resource directory.
const CATALOG: [(&str, &str); 10] = [
    ("low-res-img", "load-test-low-res-image_computer.jpg"),
    ("mid-res-img", "load-test-mid-res-image_street_view.jpg"),
    ("high-res-img", "load-test-high-res-image_lavatory.jpg"),
    ("ultra-res-img", "load-test-ultrahigh-res-image_office.jpg"),
    ("low-res-doc", "load-test-detect-text-image_receipt.jpg"),
    ("low-res-pdf", "load-test-detect-text-image_one_page.pdf"),
    ("high-res-pdf", "load-test-detect-text-image_essay.pdf"),
    ("ultra-res-doc", "load-test-detect-text-image_big_small.jpg"),
    ("random-images", "images"),
    ("random-documents", "documents"),
];

/// Everything a load test run needs, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Model identifier, e.g. `ic-resnet50`.
    pub model: String,
    /// Base URL of the prediction service.
    pub host: String,
    pub mode: BodyMode,
    pub resources: ResourceConfig,
}

impl LoadConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, `None` when unset.
    ///
    /// # Returns
    /// The resolved configuration.
    ///
    /// # Errors
    /// Returns `LoadgenErr` if `MODEL_NAME` is missing, a variable holds an
    /// unusable value or the resource config file cannot be loaded.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = lookup(MODEL_NAME).ok_or(LoadgenErr::MissingVar(MODEL_NAME))?;

        let port = match lookup(SERVICE_PORT) {
            Some(value) => value.parse::<u16>().map_err(|e| LoadgenErr::InvalidVar {
                var: SERVICE_PORT,
                reason: format!("{e}"),
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let host = match (lookup(SERVICE_NAME), lookup(SERVICE_NAMESPACE)) {
            (Some(name), Some(namespace)) if !name.is_empty() && !namespace.is_empty() => {
                format!("http://{name}.{namespace}:{port}")
            }
            _ => format!("http://localhost:{port}"),
        };

        let mode = match lookup(LOADTEST_MODE) {
            Some(value) => value
                .parse::<BodyMode>()
                .map_err(|reason| LoadgenErr::InvalidVar {
                    var: LOADTEST_MODE,
                    value,
                    reason,
                })?,
            None => BodyMode::default(),
        };

        let root = PathBuf::from(
            lookup(LOADTEST_RESOURCES).unwrap_or_else(|| DEFAULT_RESOURCES.to_string()),
        );

        let mut resources = match lookup(LOADTEST_CONFIG) {
            Some(path) => read_resources(Path::new(&path))?,
            None => ResourceConfig::under(&root),
        };

        if let Some(sample) = lookup(LOADTEST_SAMPLE) {
            let model_type = ModelType::resolve(&model)?;
            resources = resources.with_override(model_type, catalog_path(&root, &sample));
        }

        if let Some(dir) = lookup(LOADTEST_SAMPLES_DIR) {
            resources.samples_dir = catalog_path(&root, &dir);
        }

        Ok(Self {
            model,
            host,
            mode,
            resources,
        })
    }
}

/// Resolves a catalog name to its path under `root`; anything else is a path.
pub fn catalog_path(root: &Path, name: &str) -> PathBuf {
    CATALOG
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, file)| root.join(file))
        .unwrap_or_else(|| PathBuf::from(name))
}

fn read_resources(path: &Path) -> Result<ResourceConfig> {
    let content = fs::read_to_string(path).map_err(|e| LoadgenErr::ConfigFile {
        path: path.to_path_buf(),
        reason: format!("cannot read: {e}"),
    })?;

    serde_json::from_str(&content).map_err(|e| LoadgenErr::ConfigFile {
        path: path.to_path_buf(),
        reason: format!("invalid JSON: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        move |key: &str| vars.get(key).map(|value| value.to_string())
    }

    #[test]
    fn defaults_to_localhost_and_multi_mode() {
        let config = LoadConfig::from_lookup(lookup(&[(MODEL_NAME, "ic-resnet50")])).unwrap();

        assert_eq!(config.model, "ic-resnet50");
        assert_eq!(config.host, "http://localhost:8080");
        assert_eq!(config.mode, BodyMode::Multi);
        assert_eq!(config.resources, ResourceConfig::under("resources"));
    }

    #[test]
    fn service_name_and_namespace_build_the_host() {
        let config = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "od-yolo"),
            (SERVICE_NAME, "vision"),
            (SERVICE_NAMESPACE, "serving"),
            (SERVICE_PORT, "9000"),
        ]))
        .unwrap();
        assert_eq!(config.host, "http://vision.serving:9000");

        let config = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "od-yolo"),
            (SERVICE_NAME, "vision"),
        ]))
        .unwrap();
        assert_eq!(config.host, "http://localhost:8080");
    }

    #[test]
    fn missing_model_name_is_reported() {
        let err = LoadConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, LoadgenErr::MissingVar(MODEL_NAME)));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "ocr"),
            (SERVICE_PORT, "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LoadgenErr::InvalidVar { var: SERVICE_PORT, .. }));

        let err = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "ocr"),
            (LOADTEST_MODE, "burst"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LoadgenErr::InvalidVar { var: LOADTEST_MODE, .. }));
    }

    #[test]
    fn sample_override_targets_the_resolved_model() {
        let config = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "ocr-v2"),
            (LOADTEST_MODE, "single"),
            (LOADTEST_RESOURCES, "/srv/res"),
            (LOADTEST_SAMPLE, "high-res-pdf"),
            (LOADTEST_SAMPLES_DIR, "random-documents"),
        ]))
        .unwrap();

        assert_eq!(config.mode, BodyMode::Single);
        assert_eq!(
            config.resources.sample_for(ModelType::TextDetection),
            Path::new("/srv/res/load-test-detect-text-image_essay.pdf")
        );
        assert_eq!(
            config.resources.sample_for(ModelType::TableDetection),
            Path::new("/srv/res/load-test-detect-text-image_receipt.jpg")
        );
        assert_eq!(config.resources.samples_dir, Path::new("/srv/res/documents"));
    }

    #[test]
    fn sample_override_needs_a_known_model() {
        let err = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "resnet50"),
            (LOADTEST_SAMPLE, "/tmp/x.jpg"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LoadgenErr::Payload(_)));
    }

    #[test]
    fn catalog_names_and_plain_paths() {
        let root = Path::new("/r");
        assert_eq!(
            catalog_path(root, "mid-res-img"),
            Path::new("/r/load-test-mid-res-image_street_view.jpg")
        );
        assert_eq!(catalog_path(root, "/data/cat.png"), Path::new("/data/cat.png"));
    }

    #[test]
    fn resource_config_file_replaces_the_stock_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");
        fs::write(
            &path,
            r#"{ "fallback": "/s/low.jpg", "samples_dir": "/s/images" }"#,
        )
        .unwrap();

        let config = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "ld-langid"),
            (LOADTEST_CONFIG, path.to_str().unwrap()),
        ]))
        .unwrap();

        assert_eq!(
            config.resources.sample_for(ModelType::LanguageClassification),
            Path::new("/s/low.jpg")
        );
        assert_eq!(config.resources.samples_dir, Path::new("/s/images"));

        fs::write(&path, "{ not json").unwrap();
        let err = LoadConfig::from_lookup(lookup(&[
            (MODEL_NAME, "ld-langid"),
            (LOADTEST_CONFIG, path.to_str().unwrap()),
        ]))
        .unwrap_err();
        assert!(matches!(err, LoadgenErr::ConfigFile { .. }));
    }
}
