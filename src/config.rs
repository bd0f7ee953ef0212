//! Service configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file named by
//! `PREDICTOR_CONFIG`, then individual `PREDICTOR_*` environment variables.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8000"
//!
//! [artifacts]
//! dir = "/srv/student-performance"
//! model = "decision_tree_model.json"
//! features = "features.json"
//! scaler = "scaler.json"
//! labels = "label_encoder.json"
//! ```

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_CONFIG: &str = "PREDICTOR_CONFIG";
pub const ENV_BIND: &str = "PREDICTOR_BIND";
pub const ENV_ARTIFACT_DIR: &str = "PREDICTOR_ARTIFACT_DIR";
pub const ENV_MODEL_FILE: &str = "PREDICTOR_MODEL_FILE";
pub const ENV_FEATURES_FILE: &str = "PREDICTOR_FEATURES_FILE";
pub const ENV_SCALER_FILE: &str = "PREDICTOR_SCALER_FILE";
pub const ENV_LABELS_FILE: &str = "PREDICTOR_LABELS_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed parsing TOML config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid bind address '{value}': {source}")]
    Bind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

/// Where the artifacts live. File names are relative to `dir` unless absolute.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub features: PathBuf,
    pub scaler: PathBuf,
    pub labels: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            model: PathBuf::from("model.json"),
            features: PathBuf::from("features.json"),
            scaler: PathBuf::from("scaler.json"),
            labels: PathBuf::from("label_encoder.json"),
        }
    }
}

impl ArtifactConfig {
    /// Artifacts under `dir` with the default file names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.model)
    }

    pub fn features_path(&self) -> PathBuf {
        self.dir.join(&self.features)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.dir.join(&self.labels)
    }
}

impl Config {
    /// Defaults, then the TOML file from `PREDICTOR_CONFIG`, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with a custom environment lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(path) = non_empty(env(ENV_CONFIG)) {
            config.apply_file(Path::new(&path))?;
        }
        config.apply_env(env)?;
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_cfg: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_file_config(file_cfg)
    }

    fn apply_file_config(&mut self, file_cfg: FileConfig) -> Result<(), ConfigError> {
        if let Some(server) = file_cfg.server {
            if let Some(v) = non_empty(server.bind) {
                self.server.bind = parse_bind(&v)?;
            }
        }
        if let Some(artifacts) = file_cfg.artifacts {
            let target = &mut self.artifacts;
            set_path(&mut target.dir, artifacts.dir);
            set_path(&mut target.model, artifacts.model);
            set_path(&mut target.features, artifacts.features);
            set_path(&mut target.scaler, artifacts.scaler);
            set_path(&mut target.labels, artifacts.labels);
        }
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = non_empty(env(ENV_BIND)) {
            self.server.bind = parse_bind(&v)?;
        }
        let target = &mut self.artifacts;
        set_path(&mut target.dir, env(ENV_ARTIFACT_DIR));
        set_path(&mut target.model, env(ENV_MODEL_FILE));
        set_path(&mut target.features, env(ENV_FEATURES_FILE));
        set_path(&mut target.scaler, env(ENV_SCALER_FILE));
        set_path(&mut target.labels, env(ENV_LABELS_FILE));
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server: Option<FileServerConfig>,
    artifacts: Option<FileArtifactConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileServerConfig {
    bind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileArtifactConfig {
    dir: Option<String>,
    model: Option<String>,
    features: Option<String>,
    scaler: Option<String>,
    labels: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn set_path(target: &mut PathBuf, value: Option<String>) {
    if let Some(v) = non_empty(value) {
        *target = PathBuf::from(v);
    }
}

fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|source| ConfigError::Bind {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_with(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.bind.to_string(), "0.0.0.0:8000");
        assert_eq!(
            config.artifacts.model_path(),
            PathBuf::from("artifacts/model.json")
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::load_with(env_from(&[
            (ENV_BIND, "127.0.0.1:9000"),
            (ENV_ARTIFACT_DIR, "/srv/models"),
            (ENV_MODEL_FILE, "decision_tree_model"),
            (ENV_LABELS_FILE, "  "),
        ]))
        .unwrap();
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(
            config.artifacts.model_path(),
            PathBuf::from("/srv/models/decision_tree_model")
        );
        // Blank values keep the default.
        assert_eq!(config.artifacts.labels, PathBuf::from("label_encoder.json"));
    }

    #[test]
    fn test_invalid_bind() {
        let result = Config::load_with(env_from(&[(ENV_BIND, "not-an-address")]));
        assert!(matches!(result, Err(ConfigError::Bind { .. })));
    }

    #[test]
    fn test_file_then_env() {
        let path = std::env::temp_dir().join(format!(
            "perf_predictor_{}_config.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[server]\nbind = \"127.0.0.1:7000\"\n\n[artifacts]\ndir = \"/opt/model\"\nscaler = \"scaler.bin\"\n",
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = Config::load_with(env_from(&[
            (ENV_CONFIG, path_str.as_str()),
            (ENV_ARTIFACT_DIR, "/override"),
        ]))
        .unwrap();

        assert_eq!(config.server.bind.port(), 7000);
        assert_eq!(config.artifacts.dir, PathBuf::from("/override"));
        assert_eq!(
            config.artifacts.scaler_path(),
            PathBuf::from("/override/scaler.bin")
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = Config::load_with(env_from(&[(ENV_CONFIG, "/no/such/predictor.toml")]));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        let mut config = Config::default();
        let path = std::env::temp_dir().join(format!(
            "perf_predictor_{}_bad_config.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[artifacts]\nmodle = \"typo.json\"\n").unwrap();
        assert!(matches!(
            config.apply_file(&path),
            Err(ConfigError::Toml { .. })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_in_dir_keeps_default_names() {
        let cfg = ArtifactConfig::in_dir("/tmp/x");
        assert_eq!(cfg.features_path(), PathBuf::from("/tmp/x/features.json"));
    }
}
