//! Persistence of fitted artifacts.
//!
//! Artifacts are plain serde documents holding only numerical parameters and
//! names. The on-disk encoding is picked from the file extension: `.json`
//! files are read with `serde_json`, everything else is treated as `bincode`.

use crate::error::ArtifactError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// On-disk encoding of an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Human-readable JSON document.
    Json,
    /// Compact bincode encoding.
    Bincode,
}

impl ArtifactFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Bincode,
        }
    }
}

/// A fitted artifact that can be stored on disk and validated after loading.
///
/// Implementors contain only plain data (`Vec<f64>`, names, class labels),
/// never runtime handles.
///
/// # Guarantees
/// - `load_from_file` never returns an artifact that failed [`Artifact::validate`].
/// - `save_to_file` followed by `load_from_file` restores an equal artifact.
pub trait Artifact: Serialize + DeserializeOwned {
    /// Human-readable artifact name used in error messages.
    const NAME: &'static str;

    /// Checks internal consistency (matching lengths, index ranges, ...).
    fn validate(&self) -> Result<(), ArtifactError> {
        Ok(())
    }

    /// Save the artifact, encoding it according to the path's extension.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = match ArtifactFormat::from_path(path) {
            ArtifactFormat::Json => {
                serde_json::to_vec_pretty(self).map_err(|source| ArtifactError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            ArtifactFormat::Bincode => {
                bincode::serialize(self).map_err(|source| ArtifactError::Bincode {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        std::fs::write(path, bytes).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and validate an artifact.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self = match ArtifactFormat::from_path(path) {
            ArtifactFormat::Json => {
                serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            ArtifactFormat::Bincode => {
                bincode::deserialize(&bytes).map_err(|source| ArtifactError::Bincode {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        artifact.validate()?;
        Ok(artifact)
    }
}
