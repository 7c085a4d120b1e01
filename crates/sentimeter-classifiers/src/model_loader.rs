//! Model artifact resolution and device setup for Candle-based inference

use crate::config::{DeviceSpec, ModelSourceSpec};
use candle_core::Device;
use hf_hub::{api::sync::Api, Repo, RepoType};
use sentimeter_core::Result;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Paths of the three files that make up a sentiment model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub tokenizer: PathBuf,
    pub config: PathBuf,
    pub weights: PathBuf,
}

impl ModelArtifacts {
    /// Artifacts laid out in a single directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            tokenizer: dir.join(TOKENIZER_FILE),
            config: dir.join(CONFIG_FILE),
            weights: dir.join(WEIGHTS_FILE),
        }
    }

    /// Resolve artifacts from the configured source.
    ///
    /// Returns `Ok(None)` when no model is configured. Hugging Face sources
    /// are downloaded into the hf-hub cache, which blocks on network I/O.
    pub fn resolve(source: &ModelSourceSpec) -> Result<Option<Self>> {
        match source {
            ModelSourceSpec::None => Ok(None),
            ModelSourceSpec::Local { dir } => {
                let artifacts = Self::in_dir(dir);
                artifacts.ensure_exist()?;
                Ok(Some(artifacts))
            }
            ModelSourceSpec::HuggingFace { repo, revision } => {
                Self::download(repo, revision).map(Some)
            }
        }
    }

    fn download(repo_id: &str, revision: &str) -> Result<Self> {
        tracing::info!("Fetching sentiment model from HuggingFace: {} @ {}", repo_id, revision);

        let api = Api::new().map_err(|e| {
            sentimeter_core::Error::config(format!("Failed to initialize HF API: {}", e))
        })?;

        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let fetch = |filename: &str| {
            repo.get(filename).map_err(|e| {
                sentimeter_core::Error::config(format!(
                    "Failed to download {} from HF: {}",
                    filename, e
                ))
            })
        };

        Ok(Self {
            tokenizer: fetch(TOKENIZER_FILE)?,
            config: fetch(CONFIG_FILE)?,
            weights: fetch(WEIGHTS_FILE)?,
        })
    }

    fn ensure_exist(&self) -> Result<()> {
        for path in [&self.tokenizer, &self.config, &self.weights] {
            if !path.exists() {
                return Err(sentimeter_core::Error::config(format!(
                    "Model file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Create Candle device from device spec
pub fn create_device(spec: DeviceSpec) -> Result<Device> {
    match spec {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda => Device::new_cuda(0).map_err(|e| {
            sentimeter_core::Error::classifier(format!("Failed to create CUDA device: {}", e))
        }),
        DeviceSpec::Metal => Device::new_metal(0).map_err(|e| {
            sentimeter_core::Error::classifier(format!("Failed to create Metal device: {}", e))
        }),
    }
}

/// Load a tokenizer definition from disk
pub fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    Tokenizer::from_file(path).map_err(|e| {
        sentimeter_core::Error::classifier(format!(
            "Failed to load tokenizer {}: {}",
            path.display(),
            e
        ))
    })
}
