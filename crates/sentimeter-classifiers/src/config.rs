//! Configuration for the sentiment classifier and model loading

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default fixed sequence length fed to the model
pub const DEFAULT_MAX_LEN: usize = 200;

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Where model artifacts come from
    #[serde(default)]
    pub source: ModelSourceSpec,

    /// Sequence length (pad or truncate to this many tokens)
    #[serde(default = "default_max_len")]
    pub max_len: usize,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceSpec,

    /// Fixed seed for the fallback heuristic; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            source: ModelSourceSpec::default(),
            max_len: default_max_len(),
            device: DeviceSpec::default(),
            seed: None,
        }
    }
}

impl ClassifierConfig {
    /// Configuration for a model stored in a local directory
    pub fn from_local(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSourceSpec::Local { dir: dir.into() },
            ..Default::default()
        }
    }

    /// Configuration for a model hosted on the Hugging Face Hub
    pub fn from_hf(repo: impl Into<String>) -> Self {
        Self {
            source: ModelSourceSpec::HuggingFace {
                repo: repo.into(),
                revision: default_revision(),
            },
            ..Default::default()
        }
    }

    /// Set sequence length
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Set fallback seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Model source specification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSourceSpec {
    /// No model: the keyword heuristic serves every request
    #[default]
    None,

    /// Directory holding `tokenizer.json`, `config.json` and `model.safetensors`
    Local { dir: PathBuf },

    /// Hugging Face Hub repository holding the same three files
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

/// Device specification
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda,
    Metal,
}

fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

fn default_revision() -> String {
    "main".to_string()
}
