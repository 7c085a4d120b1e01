//! Embedding-pooling sentiment model
//!
//! A small Keras-style text classifier: token embedding, global average
//! pooling over the sequence, one ReLU dense layer and a sigmoid output.
//! Input text is tokenized and left-padded/truncated to a fixed length the
//! same way Keras `pad_sequences` does by default.

use crate::classifier::{ClassificationResult, Classifier};
use crate::model_loader::{self, ModelArtifacts};
use candle_core::{DType, Device, Tensor};
use candle_nn::{Embedding, Linear, Module, VarBuilder};
use sentimeter_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Model dimensions, read from `config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelArchitecture {
    pub vocab_size: usize,
    pub embedding_dim: usize,
    pub hidden_dim: usize,

    /// Id used to pad short sequences
    #[serde(default)]
    pub pad_id: u32,

    /// Id substituted for tokens outside the embedding table
    #[serde(default = "default_oov_id")]
    pub oov_id: u32,
}

fn default_oov_id() -> u32 {
    1
}

impl ModelArchitecture {
    fn validate(&self) -> Result<()> {
        if self.vocab_size == 0 || self.embedding_dim == 0 || self.hidden_dim == 0 {
            return Err(sentimeter_core::Error::config(
                "Model dimensions must be non-zero",
            ));
        }
        if self.pad_id as usize >= self.vocab_size || self.oov_id as usize >= self.vocab_size {
            return Err(sentimeter_core::Error::config(format!(
                "pad_id and oov_id must be below vocab_size ({})",
                self.vocab_size
            )));
        }
        Ok(())
    }
}

/// Pad or truncate a token sequence to exactly `max_len` ids.
///
/// Long sequences keep their last `max_len` tokens; short ones are padded at
/// the front.
pub fn pad_sequence(ids: &[u32], max_len: usize, pad_id: u32) -> Vec<u32> {
    if ids.len() >= max_len {
        return ids[ids.len() - max_len..].to_vec();
    }

    let mut padded = vec![pad_id; max_len - ids.len()];
    padded.extend_from_slice(ids);
    padded
}

/// Sentiment model with its tokenizer
pub struct SequenceClassifier {
    name: String,
    network: Arc<Network>,
}

/// Tokenizer and layers, shared with blocking inference tasks
struct Network {
    tokenizer: Tokenizer,
    embedding: Embedding,
    hidden: Linear,
    output: Linear,
    architecture: ModelArchitecture,
    max_len: usize,
    device: Device,
}

impl SequenceClassifier {
    /// Load tokenizer, dimensions and weights
    pub fn load(artifacts: &ModelArtifacts, max_len: usize, device: Device) -> Result<Self> {
        if max_len == 0 {
            return Err(sentimeter_core::Error::config("max_len must be at least 1"));
        }

        let tokenizer = model_loader::load_tokenizer(&artifacts.tokenizer)?;

        let architecture: ModelArchitecture =
            serde_json::from_str(&std::fs::read_to_string(&artifacts.config)?)?;
        architecture.validate()?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(
                std::slice::from_ref(&artifacts.weights),
                DType::F32,
                &device,
            )
            .map_err(|e| {
                sentimeter_core::Error::classifier(format!("Failed to load weights: {}", e))
            })?
        };

        let layers = || -> candle_core::Result<(Embedding, Linear, Linear)> {
            let embedding = candle_nn::embedding(
                architecture.vocab_size,
                architecture.embedding_dim,
                vb.pp("embedding"),
            )?;
            let hidden = candle_nn::linear(
                architecture.embedding_dim,
                architecture.hidden_dim,
                vb.pp("hidden"),
            )?;
            let output = candle_nn::linear(architecture.hidden_dim, 1, vb.pp("output"))?;
            Ok((embedding, hidden, output))
        };
        let (embedding, hidden, output) = layers().map_err(|e| {
            sentimeter_core::Error::classifier(format!("Failed to build model layers: {}", e))
        })?;

        let name = artifacts
            .weights
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("sentiment-model")
            .to_string();

        tracing::info!(
            model = %name,
            vocab_size = architecture.vocab_size,
            embedding_dim = architecture.embedding_dim,
            hidden_dim = architecture.hidden_dim,
            max_len,
            "Loaded sentiment model"
        );

        Ok(Self {
            name,
            network: Arc::new(Network {
                tokenizer,
                embedding,
                hidden,
                output,
                architecture,
                max_len,
                device,
            }),
        })
    }

    /// Tokenize into a fixed-length id sequence
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        self.network.encode(text)
    }
}

impl Network {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self.tokenizer.encode(text, false).map_err(|e| {
            sentimeter_core::Error::classifier(format!("Tokenization failed: {}", e))
        })?;

        let vocab_size = self.architecture.vocab_size as u32;
        let ids: Vec<u32> = encoding
            .get_ids()
            .iter()
            .map(|&id| if id < vocab_size { id } else { self.architecture.oov_id })
            .collect();

        Ok(pad_sequence(&ids, self.max_len, self.architecture.pad_id))
    }

    fn forward(&self, ids: &[u32]) -> candle_core::Result<f32> {
        let input = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let embedded = self.embedding.forward(&input)?;
        let pooled = embedded.mean(1)?;
        let hidden = self.hidden.forward(&pooled)?.relu()?;
        let logits = self.output.forward(&hidden)?;
        let probability = candle_nn::ops::sigmoid(&logits)?;

        let values = probability.flatten_all()?.to_vec1::<f32>()?;
        values
            .first()
            .copied()
            .ok_or_else(|| candle_core::Error::Msg("model produced no output".to_string()))
    }

    /// Encode and run the forward pass; CPU-bound
    fn infer(&self, text: &str) -> Result<f32> {
        let ids = self.encode(text)?;
        let probability = self.forward(&ids).map_err(|e| {
            sentimeter_core::Error::classifier(format!("Model forward pass failed: {}", e))
        })?;

        if !probability.is_finite() {
            return Err(sentimeter_core::Error::classifier(format!(
                "Model produced a non-finite output: {}",
                probability
            )));
        }
        Ok(probability)
    }
}

#[async_trait::async_trait]
impl Classifier for SequenceClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let network = Arc::clone(&self.network);
        let text = text.to_string();
        let probability = tokio::task::spawn_blocking(move || network.infer(&text))
            .await
            .map_err(|e| {
                sentimeter_core::Error::classifier(format!("Inference task failed: {}", e))
            })??;

        Ok(ClassificationResult::from_score(probability as f64)
            .with_model(self.name.clone())
            .with_latency_us(start.elapsed().as_micros() as u64))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
