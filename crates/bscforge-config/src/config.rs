//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Fixed name of the persisted knowledge-base collection.
pub const COLLECTION_NAME: &str = "b2scala_knowledge";

/// Fixed file name for the generated artifact.
pub const GENERATED_FILE_NAME: &str = "generated_b2scala_code.scala";

/// Environment variable holding the API key override.
pub const API_KEY_ENV: &str = "NVIDIA_API_KEY";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from the default location and resolve the API key
    /// from the process environment. The resolved key travels inside the
    /// returned value; nothing reads the environment after this point.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        let mut config = Self::load_from(&paths.config_file)?;
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                debug!("Using API key from {}", API_KEY_ENV);
                config.api.api_key = Some(key);
            }
        }
        Ok(config)
    }

    /// Load configuration from a specific path, without environment lookup.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# bscforge Configuration
# Protocol drafts in, B2Scala models out.

[api]
# NVIDIA API endpoint (OpenAI-compatible)
base_url = "https://integrate.api.nvidia.com/v1"

# API key; the NVIDIA_API_KEY environment variable overrides this
# api_key = "nvapi-..."

# Model for embedding drafts and knowledge-base chunks
embedding_model = "nvidia/nv-embedqa-e5-v5"

# Model for code generation
chat_model = "deepseek-ai/deepseek-v3.1"

# Request timeout in seconds
timeout_seconds = 120

[generation]
temperature = 0.2
top_p = 0.7
max_tokens = 8192

# Surface the model's reasoning stream while generating
show_reasoning = true

[chunking]
# Characters per knowledge-base chunk
chunk_size = 1000

# Overlap between neighboring chunks
chunk_overlap = 200

# Split boundaries, tried in order
separators = ["\n\n", "\n", ";", ".", " "]

[retrieval]
# Canonical examples retrieved per query (1-10)
default_k = 5

[upload]
# Maximum uploaded file size in megabytes
max_size_mb = 10

[paths]
# Override the default docs/output locations
# docs_dir = "~/bscforge/docs"
# output_dir = "~/bscforge/generated"
"#
        .to_string()
    }

    /// Docs directory, honoring the `[paths]` override.
    pub fn docs_dir(&self, paths: &AppPaths) -> PathBuf {
        self.paths
            .docs_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| paths.docs_dir.clone())
    }

    /// Output directory, honoring the `[paths]` override.
    pub fn output_dir(&self, paths: &AppPaths) -> PathBuf {
        self.paths
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| paths.output_dir.clone())
    }
}

/// Hosted API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com/v1".to_string(),
            api_key: None,
            embedding_model: "nvidia/nv-embedqa-e5-v5".to_string(),
            chat_model: "deepseek-ai/deepseek-v3.1".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub show_reasoning: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.7,
            max_tokens: 8192,
            show_reasoning: true,
        }
    }
}

/// Text chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                ";".to_string(),
                ".".to_string(),
                " ".to_string(),
            ],
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { default_k: 5 }
    }
}

/// Upload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_size_mb: u64,
}

impl UploadConfig {
    /// Size cap in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_size_mb: 10 }
    }
}

/// Optional path overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    pub docs_dir: Option<String>,
    pub output_dir: Option<String>,
}
