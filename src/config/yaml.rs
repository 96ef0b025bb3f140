use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present
/// here override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// dashscope:
///   api_key: "sk-..."
///   http_url: "https://dashscope.aliyuncs.com/api/v1"
///   ws_url: "wss://dashscope.aliyuncs.com/api-ws/v1/inference"
///
/// tts:
///   model: "cosyvoice-v2"
///   format: "mp3"
///   sample_rate: 24000
///   speed: 1.0
///   volume: 100
///   clone_target_model: "cosyvoice-v2"
///
/// storage:
///   backend: "s3"
///   bucket: "voice-clone-bucket"
///   endpoint: "https://oss-cn-hangzhou.aliyuncs.com"
///   region: "cn-hangzhou"
///   access_key_id: "id"
///   access_key_secret: "secret"
///   virtual_hosted: true
///   signed_url_ttl_seconds: 600
///
/// chat:
///   api_url: "https://api.link-ai.tech/v1/chat/completions"
///   api_key: "key"
///   app_code: "app"
///
/// speech:
///   api_key: "google-key"
///   language: "zh-CN"
///
/// files:
///   voice_db_path: "server/voice/voice_db.json"
///   audio_cache_dir: "server/voice/cache"
///
/// session:
///   max_sessions: 10000
///   idle_ttl_seconds: 3600
///   max_history: 50
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub dashscope: Option<DashScopeYaml>,
    pub tts: Option<TtsYaml>,
    pub storage: Option<StorageYaml>,
    pub chat: Option<ChatYaml>,
    pub speech: Option<SpeechYaml>,
    pub files: Option<FilesYaml>,
    pub session: Option<SessionYaml>,
}

/// DashScope credentials and endpoints from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DashScopeYaml {
    pub api_key: Option<String>,
    pub http_url: Option<String>,
    pub ws_url: Option<String>,
}

/// Synthesis defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub model: Option<String>,
    pub format: Option<String>,
    pub sample_rate: Option<u32>,
    pub speed: Option<f32>,
    pub volume: Option<u32>,
    pub clone_target_model: Option<String>,
}

/// Object storage configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub backend: Option<String>,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub virtual_hosted: Option<bool>,
    pub signed_url_ttl_seconds: Option<u64>,
}

/// Chat endpoint configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChatYaml {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub app_code: Option<String>,
}

/// Speech recognition configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SpeechYaml {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub language: Option<String>,
}

/// Local file locations from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilesYaml {
    pub voice_db_path: Option<String>,
    pub audio_cache_dir: Option<String>,
}

/// Session store bounds from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionYaml {
    pub max_sessions: Option<u64>,
    pub idle_ttl_seconds: Option<u64>,
    pub max_history: Option<usize>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Required fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
