//! Configuration module for the voice dialogue stack
//!
//! Configuration comes from `.env` files, environment variables and YAML files.
//! Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! Each provider client receives its own config struct, derived here from the
//! single [`DialogueConfig`]. Nothing is passed through process-wide state.
//!
//! # Example
//! ```rust,no_run
//! use voice_dialogue::config::DialogueConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = DialogueConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config = DialogueConfig::from_file(&PathBuf::from("dialogue.yaml"))?;
//! println!("Voice registry at {}", config.voice_db_path.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::core::chat::ChatConfig;
use crate::core::enrollment::EnrollmentConfig;
use crate::core::session::SessionConfig;
use crate::core::storage::S3StorageConfig;
use crate::core::stt::RecognizerConfig;
use crate::core::tts::CosyVoiceConfig;

mod env;
mod merge;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// A secret string that is wiped from memory when dropped
pub type Secret = Zeroizing<String>;

/// Default DashScope REST base URL (enrollment)
pub const DEFAULT_DASHSCOPE_HTTP_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
/// Default DashScope WebSocket inference URL (synthesis)
pub const DEFAULT_DASHSCOPE_WS_URL: &str = "wss://dashscope.aliyuncs.com/api-ws/v1/inference";
/// Default Google Cloud Speech v1 recognize endpoint
pub const DEFAULT_SPEECH_API_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Which object storage backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// S3-compatible remote bucket (AWS S3, Aliyun OSS, MinIO, ...)
    #[default]
    S3,
    /// Process-local in-memory store, for development and tests
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" | "oss" | "aws" => Ok(Self::S3),
            "memory" | "in-memory" | "inmemory" => Ok(Self::Memory),
            other => Err(format!(
                "Unsupported storage backend: {other}. Supported backends: s3, memory"
            )),
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S3 => write!(f, "s3"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Dialogue stack configuration
///
/// Contains everything needed to wire the dialogue orchestrator:
/// - DashScope credentials and synthesis defaults (CosyVoice)
/// - Object storage bucket and credentials
/// - Chat endpoint URL, key and application code
/// - Speech recognition key and language
/// - Local file locations (voice registry, scratch directory)
/// - Session store bounds
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    // DashScope (synthesis + enrollment)
    pub dashscope_api_key: Option<Secret>,
    pub dashscope_http_url: String,
    pub dashscope_ws_url: String,
    pub tts_model: String,
    pub tts_format: String,
    pub tts_sample_rate: u32,
    /// Passed through to the provider unvalidated (nominal 0.5 - 2.0)
    pub tts_speed: f32,
    /// Passed through to the provider unvalidated (nominal 0 - 100)
    pub tts_volume: u32,
    /// Target model for voices cloned through the orchestrator
    pub clone_target_model: String,

    // Object storage
    pub storage_backend: StorageKind,
    pub storage_bucket: String,
    pub storage_endpoint: Option<String>,
    pub storage_region: String,
    pub storage_access_key_id: Option<Secret>,
    pub storage_access_key_secret: Option<Secret>,
    /// Address the bucket as `https://<bucket>.<endpoint-host>` (required by OSS)
    pub storage_virtual_hosted: bool,
    pub signed_url_ttl_seconds: u64,

    // Chat endpoint
    pub chat_api_url: Option<String>,
    pub chat_api_key: Option<Secret>,
    pub chat_app_code: Option<String>,

    // Speech recognition
    pub speech_api_key: Option<Secret>,
    pub speech_api_url: String,
    pub speech_language: String,

    // Local files
    pub voice_db_path: PathBuf,
    pub audio_cache_dir: PathBuf,

    // Session store
    pub session_max_sessions: u64,
    pub session_idle_ttl_seconds: Option<u64>,
    pub session_max_history: Option<usize>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            dashscope_api_key: None,
            dashscope_http_url: DEFAULT_DASHSCOPE_HTTP_URL.to_string(),
            dashscope_ws_url: DEFAULT_DASHSCOPE_WS_URL.to_string(),
            tts_model: "cosyvoice-v2".to_string(),
            tts_format: "mp3".to_string(),
            tts_sample_rate: 24000,
            tts_speed: 1.0,
            tts_volume: 100,
            clone_target_model: "cosyvoice-v2".to_string(),
            storage_backend: StorageKind::S3,
            storage_bucket: "voice-clone-bucket".to_string(),
            storage_endpoint: Some("https://oss-cn-hangzhou.aliyuncs.com".to_string()),
            storage_region: "cn-hangzhou".to_string(),
            storage_access_key_id: None,
            storage_access_key_secret: None,
            storage_virtual_hosted: true,
            signed_url_ttl_seconds: 600,
            chat_api_url: None,
            chat_api_key: None,
            chat_app_code: None,
            speech_api_key: None,
            speech_api_url: DEFAULT_SPEECH_API_URL.to_string(),
            speech_language: "zh-CN".to_string(),
            voice_db_path: PathBuf::from("server/voice/voice_db.json"),
            audio_cache_dir: PathBuf::from("server/voice/cache"),
            session_max_sessions: 10_000,
            session_idle_ttl_seconds: None,
            session_max_history: None,
        }
    }
}

impl DialogueConfig {
    /// Load configuration from environment variables, applying defaults.
    ///
    /// `.env` values must already be loaded (see [`crate::init::load_dotenv`]).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// DashScope API key, required by synthesis and enrollment
    fn dashscope_key(&self) -> Result<String, String> {
        self.dashscope_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| key.to_string())
            .ok_or_else(|| "DashScope API key not configured (DASHSCOPE_API_KEY)".to_string())
    }

    /// Build the synthesis client configuration
    pub fn cosyvoice_config(&self) -> Result<CosyVoiceConfig, String> {
        Ok(CosyVoiceConfig {
            api_key: self.dashscope_key()?,
            ws_url: self.dashscope_ws_url.clone(),
            model: self.tts_model.clone(),
            format: self.tts_format.clone(),
            sample_rate: self.tts_sample_rate,
            speed: self.tts_speed,
            volume: self.tts_volume,
        })
    }

    /// Build the voice enrollment client configuration
    pub fn enrollment_config(&self) -> Result<EnrollmentConfig, String> {
        Ok(EnrollmentConfig {
            api_key: self.dashscope_key()?,
            base_url: self.dashscope_http_url.clone(),
        })
    }

    /// Build the S3-compatible storage configuration
    pub fn storage_config(&self) -> Result<S3StorageConfig, String> {
        let access_key_id = self
            .storage_access_key_id
            .as_ref()
            .map(|key| key.to_string())
            .ok_or_else(|| "Storage access key not configured (OSS_ACCESS_KEY_ID)".to_string())?;
        let secret_access_key = self
            .storage_access_key_secret
            .as_ref()
            .map(|key| key.to_string())
            .ok_or_else(|| {
                "Storage secret key not configured (OSS_ACCESS_KEY_SECRET)".to_string()
            })?;

        Ok(S3StorageConfig {
            bucket: self.storage_bucket.clone(),
            region: self.storage_region.clone(),
            endpoint: self.storage_endpoint.clone(),
            access_key_id,
            secret_access_key,
            virtual_hosted_style: self.storage_virtual_hosted,
        })
    }

    /// Validity window for signed download URLs
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_seconds)
    }

    /// Build the speech recognizer configuration
    pub fn recognizer_config(&self) -> Result<RecognizerConfig, String> {
        let api_key = self
            .speech_api_key
            .as_ref()
            .map(|key| key.to_string())
            .ok_or_else(|| "Speech API key not configured (SPEECH_API_KEY)".to_string())?;

        Ok(RecognizerConfig {
            api_key,
            api_url: self.speech_api_url.clone(),
            language: self.speech_language.clone(),
            scratch_dir: self.audio_cache_dir.clone(),
        })
    }

    /// Build the chat endpoint configuration
    pub fn chat_config(&self) -> Result<ChatConfig, String> {
        let api_url = self
            .chat_api_url
            .clone()
            .ok_or_else(|| "Chat endpoint not configured (LINK_AI_API_URL)".to_string())?;
        let api_key = self
            .chat_api_key
            .as_ref()
            .map(|key| key.to_string())
            .ok_or_else(|| "Chat API key not configured (LINK_AI_API_KEY)".to_string())?;
        let app_code = self
            .chat_app_code
            .clone()
            .ok_or_else(|| "Chat app code not configured (LINK_AI_APP_CODE)".to_string())?;

        Ok(ChatConfig {
            api_url,
            api_key,
            app_code,
        })
    }

    /// Build the session store configuration
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_sessions: self.session_max_sessions,
            idle_ttl: self.session_idle_ttl_seconds.map(Duration::from_secs),
            max_history: self.session_max_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    fn secret(value: &str) -> Option<Secret> {
        Some(Zeroizing::new(value.to_string()))
    }

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("DASHSCOPE_API_KEY");
            env::remove_var("TTS_MODEL");
            env::remove_var("TTS_VOLUME");
            env::remove_var("STORAGE_BACKEND");
            env::remove_var("OSS_BUCKET");
            env::remove_var("LINK_AI_API_URL");
            env::remove_var("LINK_AI_API_KEY");
            env::remove_var("LINK_AI_APP_CODE");
            env::remove_var("SPEECH_LANGUAGE");
            env::remove_var("SIGNED_URL_TTL_SECONDS");
            env::remove_var("SESSION_MAX_HISTORY");
        }
    }

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = DialogueConfig::default();
        assert_eq!(config.storage_bucket, "voice-clone-bucket");
        assert_eq!(config.storage_region, "cn-hangzhou");
        assert_eq!(config.speech_language, "zh-CN");
        assert_eq!(config.tts_model, "cosyvoice-v2");
        assert_eq!(config.signed_url_ttl(), Duration::from_secs(600));
        assert!(config.session_idle_ttl_seconds.is_none());
    }

    #[test]
    fn test_storage_kind_parsing() {
        assert_eq!("s3".parse::<StorageKind>().unwrap(), StorageKind::S3);
        assert_eq!("OSS".parse::<StorageKind>().unwrap(), StorageKind::S3);
        assert_eq!(
            "memory".parse::<StorageKind>().unwrap(),
            StorageKind::Memory
        );
        assert!("ftp".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_cosyvoice_config_requires_key() {
        let config = DialogueConfig::default();
        let err = config.cosyvoice_config().unwrap_err();
        assert!(err.contains("DASHSCOPE_API_KEY"));

        let config = DialogueConfig {
            dashscope_api_key: secret("sk-test"),
            tts_volume: 80,
            ..Default::default()
        };
        let tts = config.cosyvoice_config().unwrap();
        assert_eq!(tts.api_key, "sk-test");
        assert_eq!(tts.volume, 80);
        assert_eq!(tts.ws_url, DEFAULT_DASHSCOPE_WS_URL);
    }

    #[test]
    fn test_chat_config_reports_first_missing_field() {
        let config = DialogueConfig {
            chat_api_url: Some("https://chat.example.com/v1/chat/completions".to_string()),
            chat_api_key: secret("key"),
            ..Default::default()
        };
        let err = config.chat_config().unwrap_err();
        assert!(err.contains("LINK_AI_APP_CODE"));
    }

    #[test]
    fn test_storage_config_requires_both_keys() {
        let config = DialogueConfig {
            storage_access_key_id: secret("id"),
            ..Default::default()
        };
        assert!(config.storage_config().is_err());

        let config = DialogueConfig {
            storage_access_key_id: secret("id"),
            storage_access_key_secret: secret("secret"),
            ..Default::default()
        };
        let storage = config.storage_config().unwrap();
        assert_eq!(storage.bucket, "voice-clone-bucket");
        assert!(storage.virtual_hosted_style);
    }

    #[test]
    fn test_session_config_conversion() {
        let config = DialogueConfig {
            session_idle_ttl_seconds: Some(120),
            session_max_history: Some(20),
            ..Default::default()
        };
        let session = config.session_config();
        assert_eq!(session.idle_ttl, Some(Duration::from_secs(120)));
        assert_eq!(session.max_history, Some(20));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_variables() {
        cleanup_env_vars();
        unsafe {
            env::set_var("DASHSCOPE_API_KEY", "env-key");
            env::set_var("TTS_VOLUME", "60");
            env::set_var("STORAGE_BACKEND", "memory");
            env::set_var("SPEECH_LANGUAGE", "en-US");
        }

        let config = DialogueConfig::from_env().unwrap();
        assert_eq!(
            config.dashscope_api_key.as_deref().map(String::as_str),
            Some("env-key")
        );
        assert_eq!(config.tts_volume, 60);
        assert_eq!(config.storage_backend, StorageKind::Memory);
        assert_eq!(config.speech_language, "en-US");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_number() {
        cleanup_env_vars();
        unsafe {
            env::set_var("TTS_VOLUME", "loud");
        }

        let result = DialogueConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("TTS_VOLUME"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dialogue.yaml");

        let yaml_content = r#"
dashscope:
  api_key: "yaml-key"
chat:
  app_code: "yaml-app"
storage:
  bucket: "yaml-bucket"
"#;
        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("DASHSCOPE_API_KEY", "env-key");
            env::set_var("LINK_AI_APP_CODE", "env-app");
            env::set_var("OSS_BUCKET", "env-bucket");
            env::set_var("TTS_MODEL", "cosyvoice-v1");
        }

        let config = DialogueConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(
            config.dashscope_api_key.as_deref().map(String::as_str),
            Some("yaml-key")
        );
        assert_eq!(config.chat_app_code.as_deref(), Some("yaml-app"));
        assert_eq!(config.storage_bucket, "yaml-bucket");
        // ENV value survives where YAML is silent
        assert_eq!(config.tts_model, "cosyvoice-v1");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/dialogue.yaml");
        let result = DialogueConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    #[serial]
    fn test_from_file_rejects_invalid_values() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dialogue.yaml");
        fs::write(&config_path, "storage:\n  signed_url_ttl_seconds: 0\n").unwrap();

        let result = DialogueConfig::from_file(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("signed_url_ttl_seconds")
        );
    }
}
