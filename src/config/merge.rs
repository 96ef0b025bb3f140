use std::path::PathBuf;

use zeroize::Zeroizing;

use super::env::load_from_env;
use super::yaml::YamlConfig;
use super::{DialogueConfig, StorageKind};

/// Merge environment configuration (base) with optional YAML overrides
///
/// Environment variables (including values loaded from `.env`) form the base
/// layer over defaults; any value present in the YAML file replaces it.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<DialogueConfig, Box<dyn std::error::Error>> {
    let mut config = load_from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(dashscope) = yaml.dashscope {
        if let Some(key) = dashscope.api_key {
            config.dashscope_api_key = Some(Zeroizing::new(key));
        }
        if let Some(url) = dashscope.http_url {
            config.dashscope_http_url = url;
        }
        if let Some(url) = dashscope.ws_url {
            config.dashscope_ws_url = url;
        }
    }

    if let Some(tts) = yaml.tts {
        if let Some(model) = tts.model {
            config.tts_model = model;
        }
        if let Some(format) = tts.format {
            config.tts_format = format;
        }
        if let Some(rate) = tts.sample_rate {
            config.tts_sample_rate = rate;
        }
        if let Some(speed) = tts.speed {
            config.tts_speed = speed;
        }
        if let Some(volume) = tts.volume {
            config.tts_volume = volume;
        }
        if let Some(model) = tts.clone_target_model {
            config.clone_target_model = model;
        }
    }

    if let Some(storage) = yaml.storage {
        if let Some(backend) = storage.backend {
            config.storage_backend = backend.parse::<StorageKind>()?;
        }
        if let Some(bucket) = storage.bucket {
            config.storage_bucket = bucket;
        }
        if let Some(endpoint) = storage.endpoint {
            config.storage_endpoint = Some(endpoint);
        }
        if let Some(region) = storage.region {
            config.storage_region = region;
        }
        if let Some(id) = storage.access_key_id {
            config.storage_access_key_id = Some(Zeroizing::new(id));
        }
        if let Some(secret) = storage.access_key_secret {
            config.storage_access_key_secret = Some(Zeroizing::new(secret));
        }
        if let Some(virtual_hosted) = storage.virtual_hosted {
            config.storage_virtual_hosted = virtual_hosted;
        }
        if let Some(ttl) = storage.signed_url_ttl_seconds {
            config.signed_url_ttl_seconds = ttl;
        }
    }

    if let Some(chat) = yaml.chat {
        if let Some(url) = chat.api_url {
            config.chat_api_url = Some(url);
        }
        if let Some(key) = chat.api_key {
            config.chat_api_key = Some(Zeroizing::new(key));
        }
        if let Some(code) = chat.app_code {
            config.chat_app_code = Some(code);
        }
    }

    if let Some(speech) = yaml.speech {
        if let Some(key) = speech.api_key {
            config.speech_api_key = Some(Zeroizing::new(key));
        }
        if let Some(url) = speech.api_url {
            config.speech_api_url = url;
        }
        if let Some(language) = speech.language {
            config.speech_language = language;
        }
    }

    if let Some(files) = yaml.files {
        if let Some(path) = files.voice_db_path {
            config.voice_db_path = PathBuf::from(path);
        }
        if let Some(dir) = files.audio_cache_dir {
            config.audio_cache_dir = PathBuf::from(dir);
        }
    }

    if let Some(session) = yaml.session {
        if let Some(max) = session.max_sessions {
            config.session_max_sessions = max;
        }
        if let Some(ttl) = session.idle_ttl_seconds {
            config.session_idle_ttl_seconds = Some(ttl);
        }
        if let Some(history) = session.max_history {
            config.session_max_history = Some(history);
        }
    }

    Ok(config)
}
