use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use zeroize::Zeroizing;

use super::{DialogueConfig, Secret, StorageKind};

/// Read a non-empty environment variable
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secret_var(name: &str) -> Option<Secret> {
    var(name).map(Zeroizing::new)
}

/// Parse an environment variable, reporting the variable name on failure
fn parse_var<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {name}: {raw:?} ({e})")),
        None => Ok(None),
    }
}

/// Accepts true/false, 1/0, yes/no, on/off
fn parse_bool_var(name: &str) -> Result<Option<bool>, String> {
    match var(name) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(format!("Invalid boolean for {name}: {raw:?}")),
        },
        None => Ok(None),
    }
}

/// Build a configuration from environment variables layered over defaults
pub(super) fn load_from_env() -> Result<DialogueConfig, String> {
    let mut config = DialogueConfig::default();

    // DashScope
    config.dashscope_api_key = secret_var("DASHSCOPE_API_KEY");
    if let Some(url) = var("DASHSCOPE_HTTP_URL") {
        config.dashscope_http_url = url;
    }
    if let Some(url) = var("DASHSCOPE_WS_URL") {
        config.dashscope_ws_url = url;
    }
    if let Some(model) = var("TTS_MODEL") {
        config.tts_model = model;
    }
    if let Some(format) = var("TTS_FORMAT") {
        config.tts_format = format;
    }
    if let Some(rate) = parse_var("TTS_SAMPLE_RATE")? {
        config.tts_sample_rate = rate;
    }
    if let Some(speed) = parse_var("TTS_SPEED")? {
        config.tts_speed = speed;
    }
    if let Some(volume) = parse_var("TTS_VOLUME")? {
        config.tts_volume = volume;
    }
    if let Some(model) = var("CLONE_TARGET_MODEL") {
        config.clone_target_model = model;
    }

    // Object storage
    if let Some(kind) = parse_var::<StorageKind>("STORAGE_BACKEND")? {
        config.storage_backend = kind;
    }
    if let Some(bucket) = var("OSS_BUCKET") {
        config.storage_bucket = bucket;
    }
    if let Some(endpoint) = var("OSS_ENDPOINT") {
        config.storage_endpoint = Some(endpoint);
    }
    if let Some(region) = var("OSS_REGION") {
        config.storage_region = region;
    }
    config.storage_access_key_id = secret_var("OSS_ACCESS_KEY_ID");
    config.storage_access_key_secret = secret_var("OSS_ACCESS_KEY_SECRET");
    if let Some(virtual_hosted) = parse_bool_var("OSS_VIRTUAL_HOSTED")? {
        config.storage_virtual_hosted = virtual_hosted;
    }
    if let Some(ttl) = parse_var("SIGNED_URL_TTL_SECONDS")? {
        config.signed_url_ttl_seconds = ttl;
    }

    // Chat endpoint
    config.chat_api_url = var("LINK_AI_API_URL");
    config.chat_api_key = secret_var("LINK_AI_API_KEY");
    config.chat_app_code = var("LINK_AI_APP_CODE");

    // Speech recognition
    config.speech_api_key = secret_var("SPEECH_API_KEY");
    if let Some(url) = var("SPEECH_API_URL") {
        config.speech_api_url = url;
    }
    if let Some(language) = var("SPEECH_LANGUAGE") {
        config.speech_language = language;
    }

    // Local files
    if let Some(path) = var("VOICE_DB_PATH") {
        config.voice_db_path = PathBuf::from(path);
    }
    if let Some(dir) = var("AUDIO_CACHE_DIR") {
        config.audio_cache_dir = PathBuf::from(dir);
    }

    // Session store
    if let Some(max) = parse_var("SESSION_MAX_SESSIONS")? {
        config.session_max_sessions = max;
    }
    config.session_idle_ttl_seconds = parse_var("SESSION_IDLE_TTL_SECONDS")?;
    config.session_max_history = parse_var("SESSION_MAX_HISTORY")?;

    Ok(config)
}
