use super::{
    COSYVOICE_WS_URL, DEFAULT_FORMAT, DEFAULT_MODEL, DEFAULT_SAMPLE_RATE, DEFAULT_SPEED,
    DEFAULT_VOLUME,
};

/// Connection settings and synthesis defaults for CosyVoice
#[derive(Debug, Clone, PartialEq)]
pub struct CosyVoiceConfig {
    pub api_key: String,
    pub ws_url: String,
    pub model: String,
    pub format: String,
    pub sample_rate: u32,
    pub speed: f32,
    pub volume: u32,
}

impl Default for CosyVoiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            ws_url: COSYVOICE_WS_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            speed: DEFAULT_SPEED,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl CosyVoiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Only connection settings are checked; speed and volume go to the
    /// provider as given.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("DashScope API key must not be empty".to_string());
        }
        if !(self.ws_url.starts_with("wss://") || self.ws_url.starts_with("ws://")) {
            return Err(format!(
                "WebSocket URL must use ws:// or wss://, got {}",
                self.ws_url
            ));
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        Ok(())
    }
}
