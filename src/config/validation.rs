use super::DialogueConfig;

/// Longest validity a SigV4 presigned URL may carry (7 days)
const MAX_SIGNED_URL_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Validate the merged configuration
///
/// Credentials are not checked here; each client accessor on
/// [`DialogueConfig`] reports its own missing values.
pub(super) fn validate(config: &DialogueConfig) -> Result<(), String> {
    validate_storage(config)?;
    validate_sessions(config)?;
    Ok(())
}

fn validate_storage(config: &DialogueConfig) -> Result<(), String> {
    if config.storage_bucket.trim().is_empty() {
        return Err("storage bucket name must not be empty".to_string());
    }

    if config.signed_url_ttl_seconds == 0
        || config.signed_url_ttl_seconds > MAX_SIGNED_URL_TTL_SECONDS
    {
        return Err(format!(
            "signed_url_ttl_seconds must be between 1 and {MAX_SIGNED_URL_TTL_SECONDS}, got {}",
            config.signed_url_ttl_seconds
        ));
    }

    Ok(())
}

fn validate_sessions(config: &DialogueConfig) -> Result<(), String> {
    if config.session_max_sessions == 0 {
        return Err("session max_sessions must be greater than zero".to_string());
    }
    if config.session_max_history == Some(0) {
        return Err("session max_history must be greater than zero when set".to_string());
    }
    if config.session_idle_ttl_seconds == Some(0) {
        return Err("session idle_ttl_seconds must be greater than zero when set".to_string());
    }
    Ok(())
}
