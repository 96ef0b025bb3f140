//! Object key and voice prefix derivation

use time::OffsetDateTime;

/// Longest prefix the enrollment service accepts
const MAX_PREFIX_LEN: usize = 9;

/// Prefix used when a name has no ASCII alphanumeric characters
const FALLBACK_PREFIX: &str = "voice";

/// Current Unix time in whole seconds
pub fn unix_timestamp() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Derive an enrollment prefix from a display name.
///
/// Keeps ASCII letters and digits only, lowercased, truncated to nine
/// characters. Other characters are dropped, not replaced.
pub fn voice_prefix(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_PREFIX_LEN)
        .collect();

    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        prefix
    }
}

/// `voice_samples/<ts>_<name>.wav`, with the name lowercased and spaces as `_`
pub fn sample_object_name(name: &str, timestamp: i64) -> String {
    let slug = name.to_lowercase().replace(' ', "_");
    format!("voice_samples/{timestamp}_{slug}.wav")
}

/// `responses/<session_id>/<ts>.mp3`
pub fn response_object_name(session_id: &str, timestamp: i64) -> String {
    format!("responses/{session_id}/{timestamp}.mp3")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_prefix_drops_non_alphanumeric() {
        assert_eq!(voice_prefix("My Voice!"), "myvoice");
        assert_eq!(voice_prefix("a-b_c.d"), "abcd");
    }

    #[test]
    fn test_voice_prefix_truncates() {
        assert_eq!(voice_prefix("Extraordinary Narrator"), "extraordi");
        assert_eq!(voice_prefix("Extraordinary Narrator").len(), 9);
    }

    #[test]
    fn test_voice_prefix_fallback() {
        assert_eq!(voice_prefix(""), "voice");
        assert_eq!(voice_prefix("小明"), "voice");
        assert_eq!(voice_prefix("小明2"), "2");
    }

    #[test]
    fn test_sample_object_name() {
        assert_eq!(
            sample_object_name("Grandma Rose", 1700000000),
            "voice_samples/1700000000_grandma_rose.wav"
        );
    }

    #[test]
    fn test_response_object_name() {
        assert_eq!(
            response_object_name("s1", 1700000000),
            "responses/s1/1700000000.mp3"
        );
    }

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2023-11-14
        assert!(unix_timestamp() > 1_700_000_000);
    }
}
