//! Topic name derivation for data sources.
//!
//! Every data source publishes under its own topic:
//!
//! ```text
//! <base topic><sha256(source id) as 64 lowercase hex chars>/<sanitized source id>
//! ```
//!
//! The digest keeps topics unique even when several sources share a similar
//! display name, the sanitized segment keeps them readable. Sanitizing is
//! entirely driven by caller-supplied replacement rules; characters that are
//! invalid in a topic pass through untouched when no rule covers them.

use heapless::String;
use sha2::{Digest, Sha256};

use crate::error::ConfigError;

/// Maximum length for a derived topic string.
pub const MAX_TOPIC_LEN: usize = 256;

/// Length of the hex-encoded SHA-256 digest embedded in every topic.
pub const DIGEST_HEX_LEN: usize = 64;

/// A literal, case-insensitive replacement applied to the source id before it
/// is embedded in a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringReplacement<'a> {
    pub old: &'a str,
    pub new: &'a str,
}

impl<'a> StringReplacement<'a> {
    pub const fn new(old: &'a str, new: &'a str) -> Self {
        Self { old, new }
    }
}

/// Derives the topic a source publishes under.
///
/// The result is deterministic for the same inputs. Fails if a replacement has
/// an empty search value or the topic does not fit into [`MAX_TOPIC_LEN`].
pub fn derive_topic(
    base_topic: &str,
    source_id: &str,
    replacements: &[StringReplacement<'_>],
) -> Result<String<MAX_TOPIC_LEN>, ConfigError> {
    let digest = source_digest(source_id)?;
    let segment = sanitize(source_id, replacements)?;

    let mut topic = String::new();
    for part in [base_topic, digest.as_str(), "/", segment.as_str()] {
        topic
            .push_str(part)
            .map_err(|_| ConfigError::TopicTooLong)?;
    }
    Ok(topic)
}

/// Returns the SHA-256 digest of the UTF-8 source id as lowercase hex.
pub fn source_digest(source_id: &str) -> Result<String<DIGEST_HEX_LEN>, ConfigError> {
    let hash = Sha256::digest(source_id.as_bytes());
    let mut buf = [0u8; DIGEST_HEX_LEN];
    hex::encode_to_slice(hash, &mut buf).map_err(|_| ConfigError::TopicTooLong)?;

    let encoded = core::str::from_utf8(&buf).map_err(|_| ConfigError::TopicTooLong)?;
    let mut digest = String::new();
    digest
        .push_str(encoded)
        .map_err(|_| ConfigError::TopicTooLong)?;
    Ok(digest)
}

/// Applies `replacements` to `source_id` in order.
///
/// Each rule replaces every occurrence of its search value, matched
/// case-insensitively, with the literal replacement. Later rules operate on
/// the output of earlier ones.
pub fn sanitize(
    source_id: &str,
    replacements: &[StringReplacement<'_>],
) -> Result<String<MAX_TOPIC_LEN>, ConfigError> {
    let mut current: String<MAX_TOPIC_LEN> = String::new();
    current
        .push_str(source_id)
        .map_err(|_| ConfigError::TopicTooLong)?;

    for replacement in replacements {
        if replacement.old.is_empty() {
            return Err(ConfigError::EmptyReplacement);
        }
        current = replace_ignore_case(&current, replacement.old, replacement.new)?;
    }
    Ok(current)
}

fn replace_ignore_case<const N: usize>(
    input: &str,
    old: &str,
    new: &str,
) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        match match_ignore_case(rest, old) {
            Some(matched) => {
                out.push_str(new).map_err(|_| ConfigError::TopicTooLong)?;
                rest = &rest[matched..];
            }
            None => {
                out.push(c).map_err(|_| ConfigError::TopicTooLong)?;
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Ok(out)
}

/// If `haystack` starts with `needle` (ignoring case), returns the number of
/// bytes of `haystack` covered by the match.
fn match_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for n in needle.chars() {
        let (_, h) = hay.next()?;
        if !chars_eq_ignore_case(h, n) {
            return None;
        }
    }
    Some(hay.next().map_or(haystack.len(), |(i, _)| i))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENSOR_1_DIGEST: &str =
        "75fcce4506e2b49c935ad64e43250abe43de607c55200dc94f52c7bf2e180e4d";

    #[test]
    fn topic_without_replacements() {
        let topic = derive_topic("telemetry/", "sensor-1", &[]).unwrap();
        assert_eq!(topic.as_str(), "telemetry/".to_owned() + SENSOR_1_DIGEST + "/sensor-1");
    }

    #[test]
    fn topic_is_deterministic() {
        let rules = [StringReplacement::new("/", "-")];
        let a = derive_topic("base/", "Device/A", &rules).unwrap();
        let b = derive_topic("base/", "Device/A", &rules).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn topic_shape() {
        let topic = derive_topic("plant/line-7/", "Pump #3", &[]).unwrap();
        let rest = topic.strip_prefix("plant/line-7/").unwrap();
        let (digest, segment) = rest.split_at(DIGEST_HEX_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(segment, "/Pump #3");
    }

    #[test]
    fn digest_of_empty_source() {
        assert_eq!(
            source_digest("").unwrap().as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_is_fixed_width_lowercase() {
        for source in ["a", "sensor-1", "Pump #3", "ÄPFEL"] {
            let digest = source_digest(source).unwrap();
            assert_eq!(digest.len(), DIGEST_HEX_LEN);
            assert!(digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        }
        assert_eq!(
            source_digest("sensor-1").unwrap().as_str(),
            SENSOR_1_DIGEST
        );
    }

    #[test]
    fn slash_replaced_in_segment_only() {
        let topic = derive_topic("t/", "Device/A", &[StringReplacement::new("/", "-")]).unwrap();
        assert!(topic.ends_with("/Device-A"));
        // digest is computed from the original id
        assert!(topic.contains("03714e632bb56c6b1101e596a7d16bcd7fc0e7a0189f9cc465c1ebfcbed4754d"));
    }

    #[test]
    fn replacements_ignore_case() {
        let out = sanitize("Sensor-SENSOR-sensor", &[StringReplacement::new("sensor", "s")]).unwrap();
        assert_eq!(out.as_str(), "s-s-s");
    }

    #[test]
    fn replacements_apply_in_order() {
        let rules = [
            StringReplacement::new("#", "+"),
            StringReplacement::new("+", "_"),
        ];
        assert_eq!(sanitize("a#b+c", &rules).unwrap().as_str(), "a_b_c");

        let reversed = [rules[1], rules[0]];
        assert_eq!(sanitize("a#b+c", &reversed).unwrap().as_str(), "a+b_c");
    }

    #[test]
    fn replacement_output_is_not_rescanned() {
        let out = sanitize("aa", &[StringReplacement::new("a", "aa")]).unwrap();
        assert_eq!(out.as_str(), "aaaa");
    }

    #[test]
    fn non_ascii_case_folding() {
        let out = sanitize("ÄPFEL/äpfel", &[StringReplacement::new("äpfel", "x")]).unwrap();
        assert_eq!(out.as_str(), "x/x");
    }

    #[test]
    fn wildcards_pass_through_without_rules() {
        let out = sanitize("room/+/#", &[]).unwrap();
        assert_eq!(out.as_str(), "room/+/#");
    }

    #[test]
    fn empty_search_value_rejected() {
        assert_eq!(
            sanitize("abc", &[StringReplacement::new("", "x")]),
            Err(ConfigError::EmptyReplacement)
        );
    }

    #[test]
    fn oversized_topic_rejected() {
        let long_base = "b".repeat(MAX_TOPIC_LEN);
        assert_eq!(
            derive_topic(&long_base, "sensor-1", &[]),
            Err(ConfigError::TopicTooLong)
        );
    }
}
