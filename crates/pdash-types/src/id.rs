//! Opaque identifier generation.
//!
//! IDs are a sanitized readable prefix followed by a random base-36
//! fragment and the current time in base 36. There is no central registry:
//! uniqueness within one process rests on the random fragment plus the
//! millisecond clock. Collisions are not detected.

use rand::Rng;

/// Maximum number of characters kept from a readable prefix.
pub const MAX_PREFIX_LEN: usize = 24;

/// Length of the random base-36 fragment.
pub const RANDOM_FRAGMENT_LEN: usize = 9;

/// Prefix of the IDs handed to the staging group during a reorder.
pub const TEMP_GROUP_PREFIX: &str = "temp-";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new identifier, optionally seeded with a readable prefix.
///
/// Non-word characters are stripped from the prefix, it is lowercased and
/// truncated to [`MAX_PREFIX_LEN`] characters.
pub fn generate_id(prefix: Option<&str>) -> String {
    let mut id = prefix.map(sanitize_prefix).unwrap_or_default();
    id.push_str(&random_fragment());
    id.push_str(&to_base36(now_millis()));
    id
}

/// Temporary ID for a staging group, stable for the rest of the session
/// once assigned.
pub fn temp_group_id(now_ms: u64) -> String {
    format!("{TEMP_GROUP_PREFIX}{now_ms}")
}

fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_PREFIX_LEN)
        .collect()
}

fn random_fragment() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_FRAGMENT_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

pub(crate) fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
