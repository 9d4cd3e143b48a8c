//! File-name matching: plain, case-sensitive substring containment.

use std::ffi::OsStr;

use crate::Pattern;

/// True if `name` contains `pattern` anywhere. Compares raw bytes so names that are not
/// valid UTF-8 can still match. The empty pattern matches every name.
pub fn name_matches(name: &OsStr, pattern: &Pattern) -> bool {
    contains_bytes(name.as_encoded_bytes(), pattern.as_str().as_bytes())
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
