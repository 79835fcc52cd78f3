//! Host name checks shared by policy loading and answer synthesis.

use crate::DomainError;
use std::sync::Arc;

pub const MAX_NAME_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;

/// Fully qualified form of `name`, or `None` if it cannot go on the wire.
///
/// Labels are 1..=63 bytes of ASCII letters, digits, `-` or `_`; the whole
/// name (without the trailing dot) is at most 253 bytes.
pub fn qualify(name: &str) -> Option<Arc<str>> {
    let trimmed = name.trim();
    let bare = trimmed.strip_suffix('.').unwrap_or(trimmed);

    if bare.is_empty() || bare.len() > MAX_NAME_LEN {
        return None;
    }

    let labels_ok = bare.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    });

    labels_ok.then(|| Arc::from(format!("{}.", bare)))
}

/// Like [`qualify`], for names coming from configuration.
pub fn require_valid(name: &str, context: &str) -> Result<Arc<str>, DomainError> {
    qualify(name).ok_or_else(|| {
        DomainError::InvalidDomainName(format!("'{}' ({}) is not a valid host name", name, context))
    })
}
