//! Download token and storage key generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

/// Bytes of randomness behind a download token (256 bits).
const TOKEN_BYTES: usize = 32;
/// Bytes of randomness behind a storage key stem (128 bits).
const STORAGE_KEY_BYTES: usize = 16;
/// Longest extension carried over onto a storage key.
const MAX_EXTENSION_LEN: usize = 16;

/// Generates download tokens and storage keys from cryptographically
/// secure randomness.
///
/// Constructed once and injected wherever identifiers are issued; holds
/// no state and never looks at request data beyond the uploaded name's
/// extension.
#[derive(Debug, Clone)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a URL-safe download token. Statistical uniqueness only;
    /// the database's UNIQUE constraint is the actual guarantee.
    pub fn issue_token(&self) -> String {
        Self::random_urlsafe(TOKEN_BYTES)
    }

    /// Generates a storage key: a random stem plus the uploaded name's
    /// sanitized extension. The stem of the original name is never used,
    /// so the key cannot echo user input or traverse paths.
    pub fn issue_storage_key(&self, display_name: &str) -> String {
        let stem = Self::random_urlsafe(STORAGE_KEY_BYTES);
        match sanitized_extension(display_name) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }

    fn random_urlsafe(len: usize) -> String {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a storage-safe extension from an uploaded filename: the part
/// after the last dot, lowercased, ASCII alphanumerics only, bounded
/// length. Anything else is dropped.
fn sanitized_extension(display_name: &str) -> Option<String> {
    let (stem, ext) = display_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_unique_and_urlsafe() {
        let generator = TokenGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let token = generator.issue_token();
            // 32 bytes, base64 no-pad
            assert_eq!(token.len(), 43);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
            assert!(seen.insert(token));
        }
    }

    #[test]
    fn test_storage_key_keeps_extension_only() {
        let generator = TokenGenerator::new();
        let key = generator.issue_storage_key("Годовой отчёт.PDF");
        assert!(key.ends_with(".pdf"));
        assert!(!key.contains("отчёт"));
    }

    #[test]
    fn test_storage_key_drops_suspicious_extensions() {
        let generator = TokenGenerator::new();
        assert!(!generator.issue_storage_key("noext").contains('.'));
        assert!(!generator.issue_storage_key("evil.t/ar").contains('.'));
        assert!(!generator.issue_storage_key("dots..").contains('.'));
        assert!(
            !generator
                .issue_storage_key("x.waytoolongextension123")
                .contains('.')
        );
    }

    #[test]
    fn test_hidden_file_has_no_extension() {
        // ".bashrc" has no stem, so nothing is treated as an extension.
        let generator = TokenGenerator::new();
        assert!(!generator.issue_storage_key(".bashrc").contains('.'));
    }
}
