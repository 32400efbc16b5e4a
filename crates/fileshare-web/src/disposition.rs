//! `Content-Disposition` construction for proxied downloads.
//!
//! Browsers disagree on non-ASCII filename handling, and HTTP headers
//! are limited to ISO-8859-1, so the header carries two
//! representations: a plain ASCII fallback in `filename=` and the exact
//! original name, percent-encoded as UTF-8, in `filename*=` (RFC 6266 /
//! RFC 5987). If the composed value would not survive the header
//! character set, only the ASCII form is emitted.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Placeholder used when sanitizing strips the entire name.
const FALLBACK_NAME: &str = "file";

/// Characters that may appear unescaped in an RFC 5987 `value-chars`
/// production: ALPHA / DIGIT / `!#$&+-.^_`|~`. Everything else is
/// percent-encoded.
const RFC5987_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Build the `Content-Disposition` value for an attachment with the
/// given display name.
pub fn attachment_header(display_name: &str) -> String {
    let fallback = ascii_fallback(display_name);

    if display_name == fallback {
        // Pure-ASCII name that survived sanitization intact; one
        // representation is enough.
        return format!("attachment; filename=\"{fallback}\"");
    }

    let encoded = utf8_percent_encode(display_name, RFC5987_ESCAPE).to_string();
    let composed = format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}");

    if is_header_safe(&composed) {
        composed
    } else {
        format!("attachment; filename=\"{fallback}\"")
    }
}

/// ASCII-only form of the name: non-ASCII, control, and quote-breaking
/// characters are dropped; an emptied result becomes the placeholder.
pub fn ascii_fallback(display_name: &str) -> String {
    let cleaned: String = display_name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();

    if cleaned.trim().is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Whether every character of the composed value fits the HTTP header
/// character set (ISO-8859-1) without being a control character.
fn is_header_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| (c as u32) <= 0xFF && !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_name_single_form() {
        assert_eq!(
            attachment_header("report.pdf"),
            "attachment; filename=\"report.pdf\""
        );
    }

    #[test]
    fn test_unicode_name_dual_form() {
        let header = attachment_header("отчёт.pdf");
        assert_eq!(
            header,
            "attachment; filename=\".pdf\"; \
             filename*=UTF-8''%D0%BE%D1%82%D1%87%D1%91%D1%82.pdf"
        );
        assert!(header.is_ascii());
    }

    #[test]
    fn test_fully_stripped_name_uses_placeholder() {
        let header = attachment_header("データ");
        assert!(header.starts_with("attachment; filename=\"file\";"));
        assert!(header.contains("filename*=UTF-8''"));
    }

    #[test]
    fn test_quote_breakers_are_dropped_from_fallback() {
        let header = attachment_header("a\"b\\c.txt");
        assert!(header.starts_with("attachment; filename=\"abc.txt\";"));
    }

    #[test]
    fn test_spaces_are_encoded_in_extended_form() {
        let header = attachment_header("годовой отчет.txt");
        assert!(header.contains("%20"));
        assert!(!header.contains("filename*=UTF-8''годовой"));
    }

    #[test]
    fn test_attr_chars_pass_unescaped() {
        let header = attachment_header("Ω-v1.2_final~.tar.gz");
        assert!(header.contains("filename*=UTF-8''%CE%A9-v1.2_final~.tar.gz"));
    }

    #[test]
    fn test_header_is_always_latin1_representable() {
        for name in ["мой файл.bin", "日本語.txt", "naïve plan.pdf", ""] {
            let header = attachment_header(name);
            assert!(header.chars().all(|c| (c as u32) <= 0xFF), "{header}");
        }
    }
}
