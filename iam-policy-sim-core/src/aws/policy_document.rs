//! Policy document decoding.
//!
//! Documents returned by `GetRolePolicy` and `GetPolicyVersion` are URL-encoded
//! (<https://docs.aws.amazon.com/IAM/latest/APIReference/API_GetRolePolicy.html>).
//! Decoding follows query-component rules: `%XX` escapes and `+` for space.
//! A malformed escape is an error rather than being passed through.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

use crate::error::{PolicySimError, PolicySimResult};

/// Decode a URL-encoded policy document. `source_name` identifies the document
/// in a [`PolicySimError::DecodeDocument`] failure.
pub fn unescape_policy_document(document: &str, source_name: &str) -> PolicySimResult<String> {
    let failure = |message: String| PolicySimError::DecodeDocument {
        source_name: source_name.to_string(),
        message,
    };

    let bytes = document.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).unwrap_or(&bytes[i + 1..]);
            if escape.len() != 2 || !escape.iter().all(u8::is_ascii_hexdigit) {
                let end = (i + 3).min(bytes.len());
                return Err(failure(format!(
                    "invalid URL escape {:?} at offset {i}",
                    String::from_utf8_lossy(&bytes[i..end])
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let with_spaces: Cow<'_, str> = if document.contains('+') {
        Cow::Owned(document.replace('+', " "))
    } else {
        Cow::Borrowed(document)
    };

    percent_decode_str(&with_spaces)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| failure(format!("decoded document is not valid UTF-8: {e}")))
}
