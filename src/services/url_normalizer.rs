//! URL canonicalization for bookmark writes.
//!
//! Every URL that reaches the remote table goes through [`normalize`] first.

use url::Url;

use crate::types::errors::ValidationError;

/// Scheme prepended to input that does not already look like an http(s) URL.
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Turns user input into a canonical absolute URL.
///
/// Trims whitespace, prepends `https://` unless the input starts with `http`
/// (case-insensitive), parses it as an absolute URL, and lower-cases the host.
/// Scheme, path, query and fragment are kept as the parser produced them.
///
/// The prefix test is a plain `starts_with("http")`, not a scheme
/// allow-list: `ftp://x` becomes `https://ftp//x`, and `httpfoo` fails to parse.
///
/// # Errors
/// Returns [`ValidationError::InvalidUrl`] if the result is not an absolute URL.
pub fn normalize(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();

    let candidate = if has_http_prefix(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
    };

    let mut parsed = Url::parse(&candidate).map_err(|_| ValidationError::InvalidUrl)?;

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host {
            parsed
                .set_host(Some(&lowered))
                .map_err(|_| ValidationError::InvalidUrl)?;
        }
    }

    Ok(parsed.to_string())
}

/// Returns `true` if `input` normalizes successfully.
pub fn is_valid(input: &str) -> bool {
    normalize(input).is_ok()
}

fn has_http_prefix(s: &str) -> bool {
    s.get(..4)
        .map(|head| head.eq_ignore_ascii_case("http"))
        .unwrap_or(false)
}
