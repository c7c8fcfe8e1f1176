//! Joining request URLs with the client's base URL.

use url::Url;

use crate::error::ClientError;

/// True for `scheme://...` and protocol-relative `//...` URLs.
pub fn is_absolute(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Join `relative` onto `base` with exactly one `/` between them.
pub fn combine(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Resolve `url` against `base` and append `params` as a percent-encoded
/// query string.
pub fn resolve(base: &str, url: &str, params: &[(String, String)]) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let mut resolved = if url.starts_with("//") {
        let base = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        base.join(url).map_err(|e| invalid(e.to_string()))?
    } else if is_absolute(url) {
        Url::parse(url).map_err(|e| invalid(e.to_string()))?
    } else if base.is_empty() {
        return Err(invalid("relative url with no base url configured".to_string()));
    } else {
        Url::parse(&combine(base, url)).map_err(|e| invalid(e.to_string()))?
    };

    if !params.is_empty() {
        let mut pairs = resolved.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(resolved)
}
