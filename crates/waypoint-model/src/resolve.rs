//! URL resolution against an origin and base path

use url::Url;

use crate::error::ModelError;
use crate::Result;

/// Resolve caller input into an absolute URL.
///
/// Absolute inputs pass through untouched. Root-relative inputs (`/foo`)
/// resolve against the origin alone; other relative inputs resolve under
/// `base` first, so `resolve_url(origin, "/app/", "foo")` lands on
/// `/app/foo`.
pub fn resolve_url(origin: &Url, base: &str, input: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(input) {
        return Ok(url);
    }

    if input.starts_with('/') {
        return origin
            .join(input)
            .map_err(|err| ModelError::InvalidUrl(format!("{input}: {err}")));
    }

    let base = normalize_base(base);
    let under_base = origin
        .join(&base)
        .map_err(|err| ModelError::InvalidUrl(format!("{base}: {err}")))?;
    under_base
        .join(input)
        .map_err(|err| ModelError::InvalidUrl(format!("{input}: {err}")))
}

/// A base usable with `Url::join`: leading and trailing slash.
fn normalize_base(base: &str) -> String {
    let mut base = base.to_string();
    if !base.starts_with('/') {
        base.insert(0, '/');
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_absolute_input_passes_through() {
        let url = resolve_url(&origin(), "/", "https://other.example/x?q=1").unwrap();
        assert_eq!(url.as_str(), "https://other.example/x?q=1");
    }

    #[test]
    fn test_root_relative_ignores_base() {
        let url = resolve_url(&origin(), "/app/", "/foo/2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/foo/2");
    }

    #[test]
    fn test_relative_resolves_under_base() {
        let url = resolve_url(&origin(), "/app/", "foo/2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/foo/2");

        let url = resolve_url(&origin(), "app", "foo").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/foo");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(resolve_url(&origin(), "/", "https://").is_err());
    }
}
