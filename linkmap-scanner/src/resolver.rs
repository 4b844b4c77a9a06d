use url::Url;

/// Resolve a raw `href`/`src` value against the page it was found on.
///
/// Joining follows RFC 3986 via [`Url::join`], so `.`/`..` segments are
/// collapsed and scheme-relative, absolute-path, query-only and
/// fragment-only references all work. Nothing else is canonicalised:
/// trailing slashes, query order and fragments are left as written.
///
/// A relative path replaces the last segment of the base, so
/// `../c` against `https://site/a/b` gives `https://site/c`. Give the base a
/// trailing slash (`https://site/a/b/`) to resolve inside `b`.
///
/// Never fails. If the base or the join cannot be parsed the trimmed
/// reference is returned verbatim.
pub fn resolve(base: &str, reference: &str) -> String {
    let reference = reference.trim();

    match Url::parse(base) {
        Ok(base_url) => match base_url.join(reference) {
            Ok(joined) => joined.to_string(),
            Err(_) => reference.to_string(),
        },
        Err(_) => reference.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_segment() {
        assert_eq!(resolve("https://site/a/b/", "../c"), "https://site/a/c");
        assert_eq!(resolve("https://site/a/b", "../c"), "https://site/c");
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(resolve("https://site/a/b", "/x"), "https://site/x");
    }

    #[test]
    fn test_absolute_url_replaces_base() {
        assert_eq!(resolve("https://site/a/b", "https://other/y"), "https://other/y");
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(resolve("https://site/a", "//cdn.site/lib.js"), "https://cdn.site/lib.js");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(resolve("https://site/a/b", "c"), "https://site/a/c");
        assert_eq!(resolve("https://site/a/b", "./c/d"), "https://site/a/c/d");
    }

    #[test]
    fn test_query_only() {
        assert_eq!(resolve("https://site/a/b?x=1", "?y=2"), "https://site/a/b?y=2");
    }

    #[test]
    fn test_fragment_only_is_kept() {
        assert_eq!(resolve("https://site/a", "#top"), "https://site/a#top");
    }

    #[test]
    fn test_trailing_slash_not_merged() {
        assert_ne!(resolve("http://x/", "/a"), resolve("http://x/", "/a/"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(resolve("https://site/", "  /p \n"), "https://site/p");
    }

    #[test]
    fn test_unparseable_base_falls_back_to_reference() {
        assert_eq!(resolve("not a url", "/p"), "/p");
    }

    #[test]
    fn test_unparseable_reference_falls_back() {
        assert_eq!(resolve("https://site/", "http://[::1"), "http://[::1");
    }

    #[test]
    fn test_non_http_schemes_resolve_verbatim() {
        assert_eq!(resolve("https://site/", "mailto:a@b.c"), "mailto:a@b.c");
    }
}
