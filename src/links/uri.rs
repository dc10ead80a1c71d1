// src/links/uri.rs
// =============================================================================
// This module turns an href into an absolute-looking URI.
//
// Only three shapes of href are understood:
// - already absolute:  "https://other.example/y"  -> kept as is
// - root-relative:     "/x"       -> scheme and host of the base + "/x"
// - path-relative:     "c.html"   -> directory of the base + "c.html"
//
// No "../" handling, no query or fragment logic: "../up.html" is glued on
// as written.
// =============================================================================

// Prefixes that mark an href as absolute (case-sensitive)
const ABSOLUTE_PREFIXES: [&str; 2] = ["http://", "https://"];

// Separator between the scheme and the host
const SCHEME_DELIMITER: &str = "://";

// Resolves an href against an optional base URI
//
// Parameters:
//   href: the href attribute value
//   base: the URI of the page the href was found on, if known
//
// Returns: Some(uri), or None when a path-relative href meets a base
//          without any '/', or a root-relative href meets a base whose
//          host has no '/' after it
//
// Examples:
//   base = "http://host.example/a/b.html"
//   href = "/x"                      -> "http://host.example/x"
//   href = "c.html"                  -> "http://host.example/a/c.html"
//   href = "https://other.example/y" -> "https://other.example/y"
//   base = None, href = "c.html"     -> "c.html"
pub fn resolve_uri(href: &str, base: Option<&str>) -> Option<String> {
    let Some(base) = base else {
        return Some(href.to_string());
    };

    if ABSOLUTE_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
        return Some(href.to_string());
    }

    if href.starts_with('/') {
        return site_root(base).map(|root| format!("{}{}", root, href));
    }

    directory_of(base).map(|directory| format!("{}{}", directory, href))
}

// The scheme and host part of a base URI
//
// Everything before the first '/' that follows "://". Without "://" that
// is the whole base. With "://" but no '/' after the host there is no root.
//
//   "http://host.example/a/b" -> Some("http://host.example")
//   "host.example/a"          -> Some("host.example/a")
//   "http://host.example"     -> None
pub fn site_root(base: &str) -> Option<&str> {
    match base.find(SCHEME_DELIMITER) {
        Some(delimiter) => {
            let host_start = delimiter + SCHEME_DELIMITER.len();
            base[host_start..]
                .find('/')
                .map(|slash| &base[..host_start + slash])
        }
        None => Some(base),
    }
}

// The base up to and including its last '/'
//
//   "http://host.example/a/b.html" -> Some("http://host.example/a/")
//   "b.html"                       -> None
pub fn directory_of(base: &str) -> Option<&str> {
    base.rfind('/').map(|slash| &base[..=slash])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_relative_uses_scheme_and_host() {
        let uri = resolve_uri("/x", Some("http://host.example/a/b"));
        assert_eq!(uri, Some("http://host.example/x".to_string()));
    }

    #[test]
    fn test_path_relative_uses_directory() {
        let uri = resolve_uri("c.html", Some("http://host.example/a/b.html"));
        assert_eq!(uri, Some("http://host.example/a/c.html".to_string()));
    }

    #[test]
    fn test_absolute_passes_through() {
        let href = "https://other.example/y";
        assert_eq!(resolve_uri(href, Some("http://host.example/a/b")), Some(href.to_string()));
        assert_eq!(resolve_uri("http://plain.example", Some("base")), Some("http://plain.example".to_string()));
    }

    #[test]
    fn test_absolute_prefix_is_case_sensitive() {
        let uri = resolve_uri("HTTP://loud.example/", Some("http://host.example/a/"));
        assert_eq!(uri, Some("http://host.example/a/HTTP://loud.example/".to_string()));
    }

    #[test]
    fn test_no_base_is_verbatim() {
        assert_eq!(resolve_uri("c.html", None), Some("c.html".to_string()));
        assert_eq!(resolve_uri("/x", None), Some("/x".to_string()));
    }

    #[test]
    fn test_root_relative_against_bare_host_fails() {
        assert_eq!(resolve_uri("/x", Some("http://host.example")), None);
        assert_eq!(resolve_uri("/x", Some("http://host.example/")), Some("http://host.example/x".to_string()));
    }

    #[test]
    fn test_root_relative_without_scheme_uses_whole_base() {
        let uri = resolve_uri("/x", Some("host.example/a"));
        assert_eq!(uri, Some("host.example/a/x".to_string()));
    }

    #[test]
    fn test_path_relative_without_slash_fails() {
        assert_eq!(resolve_uri("c.html", Some("index.html")), None);
    }

    #[test]
    fn test_path_relative_keeps_dot_segments() {
        let uri = resolve_uri("../up.html", Some("https://host.example/a/b/"));
        assert_eq!(uri, Some("https://host.example/a/b/../up.html".to_string()));
    }

    #[test]
    fn test_site_root_and_directory() {
        assert_eq!(site_root("https://host.example:8080/a/b"), Some("https://host.example:8080"));
        assert_eq!(site_root("https://host.example"), None);
        assert_eq!(directory_of("https://host.example/a/b"), Some("https://host.example/a/"));
        assert_eq!(directory_of("nothing"), None);
    }
}
