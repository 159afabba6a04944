//! URL helpers shared by the extractors and the orchestrators.

use reqwest::Url;

/// Prepends `https://` to a homepage URL that carries no `http`/`https` scheme.
///
/// `"example.com"` becomes `"https://example.com"`; `"http://example.com"`
/// is returned unchanged (apart from surrounding whitespace).
#[must_use]
pub fn normalize_homepage_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}

/// Returns `true` when both URLs share scheme, host and port. A default
/// port matches its explicit form (`https://x` and `https://x:443`).
#[must_use]
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.port_or_known_default() == b.port_or_known_default()
        && a.host_str()
            .zip(b.host_str())
            .is_some_and(|(ha, hb)| ha.eq_ignore_ascii_case(hb))
}

/// Resolves an `href` against `base`, returning only `http`/`https` results.
///
/// Empty, fragment-only, `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// resolve to `None`. The fragment of the resolved URL is dropped.
pub(crate) fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(crate) fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn normalize_prepends_https_to_bare_domain() {
        assert_eq!(normalize_homepage_url("example.com"), "https://example.com");
        assert_eq!(
            normalize_homepage_url("  shop.example.com/en "),
            "https://shop.example.com/en"
        );
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        assert_eq!(
            normalize_homepage_url("http://example.com"),
            "http://example.com"
        );
        assert_eq!(
            normalize_homepage_url("HTTPS://Example.com"),
            "HTTPS://Example.com"
        );
    }

    #[test]
    fn same_origin_compares_ports() {
        let home = url("https://example.com/");
        assert!(is_same_origin(&home, &url("https://example.com:443/men")));
        assert!(!is_same_origin(&home, &url("https://example.com:8443/men")));
        assert!(!is_same_origin(
            &url("http://127.0.0.1:3000/"),
            &url("http://127.0.0.1:3001/shop")
        ));
    }

    #[test]
    fn same_origin_requires_scheme_and_host() {
        let home = url("https://example.com/");
        assert!(is_same_origin(&home, &url("https://example.com/men")));
        assert!(is_same_origin(&home, &url("https://EXAMPLE.com/sale?x=1")));
        assert!(!is_same_origin(&home, &url("http://example.com/men")));
        assert!(!is_same_origin(&home, &url("https://cdn.example.com/men")));
        assert!(!is_same_origin(&home, &url("https://other.com/shop")));
    }

    #[test]
    fn resolve_href_handles_relative_and_absolute() {
        let base = url("https://example.com/collections/all");
        assert_eq!(
            resolve_href(&base, "/p/1").unwrap().as_str(),
            "https://example.com/p/1"
        );
        assert_eq!(
            resolve_href(&base, "shirts?page=2").unwrap().as_str(),
            "https://example.com/collections/shirts?page=2"
        );
        assert_eq!(
            resolve_href(&base, "https://other.com/x#top").unwrap().as_str(),
            "https://other.com/x"
        );
    }

    #[test]
    fn resolve_href_rejects_non_navigational_links() {
        let base = url("https://example.com/");
        for href in ["", "   ", "#main", "javascript:void(0)", "mailto:a@b.c", "tel:123", "data:text/html,x"] {
            assert!(resolve_href(&base, href).is_none(), "href {href:?}");
        }
    }

    #[test]
    fn extract_domain_strips_scheme_and_path() {
        assert_eq!(extract_domain("https://shop.example.com/men"), "shop.example.com");
        assert_eq!(extract_domain("not a url"), "not a url");
    }
}
