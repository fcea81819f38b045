use url::Url;

/// List of tracking query parameters removed from canonical keys
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Computes the canonical visited-set key for a URL
///
/// Two URLs with the same key address the same document for crawl purposes.
/// Scheme, host and port are kept as-is, since they define the origin.
///
/// # Normalization Steps
///
/// 1. Drop the fragment
/// 2. Collapse repeated slashes and drop the trailing slash (except for root `/`)
/// 3. Remove tracking query parameters and sort the rest by key
/// 4. Drop an empty query string
///
/// # Examples
///
/// ```
/// use address_scout::url::canonical_url;
/// use url::Url;
///
/// let url = Url::parse("http://Example.com/contact/?utm_source=x#map").unwrap();
/// assert_eq!(canonical_url(&url), "http://example.com/contact");
/// ```
pub fn canonical_url(url: &Url) -> String {
    let mut url = url.clone();

    url.set_fragment(None);

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            let query_string = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query_string));
        }
    }

    url.to_string()
}

/// Collapses empty segments and removes the trailing slash
///
/// Dot segments are already resolved by the `url` parser.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> String {
        canonical_url(&Url::parse(s).unwrap())
    }

    #[test]
    fn test_keeps_scheme_and_www() {
        assert_eq!(key("http://www.example.com/"), "http://www.example.com/");
    }

    #[test]
    fn test_remove_fragment_and_trailing_slash() {
        assert_eq!(key("http://example.com/page/#top"), "http://example.com/page");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        assert_eq!(key("http://example.com"), "http://example.com/");
    }

    #[test]
    fn test_dot_segments_and_repeated_slashes() {
        assert_eq!(
            key("http://example.com//a/../b///c/"),
            "http://example.com/b/c"
        );
    }

    #[test]
    fn test_tracking_params_removed_and_sorted() {
        assert_eq!(
            key("http://example.com/p?b=2&utm_medium=email&a=1&fbclid=x"),
            "http://example.com/p?a=1&b=2"
        );
        assert_eq!(key("http://example.com/p?utm_custom=v"), "http://example.com/p");
    }

    #[test]
    fn test_equivalent_hrefs_share_key() {
        assert_eq!(
            key("http://example.com/contact"),
            key("http://EXAMPLE.com:80/contact/#form")
        );
    }
}
