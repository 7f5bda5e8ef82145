use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkwalk::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs live on the same site
///
/// Two URLs share a site when their hosts match case-insensitively and their
/// effective ports (explicit or scheme default) are equal.
///
/// ```
/// use url::Url;
/// use linkwalk::url::same_site;
///
/// let start = Url::parse("https://site.test/").unwrap();
/// assert!(same_site(&start, &Url::parse("https://SITE.test:443/about").unwrap()));
/// assert!(!same_site(&start, &Url::parse("https://other.test/").unwrap()));
/// ```
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(host_a), Some(host_b)) => {
            host_a == host_b && a.port_or_known_default() == b.port_or_known_default()
        }
        _ => false,
    }
}
