use lazy_regex::regex;

/// Absolute links found in `<a href="...">` tags, in document order.
/// Relative, `mailto:` or `javascript:` targets are skipped and duplicates are kept.
pub fn extract_links(html: &str) -> Vec<String> {
    let anchor_regex = regex!(r#"<a\s+href="([^"]+)""#);

    anchor_regex
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|href| href.as_str())
        .filter(|href| href.starts_with("http"))
        .map(|href| href.to_string())
        .collect()
}
