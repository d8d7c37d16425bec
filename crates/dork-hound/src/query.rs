use crate::config::SearchEngine;

// fixed page size of the search engines
pub const RESULTS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub site: String,
    pub page: usize,
    pub query_text: String,
    pub url: String,
}

impl SearchRequest {
    pub fn new(engine: SearchEngine, dork: &str, site: &str, page: usize) -> Self {
        let query_text = format!("{} site:{}", dork, site);
        let url = search_url(engine, &query_text, page);
        Self {
            site: site.to_string(),
            page,
            query_text,
            url,
        }
    }
}

pub fn search_url(engine: SearchEngine, query_text: &str, page: usize) -> String {
    format!(
        "{}?q={}&start={}",
        engine.base_url(),
        urlencoding::encode(query_text),
        page * RESULTS_PER_PAGE
    )
}

/// Every (site, page) pair, site major. Nothing is built until iterated,
/// and the iterator can be cloned to walk the requests again.
pub fn expand<'a>(
    engine: SearchEngine,
    dork: &'a str,
    sites: &'a [String],
    pages: usize,
) -> impl Iterator<Item = SearchRequest> + Clone + 'a {
    sites.iter().flat_map(move |site| {
        (0..pages).map(move |page| SearchRequest::new(engine, dork, site, page))
    })
}
