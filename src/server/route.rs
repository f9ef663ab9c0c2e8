/// Parsed request path and action.
///
/// Only the two translatable read paths are recognized; everything else,
/// including other methods on those paths, belongs to the upstream registry.
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET /v2/_catalog`, answered by the catalog aggregator.
    Catalog,
    /// `GET /v2/{owner}/{name}/tags/list`, answered by the tags translator.
    ListTags { owner: &'a str, name: &'a str },
    /// Reverse-proxied verbatim to the upstream registry.
    Upstream,
}
