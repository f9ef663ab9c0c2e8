/// Ordered set of origin-API namespaces queried when building the catalog.
///
/// The authenticated identity (the empty string) is always queried first: the
/// `/user` endpoint is the only one that lists private packages visible to
/// the token, while the configured namespaces cover public or
/// cross-organization packages the `/user` endpoint omits.
///
/// Whitespace is significant and duplicates are preserved; the catalog
/// aggregator deduplicates results, not inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentitySet(Vec<String>);

impl IdentitySet {
    pub fn parse(config: &str) -> Self {
        let mut identities = vec![String::new()];
        if !config.is_empty() {
            identities.extend(config.split(',').map(str::to_string));
        }

        IdentitySet(identities)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
