//! Shared query infrastructure: the [`Query`] trait.

use url::Url;

/// Trait implemented by all query builders. Serializes the builder's
/// parameters onto an endpoint URL.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}
