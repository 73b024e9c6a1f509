//! Ordered matcher-to-chain registry.
//!
//! The [`ChainRegistry`] is the dispatch core's primary data structure: an
//! ordered sequence of (matcher, filter sequence) entries. Insertion order is
//! semantically significant, it *is* the match priority. Lookups scan in
//! that order and the first matching entry wins; nothing is merged from
//! later entries.
//!
//! Ordering mistakes around catch-all matchers are a classic way to silently
//! break routing, so the builder rejects them eagerly: a universal matcher
//! with any entry registered after it fails [`build`] with
//! [`ConfigError::UniversalNotLast`] instead of shadowing those entries at
//! request time.
//!
//! # Example
//!
//! ```rust,ignore
//! use palisade::{match_fn, AnyRequest, ChainRegistry};
//!
//! let registry = ChainRegistry::builder()
//!     .named_chain("admin", match_fn(|req: &Request| req.path.starts_with("/admin")), vec![
//!         auth.clone(),
//!         audit.clone(),
//!     ])
//!     // Empty chain: requests under /static bypass all additional filtering.
//!     .chain(match_fn(|req: &Request| req.path.starts_with("/static")), vec![])
//!     .named_chain("default", AnyRequest, vec![logging.clone()])
//!     .build()?;
//! ```
//!
//! [`build`]: ChainRegistryBuilder::build

use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};
use crate::filter::{BoxedFilter, FilterSeq};
use crate::matcher::{BoxedMatcher, RequestMatcher};

/// One registered (matcher, filter sequence) pair.
pub struct ChainEntry<Rq, Rs> {
    name: Option<String>,
    matcher: BoxedMatcher<Rq>,
    filters: FilterSeq<Rq, Rs>,
}

impl<Rq, Rs> ChainEntry<Rq, Rs> {
    /// Returns the entry's debug name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the matcher guarding this entry.
    pub fn matcher(&self) -> &dyn RequestMatcher<Rq> {
        &*self.matcher
    }

    /// Returns the filter sequence bound to this entry.
    pub fn filters(&self) -> &FilterSeq<Rq, Rs> {
        &self.filters
    }
}

impl<Rq, Rs> Clone for ChainEntry<Rq, Rs> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            matcher: Arc::clone(&self.matcher),
            filters: Arc::clone(&self.filters),
        }
    }
}

impl<Rq, Rs> std::fmt::Debug for ChainEntry<Rq, Rs> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainEntry")
            .field("name", &self.name.as_deref().unwrap_or("unnamed"))
            .field("filters", &self.filters.len())
            .field("universal", &self.matcher.is_universal())
            .finish()
    }
}

/// An immutable, ordered matcher-to-chain mapping.
///
/// Built once via [`ChainRegistry::builder`], then shared read-only across
/// concurrent dispatches. Replacing a live registry is an atomic whole-value
/// swap on the dispatcher, never an in-place mutation.
pub struct ChainRegistry<Rq, Rs> {
    entries: Vec<ChainEntry<Rq, Rs>>,
}

impl<Rq, Rs> ChainRegistry<Rq, Rs> {
    /// Creates a builder for a new registry.
    pub fn builder() -> ChainRegistryBuilder<Rq, Rs> {
        ChainRegistryBuilder::new()
    }

    /// Returns the first entry whose matcher accepts the request.
    ///
    /// The scan stops at the first match; later entries are never consulted,
    /// even if they would also match.
    pub fn resolve(&self, request: &Rq) -> Option<&ChainEntry<Rq, Rs>> {
        self.entries.iter().find(|e| e.matcher.matches(request))
    }

    /// Returns the filter sequence of the first matching entry.
    ///
    /// `None` means no entry matched. An empty sequence is a real match that
    /// requests "no additional processing".
    pub fn lookup(&self, request: &Rq) -> Option<&FilterSeq<Rq, Rs>> {
        self.resolve(request).map(ChainEntry::filters)
    }

    /// Returns an ordered copy of the registered entries.
    ///
    /// The copy is defensive: reordering or removing entries in it has no
    /// effect on the live registry.
    pub fn snapshot(&self) -> Vec<ChainEntry<Rq, Rs>> {
        self.entries.clone()
    }

    /// Returns the number of registered chains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no chains are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Rq, Rs> std::fmt::Debug for ChainRegistry<Rq, Rs> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainRegistry")
            .field("entries", &self.entries)
            .finish()
    }
}

/// Builder assembling a [`ChainRegistry`] in match-priority order.
pub struct ChainRegistryBuilder<Rq, Rs> {
    entries: Vec<ChainEntry<Rq, Rs>>,
}

impl<Rq, Rs> ChainRegistryBuilder<Rq, Rs> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a chain. Earlier registrations take priority.
    pub fn chain(
        self,
        matcher: impl RequestMatcher<Rq> + 'static,
        filters: Vec<BoxedFilter<Rq, Rs>>,
    ) -> Self {
        self.push(None, Arc::new(matcher), filters)
    }

    /// Registers a chain with a name that shows up in dispatch diagnostics.
    pub fn named_chain(
        self,
        name: impl Into<String>,
        matcher: impl RequestMatcher<Rq> + 'static,
        filters: Vec<BoxedFilter<Rq, Rs>>,
    ) -> Self {
        self.push(Some(name.into()), Arc::new(matcher), filters)
    }

    fn push(
        mut self,
        name: Option<String>,
        matcher: BoxedMatcher<Rq>,
        filters: Vec<BoxedFilter<Rq, Rs>>,
    ) -> Self {
        self.entries.push(ChainEntry {
            name,
            matcher,
            filters: filters.into(),
        });
        self
    }

    /// Validates ordering and constructs the immutable registry.
    ///
    /// Fails with [`ConfigError::UniversalNotLast`] if a universal matcher
    /// has entries registered after it. A universal matcher as the final
    /// (or sole) entry is accepted; that is the supported catch-all layout.
    pub fn build(self) -> ConfigResult<ChainRegistry<Rq, Rs>> {
        let total = self.entries.len();
        if let Some(position) = self.entries.iter().position(|e| e.matcher.is_universal()) {
            // The scan stops at the first universal matcher; one in final
            // position shadows nothing and is legal.
            if position + 1 < total {
                return Err(ConfigError::UniversalNotLast { position, total });
            }
        }

        Ok(ChainRegistry {
            entries: self.entries,
        })
    }
}

impl<Rq, Rs> Default for ChainRegistryBuilder<Rq, Rs> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterResult;
    use crate::filter::{Filter, FilterChain};
    use crate::matcher::{AnyRequest, match_fn};
    use async_trait::async_trait;

    struct Request {
        path: &'static str,
    }

    struct Response;

    struct Noop;

    #[async_trait]
    impl Filter<Request, Response> for Noop {
        async fn filter(
            &self,
            request: &mut Request,
            response: &mut Response,
            next: &mut dyn FilterChain<Request, Response>,
        ) -> FilterResult {
            next.proceed(request, response).await
        }
    }

    fn admin_matcher() -> impl RequestMatcher<Request> {
        match_fn(|req: &Request| req.path.starts_with("/admin"))
    }

    #[test]
    fn first_match_wins_over_later_entries() {
        let registry = ChainRegistry::builder()
            .named_chain("admin", admin_matcher(), vec![Arc::new(Noop), Arc::new(Noop)])
            .named_chain("default", AnyRequest, vec![Arc::new(Noop)])
            .build()
            .unwrap();

        let entry = registry
            .resolve(&Request {
                path: "/admin/users",
            })
            .expect("admin chain should match");
        assert_eq!(entry.name(), Some("admin"));
        assert_eq!(entry.filters().len(), 2);

        let entry = registry
            .resolve(&Request { path: "/public" })
            .expect("catch-all should match");
        assert_eq!(entry.name(), Some("default"));
    }

    #[test]
    fn lookup_returns_none_when_nothing_matches() {
        let registry = ChainRegistry::builder()
            .chain(admin_matcher(), vec![Arc::new(Noop)])
            .build()
            .unwrap();

        assert!(registry.lookup(&Request { path: "/public" }).is_none());
    }

    #[test]
    fn empty_chain_is_a_real_match() {
        let registry = ChainRegistry::<Request, Response>::builder()
            .chain(admin_matcher(), vec![])
            .build()
            .unwrap();

        let filters = registry
            .lookup(&Request { path: "/admin" })
            .expect("empty chain should still match");
        assert!(filters.is_empty());
    }

    #[test]
    fn universal_before_other_entries_is_rejected() {
        let err = ChainRegistry::builder()
            .chain(AnyRequest, vec![Arc::new(Noop)])
            .chain(admin_matcher(), vec![Arc::new(Noop)])
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::UniversalNotLast {
                position: 0,
                total: 2
            }
        ));
    }

    #[test]
    fn universal_as_final_entry_is_accepted() {
        let registry = ChainRegistry::builder()
            .chain(admin_matcher(), vec![Arc::new(Noop)])
            .chain(AnyRequest, vec![Arc::new(Noop)])
            .build()
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn sole_universal_entry_is_accepted() {
        let registry = ChainRegistry::builder()
            .chain(AnyRequest, vec![Arc::new(Noop)])
            .build()
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn duplicate_universal_matchers_are_rejected() {
        let err = ChainRegistry::<Request, Response>::builder()
            .chain(AnyRequest, vec![])
            .chain(AnyRequest, vec![])
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::UniversalNotLast {
                position: 0,
                total: 2
            }
        ));
    }

    #[test]
    fn snapshot_mutation_does_not_affect_live_registry() {
        let registry = ChainRegistry::builder()
            .named_chain("admin", admin_matcher(), vec![Arc::new(Noop)])
            .named_chain("default", AnyRequest, vec![Arc::new(Noop)])
            .build()
            .unwrap();

        let mut snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        snapshot.clear();

        assert_eq!(registry.len(), 2);
        let entry = registry
            .resolve(&Request {
                path: "/admin/users",
            })
            .expect("live registry should be unaffected");
        assert_eq!(entry.name(), Some("admin"));
    }
}
