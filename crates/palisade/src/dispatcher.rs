//! The central request dispatcher.
//!
//! The [`Dispatcher`] resolves each incoming request against its
//! [`ChainRegistry`], builds a fresh per-dispatch chain cursor for the
//! matched filter sequence, and drives it with the caller-supplied fallback
//! chain as the terminal continuation. When nothing matches, or the matched
//! chain is empty, the fallback runs directly; that bypass is a configured
//! outcome, not an error.
//!
//! # Thread safety
//!
//! The registry is the only shared state and is held behind an atomic
//! reference swap. Concurrent dispatches read it without locking; replacing
//! it with [`Dispatcher::replace_registry`] is observed by subsequent
//! dispatches, while in-flight ones finish against the registry they
//! started with.
//!
//! # Example
//!
//! ```rust,ignore
//! use palisade::{chain_fn, match_fn, AnyRequest, ChainRegistry, Dispatcher};
//!
//! let registry = ChainRegistry::builder()
//!     .named_chain("admin", match_fn(|req: &Request| req.path.starts_with("/admin")), vec![
//!         auth.clone(),
//!     ])
//!     .named_chain("default", AnyRequest, vec![logging.clone()])
//!     .build()?;
//!
//! let dispatcher = Dispatcher::new(registry);
//!
//! let mut fallback = chain_fn(|req: &mut Request, resp: &mut Response| {
//!     resp.status = 404;
//!     Ok(())
//! });
//! dispatcher.dispatch(&mut request, &mut response, &mut fallback).await?;
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{Level, debug, span};

use crate::chain::VirtualChain;
use crate::error::{ConfigResult, FilterResult};
use crate::filter::{FilterChain, FilterSeq};
use crate::registry::{ChainEntry, ChainRegistry};
use crate::validator::ChainValidator;

/// Resolves requests to filter chains and executes them.
///
/// `Dispatcher` is `Send + Sync` and is meant to be shared (typically in an
/// `Arc`) across however many tasks serve requests.
pub struct Dispatcher<Rq, Rs> {
    registry: ArcSwap<ChainRegistry<Rq, Rs>>,
}

impl<Rq, Rs> Dispatcher<Rq, Rs> {
    /// Creates a dispatcher over the given registry without extra validation.
    pub fn new(registry: ChainRegistry<Rq, Rs>) -> Self {
        Self {
            registry: ArcSwap::from_pointee(registry),
        }
    }

    /// Creates a dispatcher and runs `validator` over it exactly once.
    ///
    /// The validator sees the fully assembled dispatcher; if it rejects the
    /// configuration, construction fails and nothing is served.
    pub fn with_validator<V>(registry: ChainRegistry<Rq, Rs>, validator: &V) -> ConfigResult<Self>
    where
        V: ChainValidator<Rq, Rs> + ?Sized,
    {
        let dispatcher = Self::new(registry);
        validator.validate(&dispatcher)?;
        Ok(dispatcher)
    }

    /// Returns the registry currently serving dispatches.
    pub fn registry(&self) -> Arc<ChainRegistry<Rq, Rs>> {
        self.registry.load_full()
    }

    /// Atomically replaces the registry.
    ///
    /// New dispatches observe the replacement immediately; dispatches
    /// already running continue against the registry they resolved with.
    pub fn replace_registry(&self, registry: Arc<ChainRegistry<Rq, Rs>>) {
        self.registry.store(registry);
    }

    /// Resolves the filter sequence for a request without executing it.
    ///
    /// Convenience accessor for introspection and tests.
    pub fn lookup(&self, request: &Rq) -> Option<FilterSeq<Rq, Rs>> {
        self.registry.load().lookup(request).cloned()
    }

    /// Returns an ordered, defensive copy of the current registry entries.
    pub fn snapshot(&self) -> Vec<ChainEntry<Rq, Rs>> {
        self.registry.load().snapshot()
    }
}

impl<Rq, Rs> Dispatcher<Rq, Rs>
where
    Rq: Send + 'static,
    Rs: Send + 'static,
{
    /// Dispatches one request through its matching chain.
    ///
    /// Resolution is first-match-wins over the registry. No match, or a
    /// matched chain with no filters, sends the request straight to
    /// `fallback`. Errors raised by filters or the fallback propagate to the
    /// caller unmodified; the rest of the chain for that request is
    /// abandoned.
    pub async fn dispatch(
        &self,
        request: &mut Rq,
        response: &mut Rs,
        fallback: &mut (dyn FilterChain<Rq, Rs> + '_),
    ) -> FilterResult {
        let span = span!(Level::DEBUG, "dispatch");
        let selected = {
            let _enter = span.enter();
            let registry = self.registry.load();
            match registry.resolve(request) {
                None => {
                    debug!("no matching chain; proceeding with fallback");
                    None
                }
                Some(entry) if entry.filters().is_empty() => {
                    debug!(
                        chain = entry.name().unwrap_or("unnamed"),
                        "matched chain is empty; proceeding with fallback"
                    );
                    None
                }
                Some(entry) => {
                    debug!(
                        chain = entry.name().unwrap_or("unnamed"),
                        filters = entry.filters().len(),
                        "matched chain"
                    );
                    Some(Arc::clone(entry.filters()))
                }
            }
        };

        match selected {
            Some(filters) => {
                VirtualChain::new(filters, fallback)
                    .proceed(request, response)
                    .await
            }
            None => fallback.proceed(request, response).await,
        }
    }
}

impl<Rq, Rs> std::fmt::Debug for Dispatcher<Rq, Rs> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("chains", &self.registry.load().len())
            .finish()
    }
}
