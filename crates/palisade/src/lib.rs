//! # Palisade
//!
//! A first-match filter-chain dispatcher for request processing pipelines.
//!
//! Palisade resolves each incoming request against an ordered registry of
//! (matcher, filter chain) pairs, then drives the matched chain as a
//! chain-of-responsibility: every filter may act on the request and
//! response, delegate to the rest of the chain, or stop processing
//! entirely. When the chain runs out, control returns to a fallback chain
//! supplied by the caller's own dispatch mechanism.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐    ┌────────────┐    ┌───────────────┐    ┌──────────┐
//! │ Request │───▶│ Dispatcher │───▶│ VirtualChain  │───▶│ Fallback │
//! └─────────┘    │ (resolve)  │    │ F1 ─▶ F2 ─▶ … │    │  chain   │
//!                └────────────┘    └───────────────┘    └──────────┘
//! ```
//!
//! - [`RequestMatcher`]: opaque predicate deciding whether a request is in
//!   scope for a chain. Consumed, never interpreted, by the core.
//! - [`Filter`]: one unit of processing; must explicitly propagate control
//!   through its [`FilterChain`] continuation to keep the request moving.
//! - [`ChainRegistry`]: ordered matcher-to-chain mapping with first-match
//!   semantics; insertion order is match priority, and a universal matcher
//!   anywhere but last is rejected at build time.
//! - [`Dispatcher`]: resolves, builds a per-request cursor, executes. No
//!   match and empty chains bypass directly to the fallback.
//! - [`ChainValidator`]: pluggable startup-time sanity check with a no-op
//!   default.
//!
//! ## Ordering semantics
//!
//! Specificity is expressed purely through registration order; there is no
//! priority field. Register the most specific matchers first and the
//! catch-all ([`AnyRequest`]) last; the registry refuses configurations
//! where a catch-all would shadow later entries.
//!
//! ## Concurrency
//!
//! The registry is immutable while live and shared without locks; each
//! dispatch owns its cursor exclusively, so any number of requests can
//! replay the same chain concurrently. Hot reconfiguration is an atomic
//! whole-registry swap.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use palisade::prelude::*;
//!
//! let registry = ChainRegistry::builder()
//!     .named_chain(
//!         "admin",
//!         match_fn(|req: &Request| req.path.starts_with("/admin")),
//!         vec![Arc::new(Authenticate), Arc::new(Audit)],
//!     )
//!     // No additional filtering for static assets.
//!     .chain(match_fn(|req: &Request| req.path.starts_with("/static")), vec![])
//!     .named_chain("default", AnyRequest, vec![Arc::new(AccessLog)])
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

mod chain;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod registry;
pub mod validator;

pub use dispatcher::Dispatcher;
pub use error::{BoxError, ConfigError, ConfigResult, FilterResult};
pub use filter::{BoxedFilter, ChainFn, Filter, FilterChain, FilterSeq, chain_fn};
pub use matcher::{AnyRequest, BoxedMatcher, MatchFn, RequestMatcher, match_fn};
pub use registry::{ChainEntry, ChainRegistry, ChainRegistryBuilder};
pub use validator::{ChainValidator, NoopValidator};

/// Prelude for common imports.
pub mod prelude {
    pub use super::dispatcher::Dispatcher;
    pub use super::error::{BoxError, ConfigError, ConfigResult, FilterResult};
    pub use super::filter::{BoxedFilter, Filter, FilterChain, FilterSeq, chain_fn};
    pub use super::matcher::{AnyRequest, RequestMatcher, match_fn};
    pub use super::registry::{ChainEntry, ChainRegistry};
    pub use super::validator::{ChainValidator, NoopValidator};
}
