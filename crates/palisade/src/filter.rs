//! Filter and chain capabilities.
//!
//! A [`Filter`] is one unit of request processing inside a matched chain. It
//! receives the request, the response, and the next link of the chain as a
//! [`FilterChain`] continuation. To keep the request moving it must invoke
//! [`FilterChain::proceed`]; a filter that returns without doing so stops the
//! chain, and neither the remaining filters nor the fallback chain run. That
//! must-propagate-or-stop contract is the chain's short-circuiting mechanism.
//!
//! The same [`FilterChain`] capability describes the fallback continuation
//! the caller hands to [`Dispatcher::dispatch`]: the processing path resumed
//! when no chain matches, a matched chain is empty, or a chain runs to
//! completion.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use palisade::{Filter, FilterChain, FilterResult};
//!
//! struct RequireToken;
//!
//! #[async_trait]
//! impl Filter<Request, Response> for RequireToken {
//!     async fn filter(
//!         &self,
//!         request: &mut Request,
//!         response: &mut Response,
//!         next: &mut dyn FilterChain<Request, Response>,
//!     ) -> FilterResult {
//!         if request.token.is_none() {
//!             response.status = 401;
//!             return Ok(()); // stop here, nothing downstream runs
//!         }
//!         next.proceed(request, response).await
//!     }
//! }
//! ```
//!
//! [`Dispatcher::dispatch`]: crate::dispatcher::Dispatcher::dispatch

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FilterResult;

/// A unit of request processing within a matched chain.
///
/// Filters are shared across concurrent dispatches, so implementations must
/// keep per-request state out of `self`; everything request-scoped travels
/// through the `request` and `response` arguments.
#[async_trait]
pub trait Filter<Rq, Rs>: Send + Sync {
    /// Processes the request, optionally delegating to the rest of the chain.
    ///
    /// Invoke `next.proceed(request, response)` to continue; return without
    /// doing so to stop the chain. Errors propagate to the dispatcher's
    /// caller unchanged.
    async fn filter(
        &self,
        request: &mut Rq,
        response: &mut Rs,
        next: &mut dyn FilterChain<Rq, Rs>,
    ) -> FilterResult;
}

/// A shared, type-erased filter.
pub type BoxedFilter<Rq, Rs> = Arc<dyn Filter<Rq, Rs>>;

/// An ordered, immutable sequence of filters registered under one matcher.
///
/// An empty sequence is a meaningful value: the request runs only the
/// fallback chain, with no additional processing.
pub type FilterSeq<Rq, Rs> = Arc<[BoxedFilter<Rq, Rs>]>;

/// A continuation through the remaining processing for one request.
///
/// Implemented internally by the per-dispatch chain cursor, and by callers
/// for the fallback continuation handed to
/// [`Dispatcher::dispatch`](crate::dispatcher::Dispatcher::dispatch).
#[async_trait]
pub trait FilterChain<Rq, Rs>: Send {
    /// Passes the request on to the next stage of this chain.
    async fn proceed(&mut self, request: &mut Rq, response: &mut Rs) -> FilterResult;
}

/// A fallback chain built from a plain closure.
///
/// Created with [`chain_fn`]. Useful for terminal continuations that only
/// write the response, and for tests.
pub struct ChainFn<F> {
    f: F,
}

/// Creates a [`FilterChain`] from a closure.
///
/// # Example
///
/// ```rust,ignore
/// let mut fallback = chain_fn(|_req: &mut Request, resp: &mut Response| {
///     resp.status = 404;
///     Ok(())
/// });
/// dispatcher.dispatch(&mut request, &mut response, &mut fallback).await?;
/// ```
pub fn chain_fn<F>(f: F) -> ChainFn<F> {
    ChainFn { f }
}

#[async_trait]
impl<Rq, Rs, F> FilterChain<Rq, Rs> for ChainFn<F>
where
    Rq: Send + 'static,
    Rs: Send + 'static,
    F: FnMut(&mut Rq, &mut Rs) -> FilterResult + Send,
{
    async fn proceed(&mut self, request: &mut Rq, response: &mut Rs) -> FilterResult {
        (self.f)(request, response)
    }
}

impl<F> std::fmt::Debug for ChainFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainFn").finish_non_exhaustive()
    }
}
