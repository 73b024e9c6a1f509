//! Request matching capability.
//!
//! A [`RequestMatcher`] decides whether a request is in scope for one
//! registered filter chain. The dispatch core only consumes this capability;
//! what "matching" means (path prefixes, hosts, headers, anything else) is
//! entirely up to the implementation.
//!
//! Matchers must also declare whether they match *every* request via
//! [`RequestMatcher::is_universal`]. The registry uses that to reject
//! configurations where a catch-all chain shadows later entries.
//!
//! # Example
//!
//! ```rust,ignore
//! use palisade::{match_fn, AnyRequest, RequestMatcher};
//!
//! struct Request { path: String }
//!
//! // Closure-based matcher for one request shape
//! let admin = match_fn(|req: &Request| req.path.starts_with("/admin"));
//!
//! // Catch-all matcher, only valid as the final registry entry
//! let rest = AnyRequest;
//! ```

use std::sync::Arc;

/// Predicate capability deciding whether a request is in scope for a chain.
///
/// Implementations must be cheap and side-effect free: `matches` runs once
/// per entry per incoming request until the first match.
pub trait RequestMatcher<Rq>: Send + Sync {
    /// Returns `true` if the request is in scope for the associated chain.
    fn matches(&self, request: &Rq) -> bool;

    /// Returns `true` if this matcher matches every possible request.
    ///
    /// The registry requires universal matchers to be registered last, so
    /// catch-all implementations must override this.
    fn is_universal(&self) -> bool {
        false
    }
}

/// A shared, type-erased request matcher.
pub type BoxedMatcher<Rq> = Arc<dyn RequestMatcher<Rq>>;

/// Matches every request.
///
/// This is the one universal matcher shipped with the crate; the registry
/// only accepts it as the final entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyRequest;

impl<Rq> RequestMatcher<Rq> for AnyRequest {
    fn matches(&self, _request: &Rq) -> bool {
        true
    }

    fn is_universal(&self) -> bool {
        true
    }
}

/// A matcher built from a plain predicate closure.
///
/// Created with [`match_fn`]. Closure matchers never report themselves as
/// universal, even when the predicate happens to accept everything; use
/// [`AnyRequest`] for an honest catch-all.
#[derive(Clone)]
pub struct MatchFn<F> {
    f: F,
}

/// Creates a [`RequestMatcher`] from a predicate closure.
///
/// # Example
///
/// ```rust,ignore
/// let api = match_fn(|req: &Request| req.path.starts_with("/api"));
/// ```
pub fn match_fn<F>(f: F) -> MatchFn<F> {
    MatchFn { f }
}

impl<Rq, F> RequestMatcher<Rq> for MatchFn<F>
where
    F: Fn(&Rq) -> bool + Send + Sync,
{
    fn matches(&self, request: &Rq) -> bool {
        (self.f)(request)
    }
}

impl<F> std::fmt::Debug for MatchFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Request {
        path: &'static str,
    }

    #[test]
    fn any_request_matches_everything() {
        let matcher = AnyRequest;
        assert!(matcher.matches(&Request { path: "/" }));
        assert!(matcher.matches(&Request { path: "/admin/users" }));
        assert!(RequestMatcher::<Request>::is_universal(&matcher));
    }

    #[test]
    fn match_fn_delegates_to_predicate() {
        let matcher = match_fn(|req: &Request| req.path.starts_with("/admin"));
        assert!(matcher.matches(&Request {
            path: "/admin/users"
        }));
        assert!(!matcher.matches(&Request { path: "/public" }));
    }

    #[test]
    fn match_fn_is_never_universal() {
        let matcher = match_fn(|_req: &Request| true);
        assert!(!RequestMatcher::<Request>::is_universal(&matcher));
    }
}
