//! Per-dispatch chain cursor.
//!
//! A [`VirtualChain`] drives one request through a matched filter sequence:
//! an index over the shared, immutable sequence plus the caller's fallback
//! chain as the terminal continuation. Each dispatch gets a fresh cursor, so
//! any number of concurrent requests can replay the same registry entry
//! without synchronization.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::error::FilterResult;
use crate::filter::{FilterChain, FilterSeq};

/// Single-use continuation over one matched filter sequence.
///
/// The position only ever advances; a filter that never calls `proceed`
/// leaves the cursor where it stopped and the rest of the chain, fallback
/// included, never runs.
pub(crate) struct VirtualChain<'f, Rq, Rs> {
    filters: FilterSeq<Rq, Rs>,
    len: usize,
    position: usize,
    fallback: &'f mut (dyn FilterChain<Rq, Rs> + 'f),
}

impl<'f, Rq, Rs> VirtualChain<'f, Rq, Rs> {
    pub(crate) fn new(
        filters: FilterSeq<Rq, Rs>,
        fallback: &'f mut (dyn FilterChain<Rq, Rs> + 'f),
    ) -> Self {
        let len = filters.len();
        Self {
            filters,
            len,
            position: 0,
            fallback,
        }
    }
}

#[async_trait]
impl<'f, Rq, Rs> FilterChain<Rq, Rs> for VirtualChain<'f, Rq, Rs>
where
    Rq: Send + 'static,
    Rs: Send + 'static,
{
    async fn proceed(&mut self, request: &mut Rq, response: &mut Rs) -> FilterResult {
        if self.position == self.len {
            trace!("reached end of additional chain; proceeding with fallback");
            return self.fallback.proceed(request, response).await;
        }

        let filter = Arc::clone(&self.filters[self.position]);
        self.position += 1;
        trace!(
            position = self.position,
            len = self.len,
            "invoking filter"
        );

        filter.filter(request, response, self).await
    }
}
