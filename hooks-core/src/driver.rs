//! Drives one fetch cycle from loading to a terminal state.

use std::future::Future;
use std::rc::Rc;

use futures::future::{self, Either};
use serde::de::DeserializeOwned;

use crate::{
    CycleToken, CycleTracker, FetchAction, FetchConfig, Fetcher,
    RequestCache, RequestOptions,
};

/// How a cycle ended. Only informational: the state itself is reported
/// through the dispatch callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Fetched,
    /// Served from the cache without touching the network.
    CacheHit,
    Failed,
    /// The cycle was superseded; nothing was dispatched after that point.
    Superseded,
}

/// Resolve `url` and report each transition through `dispatch`.
///
/// Dispatches `Loading` first, then either a cached payload, the decoded
/// response, or the failure. Once `token` is superseded nothing further is
/// dispatched, and if the request is still pending its future is dropped.
/// A successful payload is still written to the cache when the cycle was
/// superseded after the response arrived.
pub async fn run_cycle<T, F, D>(
    fetcher: &F,
    url: &str,
    options: &RequestOptions,
    cache: Option<&RequestCache<T>>,
    token: CycleToken,
    dispatch: D,
) -> CycleOutcome
where
    T: DeserializeOwned + Clone,
    F: Fetcher + ?Sized,
    D: Fn(FetchAction<T>),
{
    if !token.is_current() {
        return CycleOutcome::Superseded;
    }

    dispatch(FetchAction::Loading);
    resolve(fetcher, url, options, cache, token, dispatch).await
}

/// Everything in a cycle after `Loading` has been dispatched.
async fn resolve<T, F, D>(
    fetcher: &F,
    url: &str,
    options: &RequestOptions,
    cache: Option<&RequestCache<T>>,
    mut token: CycleToken,
    dispatch: D,
) -> CycleOutcome
where
    T: DeserializeOwned + Clone,
    F: Fetcher + ?Sized,
    D: Fn(FetchAction<T>),
{
    if !token.is_current() {
        return CycleOutcome::Superseded;
    }

    if let Some(data) = cache.and_then(|cache| cache.get(url)) {
        tracing::debug!(url, "Serving response from cache");
        dispatch(FetchAction::Fetched(data));
        return CycleOutcome::CacheHit;
    }

    let request = fetcher.fetch(url, options);
    let response = match future::select(request, &mut token.abort).await {
        Either::Left((response, _)) => response,
        Either::Right(_) => {
            tracing::debug!(url, "Fetch cycle superseded, dropping request");
            return CycleOutcome::Superseded;
        }
    };

    match response.and_then(|response| response.json::<T>()) {
        Ok(data) => {
            if let Some(cache) = cache {
                cache.insert(url, data.clone());
            }
            if !token.is_current() {
                return CycleOutcome::Superseded;
            }
            dispatch(FetchAction::Fetched(data));
            CycleOutcome::Fetched
        }
        Err(e) => {
            if !token.is_current() {
                return CycleOutcome::Superseded;
            }
            tracing::warn!(url, "Fetch failed: {e}");
            dispatch(FetchAction::Failed(e));
            CycleOutcome::Failed
        }
    }
}

/// Per-instance fetch bookkeeping: the cycle tracker and, when enabled, the
/// request cache.
///
/// The ui hook keeps one controller per component and forwards URL changes
/// and teardown to it; the returned cycle futures are spawned on the local
/// executor.
pub struct FetchController<T> {
    tracker: CycleTracker,
    cache: Option<RequestCache<T>>,
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    pub fn new(config: FetchConfig) -> Self {
        Self {
            tracker: CycleTracker::new(),
            cache: config.cache_enabled.then(RequestCache::new),
        }
    }

    /// React to a new URL value.
    ///
    /// A `None` URL supersedes any running cycle, dispatches `Reset` and
    /// returns `None`. Otherwise a new cycle begins: `Loading` is dispatched
    /// before this returns, and the rest of the cycle is returned as a future
    /// for the caller to spawn.
    pub fn on_url_change<F, D>(
        &self,
        fetcher: Rc<F>,
        url: Option<String>,
        options: RequestOptions,
        dispatch: D,
    ) -> Option<impl Future<Output = CycleOutcome> + use<T, F, D>>
    where
        F: Fetcher + ?Sized + 'static,
        D: Fn(FetchAction<T>) + 'static,
    {
        let Some(url) = url else {
            self.tracker.cancel();
            dispatch(FetchAction::Reset);
            return None;
        };

        let token = self.tracker.begin();
        dispatch(FetchAction::Loading);

        let cache = self.cache.clone();
        Some(async move {
            resolve(
                fetcher.as_ref(),
                &url,
                &options,
                cache.as_ref(),
                token,
                dispatch,
            )
            .await
        })
    }

    /// Supersede the running cycle. Called when the URL changes again and
    /// when the owner is torn down.
    pub fn supersede(&self) {
        self.tracker.cancel();
    }

    pub fn cache(&self) -> Option<&RequestCache<T>> {
        self.cache.as_ref()
    }
}
