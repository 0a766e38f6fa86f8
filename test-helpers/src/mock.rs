//! Scripted stand-in for the network.
//!
//! [`MockFetcher`] answers requests from per-URL scripts and records every
//! call, so tests can count round trips. Unscripted URLs echo back
//! `{"data": <url>}` after yielding once, mirroring a response that arrives
//! on the next turn of the event loop.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::task::Poll;

use async_trait::async_trait;
use futures::channel::oneshot;
use hooks_core::{FetchError, FetchResponse, Fetcher, RequestOptions};
use reqwest::StatusCode;
use serde::Serialize;

type Reply = Result<FetchResponse, FetchError>;

enum Script {
    Now(Reply),
    /// Held until the matching [`Gate`] is released.
    Gated(oneshot::Receiver<Reply>),
    /// Never answers.
    Hang,
}

/// Releases a gated response.
pub struct Gate {
    sender: oneshot::Sender<Reply>,
}

impl Gate {
    /// Deliver `reply` to the waiting request. Returns false if the request
    /// future was already dropped.
    pub fn release(self, reply: Reply) -> bool {
        self.sender.send(reply).is_ok()
    }

    pub fn release_json(self, body: &impl Serialize) -> bool {
        self.release(Ok(json_response(StatusCode::OK, body)))
    }

    /// Whether the request waiting on this gate has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_canceled()
    }
}

#[derive(Default)]
pub struct MockFetcher {
    /// One-shot scripts, consumed in order before falling back to `fixed`.
    queued: RefCell<HashMap<String, VecDeque<Script>>>,
    /// Replies repeated for every call.
    fixed: RefCell<HashMap<String, Reply>>,
    calls: RefCell<Vec<(String, RequestOptions)>>,
}

pub fn json_response(status: StatusCode, body: &impl Serialize) -> FetchResponse {
    let body = serde_json::to_vec(body).unwrap_or_default();
    FetchResponse::new(status, body)
}

/// Give the executor one turn. Works under both tokio and the browser's
/// microtask queue.
async fn yield_once() {
    let mut yielded = false;
    futures::future::poll_fn(|cx| {
        if yielded {
            return Poll::Ready(());
        }
        yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    })
    .await
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request for `url` with `body` and status 200.
    pub fn respond_json(&self, url: &str, body: &impl Serialize) -> &Self {
        self.respond(url, Ok(json_response(StatusCode::OK, body)))
    }

    /// Answer every request for `url` with an empty body and `status`.
    pub fn respond_status(&self, url: &str, status: StatusCode) -> &Self {
        self.respond(url, Ok(FetchResponse::new(status, Vec::new())))
    }

    pub fn respond(&self, url: &str, reply: Reply) -> &Self {
        self.fixed.borrow_mut().insert(url.to_string(), reply);
        self
    }

    /// Hold the next request for `url` until the returned gate is released.
    pub fn gate(&self, url: &str) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.enqueue(url, Script::Gated(receiver));
        Gate { sender }
    }

    /// Answer the next request for `url` with `reply`, once.
    pub fn respond_once(&self, url: &str, reply: Reply) -> &Self {
        self.enqueue(url, Script::Now(reply));
        self
    }

    /// The next request for `url` never completes.
    pub fn hang(&self, url: &str) -> &Self {
        self.enqueue(url, Script::Hang);
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|(u, _)| u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Options passed with the most recent request for `url`.
    pub fn last_options(&self, url: &str) -> Option<RequestOptions> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, options)| options.clone())
    }

    fn enqueue(&self, url: &str, script: Script) {
        self.queued
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(script);
    }

    fn next_script(&self, url: &str) -> Option<Script> {
        if let Some(script) = self
            .queued
            .borrow_mut()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
        {
            return Some(script);
        }
        self.fixed.borrow().get(url).cloned().map(Script::Now)
    }
}

#[async_trait(?Send)]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Reply {
        tracing::debug!(url, "Mock fetch");
        self.calls
            .borrow_mut()
            .push((url.to_string(), options.clone()));

        match self.next_script(url) {
            Some(Script::Now(reply)) => {
                yield_once().await;
                reply
            }
            Some(Script::Gated(receiver)) => receiver.await.unwrap_or_else(|_| {
                Err(FetchError::Transport("gate dropped".into()))
            }),
            Some(Script::Hang) => std::future::pending().await,
            None => {
                yield_once().await;
                Ok(json_response(
                    StatusCode::OK,
                    &serde_json::json!({ "data": url }),
                ))
            }
        }
    }
}
