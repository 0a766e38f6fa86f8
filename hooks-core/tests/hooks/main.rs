mod cache;
mod compositor;
mod fetch;

use std::rc::Rc;

use hooks_core::{FetchConfig, FetchController};
use serde::{Deserialize, Serialize};
use test_helpers::{MockFetcher, Recorder};

/// Body shape returned by the echoing mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub data: String,
}

impl Payload {
    pub fn new(data: &str) -> Self {
        Self { data: data.into() }
    }
}

/// A controller, recorder and mock fetcher wired together the way the ui
/// hook wires them.
pub struct Harness {
    pub fetcher: Rc<MockFetcher>,
    pub controller: FetchController<Payload>,
    pub recorder: Recorder<Payload>,
}

impl Harness {
    pub fn new(config: FetchConfig) -> Self {
        test_helpers::init_tracing();
        Self {
            fetcher: Rc::new(MockFetcher::new()),
            controller: FetchController::new(config),
            recorder: Recorder::new(),
        }
    }

    /// Emulate the hook's effect for a new URL: supersede the previous
    /// cycle and spawn the next one on the local set.
    pub fn set_url(&self, url: Option<&str>) {
        self.controller.supersede();
        if let Some(cycle) = self.controller.on_url_change(
            self.fetcher.clone(),
            url.map(str::to_string),
            Default::default(),
            self.recorder.dispatcher(),
        ) {
            tokio::task::spawn_local(cycle);
        }
    }
}
