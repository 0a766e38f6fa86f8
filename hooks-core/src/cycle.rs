//! Cycle tracking for in-flight requests.
//!
//! Each URL value gets one cycle. Starting a new cycle, or tearing the owner
//! down, supersedes the previous one: its token stops reporting
//! [`CycleToken::is_current`] and its abort signal fires so the pending
//! request future can be dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;

/// Hands out [`CycleToken`]s and supersedes them.
#[derive(Debug, Default)]
pub struct CycleTracker {
    generation: Rc<Cell<u64>>,
    abort: RefCell<Option<oneshot::Sender<()>>>,
}

/// Proof that a result belongs to a particular cycle.
#[derive(Debug)]
pub struct CycleToken {
    generation: u64,
    current: Rc<Cell<u64>>,
    pub(crate) abort: oneshot::Receiver<()>,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede the active cycle, if any, and start a new one.
    pub fn begin(&self) -> CycleToken {
        let generation = self.advance();
        let (sender, receiver) = oneshot::channel();
        *self.abort.borrow_mut() = Some(sender);
        tracing::debug!(generation, "Beginning fetch cycle");
        CycleToken {
            generation,
            current: self.generation.clone(),
            abort: receiver,
        }
    }

    /// Supersede the active cycle without starting another.
    pub fn cancel(&self) {
        let generation = self.advance();
        tracing::debug!(generation, "Cancelled fetch cycle");
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn advance(&self) -> u64 {
        if let Some(sender) = self.abort.borrow_mut().take() {
            // the receiver may already be gone if the cycle finished
            let _ = sender.send(());
        }
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }
}

impl CycleToken {
    /// Whether this token's cycle is still the active one.
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
