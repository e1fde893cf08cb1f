//! The interactive palette: a debounced query/preview state machine.
//!
//! [`open`] shows the palette and spawns a [`PaletteSession`] that owns the
//! rest of the interaction. The host feeds it [`PaletteEvent`]s through the
//! returned [`PaletteHandle`] and awaits the [`PaletteOutcome`].

pub mod navigate;
pub mod session;
pub mod timer;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::PaletteConfig;
use crate::host::PaletteView;
use crate::search::SearchEngine;
use crate::types::{Location, ResultItem};

use session::PaletteSession;
pub use session::PaletteState;

pub const PLACEHOLDER: &str = "Go To Anything. Type '?' for help";

/// User interaction reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    /// The text in the input box changed
    InputChanged(String),
    /// The highlighted row changed
    ActiveChanged(Option<ResultItem>),
    /// The user pressed enter, with the highlighted row if any
    Accept(Option<ResultItem>),
    Dismiss,
}

/// How a palette session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOutcome {
    Navigated(Location),
    Dismissed,
}

#[derive(Debug, Clone, Copy)]
pub struct PaletteOptions {
    pub enable_preview: bool,
    pub delay: Duration,
}

impl From<&PaletteConfig> for PaletteOptions {
    fn from(config: &PaletteConfig) -> Self {
        Self {
            enable_preview: config.enable_preview,
            delay: Duration::from_millis(config.preview_delay_ms),
        }
    }
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self::from(&PaletteConfig::default())
    }
}

/// A running palette session
pub struct PaletteHandle {
    events: mpsc::UnboundedSender<PaletteEvent>,
    state: watch::Receiver<PaletteState>,
    task: JoinHandle<PaletteOutcome>,
}

impl PaletteHandle {
    /// Returns false once the session has ended
    pub fn send(&self, event: PaletteEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// The session's current state; `Closed` once it has ended
    pub fn state(&self) -> PaletteState {
        self.state.borrow().clone()
    }

    /// Wait for the session to end on its own, keeping the handle usable for
    /// sending meanwhile. Must not be polled again once it has resolved.
    pub async fn wait(&mut self) -> Result<PaletteOutcome, tokio::task::JoinError> {
        (&mut self.task).await
    }

    /// Wait for the session to end. Dropping the event sender first makes a
    /// still-open palette dismiss itself.
    pub async fn join(self) -> Result<PaletteOutcome, tokio::task::JoinError> {
        drop(self.events);
        self.task.await
    }
}

/// Show the palette and start a session. Must be called within a tokio runtime.
pub fn open(
    engine: Arc<SearchEngine>,
    view: Arc<dyn PaletteView>,
    options: PaletteOptions,
) -> PaletteHandle {
    let (events, rx) = mpsc::unbounded_channel();
    let (state_tx, state) = watch::channel(PaletteState::Idle);
    let session = PaletteSession::new(engine, view, options, state_tx);
    let task = tokio::spawn(session.run(rx));
    PaletteHandle {
        events,
        state,
        task,
    }
}
