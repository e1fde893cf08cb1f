use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::navigate::resolve_selection;
use super::timer::DebounceTimer;
use super::{PaletteEvent, PaletteOptions, PaletteOutcome, PLACEHOLDER};
use crate::error::SearchError;
use crate::host::{PaletteView, ShowOptions};
use crate::query::{SearchKind, SearchRequest};
use crate::search::{refine, SearchEngine};
use crate::types::ResultItem;

/// Where the session is, published to the [`super::PaletteHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteState {
    Idle,
    Debouncing(String),
    Previewing(ResultItem),
    Navigating,
    Closed,
}

/// What a completed execution depends on. A new query with the same key
/// reuses the previous results and only refines them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExecutionKey {
    kind: SearchKind,
    file_filter: String,
    focus: Option<PathBuf>,
}

/// Timer and executor callbacks, tagged with the generation they belong to
#[derive(Debug)]
enum Message {
    QueryDue {
        generation: u64,
    },
    QueryDone {
        generation: u64,
        request: SearchRequest,
        key: ExecutionKey,
        outcome: Result<Vec<ResultItem>, SearchError>,
    },
    PreviewDue {
        generation: u64,
    },
}

/// State owned by one open palette
pub struct PaletteSession {
    engine: Arc<SearchEngine>,
    view: Arc<dyn PaletteView>,
    options: PaletteOptions,
    state: watch::Sender<PaletteState>,

    input: String,
    input_generation: u64,
    preview_generation: u64,
    query_timer: DebounceTimer,
    preview_timer: DebounceTimer,

    last_key: Option<ExecutionKey>,
    /// Results of the last execution, before refinement
    raw_items: Vec<ResultItem>,
    active: Option<ResultItem>,
    /// Document to restore on dismissal
    original_file: Option<PathBuf>,

    tx: mpsc::UnboundedSender<Message>,
    messages: mpsc::UnboundedReceiver<Message>,
}

impl PaletteSession {
    pub fn new(
        engine: Arc<SearchEngine>,
        view: Arc<dyn PaletteView>,
        options: PaletteOptions,
        state: watch::Sender<PaletteState>,
    ) -> Self {
        let (tx, messages) = mpsc::unbounded_channel();
        Self {
            engine,
            view,
            options,
            state,
            input: String::new(),
            input_generation: 0,
            preview_generation: 0,
            query_timer: DebounceTimer::new(),
            preview_timer: DebounceTimer::new(),
            last_key: None,
            raw_items: Vec::new(),
            active: None,
            original_file: None,
            tx,
            messages,
        }
    }

    /// Drive the session until an item is navigated to or the palette is
    /// dismissed. A closed event channel counts as dismissal.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PaletteEvent>) -> PaletteOutcome {
        self.view.show(PLACEHOLDER);
        self.original_file = self.engine.workbench().active_file();
        self.start_query(self.input_generation);

        loop {
            tokio::select! {
                event = events.recv() => {
                    let outcome = match event {
                        Some(event) => self.handle_event(event).await,
                        None => Some(self.dismiss().await),
                    };
                    if let Some(outcome) = outcome {
                        return outcome;
                    }
                }
                Some(message) = self.messages.recv() => self.handle_message(message).await,
            }
        }
    }

    async fn handle_event(&mut self, event: PaletteEvent) -> Option<PaletteOutcome> {
        match event {
            PaletteEvent::InputChanged(raw) => {
                self.input_changed(raw);
                None
            }
            PaletteEvent::ActiveChanged(item) => {
                self.active = item;
                self.schedule_preview();
                None
            }
            PaletteEvent::Accept(item) => self.accept(item).await,
            PaletteEvent::Dismiss => Some(self.dismiss().await),
        }
    }

    async fn handle_message(&mut self, message: Message) {
        match message {
            Message::QueryDue { generation } => {
                if generation != self.input_generation {
                    tracing::debug!("Dropping stale query timer (generation {})", generation);
                    return;
                }
                self.start_query(generation);
            }
            Message::QueryDone {
                generation,
                request,
                key,
                outcome,
            } => self.query_done(generation, request, key, outcome),
            Message::PreviewDue { generation } => {
                if generation != self.preview_generation {
                    tracing::debug!("Dropping stale preview (generation {})", generation);
                    return;
                }
                self.preview().await;
            }
        }
    }

    fn input_changed(&mut self, raw: String) {
        self.input_generation += 1;
        self.input = raw.clone();
        self.set_state(PaletteState::Debouncing(raw));
        self.query_timer.schedule(
            self.options.delay,
            &self.tx,
            Message::QueryDue {
                generation: self.input_generation,
            },
        );
    }

    fn start_query(&mut self, generation: u64) {
        let request = self.engine.classify(&self.input);
        let focus = self.engine.focus_file(self.active.as_ref());
        let key = ExecutionKey {
            kind: request.kind,
            file_filter: request.file_filter.clone(),
            focus: focus.clone(),
        };

        if !request.force_reexecute && self.last_key.as_ref() == Some(&key) {
            tracing::debug!("Reusing {} results for {:?}", request.kind, self.input);
            let items = refine(&request, &self.raw_items);
            self.show_items(items);
            return;
        }

        self.view.set_busy(true);
        let engine = Arc::clone(&self.engine);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = engine.execute(&request, focus.as_deref()).await;
            let _ = tx.send(Message::QueryDone {
                generation,
                request,
                key,
                outcome,
            });
        });
    }

    fn query_done(
        &mut self,
        generation: u64,
        request: SearchRequest,
        key: ExecutionKey,
        outcome: Result<Vec<ResultItem>, SearchError>,
    ) {
        if generation != self.input_generation {
            tracing::debug!("Discarding results for stale input (generation {})", generation);
            return;
        }

        match outcome {
            Ok(items) => {
                self.view.set_busy(false);
                self.last_key = Some(key);
                self.raw_items = items;
                let items = refine(&request, &self.raw_items);
                self.show_items(items);
            }
            Err(e) if e.is_retryable() => {
                tracing::debug!("{}; retrying {:?}", e, self.input);
                self.query_timer
                    .schedule(self.options.delay, &self.tx, Message::QueryDue { generation });
            }
            Err(e) => {
                self.view.set_busy(false);
                tracing::warn!("Search for {:?} failed: {}", self.input, e);
            }
        }
    }

    fn show_items(&mut self, items: Vec<ResultItem>) {
        self.view.set_items(&items);
        self.active = items.into_iter().next();
        self.set_state(PaletteState::Idle);
        self.schedule_preview();
    }

    fn schedule_preview(&mut self) {
        self.preview_generation += 1;
        self.preview_timer.cancel();
        if !self.options.enable_preview {
            return;
        }
        if self.active.as_ref().is_some_and(|item| item.target.is_some()) {
            self.preview_timer.schedule(
                self.options.delay,
                &self.tx,
                Message::PreviewDue {
                    generation: self.preview_generation,
                },
            );
        }
    }

    async fn preview(&mut self) {
        if matches!(*self.state.borrow(), PaletteState::Debouncing(_)) {
            tracing::debug!("Skipping preview while a new query is pending");
            return;
        }
        let Some(item) = self.active.clone() else {
            return;
        };
        let Some(location) = item.target.as_ref() else {
            return;
        };

        let workbench = self.engine.workbench();
        let selection =
            resolve_selection(workbench.as_ref(), location, item.symbol_name.as_deref()).await;
        let options = ShowOptions {
            preserve_focus: true,
            preview: true,
            selection,
        };
        match workbench.show_document(&location.file, options).await {
            Ok(()) => self.set_state(PaletteState::Previewing(item)),
            Err(e) => tracing::warn!("Failed to preview {}: {}", location.file.display(), e),
        }
    }

    async fn accept(&mut self, item: Option<ResultItem>) -> Option<PaletteOutcome> {
        let Some(item) = item else {
            return Some(self.dismiss().await);
        };

        if let Some(shortcut) = &item.shortcut {
            self.preview_generation += 1;
            self.preview_timer.cancel();
            self.view.set_value(shortcut);
            self.input_changed(shortcut.clone());
            return None;
        }

        let location = item.target?;
        self.set_state(PaletteState::Navigating);
        self.query_timer.cancel();
        self.preview_timer.cancel();
        self.original_file = None;

        let workbench = self.engine.workbench();
        let selection =
            resolve_selection(workbench.as_ref(), &location, item.symbol_name.as_deref()).await;
        let options = ShowOptions {
            preserve_focus: false,
            preview: false,
            selection,
        };
        if let Err(e) = workbench.show_document(&location.file, options).await {
            tracing::warn!("Failed to open {}: {}", location.file.display(), e);
        }

        self.close();
        Some(PaletteOutcome::Navigated(location))
    }

    async fn dismiss(&mut self) -> PaletteOutcome {
        self.query_timer.cancel();
        self.preview_timer.cancel();

        if let Some(original) = self.original_file.take() {
            let options = ShowOptions {
                preserve_focus: false,
                preview: false,
                selection: None,
            };
            if let Err(e) = self.engine.workbench().show_document(&original, options).await {
                tracing::warn!("Failed to restore {}: {}", original.display(), e);
            }
        }

        self.close();
        PaletteOutcome::Dismissed
    }

    fn set_state(&self, next: PaletteState) {
        let previous = self.state.send_replace(next);
        tracing::trace!("Palette {:?} -> {:?}", previous, *self.state.borrow());
    }

    fn close(&mut self) {
        self.view.hide();
        self.set_state(PaletteState::Closed);
    }
}
