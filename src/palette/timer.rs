use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// A one-shot timer that delivers a message after a delay.
///
/// Scheduling again cancels the pending delivery, and so does dropping the
/// timer. A message that was already delivered cannot be recalled; receivers
/// still check generations.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    pending: Option<CancellationToken>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<T: Send + 'static>(
        &mut self,
        delay: Duration,
        tx: &UnboundedSender<T>,
        message: T,
    ) {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(message);
                }
            }
        });
        self.pending = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
