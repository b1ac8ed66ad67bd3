//! Debounced search input

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;

/// What the suggestion list should do after a keystroke settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Search for suggestions with this trimmed query
    Query(String),
    /// Input is too short; drop any shown suggestions
    Clear,
}

/// Turns raw keystroke snapshots into debounced queries
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    idle: Duration,
    min_chars: usize,
}

impl QueryDebouncer {
    #[must_use]
    pub fn new(idle: Duration, min_chars: usize) -> Self {
        Self { idle, min_chars }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            Duration::from_millis(config.debounce_ms),
            usize::try_from(config.min_query_chars).unwrap_or(usize::MAX),
        )
    }

    /// Trimmed query if it is long enough to search for
    #[must_use]
    pub fn accepts<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let query = raw.trim();
        (query.chars().count() >= self.min_chars).then_some(query)
    }

    pub fn spawn(
        self,
        input: mpsc::Receiver<String>,
        output: mpsc::Sender<InputEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(input, output))
    }

    /// Emit `Query` once input has been idle for the debounce period and
    /// `Clear` immediately for short input. Ends when either channel closes.
    pub async fn run(self, mut input: mpsc::Receiver<String>, output: mpsc::Sender<InputEvent>) {
        let mut pending: Option<String> = None;

        loop {
            let received = if pending.is_some() {
                tokio::select! {
                    raw = input.recv() => raw,
                    () = tokio::time::sleep(self.idle) => {
                        if let Some(query) = pending.take() {
                            if output.send(InputEvent::Query(query)).await.is_err() {
                                return;
                            }
                        }
                        continue;
                    }
                }
            } else {
                input.recv().await
            };

            let Some(raw) = received else {
                break;
            };

            match self.accepts(&raw) {
                Some(query) => pending = Some(query.to_string()),
                None => {
                    pending = None;
                    if output.send(InputEvent::Clear).await.is_err() {
                        return;
                    }
                }
            }
        }

        // Input closed while a query was waiting: let its timer run out
        if let Some(query) = pending {
            tokio::time::sleep(self.idle).await;
            let _ = output.send(InputEvent::Query(query)).await;
        }
    }
}
