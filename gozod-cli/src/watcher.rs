//! Watch mode.
//!
//! One debounced watcher covers every root. Each debounce window yields a
//! single [`WatchEvent::Changed`] batch, so a save that touches several
//! files regenerates once. Test files and the generator's own outputs are
//! filtered out, which keeps writing generated code from retriggering a run.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use tracing::trace;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// One debounce window's worth of activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Go sources that were created, modified or deleted. Sorted, never
    /// empty.
    Changed(Vec<PathBuf>),
    /// The underlying watcher reported an error.
    Error(String),
}

/// Configures a watch over one or more roots.
#[derive(Debug, Clone)]
pub struct FileWatcher {
    roots: Vec<PathBuf>,
    suffix: String,
    recursive: bool,
    debounce: Duration,
}

/// A running watch. Events stop when this is dropped.
pub struct WatchSession {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<WatchEvent>,
}

impl FileWatcher {
    /// Watches `roots`, ignoring outputs that end with `suffix`.
    pub fn new<I, P>(roots: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            suffix: suffix.into(),
            recursive: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Starts watching every root.
    pub fn start(&self) -> CliResult<WatchSession> {
        let (tx, rx) = channel();
        let suffix = self.suffix.clone();

        let mut debouncer = new_debouncer(
            self.debounce,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| {
                let event = match result {
                    Ok(events) => {
                        let changed =
                            relevant_changes(events.into_iter().map(|e| e.path), &suffix);
                        if changed.is_empty() {
                            return;
                        }
                        trace!(files = changed.len(), "debounced change");
                        WatchEvent::Changed(changed)
                    }
                    Err(e) => WatchEvent::Error(e.to_string()),
                };
                let _ = tx.send(event);
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        let mode = if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        for root in &self.roots {
            debouncer
                .watcher()
                .watch(root, mode)
                .map_err(|e| WatchError::Init(format!("{}: {e}", root.display())))?;
        }

        Ok(WatchSession {
            _debouncer: debouncer,
            events: rx,
        })
    }
}

impl WatchSession {
    /// Blocks until the next batch. `None` once the watcher has shut down.
    pub fn next_event(&self) -> Option<WatchEvent> {
        self.events.recv().ok()
    }
}

/// Whether a changed path should trigger regeneration.
pub fn is_relevant(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.ends_with(".go") && !name.ends_with("_test.go") && !name.ends_with(suffix)
        })
}

/// The relevant paths of a batch, sorted and deduplicated.
pub fn relevant_changes(paths: impl IntoIterator<Item = PathBuf>, suffix: &str) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| is_relevant(path, suffix))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
