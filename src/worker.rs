use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::error;

use crate::cea::parser;
use crate::error::{CeaError, Result};
use crate::types::CaseTable;

// ---------------------------------------------------------------------------
// Parse events
// ---------------------------------------------------------------------------

/// Signals sent by a background parse: any number of progress updates,
/// then exactly one `Finished` or `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    Progress(u8),
    Finished(CaseTable),
    Failed(String),
}

/// Handle on a running background parse.
pub struct ParseJob {
    events: Receiver<ParseEvent>,
    handle: Option<JoinHandle<()>>,
}

impl ParseJob {
    pub fn events(&self) -> &Receiver<ParseEvent> {
        &self.events
    }

    /// Block until the parse ends, forwarding progress to `on_progress`.
    pub fn wait<F: FnMut(u8)>(mut self, mut on_progress: F) -> Result<CaseTable> {
        let outcome = loop {
            match self.events.recv() {
                Ok(ParseEvent::Progress(p)) => on_progress(p),
                Ok(ParseEvent::Finished(table)) => break Ok(table),
                Ok(ParseEvent::Failed(msg)) => break Err(CeaError::Worker(msg)),
                Err(_) => break Err(CeaError::Worker("parser exited without a result".into())),
            }
        };
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Parse a report file on a worker thread.
pub fn spawn_parse(path: impl Into<PathBuf>) -> ParseJob {
    let path = path.into();
    spawn(move |tx| {
        parser::parse_file_with(&path, |p| {
            let _ = tx.send(ParseEvent::Progress(p));
        })
    })
}

/// Parse report text already in memory on a worker thread.
pub fn spawn_parse_text(text: String) -> ParseJob {
    spawn(move |tx| {
        Ok(parser::parse_with(&text, |p| {
            let _ = tx.send(ParseEvent::Progress(p));
        }))
    })
}

fn spawn<F>(job: F) -> ParseJob
where
    F: FnOnce(&Sender<ParseEvent>) -> Result<CaseTable> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let terminal = match job(&tx) {
            Ok(table) => {
                let _ = tx.send(ParseEvent::Progress(100));
                ParseEvent::Finished(table)
            }
            Err(e) => {
                error!(error = %e, "error parsing CEA output");
                ParseEvent::Failed(e.to_string())
            }
        };
        let _ = tx.send(terminal);
    });
    ParseJob {
        events: rx,
        handle: Some(handle),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
