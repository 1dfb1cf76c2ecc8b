//! Ranking-update job stream.
//!
//! The server answers `/update/ranking` with a server-sent-events body:
//! `progress` frames (or unnamed messages) while it works, one `complete`
//! frame at the end, or an `error` frame. [`JobStream`] turns that body into
//! [`JobEvent`]s until a terminal event or until its [`CancelHandle`] fires.

use crate::errors::{AppError, AppResult};
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Progress(String),
    Complete(String),
    Failed(String),
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress(_))
    }
}

/// Stops delivery of further events; clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One dispatched SSE frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Frame {
    event: Option<String>,
    data: Vec<String>,
}

impl Frame {
    fn is_empty(&self) -> bool {
        self.event.is_none() && self.data.is_empty()
    }

    /// `None` for named events nobody listens to.
    fn into_event(self) -> Option<JobEvent> {
        let data = self.data.join("\n");
        match self.event.as_deref() {
            None | Some("message") | Some("progress") => Some(JobEvent::Progress(data)),
            Some("complete") => Some(JobEvent::Complete(data)),
            Some("error") => Some(JobEvent::Failed(if data.is_empty() {
                "server reported an error".to_string()
            } else {
                data
            })),
            Some(_) => None,
        }
    }
}

pub struct JobStream<R> {
    reader: R,
    cancel: CancelHandle,
    finished: bool,
    line: String,
}

impl<R: BufRead> JobStream<R> {
    pub fn new(reader: R, cancel: CancelHandle) -> Self {
        Self {
            reader,
            cancel,
            finished: false,
            line: String::new(),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Read up to the next blank line. `Ok(None)` at end of input; an incomplete
    /// trailing frame is discarded.
    fn next_frame(&mut self) -> std::io::Result<Option<Frame>> {
        let mut frame = Frame::default();
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }

            let line = self.line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if frame.is_empty() {
                    continue;
                }
                return Ok(Some(frame));
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
                None => (line, ""),
            };
            match field {
                "event" => frame.event = Some(value.to_string()),
                "data" => frame.data.push(value.to_string()),
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for JobStream<R> {
    type Item = JobEvent;

    fn next(&mut self) -> Option<JobEvent> {
        loop {
            if self.finished || self.cancel.is_cancelled() {
                return None;
            }

            let event = match self.next_frame() {
                Ok(Some(frame)) => match frame.into_event() {
                    Some(ev) => ev,
                    None => continue,
                },
                Ok(None) => JobEvent::Failed("stream closed before the job completed".into()),
                Err(e) => JobEvent::Failed(e.to_string()),
            };

            // A cancel that raced with a blocking read still wins.
            if self.cancel.is_cancelled() {
                return None;
            }
            if event.is_terminal() {
                self.finished = true;
            }
            return Some(event);
        }
    }
}

/// Consume `events` to the end, handing progress text to `on_progress`.
/// Returns the completion message.
pub fn drive<I, F>(events: I, mut on_progress: F) -> AppResult<String>
where
    I: IntoIterator<Item = JobEvent>,
    F: FnMut(&str),
{
    for event in events {
        match event {
            JobEvent::Progress(text) => on_progress(&text),
            JobEvent::Complete(text) => return Ok(text),
            JobEvent::Failed(reason) => return Err(AppError::JobFailed(reason)),
        }
    }
    Err(AppError::JobFailed("cancelled".into()))
}
