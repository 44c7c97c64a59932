//! Terminal Adapters
//!
//! The two edges of the loop that touch the real terminal: translating
//! crossterm input into [`Event`]s and printing [`Frame`]s.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::event::{self as term, EventStream, KeyEventKind};
use crossterm::queue;
use crossterm::style::Print;
use futures::StreamExt;

use crate::error::RunError;
use crate::events::Event;
use crate::tasks::EventSender;
use crate::widgets::Frame;

/// Accepts one frame per render tick
pub trait RenderSink {
    fn present(&mut self, frame: &Frame) -> Result<(), RunError>;
}

/// Collects frames in memory
impl RenderSink for Vec<Frame> {
    fn present(&mut self, frame: &Frame) -> Result<(), RunError> {
        self.push(frame.clone());
        Ok(())
    }
}

/// Prints frames to a crossterm-compatible writer, row by row
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn present(&mut self, frame: &Frame) -> Result<(), RunError> {
        for (row, line) in frame.lines().iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            queue!(self.out, MoveTo(0, row), Print(line))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Map a crossterm event onto a loop event
///
/// Only key presses and resizes matter; release/repeat, mouse, focus and
/// paste events are dropped.
pub fn translate(event: term::Event) -> Option<Event> {
    match event {
        term::Event::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        term::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

/// Forward terminal input into the loop until either side closes
pub async fn forward_terminal_events(tx: EventSender) {
    let mut stream = EventStream::new();
    while let Some(next) = stream.next().await {
        match next {
            Ok(raw) => {
                let Some(event) = translate(raw) else {
                    continue;
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Terminal input error: {}", e);
                break;
            }
        }
    }
}
