//! Serial command channel.
//!
//! ```text
//!   host ──lines──▶ reader thread ──mpsc──▶ LineReader::poll_line ──▶ tick
//!   tick ──Status──▶ SerialEventSink ──JSON line──▶ host
//!                                   └─ everything else ─▶ LogEventSink
//! ```
//!
//! The reader thread is the only blocking I/O in the system.  The tick loop
//! polls without waiting and takes at most one line per tick, so a backlog
//! drains one instruction per tick.

use std::borrow::Cow;
use std::io::{BufRead, ErrorKind, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};

use super::log_sink::LogEventSink;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// Input
// ───────────────────────────────────────────────────────────────

pub struct LineReader {
    rx: Receiver<String>,
    closed: bool,
}

impl LineReader {
    /// Read lines from `input` on a background thread.  Blank lines are
    /// skipped.  Bytes that are not UTF-8 are replaced, so a corrupted line
    /// reaches the decoder as an unrecognized instruction instead of ending
    /// the channel.  Only end-of-stream or an I/O error stops the thread.
    pub fn spawn<R>(mut input: R) -> std::io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new().name("serial-rx".into()).spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match input.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let text = String::from_utf8_lossy(&buf);
                        if let Cow::Owned(_) = text {
                            warn!("Serial: non-UTF-8 bytes in line replaced");
                        }
                        let line = text.trim_end_matches(['\n', '\r']);
                        if line.trim().is_empty() {
                            continue;
                        }
                        if tx.send(line.to_owned()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(e) => {
                        warn!("Serial: read error: {}", e);
                        break;
                    }
                }
            }
        })?;
        Ok(Self { rx, closed: false })
    }

    /// Lines from the process's stdin (UART0 on the device).
    pub fn stdin() -> std::io::Result<Self> {
        Self::spawn(std::io::BufReader::new(std::io::stdin()))
    }

    /// Take the next pending line without blocking.
    pub fn poll_line(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    info!("Serial: input closed");
                    self.closed = true;
                }
                None
            }
        }
    }

    /// The input reached end-of-stream and every line has been taken.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

// ───────────────────────────────────────────────────────────────
// Output
// ───────────────────────────────────────────────────────────────

/// Writes status reports to the command channel as JSON lines and sends
/// every event to the diagnostic log.
pub struct SerialEventSink<W: Write> {
    out: W,
    log: LogEventSink,
}

impl<W: Write> SerialEventSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            log: LogEventSink::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for SerialEventSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Status(status) = event {
            let line = status.to_json_line();
            if let Err(e) = writeln!(self.out, "{}", line).and_then(|()| self.out.flush()) {
                warn!("Serial: status write failed: {}", e);
            }
        }
        self.log.emit(event);
    }
}
