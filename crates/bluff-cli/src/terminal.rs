//! Terminal driver.
//!
//! Implements [`Driver`] with input lines from a channel (fed from stdin by
//! [`stdin_lines`]), the TCP frame transport, and plain text output. Waiting
//! for input also watches the server channel and a short poll interval, so
//! frames and timer expiry are handled promptly while the user is idle.

use std::{io::Write, time::Duration};

use bluff_app::{App, AppEvent, Driver};
use bluff_client::transport::{self, ConnectedClient};
use bluff_core::{Environment, GameView};
use bluff_proto::Frame;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::{CliError, Screen, SystemEnv};

/// Longest wait in [`Driver::poll_event`] before the runtime gets to tick.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Read stdin lines on a dedicated thread.
///
/// The channel closes at end of input.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// What woke [`Driver::poll_event`].
enum Wake {
    Line(Option<String>),
    Frame(Option<Frame>),
    Idle,
}

/// Driver for a line-oriented terminal.
pub struct TerminalDriver<W> {
    lines: mpsc::Receiver<String>,
    input_closed: bool,
    out: W,
    last_screen: String,
    room_id: String,
    connection: Option<ConnectedClient>,
    /// Frame picked up while waiting for input.
    pending_frame: Option<Frame>,
    env: SystemEnv,
}

impl<W: Write + Send> TerminalDriver<W> {
    /// Driver reading `lines` and writing screens to `out`.
    pub fn new(lines: mpsc::Receiver<String>, out: W, room_id: impl Into<String>) -> Self {
        Self {
            lines,
            input_closed: false,
            out,
            last_screen: String::new(),
            room_id: room_id.into(),
            connection: None,
            pending_frame: None,
            env: SystemEnv::new(),
        }
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn hang_up(&mut self) {
        if self.connection.take().is_some() {
            tracing::info!("server closed the connection");
        }
    }
}

impl<W: Write + Send> Driver for TerminalDriver<W> {
    type Error = CliError;
    type Instant = std::time::Instant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if self.pending_frame.is_some() {
            return Ok(None);
        }

        let idle = self.env.sleep(POLL_INTERVAL);
        let lines = &mut self.lines;
        let connection = &mut self.connection;
        let frames = async {
            match connection.as_mut() {
                Some(conn) => conn.from_server.recv().await,
                None => std::future::pending().await,
            }
        };

        let wake = tokio::select! {
            line = lines.recv(), if !self.input_closed => Wake::Line(line),
            frame = frames => Wake::Frame(frame),
            () = idle => Wake::Idle,
        };

        match wake {
            Wake::Line(Some(line)) => Ok(Some(AppEvent::Line(line))),
            Wake::Line(None) => {
                self.input_closed = true;
                Ok(Some(AppEvent::InputClosed))
            },
            Wake::Frame(Some(frame)) => {
                self.pending_frame = Some(frame);
                Ok(None)
            },
            Wake::Frame(None) => {
                self.hang_up();
                Ok(None)
            },
            Wake::Idle => Ok(None),
        }
    }

    /// A closed channel marks the driver disconnected and loses the frame.
    async fn send_frame(&mut self, frame: Frame) -> Result<(), Self::Error> {
        let to_server = self.connection.as_ref().ok_or(CliError::NotConnected)?.to_server.clone();
        if to_server.send(frame).await.is_err() {
            tracing::warn!("send on closed connection");
            self.hang_up();
        }
        Ok(())
    }

    async fn recv_frame(&mut self) -> Option<Frame> {
        if let Some(frame) = self.pending_frame.take() {
            return Some(frame);
        }

        let result = self.connection.as_mut()?.from_server.try_recv();
        match result {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.hang_up();
                None
            },
        }
    }

    async fn connect(&mut self, addr: &str) -> Result<(), Self::Error> {
        self.pending_frame = None;
        if let Some(old) = self.connection.take() {
            old.stop();
        }
        self.connection = Some(transport::connect(addr).await?);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    /// Unchanged screens are not written again.
    fn render(&mut self, app: &App, view: &GameView) -> Result<(), Self::Error> {
        let screen = Screen::new(app, view, &self.room_id).to_string();
        if screen == self.last_screen {
            return Ok(());
        }

        self.out.write_all(b"\n")?;
        self.out.write_all(screen.as_bytes())?;
        self.out.flush()?;
        self.last_screen = screen;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.stop();
        }
    }
}
