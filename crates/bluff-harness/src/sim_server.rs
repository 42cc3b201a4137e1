//! Simulation server for testing with turmoil.
//!
//! `SimServer` puts a [`ScriptedTable`] behind turmoil's deterministic TCP so
//! a real client transport can be exercised end to end. Tests drive the
//! server explicitly: accept a seat, serve one intent, let the bots move.

use std::io;

use bluff_proto::{ClientIntent, Frame, PlayerId, ServerEvent};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use turmoil::net::{TcpListener, TcpStream};

use crate::ScriptedTable;

/// Upper bound on bot moves while waiting for a seat's turn.
const MAX_BOT_MOVES: usize = 256;

struct Seat {
    id: PlayerId,
    stream: TcpStream,
}

/// Simulation server for testing with turmoil.
pub struct SimServer {
    listener: TcpListener,
    table: ScriptedTable,
    seats: Vec<Seat>,
}

impl SimServer {
    /// Bind a server for `table`.
    pub async fn bind(address: &str, table: ScriptedTable) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self { listener, table, seats: Vec::new() })
    }

    /// The table being served.
    pub fn table(&self) -> &ScriptedTable {
        &self.table
    }

    /// Accept a connection and seat it at the next free player slot.
    ///
    /// The new session is greeted with `connected` and `room state`.
    pub async fn accept(&mut self) -> io::Result<PlayerId> {
        let (mut stream, _addr) = self.listener.accept().await?;

        let id = self
            .table
            .players()
            .get(self.seats.len())
            .map(|p| p.id.clone())
            .ok_or_else(|| io::Error::other("table is full"))?;

        for event in self.table.greet(&id) {
            write_event(&mut stream, event).await?;
        }
        tracing::debug!(%id, "seated");

        self.seats.push(Seat { id: id.clone(), stream });
        Ok(id)
    }

    /// Deal a new game to every seat.
    pub async fn deal(&mut self) -> io::Result<()> {
        let events = self.table.deal();
        self.broadcast(events).await
    }

    /// Read one intent from `id`, apply it, and broadcast the outcome.
    pub async fn serve_next(&mut self, id: &PlayerId) -> io::Result<ClientIntent> {
        let seat = self
            .seats
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| io::Error::other(format!("no seat for {id}")))?;

        let intent = read_intent(&mut seat.stream).await?;
        let events = self.table.apply(id, &intent);
        self.broadcast(events).await?;
        Ok(intent)
    }

    /// Let unseated players move until `id` holds the turn.
    pub async fn bots_until_turn(&mut self, id: &PlayerId) -> io::Result<()> {
        for _ in 0..MAX_BOT_MOVES {
            if self.table.current_turn() == Some(id) {
                return Ok(());
            }
            let events = self.table.random_move();
            self.broadcast(events).await?;
        }
        Err(io::Error::other(format!("{id} never got the turn")))
    }

    /// Send events to every seat.
    pub async fn broadcast(&mut self, events: Vec<ServerEvent>) -> io::Result<()> {
        for event in events {
            for seat in &mut self.seats {
                write_event(&mut seat.stream, event.clone()).await?;
            }
        }
        Ok(())
    }
}

async fn write_event(stream: &mut TcpStream, event: ServerEvent) -> io::Result<()> {
    let frame = event.into_frame().map_err(io::Error::other)?;
    let mut buf = Vec::with_capacity(Frame::PREFIX_SIZE + frame.body_len());
    frame.encode(&mut buf).map_err(io::Error::other)?;
    stream.write_all(&buf).await
}

async fn read_intent(stream: &mut TcpStream) -> io::Result<ClientIntent> {
    let mut prefix = [0u8; Frame::PREFIX_SIZE];
    stream.read_exact(&mut prefix).await?;
    let body_len = Frame::body_len_from_prefix(prefix).map_err(io::Error::other)?;

    let mut body = vec![0u8; body_len];
    stream.read_exact(&mut body).await?;

    let frame = Frame::decode_body(&body).map_err(io::Error::other)?;
    ClientIntent::from_frame(&frame).map_err(io::Error::other)
}
