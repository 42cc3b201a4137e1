//! TCP transport for the client.
//!
//! Provides [`ConnectedClient`] which handles socket I/O for frame transport.
//! This is a thin layer that just sends/receives frames - protocol logic
//! remains in the Sans-IO [`crate::Client`].
//!
//! Frames travel back to back on one stream using the length-prefixed layout
//! of [`Frame`]. One reader task and one writer task own the socket halves,
//! so frames are delivered in arrival order.

use bluff_proto::Frame;
use bytes::BytesMut;
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
};

/// Channel depth between the socket tasks and the caller.
const CHANNEL_CAPACITY: usize = 32;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Handle to a connected client with TCP transport.
///
/// Provides channels for frame transport. Frames are sent/received via
/// the channels, and internal tasks handle the socket I/O. `from_server`
/// closes when the server hangs up.
pub struct ConnectedClient {
    /// Send frames to the server.
    pub to_server: mpsc::Sender<Frame>,
    /// Receive frames from the server.
    pub from_server: mpsc::Receiver<Frame>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedClient {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectedClient {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Connect to a Bluff server over TCP.
///
/// Returns a [`ConnectedClient`] with channels for frame transport.
pub async fn connect(server_addr: &str) -> Result<ConnectedClient, TransportError> {
    let stream = TcpStream::connect(server_addr)
        .await
        .map_err(|e| TransportError::Connection(format!("connect to {server_addr} failed: {e}")))?;
    stream
        .set_nodelay(true)
        .map_err(|e| TransportError::Connection(format!("set_nodelay failed: {e}")))?;

    tracing::info!(server = %server_addr, "connected");

    let (reader, writer) = stream.into_split();
    Ok(spawn_io(reader, writer))
}

/// Bridge an arbitrary byte stream to frame channels.
///
/// Must be called within a tokio runtime.
pub fn spawn_io<R, W>(reader: R, writer: W) -> ConnectedClient
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (to_server_tx, to_server_rx) = mpsc::channel::<Frame>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<Frame>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_connection(reader, writer, to_server_rx, from_server_tx));

    ConnectedClient {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    }
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection<R, W>(
    reader: R,
    mut writer: W,
    mut to_server: mpsc::Receiver<Frame>,
    from_server: mpsc::Sender<Frame>,
) where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let recv_handle = tokio::spawn(async move {
        if let Err(e) = read_frames(reader, from_server).await {
            tracing::warn!(error = %e, "receive loop ended");
        }
    });

    // Main loop: send outgoing frames
    while let Some(frame) = to_server.recv().await {
        if let Err(e) = write_frame(&mut writer, &frame).await {
            tracing::warn!(error = %e, name = %frame.name, "send failed");
            break;
        }
    }

    recv_handle.abort();
}

/// Read frames until the stream closes.
///
/// Frames with an unknown event name are skipped; the length prefix lets the
/// stream stay aligned.
async fn read_frames<R>(mut reader: R, tx: mpsc::Sender<Frame>) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(4096);

    loop {
        let mut prefix = [0u8; Frame::PREFIX_SIZE];
        match reader.read_exact(&mut prefix).await {
            Ok(_) => {},
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::info!("server closed the connection");
                return Ok(());
            },
            Err(e) => return Err(TransportError::Stream(format!("prefix read failed: {e}"))),
        }

        let body_len = Frame::body_len_from_prefix(prefix)
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        buf.resize(body_len, 0);
        reader
            .read_exact(&mut buf[..])
            .await
            .map_err(|e| TransportError::Stream(format!("body read failed: {e}")))?;

        let frame = match Frame::decode_body(&buf) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable frame");
                continue;
            },
        };

        tx.send(frame)
            .await
            .map_err(|e| TransportError::Stream(format!("channel send failed: {e}")))?;
    }
}

/// Write one frame.
async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(Frame::PREFIX_SIZE + frame.body_len());
    frame.encode(&mut buf).map_err(|e| TransportError::Protocol(format!("encode failed: {e}")))?;

    writer.write_all(&buf).await.map_err(|e| TransportError::Stream(format!("write failed: {e}")))?;
    writer.flush().await.map_err(|e| TransportError::Stream(format!("flush failed: {e}")))?;

    Ok(())
}
