#![cfg(feature = "std")]

//! Stand-in for the IR pair when the two players sit on different hosts.

use std::io::ErrorKind;

use log::{info, warn};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::link::Link;

/// One byte per slot over a TCP stream, driven with non-blocking
/// `try_read`/`try_write` so it can be polled from the tick loop.
pub struct TcpLink {
    stream: TcpStream,
    lookahead: Option<u8>,
    closed: bool,
}

fn map_io_error(e: std::io::Error) -> anyhow::Error {
    if e.kind() == ErrorKind::BrokenPipe || e.kind() == ErrorKind::ConnectionReset {
        anyhow::anyhow!("Connection closed by peer")
    } else {
        anyhow::anyhow!("TCP link error: {}", e)
    }
}

impl TcpLink {
    pub fn new(stream: TcpStream) -> anyhow::Result<Self> {
        stream.set_nodelay(true).map_err(map_io_error)?;
        Ok(Self {
            stream,
            lookahead: None,
            closed: false,
        })
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await.map_err(map_io_error)?;
        if let Ok(peer) = stream.peer_addr() {
            info!("Connected to {}", peer);
        }
        Self::new(stream)
    }

    /// Wait for a single peer on `addr`.
    pub async fn accept<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(map_io_error)?;
        if let Ok(local) = listener.local_addr() {
            info!("Waiting for peer on {}", local);
        }
        let (stream, peer) = listener.accept().await.map_err(map_io_error)?;
        info!("Peer connected from {}", peer);
        Self::new(stream)
    }

    /// Whether the peer has hung up.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn fill_lookahead(&mut self) {
        if self.lookahead.is_some() || self.closed {
            return;
        }
        let mut buf = [0u8; 1];
        match self.stream.try_read(&mut buf) {
            Ok(0) => {
                warn!("TCP peer closed the connection");
                self.closed = true;
            }
            Ok(_) => self.lookahead = Some(buf[0]),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => {
                warn!("TCP read failed: {}", e);
                self.closed = true;
            }
        }
    }
}

impl Link for TcpLink {
    fn is_write_ready(&mut self) -> bool {
        !self.closed
    }

    fn is_read_ready(&mut self) -> bool {
        self.fill_lookahead();
        self.lookahead.is_some()
    }

    fn put_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        if self.closed {
            return Err(anyhow::anyhow!("Connection closed by peer"));
        }
        match self.stream.try_write(&[byte]) {
            Ok(1) => Ok(()),
            Ok(_) => Err(anyhow::anyhow!("TCP link accepted no data")),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                Err(anyhow::anyhow!("TCP send buffer full"))
            }
            Err(e) => {
                self.closed = true;
                Err(map_io_error(e))
            }
        }
    }

    fn get_byte(&mut self) -> anyhow::Result<u8> {
        self.fill_lookahead();
        self.lookahead
            .take()
            .ok_or_else(|| anyhow::anyhow!("No byte available on TCP link"))
    }
}
