//-
// Copyright (c) 2026, The Wl2k Authors
//
// This file is part of Wl2k.
//
// Wl2k is free software: you can  redistribute it and/or modify it under the
// terms of  the GNU General Public  License as published by  the Free Software
// Foundation, either version  3 of the License, or (at  your option) any later
// version.
//
// Wl2k is distributed  in the hope  that it will be  useful,  but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Wl2k. If not, see <http://www.gnu.org/licenses/>.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::time::{timeout_at, Instant};

use super::command::{Command, CtrlMsg, Value};
use super::Error;

/// Outbound chunk size. HF links are slow; small chunks keep the abort
/// latency down.
const CHUNK: usize = 512;

/// Maximum bytes we allow queued in the TNC before holding back writes.
pub(crate) const OUT_BUFFER_BUDGET: i64 = 4096;

const WRITE_TIMEOUT: Duration = Duration::from_secs(120);
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Channels a [`Connection`] shares with its owning TNC.
pub(crate) struct Shared {
    pub data_in: Arc<Mutex<mpsc::Receiver<Vec<u8>>>>,
    pub data_out: Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
    pub out_queued: watch::Receiver<i64>,
    pub cmd_tx: mpsc::Sender<String>,
    pub events: broadcast::Sender<CtrlMsg>,
}

/// A dialed ARQ connection: a bidirectional byte stream riding the TNC's
/// data channel.
///
/// Reads drain the data the modem has delivered; a clean end-of-stream is
/// reported once the remote side has disconnected and every buffered byte
/// has been read. Writes are chunked and gated on the modem's outbound
/// queue so a slow link cannot be flooded.
pub struct Connection {
    local: String,
    remote: String,
    bandwidth: String,
    shared: Shared,
    in_flight: i64,
    pending: Vec<u8>,
    eof: bool,
    closed: bool,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .field("bandwidth", &self.bandwidth)
            .field("in_flight", &self.in_flight)
            .field("eof", &self.eof)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Connection {
    pub(crate) fn new(
        local: String,
        remote: String,
        bandwidth: String,
        shared: Shared,
    ) -> Connection {
        Connection {
            local,
            remote,
            bandwidth,
            shared,
            in_flight: 0,
            pending: Vec::new(),
            eof: false,
            closed: false,
        }
    }

    /// Our own callsign.
    pub fn local_call(&self) -> &str {
        &self.local
    }

    /// The dialed station's callsign.
    pub fn remote_call(&self) -> &str {
        &self.remote
    }

    /// The negotiated bandwidth token as reported by CONNECTED.
    pub fn bandwidth(&self) -> &str {
        &self.bandwidth
    }

    /// Read received bytes into `buf`, waiting for data if none is buffered.
    ///
    /// Returns `Ok(0)` at clean end-of-stream, after the remote side has
    /// disconnected and all delivered data has been drained.
    pub async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.pending.is_empty() {
            if self.eof {
                return Ok(0);
            }
            match self.shared.data_in.lock().await.recv().await {
                None => {
                    self.eof = true;
                    return Ok(0);
                },
                Some(chunk) => self.pending = chunk,
            }
        }

        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }

    /// Write with the default deadline. See
    /// [`Connection::write_with_deadline`].
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.write_with_deadline(buf, Instant::now() + WRITE_TIMEOUT)
            .await
    }

    /// Write `buf` to the data channel, chunked to respect the TNC's
    /// outstanding-buffer budget.
    ///
    /// Blocks while the modem's outbound queue is above budget; expiry of
    /// the deadline unblocks with [`Error::Timeout`] without resetting the
    /// TNC.
    pub async fn write_with_deadline(
        &mut self,
        buf: &[u8],
        deadline: Instant,
    ) -> Result<usize, Error> {
        if self.closed {
            return Err(Error::TncClosed);
        }

        for chunk in buf.chunks(CHUNK) {
            self.wait_for_buffer(deadline).await?;

            let mut out = self.shared.data_out.lock().await;
            out.write_all(chunk).await?;
            out.flush().await?;
            drop(out);

            self.in_flight += chunk.len() as i64;
        }
        Ok(buf.len())
    }

    /// Block until the outbound queue has room for another chunk.
    ///
    /// `in_flight` counts bytes written since the last telemetry update;
    /// fresh BUFFERS figures supersede it.
    async fn wait_for_buffer(&mut self, deadline: Instant) -> Result<(), Error> {
        loop {
            if self.shared.out_queued.has_changed().unwrap_or(false) {
                self.in_flight = 0;
            }
            let queued = *self.shared.out_queued.borrow_and_update();
            if queued + self.in_flight < OUT_BUFFER_BUDGET {
                return Ok(());
            }

            match timeout_at(deadline, self.shared.out_queued.changed()).await
            {
                Err(_) => return Err(Error::Timeout),
                Ok(Err(_)) => return Err(Error::TncClosed),
                Ok(Ok(())) => self.in_flight = 0,
            }
        }
    }

    /// Initiate an orderly disconnect and wait, bounded, for the TNC to
    /// confirm. Idempotent.
    pub async fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut events = self.shared.events.subscribe();
        let disconnect =
            CtrlMsg::new(Command::Disconnect, Value::None).to_string();
        if self.shared.cmd_tx.send(disconnect).await.is_err() {
            // TNC already gone; nothing left to wait for
            return Ok(());
        }

        let deadline = Instant::now() + DISCONNECT_TIMEOUT;
        loop {
            match timeout_at(deadline, events.recv()).await {
                Err(_) => {
                    let abort =
                        CtrlMsg::new(Command::Abort, Value::None).to_string();
                    let _ = self.shared.cmd_tx.send(abort).await;
                    return Err(Error::Timeout);
                },
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return Ok(()),
                Ok(Ok(msg)) => match msg.command {
                    Command::Disconnected | Command::Close => return Ok(()),
                    _ => continue,
                },
            }
        }
    }
}
