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
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt,
    BufReader,
};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{timeout_at, Instant};

use super::command::{parse_ctrl_msg, Command, CtrlMsg, Value};
use super::conn::{Connection, Shared};
use super::state::State;
use super::url::{Bandwidth, DialUrl};
use super::Error;

const ARQ_CALL_REPEATS: u32 = 10;
const OPEN_TIMEOUT: Duration = Duration::from_secs(10);
const DIAL_TIMEOUT: Duration = Duration::from_secs(90);

/// Flags and telemetry tracked from the TNC's asynchronous notifications.
#[derive(Debug, Clone, Default)]
struct TncState {
    state: State,
    codec: bool,
    ptt: bool,
    busy: bool,
    pending: bool,
    buffers: [i64; 5],
    connected: Option<(String, String)>,
    last_fault: Option<String>,
}

/// A TCP-attached ARDOP TNC.
///
/// Owns the control and data sockets exclusively. Three background tasks
/// service them: a control reader demultiplexing notifications into a typed
/// event stream, a data reader pumping received bytes into a bounded queue,
/// and a command writer, the only task allowed to emit on the control
/// socket.
pub struct Tnc {
    mycall: String,
    cmd_tx: mpsc::Sender<String>,
    events: broadcast::Sender<CtrlMsg>,
    state: Arc<Mutex<TncState>>,
    out_queued: watch::Receiver<i64>,
    data_in: Arc<tokio::sync::Mutex<mpsc::Receiver<Vec<u8>>>>,
    data_out: Arc<tokio::sync::Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
    closed: bool,
}

impl Tnc {
    /// Connect to a TNC listening on the given control and data addresses.
    pub async fn connect(
        ctrl_addr: &str,
        data_addr: &str,
        mycall: &str,
    ) -> Result<Tnc, Error> {
        let ctrl = TcpStream::connect(ctrl_addr).await?;
        let data = TcpStream::connect(data_addr).await?;
        Tnc::open(ctrl, data, mycall).await
    }

    /// Attach to a TNC over the given control and data streams and bring
    /// the codec up.
    ///
    /// Sends the initialization sequence and waits for the TNC to confirm
    /// the codec is running.
    pub async fn open<C, D>(
        ctrl: C,
        data: D,
        mycall: &str,
    ) -> Result<Tnc, Error>
    where
        C: AsyncRead + AsyncWrite + Send + 'static,
        D: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (ctrl_r, ctrl_w) = tokio::io::split(ctrl);
        let (data_r, data_w) = tokio::io::split(data);

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, _) = broadcast::channel(64);
        let (buffers_tx, buffers_rx) = watch::channel(0i64);
        let (data_tx, data_rx) = mpsc::channel(32);
        let state = Arc::new(Mutex::new(TncState {
            state: State::Disc,
            ..TncState::default()
        }));

        tokio::spawn(write_commands(ctrl_w, cmd_rx));
        tokio::spawn(read_control(
            ctrl_r,
            event_tx.clone(),
            Arc::clone(&state),
            buffers_tx,
        ));
        tokio::spawn(pump_data(data_r, data_tx));

        let data_w: Box<dyn AsyncWrite + Send + Unpin> = Box::new(data_w);
        let mut tnc = Tnc {
            mycall: mycall.to_owned(),
            cmd_tx,
            events: event_tx,
            state,
            out_queued: buffers_rx,
            data_in: Arc::new(tokio::sync::Mutex::new(data_rx)),
            data_out: Arc::new(tokio::sync::Mutex::new(data_w)),
            closed: false,
        };
        tnc.init().await?;
        Ok(tnc)
    }

    async fn init(&mut self) -> Result<(), Error> {
        let mut events = self.events.subscribe();

        self.command(CtrlMsg::new(Command::Initialize, Value::None))
            .await?;
        self.command(CtrlMsg::new(
            Command::MyCall,
            Value::String(self.mycall.clone()),
        ))
        .await?;
        self.command(CtrlMsg::new(
            Command::ProtocolMode,
            Value::String("ARQ".to_owned()),
        ))
        .await?;
        self.command(CtrlMsg::new(Command::Codec, Value::Bool(true)))
            .await?;
        self.command(CtrlMsg::new(Command::Listen, Value::Bool(false)))
            .await?;

        // Nothing the TNC says is trustworthy until the codec is confirmed
        // up.
        let deadline = Instant::now() + OPEN_TIMEOUT;
        loop {
            match timeout_at(deadline, events.recv()).await {
                Err(_) => return Err(Error::Timeout),
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(Error::TncClosed)
                },
                Ok(Ok(msg)) => match (msg.command, msg.value) {
                    (Command::Codec, Value::Bool(true)) => return Ok(()),
                    (Command::Fault, Value::String(fault)) => {
                        return Err(Error::Fault(fault))
                    },
                    (Command::Close, _) => return Err(Error::TncClosed),
                    _ => continue,
                },
            }
        }
    }

    async fn command(&self, msg: CtrlMsg) -> Result<(), Error> {
        self.cmd_tx
            .send(msg.to_string())
            .await
            .map_err(|_| Error::TncClosed)
    }

    pub fn mycall(&self) -> &str {
        &self.mycall
    }

    /// The current protocol state.
    pub fn state(&self) -> State {
        self.state.lock().unwrap().state
    }

    /// Whether the channel is busy.
    pub fn busy(&self) -> bool {
        self.state.lock().unwrap().busy
    }

    /// Whether PTT is keyed.
    pub fn ptt(&self) -> bool {
        self.state.lock().unwrap().ptt
    }

    /// Whether an inbound connect request is pending. External scanners
    /// should pause while this is set.
    pub fn pending(&self) -> bool {
        self.state.lock().unwrap().pending
    }

    /// The last BUFFERS telemetry vector.
    pub fn buffers(&self) -> [i64; 5] {
        self.state.lock().unwrap().buffers
    }

    /// The connected peer and bandwidth, when connected.
    pub fn connected_peer(&self) -> Option<(String, String)> {
        self.state.lock().unwrap().connected.clone()
    }

    /// The most recent FAULT message, if any.
    pub fn last_fault(&self) -> Option<String> {
        self.state.lock().unwrap().last_fault.clone()
    }

    /// Dial an `ardop://<target>[?bw=<bandwidth>]` URL.
    pub async fn dial_url(&mut self, url: &str) -> Result<Connection, Error> {
        let url = DialUrl::parse(url)?;
        self.dial_opt(&url.target, url.bandwidth, DIAL_TIMEOUT).await
    }

    /// Dial a remote callsign with the default deadline.
    pub async fn dial(&mut self, target: &str) -> Result<Connection, Error> {
        self.dial_opt(target, None, DIAL_TIMEOUT).await
    }

    /// Dial a remote callsign, bounding the wait for the link to come up.
    pub async fn dial_with_timeout(
        &mut self,
        target: &str,
        timeout: Duration,
    ) -> Result<Connection, Error> {
        self.dial_opt(target, None, timeout).await
    }

    async fn dial_opt(
        &mut self,
        target: &str,
        bw: Option<Bandwidth>,
        timeout: Duration,
    ) -> Result<Connection, Error> {
        if self.closed || !self.state.lock().unwrap().codec {
            return Err(Error::TncClosed);
        }

        if let Some(bw) = bw {
            self.command(CtrlMsg::new(
                Command::ArqBw,
                Value::String(bw.to_string()),
            ))
            .await?;
        }

        // Subscribe before ARQCALL so the response cannot be missed
        let mut events = self.events.subscribe();
        self.command(CtrlMsg::new(
            Command::ArqCall,
            Value::String(format!("{} {}", target, ARQ_CALL_REPEATS)),
        ))
        .await?;

        let deadline = Instant::now() + timeout;
        loop {
            match timeout_at(deadline, events.recv()).await {
                Err(_) => {
                    let _ = self
                        .command(CtrlMsg::new(Command::Abort, Value::None))
                        .await;
                    return Err(Error::Timeout);
                },
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(Error::TncClosed)
                },
                Ok(Ok(msg)) => match (msg.command, msg.value) {
                    (Command::Connected, Value::StringList(parts))
                        if parts
                            .first()
                            .is_some_and(|p| p.eq_ignore_ascii_case(target)) =>
                    {
                        let bandwidth =
                            parts.get(1).cloned().unwrap_or_default();
                        return Ok(Connection::new(
                            self.mycall.clone(),
                            parts[0].clone(),
                            bandwidth,
                            self.shared(),
                        ));
                    },
                    (Command::Disconnected, _) => {
                        return Err(Error::ConnectFailed)
                    },
                    (Command::Fault, Value::String(fault)) => {
                        return Err(Error::Fault(fault))
                    },
                    (Command::Close, _) => return Err(Error::TncClosed),
                    _ => continue,
                },
            }
        }
    }

    fn shared(&self) -> Shared {
        Shared {
            data_in: Arc::clone(&self.data_in),
            data_out: Arc::clone(&self.data_out),
            out_queued: self.out_queued.clone(),
            cmd_tx: self.cmd_tx.clone(),
            events: self.events.clone(),
        }
    }

    /// Shut the TNC down, releasing the codec and sound card. Idempotent.
    pub async fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let _ = self
            .command(CtrlMsg::new(Command::Close, Value::None))
            .await;

        let mut st = self.state.lock().unwrap();
        st.codec = false;
        st.state = State::Offline;
        Ok(())
    }
}

async fn write_commands<W>(mut w: W, mut rx: mpsc::Receiver<String>)
where
    W: AsyncWrite + Send + Unpin,
{
    while let Some(line) = rx.recv().await {
        debug!("ardop> {}", line);
        let io = async {
            w.write_all(line.as_bytes()).await?;
            w.write_all(b"\r\n").await?;
            w.flush().await?;
            io::Result::Ok(())
        };
        if let Err(err) = io.await {
            warn!("Control channel write failed: {}", err);
            break;
        }
    }
}

async fn read_control<R>(
    r: R,
    events: broadcast::Sender<CtrlMsg>,
    state: Arc<Mutex<TncState>>,
    buffers: watch::Sender<i64>,
) where
    R: AsyncRead + Send + Unpin,
{
    let mut r = BufReader::new(r);
    let mut line = Vec::new();

    loop {
        line.clear();
        match r.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {},
            Err(err) => {
                warn!("Control channel read failed: {}", err);
                break;
            },
        }

        let text = String::from_utf8_lossy(&line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        debug!("ardop< {}", text);

        let msg = parse_ctrl_msg(text);
        track(&state, &buffers, &msg);
        let _ = events.send(msg);
    }

    // Waiting operations must not hang on a dead control channel
    {
        let mut st = state.lock().unwrap();
        st.codec = false;
        st.state = State::Offline;
    }
    let _ = events.send(CtrlMsg::new(Command::Close, Value::None));
}

/// Apply one notification to the tracked modem state.
fn track(
    state: &Mutex<TncState>,
    buffers: &watch::Sender<i64>,
    msg: &CtrlMsg,
) {
    let mut st = state.lock().unwrap();
    match (&msg.command, &msg.value) {
        (Command::Codec, Value::Bool(on)) => {
            st.codec = *on;
            if !*on {
                st.state = State::Offline;
            }
        },
        (Command::Pending, _) => st.pending = true,
        (Command::CancelPending, _) => st.pending = false,
        (Command::NewState, Value::State(s))
        | (Command::State, Value::State(s)) => st.state = *s,
        (Command::Connected, Value::StringList(parts)) => {
            st.connected = Some((
                parts.first().cloned().unwrap_or_default(),
                parts.get(1).cloned().unwrap_or_default(),
            ));
        },
        (Command::Disconnected, _) => {
            st.state = State::Disc;
            st.connected = None;
            st.pending = false;
        },
        // A FAULT does not itself change state; a NEWSTATE follows
        (Command::Fault, Value::String(fault)) => {
            st.last_fault = Some(fault.clone());
        },
        (Command::Busy, Value::Bool(b)) => st.busy = *b,
        (Command::Ptt, Value::Bool(b)) => st.ptt = *b,
        (Command::Buffers, Value::IntList(values)) => {
            for (slot, value) in st.buffers.iter_mut().zip(values) {
                *slot = *value;
            }
            let _ = buffers.send(st.buffers[2]);
        },
        (Command::Buffer, Value::Int(queued)) => {
            st.buffers[2] = *queued;
            let _ = buffers.send(*queued);
        },
        _ => {},
    }
}

async fn pump_data<R>(mut r: R, tx: mpsc::Sender<Vec<u8>>)
where
    R: AsyncRead + Send + Unpin,
{
    let mut buf = [0u8; 2048];
    loop {
        match r.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            },
            Err(err) => {
                warn!("Data channel read failed: {}", err);
                break;
            },
        }
    }
}
