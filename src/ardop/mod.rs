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

//! Transport over an ARDOP TNC.
//!
//! The TNC is an external modem process reached over a pair of TCP sockets:
//! a control socket speaking a CRLF-delimited ASCII command language
//! ([`parse_ctrl_msg`]) and a data socket carrying the ARQ payload stream.
//! [`Tnc`] owns both sockets, tracks the modem state from its asynchronous
//! notifications, and hands out a dialable byte stream ([`Connection`]).
//!
//! Everything here is cooperative: callers send a command and then await a
//! specific event with a deadline. A deadline expiry unblocks the caller and
//! sends a cooperative ABORT, but never resets the TNC behind its back.

mod command;
mod conn;
mod state;
mod tnc;
mod url;

pub use self::command::{parse_ctrl_msg, Command, CtrlMsg, Value};
pub use self::conn::Connection;
pub use self::state::State;
pub use self::tnc::Tnc;
pub use self::url::{Bandwidth, DialUrl};

use std::io;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("unsupported scheme: {0:?}")]
    UnsupportedScheme(String),
    #[error("missing target callsign")]
    MissingTarget,
    #[error("invalid ARQ bandwidth: {0:?}")]
    InvalidBandwidth(String),
    #[error("TNC closed")]
    TncClosed,
    #[error("connect failed")]
    ConnectFailed,
    #[error("TNC fault: {0}")]
    Fault(String),
    #[error("operation timed out")]
    Timeout,
    #[error(transparent)]
    Io(#[from] io::Error),
}
