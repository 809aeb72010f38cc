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

use std::fmt;

/// Protocol states reported by the ARDOP TNC via NEWSTATE/STATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// A state this implementation does not know about.
    #[default]
    Unknown,
    /// Codec stopped; the TNC will not move until CODEC TRUE.
    Offline,
    /// No ARQ connection.
    Disc,
    /// Information Sending Station (connected, we hold the link).
    Iss,
    /// Information Receiving Station (connected, the peer holds the link).
    Irs,
    /// Link turnover from IRS to ISS in progress.
    IrsToIss,
    Quiet,
    /// Sending an ID frame.
    SendId,
    GenId,
    TwoToneTest,
    /// FEC broadcast transmission.
    FecSend,
    /// FEC broadcast reception.
    FecRcv,
}

impl State {
    /// Case-insensitive lookup of a state token as the TNC spells it.
    pub fn from_token(token: &str) -> State {
        match token.trim().to_ascii_uppercase().as_str() {
            "OFFLINE" => State::Offline,
            "DISC" | "DISCONNECTED" => State::Disc,
            "ISS" => State::Iss,
            "IRS" => State::Irs,
            "IRSTOISS" => State::IrsToIss,
            "QUIET" => State::Quiet,
            "SENDID" => State::SendId,
            "GENID" => State::GenId,
            "TWOTONETEST" => State::TwoToneTest,
            "FECSEND" => State::FecSend,
            "FECRCV" => State::FecRcv,
            _ => State::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            State::Unknown => "UNKNOWN",
            State::Offline => "OFFLINE",
            State::Disc => "DISC",
            State::Iss => "ISS",
            State::Irs => "IRS",
            State::IrsToIss => "IRSTOISS",
            State::Quiet => "QUIET",
            State::SendId => "SENDID",
            State::GenId => "GENID",
            State::TwoToneTest => "TWOTONETEST",
            State::FecSend => "FECSEND",
            State::FecRcv => "FECRCV",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
