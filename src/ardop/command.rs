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

//! The ARDOP control language: one CRLF-terminated ASCII line per message,
//! a command token followed by a command-specific payload.

use std::fmt;

use log::warn;

use super::state::State;

/// Control-channel command tokens.
///
/// Covers every message the TNC is known to emit plus the commands the host
/// sends; tokens this implementation has never heard of land in `Unknown`
/// rather than being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Abort,
    ArqBw,
    ArqCall,
    ArqTimeout,
    AutoBreak,
    Buffer,
    Buffers,
    Busy,
    CancelPending,
    Capture,
    CaptureDevices,
    Close,
    Codec,
    Connected,
    CrcFault,
    Cwid,
    Disconnect,
    Disconnected,
    DriveLevel,
    Fault,
    Frequency,
    GridSquare,
    Initialize,
    InputPeaks,
    Listen,
    MaxConReq,
    MyAux,
    MyCall,
    NewState,
    Offset,
    Pending,
    Playback,
    PlaybackDevices,
    /// The `CMD` prompt.
    Prompt,
    ProtocolMode,
    Ptt,
    SendId,
    State,
    Status,
    Target,
    TwoToneTest,
    Version,
    Unknown(String),
}

impl Command {
    fn from_token(token: &str) -> Command {
        match token.to_ascii_uppercase().as_str() {
            "ABORT" => Command::Abort,
            "ARQBW" => Command::ArqBw,
            "ARQCALL" => Command::ArqCall,
            "ARQTIMEOUT" => Command::ArqTimeout,
            "AUTOBREAK" => Command::AutoBreak,
            "BUFFER" => Command::Buffer,
            "BUFFERS" => Command::Buffers,
            "BUSY" => Command::Busy,
            "CANCELPENDING" => Command::CancelPending,
            "CAPTURE" => Command::Capture,
            "CAPTUREDEVICES" => Command::CaptureDevices,
            "CLOSE" => Command::Close,
            "CMD" => Command::Prompt,
            "CODEC" => Command::Codec,
            "CONNECTED" => Command::Connected,
            "CRCFAULT" => Command::CrcFault,
            "CWID" => Command::Cwid,
            "DISCONNECT" => Command::Disconnect,
            "DISCONNECTED" => Command::Disconnected,
            "DRIVELEVEL" => Command::DriveLevel,
            "FAULT" => Command::Fault,
            "FREQUENCY" => Command::Frequency,
            "GRIDSQUARE" => Command::GridSquare,
            "INITIALIZE" => Command::Initialize,
            "INPUTPEAKS" => Command::InputPeaks,
            "LISTEN" => Command::Listen,
            "MAXCONREQ" => Command::MaxConReq,
            "MYAUX" => Command::MyAux,
            // ARDOP_Win abbreviates MYCALL in some responses
            "MYCALL" | "MYC" => Command::MyCall,
            "NEWSTATE" => Command::NewState,
            "OFFSET" => Command::Offset,
            "PENDING" => Command::Pending,
            "PLAYBACK" => Command::Playback,
            "PLAYBACKDEVICES" => Command::PlaybackDevices,
            "PROTOCOLMODE" => Command::ProtocolMode,
            "PTT" => Command::Ptt,
            "SENDID" => Command::SendId,
            "STATE" => Command::State,
            "STATUS" => Command::Status,
            "TARGET" => Command::Target,
            "TWOTONETEST" => Command::TwoToneTest,
            "VERSION" => Command::Version,
            other => Command::Unknown(other.to_owned()),
        }
    }

    /// The wire spelling of this command.
    pub fn token(&self) -> &str {
        match self {
            Command::Abort => "ABORT",
            Command::ArqBw => "ARQBW",
            Command::ArqCall => "ARQCALL",
            Command::ArqTimeout => "ARQTIMEOUT",
            Command::AutoBreak => "AUTOBREAK",
            Command::Buffer => "BUFFER",
            Command::Buffers => "BUFFERS",
            Command::Busy => "BUSY",
            Command::CancelPending => "CANCELPENDING",
            Command::Capture => "CAPTURE",
            Command::CaptureDevices => "CAPTUREDEVICES",
            Command::Close => "CLOSE",
            Command::Codec => "CODEC",
            Command::Connected => "CONNECTED",
            Command::CrcFault => "CRCFAULT",
            Command::Cwid => "CWID",
            Command::Disconnect => "DISCONNECT",
            Command::Disconnected => "DISCONNECTED",
            Command::DriveLevel => "DRIVELEVEL",
            Command::Fault => "FAULT",
            Command::Frequency => "FREQUENCY",
            Command::GridSquare => "GRIDSQUARE",
            Command::Initialize => "INITIALIZE",
            Command::InputPeaks => "INPUTPEAKS",
            Command::Listen => "LISTEN",
            Command::MaxConReq => "MAXCONREQ",
            Command::MyAux => "MYAUX",
            Command::MyCall => "MYCALL",
            Command::NewState => "NEWSTATE",
            Command::Offset => "OFFSET",
            Command::Pending => "PENDING",
            Command::Playback => "PLAYBACK",
            Command::PlaybackDevices => "PLAYBACKDEVICES",
            Command::Prompt => "CMD",
            Command::ProtocolMode => "PROTOCOLMODE",
            Command::Ptt => "PTT",
            Command::SendId => "SENDID",
            Command::State => "STATE",
            Command::Status => "STATUS",
            Command::Target => "TARGET",
            Command::TwoToneTest => "TWOTONETEST",
            Command::Version => "VERSION",
            Command::Unknown(token) => token,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A command payload. Each command carries exactly one shape; consumers
/// pattern-match.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    String(String),
    StringList(Vec<String>),
    IntList(Vec<i64>),
    State(State),
}

/// One parsed control-channel line.
#[derive(Debug, Clone, PartialEq)]
pub struct CtrlMsg {
    pub command: Command,
    pub value: Value,
}

impl CtrlMsg {
    pub fn new(command: Command, value: Value) -> CtrlMsg {
        CtrlMsg { command, value }
    }
}

impl fmt::Display for CtrlMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command.token())?;
        match &self.value {
            Value::None => Ok(()),
            Value::Bool(true) => f.write_str(" TRUE"),
            Value::Bool(false) => f.write_str(" FALSE"),
            Value::Int(i) => write!(f, " {}", i),
            Value::String(s) => write!(f, " {}", s),
            Value::StringList(list) => write!(f, " {}", list.join(" ")),
            Value::IntList(list) => {
                let rendered: Vec<String> =
                    list.iter().map(i64::to_string).collect();
                write!(f, " {}", rendered.join(" "))
            },
            Value::State(s) => write!(f, " {}", s),
        }
    }
}

/// Parse one line from the TNC's control channel.
pub fn parse_ctrl_msg(line: &str) -> CtrlMsg {
    // ARDOPc appends a trailing space to NEWSTATE
    let line = line.trim();

    let (token, rest) = match line.split_once(' ') {
        Some((token, rest)) => (token, rest),
        None => (line, ""),
    };
    let command = Command::from_token(token);

    // A payload of the form "NOW <value>" is the echo-back of a prior host
    // command and carries the same payload shape.
    let rest = match rest.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("now ") => &rest[4..],
        _ => rest,
    };

    let value = match &command {
        // bool
        Command::Codec
        | Command::Ptt
        | Command::Busy
        | Command::TwoToneTest
        | Command::Cwid
        | Command::Listen
        | Command::AutoBreak => {
            Value::Bool(rest.trim().eq_ignore_ascii_case("true"))
        },

        // state
        Command::NewState | Command::State => {
            Value::State(State::from_token(rest))
        },

        // string
        Command::Fault
        | Command::MyCall
        | Command::GridSquare
        | Command::Capture
        | Command::Playback
        | Command::Version
        | Command::Target
        | Command::Status
        | Command::ArqBw => Value::String(rest.to_owned()),

        // strings, space separated
        Command::Connected => Value::StringList(split_list(rest, ' ')),

        // strings, comma separated
        Command::CaptureDevices | Command::PlaybackDevices | Command::MyAux => {
            Value::StringList(split_list(rest, ','))
        },

        // int
        Command::DriveLevel
        | Command::Buffer
        | Command::ArqTimeout
        | Command::Frequency
        | Command::Offset
        | Command::MaxConReq => match rest.trim().parse() {
            Ok(i) => Value::Int(i),
            Err(err) => {
                warn!("Failed to parse {} value {:?}: {}", command, rest, err);
                Value::Int(0)
            },
        },

        // ints, whitespace separated
        Command::Buffers => Value::IntList(
            rest.split_whitespace()
                .filter_map(|word| match word.parse() {
                    Ok(i) => Some(i),
                    Err(err) => {
                        warn!("Bad BUFFERS entry {:?}: {}", word, err);
                        None
                    },
                })
                .collect(),
        ),

        // payload intentionally ignored
        Command::InputPeaks => Value::None,

        // no payload
        Command::Prompt
        | Command::Disconnected
        | Command::Pending
        | Command::CancelPending
        | Command::SendId
        | Command::CrcFault
        | Command::Abort
        | Command::Disconnect
        | Command::Close => Value::None,

        // echo-back only; payload ignored
        Command::Initialize | Command::ArqCall | Command::ProtocolMode => {
            Value::None
        },

        Command::Unknown(_) => {
            warn!("Unable to parse {:?}", line);
            Value::None
        },
    };

    CtrlMsg { command, value }
}

fn split_list(s: &str, sep: char) -> Vec<String> {
    s.split(sep)
        .map(|part| part.trim().to_owned())
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn strings(list: &[&str]) -> Value {
        Value::StringList(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse() {
        let tests: Vec<(&str, CtrlMsg)> = vec![
            (
                "NEWSTATE SENDID",
                CtrlMsg::new(Command::NewState, Value::State(State::SendId)),
            ),
            // ARDOPc trailing-space workaround
            (
                "NEWSTATE ISS ",
                CtrlMsg::new(Command::NewState, Value::State(State::Iss)),
            ),
            ("PTT True", CtrlMsg::new(Command::Ptt, Value::Bool(true))),
            ("PTT False", CtrlMsg::new(Command::Ptt, Value::Bool(false))),
            ("PTT trUE", CtrlMsg::new(Command::Ptt, Value::Bool(true))),
            ("CODEC True", CtrlMsg::new(Command::Codec, Value::Bool(true))),
            (
                "STATE Disconnected",
                CtrlMsg::new(Command::State, Value::State(State::Disc)),
            ),
            (
                "foobar baz",
                CtrlMsg::new(
                    Command::Unknown("FOOBAR".to_owned()),
                    Value::None,
                ),
            ),
            ("CMD", CtrlMsg::new(Command::Prompt, Value::None)),
            (
                "DISCONNECTED",
                CtrlMsg::new(Command::Disconnected, Value::None),
            ),
            (
                "FAULT 5/Error in the application.",
                CtrlMsg::new(
                    Command::Fault,
                    Value::String("5/Error in the application.".to_owned()),
                ),
            ),
            ("OFFSET -1", CtrlMsg::new(Command::Offset, Value::Int(-1))),
            (
                "BUFFERS 0 723 3 31 453",
                CtrlMsg::new(
                    Command::Buffers,
                    Value::IntList(vec![0, 723, 3, 31, 453]),
                ),
            ),
            (
                "MYC LA5NTA",
                CtrlMsg::new(
                    Command::MyCall,
                    Value::String("LA5NTA".to_owned()),
                ),
            ),
            (
                "GRIDSQUARE JP20QH",
                CtrlMsg::new(
                    Command::GridSquare,
                    Value::String("JP20QH".to_owned()),
                ),
            ),
            (
                "MAXCONREQ 10",
                CtrlMsg::new(Command::MaxConReq, Value::Int(10)),
            ),
            (
                "MYAUX LA5NTA,LE3OF",
                CtrlMsg::new(Command::MyAux, strings(&["LA5NTA", "LE3OF"])),
            ),
            (
                "MYAUX LA5NTA, LE3OF",
                CtrlMsg::new(Command::MyAux, strings(&["LA5NTA", "LE3OF"])),
            ),
            (
                "VERSION 1.4.7.0",
                CtrlMsg::new(
                    Command::Version,
                    Value::String("1.4.7.0".to_owned()),
                ),
            ),
            (
                "CONNECTED W1ABC 500",
                CtrlMsg::new(Command::Connected, strings(&["W1ABC", "500"])),
            ),
            (
                "BUFFER 300",
                CtrlMsg::new(Command::Buffer, Value::Int(300)),
            ),
            ("INPUTPEAKS -3 4", CtrlMsg::new(Command::InputPeaks, Value::None)),
            ("PENDING", CtrlMsg::new(Command::Pending, Value::None)),
            (
                "CANCELPENDING",
                CtrlMsg::new(Command::CancelPending, Value::None),
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(expected, parse_ctrl_msg(input), "parsing {input:?}");
        }
    }

    #[test]
    fn echo_back_prefix_is_stripped() {
        assert_eq!(
            CtrlMsg::new(Command::Listen, Value::Bool(true)),
            parse_ctrl_msg("LISTEN now true")
        );
        assert_eq!(
            CtrlMsg::new(Command::ArqBw, Value::String("500MAX".to_owned())),
            parse_ctrl_msg("ARQBW NOW 500MAX")
        );
    }

    #[test]
    fn missing_payload_is_harmless() {
        assert_eq!(
            CtrlMsg::new(Command::Ptt, Value::Bool(false)),
            parse_ctrl_msg("PTT")
        );
        assert_eq!(
            CtrlMsg::new(Command::Buffers, Value::IntList(vec![])),
            parse_ctrl_msg("BUFFERS")
        );
    }

    #[test]
    fn emit_host_commands() {
        assert_eq!(
            "ARQCALL W1ABC 10",
            CtrlMsg::new(
                Command::ArqCall,
                Value::String("W1ABC 10".to_owned())
            )
            .to_string()
        );
        assert_eq!(
            "CODEC TRUE",
            CtrlMsg::new(Command::Codec, Value::Bool(true)).to_string()
        );
        assert_eq!(
            "LISTEN FALSE",
            CtrlMsg::new(Command::Listen, Value::Bool(false)).to_string()
        );
        assert_eq!(
            "DISCONNECT",
            CtrlMsg::new(Command::Disconnect, Value::None).to_string()
        );
        assert_eq!(
            "BUFFERS 0 723 3 31 453",
            CtrlMsg::new(
                Command::Buffers,
                Value::IntList(vec![0, 723, 3, 31, 453])
            )
            .to_string()
        );
        assert_eq!(
            "NEWSTATE ISS",
            CtrlMsg::new(Command::NewState, Value::State(State::Iss))
                .to_string()
        );
    }

    #[test]
    fn parse_emit_round_trip() {
        for line in [
            "PTT TRUE",
            "CONNECTED W1ABC 500",
            "BUFFERS 0 723 3 31 453",
            "FAULT 5/Error in the application.",
            "DISCONNECTED",
            "NEWSTATE ISS",
        ] {
            assert_eq!(line, parse_ctrl_msg(line).to_string(), "line {line:?}");
        }
    }
}
