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

use super::{Error, Message};

/// B2F proposal codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropCode {
    /// Plain Winlink message
    Wl2k,
    /// Gzip-compressed Winlink message
    Gzip,
}

impl PropCode {
    /// The single-character code used on the wire.
    pub fn as_char(self) -> char {
        match self {
            PropCode::Wl2k => 'B',
            PropCode::Gzip => 'D',
        }
    }
}

/// A transfer proposal: everything an outbound session needs to offer a
/// message to the remote side.
///
/// The proposal carries the whole serialized message; compression and
/// transfer-level framing belong to the session protocol on top.
#[derive(Debug, Clone)]
pub struct Proposal {
    mid: String,
    title: String,
    code: PropCode,
    data: Vec<u8>,
}

impl Proposal {
    pub fn new(
        mid: impl Into<String>,
        title: impl Into<String>,
        code: PropCode,
        data: Vec<u8>,
    ) -> Proposal {
        Proposal {
            mid: mid.into(),
            title: title.into(),
            code,
            data,
        }
    }

    pub fn mid(&self) -> &str {
        &self.mid
    }

    /// The decoded message subject.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> PropCode {
        self.code
    }

    /// The serialized message.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Message {
    /// Derive a transfer proposal from this message.
    ///
    /// The message is validated first; a message that fails validation
    /// yields no proposal.
    pub fn proposal(&self, code: PropCode) -> Result<Proposal, Error> {
        self.validate()?;
        let data = self.bytes()?;
        Ok(Proposal::new(self.mid(), self.subject(), code, data))
    }
}

#[cfg(test)]
mod test {
    use super::super::MsgType;
    use super::*;

    #[test]
    fn proposal_from_valid_message() {
        let mut msg = Message::new(MsgType::Private, "LA5NTA");
        msg.add_to("N0CALL");
        msg.set_subject("Ferry schedule");
        msg.set_body("Departs at noon.\r\n").unwrap();

        let prop = msg.proposal(PropCode::Wl2k).unwrap();
        assert_eq!(msg.mid(), prop.mid());
        assert_eq!("Ferry schedule", prop.title());
        assert_eq!('B', prop.code().as_char());
        assert_eq!(msg.bytes().unwrap(), prop.data());
        assert!(prop.size() > 0);
    }

    #[test]
    fn invalid_message_yields_no_proposal() {
        let msg = Message::new(MsgType::Private, "LA5NTA");
        assert_matches!(
            Err(Error::Validation(_)),
            msg.proposal(PropCode::Gzip)
        );
    }

    #[test]
    fn code_chars() {
        assert_eq!('B', PropCode::Wl2k.as_char());
        assert_eq!('D', PropCode::Gzip.as_char());
    }
}
