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

/// A receiver/sender address: an optional protocol prefix and the address
/// proper.
///
/// Bare callsigns and `user@winlink.org` forms carry no protocol and an
/// uppercased address; anything with a foreign domain is routed through the
/// SMTP gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub proto: String,
    pub addr: String,
}

impl Address {
    /// Parse an address string.
    ///
    /// Supported forms: `foo@bar.baz` (SMTP proto), `N0CALL` (short winlink
    /// address), `N0CALL@winlink.org` (full winlink address) and an explicit
    /// `proto:addr` pair.
    pub fn parse(s: &str) -> Address {
        let colon_parts: Vec<&str> = s.split(':').collect();
        let at_parts: Vec<&str> = s.split('@').collect();

        let mut a = if colon_parts.len() == 2 {
            Address {
                proto: colon_parts[0].to_owned(),
                addr: colon_parts[1].to_owned(),
            }
        } else if at_parts.len() == 1 {
            Address {
                proto: String::new(),
                addr: s.to_owned(),
            }
        } else if at_parts[1].eq_ignore_ascii_case("winlink.org") {
            Address {
                proto: String::new(),
                addr: at_parts[0].to_owned(),
            }
        } else {
            Address {
                proto: "SMTP".to_owned(),
                addr: s.to_owned(),
            }
        };

        if a.proto.is_empty() {
            a.addr.make_ascii_uppercase();
        }
        a
    }

    /// Whether the address is unset.
    pub fn is_zero(&self) -> bool {
        self.addr.is_empty()
    }

    /// Whether the given address string parses to this address.
    pub fn equal_string(&self, s: &str) -> bool {
        *self == Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.proto.is_empty() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{}:{}", self.proto, self.addr)
        }
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Address {
        Address::parse(s)
    }
}
