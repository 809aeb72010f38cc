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

//! Wl2k implements the hard parts of a Winlink 2000 radio-email station: the
//! B2F message format ([`fbb`]) and a connection-oriented transport over an
//! ARDOP software TNC ([`ardop`]).
//!
//! The two subsystems are independent. `fbb` turns structured messages into
//! wire bytes and back; `ardop` turns a TCP-attached modem into a dialable
//! byte stream. Gluing serialized messages onto a dialed connection is the
//! caller's business.

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

pub mod ardop;
pub mod catalog;
pub mod fbb;
pub mod mime;
