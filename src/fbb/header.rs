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

use std::io::{self, BufRead};

use super::Error;

/// The order well-known fields are emitted in; everything else follows in
/// insertion order. B2F peers key on field names rather than position, but
/// keeping the customary layout makes transcripts diff cleanly against other
/// clients.
const PREFERRED_ORDER: &[&str] = &[
    "Mid",
    "Date",
    "Type",
    "From",
    "To",
    "Cc",
    "Subject",
    "Mst",
    "Mbo",
    "Body",
    "Content-Type",
    "Content-Transfer-Encoding",
    "File",
];

/// An ordered, case-insensitive multimap of B2F header fields.
///
/// Field names are canonicalized on insert (`content-type` becomes
/// `Content-Type`); duplicate fields (To, Cc, File) keep their relative
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: Vec<(String, String)>,
}

/// Canonicalize a header name: the first letter and every letter following a
/// `-` are uppercased, the rest lowered. Names containing bytes illegal in a
/// MIME header key are returned unchanged.
pub fn canonical_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_owned();
    }

    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for b in name.bytes() {
        if upper {
            out.push(char::from(b.to_ascii_uppercase()));
        } else {
            out.push(char::from(b.to_ascii_lowercase()));
        }
        upper = b == b'-';
    }
    out
}

fn is_token_byte(b: u8) -> bool {
    // RFC 7230 token characters; enough to cover every field B2F uses
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-'
        | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z')
}

impl Header {
    pub fn new() -> Self {
        Header::default()
    }

    /// The first value of the named field, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = canonical_key(name);
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values of the named field, in insertion order.
    pub fn get_all<'a>(&'a self, name: &str) -> Vec<&'a str> {
        let key = canonical_key(name);
        self.fields
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Append a value to the named field.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((canonical_key(name), value.into()));
    }

    /// Replace every value of the named field with a single one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_key(name);
        self.fields.retain(|(k, _)| *k != key);
        self.fields.push((key, value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let preferred = PREFERRED_ORDER.iter().flat_map(move |&key| {
            self.fields
                .iter()
                .filter(move |(k, _)| *k == key)
                .map(|(k, v)| (k.as_str(), v.as_str()))
        });
        let rest = self
            .fields
            .iter()
            .filter(|(k, _)| !PREFERRED_ORDER.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()));
        preferred.chain(rest)
    }

    /// Emit every field as `Name: value\r\n`.
    pub fn write(&self, w: &mut impl io::Write) -> io::Result<()> {
        for (name, value) in self.iter() {
            write!(w, "{}: {}\r\n", name, value)?;
        }
        Ok(())
    }

    /// Read MIME-style header fields up to and including the blank line.
    ///
    /// Lines may end in CRLF or bare LF. A continuation line (leading space
    /// or tab) folds into the previous field's value with a single space.
    pub fn read_from(r: &mut impl BufRead) -> Result<Header, Error> {
        let mut header = Header::new();
        let mut line = String::new();

        loop {
            line.clear();
            let n = r.read_line(&mut line)?;
            if n == 0 {
                // Headers must terminate with a blank line
                return Err(Error::MalformedHeader("unexpected EOF".to_owned()));
            }

            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                return Ok(header);
            }

            if trimmed.starts_with(' ') || trimmed.starts_with('\t') {
                match header.fields.last_mut() {
                    Some((_, value)) => {
                        value.push(' ');
                        value.push_str(trimmed.trim_start());
                        continue;
                    },
                    None => {
                        return Err(Error::MalformedHeader(trimmed.to_owned()))
                    },
                }
            }

            let (name, value) = trimmed
                .split_once(':')
                .ok_or_else(|| Error::MalformedHeader(trimmed.to_owned()))?;
            if name.is_empty() {
                return Err(Error::MalformedHeader(trimmed.to_owned()));
            }
            header.add(name, value.trim_start());
        }
    }
}
