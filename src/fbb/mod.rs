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

//! The Winlink 2000 Message Structure (B2F): a MIME-like header block, a
//! length-prefixed binary body and length-prefixed attachments, all framed
//! with CRLF. See <https://winlink.org/B2F>.
//!
//! Every byte matters here. The format is shared with the Winlink CMS and
//! every other client on the air, and some of the tolerances in the parser
//! (leading CRLFs, alternative date layouts, UTF-8 encoded words in file
//! names) exist because deployed software emits them.

mod address;
mod date;
mod header;
mod mid;
mod proposal;

pub use self::address::Address;
pub use self::date::{format_date, parse_date, DATE_LAYOUT};
pub use self::header::{canonical_key, Header};
pub use self::mid::generate_mid;
pub use self::proposal::{PropCode, Proposal};

use std::fmt;
use std::io::{self, BufRead, Read, Write};

use chrono::{DateTime, Local, Utc};
use thiserror::Error as ThisError;

use crate::mime::charset::{self, CharsetError, DEFAULT_CHARSET};
use crate::mime::encoded_word::{decode_header, encode_word};

pub const HEADER_MID: &str = "Mid";
pub const HEADER_DATE: &str = "Date";
pub const HEADER_TYPE: &str = "Type";
pub const HEADER_FROM: &str = "From";
pub const HEADER_TO: &str = "To";
pub const HEADER_CC: &str = "Cc";
pub const HEADER_SUBJECT: &str = "Subject";
pub const HEADER_MBO: &str = "Mbo";
pub const HEADER_BODY: &str = "Body";
pub const HEADER_FILE: &str = "File";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";

/// The only transfer encoding Winlink clients actually use.
pub const DEFAULT_TRANSFER_ENCODING: &str = "8bit";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("malformed file header: {0:?}")]
    MalformedFileHeader(String),
    #[error("unexpected end of section")]
    BadSectionEnd,
    #[error("short read: wanted {want} bytes")]
    ShortRead {
        want: usize,
        /// The bytes that were read before the stream ran dry, for
        /// diagnostics.
        partial: Vec<u8>,
    },
    #[error("unparseable date: {0:?}")]
    BadDate(String),
    #[error("empty attachment file name")]
    EmptyFileName,
    #[error(transparent)]
    Charset(#[from] CharsetError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The error type returned by functions validating a message, carrying the
/// field or part of the message that is not valid.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{field}: {msg}")]
pub struct ValidationError {
    pub field: &'static str,
    pub msg: String,
}

impl ValidationError {
    fn new(field: &'static str, msg: impl Into<String>) -> Self {
        ValidationError {
            field,
            msg: msg.into(),
        }
    }
}

/// Message types the Winlink system recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgType {
    Private,
    Service,
    Inquiry,
    PositionReport,
    Option,
    System,
}

impl MsgType {
    pub fn as_str(self) -> &'static str {
        match self {
            MsgType::Private => "Private",
            MsgType::Service => "Service",
            MsgType::Inquiry => "Inquiry",
            MsgType::PositionReport => "Position Report",
            MsgType::Option => "Option",
            MsgType::System => "System",
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attachment: a named byte blob, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    data: Vec<u8>,
}

impl File {
    /// Create a new attachment. A B2F file must have an associated name.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<File, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyFileName);
        }
        Ok(File { name, data })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// A copy of the attachment content.
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }
}

impl serde::Serialize for File {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("File", 2)?;
        s.serialize_field("Name", &self.name)?;
        s.serialize_field("Size", &self.size())?;
        s.end()
    }
}

/// A Winlink 2000 message.
///
/// The header names are case-insensitive; common fields should normally be
/// accessed through the typed methods rather than [`Message::header`]
/// directly. A `Message` is not safe for concurrent mutation.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub header: Header,
    body: Vec<u8>,
    files: Vec<File>,
}

impl Message {
    /// Initialize a new message with Mid, Date, Type, From and Mbo set.
    pub fn new(t: MsgType, mycall: &str) -> Message {
        let mut msg = Message::default();
        msg.header.set(HEADER_MID, generate_mid(mycall));
        msg.set_date(Utc::now());
        msg.set_from(mycall);
        msg.header.set(HEADER_MBO, mycall);
        msg.header.set(HEADER_TYPE, t.as_str());
        msg
    }

    /// The unique identifier of this message across the Winlink system.
    pub fn mid(&self) -> &str {
        self.header.get(HEADER_MID).unwrap_or("")
    }

    /// The message type, verbatim from the header.
    pub fn msg_type(&self) -> &str {
        self.header.get(HEADER_TYPE).unwrap_or("")
    }

    /// The mailbox operator origin of this message.
    pub fn mbo(&self) -> &str {
        self.header.get(HEADER_MBO).unwrap_or("")
    }

    /// Set the subject field.
    ///
    /// The format only allows ASCII in headers; anything else is Q-encoded
    /// per RFC 2047.
    pub fn set_subject(&mut self, subject: &str) {
        self.header.set(HEADER_SUBJECT, encode_word(subject));
    }

    /// The subject field, with any encoded words decoded.
    pub fn subject(&self) -> String {
        decode_header(self.header.get(HEADER_SUBJECT).unwrap_or(""))
    }

    /// Set the From field. The SMTP: prefix is added if needed, see
    /// [`Address::parse`].
    pub fn set_from(&mut self, addr: &str) {
        self.header
            .set(HEADER_FROM, Address::parse(addr).to_string());
    }

    /// The From field as an [`Address`].
    pub fn from_addr(&self) -> Address {
        Address::parse(self.header.get(HEADER_FROM).unwrap_or(""))
    }

    /// Set the Date field in the canonical layout, UTC.
    pub fn set_date(&mut self, t: DateTime<Utc>) {
        self.header.set(HEADER_DATE, format_date(t));
    }

    /// The Date field parsed per the Winlink format.
    ///
    /// Parse errors are swallowed here; serialization checks them.
    pub fn date(&self) -> Option<DateTime<Local>> {
        parse_date(self.header.get(HEADER_DATE).unwrap_or(""))
            .ok()
            .flatten()
    }

    /// Set the body using the default charset. See
    /// [`Message::set_body_with_charset`].
    pub fn set_body(&mut self, body: &str) -> Result<(), Error> {
        self.set_body_with_charset(DEFAULT_CHARSET, body)
    }

    /// Transcode and set the body according to the given charset, updating
    /// the Content-Type, Content-Transfer-Encoding and Body fields to match.
    pub fn set_body_with_charset(
        &mut self,
        cs: &str,
        body: &str,
    ) -> Result<(), Error> {
        let bytes = charset::encode(cs, body)?;
        self.header.set(
            HEADER_CONTENT_TRANSFER_ENCODING,
            DEFAULT_TRANSFER_ENCODING,
        );
        self.header
            .set(HEADER_CONTENT_TYPE, format!("text/plain; charset={}", cs));
        self.header.set(HEADER_BODY, bytes.len().to_string());
        self.body = bytes;
        Ok(())
    }

    /// The body decoded to UTF-8 via the message's charset.
    pub fn body(&self) -> Result<String, Error> {
        Ok(charset::decode(&self.charset(), &self.body)?)
    }

    /// The expected size of the body in bytes, as defined in the header.
    pub fn body_size(&self) -> usize {
        self.header
            .get(HEADER_BODY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// The body character encoding from the Content-Type field, or the
    /// default when unset or unreadable.
    pub fn charset(&self) -> String {
        let ct = self.header.get(HEADER_CONTENT_TYPE).unwrap_or("");
        for param in ct.split(';').skip(1) {
            if let Some((k, v)) = param.split_once('=') {
                if k.trim().eq_ignore_ascii_case("charset") {
                    return v.trim().trim_matches('"').to_owned();
                }
            }
        }
        DEFAULT_CHARSET.to_owned()
    }

    /// Add a primary receiver. The SMTP: prefix is added if needed.
    pub fn add_to(&mut self, addr: &str) {
        self.header.add(HEADER_TO, Address::parse(addr).to_string());
    }

    /// Add a carbon-copy receiver. The SMTP: prefix is added if needed.
    pub fn add_cc(&mut self, addr: &str) {
        self.header.add(HEADER_CC, Address::parse(addr).to_string());
    }

    /// The primary receivers of this message.
    pub fn to(&self) -> Vec<Address> {
        self.header
            .get_all(HEADER_TO)
            .into_iter()
            .map(Address::parse)
            .collect()
    }

    /// The carbon-copy receivers of this message.
    pub fn cc(&self) -> Vec<Address> {
        self.header
            .get_all(HEADER_CC)
            .into_iter()
            .map(Address::parse)
            .collect()
    }

    /// All receivers of this message (To then Cc).
    pub fn receivers(&self) -> Vec<Address> {
        let mut addrs = self.to();
        addrs.extend(self.cc());
        addrs
    }

    /// Whether the given address is the only receiver of this message.
    pub fn is_only_receiver(&self, addr: &Address) -> bool {
        let receivers = self.receivers();
        receivers.len() == 1
            && receivers[0]
                .to_string()
                .eq_ignore_ascii_case(&addr.to_string())
    }

    /// The message attachments.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Attach a file, recording it in the header.
    pub fn add_file(&mut self, f: File) {
        self.header.add(
            HEADER_FILE,
            format!("{} {}", f.size(), encode_word(f.name())),
        );
        self.files.push(f);
    }

    /// Check this message against the Winlink Message Structure constraints,
    /// returning the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mid().is_empty() {
            return Err(ValidationError::new("MID", "Empty MID"));
        }
        if self.mid().len() > 12 {
            return Err(ValidationError::new("MID", "MID too long"));
        }
        if self.receivers().is_empty() {
            // Undocumented, but the CMS refuses such messages
            return Err(ValidationError::new("To/Cc", "No recipient"));
        }
        if self.header.get(HEADER_FROM).unwrap_or("").is_empty() {
            return Err(ValidationError::new("From", "Empty From field"));
        }
        if self.body_size() == 0 {
            return Err(ValidationError::new("Body", "Empty body"));
        }

        let subject = self.header.get(HEADER_SUBJECT).unwrap_or("");
        if subject.is_empty() {
            // Undocumented; the CMS substitutes the proposal title here
            return Err(ValidationError::new("Subject", "Empty subject"));
        }
        if subject.len() > 128 {
            return Err(ValidationError::new("Subject", "Subject too long"));
        }

        // The original 50-character limit was raised to 255 by a 2020-05-27
        // amendment to the B2F specification.
        for f in &self.files {
            if f.name().len() > 255 {
                return Err(ValidationError::new(
                    "Files",
                    format!("Attachment file name too long: {}", f.name()),
                ));
            }
        }

        Ok(())
    }

    /// Serialize in the Winlink Message format.
    ///
    /// Fails if the Date header is present but not formatted correctly.
    pub fn write(&self, w: impl io::Write) -> Result<(), Error> {
        parse_date(self.header.get(HEADER_DATE).unwrap_or(""))?;

        let mut w = io::BufWriter::new(w);
        self.header.write(&mut w)?;
        w.write_all(b"\r\n")?; // end of headers

        w.write_all(&self.body)?;
        if !self.files.is_empty() {
            w.write_all(b"\r\n")?; // end of body
        }

        // Files, in the same order as they appear in the header
        for f in &self.files {
            w.write_all(&f.data)?;
            w.write_all(b"\r\n")?; // end of file
        }

        w.flush()?;
        Ok(())
    }

    /// The message in the Winlink Message format.
    pub fn bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Parse a message from its wire form, populating header, body and
    /// attachments together.
    pub fn read_from(r: impl Read) -> Result<Message, Error> {
        let mut r = io::BufReader::new(r);

        // Messages received over the air occasionally arrive with stray
        // CRLFs before the header.
        skip_leading_space(&mut r)?;

        let header = Header::read_from(&mut r)?;

        let body_size = header
            .get(HEADER_BODY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        let body = read_section(&mut r, body_size)?;

        let file_headers: Vec<String> = header
            .get_all(HEADER_FILE)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let mut files = Vec::with_capacity(file_headers.len());
        for value in file_headers {
            let (size, name) = value
                .split_once(' ')
                .ok_or_else(|| Error::MalformedFileHeader(value.clone()))?;
            let size: usize = size
                .trim()
                .parse()
                .map_err(|_| Error::MalformedFileHeader(value.clone()))?;

            // The name part may be an encoded word; Winlink Express emits
            // UTF-8 ones.
            let name = decode_header(name);
            let data = read_section(&mut r, size)?;
            files.push(File { name, data });
        }

        if let Some(date) = header.get(HEADER_DATE) {
            parse_date(date)?;
        }

        Ok(Message {
            header,
            body,
            files,
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MID: {}", self.mid())?;
        match self.date() {
            Some(date) => writeln!(f, "Date: {}", date)?,
            None => writeln!(f, "Date:")?,
        }
        writeln!(f, "From: {}", self.from_addr())?;
        for to in self.to() {
            writeln!(f, "To: {}", to)?;
        }
        for cc in self.cc() {
            writeln!(f, "Cc: {}", cc)?;
        }
        writeln!(f, "Subject: {}", self.subject())?;

        writeln!(f, "\n{}", self.body().unwrap_or_default())?;

        writeln!(f, "Attachments:")?;
        for file in &self.files {
            writeln!(f, "\t{} [{} bytes]", file.name(), file.size())?;
        }
        Ok(())
    }
}

/// ASCII whitespace per the B2F parser's tolerance rules.
fn is_ascii_space(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x0b | 0x0c | b'\r' | b' ')
}

fn skip_leading_space(r: &mut impl BufRead) -> io::Result<()> {
    loop {
        let buf = r.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        let n = buf.iter().take_while(|&&b| is_ascii_space(b)).count();
        if n == 0 {
            return Ok(());
        }
        r.consume(n);
    }
}

/// Read exactly `want` bytes followed by a section terminator: CRLF, or EOF
/// exactly at the boundary.
fn read_section(
    r: &mut impl BufRead,
    want: usize,
) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; want];
    let mut got = 0;
    while got < want {
        match r.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    if got < want {
        buf.truncate(got);
        return Err(Error::ShortRead { want, partial: buf });
    }

    let mut end = Vec::new();
    r.read_until(b'\n', &mut end)?;
    match end.as_slice() {
        b"" | b"\r\n" => Ok(buf),
        _ => Err(Error::BadSectionEnd),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_message() -> Message {
        let mut msg = Message::new(MsgType::Private, "LA5NTA");
        msg.add_to("N0CALL");
        msg.set_subject("Hello");
        msg.set_body("Test\n").unwrap();
        msg
    }

    #[test]
    fn new_message_defaults() {
        let msg = test_message();
        assert_eq!(12, msg.mid().len());
        assert_eq!("Private", msg.msg_type());
        assert_eq!("LA5NTA", msg.mbo());
        assert_eq!("LA5NTA", msg.from_addr().to_string());
        assert!(msg.date().is_some());
    }

    #[test]
    fn compose_serialize_parse_round_trip() {
        let msg = test_message();
        let wire = msg.bytes().unwrap();

        let parsed = Message::read_from(&wire[..]).unwrap();
        parsed.validate().unwrap();

        assert_eq!(msg.mid(), parsed.mid());
        assert_eq!("N0CALL", parsed.to()[0].to_string());
        assert_eq!("Hello", parsed.subject());
        assert_eq!("Test\n", parsed.body().unwrap());
        // Date round-trips with minute resolution
        assert_eq!(
            msg.date().unwrap().format("%Y%m%d%H%M").to_string(),
            parsed.date().unwrap().format("%Y%m%d%H%M").to_string()
        );
    }

    #[test]
    fn attachment_round_trip() {
        let data: Vec<u8> =
            (0..1000u32).map(|i| (i * 31 + 7) as u8).collect();
        let mut msg = test_message();
        msg.add_file(File::new("\u{3c0}.txt", data.clone()).unwrap());
        msg.add_file(File::new("second.bin", vec![0, 1, 2]).unwrap());

        let wire = msg.bytes().unwrap();
        let parsed = Message::read_from(&wire[..]).unwrap();

        assert_eq!(2, parsed.files().len());
        assert_eq!("\u{3c0}.txt", parsed.files()[0].name());
        assert_eq!(data, parsed.files()[0].data());
        assert_eq!("second.bin", parsed.files()[1].name());
        assert_eq!(vec![0, 1, 2], parsed.files()[1].data());
    }

    #[test]
    fn non_ascii_subject_round_trip() {
        let mut msg = test_message();
        msg.set_subject("Hei p\u{e5} deg");
        assert!(msg
            .header
            .get(HEADER_SUBJECT)
            .unwrap()
            .is_ascii());
        assert_eq!("Hei p\u{e5} deg", msg.subject());

        let parsed = Message::read_from(&msg.bytes().unwrap()[..]).unwrap();
        assert_eq!("Hei p\u{e5} deg", parsed.subject());
    }

    #[test]
    fn leading_crlf_tolerated() {
        let wire = test_message().bytes().unwrap();
        let padded = [b"\r\n\r\n".as_slice(), &wire].concat();

        let a = Message::read_from(&wire[..]).unwrap();
        let b = Message::read_from(&padded[..]).unwrap();
        assert_eq!(a.mid(), b.mid());
        assert_eq!(a.body().unwrap(), b.body().unwrap());
    }

    #[test]
    fn trailing_crlf_optional_at_eof() {
        let mut msg = test_message();
        msg.add_file(File::new("a.txt", b"abc".to_vec()).unwrap());
        let mut wire = msg.bytes().unwrap();

        // With the trailing CRLF
        Message::read_from(&wire[..]).unwrap();

        // Without it: EOF exactly at the section boundary
        wire.truncate(wire.len() - 2);
        let parsed = Message::read_from(&wire[..]).unwrap();
        assert_eq!(b"abc".to_vec(), parsed.files()[0].data());
    }

    #[test]
    fn truncated_body_is_short_read() {
        let wire = test_message().bytes().unwrap();
        let truncated = &wire[..wire.len() - 3];
        match Message::read_from(truncated) {
            Err(Error::ShortRead { want, partial }) => {
                assert_eq!(5, want);
                assert_eq!(2, partial.len());
            },
            other => panic!("expected short read, got {other:?}"),
        }
    }

    #[test]
    fn bad_section_terminator_rejected() {
        let msg = test_message();
        let mut wire = msg.bytes().unwrap();
        // Corrupt the byte count so the section ends mid-body
        let body_ix = wire.windows(7).position(|w| w == b"Body: 5").unwrap();
        wire[body_ix + 6] = b'3';
        assert_matches!(
            Err(Error::BadSectionEnd),
            Message::read_from(&wire[..])
        );
    }

    #[test]
    fn unparseable_date_rejected_on_both_sides() {
        let mut msg = test_message();
        msg.header.set(HEADER_DATE, "a while ago");
        assert_matches!(Err(Error::BadDate(_)), msg.bytes());

        let mut good = test_message();
        good.header.set(HEADER_DATE, "2006/01/02 15:04");
        let mut wire = good.bytes().unwrap();
        let ix = wire
            .windows(16)
            .position(|w| w == b"2006/01/02 15:04")
            .unwrap();
        wire[ix] = b'x';
        assert_matches!(
            Err(Error::BadDate(_)),
            Message::read_from(&wire[..])
        );
    }

    #[test]
    fn empty_date_tolerated() {
        let mut msg = test_message();
        msg.header.set(HEADER_DATE, "");
        let wire = msg.bytes().unwrap();
        let parsed = Message::read_from(&wire[..]).unwrap();
        assert_eq!(None, parsed.date());
    }

    #[test]
    fn validation_boundaries() {
        let mut msg = test_message();
        msg.validate().unwrap();

        msg.set_subject(&"s".repeat(128));
        msg.validate().unwrap();
        msg.set_subject(&"s".repeat(129));
        assert_eq!("Subject", msg.validate().unwrap_err().field);

        let mut msg = test_message();
        msg.header.set(HEADER_MID, "A".repeat(12));
        msg.validate().unwrap();
        msg.header.set(HEADER_MID, "A".repeat(13));
        assert_eq!("MID", msg.validate().unwrap_err().field);
        msg.header.set(HEADER_MID, "");
        assert_eq!("MID", msg.validate().unwrap_err().field);

        let mut msg = test_message();
        msg.add_file(File::new("n".repeat(255), vec![1]).unwrap());
        msg.validate().unwrap();
        msg.add_file(File::new("n".repeat(256), vec![1]).unwrap());
        assert_eq!("Files", msg.validate().unwrap_err().field);
    }

    #[test]
    fn validation_requires_receiver_from_and_body() {
        let mut msg = Message::new(MsgType::Private, "LA5NTA");
        msg.set_subject("s");
        msg.set_body("b").unwrap();
        assert_eq!("To/Cc", msg.validate().unwrap_err().field);

        msg.add_to("N0CALL");
        msg.header.set(HEADER_FROM, "");
        assert_eq!("From", msg.validate().unwrap_err().field);

        let mut msg = test_message();
        msg.header.set(HEADER_BODY, "0");
        assert_eq!("Body", msg.validate().unwrap_err().field);
    }

    #[test]
    fn receivers_and_only_receiver() {
        let mut msg = test_message();
        assert!(msg.is_only_receiver(&Address::parse("n0call")));
        msg.add_cc("LA5NTA");
        assert_eq!(2, msg.receivers().len());
        assert!(!msg.is_only_receiver(&Address::parse("N0CALL")));
    }

    #[test]
    fn empty_file_name_is_an_error() {
        assert_matches!(Err(Error::EmptyFileName), File::new("", vec![1]));
    }

    #[test]
    fn file_data_is_a_copy() {
        let f = File::new("x", vec![1, 2, 3]).unwrap();
        let mut copy = f.data();
        copy[0] = 9;
        assert_eq!(vec![1, 2, 3], f.data());
    }

    #[test]
    fn file_json_surface() {
        let f = File::new("report.txt", vec![0; 42]).unwrap();
        assert_eq!(
            serde_json::json!({"Name": "report.txt", "Size": 42}),
            serde_json::to_value(&f).unwrap()
        );
    }

    #[test]
    fn display_dump() {
        let mut msg = test_message();
        msg.add_file(File::new("a.txt", vec![0; 3]).unwrap());
        let dump = msg.to_string();
        assert!(dump.contains("From: LA5NTA"), "{dump}");
        assert!(dump.contains("To: N0CALL"), "{dump}");
        assert!(dump.contains("Subject: Hello"), "{dump}");
        assert!(dump.contains("Test\n"), "{dump}");
        assert!(dump.contains("\ta.txt [3 bytes]"), "{dump}");
    }

    #[test]
    fn body_charset_from_content_type() {
        let mut msg = test_message();
        msg.set_body_with_charset("UTF-8", "\u{3c0} body").unwrap();
        assert_eq!("UTF-8", msg.charset());

        let parsed = Message::read_from(&msg.bytes().unwrap()[..]).unwrap();
        assert_eq!("\u{3c0} body", parsed.body().unwrap());
    }

    #[test]
    fn malformed_file_header_rejected() {
        let msg = test_message();
        let mut wire = msg.bytes().unwrap();
        // Splice in a File header with no space-separated size
        let ix = wire.windows(5).position(|w| w == b"Mid: ").unwrap();
        let mut spliced = wire[..ix].to_vec();
        spliced.extend_from_slice(b"File: nonsense\r\n");
        spliced.extend_from_slice(&wire[ix..]);
        wire = spliced;
        assert_matches!(
            Err(Error::MalformedFileHeader(_)),
            Message::read_from(&wire[..])
        );
    }
}
