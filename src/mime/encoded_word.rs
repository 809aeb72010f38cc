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

use lazy_static::lazy_static;
use regex::Regex;

use super::charset;
use super::quoted_printable::{q_encode, qp_decode};

lazy_static! {
    static ref ENCODED_WORD: Regex =
        Regex::new(r"=\?([!->@-~]+)\?([!->@-~]+)\?([!->@-~]*)\?=").unwrap();
}

/// Decode every RFC 2047 encoded word in the given header value.
///
/// Plain text between words is preserved; whitespace between two adjacent
/// encoded words is deleted, as the RFC requires. A word that cannot be
/// decoded (unknown charset, bad transfer encoding) is left verbatim.
///
/// Winlink Express emits encoded words mid-token without surrounding
/// whitespace, so unlike strict RFC 2047 the scan does not require words to
/// be whitespace-delimited.
pub fn decode_header(text: &str) -> String {
    let mut out = String::new();
    let mut last_end = 0;
    let mut prev_was_word = false;

    for caps in ENCODED_WORD.captures_iter(text) {
        let m = caps.get(0).expect("regex match has group 0");
        let gap = &text[last_end..m.start()];
        let ws_gap = !gap.is_empty()
            && gap.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
        if !(prev_was_word && ws_gap) {
            out.push_str(gap);
        }

        match decode_word(&caps) {
            Some(decoded) => out.push_str(&decoded),
            None => out.push_str(m.as_str()),
        }

        prev_was_word = true;
        last_end = m.end();
    }

    if last_end == 0 {
        return text.to_owned();
    }
    out.push_str(&text[last_end..]);
    out
}

fn decode_word(caps: &regex::Captures<'_>) -> Option<String> {
    let cs = caps.get(1)?.as_str();
    let xfer = caps.get(2)?.as_str();
    let content = caps.get(3)?.as_str();

    // RFC 2184 allows a language suffix on the charset field; there is
    // nothing useful to do with it.
    let cs = cs.split('*').next()?;

    let bytes = match xfer {
        "q" | "Q" => {
            // _ in the content stands for ASCII space regardless of charset
            let content = content.replace('_', " ");
            qp_decode(content.as_bytes()).into_owned()
        },
        "b" | "B" => base64::decode(content).ok()?,
        _ => return None,
    };

    charset::decode(cs, &bytes).ok()
}

/// Encode a header value as an RFC 2047 encoded word if it needs one.
///
/// Values that are entirely printable ASCII pass through unchanged. Values
/// representable in the default charset are Q-encoded with it; everything
/// else is Q-encoded as UTF-8.
pub fn encode_word(s: &str) -> String {
    if s.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        return s.to_owned();
    }

    let (cs, bytes) = match charset::encode(charset::DEFAULT_CHARSET, s) {
        Ok(bytes) => (charset::DEFAULT_CHARSET, bytes),
        Err(_) => ("UTF-8", s.as_bytes().to_vec()),
    };
    format!("=?{}?Q?{}?=", cs, q_encode(&bytes))
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_decode_header() {
        assert_eq!("hello world", decode_header("hello world"));
        assert_eq!("", decode_header(""));

        // Examples from RFC 2047
        assert_eq!(
            "Keith Moore",
            decode_header("=?US-ASCII?Q?Keith_Moore?=")
        );
        assert_eq!(
            "Keld J\u{f8}rn Simonsen",
            decode_header("=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?=")
        );
        assert_eq!("Andr\u{e9}", decode_header("=?ISO-8859-1?Q?Andr=E9?="));
        assert_eq!(
            "If you can read this yo",
            decode_header("=?ISO-8859-1?B?SWYgeW91IGNhbiByZWFkIHRoaXMgeW8=?=")
        );
        assert_eq!(
            "Keith Moore",
            decode_header("=?US-ASCII*EN?Q?Keith_Moore?=")
        );
    }

    #[test]
    fn decode_header_mixed_text() {
        assert_eq!(
            "this is a test",
            decode_header("=?us-ascii?q?this?= is a test")
        );
        assert_eq!(
            "this is a test",
            decode_header("this =?us-ascii?q?is?= a test")
        );
        assert_eq!(
            "this isa test",
            decode_header(
                "this =?us-ascii?q?is?= \t\r\n=?us-ascii?q?a?= test"
            )
        );
        // Mid-token words, as emitted by Winlink Express file headers
        assert_eq!("12 \u{3c0}.txt", decode_header("12 =?UTF-8?Q?=CF=80.txt?="));
    }

    #[test]
    fn undecodable_word_left_verbatim() {
        assert_eq!(
            "=?x-no-such-charset?Q?abc?=",
            decode_header("=?x-no-such-charset?Q?abc?=")
        );
        assert_eq!("=?utf-8?X?abc?=", decode_header("=?utf-8?X?abc?="));
    }

    #[test]
    fn test_encode_word() {
        assert_eq!("Hello", encode_word("Hello"));
        assert_eq!("plain ascii text", encode_word("plain ascii text"));
        assert_eq!("=?ISO-8859-1?Q?caf=E9?=", encode_word("caf\u{e9}"));
        assert_eq!("=?UTF-8?Q?=CF=80.txt?=", encode_word("\u{3c0}.txt"));
    }

    #[test]
    fn encode_decode_round_trip() {
        for s in [
            "Hello",
            "caf\u{e9} au lait",
            "\u{3c0}.txt",
            "Keld J\u{f8}rn Simonsen",
            "\u{65e5}\u{672c}\u{8a9e} subject",
        ] {
            assert_eq!(s, decode_header(&encode_word(s)), "input {s:?}");
        }
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary(s in "[^=?]{0,40}") {
            prop_assert_eq!(&s, &decode_header(&encode_word(&s)));
        }

        #[test]
        fn decode_never_panics(s in r"=\?(.*|us-ascii)\?(.*|q|b)\?.*\?=") {
            decode_header(&s);
        }
    }
}
