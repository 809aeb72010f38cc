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

use std::borrow::Cow;

use thiserror::Error;

/// The charset B2F headers and bodies use unless told otherwise.
pub const DEFAULT_CHARSET: &str = "ISO-8859-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    #[error("unknown charset {0:?}")]
    Unknown(String),
    #[error("text not representable in {0}")]
    Unmappable(String),
}

// encoding_rs resolves the ISO-8859-1 label to windows-1252, whose encoder
// substitutes HTML numeric references for unmappable characters. Neither
// behavior survives a byte-exact round trip, so latin-1 gets a direct codec
// and encoding_rs handles every other label.
fn is_latin1(label: &str) -> bool {
    label.eq_ignore_ascii_case("iso-8859-1")
        || label.eq_ignore_ascii_case("iso8859-1")
        || label.eq_ignore_ascii_case("latin1")
        || label.eq_ignore_ascii_case("l1")
        || label.eq_ignore_ascii_case("cp819")
}

/// Transcode a UTF-8 string into the named charset.
pub fn encode(charset: &str, s: &str) -> Result<Vec<u8>, CharsetError> {
    if is_latin1(charset) {
        return s
            .chars()
            .map(|c| {
                u8::try_from(u32::from(c))
                    .map_err(|_| CharsetError::Unmappable(charset.to_owned()))
            })
            .collect();
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes())
        .ok_or_else(|| CharsetError::Unknown(charset.to_owned()))?;
    let (bytes, _, had_errors) = encoding.encode(s);
    if had_errors {
        return Err(CharsetError::Unmappable(charset.to_owned()));
    }
    Ok(bytes.into_owned())
}

/// Transcode bytes in the named charset into a UTF-8 string.
///
/// Decoding is lossy in the encoding_rs sense: malformed sequences become
/// replacement characters rather than errors. Only an unknown charset label
/// fails.
pub fn decode(charset: &str, bytes: &[u8]) -> Result<String, CharsetError> {
    if is_latin1(charset) {
        return Ok(bytes.iter().map(|&b| char::from(b)).collect());
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes())
        .ok_or_else(|| CharsetError::Unknown(charset.to_owned()))?;
    let (text, _, _) = encoding.decode(bytes);
    Ok(match text {
        Cow::Borrowed(s) => s.to_owned(),
        Cow::Owned(s) => s,
    })
}

/// Whether `s` survives a round trip through the named charset.
pub fn is_representable(charset: &str, s: &str) -> bool {
    encode(charset, s).is_ok()
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn latin1_round_trip() {
        let text = "Keld J\u{f8}rn Simonsen";
        let bytes = encode(DEFAULT_CHARSET, text).unwrap();
        assert_eq!(bytes, b"Keld J\xf8rn Simonsen");
        assert_eq!(text, decode(DEFAULT_CHARSET, &bytes).unwrap());
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        assert_matches!(
            Err(CharsetError::Unmappable(_)),
            encode(DEFAULT_CHARSET, "\u{3c0}.txt")
        );
        assert!(!is_representable(DEFAULT_CHARSET, "\u{3c0}.txt"));
        assert!(is_representable(DEFAULT_CHARSET, "plain ascii"));
    }

    #[test]
    fn utf8_round_trip() {
        let text = "\u{3c0}.txt";
        let bytes = encode("UTF-8", text).unwrap();
        assert_eq!(text, decode("UTF-8", &bytes).unwrap());
    }

    #[test]
    fn unknown_charset() {
        assert_matches!(
            Err(CharsetError::Unknown(_)),
            encode("x-no-such-charset", "hi")
        );
        assert_matches!(
            Err(CharsetError::Unknown(_)),
            decode("x-no-such-charset", b"hi")
        );
    }

    proptest! {
        #[test]
        fn latin1_decode_never_fails(
            bytes in prop::collection::vec(prop::num::u8::ANY, 0..64)
        ) {
            let text = decode(DEFAULT_CHARSET, &bytes).unwrap();
            prop_assert_eq!(encode(DEFAULT_CHARSET, &text).unwrap(), bytes);
        }
    }
}
