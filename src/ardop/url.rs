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
use std::str::FromStr;

use super::Error;

/// An ARQ bandwidth setting: one of the four ARDOP bandwidths, either as a
/// negotiable maximum or forced.
///
/// The wire tokens are `200MAX`, `500MAX`, `1000MAX`, `2000MAX` and their
/// `FORCED` counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bandwidth {
    hz: u16,
    forced: bool,
}

impl Bandwidth {
    pub fn new(hz: u16, forced: bool) -> Result<Bandwidth, Error> {
        match hz {
            200 | 500 | 1000 | 2000 => Ok(Bandwidth { hz, forced }),
            _ => Err(Error::InvalidBandwidth(hz.to_string())),
        }
    }

    pub fn hz(self) -> u16 {
        self.hz
    }

    pub fn is_forced(self) -> bool {
        self.forced
    }
}

impl FromStr for Bandwidth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Bandwidth, Error> {
        let token = s.trim().to_ascii_uppercase();
        let (digits, forced) = if let Some(d) = token.strip_suffix("FORCED") {
            (d, true)
        } else if let Some(d) = token.strip_suffix("MAX") {
            (d, false)
        } else {
            return Err(Error::InvalidBandwidth(s.to_owned()));
        };

        let hz = digits
            .parse()
            .map_err(|_| Error::InvalidBandwidth(s.to_owned()))?;
        Bandwidth::new(hz, forced)
            .map_err(|_| Error::InvalidBandwidth(s.to_owned()))
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.hz,
            if self.forced { "FORCED" } else { "MAX" }
        )
    }
}

/// A parsed `ardop://<target>[?bw=<bandwidth>]` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialUrl {
    pub target: String,
    pub bandwidth: Option<Bandwidth>,
}

impl DialUrl {
    pub fn parse(s: &str) -> Result<DialUrl, Error> {
        let (scheme, rest) = s
            .split_once("://")
            .ok_or_else(|| Error::UnsupportedScheme(s.to_owned()))?;
        if !scheme.eq_ignore_ascii_case("ardop") {
            return Err(Error::UnsupportedScheme(scheme.to_owned()));
        }

        let (target, query) = match rest.split_once('?') {
            Some((target, query)) => (target, Some(query)),
            None => (rest, None),
        };
        let target = target.trim_end_matches('/');
        if target.is_empty() {
            return Err(Error::MissingTarget);
        }

        let mut bandwidth = None;
        if let Some(query) = query {
            for pair in query.split('&') {
                if let Some((key, value)) = pair.split_once('=') {
                    if key.eq_ignore_ascii_case("bw") && !value.is_empty() {
                        bandwidth = Some(value.parse()?);
                    }
                }
            }
        }

        Ok(DialUrl {
            target: target.to_ascii_uppercase(),
            bandwidth,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_plain() {
        let url = DialUrl::parse("ardop://W1ABC").unwrap();
        assert_eq!("W1ABC", url.target);
        assert_eq!(None, url.bandwidth);
    }

    #[test]
    fn parse_with_bandwidth() {
        let url = DialUrl::parse("ardop://la5nta?bw=500MAX").unwrap();
        assert_eq!("LA5NTA", url.target);
        assert_eq!(Bandwidth::new(500, false).unwrap(), url.bandwidth.unwrap());

        let url = DialUrl::parse("ardop://W1ABC/?bw=2000FORCED").unwrap();
        assert_eq!("W1ABC", url.target);
        assert!(url.bandwidth.unwrap().is_forced());
    }

    #[test]
    fn rejects_foreign_schemes() {
        assert_matches!(
            Err(Error::UnsupportedScheme(_)),
            DialUrl::parse("ax25://W1ABC")
        );
        assert_matches!(
            Err(Error::UnsupportedScheme(_)),
            DialUrl::parse("W1ABC")
        );
    }

    #[test]
    fn rejects_missing_target() {
        assert_matches!(Err(Error::MissingTarget), DialUrl::parse("ardop://"));
    }

    #[test]
    fn bandwidth_tokens() {
        assert_eq!(
            Bandwidth::new(500, false).unwrap(),
            "500MAX".parse().unwrap()
        );
        assert_eq!(
            Bandwidth::new(2000, true).unwrap(),
            "2000forced".parse().unwrap()
        );
        assert_eq!("500MAX", Bandwidth::new(500, false).unwrap().to_string());
        assert_eq!(
            "2000FORCED",
            Bandwidth::new(2000, true).unwrap().to_string()
        );

        assert_matches!(
            Err(Error::InvalidBandwidth(_)),
            "300MAX".parse::<Bandwidth>()
        );
        assert_matches!(
            Err(Error::InvalidBandwidth(_)),
            "500".parse::<Bandwidth>()
        );
        assert_matches!(
            Err(Error::InvalidBandwidth(_)),
            "fastplease".parse::<Bandwidth>()
        );
    }
}
