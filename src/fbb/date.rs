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

use chrono::{
    DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc,
};
use lazy_static::lazy_static;

use super::Error;

/// The one true Winlink date layout (emitted in UTC).
pub const DATE_LAYOUT: &str = "%Y/%m/%d %H:%M";

/// Naive layouts tried before the RFC 5322 family, in priority order.
const SIMPLE_LAYOUTS: &[&str] = &[
    DATE_LAYOUT,
    // Undocumented layout seen from RMS Relay-3.0.27.1 in store-and-forward
    // mode.
    "%Y.%m.%d %H:%M",
    // Undocumented layout seen in a Radio Only message forwarded with RMS
    // Relay-3.0.30.0.
    "%Y-%m-%d %H:%M",
    // Older BPQ format
    "%Y%m%d%H%M%S",
];

lazy_static! {
    // RFC 5322 section 3.3 shapes: optional day-of-week, optional seconds,
    // 4- or 2-digit year. chrono's numeric fields accept 1- or 2-digit days
    // either way, so the day axis needs no enumeration of its own. The zone
    // is split off and resolved separately since chrono cannot parse named
    // zone abbreviations.
    static ref RFC5322_LAYOUTS: Vec<String> = {
        let mut layouts = Vec::new();
        for dow in ["%a, ", ""] {
            for year in ["%Y", "%y"] {
                for seconds in [":%S", ""] {
                    layouts.push(format!("{dow}%d %b {year} %H:%M{seconds}"));
                }
            }
        }
        layouts
    };
}

/// Format an instant as the canonical Winlink date header value.
pub fn format_date(t: DateTime<Utc>) -> String {
    t.format(DATE_LAYOUT).to_string()
}

/// Parse a Date header value, trying the canonical layout first and falling
/// back through every format observed in the wild.
///
/// An empty value parses to `None`. The returned instant is converted to
/// local time.
pub fn parse_date(s: &str) -> Result<Option<DateTime<Local>>, Error> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }

    // Zone-less layouts denote UTC
    for layout in SIMPLE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            let utc = Utc.from_utc_datetime(&naive);
            return Ok(Some(utc.with_timezone(&Local)));
        }
    }

    if let Some(t) = parse_rfc5322(s) {
        return Ok(Some(t.with_timezone(&Local)));
    }

    Err(Error::BadDate(s.to_owned()))
}

fn parse_rfc5322(s: &str) -> Option<DateTime<FixedOffset>> {
    // "-0700 (MST)" is not in RFC 5322, but is common; the parenthesized
    // abbreviation is decorative.
    let s = match s.rfind('(') {
        Some(ix) if s.ends_with(')') => s[..ix].trim_end(),
        _ => s,
    };

    let (rest, offset) = split_zone(s)?;
    let offset = FixedOffset::east_opt(offset)?;

    for layout in RFC5322_LAYOUTS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(rest, layout) {
            return offset.from_local_datetime(&naive).single();
        }
    }
    None
}

/// Split the trailing zone token off a date string, returning the remainder
/// and the zone's offset from UTC in seconds.
fn split_zone(s: &str) -> Option<(&str, i32)> {
    let s = s.trim_end();
    let ix = s.rfind(|c: char| c.is_ascii_whitespace())?;
    let (rest, zone) = (s[..ix].trim_end(), &s[ix + 1..]);

    if let Some(offset) = numeric_zone(zone) {
        return Some((rest, offset));
    }
    if zone.len() <= 5 && zone.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Some((rest, named_zone(zone)));
    }
    None
}

fn numeric_zone(zone: &str) -> Option<i32> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hhmm: i32 = digits.parse().ok()?;
    Some(sign * ((hhmm / 100) * 3600 + (hhmm % 100) * 60))
}

fn named_zone(zone: &str) -> i32 {
    // RFC 2822 4.3: the military single-letter zones were so poorly defined
    // that they, like any unknown zone, must be treated as +0000.
    let hours = if zone.eq_ignore_ascii_case("ut")
        || zone.eq_ignore_ascii_case("gmt")
        || zone.eq_ignore_ascii_case("utc")
    {
        0
    } else if zone.eq_ignore_ascii_case("edt") {
        -4
    } else if zone.eq_ignore_ascii_case("est") || zone.eq_ignore_ascii_case("cdt")
    {
        -5
    } else if zone.eq_ignore_ascii_case("cst") || zone.eq_ignore_ascii_case("mdt")
    {
        -6
    } else if zone.eq_ignore_ascii_case("mst") || zone.eq_ignore_ascii_case("pdt")
    {
        -7
    } else if zone.eq_ignore_ascii_case("pst") {
        -8
    } else {
        0
    };
    hours * 3600
}
