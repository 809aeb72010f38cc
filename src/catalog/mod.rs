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

//! Winlink catalog requests and reports. Currently just position reports,
//! which are plain B2F messages addressed to the QTH system catalog.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;

use crate::fbb::{self, Message, MsgType};

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("invalid course: {0}")]
    InvalidCourse(u16),
}

/// A course over ground in whole degrees, true or magnetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    digits: [u8; 3],
    magnetic: bool,
}

impl Course {
    pub fn new(degrees: u16, magnetic: bool) -> Result<Course, Error> {
        if degrees > 360 {
            return Err(Error::InvalidCourse(degrees));
        }
        let rendered = format!("{:03}", degrees);
        let bytes = rendered.as_bytes();
        Ok(Course {
            digits: [bytes[0], bytes[1], bytes[2]],
            magnetic,
        })
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.digits {
            write!(f, "{}", char::from(d))?;
        }
        f.write_str(if self.magnetic { "M" } else { "T" })
    }
}

/// A position report destined for the Winlink QTH catalog.
#[derive(Debug, Clone, Default)]
pub struct PosReport {
    pub date: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub course: Option<Course>,
    /// Speed over ground in knots.
    pub speed: Option<f64>,
    pub comment: String,
}

impl PosReport {
    /// Render this report as a B2F message from the given station.
    pub fn message(&self, mycall: &str) -> Result<Message, fbb::Error> {
        let mut msg = Message::new(MsgType::PositionReport, mycall);
        msg.add_to("QTH");
        msg.set_subject("POSITION REPORT");

        let mut body = String::new();
        let date = self.date.unwrap_or_else(Utc::now);
        body.push_str(&format!(
            "TIME: {}\r\n",
            date.format("%Y/%m/%d %H:%M")
        ));
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            body.push_str(&format!(
                "LATITUDE: {}\r\n",
                dec_to_min_dec(lat, true)
            ));
            body.push_str(&format!(
                "LONGITUDE: {}\r\n",
                dec_to_min_dec(lon, false)
            ));
        }
        if let Some(course) = self.course {
            body.push_str(&format!("COURSE: {}\r\n", course));
        }
        if let Some(speed) = self.speed {
            body.push_str(&format!("SPEED: {:.1}\r\n", speed));
        }
        if !self.comment.is_empty() {
            body.push_str(&format!("COMMENT: {}\r\n", self.comment));
        }
        msg.set_body(&body)?;

        Ok(msg)
    }
}

/// Format decimal degrees as the catalog's degrees-and-decimal-minutes
/// notation: `DD-MM.MMMM[NS]` for latitudes, `DDD-MM.MMMM[EW]` for
/// longitudes, with a trailing space at exactly zero.
fn dec_to_min_dec(degrees: f64, is_lat: bool) -> String {
    let hemisphere = if degrees > 0.0 {
        if is_lat {
            'N'
        } else {
            'E'
        }
    } else if degrees < 0.0 {
        if is_lat {
            'S'
        } else {
            'W'
        }
    } else {
        ' '
    };

    let positive = degrees.abs();
    let whole = positive.trunc();
    let minutes = (positive - whole) * 60.0;

    if is_lat {
        format!("{:02}-{:07.4}{}", whole as u16, minutes, hemisphere)
    } else {
        format!("{:03}-{:07.4}{}", whole as u16, minutes, hemisphere)
    }
}
