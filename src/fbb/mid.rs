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

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MID_LEN: usize = 12;

/// Generate a message id: 12 base-36 characters, unique across the Winlink
/// system with high probability.
///
/// The leading characters encode minutes since the epoch so ids sort roughly
/// by composition time; the tail is random except for the final character,
/// which is derived from the callsign so two stations generating in the same
/// minute cannot collide by time alone.
pub fn generate_mid(mycall: &str) -> String {
    let minutes = Utc::now().timestamp() / 60;
    let mut id = base36(minutes.unsigned_abs());

    let mut rng = rand::thread_rng();
    while id.len() < MID_LEN - 1 {
        id.push(char::from(BASE36[rng.gen_range(0..BASE36.len())]));
    }
    id.truncate(MID_LEN - 1);

    let tag = mycall
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    id.push(char::from(BASE36[(tag % 36) as usize]));

    id
}

fn base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mid_shape() {
        let mid = generate_mid("LA5NTA");
        assert_eq!(MID_LEN, mid.len());
        assert!(mid.bytes().all(|b| BASE36.contains(&b)), "{mid:?}");
    }

    #[test]
    fn callsign_tag_is_stable() {
        let a = generate_mid("LA5NTA");
        let b = generate_mid("LA5NTA");
        assert_eq!(a.as_bytes()[11], b.as_bytes()[11]);
    }

    #[test]
    fn mids_differ() {
        let a = generate_mid("LA5NTA");
        let b = generate_mid("LA5NTA");
        assert_ne!(a, b);
    }

    #[test]
    fn test_base36() {
        assert_eq!("0", base36(0));
        assert_eq!("Z", base36(35));
        assert_eq!("10", base36(36));
        assert_eq!("ZZ", base36(36 * 36 - 1));
    }
}
