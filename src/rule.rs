use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::parse_util;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// A birth/survival rule.
///
/// # Representation
/// Rules are packed into a `u32` as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
/// where bit `i` of a half being on means neighbor count `i` is in that set.
/// Only bits 0..=8 of each half are meaningful.
///
/// # Examples
/// ```notrust
/// B3/S23:               0000_0000_0000_1000_0000_0000_0000_1100
/// B0/S0:                0000_0000_0000_0001_0000_0000_0000_0001
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Expected 'B' at the start of the rule")]
    MissingBirth,

    #[error("Some number of births is required")]
    MissingBirthDigits,

    #[error("Expected 'S' after '/'")]
    MissingSurvival,

    #[error("Some number of survivals is required")]
    MissingSurvivalDigits,

    #[error("Invalid rule digit '{got}', expected 0-8")]
    InvalidDigit { got: char },
}

impl RuleSet {
    /// Create a new `RuleSet` from raw birth and survival masks. For both
    /// `b` and `s`, counts are set on a bit basis: if bit `i` is on, `i` is
    /// in the set. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    /// Build a rule from the decimal-digit encoding used by preset files,
    /// where birth=3 means {3} and survival=23 means {2, 3}. Duplicate
    /// digits collapse and order is irrelevant, so 223 and 32 both mean
    /// {2, 3}.
    pub fn from_digits(b: u32, s: u32) -> Self {
        Self::new(digit_mask(b), digit_mask(s))
    }

    pub fn births(&self) -> u16 {
        ((self.rule >> 16) & 0x1FF) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Does a dead cell with `count` live neighbors come alive?
    pub fn born(&self, count: u8) -> bool {
        count <= 8 && self.births() & (1 << count) != 0
    }

    /// Does a live cell with `count` live neighbors stay alive?
    pub fn survives(&self, count: u8) -> bool {
        count <= 8 && self.survivals() & (1 << count) != 0
    }
}

/// Collapse the decimal digits of `n` into a count bitmask.
///
/// Note `digit_mask(0) == 0b1`: a bare 0 means the set {0}. The original
/// file format could not express that (a multi-digit integer cannot lead
/// with 0), but the mask has no such blind spot.
fn digit_mask(mut n: u32) -> u16 {
    let mut mask = 0;

    loop {
        let d = (n % 10) as u16;
        if d <= 8 {
            mask |= 1 << d;
        }

        n /= 10;
        if n == 0 {
            break;
        }
    }

    mask
}

/// Parse rule notation that looks like `B3/S23`, case-insensitive.
/// Returns the rule and whatever follows the survival digits.
pub(crate) fn parse_rule(bytes: &[u8]) -> Result<(RuleSet, &[u8]), RuleError> {
    let (Some(b'b' | b'B'), bytes) = parse_util::take_1(bytes) else {
        return Err(RuleError::MissingBirth);
    };

    let (Some(b), bytes) = parse_util::take_until(b'/', bytes) else {
        return Err(RuleError::MissingBirthDigits);
    };

    // take_until leaves the '/' as the next byte
    let (_, bytes) = parse_util::take_1(bytes);

    let (Some(b's' | b'S'), bytes) = parse_util::take_1(bytes) else {
        return Err(RuleError::MissingSurvival);
    };

    let (Some(s), bytes) = parse_util::take_until_ws(bytes) else {
        return Err(RuleError::MissingSurvivalDigits);
    };

    let b = bytes_to_mask(b)?;
    let s = bytes_to_mask(s)?;

    Ok((RuleSet::new(b, s), bytes))
}

/// Convert a human readable run of count digits (b"23") to a bitmask (0b1100).
fn bytes_to_mask(bytes: &[u8]) -> Result<u16, RuleError> {
    let mut mask = 0;

    for &b in bytes {
        if !b.is_ascii_digit() || b > b'8' {
            return Err(RuleError::InvalidDigit { got: b as char });
        }

        mask |= 1 << (b - b'0');
    }

    Ok(mask)
}

impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rule, rest) = parse_rule(s.trim().as_bytes())?;

        if !rest.is_empty() {
            return Err(RuleError::InvalidDigit {
                got: rest[0] as char,
            });
        }

        Ok(rule)
    }
}

impl fmt::Display for RuleSet {
    /// Canonical `B<digits>/S<digits>` form, digits ascending.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for d in 0..=8 {
            if self.births() & (1 << d) != 0 {
                write!(f, "{d}")?;
            }
        }

        write!(f, "/S")?;
        for d in 0..=8 {
            if self.survivals() & (1 << d) != 0 {
                write!(f, "{d}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::B3S23;
    use super::RuleError;
    use super::RuleSet;

    #[test]
    fn conway_membership() {
        let rule = B3S23;

        assert!(rule.born(3));
        assert!(!rule.born(2));
        assert!(rule.survives(2));
        assert!(rule.survives(3));
        assert!(!rule.survives(4));
        assert!(!rule.survives(0));
    }

    #[test]
    fn digit_encoding_matches_masks() {
        assert_eq!(RuleSet::from_digits(3, 23), B3S23);
    }

    #[test]
    fn duplicate_digits_collapse() {
        assert_eq!(RuleSet::from_digits(3, 223), RuleSet::from_digits(3, 23));
        assert_eq!(RuleSet::from_digits(33, 32), RuleSet::from_digits(3, 23));
    }

    #[test]
    fn zero_alone_means_count_zero() {
        let rule = RuleSet::from_digits(0, 0);

        assert!(rule.born(0));
        assert!(rule.survives(0));
        for count in 1..=8 {
            assert!(!rule.born(count));
            assert!(!rule.survives(count));
        }
    }

    #[test]
    fn counts_past_eight_never_match() {
        let rule = RuleSet::new(0x1FF, 0x1FF);

        assert!(rule.born(8));
        assert!(!rule.born(9));
        assert!(!rule.survives(200));
    }

    #[test]
    fn parses_bs_notation() {
        let rule: RuleSet = "B3/S23".parse().unwrap();
        assert_eq!(rule, B3S23);

        let rule: RuleSet = "b36/s23".parse().unwrap();
        assert_eq!(rule, RuleSet::new(0b100_1000, 0b1100));
    }

    #[test]
    fn accepts_leading_zero_digits() {
        // The decimal-integer encoding can't express this one; the text
        // parser can.
        let rule: RuleSet = "B0/S0".parse().unwrap();
        assert_eq!(rule, RuleSet::new(0b1, 0b1));
    }

    #[test]
    fn rejects_malformed_notation() {
        assert_eq!("3/23".parse::<RuleSet>(), Err(RuleError::MissingBirth));
        assert_eq!(
            "B3S23".parse::<RuleSet>(),
            Err(RuleError::MissingBirthDigits)
        );
        assert_eq!(
            "B3/S2x".parse::<RuleSet>(),
            Err(RuleError::InvalidDigit { got: 'x' })
        );
        assert_eq!("B/S23".parse::<RuleSet>(), Err(RuleError::MissingBirthDigits));
        assert_eq!("B3/S".parse::<RuleSet>(), Err(RuleError::MissingSurvivalDigits));
    }

    #[test]
    fn displays_canonical_form() {
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::from_digits(3, 32).to_string(), "B3/S23");
    }
}
