//! Cabin classes and per-leg cabin availability flags.

use std::fmt;
use std::ops::BitOr;

/// Error returned when parsing an unknown cabin name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cabin: {0:?}")]
pub struct InvalidCabin(String);

/// A cabin class as reported by the seat API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cabin {
    Economy,
    Business,
    First,
}

impl Cabin {
    /// Parse a cabin name, ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use award_planner::domain::Cabin;
    ///
    /// assert_eq!(Cabin::parse("Business").unwrap(), Cabin::Business);
    /// assert_eq!(Cabin::parse(" FIRST ").unwrap(), Cabin::First);
    /// assert!(Cabin::parse("premium").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidCabin> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(Cabin::Economy),
            "business" => Ok(Cabin::Business),
            "first" => Ok(Cabin::First),
            _ => Err(InvalidCabin(s.to_string())),
        }
    }

    /// Returns the lowercase cabin name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cabin::Economy => "economy",
            Cabin::Business => "business",
            Cabin::First => "first",
        }
    }
}

impl fmt::Display for Cabin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which cabins have award space on a leg. Each flag is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CabinFlags {
    pub economy: bool,
    pub business: bool,
    pub first: bool,
}

impl CabinFlags {
    /// Flags with only `cabin` set.
    pub fn only(cabin: Cabin) -> Self {
        let mut flags = Self::default();
        flags.set(cabin);
        flags
    }

    /// Mark `cabin` as available.
    pub fn set(&mut self, cabin: Cabin) {
        match cabin {
            Cabin::Economy => self.economy = true,
            Cabin::Business => self.business = true,
            Cabin::First => self.first = true,
        }
    }

    /// Returns true if `cabin` is available.
    pub fn has(&self, cabin: Cabin) -> bool {
        match cabin {
            Cabin::Economy => self.economy,
            Cabin::Business => self.business,
            Cabin::First => self.first,
        }
    }

    /// Flags set in either `self` or `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            economy: self.economy || other.economy,
            business: self.business || other.business,
            first: self.first || other.first,
        }
    }

    /// Returns true if any cabin is available.
    pub fn any(&self) -> bool {
        self.economy || self.business || self.first
    }
}

impl BitOr for CabinFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cabins() {
        assert_eq!(Cabin::parse("economy").unwrap(), Cabin::Economy);
        assert_eq!(Cabin::parse("Economy").unwrap(), Cabin::Economy);
        assert_eq!(Cabin::parse("BUSINESS").unwrap(), Cabin::Business);
        assert_eq!(Cabin::parse("first").unwrap(), Cabin::First);
        assert!(Cabin::parse("").is_err());
        assert!(Cabin::parse("premium_economy").is_err());
    }

    #[test]
    fn flags_are_independent() {
        let mut flags = CabinFlags::default();
        assert!(!flags.any());

        flags.set(Cabin::Business);
        assert!(flags.business);
        assert!(!flags.economy);
        assert!(!flags.first);
        assert!(flags.has(Cabin::Business));
        assert!(flags.any());
    }

    #[test]
    fn union_ors_each_flag() {
        let a = CabinFlags::only(Cabin::Economy);
        let b = CabinFlags::only(Cabin::First);
        let both = a | b;
        assert!(both.economy);
        assert!(!both.business);
        assert!(both.first);
        assert_eq!(a.union(a), a);
    }
}
