//! Airline carrier and flight identifier types.

use std::fmt;

/// Error returned when parsing an invalid carrier code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid carrier code: {reason}")]
pub struct InvalidCarrierCode {
    reason: &'static str,
}

/// A valid 2-character IATA airline designator.
///
/// Designators are two uppercase ASCII alphanumerics with at least one
/// letter (e.g. "AC", "LH", "U2", "9W").
///
/// # Examples
///
/// ```
/// use award_planner::domain::CarrierCode;
///
/// let ac = CarrierCode::parse("AC").unwrap();
/// assert_eq!(ac.as_str(), "AC");
///
/// assert!(CarrierCode::parse("U2").is_ok());
/// assert!(CarrierCode::parse("ac").is_err());
/// assert!(CarrierCode::parse("12").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarrierCode([u8; 2]);

impl CarrierCode {
    /// Parse a carrier code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidCarrierCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidCarrierCode {
                reason: "must be exactly 2 characters",
            });
        }

        for &b in bytes {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidCarrierCode {
                    reason: "must be uppercase ASCII letters or digits",
                });
            }
        }

        if bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidCarrierCode {
                reason: "must contain at least one letter",
            });
        }

        Ok(CarrierCode([bytes[0], bytes[1]]))
    }

    /// Returns the carrier code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII alphanumerics are ever stored
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Debug for CarrierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CarrierCode({})", self.as_str())
    }
}

impl fmt::Display for CarrierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid flight identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid flight identifier {input:?}: {reason}")]
pub struct InvalidFlightId {
    input: String,
    reason: &'static str,
}

/// A flight identifier: carrier designator plus flight number.
///
/// The number is 1-4 digits with an optional single-letter operational
/// suffix. Equality is on the canonical (carrier, number) pair, so alias
/// rewriting must happen before two identifiers are compared.
///
/// # Examples
///
/// ```
/// use award_planner::domain::{CarrierCode, FlightId};
///
/// let id = FlightId::parse("RV1850").unwrap();
/// assert_eq!(id.carrier().as_str(), "RV");
/// assert_eq!(id.number(), "1850");
///
/// let ac = CarrierCode::parse("AC").unwrap();
/// assert_eq!(id.with_carrier(ac).to_string(), "AC1850");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightId {
    carrier: CarrierCode,
    number: String,
}

impl FlightId {
    /// Parse a flight identifier such as `"AC123"` or `"LH400A"`.
    ///
    /// Surrounding whitespace and a space between carrier and number are tolerated.
    pub fn parse(s: &str) -> Result<Self, InvalidFlightId> {
        let invalid = |reason| InvalidFlightId {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        if trimmed.len() < 3 || !trimmed.is_ascii() {
            return Err(invalid("too short"));
        }

        let (carrier, rest) = trimmed.split_at(2);
        let carrier = CarrierCode::parse(carrier).map_err(|_| invalid("bad carrier prefix"))?;
        let number = rest.trim_start();

        let digits = number.trim_end_matches(|c: char| c.is_ascii_uppercase());
        let suffix_len = number.len() - digits.len();
        if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("flight number must be 1-4 digits"));
        }
        if suffix_len > 1 {
            return Err(invalid("at most one suffix letter"));
        }

        Ok(Self {
            carrier,
            number: number.to_string(),
        })
    }

    /// Returns the carrier designator.
    pub fn carrier(&self) -> CarrierCode {
        self.carrier
    }

    /// Returns the flight number without the carrier prefix.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the same flight number under a different carrier.
    pub fn with_carrier(&self, carrier: CarrierCode) -> Self {
        Self {
            carrier,
            number: self.number.clone(),
        }
    }
}

impl fmt::Debug for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlightId({}{})", self.carrier, self.number)
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.carrier, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_carriers() {
        assert!(CarrierCode::parse("AC").is_ok());
        assert!(CarrierCode::parse("LH").is_ok());
        assert!(CarrierCode::parse("U2").is_ok());
        assert!(CarrierCode::parse("9W").is_ok());
    }

    #[test]
    fn reject_bad_carriers() {
        assert!(CarrierCode::parse("").is_err());
        assert!(CarrierCode::parse("A").is_err());
        assert!(CarrierCode::parse("ACA").is_err());
        assert!(CarrierCode::parse("ac").is_err());
        assert!(CarrierCode::parse("99").is_err());
        assert!(CarrierCode::parse("A-").is_err());
    }

    #[test]
    fn carrier_display_and_debug() {
        let code = CarrierCode::parse("EK").unwrap();
        assert_eq!(format!("{}", code), "EK");
        assert_eq!(format!("{:?}", code), "CarrierCode(EK)");
    }

    #[test]
    fn parse_flight_ids() {
        let id = FlightId::parse("AC123").unwrap();
        assert_eq!(id.carrier().as_str(), "AC");
        assert_eq!(id.number(), "123");

        let id = FlightId::parse("LH 400").unwrap();
        assert_eq!(id.to_string(), "LH400");

        let id = FlightId::parse("UA1A").unwrap();
        assert_eq!(id.number(), "1A");
    }

    #[test]
    fn reject_bad_flight_ids() {
        assert!(FlightId::parse("").is_err());
        assert!(FlightId::parse("AC").is_err());
        assert!(FlightId::parse("AC12345").is_err());
        assert!(FlightId::parse("ACXYZ").is_err());
        assert!(FlightId::parse("AC12AB").is_err());
        assert!(FlightId::parse("ac123").is_err());
    }

    #[test]
    fn with_carrier_keeps_number() {
        let id = FlightId::parse("RV1850").unwrap();
        let ac = CarrierCode::parse("AC").unwrap();
        let rewritten = id.with_carrier(ac);
        assert_eq!(rewritten.carrier(), ac);
        assert_eq!(rewritten.number(), "1850");
        assert_ne!(rewritten, id);
        assert_eq!(rewritten, FlightId::parse("AC1850").unwrap());
    }

    #[test]
    fn flight_id_error_mentions_input() {
        let err = FlightId::parse("AC12345").unwrap_err();
        assert!(err.to_string().contains("AC12345"));
    }
}
