//! Route, date range and stopover types.

use std::fmt;

use chrono::{Duration, NaiveDate};

use super::{Airport, DomainError};

/// An ordered list of at least two airports.
///
/// Hop `i` flies from `airports[i]` to `airports[i + 1]`.
///
/// # Examples
///
/// ```
/// use award_planner::domain::{Airport, Route};
///
/// let route = Route::parse("YYZ-YVR-NRT").unwrap();
/// assert_eq!(route.hop_count(), 2);
/// assert_eq!(route.to_string(), "YYZ-YVR-NRT");
///
/// assert!(Route::parse("YYZ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(Vec<Airport>);

impl Route {
    /// Build a route from airports, rejecting fewer than two.
    pub fn new(airports: Vec<Airport>) -> Result<Self, DomainError> {
        if airports.len() < 2 {
            return Err(DomainError::RouteTooShort(airports.len()));
        }
        Ok(Self(airports))
    }

    /// Parse a dash-separated route such as `"YYZ-YVR-NRT"`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let airports = s
            .split('-')
            .map(|code| {
                Airport::parse_normalized(code)
                    .map_err(|_| DomainError::InvalidAirport(code.trim().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(airports)
    }

    pub fn airports(&self) -> &[Airport] {
        &self.0
    }

    /// Airport at route position `idx`, if any.
    pub fn airport(&self, idx: usize) -> Option<Airport> {
        self.0.get(idx).copied()
    }

    /// Number of hops (airports minus one).
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    /// `(index, origin, destination)` for every hop, in order.
    pub fn hops(&self) -> impl Iterator<Item = (usize, Airport, Airport)> + '_ {
        self.0
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (i, pair[0], pair[1]))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.0.iter().map(Airport::as_str).collect();
        f.write_str(&codes.join("-"))
    }
}

/// User-chosen travel dates, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `end` before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// A deliberate multi-day break at one interior route airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopoverSpec {
    pub airport: Airport,
    pub days: u32,
}

impl StopoverSpec {
    pub fn new(airport: Airport, days: u32) -> Self {
        Self { airport, days }
    }

    /// The stopover length as a duration (`days` x 24h).
    pub fn offset(&self) -> Duration {
        Duration::days(i64::from(self.days))
    }

    /// Returns true if the stopover is at `airport`.
    pub fn is_at(&self, airport: Airport) -> bool {
        self.airport == airport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn route_requires_two_airports() {
        assert!(matches!(
            Route::new(vec![]),
            Err(DomainError::RouteTooShort(0))
        ));
        assert!(matches!(
            Route::parse("YYZ"),
            Err(DomainError::RouteTooShort(1))
        ));
        assert!(Route::parse("YYZ-YVR").is_ok());
    }

    #[test]
    fn route_parse_normalizes_codes() {
        let route = Route::parse(" yyz - yvr-NRT").unwrap();
        assert_eq!(route.to_string(), "YYZ-YVR-NRT");
    }

    #[test]
    fn route_parse_reports_bad_code() {
        match Route::parse("YYZ-TOKYO") {
            Err(DomainError::InvalidAirport(code)) => assert_eq!(code, "TOKYO"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn route_hops() {
        let route = Route::parse("YYZ-YVR-NRT-SIN").unwrap();
        let hops: Vec<String> = route
            .hops()
            .map(|(i, a, b)| format!("{i}:{a}-{b}"))
            .collect();
        assert_eq!(hops, vec!["0:YYZ-YVR", "1:YVR-NRT", "2:NRT-SIN"]);
        assert_eq!(route.airport(2).unwrap().as_str(), "NRT");
        assert_eq!(route.airport(4), None);
    }

    #[test]
    fn date_range_validation() {
        assert!(DateRange::new(date(2025, 3, 15), date(2025, 3, 15)).is_ok());
        assert!(DateRange::new(date(2025, 3, 15), date(2025, 3, 20)).is_ok());
        assert!(DateRange::new(date(2025, 3, 20), date(2025, 3, 15)).is_err());

        let single = DateRange::single(date(2025, 3, 15));
        assert_eq!(single.start(), single.end());
    }

    #[test]
    fn stopover_offset() {
        let stop = StopoverSpec::new(Airport::parse("YVR").unwrap(), 2);
        assert_eq!(stop.offset(), Duration::hours(48));
        assert!(stop.is_at(Airport::parse("YVR").unwrap()));
        assert!(!stop.is_at(Airport::parse("NRT").unwrap()));
    }
}
