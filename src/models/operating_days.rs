use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

bitflags::bitflags! {
    /// Days of the week a service runs, as declared by the section file's
    /// day-of-run codes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OperatingDays: u8 {
        const SUNDAY    = 0b0000_0001;
        const MONDAY    = 0b0000_0010;
        const TUESDAY   = 0b0000_0100;
        const WEDNESDAY = 0b0000_1000;
        const THURSDAY  = 0b0001_0000;
        const FRIDAY    = 0b0010_0000;
        const SATURDAY  = 0b0100_0000;
        const DAILY     = Self::SUNDAY.bits() | Self::MONDAY.bits() | Self::TUESDAY.bits()
                        | Self::WEDNESDAY.bits() | Self::THURSDAY.bits() | Self::FRIDAY.bits()
                        | Self::SATURDAY.bits();
        const WEEKDAYS  = Self::MONDAY.bits() | Self::TUESDAY.bits() | Self::WEDNESDAY.bits()
                        | Self::THURSDAY.bits() | Self::FRIDAY.bits();
        const WEEKENDS  = Self::SATURDAY.bits() | Self::SUNDAY.bits();
    }
}

impl Default for OperatingDays {
    fn default() -> Self {
        Self::DAILY
    }
}

impl OperatingDays {
    /// Parse the day-of-run field: `Daily` or a space-separated subset of
    /// `Su M Tu W Th F Sa`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::UnknownDayCode` for any unrecognised code.
    pub fn parse(value: &str) -> Result<Self, LoadError> {
        if value.trim().eq_ignore_ascii_case("daily") {
            return Ok(Self::DAILY);
        }
        let mut days = Self::empty();
        for code in value.split_whitespace() {
            days |= Self::from_code(code)
                .ok_or_else(|| LoadError::UnknownDayCode(code.to_string()))?;
        }
        Ok(days)
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "Su" => Some(Self::SUNDAY),
            "M" => Some(Self::MONDAY),
            "Tu" => Some(Self::TUESDAY),
            "W" => Some(Self::WEDNESDAY),
            "Th" => Some(Self::THURSDAY),
            "F" => Some(Self::FRIDAY),
            "Sa" => Some(Self::SATURDAY),
            _ => None,
        }
    }

    const fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Sun => Self::SUNDAY,
            Weekday::Mon => Self::MONDAY,
            Weekday::Tue => Self::TUESDAY,
            Weekday::Wed => Self::WEDNESDAY,
            Weekday::Thu => Self::THURSDAY,
            Weekday::Fri => Self::FRIDAY,
            Weekday::Sat => Self::SATURDAY,
        }
    }

    /// Whether the service runs on the given weekday.
    #[must_use]
    pub fn runs_on(self, day: Weekday) -> bool {
        self.contains(Self::from_weekday(day))
    }

    /// Check if the service runs every day
    #[must_use]
    pub const fn is_daily(self) -> bool {
        self.bits() == Self::DAILY.bits()
    }

    /// Day codes in the form the data files use
    #[must_use]
    pub fn to_display_string(self) -> String {
        if self.is_daily() {
            return "Daily".to_string();
        }
        let mut codes = Vec::new();
        if self.contains(Self::SUNDAY) { codes.push("Su"); }
        if self.contains(Self::MONDAY) { codes.push("M"); }
        if self.contains(Self::TUESDAY) { codes.push("Tu"); }
        if self.contains(Self::WEDNESDAY) { codes.push("W"); }
        if self.contains(Self::THURSDAY) { codes.push("Th"); }
        if self.contains(Self::FRIDAY) { codes.push("F"); }
        if self.contains(Self::SATURDAY) { codes.push("Sa"); }
        codes.join(" ")
    }
}

// Serialized in the day-code form rather than raw bits
impl Serialize for OperatingDays {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_display_string())
    }
}

impl<'de> Deserialize<'de> for OperatingDays {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_daily() {
        let days = OperatingDays::default();
        assert!(days.is_daily());
        assert!(days.contains(OperatingDays::SUNDAY));
        assert!(days.contains(OperatingDays::SATURDAY));
    }

    #[test]
    fn test_parse_daily() {
        let days = OperatingDays::parse("Daily").expect("should parse");
        assert!(days.is_daily());
    }

    #[test]
    fn test_parse_day_codes() {
        let days = OperatingDays::parse("M W F").expect("should parse");
        assert!(days.contains(OperatingDays::MONDAY));
        assert!(days.contains(OperatingDays::WEDNESDAY));
        assert!(days.contains(OperatingDays::FRIDAY));
        assert!(!days.contains(OperatingDays::SUNDAY));
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let err = OperatingDays::parse("M Xx F");
        assert!(matches!(err, Err(LoadError::UnknownDayCode(code)) if code == "Xx"));
    }

    #[test]
    fn test_parse_empty_runs_never() {
        let days = OperatingDays::parse("").expect("should parse");
        assert!(days.is_empty());
        assert!(!days.runs_on(Weekday::Mon));
    }

    #[test]
    fn test_runs_on() {
        let days = OperatingDays::WEEKENDS;
        assert!(days.runs_on(Weekday::Sat));
        assert!(days.runs_on(Weekday::Sun));
        assert!(!days.runs_on(Weekday::Wed));
    }

    #[test]
    fn test_to_display_string() {
        assert_eq!(OperatingDays::DAILY.to_display_string(), "Daily");
        let days = OperatingDays::SUNDAY | OperatingDays::TUESDAY | OperatingDays::SATURDAY;
        assert_eq!(days.to_display_string(), "Su Tu Sa");
    }

    #[test]
    fn test_serialization_round_trips() {
        let days = OperatingDays::MONDAY | OperatingDays::THURSDAY;
        let serialized = serde_json::to_string(&days).expect("serialization should succeed");
        assert_eq!(serialized, "\"M Th\"");
        let deserialized: OperatingDays =
            serde_json::from_str(&serialized).expect("deserialization should succeed");
        assert_eq!(days, deserialized);
    }
}
