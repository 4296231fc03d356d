use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a schedule rule repeats.
///
/// `Hourly` is understood everywhere in the model but is not part of
/// [`Frequency::SELECTABLE`], the list offered to people filling in a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown frequency '{0}'")]
pub struct ParseFrequencyError(pub String);

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub const SELECTABLE: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Hourly => "Hourly",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    /// Start and end carry a time of day for these frequencies, a bare date otherwise.
    pub fn uses_date_time(self) -> bool {
        matches!(self, Frequency::Hourly | Frequency::Daily)
    }

    pub fn uses_weekdays(self) -> bool {
        matches!(
            self,
            Frequency::Weekly | Frequency::Monthly | Frequency::Yearly
        )
    }

    pub fn uses_week_numbers(self) -> bool {
        self == Frequency::Monthly
    }

    pub fn uses_months(self) -> bool {
        self == Frequency::Yearly
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// Whether a rule stops on its `end` date or repeats indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndType {
    On,
    #[default]
    Never,
}

impl EndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndType::On => "on",
            EndType::Never => "never",
        }
    }
}

impl FromStr for EndType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(EndType::On),
            "never" => Ok(EndType::Never),
            other => Err(format!("unknown end_type '{other}'")),
        }
    }
}

/// Week of the month for monthly rules. Serialized as 1..=4, or -1 for the last week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    pub fn from_number(n: i32) -> Option<Self> {
        match n {
            1 => Some(WeekOfMonth::First),
            2 => Some(WeekOfMonth::Second),
            3 => Some(WeekOfMonth::Third),
            4 => Some(WeekOfMonth::Fourth),
            -1 => Some(WeekOfMonth::Last),
            _ => None,
        }
    }

    pub fn number(self) -> i32 {
        match self {
            WeekOfMonth::First => 1,
            WeekOfMonth::Second => 2,
            WeekOfMonth::Third => 3,
            WeekOfMonth::Fourth => 4,
            WeekOfMonth::Last => -1,
        }
    }

    pub fn label(self) -> String {
        match self {
            WeekOfMonth::Last => "Last Week".to_string(),
            other => format!("Week {}", other.number()),
        }
    }
}

impl TryFrom<i32> for WeekOfMonth {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        WeekOfMonth::from_number(value)
            .ok_or_else(|| format!("week number {value} must be 1, 2, 3, 4 or -1"))
    }
}

impl From<WeekOfMonth> for i32 {
    fn from(value: WeekOfMonth) -> Self {
        value.number()
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Zero-based month index (0 = January) as exchanged with the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MonthOfYear(u8);

impl MonthOfYear {
    pub fn from_index(index: i32) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|idx| *idx < 12)
            .map(MonthOfYear)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Calendar month number, 1..=12, as chrono counts them.
    pub fn number(self) -> u32 {
        u32::from(self.0) + 1
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.0)]
    }
}

impl TryFrom<i32> for MonthOfYear {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        MonthOfYear::from_index(value).ok_or_else(|| format!("month {value} is outside 0..=11"))
    }
}

impl From<MonthOfYear> for i32 {
    fn from(value: MonthOfYear) -> Self {
        i32::from(value.0)
    }
}

pub fn parse_weekday(input: &str) -> Option<Weekday> {
    match input.trim().to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Lowercase wire name ("monday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Display name ("Monday").
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_is_parsed_but_not_selectable() {
        assert_eq!("Hourly".parse::<Frequency>(), Ok(Frequency::Hourly));
        assert!(!Frequency::SELECTABLE.contains(&Frequency::Hourly));
    }

    #[test]
    fn last_week_sorts_after_numbered_weeks() {
        let mut weeks = vec![WeekOfMonth::Last, WeekOfMonth::Second, WeekOfMonth::First];
        weeks.sort();
        assert_eq!(
            weeks,
            vec![WeekOfMonth::First, WeekOfMonth::Second, WeekOfMonth::Last]
        );
        assert_eq!(WeekOfMonth::Last.label(), "Last Week");
    }

    #[test]
    fn month_index_is_zero_based() {
        let december = MonthOfYear::from_index(11).unwrap();
        assert_eq!(december.name(), "December");
        assert_eq!(december.number(), 12);
        assert!(MonthOfYear::from_index(12).is_none());
        assert!(MonthOfYear::from_index(-1).is_none());
    }
}
