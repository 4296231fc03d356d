use crate::frequency::{EndType, Frequency};
use serde::{Deserialize, Serialize};

/// A schedule rule as the form and the API exchange it: possibly partially
/// filled in, possibly malformed. [`crate::validate_rule`] turns it into a
/// [`crate::ScheduleRule`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleInput {
    #[serde(default)]
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default)]
    pub end_type: EndType,
    #[serde(default)]
    pub week_number: Vec<i32>,
    #[serde(default)]
    pub selected_months: Vec<i32>,
    #[serde(default)]
    pub selected_weekdays: Vec<WeekdaySlotInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One row of the weekday list: a day plus an `HH:mm` time window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekdaySlotInput {
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl RuleInput {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency: frequency.as_str().to_string(),
            ..Self::default()
        }
    }

    /// The parsed frequency, if the text names a known one.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency.parse().ok()
    }
}

impl WeekdaySlotInput {
    pub fn new(
        day_of_week: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            day_of_week: Some(day_of_week.into()),
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
        }
    }
}

/// Forms submit empty strings for untouched fields; treat them as absent.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
