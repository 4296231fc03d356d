use crate::frequency::{EndType, Frequency, MonthOfYear, WeekOfMonth, parse_weekday};
use crate::input::{RuleInput, non_blank};
use crate::rule::{RuleParts, ScheduleBound, ScheduleRule, WeekdaySlot, parse_time};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// What can be wrong with one field of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RuleError {
    #[error("frequency must be one of hourly, daily, weekly, monthly or yearly")]
    InvalidFrequency,
    #[error("start date is required")]
    MissingStart,
    #[error("end date is required when the schedule ends on a date")]
    MissingEnd,
    #[error("date must be formatted as YYYY-MM-DD or YYYY-MM-DD HH:mm")]
    InvalidDate,
    #[error("end must not be before start")]
    EndBeforeStart,
    #[error("select at least one week of the month")]
    MissingWeekNumber,
    #[error("week number must be 1, 2, 3, 4 or -1")]
    InvalidWeekNumber,
    #[error("week number is selected more than once")]
    DuplicateWeekNumber,
    #[error("select at least one month")]
    MissingSelectedMonths,
    #[error("month must be between 0 and 11")]
    InvalidMonth,
    #[error("month is selected more than once")]
    DuplicateMonth,
    #[error("add at least one weekday")]
    MissingWeekdays,
    #[error("select a day of the week")]
    MissingDayOfWeek,
    #[error("start time must be before end time (HH:mm)")]
    InvalidTimeRange,
    #[error("color must be a hex value like #RRGGBB")]
    InvalidColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(rename = "code")]
    pub error: RuleError,
}

/// Field-level problems found in a [`RuleInput`], in the order the fields are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, error: RuleError) {
        self.errors.push(FieldError {
            field: field.into(),
            error,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn contains(&self, error: RuleError) -> bool {
        self.errors.iter().any(|field| field.error == error)
    }

    pub fn errors_for(&self, field: &str) -> Vec<RuleError> {
        self.errors
            .iter()
            .filter(|err| err.field == field)
            .map(|err| err.error)
            .collect()
    }

    pub fn codes(&self) -> Vec<RuleError> {
        self.errors.iter().map(|err| err.error).collect()
    }

    /// `field -> message`, several messages for one field joined with "; ".
    pub fn to_field_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for err in &self.errors {
            map.entry(err.field.clone())
                .and_modify(|existing| {
                    existing.push_str("; ");
                    existing.push_str(&err.error.to_string());
                })
                .or_insert_with(|| err.error.to_string());
        }
        map
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_field_map().serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn parse_bound(
    raw: &str,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<ScheduleBound> {
    match ScheduleBound::parse(raw) {
        Ok(bound) => Some(bound),
        Err(_) => {
            errors.push(field, RuleError::InvalidDate);
            None
        }
    }
}

fn check_color(value: &Option<String>, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    let color = non_blank(value)?;
    if is_hex_color(color) {
        Some(color.to_string())
    } else {
        errors.push(field, RuleError::InvalidColor);
        None
    }
}

fn check_week_numbers(input: &RuleInput, errors: &mut ValidationErrors) -> BTreeSet<WeekOfMonth> {
    let mut weeks = BTreeSet::new();
    if input.week_number.is_empty() {
        errors.push("week_number", RuleError::MissingWeekNumber);
        return weeks;
    }
    for (idx, number) in input.week_number.iter().enumerate() {
        match WeekOfMonth::from_number(*number) {
            Some(week) => {
                if !weeks.insert(week) {
                    errors.push(format!("week_number[{idx}]"), RuleError::DuplicateWeekNumber);
                }
            }
            None => errors.push(format!("week_number[{idx}]"), RuleError::InvalidWeekNumber),
        }
    }
    weeks
}

fn check_months(input: &RuleInput, errors: &mut ValidationErrors) -> BTreeSet<MonthOfYear> {
    let mut months = BTreeSet::new();
    if input.selected_months.is_empty() {
        errors.push("selected_months", RuleError::MissingSelectedMonths);
        return months;
    }
    for (idx, index) in input.selected_months.iter().enumerate() {
        match MonthOfYear::from_index(*index) {
            Some(month) => {
                if !months.insert(month) {
                    errors.push(format!("selected_months[{idx}]"), RuleError::DuplicateMonth);
                }
            }
            None => errors.push(format!("selected_months[{idx}]"), RuleError::InvalidMonth),
        }
    }
    months
}

fn check_weekdays(input: &RuleInput, errors: &mut ValidationErrors) -> Vec<WeekdaySlot> {
    if input.selected_weekdays.is_empty() {
        errors.push("selected_weekdays", RuleError::MissingWeekdays);
        return Vec::new();
    }
    let mut slots = Vec::with_capacity(input.selected_weekdays.len());
    for (idx, slot) in input.selected_weekdays.iter().enumerate() {
        let day = non_blank(&slot.day_of_week).and_then(parse_weekday);
        if day.is_none() {
            errors.push(
                format!("selected_weekdays[{idx}].day_of_week"),
                RuleError::MissingDayOfWeek,
            );
        }
        let start_time = non_blank(&slot.start_time).and_then(parse_time);
        let end_time = non_blank(&slot.end_time).and_then(parse_time);
        let window = match (start_time, end_time) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => {
                errors.push(format!("selected_weekdays[{idx}]"), RuleError::InvalidTimeRange);
                None
            }
        };
        if let (Some(day), Some((start, end))) = (day, window) {
            slots.extend(WeekdaySlot::new(day, start, end));
        }
    }
    slots
}

/// Checks a candidate rule and, when every check passes, returns its
/// canonical form. Fields that belong to a frequency other than the selected
/// one are ignored and do not reach the result.
pub fn validate_rule(input: &RuleInput) -> Result<ScheduleRule, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let frequency = match input.frequency.parse::<Frequency>() {
        Ok(frequency) => Some(frequency),
        Err(_) => {
            errors.push("frequency", RuleError::InvalidFrequency);
            None
        }
    };

    let mut start = match non_blank(&input.start) {
        Some(raw) => parse_bound(raw, "start", &mut errors),
        None => {
            errors.push("start", RuleError::MissingStart);
            None
        }
    };

    let mut end = match (input.end_type, non_blank(&input.end)) {
        (EndType::On, Some(raw)) => parse_bound(raw, "end", &mut errors),
        (EndType::On, None) => {
            errors.push("end", RuleError::MissingEnd);
            None
        }
        // Not a date limit; only the time of day may still matter.
        (EndType::Never, raw) => raw.and_then(|raw| ScheduleBound::parse(raw).ok()),
    };

    if let Some(frequency) = frequency {
        start = start.map(|bound| bound.for_frequency(frequency));
        end = end.map(|bound| bound.for_frequency(frequency));
    }

    if input.end_type == EndType::On {
        if let (Some(start), Some(end)) = (start, end) {
            if end.instant() < start.instant() {
                errors.push("end", RuleError::EndBeforeStart);
            }
        }
    }

    let week_number = match frequency {
        Some(f) if f.uses_week_numbers() => check_week_numbers(input, &mut errors),
        _ => BTreeSet::new(),
    };
    let selected_months = match frequency {
        Some(f) if f.uses_months() => check_months(input, &mut errors),
        _ => BTreeSet::new(),
    };
    let selected_weekdays = match frequency {
        Some(f) if f.uses_weekdays() => check_weekdays(input, &mut errors),
        _ => Vec::new(),
    };

    let color = check_color(&input.color, "color", &mut errors);
    let background_color = check_color(&input.background_color, "background_color", &mut errors);

    let (Some(frequency), Some(start)) = (frequency, start) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ScheduleRule::from_parts(RuleParts {
        frequency,
        start,
        end,
        end_type: input.end_type,
        week_number,
        selected_months,
        selected_weekdays,
        color,
        background_color,
        title: non_blank(&input.title).map(str::to_string),
        description: non_blank(&input.description).map(str::to_string),
    }))
}
