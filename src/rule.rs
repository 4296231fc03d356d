use crate::frequency::{
    EndType, Frequency, MonthOfYear, WeekOfMonth, weekday_label, weekday_name,
};
use crate::input::{RuleInput, WeekdaySlotInput};
use crate::rule_validation::{ValidationErrors, validate_rule};
use crate::summary::{RuleSummary, summarize};
use crate::transition::transition;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const TIME_FORMAT: &str = "%H:%M";

/// A rule's `start` or `end`: a bare date for weekly and longer cadences, a
/// date with a time of day for hourly and daily ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleBound {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl ScheduleBound {
    /// Accepts `YYYY-MM-DD HH:mm` or `YYYY-MM-DD`.
    pub fn parse(input: &str) -> Result<Self, chrono::ParseError> {
        let input = input.trim();
        match NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT) {
            Ok(date_time) => Ok(ScheduleBound::DateTime(date_time)),
            Err(_) => NaiveDate::parse_from_str(input, DATE_FORMAT).map(ScheduleBound::Date),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            ScheduleBound::Date(date) => *date,
            ScheduleBound::DateTime(date_time) => date_time.date(),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            ScheduleBound::Date(_) => None,
            ScheduleBound::DateTime(date_time) => Some(date_time.time()),
        }
    }

    /// The point in time this bound denotes; a bare date means midnight.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            ScheduleBound::Date(date) => date.and_time(NaiveTime::MIN),
            ScheduleBound::DateTime(date_time) => *date_time,
        }
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, ScheduleBound::DateTime(_))
    }

    /// Drops the time of day.
    pub fn to_date_only(self) -> Self {
        ScheduleBound::Date(self.date())
    }

    /// Adds midnight to a bare date; a date-time is kept as is.
    pub fn to_date_time(self) -> Self {
        ScheduleBound::DateTime(self.instant())
    }

    pub fn for_frequency(self, frequency: Frequency) -> Self {
        if frequency.uses_date_time() {
            self.to_date_time()
        } else {
            self.to_date_only()
        }
    }
}

impl fmt::Display for ScheduleBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleBound::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            ScheduleBound::DateTime(date_time) => {
                write!(f, "{}", date_time.format(DATE_TIME_FORMAT))
            }
        }
    }
}

impl FromStr for ScheduleBound {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScheduleBound::parse(s)
    }
}

pub fn parse_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// A validated weekday row; `start_time` is strictly before `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdaySlot {
    day_of_week: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl WeekdaySlot {
    /// Returns `None` unless `start_time < end_time`.
    pub fn new(day_of_week: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Option<Self> {
        (start_time < end_time).then_some(Self {
            day_of_week,
            start_time,
            end_time,
        })
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }
}

impl fmt::Display for WeekdaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}–{}",
            weekday_label(self.day_of_week),
            format_time(self.start_time),
            format_time(self.end_time)
        )
    }
}

impl From<&WeekdaySlot> for WeekdaySlotInput {
    fn from(slot: &WeekdaySlot) -> Self {
        WeekdaySlotInput::new(
            weekday_name(slot.day_of_week),
            format_time(slot.start_time),
            format_time(slot.end_time),
        )
    }
}

/// A schedule rule that passed validation.
///
/// Only [`validate_rule`] builds one, so the fields of frequencies other than
/// the active one are always empty and `start`/`end` already have the shape the
/// frequency calls for. Serializes to, and deserializes through, the
/// [`RuleInput`] wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleInput", into = "RuleInput")]
pub struct ScheduleRule {
    frequency: Frequency,
    start: ScheduleBound,
    end: Option<ScheduleBound>,
    end_type: EndType,
    week_number: BTreeSet<WeekOfMonth>,
    selected_months: BTreeSet<MonthOfYear>,
    selected_weekdays: Vec<WeekdaySlot>,
    color: Option<String>,
    background_color: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

/// Everything a validated rule is assembled from.
pub(crate) struct RuleParts {
    pub frequency: Frequency,
    pub start: ScheduleBound,
    pub end: Option<ScheduleBound>,
    pub end_type: EndType,
    pub week_number: BTreeSet<WeekOfMonth>,
    pub selected_months: BTreeSet<MonthOfYear>,
    pub selected_weekdays: Vec<WeekdaySlot>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ScheduleRule {
    pub(crate) fn from_parts(parts: RuleParts) -> Self {
        Self {
            frequency: parts.frequency,
            start: parts.start,
            end: parts.end,
            end_type: parts.end_type,
            week_number: parts.week_number,
            selected_months: parts.selected_months,
            selected_weekdays: parts.selected_weekdays,
            color: parts.color,
            background_color: parts.background_color,
            title: parts.title,
            description: parts.description,
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn start(&self) -> ScheduleBound {
        self.start
    }

    /// The end bound, when one was given. Only a date limit when
    /// [`ScheduleRule::end_type`] is [`EndType::On`].
    pub fn end(&self) -> Option<ScheduleBound> {
        self.end
    }

    pub fn end_type(&self) -> EndType {
        self.end_type
    }

    /// Last date the rule may produce a session on, if it ends at all.
    pub fn last_date(&self) -> Option<NaiveDate> {
        match self.end_type {
            EndType::On => self.end.map(|end| end.date()),
            EndType::Never => None,
        }
    }

    pub fn week_number(&self) -> &BTreeSet<WeekOfMonth> {
        &self.week_number
    }

    pub fn selected_months(&self) -> &BTreeSet<MonthOfYear> {
        &self.selected_months
    }

    pub fn selected_weekdays(&self) -> &[WeekdaySlot] {
        &self.selected_weekdays
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn to_input(&self) -> RuleInput {
        RuleInput::from(self)
    }

    pub fn summary(&self) -> RuleSummary {
        summarize(&self.to_input())
    }

    /// Switches cadence. The result is form state again since it may need
    /// more input (a monthly rule without week numbers, say).
    pub fn with_frequency(&self, frequency: Frequency) -> RuleInput {
        transition(&self.to_input(), frequency)
    }
}

impl From<&ScheduleRule> for RuleInput {
    fn from(rule: &ScheduleRule) -> Self {
        RuleInput {
            frequency: rule.frequency.as_str().to_string(),
            start: Some(rule.start.to_string()),
            end: rule.end.map(|end| end.to_string()),
            end_type: rule.end_type,
            week_number: rule.week_number.iter().map(|w| w.number()).collect(),
            selected_months: rule
                .selected_months
                .iter()
                .map(|m| i32::from(m.index()))
                .collect(),
            selected_weekdays: rule
                .selected_weekdays
                .iter()
                .map(WeekdaySlotInput::from)
                .collect(),
            color: rule.color.clone(),
            background_color: rule.background_color.clone(),
            title: rule.title.clone(),
            description: rule.description.clone(),
        }
    }
}

impl From<ScheduleRule> for RuleInput {
    fn from(rule: ScheduleRule) -> Self {
        RuleInput::from(&rule)
    }
}

impl TryFrom<RuleInput> for ScheduleRule {
    type Error = ValidationErrors;

    fn try_from(input: RuleInput) -> Result<Self, Self::Error> {
        validate_rule(&input)
    }
}
