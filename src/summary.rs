use crate::frequency::{EndType, Frequency, MonthOfYear, WeekOfMonth, parse_weekday, weekday_label};
use crate::input::{RuleInput, WeekdaySlotInput, non_blank};
use crate::rule::{ScheduleBound, format_time, parse_time};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Stands in for anything missing or unreadable.
pub const PLACEHOLDER: &str = "—";

const DISPLAY_DATE_FORMAT: &str = "%-d %b %Y";

/// Read-only description of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub frequency: String,
    pub date_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weeks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub months: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<WeekdaySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdaySummary {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

impl fmt::Display for WeekdaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}–{}", self.day_of_week, self.start_time, self.end_time)
    }
}

impl RuleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(self.frequency.clone());
        if let Some(time_range) = &self.time_range {
            parts.push(time_range.clone());
        }
        if !self.weeks.is_empty() {
            parts.push(self.weeks.join(", "));
        }
        if !self.months.is_empty() {
            parts.push(self.months.join(", "));
        }
        if !self.weekdays.is_empty() {
            let days = self
                .weekdays
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(days);
        }
        parts.push(self.date_range.clone());
        parts.join(" · ")
    }
}

impl fmt::Display for RuleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cli_summary())
    }
}

fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn bound(raw: &Option<String>, frequency: Option<Frequency>) -> Option<ScheduleBound> {
    let parsed = ScheduleBound::parse(non_blank(raw)?).ok()?;
    Some(match frequency {
        Some(frequency) => parsed.for_frequency(frequency),
        None => parsed,
    })
}

fn date_range(input: &RuleInput, frequency: Option<Frequency>) -> String {
    let start = bound(&input.start, frequency)
        .map(|b| display_date(b.date()))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    match input.end_type {
        EndType::On => {
            let end = bound(&input.end, frequency)
                .map(|b| display_date(b.date()))
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            format!("{start} – {end}")
        }
        EndType::Never => format!("starting {start}"),
    }
}

fn time_range(input: &RuleInput, frequency: Frequency) -> String {
    let time_of = |raw: &Option<String>| {
        bound(raw, Some(frequency))
            .and_then(|b| b.time())
            .map(format_time)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    format!("{}–{}", time_of(&input.start), time_of(&input.end))
}

fn weekday(slot: &WeekdaySlotInput) -> WeekdaySummary {
    let time = |raw: &Option<String>| {
        non_blank(raw)
            .and_then(parse_time)
            .map(format_time)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    WeekdaySummary {
        day_of_week: non_blank(&slot.day_of_week)
            .and_then(parse_weekday)
            .map(|day| weekday_label(day).to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        start_time: time(&slot.start_time),
        end_time: time(&slot.end_time),
    }
}

/// Describes a rule for display.
///
/// Meant for validated rules; anything missing or malformed is rendered as
/// [`PLACEHOLDER`] rather than failing. When the frequency itself is unknown
/// every non-empty selector is shown.
pub fn summarize(input: &RuleInput) -> RuleSummary {
    let frequency = input.frequency();
    let shows = |wanted: fn(Frequency) -> bool, has_data: bool| match frequency {
        Some(frequency) => wanted(frequency),
        None => has_data,
    };

    let time_range = frequency
        .filter(|f| f.uses_date_time())
        .map(|f| time_range(input, f));

    let weeks = if shows(Frequency::uses_week_numbers, !input.week_number.is_empty()) {
        input
            .week_number
            .iter()
            .map(|n| {
                WeekOfMonth::from_number(*n)
                    .map(WeekOfMonth::label)
                    .unwrap_or_else(|| PLACEHOLDER.to_string())
            })
            .collect()
    } else {
        Vec::new()
    };

    let months = if shows(Frequency::uses_months, !input.selected_months.is_empty()) {
        input
            .selected_months
            .iter()
            .map(|idx| {
                MonthOfYear::from_index(*idx)
                    .map(|m| m.name().to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string())
            })
            .collect()
    } else {
        Vec::new()
    };

    let weekdays = if shows(Frequency::uses_weekdays, !input.selected_weekdays.is_empty()) {
        input.selected_weekdays.iter().map(weekday).collect()
    } else {
        Vec::new()
    };

    RuleSummary {
        frequency: frequency
            .map(|f| f.label().to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        date_range: date_range(input, frequency),
        time_range,
        weeks,
        months,
        weekdays,
    }
}
