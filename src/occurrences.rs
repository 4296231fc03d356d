use crate::calendar::{days_in_range, last_weekday, months_in_range, nth_weekday};
use crate::catalog::ClassCatalog;
use crate::frequency::{EndType, Frequency, WeekOfMonth, weekday_name};
use crate::rule::{ScheduleRule, WeekdaySlot, format_time};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rayon::prelude::*;
use serde::{Serialize, Serializer};

/// Longest window a single expansion may cover.
pub const MAX_WINDOW_DAYS: i64 = 366 * 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OccurrenceError {
    #[error("window start {from} is after window end {to}")]
    InvertedWindow { from: NaiveDate, to: NaiveDate },
    #[error("window of {days} days exceeds the {max}-day limit")]
    WindowTooLarge { days: i64, max: i64 },
}

/// One concrete session produced by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_time")]
    pub end_time: NaiveTime,
    #[serde(serialize_with = "serialize_weekday")]
    pub day_of_week: Weekday,
}

fn serialize_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(*time))
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

// chrono's Weekday has no ordering; it follows from the date anyway.
impl Ord for Occurrence {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.date, self.start_time, self.end_time).cmp(&(
            other.date,
            other.start_time,
            other.end_time,
        ))
    }
}

impl PartialOrd for Occurrence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Occurrence {
    fn from_slot(date: NaiveDate, slot: &WeekdaySlot) -> Self {
        Self {
            date,
            start_time: slot.start_time(),
            end_time: slot.end_time(),
            day_of_week: date.weekday(),
        }
    }
}

pub fn check_window(from: NaiveDate, to: NaiveDate) -> Result<(), OccurrenceError> {
    if from > to {
        return Err(OccurrenceError::InvertedWindow { from, to });
    }
    let days = (to - from).num_days() + 1;
    if days > MAX_WINDOW_DAYS {
        return Err(OccurrenceError::WindowTooLarge {
            days,
            max: MAX_WINDOW_DAYS,
        });
    }
    Ok(())
}

/// Sessions of `rule` that fall on dates in `from..=to`, sorted by date and
/// start time. Rules that never end are limited only by the window.
pub fn occurrences(
    rule: &ScheduleRule,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Occurrence>, OccurrenceError> {
    check_window(from, to)?;

    let lower = from.max(rule.start().date());
    let upper = match rule.last_date() {
        Some(last) => to.min(last),
        None => to,
    };
    if lower > upper {
        return Ok(Vec::new());
    }

    let mut found = match rule.frequency() {
        Frequency::Hourly => hourly(rule, lower, upper),
        Frequency::Daily => daily(rule, lower, upper),
        Frequency::Weekly => weekly(rule, lower, upper),
        Frequency::Monthly => monthly(rule, lower, upper),
        Frequency::Yearly => yearly(rule, lower, upper),
    };
    found.sort();
    // "Week 4" and "Last Week" coincide in four-week months.
    found.dedup();
    Ok(found)
}

fn hourly(rule: &ScheduleRule, lower: NaiveDate, upper: NaiveDate) -> Vec<Occurrence> {
    let step = Duration::hours(1);
    let start = rule.start().instant();
    let limit = match (rule.end_type(), rule.end()) {
        (EndType::On, Some(end)) => end.instant(),
        _ => upper
            .succ_opt()
            .map(|next| next.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX),
    };

    // Jump straight to the first slot on or after the window start.
    let window_start = lower.and_time(NaiveTime::MIN);
    let mut current: NaiveDateTime = start;
    if current < window_start {
        let behind = (window_start - current).num_minutes();
        match current.checked_add_signed(Duration::hours((behind + 59) / 60)) {
            Some(first) => current = first,
            None => return Vec::new(),
        }
    }

    // A session must finish by the end instant.
    let mut found = Vec::new();
    while current.date() <= upper {
        let Some(finish) = current.checked_add_signed(step) else {
            break;
        };
        if finish > limit {
            break;
        }
        found.push(Occurrence {
            date: current.date(),
            start_time: current.time(),
            end_time: finish.time(),
            day_of_week: current.date().weekday(),
        });
        current = finish;
    }
    found
}

fn daily(rule: &ScheduleRule, lower: NaiveDate, upper: NaiveDate) -> Vec<Occurrence> {
    let start_time = rule.start().time().unwrap_or(NaiveTime::MIN);
    let end_time = rule
        .end()
        .and_then(|end| end.time())
        .filter(|end| *end > start_time)
        .unwrap_or(start_time);
    days_in_range(lower, upper)
        .map(|date| Occurrence {
            date,
            start_time,
            end_time,
            day_of_week: date.weekday(),
        })
        .collect()
}

fn weekly(rule: &ScheduleRule, lower: NaiveDate, upper: NaiveDate) -> Vec<Occurrence> {
    let mut found = Vec::new();
    for date in days_in_range(lower, upper) {
        for slot in rule.selected_weekdays() {
            if slot.day_of_week() == date.weekday() {
                found.push(Occurrence::from_slot(date, slot));
            }
        }
    }
    found
}

fn monthly(rule: &ScheduleRule, lower: NaiveDate, upper: NaiveDate) -> Vec<Occurrence> {
    let mut found = Vec::new();
    for (year, month) in months_in_range(lower, upper) {
        for slot in rule.selected_weekdays() {
            for week in rule.week_number() {
                let date = match week {
                    WeekOfMonth::Last => last_weekday(year, month, slot.day_of_week()),
                    numbered => nth_weekday(
                        year,
                        month,
                        slot.day_of_week(),
                        numbered.number().unsigned_abs(),
                    ),
                };
                if let Some(date) = date.filter(|date| (lower..=upper).contains(date)) {
                    found.push(Occurrence::from_slot(date, slot));
                }
            }
        }
    }
    found
}

fn yearly(rule: &ScheduleRule, lower: NaiveDate, upper: NaiveDate) -> Vec<Occurrence> {
    let mut found = Vec::new();
    for date in days_in_range(lower, upper) {
        if !rule
            .selected_months()
            .iter()
            .any(|month| month.number() == date.month())
        {
            continue;
        }
        for slot in rule.selected_weekdays() {
            if slot.day_of_week() == date.weekday() {
                found.push(Occurrence::from_slot(date, slot));
            }
        }
    }
    found
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    pub class_id: u32,
    pub class_name: String,
    #[serde(flatten)]
    pub occurrence: Occurrence,
}

/// All sessions of every class in a catalog over one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timetable {
    entries: Vec<TimetableEntry>,
}

impl Timetable {
    /// Classes are expanded in parallel, then merged by date, start time and class id.
    pub fn build(
        catalog: &ClassCatalog,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Self, OccurrenceError> {
        check_window(from, to)?;
        let per_class = catalog
            .classes()
            .par_iter()
            .map(|class| -> Result<Vec<TimetableEntry>, OccurrenceError> {
                let mut entries = Vec::new();
                for rule in &class.events {
                    for occurrence in occurrences(rule, from, to)? {
                        entries.push(TimetableEntry {
                            class_id: class.id,
                            class_name: class.name.clone(),
                            occurrence,
                        });
                    }
                }
                Ok(entries)
            })
            .collect::<Result<Vec<Vec<TimetableEntry>>, OccurrenceError>>()?;

        let mut entries: Vec<TimetableEntry> = per_class.into_iter().flatten().collect();
        entries.sort_by(|a, b| {
            (a.occurrence.date, a.occurrence.start_time, a.class_id).cmp(&(
                b.occurrence.date,
                b.occurrence.start_time,
                b.class_id,
            ))
        });
        tracing::debug!(
            classes = catalog.len(),
            sessions = entries.len(),
            %from,
            %to,
            "timetable built"
        );
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScheduleRule {
    pub fn occurrences(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Occurrence>, OccurrenceError> {
        occurrences(self, from, to)
    }
}
