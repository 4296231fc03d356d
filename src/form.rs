use crate::class::ScheduledClass;
use crate::frequency::{EndType, Frequency, MonthOfYear, WeekOfMonth};
use crate::input::{RuleInput, WeekdaySlotInput};
use crate::rule::ScheduleRule;
use crate::rule_validation::{ValidationErrors, validate_rule};
use crate::summary::{RuleSummary, summarize};
use crate::transition::transition;

pub const DEFAULT_COLOR: &str = "#1E88E5";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#E3F2FD";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("weekday slot {index} does not exist ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("week number {0} is not one of 1, 2, 3, 4 or -1")]
    InvalidWeekNumber(i32),
    #[error("month {0} is outside 0..=11")]
    InvalidMonth(i32),
}

/// An editing session for one schedule rule.
///
/// The session exclusively owns its rule until it is submitted into a class
/// or cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleForm {
    rule: RuleInput,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleForm {
    /// A blank weekly rule that never ends.
    pub fn new() -> Self {
        let mut rule = RuleInput::new(Frequency::Weekly);
        rule.end_type = EndType::Never;
        rule.color = Some(DEFAULT_COLOR.to_string());
        rule.background_color = Some(DEFAULT_BACKGROUND_COLOR.to_string());
        Self { rule }
    }

    /// Loads the class's first event, or starts blank when it has none.
    pub fn edit(class: &ScheduledClass) -> Self {
        match class.primary_event() {
            Some(rule) => Self::from_input(rule.to_input()),
            None => Self::new(),
        }
    }

    pub fn from_input(rule: RuleInput) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &RuleInput {
        &self.rule
    }

    pub fn into_input(self) -> RuleInput {
        self.rule
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.rule.frequency()
    }

    /// Switching frequency replaces the whole rule; see [`transition`].
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.rule = transition(&self.rule, frequency);
    }

    pub fn set_start(&mut self, start: impl Into<String>) {
        self.rule.start = Some(start.into());
    }

    pub fn set_end(&mut self, end: impl Into<String>) {
        self.rule.end = Some(end.into());
    }

    pub fn set_end_type(&mut self, end_type: EndType) {
        self.rule.end_type = end_type;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.rule.title = Some(title.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.rule.description = Some(description.into());
    }

    pub fn set_colors(&mut self, color: impl Into<String>, background_color: impl Into<String>) {
        self.rule.color = Some(color.into());
        self.rule.background_color = Some(background_color.into());
    }

    /// Selects or deselects a week of the month. Returns whether it is now selected.
    pub fn toggle_week_number(&mut self, number: i32) -> Result<bool, FormError> {
        WeekOfMonth::from_number(number).ok_or(FormError::InvalidWeekNumber(number))?;
        Ok(toggle(&mut self.rule.week_number, number))
    }

    /// Selects or deselects a zero-based month. Returns whether it is now selected.
    pub fn toggle_month(&mut self, index: i32) -> Result<bool, FormError> {
        MonthOfYear::from_index(index).ok_or(FormError::InvalidMonth(index))?;
        Ok(toggle(&mut self.rule.selected_months, index))
    }

    /// Appends a weekday row and returns its index.
    pub fn add_weekday_slot(
        &mut self,
        day_of_week: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> usize {
        self.rule
            .selected_weekdays
            .push(WeekdaySlotInput::new(day_of_week, start_time, end_time));
        self.rule.selected_weekdays.len() - 1
    }

    pub fn remove_weekday_slot(&mut self, index: usize) -> Result<WeekdaySlotInput, FormError> {
        let len = self.rule.selected_weekdays.len();
        if index >= len {
            return Err(FormError::SlotOutOfRange { index, len });
        }
        Ok(self.rule.selected_weekdays.remove(index))
    }

    pub fn validate(&self) -> Result<ScheduleRule, ValidationErrors> {
        validate_rule(&self.rule)
    }

    pub fn summary(&self) -> RuleSummary {
        summarize(&self.rule)
    }

    /// Validates and, on success, makes the rule the class's only event.
    /// On failure the class is left untouched and the form keeps its state.
    pub fn submit(&self, class: &mut ScheduledClass) -> Result<ScheduleRule, ValidationErrors> {
        match validate_rule(&self.rule) {
            Ok(rule) => {
                class.set_primary_event(rule.clone());
                tracing::info!(
                    class_id = class.id,
                    frequency = %rule.frequency(),
                    "schedule submitted"
                );
                Ok(rule)
            }
            Err(errors) => {
                tracing::debug!(class_id = class.id, %errors, "schedule rejected");
                Err(errors)
            }
        }
    }

    /// Discards the session.
    pub fn cancel(self) {
        tracing::debug!(frequency = %self.rule.frequency, "schedule form cancelled");
    }
}

fn toggle(values: &mut Vec<i32>, value: i32) -> bool {
    match values.iter().position(|v| *v == value) {
        Some(idx) => {
            values.remove(idx);
            false
        }
        None => {
            values.push(value);
            true
        }
    }
}
