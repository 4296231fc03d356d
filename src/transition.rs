use crate::frequency::Frequency;
use crate::input::RuleInput;
use crate::rule::ScheduleBound;

/// Moves a rule to another frequency.
///
/// Selectors owned by other frequencies are emptied. `start` and `end` are
/// reshaped to the new frequency's representation: the date survives, a dropped
/// time of day is discarded and a missing one becomes `00:00`. Text that does
/// not parse as a date is left alone for the validator to report.
///
/// Applying the same frequency twice gives the same result as applying it once.
pub fn transition(input: &RuleInput, frequency: Frequency) -> RuleInput {
    let mut next = input.clone();
    next.frequency = frequency.as_str().to_string();

    if !frequency.uses_week_numbers() {
        next.week_number.clear();
    }
    if !frequency.uses_months() {
        next.selected_months.clear();
    }
    if !frequency.uses_weekdays() {
        next.selected_weekdays.clear();
    }

    next.start = reshape(input.start.as_deref(), frequency);
    next.end = reshape(input.end.as_deref(), frequency);
    next
}

fn reshape(raw: Option<&str>, frequency: Frequency) -> Option<String> {
    let raw = raw?;
    match ScheduleBound::parse(raw) {
        Ok(bound) => Some(bound.for_frequency(frequency).to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
