use class_schedule::{
    EndType, Frequency, RuleError, RuleInput, ScheduleBound, ScheduleRule, WeekOfMonth,
    WeekdaySlotInput, summarize, validate_rule,
};

fn monthly_input() -> RuleInput {
    let mut input = RuleInput::new(Frequency::Monthly);
    input.start = Some("2025-01-01".into());
    input.end = Some("2025-06-01".into());
    input.end_type = EndType::On;
    input.week_number = vec![1, -1];
    input.selected_weekdays = vec![WeekdaySlotInput::new("monday", "06:00", "07:00")];
    input
}

#[test]
fn monthly_rule_with_first_and_last_week_is_valid() {
    let rule = validate_rule(&monthly_input()).expect("valid monthly rule");
    assert_eq!(rule.frequency(), Frequency::Monthly);
    assert_eq!(
        rule.week_number().iter().copied().collect::<Vec<_>>(),
        vec![WeekOfMonth::First, WeekOfMonth::Last]
    );
    assert_eq!(rule.selected_weekdays().len(), 1);

    let summary = rule.summary().to_cli_summary();
    assert!(summary.contains("Week 1"), "summary: {summary}");
    assert!(summary.contains("Last Week"), "summary: {summary}");
    assert!(summary.contains("Monday 06:00–07:00"), "summary: {summary}");
}

#[test]
fn monthly_rule_without_weeks_reports_only_missing_week_number() {
    let mut input = monthly_input();
    input.week_number.clear();
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.codes(), vec![RuleError::MissingWeekNumber]);
    assert_eq!(errors.errors_for("week_number"), vec![RuleError::MissingWeekNumber]);
}

#[test]
fn yearly_rule_without_months_reports_only_missing_selected_months() {
    let mut input = RuleInput::new(Frequency::Yearly);
    input.start = Some("2025-01-01".into());
    input.selected_weekdays = vec![WeekdaySlotInput::new("sunday", "10:00", "11:00")];
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.codes(), vec![RuleError::MissingSelectedMonths]);
    assert_eq!(
        errors.errors_for("selected_months"),
        vec![RuleError::MissingSelectedMonths]
    );

    input.selected_months = vec![1];
    assert!(validate_rule(&input).is_ok());
}

#[test]
fn inverted_weekday_window_is_reported_on_that_entry() {
    let mut input = RuleInput::new(Frequency::Weekly);
    input.selected_weekdays = vec![WeekdaySlotInput::new("tuesday", "10:00", "09:00")];
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(
        errors.errors_for("selected_weekdays[0]"),
        vec![RuleError::InvalidTimeRange]
    );
    assert!(!errors.contains(RuleError::MissingWeekdays));
}

#[test]
fn equal_start_and_end_times_are_rejected() {
    let mut input = RuleInput::new(Frequency::Weekly);
    input.start = Some("2025-03-01".into());
    input.selected_weekdays = vec![WeekdaySlotInput::new("friday", "18:00", "18:00")];
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.codes(), vec![RuleError::InvalidTimeRange]);
}

#[test]
fn missing_start_and_end_are_reported() {
    let mut input = RuleInput::new(Frequency::Daily);
    input.end_type = EndType::On;
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.errors_for("start"), vec![RuleError::MissingStart]);
    assert_eq!(errors.errors_for("end"), vec![RuleError::MissingEnd]);
}

#[test]
fn never_ending_rule_needs_no_end() {
    let mut input = RuleInput::new(Frequency::Daily);
    input.start = Some("2025-01-01 09:00".into());
    input.end_type = EndType::Never;
    let rule = validate_rule(&input).expect("valid");
    assert_eq!(rule.last_date(), None);
}

#[test]
fn unknown_frequency_is_rejected() {
    let mut input = monthly_input();
    input.frequency = "fortnightly".into();
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.errors_for("frequency"), vec![RuleError::InvalidFrequency]);
}

#[test]
fn end_equal_to_start_is_allowed() {
    let mut input = RuleInput::new(Frequency::Daily);
    input.start = Some("2025-05-01 08:00".into());
    input.end = Some("2025-05-01 08:00".into());
    input.end_type = EndType::On;
    assert!(validate_rule(&input).is_ok());

    let mut weekly = RuleInput::new(Frequency::Weekly);
    weekly.start = Some("2025-05-01".into());
    weekly.end = Some("2025-05-01".into());
    weekly.end_type = EndType::On;
    weekly.selected_weekdays = vec![WeekdaySlotInput::new("thursday", "08:00", "09:00")];
    assert!(validate_rule(&weekly).is_ok());
}

#[test]
fn end_one_step_before_start_is_rejected() {
    let mut daily = RuleInput::new(Frequency::Daily);
    daily.start = Some("2025-05-01 08:00".into());
    daily.end = Some("2025-05-01 07:59".into());
    daily.end_type = EndType::On;
    let errors = validate_rule(&daily).unwrap_err();
    assert_eq!(errors.errors_for("end"), vec![RuleError::EndBeforeStart]);

    let mut weekly = RuleInput::new(Frequency::Weekly);
    weekly.start = Some("2025-05-02".into());
    weekly.end = Some("2025-05-01".into());
    weekly.end_type = EndType::On;
    weekly.selected_weekdays = vec![WeekdaySlotInput::new("thursday", "08:00", "09:00")];
    let errors = validate_rule(&weekly).unwrap_err();
    assert_eq!(errors.codes(), vec![RuleError::EndBeforeStart]);
}

#[test]
fn end_before_start_is_not_checked_for_never_ending_rules() {
    let mut input = RuleInput::new(Frequency::Daily);
    input.start = Some("2025-05-01 08:00".into());
    input.end = Some("2025-04-01 09:00".into());
    input.end_type = EndType::Never;
    assert!(validate_rule(&input).is_ok());
}

#[test]
fn bounds_are_normalized_to_the_frequency() {
    let mut weekly = RuleInput::new(Frequency::Weekly);
    weekly.start = Some("2025-01-06 18:30".into());
    weekly.selected_weekdays = vec![WeekdaySlotInput::new("monday", "18:30", "19:30")];
    let rule = validate_rule(&weekly).unwrap();
    assert!(matches!(rule.start(), ScheduleBound::Date(_)));

    let mut daily = RuleInput::new(Frequency::Daily);
    daily.start = Some("2025-01-06".into());
    let rule = validate_rule(&daily).unwrap();
    assert_eq!(rule.start().to_string(), "2025-01-06 00:00");
}

#[test]
fn selectors_of_other_frequencies_are_dropped() {
    let mut input = RuleInput::new(Frequency::Weekly);
    input.start = Some("2025-01-06".into());
    input.week_number = vec![7];
    input.selected_months = vec![42];
    input.selected_weekdays = vec![WeekdaySlotInput::new("monday", "06:00", "07:00")];
    let rule = validate_rule(&input).expect("stray selectors are ignored");
    assert!(rule.week_number().is_empty());
    assert!(rule.selected_months().is_empty());
}

#[test]
fn duplicate_and_out_of_range_selectors_are_reported_per_entry() {
    let mut input = RuleInput::new(Frequency::Yearly);
    input.start = Some("2025-01-01".into());
    input.selected_months = vec![0, 0, 12];
    input.selected_weekdays = vec![WeekdaySlotInput {
        day_of_week: None,
        start_time: Some("09:00".into()),
        end_time: Some("10:00".into()),
    }];
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.errors_for("selected_months[1]"), vec![RuleError::DuplicateMonth]);
    assert_eq!(errors.errors_for("selected_months[2]"), vec![RuleError::InvalidMonth]);
    assert_eq!(
        errors.errors_for("selected_weekdays[0].day_of_week"),
        vec![RuleError::MissingDayOfWeek]
    );
}

#[test]
fn colors_must_be_hex() {
    let mut input = monthly_input();
    input.color = Some("blue".into());
    input.background_color = Some("#fff".into());
    let errors = validate_rule(&input).unwrap_err();
    assert_eq!(errors.codes(), vec![RuleError::InvalidColor]);
    assert_eq!(errors.errors_for("color"), vec![RuleError::InvalidColor]);
}

#[test]
fn validating_a_validated_rule_is_idempotent() {
    let rule = validate_rule(&monthly_input()).unwrap();
    let again = validate_rule(&rule.to_input()).unwrap();
    assert_eq!(rule, again);
}

#[test]
fn summarizing_does_not_change_validity() {
    let mut without_weeks = monthly_input();
    without_weeks.week_number.clear();

    for input in [monthly_input(), without_weeks] {
        let before = validate_rule(&input);
        let summary = summarize(&input);
        assert_eq!(summary.frequency, "Monthly");
        assert_eq!(validate_rule(&input), before);
    }

    let rule = validate_rule(&monthly_input()).unwrap();
    let _ = rule.summary();
    assert_eq!(validate_rule(&rule.to_input()), Ok(rule));
}

#[test]
fn rules_deserialize_through_validation() {
    let json = serde_json::to_string(&monthly_input()).unwrap();
    let rule: ScheduleRule = serde_json::from_str(&json).expect("valid rule json");
    assert_eq!(rule.frequency(), Frequency::Monthly);

    let mut broken = monthly_input();
    broken.selected_weekdays.clear();
    let json = serde_json::to_string(&broken).unwrap();
    assert!(serde_json::from_str::<ScheduleRule>(&json).is_err());
}

#[test]
fn errors_render_as_field_map() {
    let mut input = monthly_input();
    input.start = None;
    input.week_number.clear();
    let errors = validate_rule(&input).unwrap_err();
    let map = errors.to_field_map();
    assert_eq!(map.get("start").map(String::as_str), Some("start date is required"));
    assert!(map.contains_key("week_number"));

    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["start"], "start date is required");
}
