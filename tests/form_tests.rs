use class_schedule::{
    EndType, FormError, Frequency, RuleError, ScheduleForm, ScheduledClass,
    form::{DEFAULT_BACKGROUND_COLOR, DEFAULT_COLOR},
};

#[test]
fn new_form_is_a_blank_weekly_rule() {
    let form = ScheduleForm::new();
    assert_eq!(form.frequency(), Some(Frequency::Weekly));
    assert_eq!(form.rule().end_type, EndType::Never);
    assert_eq!(form.rule().color.as_deref(), Some(DEFAULT_COLOR));
    assert_eq!(
        form.rule().background_color.as_deref(),
        Some(DEFAULT_BACKGROUND_COLOR)
    );
    let errors = form.validate().unwrap_err();
    assert!(errors.contains(RuleError::MissingStart));
    assert!(errors.contains(RuleError::MissingWeekdays));
}

#[test]
fn submit_stores_the_rule_as_the_only_event() {
    let mut class = ScheduledClass::new(7, "Boxing");
    let mut form = ScheduleForm::edit(&class);
    form.set_frequency(Frequency::Monthly);
    form.set_start("2025-01-01");
    form.set_end("2025-06-01");
    form.set_end_type(EndType::On);
    assert_eq!(form.toggle_week_number(1), Ok(true));
    assert_eq!(form.toggle_week_number(-1), Ok(true));
    form.add_weekday_slot("monday", "06:00", "07:00");
    form.set_title("Morning boxing");

    let rule = form.submit(&mut class).expect("valid form");
    assert_eq!(class.events.len(), 1);
    assert_eq!(class.primary_event(), Some(&rule));
    assert_eq!(rule.title(), Some("Morning boxing"));

    let reopened = ScheduleForm::edit(&class);
    assert_eq!(reopened.frequency(), Some(Frequency::Monthly));
    assert_eq!(reopened.rule().week_number, vec![1, -1]);
}

#[test]
fn failed_submit_leaves_class_and_form_untouched() {
    let mut class = ScheduledClass::new(1, "Pilates");
    let mut form = ScheduleForm::new();
    form.set_start("2025-01-01");
    form.add_weekday_slot("tuesday", "10:00", "09:00");
    let before = form.clone();

    let errors = form.submit(&mut class).unwrap_err();
    assert_eq!(
        errors.errors_for("selected_weekdays[0]"),
        vec![RuleError::InvalidTimeRange]
    );
    assert!(class.events.is_empty());
    assert_eq!(form, before);
}

#[test]
fn toggles_reject_out_of_range_values() {
    let mut form = ScheduleForm::new();
    form.set_frequency(Frequency::Yearly);
    assert_eq!(form.toggle_week_number(5), Err(FormError::InvalidWeekNumber(5)));
    assert_eq!(form.toggle_month(12), Err(FormError::InvalidMonth(12)));
    assert_eq!(form.toggle_month(11), Ok(true));
    assert_eq!(form.toggle_month(11), Ok(false));
    assert!(form.rule().selected_months.is_empty());
}

#[test]
fn weekday_slots_can_be_removed_by_index() {
    let mut form = ScheduleForm::new();
    assert_eq!(form.add_weekday_slot("monday", "06:00", "07:00"), 0);
    assert_eq!(form.add_weekday_slot("friday", "17:00", "18:00"), 1);

    let removed = form.remove_weekday_slot(0).unwrap();
    assert_eq!(removed.day_of_week.as_deref(), Some("monday"));
    assert_eq!(form.rule().selected_weekdays.len(), 1);
    assert_eq!(
        form.remove_weekday_slot(3),
        Err(FormError::SlotOutOfRange { index: 3, len: 1 })
    );
}

#[test]
fn switching_frequency_resets_hidden_selectors() {
    let mut form = ScheduleForm::new();
    form.set_start("2025-04-01");
    form.add_weekday_slot("monday", "06:00", "07:00");
    form.set_frequency(Frequency::Monthly);
    form.toggle_week_number(2).unwrap();
    form.set_frequency(Frequency::Daily);

    assert!(form.rule().week_number.is_empty());
    assert!(form.rule().selected_weekdays.is_empty());
    assert_eq!(form.rule().start.as_deref(), Some("2025-04-01 00:00"));
    assert_eq!(form.summary().frequency, "Daily");
}

#[test]
fn cancel_discards_changes() {
    let class = ScheduledClass::new(2, "Swim");
    let mut form = ScheduleForm::edit(&class);
    form.set_start("2025-01-01");
    form.add_weekday_slot("monday", "06:00", "07:00");
    form.cancel();
    assert!(class.events.is_empty());

    let form = ScheduleForm::edit(&class);
    assert_eq!(form, ScheduleForm::new());
}
