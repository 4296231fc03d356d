#![cfg(feature = "sqlite")]

use class_schedule::{
    CatalogStore, ClassCatalog, Frequency, RuleInput, ScheduledClass, SqliteCatalogStore,
    WeekdaySlotInput, validate_rule,
};
use tempfile::NamedTempFile;

fn sample_catalog() -> ClassCatalog {
    let mut input = RuleInput::new(Frequency::Weekly);
    input.start = Some("2025-01-06".into());
    input.selected_weekdays = vec![
        WeekdaySlotInput::new("monday", "06:00", "07:00"),
        WeekdaySlotInput::new("thursday", "18:00", "19:00"),
    ];
    let mut yoga = ScheduledClass::new(4, "Yoga");
    yoga.capacity = Some(20);
    yoga.set_primary_event(validate_rule(&input).unwrap());

    ClassCatalog::from_classes(vec![yoga, ScheduledClass::new(2, "Spin")]).unwrap()
}

#[test]
fn sqlite_store_round_trip_catalog() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteCatalogStore::new(file.path()).unwrap();
    let catalog = sample_catalog();

    store.save_catalog(&catalog).expect("save catalog");
    let loaded = store
        .load_catalog()
        .expect("load catalog")
        .expect("catalog exists");

    assert_eq!(loaded, catalog);
    let ids: Vec<_> = loaded.classes().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4, 2], "insertion order survives");
}

#[test]
fn empty_store_has_no_catalog() {
    let store = SqliteCatalogStore::in_memory().unwrap();
    assert!(store.load_catalog().unwrap().is_none());
}

#[test]
fn saving_again_replaces_previous_classes() {
    let store = SqliteCatalogStore::in_memory().unwrap();
    store.save_catalog(&sample_catalog()).unwrap();

    let smaller = ClassCatalog::from_classes(vec![ScheduledClass::new(9, "Rowing")]).unwrap();
    store.save_catalog(&smaller).unwrap();

    let loaded = store.load_catalog().unwrap().unwrap();
    assert_eq!(loaded, smaller);
}
