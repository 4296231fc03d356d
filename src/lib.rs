pub mod calendar;
pub mod catalog;
pub mod class;
pub mod form;
pub mod frequency;
pub mod input;
pub mod occurrences;
pub mod persistence;
pub mod rule;
pub mod rule_validation;
pub mod settings;
pub mod summary;
pub mod telemetry;
pub mod transition;

#[cfg(feature = "http_api")]
pub mod http_api;

pub use catalog::{CatalogError, ClassCatalog};
pub use class::{ClassKind, ScheduledClass};
pub use form::{FormError, ScheduleForm};
pub use frequency::{EndType, Frequency, MonthOfYear, ParseFrequencyError, WeekOfMonth};
pub use input::{RuleInput, WeekdaySlotInput};
pub use occurrences::{Occurrence, OccurrenceError, Timetable, TimetableEntry, occurrences};
pub use persistence::{
    CatalogStore, PersistenceError, PersistenceResult, load_catalog_from_csv,
    load_catalog_from_json, save_catalog_to_csv, save_catalog_to_json,
};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCatalogStore;
pub use rule::{ScheduleBound, ScheduleRule, WeekdaySlot};
pub use rule_validation::{FieldError, RuleError, ValidationErrors, validate_rule};
pub use settings::{Settings, SettingsError};
pub use summary::{RuleSummary, WeekdaySummary, summarize};
pub use transition::transition;
