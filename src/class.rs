use crate::rule::ScheduleRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// A recurring class with an instructor and capacity.
    #[default]
    Class,
    /// A standalone event on the club calendar.
    Event,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Event => "event",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(ClassKind::Class),
            "event" => Ok(ClassKind::Event),
            other => Err(format!("unknown class kind '{other}'")),
        }
    }
}

/// A class or standalone event together with the rules that schedule it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledClass {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub events: Vec<ScheduleRule>,
}

impl ScheduledClass {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ClassKind::Class,
            instructor: None,
            capacity: None,
            events: Vec::new(),
        }
    }

    /// The rule the schedule form edits. Only the first event is ever shown.
    pub fn primary_event(&self) -> Option<&ScheduleRule> {
        self.events.first()
    }

    /// Replaces every event with `rule`.
    pub fn set_primary_event(&mut self, rule: ScheduleRule) {
        self.events = vec![rule];
    }
}
