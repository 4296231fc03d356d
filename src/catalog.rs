use crate::class::ScheduledClass;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate class id {0}")]
    DuplicateId(u32),
    #[error("class {0} not found")]
    NotFound(u32),
    #[error("class {0} requires a non-empty name")]
    MissingName(u32),
    #[error("class {0} has a capacity of zero")]
    ZeroCapacity(u32),
    #[error("no class id left after {0}")]
    IdsExhausted(u32),
}

/// Classes and events of one club, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCatalog {
    #[serde(default)]
    classes: Vec<ScheduledClass>,
}

pub fn validate_class(class: &ScheduledClass) -> Result<(), CatalogError> {
    if class.name.trim().is_empty() {
        return Err(CatalogError::MissingName(class.id));
    }
    if class.capacity == Some(0) {
        return Err(CatalogError::ZeroCapacity(class.id));
    }
    Ok(())
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from loaded classes, rejecting duplicates and invalid entries.
    pub fn from_classes(classes: Vec<ScheduledClass>) -> Result<Self, CatalogError> {
        let catalog = Self { classes };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn classes(&self) -> &[ScheduledClass] {
        &self.classes
    }

    pub fn into_classes(self) -> Vec<ScheduledClass> {
        self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&ScheduledClass> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut ScheduledClass> {
        self.classes.iter_mut().find(|class| class.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// One past the highest id in use, or 1 for an empty catalog.
    pub fn next_id(&self) -> Result<u32, CatalogError> {
        match self.classes.iter().map(|class| class.id).max() {
            Some(max) => max.checked_add(1).ok_or(CatalogError::IdsExhausted(max)),
            None => Ok(1),
        }
    }

    /// Adds a class whose id is not taken yet.
    pub fn insert(&mut self, class: ScheduledClass) -> Result<(), CatalogError> {
        if self.contains(class.id) {
            return Err(CatalogError::DuplicateId(class.id));
        }
        validate_class(&class)?;
        tracing::debug!(class_id = class.id, name = %class.name, "class added");
        self.classes.push(class);
        Ok(())
    }

    /// Inserts or replaces by id. Returns `true` when the class is new.
    pub fn upsert(&mut self, class: ScheduledClass) -> Result<bool, CatalogError> {
        validate_class(&class)?;
        match self.get_mut(class.id) {
            Some(existing) => {
                tracing::debug!(class_id = class.id, "class replaced");
                *existing = class;
                Ok(false)
            }
            None => {
                tracing::debug!(class_id = class.id, name = %class.name, "class added");
                self.classes.push(class);
                Ok(true)
            }
        }
    }

    pub fn remove(&mut self, id: u32) -> Result<ScheduledClass, CatalogError> {
        let idx = self
            .classes
            .iter()
            .position(|class| class.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        tracing::debug!(class_id = id, "class removed");
        Ok(self.classes.remove(idx))
    }

    /// Checks id uniqueness and every class. Rules are valid by construction.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.classes.len());
        for class in &self.classes {
            if !seen.insert(class.id) {
                return Err(CatalogError::DuplicateId(class.id));
            }
            validate_class(class)?;
        }
        Ok(())
    }
}
