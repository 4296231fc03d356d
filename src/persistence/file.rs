use super::{PersistenceError, PersistenceResult, SNAPSHOT_VERSION};
use crate::catalog::ClassCatalog;
use crate::class::{ClassKind, ScheduledClass};
use crate::rule::ScheduleRule;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct CatalogSnapshot {
    version: u32,
    #[serde(default)]
    classes: Vec<ScheduledClass>,
}

impl CatalogSnapshot {
    fn from_catalog(catalog: &ClassCatalog) -> PersistenceResult<Self> {
        super::validate_catalog(catalog)?;
        Ok(Self {
            version: SNAPSHOT_VERSION,
            classes: catalog.classes().to_vec(),
        })
    }

    fn into_catalog(self) -> PersistenceResult<ClassCatalog> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::InvalidData(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }
        Ok(ClassCatalog::from_classes(self.classes)?)
    }
}

pub fn save_catalog_to_json<P: AsRef<Path>>(
    catalog: &ClassCatalog,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = CatalogSnapshot::from_catalog(catalog)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    tracing::info!(path = %path.as_ref().display(), classes = catalog.len(), "catalog saved as json");
    Ok(())
}

/// Every rule in the file is validated while it is read.
pub fn load_catalog_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ClassCatalog> {
    let file = File::open(path.as_ref())?;
    let snapshot: CatalogSnapshot = serde_json::from_reader(file)?;
    let catalog = snapshot.into_catalog()?;
    tracing::info!(path = %path.as_ref().display(), classes = catalog.len(), "catalog loaded from json");
    Ok(catalog)
}

#[derive(Default, Serialize, Deserialize)]
struct ClassCsvRecord {
    id: u32,
    name: String,
    kind: String,
    instructor: String,
    capacity: String,
    #[serde(default)]
    events_json: String,
}

impl TryFrom<&ScheduledClass> for ClassCsvRecord {
    type Error = PersistenceError;

    fn try_from(class: &ScheduledClass) -> Result<Self, Self::Error> {
        Ok(Self {
            id: class.id,
            name: class.name.clone(),
            kind: class.kind.as_str().to_string(),
            instructor: class.instructor.clone().unwrap_or_default(),
            capacity: class.capacity.map(|c| c.to_string()).unwrap_or_default(),
            events_json: serde_json::to_string(&class.events)?,
        })
    }
}

impl ClassCsvRecord {
    fn into_class(self) -> PersistenceResult<ScheduledClass> {
        let kind = if self.kind.trim().is_empty() {
            ClassKind::default()
        } else {
            self.kind
                .parse::<ClassKind>()
                .map_err(PersistenceError::InvalidData)?
        };
        let capacity = parse_u32(&self.capacity)?;
        let events = if self.events_json.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<ScheduleRule>>(&self.events_json).map_err(|err| {
                PersistenceError::InvalidData(format!(
                    "class {} has invalid events: {err}",
                    self.id
                ))
            })?
        };
        Ok(ScheduledClass {
            id: self.id,
            name: self.name,
            kind,
            instructor: parse_string_option(self.instructor),
            capacity,
            events,
        })
    }
}

pub fn save_catalog_to_csv<P: AsRef<Path>>(
    catalog: &ClassCatalog,
    path: P,
) -> PersistenceResult<()> {
    super::validate_catalog(catalog)?;
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    for class in catalog.classes() {
        writer.serialize(ClassCsvRecord::try_from(class)?)?;
    }
    writer.flush()?;
    tracing::info!(path = %path.as_ref().display(), classes = catalog.len(), "catalog saved as csv");
    Ok(())
}

pub fn load_catalog_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<ClassCatalog> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);
    let mut classes = Vec::new();
    for record in reader.deserialize::<ClassCsvRecord>() {
        classes.push(record?.into_class()?);
    }
    let catalog = ClassCatalog::from_classes(classes)?;
    tracing::info!(path = %path.as_ref().display(), classes = catalog.len(), "catalog loaded from csv");
    Ok(catalog)
}

fn parse_u32(input: &str) -> PersistenceResult<Option<u32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
