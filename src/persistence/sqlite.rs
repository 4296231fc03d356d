use super::{CatalogStore, PersistenceError, PersistenceResult, SNAPSHOT_VERSION};
use crate::catalog::ClassCatalog;
use crate::class::ScheduledClass;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

pub struct SqliteCatalogStore {
    connection: Mutex<Connection>,
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS catalog_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                version INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS classes (
                id INTEGER PRIMARY KEY,
                position INTEGER NOT NULL,
                class_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_classes(
        &self,
        tx: &rusqlite::Transaction,
        catalog: &ClassCatalog,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM classes", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO classes (id, position, class_json) VALUES (?1, ?2, ?3)")?;
        for (position, class) in catalog.classes().iter().enumerate() {
            let json = serde_json::to_string(class)?;
            let position = i64::try_from(position)
                .map_err(|_| PersistenceError::InvalidData("catalog too large".into()))?;
            stmt.execute(params![class.id, position, json])?;
        }
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn save_catalog(&self, catalog: &ClassCatalog) -> PersistenceResult<()> {
        super::validate_catalog(catalog)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM catalog_meta", [])?;
        tx.execute(
            "INSERT INTO catalog_meta (id, version) VALUES (1, ?1)",
            params![SNAPSHOT_VERSION],
        )?;
        self.save_classes(&tx, catalog)?;
        tx.commit()?;
        tracing::info!(classes = catalog.len(), "catalog saved to sqlite");
        Ok(())
    }

    fn load_catalog(&self) -> PersistenceResult<Option<ClassCatalog>> {
        let conn = self.connection.lock();

        let mut stmt = conn.prepare("SELECT version FROM catalog_meta WHERE id = 1")?;
        let version: Option<u32> = stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(version) = version else {
            return Ok(None);
        };
        if version != SNAPSHOT_VERSION {
            return Err(PersistenceError::InvalidData(format!(
                "unsupported snapshot version {version}"
            )));
        }

        let mut stmt = conn.prepare("SELECT class_json FROM classes ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut classes = Vec::new();
        for json in rows {
            let class: ScheduledClass = serde_json::from_str(&json?)?;
            classes.push(class);
        }

        let catalog = ClassCatalog::from_classes(classes)?;
        tracing::info!(classes = catalog.len(), "catalog loaded from sqlite");
        Ok(Some(catalog))
    }
}
