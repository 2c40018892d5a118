pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod query;
pub mod repo;

use crate::error::{Result, StoreError};
use connectsphere_core::remote::project_record;
use connectsphere_core::{RecordStore, RemoteQuery};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn contacts(&self) -> repo::ContactsRepo<'_> {
        repo::ContactsRepo::new(&self.conn)
    }
}

/// Answers remote descriptors from the SQLite table, projecting each row to
/// the requested fields.
impl RecordStore for Store {
    type Error = StoreError;

    fn fetch_records(&self, query: &RemoteQuery) -> Result<Vec<Value>> {
        Ok(self
            .contacts()
            .fetch(query)?
            .iter()
            .map(|contact| project_record(contact, &query.fields))
            .collect())
    }
}
