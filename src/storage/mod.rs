//! On-disk row store
//!
//! Tables persist as one JSON file per table under a data directory. The
//! engine treats the store as an opaque load/save pair: no locking, no
//! read-modify-write arbitration; the design assumes a single caller per
//! table at a time.

use crate::error::{QueryError, Result};
use crate::types::Record;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The persistence contract the engine calls through.
pub trait RowStore {
    /// Load a table's records. A table that has never been saved is empty.
    fn load(&self, table: &str) -> Result<Vec<Record>>;

    /// Persist a table's full record sequence.
    fn save(&self, table: &str, rows: &[Record]) -> Result<()>;
}

/// Directory of `<table>.json` files.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        // table names become file names; only bare identifiers are allowed
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(QueryError::InvalidTableName(table.to_string()));
        }
        Ok(self.dir.join(format!("{table}.json")))
    }
}

impl RowStore for JsonStore {
    fn load(&self, table: &str) -> Result<Vec<Record>> {
        let path = self.table_path(table)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&path)?);
        let rows = serde_json::from_reader(reader)?;
        Ok(rows)
    }

    fn save(&self, table: &str, rows: &[Record]) -> Result<()> {
        let path = self.table_path(table)?;
        let tmp_path = path.with_extension("json.tmp");

        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.flush()?;
        }

        // rename is the atomic commit point: readers see either the old
        // file or the new one, never a partial write
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
