//! In-memory emitter

use super::PageEmitter;
use crate::error::{Error, Result};
use crate::plan::PageRecord;
use async_trait::async_trait;
use std::sync::Mutex;

/// Keeps every emitted record, in emission order
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    records: Mutex<Vec<PageRecord>>,
}

impl CollectingEmitter {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records emitted so far
    pub fn records(&self) -> Vec<PageRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Paths emitted so far
    pub fn paths(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.path).collect()
    }

    /// Number of records emitted so far
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PageEmitter for CollectingEmitter {
    async fn emit(&self, record: PageRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| Error::emit(&record.path, "collector lock poisoned"))?;
        records.push(record);
        Ok(())
    }
}
