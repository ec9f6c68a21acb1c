//! JSON-lines emitter

use super::PageEmitter;
use crate::error::{Error, Result};
use crate::plan::PageRecord;
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Writes each record as one line of JSON
#[derive(Debug)]
pub struct JsonLinesEmitter<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesEmitter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|_| Error::internal("emitter writer lock poisoned"))
    }

    fn write_line(&self, record: &PageRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::emit(&record.path, "writer lock poisoned"))?;
        writeln!(writer, "{line}").map_err(|e| Error::emit(&record.path, e.to_string()))
    }
}

impl JsonLinesEmitter<BufWriter<File>> {
    /// Create (or truncate) a file and write records to it
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl JsonLinesEmitter<std::io::Stdout> {
    /// Write records to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send + 'static> PageEmitter for JsonLinesEmitter<W> {
    async fn emit(&self, record: PageRecord) -> Result<()> {
        self.write_line(&record)
    }

    async fn finish(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::internal("emitter writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
