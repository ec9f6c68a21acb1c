//! Page emitter module
//!
//! Hands finished page records to whatever consumes them.
//!
//! # Overview
//!
//! - `PageEmitter` - One-way sink for `PageRecord`s
//! - `JsonLinesEmitter` - Writes one JSON object per line
//! - `CollectingEmitter` - Keeps records in memory

mod jsonl;
mod memory;

pub use jsonl::JsonLinesEmitter;
pub use memory::CollectingEmitter;

use crate::error::Result;
use crate::plan::PageRecord;
use async_trait::async_trait;

/// Accepts page records. Emission order is the order `emit` is called in.
#[async_trait]
pub trait PageEmitter: Send + Sync {
    /// Accept one record
    async fn emit(&self, record: PageRecord) -> Result<()>;

    /// Flush anything buffered. Called once after the last record.
    async fn finish(&self) -> Result<()> {
        Ok(())
    }
}
