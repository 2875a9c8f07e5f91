//! Record sinks: the downstream end of a collection run.
//!
//! Persistence lives outside this crate. Anything that can take a
//! normalized batch implements `RecordSink`; `MemorySink` keeps batches
//! in memory for callers that hand them off later.

use crate::model::RecordBatch;

pub trait RecordSink {
    fn accept(&mut self, batch: RecordBatch);
}

impl<F> RecordSink for F
where
    F: FnMut(RecordBatch),
{
    fn accept(&mut self, batch: RecordBatch) {
        self(batch)
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<RecordBatch>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total records across all accepted batches.
    pub fn record_count(&self) -> usize {
        self.batches.iter().map(RecordBatch::len).sum()
    }

    pub fn into_batches(self) -> Vec<RecordBatch> {
        self.batches
    }
}

impl RecordSink for MemorySink {
    fn accept(&mut self, batch: RecordBatch) {
        self.batches.push(batch);
    }
}
