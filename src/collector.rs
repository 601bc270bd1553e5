use crate::results::EventRecord;

/// Accumulates extracted records for one run, in the order extraction finished
#[derive(Debug, Default)]
pub struct Collector {
    records: Vec<EventRecord>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: EventRecord) {
        ::log::debug!("Collected event from {}", record.page_url);
        self.records.push(record);
    }

    /// Hands over every collected record and leaves the collector empty
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
