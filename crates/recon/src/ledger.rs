use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::ReconError;
use crate::model::{normalize_id, ScanOutcome, StockItem, UnexpectedScanRecord};

/// Authoritative expected-item set plus the unexpected-scan registry.
///
/// Items keep load order; `index` maps normalized id → position. The
/// unexpected registry keeps first-scan order the same way.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<StockItem>,
    index: HashMap<String, usize>,
    unexpected: Vec<(String, UnexpectedScanRecord)>,
    unexpected_index: HashMap<String, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the item set and clear unexpected scans.
    pub fn load(&mut self, items: Vec<StockItem>) -> Result<(), ReconError> {
        if items.is_empty() {
            return Err(ReconError::NoItems);
        }
        self.replace(items);
        Ok(())
    }

    /// Swap in `items` unconditionally. Callers guarantee a non-empty list.
    pub(crate) fn replace(&mut self, items: Vec<StockItem>) {
        self.index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id.clone(), pos))
            .collect();
        self.items = items;
        self.unexpected.clear();
        self.unexpected_index.clear();
        info!(items = self.items.len(), total_quantity = self.total_expected_quantity(), "ledger loaded");
    }

    /// Rebuild from persisted parts. Rejects duplicate ids in either collection.
    pub fn from_parts(
        items: Vec<StockItem>,
        unexpected: Vec<(String, UnexpectedScanRecord)>,
    ) -> Result<Self, ReconError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), pos).is_some() {
                return Err(ReconError::Snapshot(format!("duplicate item id {}", item.id)));
            }
        }
        let mut unexpected_index = HashMap::with_capacity(unexpected.len());
        for (pos, (id, _)) in unexpected.iter().enumerate() {
            if unexpected_index.insert(id.clone(), pos).is_some() {
                return Err(ReconError::Snapshot(format!("duplicate unexpected id {id}")));
            }
        }
        Ok(Self {
            items,
            index,
            unexpected,
            unexpected_index,
        })
    }

    /// Apply one scan. Never fails: unknown ids land in the unexpected registry.
    pub fn apply_scan(&mut self, raw_id: &str) -> ScanOutcome {
        let scanned_as = raw_id.trim().to_string();
        let id = normalize_id(raw_id);

        if let Some(&pos) = self.index.get(&id) {
            let item = &mut self.items[pos];
            item.scanned_count = item.scanned_count.saturating_add(1);
            debug!(id = %item.id, scanned = item.scanned_count, "scan matched");
            return ScanOutcome::Matched {
                id,
                scanned_as,
                expected_quantity: item.expected_quantity,
                scanned_count: item.scanned_count,
                remaining: item.remaining(),
            };
        }

        let count = match self.unexpected_index.get(&id) {
            Some(&pos) => {
                let record = &mut self.unexpected[pos].1;
                record.count = record.count.saturating_add(1);
                record.count
            }
            None => {
                self.unexpected_index.insert(id.clone(), self.unexpected.len());
                self.unexpected.push((
                    id.clone(),
                    UnexpectedScanRecord {
                        raw_id: scanned_as.clone(),
                        count: 1,
                    },
                ));
                1
            }
        };
        debug!(id = %id, count, "unexpected scan");
        ScanOutcome::Unexpected { id, scanned_as, count }
    }

    /// Zero every scan count and clear unexpected scans. Expected data is untouched.
    pub fn reset_scans(&mut self) {
        for item in &mut self.items {
            item.scanned_count = 0;
        }
        self.unexpected.clear();
        self.unexpected_index.clear();
        info!(items = self.items.len(), "scans reset");
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn get(&self, raw_id: &str) -> Option<&StockItem> {
        self.index.get(&normalize_id(raw_id)).map(|&pos| &self.items[pos])
    }

    pub fn unexpected(&self) -> impl Iterator<Item = &UnexpectedScanRecord> {
        self.unexpected.iter().map(|(_, record)| record)
    }

    pub fn unexpected_entries(&self) -> &[(String, UnexpectedScanRecord)] {
        &self.unexpected
    }

    pub fn unexpected_record(&self, raw_id: &str) -> Option<&UnexpectedScanRecord> {
        self.unexpected_index
            .get(&normalize_id(raw_id))
            .map(|&pos| &self.unexpected[pos].1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn total_expected_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, i| total.saturating_add(i.expected_quantity))
    }
}
