// In-process store used for local runs and tests
// Mirrors the hosted backend's list/create/update/delete contract

use crate::store::{ListQuery, Record, SortDirection, Store, StoreError, Table};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredRecord {
    // Insertion sequence, breaks ordering ties
    seq: u64,
    record: Record,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<Table, Vec<StoredRecord>>,
    next_seq: AtomicU64,
    request_count: AtomicUsize,
    fail_next_requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Make the next `count` calls fail with a network error
    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next_requests.store(count, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn len(&self, table: Table) -> usize {
        self.tables.get(&table).map_or(0, |records| records.len())
    }

    pub fn is_empty(&self, table: Table) -> bool {
        self.len(table) == 0
    }

    fn begin_request(&self) -> Result<(), StoreError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .fail_next_requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if failed {
            return Err(StoreError::NetworkError(
                "Service unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn generate_id(&self, table: Table) -> String {
        loop {
            let id = format!("{}_{:012x}", table.id_prefix(), rand::random::<u64>() >> 16);
            let taken = self.tables.get(&table).is_some_and(|records| {
                records
                    .iter()
                    .any(|stored| record_id(&stored.record) == Some(id.as_str()))
            });
            if !taken {
                return id;
            }
        }
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

// Numbers compare numerically, strings lexicographically; missing fields sort first
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&y.as_f64().unwrap_or(0.0)),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        _ => CmpOrdering::Equal,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self, table: Table, query: ListQuery) -> Result<Vec<Record>, StoreError> {
        self.begin_request()?;

        let mut matched: Vec<StoredRecord> = self
            .tables
            .get(&table)
            .map(|records| {
                records
                    .iter()
                    .filter(|stored| query.matches(&stored.record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            matched.sort_by(|a, b| {
                let ord = compare_fields(
                    a.record.get(&order.field),
                    b.record.get(&order.field),
                )
                .then(a.seq.cmp(&b.seq));
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        let records: Vec<Record> = matched
            .into_iter()
            .take(limit)
            .map(|stored| stored.record)
            .collect();

        debug!(table = %table, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn create(&self, table: Table, mut record: Record) -> Result<Record, StoreError> {
        self.begin_request()?;

        let id = self.generate_id(table);
        record.insert("id".to_string(), Value::String(id.clone()));
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        self.tables.entry(table).or_default().push(StoredRecord {
            seq,
            record: record.clone(),
        });

        debug!(table = %table, id = %id, "Created record");
        Ok(record)
    }

    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<(), StoreError> {
        self.begin_request()?;

        let not_found = || StoreError::NotFound {
            table,
            id: id.to_string(),
        };
        let mut records = self.tables.get_mut(&table).ok_or_else(not_found)?;
        let stored = records
            .iter_mut()
            .find(|stored| record_id(&stored.record) == Some(id))
            .ok_or_else(not_found)?;

        for (field, value) in patch {
            if field != "id" {
                stored.record.insert(field, value);
            }
        }

        debug!(table = %table, id = %id, "Updated record");
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.begin_request()?;

        let not_found = || StoreError::NotFound {
            table,
            id: id.to_string(),
        };
        let mut records = self.tables.get_mut(&table).ok_or_else(not_found)?;
        let position = records
            .iter()
            .position(|stored| record_id(&stored.record) == Some(id))
            .ok_or_else(not_found)?;
        records.remove(position);

        debug!(table = %table, id = %id, "Deleted record");
        Ok(())
    }
}
