//! Persistence collaborator for imported records.
//!
//! The import pipeline only needs [`EmployeeStore::save_all`]. [`InMemoryEmployeeStore`] is a
//! reference implementation that also offers the per-record operations the application exposes
//! (list, fetch, create, update, delete).

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::types::{Employee, NewEmployee};

/// Error returned when the store rejects a write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Unique-email constraint violation (against stored rows or within the same batch).
    #[error("duplicate email '{email}'")]
    DuplicateEmail { email: String },

    /// The store could not be reached or is otherwise unusable.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

/// Bulk insert capability consumed by the import pipeline.
pub trait EmployeeStore: Send + Sync {
    /// Persist `batch` as new records.
    ///
    /// Returns the same records, in the same order, with identities assigned. If the store
    /// rejects the batch nothing from it is persisted.
    fn save_all(&self, batch: Vec<NewEmployee>) -> Result<Vec<Employee>, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    rows: BTreeMap<u64, Employee>,
}

impl Inner {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.rows
            .values()
            .any(|e| e.record.email == email && Some(e.id) != except)
    }
}

/// Thread-safe in-memory store with monotonically increasing ids starting at 1.
#[derive(Debug)]
pub struct InMemoryEmployeeStore {
    unique_emails: bool,
    inner: Mutex<Inner>,
}

impl InMemoryEmployeeStore {
    /// Store that rejects records whose email is already present.
    pub fn new() -> Self {
        Self {
            unique_emails: true,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Store without the unique-email constraint.
    pub fn permissive() -> Self {
        Self {
            unique_emails: false,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Unavailable {
            message: "store lock poisoned".to_string(),
        })
    }

    /// All records ordered by id.
    pub fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    pub fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    /// Insert a single record.
    pub fn insert(&self, record: NewEmployee) -> Result<Employee, StoreError> {
        let mut saved = self.save_all(vec![record])?;
        saved.pop().ok_or_else(|| StoreError::Unavailable {
            message: "insert produced no record".to_string(),
        })
    }

    /// Replace the fields of an existing record. Returns `None` if `id` is unknown.
    pub fn update(&self, id: u64, record: NewEmployee) -> Result<Option<Employee>, StoreError> {
        let mut inner = self.lock()?;
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if self.unique_emails && inner.email_taken(&record.email, Some(id)) {
            return Err(StoreError::DuplicateEmail {
                email: record.email,
            });
        }
        let updated = record.with_id(id);
        inner.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryEmployeeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeStore for InMemoryEmployeeStore {
    fn save_all(&self, batch: Vec<NewEmployee>) -> Result<Vec<Employee>, StoreError> {
        let mut inner = self.lock()?;

        if self.unique_emails {
            let mut seen: HashSet<&str> = HashSet::with_capacity(batch.len());
            for record in &batch {
                if !seen.insert(record.email.as_str()) || inner.email_taken(&record.email, None) {
                    return Err(StoreError::DuplicateEmail {
                        email: record.email.clone(),
                    });
                }
            }
        }

        let mut saved = Vec::with_capacity(batch.len());
        for record in batch {
            let id = inner.allocate_id();
            let employee = record.with_id(id);
            inner.rows.insert(id, employee.clone());
            saved.push(employee);
        }
        Ok(saved)
    }
}
