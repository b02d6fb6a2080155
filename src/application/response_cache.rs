// Last-good category responses, keyed by session, chart and year
use crate::application::royalty_repository::{ChartSource, Session};
use crate::domain::royalty::Category;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    token: String,
    source: ChartSource,
    year: i32,
}

impl CacheKey {
    pub fn new(session: &Session, source: ChartSource, year: i32) -> Self {
        Self {
            token: session.token().to_string(),
            source,
            year,
        }
    }

    pub fn source(&self) -> ChartSource {
        self.source
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

struct Slot {
    ticket: u64,
    categories: Arc<Vec<Category>>,
}

/// Every fetch takes a ticket before it starts. A response only replaces the
/// stored one if its ticket is newer, so a slow early request cannot clobber
/// a later one that resolved first.
///
/// Holds at most `capacity` slots; storing a new key into a full cache evicts
/// the slot with the oldest ticket.
pub struct ResponseCache {
    capacity: usize,
    next_ticket: AtomicU64,
    slots: RwLock<HashMap<CacheKey, Slot>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_ticket: AtomicU64::new(0),
            slots: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns false when a newer response is already stored
    pub fn store(&self, key: CacheKey, ticket: u64, categories: Arc<Vec<Category>>) -> bool {
        let Ok(mut slots) = self.slots.write() else {
            return false;
        };
        match slots.get(&key) {
            Some(slot) if slot.ticket > ticket => false,
            Some(_) => {
                slots.insert(key, Slot { ticket, categories });
                true
            }
            None => {
                if slots.len() >= self.capacity {
                    let oldest = slots
                        .iter()
                        .min_by_key(|(_, slot)| slot.ticket)
                        .map(|(key, _)| key.clone());
                    if let Some(oldest) = oldest {
                        tracing::debug!("Response cache full ({} slots), evicting oldest", self.capacity);
                        slots.remove(&oldest);
                    }
                }
                slots.insert(key, Slot { ticket, categories });
                true
            }
        }
    }

    pub fn latest(&self, key: &CacheKey) -> Option<Arc<Vec<Category>>> {
        let slots = self.slots.read().ok()?;
        slots.get(key).map(|slot| slot.categories.clone())
    }
}
