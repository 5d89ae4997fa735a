use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::Direction;
use crate::store::UserId;

#[derive(Debug, Clone, Copy)]
struct PendingSelection {
    direction: Direction,
    generation: u64,
    selected_at: Instant,
}

/// A resolved selection. `generation` identifies this particular `set`, so a
/// later [`SessionRegistry::clear_if`] cannot remove a newer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub direction: Direction,
    pub generation: u64,
}

/// Pending direction selections, one per user.
///
/// Every operation takes the lock for a single map access and releases it
/// before returning, so callers never hold it across provider or store I/O.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    entries: Mutex<HashMap<UserId, PendingSelection>>,
    next_generation: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `direction` for `user_id`, replacing any previous selection.
    pub fn set(&self, user_id: UserId, direction: Direction) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(
            user_id,
            PendingSelection {
                direction,
                generation,
                selected_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, user_id: UserId) -> Option<Direction> {
        self.entries.lock().get(&user_id).map(|p| p.direction)
    }

    /// Like [`get`](Self::get), but also returns the generation needed for
    /// [`clear_if`](Self::clear_if).
    pub fn selection(&self, user_id: UserId) -> Option<Selection> {
        self.entries.lock().get(&user_id).map(|p| Selection {
            direction: p.direction,
            generation: p.generation,
        })
    }

    pub fn clear(&self, user_id: UserId) {
        self.entries.lock().remove(&user_id);
    }

    /// Removes the entry only if it is still the selection with `generation`.
    /// Returns whether anything was removed.
    pub fn clear_if(&self, user_id: UserId, generation: u64) -> bool {
        let mut entries = self.entries.lock();
        if entries
            .get(&user_id)
            .is_some_and(|p| p.generation == generation)
        {
            entries.remove(&user_id);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops selections that have waited at least `idle` for text.
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self, idle: Duration) -> usize {
        self.sweep_expired_at(Instant::now(), idle)
    }

    fn sweep_expired_at(&self, now: Instant, idle: Duration) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, p| now.saturating_duration_since(p.selected_at) < idle);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_without_selection() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.get(1), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let registry = SessionRegistry::new();
        registry.set(1, Direction::EnRu);
        assert_eq!(registry.get(1), Some(Direction::EnRu));
        // get does not consume
        assert_eq!(registry.get(1), Some(Direction::EnRu));
    }

    #[test]
    fn test_last_write_wins() {
        let registry = SessionRegistry::new();
        registry.set(1, Direction::EnRu);
        registry.set(1, Direction::JaEn);
        assert_eq!(registry.get(1), Some(Direction::JaEn));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear_then_get_is_none() {
        let registry = SessionRegistry::new();
        registry.clear(5);
        assert_eq!(registry.get(5), None);

        registry.set(5, Direction::RuEn);
        registry.clear(5);
        assert_eq!(registry.get(5), None);
    }

    #[test]
    fn test_clear_if_keeps_newer_selection() {
        let registry = SessionRegistry::new();
        registry.set(1, Direction::EnRu);
        let stale = registry.selection(1).unwrap();

        registry.set(1, Direction::JaEn);
        assert!(!registry.clear_if(1, stale.generation));
        assert_eq!(registry.get(1), Some(Direction::JaEn));

        let current = registry.selection(1).unwrap();
        assert_eq!(current.direction, Direction::JaEn);
        assert_ne!(current.generation, stale.generation);
        assert!(registry.clear_if(1, current.generation));
        assert_eq!(registry.get(1), None);
        assert!(!registry.clear_if(1, current.generation));
    }

    #[test]
    fn test_users_are_independent() {
        let registry = SessionRegistry::new();
        registry.set(1, Direction::EnRu);
        registry.set(2, Direction::UkEn);
        registry.clear(1);

        assert_eq!(registry.get(1), None);
        assert_eq!(registry.get(2), Some(Direction::UkEn));
    }

    #[test]
    fn test_sweep_removes_only_stale_entries() {
        let registry = SessionRegistry::new();
        registry.set(1, Direction::EnRu);
        registry.set(2, Direction::EnJa);

        let now = Instant::now();
        assert_eq!(registry.sweep_expired_at(now, Duration::from_secs(60)), 0);
        assert_eq!(registry.len(), 2);

        let later = now + Duration::from_secs(61);
        assert_eq!(registry.sweep_expired_at(later, Duration::from_secs(60)), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sweep_keeps_refreshed_entry() {
        let registry = SessionRegistry::new();
        registry.set(1, Direction::EnRu);
        let mid = Instant::now() + Duration::from_secs(30);

        {
            // simulate user 2 selecting later than user 1
            let mut entries = registry.entries.lock();
            entries.insert(
                2,
                PendingSelection {
                    direction: Direction::RuEn,
                    generation: registry.next_generation.fetch_add(1, Ordering::Relaxed),
                    selected_at: mid,
                },
            );
        }

        let check = mid + Duration::from_secs(40);
        assert_eq!(registry.sweep_expired_at(check, Duration::from_secs(60)), 1);
        assert_eq!(registry.get(1), None);
        assert_eq!(registry.get(2), Some(Direction::RuEn));
    }
}
