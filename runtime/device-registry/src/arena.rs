//! Record Arena - Generational storage for device records
//!
//! Drivers insert their device records into an [`Arena`] and publish the
//! returned [`ArenaIndex`] inside every capability they install. Removing a
//! record bumps the slot generation, so an index that outlived its record
//! fails to resolve instead of naming whatever was inserted next.

pub use thunderdome::{Arena, Index as ArenaIndex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_index_after_slot_reuse() {
        let mut arena = Arena::new();
        let old = arena.insert("kbd0");
        assert_eq!(arena.remove(old), Some("kbd0"));

        let new = arena.insert("kbd1");
        assert_eq!(new.slot(), old.slot());
        assert_ne!(new, old);

        assert_eq!(arena.get(old), None);
        assert!(!arena.contains(old));
        assert_eq!(arena.remove(old), None);
        assert_eq!(arena.get(new), Some(&"kbd1"));
        assert_eq!(arena.len(), 1);
    }
}
