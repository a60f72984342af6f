//! View tags: per-view payload storage.
//!
//! Every row the adapter constructs gets an opaque [`ViewSlot`]. The slot is
//! handed back to the host inside the row, and the host hands it back on
//! recycle, so the adapter can find the presentation object it attached to
//! that view without touching the view itself.

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    struct SlotKey;
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying one constructed view.
///
/// A slot names both the store that issued it and the entry within that
/// store. Slots are never reused for a different view while the original is
/// live; a released slot, or one issued by another store, is rejected by
/// later lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewSlot {
    store: u64,
    key: SlotKey,
}

/// Storage for per-view payloads, keyed by [`ViewSlot`].
///
/// Entries live until [`release`](Self::release) is called. A host that
/// discards views without releasing them keeps their payloads alive for as
/// long as the store exists.
pub struct ViewTags<P> {
    store: u64,
    slots: SlotMap<SlotKey, Option<P>>,
}

impl<P> Default for ViewTags<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ViewTags<P> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            store: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            slots: SlotMap::with_key(),
        }
    }

    /// Reserve a slot for a freshly constructed view.
    pub fn allocate(&mut self) -> ViewSlot {
        ViewSlot {
            store: self.store,
            key: self.slots.insert(None),
        }
    }

    /// The tag for `slot`, or `None` if this store never issued it or it has
    /// been released.
    pub fn tag_for(&mut self, slot: ViewSlot) -> Option<ViewTag<'_, P>> {
        if slot.store != self.store {
            return None;
        }
        self.slots
            .get_mut(slot.key)
            .map(|payload| ViewTag { payload })
    }

    /// Free a slot, returning its payload if one was set.
    pub fn release(&mut self, slot: ViewSlot) -> Option<P> {
        if slot.store != self.store {
            return None;
        }
        self.slots.remove(slot.key).flatten()
    }

    /// Whether `slot` is live in this store.
    pub fn contains(&self, slot: ViewSlot) -> bool {
        slot.store == self.store && self.slots.contains_key(slot.key)
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slots are live.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The payload cell of one view.
pub struct ViewTag<'a, P> {
    payload: &'a mut Option<P>,
}

impl<P> ViewTag<'_, P> {
    /// Store `payload`, replacing any previous one.
    pub fn set(&mut self, payload: P) {
        *self.payload = Some(payload);
    }

    /// The stored payload, `None` before the first `set`.
    pub fn get(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut tags = ViewTags::new();
        let slot = tags.allocate();

        let mut tag = tags.tag_for(slot).unwrap();
        assert_eq!(tag.get(), None);
        tag.set("presentation");

        assert_eq!(tags.tag_for(slot).unwrap().get(), Some(&"presentation"));
    }

    #[test]
    fn test_tags_are_per_slot() {
        let mut tags = ViewTags::new();
        let first = tags.allocate();
        let second = tags.allocate();

        tags.tag_for(first).unwrap().set(1);
        tags.tag_for(second).unwrap().set(2);

        assert_eq!(tags.tag_for(first).unwrap().get(), Some(&1));
        assert_eq!(tags.tag_for(second).unwrap().get(), Some(&2));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_foreign_slot_is_rejected() {
        let mut other = ViewTags::<u8>::new();
        let foreign = other.allocate();
        other.tag_for(foreign).unwrap().set(1);

        // Same position in a different store.
        let mut tags = ViewTags::<u8>::new();
        let own = tags.allocate();
        tags.tag_for(own).unwrap().set(2);
        assert_ne!(own, foreign);

        assert!(tags.tag_for(foreign).is_none());
        assert!(!tags.contains(foreign));
        assert_eq!(tags.release(foreign), None);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.tag_for(own).unwrap().get(), Some(&2));
    }

    #[test]
    fn test_release() {
        let mut tags = ViewTags::new();
        let slot = tags.allocate();
        tags.tag_for(slot).unwrap().set("p");

        assert_eq!(tags.release(slot), Some("p"));
        assert!(tags.tag_for(slot).is_none());
        assert_eq!(tags.release(slot), None);
        assert!(tags.is_empty());

        // A new allocation never resurrects the released key.
        let next = tags.allocate();
        assert_ne!(next, slot);
    }
}
