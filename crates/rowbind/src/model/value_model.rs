//! Data-set value models.
//!
//! A value model is a read-only view over an ordered backing collection. The
//! adapter reads `size()` and `item()` during a layout pass, asks it for a
//! fresh presentation object whenever a row is constructed, and listens to
//! `changed()` to learn when the host must re-query.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rowbind_core::Signal;
use rowbind_core::logging::targets;

/// A read-only, index-addressable view over a backing collection.
///
/// `size()` and `item()` must agree for the same snapshot during one adapter
/// pass. Calling `item()` with a position outside `[0, size())` is a
/// precondition violation; implementations may panic.
pub trait DataSetValueModel: Send + Sync {
    /// The domain item type.
    type Item: Clone + Send + Sync + 'static;
    /// The per-row presentation object type.
    type Presentation: Send + Sync + 'static;

    /// Number of items in the data set.
    fn size(&self) -> usize;

    /// The item at `position`.
    fn item(&self, position: usize) -> Self::Item;

    /// Create a fresh presentation object for a row of the given view type.
    fn new_item_presentation_model(&self, item_view_type: usize) -> Arc<Self::Presentation>;

    /// Emitted whenever the backing collection changes.
    fn changed(&self) -> &Signal<()>;
}

/// A shared, type-erased value model.
pub type SharedValueModel<T, P> = Arc<dyn DataSetValueModel<Item = T, Presentation = P>>;

/// A one-way flag recording that a change notification has been observed.
///
/// Clones share the same flag. Once tripped it stays tripped.
#[derive(Debug, Clone, Default)]
pub struct ChangeLatch {
    tripped: Arc<AtomicBool>,
}

impl ChangeLatch {
    /// Create an untripped latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a change occurred.
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::Release);
    }

    /// Whether a change has been observed.
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }
}

/// Decorator that reports an empty data set until its latch is tripped.
///
/// Every other operation delegates to the wrapped model unchanged.
pub struct ZeroSizeUntilChanged<M: ?Sized> {
    inner: Arc<M>,
    latch: ChangeLatch,
}

impl<M: ?Sized> ZeroSizeUntilChanged<M> {
    /// Wrap `inner`, suppressing its size until `latch` trips.
    pub fn new(inner: Arc<M>, latch: ChangeLatch) -> Self {
        Self { inner, latch }
    }

    /// The wrapped model.
    pub fn inner(&self) -> &Arc<M> {
        &self.inner
    }
}

impl<M> DataSetValueModel for ZeroSizeUntilChanged<M>
where
    M: DataSetValueModel + ?Sized,
{
    type Item = M::Item;
    type Presentation = M::Presentation;

    fn size(&self) -> usize {
        if self.latch.is_tripped() {
            self.inner.size()
        } else {
            0
        }
    }

    fn item(&self, position: usize) -> Self::Item {
        self.inner.item(position)
    }

    fn new_item_presentation_model(&self, item_view_type: usize) -> Arc<Self::Presentation> {
        self.inner.new_item_presentation_model(item_view_type)
    }

    fn changed(&self) -> &Signal<()> {
        self.inner.changed()
    }
}

/// Factory closure producing a presentation object for a view type.
pub type PresentationFactory<P> = Arc<dyn Fn(usize) -> Arc<P> + Send + Sync>;

/// A value model over an in-memory `Vec`.
///
/// Mutations emit [`changed`](DataSetValueModel::changed) after the write
/// lock is released.
///
/// # Example
///
/// ```
/// use rowbind::model::{DataSetValueModel, ItemPresentation, ListValueModel};
/// use std::sync::Arc;
///
/// let model: ListValueModel<String, ItemPresentation<String, u32>> =
///     ListValueModel::new(vec!["a".into(), "b".into()], |kind| {
///         Arc::new(ItemPresentation::new(kind))
///     });
///
/// assert_eq!(model.size(), 2);
/// assert_eq!(model.item(1), "b");
/// ```
pub struct ListValueModel<T, P> {
    items: RwLock<Vec<T>>,
    factory: PresentationFactory<P>,
    changed: Signal<()>,
}

impl<T, P> ListValueModel<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Create a model over `items` using `factory` for presentation objects.
    pub fn new<F>(items: Vec<T>, factory: F) -> Self
    where
        F: Fn(usize) -> Arc<P> + Send + Sync + 'static,
    {
        Self {
            items: RwLock::new(items),
            factory: Arc::new(factory),
            changed: Signal::new(),
        }
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the model is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Replaces all items.
    pub fn set_items(&self, items: Vec<T>) {
        *self.items.write() = items;
        self.notify_changed();
    }

    /// Appends an item.
    pub fn push(&self, item: T) {
        self.items.write().push(item);
        self.notify_changed();
    }

    /// Removes and returns the item at `index`, or `None` if out of range.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.notify_changed();
        }
        removed
    }

    /// Provides mutable access to an item via a closure.
    ///
    /// Emits `changed` after modification. Returns `None` if out of range.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = {
            let mut items = self.items.write();
            items.get_mut(index).map(f)
        };
        if result.is_some() {
            self.notify_changed();
        }
        result
    }

    /// Emit `changed` without mutating, e.g. once asynchronously loaded data
    /// has been installed through other means.
    pub fn notify_changed(&self) {
        tracing::debug!(target: targets::MODEL, size = self.len(), "list value model changed");
        self.changed.emit(());
    }
}

impl<T, P> DataSetValueModel for ListValueModel<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    type Item = T;
    type Presentation = P;

    fn size(&self) -> usize {
        self.items.read().len()
    }

    fn item(&self, position: usize) -> T {
        self.items.read()[position].clone()
    }

    fn new_item_presentation_model(&self, item_view_type: usize) -> Arc<P> {
        (self.factory)(item_view_type)
    }

    fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn string_model(items: &[&str]) -> Arc<ListValueModel<String, usize>> {
        Arc::new(ListValueModel::new(
            items.iter().map(|s| s.to_string()).collect(),
            Arc::new,
        ))
    }

    #[test]
    fn test_list_model_accessors() {
        let model = string_model(&["a", "b", "c"]);
        assert_eq!(model.size(), 3);
        assert_eq!(model.item(2), "c");
        assert_eq!(*model.new_item_presentation_model(4), 4);
    }

    #[test]
    fn test_list_model_mutations_emit_changed() {
        let model = string_model(&["a"]);
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        model.changed().connect(move |_| *count_clone.lock() += 1);

        model.push("b".into());
        assert_eq!(model.remove(0), Some("a".to_string()));
        assert_eq!(model.remove(5), None);
        assert_eq!(model.modify(0, |s| s.push('!')), Some(()));
        model.set_items(vec![]);

        assert_eq!(*count.lock(), 4);
        assert!(model.is_empty());
    }

    #[test]
    fn test_zero_size_until_latch_trips() {
        let model = string_model(&["a", "b"]);
        let latch = ChangeLatch::new();
        let wrapped = ZeroSizeUntilChanged::new(model.clone(), latch.clone());

        assert_eq!(wrapped.size(), 0);
        // Items stay reachable; only the size is suppressed.
        assert_eq!(wrapped.item(1), "b");

        latch.trip();
        assert_eq!(wrapped.size(), 2);

        model.push("c".into());
        assert_eq!(wrapped.size(), 3);
    }

    #[test]
    fn test_latch_never_rearms() {
        let latch = ChangeLatch::new();
        let clone = latch.clone();
        assert!(!latch.is_tripped());

        clone.trip();
        clone.trip();
        assert!(latch.is_tripped());
    }

    #[test]
    fn test_wrapper_shares_change_signal() {
        let model = string_model(&[]);
        let wrapped: SharedValueModel<String, usize> =
            Arc::new(ZeroSizeUntilChanged::new(model.clone(), ChangeLatch::new()));
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        wrapped.changed().connect(move |_| *count_clone.lock() += 1);
        model.notify_changed();

        assert_eq!(*count.lock(), 1);
    }
}
