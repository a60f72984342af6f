//! Per-row presentation objects.
//!
//! A presentation object sits between one item and the view that displays
//! it. The adapter creates one per constructed row and keeps reusing it as
//! the row is recycled: [`update_data`](RefreshableItemPresentationModel::update_data)
//! points it at a new item, and [`refresh`](RefreshableItemPresentationModel::refresh)
//! forces every binding to re-read.

use std::sync::atomic::{AtomicUsize, Ordering};

use rowbind_core::{ObservableProperty, Property, Signal};

/// Positional context handed to a presentation object with each item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemContext<V> {
    view: V,
    position: usize,
}

impl<V> ItemContext<V> {
    /// Create a context for the row showing `view` at `position`.
    pub fn new(view: V, position: usize) -> Self {
        Self { view, position }
    }

    /// The row's root view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The row's position in the data set.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Split into view and position.
    pub fn into_parts(self) -> (V, usize) {
        (self.view, self.position)
    }
}

/// A presentation object that can be repointed and refreshed in place.
///
/// Methods take `&self`; implementations use interior mutability so the same
/// object can be shared with the bindings of its view.
pub trait RefreshableItemPresentationModel<T, V>: Send + Sync {
    /// Point this object at `item`, displayed in `context`.
    fn update_data(&self, item: T, context: ItemContext<V>);

    /// Re-announce every bound value, whether or not it changed.
    fn refresh(&self);
}

/// The stock presentation object.
///
/// Exposes the current item and position as observable properties. Setting
/// an unchanged value is silent; [`refresh`](RefreshableItemPresentationModel::refresh)
/// re-emits both and then emits `refreshed`.
///
/// # Example
///
/// ```
/// use rowbind::model::{ItemContext, ItemPresentation, RefreshableItemPresentationModel};
///
/// let row: ItemPresentation<&str, u32> = ItemPresentation::new(0);
/// row.update_data("a", ItemContext::new(17, 0));
///
/// assert_eq!(row.item(), Some("a"));
/// assert_eq!(row.position(), 0);
/// assert_eq!(row.view(), Some(17));
/// ```
pub struct ItemPresentation<T, V> {
    item: ObservableProperty<Option<T>>,
    position: ObservableProperty<usize>,
    view: Property<Option<V>>,
    item_view_type: usize,
    refreshed: Signal<()>,
    refresh_count: AtomicUsize,
}

impl<T, V> ItemPresentation<T, V>
where
    T: Clone + PartialEq + Send + 'static,
    V: Clone,
{
    /// Create an empty presentation object for rows of `item_view_type`.
    pub fn new(item_view_type: usize) -> Self {
        Self {
            item: ObservableProperty::new(None),
            position: ObservableProperty::new(0),
            view: Property::new(None),
            item_view_type,
            refreshed: Signal::new(),
            refresh_count: AtomicUsize::new(0),
        }
    }

    /// The current item, `None` until the first update.
    pub fn item(&self) -> Option<T> {
        self.item.get()
    }

    /// The current position.
    pub fn position(&self) -> usize {
        self.position.get()
    }

    /// The view this object is displayed in, `None` until the first update.
    pub fn view(&self) -> Option<V> {
        self.view.get()
    }

    /// The layout kind this object was created for.
    pub fn item_view_type(&self) -> usize {
        self.item_view_type
    }

    /// Emitted with the new item when it changes, and on every refresh.
    pub fn item_changed(&self) -> &Signal<Option<T>> {
        self.item.changed()
    }

    /// Emitted with the new position when it changes, and on every refresh.
    pub fn position_changed(&self) -> &Signal<usize> {
        self.position.changed()
    }

    /// Emitted after a refresh has re-announced all values.
    pub fn refreshed(&self) -> &Signal<()> {
        &self.refreshed
    }

    /// How many times this object has been refreshed.
    pub fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::Acquire)
    }
}

impl<T, V> RefreshableItemPresentationModel<T, V> for ItemPresentation<T, V>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    V: Clone + Send + Sync,
{
    fn update_data(&self, item: T, context: ItemContext<V>) {
        let (view, position) = context.into_parts();
        self.view.set_silent(Some(view));
        self.position.set(position);
        self.item.set(Some(item));
    }

    fn refresh(&self) {
        self.refresh_count.fetch_add(1, Ordering::AcqRel);
        self.item.notify();
        self.position.notify();
        self.refreshed.emit(());
    }
}

impl<T, V> std::fmt::Debug for ItemPresentation<T, V>
where
    T: Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemPresentation")
            .field("item", &self.item)
            .field("position", &self.position)
            .field("view", &self.view)
            .field("item_view_type", &self.item_view_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_update_emits_only_changes() {
        let row: ItemPresentation<String, u32> = ItemPresentation::new(0);
        let items = Arc::new(Mutex::new(Vec::new()));
        let positions = Arc::new(Mutex::new(Vec::new()));

        let items_clone = items.clone();
        row.item_changed()
            .connect(move |item| items_clone.lock().push(item.clone()));
        let positions_clone = positions.clone();
        row.position_changed()
            .connect(move |&p| positions_clone.lock().push(p));

        row.update_data("a".into(), ItemContext::new(1, 0));
        row.update_data("a".into(), ItemContext::new(1, 0));
        row.update_data("b".into(), ItemContext::new(1, 1));

        assert_eq!(*items.lock(), vec![Some("a".to_string()), Some("b".to_string())]);
        assert_eq!(*positions.lock(), vec![1]);
    }

    #[test]
    fn test_refresh_reannounces_everything() {
        let row: ItemPresentation<&str, u32> = ItemPresentation::new(2);
        row.update_data("x", ItemContext::new(9, 3));

        let events = Arc::new(Mutex::new(Vec::new()));
        let e1 = events.clone();
        row.item_changed().connect(move |_| e1.lock().push("item"));
        let e2 = events.clone();
        row.position_changed().connect(move |_| e2.lock().push("position"));
        let e3 = events.clone();
        row.refreshed().connect(move |_| e3.lock().push("refreshed"));

        row.refresh();

        assert_eq!(*events.lock(), vec!["item", "position", "refreshed"]);
        assert_eq!(row.refresh_count(), 1);
        assert_eq!(row.item_view_type(), 2);
    }

    #[test]
    fn test_context_accessors() {
        let context = ItemContext::new("view", 4);
        assert_eq!(*context.view(), "view");
        assert_eq!(context.position(), 4);
        assert_eq!(context.into_parts(), ("view", 4));
    }
}
