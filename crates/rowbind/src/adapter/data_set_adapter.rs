//! The recyclable data-set adapter.
//!
//! The host widget asks the adapter how many rows exist and then for a view
//! at each visible position, optionally handing back a row it produced
//! earlier. A fresh row is inflated, given a new presentation object and
//! tagged; a recycled row keeps its view and presentation object, which is
//! simply repointed at the item now at that position.
//!
//! # Deferred population
//!
//! Unless [`AdapterConfig::pre_initialize_views`] is set, the adapter reports
//! an empty data set until the value model first signals a change. Change
//! notifications travel through the [`DispatchQueue`](rowbind_core::DispatchQueue)
//! passed to [`DataSetAdapter::observe_changes`], so they are observed on the
//! thread that drains that queue.

use std::fmt;
use std::sync::Arc;

use rowbind_core::logging::targets;
use rowbind_core::{ConnectionId, DispatchHandle, PerfSpan, Signal};

use super::item_layout::{ItemLayoutAttribute, ItemLayoutBinding, LayoutBindingContext};
use super::layout::{DisplayMode, ItemLayoutSelector, LayoutBinder, LayoutId};
use super::view_tags::{ViewSlot, ViewTags};
use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::model::{
    ChangeLatch, DataSetValueModel, ItemContext, RefreshableItemPresentationModel,
    SharedValueModel, ZeroSizeUntilChanged,
};

/// A row produced by the adapter.
///
/// The host keeps the row alongside its view and passes it back to
/// [`DataSetAdapter::view_for`] to recycle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow<V> {
    slot: ViewSlot,
    view: V,
    mode: DisplayMode,
    layout: LayoutId,
}

impl<V> ItemRow<V> {
    /// The tag slot identifying this row.
    pub fn slot(&self) -> ViewSlot {
        self.slot
    }

    /// The root view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The display mode the row was constructed for.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// The layout the row was inflated from.
    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    /// Consume the row, returning its root view.
    pub fn into_view(self) -> V {
        self.view
    }
}

/// Signals emitted by a [`DataSetAdapter`].
pub struct AdapterSignals {
    /// Emitted after a change notification has been observed. The host
    /// should re-query the count and redraw visible rows.
    pub data_set_changed: Signal<()>,
}

impl Default for AdapterSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterSignals {
    /// Create a new set of adapter signals.
    pub fn new() -> Self {
        Self {
            data_set_changed: Signal::new(),
        }
    }
}

/// Disconnects the adapter from its value model's change signal when dropped.
struct ChangeSubscription {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ChangeSubscription {
    fn new<T, P>(model: SharedValueModel<T, P>, id: ConnectionId) -> Self
    where
        T: Clone + Send + Sync + 'static,
        P: Send + Sync + 'static,
    {
        Self {
            disconnect: Some(Box::new(move || {
                model.changed().disconnect(id);
            })),
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

type LayoutSelectFn<T> = fn(&dyn ItemLayoutSelector<T>, &T, usize) -> LayoutId;

/// What a display mode resolves to for one request.
struct ModeStrategy<'a, T, V, C, P> {
    select: LayoutSelectFn<T>,
    binder: &'a dyn LayoutBinder<V, C, P>,
}

fn select_item_layout<T>(selector: &dyn ItemLayoutSelector<T>, item: &T, position: usize) -> LayoutId {
    selector.select_item_layout(item, position)
}

fn select_dropdown_layout<T>(
    selector: &dyn ItemLayoutSelector<T>,
    item: &T,
    position: usize,
) -> LayoutId {
    selector.select_dropdown_layout(item, position)
}

/// Adapts a data-set value model to a host widget's view-recycling protocol.
///
/// `T` is the item type, `P` the presentation object type, `V` the host's
/// view handle and `C` the host's parent container.
pub struct DataSetAdapter<T, P, V, C> {
    config: AdapterConfig,
    value_model: Option<SharedValueModel<T, P>>,
    item_binder: Arc<dyn LayoutBinder<V, C, P>>,
    dropdown_binder: Arc<dyn LayoutBinder<V, C, P>>,
    layout_selector: Arc<dyn ItemLayoutSelector<T>>,
    view_tags: ViewTags<Arc<P>>,
    change_latch: ChangeLatch,
    signals: Arc<AdapterSignals>,
    subscription: Option<ChangeSubscription>,
    dispatch: Option<DispatchHandle>,
}

impl<T, P, V, C> DataSetAdapter<T, P, V, C>
where
    T: Clone + Send + Sync + 'static,
    P: RefreshableItemPresentationModel<T, V> + 'static,
    V: Clone,
{
    /// Start building an adapter.
    pub fn builder() -> DataSetAdapterBuilder<T, P, V, C> {
        DataSetAdapterBuilder::new()
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// The adapter's signals.
    pub fn signals(&self) -> &AdapterSignals {
        &self.signals
    }

    /// Whether a value model is attached.
    pub fn has_value_model(&self) -> bool {
        self.value_model.is_some()
    }

    /// Whether a change notification has been observed.
    pub fn change_observed(&self) -> bool {
        self.change_latch.is_tripped()
    }

    /// Attach or replace the value model.
    ///
    /// If [`observe_changes`](Self::observe_changes) was called before, the
    /// subscription moves to the new model.
    pub fn set_value_model<M>(&mut self, model: Arc<M>)
    where
        M: DataSetValueModel<Item = T, Presentation = P> + 'static,
    {
        self.unsubscribe();
        let model: SharedValueModel<T, P> = model;
        self.value_model = Some(wrap_value_model(&self.config, &self.change_latch, model));
        if let Some(dispatch) = self.dispatch.clone() {
            self.observe_changes(&dispatch);
        }
    }

    /// Number of rows the host should display.
    ///
    /// 0 when no value model is attached, and 0 in lazy mode until the first
    /// change notification has been observed.
    pub fn count(&self) -> usize {
        self.value_model.as_ref().map_or(0, |model| model.size())
    }

    /// The item at `position`, or `None` without a value model.
    ///
    /// # Panics
    ///
    /// May panic if `position` is outside the value model's range.
    pub fn item(&self, position: usize) -> Option<T> {
        self.value_model.as_ref().map(|model| model.item(position))
    }

    /// Stable row identifier; rows are identified by position.
    pub fn item_id(&self, position: usize) -> u64 {
        position as u64
    }

    /// Number of layout kinds, as reported by the layout selector.
    pub fn view_type_count(&self) -> usize {
        self.layout_selector.view_type_count()
    }

    /// Layout kind of the row at `position`, 0 without a value model.
    pub fn item_view_type(&self, position: usize) -> usize {
        match &self.value_model {
            Some(model) => self
                .layout_selector
                .item_view_type(&model.item(position), position),
            None => 0,
        }
    }

    /// Produce the primary view for `position`.
    pub fn view(
        &mut self,
        position: usize,
        recycled: Option<&ItemRow<V>>,
        parent: &C,
    ) -> Result<ItemRow<V>> {
        self.view_for(position, recycled, parent, DisplayMode::Item)
    }

    /// Produce the dropdown view for `position`.
    pub fn dropdown_view(
        &mut self,
        position: usize,
        recycled: Option<&ItemRow<V>>,
        parent: &C,
    ) -> Result<ItemRow<V>> {
        self.view_for(position, recycled, parent, DisplayMode::Dropdown)
    }

    /// Produce a view for `position` in `mode`.
    ///
    /// Without `recycled`, a new row is inflated, bound to a fresh
    /// presentation object and tagged. With `recycled`, the row's tagged
    /// presentation object is repointed at the item at `position` and the
    /// same row is returned; nothing is inflated.
    pub fn view_for(
        &mut self,
        position: usize,
        recycled: Option<&ItemRow<V>>,
        parent: &C,
        mode: DisplayMode,
    ) -> Result<ItemRow<V>> {
        let _span = PerfSpan::new("view_for");
        match recycled {
            Some(row) => self.refresh_row(position, row),
            None => self.construct_row(position, parent, mode),
        }
    }

    fn strategy(&self, mode: DisplayMode) -> ModeStrategy<'_, T, V, C, P> {
        match mode {
            DisplayMode::Item => ModeStrategy {
                select: select_item_layout::<T>,
                binder: self.item_binder.as_ref(),
            },
            DisplayMode::Dropdown => ModeStrategy {
                select: select_dropdown_layout::<T>,
                binder: self.dropdown_binder.as_ref(),
            },
        }
    }

    fn construct_row(&mut self, position: usize, parent: &C, mode: DisplayMode) -> Result<ItemRow<V>> {
        let model = Arc::clone(self.value_model.as_ref().ok_or(AdapterError::NoValueModel)?);
        let item = model.item(position);

        let strategy = self.strategy(mode);
        let layout = (strategy.select)(self.layout_selector.as_ref(), &item, position);
        let mut bindable = strategy.binder.inflate(parent, layout)?;
        let view = bindable.root_view();

        let item_view_type = self.layout_selector.item_view_type(&item, position);
        let presentation = model.new_item_presentation_model(item_view_type);
        presentation.update_data(item, ItemContext::new(view.clone(), position));
        bindable.bind_to(Arc::clone(&presentation))?;

        let slot = self.view_tags.allocate();
        if let Some(mut tag) = self.view_tags.tag_for(slot) {
            tag.set(presentation);
        }

        tracing::trace!(
            target: targets::ADAPTER,
            position,
            %mode,
            layout,
            item_view_type,
            ?slot,
            "constructed row"
        );
        Ok(ItemRow {
            slot,
            view,
            mode,
            layout,
        })
    }

    fn refresh_row(&mut self, position: usize, row: &ItemRow<V>) -> Result<ItemRow<V>> {
        let model = Arc::clone(self.value_model.as_ref().ok_or(AdapterError::NoValueModel)?);
        let slot = row.slot;
        let presentation = self
            .view_tags
            .tag_for(slot)
            .ok_or(AdapterError::UnknownViewSlot { slot })?
            .get()
            .cloned()
            .ok_or(AdapterError::UntaggedView { slot })?;

        presentation.update_data(model.item(position), ItemContext::new(row.view.clone(), position));
        let refreshed = self.config.pre_initialize_views;
        if refreshed {
            presentation.refresh();
        }

        tracing::trace!(
            target: targets::ADAPTER,
            position,
            mode = %row.mode,
            ?slot,
            refreshed,
            "recycled row"
        );
        Ok(row.clone())
    }

    /// Forget a row the host has discarded.
    ///
    /// Rows are tracked until released: a host that drops rows without
    /// calling this keeps their presentation objects and bindings alive for
    /// the adapter's lifetime. Returns `true` if the row belonged to this
    /// adapter and was still live.
    pub fn release_view(&mut self, row: &ItemRow<V>) -> bool {
        let live = self.view_tags.contains(row.slot);
        self.view_tags.release(row.slot);
        live
    }

    /// Number of rows constructed and not yet released.
    pub fn live_views(&self) -> usize {
        self.view_tags.len()
    }

    /// Subscribe to the value model's change notifications.
    ///
    /// Notifications are posted through `dispatch`. When the owning queue is
    /// drained, the adapter records that a change was observed and emits
    /// [`AdapterSignals::data_set_changed`]. Returns `false` if no value
    /// model is attached; the subscription is made once one is set.
    pub fn observe_changes(&mut self, dispatch: &DispatchHandle) -> bool {
        self.dispatch = Some(dispatch.clone());
        let Some(model) = self.value_model.clone() else {
            tracing::debug!(target: targets::ADAPTER, "no value model to observe yet");
            return false;
        };
        self.unsubscribe();

        let latch = self.change_latch.clone();
        let signals = Arc::clone(&self.signals);
        let id = model.changed().connect_queued(dispatch, move |_| {
            latch.trip();
            tracing::debug!(target: targets::ADAPTER, "data set changed");
            signals.data_set_changed.emit(());
        });
        self.subscription = Some(ChangeSubscription::new(model, id));
        true
    }

    fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    /// Forward a layout id to the layout selector.
    pub fn set_item_layout_id(&self, layout: LayoutId) {
        self.layout_selector.set_item_layout_id(layout);
    }

    /// Bind an item-layout attribute to this adapter's layout selector.
    pub fn bind_item_layout(
        &self,
        attribute: &ItemLayoutAttribute,
        context: &dyn LayoutBindingContext,
    ) -> Result<ItemLayoutBinding> {
        attribute.bind(Arc::clone(&self.layout_selector), context)
    }
}

impl<T, P, V, C> fmt::Debug for DataSetAdapter<T, P, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSetAdapter")
            .field("config", &self.config)
            .field("has_value_model", &self.value_model.is_some())
            .field("live_views", &self.view_tags.len())
            .field("change_observed", &self.change_latch.is_tripped())
            .finish_non_exhaustive()
    }
}

fn wrap_value_model<T, P>(
    config: &AdapterConfig,
    latch: &ChangeLatch,
    model: SharedValueModel<T, P>,
) -> SharedValueModel<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    if config.pre_initialize_views {
        tracing::debug!(target: targets::ADAPTER, "pre-initializing views");
        model
    } else {
        tracing::debug!(target: targets::ADAPTER, "deferring population until first change");
        Arc::new(ZeroSizeUntilChanged::new(model, latch.clone()))
    }
}

/// Builder for [`DataSetAdapter`].
///
/// A layout selector and an item binder are required. The dropdown binder
/// defaults to the item binder.
///
/// # Example
///
/// ```
/// use rowbind::adapter::{BindableView, DataSetAdapter, LayoutBinder, LayoutId, SingleLayoutSelector};
/// use rowbind::model::{ItemPresentation, ListValueModel};
/// use rowbind::{AdapterConfig, Result};
/// use std::sync::Arc;
///
/// type Row = ItemPresentation<String, LayoutId>;
///
/// struct Label(LayoutId);
///
/// impl BindableView<LayoutId, Row> for Label {
///     fn root_view(&self) -> LayoutId {
///         self.0
///     }
///
///     fn bind_to(&mut self, _presentation: Arc<Row>) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// struct Labels;
///
/// impl LayoutBinder<LayoutId, (), Row> for Labels {
///     fn inflate(&self, _parent: &(), layout: LayoutId) -> Result<Box<dyn BindableView<LayoutId, Row>>> {
///         Ok(Box::new(Label(layout)))
///     }
/// }
///
/// let model = Arc::new(ListValueModel::new(vec!["a".to_string()], |kind| {
///     Arc::new(Row::new(kind))
/// }));
///
/// let mut adapter: DataSetAdapter<String, Row, LayoutId, ()> = DataSetAdapter::builder()
///     .config(AdapterConfig::eager())
///     .value_model(model)
///     .layout_selector(Arc::new(SingleLayoutSelector::new(3)))
///     .item_binder(Arc::new(Labels))
///     .build()?;
///
/// assert_eq!(adapter.count(), 1);
/// let row = adapter.view(0, None, &())?;
/// assert_eq!(*row.view(), 3);
/// # Ok::<(), rowbind::AdapterError>(())
/// ```
pub struct DataSetAdapterBuilder<T, P, V, C> {
    config: AdapterConfig,
    value_model: Option<SharedValueModel<T, P>>,
    item_binder: Option<Arc<dyn LayoutBinder<V, C, P>>>,
    dropdown_binder: Option<Arc<dyn LayoutBinder<V, C, P>>>,
    layout_selector: Option<Arc<dyn ItemLayoutSelector<T>>>,
}

impl<T, P, V, C> Default for DataSetAdapterBuilder<T, P, V, C> {
    fn default() -> Self {
        Self {
            config: AdapterConfig::default(),
            value_model: None,
            item_binder: None,
            dropdown_binder: None,
            layout_selector: None,
        }
    }
}

impl<T, P, V, C> DataSetAdapterBuilder<T, P, V, C>
where
    T: Clone + Send + Sync + 'static,
    P: RefreshableItemPresentationModel<T, V> + 'static,
    V: Clone,
{
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the adapter configuration.
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the value model.
    pub fn value_model<M>(mut self, model: Arc<M>) -> Self
    where
        M: DataSetValueModel<Item = T, Presentation = P> + 'static,
    {
        self.value_model = Some(model);
        self
    }

    /// Set the binder used for primary views.
    pub fn item_binder<B>(mut self, binder: Arc<B>) -> Self
    where
        B: LayoutBinder<V, C, P> + 'static,
    {
        self.item_binder = Some(binder);
        self
    }

    /// Set the binder used for dropdown views.
    pub fn dropdown_binder<B>(mut self, binder: Arc<B>) -> Self
    where
        B: LayoutBinder<V, C, P> + 'static,
    {
        self.dropdown_binder = Some(binder);
        self
    }

    /// Set the layout selector.
    pub fn layout_selector<S>(mut self, selector: Arc<S>) -> Self
    where
        S: ItemLayoutSelector<T> + 'static,
    {
        self.layout_selector = Some(selector);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<DataSetAdapter<T, P, V, C>> {
        let layout_selector = self
            .layout_selector
            .ok_or(AdapterError::MissingComponent("layout selector"))?;
        let item_binder = self
            .item_binder
            .ok_or(AdapterError::MissingComponent("item binder"))?;
        let dropdown_binder = self
            .dropdown_binder
            .unwrap_or_else(|| Arc::clone(&item_binder));

        let change_latch = ChangeLatch::new();
        let value_model = self
            .value_model
            .map(|model| wrap_value_model(&self.config, &change_latch, model));

        Ok(DataSetAdapter {
            config: self.config,
            value_model,
            item_binder,
            dropdown_binder,
            layout_selector,
            view_tags: ViewTags::new(),
            change_latch,
            signals: Arc::new(AdapterSignals::new()),
            subscription: None,
            dispatch: None,
        })
    }
}

static_assertions::assert_impl_all!(AdapterSignals: Send, Sync);
static_assertions::assert_impl_all!(ItemRow<u32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{BindableView, SingleLayoutSelector};
    use crate::model::{ItemPresentation, ListValueModel};
    use parking_lot::Mutex;
    use rowbind_core::DispatchQueue;

    type Row = ItemPresentation<String, u32>;
    type TestAdapter = DataSetAdapter<String, Row, u32, ()>;

    struct Inflated {
        view: u32,
    }

    impl BindableView<u32, Row> for Inflated {
        fn root_view(&self) -> u32 {
            self.view
        }

        fn bind_to(&mut self, _presentation: Arc<Row>) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingBinder {
        inflated: Mutex<Vec<LayoutId>>,
    }

    impl LayoutBinder<u32, (), Row> for CountingBinder {
        fn inflate(&self, _parent: &(), layout: LayoutId) -> Result<Box<dyn BindableView<u32, Row>>> {
            let mut inflated = self.inflated.lock();
            inflated.push(layout);
            Ok(Box::new(Inflated {
                view: inflated.len() as u32,
            }))
        }
    }

    struct FailingBinder;

    impl LayoutBinder<u32, (), Row> for FailingBinder {
        fn inflate(&self, _parent: &(), layout: LayoutId) -> Result<Box<dyn BindableView<u32, Row>>> {
            Err(AdapterError::inflate(layout, "unknown layout"))
        }
    }

    struct Unbindable;

    impl BindableView<u32, Row> for Unbindable {
        fn root_view(&self) -> u32 {
            0
        }

        fn bind_to(&mut self, _presentation: Arc<Row>) -> Result<()> {
            Err(AdapterError::bind("no text slot for property `item`"))
        }
    }

    struct UnbindableBinder;

    impl LayoutBinder<u32, (), Row> for UnbindableBinder {
        fn inflate(&self, _parent: &(), _layout: LayoutId) -> Result<Box<dyn BindableView<u32, Row>>> {
            Ok(Box::new(Unbindable))
        }
    }

    fn model(items: &[&str]) -> Arc<ListValueModel<String, Row>> {
        Arc::new(ListValueModel::new(
            items.iter().map(|s| s.to_string()).collect(),
            |kind| Arc::new(Row::new(kind)),
        ))
    }

    fn adapter(config: AdapterConfig, items: &[&str]) -> TestAdapter {
        DataSetAdapter::builder()
            .config(config)
            .value_model(model(items))
            .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
            .item_binder(Arc::new(CountingBinder::default()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_selector_and_binder() {
        let err = TestAdapter::builder()
            .item_binder(Arc::new(CountingBinder::default()))
            .build()
            .unwrap_err();
        assert!(matches!(err, AdapterError::MissingComponent("layout selector")));

        let err = TestAdapter::builder()
            .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
            .build()
            .unwrap_err();
        assert!(matches!(err, AdapterError::MissingComponent("item binder")));
    }

    #[test]
    fn test_without_value_model() {
        let mut adapter = TestAdapter::builder()
            .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
            .item_binder(Arc::new(CountingBinder::default()))
            .build()
            .unwrap();

        assert!(!adapter.has_value_model());
        assert_eq!(adapter.count(), 0);
        assert_eq!(adapter.item(0), None);
        assert_eq!(adapter.item_view_type(0), 0);
        assert!(matches!(
            adapter.view(0, None, &()),
            Err(AdapterError::NoValueModel)
        ));

        let queue = DispatchQueue::new();
        assert!(!adapter.observe_changes(&queue.handle()));
    }

    #[test]
    fn test_item_id_is_position() {
        let adapter = adapter(AdapterConfig::eager(), &["a", "b", "c"]);
        assert_eq!(adapter.item_id(2), 2);
        assert_eq!(adapter.item(1).as_deref(), Some("b"));
    }

    #[test]
    fn test_foreign_slot_is_rejected() {
        let mut first = adapter(AdapterConfig::eager(), &["a"]);
        let mut second = adapter(AdapterConfig::eager(), &["a"]);

        let row = first.view(0, None, &()).unwrap();
        let own = second.view(0, None, &()).unwrap();
        assert_ne!(own.slot(), row.slot());

        let err = second.view(0, Some(&row), &()).unwrap_err();
        assert!(matches!(err, AdapterError::UnknownViewSlot { slot } if slot == row.slot()));
        assert!(!second.release_view(&row));
        assert_eq!(second.live_views(), 1);
        assert_eq!(second.view(0, Some(&own), &()).unwrap(), own);
    }

    #[test]
    fn test_untagged_slot_is_rejected() {
        let mut adapter = adapter(AdapterConfig::eager(), &["a"]);
        let slot = adapter.view_tags.allocate();
        let row = ItemRow {
            slot,
            view: 0,
            mode: DisplayMode::Item,
            layout: 1,
        };

        let err = adapter.view(0, Some(&row), &()).unwrap_err();
        assert!(matches!(err, AdapterError::UntaggedView { .. }));
    }

    #[test]
    fn test_inflate_failure_propagates() {
        let mut adapter: TestAdapter = DataSetAdapter::builder()
            .config(AdapterConfig::eager())
            .value_model(model(&["a"]))
            .layout_selector(Arc::new(SingleLayoutSelector::new(5)))
            .item_binder(Arc::new(FailingBinder))
            .build()
            .unwrap();

        let err = adapter.view(0, None, &()).unwrap_err();
        assert!(matches!(err, AdapterError::Inflate { layout: 5, .. }));
        assert_eq!(adapter.live_views(), 0);
    }

    #[test]
    fn test_bind_failure_propagates() {
        let mut adapter: TestAdapter = DataSetAdapter::builder()
            .config(AdapterConfig::eager())
            .value_model(model(&["a"]))
            .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
            .item_binder(Arc::new(UnbindableBinder))
            .build()
            .unwrap();

        let err = adapter.view(0, None, &()).unwrap_err();
        assert!(matches!(err, AdapterError::Bind(ref message) if message.contains("`item`")));
        assert_eq!(adapter.live_views(), 0);
    }

    #[test]
    fn test_unreleased_rows_stay_live() {
        let mut adapter = adapter(AdapterConfig::eager(), &["a", "b"]);
        let kept = adapter.view(0, None, &()).unwrap();
        drop(adapter.view(1, None, &()).unwrap());

        // Dropping a row does not release its slot.
        assert_eq!(adapter.live_views(), 2);
        assert!(adapter.release_view(&kept));
        assert_eq!(adapter.live_views(), 1);
    }

    #[test]
    fn test_release_view() {
        let mut adapter = adapter(AdapterConfig::eager(), &["a", "b"]);
        let row = adapter.view(0, None, &()).unwrap();
        adapter.view(1, None, &()).unwrap();
        assert_eq!(adapter.live_views(), 2);

        assert!(adapter.release_view(&row));
        assert!(!adapter.release_view(&row));
        assert_eq!(adapter.live_views(), 1);
        assert!(matches!(
            adapter.view(0, Some(&row), &()),
            Err(AdapterError::UnknownViewSlot { .. })
        ));
    }

    #[test]
    fn test_dropdown_binder_defaults_to_item_binder() {
        let binder = Arc::new(CountingBinder::default());
        let mut adapter: TestAdapter = DataSetAdapter::builder()
            .config(AdapterConfig::eager())
            .value_model(model(&["a"]))
            .layout_selector(Arc::new(SingleLayoutSelector::new(1).with_dropdown_layout(2)))
            .item_binder(binder.clone())
            .build()
            .unwrap();

        adapter.view(0, None, &()).unwrap();
        adapter.dropdown_view(0, None, &()).unwrap();
        assert_eq!(*binder.inflated.lock(), vec![1, 2]);
    }

    #[test]
    fn test_drop_disconnects_subscription() {
        let source = model(&["a"]);
        let queue = DispatchQueue::new();
        let mut adapter: TestAdapter = DataSetAdapter::builder()
            .value_model(source.clone())
            .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
            .item_binder(Arc::new(CountingBinder::default()))
            .build()
            .unwrap();

        assert!(adapter.observe_changes(&queue.handle()));
        assert!(adapter.observe_changes(&queue.handle()));
        assert_eq!(source.changed().connection_count(), 1);

        drop(adapter);
        assert_eq!(source.changed().connection_count(), 0);
    }

    #[test]
    fn test_set_value_model_moves_subscription() {
        let first = model(&["a"]);
        let second = model(&["x", "y"]);
        let queue = DispatchQueue::new();
        let mut adapter: TestAdapter = DataSetAdapter::builder()
            .value_model(first.clone())
            .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
            .item_binder(Arc::new(CountingBinder::default()))
            .build()
            .unwrap();
        adapter.observe_changes(&queue.handle());

        adapter.set_value_model(second.clone());
        assert_eq!(first.changed().connection_count(), 0);
        assert_eq!(second.changed().connection_count(), 1);

        second.notify_changed();
        queue.process_pending();
        assert_eq!(adapter.count(), 2);
    }

    #[test]
    fn test_set_item_layout_id_reaches_selector() {
        let selector = Arc::new(SingleLayoutSelector::new(1));
        let adapter: TestAdapter = DataSetAdapter::builder()
            .layout_selector(selector.clone())
            .item_binder(Arc::new(CountingBinder::default()))
            .build()
            .unwrap();

        adapter.set_item_layout_id(9);
        assert_eq!(selector.item_layout(), 9);
    }
}
