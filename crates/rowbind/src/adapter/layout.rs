//! Layout selection and layout binding.
//!
//! An [`ItemLayoutSelector`] decides which layout a row uses, separately for
//! the primary item view and the dropdown view, and classifies rows into
//! layout kinds so the host can keep one recycling pool per kind. A
//! [`LayoutBinder`] turns a layout identifier into a [`BindableView`] that can
//! be wired to a presentation object.

use std::fmt;
use std::sync::Arc;

use rowbind_core::Property;
use rowbind_core::logging::targets;

use crate::error::{AdapterError, Result};

/// Host resource identifier of a layout.
pub type LayoutId = i32;

/// Which of the two view-production paths a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// The primary row view.
    Item,
    /// The view shown inside a dropdown popup.
    Dropdown,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Item => f.write_str("item"),
            DisplayMode::Dropdown => f.write_str("dropdown"),
        }
    }
}

/// Chooses layouts for rows.
///
/// `item_view_type` must return a value in `[0, view_type_count())` and be
/// stable for the same item and position.
pub trait ItemLayoutSelector<T>: Send + Sync {
    /// Layout for the primary view of `item` at `position`.
    fn select_item_layout(&self, item: &T, position: usize) -> LayoutId;

    /// Layout for the dropdown view of `item` at `position`.
    fn select_dropdown_layout(&self, item: &T, position: usize) -> LayoutId;

    /// Number of distinct layout kinds.
    fn view_type_count(&self) -> usize;

    /// Layout kind of `item` at `position`.
    fn item_view_type(&self, item: &T, position: usize) -> usize;

    /// Receive an item layout pushed by an item-layout attribute.
    ///
    /// Selectors that do not support runtime layout changes ignore it.
    fn set_item_layout_id(&self, layout: LayoutId) {
        tracing::debug!(
            target: targets::LAYOUT,
            layout,
            "selector ignores pushed item layout"
        );
    }
}

/// A selector with a single layout kind.
///
/// The dropdown layout defaults to the item layout until set explicitly. The
/// item layout can be replaced at runtime through
/// [`set_item_layout_id`](ItemLayoutSelector::set_item_layout_id).
///
/// # Example
///
/// ```
/// use rowbind::adapter::{ItemLayoutSelector, SingleLayoutSelector};
///
/// let selector = SingleLayoutSelector::new(10);
/// assert_eq!(ItemLayoutSelector::<&str>::select_dropdown_layout(&selector, &"a", 0), 10);
///
/// let selector = selector.with_dropdown_layout(20);
/// assert_eq!(ItemLayoutSelector::<&str>::select_dropdown_layout(&selector, &"a", 0), 20);
/// ```
#[derive(Debug)]
pub struct SingleLayoutSelector {
    item_layout: Property<LayoutId>,
    dropdown_layout: Property<Option<LayoutId>>,
}

impl SingleLayoutSelector {
    /// Create a selector using `item_layout` for both display modes.
    pub fn new(item_layout: LayoutId) -> Self {
        Self {
            item_layout: Property::new(item_layout),
            dropdown_layout: Property::new(None),
        }
    }

    /// Use a distinct dropdown layout.
    pub fn with_dropdown_layout(self, dropdown_layout: LayoutId) -> Self {
        self.dropdown_layout.set(Some(dropdown_layout));
        self
    }

    /// The current item layout.
    pub fn item_layout(&self) -> LayoutId {
        self.item_layout.get()
    }

    /// The current dropdown layout.
    pub fn dropdown_layout(&self) -> LayoutId {
        self.dropdown_layout
            .get()
            .unwrap_or_else(|| self.item_layout.get())
    }
}

impl<T> ItemLayoutSelector<T> for SingleLayoutSelector {
    fn select_item_layout(&self, _item: &T, _position: usize) -> LayoutId {
        self.item_layout()
    }

    fn select_dropdown_layout(&self, _item: &T, _position: usize) -> LayoutId {
        self.dropdown_layout()
    }

    fn view_type_count(&self) -> usize {
        1
    }

    fn item_view_type(&self, _item: &T, _position: usize) -> usize {
        0
    }

    fn set_item_layout_id(&self, layout: LayoutId) {
        if self.item_layout.set(layout) {
            tracing::debug!(target: targets::LAYOUT, layout, "item layout replaced");
        }
    }
}

/// Item and dropdown layouts for one layout kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutKind {
    /// Layout of the primary view.
    pub item: LayoutId,
    /// Layout of the dropdown view.
    pub dropdown: LayoutId,
}

impl LayoutKind {
    /// A kind using `item` for both display modes.
    pub fn uniform(item: LayoutId) -> Self {
        Self {
            item,
            dropdown: item,
        }
    }

    /// A kind with distinct item and dropdown layouts.
    pub fn new(item: LayoutId, dropdown: LayoutId) -> Self {
        Self { item, dropdown }
    }
}

type Classifier<T> = Arc<dyn Fn(&T, usize) -> usize + Send + Sync>;

/// A selector mapping each row to one of several layout kinds.
///
/// The classifier decides the kind; a classification outside the configured
/// kinds is clamped to the last kind and logged.
pub struct MappedLayoutSelector<T> {
    kinds: Vec<LayoutKind>,
    classify: Classifier<T>,
}

impl<T> MappedLayoutSelector<T> {
    /// Create a selector over `kinds`.
    ///
    /// Returns [`AdapterError::NoLayoutKinds`] if `kinds` is empty.
    pub fn new<F>(kinds: Vec<LayoutKind>, classify: F) -> Result<Self>
    where
        F: Fn(&T, usize) -> usize + Send + Sync + 'static,
    {
        if kinds.is_empty() {
            return Err(AdapterError::NoLayoutKinds);
        }
        Ok(Self {
            kinds,
            classify: Arc::new(classify),
        })
    }

    /// The configured layout kinds.
    pub fn kinds(&self) -> &[LayoutKind] {
        &self.kinds
    }

    fn kind_index(&self, item: &T, position: usize) -> usize {
        let kind = (self.classify)(item, position);
        let last = self.kinds.len() - 1;
        if kind > last {
            tracing::warn!(
                target: targets::LAYOUT,
                kind,
                position,
                view_type_count = self.kinds.len(),
                "classifier returned out-of-range layout kind, clamping"
            );
            last
        } else {
            kind
        }
    }
}

impl<T> ItemLayoutSelector<T> for MappedLayoutSelector<T> {
    fn select_item_layout(&self, item: &T, position: usize) -> LayoutId {
        self.kinds[self.kind_index(item, position)].item
    }

    fn select_dropdown_layout(&self, item: &T, position: usize) -> LayoutId {
        self.kinds[self.kind_index(item, position)].dropdown
    }

    fn view_type_count(&self) -> usize {
        self.kinds.len()
    }

    fn item_view_type(&self, item: &T, position: usize) -> usize {
        self.kind_index(item, position)
    }
}

impl<T> fmt::Debug for MappedLayoutSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedLayoutSelector")
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

/// An inflated view tree awaiting its presentation object.
pub trait BindableView<V, P> {
    /// The root view handle returned to the host.
    fn root_view(&self) -> V;

    /// Wire the view's bindings to `presentation`.
    fn bind_to(&mut self, presentation: Arc<P>) -> Result<()>;
}

/// Inflates layouts into bindable views.
///
/// `C` is the host's parent container type.
pub trait LayoutBinder<V, C, P>: Send + Sync {
    /// Inflate `layout` for a row that will live under `parent`.
    fn inflate(&self, parent: &C, layout: LayoutId) -> Result<Box<dyn BindableView<V, P>>>;
}

static_assertions::assert_impl_all!(SingleLayoutSelector: Send, Sync);
static_assertions::assert_impl_all!(MappedLayoutSelector<String>: Send, Sync);
