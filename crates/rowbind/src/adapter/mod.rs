//! The data-set adapter and its collaborators.
//!
//! # Core Types
//!
//! - [`DataSetAdapter`]: bridges a value model to a host's recycling protocol
//! - [`ItemLayoutSelector`]: chooses item and dropdown layouts per row
//! - [`LayoutBinder`]: inflates a layout into a [`BindableView`]
//! - [`ViewTags`]: per-view storage for presentation objects
//! - [`ItemLayoutAttribute`]: the `@type/name` / `{property}` layout declaration
//!
//! # Recycling
//!
//! ```text
//! view_for(p, None)      ──> select layout ──> inflate ──> new presentation ──> tag ──> ItemRow
//! view_for(p, Some(row)) ──> tag lookup ──> update_data ──> (refresh if eager) ──> same ItemRow
//! ```

mod data_set_adapter;
mod item_layout;
mod layout;
mod view_tags;

pub use data_set_adapter::{AdapterSignals, DataSetAdapter, DataSetAdapterBuilder, ItemRow};
pub use item_layout::{
    ItemLayoutAttribute, ItemLayoutBinding, LayoutBindingContext, LayoutIdProperty,
    ResourceLookup, StaticLayoutReference,
};
pub use layout::{
    BindableView, DisplayMode, ItemLayoutSelector, LayoutBinder, LayoutId, LayoutKind,
    MappedLayoutSelector, SingleLayoutSelector,
};
pub use view_tags::{ViewSlot, ViewTag, ViewTags};
