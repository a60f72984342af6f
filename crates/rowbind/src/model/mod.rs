//! Value models and presentation objects.
//!
//! # Core Types
//!
//! - [`DataSetValueModel`]: read-only view over the backing collection
//! - [`ZeroSizeUntilChanged`]: decorator that hides the data set until the
//!   first change notification
//! - [`RefreshableItemPresentationModel`]: per-row object the adapter repoints
//!   on every recycle
//!
//! # Data Flow
//!
//! ```text
//! ┌────────────┐   size/item   ┌─────────────┐  update_data  ┌──────────────┐
//! │ Backing    │──────────────>│ Value model │──────────────>│ Presentation │──> bound view
//! │ collection │               │  (changed)  │               │    object    │
//! └────────────┘               └─────────────┘               └──────────────┘
//! ```

mod presentation;
mod value_model;

pub use presentation::{ItemContext, ItemPresentation, RefreshableItemPresentationModel};
pub use value_model::{
    ChangeLatch, DataSetValueModel, ListValueModel, PresentationFactory, SharedValueModel,
    ZeroSizeUntilChanged,
};
