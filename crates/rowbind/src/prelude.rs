//! Prelude module for rowbind.
//!
//! ```ignore
//! use rowbind::prelude::*;
//! ```
//!
//! This provides access to:
//! - The adapter and its builder (`DataSetAdapter`, `ItemRow`, `DisplayMode`)
//! - Layout selection and binding (`ItemLayoutSelector`, `LayoutBinder`, `BindableView`)
//! - Value models and presentation objects (`DataSetValueModel`, `ListValueModel`, `ItemPresentation`)
//! - The signal system and dispatch queue from `rowbind_core`

// ============================================================================
// Adapter
// ============================================================================

pub use crate::adapter::{
    AdapterSignals, DataSetAdapter, DataSetAdapterBuilder, DisplayMode, ItemRow, ViewSlot,
};
pub use crate::{AdapterConfig, AdapterError};

// ============================================================================
// Layouts
// ============================================================================

pub use crate::adapter::{
    BindableView, ItemLayoutAttribute, ItemLayoutSelector, LayoutBinder, LayoutId, LayoutKind,
    MappedLayoutSelector, SingleLayoutSelector,
};

// ============================================================================
// Models
// ============================================================================

pub use crate::model::{
    DataSetValueModel, ItemContext, ItemPresentation, ListValueModel,
    RefreshableItemPresentationModel,
};

// ============================================================================
// Signals and Dispatch
// ============================================================================

pub use rowbind_core::{DispatchHandle, DispatchQueue, Property, Signal};
