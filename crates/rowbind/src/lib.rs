//! rowbind - a recyclable data-set adapter with deferred population.
//!
//! The adapter sits between an ordered backing collection and a host widget
//! that recycles row views. Every constructed row gets its own presentation
//! object; when the host recycles the row for another position, that object
//! is repointed at the new item instead of rebuilding the view.
//!
//! # Example
//!
//! ```
//! use rowbind::prelude::*;
//! use std::sync::Arc;
//!
//! type Row = ItemPresentation<String, LayoutId>;
//!
//! struct Label(LayoutId);
//!
//! impl BindableView<LayoutId, Row> for Label {
//!     fn root_view(&self) -> LayoutId {
//!         self.0
//!     }
//!
//!     fn bind_to(&mut self, _presentation: Arc<Row>) -> rowbind::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! struct Labels;
//!
//! impl LayoutBinder<LayoutId, (), Row> for Labels {
//!     fn inflate(&self, _parent: &(), layout: LayoutId) -> rowbind::Result<Box<dyn BindableView<LayoutId, Row>>> {
//!         Ok(Box::new(Label(layout)))
//!     }
//! }
//!
//! let queue = DispatchQueue::new();
//! let model = Arc::new(ListValueModel::new(
//!     vec!["a".to_string(), "b".to_string()],
//!     |kind| Arc::new(Row::new(kind)),
//! ));
//!
//! let mut adapter: DataSetAdapter<String, Row, LayoutId, ()> = DataSetAdapter::builder()
//!     .value_model(model.clone())
//!     .layout_selector(Arc::new(SingleLayoutSelector::new(1)))
//!     .item_binder(Arc::new(Labels))
//!     .build()?;
//! adapter.observe_changes(&queue.handle());
//!
//! // Nothing is shown until the data set reports a change.
//! assert_eq!(adapter.count(), 0);
//! model.notify_changed();
//! queue.process_pending();
//! assert_eq!(adapter.count(), 2);
//!
//! let row = adapter.view(0, None, &())?;
//! let recycled = adapter.view(1, Some(&row), &())?;
//! assert_eq!(recycled, row);
//! # Ok::<(), rowbind::AdapterError>(())
//! ```

pub mod adapter;
mod config;
mod error;
pub mod model;
pub mod prelude;

pub use adapter::{
    AdapterSignals, DataSetAdapter, DataSetAdapterBuilder, DisplayMode, ItemRow, LayoutId,
    ViewSlot,
};
pub use config::AdapterConfig;
pub use error::{AdapterError, Result};
