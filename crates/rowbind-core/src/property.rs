//! Property system for rowbind.
//!
//! Properties are the data backbone of presentation objects: a binding reads
//! the current value, and a paired signal tells it when to read again.
//!
//! # Property Types
//!
//! - **Property<T>**: A value cell with change detection
//! - **ObservableProperty<T>**: A property that emits its own change signal
//!
//! # Example
//!
//! ```
//! use rowbind_core::ObservableProperty;
//!
//! let layout = ObservableProperty::new(1);
//! layout.changed().connect(|id| println!("row layout is now {id}"));
//!
//! assert!(layout.set(2));
//! assert!(!layout.set(2));
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::signal::Signal;

/// A value cell with change detection.
///
/// `set` stores only values that differ from the current one and reports
/// whether it did; announcing the change is up to the owner. Backed by a
/// `parking_lot::RwLock`, so it is `Send + Sync` whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Wrap `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Run `f` against the current value under the read lock.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let value = self.value.read();
        f(&value)
    }

    /// Overwrite the value unconditionally.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value` if it differs from the current one.
    ///
    /// Returns whether anything was stored.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        let changed = *current != value;
        if changed {
            *current = value;
        }
        changed
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("Property").field(value).finish())
    }
}

/// A property paired with the signal that announces its changes.
///
/// `set` emits `changed` only when the value differs; `notify` re-emits the
/// current value unconditionally, which is how a presentation object forces
/// every binding to re-read.
pub struct ObservableProperty<T> {
    value: Property<T>,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq + Send + 'static> ObservableProperty<T> {
    /// Create a property with an initial value and no listeners.
    pub fn new(value: T) -> Self {
        Self {
            value: Property::new(value),
            changed: Signal::new(),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.value.with(f)
    }

    /// Set the value, emitting `changed` if it differs from the current one.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        if self.value.set(value.clone()) {
            self.changed.emit(value);
            true
        } else {
            false
        }
    }

    /// Emit `changed` with the current value even if nothing changed.
    pub fn notify(&self) {
        self.changed.emit(self.value.get());
    }

    /// The change signal.
    pub fn changed(&self) -> &Signal<T> {
        &self.changed
    }
}

impl<T: Clone + PartialEq + Send + Default + 'static> Default for ObservableProperty<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &self.value.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(Property<String>: Send, Sync);
static_assertions::assert_impl_all!(ObservableProperty<i32>: Send, Sync);
