//! Signal/slot system for rowbind.
//!
//! Signals are emitted by models when their state changes, and connected
//! slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`]: a change notification with connected slots
//! - [`ConnectionId`]: handle for disconnecting one slot
//! - [`ConnectionType`]: direct or queued delivery
//!
//! # Connection Types
//!
//! - **Direct**: the slot runs inside `emit`, on the emitting thread
//! - **Queued**: Slot execution is posted through a [`DispatchHandle`] and
//!   runs when the owning thread drains its [`DispatchQueue`](crate::DispatchQueue)
//!
//! # Example
//!
//! ```
//! use rowbind_core::Signal;
//!
//! let item_changed = Signal::<Option<String>>::new();
//!
//! let conn_id = item_changed.connect(|item| {
//!     println!("row now shows {:?}", item);
//! });
//!
//! item_changed.emit(Some("a".to_string()));
//! item_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::dispatch::DispatchHandle;
use crate::logging::targets;

new_key_type! {
    /// Handle for one connection, passed to [`Signal::disconnect`].
    pub struct ConnectionId;
}

/// Specifies how a connected slot should be invoked when the signal is emitted.
#[derive(Clone, Debug, Default)]
pub enum ConnectionType {
    /// Invoke the slot immediately in the emitting thread.
    #[default]
    Direct,

    /// Post the slot invocation through the given dispatch handle.
    ///
    /// The slot runs on whichever thread drains the handle's queue.
    Queued(DispatchHandle),
}

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
    connection_type: ConnectionType,
}

/// A change notification with any number of connected slots.
///
/// `Args` is cloned once per queued slot; use `()` for bare notifications.
/// Slots run after the connection lock is released, so a slot may connect
/// to or disconnect from the signal that invoked it.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    blocked: AtomicBool,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// An unconnected signal.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect `slot` to run synchronously inside `emit`.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect_with_type(slot, ConnectionType::Direct)
    }

    /// Connect a slot whose invocations are posted through `dispatch`.
    ///
    /// # Example
    ///
    /// ```
    /// use rowbind_core::{DispatchQueue, Signal};
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let queue = DispatchQueue::new();
    /// let signal = Signal::<i32>::new();
    /// let total = Arc::new(AtomicI32::new(0));
    ///
    /// let total_clone = total.clone();
    /// signal.connect_queued(&queue.handle(), move |&n| {
    ///     total_clone.fetch_add(n, Ordering::SeqCst);
    /// });
    ///
    /// signal.emit(5);
    /// assert_eq!(total.load(Ordering::SeqCst), 0);
    /// queue.process_pending();
    /// assert_eq!(total.load(Ordering::SeqCst), 5);
    /// ```
    pub fn connect_queued<F>(&self, dispatch: &DispatchHandle, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect_with_type(slot, ConnectionType::Queued(dispatch.clone()))
    }

    /// Connect `slot` with an explicit delivery mode.
    pub fn connect_with_type<F>(&self, slot: F, connection_type: ConnectionType) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
            connection_type,
        };
        self.connections.lock().insert(connection)
    }

    /// Remove one connection. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Remove every connection.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Suppress (`true`) or resume (`false`) emission. Emits made while
    /// blocked are dropped, not deferred.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emission is suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Deliver `args` to every connected slot.
    ///
    /// If the signal is blocked, this does nothing. Direct slots run before
    /// this returns; queued slots are posted with a clone of `args`. A queued
    /// slot whose dispatch queue has been dropped is skipped with a warning.
    #[tracing::instrument(skip_all, target = "rowbind_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let snapshot: Vec<_> = {
            let connections = self.connections.lock();
            connections
                .values()
                .map(|conn| (conn.slot.clone(), conn.connection_type.clone()))
                .collect()
        };
        tracing::trace!(target: targets::SIGNAL, connection_count = snapshot.len(), "emitting signal");

        for (slot, connection_type) in snapshot {
            match connection_type {
                ConnectionType::Direct => slot(&args),
                ConnectionType::Queued(dispatch) => {
                    let queued_args = args.clone();
                    if dispatch.post(move || slot(&queued_args)).is_err() {
                        tracing::warn!(
                            target: targets::SIGNAL,
                            "dispatch queue closed, dropping queued slot invocation"
                        );
                    }
                }
            }
        }
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
