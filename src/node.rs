use anyhow::anyhow;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Point-in-time, serializable mapping of a node's field values.
///
/// Produced on demand from the live node; no component retains one beyond
/// the load or save operation that produced it.
pub type Snapshot = Map<String, Value>;

/// Callback invoked with every snapshot the node emits.
pub type SnapshotListener = Box<dyn Fn(Snapshot) + Send + Sync>;

/// Seam to the host state library that owns the observable node.
///
/// The persistence behavior is composed onto anything implementing this
/// trait; it never looks inside the node beyond these four operations.
///
/// # Example
///
/// ```ignore
/// struct Settings {
///     state: Mutex<SettingsState>,
///     listeners: Arc<Mutex<Vec<(u64, SnapshotListener)>>>,
///     next_listener_id: AtomicU64,
/// }
///
/// impl ObservableNode for Settings {
///     fn current_snapshot(&self) -> Snapshot {
///         snapshot_of(&*self.state.lock().unwrap()).unwrap()
///     }
///
///     fn apply_snapshot(&self, snapshot: Snapshot) -> anyhow::Result<()> {
///         *self.state.lock().unwrap() = state_from_snapshot(snapshot)?;
///         Ok(())
///     }
///
///     fn on_snapshot(&self, listener: SnapshotListener) -> SubscriptionHandle {
///         // register, return a handle that unregisters
///     }
/// }
/// ```
pub trait ObservableNode: Send + Sync + 'static {
    /// Name of the node type, used as the default storage key.
    ///
    /// Defaults to the trailing segment of the implementing type's name.
    fn node_name(&self) -> &str
    where
        Self: Sized,
    {
        short_type_name::<Self>()
    }

    /// The node's current state as a snapshot.
    fn current_snapshot(&self) -> Snapshot;

    /// Replace the node's state with the given snapshot.
    fn apply_snapshot(&self, snapshot: Snapshot) -> anyhow::Result<()>;

    /// Register a listener for every future snapshot the node emits.
    ///
    /// The registration lives until the returned handle is disposed.
    fn on_snapshot(&self, listener: SnapshotListener) -> SubscriptionHandle;
}

/// Opaque, disposable registration produced by [`ObservableNode::on_snapshot`].
///
/// Disposing (or dropping) the handle unregisters the listener.
pub struct SubscriptionHandle(Option<Box<dyn FnOnce() + Send>>);

/// Snapshot of any serializable state. Fails when the state does not
/// serialize to a mapping.
pub fn snapshot_of<T: Serialize>(state: &T) -> anyhow::Result<Snapshot> {
    match serde_json::to_value(state)? {
        Value::Object(snapshot) => Ok(snapshot),
        other => Err(anyhow!("expected state to serialize to a mapping, got {other}")),
    }
}

/// Rebuild typed state from a snapshot.
pub fn state_from_snapshot<T: DeserializeOwned>(snapshot: Snapshot) -> anyhow::Result<T> {
    Ok(serde_json::from_value(Value::Object(snapshot))?)
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// Implementations

impl SubscriptionHandle {
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(dispose)))
    }

    /// Unregister the listener now. Equivalent to dropping the handle.
    pub fn dispose(mut self) {
        if let Some(dispose) = self.0.take() {
            dispose();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(dispose) = self.0.take() {
            dispose();
        }
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SubscriptionHandle")
            .field(&self.0.as_ref().map(|_| "active"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn test_subscription_handle_disposes_once() {
        let disposed = Arc::new(AtomicUsize::new(0));

        let handle = SubscriptionHandle::new({
            let disposed = disposed.clone();
            move || {
                disposed.fetch_add(1, Ordering::SeqCst);
            }
        });

        handle.dispose();
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_handle_disposes_on_drop() {
        let disposed = Arc::new(AtomicUsize::new(0));

        {
            let _handle = SubscriptionHandle::new({
                let disposed = disposed.clone();
                move || {
                    disposed.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_short_type_name_strips_path_and_generics() {
        struct Plain;
        struct Wrapped<T>(T);

        assert_eq!(short_type_name::<Plain>(), "Plain");
        assert_eq!(short_type_name::<Wrapped<Plain>>(), "Wrapped");
    }
}
