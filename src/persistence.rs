use std::sync::{Arc, Mutex};

use crate::{
    config::{PersistConfig, PersistOptions},
    debug, error,
    filter::filter_snapshot,
    node::{ObservableNode, Snapshot, SubscriptionHandle},
    store::KeyValueStore,
};

/// Persistence behavior composed onto an observable state node.
///
/// The attachment loads previously saved state into the node and, once
/// armed, transparently saves every subsequent snapshot to the store.
///
/// # Example
///
/// ```ignore
/// let settings = Settings::new();
/// let persistence = settings.persisted(MemoryStore::new(), PersistOptions::new());
///
/// persistence.load().await?;   // restore, then auto-save from here on
/// settings.set_volume(11);     // persisted transparently
/// ```
///
/// Overlapping `load`/`save` calls are permitted but race at the storage
/// write; callers needing strict ordering must serialize their own calls.
pub struct Persistence<N, S>
where
    N: ObservableNode,
    S: KeyValueStore,
{
    node: Arc<N>,
    store: Arc<S>,
    config: Arc<PersistConfig>,
    subscription: Mutex<Option<SubscriptionHandle>>,
}

/// Structural composition sugar: install persistence on any shared
/// observable node without naming the attachment type.
pub trait PersistNodeExt<N: ObservableNode> {
    fn persisted<S: KeyValueStore>(
        &self,
        store: impl Into<Arc<S>>,
        options: PersistOptions,
    ) -> Persistence<N, S>;
}

// Implementations

impl<N, S> Persistence<N, S>
where
    N: ObservableNode,
    S: KeyValueStore,
{
    /// Install the behavior on `node`, resolving `options` against the
    /// defaults. No storage access happens until [`load`](Self::load) or
    /// [`save`](Self::save) is called.
    pub fn attach(node: Arc<N>, store: impl Into<Arc<S>>, options: PersistOptions) -> Self {
        let config = options.resolve(node.node_name());

        Self {
            node,
            store: store.into(),
            config: Arc::new(config),
            subscription: Mutex::new(None),
        }
    }

    /// Resolved configuration of this attachment.
    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Load persisted state into the node.
    ///
    /// A missing key, a read failure, and a malformed stored payload all
    /// yield `Ok(None)`; only an `on_load` hook failure or a state
    /// application failure surfaces as an error. When auto-save is
    /// configured, every call (re)arms it, whether or not data was found.
    ///
    /// Safe to call repeatedly; each call runs the full pipeline again.
    pub async fn load(&self) -> anyhow::Result<Option<Snapshot>> {
        let loaded = self.read_snapshot().await;

        let data = match &self.config.on_load {
            Some(hook) => hook(loaded).await?,
            None => loaded,
        };

        if let Some(snapshot) = &data {
            self.node.apply_snapshot(snapshot.clone())?;
        }

        if self.config.auto_save {
            self.enable_auto_save();
        }

        Ok(data)
    }

    /// Persist the node's current state through the save pipeline.
    ///
    /// Always permitted, independent of auto-save; this is the escape
    /// hatch for callers who attached with `auto_save(false)`. A write
    /// failure propagates.
    pub async fn save(&self) -> anyhow::Result<()> {
        persist(&*self.store, &self.config, self.node.current_snapshot()).await
    }

    /// Arm auto-save: every snapshot the node emits from now on runs the
    /// save pipeline on the async runtime, off the notification path.
    ///
    /// Any previous registration is disposed first, so at most one is
    /// ever active. A failure inside the spawned pipeline is logged and
    /// otherwise dropped. Requires a tokio runtime context at the
    /// notification instant.
    pub fn enable_auto_save(&self) {
        let store = self.store.clone();
        let config = self.config.clone();

        let mut slot = self.subscription.lock().unwrap();

        if let Some(prev) = slot.take() {
            prev.dispose();
        }

        *slot = Some(self.node.on_snapshot(Box::new(move |snapshot| {
            let store = store.clone();
            let config = config.clone();

            // Completion order of rapid consecutive saves is not
            // guaranteed; last write wins at the store.
            tokio::spawn(async move {
                if let Err(_e) = persist(&*store, &config, snapshot).await {
                    error!("Auto-save under key {:?} failed: {_e}", config.key);
                }
            });
        })));
    }

    /// Stop auto-saving. No-op when auto-save is not armed.
    pub fn disable_auto_save(&self) {
        if let Some(prev) = self.subscription.lock().unwrap().take() {
            prev.dispose();
        }
    }

    /// Teardown hook for the host lifecycle; invoke when the node is
    /// removed from its owner. Idempotent.
    pub fn on_detach(&self) {
        self.disable_auto_save();
    }

    /// Read and deserialize the stored payload, normalizing every
    /// read-path failure to `None`.
    async fn read_snapshot(&self) -> Option<Snapshot> {
        let raw = match self.store.get(&self.config.key).await {
            Ok(raw) => raw,
            Err(_e) => {
                debug!("Read under key {:?} failed, treating as no data: {_e}", self.config.key);
                return None;
            }
        };

        match serde_json::from_str(raw.as_deref()?) {
            Ok(serde_json::Value::Object(snapshot)) => Some(snapshot),
            Ok(_) | Err(_) => {
                debug!("Stored payload under key {:?} is not a snapshot, ignoring", self.config.key);
                None
            }
        }
    }
}

impl<N: ObservableNode> PersistNodeExt<N> for Arc<N> {
    fn persisted<S: KeyValueStore>(
        &self,
        store: impl Into<Arc<S>>,
        options: PersistOptions,
    ) -> Persistence<N, S> {
        Persistence::attach(self.clone(), store, options)
    }
}

/// Shared save pipeline: filter, transform, serialize, write.
async fn persist<S: KeyValueStore>(
    store: &S,
    config: &PersistConfig,
    snapshot: Snapshot,
) -> anyhow::Result<()> {
    let filtered = filter_snapshot(snapshot, &config.filter);

    let outgoing = match &config.on_save {
        Some(hook) => hook(filtered).await?,
        None => filtered,
    };

    let payload = serde_json::to_string(&outgoing)?;

    store.set(&config.key, &payload).await
}
