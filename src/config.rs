use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

use crate::filter::{FieldFilter, IntoFieldList};
use crate::node::Snapshot;

/// Rewrites loaded data before it is applied to the node. Receives `None`
/// when nothing usable was stored and may substitute a default.
pub type LoadHook =
    Box<dyn Fn(Option<Snapshot>) -> BoxFuture<'static, anyhow::Result<Option<Snapshot>>> + Send + Sync>;

/// Rewrites a filtered snapshot before it is written to storage.
pub type SaveHook = Box<dyn Fn(Snapshot) -> BoxFuture<'static, anyhow::Result<Snapshot>> + Send + Sync>;

/// Attachment options. Everything is optional; see the builder methods.
///
/// # Example
///
/// ```ignore
/// let options = PersistOptions::new()
///     .key("Jimmy")
///     .auto_save(false)
///     .only(["age"]);
/// ```
pub struct PersistOptions {
    key: Option<String>,
    auto_save: bool,
    only: Vec<String>,
    except: Vec<String>,
    on_load: Option<LoadHook>,
    on_save: Option<SaveHook>,
}

/// Resolved, immutable configuration for one attachment instance.
///
/// Built once from [`PersistOptions`] plus defaults at attach time.
pub struct PersistConfig {
    pub(crate) key: String,
    pub(crate) auto_save: bool,
    pub(crate) filter: FieldFilter,
    pub(crate) on_load: Option<LoadHook>,
    pub(crate) on_save: Option<SaveHook>,
}

// Implementations

impl PersistOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage key to persist under (default: the node's name).
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Monitor the node for changes and save each one (default: true).
    pub fn auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    /// Persist only the listed fields. Wins over [`except`](Self::except)
    /// when both are supplied.
    pub fn only(mut self, names: impl IntoFieldList) -> Self {
        self.only = names.into_field_list();
        self
    }

    /// Persist everything but the listed fields.
    pub fn except(mut self, names: impl IntoFieldList) -> Self {
        self.except = names.into_field_list();
        self
    }

    /// Transform loaded data before it is applied to the node.
    pub fn on_load<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Option<Snapshot>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<Snapshot>>> + Send + 'static,
    {
        self.on_load = Some(Box::new(move |loaded| Box::pin(hook(loaded))));
        self
    }

    /// Transform the filtered snapshot before it is written to storage.
    pub fn on_save<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Snapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Snapshot>> + Send + 'static,
    {
        self.on_save = Some(Box::new(move |snapshot| Box::pin(hook(snapshot))));
        self
    }

    pub(crate) fn resolve(self, default_key: &str) -> PersistConfig {
        PersistConfig {
            key: self.key.unwrap_or_else(|| default_key.to_string()),
            auto_save: self.auto_save,
            filter: FieldFilter::resolve(self.only, self.except),
            on_load: self.on_load,
            on_save: self.on_save,
        }
    }
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            key: None,
            auto_save: true,
            only: Vec::new(),
            except: Vec::new(),
            on_load: None,
            on_save: None,
        }
    }
}

impl PersistConfig {
    /// Storage key this attachment reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether snapshot changes are saved automatically once armed.
    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// Field filter applied on every save.
    pub fn filter(&self) -> &FieldFilter {
        &self.filter
    }
}

impl fmt::Debug for PersistOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistOptions")
            .field("key", &self.key)
            .field("auto_save", &self.auto_save)
            .field("only", &self.only)
            .field("except", &self.except)
            .field("on_load", &self.on_load.as_ref().map(|_| ".."))
            .field("on_save", &self.on_save.as_ref().map(|_| ".."))
            .finish()
    }
}

impl fmt::Debug for PersistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistConfig")
            .field("key", &self.key)
            .field("auto_save", &self.auto_save)
            .field("filter", &self.filter)
            .field("on_load", &self.on_load.as_ref().map(|_| ".."))
            .field("on_save", &self.on_save.as_ref().map(|_| ".."))
            .finish()
    }
}
