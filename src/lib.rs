pub mod base;
pub mod config;
pub mod filter;
pub mod node;
pub mod persistence;
pub mod storages;
pub mod store;

// Re-exports

pub mod prelude {
    pub use crate::config::{PersistConfig, PersistOptions};
    pub use crate::filter::FieldFilter;
    pub use crate::node::{ObservableNode, Snapshot, SnapshotListener, SubscriptionHandle};
    pub use crate::persistence::{PersistNodeExt, Persistence};
    pub use crate::storages::memory::MemoryStore;
    pub use crate::store::KeyValueStore;

    #[cfg(feature = "local-fs")]
    pub use crate::storages::local_fs::LocalFsStore;
}
