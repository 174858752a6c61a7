use std::path::PathBuf;

use anyhow::anyhow;
use directories::ProjectDirs;

use crate::store::KeyValueStore;

/// File-per-key store rooted at a directory on the local filesystem.
///
/// Keys map directly to file names under the root, so they should be
/// plain names without path separators.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    root: PathBuf,
}

// Implementations

impl LocalFsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform data directory for the given project.
    pub fn for_project(
        qualifier: &str,
        organization: &str,
        application: &str,
    ) -> anyhow::Result<Self> {
        let dirs = ProjectDirs::from(qualifier, organization, application)
            .ok_or_else(|| anyhow!("Failed to get project directories on this OS"))?;

        Ok(Self::new(dirs.data_dir()))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for LocalFsStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(key);

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(tokio::fs::read_to_string(&path).await?))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if !self.root.exists() {
            tokio::fs::create_dir_all(&self.root).await?;
        }

        Ok(tokio::fs::write(&self.path(key), value).await?)
    }
}
