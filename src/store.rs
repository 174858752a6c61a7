use std::future::Future;

/// Asynchronous key-value storage collaborator.
///
/// The load path treats a failed read as missing data; a failed write
/// propagates out of the save path.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Fetch the payload stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;

    /// Store `value` under `key`, replacing any previous payload.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
}
