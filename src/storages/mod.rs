#[cfg(feature = "local-fs")]
pub mod local_fs;
pub mod memory;
