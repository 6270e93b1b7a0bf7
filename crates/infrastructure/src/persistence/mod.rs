//! Local persistence

mod file_cache;

pub use file_cache::FileCache;
