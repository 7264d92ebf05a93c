pub mod file;
pub mod repo;

pub use file::JsonFileStorage;
pub use repo::{LocalStorage, MemoryStorage};
