pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod permissions;
pub mod service;
pub mod storage;

pub use error::TimeflowError;
pub use permissions::Permissions;
pub use service::TimeflowService;
pub use storage::in_memory::InMemoryStorage;
pub use storage::json_file::JsonFileStorage;

#[cfg(test)]
mod tests; // Include integration tests
