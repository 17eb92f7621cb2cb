pub mod backend_client;
pub mod protocol;
pub mod storage;

pub use backend_client::HttpBackendClient;
pub use storage::MemoryStorage;
