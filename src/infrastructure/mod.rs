// src/infrastructure/mod.rs
pub mod file_store;
pub mod http;
pub mod scheduler;

pub use file_store::FileStore;
pub use http::ReqwestTransport;
pub use scheduler::TokioScheduler;
