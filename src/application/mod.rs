// src/application/mod.rs
pub mod category_accessor;
pub mod deck_accessor;
pub mod fetch_client;
pub mod progress_store;
pub mod study_session;

pub use category_accessor::CategoryAccessor;
pub use deck_accessor::{normalize_language_code, DeckAccessor};
pub use fetch_client::{FetchClient, HttpTransport, RawResponse, Scheduler, TransportError};
pub use progress_store::{KeyValueStore, ProgressStore};
pub use study_session::StudySession;
