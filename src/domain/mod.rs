// src/domain/mod.rs
pub mod card;
pub mod category;
pub mod error;
pub mod progress;

pub use card::{fallback_image_url, FlashCard, LanguageDeck};
pub use category::{CategoryIndex, LanguageEntry, LanguageSummary, Region};
pub use error::{ErrorKind, FetchError, StoreError};
pub use progress::{ProgressRecord, ProgressTable};
