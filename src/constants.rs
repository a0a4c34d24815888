// src/constants.rs
//
// Application-wide constants. Each constant is documented with its purpose and
// usage context.

/// Key under which the whole progress table is stored.
///
/// Used in: `application/progress_store.rs`
pub const PROGRESS_STORAGE_KEY: &str = "flashcard-progress";

/// Endpoint of the language index, relative to the base URL.
///
/// Used in: `application/category_accessor.rs`
pub const CATEGORIES_ENDPOINT: &str = "categories";

/// Seeded placeholder image service used for fallback card images.
///
/// Used in: `domain/card.rs`
pub const FALLBACK_IMAGE_BASE: &str = "https://picsum.photos/seed";

/// Width and height requested for fallback images (portrait card ratio).
///
/// Used in: `domain/card.rs`
pub const FALLBACK_IMAGE_SIZE: (u32, u32) = (300, 400);

/// Default request deadline in milliseconds.
///
/// Used in: `config.rs`
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of fetch attempts, including the first one.
///
/// Used in: `config.rs`
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Base backoff in milliseconds. Attempt `i` waits `DEFAULT_RETRY_DELAY_MS * 2^i`.
///
/// Used in: `config.rs`
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Application directory name under the platform's local data dir.
///
/// Used in: `infrastructure/file_store.rs`
pub const APP_DIR_NAME: &str = "flashdeck";
