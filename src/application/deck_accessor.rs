// src/application/deck_accessor.rs
use crate::application::fetch_client::{FetchClient, HttpTransport, Scheduler};
use crate::domain::{fallback_image_url, ErrorKind, FetchError, LanguageDeck};
use tracing::{debug, info};

/// Lowercased language code, or `UnknownError` when it cannot name a deck.
///
/// Codes are used verbatim as an endpoint path segment, so only ASCII
/// alphanumerics, `-` and `_` are accepted.
pub fn normalize_language_code(code: &str) -> Result<String, FetchError> {
    let trimmed = code.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(FetchError::new(
            ErrorKind::UnknownError,
            "Invalid language code provided",
        ));
    }
    Ok(trimmed.to_lowercase())
}

pub struct DeckAccessor<'a, T: HttpTransport, S: Scheduler> {
    client: &'a FetchClient<T, S>,
}

impl<'a, T: HttpTransport, S: Scheduler> DeckAccessor<'a, T, S> {
    pub fn new(client: &'a FetchClient<T, S>) -> Self {
        Self { client }
    }

    /// Fetch the deck for `language_code` and attach fallback images
    pub async fn fetch_deck(&self, language_code: &str) -> Result<LanguageDeck, FetchError> {
        let code = normalize_language_code(language_code)?;
        debug!(%code, "Fetching deck");

        let mut deck: LanguageDeck = self.client.fetch_resource(&code).await?;
        for card in &mut deck.cards {
            card.fallback_image = fallback_image_url(&code, card.number);
        }

        info!(%code, cards = deck.cards.len(), "Loaded deck");
        Ok(deck)
    }
}
