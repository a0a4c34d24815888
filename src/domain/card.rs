// src/domain/card.rs
use crate::constants::{FALLBACK_IMAGE_BASE, FALLBACK_IMAGE_SIZE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashCard {
    pub number: u32,
    pub word: String,
    pub pronunciation: String,
    pub image: String,
    /// Derived after fetching, see [`fallback_image_url`]
    #[serde(default, skip_deserializing)]
    pub fallback_image: String,
}

impl FlashCard {
    /// Image the view should show: the primary one unless it is missing or failed.
    pub fn display_image(&self, primary_failed: bool) -> &str {
        if primary_failed || self.image.is_empty() {
            &self.fallback_image
        } else {
            &self.image
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDeck {
    pub code: String,
    pub name: String,
    pub region: String,
    pub cards: Vec<FlashCard>,
}

impl LanguageDeck {
    pub fn card(&self, number: u32) -> Option<&FlashCard> {
        self.cards.iter().find(|c| c.number == number)
    }

    /// Card numbers in deck order
    pub fn natural_order(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.number).collect()
    }
}

/// Placeholder image reference for a card, stable for a given code and number.
pub fn fallback_image_url(language_code: &str, number: u32) -> String {
    let (width, height) = FALLBACK_IMAGE_SIZE;
    format!(
        "{}/{}-{}/{}/{}",
        FALLBACK_IMAGE_BASE,
        language_code.to_lowercase(),
        number,
        width,
        height
    )
}
