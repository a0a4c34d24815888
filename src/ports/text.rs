// src/ports/text.rs
use crate::application::StudySession;
use crate::domain::{CategoryIndex, FetchError, LanguageDeck, ProgressTable};
use std::fmt::Write;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Plain-text views for the terminal front end.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Languages grouped by region; languages with saved progress are marked
    pub fn render_languages(&self, index: &CategoryIndex, progress: &ProgressTable) -> String {
        let mut out = String::new();
        for region in &index.regions {
            let _ = writeln!(out, "{}", region.name);
            for lang in &region.languages {
                // Progress is keyed by the normalized code
                let marker = match progress.get(&lang.code.to_lowercase()) {
                    Some(record) => format!("  (card {})", record.current_index.saturating_add(1)),
                    None => String::new(),
                };
                let _ = writeln!(out, "  {} {:<6} {}{}", lang.flag, lang.code, lang.name, marker);
            }
        }
        out
    }

    pub fn render_deck(&self, deck: &LanguageDeck) -> String {
        let mut out = format!("{} ({}, {})\n", deck.name, deck.code, deck.region);
        for card in &deck.cards {
            let _ = writeln!(
                out,
                "{:>3}  {:<20} {}",
                card.number, card.word, card.pronunciation
            );
        }
        out
    }

    /// Current card with both faces and the progress bar
    pub fn render_session(&self, language_name: &str, session: &StudySession) -> String {
        let Some(card) = session.current_card() else {
            return format!("{}\nNo flashcards available\n", language_name);
        };

        let filled = (session.progress_fraction() * PROGRESS_BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(PROGRESS_BAR_WIDTH.saturating_sub(filled))
        );

        let mut out = String::new();
        let _ = writeln!(out, "{}", language_name);
        let _ = writeln!(out, "  {}", card.number);
        let _ = writeln!(out, "  {} ({})", card.word, card.pronunciation);
        let _ = writeln!(out, "  image: {}", card.display_image(false));
        let _ = writeln!(out, "  fallback: {}", card.fallback_image);
        let _ = writeln!(out, "Card {} of {} {}", session.position(), session.len(), bar);
        out
    }

    pub fn render_progress_table(&self, progress: &ProgressTable) -> String {
        if progress.is_empty() {
            return "No saved progress\n".to_string();
        }
        let mut out = String::new();
        for (code, record) in progress {
            let _ = writeln!(
                out,
                "{:<6} card {:>3} of {:<3} last visited {}",
                code,
                record.current_index.saturating_add(1),
                record.card_order.len(),
                record.last_visited.to_rfc3339()
            );
        }
        out
    }

    /// Message for a failed fetch, with a retry hint when retrying can help
    pub fn render_fetch_error(&self, err: &FetchError) -> String {
        if err.is_retryable() {
            format!("{} [{}] - try again", err.message, err.kind)
        } else {
            format!("{} [{}]", err.message, err.kind)
        }
    }
}
