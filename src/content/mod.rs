pub mod affiliate;
pub mod demo;
pub mod export;
pub mod extract;
pub mod funnel;

use serde::Serialize;

use crate::seo::{self, SeoSignal};

/// Derived view of one generated draft. Built once by [`process`] and not
/// changed afterwards apart from the content-level decorations the
/// pipeline applies (links, template marker).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedContent {
    pub title: String,
    pub description: String,
    /// The provider's text
    pub content: String,
    pub word_count: usize,
    pub seo_score: u32,
    pub suggested_images: usize,
    pub affiliate_opportunities: usize,
    pub seo_signals: Vec<SeoSignal>,
}

/// At least four images, one more per 500 words beyond that
pub fn suggested_images(word_count: usize) -> usize {
    (word_count / 500).max(4)
}

/// Pure post-processing of a provider draft. Same input, same output.
pub fn process(raw_text: &str, topic: &str) -> ProcessedContent {
    let word_count = extract::count_words(raw_text);
    let audit = seo::compute_score(raw_text, word_count);

    ProcessedContent {
        title: extract::extract_title(raw_text, topic),
        description: extract::extract_description(raw_text, topic),
        content: raw_text.to_string(),
        word_count,
        seo_score: audit.score,
        suggested_images: suggested_images(word_count),
        affiliate_opportunities: affiliate::count_opportunities(raw_text),
        seo_signals: audit.signals,
    }
}
