use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::content::extract::{count_headings, paragraphs};

static CALL_TO_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(click|learn more|get started|sign up|download|try|discover)\b")
        .expect("cta regex")
});

pub const BASE_SCORE: u32 = 70;

/// One bonus that fired while scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoSignal {
    pub code: String,
    pub message: String,
    pub points: u32,
}

/// Heuristic score for a generated page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoAudit {
    pub score: u32, // 0-100
    pub signals: Vec<SeoSignal>,
}

/// Additive score. Starts at 70, adds a bonus per matched signal, capped
/// at 100. `word_count` is passed in so callers count words once.
pub fn compute_score(text: &str, word_count: usize) -> SeoAudit {
    let mut signals = Vec::new();
    let mut push = |code: &str, message: String, points: u32| {
        signals.push(SeoSignal {
            code: code.into(),
            message,
            points,
        });
    };

    // ── Headings ──
    let headings = count_headings(text);
    if headings >= 3 {
        push("headings", format!("{} headings structure the page", headings), 8);
    }
    if headings >= 5 {
        push("headings_rich", "Five or more headings".into(), 2);
    }

    // ── Length ──
    if word_count > 2000 {
        push("length_2000", format!("Long-form content ({} words)", word_count), 5);
    }
    if word_count > 2500 {
        push("length_2500", "Over 2,500 words".into(), 3);
    }
    if word_count > 3000 {
        push("length_3000", "Over 3,000 words".into(), 2);
    }

    // ── Paragraphs ──
    let paragraph_count = paragraphs(text).len();
    if paragraph_count >= 8 {
        push(
            "paragraphs",
            format!("{} substantial paragraphs", paragraph_count),
            5,
        );
    }
    if paragraph_count >= 12 {
        push("paragraphs_rich", "Twelve or more paragraphs".into(), 3);
    }

    let lower = text.to_lowercase();

    // ── FAQ ──
    if lower.contains("frequently asked") || lower.contains("faq") || lower.contains("questions") {
        push("faq", "Answers reader questions".into(), 5);
    }

    // ── Calls to action ──
    let ctas = CALL_TO_ACTION.find_iter(text).count();
    if ctas >= 3 {
        push("calls_to_action", format!("{} calls to action", ctas), 3);
    }

    // ── Social proof ──
    if lower.contains("testimonial")
        || lower.contains("review")
        || (text.contains('"') && text.contains('-'))
    {
        push("social_proof", "Includes testimonials or reviews".into(), 2);
    }

    let bonus: u32 = signals.iter().map(|s| s.points).sum();
    SeoAudit {
        score: (BASE_SCORE + bonus).min(100),
        signals,
    }
}
