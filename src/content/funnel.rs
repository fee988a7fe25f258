use serde::Serialize;

/// Presentational style for the generated page. Only tags the content;
/// the copy itself is not restructured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelTemplate {
    Minimalist,
    Story,
    Quiz,
    Review,
    Listicle,
    Comparison,
    Webinar,
}

impl FunnelTemplate {
    pub const ALL: [FunnelTemplate; 7] = [
        Self::Minimalist,
        Self::Story,
        Self::Quiz,
        Self::Review,
        Self::Listicle,
        Self::Comparison,
        Self::Webinar,
    ];

    /// Case-insensitive; unknown names fall back to minimalist
    pub fn parse(s: &str) -> Self {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .unwrap_or(Self::Minimalist)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Minimalist => "minimalist",
            Self::Story => "story",
            Self::Quiz => "quiz",
            Self::Review => "review",
            Self::Listicle => "listicle",
            Self::Comparison => "comparison",
            Self::Webinar => "webinar",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Minimalist => "Clean single-column page with one call to action",
            Self::Story => "Personal narrative leading into the offer",
            Self::Quiz => "Question-led page that segments the reader",
            Self::Review => "Hands-on product review with verdict",
            Self::Listicle => "Numbered list of tips or products",
            Self::Comparison => "Side-by-side comparison of options",
            Self::Webinar => "Registration page for a live or recorded session",
        }
    }

    fn marker(&self) -> String {
        format!("<!-- funnel-template: {} -->", self.name())
    }

    /// Prepend the template marker. Idempotent.
    pub fn apply(&self, content: &str) -> String {
        let marker = self.marker();
        if content.starts_with(&marker) {
            content.to_string()
        } else {
            format!("{}\n{}", marker, content)
        }
    }
}
