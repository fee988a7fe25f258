use serde::Serialize;

/// What the user typed into the topic box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Keyword,
    Url,
    Prompt,
}

impl InputKind {
    /// Exact match; anything unrecognised is handled as a free prompt.
    pub fn parse(s: &str) -> (Self, bool) {
        match s {
            "keyword" => (Self::Keyword, true),
            "url" => (Self::Url, true),
            "prompt" => (Self::Prompt, true),
            _ => (Self::Prompt, false),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Url => "url",
            Self::Prompt => "prompt",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptOptions {
    pub word_count: u32,
    pub include_affiliate: bool,
    pub seo_optimized: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        PromptOptions {
            word_count: 1200,
            include_affiliate: true,
            seo_optimized: true,
        }
    }
}

/// Persona and style rules shared by every generation
pub fn system_prompt(niche: Option<&str>) -> String {
    let mut system = String::from(
        "You are a conversion-focused copywriter who writes high-converting landing pages \
         with clear structure. Write in a warm, first-person storytelling voice, address the \
         reader directly, and back every claim with a concrete example. Use Markdown: one H1 \
         title on the first line, H2/H3 section headings, short paragraphs and bullet lists.",
    );
    if let Some(n) = niche.map(str::trim).filter(|n| !n.is_empty()) {
        system.push_str(&format!(
            " Tailor every example, product mention and call to action to the {} niche.",
            n
        ));
    }
    system
}

/// Per-kind instruction block
fn source_instructions(topic: &str, kind: InputKind) -> String {
    match kind {
        InputKind::Keyword => format!(
            "Target keyword: \"{}\"\n\
             Build the page around this keyword. Use it in the title, the first paragraph \
             and at least two headings, and cover the questions people searching for it ask.",
            topic
        ),
        InputKind::Url => format!(
            "Reference URL: {}\n\
             Infer the product or topic this page is about from the URL and write an \
             original landing page for it. Do not copy text from the page; improve on its \
             angle and address the objections it leaves open.",
            topic
        ),
        InputKind::Prompt => format!(
            "Brief from the marketer:\n\"\"\"\n{}\n\"\"\"\n\
             Follow the brief closely while keeping the structure below.",
            topic
        ),
    }
}

/// User prompt: fixed template with the per-kind block spliced in
pub fn user_prompt(topic: &str, kind: InputKind, opts: &PromptOptions) -> String {
    let seo = if opts.seo_optimized {
        "- Optimise for search: keyword-rich headings, a FAQ section with frequently asked questions, \
         and a meta-style opening paragraph of 1-2 sentences."
    } else {
        "- Write plain copy without keyword stuffing."
    };
    let affiliate = if opts.include_affiliate {
        "- Where you recommend a product, tool, course or resource, insert the placeholder \
         [AFFILIATE_LINK: Product Name] right after the recommendation."
    } else {
        "- Do not mention affiliate products or include links."
    };

    format!(
        "Create a {words}-word landing page.\n\n\
         {source}\n\n\
         Structure:\n\
         1. A compelling H1 title\n\
         2. An opening paragraph that hooks the reader and states the promise\n\
         3. The problem most people face\n\
         4. A personal breakthrough story\n\
         5. A step-by-step strategy section (H2 with H3 steps)\n\
         6. Testimonials formatted as \"quote\" - Name\n\
         7. A frequently asked questions section\n\
         8. A closing call to action (get started, sign up, learn more)\n\n\
         Requirements:\n\
         {seo}\n\
         {affiliate}\n\
         - Aim for roughly {words} words.",
        words = opts.word_count,
        source = source_instructions(topic, kind),
        seo = seo,
        affiliate = affiliate,
    )
}

/// Build the (system, user) prompt pair for one generation
pub fn build(topic: &str, kind: InputKind, niche: Option<&str>, opts: &PromptOptions) -> (String, String) {
    (system_prompt(niche), user_prompt(topic, kind, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn niche_appends_one_sentence() {
        let base = system_prompt(None);
        let with = system_prompt(Some("Health & Fitness"));
        assert!(with.starts_with(&base));
        assert!(with.contains("Health & Fitness niche"));
        assert_eq!(system_prompt(Some("   ")), base);
    }

    #[test]
    fn unknown_kind_behaves_like_prompt() {
        assert_eq!(InputKind::parse("keyword"), (InputKind::Keyword, true));
        assert_eq!(InputKind::parse("Keyword"), (InputKind::Prompt, false));
        let opts = PromptOptions::default();
        let (kind, _) = InputKind::parse("video");
        assert_eq!(
            user_prompt("topic", kind, &opts),
            user_prompt("topic", InputKind::Prompt, &opts)
        );
    }

    #[test]
    fn each_kind_gets_its_own_block() {
        let opts = PromptOptions::default();
        let kw = user_prompt("keto recipes", InputKind::Keyword, &opts);
        let url = user_prompt("https://example.com", InputKind::Url, &opts);
        let free = user_prompt("sell my course", InputKind::Prompt, &opts);
        assert!(kw.contains("Target keyword: \"keto recipes\""));
        assert!(url.contains("Reference URL: https://example.com"));
        assert!(free.contains("sell my course"));
        assert!(kw.contains("1200-word"));
    }

    #[test]
    fn affiliate_flag_controls_placeholder_instruction() {
        let on = user_prompt("x", InputKind::Keyword, &PromptOptions::default());
        let off = user_prompt(
            "x",
            InputKind::Keyword,
            &PromptOptions {
                include_affiliate: false,
                ..PromptOptions::default()
            },
        );
        assert!(on.contains("[AFFILIATE_LINK"));
        assert!(!off.contains("[AFFILIATE_LINK"));
    }

    #[test]
    fn build_is_pure() {
        let opts = PromptOptions::default();
        let a = build("topic", InputKind::Url, Some("Travel"), &opts);
        let b = build("topic", InputKind::Url, Some("Travel"), &opts);
        assert_eq!(a, b);
    }
}
