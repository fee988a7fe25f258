use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const BUILTIN: &str = include_str!("prompts.toml");

static LIBRARY: LazyLock<PromptLibrary> = LazyLock::new(|| {
    PromptLibrary::parse(BUILTIN).unwrap_or_else(|e| {
        log::error!("Built-in prompt library is invalid: {}", e);
        PromptLibrary::default()
    })
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPrompt {
    pub id: u32,
    pub title: String,
    pub prompt: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    category: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    prompt: Vec<LibraryPrompt>,
}

/// Ready-made prompts grouped by category, in file order
#[derive(Debug, Default)]
pub struct PromptLibrary {
    categories: Vec<(String, Vec<LibraryPrompt>)>,
}

impl PromptLibrary {
    pub fn builtin() -> &'static PromptLibrary {
        &LIBRARY
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let file: LibraryFile = toml::from_str(raw).map_err(|e| e.to_string())?;
        let categories = file
            .category
            .into_iter()
            .map(|c| {
                let prompts = c
                    .prompt
                    .into_iter()
                    .map(|p| LibraryPrompt {
                        category: c.name.clone(),
                        ..p
                    })
                    .collect();
                (c.name, prompts)
            })
            .collect();
        Ok(PromptLibrary { categories })
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn by_category(&self, category: &str) -> &[LibraryPrompt] {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, prompts)| prompts.as_slice())
            .unwrap_or(&[])
    }

    /// Case-insensitive substring match on title or prompt text,
    /// optionally limited to one category. An empty term matches all.
    pub fn search(&self, term: &str, category: Option<&str>) -> Vec<LibraryPrompt> {
        let needle = term.trim().to_lowercase();
        self.categories
            .iter()
            .filter(|(name, _)| category.map_or(true, |c| c == name))
            .flat_map(|(_, prompts)| prompts.iter())
            .filter(|p| {
                needle.is_empty()
                    || p.title.to_lowercase().contains(&needle)
                    || p.prompt.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Pick a category at random, then a prompt within it
    pub fn random<R: Rng + ?Sized>(&self, category: Option<&str>, rng: &mut R) -> Option<LibraryPrompt> {
        let prompts = match category {
            Some(c) => self.by_category(c),
            None => {
                let non_empty: Vec<_> = self
                    .categories
                    .iter()
                    .filter(|(_, p)| !p.is_empty())
                    .collect();
                non_empty.choose(rng).copied().map(|(_, p)| p.as_slice())?
            }
        };
        prompts.choose(rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"
[[category]]
name = "Email"
[[category.prompt]]
id = 1
title = "Welcome Sequence"
prompt = "Write a welcome email."

[[category]]
name = "SEO"
[[category.prompt]]
id = 2
title = "Cluster Plan"
prompt = "Group keywords for the WELCOME page."
[[category.prompt]]
id = 3
title = "FAQ"
prompt = "Write questions."

[[category]]
name = "Empty"
"#;

    #[test]
    fn builtin_library_loads() {
        let lib = PromptLibrary::builtin();
        assert!(lib.categories().len() >= 5);
        assert!(lib.search("", None).len() >= 20);
        assert!(lib.search("", None).iter().all(|p| !p.category.is_empty()));
    }

    #[test]
    fn categories_keep_file_order() {
        let lib = PromptLibrary::parse(SAMPLE).unwrap();
        assert_eq!(lib.categories(), vec!["Email", "SEO", "Empty"]);
        assert_eq!(lib.by_category("SEO").len(), 2);
        assert!(lib.by_category("missing").is_empty());
    }

    #[test]
    fn search_matches_title_or_body_case_insensitively() {
        let lib = PromptLibrary::parse(SAMPLE).unwrap();
        let hits: Vec<u32> = lib.search("welcome", None).iter().map(|p| p.id).collect();
        assert_eq!(hits, vec![1, 2]);
        let seo_only: Vec<u32> = lib.search("welcome", Some("SEO")).iter().map(|p| p.id).collect();
        assert_eq!(seo_only, vec![2]);
        assert_eq!(lib.search("  ", Some("SEO")).len(), 2);
        assert_eq!(lib.search("welcome", None)[0].category, "Email");
    }

    #[test]
    fn random_respects_category_and_skips_empty() {
        let lib = PromptLibrary::parse(SAMPLE).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(lib.random(None, &mut rng).is_some());
            let p = lib.random(Some("SEO"), &mut rng).unwrap();
            assert_eq!(p.category, "SEO");
        }
        assert!(lib.random(Some("Empty"), &mut rng).is_none());
        assert!(lib.random(Some("nope"), &mut rng).is_none());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(PromptLibrary::parse("[[category]]\nname = 5").is_err());
    }
}
