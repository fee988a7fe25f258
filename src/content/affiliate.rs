use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

use crate::seo::html_escape;

// ── Opportunity Count ─────────────────────────────────

static OPPORTUNITY_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // action verbs
        Regex::new(r"(?i)\b(recommend|try|buy|purchase|check out|invest in)\b"),
        // engagement phrases
        Regex::new(r"(?i)\b(click here|learn more|find out more|get access|sign up)\b"),
        // product types
        Regex::new(r"(?i)\b(tools?|platforms?|software|apps?|services?|products?)\b"),
        // resources
        Regex::new(r"(?i)\b(courses?|ebooks?|guides?|training|programs?|templates?)\b"),
    ]
    .map(|r| r.expect("opportunity regex"))
});

pub const MIN_OPPORTUNITIES: usize = 2;
pub const MAX_OPPORTUNITIES: usize = 8;

/// Places in the copy where an affiliate link would fit, clamped to [2, 8]
pub fn count_opportunities(text: &str) -> usize {
    OPPORTUNITY_PATTERNS
        .iter()
        .map(|re| re.find_iter(text).count())
        .sum::<usize>()
        .clamp(MIN_OPPORTUNITIES, MAX_OPPORTUNITIES)
}

// ── Network Configuration ─────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickBankConfig {
    pub enabled: bool,
    /// Affiliate nickname used in the hoplink
    pub affiliate_id: String,
    pub vendor: String,
    pub tid: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarriorPlusConfig {
    pub enabled: bool,
    pub affiliate_id: String,
    pub offer_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JvZooConfig {
    pub enabled: bool,
    pub affiliate_id: String,
    pub product_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AmazonConfig {
    pub enabled: bool,
    pub tag: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShareASaleConfig {
    pub enabled: bool,
    pub affiliate_id: String,
    pub merchant_id: String,
    pub banner_id: String,
}

/// Per-network settings supplied by the caller with each generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AffiliateNetworkConfig {
    pub clickbank: ClickBankConfig,
    pub warriorplus: WarriorPlusConfig,
    pub jvzoo: JvZooConfig,
    pub amazon: AmazonConfig,
    pub shareasale: ShareASaleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Network {
    ClickBank,
    WarriorPlus,
    JvZoo,
    Amazon,
    ShareASale,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClickBank => "ClickBank",
            Self::WarriorPlus => "WarriorPlus",
            Self::JvZoo => "JVZoo",
            Self::Amazon => "Amazon Associates",
            Self::ShareASale => "ShareASale",
        }
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let v = value.trim();
    if v.is_empty() {
        fallback
    } else {
        v
    }
}

impl AffiliateNetworkConfig {
    /// Enabled networks in fixed priority order
    pub fn enabled(&self) -> Vec<Network> {
        let mut out = Vec::new();
        if self.clickbank.enabled {
            out.push(Network::ClickBank);
        }
        if self.warriorplus.enabled {
            out.push(Network::WarriorPlus);
        }
        if self.jvzoo.enabled {
            out.push(Network::JvZoo);
        }
        if self.amazon.enabled {
            out.push(Network::Amazon);
        }
        if self.shareasale.enabled {
            out.push(Network::ShareASale);
        }
        out
    }

    /// Outbound URL for `network`. `keyword` feeds networks that link to a
    /// search page (Amazon).
    pub fn link_for(&self, network: Network, keyword: &str) -> String {
        match network {
            Network::ClickBank => {
                let c = &self.clickbank;
                let base = format!(
                    "https://{}.{}.hop.clickbank.net/",
                    or_default(&c.affiliate_id, "AFF").to_lowercase(),
                    or_default(&c.vendor, "VENDOR").to_lowercase()
                );
                match c.tid.trim() {
                    "" => base,
                    tid => with_query(&base, &[("tid", tid)]),
                }
            }
            Network::WarriorPlus => {
                let c = &self.warriorplus;
                format!(
                    "https://warriorplus.com/o2/a/{}/{}",
                    or_default(&c.offer_code, "OFFER"),
                    or_default(&c.affiliate_id, "AFF")
                )
            }
            Network::JvZoo => {
                let c = &self.jvzoo;
                format!(
                    "https://www.jvzoo.com/c/{}/{}",
                    or_default(&c.affiliate_id, "AFF"),
                    or_default(&c.product_id, "PRODUCT")
                )
            }
            Network::Amazon => with_query(
                "https://www.amazon.com/s",
                &[
                    ("k", or_default(keyword, "bestsellers")),
                    ("tag", or_default(&self.amazon.tag, "yourtag-20")),
                ],
            ),
            Network::ShareASale => {
                let c = &self.shareasale;
                with_query(
                    "https://www.shareasale.com/r.cfm",
                    &[
                        ("b", or_default(&c.banner_id, "BANNER")),
                        ("u", or_default(&c.affiliate_id, "AFF")),
                        ("m", or_default(&c.merchant_id, "MERCHANT")),
                    ],
                )
            }
        }
    }
}

fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(u) => u.to_string(),
        Err(_) => base.to_string(),
    }
}

// ── Placeholder Substitution ──────────────────────────

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[AFFILIATE_LINK[^\]:]*(?::\s*([^\]]*))?\]").expect("placeholder regex")
});

const DEFAULT_LABEL: &str = "Check it out here";

/// Result of replacing placeholders in one generation
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub text: String,
    pub network: Option<Network>,
    pub replaced: usize,
}

/// Replace every `[AFFILIATE_LINK...]` placeholder with an anchor to the
/// first enabled network. All placeholders in one text share that
/// network's URL. With nothing enabled the text is returned untouched.
pub fn substitute_links(text: &str, config: &AffiliateNetworkConfig, keyword: &str) -> Substitution {
    let Some(network) = config.enabled().into_iter().next() else {
        return Substitution {
            text: text.to_string(),
            network: None,
            replaced: 0,
        };
    };

    let href = html_escape(&config.link_for(network, keyword));
    let mut replaced = 0;
    let out = PLACEHOLDER.replace_all(text, |caps: &Captures| {
        replaced += 1;
        let label = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LABEL);
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"nofollow sponsored noopener\">{}</a>",
            href,
            html_escape(label)
        )
    });

    Substitution {
        text: out.into_owned(),
        network: Some(network),
        replaced,
    }
}
