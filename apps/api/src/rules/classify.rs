//! Keyword-based sentence classification: risks, obligations, rights.
//!
//! Precedence is Risk > Obligation > Right > Neutral. Risk severity comes
//! from hard-coded buckets; the highest bucket matched wins.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

pub const HIGH_RISK_KEYWORDS: &[&str] = &[
    "indemnify",
    "indemnification",
    "hold harmless",
    "unlimited liability",
    "liquidated damages",
    "waive",
    "waives",
    "without notice",
    "irrevocable",
    "personal guarantee",
    "automatically renew",
    "automatic renewal",
];

pub const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "penalty",
    "penalties",
    "terminate",
    "termination",
    "breach",
    "forfeit",
    "forfeiture",
    "default",
    "liable",
    "liability",
    "non-compete",
    "exclusive",
];

pub const LOW_RISK_KEYWORDS: &[&str] = &[
    "late fee",
    "late fees",
    "interest",
    "sole discretion",
    "non-refundable",
    "nonrefundable",
    "subject to change",
];

pub const OBLIGATION_KEYWORDS: &[&str] = &[
    "shall",
    "must",
    "agrees to",
    "agree to",
    "is required to",
    "are required to",
    "undertakes to",
    "is responsible for",
    "are responsible for",
    "obligated",
    "obliged",
];

pub const RIGHT_KEYWORDS: &[&str] = &[
    "may",
    "is entitled to",
    "are entitled to",
    "has the right",
    "have the right",
    "right to",
    "is permitted to",
    "are permitted to",
];

lazy_static! {
    static ref HIGH_RISK_RE: Regex = keyword_regex(HIGH_RISK_KEYWORDS);
    static ref MEDIUM_RISK_RE: Regex = keyword_regex(MEDIUM_RISK_KEYWORDS);
    static ref LOW_RISK_RE: Regex = keyword_regex(LOW_RISK_KEYWORDS);
    static ref OBLIGATION_RE: Regex = keyword_regex(OBLIGATION_KEYWORDS);
    static ref RIGHT_RE: Regex = keyword_regex(RIGHT_KEYWORDS);
}

/// One alternation per bucket, longest keywords first so phrases beat their prefixes.
fn keyword_regex(keywords: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = keywords.to_vec();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = sorted
        .iter()
        .map(|k| {
            k.split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("keyword pattern must compile")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceCategory {
    Risk,
    Obligation,
    Right,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: SentenceCategory,
    /// Set for `Risk` only.
    pub severity: Option<Severity>,
    /// Keywords (lowercased, whitespace-normalized) that decided the category.
    pub matched: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedSentence {
    pub index: usize,
    pub text: String,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Splits on Unicode sentence boundaries, trimming and dropping blanks.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn matched_keywords(re: &Regex, sentence: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in re.find_iter(sentence) {
        let normalized = m
            .as_str()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if !found.contains(&normalized) {
            found.push(normalized);
        }
    }
    found
}

pub fn classify_sentence(sentence: &str) -> Classification {
    let high = matched_keywords(&HIGH_RISK_RE, sentence);
    let medium = matched_keywords(&MEDIUM_RISK_RE, sentence);
    let low = matched_keywords(&LOW_RISK_RE, sentence);

    let severity = if !high.is_empty() {
        Some(Severity::High)
    } else if !medium.is_empty() {
        Some(Severity::Medium)
    } else if !low.is_empty() {
        Some(Severity::Low)
    } else {
        None
    };

    if severity.is_some() {
        let matched = high.into_iter().chain(medium).chain(low).collect();
        return Classification {
            category: SentenceCategory::Risk,
            severity,
            matched,
        };
    }

    let obligations = matched_keywords(&OBLIGATION_RE, sentence);
    if !obligations.is_empty() {
        return Classification {
            category: SentenceCategory::Obligation,
            severity: None,
            matched: obligations,
        };
    }

    let rights = matched_keywords(&RIGHT_RE, sentence);
    if !rights.is_empty() {
        return Classification {
            category: SentenceCategory::Right,
            severity: None,
            matched: rights,
        };
    }

    Classification {
        category: SentenceCategory::Neutral,
        severity: None,
        matched: Vec::new(),
    }
}

/// Classifies every sentence of `text`, in order.
pub fn classify_document(text: &str) -> Vec<ClassifiedSentence> {
    split_sentences(text)
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| ClassifiedSentence {
            index,
            text: sentence.to_string(),
            classification: classify_sentence(sentence),
        })
        .collect()
}
