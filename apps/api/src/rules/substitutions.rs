//! Legalese → plain English pattern substitution.
//!
//! An ordered table of case-insensitive regexes. Rules run in table order
//! over the running text, so longer phrases are listed before any rule that
//! would match part of them.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

/// (pattern, replacement). Patterns are compiled case-insensitive.
pub const SUBSTITUTION_RULES: &[(&str, &str)] = &[
    (r"\bhereinafter\s+referred\s+to\s+as\b", "called"),
    (r"\bhereinafter\b", "from now on"),
    (r"\bheretofore\b", "until now"),
    (r"\bherein\b", "in this document"),
    (r"\bthereof\b", "of it"),
    (r"\bwhereas\b", "since"),
    (r"\bin\s+the\s+event\s+that\b", "if"),
    (r"\bin\s+the\s+event\s+of\b", "if there is"),
    (r"\bpursuant\s+to\b", "under"),
    (r"\bnotwithstanding\b", "despite"),
    (r"\bprior\s+to\b", "before"),
    (r"\bsubsequent\s+to\b", "after"),
    (r"\bin\s+accordance\s+with\b", "following"),
    (r"\bfor\s+the\s+purpose\s+of\b", "to"),
    (r"\bwith\s+respect\s+to\b", "about"),
    (r"\bin\s+lieu\s+of\b", "instead of"),
    (r"\binter\s+alia\b", "among other things"),
    (r"\bnull\s+and\s+void\b", "invalid"),
    (r"\bforthwith\b", "immediately"),
    (r"\baforementioned\b", "previously mentioned"),
    (r"\bdeemed\s+to\s+be\b", "considered"),
    (r"\bdeemed\b", "considered"),
    (r"\bper\s+annum\b", "per year"),
    (r"\bremuneration\b", "payment"),
    (r"\bcommence\b", "start"),
    (r"\bterminate\b", "end"),
    (r"\bshall\s+not\b", "must not"),
    (r"\bshall\b", "must"),
];

lazy_static! {
    static ref COMPILED_RULES: Vec<(&'static str, &'static str, Regex)> = SUBSTITUTION_RULES
        .iter()
        .map(|&(pattern, replacement)| {
            let re = Regex::new(&format!("(?i){pattern}"))
                .expect("substitution pattern must compile");
            (pattern, replacement, re)
        })
        .collect();
}

/// A rule that fired, and how often.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRule {
    pub pattern: String,
    pub replacement: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedText {
    pub text: String,
    pub applied: Vec<AppliedRule>,
}

/// Applies every substitution rule in order and reports which ones fired.
pub fn simplify_text(text: &str) -> SimplifiedText {
    let mut current = text.to_string();
    let mut applied = Vec::new();

    for (pattern, replacement, re) in COMPILED_RULES.iter() {
        let mut count = 0usize;
        let replaced = re.replace_all(&current, |caps: &Captures| {
            count += 1;
            match_case(&caps[0], replacement)
        });

        if let Cow::Owned(next) = replaced {
            current = next;
        }

        if count > 0 {
            applied.push(AppliedRule {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
                count,
            });
        }
    }

    SimplifiedText {
        text: current,
        applied,
    }
}

/// Capitalizes `replacement` when the matched text starts with a capital.
fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
