//! Legal term glossary and term extraction.
//!
//! A fixed vocabulary of legal words, each with a canned plain-English
//! definition. Matching is whole-word and case-insensitive.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// (term, definition). Terms are lowercase; multi-word terms use single spaces.
pub const LEGAL_TERMS: &[(&str, &str)] = &[
    ("affidavit", "A written statement sworn to be true, usable as evidence."),
    ("arbitration", "Settling a dispute with a private decision-maker instead of a court."),
    ("assignment", "Handing your rights or duties under the contract to someone else."),
    ("breach", "Failing to do what the contract requires."),
    ("confidentiality", "A duty to keep certain information secret."),
    ("consideration", "What each side gives or promises in exchange for the deal."),
    ("covenant", "A formal promise to do or not do something."),
    ("damages", "Money paid to make up for a loss or injury."),
    ("defendant", "The person or company being sued."),
    ("escrow", "Money or property held by a neutral party until conditions are met."),
    ("force majeure", "Events outside anyone's control, like disasters, that excuse performance."),
    ("governing law", "The jurisdiction whose laws are used to interpret the contract."),
    ("indemnification", "A promise to cover another party's losses or legal costs."),
    ("indemnify", "To pay for another party's losses or legal costs."),
    ("injunction", "A court order requiring someone to do or stop doing something."),
    ("jurisdiction", "Which court or legal system has authority over a dispute."),
    ("liability", "Legal responsibility for harm, debts, or obligations."),
    ("lien", "A legal claim on property until a debt is paid."),
    ("litigation", "Taking a dispute to court."),
    ("negligence", "Failing to take reasonable care, causing harm."),
    ("plaintiff", "The person or company who starts a lawsuit."),
    ("severability", "If one part of the contract is invalid, the rest still applies."),
    ("statute of limitations", "The deadline for bringing a legal claim."),
    ("subrogation", "Stepping into someone else's shoes to recover money they were owed."),
    ("termination", "Ending the contract."),
    ("tort", "A wrongful act, other than breach of contract, that causes harm."),
    ("waiver", "Voluntarily giving up a right."),
    ("warranty", "A promise that certain facts or conditions are true."),
];

lazy_static! {
    static ref TERM_PATTERNS: Vec<(&'static str, &'static str, Regex)> = LEGAL_TERMS
        .iter()
        .map(|&(term, definition)| (term, definition, term_regex(term)))
        .collect();
}

/// Builds a case-insensitive whole-word regex; spaces inside a term match any whitespace run.
fn term_regex(term: &str) -> Regex {
    let body = term
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    // Terms are static and escaped; a failure here is a programming error.
    Regex::new(&format!(r"(?i)\b{body}\b")).expect("glossary term pattern must compile")
}

/// A glossary term found in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermMatch {
    pub term: String,
    pub definition: String,
    pub occurrences: usize,
    /// Byte offset of the first occurrence.
    pub first_offset: usize,
}

/// Looks up a single term, returning `(canonical term, definition)`.
/// Case and surrounding/inner whitespace are ignored.
pub fn lookup_term(term: &str) -> Option<(&'static str, &'static str)> {
    let normalized = term
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    LEGAL_TERMS.iter().find(|(t, _)| *t == normalized).copied()
}

/// Returns every glossary term present in `text`, ordered by first occurrence.
pub fn extract_terms(text: &str) -> Vec<TermMatch> {
    let mut matches: Vec<TermMatch> = TERM_PATTERNS
        .iter()
        .filter_map(|(term, definition, re)| {
            let mut found = re.find_iter(text);
            let first = found.next()?;
            Some(TermMatch {
                term: term.to_string(),
                definition: definition.to_string(),
                occurrences: 1 + found.count(),
                first_offset: first.start(),
            })
        })
        .collect();

    matches.sort_by(|a, b| a.first_offset.cmp(&b.first_offset).then(a.term.cmp(&b.term)));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(TERM_PATTERNS.len(), LEGAL_TERMS.len());
    }

    #[test]
    fn test_terms_are_normalized_lowercase() {
        for (term, _) in LEGAL_TERMS {
            assert_eq!(*term, term.to_lowercase());
            assert!(!term.contains("  "));
        }
    }

    #[test]
    fn test_lookup_returns_static_definition() {
        assert_eq!(
            lookup_term("Indemnify"),
            Some(("indemnify", "To pay for another party's losses or legal costs."))
        );
    }

    #[test]
    fn test_lookup_multi_word_with_odd_spacing() {
        assert!(lookup_term("  Force   Majeure ").is_some());
    }

    #[test]
    fn test_lookup_returns_canonical_term() {
        assert_eq!(
            lookup_term("GOVERNING LAW").map(|(t, _)| t),
            Some("governing law")
        );
    }

    #[test]
    fn test_lookup_unknown_term() {
        assert_eq!(lookup_term("pizza"), None);
    }

    #[test]
    fn test_extract_terms_whole_word_only() {
        // "tortoise" must not match "tort"; "liens" must not match "lien".
        let found = extract_terms("The tortoise had liens on nothing.");
        assert!(found.is_empty(), "unexpected matches: {found:?}");
    }

    #[test]
    fn test_extract_terms_counts_and_orders() {
        let text = "Any Breach triggers arbitration. A second breach ends it.";
        let found = extract_terms(text);
        let terms: Vec<&str> = found.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["breach", "arbitration"]);
        assert_eq!(found[0].occurrences, 2);
        assert_eq!(found[0].definition, "Failing to do what the contract requires.");
    }

    #[test]
    fn test_extract_multi_word_term_across_line_break() {
        let found = extract_terms("This is governed by the statute of\nlimitations.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].term, "statute of limitations");
    }

    #[test]
    fn test_indemnify_and_indemnification_are_distinct() {
        let found = extract_terms("Tenant shall indemnify Landlord. Indemnification survives.");
        let terms: Vec<&str> = found.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["indemnify", "indemnification"]);
    }
}
