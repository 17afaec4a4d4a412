// Rule-based legal assistant: glossary lookup, legalese substitution,
// and keyword sentence classification. Pure functions over text; no model calls.

pub mod analysis;
pub mod classify;
pub mod glossary;
pub mod handlers;
pub mod substitutions;
