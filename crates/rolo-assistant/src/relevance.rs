//! Narrows the contact list to those plausibly relevant to a question.
//!
//! Keyword-overlap scoring with graceful degradation: the Q&A prompt must
//! always receive *some* context, so an empty filtered set falls back to
//! the first `cap` contacts unfiltered.

use rolo_core::Contact;
use tracing::debug;

/// Common words excluded from keyword extraction.
const STOP_WORDS: &[&str] = &[
    "when", "did", "what", "who", "where", "how", "which", "why", "the", "a", "an", "is", "was",
    "are", "were", "do", "does", "have", "has", "had", "with", "about", "from", "for", "at", "by",
    "to", "of", "in", "on", "my", "our", "their", "his", "her", "meet", "met", "contact", "call",
    "called", "email", "emailed", "first", "last", "time",
];

/// Extract meaningful keywords from a question.
///
/// Lowercased alphanumeric runs of length ≥ 2, minus stop words.
fn extract_keywords(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Select up to `cap` contacts relevant to the question, best first.
///
/// Score = number of keywords occurring as substrings of the contact's
/// concatenated lowercased name, email, and company. Ties keep store
/// order (the sort is stable). Zero keywords, or zero contacts scoring
/// above zero, fall back to the first `cap` contacts in store order.
#[must_use]
pub fn relevant_contacts<'a>(
    contacts: &'a [Contact],
    question: &str,
    cap: usize,
) -> Vec<&'a Contact> {
    let keywords = extract_keywords(question);
    if keywords.is_empty() {
        return contacts.iter().take(cap).collect();
    }

    let mut scored: Vec<(usize, &Contact)> = contacts
        .iter()
        .filter_map(|contact| {
            let haystack = format!(
                "{} {} {}",
                contact.name.to_lowercase(),
                contact.email.to_lowercase(),
                contact.company.to_lowercase()
            );
            let score = keywords.iter().filter(|k| haystack.contains(k.as_str())).count();
            (score > 0).then_some((score, contact))
        })
        .collect();

    if scored.is_empty() {
        debug!(keywords = ?keywords, "no contacts matched, falling back to store order");
        return contacts.iter().take(cap).collect();
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(cap).map(|(_, c)| c).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
