//! Matches a free-text identifier to a stored contact.
//!
//! Exact case-insensitive match on name or email always wins; otherwise
//! a fuzzy pass tolerates single-character typos and partial substrings
//! without matching unrelated names.

use rolo_core::Contact;
use tracing::debug;

/// Maximum normalized edit distance accepted by the fuzzy pass.
///
/// Permissive enough for one-character typos and partial substrings,
/// tight enough that unrelated names stay unmatched.
const MAX_FUZZY_DISTANCE: f64 = 0.4;

/// Find the contact matching `identifier`, or `None`.
///
/// (a) First case-insensitive exact match on name or email, in store
/// order. (b) Fuzzy fallback: the candidate with the smallest
/// [`normalized_distance`] over name and email wins if it is within
/// [`MAX_FUZZY_DISTANCE`]; ties keep store order.
#[must_use]
pub fn resolve<'a>(contacts: &'a [Contact], identifier: &str) -> Option<&'a Contact> {
    let needle_lower = identifier.to_lowercase();
    if needle_lower.trim().is_empty() {
        return None;
    }

    if let Some(exact) = contacts.iter().find(|c| {
        c.name.to_lowercase() == needle_lower || c.email.to_lowercase() == needle_lower
    }) {
        return Some(exact);
    }

    let needle: Vec<char> = needle_lower.chars().collect();
    let mut best: Option<(f64, &Contact)> = None;
    for contact in contacts {
        let distance = [&contact.name, &contact.email]
            .into_iter()
            .filter(|field| !field.is_empty())
            .map(|field| normalized_distance(&needle, field))
            .fold(f64::INFINITY, f64::min);

        if distance <= MAX_FUZZY_DISTANCE && best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, contact));
        }
    }

    if let Some((distance, contact)) = best {
        debug!(identifier, matched = %contact.label(), distance, "fuzzy-resolved contact");
    }
    best.map(|(_, c)| c)
}

/// Normalized edit distance between the needle and a field.
///
/// The smaller of: full-string Levenshtein over the longer length
/// (catches typos with insertions/deletions), and the best needle-length
/// window in the field over the needle length (catches the needle as a
/// slightly-garbled substring, e.g. a first name against "First Last").
fn normalized_distance(needle: &[char], field: &str) -> f64 {
    let haystack: Vec<char> = field.to_lowercase().chars().collect();
    if needle.is_empty() || haystack.is_empty() {
        return 1.0;
    }

    let longer = needle.len().max(haystack.len());
    #[allow(clippy::cast_precision_loss)]
    let mut best = levenshtein(needle, &haystack) as f64 / longer as f64;

    if needle.len() < haystack.len() {
        for window in haystack.windows(needle.len()) {
            #[allow(clippy::cast_precision_loss)]
            let d = levenshtein(needle, window) as f64 / needle.len() as f64;
            if d < best {
                best = d;
            }
        }
    }
    best
}

/// Rolling two-row Levenshtein distance.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
