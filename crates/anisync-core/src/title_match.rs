// Title heuristics for pairing records that share no identifier

use anisync_models::Titles;
use once_cell::sync::Lazy;
use regex::Regex;

/// Share of the longer title that must agree from the start, in percent (exclusive)
const PREFIX_MATCH_PERCENT: f64 = 80.0;

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*\)").expect("valid regex"));

/// Decide whether two title sets likely denote the same work.
///
/// Rules, first success wins:
/// 1. case-insensitive containment of the English titles, then the native titles
/// 2. common-prefix ratio of the whitespace-stripped native titles
/// 3. common-prefix ratio of the whitespace-stripped English titles
/// 4. rule 3 again after removing parenthesized qualifiers such as "(TV)"
pub fn same_work(a: &Titles, b: &Titles) -> bool {
    if contains_either_way(&a.english, &b.english) || contains_either_way(&a.native, &b.native) {
        return true;
    }

    let native_a = strip_whitespace(&a.native);
    let native_b = strip_whitespace(&b.native);
    if prefix_match(&native_a, &native_b) {
        return true;
    }

    let english_a = strip_whitespace(&a.english);
    let english_b = strip_whitespace(&b.english);
    if prefix_match(&english_a, &english_b) {
        return true;
    }

    prefix_match(&strip_parenthesized(&english_a), &strip_parenthesized(&english_b))
}

/// Case-insensitive containment in either direction. Empty titles never match.
pub fn contains_either_way(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Percentage of the longer string covered by the common leading characters
pub fn prefix_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longer = len_a.max(len_b);
    if longer == 0 {
        return 0.0;
    }

    let common = a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count();
    common as f64 / longer as f64 * 100.0
}

pub fn prefix_match(a: &str, b: &str) -> bool {
    prefix_ratio(a, b) > PREFIX_MATCH_PERCENT
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| *c != ' ').collect()
}

fn strip_parenthesized(s: &str) -> String {
    PARENTHESIZED.replace_all(s, "").into_owned()
}
