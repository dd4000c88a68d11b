use std::sync::LazyLock;

use regex::Regex;

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]+\)").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n,;·•]").unwrap());
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{3,}").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\d{2,}[a-z]?$").unwrap());

/// Words that show up as their own fragment in destination cells but never
/// name a place.
pub const STOP_WORDS: &[&str] = &[
    "and",
    "or",
    "also",
    "via",
    "seasonal",
    "charter",
    "cargo",
    "freight",
    "terminated",
    "suspended",
];

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 50;

/// Turn the raw text of a destinations cell into destination names.
///
/// Citation markers and parenthetical notes are removed before splitting, so
/// `"London (seasonal)"` yields `"London"` rather than a `"seasonal"` fragment.
/// The result may contain duplicates; callers fold it into a set.
pub fn clean_destinations(raw: &str) -> Vec<String> {
    let text = CITATION_RE.replace_all(raw, "");
    let text = PAREN_RE.replace_all(&text, "");
    let text = text.replace(['–', '—'], "-");
    let text = SPACES_RE.replace_all(&text, " ");

    SPLIT_RE
        .split(text.trim())
        .map(str::trim)
        .filter(|d| !is_noise(d))
        .map(str::to_string)
        .collect()
}

/// True when a trimmed fragment is not a usable destination name.
pub fn is_noise(fragment: &str) -> bool {
    let len = fragment.chars().count();
    if !(MIN_LEN..MAX_LEN).contains(&len) {
        return true;
    }
    if fragment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if DIGIT_RUN_RE.is_match(fragment) || CODE_RE.is_match(fragment) {
        return true;
    }
    STOP_WORDS.iter().any(|w| w.eq_ignore_ascii_case(fragment))
}
