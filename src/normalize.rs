use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Lowercase, strip diacritics, collapse everything that is not `a-z0-9` into single spaces.
pub fn normalize_text(input: &str) -> String {
    let lower = input.trim().to_lowercase();

    // NFKD, then drop combining marks
    let no_diacritics: String = lower.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    RE_NON_ALNUM
        .replace_all(&no_diacritics, " ")
        .trim()
        .to_string()
}

/// Cache key for a (city, country) pair; country may be empty.
pub fn place_key(name: &str, country: Option<&str>) -> String {
    format!(
        "{}|{}",
        normalize_text(name),
        normalize_text(country.unwrap_or(""))
    )
}
