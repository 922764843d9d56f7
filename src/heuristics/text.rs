use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static SAFE_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Lowercase and collapse every run of non `[a-z0-9]` characters into one space.
/// ASCII only: accented letters become separators rather than being folded.
pub fn normalize(text: &str) -> String {
    NON_ALNUM_RE
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// URL-safe slug: `&` reads as "and", other punctuation collapses to `-`.
pub fn slugify(text: &str) -> String {
    let spaced = text.to_lowercase().replace('&', " and ");
    NON_ALNUM_RE
        .replace_all(&spaced, "-")
        .trim_matches('-')
        .to_string()
}

/// Only `[a-z0-9-]`. Anything else is never joined into a file path.
pub fn is_safe_slug(slug: &str) -> bool {
    SAFE_SLUG_RE.is_match(slug)
}

/// Claim `base` in `used`, suffixing `-2`, `-3`, ... on collision.
pub fn unique_slug(base: &str, fallback: &str, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { fallback } else { base };
    let mut slug = base.to_string();
    let mut n = 2;
    while used.contains(&slug) {
        slug = format!("{}-{}", base, n);
        n += 1;
    }
    used.insert(slug.clone());
    slug
}
