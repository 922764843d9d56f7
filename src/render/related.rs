use itertools::Itertools;

use crate::model::{present, Listing};

/// Identity used to collapse reposts: apply link, else slug, else `type|title|company`.
pub fn dedupe_key(listing: &Listing) -> String {
    if let Some(link) = present(&listing.apply_link) {
        return link.to_lowercase();
    }
    if let Some(slug) = listing.slug() {
        return slug.to_lowercase();
    }
    let part = |v: &Option<String>| present(v).unwrap_or_default().to_lowercase();
    format!("{}|{}|{}", part(&listing.kind), part(&listing.title), part(&listing.company))
}

/// Same-category neighbours of `current_slug`: newest first, one per dedupe key.
pub fn related(listings: &[Listing], current_slug: &str, limit: usize) -> Vec<Listing> {
    let current = current_slug.trim();
    listings
        .iter()
        .filter(|l| l.slug() != Some(current))
        .sorted_by(|a, b| Listing::cmp_recency(a, b))
        .unique_by(|l| dedupe_key(l))
        .take(limit)
        .cloned()
        .collect()
}
