//! Listing feeds: home sections, category pages, the all-categories page and
//! live search over a prebuilt haystack index.

use std::collections::BTreeMap;

use askama::Template;
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

use crate::classify::infer_project_meta;
use crate::heuristics::text::normalize;
use crate::links::{PathCache, PathProbe};
use crate::model::{or_placeholder, present, Category, Listing, ListingType};
use crate::store::Catalog;

pub const EMPTY_MESSAGE: &str = "No opportunities found. Check back later!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContext {
    Home,
    Category(Category),
    All,
}

impl PageContext {
    pub fn parse(s: &str) -> Option<PageContext> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "" => Some(PageContext::Home),
            "opportunities" | "all" => Some(PageContext::All),
            other => Category::parse(other).map(PageContext::Category),
        }
    }

    /// Site path of the feed page.
    pub fn path(&self) -> String {
        match self {
            PageContext::Home => "/".to_string(),
            PageContext::Category(c) => format!("/{}/", c),
            PageContext::All => "/opportunities/".to_string(),
        }
    }
}

pub fn sort_by_recency(mut items: Vec<Listing>) -> Vec<Listing> {
    items.sort_by(Listing::cmp_recency);
    items
}

pub fn filter_for(items: &[Listing], context: PageContext) -> Vec<Listing> {
    match context {
        PageContext::Category(c) => items
            .iter()
            .filter(|l| l.listing_type() == Some(c.listing_type()))
            .cloned()
            .collect(),
        PageContext::Home | PageContext::All => items.to_vec(),
    }
}

/// Trimmed `postedDate` of the most recent job, compared against each card's trimmed date.
pub fn latest_job_date(items: &[Listing]) -> Option<String> {
    items
        .iter()
        .filter(|l| l.listing_type() == Some(ListingType::Job))
        .min_by(|a, b| Listing::cmp_recency(a, b))
        .and_then(|l| present(&l.posted_date).map(str::to_string))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: String,
    pub excerpt: String,
    pub href: String,
    pub is_new: bool,
    pub experience: Option<String>,
    pub chips: Option<[String; 3]>,
    pub cta: &'static str,
}

pub fn build_card(listing: &Listing, context: PageContext, latest_job_date: Option<&str>, href: String) -> Card {
    let kind = listing.listing_type();
    let is_project = kind == Some(ListingType::Project);
    let is_new = context == PageContext::Home
        && kind == Some(ListingType::Job)
        && latest_job_date.is_some()
        && present(&listing.posted_date) == latest_job_date;
    let experience = present(&listing.experience)
        .filter(|e| !e.eq_ignore_ascii_case("not specified"))
        .map(str::to_string);
    let chips = is_project.then(|| {
        let meta = infer_project_meta(listing);
        [meta.duration, meta.difficulty, meta.team_size]
    });

    Card {
        title: or_placeholder(&listing.title, "Untitled").to_string(),
        company: or_placeholder(&listing.company, "Unknown").to_string(),
        location: or_placeholder(&listing.location, "Not specified").to_string(),
        posted_date: present(&listing.posted_date).unwrap_or_default().to_string(),
        excerpt: present(&listing.excerpt).unwrap_or_default().to_string(),
        href,
        is_new,
        experience,
        chips,
        cta: if is_project { "View Details" } else { "View Details & Apply" },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSection {
    pub id: String,
    pub title: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub context: String,
    pub sections: Vec<FeedSection>,
}

/// Category a card links into: the page's own, else the listing's type, else jobs.
fn card_category(listing: &Listing, context: PageContext) -> Category {
    match context {
        PageContext::Category(c) => c,
        _ => listing
            .listing_type()
            .map(|t| t.category())
            .unwrap_or(Category::Jobs),
    }
}

fn section<P: PathProbe>(
    id: &str,
    title: &str,
    items: &[Listing],
    limit: Option<usize>,
    context: PageContext,
    latest: Option<&str>,
    links: &mut PathCache<P>,
) -> FeedSection {
    let cards = items
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|l| {
            let href = links.detail_href(card_category(l, context), l.slug().unwrap_or_default());
            build_card(l, context, latest, href)
        })
        .collect();
    FeedSection {
        id: id.to_string(),
        title: title.to_string(),
        cards,
    }
}

pub fn assemble_feed<P: PathProbe>(
    items: &[Listing],
    context: PageContext,
    home_limit: usize,
    links: &mut PathCache<P>,
) -> Feed {
    let sections = match context {
        PageContext::Home => {
            let all = sort_by_recency(items.to_vec());
            let latest = latest_job_date(items);
            let latest = latest.as_deref();
            let mut sections = vec![section(
                "jobs-feed",
                "Latest Opportunities",
                &all,
                Some(home_limit),
                context,
                latest,
                links,
            )];
            for category in Category::ALL {
                let list = sort_by_recency(filter_for(items, PageContext::Category(category)));
                sections.push(section(
                    &format!("jobs-feed-{}", category),
                    &format!("Latest {}", category.label()),
                    &list,
                    Some(home_limit),
                    context,
                    latest,
                    links,
                ));
            }
            sections
        }
        PageContext::Category(category) => {
            let list = sort_by_recency(filter_for(items, context));
            vec![section("jobs-feed", category.label(), &list, None, context, None, links)]
        }
        PageContext::All => {
            let list = sort_by_recency(items.to_vec());
            vec![section("jobs-feed", "All Opportunities", &list, None, context, None, links)]
        }
    };

    Feed {
        context: match context {
            PageContext::Home => "home".into(),
            PageContext::Category(c) => c.to_string(),
            PageContext::All => "opportunities".into(),
        },
        sections,
    }
}

/// Listings a feed page starts from. A category page whose file failed to
/// load, or a home/all page where every file failed, shows sample content.
pub fn items_for(catalog: &Catalog, context: PageContext) -> Vec<Listing> {
    match context {
        PageContext::Category(c) if catalog.failed(c) => fallback_listings(context),
        PageContext::Category(c) => catalog.listings(c).to_vec(),
        _ if Category::ALL.iter().all(|c| catalog.failed(*c)) => fallback_listings(context),
        _ => catalog.all(),
    }
}

pub fn fallback_listings(context: PageContext) -> Vec<Listing> {
    let sample = |category: Category, title: &str, company: &str, location: &str| Listing {
        title: Some(title.to_string()),
        company: Some(company.to_string()),
        location: Some(location.to_string()),
        posted_date: Some("2026-02-20".to_string()),
        excerpt: Some(format!("{} data is currently unavailable.", category.label())),
        slug: Some(format!("sample-{}", category.listing_type().as_str())),
        kind: Some(category.listing_type().as_str().to_string()),
        ..Default::default()
    };
    let for_category = |category: Category| match category {
        Category::Jobs => sample(category, "Sample Software Engineer Role", "Company", "Remote"),
        Category::Internships => sample(category, "Sample Internship Role", "Company", "Remote"),
        Category::Hackathons => sample(category, "Sample Hackathon", "Organizer", "Online"),
        Category::Projects => sample(category, "Sample Project Opportunity", "Mentor Org", "Remote"),
    };
    match context {
        PageContext::Category(c) => vec![for_category(c)],
        PageContext::Home | PageContext::All => Category::ALL.iter().map(|c| for_category(*c)).collect(),
    }
}

#[derive(Template)]
#[template(path = "feed.html")]
struct FeedView<'a> {
    feed: &'a Feed,
    empty_message: &'a str,
}

/// Card grid per section; an empty section shows [`EMPTY_MESSAGE`].
pub fn render_feed_html(feed: &Feed) -> askama::Result<String> {
    FeedView {
        feed,
        empty_message: EMPTY_MESSAGE,
    }
    .render()
}

/// Normalized text of every display field, joined once per listing.
pub fn haystack(listing: &Listing) -> String {
    let fields = [
        &listing.title,
        &listing.company,
        &listing.location,
        &listing.excerpt,
        &listing.kind,
        &listing.experience,
        &listing.domain,
        &listing.duration,
        &listing.difficulty,
        &listing.team_size,
        &listing.posted_date,
    ];
    let joined = fields
        .iter()
        .filter_map(|f| present(f))
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    pub slug: String,
    pub category: Category,
    pub haystack: String,
    #[serde(skip)]
    pub listing: Listing,
}

/// Built once per data load; queries re-filter without touching the files again.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn new(listings: &[Listing]) -> Self {
        let entries = sort_by_recency(listings.to_vec())
            .into_iter()
            .map(|listing| SearchEntry {
                slug: listing.slug().unwrap_or_default().to_string(),
                category: listing
                    .listing_type()
                    .map(|t| t.category())
                    .unwrap_or(Category::Jobs),
                haystack: haystack(&listing),
                listing,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substring match of the normalized query; an empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Listing> {
        let needle = normalize(query);
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.haystack.contains(&needle))
            .map(|e| &e.listing)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub title: String,
    pub company: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub posted_date: String,
    pub posted_at: Option<String>,
    pub excerpt: String,
    pub experience: String,
    pub domain: String,
    pub duration: String,
    pub difficulty: String,
    pub team_size: String,
}

impl From<&Listing> for FeedEntry {
    fn from(l: &Listing) -> Self {
        let text = |v: &Option<String>| present(v).unwrap_or_default().to_string();
        Self {
            title: text(&l.title),
            company: text(&l.company),
            slug: text(&l.slug),
            kind: text(&l.kind),
            location: or_placeholder(&l.location, "Not specified").to_string(),
            posted_date: text(&l.posted_date),
            posted_at: present(&l.posted_at).map(str::to_string),
            excerpt: text(&l.excerpt),
            experience: or_placeholder(&l.experience, "Not specified").to_string(),
            domain: text(&l.domain),
            duration: text(&l.duration),
            difficulty: text(&l.difficulty),
            team_size: text(&l.team_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeedPayload {
    pub updated_at: Option<String>,
    pub counts: BTreeMap<Category, usize>,
    pub latest: BTreeMap<Category, Vec<FeedEntry>>,
}

pub fn home_feed_payload(catalog: &Catalog, limit: usize) -> HomeFeedPayload {
    let mut counts = BTreeMap::new();
    let mut latest = BTreeMap::new();
    let mut newest = 0i64;

    for category in Category::ALL {
        let items = filter_for(catalog.listings(category), PageContext::Category(category));
        newest = items
            .iter()
            .map(Listing::effective_timestamp)
            .fold(newest, i64::max);
        counts.insert(category, items.len());
        latest.insert(
            category,
            sort_by_recency(items)
                .iter()
                .take(limit)
                .map(FeedEntry::from)
                .collect(),
        );
    }

    let updated_at = (newest > 0)
        .then(|| DateTime::from_timestamp_millis(newest))
        .flatten()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));

    HomeFeedPayload {
        updated_at,
        counts,
        latest,
    }
}
