//! Static build: detail pages, feed pages and the JSON artifacts the pages load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use askama::Template;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{Settings, SiteMeta};
use crate::feed::{self, PageContext, SearchIndex};
use crate::heuristics::text::is_safe_slug;
use crate::links::{canonical_path, DirProbe, PathCache};
use crate::model::Category;
use crate::render::{resolve_and_render, DetailPage, RenderOutcome};
use crate::store::{self, Catalog};

const CHUNK_SIZE: usize = 500;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub details: usize,
    pub skipped: usize,
    pub feeds: usize,
    pub search_entries: usize,
}

impl BuildReport {
    pub fn print(&self) {
        println!(
            "Wrote {} detail pages ({} skipped), {} feed pages, {} search entries.",
            self.details, self.skipped, self.feeds, self.search_entries,
        );
    }
}

/// One `(category, slug)` per renderable listing, first occurrence wins.
/// Slugs outside `[a-z0-9-]` are skipped so no page lands outside `out_dir`.
pub fn detail_targets(catalog: &Catalog) -> Vec<(Category, String)> {
    let mut targets = Vec::new();
    for category in Category::ALL {
        let mut seen = HashSet::new();
        for listing in catalog.listings(category) {
            if let Some(slug) = listing.slug() {
                if !is_safe_slug(slug) {
                    warn!("{}: skipping unsafe slug {:?}", category, slug);
                    continue;
                }
                if seen.insert(slug) {
                    targets.push((category, slug.to_string()));
                }
            }
        }
    }
    targets
}

struct Breadcrumb<'a> {
    category: Category,
    label: &'a str,
    heading: &'a str,
}

/// Page shell; `head` and `body` are already rendered markup.
#[derive(Template)]
#[template(path = "document.html")]
struct Document<'a> {
    head: &'a str,
    breadcrumb: Option<Breadcrumb<'a>>,
    body: &'a str,
}

#[derive(Template)]
#[template(path = "feed_head.html")]
struct FeedHead<'a> {
    title: &'a str,
    canonical: &'a str,
}

/// Full HTML document for a rendered detail page.
pub fn detail_document(page: &DetailPage) -> askama::Result<String> {
    let head = page.metadata.head_html()?;
    Document {
        head: &head,
        breadcrumb: Some(Breadcrumb {
            category: page.category,
            label: page.category.label(),
            heading: &page.metadata.heading,
        }),
        body: &page.html,
    }
    .render()
}

pub fn feed_document(context: PageContext, body: &str, site: &SiteMeta) -> askama::Result<String> {
    let title = match context {
        PageContext::Home => format!("{} | Jobs, Internships, Hackathons and Projects", site.name),
        PageContext::Category(c) => format!("Latest {} | {}", c.label(), site.name),
        PageContext::All => format!("All Opportunities | {}", site.name),
    };
    let canonical = site.absolute(&context.path());
    let head = FeedHead {
        title: &title,
        canonical: &canonical,
    }
    .render()?;
    Document {
        head: &head,
        breadcrumb: None,
        body,
    }
    .render()
}

fn page_file(out_dir: &Path, site_path: &str) -> PathBuf {
    out_dir.join(site_path.trim_matches('/')).join("index.html")
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}

/// Render every detail page in parallel chunks and write them under `out_dir`.
/// Returns `(written, skipped)`.
pub fn write_detail_pages(catalog: &Catalog, settings: &Settings, out_dir: &Path) -> Result<(usize, usize)> {
    let targets = detail_targets(catalog);
    let site = settings.site();

    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut written = 0;
    let mut skipped = 0;
    for chunk in targets.chunks(CHUNK_SIZE) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|(category, slug)| {
                let detail = store::load_detail_lenient(&settings.data_dir, slug);
                let outcome = resolve_and_render(
                    catalog.listings(*category),
                    *category,
                    slug,
                    detail.as_ref(),
                    &site,
                    settings.related_limit,
                );
                (*category, slug, outcome)
            })
            .collect();

        for (category, slug, outcome) in results {
            match outcome {
                RenderOutcome::Rendered(page) => {
                    let path = page_file(out_dir, &canonical_path(category, slug));
                    write_page(&path, &detail_document(&page)?)?;
                    written += 1;
                }
                other => {
                    warn!("{}/{}: not rendered ({:?})", category, slug, other);
                    skipped += 1;
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok((written, skipped))
}

/// Home, category and all-opportunities pages. Run after the detail pages so
/// card links can point at the directories that now exist.
pub fn write_feed_pages(catalog: &Catalog, settings: &Settings, out_dir: &Path) -> Result<usize> {
    let site = settings.site();
    let mut links = PathCache::new(DirProbe::new(out_dir));
    let contexts = std::iter::once(PageContext::Home)
        .chain(Category::ALL.into_iter().map(PageContext::Category))
        .chain(std::iter::once(PageContext::All));

    let mut count = 0;
    for context in contexts {
        let items = feed::items_for(catalog, context);
        let assembled = feed::assemble_feed(&items, context, settings.home_section_limit, &mut links);
        let body = feed::render_feed_html(&assembled)?;
        write_page(&page_file(out_dir, &context.path()), &feed_document(context, &body, &site)?)?;
        count += 1;
    }
    Ok(count)
}

/// `data/home-feed.json` and `data/search-index.json` under `out_dir`.
pub fn write_artifacts(catalog: &Catalog, settings: &Settings, out_dir: &Path) -> Result<usize> {
    let payload = feed::home_feed_payload(catalog, settings.home_section_limit);
    store::write_json_pretty(&out_dir.join("data/home-feed.json"), &payload)?;

    let index = SearchIndex::new(&catalog.all());
    store::write_json_pretty(&out_dir.join("data/search-index.json"), &index)?;
    Ok(index.len())
}

pub fn build_site(catalog: &Catalog, settings: &Settings) -> Result<BuildReport> {
    let out_dir = settings.out_dir.as_path();
    fs::create_dir_all(out_dir).with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let (details, skipped) = write_detail_pages(catalog, settings, out_dir)?;
    info!("Rendered {} detail pages", details);
    let feeds = write_feed_pages(catalog, settings, out_dir)?;
    let search_entries = write_artifacts(catalog, settings, out_dir)?;

    Ok(BuildReport {
        details,
        skipped,
        feeds,
        search_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{fixture_dir, scratch_dir};

    fn settings(out: &Path) -> Settings {
        Settings {
            data_dir: fixture_dir(),
            out_dir: out.to_path_buf(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn builds_pages_and_artifacts() {
        let out = scratch_dir("build");
        let catalog = store::load_all(&fixture_dir()).await;
        let report = build_site(&catalog, &settings(&out)).unwrap();

        assert_eq!(report.details, detail_targets(&catalog).len());
        assert_eq!(report.skipped, 0);
        assert_eq!(report.feeds, 6);
        assert_eq!(report.search_entries, catalog.total());

        let page = fs::read_to_string(out.join("jobs/data-analyst/index.html")).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("rel=\"canonical\" href=\"https://studenttechprojects.com/jobs/data-analyst/\""));
        assert!(page.contains("application/ld+json"));
        assert!(page.contains("<a href=\"/jobs/\">Jobs</a> / <span>Data Analyst</span></nav>"));

        // detail pages exist before the feeds are written, so cards use directory links
        let jobs = fs::read_to_string(out.join("jobs/index.html")).unwrap();
        assert!(jobs.contains("href=\"/jobs/data-analyst/\""));
        assert!(!jobs.contains("opportunity.html"));
        assert!(out.join("index.html").is_file());
        assert!(out.join("opportunities/index.html").is_file());

        let feed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("data/home-feed.json")).unwrap()).unwrap();
        assert!(feed["counts"]["jobs"].as_u64().unwrap() >= 3);
        assert!(feed["updatedAt"].is_string());
    }

    #[test]
    fn duplicate_slugs_render_once() {
        let mut catalog = Catalog::default();
        catalog.insert(
            Category::Jobs,
            store::parse_listings(
                r#"[{"slug": "a", "type": "job"}, {"slug": "a", "type": "job"}, {"type": "job"}]"#,
                Category::Jobs,
                Path::new("jobs.json"),
            ),
        );
        assert_eq!(detail_targets(&catalog), vec![(Category::Jobs, "a".to_string())]);
    }

    #[test]
    fn unsafe_slugs_are_not_built() {
        let mut catalog = Catalog::default();
        catalog.insert(
            Category::Jobs,
            store::parse_listings(
                r#"[{"slug": "../../escape", "type": "job"}, {"slug": "ok-1", "type": "job"}, {"slug": "Has Space", "type": "job"}]"#,
                Category::Jobs,
                Path::new("jobs.json"),
            ),
        );
        assert_eq!(detail_targets(&catalog), vec![(Category::Jobs, "ok-1".to_string())]);
    }

    #[test]
    fn feed_document_title_and_canonical() {
        let html = feed_document(PageContext::Category(Category::Projects), "<p>x</p>", &SiteMeta::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Latest Projects | StudentTechProjects</title>"));
        assert!(html.contains("<p>x</p></main>"));
        assert!(!html.contains("<nav"));
        assert!(html.contains("href=\"https://studenttechprojects.com/projects/\""));
    }
}
