mod classify;
mod config;
mod enrich;
mod error;
mod feed;
mod heuristics;
mod import;
mod links;
mod merge;
mod model;
mod render;
mod site;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::Settings;
use crate::feed::{PageContext, SearchIndex};
use crate::links::{DirProbe, PathCache};
use crate::model::{or_placeholder, Category, Listing};
use crate::render::RenderOutcome;

#[derive(Parser)]
#[command(name = "opportunity_pages", about = "Static pages for jobs, internships, hackathons and projects")]
struct Cli {
    /// Directory holding the category JSON files and content/
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Output directory for built pages
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every detail page, feed page and JSON artifact
    Build,
    /// Print one detail page
    Render {
        /// Category (jobs, internships, hackathons, projects)
        #[arg(short, long, default_value = "jobs")]
        category: String,
        /// Listing slug
        #[arg(short, long)]
        slug: Option<String>,
        /// Site path, either /jobs/<slug>/ or /opportunity.html?category=..&slug=..
        #[arg(short, long, conflicts_with = "slug")]
        path: Option<String>,
    },
    /// Show a feed page as a table
    Feed {
        /// home, jobs, internships, hackathons, projects or opportunities
        #[arg(long, default_value = "home")]
        page: String,
        /// Filter cards with a search query
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Search every listing
    Search {
        query: String,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Fill project detail files from the generated template
    Enrich,
    /// Append project titles from a text file (one per line)
    ImportTitles { file: PathBuf },
    /// Per-category counts and slug problems
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load().unwrap_or_else(|e| {
        warn!("Falling back to default settings: {}", e);
        Settings::default()
    });
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    if let Some(dir) = cli.out_dir {
        settings.out_dir = dir;
    }

    let result = match cli.command {
        Commands::Build => {
            let catalog = store::load_all(&settings.data_dir).await;
            if catalog.total() == 0 {
                println!("No listings found in {}.", settings.data_dir.display());
                return Ok(());
            }
            println!(
                "Building {} listings into {}...",
                catalog.total(),
                settings.out_dir.display()
            );
            let report = site::build_site(&catalog, &settings)?;
            report.print();
            Ok(())
        }
        Commands::Render { category, slug, path } => {
            let (category, slug) = match (path, slug) {
                (Some(path), _) => match links::parse_page_request(&path) {
                    Some(req) => (req.category, req.slug),
                    None => bail!("Cannot read a category and slug from {:?}", path),
                },
                (None, Some(slug)) => (Category::parse_or_default(&category), slug),
                (None, None) => bail!("Pass --slug or --path"),
            };

            let outcome = match store::load_category(&settings.data_dir, category) {
                Ok(listings) => {
                    let detail = store::load_detail_lenient(&settings.data_dir, &slug);
                    render::resolve_and_render(
                        &listings,
                        category,
                        &slug,
                        detail.as_ref(),
                        &settings.site(),
                        settings.related_limit,
                    )
                }
                Err(e) => RenderOutcome::Failed { reason: e.to_string() },
            };

            match &outcome {
                RenderOutcome::Rendered(page) => print!("{}", site::detail_document(page)?),
                _ => print!("{}", outcome.body_html()?),
            }
            match outcome {
                RenderOutcome::Rendered(_) => Ok(()),
                RenderOutcome::NotFound { category, slug } => {
                    bail!("No {} listing with slug {:?}", category, slug)
                }
                RenderOutcome::Failed { reason } => bail!("Render failed: {}", reason),
            }
        }
        Commands::Feed { page, query } => {
            let Some(context) = PageContext::parse(&page) else {
                bail!("Unknown feed page {:?}", page);
            };
            let catalog = store::load_all(&settings.data_dir).await;
            let mut items = feed::items_for(&catalog, context);
            if let Some(q) = query.as_deref() {
                let index = SearchIndex::new(&items);
                items = index.search(q).into_iter().cloned().collect();
            }

            let mut links = PathCache::new(DirProbe::new(&settings.out_dir));
            let assembled = feed::assemble_feed(&items, context, settings.home_section_limit, &mut links);
            for section in &assembled.sections {
                println!("\n== {} ({}) ==", section.title, section.id);
                if section.cards.is_empty() {
                    println!("{}", feed::EMPTY_MESSAGE);
                    continue;
                }
                println!(
                    "{:>3} | {:<32} | {:<20} | {:<16} | {:<10} | {:<3} | {}",
                    "#", "Title", "Company", "Location", "Posted", "New", "Link"
                );
                println!("{}", "-".repeat(110));
                for (i, card) in section.cards.iter().enumerate() {
                    println!(
                        "{:>3} | {:<32} | {:<20} | {:<16} | {:<10} | {:<3} | {}",
                        i + 1,
                        truncate(&card.title, 32),
                        truncate(&card.company, 20),
                        truncate(&card.location, 16),
                        card.posted_date,
                        if card.is_new { "yes" } else { "" },
                        card.href
                    );
                }
            }
            Ok(())
        }
        Commands::Search { query, limit } => {
            let catalog = store::load_all(&settings.data_dir).await;
            let index = SearchIndex::new(&catalog.all());
            let hits = index.search(&query);
            if hits.is_empty() {
                println!("{}", feed::EMPTY_MESSAGE);
                return Ok(());
            }

            println!("{:>3} | {:<12} | {:<36} | {:<20} | {}", "#", "Type", "Title", "Company", "Slug");
            println!("{}", "-".repeat(105));
            for (i, l) in hits.iter().take(limit).enumerate() {
                print_hit(i + 1, l);
            }
            println!("\n{} of {} listings match {:?}", hits.len(), index.len(), query);
            Ok(())
        }
        Commands::Enrich => {
            let updated = enrich::enrich_projects(&settings.data_dir, &settings.site_name)
                .context("Project enrichment failed")?;
            println!("Enriched {} project content files", updated);
            Ok(())
        }
        Commands::ImportTitles { file } => {
            let summary = import::import_titles_file(&settings.data_dir, &file, &import::SystemClock)
                .with_context(|| format!("Failed to import titles from {}", file.display()))?;
            println!(
                "Imported {} new project titles (from {} lines).",
                summary.added, summary.lines
            );
            println!("Total projects: {}", summary.total);
            Ok(())
        }
        Commands::Stats => {
            let catalog = store::load_all(&settings.data_dir).await;
            println!("{:<12} | {:>6} | {:>8} | {:>10} | {}", "Category", "Count", "No slug", "Duplicates", "Status");
            println!("{}", "-".repeat(60));
            for category in Category::ALL {
                let list = catalog.listings(category);
                let report = store::slug_report(list);
                println!(
                    "{:<12} | {:>6} | {:>8} | {:>10} | {}",
                    category.label(),
                    list.len(),
                    report.missing,
                    report.duplicates.len(),
                    if catalog.failed(category) { "load failed" } else { "ok" }
                );
                for slug in &report.duplicates {
                    println!("    duplicate slug: {}", slug);
                }
            }
            println!("\nTotal:     {}", catalog.total());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_hit(n: usize, l: &Listing) {
    println!(
        "{:>3} | {:<12} | {:<36} | {:<20} | {}",
        n,
        or_placeholder(&l.kind, "-"),
        truncate(or_placeholder(&l.title, "Untitled"), 36),
        truncate(or_placeholder(&l.company, "Unknown"), 20),
        l.slug().unwrap_or("-")
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
