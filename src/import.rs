//! Append project titles from a plain text file (one title per line) to the
//! projects category file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::heuristics::text::{slugify, unique_slug};
use crate::model::{present, Category, Listing, ListingType};
use crate::store;

pub const PROJECT_COMPANY: &str = "College Student Projects";
const SLUG_FALLBACK: &str = "college-student-project";

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn project_excerpt(title: &str) -> String {
    format!(
        "{} is a college student project title with practical implementation, module-wise execution, and portfolio-ready outcomes.",
        title
    )
}

/// New project listings for the titles not already present (case-insensitive).
pub fn import_titles<'a>(
    existing: &[Listing],
    lines: impl IntoIterator<Item = &'a str>,
    clock: &dyn Clock,
) -> Vec<Listing> {
    let mut titles: HashSet<String> = existing
        .iter()
        .filter_map(|l| present(&l.title))
        .map(str::to_lowercase)
        .collect();
    let mut slugs: HashSet<String> = existing
        .iter()
        .filter_map(Listing::slug)
        .map(str::to_string)
        .collect();
    let mut next_id = existing.iter().map(Listing::id_or_zero).max().unwrap_or(0).max(0) + 1;
    let today = clock.today().format("%Y-%m-%d").to_string();

    let mut added = Vec::new();
    for title in lines.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        if !titles.insert(title.to_lowercase()) {
            continue;
        }
        let slug = unique_slug(&slugify(title), SLUG_FALLBACK, &mut slugs);
        added.push(Listing {
            id: Some(next_id),
            title: Some(title.to_string()),
            company: Some(PROJECT_COMPANY.to_string()),
            slug: Some(slug),
            kind: Some(ListingType::Project.as_str().to_string()),
            location: Some("Remote".to_string()),
            posted_date: Some(today.clone()),
            excerpt: Some(project_excerpt(title)),
            apply_link: Some(String::new()),
            ..Default::default()
        });
        next_id += 1;
    }
    added
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub lines: usize,
    pub added: usize,
    pub total: usize,
}

/// Read `titles_file`, append the new projects and rewrite `projects.json`.
/// Existing entries are written back untouched.
pub fn import_titles_file(data_dir: &Path, titles_file: &Path, clock: &dyn Clock) -> Result<ImportSummary> {
    let raw_titles = fs::read_to_string(titles_file).map_err(|e| Error::io(titles_file, e))?;
    let lines: Vec<&str> = raw_titles.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let path = store::category_path(data_dir, Category::Projects);
    let mut entries: Vec<Value> = match fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str(&raw).map_err(|e| Error::json(&path, e))? {
            Value::Array(items) => items,
            _ => {
                return Err(Error::NotAnArray {
                    category: Category::Projects,
                    path,
                })
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(Error::io(&path, e)),
    };

    let existing: Vec<Listing> = entries
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect();
    let added = import_titles(&existing, lines.iter().copied(), clock);
    for listing in &added {
        entries.push(serde_json::to_value(listing).map_err(|e| Error::json(&path, e))?);
    }
    store::write_json_pretty(&path, &entries)?;

    let summary = ImportSummary {
        lines: lines.len(),
        added: added.len(),
        total: entries.len(),
    };
    info!(
        "Imported {} new project titles (from {} lines), {} projects total",
        summary.added, summary.lines, summary.total
    );
    Ok(summary)
}
