//! Flat-file data: one JSON array per category, one optional JSON object per
//! slug under `content/`. Files are read whole and rewritten whole.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::heuristics::text::is_safe_slug;
use crate::model::{Category, Listing, Record};

pub fn category_path(data_dir: &Path, category: Category) -> PathBuf {
    data_dir.join(category.file_name())
}

pub fn content_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("content")
}

pub fn detail_path(data_dir: &Path, slug: &str) -> PathBuf {
    content_dir(data_dir).join(format!("{}.json", slug))
}

/// Decode a category file body. Non-object elements are skipped.
pub fn parse_listings(raw: &str, category: Category, path: &Path) -> Result<Vec<Listing>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Error::json(path, e))?;
    let Value::Array(items) = value else {
        return Err(Error::NotAnArray {
            category,
            path: path.to_path_buf(),
        });
    };

    let total = items.len();
    let listings: Vec<Listing> = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if listings.len() < total {
        debug!("{}: skipped {} malformed entries", path.display(), total - listings.len());
    }
    Ok(listings)
}

pub fn load_category(data_dir: &Path, category: Category) -> Result<Vec<Listing>> {
    let path = category_path(data_dir, category);
    let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    parse_listings(&raw, category, &path)
}

pub async fn load_category_async(data_dir: &Path, category: Category) -> Result<Vec<Listing>> {
    let path = category_path(data_dir, category);
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io(&path, e))?;
    parse_listings(&raw, category, &path)
}

/// Every category's listings plus which categories failed to load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lists: BTreeMap<Category, Vec<Listing>>,
    failed: BTreeSet<Category>,
}

impl Catalog {
    /// Record one category's load result; a failure becomes an empty list.
    pub fn insert(&mut self, category: Category, result: Result<Vec<Listing>>) {
        match result {
            Ok(list) => {
                self.failed.remove(&category);
                self.lists.insert(category, list);
            }
            Err(e) => {
                if e.is_missing() {
                    warn!("{} data missing: {}", category, e);
                } else {
                    warn!("{} data unreadable: {}", category, e);
                }
                self.failed.insert(category);
                self.lists.insert(category, Vec::new());
            }
        }
    }

    pub fn listings(&self, category: Category) -> &[Listing] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn failed(&self, category: Category) -> bool {
        self.failed.contains(&category)
    }

    /// Every listing, in category order.
    pub fn all(&self) -> Vec<Listing> {
        Category::ALL
            .iter()
            .flat_map(|c| self.listings(*c).iter().cloned())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugReport {
    pub missing: usize,
    pub duplicates: Vec<String>,
}

/// Listings without a slug, and slugs used more than once (sorted).
pub fn slug_report(listings: &[Listing]) -> SlugReport {
    SlugReport {
        missing: listings.iter().filter(|l| l.slug().is_none()).count(),
        duplicates: listings
            .iter()
            .filter_map(Listing::slug)
            .duplicates()
            .sorted()
            .map(str::to_string)
            .collect(),
    }
}

/// Load the four category files concurrently. Each failure is isolated to its
/// own category.
pub async fn load_all(data_dir: &Path) -> Catalog {
    let (jobs, internships, hackathons, projects) = tokio::join!(
        load_category_async(data_dir, Category::Jobs),
        load_category_async(data_dir, Category::Internships),
        load_category_async(data_dir, Category::Hackathons),
        load_category_async(data_dir, Category::Projects),
    );

    let mut catalog = Catalog::default();
    catalog.insert(Category::Jobs, jobs);
    catalog.insert(Category::Internships, internships);
    catalog.insert(Category::Hackathons, hackathons);
    catalog.insert(Category::Projects, projects);
    catalog
}

/// `Ok(None)` when the slug simply has no detail file, or is not a safe slug.
pub fn load_detail(data_dir: &Path, slug: &str) -> Result<Option<Record>> {
    if !is_safe_slug(slug) {
        warn!("not reading detail for unsafe slug {:?}", slug);
        return Ok(None);
    }
    let path = detail_path(data_dir, slug);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(&path, e)),
    };
    let record: Record = serde_json::from_str(&raw).map_err(|e| Error::json(&path, e))?;
    Ok(Some(record))
}

/// Detail record for rendering; unreadable files are logged and ignored.
pub fn load_detail_lenient(data_dir: &Path, slug: &str) -> Option<Record> {
    match load_detail(data_dir, slug) {
        Ok(record) => record,
        Err(e) => {
            warn!("ignoring detail for {}: {}", slug, e);
            None
        }
    }
}

/// Pretty JSON (two-space indent) with a trailing newline; parent dirs are created.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut body = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    body.push('\n');
    fs::write(path, body).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    pub fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data")
    }

    /// Fresh, empty directory under the system temp dir.
    pub fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("opportunity_pages_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{fixture_dir, scratch_dir};
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_fixture_category() {
        let jobs = load_category(&fixture_dir(), Category::Jobs).unwrap();
        assert!(jobs.len() >= 3);
        assert!(jobs.iter().all(|j| j.kind.as_deref() == Some("job")));
    }

    #[tokio::test]
    async fn load_all_reads_every_category() {
        let catalog = load_all(&fixture_dir()).await;
        for category in Category::ALL {
            assert!(!catalog.failed(category), "{category}");
            assert!(!catalog.listings(category).is_empty(), "{category}");
        }
        assert_eq!(catalog.all().len(), catalog.total());
    }

    #[tokio::test]
    async fn one_bad_category_does_not_sink_the_rest() {
        let dir = scratch_dir("partial");
        fs::write(dir.join("jobs.json"), r#"[{"title": "A", "slug": "a", "type": "job"}]"#).unwrap();
        fs::write(dir.join("internships.json"), "{ not json").unwrap();
        fs::write(dir.join("hackathons.json"), r#"{"title": "not an array"}"#).unwrap();

        let catalog = load_all(&dir).await;
        assert_eq!(catalog.listings(Category::Jobs).len(), 1);
        assert!(!catalog.failed(Category::Jobs));
        for category in [Category::Internships, Category::Hackathons, Category::Projects] {
            assert!(catalog.failed(category));
            assert!(catalog.listings(category).is_empty());
        }
    }

    #[test]
    fn error_kinds() {
        let dir = scratch_dir("errors");
        let missing = load_category(&dir, Category::Projects).unwrap_err();
        assert!(missing.is_missing());

        fs::write(dir.join("projects.json"), "{}").unwrap();
        let err = load_category(&dir, Category::Projects).unwrap_err();
        assert!(matches!(err, Error::NotAnArray { category: Category::Projects, .. }));
        assert!(!err.is_missing());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let list = parse_listings(r#"[{"slug": "a"}, 5, "x", {"slug": "b"}]"#, Category::Jobs, Path::new("jobs.json")).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn detail_missing_vs_present() {
        let dir = fixture_dir();
        assert_eq!(load_detail(&dir, "no-such-slug").unwrap(), None);
        let detail = load_detail(&dir, "data-analyst").unwrap().unwrap();
        assert!(!detail.list("responsibilities").is_empty());
    }

    #[test]
    fn unsafe_slug_never_leaves_content_dir() {
        let dir = scratch_dir("traversal");
        fs::create_dir_all(dir.join("content")).unwrap();
        fs::write(dir.join("secret.json"), r#"{"title": "outside"}"#).unwrap();
        assert_eq!(load_detail(&dir, "../secret").unwrap(), None);
        assert_eq!(load_detail_lenient(&dir, "../secret"), None);
    }

    #[test]
    fn slug_report_counts_gaps_and_repeats() {
        let list = parse_listings(
            r#"[{"slug": "b"}, {"slug": "a"}, {"slug": " "}, {}, {"slug": "b"}, {"slug": "a"}, {"slug": "b"}]"#,
            Category::Jobs,
            Path::new("jobs.json"),
        )
        .unwrap();
        let report = slug_report(&list);
        assert_eq!(report.missing, 2);
        assert_eq!(report.duplicates, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn pretty_json_has_trailing_newline() {
        let dir = scratch_dir("write");
        let path = dir.join("nested/out.json");
        write_json_pretty(&path, &json!({ "a": [1, 2] })).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert_eq!(body, "{\n  \"a\": [\n    1,\n    2\n  ]\n}\n");
    }
}
