use std::collections::HashMap;
use std::path::PathBuf;

use url::form_urlencoded;
use url::Url;

use crate::model::Category;

pub const QUERY_PAGE: &str = "/opportunity.html";

/// Directory form: `/{category}/{slug}/`.
pub fn canonical_path(category: Category, slug: &str) -> String {
    format!("/{}/{}/", category, slug)
}

/// Query form: `/opportunity.html?category=..&slug=..`, percent-encoded.
pub fn query_path(category: Category, slug: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("category", category.as_str())
        .append_pair("slug", slug)
        .finish();
    format!("{}?{}", QUERY_PAGE, query)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub category: Category,
    pub slug: String,
}

/// Resolve either path form (or a full URL) to the page it names. Query
/// parameters take precedence over path segments; an unknown category routes
/// to jobs. `None` only when no slug can be recovered at all.
pub fn parse_page_request(path: &str) -> Option<PageRequest> {
    let base = Url::parse("http://localhost/").ok()?;
    let url = base.join(path.trim()).ok()?;

    let mut query_category = None;
    let mut query_slug = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "category" => query_category = Category::parse(&value),
            "slug" if !value.trim().is_empty() => query_slug = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let segments: Vec<String> = url
        .path_segments()
        .map(|parts| {
            parts
                .filter(|p| !p.is_empty())
                .map(|p| percent_decode(p))
                .collect()
        })
        .unwrap_or_default();

    let slug = query_slug.or_else(|| {
        segments.last().map(|last| {
            let lower = last.to_ascii_lowercase();
            if lower.ends_with(".html") {
                last[..last.len() - 5].to_string()
            } else {
                last.clone()
            }
        })
    })?;
    if slug.is_empty() {
        return None;
    }

    let category = query_category
        .or_else(|| segments.first().and_then(|s| Category::parse(s)))
        .unwrap_or(Category::Jobs);

    Some(PageRequest { category, slug })
}

fn percent_decode(segment: &str) -> String {
    form_urlencoded::parse(format!("x={}", segment).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| segment.to_string())
}

pub trait PathProbe {
    fn exists(&self, path: &str) -> bool;
}

/// Looks for `{root}{path}index.html` on disk.
pub struct DirProbe {
    root: PathBuf,
}

impl DirProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathProbe for DirProbe {
    fn exists(&self, path: &str) -> bool {
        self.root
            .join(path.trim_matches('/'))
            .join("index.html")
            .is_file()
    }
}

/// Memoized existence checks for pre-rendered directory pages.
pub struct PathCache<P: PathProbe> {
    probe: P,
    known: HashMap<String, bool>,
}

impl<P: PathProbe> PathCache<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            known: HashMap::new(),
        }
    }

    pub fn exists(&mut self, path: &str) -> bool {
        if let Some(&hit) = self.known.get(path) {
            return hit;
        }
        let found = self.probe.exists(path);
        self.known.insert(path.to_string(), found);
        found
    }

    /// Directory form when it has been rendered, query form otherwise.
    pub fn detail_href(&mut self, category: Category, slug: &str) -> String {
        let dir = canonical_path(category, slug);
        if self.exists(&dir) {
            dir
        } else {
            query_path(category, slug)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn both_forms() {
        assert_eq!(canonical_path(Category::Jobs, "data-analyst"), "/jobs/data-analyst/");
        assert_eq!(
            query_path(Category::Projects, "a b&c"),
            "/opportunity.html?category=projects&slug=a+b%26c"
        );
    }

    #[test]
    fn both_forms_resolve_to_same_page() {
        let dir = parse_page_request("/internships/ml-intern/").unwrap();
        let query = parse_page_request("/opportunity.html?category=internships&slug=ml-intern").unwrap();
        assert_eq!(dir, query);
        assert_eq!(dir.category, Category::Internships);
        assert_eq!(dir.slug, "ml-intern");
    }

    #[test]
    fn query_path_roundtrips() {
        let path = query_path(Category::Hackathons, "a b&c");
        let req = parse_page_request(&path).unwrap();
        assert_eq!(req.category, Category::Hackathons);
        assert_eq!(req.slug, "a b&c");
    }

    #[test]
    fn unknown_category_routes_to_jobs() {
        let req = parse_page_request("/opportunity.html?category=gigs&slug=x").unwrap();
        assert_eq!(req.category, Category::Jobs);
        let req = parse_page_request("/gigs/x.html").unwrap();
        assert_eq!(req, PageRequest { category: Category::Jobs, slug: "x".into() });
    }

    #[test]
    fn full_urls_and_empty_paths() {
        let req = parse_page_request("https://studenttechprojects.com/projects/iot-home/").unwrap();
        assert_eq!(req.category, Category::Projects);
        assert_eq!(parse_page_request("/"), None);
    }

    struct CountingProbe {
        present: HashSet<String>,
        calls: Cell<usize>,
    }

    impl PathProbe for CountingProbe {
        fn exists(&self, path: &str) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.present.contains(path)
        }
    }

    #[test]
    fn cache_probes_once_per_path() {
        let probe = CountingProbe {
            present: HashSet::from(["/jobs/a/".to_string()]),
            calls: Cell::new(0),
        };
        let mut cache = PathCache::new(probe);
        assert_eq!(cache.detail_href(Category::Jobs, "a"), "/jobs/a/");
        assert_eq!(cache.detail_href(Category::Jobs, "a"), "/jobs/a/");
        assert_eq!(
            cache.detail_href(Category::Jobs, "b"),
            "/opportunity.html?category=jobs&slug=b"
        );
        assert!(!cache.exists("/jobs/b/"));
        assert_eq!(cache.probe.calls.get(), 2);
    }
}
