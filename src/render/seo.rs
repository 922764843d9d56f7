use askama::Template;
use serde_json::{json, Map, Value};

use crate::classify::classify_text;
use crate::config::SiteMeta;
use crate::heuristics::{date, location, salary};
use crate::links;
use crate::model::{Category, Record};

use super::html::Head;

const SCHEMA_CONTEXT: &str = "https://schema.org/";

/// Everything that goes into `<head>` for one detail page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub heading: String,
    pub description: String,
    pub canonical_url: String,
    pub image_path: String,
    pub image_url: String,
    pub image_alt: String,
    pub json_ld: Value,
}

impl PageMetadata {
    pub fn head_html(&self) -> askama::Result<String> {
        // `</` inside a script block would end it early
        let json_ld = self.json_ld.to_string().replace("</", "<\\/");
        Head { meta: self, json_ld }.render()
    }
}

/// Category-specific summary used when a record has neither excerpt nor intro.
pub fn generated_description(data: &Record, category: Category) -> String {
    let title = data.text_or("title", "Opportunity");
    let company = data.text_or("company", "the organization");
    match category {
        Category::Projects => {
            let domain = data
                .text("domain")
                .unwrap_or_else(|| classify_text(&title).domain);
            format!(
                "{} is a college student project title in {} by {}. Build a structured solution with clear modules, outcomes, and future enhancements.",
                title, domain, company
            )
        }
        Category::Hackathons => format!(
            "{} is organizing {}. Review problem statement, eligibility, timeline, and submit before deadline.",
            company, title
        ),
        Category::Internships => format!(
            "{} is offering {}. Check eligibility, required skills, and application process.",
            company, title
        ),
        Category::Jobs => format!(
            "{} is hiring for {}. Check role details, qualifications, and official application steps.",
            company, title
        ),
    }
}

pub fn page_description(data: &Record, category: Category) -> String {
    data.first_text(&["excerpt", "intro"])
        .unwrap_or_else(|| generated_description(data, category))
}

pub fn page_metadata(data: &Record, category: Category, slug: &str, site: &SiteMeta) -> PageMetadata {
    let heading = data.text_or("title", "Opportunity");
    let description = page_description(data, category);
    let canonical_url = site.absolute(&links::canonical_path(category, slug));
    let image_path = data
        .text("image")
        .unwrap_or_else(|| format!("/images/opportunities/{}.svg", slug));
    let image_url = site.absolute(&image_path);
    let image_alt = data.text("imageAlt").unwrap_or_else(|| {
        format!(
            "{} - {}",
            heading,
            data.text("company").unwrap_or_else(|| site.name.clone())
        )
    });

    let json_ld = match category {
        Category::Jobs => job_posting(data, &description, &image_url),
        Category::Projects => article(data, &description, &image_url, &canonical_url, site),
        _ => web_page(&heading, &description, &canonical_url),
    };

    PageMetadata {
        title: format!("{} | {}", heading, site.name),
        heading,
        description,
        canonical_url,
        image_path,
        image_url,
        image_alt,
        json_ld,
    }
}

/// Insert only resolved values; nothing is ever emitted as null.
fn put(map: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(v) = value {
        map.insert(key.to_string(), v.into());
    }
}

fn job_posting(data: &Record, description: &str, image_url: &str) -> Value {
    let loc = location::parse_location(&data.text("location").unwrap_or_default());

    let mut org = Map::new();
    org.insert("@type".into(), json!("Organization"));
    org.insert("name".into(), json!(data.text_or("company", "Company")));
    put(&mut org, "sameAs", data.text("applyLink"));

    let mut ld = Map::new();
    ld.insert("@context".into(), json!(SCHEMA_CONTEXT));
    ld.insert("@type".into(), json!("JobPosting"));
    ld.insert("title".into(), json!(data.text_or("title", "Opportunity")));
    ld.insert(
        "description".into(),
        json!(data.text("jobDescription").unwrap_or_else(|| description.to_string())),
    );
    ld.insert("image".into(), json!(image_url));
    put(&mut ld, "datePosted", data.text("postedDate").and_then(|d| date::to_iso_date(&d)));
    put(&mut ld, "validThrough", data.text("lastDate").and_then(|d| date::to_iso_end_of_day(&d)));
    ld.insert("employmentType".into(), json!("FULL_TIME"));
    put(
        &mut ld,
        "baseSalary",
        data.text("salary").and_then(|s| salary::parse_salary(&s)).map(|s| s.to_schema()),
    );
    ld.insert("hiringOrganization".into(), Value::Object(org));
    ld.insert(
        "applicantLocationRequirements".into(),
        json!({ "@type": "Country", "name": loc.country.name }),
    );

    if loc.remote {
        ld.insert("jobLocationType".into(), json!("TELECOMMUTE"));
    } else {
        let mut address = Map::new();
        address.insert("@type".into(), json!("PostalAddress"));
        put(&mut address, "streetAddress", loc.street_address.clone());
        put(&mut address, "addressLocality", loc.locality.clone());
        put(&mut address, "addressRegion", loc.region.clone().or_else(|| loc.locality.clone()));
        put(&mut address, "postalCode", loc.postal_code.clone());
        address.insert("addressCountry".into(), json!(loc.country.code));
        ld.insert(
            "jobLocation".into(),
            json!({ "@type": "Place", "address": Value::Object(address) }),
        );
    }

    Value::Object(ld)
}

fn article(data: &Record, description: &str, image_url: &str, canonical_url: &str, site: &SiteMeta) -> Value {
    let mut ld = Map::new();
    ld.insert("@context".into(), json!(SCHEMA_CONTEXT));
    ld.insert("@type".into(), json!("Article"));
    ld.insert("headline".into(), json!(data.text_or("title", "Project")));
    ld.insert("description".into(), json!(description));
    ld.insert("image".into(), json!(image_url));
    put(&mut ld, "datePublished", data.text("postedDate").and_then(|d| date::to_iso_date(&d)));
    ld.insert(
        "author".into(),
        json!({ "@type": "Organization", "name": data.text("company").unwrap_or_else(|| site.name.clone()) }),
    );
    ld.insert("mainEntityOfPage".into(), json!(canonical_url));
    Value::Object(ld)
}

fn web_page(name: &str, description: &str, canonical_url: &str) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "WebPage",
        "name": name,
        "description": description,
        "url": canonical_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn job_posting_with_salary_and_address() {
        let data = record(json!({
            "title": "Data Analyst",
            "company": "Acme",
            "location": "Bengaluru, Karnataka, 560001",
            "postedDate": "2026-02-20",
            "lastDate": "2026-03-15",
            "salary": "₹3-5 LPA",
            "applyLink": "https://acme.com/apply",
            "excerpt": "Analyse data."
        }));
        let meta = page_metadata(&data, Category::Jobs, "data-analyst", &SiteMeta::default());
        let ld = &meta.json_ld;
        assert_eq!(ld["@type"], "JobPosting");
        assert_eq!(ld["datePosted"], "2026-02-20");
        assert_eq!(ld["validThrough"], "2026-03-15T23:59:59Z");
        assert_eq!(ld["baseSalary"]["value"]["minValue"], 300_000);
        assert_eq!(ld["hiringOrganization"]["sameAs"], "https://acme.com/apply");
        assert_eq!(ld["jobLocation"]["address"]["postalCode"], "560001");
        assert_eq!(ld["jobLocation"]["address"]["addressCountry"], "IN");
        assert!(ld.get("jobLocationType").is_none());
        assert_eq!(meta.canonical_url, "https://studenttechprojects.com/jobs/data-analyst/");
        assert_eq!(meta.title, "Data Analyst | StudentTechProjects");
    }

    #[test]
    fn unresolved_fields_are_omitted() {
        let data = record(json!({
            "title": "Remote Dev",
            "location": "Remote, Worldwide",
            "postedDate": "ASAP",
            "salary": "Competitive"
        }));
        let ld = page_metadata(&data, Category::Jobs, "remote-dev", &SiteMeta::default()).json_ld;
        assert_eq!(ld["jobLocationType"], "TELECOMMUTE");
        for key in ["datePosted", "validThrough", "baseSalary", "jobLocation"] {
            assert!(ld.get(key).is_none(), "{key} should be omitted");
        }
        assert!(ld["hiringOrganization"].get("sameAs").is_none());
        assert!(!ld.to_string().contains("null"));
    }

    #[test]
    fn schema_type_by_category() {
        let data = record(json!({ "title": "Smart Home IoT", "postedDate": "2026-02-20" }));
        let site = SiteMeta::default();
        let project = page_metadata(&data, Category::Projects, "smart-home-iot", &site).json_ld;
        assert_eq!(project["@type"], "Article");
        assert_eq!(project["datePublished"], "2026-02-20");
        assert_eq!(project["author"]["name"], "StudentTechProjects");
        let hack = page_metadata(&data, Category::Hackathons, "h", &site).json_ld;
        assert_eq!(hack["@type"], "WebPage");
        assert_eq!(hack["url"], "https://studenttechprojects.com/hackathons/h/");
    }

    #[test]
    fn description_and_image_fallbacks() {
        let data = record(json!({ "title": "ML Intern", "company": "Acme" }));
        let meta = page_metadata(&data, Category::Internships, "ml-intern", &SiteMeta::default());
        assert_eq!(
            meta.description,
            "Acme is offering ML Intern. Check eligibility, required skills, and application process."
        );
        assert_eq!(meta.image_path, "/images/opportunities/ml-intern.svg");
        assert_eq!(meta.image_alt, "ML Intern - Acme");
    }

    #[test]
    fn deterministic() {
        let data = record(json!({ "title": "A", "excerpt": "B" }));
        let site = SiteMeta::default();
        assert_eq!(
            page_metadata(&data, Category::Jobs, "a", &site),
            page_metadata(&data, Category::Jobs, "a", &site)
        );
    }

    #[test]
    fn head_contains_social_tags() {
        let data = record(json!({ "title": "Tom & Jerry </script>" }));
        let head = page_metadata(&data, Category::Hackathons, "tj", &SiteMeta::default())
            .head_html()
            .unwrap();
        assert!(head.contains("<title>Tom &amp; Jerry &lt;/script&gt; | StudentTechProjects</title>"));
        assert!(head.contains("property=\"og:url\""));
        assert!(head.contains("name=\"twitter:card\" content=\"summary_large_image\""));
        assert_eq!(head.matches("application/ld+json").count(), 1);
        assert!(!head.contains("</script> |"));
        // the title inside the JSON-LD stays raw JSON, with `</` broken up
        assert!(head.contains("Tom & Jerry <\\/script>"));
    }
}
