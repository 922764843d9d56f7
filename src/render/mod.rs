//! Detail page rendering: merged record in, section tree + HTML + head metadata out.
//!
//! Rendering is a pure function of the merged record, its category and slug, the
//! related listings and the site settings. Loading and writing live elsewhere.

pub mod html;
pub mod labels;
pub mod project;
pub mod related;
pub mod seo;

use askama::Template;
use serde_json::Value;

use crate::config::SiteMeta;
use crate::heuristics::date;
use crate::links;
use crate::merge::merge;
use crate::model::{or_placeholder, Category, Listing, Record};

use labels::{labels, CategoryLabels};
use seo::PageMetadata;

pub const NOT_FOUND_MESSAGE: &str = "Content not found for this page.";
pub const FAILED_MESSAGE: &str = "Failed to load content. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleItem {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub week: String,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkCard {
    pub title: String,
    pub subtitle: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub src: String,
    pub alt: String,
    pub fallback: String,
}

/// Two-column table, e.g. tool category to tools.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueTable {
    pub key_header: String,
    pub value_header: String,
    pub rows: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionLink {
    pub label: String,
    pub href: String,
    /// Opens in a new tab.
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    /// Never empty; see [`Block::bullets`].
    Bullets(Vec<String>),
    Facts(Vec<(String, String)>),
    StatCards(Vec<(String, String)>),
    Image(Figure),
    Faq(Vec<FaqEntry>),
    Steps(Vec<Step>),
    Modules(Vec<ModuleItem>),
    Table(KeyValueTable),
    Milestones(Vec<Milestone>),
    Checklist(Vec<String>),
    Cards(Vec<LinkCard>),
    Action(ActionLink),
}

impl Block {
    /// A bullet list that falls back to a single `fallback` item when `items` is empty.
    pub fn bullets(items: Vec<String>, fallback: &str) -> Block {
        if items.is_empty() {
            Block::Bullets(vec![fallback.to_string()])
        } else {
            Block::Bullets(items)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: String,
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: &str, title: Option<&str>, blocks: Vec<Block>) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.map(str::to_string),
            blocks,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailPage {
    pub category: Category,
    pub slug: String,
    pub sections: Vec<Section>,
    pub html: String,
    pub metadata: PageMetadata,
}

impl DetailPage {
    pub fn section(&self, kind: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Terminal states of one detail request.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(Box<DetailPage>),
    NotFound { category: Category, slug: String },
    Failed { reason: String },
}

impl RenderOutcome {
    /// Page body for display: the article, or the matching error message.
    pub fn body_html(&self) -> askama::Result<String> {
        match self {
            RenderOutcome::Rendered(page) => Ok(page.html.clone()),
            RenderOutcome::NotFound { .. } => html::Message { message: NOT_FOUND_MESSAGE }.render(),
            RenderOutcome::Failed { .. } => html::Message { message: FAILED_MESSAGE }.render(),
        }
    }
}

/// Find `slug` in its category list, merge the optional detail record over it
/// and render. A missing slug is `NotFound`, never a sparse page.
pub fn resolve_and_render(
    listings: &[Listing],
    category: Category,
    slug: &str,
    detail: Option<&Record>,
    site: &SiteMeta,
    related_limit: usize,
) -> RenderOutcome {
    let slug = slug.trim();
    let Some(base) = listings.iter().find(|l| !slug.is_empty() && l.slug() == Some(slug)) else {
        return RenderOutcome::NotFound {
            category,
            slug: slug.to_string(),
        };
    };

    let base = base.to_record();
    let merged = match detail {
        Some(detail) => merge(&base, detail),
        None => base,
    };
    let related = related::related(listings, slug, related_limit);
    match render_detail_page(&merged, category, slug, &related, site) {
        Ok(page) => RenderOutcome::Rendered(Box::new(page)),
        Err(e) => RenderOutcome::Failed { reason: e.to_string() },
    }
}

pub fn render_detail_page(
    merged: &Record,
    category: Category,
    slug: &str,
    related: &[Listing],
    site: &SiteMeta,
) -> askama::Result<DetailPage> {
    let labels = labels(category);
    let metadata = seo::page_metadata(merged, category, slug, site);

    let mut sections = vec![header_section(merged, category, &metadata)];
    if category == Category::Projects {
        sections.extend(project::project_sections(merged, &metadata));
    } else {
        sections.extend(standard_sections(merged, category, labels));
    }
    let mut tips = merged.list("tips");
    if tips.is_empty() {
        tips = labels.tips_fallback.iter().map(|s| s.to_string()).collect();
    }
    sections.push(Section::new("tips", Some(labels.tips_title), vec![Block::Bullets(tips)]));
    sections.push(Section::new(
        "faq",
        Some("Frequently Asked Questions"),
        vec![Block::Faq(faq_entries(merged))],
    ));
    if !related.is_empty() {
        sections.push(Section::new(
            "related",
            Some("Related Opportunities"),
            vec![Block::Cards(related_cards(related, category))],
        ));
    }

    let html = html::Article {
        heading: &metadata.heading,
        sections: &sections,
    }
    .render()?;
    Ok(DetailPage {
        category,
        slug: slug.to_string(),
        sections,
        html,
        metadata,
    })
}

fn header_section(data: &Record, category: Category, meta: &PageMetadata) -> Section {
    let mut blocks = vec![
        Block::Paragraph(format!(
            "Published on {}",
            date::display(data.text("postedDate").as_deref())
        )),
        Block::Image(Figure {
            src: meta.image_path.clone(),
            alt: meta.image_alt.clone(),
            fallback: category.default_image(),
        }),
    ];
    if category != Category::Projects {
        if let Some(intro) = data.first_text(&["intro", "excerpt"]) {
            blocks.push(Block::Paragraph(intro));
        }
        blocks.push(Block::StatCards(vec![
            ("Role Type".into(), category.label().into()),
            ("Company / Organizer".into(), data.text_or("company", "Not specified")),
            ("Location".into(), data.text_or("location", "Not specified")),
        ]));
    }
    Section::new("header", None, blocks)
}

/// Company, Type, [Qualification, Experience, Batch, Salary], Location, Last Date.
pub fn overview_rows(data: &Record, category: Category) -> Vec<(String, String)> {
    let listing = data.to_listing();
    let mut rows = vec![
        ("Company".to_string(), or_placeholder(&listing.company, "Not specified").to_string()),
        ("Type".to_string(), category.label().to_string()),
    ];
    if matches!(category, Category::Jobs | Category::Internships) {
        for (label, value) in [
            ("Qualification", &listing.qualification),
            ("Experience", &listing.experience),
            ("Batch", &listing.batch),
            ("Salary", &listing.salary),
        ] {
            rows.push((label.to_string(), or_placeholder(value, "Not specified").to_string()));
        }
    }
    rows.push(("Location".into(), or_placeholder(&listing.location, "Not specified").to_string()));
    rows.push(("Last Date".into(), data.text_or("lastDate", "Not specified")));
    rows
}

fn standard_sections(data: &Record, category: Category, labels: &CategoryLabels) -> Vec<Section> {
    let description = data
        .first_text(&["jobDescription", "description", "excerpt"])
        .unwrap_or_else(|| seo::generated_description(data, category));
    let company = data.text_or("company", "This organization");
    let about = data.text("aboutCompany").unwrap_or_else(|| {
        format!(
            "{} offers opportunities for students to build practical skills and real-world experience. Check the official link for complete details and updates.",
            company
        )
    });

    let mut sections = vec![
        Section::new("overview", Some("Overview"), vec![Block::Facts(overview_rows(data, category))]),
        Section::new(
            "description",
            Some(labels.description_title),
            vec![Block::Paragraph(description)],
        ),
        Section::new("about", Some("About the Company / Organizer"), vec![Block::Paragraph(about)]),
        Section::new(
            "responsibilities",
            Some(labels.responsibilities_title),
            vec![Block::bullets(data.list("responsibilities"), labels.list_fallback)],
        ),
        Section::new(
            "qualifications",
            Some(labels.qualifications_title),
            vec![Block::bullets(data.list("minQualifications"), labels.list_fallback)],
        ),
    ];

    let preferred = data.list("prefQualifications");
    if !preferred.is_empty() {
        sections.push(Section::new("preferred", Some(labels.preferred_title), vec![Block::Bullets(preferred)]));
    }

    sections.push(Section::new(
        "timeline",
        Some(labels.timeline_title),
        vec![Block::Bullets(vec![
            format!("Posted on: {}", date::display(data.text("postedDate").as_deref())),
            format!("Last date: {}", data.text_or("lastDate", "Not specified")),
            "Shortlisting and next steps are communicated by the organizer/company.".to_string(),
        ])],
    ));

    let mut apply = vec![Block::Paragraph(data.text_or("howToApply", labels.apply_fallback))];
    if let Some(link) = data.text("applyLink") {
        apply.push(Block::Action(ActionLink {
            label: "Apply Now".into(),
            href: link,
            external: true,
        }));
    }
    sections.push(Section::new("apply", Some(labels.apply_title), apply));
    sections
}

/// Explicit `faq` entries (`q`/`a` or `question`/`answer`), else three generated ones.
pub fn faq_entries(data: &Record) -> Vec<FaqEntry> {
    let explicit: Vec<FaqEntry> = data
        .items("faq")
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => {
                let entry = Record::from(map.clone());
                let question = entry.first_text(&["q", "question"]);
                let answer = entry.first_text(&["a", "answer"]);
                if question.is_none() && answer.is_none() {
                    return None;
                }
                Some(FaqEntry {
                    question: question.unwrap_or_else(|| "Question".into()),
                    answer: answer.unwrap_or_else(|| "Answer will be updated soon.".into()),
                })
            }
            _ => None,
        })
        .collect();
    if !explicit.is_empty() {
        return explicit;
    }

    let who = match data.text("qualification") {
        Some(q) => format!(
            "Candidates with {} who meet the listed eligibility criteria can apply.",
            q
        ),
        None => "Candidates meeting the listed qualifications and eligibility criteria can apply.".into(),
    };
    let where_ = match data.text("location") {
        Some(l) => format!("Location mentioned: {}. Please verify on the official page.", l),
        None => "Please check the official link for location details.".into(),
    };
    let how = data.text("howToApply").unwrap_or_else(|| {
        if data.text("applyLink").is_some() {
            "Use the official apply link provided on this page.".into()
        } else {
            "Follow the instructions shared by the organizer/company.".into()
        }
    });

    vec![
        FaqEntry {
            question: "Who can apply for this opportunity?".into(),
            answer: who,
        },
        FaqEntry {
            question: "Is this opportunity remote or on-site?".into(),
            answer: where_,
        },
        FaqEntry {
            question: "How should I apply?".into(),
            answer: how,
        },
    ]
}

fn related_cards(related: &[Listing], category: Category) -> Vec<LinkCard> {
    related
        .iter()
        .filter_map(|item| {
            let slug = item.slug()?;
            Some(LinkCard {
                title: or_placeholder(&item.title, "Opportunity").to_string(),
                subtitle: format!(
                    "{} • {}",
                    or_placeholder(&item.company, "Company"),
                    date::display(item.posted_date.as_deref())
                ),
                href: links::canonical_path(category, slug),
            })
        })
        .collect()
}
