use serde_json::Value;
use url::form_urlencoded;

use crate::classify::infer_project_meta;
use crate::model::Record;

use super::seo::PageMetadata;
use super::{ActionLink, Block, KeyValueTable, Milestone, ModuleItem, Section, Step};

const MODULE_DESCRIPTION_FALLBACK: &str = "Module details will be expanded based on project scope.";

const OBJECTIVES: &[&str] = &[
    "Analyze the problem domain using available historical and contextual data.",
    "Design and implement a robust project solution workflow.",
    "Evaluate outcomes using measurable technical and business metrics.",
    "Build a usable dashboard or output layer for decision-making support.",
];

const METHODOLOGY: &[(&str, [&str; 2])] = &[
    ("Step 1: Data Collection", [
        "Collect historical and operational data relevant to project scope.",
        "Gather external factors where applicable.",
    ]),
    ("Step 2: Data Preprocessing", [
        "Handle missing values and outliers.",
        "Normalize and transform the data for model/logic readiness.",
    ]),
    ("Step 3: Core Model / Logic Design", [
        "Implement baseline approach for project objectives.",
        "Define evaluation baseline and expected output format.",
    ]),
    ("Step 4: Advanced Implementation", [
        "Add advanced models or optimization techniques.",
        "Improve performance and reliability through tuning.",
    ]),
    ("Step 5: Evaluation", [
        "Measure output quality with objective metrics.",
        "Compare methods and select best-performing approach.",
    ]),
    ("Step 6: Visualization & Dashboard", [
        "Create visual insights for trends, outputs, and comparisons.",
        "Build user-friendly dashboard pages for final presentation.",
    ]),
];

const ARCHITECTURE: &[&str] = &[
    "Data Input Layer",
    "Data Preprocessing Module",
    "Core Processing / Modeling Module",
    "Evaluation Module",
    "Visualization & Web Dashboard",
];

const MODULES: &[(&str, &str)] = &[
    ("Core Module", "Implements the primary project workflow and business logic."),
    ("Interface Module", "Provides user-facing screens and interactions."),
    ("Data Module", "Handles data ingestion, validation, persistence, and retrieval."),
];

const OUTCOMES: &[&str] = &[
    "Deliver accurate and actionable project outputs.",
    "Improve planning and decision support.",
    "Reduce inefficiencies in execution.",
    "Provide reusable and scalable project structure.",
];

const TOOLS: &[(&str, &str)] = &[
    ("Programming Language", "Python / JavaScript"),
    ("Libraries / Frameworks", "Pandas, NumPy, Scikit-learn, React (as needed)"),
    ("Visualization", "Matplotlib, Seaborn, Plotly / Chart.js"),
    ("Deployment", "Flask / Streamlit / Node.js"),
    ("Database", "MongoDB / PostgreSQL / CSV"),
];

const INNOVATION: &[&str] = &[
    "Hybrid approach combining statistical and ML techniques where applicable.",
    "Comparative evaluation for selecting best solution path.",
    "Dashboard-driven insights for practical decision support.",
];

const FUTURE: &[&str] = &[
    "Integrate real-time external APIs.",
    "Add recommendation/automation features.",
    "Enable deeper module-level predictions and alerts.",
    "Integrate with enterprise management systems.",
];

const SKILLS: &[&str] = &[
    "Problem decomposition and project scoping",
    "Architecture design and implementation",
    "Testing, evaluation, and result storytelling",
    "Portfolio presentation and technical communication",
];

const MILESTONES: &[(&str, &str)] = &[
    ("Week 1-2", "Requirement analysis, dataset/resources setup, architecture planning"),
    ("Week 3-4", "Core module development and baseline output generation"),
    ("Week 5-6", "Advanced improvements, optimization, and integration"),
    ("Week 7-8", "Evaluation, dashboard, documentation, and final presentation"),
];

const REQUIRED_MODULES: &[&str] = &[
    "Frontend framework/library for UI development.",
    "Backend API/service layer for business logic.",
    "Database and deployment tooling as per project scope.",
];

const DELIVERABLES: &[&str] = &[
    "Source code repository with clean README",
    "Architecture diagram and module documentation",
    "Results dashboard/screenshots",
    "Final presentation or demo video",
];

const RESUME: &[&str] = &[
    "Built an end-to-end project with structured modules and measurable outcomes.",
    "Implemented evaluation-driven improvements and presented comparative results.",
    "Created production-style documentation and project dashboard for decision support.",
];

const WHY_GOOD: &[&str] = &[
    "Strong technical foundation and real-world relevance.",
    "Clear evaluation metrics and measurable outcomes.",
    "High industry applicability and portfolio value.",
];

/// A project page's content with every gap filled.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTemplate {
    pub introduction: String,
    pub problem_statement: String,
    pub domain: String,
    pub duration: String,
    pub difficulty: String,
    pub team_size: String,
    pub commitment: String,
    pub objectives: Vec<String>,
    pub methodology: Vec<Step>,
    pub architecture: Vec<String>,
    pub modules: Vec<ModuleItem>,
    pub required_modules: Vec<String>,
    pub outcomes: Vec<String>,
    pub tools: Vec<(String, String)>,
    pub innovation: Vec<String>,
    pub future_enhancements: Vec<String>,
    pub skills: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub deliverables: Vec<String>,
    pub resume_points: Vec<String>,
    pub why_good: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn list_or(data: &Record, key: &str, fallback: &[&str]) -> Vec<String> {
    let items = data.list(key);
    if items.is_empty() {
        owned(fallback)
    } else {
        items
    }
}

/// Object items as records, bare strings passed to `from_text`.
fn structured<T>(data: &Record, key: &str, from_text: impl Fn(String) -> T, from_obj: impl Fn(&Record) -> T) -> Vec<T> {
    data.items(key)
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(from_text(s.trim().to_string())),
            Value::Object(map) => Some(from_obj(&Record::from(map.clone()))),
            _ => None,
        })
        .collect()
}

impl ProjectTemplate {
    pub fn from_record(data: &Record) -> Self {
        let title = data.text_or("title", "Project");
        let company = data.text_or("company", "Organizer");
        let meta = infer_project_meta(&data.to_listing());

        let mut methodology = structured(
            data,
            "projectMethodology",
            |title| Step { title, points: Vec::new() },
            |r| Step {
                title: r.text_or("title", "Step"),
                points: r.list("points"),
            },
        );
        if methodology.is_empty() {
            methodology = METHODOLOGY
                .iter()
                .map(|(title, points)| Step {
                    title: title.to_string(),
                    points: owned(points),
                })
                .collect();
        }
        for step in &mut methodology {
            if step.points.is_empty() {
                step.points.push("Details will be updated soon.".into());
            }
        }

        let mut modules = structured(
            data,
            "projectModules",
            |name| ModuleItem {
                name,
                description: MODULE_DESCRIPTION_FALLBACK.into(),
            },
            |r| ModuleItem {
                name: r.text_or("name", "Module"),
                description: r.text_or("description", MODULE_DESCRIPTION_FALLBACK),
            },
        );
        if modules.is_empty() {
            modules = MODULES
                .iter()
                .map(|(name, description)| ModuleItem {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect();
        }

        let mut tools = structured(
            data,
            "toolsAndTechnologies",
            |tools| ("Tools".to_string(), tools),
            |r| (r.text_or("category", "Category"), r.text_or("tools", "Tools")),
        );
        if tools.is_empty() {
            tools = TOOLS.iter().map(|(c, t)| (c.to_string(), t.to_string())).collect();
        }

        let mut milestones = structured(
            data,
            "weeklyMilestones",
            |goal| Milestone { week: "Week".into(), goal },
            |r| Milestone {
                week: r.text_or("week", "Week"),
                goal: r.text_or("goal", "Milestone details"),
            },
        );
        if milestones.is_empty() {
            milestones = MILESTONES
                .iter()
                .map(|(week, goal)| Milestone {
                    week: week.to_string(),
                    goal: goal.to_string(),
                })
                .collect();
        }

        Self {
            introduction: data.text("projectIntroduction").unwrap_or_else(|| {
                format!(
                    "{} is a college student project title designed to solve practical {} problems through a structured implementation approach.",
                    title, meta.domain
                )
            }),
            problem_statement: data.text("problemStatement").unwrap_or_else(|| {
                format!(
                    "{} needs a scalable and measurable {} solution with clear architecture and execution milestones.",
                    company, meta.domain
                )
            }),
            domain: meta.domain,
            duration: meta.duration,
            difficulty: meta.difficulty,
            team_size: meta.team_size,
            commitment: data.text_or("commitment", "6-8 hours/week"),
            objectives: list_or(data, "projectObjectives", OBJECTIVES),
            methodology,
            architecture: list_or(data, "systemArchitecture", ARCHITECTURE),
            modules,
            required_modules: list_or(data, "requiredModules", REQUIRED_MODULES),
            outcomes: list_or(data, "expectedOutcomes", OUTCOMES),
            tools,
            innovation: list_or(data, "innovationAspect", INNOVATION),
            future_enhancements: list_or(data, "futureEnhancements", FUTURE),
            skills: list_or(data, "skillsYouGain", SKILLS),
            milestones,
            deliverables: list_or(data, "projectDeliverables", DELIVERABLES),
            resume_points: list_or(data, "resumeHighlights", RESUME),
            why_good: list_or(data, "whyGoodProject", WHY_GOOD),
        }
    }
}

pub fn architecture_search_url(title: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("tbm", "isch")
        .append_pair("q", &format!("{} system architecture diagram", title))
        .finish();
    format!("https://www.google.com/search?{}", query)
}

pub fn project_sections(data: &Record, meta: &PageMetadata) -> Vec<Section> {
    let p = ProjectTemplate::from_record(data);
    let search_url = architecture_search_url(&data.text_or("title", "project"));

    vec![
        Section::new(
            "stats",
            None,
            vec![
                Block::StatCards(vec![
                    ("Domain".into(), p.domain),
                    ("Duration".into(), p.duration),
                    ("Difficulty".into(), p.difficulty),
                    ("Team Size".into(), p.team_size),
                ]),
                Block::Facts(vec![("Weekly Commitment".into(), p.commitment)]),
            ],
        ),
        Section::new(
            "resources",
            Some("Share & Resources"),
            vec![
                Block::Action(ActionLink {
                    label: "Project Link".into(),
                    href: meta.canonical_url.clone(),
                    external: false,
                }),
                Block::Action(ActionLink {
                    label: "Open Google Architecture Images".into(),
                    href: search_url.clone(),
                    external: true,
                }),
            ],
        ),
        Section::new("intro", Some("1. Introduction"), vec![Block::Paragraph(p.introduction)]),
        Section::new("problem", Some("2. Problem Statement"), vec![Block::Paragraph(p.problem_statement)]),
        Section::new(
            "objectives",
            Some("3. Objectives of the Project"),
            vec![Block::bullets(p.objectives, "Objectives will be updated soon.")],
        ),
        Section::new("methodology", Some("4. Proposed Methodology"), vec![Block::Steps(p.methodology)]),
        Section::new(
            "architecture",
            Some("5. System Architecture Overview"),
            vec![
                Block::bullets(p.architecture, "Architecture will be updated soon."),
                Block::Action(ActionLink {
                    label: "Open Google Image Results".into(),
                    href: search_url,
                    external: true,
                }),
            ],
        ),
        Section::new("modules", Some("6. Project Modules"), vec![Block::Modules(p.modules)]),
        Section::new(
            "required-modules",
            Some("Necessary Modules / Stack"),
            vec![Block::bullets(p.required_modules, "Necessary modules will be updated soon.")],
        ),
        Section::new(
            "skills",
            Some("Student Skills You Will Gain"),
            vec![Block::bullets(p.skills, "Skills will be updated soon.")],
        ),
        Section::new("milestones", Some("Weekly Milestones"), vec![Block::Milestones(p.milestones)]),
        Section::new(
            "outcomes",
            Some("7. Expected Outcomes"),
            vec![Block::bullets(p.outcomes, "Expected outcomes will be updated soon.")],
        ),
        Section::new(
            "tools",
            Some("8. Tools & Technologies"),
            vec![Block::Table(KeyValueTable {
                key_header: "Category".into(),
                value_header: "Tools".into(),
                rows: p.tools,
            })],
        ),
        Section::new(
            "innovation",
            Some("9. Innovation Aspect"),
            vec![Block::bullets(p.innovation, "Innovation points will be updated soon.")],
        ),
        Section::new(
            "future",
            Some("10. Scope for Future Enhancement"),
            vec![Block::bullets(p.future_enhancements, "Future enhancements will be updated soon.")],
        ),
        Section::new("deliverables", Some("Project Deliverables Checklist"), vec![Block::Checklist(p.deliverables)]),
        Section::new(
            "why",
            Some("11. Why This Is a Good Project"),
            vec![Block::bullets(
                p.why_good,
                "This project has strong practical value for portfolio and industry use-cases.",
            )],
        ),
        Section::new(
            "resume",
            Some("Resume-Ready Highlights"),
            vec![Block::bullets(p.resume_points, "Add measurable highlights from your final project results.")],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_record_gets_full_template() {
        let p = ProjectTemplate::from_record(&Record::new());
        assert_eq!(p.methodology.len(), 6);
        assert_eq!(p.modules.len(), 3);
        assert_eq!(p.required_modules, owned(REQUIRED_MODULES));
        assert_eq!(p.tools.len(), 5);
        assert_eq!(p.milestones[0].week, "Week 1-2");
        assert_eq!(p.commitment, "6-8 hours/week");
        assert!(p.introduction.starts_with("Project is a college student project title"));
    }

    #[test]
    fn classifier_fills_stat_cards_and_explicit_wins() {
        let p = ProjectTemplate::from_record(&record(json!({
            "title": "Brain Tumor MRI Classification",
            "teamSize": "Solo"
        })));
        assert_eq!(p.domain, "Healthcare AI / Medical Imaging");
        assert_eq!(p.team_size, "Solo");
        assert!(p.problem_statement.contains("Healthcare AI / Medical Imaging"));
    }

    #[test]
    fn mixed_item_shapes() {
        let p = ProjectTemplate::from_record(&record(json!({
            "projectModules": ["Auth", { "name": "Billing" }, 7, ""],
            "projectMethodology": [{ "title": "Plan", "points": [] }],
            "toolsAndTechnologies": [{ "category": "Language", "tools": "Rust" }]
        })));
        assert_eq!(
            p.modules,
            vec![
                ModuleItem { name: "Auth".into(), description: MODULE_DESCRIPTION_FALLBACK.into() },
                ModuleItem { name: "Billing".into(), description: MODULE_DESCRIPTION_FALLBACK.into() },
            ]
        );
        assert_eq!(p.methodology[0].points, vec!["Details will be updated soon."]);
        assert_eq!(p.tools, vec![("Language".to_string(), "Rust".to_string())]);
    }

    #[test]
    fn required_modules_section_follows_project_modules() {
        let data = record(json!({ "title": "Chat App", "requiredModules": ["React", "Axum", "Postgres"] }));
        let meta = PageMetadata::default();
        let sections = project_sections(&data, &meta);
        let kinds: Vec<&str> = sections.iter().map(|s| s.kind.as_str()).collect();
        let at = kinds.iter().position(|k| *k == "required-modules").unwrap();
        assert_eq!(kinds[at - 1], "modules");
        assert_eq!(sections[at].title.as_deref(), Some("Necessary Modules / Stack"));
        assert_eq!(
            sections[at].blocks,
            vec![Block::Bullets(vec!["React".into(), "Axum".into(), "Postgres".into()])]
        );
    }

    #[test]
    fn search_url_is_encoded() {
        assert_eq!(
            architecture_search_url("IoT & AI"),
            "https://www.google.com/search?tbm=isch&q=IoT+%26+AI+system+architecture+diagram"
        );
    }
}
