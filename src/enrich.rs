//! Fill project detail files from a generated template. Values already present
//! in a detail file are never overwritten.

use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::classify::infer_project_meta;
use crate::error::Result;
use crate::heuristics::text::is_safe_slug;
use crate::merge::fill_missing;
use crate::model::{or_placeholder, present, Category, Listing, Record};
use crate::store;

pub fn build_template(project: &Listing, site_name: &str) -> Record {
    let title = or_placeholder(&project.title, "Project");
    let company = or_placeholder(&project.company, "Organizer");
    let slug = project.slug().unwrap_or_default();
    let intro = match present(&project.excerpt) {
        Some(excerpt) => excerpt.to_string(),
        None => format!(
            "{} focuses on solving a practical problem using a structured implementation approach.",
            title
        ),
    };
    let meta = infer_project_meta(project);

    let step = |title: &str, points: [&str; 2]| json!({ "title": title, "points": points });
    let module = |name: &str, description: &str| json!({ "name": name, "description": description });
    let milestone = |week: &str, goal: &str| json!({ "week": week, "goal": goal });
    let tools = |category: &str, tools: &str| json!({ "category": category, "tools": tools });

    let value = json!({
        "intro": intro,
        "lastDate": "Not specified",
        "jobDescription": format!("Detailed implementation plan for {} at {}.", title, company),
        "projectIntroduction": format!(
            "{} is designed as an industry-aligned project to build practical skills and deployable outcomes.",
            title
        ),
        "problemStatement": format!(
            "{} and similar organizations require scalable, measurable, and data-driven project execution approaches.",
            company
        ),
        "domain": meta.domain,
        "duration": meta.duration,
        "difficulty": meta.difficulty,
        "teamSize": meta.team_size,
        "commitment": "6-8 hours/week",
        "projectObjectives": [
            "Analyze project requirements and define clear scope.",
            "Design and implement a robust technical solution.",
            "Measure outcomes using objective metrics.",
            "Present results through a structured dashboard/report."
        ],
        "projectMethodology": [
            step("Step 1: Requirement Analysis", ["Identify business/technical goals.", "Define measurable success criteria."]),
            step("Step 2: Data & Resource Preparation", ["Collect required inputs and datasets.", "Prepare development and deployment environment."]),
            step("Step 3: Core Implementation", ["Build the main processing/business logic.", "Validate core outputs with test scenarios."]),
            step("Step 4: Advanced Optimization", ["Improve performance, scalability, and reliability.", "Refine architecture and edge-case handling."]),
            step("Step 5: Evaluation & Validation", ["Evaluate with relevant KPIs and metrics.", "Compare approaches and finalize best version."]),
            step("Step 6: Visualization & Documentation", ["Prepare clear visual reports/dashboard.", "Document architecture, setup, and outcomes."])
        ],
        "systemArchitecture": [
            "Input Layer",
            "Preprocessing / Validation Layer",
            "Core Processing Layer",
            "Evaluation Layer",
            "Visualization & Reporting Layer"
        ],
        "projectModules": [
            module("Input Module", "Collects and validates required project inputs."),
            module("Core Logic Module", "Implements the main project algorithm/workflow."),
            module("Output Module", "Generates insights, dashboards, and final outcomes.")
        ],
        "skillsYouGain": [
            "Problem decomposition and project scoping",
            "Architecture design and implementation",
            "Evaluation and result communication",
            "Portfolio presentation skills"
        ],
        "weeklyMilestones": [
            milestone("Week 1-2", "Scope, architecture, and setup completion"),
            milestone("Week 3-4", "Core module development and baseline output"),
            milestone("Week 5-6", "Optimization, integration, and validation"),
            milestone("Week 7-8", "Documentation, dashboard, and final demo")
        ],
        "projectDeliverables": [
            "Source code repository with README",
            "Architecture and module documentation",
            "Output dashboard/screenshots",
            "Final presentation or walkthrough"
        ],
        "resumeHighlights": [
            "Built a structured end-to-end project with measurable outcomes.",
            "Implemented module-wise architecture and optimization workflow.",
            "Delivered dashboard-driven results and final documentation."
        ],
        "expectedOutcomes": [
            "Deliver practical and measurable project output.",
            "Improve execution efficiency and decision support.",
            "Create portfolio-ready implementation and documentation."
        ],
        "toolsAndTechnologies": [
            tools("Programming Language", "Python / JavaScript"),
            tools("Frameworks/Libraries", "As per project requirement"),
            tools("Visualization", "Plotly / Matplotlib / Chart.js"),
            tools("Deployment", "Flask / Streamlit / Node.js"),
            tools("Database", "MongoDB / PostgreSQL / CSV")
        ],
        "innovationAspect": [
            "Combines practical engineering and data-driven validation.",
            "Focuses on measurable outcomes and usability.",
            "Supports scalable future enhancements."
        ],
        "futureEnhancements": [
            "Integrate external APIs and real-time input streams.",
            "Add automation and recommendation capabilities.",
            "Improve module-level analytics and alerting."
        ],
        "whyGoodProject": [
            "Strong real-world relevance and industry applicability.",
            "Demonstrates architecture, implementation, and evaluation skills.",
            "Creates high-value portfolio impact for students."
        ],
        "howToApply": "Use the official apply link provided below.",
        "author": format!("{} Team", site_name),
        "image": format!("/images/opportunities/{}.svg", slug),
        "imageAlt": format!("{} at {}", title, company)
    });

    match value {
        Value::Object(map) => Record::from(map),
        _ => Record::new(),
    }
}

/// Enrich every project with a slug. Returns how many detail files were written.
pub fn enrich_projects(data_dir: &Path, site_name: &str) -> Result<usize> {
    let projects = store::load_category(data_dir, Category::Projects)?;
    let mut updated = 0;

    for project in &projects {
        let Some(slug) = project.slug() else {
            debug!("skipping project without slug: {:?}", project.title);
            continue;
        };
        if !is_safe_slug(slug) {
            warn!("skipping project with unsafe slug {:?}", slug);
            continue;
        }
        let template = build_template(project, site_name);
        let content = match store::load_detail(data_dir, slug)? {
            Some(existing) => fill_missing(&existing, &template),
            None => template,
        };
        store::write_json_pretty(&store::detail_path(data_dir, slug), &content)?;
        updated += 1;
    }

    info!("Enriched {} project content files", updated);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::scratch_dir;
    use std::fs;

    fn project(value: Value) -> Listing {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn template_uses_classifier_and_slug() {
        let p = project(json!({
            "title": "Brain Tumor MRI Classification",
            "company": "College Student Projects",
            "slug": "brain-tumor-mri",
            "type": "project"
        }));
        let t = build_template(&p, "StudentTechProjects");
        assert_eq!(t.text("domain").as_deref(), Some("Healthcare AI / Medical Imaging"));
        assert_eq!(t.text("image").as_deref(), Some("/images/opportunities/brain-tumor-mri.svg"));
        assert_eq!(t.text("imageAlt").as_deref(), Some("Brain Tumor MRI Classification at College Student Projects"));
        assert_eq!(t.text("author").as_deref(), Some("StudentTechProjects Team"));
        assert!(t.text("intro").unwrap().starts_with("Brain Tumor MRI Classification focuses on"));
        assert_eq!(t.items("projectMethodology").len(), 6);
    }

    #[test]
    fn existing_values_survive_enrichment() {
        let dir = scratch_dir("enrich");
        fs::write(
            dir.join("projects.json"),
            r#"[
                {"title": "Crop Yield Forecasting", "slug": "crop-yield", "type": "project", "excerpt": "Predict harvests."},
                {"title": "No slug here", "type": "project"},
                {"title": "Escape", "slug": "../escape", "type": "project"}
            ]"#,
        )
        .unwrap();
        fs::create_dir_all(dir.join("content")).unwrap();
        fs::write(
            dir.join("content/crop-yield.json"),
            r#"{"domain": "Agritech", "projectObjectives": [], "intro": "", "tips": [], "aboutCompany": "", "commitment": "  "}"#,
        )
        .unwrap();

        assert_eq!(enrich_projects(&dir, "Site").unwrap(), 1);

        let written = store::load_detail(&dir, "crop-yield").unwrap().unwrap();
        assert_eq!(written.text("domain").as_deref(), Some("Agritech"));
        assert_eq!(written.list("projectObjectives").len(), 4);
        assert_eq!(written.text("intro").as_deref(), Some("Predict harvests."));
        assert_eq!(written.get("commitment"), Some(&json!("  ")));
        assert_eq!(written.get("tips"), Some(&json!([])));
        assert_eq!(written.get("aboutCompany"), Some(&json!("")));
        assert!(fs::read_to_string(dir.join("content/crop-yield.json")).unwrap().ends_with("}\n"));
        assert!(!dir.join("escape.json").exists());
    }
}
