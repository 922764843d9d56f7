use crate::model::Category;

/// Heading and fallback text for one category's detail page.
#[derive(Debug)]
pub struct CategoryLabels {
    pub description_title: &'static str,
    pub responsibilities_title: &'static str,
    pub qualifications_title: &'static str,
    pub preferred_title: &'static str,
    pub timeline_title: &'static str,
    pub apply_title: &'static str,
    pub tips_title: &'static str,
    pub list_fallback: &'static str,
    pub apply_fallback: &'static str,
    pub tips_fallback: [&'static str; 3],
}

pub static JOBS: CategoryLabels = CategoryLabels {
    description_title: "Job Description",
    responsibilities_title: "Responsibilities",
    qualifications_title: "Minimum Qualifications",
    preferred_title: "Preferred Qualifications",
    timeline_title: "Important Timeline",
    apply_title: "How to Apply",
    tips_title: "Preparation Tips",
    list_fallback: "Role details not specified. Check the official job posting.",
    apply_fallback: "Use the official link to apply.",
    tips_fallback: [
        "Keep your resume updated and tailored to this role.",
        "Highlight relevant projects, internships, or hackathon work.",
        "Review core technical topics and practice problem-solving before assessments.",
    ],
};

pub static INTERNSHIPS: CategoryLabels = CategoryLabels {
    description_title: "Internship Description",
    responsibilities_title: "Key Responsibilities",
    qualifications_title: "Eligibility",
    preferred_title: "Preferred Skills",
    timeline_title: "Important Timeline",
    apply_title: "How to Apply",
    tips_title: "Internship Preparation Tips",
    list_fallback: "Internship details not specified. Check the official listing.",
    apply_fallback: "Use the official link to apply.",
    tips_fallback: [
        "Prepare a concise resume with projects and academic strengths.",
        "Review fundamentals related to the internship domain.",
        "Apply early and track updates from the official portal.",
    ],
};

pub static HACKATHONS: CategoryLabels = CategoryLabels {
    description_title: "Hackathon Details",
    responsibilities_title: "What You Will Work On",
    qualifications_title: "Eligibility",
    preferred_title: "Recommended Skills",
    timeline_title: "Event Timeline",
    apply_title: "How to Register",
    tips_title: "Participation Tips",
    list_fallback: "Event details not specified. Check the organizer's page.",
    apply_fallback: "Use the official link to register.",
    tips_fallback: [
        "Build a small team with complementary skills.",
        "Prepare a practical idea aligned with the problem statement.",
        "Focus on a working prototype and clear demo flow.",
    ],
};

pub static PROJECTS: CategoryLabels = CategoryLabels {
    description_title: "Project Description",
    responsibilities_title: "Project Tasks",
    qualifications_title: "Prerequisites",
    preferred_title: "Recommended Skills",
    timeline_title: "Project Timeline",
    apply_title: "How to Join",
    tips_title: "Execution Tips",
    list_fallback: "Project details will be updated soon.",
    apply_fallback: "Use the official link to join.",
    tips_fallback: [
        "Define scope and milestones before you start.",
        "Document your work and commits regularly.",
        "Showcase your final output with clear problem-solution impact.",
    ],
};

pub fn labels(category: Category) -> &'static CategoryLabels {
    match category {
        Category::Jobs => &JOBS,
        Category::Internships => &INTERNSHIPS,
        Category::Hackathons => &HACKATHONS,
        Category::Projects => &PROJECTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_category_titles() {
        assert_eq!(labels(Category::Jobs).description_title, "Job Description");
        assert_eq!(labels(Category::Internships).description_title, "Internship Description");
        assert_eq!(labels(Category::Hackathons).description_title, "Hackathon Details");
        assert_eq!(labels(Category::Projects).description_title, "Project Description");
    }

    #[test]
    fn unknown_category_uses_jobs() {
        let by_name = |name: &str| labels(Category::parse_or_default(name));
        assert_eq!(by_name("gigs").description_title, "Job Description");
        assert_eq!(by_name("").tips_title, "Preparation Tips");
        assert_eq!(by_name("HACKATHONS").apply_title, "How to Register");
    }
}
