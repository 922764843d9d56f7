use std::sync::LazyLock;

use regex::Regex;

use crate::heuristics::text::normalize;
use crate::model::{present, Listing};

static ADVANCED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(transformer|transformers|gan|gans|generative adversarial|federated|real time|hybrid|reinforcement learning|graph neural|multimodal|edge ai)\b",
    )
    .unwrap()
});

pub struct DomainProfile {
    pub name: &'static str,
    pub keywords: &'static [(&'static str, u32)],
    pub difficulty: &'static str,
    pub duration: &'static str,
    pub team_size: &'static str,
}

pub static PROFILES: &[DomainProfile] = &[
    DomainProfile {
        name: "Healthcare AI / Medical Imaging",
        keywords: &[
            ("cancer", 3),
            ("tumor", 3),
            ("mri", 3),
            ("disease", 2),
            ("medical", 2),
            ("patient", 2),
            ("diagnosis", 2),
            ("health", 2),
            ("healthcare", 2),
            ("diabetes", 2),
            ("heart", 1),
            ("hospital", 1),
            ("x ray", 2),
        ],
        difficulty: "Intermediate",
        duration: "10-12 weeks",
        team_size: "2-4 members",
    },
    DomainProfile {
        name: "Computer Vision / Deep Learning",
        keywords: &[
            ("cnn", 3),
            ("yolo", 3),
            ("segmentation", 3),
            ("image", 2),
            ("vision", 2),
            ("detection", 2),
            ("recognition", 2),
            ("face", 2),
            ("video", 2),
            ("opencv", 2),
            ("object", 1),
            ("camera", 1),
        ],
        difficulty: "Intermediate",
        duration: "10-12 weeks",
        team_size: "2-4 members",
    },
    DomainProfile {
        name: "Natural Language Processing",
        keywords: &[
            ("nlp", 3),
            ("chatbot", 3),
            ("sentiment", 3),
            ("language", 2),
            ("text", 2),
            ("summarization", 2),
            ("translation", 2),
            ("speech", 2),
            ("fake news", 3),
            ("llm", 3),
            ("spam", 1),
        ],
        difficulty: "Intermediate",
        duration: "8-10 weeks",
        team_size: "2-3 members",
    },
    DomainProfile {
        name: "Cybersecurity",
        keywords: &[
            ("intrusion", 3),
            ("malware", 3),
            ("phishing", 3),
            ("security", 2),
            ("attack", 2),
            ("encryption", 2),
            ("fraud", 2),
            ("cyber", 2),
            ("vulnerability", 2),
            ("authentication", 1),
        ],
        difficulty: "Intermediate",
        duration: "8-12 weeks",
        team_size: "2-3 members",
    },
    DomainProfile {
        name: "Blockchain / Web3",
        keywords: &[
            ("blockchain", 3),
            ("smart contract", 3),
            ("ethereum", 3),
            ("crypto", 2),
            ("decentralized", 2),
            ("nft", 2),
            ("ledger", 2),
        ],
        difficulty: "Intermediate",
        duration: "8-12 weeks",
        team_size: "2-4 members",
    },
    DomainProfile {
        name: "IoT / Embedded Systems",
        keywords: &[
            ("iot", 3),
            ("arduino", 3),
            ("raspberry pi", 3),
            ("sensor", 2),
            ("embedded", 2),
            ("smart home", 2),
            ("automation", 1),
            ("monitoring", 1),
        ],
        difficulty: "Intermediate",
        duration: "8-10 weeks",
        team_size: "2-4 members",
    },
    DomainProfile {
        name: "Data Analytics / Forecasting",
        keywords: &[
            ("forecasting", 3),
            ("prediction", 2),
            ("analytics", 2),
            ("analysis", 2),
            ("dashboard", 2),
            ("stock", 2),
            ("sales", 1),
            ("recommendation", 2),
            ("regression", 2),
            ("data", 1),
        ],
        difficulty: "Beginner",
        duration: "6-8 weeks",
        team_size: "1-3 members",
    },
    DomainProfile {
        name: "Web & Mobile Development",
        keywords: &[
            ("website", 3),
            ("web", 2),
            ("android", 3),
            ("mobile", 2),
            ("app", 2),
            ("portal", 2),
            ("management system", 2),
            ("ecommerce", 2),
            ("booking", 1),
        ],
        difficulty: "Beginner",
        duration: "6-8 weeks",
        team_size: "2-3 members",
    },
    DomainProfile {
        name: "Cloud / DevOps",
        keywords: &[
            ("cloud", 3),
            ("devops", 3),
            ("kubernetes", 3),
            ("docker", 2),
            ("serverless", 2),
            ("aws", 2),
            ("deployment", 1),
        ],
        difficulty: "Intermediate",
        duration: "8-10 weeks",
        team_size: "2-3 members",
    },
];

pub static FALLBACK_PROFILE: DomainProfile = DomainProfile {
    name: "Applied Machine Learning / Software Engineering",
    keywords: &[],
    difficulty: "Intermediate",
    duration: "8-12 weeks",
    team_size: "2-4 members",
};

const ADVANCED_DIFFICULTY: &str = "Advanced";
const ADVANCED_DURATION: &str = "12-16 weeks";
const ADVANCED_TEAM_SIZE: &str = "3-5 members";

impl DomainProfile {
    /// Sum of weights of every keyword found as a substring of `normalized`.
    pub fn score(&self, normalized: &str) -> u32 {
        self.keywords
            .iter()
            .filter(|(kw, _)| normalized.contains(kw))
            .map(|(_, w)| *w)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub domain: String,
    pub difficulty: String,
    pub duration: String,
    pub team_size: String,
}

/// Highest-scoring profile; ties keep declaration order, zero falls back.
pub fn best_profile(normalized: &str) -> &'static DomainProfile {
    let mut best: Option<(&'static DomainProfile, u32)> = None;
    for profile in PROFILES {
        let score = profile.score(normalized);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((profile, score));
        }
    }
    best.map(|(p, _)| p).unwrap_or(&FALLBACK_PROFILE)
}

/// Classify free text (title plus excerpt) into project metadata.
pub fn classify_text(text: &str) -> ProjectMeta {
    let normalized = normalize(text);
    let profile = best_profile(&normalized);
    let mut meta = ProjectMeta {
        domain: profile.name.to_string(),
        difficulty: profile.difficulty.to_string(),
        duration: profile.duration.to_string(),
        team_size: profile.team_size.to_string(),
    };
    if ADVANCED_RE.is_match(&normalized) {
        meta.difficulty = ADVANCED_DIFFICULTY.to_string();
        meta.duration = ADVANCED_DURATION.to_string();
        meta.team_size = ADVANCED_TEAM_SIZE.to_string();
    }
    meta
}

/// Project metadata for a listing: explicit fields win over inference.
pub fn infer_project_meta(listing: &Listing) -> ProjectMeta {
    let text = format!(
        "{} {}",
        present(&listing.title).unwrap_or_default(),
        present(&listing.excerpt).unwrap_or_default()
    );
    let inferred = classify_text(&text);
    let pick = |explicit: &Option<String>, fallback: String| {
        present(explicit).map(str::to_string).unwrap_or(fallback)
    };
    ProjectMeta {
        domain: pick(&listing.domain, inferred.domain),
        difficulty: pick(&listing.difficulty, inferred.difficulty),
        duration: pick(&listing.duration, inferred.duration),
        team_size: pick(&listing.team_size, inferred.team_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_higher_score_wins() {
        // healthcare: cancer(3) = 3, vision: cnn(3) + detection(2) = 5
        let meta = classify_text("Cancer detection using CNN");
        assert_eq!(meta.domain, "Computer Vision / Deep Learning");
    }

    #[test]
    fn keywords_match_inside_longer_words() {
        let meta = classify_text("Satellite images classification");
        assert_eq!(meta.domain, "Computer Vision / Deep Learning");

        let healthcare = &PROFILES[0];
        // health(2) + healthcare(2) + patient(2)
        assert_eq!(healthcare.score(&normalize("Healthcare patient portal")), 6);
    }

    #[test]
    fn ties_keep_declaration_order() {
        let meta = classify_text("cancer cnn");
        assert_eq!(meta.domain, "Healthcare AI / Medical Imaging");
    }

    #[test]
    fn deterministic() {
        let text = "Fake news detection with NLP and sentiment analysis";
        let first = classify_text(text);
        for _ in 0..5 {
            assert_eq!(classify_text(text), first);
        }
        assert_eq!(first.domain, "Natural Language Processing");
    }

    #[test]
    fn no_keyword_falls_back() {
        let meta = classify_text("Library of Alexandria");
        assert_eq!(meta.domain, FALLBACK_PROFILE.name);
        assert_eq!(meta.difficulty, "Intermediate");
    }

    #[test]
    fn advanced_boost() {
        let meta = classify_text("Brain tumor segmentation using transformer models");
        assert_eq!(meta.difficulty, "Advanced");
        assert_eq!(meta.duration, "12-16 weeks");
        assert_eq!(meta.team_size, "3-5 members");
    }

    #[test]
    fn explicit_fields_win_over_boost() {
        let listing = Listing {
            title: Some("Real-time IoT monitoring with federated learning".into()),
            difficulty: Some("Beginner".into()),
            ..Default::default()
        };
        let meta = infer_project_meta(&listing);
        assert_eq!(meta.difficulty, "Beginner");
        assert_eq!(meta.domain, "IoT / Embedded Systems");
        assert_eq!(meta.duration, "12-16 weeks");
    }

    #[test]
    fn non_ascii_only_fails_to_match() {
        assert_eq!(classify_text("画像認識").domain, FALLBACK_PROFILE.name);
        assert_eq!(classify_text("Détection vidéo").domain, FALLBACK_PROFILE.name);
    }
}
