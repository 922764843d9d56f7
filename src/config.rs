use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://studenttechprojects.com";
pub const DEFAULT_SITE_NAME: &str = "StudentTechProjects";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub site_name: String,
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub home_section_limit: usize,
    pub related_limit: usize,
}

impl Settings {
    /// Defaults first, then `SITE_*` environment overrides (`SITE_BASE_URL`, `SITE_OUT_DIR`, ...).
    pub fn load() -> Result<Self> {
        let conf = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("site_name", DEFAULT_SITE_NAME)?
            .set_default("data_dir", "data")?
            .set_default("out_dir", "dist")?
            .set_default("home_section_limit", 9)?
            .set_default("related_limit", 4)?
            .add_source(Environment::with_prefix("SITE").try_parsing(true))
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        s.base_url = s.base_url.trim_end_matches('/').to_string();
        Ok(s)
    }

    pub fn site(&self) -> SiteMeta {
        SiteMeta {
            base_url: self.base_url.clone(),
            name: self.site_name.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("dist"),
            home_section_limit: 9,
            related_limit: 4,
        }
    }
}

/// The slice of settings the renderers need; kept separate so rendering stays pure.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub base_url: String,
    pub name: String,
}

impl SiteMeta {
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for SiteMeta {
    fn default() -> Self {
        Settings::default().site()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site() {
        let s = Settings::default();
        assert_eq!(s.home_section_limit, 9);
        assert_eq!(s.related_limit, 4);
        assert_eq!(s.site().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn absolute_urls() {
        let site = SiteMeta::default();
        assert_eq!(
            site.absolute("/jobs/x/"),
            "https://studenttechprojects.com/jobs/x/"
        );
        assert_eq!(site.absolute("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
        assert_eq!(site.absolute("img.svg"), "https://studenttechprojects.com/img.svg");
    }
}
