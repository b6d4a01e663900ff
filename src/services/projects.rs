//! Project feed — static portfolio catalog and gallery queries.
//!
//! DESIGN
//! ======
//! The catalog is a JSON array produced offline (from GitHub data). It is
//! read once; anything short of a parseable array logs a warning and the
//! built-in fallback list is used instead, so the gallery is never empty.
//!
//! Queries filter by language, sort, then truncate. Sorting is stable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Language pinned first in the facet list.
pub const FEATURED_LANGUAGE: &str = "Python";
/// Default page size of a gallery query.
pub const DEFAULT_LIMIT: usize = 6;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub image: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub stars: u64,
    /// ISO-8601 date; compared lexically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most starred first.
    Stars,
    /// Most recently updated first; undated projects last.
    #[default]
    Updated,
    /// Title, case-insensitive ascending.
    Name,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Updated => "updated",
            Self::Name => "name",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stars" => Ok(Self::Stars),
            "updated" => Ok(Self::Updated),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown sort order: {other} (expected stars, updated or name)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectQuery {
    /// `None` means all languages.
    pub language: Option<String>,
    pub sort: SortOrder,
    pub limit: usize,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self { language: None, sort: SortOrder::default(), limit: DEFAULT_LIMIT }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    #[must_use]
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Catalog backed by the built-in project list.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(fallback_projects())
    }

    /// Read the catalog from `path`, falling back to the built-in list.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "projects: could not read catalog, using fallback");
                return Self::fallback();
            }
        };
        match serde_json::from_str::<Vec<Project>>(&raw) {
            Ok(projects) => {
                info!(path = %path.display(), count = projects.len(), "projects: catalog loaded");
                Self::new(projects)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "projects: malformed catalog, using fallback");
                Self::fallback()
            }
        }
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Filter, sort and truncate per `query`.
    #[must_use]
    pub fn query(&self, query: &ProjectQuery) -> Vec<&Project> {
        let mut selected: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| query.language.as_deref().is_none_or(|lang| has_language(p, lang)))
            .collect();

        match query.sort {
            SortOrder::Stars => selected.sort_by(|a, b| b.stars.cmp(&a.stars)),
            SortOrder::Updated => selected.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            SortOrder::Name => selected.sort_by_key(|p| p.title.to_lowercase()),
        }

        selected.truncate(query.limit);
        selected
    }

    /// Distinct languages, [`FEATURED_LANGUAGE`] first, the rest sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        let mut rest: Vec<String> = self
            .projects
            .iter()
            .flat_map(|p| p.languages.iter())
            .filter(|l| l.as_str() != FEATURED_LANGUAGE)
            .cloned()
            .collect();
        rest.sort();
        rest.dedup();

        let mut facets = Vec::with_capacity(rest.len() + 1);
        facets.push(FEATURED_LANGUAGE.to_string());
        facets.extend(rest);
        facets
    }

    #[must_use]
    pub fn count_with_language(&self, language: &str) -> usize {
        self.projects
            .iter()
            .filter(|p| has_language(p, language))
            .count()
    }
}

fn has_language(project: &Project, language: &str) -> bool {
    project.languages.iter().any(|l| l == language)
}

// =============================================================================
// FALLBACK
// =============================================================================

const REPOSITORIES_URL: &str = "https://github.com/AION-2000?tab=repositories";

#[allow(clippy::too_many_arguments)]
fn project(
    id: u64,
    title: &str,
    category: &str,
    image: &str,
    description: &str,
    languages: &[&str],
    stars: u64,
    updated_at: &str,
) -> Project {
    Project {
        id,
        title: title.to_string(),
        category: category.to_string(),
        image: image.to_string(),
        description: description.to_string(),
        link: Some(REPOSITORIES_URL.to_string()),
        languages: languages.iter().map(|l| (*l).to_string()).collect(),
        stars,
        updated_at: Some(updated_at.to_string()),
    }
}

fn fallback_projects() -> Vec<Project> {
    vec![
        project(
            1,
            "Fruit_Classif_XAI",
            "AI / Deep Learning",
            "https://picsum.photos/seed/fruit/800/600",
            "Enhancing Fruit Classification with Deep Learning, Explainable AI (XAI), and Database Integration.",
            &["Python", "TensorFlow", "OpenCV"],
            5,
            "2024-01-01",
        ),
        project(
            2,
            "AI_Image_Gen",
            "Web / GenAI",
            "https://picsum.photos/seed/genai/800/800",
            "Full-stack AI Image Generator Web App using Flask & OpenAI API.",
            &["Python", "Flask", "JavaScript"],
            3,
            "2024-02-01",
        ),
        project(
            3,
            "Ecommerce_Auto",
            "Automation",
            "https://picsum.photos/seed/ecom/800/800",
            "Automated system for streamlining e-commerce operations and workflows.",
            &["Python", "Automation"],
            2,
            "2024-03-01",
        ),
        project(
            4,
            "Plagiarism_Bot",
            "NLP / Detection",
            "https://picsum.photos/seed/nlp/700/500",
            "AI-powered plagiarism checker and detection system using NLP techniques.",
            &["Python", "NLP", "Scikit-learn"],
            7,
            "2024-04-01",
        ),
    ]
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
