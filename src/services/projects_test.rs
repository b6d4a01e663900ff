use super::*;
use uuid::Uuid;

fn titles(projects: &[&Project]) -> Vec<String> {
    projects.iter().map(|p| p.title.clone()).collect()
}

fn temp_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("aioverse-projects-{}.json", Uuid::new_v4()))
}

// =========================================================================
// Queries
// =========================================================================

#[test]
fn default_query_sorts_by_most_recent_update() {
    let catalog = Catalog::fallback();
    let result = catalog.query(&ProjectQuery::default());
    assert_eq!(titles(&result), vec!["Plagiarism_Bot", "Ecommerce_Auto", "AI_Image_Gen", "Fruit_Classif_XAI"]);
}

#[test]
fn stars_sort_is_descending() {
    let catalog = Catalog::fallback();
    let query = ProjectQuery { sort: SortOrder::Stars, ..ProjectQuery::default() };
    let stars: Vec<u64> = catalog.query(&query).iter().map(|p| p.stars).collect();
    assert_eq!(stars, vec![7, 5, 3, 2]);
}

#[test]
fn name_sort_ignores_case() {
    let mut projects = Catalog::fallback().projects().to_vec();
    projects[0].title = "alpha".into();
    let catalog = Catalog::new(projects);
    let query = ProjectQuery { sort: SortOrder::Name, ..ProjectQuery::default() };
    assert_eq!(titles(&catalog.query(&query)), vec!["AI_Image_Gen", "alpha", "Ecommerce_Auto", "Plagiarism_Bot"]);
}

#[test]
fn language_filter_and_limit() {
    let catalog = Catalog::fallback();
    let query = ProjectQuery { language: Some("Flask".into()), ..ProjectQuery::default() };
    assert_eq!(titles(&catalog.query(&query)), vec!["AI_Image_Gen"]);

    let query = ProjectQuery { limit: 2, ..ProjectQuery::default() };
    assert_eq!(catalog.query(&query).len(), 2);

    let query = ProjectQuery { language: Some("Rust".into()), ..ProjectQuery::default() };
    assert!(catalog.query(&query).is_empty());
}

#[test]
fn undated_projects_sort_last() {
    let mut projects = Catalog::fallback().projects().to_vec();
    projects[3].updated_at = None;
    let catalog = Catalog::new(projects);
    let result = catalog.query(&ProjectQuery::default());
    assert_eq!(result.last().unwrap().title, "Plagiarism_Bot");
}

// =========================================================================
// Facets
// =========================================================================

#[test]
fn python_leads_language_facets() {
    let facets = Catalog::fallback().languages();
    assert_eq!(facets[0], "Python");
    let rest = &facets[1..];
    let mut sorted = rest.to_vec();
    sorted.sort();
    assert_eq!(rest, sorted.as_slice());
    assert_eq!(facets.iter().filter(|l| *l == "Python").count(), 1);
    assert!(facets.contains(&"Scikit-learn".to_string()));
}

#[test]
fn counts_projects_per_language() {
    let catalog = Catalog::fallback();
    assert_eq!(catalog.count_with_language("Python"), 4);
    assert_eq!(catalog.count_with_language("NLP"), 1);
    assert_eq!(catalog.count_with_language("Go"), 0);
}

#[test]
fn sort_order_parses_case_insensitively() {
    assert_eq!("Stars".parse::<SortOrder>().unwrap(), SortOrder::Stars);
    assert_eq!(" name ".parse::<SortOrder>().unwrap(), SortOrder::Name);
    assert!("popular".parse::<SortOrder>().is_err());
    assert_eq!(SortOrder::Updated.as_str(), "updated");
}

// =========================================================================
// Loading
// =========================================================================

#[tokio::test]
async fn missing_file_uses_fallback() {
    let catalog = Catalog::load(temp_path()).await;
    assert_eq!(catalog.len(), 4);
}

#[tokio::test]
async fn malformed_file_uses_fallback() {
    let path = temp_path();
    tokio::fs::write(&path, "{ not json").await.unwrap();
    let catalog = Catalog::load(&path).await;
    assert_eq!(catalog.projects()[0].title, "Fruit_Classif_XAI");
    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn loads_camel_case_catalog_with_optional_fields() {
    let path = temp_path();
    let json = r#"[
        {"id": 9, "title": "Shell", "category": "Rust", "image": "x.png",
         "description": "d", "languages": ["Rust"], "stars": 11, "updatedAt": "2025-05-05"},
        {"id": 10, "title": "Bare", "category": "Misc", "image": "y.png", "description": "e"}
    ]"#;
    tokio::fs::write(&path, json).await.unwrap();

    let catalog = Catalog::load(&path).await;
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.projects()[0].updated_at.as_deref(), Some("2025-05-05"));
    let bare = &catalog.projects()[1];
    assert!(bare.languages.is_empty());
    assert_eq!(bare.stars, 0);
    assert!(bare.link.is_none());
    assert_eq!(catalog.languages(), vec!["Python".to_string(), "Rust".to_string()]);
    tokio::fs::remove_file(&path).await.unwrap();
}
