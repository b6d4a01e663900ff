use super::*;
use uuid::Uuid;

fn temp_store() -> FeedbackStore {
    FeedbackStore::new(std::env::temp_dir().join(format!("aioverse-feedback-{}.json", Uuid::new_v4())))
}

fn draft(name: &str) -> FeedbackDraft {
    FeedbackDraft {
        name: name.into(),
        affiliation: "Acme Labs".into(),
        quote: "Shipped on time.".into(),
        ..FeedbackDraft::default()
    }
}

async fn cleanup(store: &FeedbackStore) {
    let _ = tokio::fs::remove_file(store.path()).await;
}

// =========================================================================
// load / append
// =========================================================================

#[tokio::test]
async fn missing_file_is_empty_log() {
    let store = temp_store();
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn append_persists_with_default_avatars() {
    let store = temp_store();
    let record = store.append(draft("Rahim")).await.unwrap();
    assert_eq!(record.image_src, DEFAULT_IMAGE_SRC);
    assert_eq!(record.thumbnail_src, DEFAULT_THUMBNAIL_SRC);

    let records = store.load().await.unwrap();
    assert_eq!(records, vec![record]);
    cleanup(&store).await;
}

#[tokio::test]
async fn provided_images_are_kept() {
    let store = temp_store();
    let record = store
        .append(FeedbackDraft {
            image_src: Some("data:image/png;base64,AAA".into()),
            thumbnail_src: Some("  ".into()),
            ..draft("Karim")
        })
        .await
        .unwrap();
    assert_eq!(record.image_src, "data:image/png;base64,AAA");
    assert_eq!(record.thumbnail_src, DEFAULT_THUMBNAIL_SRC);
    cleanup(&store).await;
}

#[tokio::test]
async fn ids_strictly_increase() {
    let store = temp_store();
    let mut ids = Vec::new();
    for name in ["a", "b", "c", "d"] {
        ids.push(store.append(draft(name)).await.unwrap().id);
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");
    assert_eq!(store.load().await.unwrap().len(), 4);
    cleanup(&store).await;
}

#[tokio::test]
async fn blank_required_fields_are_rejected() {
    let store = temp_store();
    let err = store.append(draft("   ")).await.unwrap_err();
    assert!(matches!(err, FeedbackError::MissingField("name")));

    let err = store
        .append(FeedbackDraft { quote: String::new(), ..draft("Nadia") })
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "E_FEEDBACK_MISSING_FIELD");
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn serialized_log_uses_camel_case() {
    let store = temp_store();
    store.append(draft("Rahim")).await.unwrap();
    let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json[0]["imageSrc"].is_string());
    assert!(json[0]["thumbnailSrc"].is_string());
    cleanup(&store).await;
}

#[tokio::test]
async fn corrupt_log_is_an_error() {
    let store = temp_store();
    tokio::fs::write(store.path(), "not json").await.unwrap();
    let err = store.load().await.unwrap_err();
    assert_eq!(err.error_code(), "E_FEEDBACK_JSON");
    cleanup(&store).await;
}

// =========================================================================
// submit
// =========================================================================

#[tokio::test]
async fn submit_reports_loading_then_success() {
    let store = temp_store();
    let mut seen = Vec::new();
    let record = store.submit(draft("Rahim"), |s| seen.push(s)).await;
    assert!(record.is_some());
    assert_eq!(seen, vec![SubmissionStatus::Loading, SubmissionStatus::Success]);
    cleanup(&store).await;
}

#[tokio::test]
async fn submit_reports_error_without_retry() {
    let store = temp_store();
    let mut seen = Vec::new();
    let record = store.submit(draft(""), |s| seen.push(s)).await;
    assert!(record.is_none());
    assert_eq!(seen, vec![SubmissionStatus::Loading, SubmissionStatus::Error]);
}

#[test]
fn status_defaults_to_idle() {
    assert_eq!(SubmissionStatus::default(), SubmissionStatus::Idle);
    assert_eq!(serde_json::to_value(SubmissionStatus::Success).unwrap(), "success");
}
