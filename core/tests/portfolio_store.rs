use appraisal_core::error::CoreError;
use appraisal_core::portfolio::model::{empty_buckets, PortfolioDocument, PortfolioStatus};
use appraisal_core::portfolio::sources::SourceCounts;
use appraisal_core::storage::portfolio_store::{
    FilePortfolioStore, LatestFilter, MemoryPortfolioStore, PortfolioStore,
};

fn doc(id: &str, created_at: &str, owner: Option<&str>) -> PortfolioDocument {
    PortfolioDocument {
        id: id.to_string(),
        created_at: created_at.to_string(),
        owner: owner.map(str::to_string),
        buckets: empty_buckets(),
        overall_summary: format!("summary of {}", id),
        status: PortfolioStatus::Organized,
        failure: None,
        source_counts: SourceCounts::default(),
    }
}

fn exercise_latest(store: &dyn PortfolioStore) {
    store.put(&doc("p_a", "2026-03-01T10:00:00Z", Some("t_1"))).unwrap();
    store.put(&doc("p_b", "2026-03-02T10:00:00Z", Some("t_2"))).unwrap();
    store.put(&doc("p_c", "2026-03-01T12:00:00Z", Some("t_1"))).unwrap();

    assert_eq!(store.get_latest(None).unwrap().id, "p_b");
    assert_eq!(
        store.get_latest(Some(&LatestFilter::owner("t_1"))).unwrap().id,
        "p_c"
    );
    assert!(matches!(
        store.get_latest(Some(&LatestFilter::owner("t_9"))),
        Err(CoreError::NotFound(_))
    ));
    assert_eq!(store.get("p_a").unwrap().overall_summary, "summary of p_a");
    assert!(matches!(store.get("p_zz"), Err(CoreError::NotFound(_))));
}

#[test]
fn memory_store_latest_and_lookup() {
    exercise_latest(&MemoryPortfolioStore::new());
}

#[test]
fn file_store_latest_and_lookup() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FilePortfolioStore::open_or_create(tmp.path()).unwrap();
    exercise_latest(&store);
    assert!(tmp.path().join("documents").join("p_a.json").exists());
}

#[test]
fn empty_store_has_no_latest() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FilePortfolioStore::open_or_create(tmp.path()).unwrap();
    assert!(matches!(store.get_latest(None), Err(CoreError::NotFound(_))));
    assert!(MemoryPortfolioStore::new().is_empty());
}

#[test]
fn documents_are_never_overwritten() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FilePortfolioStore::open_or_create(tmp.path()).unwrap();
    store.put(&doc("p_same", "2026-03-01T10:00:00Z", None)).unwrap();
    let mut second = doc("p_same", "2026-03-05T10:00:00Z", None);
    second.overall_summary = "changed".to_string();
    assert!(matches!(store.put(&second), Err(CoreError::Storage(_))));
    assert_eq!(store.get("p_same").unwrap().created_at, "2026-03-01T10:00:00Z");

    let mem = MemoryPortfolioStore::new();
    mem.put(&doc("p_same", "2026-03-01T10:00:00Z", None)).unwrap();
    assert!(matches!(mem.put(&second), Err(CoreError::Storage(_))));
}

#[test]
fn same_timestamp_breaks_ties_by_id() {
    let store = MemoryPortfolioStore::new();
    store.put(&doc("p_02", "2026-03-01T10:00:00Z", None)).unwrap();
    store.put(&doc("p_01", "2026-03-01T10:00:00Z", None)).unwrap();
    assert_eq!(store.get_latest(None).unwrap().id, "p_02");
}

#[test]
fn unreadable_files_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FilePortfolioStore::open_or_create(tmp.path()).unwrap();
    store.put(&doc("p_ok", "2026-03-01T10:00:00Z", None)).unwrap();
    std::fs::write(tmp.path().join("documents").join("p_bad.json"), b"{ truncated").unwrap();
    assert_eq!(store.get_latest(None).unwrap().id, "p_ok");
}

#[test]
fn path_like_ids_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FilePortfolioStore::open_or_create(tmp.path()).unwrap();
    assert!(matches!(store.get("../secret"), Err(CoreError::InvalidInput(_))));
}

#[test]
fn reopened_store_sees_earlier_documents() {
    let tmp = tempfile::tempdir().unwrap();
    FilePortfolioStore::open_or_create(tmp.path())
        .unwrap()
        .put(&doc("p_keep", "2026-03-01T10:00:00Z", Some("t_1")))
        .unwrap();
    let reopened = FilePortfolioStore::open_or_create(tmp.path()).unwrap();
    assert_eq!(reopened.get("p_keep").unwrap().owner.as_deref(), Some("t_1"));
}
