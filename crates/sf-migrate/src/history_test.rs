use super::*;
use sf_db::DuckDbBackend;

fn history(db: Arc<dyn Database>) -> SchemaHistory {
    SchemaHistory::new(
        db,
        DialectProfile::duckdb(),
        None,
        "schemaflow_history".to_string(),
        "tester".to_string(),
    )
}

fn memory_db() -> Arc<dyn Database> {
    Arc::new(DuckDbBackend::in_memory().unwrap())
}

fn entry(version: Option<&str>, description: &str, success: bool) -> HistoryEntry {
    HistoryEntry {
        version: version.map(|v| MigrationVersion::parse(v).unwrap()),
        description: description.to_string(),
        kind: HistoryType::Sql,
        script: format!("{}.sql", description),
        checksum: Some(42),
        execution_time_ms: 7,
        success,
    }
}

#[tokio::test]
async fn test_create_is_idempotent() {
    let ledger = history(memory_db());
    assert!(!ledger.exists().await.unwrap());

    ledger.create(None).await.unwrap();
    assert!(ledger.exists().await.unwrap());

    // Second create is a no-op, not an error.
    ledger.create(None).await.unwrap();
    assert!(ledger.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_assigns_increasing_ranks() {
    let ledger = history(memory_db());
    ledger.create(None).await.unwrap();

    let first = ledger.append(entry(Some("1"), "init", true)).await.unwrap();
    let second = ledger.append(entry(Some("2"), "more", true)).await.unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 2);

    let snapshot = ledger.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].installed_rank, 1);
    assert_eq!(snapshot[1].installed_rank, 2);
}

#[tokio::test]
async fn test_snapshot_round_trips_fields() {
    let ledger = history(memory_db());
    ledger.create(None).await.unwrap();
    ledger
        .append(entry(Some("1.2"), "add user's table", true))
        .await
        .unwrap();

    let snapshot = ledger.snapshot().await.unwrap();
    let record = &snapshot[0];
    assert_eq!(record.version.as_ref().unwrap().to_string(), "1.2");
    assert_eq!(record.description, "add user's table");
    assert_eq!(record.kind, HistoryType::Sql);
    assert_eq!(record.script, "add user's table.sql");
    assert_eq!(record.checksum, Some(42));
    assert_eq!(record.installed_by, "tester");
    assert_eq!(record.execution_time_ms, 7);
    assert!(record.success);
}

#[tokio::test]
async fn test_snapshot_of_missing_table_is_empty() {
    let ledger = history(memory_db());
    assert!(ledger.snapshot().await.unwrap().is_empty());
    assert!(!ledger.has_failed().await.unwrap());
}

#[tokio::test]
async fn test_failed_rows_are_kept_and_found() {
    let ledger = history(memory_db());
    ledger.create(None).await.unwrap();
    ledger.append(entry(Some("1"), "ok", true)).await.unwrap();
    ledger.append(entry(Some("2"), "broken", false)).await.unwrap();

    assert!(ledger.has_failed().await.unwrap());
    let failed = ledger.first_failed().await.unwrap().unwrap();
    assert_eq!(failed.installed_rank, 2);
    assert_eq!(failed.description, "broken");

    // The failed row never disappears from the snapshot.
    assert_eq!(ledger.snapshot().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_latest_applied_version() {
    let ledger = history(memory_db());
    ledger.create(None).await.unwrap();
    assert!(ledger.latest_applied_version().await.unwrap().is_none());

    ledger.append(entry(Some("1"), "a", true)).await.unwrap();
    ledger.append(entry(Some("10"), "b", true)).await.unwrap();
    ledger.append(entry(Some("2"), "c", true)).await.unwrap();
    ledger.append(entry(None, "views", true)).await.unwrap();

    let latest = ledger.latest_applied_version().await.unwrap().unwrap();
    assert_eq!(latest.to_string(), "10");
}

#[tokio::test]
async fn test_applied_checksum_for() {
    let ledger = history(memory_db());
    ledger.create(None).await.unwrap();
    ledger.append(entry(Some("1"), "a", true)).await.unwrap();

    let version = MigrationVersion::parse("1").unwrap();
    assert_eq!(ledger.applied_checksum_for(&version).await.unwrap(), Some(42));

    let other = MigrationVersion::parse("9").unwrap();
    assert_eq!(ledger.applied_checksum_for(&other).await.unwrap(), None);
}

#[tokio::test]
async fn test_create_with_baseline_marker() {
    let ledger = history(memory_db());
    let baseline = MigrationVersion::parse("3").unwrap();
    ledger
        .create(Some((&baseline, "<< Baseline >>")))
        .await
        .unwrap();

    let snapshot = ledger.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].kind, HistoryType::Baseline);
    assert_eq!(snapshot[0].version.as_ref().unwrap().to_string(), "3");
    assert!(snapshot[0].checksum.is_none());

    let latest = ledger.latest_applied_version().await.unwrap().unwrap();
    assert_eq!(latest.to_string(), "3");
}

#[tokio::test]
async fn test_schemas_marker() {
    let ledger = history(memory_db());
    ledger.create(None).await.unwrap();
    ledger
        .add_schemas_marker(&["audit".to_string(), "staging".to_string()])
        .await
        .unwrap();

    let snapshot = ledger.snapshot().await.unwrap();
    assert_eq!(snapshot[0].kind, HistoryType::Schema);
    assert_eq!(snapshot[0].script, "audit,staging");
    assert!(snapshot[0].version.is_none());
}

#[tokio::test]
async fn test_history_in_dedicated_schema() {
    let db = memory_db();
    db.create_schema("audit").await.unwrap();
    let ledger = SchemaHistory::new(
        db.clone(),
        DialectProfile::duckdb(),
        Some("audit".to_string()),
        "schemaflow_history".to_string(),
        "tester".to_string(),
    );

    ledger.create(None).await.unwrap();
    assert!(db
        .table_exists(Some("audit"), "schemaflow_history")
        .await
        .unwrap());
    ledger.append(entry(Some("1"), "a", true)).await.unwrap();
    assert_eq!(ledger.snapshot().await.unwrap().len(), 1);
}
