use super::*;
use std::fs;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_discover_versioned_and_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "V1__create_users.sql", "CREATE TABLE users (id INTEGER);");
    write(dir.path(), "V2.1__add_email.sql", "ALTER TABLE users ADD COLUMN email VARCHAR;");
    write(dir.path(), "R__user_views.sql", "CREATE OR REPLACE VIEW v AS SELECT 1;");
    write(dir.path(), "README.md", "not a migration");
    write(dir.path(), "helpers.sql", "-- ignored: no V/R prefix");

    let set = discover_migrations(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(set.versioned().len(), 2);
    assert_eq!(set.repeatable().len(), 1);

    let first = &set.versioned()[0];
    assert_eq!(first.version.as_ref().unwrap().to_string(), "1");
    assert_eq!(first.description, "create users");
    assert_eq!(first.script, "V1__create_users.sql");
    assert_eq!(first.sql, "CREATE TABLE users (id INTEGER);");

    assert_eq!(set.repeatable()[0].description, "user views");
}

#[test]
fn test_discover_orders_by_version_not_file_name() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "V10__ten.sql", "SELECT 10;");
    write(dir.path(), "V2__two.sql", "SELECT 2;");
    write(dir.path(), "V1__one.sql", "SELECT 1;");

    let set = discover_migrations(&[dir.path().to_path_buf()]).unwrap();
    let versions: Vec<String> = set
        .versioned()
        .iter()
        .map(|m| m.version.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(versions, vec!["1", "2", "10"]);
}

#[test]
fn test_discover_rejects_duplicate_versions() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "V1__a.sql", "SELECT 1;");
    write(dir.path(), "V1.0__b.sql", "SELECT 2;");

    let err = discover_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(err.to_string().contains("[E002]"), "{}", err);
}

#[test]
fn test_discover_rejects_malformed_names() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "V1_missing_separator.sql", "SELECT 1;");

    let err = discover_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(err.to_string().contains("V1_missing_separator.sql"), "{}", err);
}

#[test]
fn test_discover_missing_directory_is_skipped() {
    let set = discover_migrations(&[PathBuf::from("/nonexistent/migrations")]).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_discover_across_multiple_directories() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write(a.path(), "V1__one.sql", "SELECT 1;");
    write(b.path(), "V2__two.sql", "SELECT 2;");

    let set =
        discover_migrations(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap();
    assert_eq!(set.versioned().len(), 2);
}

#[test]
fn test_underscored_version_normalizes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "V1_2__thing.sql", "SELECT 1;");

    // The version part is "1_2", which reads as 1.2.
    let set = discover_migrations(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(
        set.versioned()[0].version.as_ref().unwrap().to_string(),
        "1.2"
    );
}
