use super::*;
use sf_core::DialectProfile;

fn split(script: &str, profile: &DialectProfile) -> Vec<StatementFragment> {
    ScriptTokenizer::tokenize(script, profile).unwrap()
}

fn sqls(script: &str, profile: &DialectProfile) -> Vec<String> {
    split(script, profile).into_iter().map(|f| f.sql).collect()
}

#[test]
fn test_simple_statements() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("CREATE TABLE t (id INTEGER);\nINSERT INTO t VALUES (1);\n", &profile);
    assert_eq!(
        fragments,
        vec!["CREATE TABLE t (id INTEGER)", "INSERT INTO t VALUES (1)"]
    );
}

#[test]
fn test_trailing_statement_without_delimiter() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("SELECT 1;\nSELECT 2", &profile);
    assert_eq!(fragments, vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_empty_fragments_suppressed() {
    let profile = DialectProfile::duckdb();
    assert_eq!(sqls(";;  ;\n;", &profile), Vec::<String>::new());
    assert_eq!(sqls("SELECT 1;;SELECT 2;", &profile), vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_comment_only_fragments_suppressed() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("-- just a note\n;\n/* and another */;", &profile);
    assert!(fragments.is_empty());
}

#[test]
fn test_whitespace_only_script() {
    let profile = DialectProfile::duckdb();
    assert!(split("   \n\t\n", &profile).is_empty());
    assert!(split("", &profile).is_empty());
}

#[test]
fn test_delimiter_inside_string_ignored() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("INSERT INTO t VALUES ('a;b');SELECT 1;", &profile);
    assert_eq!(fragments, vec!["INSERT INTO t VALUES ('a;b')", "SELECT 1"]);
}

#[test]
fn test_escaped_quote_inside_string() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("SELECT 'it''s; fine';", &profile);
    assert_eq!(fragments, vec!["SELECT 'it''s; fine'"]);
}

#[test]
fn test_delimiter_inside_line_comment_ignored() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("SELECT 1; -- trailing; note\nSELECT 2;", &profile);
    assert_eq!(fragments.len(), 2);
    assert!(fragments[1].ends_with("SELECT 2"));
}

#[test]
fn test_delimiter_inside_block_comment_ignored() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("SELECT /* ; */ 1;", &profile);
    assert_eq!(fragments, vec!["SELECT /* ; */ 1"]);
}

#[test]
fn test_nested_block_comment() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("/* outer /* inner; */ still; */ SELECT 1;", &profile);
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].ends_with("SELECT 1"));
}

#[test]
fn test_delimiter_inside_parens_ignored() {
    let profile = DialectProfile::duckdb();
    // A paren region spanning what would otherwise be a boundary.
    let fragments = sqls("SELECT (\n';'\n);SELECT 2;", &profile);
    assert_eq!(fragments.len(), 2);
}

#[test]
fn test_quoted_identifier_scanned_atomically() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls(r#"SELECT "weird;name" FROM t;"#, &profile);
    assert_eq!(fragments, vec![r#"SELECT "weird;name" FROM t"#]);
}

#[test]
fn test_bracket_identifier_for_sqlserver() {
    let profile = DialectProfile::sqlserver();
    let fragments = sqls("SELECT [odd;col] FROM t\nGO\n", &profile);
    assert_eq!(fragments, vec!["SELECT [odd;col] FROM t"]);
}

#[test]
fn test_backtick_identifier_for_mysql() {
    let profile = DialectProfile::mysql();
    let fragments = sqls("SELECT `a;b` FROM t;", &profile);
    assert_eq!(fragments, vec!["SELECT `a;b` FROM t"]);
}

// Block keywords suppress the inner semicolons, the semicolon after END
// closes the statement, and the stray GO at end of input becomes a
// trailing fragment.
#[test]
fn test_block_keywords_suppress_delimiters() {
    let profile = DialectProfile {
        default_delimiter: sf_core::Delimiter::semicolon(),
        ..DialectProfile::sqlserver()
    };
    let fragments = sqls(
        "CREATE PROC p AS BEGIN SELECT 1; SELECT 2; END; GO",
        &profile,
    );
    assert_eq!(
        fragments,
        vec!["CREATE PROC p AS BEGIN SELECT 1; SELECT 2; END", "GO"]
    );
}

#[test]
fn test_go_delimiter_alone_on_line() {
    let profile = DialectProfile::sqlserver();
    let script = "CREATE PROC p AS\nBEGIN\n  SELECT 1;\n  SELECT 2;\nEND;\nGO\nSELECT 3\nGO\n";
    let fragments = sqls(script, &profile);
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].starts_with("CREATE PROC p AS"));
    assert!(fragments[0].ends_with("END;"));
    assert_eq!(fragments[1], "SELECT 3");
}

#[test]
fn test_go_not_matched_inline() {
    let profile = DialectProfile::sqlserver();
    let fragments = sqls("SELECT category FROM products WHERE name = 'GO'\nGO\n", &profile);
    assert_eq!(fragments.len(), 1);
}

#[test]
fn test_go_line_with_leading_whitespace() {
    let profile = DialectProfile::sqlserver();
    let fragments = sqls("SELECT 1\n   go   \nSELECT 2\nGO", &profile);
    assert_eq!(fragments, vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_nested_blocks() {
    let profile = DialectProfile::sqlserver();
    let script = "CREATE PROC p AS\nBEGIN\n  SELECT CASE WHEN 1 = 1 THEN 'y' ELSE 'n' END;\n  SELECT 2;\nEND\nGO\n";
    let fragments = sqls(script, &profile);
    assert_eq!(fragments.len(), 1);
}

#[test]
fn test_block_depth_underflow_is_fatal() {
    let profile = DialectProfile::sqlserver();
    let mut tokenizer = ScriptTokenizer::new("END;", &profile);
    let err = tokenizer.next().unwrap().unwrap_err();
    assert!(matches!(err, ScriptError::BlockDepthUnderflow));
    // The parse aborts: nothing further is produced.
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_block_keyword_not_matched_inside_word() {
    let profile = DialectProfile::sqlserver();
    // ENDING must not close a block, BEGINNING must not open one.
    let fragments = sqls("SELECT beginning, ending FROM t;\nGO", &profile);
    assert_eq!(fragments.len(), 1);
}

#[test]
fn test_delimiter_directive_rewrites_delimiter() {
    let profile = DialectProfile::mysql();
    let script = "DELIMITER $$\nCREATE PROCEDURE p()\nBEGIN\n  SELECT 1;\nEND$$\nDELIMITER ;\nSELECT 2;\n";
    let fragments = split(script, &profile);
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].sql.starts_with("CREATE PROCEDURE p()"));
    assert!(fragments[0].sql.ends_with("END"));
    assert_eq!(fragments[0].delimiter.token, "$$");
    assert_eq!(fragments[1].sql, "SELECT 2");
    assert_eq!(fragments[1].delimiter.token, ";");
}

#[test]
fn test_delimiter_directive_applies_only_after_its_line() {
    let profile = DialectProfile::mysql();
    let script = "SELECT 1;\nDELIMITER //\nSELECT 2//\n";
    let fragments = sqls(script, &profile);
    assert_eq!(fragments, vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_delimiter_directive_ignored_without_support() {
    let profile = DialectProfile::duckdb();
    let fragments = sqls("DELIMITER $$\nSELECT 1;", &profile);
    // The directive line is ordinary statement text for this dialect.
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].starts_with("DELIMITER $$"));
}

#[test]
fn test_dollar_quoted_body() {
    let profile = DialectProfile::postgres();
    let script = "CREATE FUNCTION f() RETURNS int AS $$ SELECT 1; $$ LANGUAGE sql;SELECT 2;";
    let fragments = sqls(script, &profile);
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].contains("$$ SELECT 1; $$"));
    assert_eq!(fragments[1], "SELECT 2");
}

#[test]
fn test_tagged_dollar_quote() {
    let profile = DialectProfile::postgres();
    let script = "CREATE FUNCTION f() AS $body$ SELECT ';'; $body$;SELECT 2;";
    let fragments = sqls(script, &profile);
    assert_eq!(fragments.len(), 2);
}

#[test]
fn test_positional_parameter_is_not_a_dollar_quote() {
    let profile = DialectProfile::postgres();
    let fragments = sqls("PREPARE p AS SELECT $1;EXECUTE p(2);", &profile);
    assert_eq!(fragments, vec!["PREPARE p AS SELECT $1", "EXECUTE p(2)"]);
}

#[test]
fn test_start_lines() {
    let profile = DialectProfile::duckdb();
    let fragments = split("SELECT 1;\n\nSELECT 2;\n  SELECT\n  3;", &profile);
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[0].start_line, 1);
    assert_eq!(fragments[1].start_line, 3);
    assert_eq!(fragments[2].start_line, 4);
}

#[test]
fn test_retokenizing_is_idempotent() {
    let profile = DialectProfile::sqlserver();
    let script = "CREATE PROC p AS\nBEGIN\n  SELECT 1;\nEND\nGO\nSELECT 'GO';\nGO\n";
    let first = split(script, &profile);
    let second = split(script, &profile);
    assert_eq!(first, second);
}

#[test]
fn test_parens_depth_never_blocks_later_statements() {
    let profile = DialectProfile::duckdb();
    // Stray closer saturates; the following statement still splits.
    let fragments = sqls("SELECT 1);SELECT 2;", &profile);
    assert_eq!(fragments.len(), 2);
}

#[test]
fn test_multiline_string_spanning_boundary_chars() {
    let profile = DialectProfile::duckdb();
    let script = "INSERT INTO t VALUES ('line1\nGO\nline3');SELECT 1;";
    let fragments = sqls(script, &profile);
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].contains("line1\nGO\nline3"));
}
