//! CRC32 script checksums for drift detection.

/// Compute the checksum of a migration script.
///
/// The hash runs over each line's bytes with line terminators excluded, so
/// the same script checked out with LF or CRLF endings produces the same
/// checksum. A leading BOM is ignored.
pub fn checksum_of(script: &str) -> i32 {
    let mut hasher = crc32fast::Hasher::new();
    for line in script.lines() {
        let line = line.strip_prefix('\u{feff}').unwrap_or(line);
        hasher.update(line.as_bytes());
    }
    hasher.finalize() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_stable() {
        let script = "CREATE TABLE t (id INTEGER);\nINSERT INTO t VALUES (1);\n";
        assert_eq!(checksum_of(script), checksum_of(script));
    }

    #[test]
    fn test_checksum_changes_with_content() {
        assert_ne!(
            checksum_of("SELECT 1;"),
            checksum_of("SELECT 2;")
        );
    }

    #[test]
    fn test_line_endings_do_not_matter() {
        let unix = "SELECT 1;\nSELECT 2;\n";
        let windows = "SELECT 1;\r\nSELECT 2;\r\n";
        assert_eq!(checksum_of(unix), checksum_of(windows));
    }

    #[test]
    fn test_bom_ignored() {
        assert_eq!(checksum_of("\u{feff}SELECT 1;"), checksum_of("SELECT 1;"));
    }
}
