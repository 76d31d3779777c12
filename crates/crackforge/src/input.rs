//! Input-file reading and per-line MD5-format validation. Kept as a thin,
//! free-standing module rather than a pluggable trait: there is exactly one
//! input format in scope.

use std::path::Path;

use crackforge_core::normalize_hash;

/// One line of the input file, already trimmed and case-folded.
pub enum InputLine {
    /// A well-formed 32-hex MD5 digest.
    Hash(String),
    /// A non-empty line that failed `^[0-9a-f]{32}$` after normalization.
    Invalid(String),
}

/// Read `path` as UTF-8, one token per line. Empty lines (after trimming)
/// are skipped entirely; every other line is classified as a valid hash or
/// an invalid token, in file order.
pub fn read_lines(path: &Path) -> std::io::Result<Vec<InputLine>> {
    let body = std::fs::read_to_string(path)?;
    let mut lines = Vec::new();
    for raw in body.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        match normalize_hash(trimmed) {
            Ok(hash) => lines.push(InputLine::Hash(hash)),
            Err(_) => lines.push(InputLine::Invalid(trimmed.to_string())),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        let dir = std::env::temp_dir().join(format!("crackforge-input-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hashes.txt");
        std::fs::write(&path, format!("\n  {}  \n\nnot-a-hash\n", "a".repeat(32))).unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(matches!(&lines[0], InputLine::Hash(h) if h == &"a".repeat(32)));
        assert!(matches!(&lines[1], InputLine::Invalid(t) if t == "not-a-hash"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn uppercase_hash_is_normalized() {
        let dir = std::env::temp_dir().join(format!("crackforge-input-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hashes.txt");
        std::fs::write(&path, "A".repeat(32)).unwrap();

        let lines = read_lines(&path).unwrap();
        assert!(matches!(&lines[0], InputLine::Hash(h) if h == &"a".repeat(32)));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
