// src/pipeline/references.rs

//! Reference file parsing.

use std::path::Path;

use crate::error::Result;
use crate::models::Citation;

/// Split a references blob into citations.
///
/// Entries are separated by a blank line; each entry is trimmed and empty
/// entries are dropped.
pub fn split_references(content: &str) -> Vec<Citation> {
    content
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Citation::new)
        .collect()
}

/// Read and parse the references file.
///
/// An unreadable file is the one fatal error of a run.
pub async fn read_references(path: &Path) -> Result<Vec<Citation>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(split_references(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_counts_entries() {
        let citations = split_references("Smith et al 2020 cancer\n\nJones 2019 diabetes");
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].text, "Smith et al 2020 cancer");
        assert_eq!(citations[1].text, "Jones 2019 diabetes");
    }

    #[test]
    fn test_split_trims_entries() {
        let citations = split_references("  padded entry \n\n\nnext one\n");
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].text, "padded entry");
        assert_eq!(citations[1].text, "next one");
    }

    #[test]
    fn test_split_drops_empty_entries() {
        let citations = split_references("first\n\n\n\n\n\nsecond\n\n");
        assert_eq!(citations.len(), 2);
    }

    #[test]
    fn test_split_handles_crlf() {
        let citations = split_references("first\r\n\r\nsecond");
        assert_eq!(citations.len(), 2);
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_references("").is_empty());
        assert!(split_references("\n\n\n").is_empty());
    }

    #[tokio::test]
    async fn test_read_references_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("references.txt");
        tokio::fs::write(&path, "a\n\nb\n\nc").await.unwrap();

        let citations = read_references(&path).await.unwrap();
        assert_eq!(citations.len(), 3);
    }

    #[tokio::test]
    async fn test_read_references_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.txt");

        assert!(read_references(&path).await.is_err());
    }
}
