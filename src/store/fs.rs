//! File system access for the route store.
//!
//! The store only talks to `FileReader`, so tests and embedders can serve
//! definitions from memory instead of disk.

use async_trait::async_trait;
use glob::Pattern;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// File system operations the route store needs.
#[async_trait]
pub trait FileReader: Send + Sync + std::fmt::Debug {
    fn directory_exists(&self, path: &Path) -> bool;

    fn file_exists(&self, path: &Path) -> bool;

    /// Files directly inside `dir` whose name matches `pattern`, sorted by name.
    async fn list_files(&self, dir: &Path, pattern: &Pattern) -> io::Result<Vec<PathBuf>>;

    async fn read_all_text(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the local disk via `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader;

#[async_trait]
impl FileReader for FsFileReader {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    async fn list_files(&self, dir: &Path, pattern: &Pattern) -> io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if name.to_str().is_some_and(|n| pattern.matches(n)) {
                files.push(entry.path());
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    async fn read_all_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// Serves files from an in-memory map of path → content.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileReader {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFileReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

#[async_trait]
impl FileReader for MemoryFileReader {
    fn directory_exists(&self, path: &Path) -> bool {
        self.files.keys().any(|f| f.parent() == Some(path))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    async fn list_files(&self, dir: &Path, pattern: &Pattern) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter(|f| f.parent() == Some(dir))
            .filter(|f| {
                f.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| pattern.matches(n))
            })
            .cloned()
            .collect())
    }

    async fn read_all_text(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(text: &str) -> Pattern {
        Pattern::new(text).unwrap()
    }

    #[tokio::test]
    async fn test_file_patterns() {
        let names = [
            "users.http",
            ".http",
            "users.http.bak",
            "users.rest",
            "api-1.http",
            "api-12.http",
            "aXXbYYc",
            "aXXbYY",
        ];
        let reader = names.iter().fold(MemoryFileReader::new(), |reader, name| {
            reader.with_file(Path::new("/mocks").join(name), "GET /\n")
        });

        let listed = |files: Vec<PathBuf>| -> Vec<String> {
            files
                .iter()
                .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        let dir = Path::new("/mocks");

        let http = reader.list_files(dir, &pattern("*.http")).await.unwrap();
        assert_eq!(listed(http), vec![".http", "api-1.http", "api-12.http", "users.http"]);

        let single = reader.list_files(dir, &pattern("api-?.http")).await.unwrap();
        assert_eq!(listed(single), vec!["api-1.http"]);

        let nested = reader.list_files(dir, &pattern("a*b*c")).await.unwrap();
        assert_eq!(listed(nested), vec!["aXXbYYc"]);

        let all = reader.list_files(dir, &pattern("*")).await.unwrap();
        assert_eq!(all.len(), names.len());
    }

    #[tokio::test]
    async fn test_fs_reader_lists_sorted_matches() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.http", "a.http", "notes.txt"] {
            std::fs::write(dir.path().join(name), "GET /\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.http")).unwrap();

        let reader = FsFileReader;
        assert!(reader.directory_exists(dir.path()));
        assert!(reader.file_exists(&dir.path().join("a.http")));

        let files = reader.list_files(dir.path(), &pattern("*.http")).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.http", "b.http"]);
        assert_eq!(reader.read_all_text(&files[0]).await.unwrap(), "GET /\n");
    }

    #[tokio::test]
    async fn test_memory_reader() {
        let reader = MemoryFileReader::new()
            .with_file("/mocks/b.http", "GET /b\n")
            .with_file("/mocks/a.http", "GET /a\n")
            .with_file("/other/c.http", "GET /c\n");

        let dir = Path::new("/mocks");
        assert!(reader.directory_exists(dir));
        assert!(!reader.directory_exists(Path::new("/missing")));

        let files = reader.list_files(dir, &pattern("*.http")).await.unwrap();
        assert_eq!(files, vec![PathBuf::from("/mocks/a.http"), PathBuf::from("/mocks/b.http")]);

        let err = reader.read_all_text(Path::new("/mocks/z.http")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
