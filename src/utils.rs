use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Unable to write to {}", path.display()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Create a directory and any missing parents.
pub(crate) async fn make_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory at {}", path.display()))
}

/// Resolve `path` to an absolute path. Fails if it does not exist.
pub(crate) async fn canonicalize(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        write(&path, "hello").await.unwrap();
        assert_eq!(read(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_make_dir_and_canonicalize() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("x").join("y");
        make_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        let abs = canonicalize(&nested).await.unwrap();
        assert!(abs.is_absolute());
        assert!(canonicalize(&dir.path().join("nope")).await.is_err());
    }
}
