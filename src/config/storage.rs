use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 以本機目錄作為存放區；絕對路徑會直接使用
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn file_size(&self, path: &str) -> Result<u64> {
        let metadata = tokio::fs::metadata(self.base_path.join(path)).await?;
        Ok(metadata.len())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        tokio_test::block_on(storage.write_file("a.csv", b"URL\n")).unwrap();
        let data = tokio_test::block_on(storage.read_file("a.csv")).unwrap();

        assert_eq!(data, b"URL\n");
        assert_eq!(tokio_test::block_on(storage.file_size("a.csv")).unwrap(), 4);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = tokio_test::block_on(storage.read_file("missing.csv")).unwrap_err();
        assert!(matches!(err, EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound));

        let err = tokio_test::block_on(storage.file_size("missing.csv")).unwrap_err();
        assert!(matches!(err, EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
