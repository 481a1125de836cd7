use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

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

    // 先寫入同目錄的暫存檔再 rename，失敗時暫存檔隨 NamedTempFile drop 一併刪除
    fn write_atomic(&self, full_path: &Path, data: &[u8]) -> std::io::Result<()> {
        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(full_path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = self.base_path.join(path);
        tracing::debug!("💾 Writing {} bytes to {}", data.len(), full_path.display());

        self.write_atomic(&full_path, data)
            .map_err(|source| EtlError::Export {
                path: full_path.display().to_string(),
                source,
            })?;

        Ok(full_path.display().to_string())
    }
}
