use crate::domain::ports::Storage;
use crate::utils::error::{FindRecordsError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

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

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_new_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.base_path.join(name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // create_new refuses to open an existing file, so nothing is ever truncated.
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(FindRecordsError::FileExists { path: full_path });
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(data).await?;
        file.flush().await?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path)
    }
}
