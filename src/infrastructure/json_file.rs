use crate::domain::ports::SettingsStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

type SettingsMap = BTreeMap<String, BTreeMap<String, String>>;

/// A settings store persisted as a single JSON document on disk.
///
/// The whole file is read on every access and rewritten on every `set`,
/// which is fine for the handful of keys a provider keeps. Writes go to a
/// sibling temp file that is renamed over the old one, so readers see either
/// the previous or the new document. `Clone` shares the write lock.
#[derive(Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileSettingsStore {
    /// Opens the store at `path`. A missing file reads as empty settings and
    /// is created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read_all(&self) -> Result<SettingsMap> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(SettingsMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SettingsMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn get(&self, event: &str, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let all = self.read_all().await?;
        Ok(all.get(event).and_then(|s| s.get(key)).cloned())
    }

    async fn set(&self, event: &str, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut all = self.read_all().await?;
        all.entry(event.to_string())
            .or_default()
            .insert(key.to_string(), value);
        let bytes = serde_json::to_vec_pretty(&all)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &bytes))
            .await
            .map_err(|e| PaymentError::Storage(format!("Settings write aborted: {}", e)))?
    }
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
