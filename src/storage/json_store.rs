use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// A flat JSON array on disk. Every mutation reads the whole array, changes it
/// and rewrites the whole file.
pub struct JsonStore<T> {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            write_lock: self.write_lock.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read_all(&self) -> Result<Vec<T>> {
        read_array(&self.path).await
    }

    /// Read-modify-write under this store's lock. Nothing is written when `f` fails.
    pub async fn update<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = read_array(&self.path).await?;
        let out = f(&mut items)?;
        write_array(&self.path, &items).await?;
        Ok(out)
    }

    /// Writes `items` only when the file is missing or holds an empty array.
    pub async fn seed_if_empty(&self, items: Vec<T>) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let existing: Vec<T> = read_array(&self.path).await?;
        if !existing.is_empty() {
            return Ok(false);
        }
        write_array(&self.path, &items).await?;
        Ok(true)
    }
}

async fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&raw)
        .map_err(|e| Error::Internal(format!("Corrupt data file {}: {}", path.display(), e)))
}

async fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(items)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("assessment-store-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let store: JsonStore<String> = JsonStore::new(temp_file("missing.json"));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() {
        let store: JsonStore<String> = JsonStore::new(temp_file("items.json"));
        store
            .update(|items| {
                items.push("a".to_string());
                Ok(())
            })
            .await
            .unwrap();

        let res: Result<()> = store
            .update(|items| {
                items.clear();
                Err(Error::BadRequest("nope".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.read_all().await.unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() {
        let store: JsonStore<u32> = JsonStore::new(temp_file("counts.json"));
        let mut handles = Vec::new();
        for i in 0..20u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(|items| {
                        items.push(i);
                        Ok(())
                    })
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(store.read_all().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = temp_file("bad.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let store: JsonStore<String> = JsonStore::new(path);
        assert!(matches!(store.read_all().await, Err(Error::Internal(_))));
    }
}
