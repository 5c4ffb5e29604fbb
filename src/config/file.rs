//! JSON file configuration provider.
//!
//! Nested objects are addressed with dotted keys:
//! `{"context": {"window": 128000}}` answers `context.window`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

pub struct FileConfigProvider {
    path: PathBuf,
    data: OnceCell<Map<String, Value>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file on first access. A missing file is an empty config.
    async fn data(&self) -> ConfigResult<&Map<String, Value>> {
        self.data
            .get_or_try_init(|| async {
                if !tokio::fs::try_exists(&self.path).await? {
                    tracing::debug!(path = %self.path.display(), "Config file not found");
                    return Ok(Map::new());
                }
                let content = tokio::fs::read_to_string(&self.path).await?;
                let data: Map<String, Value> = serde_json::from_str(&content)?;
                Ok::<_, ConfigError>(data)
            })
            .await
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        let data = self.data().await?;
        Ok(lookup(data, key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("loaded", &self.data.initialized())
            .finish()
    }
}
