use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use nas_domain::{ConfigRepository, GestureVocabulary, PrizeTable};

/// Stamp vocabulary in TOML, prize table in YAML. Missing files yield the built-in defaults.
pub struct ConfigFileRepository;

impl ConfigFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConfigFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

async fn ensure_parent_dir(path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl ConfigRepository for ConfigFileRepository {
    async fn load_gesture_vocabulary(&self, path: &str) -> anyhow::Result<GestureVocabulary> {
        if !Path::new(path).exists() {
            return Ok(GestureVocabulary::default());
        }
        let content = fs::read_to_string(path).await?;
        let vocabulary: GestureVocabulary = toml::from_str(&content)?;
        Ok(vocabulary)
    }

    async fn save_gesture_vocabulary(
        &self,
        path: &str,
        vocabulary: &GestureVocabulary,
    ) -> anyhow::Result<()> {
        ensure_parent_dir(path).await?;
        let content = toml::to_string(vocabulary)?;
        fs::write(path, content).await?;
        Ok(())
    }

    async fn load_prize_table(&self, path: &str) -> anyhow::Result<PrizeTable> {
        if !Path::new(path).exists() {
            return Ok(PrizeTable::default());
        }
        let content = fs::read_to_string(path).await?;
        let table: PrizeTable = serde_yaml::from_str(&content)?;
        Ok(table)
    }

    async fn save_prize_table(&self, path: &str, table: &PrizeTable) -> anyhow::Result<()> {
        ensure_parent_dir(path).await?;
        let content = serde_yaml::to_string(table)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
