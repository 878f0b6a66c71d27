//! Language-keyed static JSON files: `{location}/{language}.json`.
//!
//! The location is either a local directory or a base URL serving the same
//! files. Records in these files carry no meaning IDs.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::{DataSource, SourceKind};
use crate::core::corpus::error::{CorpusError, Result};
use crate::core::corpus::fetch::Fetcher;
use crate::core::corpus::types::{Language, OccurrenceRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum StaticLocation {
    Directory(PathBuf),
    Url(Url),
}

impl StaticLocation {
    /// `http(s)://` locations are URLs, anything else a directory.
    pub fn parse(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let mut url = Url::parse(location)?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(StaticLocation::Url(url))
        } else {
            Ok(StaticLocation::Directory(PathBuf::from(location)))
        }
    }
}

pub struct StaticJsonSource {
    location: StaticLocation,
    fetcher: Fetcher,
}

impl StaticJsonSource {
    pub fn new(location: StaticLocation, fetcher: Fetcher) -> Self {
        Self { location, fetcher }
    }

    fn file_name(language: Language) -> String {
        format!("{}.json", language.as_str())
    }
}

#[async_trait]
impl DataSource for StaticJsonSource {
    fn kind(&self) -> SourceKind {
        SourceKind::LocalStatic
    }

    async fn load_records(&self, language: Language) -> Result<Vec<OccurrenceRecord>> {
        let file_name = Self::file_name(language);

        let records: Vec<OccurrenceRecord> = match &self.location {
            StaticLocation::Directory(dir) => {
                let path = dir.join(&file_name);
                let bytes = tokio::fs::read(&path).await?;
                serde_json::from_slice(&bytes).map_err(|e| CorpusError::decode(file_name.clone(), e))?
            }
            StaticLocation::Url(base) => {
                let url = base.join(&file_name)?;
                self.fetcher.get_json(&url, &file_name).await?
            }
        };

        info!(language = %language, records = records.len(), "loaded static records");
        Ok(records)
    }
}
