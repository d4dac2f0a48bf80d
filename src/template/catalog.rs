//! Template catalog: a directory or http(s) base URL holding mihomo config
//! templates, described by an `index.json`.

use std::fs;
use std::path::PathBuf;

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TemplateError;
use crate::utils::file::{file_exists, read_file};
use crate::utils::http::web_get;

/// Name of the catalog index inside a template source.
pub const INDEX_FILE: &str = "index.json";

lazy_static! {
    static ref TEMPLATE_FILE_REGEX: Regex = Regex::new(r"(?i)\.(ya?ml)$").unwrap();
}

/// One entry of `index.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TemplateEntry {
    /// Label shown to users: `name` when set, else the file name.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.file)
    }
}

/// Where templates are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Dir(PathBuf),
    Url(Url),
}

impl TemplateSource {
    /// Interpret a settings value: http(s) URLs are remote, anything else is a directory.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            // a trailing slash makes Url::join resolve relative to the base
            let base = if source.ends_with('/') {
                source.to_string()
            } else {
                format!("{}/", source)
            };
            Ok(TemplateSource::Url(Url::parse(&base)?))
        } else {
            Ok(TemplateSource::Dir(PathBuf::from(source)))
        }
    }

    fn read(&self, file: &str) -> Result<String, TemplateError> {
        match self {
            TemplateSource::Dir(dir) => Ok(read_file(&dir.join(file))?),
            TemplateSource::Url(base) => web_get(base.join(file)?.as_str()),
        }
    }
}

/// Loaded catalog; never empty.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    source: TemplateSource,
    entries: Vec<TemplateEntry>,
}

impl TemplateCatalog {
    /// Load the catalog from a settings value (directory path or base URL).
    pub fn open(source: &str) -> Result<Self, TemplateError> {
        Self::load(TemplateSource::parse(source)?)
    }

    /// Load the catalog index.
    ///
    /// A local directory without `index.json` falls back to listing every
    /// `*.yaml`/`*.yml` file it contains.
    pub fn load(source: TemplateSource) -> Result<Self, TemplateError> {
        let entries = match &source {
            TemplateSource::Dir(dir) if !file_exists(&dir.join(INDEX_FILE)) => {
                warn!(
                    "No {} in {}, listing YAML files instead",
                    INDEX_FILE,
                    dir.display()
                );
                scan_dir(dir)?
            }
            _ => parse_index(&source.read(INDEX_FILE)?)?,
        };

        if entries.is_empty() {
            return Err(TemplateError::EmptyCatalog);
        }
        info!("Loaded {} templates", entries.len());
        Ok(TemplateCatalog { source, entries })
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    /// First entry, used when no template is chosen explicitly.
    pub fn default_entry(&self) -> &TemplateEntry {
        &self.entries[0]
    }

    /// Read a template listed in the catalog, matched by file or display name.
    pub fn read_template(&self, file: &str) -> Result<String, TemplateError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.file == file)
            .or_else(|| self.entries.iter().find(|e| e.display_name() == file))
            .ok_or_else(|| TemplateError::UnknownTemplate(file.to_string()))?;
        debug!("Reading template {}", entry.file);
        self.source.read(&entry.file)
    }
}

/// Parse `index.json` contents.
pub fn parse_index(content: &str) -> Result<Vec<TemplateEntry>, TemplateError> {
    Ok(serde_json::from_str(content)?)
}

fn scan_dir(dir: &std::path::Path) -> Result<Vec<TemplateEntry>, TemplateError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if TEMPLATE_FILE_REGEX.is_match(name) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files
        .into_iter()
        .map(|file| TemplateEntry { file, name: None })
        .collect())
}
