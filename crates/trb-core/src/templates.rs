//! Persisted, ordered list of filename templates.
//!
//! The list lives in memory and is mirrored to a pretty-printed JSON array on
//! disk. Every successful mutation is written through immediately; a mutation
//! whose write fails is undone so memory and disk never disagree. Writes made
//! while the bot is running go through the blocking pool.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

#[derive(Debug)]
pub struct TemplateStore {
    path: PathBuf,
    templates: Vec<String>,
}

impl TemplateStore {
    /// Load the persisted list, or seed it when no file exists yet.
    ///
    /// The seed is written through right away so the file becomes the source of truth.
    pub fn open(path: impl Into<PathBuf>, seed: &[String]) -> Result<Self> {
        let path = path.into();
        if path.exists() || seed.is_empty() {
            let templates = load(&path);
            return Ok(Self { path, templates });
        }

        let templates = dedup(seed.to_vec());
        save(&path, &templates)?;
        tracing::info!(
            path = %path.display(),
            count = templates.len(),
            "seeded template list"
        );
        Ok(Self { path, templates })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current templates, insertion order.
    pub fn list(&self) -> &[String] {
        &self.templates
    }

    pub fn contains(&self, template: &str) -> bool {
        self.templates.iter().any(|t| t == template)
    }

    /// Append `template` unless the exact same string is already present.
    pub async fn add(&mut self, template: &str) -> Result<()> {
        if self.contains(template) {
            return Err(Error::DuplicateTemplate(template.to_string()));
        }

        self.templates.push(template.to_string());
        if let Err(e) = self.persist().await {
            self.templates.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove `template` if present (exact match).
    pub async fn remove(&mut self, template: &str) -> Result<()> {
        let Some(idx) = self.templates.iter().position(|t| t == template) else {
            return Err(Error::TemplateNotFound(template.to_string()));
        };

        let removed = self.templates.remove(idx);
        if let Err(e) = self.persist().await {
            self.templates.insert(idx, removed);
            return Err(e);
        }
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        let path = self.path.clone();
        let templates = self.templates.clone();
        tokio::task::spawn_blocking(move || save(&path, &templates))
            .await
            .map_err(|e| Error::External(format!("template save task failed: {e}")))?
    }
}

/// Read the persisted list. Missing or unreadable state is an empty list.
pub fn load(path: &Path) -> Vec<String> {
    let txt = match fs::read_to_string(path) {
        Ok(txt) => txt,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read template file, starting empty");
            return Vec::new();
        }
    };
    if txt.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<String>>(&txt) {
        Ok(list) => dedup(list),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed template file, starting empty");
            Vec::new()
        }
    }
}

/// Overwrite the persisted list: write a sibling temp file, then rename it into place.
pub fn save(path: &Path, templates: &[String]) -> Result<()> {
    let txt = serde_json::to_string_pretty(templates)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Config(format!("invalid templates path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, txt)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn dedup(list: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for item in list {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
