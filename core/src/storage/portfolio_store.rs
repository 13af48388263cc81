//! Append-only stores for built portfolio documents.

use crate::determinism::ids::parse_rfc3339;
use crate::error::{CoreError, CoreResult};
use crate::portfolio::model::PortfolioDocument;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestFilter {
    pub owner: Option<String>,
}

impl LatestFilter {
    pub fn owner(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
        }
    }

    pub fn matches(&self, doc: &PortfolioDocument) -> bool {
        match &self.owner {
            Some(owner) => doc.owner.as_deref() == Some(owner.as_str()),
            None => true,
        }
    }
}

/// Documents are written once and never updated or deleted.
pub trait PortfolioStore: Send + Sync {
    fn put(&self, doc: &PortfolioDocument) -> CoreResult<String>;
    fn get(&self, id: &str) -> CoreResult<PortfolioDocument>;
    /// Most recent document by creation time; ties broken by id.
    fn get_latest(&self, filter: Option<&LatestFilter>) -> CoreResult<PortfolioDocument>;
}

fn recency_key(doc: &PortfolioDocument) -> (Option<OffsetDateTime>, &str) {
    (parse_rfc3339(&doc.created_at), doc.id.as_str())
}

fn pick_latest<'d, I>(docs: I, filter: Option<&LatestFilter>) -> Option<&'d PortfolioDocument>
where
    I: IntoIterator<Item = &'d PortfolioDocument>,
{
    docs.into_iter()
        .filter(|d| filter.map_or(true, |f| f.matches(d)))
        .max_by(|a, b| recency_key(a).cmp(&recency_key(b)))
}

fn not_found_latest(filter: Option<&LatestFilter>) -> CoreError {
    match filter.and_then(|f| f.owner.as_deref()) {
        Some(owner) => CoreError::NotFound(format!("no portfolio for owner {}", owner)),
        None => CoreError::NotFound("no portfolio has been built yet".to_string()),
    }
}

#[derive(Debug, Default)]
pub struct MemoryPortfolioStore {
    docs: Mutex<Vec<PortfolioDocument>>,
}

impl MemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, Vec<PortfolioDocument>>> {
        self.docs
            .lock()
            .map_err(|_| CoreError::Storage("portfolio store lock poisoned".to_string()))
    }
}

impl PortfolioStore for MemoryPortfolioStore {
    fn put(&self, doc: &PortfolioDocument) -> CoreResult<String> {
        let mut docs = self.lock()?;
        if docs.iter().any(|d| d.id == doc.id) {
            return Err(CoreError::Storage(format!(
                "portfolio {} already exists",
                doc.id
            )));
        }
        docs.push(doc.clone());
        Ok(doc.id.clone())
    }

    fn get(&self, id: &str) -> CoreResult<PortfolioDocument> {
        self.lock()?
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("portfolio {}", id)))
    }

    fn get_latest(&self, filter: Option<&LatestFilter>) -> CoreResult<PortfolioDocument> {
        let docs = self.lock()?;
        pick_latest(docs.iter(), filter)
            .cloned()
            .ok_or_else(|| not_found_latest(filter))
    }
}

/// Stores each document as `<root>/documents/<id>.json`.
pub struct FilePortfolioStore {
    root: PathBuf,
}

impl FilePortfolioStore {
    pub fn open_or_create(root: impl AsRef<Path>) -> CoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("documents"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn doc_path(&self, id: &str) -> CoreResult<PathBuf> {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CoreError::InvalidInput(format!(
                "invalid portfolio id {:?}",
                id
            )));
        }
        Ok(self.root.join("documents").join(format!("{}.json", id)))
    }

    fn read_all(&self) -> CoreResult<Vec<PortfolioDocument>> {
        let mut docs = Vec::new();
        for ent in fs::read_dir(self.root.join("documents"))? {
            let p = ent?.path();
            if p.extension().and_then(|x| x.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read(&p)
                .map_err(CoreError::from)
                .and_then(|bytes| Ok(serde_json::from_slice::<PortfolioDocument>(&bytes)?));
            match parsed {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!(path = %p.display(), "skipping unreadable portfolio: {}", e)
                }
            }
        }
        Ok(docs)
    }
}

impl PortfolioStore for FilePortfolioStore {
    fn put(&self, doc: &PortfolioDocument) -> CoreResult<String> {
        let path = self.doc_path(&doc.id)?;
        let bytes = serde_json::to_vec_pretty(doc)?;
        let mut f = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(CoreError::Storage(format!(
                    "portfolio {} already exists",
                    doc.id
                )));
            }
            Err(e) => return Err(e.into()),
        };
        f.write_all(&bytes)?;
        f.write_all(b"\n")?;
        tracing::debug!(portfolio_id = %doc.id, path = %path.display(), "portfolio stored");
        Ok(doc.id.clone())
    }

    fn get(&self, id: &str) -> CoreResult<PortfolioDocument> {
        let path = self.doc_path(id)?;
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoreError::NotFound(format!("portfolio {}", id)));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn get_latest(&self, filter: Option<&LatestFilter>) -> CoreResult<PortfolioDocument> {
        let docs = self.read_all()?;
        pick_latest(docs.iter(), filter)
            .cloned()
            .ok_or_else(|| not_found_latest(filter))
    }
}
