//! Process-wide caches of every gene (or drug) name DGIdb knows about.
//!
//! A list is fetched once at startup and handed out as an immutable
//! [`Arc<GeneList>`] snapshot. [`GeneListCache::refresh`] is the only way to
//! replace it; a failed refresh leaves the previous snapshot in place.
//! Drug lists reuse the same types, keyed by [`SearchMode::Drugs`].

use chrono::{DateTime, Utc};
use dgirs_common::Result;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{GeneListEntry, SearchMode};
use crate::sources::InteractionSource;

#[derive(Debug, Clone, Serialize)]
pub struct GeneList {
    pub entries: Vec<GeneListEntry>,
    /// `None` until the first successful fetch.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl GeneList {
    pub fn empty() -> Self {
        Self { entries: Vec::new(), loaded_at: None }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug)]
pub struct GeneListCache {
    /// Which list this cache holds.
    mode: SearchMode,
    current: RwLock<Arc<GeneList>>,
}

impl Default for GeneListCache {
    fn default() -> Self {
        Self::new(GeneList::empty())
    }
}

impl GeneListCache {
    /// A gene list cache.
    pub fn new(list: GeneList) -> Self {
        Self::with_mode(SearchMode::Genes, list)
    }

    pub fn with_mode(mode: SearchMode, list: GeneList) -> Self {
        Self { mode, current: RwLock::new(Arc::new(list)) }
    }

    /// Fetch the initial gene list. Failures are logged and leave the cache
    /// empty so the dashboard can still start.
    pub async fn load(source: &dyn InteractionSource) -> Self {
        Self::load_mode(SearchMode::Genes, source).await
    }

    /// Fetch the initial drug list, with the same failure handling as [`Self::load`].
    pub async fn load_drugs(source: &dyn InteractionSource) -> Self {
        Self::load_mode(SearchMode::Drugs, source).await
    }

    async fn load_mode(mode: SearchMode, source: &dyn InteractionSource) -> Self {
        let cache = Self::with_mode(mode, GeneList::empty());
        if let Err(e) = cache.refresh(source).await {
            warn!(error = %e, %mode, "Could not load DGIdb name list; starting with an empty list");
        }
        cache
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub async fn snapshot(&self) -> Arc<GeneList> {
        self.current.read().await.clone()
    }

    /// Fetch a fresh list and swap it in.
    pub async fn refresh(&self, source: &dyn InteractionSource) -> Result<Arc<GeneList>> {
        let entries = match self.mode {
            SearchMode::Genes => source.gene_list().await?,
            SearchMode::Drugs => source.drug_list().await?,
        };
        let list = Arc::new(GeneList { entries, loaded_at: Some(Utc::now()) });
        info!(n = list.len(), mode = %self.mode, "Name list refreshed");
        *self.current.write().await = list.clone();
        Ok(list)
    }
}
