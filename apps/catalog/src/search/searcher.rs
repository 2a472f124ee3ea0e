//! Index searcher
//!
//! Holds one immutable snapshot of the committed index. Writes become visible
//! only after [`IndexSearcher::refresh`]. Cached results are keyed by the
//! generation they were computed on, so a search still running on an older
//! snapshot can never serve its results after a refresh.

use crate::config::SearchConfig;
use crate::index::{IndexDirectory, IndexSnapshot};
use crate::search::evaluate::evaluate_query;
use crate::search::sort::order_hits;
use crate::search::{QueryParser, SpatialQuery};
use crate::{Error, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Snapshot generation and serialized query.
type CacheKey = (u64, String);

pub struct IndexSearcher {
    directory: Arc<dyn IndexDirectory>,
    snapshot: RwLock<Option<Arc<IndexSnapshot>>>,
    cache: Option<Mutex<LruCache<CacheKey, Arc<Vec<String>>>>>,
    parser: QueryParser,
    max_results: usize,
}

impl IndexSearcher {
    /// Open a searcher on the latest committed generation.
    pub fn open(directory: Arc<dyn IndexDirectory>, config: &SearchConfig) -> Result<Self> {
        let snapshot = Arc::new(IndexSnapshot::new(directory.load()?));
        tracing::info!(
            generation = snapshot.generation(),
            documents = snapshot.document_count(),
            "Index searcher opened"
        );

        Ok(Self {
            directory,
            snapshot: RwLock::new(Some(snapshot)),
            cache: NonZeroUsize::new(config.cache_size).map(|cap| Mutex::new(LruCache::new(cap))),
            parser: QueryParser::new(config.default_field.clone(), config.default_operator),
            max_results: config.max_results,
        })
    }

    fn current(&self) -> Result<Arc<IndexSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::IndexClosed)
    }

    /// Identifiers of the documents matching `query`, in result order and
    /// truncated to `search.max_results`.
    pub fn do_search(&self, query: &SpatialQuery) -> Result<Vec<String>> {
        let snapshot = self.current()?;
        let key = (snapshot.generation(), serde_json::to_string(query)?);

        if let Some(cache) = &self.cache {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.get(&key) {
                tracing::debug!(
                    query = %key.1,
                    generation = key.0,
                    "Search served from cache"
                );
                return Ok(hit.as_ref().clone());
            }
        }

        let hits = evaluate_query(query, &snapshot, &self.parser)?;
        let ids: Vec<String> = order_hits(&hits, query.sort(), &snapshot)
            .into_iter()
            .take(self.max_results)
            .filter_map(|doc| snapshot.document(doc))
            .map(|d| d.identifier().to_string())
            .collect();

        tracing::debug!(
            query = %key.1,
            matches = hits.len(),
            returned = ids.len(),
            generation = snapshot.generation(),
            "Search executed"
        );

        if let Some(cache) = &self.cache {
            // Entries for a replaced snapshot would never be read again
            let still_current = self
                .current()
                .is_ok_and(|current| current.generation() == key.0);
            if still_current {
                cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .put(key, Arc::new(ids.clone()));
            }
        }
        Ok(ids)
    }

    /// `Some(identifier)` when a document with this identifier is indexed.
    pub fn identifier_query(&self, identifier: &str) -> Result<Option<String>> {
        let snapshot = self.current()?;
        Ok(snapshot.ordinal(identifier).map(|_| identifier.to_string()))
    }

    /// Reload the latest committed generation. A load that lost a race with
    /// a newer refresh is dropped, so the installed generation never goes
    /// backwards.
    pub fn refresh(&self) -> Result<()> {
        // Fail before touching the directory when closed
        self.current()?;
        let snapshot = Arc::new(IndexSnapshot::new(self.directory.load()?));
        let generation = snapshot.generation();

        {
            let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                None => return Err(Error::IndexClosed),
                Some(installed) if installed.generation() > generation => {
                    tracing::debug!(
                        loaded = generation,
                        installed = installed.generation(),
                        "Refresh skipped older generation"
                    );
                    return Ok(());
                }
                Some(_) => *guard = Some(snapshot),
            }
        }
        self.clear_cache();

        tracing::info!(generation, "Index searcher refreshed");
        Ok(())
    }

    /// Release the snapshot. Every later call fails with `Error::IndexClosed`.
    pub fn destroy(&self) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.clear_cache();
        tracing::info!("Index searcher closed");
    }

    pub fn document_count(&self) -> Result<usize> {
        Ok(self.current()?.document_count())
    }

    pub fn generation(&self) -> Result<u64> {
        Ok(self.current()?.generation())
    }

    fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}
