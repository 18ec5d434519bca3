use anisync_models::{Record, TargetId};
use anisync_sources::{SourceError, TargetCatalog};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::title_match::same_work;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no target found for {0}")]
    NotFound(String),

    #[error("failed to look up {title} by id {id}: {source}")]
    Lookup {
        title: String,
        id: TargetId,
        #[source]
        source: SourceError,
    },

    #[error("failed to search targets for {title}: {source}")]
    Search {
        title: String,
        #[source]
        source: SourceError,
    },
}

/// Target records already fetched in bulk, keyed by their target id
pub struct TargetIndex<R> {
    by_id: HashMap<TargetId, R>,
}

impl<R: Record> TargetIndex<R> {
    pub fn new(records: Vec<R>) -> Self {
        let by_id = records.into_iter().map(|r| (r.target_id(), r)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: TargetId) -> Option<&R> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// How a target was reached, for trace logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Index,
    Lookup,
    Search,
}

/// Find the target record corresponding to `source`.
///
/// Order: the bulk index, then a single-record lookup when the source carries a
/// target id, then a title search. A lookup that reports the id as unknown falls
/// through to the search.
pub async fn resolve<R>(
    source: &R,
    index: &TargetIndex<R>,
    catalog: &dyn TargetCatalog<R>,
    search_limit: usize,
) -> Result<(R, Resolution), ResolveError>
where
    R: Record + Clone + 'static,
{
    let id = source.target_id();
    let title = source.display_title().to_string();

    if let Some(target) = index.get(id) {
        return Ok((target.clone(), Resolution::Index));
    }

    if id.is_known() {
        debug!("Finding target by id: {}", id);
        match catalog.get_by_id(id).await {
            Ok(target) => return Ok((target, Resolution::Lookup)),
            Err(e) if e.is_not_found() => {
                debug!("Target id {} not found, searching by name instead", id);
            }
            Err(source) => return Err(ResolveError::Lookup { title, id, source }),
        }
    }

    debug!("Finding target by name: {}", title);
    let candidates = catalog
        .search_by_title(&title, search_limit)
        .await
        .map_err(|source| ResolveError::Search {
            title: title.clone(),
            source,
        })?;

    for candidate in candidates {
        if is_same_target(source, &candidate) {
            debug!("Found target by name: {}", title);
            return Ok((candidate, Resolution::Search));
        }
        debug!("Ignoring candidate: {}", candidate.display_title());
    }

    Err(ResolveError::NotFound(title))
}

/// A search candidate is accepted on a shared known target id or on the title heuristics
fn is_same_target<R: Record>(source: &R, candidate: &R) -> bool {
    if source.target_id().is_known() && source.target_id() == candidate.target_id() {
        return true;
    }
    same_work(source.titles(), candidate.titles())
}
