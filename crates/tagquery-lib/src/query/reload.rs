//! Hot reload of rule text.

use std::sync::Arc;

use super::{Query, QueryBuilder};
use crate::Error;

/// A compiled query that follows edits to its rule text.
///
/// Recompiles only when the text's CRC32 changes. A failed recompile leaves
/// the previous query in service.
#[derive(Debug, Clone)]
pub struct ReloadableQuery {
    current: Arc<Query>,
    checksum: u32,
}

impl ReloadableQuery {
    pub fn new(source: &str) -> Result<Self, Error> {
        Ok(Self::from_query(Query::new(source)?))
    }

    pub fn from_query(query: Query) -> Self {
        let checksum = crc32fast::hash(query.source().as_bytes());
        Self {
            current: Arc::new(query),
            checksum,
        }
    }

    /// The query in service. Cheap to clone and hand to other threads.
    pub fn current(&self) -> Arc<Query> {
        Arc::clone(&self.current)
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Returns `Ok(true)` when a new query was swapped in, `Ok(false)` when the
    /// text is unchanged.
    pub fn reload(&mut self, source: &str) -> Result<bool, Error> {
        self.reload_with(QueryBuilder::new(source))
    }

    pub fn reload_with(&mut self, builder: QueryBuilder<'_>) -> Result<bool, Error> {
        let checksum = crc32fast::hash(builder.source.as_bytes());
        if checksum == self.checksum && builder.source == self.current.source() {
            return Ok(false);
        }

        let query = match builder.build() {
            Ok(query) => query,
            Err(err) => {
                tracing::debug!(checksum, "keeping previous tag rules: {err}");
                return Err(err);
            }
        };

        tracing::debug!(
            from = self.checksum,
            to = checksum,
            rules = query.rule_count(),
            "reloaded tag rules"
        );
        self.current = Arc::new(query);
        self.checksum = checksum;
        Ok(true)
    }
}
