//! The dispatch table: an immutable prefix-routing structure, rebuilt
//! wholesale on every reconciliation and published through an atomically
//! swappable handle.
//!
//! # Design
//!
//! - A table is never mutated after construction. Reconciliation builds a
//!   fresh table and publishes it with one atomic pointer store; readers do
//!   one atomic load per request. Neither side blocks the other.
//! - A request that loaded the old table finishes on the old table; the old
//!   table is dropped once the last such reader releases its `Arc`.
//! - Match rule: a request path matches an entry when it starts with the
//!   entry's prefix. The first matching entry in table order wins. Table
//!   order preserves registration order, so precedence is explicit and
//!   stable rather than derived from prefix length.

use std::sync::Arc;

use arc_swap::ArcSwap;
use url::Url;

use crate::domain::Mapping;

/// A single prefix rule derived from an enabled [`Mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    /// Path prefix this entry matches.
    pub prefix: String,
    /// Parsed upstream URL the matched request is forwarded to.
    pub target: Url,
}

/// The always-matching fallback, fixed at process start and never reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultEntry {
    /// Upstream that receives every request no mapping claims.
    pub target: Url,
}

impl DefaultEntry {
    pub const fn new(target: Url) -> Self {
        Self { target }
    }
}

/// Result of a table lookup. Selection never fails: when no entry matches,
/// the default entry is returned.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    /// A mapping matched; the forwarder strips the entry's prefix.
    Entry(&'a DispatchEntry),
    /// No mapping matched; the forwarder passes the path through unmodified.
    Default(&'a DefaultEntry),
}

impl Selection<'_> {
    /// The upstream URL this selection forwards to.
    pub const fn target(&self) -> &Url {
        match self {
            Selection::Entry(entry) => &entry.target,
            Selection::Default(default) => &default.target,
        }
    }
}

/// An immutable routing table: ordered entries plus exactly one default.
#[derive(Debug)]
pub struct DispatchTable {
    version: u64,
    entries: Vec<DispatchEntry>,
    default: DefaultEntry,
}

impl DispatchTable {
    /// Build a table from enabled mapping records, preserving input order.
    ///
    /// A record whose `target_url` does not parse is skipped with a warning;
    /// the rest of the build proceeds. Colliding prefixes are not deduped;
    /// precedence is resolved at lookup time by table order.
    pub fn build(records: &[Mapping], default: DefaultEntry, version: u64) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            match Url::parse(&record.target_url) {
                Ok(target) => entries.push(DispatchEntry {
                    prefix: record.path.clone(),
                    target,
                }),
                Err(error) => {
                    tracing::warn!(
                        path = %record.path,
                        target_url = %record.target_url,
                        %error,
                        "skipping mapping with unparsable target URL"
                    );
                }
            }
        }
        Self {
            version,
            entries,
            default,
        }
    }

    /// A table with no entries, only the default. Used before the first
    /// successful reconciliation.
    pub const fn empty(default: DefaultEntry) -> Self {
        Self {
            version: 0,
            entries: Vec::new(),
            default,
        }
    }

    /// Select the entry for a request path: first match in table order, or
    /// the default when nothing matches.
    pub fn select(&self, path: &str) -> Selection<'_> {
        self.entries
            .iter()
            .find(|entry| path.starts_with(&entry.prefix))
            .map_or(Selection::Default(&self.default), Selection::Entry)
    }

    /// Monotonic build stamp, for logs and diagnostics.
    pub const fn version(&self) -> u64 {
        self.version
    }

    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    pub const fn default_entry(&self) -> &DefaultEntry {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle through which the reconciler publishes tables and request
/// handlers read them.
///
/// The reconciliation loop is the sole writer; request handlers are the many
/// readers. Publication is a single pointer swap, so readers always observe
/// either the fully-old or the fully-new table, never a mix.
#[derive(Debug)]
pub struct DispatchHandle {
    current: ArcSwap<DispatchTable>,
}

impl DispatchHandle {
    pub fn new(initial: DispatchTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Load the current table. The returned `Arc` stays valid for the whole
    /// request even if a new table is published mid-flight.
    pub fn load(&self) -> Arc<DispatchTable> {
        self.current.load_full()
    }

    /// Publish a freshly built table, replacing the current one atomically.
    pub fn publish(&self, table: DispatchTable) {
        self.current.store(Arc::new(table));
    }
}
