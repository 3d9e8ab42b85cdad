//! Diff result types.
//!
//! A comparison yields a [`DiffResult`]: an ordered list of [`DiffEntry`]
//! values, each either a leaf [`Difference`] or a [`SubDifference`] that
//! wraps the mismatches found inside a pair of nested documents.

use serde::Serialize;

use crate::document::Value;

/// A single key whose value differs between the two documents.
///
/// `None` on either side means the key is absent from that document, which
/// is distinct from the key being present with a `null` value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Difference {
    pub key: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

/// A key whose values are documents on both sides, with the mismatches
/// found between them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubDifference {
    pub key: String,
    pub children: Vec<DiffEntry>,
}

/// One entry of a diff listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffEntry {
    Difference(Difference),
    SubDifference(SubDifference),
}

impl DiffEntry {
    /// The key this entry reports on.
    pub fn key(&self) -> &str {
        match self {
            DiffEntry::Difference(d) => &d.key,
            DiffEntry::SubDifference(s) => &s.key,
        }
    }

    pub fn as_difference(&self) -> Option<&Difference> {
        match self {
            DiffEntry::Difference(d) => Some(d),
            DiffEntry::SubDifference(_) => None,
        }
    }

    pub fn as_sub_difference(&self) -> Option<&SubDifference> {
        match self {
            DiffEntry::SubDifference(s) => Some(s),
            DiffEntry::Difference(_) => None,
        }
    }
}

impl From<Difference> for DiffEntry {
    fn from(d: Difference) -> Self {
        DiffEntry::Difference(d)
    }
}

impl From<SubDifference> for DiffEntry {
    fn from(s: SubDifference) -> Self {
        DiffEntry::SubDifference(s)
    }
}

/// The result of comparing two documents. Empty means equivalent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiffResult {
    pub entries: Vec<DiffEntry>,
}

impl DiffResult {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the documents were equivalent.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffEntry> {
        self.entries.iter()
    }

    /// The top-level entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Number of leaf differences across all nesting levels.
    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.entries)
    }

    /// Every leaf difference with its dotted path from the root
    /// (e.g. `version.protocol`), depth-first in entry order.
    pub fn flatten(&self) -> Vec<(String, &Difference)> {
        let mut out = Vec::new();
        flatten_into(&self.entries, "", &mut out);
        out
    }
}

impl From<Vec<DiffEntry>> for DiffResult {
    fn from(entries: Vec<DiffEntry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for DiffResult {
    type Item = DiffEntry;
    type IntoIter = std::vec::IntoIter<DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn count_leaves(entries: &[DiffEntry]) -> usize {
    entries
        .iter()
        .map(|e| match e {
            DiffEntry::Difference(_) => 1,
            DiffEntry::SubDifference(s) => count_leaves(&s.children),
        })
        .sum()
}

fn flatten_into<'a>(entries: &'a [DiffEntry], prefix: &str, out: &mut Vec<(String, &'a Difference)>) {
    for entry in entries {
        let path = if prefix.is_empty() {
            entry.key().to_string()
        } else {
            format!("{}.{}", prefix, entry.key())
        };
        match entry {
            DiffEntry::Difference(d) => out.push((path, d)),
            DiffEntry::SubDifference(s) => flatten_into(&s.children, &path, out),
        }
    }
}
