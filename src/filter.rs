use rustc_hash::FxHashSet;

use crate::node::Snapshot;

/// Policy deciding which snapshot fields reach the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldFilter {
    /// Persist the snapshot as-is.
    #[default]
    Unfiltered,
    /// Keep exactly the listed fields. A listed field that is absent from
    /// the snapshot is omitted from the result entirely.
    Only(FxHashSet<String>),
    /// Drop the listed fields, pass everything else through.
    Except(FxHashSet<String>),
}

/// A single field name or a sequence of names.
///
/// Blank entries are discarded during conversion, so a list of empty
/// strings counts as no list at all.
pub trait IntoFieldList {
    fn into_field_list(self) -> Vec<String>;
}

/// Apply `filter` to `snapshot`, returning the fields to persist.
pub fn filter_snapshot(snapshot: Snapshot, filter: &FieldFilter) -> Snapshot {
    match filter {
        FieldFilter::Unfiltered => snapshot,
        FieldFilter::Only(names) => snapshot
            .into_iter()
            .filter(|(name, _)| names.contains(name))
            .collect(),
        FieldFilter::Except(names) => snapshot
            .into_iter()
            .filter(|(name, _)| !names.contains(name))
            .collect(),
    }
}

// Implementations

impl FieldFilter {
    /// Resolve user-supplied `only`/`except` lists into a filter.
    ///
    /// `only` takes precedence when both are given; the except-list is
    /// ignored in that case. Empty lists count as not supplied.
    pub(crate) fn resolve(only: Vec<String>, except: Vec<String>) -> Self {
        if !only.is_empty() {
            FieldFilter::Only(only.into_iter().collect())
        } else if !except.is_empty() {
            FieldFilter::Except(except.into_iter().collect())
        } else {
            FieldFilter::Unfiltered
        }
    }
}

fn discard_blank(names: impl IntoIterator<Item = String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect()
}

impl IntoFieldList for &str {
    fn into_field_list(self) -> Vec<String> {
        discard_blank([self.to_string()])
    }
}

impl IntoFieldList for String {
    fn into_field_list(self) -> Vec<String> {
        discard_blank([self])
    }
}

impl IntoFieldList for Vec<String> {
    fn into_field_list(self) -> Vec<String> {
        discard_blank(self)
    }
}

impl IntoFieldList for Vec<&str> {
    fn into_field_list(self) -> Vec<String> {
        discard_blank(self.into_iter().map(str::to_string))
    }
}

impl IntoFieldList for &[&str] {
    fn into_field_list(self) -> Vec<String> {
        discard_blank(self.iter().map(|name| name.to_string()))
    }
}

impl<const N: usize> IntoFieldList for [&str; N] {
    fn into_field_list(self) -> Vec<String> {
        discard_blank(self.into_iter().map(str::to_string))
    }
}
