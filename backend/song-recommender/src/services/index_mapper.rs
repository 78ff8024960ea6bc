use std::collections::BTreeSet;

/// Dense zero-based coordinates for a set of identifiers.
///
/// Identifiers are deduplicated and assigned indices in ascending order, so
/// the mapping does not depend on the order records were ingested in.
/// Example: users `[1008, 1001, 1008]` map to `{1001: 0, 1008: 1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMapper<K> {
    keys: Vec<K>,
}

impl<K: Ord + Clone> IndexMapper<K> {
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        let distinct: BTreeSet<K> = keys.into_iter().collect();
        Self {
            keys: distinct.into_iter().collect(),
        }
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.keys.binary_search(key).ok()
    }

    pub fn key_of(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Ord + Clone> Default for IndexMapper<K> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}
