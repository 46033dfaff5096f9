use std::collections::HashMap;
use std::hash::Hash;

/// Indexes a batch of rows by key so related records can be resolved
/// without issuing one query per row.
pub fn index_by<K, V, F>(rows: impl IntoIterator<Item = V>, key: F) -> HashMap<K, V>
where
    K: Eq + Hash,
    F: Fn(&V) -> K,
{
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

/// Groups a batch of rows by a foreign key, preserving input order per group.
pub fn group_by<K, V, F>(rows: impl IntoIterator<Item = V>, key: F) -> HashMap<K, Vec<V>>
where
    K: Eq + Hash,
    F: Fn(&V) -> K,
{
    let mut groups: HashMap<K, Vec<V>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}
