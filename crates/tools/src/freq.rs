use std::collections::BTreeMap;

/// Count how many times each value occurs.
///
/// Keys are ordered so that reports over the suite are stable between runs.
pub fn frequency_map<K, I>(values: I) -> BTreeMap<K, usize>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut stats = BTreeMap::new();
    for value in values {
        *stats.entry(value).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::frequency_map;

    #[test]
    fn counts_duplicates_and_missing_values() {
        let stats = frequency_map([Some("1.0"), None, Some("1.0"), Some("1.1"), None, None]);
        assert_eq!(stats.get(&Some("1.0")), Some(&2));
        assert_eq!(stats.get(&Some("1.1")), Some(&1));
        assert_eq!(stats.get(&None), Some(&3));
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let stats = frequency_map(Vec::<String>::new());
        assert!(stats.is_empty());
    }
}
