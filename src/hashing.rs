//! This module provides the deterministic `HashMap` and `HashSet` variants used throughout the
//! crate. The hashing data structures in the standard library are randomly seeded, which makes
//! iteration order differ from run to run. Key order inside a table is kept separately (see
//! [`crate::table::Table`]), so these maps are only used where order is never observed.
//!
//! `HashMap<K, V, S>` does not have a `new` method for a custom hasher. Use
//! `HashMap::default()` instead.

pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_are_empty_and_usable() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        assert!(map.is_empty());
        map.insert("a", 1);
        map.insert("a", 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&2));

        let mut set: HashSet<u32> = HashSet::default();
        assert!(set.insert(3));
        assert!(!set.insert(3));
    }
}
