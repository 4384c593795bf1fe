//! Fast hash map type alias.
//!
//! Registry bookkeeping is keyed by short metadata keys (`og:title`,
//! `twitter:image`, ...), which is exactly the workload the Fx hash from
//! `rustc-hash` is tuned for. Keys come from the host application, not from
//! untrusted network input, so `DoS` resistance is not needed.
//!
//! # Examples
//!
//! ```
//! use hm_core::FxHashMap;
//!
//! let mut map: FxHashMap<String, usize> = FxHashMap::default();
//! map.insert("og:title".to_owned(), 0);
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_roundtrip() {
        let mut map: FxHashMap<&str, usize> = FxHashMap::default();
        map.insert("og:url", 1);
        assert_eq!(map.get("og:url"), Some(&1));
        assert!(!map.contains_key("twitter:url"));
    }
}
