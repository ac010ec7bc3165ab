// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Key-based idempotent merge shared by every provider.
//!
//! Providers differ in record shape and storage layout, but all of them add
//! candidates to an existing store under the same rule: a candidate is kept
//! only when its key is new to the store and new to the current call.

use std::{collections::HashSet, hash::Hash};

/// Result of merging candidates into an existing store.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct MergeOutcome<T,>
{
    /// Existing items in their original order followed by new items.
    pub store:      Vec<T,>,
    /// Items appended by this call, in candidate order.
    pub added:      Vec<T,>,
    /// Number of candidates dropped because their key was already taken.
    pub duplicates: usize,
}

impl<T,> MergeOutcome<T,>
{
    /// Returns `true` when the merge appended at least one item.
    pub fn changed(&self,) -> bool
    {
        !self.added.is_empty()
    }
}

/// Merges `candidates` into `existing`, keyed by `key`.
///
/// Existing items are never reordered, replaced or removed. Candidates are
/// visited in order and appended only when their key is absent from the
/// existing store and was not appended earlier in the same call, so repeated
/// addresses inside one token list collapse to the first occurrence.
///
/// Running the merge again against the returned store with the same
/// candidates appends nothing.
///
/// # Examples
///
/// ```
/// use tokensub::{address_key, merge};
///
/// let existing = vec!["0xaa".to_owned()];
/// let candidates = vec!["0xAA".to_owned(), "0xbb".to_owned(), "0xBB".to_owned()];
/// let outcome = merge(existing, candidates, |item| address_key(item,),);
/// assert_eq!(outcome.added, ["0xbb"]);
/// assert_eq!(outcome.duplicates, 2);
/// ```
pub fn merge<T, K, I, F,>(existing: Vec<T,>, candidates: I, key: F,) -> MergeOutcome<T,>
where
    T: Clone,
    K: Eq + Hash,
    I: IntoIterator<Item = T,>,
    F: Fn(&T,) -> K,
{
    let mut seen: HashSet<K,> = existing.iter().map(&key,).collect();
    let mut store = existing;
    let mut added = Vec::new();
    let mut duplicates = 0;

    for candidate in candidates {
        if seen.insert(key(&candidate,),) {
            store.push(candidate.clone(),);
            added.push(candidate,);
        } else {
            duplicates += 1;
        }
    }

    MergeOutcome {
        store,
        added,
        duplicates,
    }
}

/// Normalizes an address into a merge key.
///
/// Addresses compare case-insensitively; surrounding whitespace is ignored.
pub fn address_key(address: &str,) -> String
{
    address.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests
{
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::{address_key, merge};

    fn addresses(values: &[&str],) -> Vec<String,>
    {
        values.iter().map(|value| (*value).to_owned(),).collect()
    }

    fn key(item: &String,) -> String
    {
        address_key(item,)
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(
            existing in proptest::collection::hash_set("0x[0-9a-f]{4}", 0..8),
            candidates in proptest::collection::vec("0x[0-9a-fA-F]{4}", 0..16),
        ) {
            let existing: Vec<String> = existing.into_iter().collect();
            let first = merge(existing, candidates.clone(), key);
            let second = merge(first.store.clone(), candidates, key);
            prop_assert!(second.added.is_empty());
            prop_assert_eq!(second.store, first.store);
        }

        #[test]
        fn merged_store_has_unique_keys(
            existing in proptest::collection::hash_set("0x[0-9a-f]{4}", 0..8),
            candidates in proptest::collection::vec("0x[0-9a-fA-F]{4}", 0..16),
        ) {
            let existing: Vec<String> = existing.into_iter().collect();
            let outcome = merge(existing, candidates, key);
            let unique: HashSet<String> = outcome.store.iter().map(|item| address_key(item)).collect();
            prop_assert_eq!(unique.len(), outcome.store.len());
        }

        #[test]
        fn merge_preserves_existing_prefix(
            existing in proptest::collection::vec("0x[0-9a-f]{4}", 0..8),
            candidates in proptest::collection::vec("0x[0-9a-f]{4}", 0..16),
        ) {
            let outcome = merge(existing.clone(), candidates, key);
            prop_assert_eq!(&outcome.store[..existing.len()], &existing[..]);
            prop_assert_eq!(&outcome.store[existing.len()..], &outcome.added[..]);
        }
    }

    #[test]
    fn appends_new_items_in_candidate_order()
    {
        let outcome = merge(addresses(&["0xa", "0xb"],), addresses(&["0xd", "0xc"],), key,);
        assert_eq!(outcome.store, addresses(&["0xa", "0xb", "0xd", "0xc"]));
        assert_eq!(outcome.added, addresses(&["0xd", "0xc"]));
        assert_eq!(outcome.duplicates, 0);
        assert!(outcome.changed());
    }

    #[test]
    fn skips_candidates_already_in_store_case_insensitively()
    {
        let outcome = merge(addresses(&["0xabc"],), addresses(&["0xABC"],), key,);
        assert!(outcome.added.is_empty());
        assert_eq!(outcome.duplicates, 1);
        assert!(!outcome.changed());
    }

    #[test]
    fn repeated_candidates_keep_first_occurrence()
    {
        let outcome = merge(Vec::new(), addresses(&["0xAA", "0xaa", "0xbb"],), key,);
        assert_eq!(outcome.added, addresses(&["0xAA", "0xbb"]));
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn empty_candidates_leave_store_untouched()
    {
        let existing = addresses(&["0x2", "0x1"],);
        let outcome = merge(existing.clone(), Vec::<String,>::new(), key,);
        assert_eq!(outcome.store, existing);
        assert!(outcome.added.is_empty());
    }

    #[test]
    fn address_key_trims_and_lowercases()
    {
        assert_eq!(address_key("  0xAbC  ",), "0xabc");
    }
}
