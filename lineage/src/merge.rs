//! The C3 merge.
//!
//! Given a list of sequences, the merge repeatedly picks the head of the
//! first sequence that does not occur in the tail of any sequence (a "good
//! head"), emits it, and drops it from the front of every sequence that
//! starts with it. When sequences remain but none of their heads is good,
//! the merge fails.
//!
//! Tail membership is tracked with per-class counters rather than by
//! rescanning every tail on each step: a class's counter drops by one
//! whenever a sequence advances and that class becomes its new head.

use rustc_hash::FxHashMap;

use crate::hierarchy::ClassId;

/// The merge could not find a good head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict<K> {
    /// Output produced before the merge got stuck.
    pub merged: Vec<K>,
    /// Heads of the sequences still pending, in scan order, without repeats.
    pub heads: Vec<K>,
}

/// Merges sequences per C3.
///
/// Sequences are scanned left to right, so when several heads are good the
/// one from the leftmost sequence wins.
pub fn merge<K: ClassId>(sequences: &[&[K]]) -> Result<Vec<K>, MergeConflict<K>> {
    let mut cursors = vec![0usize; sequences.len()];
    let mut in_tail: FxHashMap<&K, usize> = FxHashMap::default();
    for sequence in sequences {
        for class in sequence.iter().skip(1) {
            *in_tail.entry(class).or_default() += 1;
        }
    }

    let total: usize = sequences.iter().map(|s| s.len()).sum();
    let mut merged = Vec::with_capacity(total);

    loop {
        let mut pending = false;
        let mut selected = None;
        for (sequence, &cursor) in sequences.iter().zip(&cursors) {
            let Some(head) = sequence.get(cursor) else {
                continue;
            };
            pending = true;
            if in_tail.get(head).copied().unwrap_or(0) == 0 {
                selected = Some(head);
                break;
            }
        }

        let Some(head) = selected else {
            if pending {
                return Err(MergeConflict {
                    heads: pending_heads(sequences, &cursors),
                    merged,
                });
            }
            return Ok(merged);
        };

        merged.push(head.clone());
        for (sequence, cursor) in sequences.iter().zip(cursors.iter_mut()) {
            if sequence.get(*cursor) != Some(head) {
                continue;
            }
            *cursor += 1;
            if let Some(count) = sequence.get(*cursor).and_then(|next| in_tail.get_mut(next)) {
                *count -= 1;
            }
        }
    }
}

fn pending_heads<K: ClassId>(sequences: &[&[K]], cursors: &[usize]) -> Vec<K> {
    let mut heads: Vec<K> = Vec::new();
    for (sequence, &cursor) in sequences.iter().zip(cursors) {
        if let Some(head) = sequence.get(cursor) {
            if !heads.contains(head) {
                heads.push(head.clone());
            }
        }
    }
    heads
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_empty() {
        let merged = merge::<&str>(&[]).unwrap();
        assert!(merged.is_empty());

        let merged = merge::<&str>(&[&[], &[]]).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_single_sequence() {
        let merged = merge(&[&["B", "object"], &["B"]]).unwrap();
        assert_eq!(merged, vec!["B", "object"]);
    }

    #[test]
    fn test_merge_diamond() {
        // L[B] = B D E O, L[C] = C D F O, bases = B C
        let merged = merge(&[
            &["B", "D", "E", "O"],
            &["C", "D", "F", "O"],
            &["B", "C"],
        ])
        .unwrap();
        assert_eq!(merged, vec!["B", "C", "D", "E", "F", "O"]);
    }

    #[test]
    fn test_merge_skips_bad_head() {
        // `O` heads the first sequence but sits in the tail of the second.
        let merged = merge(&[&["O"], &["X", "O"], &["X"]]).unwrap();
        assert_eq!(merged, vec!["X", "O"]);
    }

    #[test]
    fn test_merge_conflict() {
        let conflict = merge(&[&["X", "Y"], &["Y", "X"], &["A", "B"]]).unwrap_err();
        assert_eq!(conflict.merged, vec!["A", "B"]);
        assert_eq!(conflict.heads, vec!["X", "Y"]);
    }

    #[test]
    fn test_conflict_heads_are_deduplicated() {
        let conflict = merge(&[&["X", "Y"], &["Y", "X"], &["X", "Y"]]).unwrap_err();
        assert!(conflict.merged.is_empty());
        assert_eq!(conflict.heads, vec!["X", "Y"]);
    }
}
