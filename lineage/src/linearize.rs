//! C3 linearization.
//!
//! # Algorithm Overview
//!
//! For a class `C` with declared bases `B1 .. Bn`:
//!
//! 1. **No bases**: `L[C] = [C]`
//! 2. **Linearize bases**: compute `L[B1] .. L[Bn]`, recursively
//! 3. **Merge**: `L[C] = C + merge(L[B1], .., L[Bn], [B1 .. Bn])`
//!
//! The result lists `C` first and every ancestor exactly once, keeps each
//! class ahead of its own bases in declared order, and preserves the
//! relative order found in every base's linearization.
//!
//! A [`Linearizer`] memoizes results, so each class in a hierarchy is
//! merged at most once no matter how many descendants share it.
//!
//! Step 2 runs on an explicit work stack rather than the call stack, so the
//! depth of a hierarchy is bounded by memory alone. A class stays on the
//! stack until all of its bases are linearized; meeting it again before then
//! means the hierarchy is cyclic, which is reported instead of looping.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::error::{LinearizeError, LinearizeResult};
use crate::hierarchy::{first_duplicate, ClassId, Hierarchy};
use crate::merge::merge;

/// Computes the C3 linearization of `class` within `hierarchy`.
///
/// This is a one-shot convenience over [`Linearizer`]; callers that need
/// the order of many classes in the same hierarchy should keep a
/// `Linearizer` around instead.
pub fn linearize<K: ClassId>(class: &K, hierarchy: &Hierarchy<K>) -> LinearizeResult<Vec<K>, K> {
    Linearizer::new(hierarchy).linearize(class)
}

/// Memoizing C3 linearizer over a single hierarchy.
#[derive(Debug)]
pub struct Linearizer<'h, K: ClassId> {
    /// The hierarchy being linearized. Never mutated.
    hierarchy: &'h Hierarchy<K>,
    /// Finished linearizations.
    cache: FxHashMap<K, Vec<K>>,
}

/// A class whose bases are still being linearized.
struct Frame<'h, K> {
    class: &'h K,
    bases: &'h [K],
    /// Index of the next base to visit.
    next: usize,
}

impl<'h, K: ClassId> Linearizer<'h, K> {
    /// Creates a linearizer for the given hierarchy.
    pub fn new(hierarchy: &'h Hierarchy<K>) -> Self {
        Self {
            hierarchy,
            cache: FxHashMap::default(),
        }
    }

    /// Computes the method resolution order of `class`.
    pub fn linearize(&mut self, class: &K) -> LinearizeResult<Vec<K>, K> {
        self.mro(class).map(<[K]>::to_vec)
    }

    /// Computes the method resolution order of `class`, borrowing it from
    /// the cache.
    pub fn mro(&mut self, class: &K) -> LinearizeResult<&[K], K> {
        self.compute(class)?;
        // `compute` leaves an entry behind whenever it succeeds.
        Ok(self.cache.get(class).map(Vec::as_slice).unwrap_or_default())
    }

    /// Linearizes every class, in declaration order.
    ///
    /// Stops at the first class that fails.
    pub fn linearize_all(&mut self) -> LinearizeResult<IndexMap<K, Vec<K>>, K> {
        let hierarchy = self.hierarchy;
        hierarchy
            .classes()
            .map(|class| Ok((class.clone(), self.linearize(class)?)))
            .collect()
    }

    /// Number of classes linearized so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn compute(&mut self, class: &K) -> LinearizeResult<(), K> {
        if self.cache.contains_key(class) {
            return Ok(());
        }

        let hierarchy = self.hierarchy;
        let Some((class, bases)) = hierarchy.entry(class) else {
            return Err(LinearizeError::UnknownClass {
                class: class.clone(),
            });
        };

        let mut stack = vec![enter(class, bases)?];
        let mut in_progress: FxHashSet<&'h K> = FxHashSet::default();
        in_progress.insert(class);

        while let Some(frame) = stack.last_mut() {
            let (derived, bases, next) = (frame.class, frame.bases, frame.next);

            if let Some(base) = bases.get(next) {
                frame.next += 1;
                if self.cache.contains_key(base) {
                    continue;
                }
                let Some((base, base_bases)) = hierarchy.entry(base) else {
                    return Err(LinearizeError::UnknownBase {
                        class: derived.clone(),
                        base: base.clone(),
                    });
                };
                if in_progress.contains(base) {
                    let start = stack.iter().position(|f| f.class == base).unwrap_or(0);
                    let mut cycle: Vec<K> =
                        stack[start..].iter().map(|f| f.class.clone()).collect();
                    cycle.push(base.clone());
                    return Err(LinearizeError::Cycle { cycle });
                }
                stack.push(enter(base, base_bases)?);
                in_progress.insert(base);
                continue;
            }

            // Every base of `derived` is cached by now.
            let order = self.merge_bases(derived, bases)?;
            trace!(class = %derived, mro = ?order, "linearized");
            self.cache.insert(derived.clone(), order);
            in_progress.remove(derived);
            stack.pop();
        }
        Ok(())
    }

    /// `class` followed by the merge of its bases' cached linearizations.
    fn merge_bases(&self, class: &K, bases: &[K]) -> LinearizeResult<Vec<K>, K> {
        let mut order = Vec::with_capacity(1 + bases.len());
        order.push(class.clone());
        match bases {
            [] => {}
            // A single base's order carries over unchanged.
            [base] => order.extend_from_slice(self.cached_mro(base)),
            _ => {
                let mut sequences: Vec<&[K]> =
                    bases.iter().map(|base| self.cached_mro(base)).collect();
                sequences.push(bases);

                let merged = merge(&sequences).map_err(|conflict| LinearizeError::Inconsistent {
                    class: class.clone(),
                    candidates: conflict.heads,
                })?;
                order.extend(merged);
            }
        }
        Ok(order)
    }

    fn cached_mro(&self, class: &K) -> &[K] {
        self.cache.get(class).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Opens a work-stack frame for `class` after checking its own base list.
fn enter<'h, K: ClassId>(class: &'h K, bases: &'h [K]) -> LinearizeResult<Frame<'h, K>, K> {
    if let Some(base) = first_duplicate(bases) {
        return Err(LinearizeError::DuplicateBase {
            class: class.clone(),
            base: base.clone(),
        });
    }
    debug!(class = %class, bases = bases.len(), "linearizing");
    Ok(Frame {
        class,
        bases,
        next: 0,
    })
}
