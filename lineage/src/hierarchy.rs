//! The hierarchy map: classes and their declared bases.
//!
//! A [`Hierarchy`] maps each class identifier to the ordered list of its
//! direct bases exactly as declared. Declaration order of the classes
//! themselves is kept too, so listings and bulk operations are stable.
//!
//! The map is an immutable input to linearization. It is built up front
//! (with the builder methods, `FromIterator`, or serde) and then only read.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{LinearizeError, LinearizeResult};

/// Identifier types usable as class names.
///
/// Anything cloneable, hashable and printable qualifies: `String`, `&str`,
/// integer handles from an interner, and so on.
pub trait ClassId: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T: Clone + Eq + Hash + fmt::Debug + fmt::Display> ClassId for T {}

/// A multiple-inheritance hierarchy.
///
/// Root classes map to an empty base list. A hierarchy may also have a
/// single universal root (see [`Hierarchy::with_root`] and
/// [`Hierarchy::adopt_root`]) that every other chain ends in.
///
/// Deserializes from a plain map of class to bases. Repeated keys follow
/// the format's own map semantics; `serde_json` keeps the last one.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize + Eq + Hash",
    deserialize = "K: Deserialize<'de> + Eq + Hash"
))]
pub struct Hierarchy<K> {
    classes: IndexMap<K, Vec<K>>,
}

impl<K: ClassId> Hierarchy<K> {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self {
            classes: IndexMap::new(),
        }
    }

    /// Creates a hierarchy containing only the universal root.
    pub fn with_root(root: K) -> Self {
        let mut hierarchy = Self::new();
        hierarchy.insert(root, Vec::new());
        hierarchy
    }

    /// Declares a class with the given bases, builder style.
    pub fn class(mut self, class: K, bases: impl IntoIterator<Item = K>) -> Self {
        self.insert(class, bases.into_iter().collect());
        self
    }

    /// Declares a class, returning the bases it previously had, if any.
    ///
    /// Redeclaring a class keeps its original declaration position.
    pub fn insert(&mut self, class: K, bases: Vec<K>) -> Option<Vec<K>> {
        self.classes.insert(class, bases)
    }

    /// Returns the declared bases of a class.
    pub fn bases(&self, class: &K) -> Option<&[K]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    /// Checks whether a class is declared.
    pub fn contains(&self, class: &K) -> bool {
        self.classes.contains_key(class)
    }

    /// Returns the number of declared classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no class is declared.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates over declared classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &K> {
        self.classes.keys()
    }

    /// Iterates over `(class, bases)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[K])> {
        self.classes.iter().map(|(class, bases)| (class, bases.as_slice()))
    }

    /// Iterates over classes that declare no bases.
    pub fn roots(&self) -> impl Iterator<Item = &K> {
        self.classes
            .iter()
            .filter(|(_, bases)| bases.is_empty())
            .map(|(class, _)| class)
    }

    /// Makes `root` the universal root of the hierarchy.
    ///
    /// The root is declared (with no bases) if it is missing, and every
    /// other class that declares no bases is made to inherit from it, the
    /// way `class X: pass` implicitly derives from `object`.
    pub fn adopt_root(&mut self, root: K) {
        for (class, bases) in self.classes.iter_mut() {
            if bases.is_empty() && *class != root {
                bases.push(root.clone());
            }
        }
        self.classes.entry(root).or_default();
    }

    /// Checks the structural invariants of the whole map.
    ///
    /// Reports, in declaration order, the first class that repeats a base,
    /// names an undeclared base, or takes part in an inheritance cycle.
    /// Consistency of the C3 merge is not checked here; that needs a
    /// [`Linearizer`](crate::Linearizer).
    pub fn validate(&self) -> LinearizeResult<(), K> {
        for (class, bases) in &self.classes {
            if let Some(base) = first_duplicate(bases) {
                return Err(LinearizeError::DuplicateBase {
                    class: class.clone(),
                    base: base.clone(),
                });
            }
            if let Some(base) = bases.iter().find(|base| !self.contains(base)) {
                return Err(LinearizeError::UnknownBase {
                    class: class.clone(),
                    base: base.clone(),
                });
            }
        }

        // Iterative three-colour walk: `path` holds the grey classes with the
        // index of the next base to visit, `finished` the black ones.
        let mut finished: FxHashSet<&K> = FxHashSet::default();
        let mut on_path: FxHashSet<&K> = FxHashSet::default();
        let mut path: Vec<(&K, usize)> = Vec::new();
        for start in self.classes.keys() {
            if finished.contains(start) {
                continue;
            }
            on_path.insert(start);
            path.push((start, 0));

            while let Some(top) = path.last_mut() {
                let (class, next) = *top;
                top.1 += 1;
                match self.bases(class).unwrap_or_default().get(next) {
                    Some(base) if finished.contains(base) => {}
                    Some(base) if on_path.contains(base) => {
                        let start = path.iter().position(|(c, _)| *c == base).unwrap_or(0);
                        let mut cycle: Vec<K> =
                            path[start..].iter().map(|(c, _)| (*c).clone()).collect();
                        cycle.push(base.clone());
                        return Err(LinearizeError::Cycle { cycle });
                    }
                    Some(base) => {
                        on_path.insert(base);
                        path.push((base, 0));
                    }
                    None => {
                        on_path.remove(class);
                        finished.insert(class);
                        path.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Looks up a class together with its bases, borrowing the stored key.
    pub(crate) fn entry(&self, class: &K) -> Option<(&K, &[K])> {
        self.classes
            .get_key_value(class)
            .map(|(class, bases)| (class, bases.as_slice()))
    }
}

/// Returns the first base that occurs more than once in `bases`.
pub(crate) fn first_duplicate<K: ClassId>(bases: &[K]) -> Option<&K> {
    if bases.len() < 2 {
        return None;
    }
    let mut seen = FxHashSet::default();
    bases.iter().find(|base| !seen.insert(*base))
}

impl<K: ClassId> Default for Hierarchy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ClassId> PartialEq for Hierarchy<K> {
    fn eq(&self, other: &Self) -> bool {
        self.classes == other.classes
    }
}

impl<K: ClassId> Eq for Hierarchy<K> {}

impl<K: ClassId> fmt::Debug for Hierarchy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.classes.iter()).finish()
    }
}

/// Collects `(class, bases)` pairs.
///
/// A class that appears more than once keeps its first declaration position
/// and its last base list, as with [`Hierarchy::insert`].
impl<K: ClassId> FromIterator<(K, Vec<K>)> for Hierarchy<K> {
    fn from_iter<I: IntoIterator<Item = (K, Vec<K>)>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

impl<K: ClassId> Extend<(K, Vec<K>)> for Hierarchy<K> {
    fn extend<I: IntoIterator<Item = (K, Vec<K>)>>(&mut self, iter: I) {
        self.classes.extend(iter);
    }
}

impl<'a> Hierarchy<&'a str> {
    /// Builds a hierarchy from string slices, handy for fixtures.
    pub fn from_pairs(pairs: &[(&'a str, &[&'a str])]) -> Self {
        pairs
            .iter()
            .map(|(class, bases)| (*class, bases.to_vec()))
            .collect()
    }
}
