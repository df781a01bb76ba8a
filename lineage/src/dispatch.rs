//! Name lookup along the method resolution order.
//!
//! A [`MethodTable`] records which names each class defines directly.
//! Resolving a name on a class walks that class's MRO and returns the first
//! class that defines it, which is how a single-dispatch runtime picks the
//! method to run. [`MethodTable::resolve_after`] continues a lookup past a
//! given class, the cooperative `super` call.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::LinearizeResult;
use crate::hierarchy::ClassId;
use crate::linearize::Linearizer;

/// Names defined directly on each class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize + Eq + std::hash::Hash",
    deserialize = "K: Deserialize<'de> + Eq + std::hash::Hash"
))]
pub struct MethodTable<K> {
    members: IndexMap<K, IndexSet<String>>,
}

impl<K: ClassId> MethodTable<K> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }

    /// Records that `class` defines `name`.
    pub fn define(&mut self, class: K, name: impl Into<String>) -> &mut Self {
        self.members.entry(class).or_default().insert(name.into());
        self
    }

    /// Checks whether `class` itself defines `name`.
    pub fn defines(&self, class: &K, name: &str) -> bool {
        self.members
            .get(class)
            .is_some_and(|names| names.contains(name))
    }

    /// Names defined directly on `class`, in definition order.
    pub fn names(&self, class: &K) -> impl Iterator<Item = &str> {
        self.members
            .get(class)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Finds the class that provides `name` for instances of `class`.
    ///
    /// Returns `Ok(None)` when nothing in the MRO defines the name.
    pub fn resolve(
        &self,
        linearizer: &mut Linearizer<'_, K>,
        class: &K,
        name: &str,
    ) -> LinearizeResult<Option<K>, K> {
        let mro = linearizer.mro(class)?;
        Ok(self.first_definer(mro, name))
    }

    /// Like [`resolve`](Self::resolve), but only considers classes that come
    /// strictly after `after` in the MRO of `class`.
    ///
    /// If `after` is not in that MRO the lookup finds nothing.
    pub fn resolve_after(
        &self,
        linearizer: &mut Linearizer<'_, K>,
        class: &K,
        after: &K,
        name: &str,
    ) -> LinearizeResult<Option<K>, K> {
        let mro = linearizer.mro(class)?;
        let rest = match mro.iter().position(|c| c == after) {
            Some(index) => &mro[index + 1..],
            None => &[],
        };
        Ok(self.first_definer(rest, name))
    }

    fn first_definer(&self, mro: &[K], name: &str) -> Option<K> {
        let found = mro.iter().find(|class| self.defines(class, name)).cloned();
        trace!(method = name, found = ?found, "resolved name");
        found
    }
}

impl<K: ClassId> Default for MethodTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ClassId> FromIterator<(K, Vec<String>)> for MethodTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (class, names) in iter {
            for name in names {
                table.define(class.clone(), name);
            }
        }
        table
    }
}

/// Returns the class that follows `after` in `mro`.
pub fn next_in_mro<'a, K: ClassId>(mro: &'a [K], after: &K) -> Option<&'a K> {
    let index = mro.iter().position(|c| c == after)?;
    mro.get(index + 1)
}
