//! Ordering of extensions by declared `runs_after` / `runs_before` constraints.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
};

use crate::error::ConfigError;

/// Identity of an orderable item, derived from its type.
#[derive(Clone, Copy)]
pub struct DependencyId {
    type_id: TypeId,
    name: &'static str,
}

impl DependencyId {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for DependencyId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DependencyId {}

impl Hash for DependencyId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Something that declares where it runs relative to others of its kind.
///
/// Constraints naming items that are not registered are ignored.
pub trait Dependent {
    fn dependency_id(&self) -> DependencyId;

    fn runs_after(&self) -> Vec<DependencyId> {
        Vec::new()
    }

    fn runs_before(&self) -> Vec<DependencyId> {
        Vec::new()
    }
}

impl<T: Dependent + ?Sized> Dependent for Box<T> {
    fn dependency_id(&self) -> DependencyId {
        (**self).dependency_id()
    }

    fn runs_after(&self) -> Vec<DependencyId> {
        (**self).runs_after()
    }

    fn runs_before(&self) -> Vec<DependencyId> {
        (**self).runs_before()
    }
}

/// Items grouped into stages. Every item's predecessors sit in earlier
/// stages; within a stage items keep their registration order.
#[derive(Debug)]
pub struct ResolvedDependencies<T> {
    stages: Vec<Vec<T>>,
}

impl<T> ResolvedDependencies<T> {
    /// All items in one stage, in the given order.
    pub fn single_stage(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::default()
        } else {
            Self {
                stages: vec![items],
            }
        }
    }

    pub fn stages(&self) -> &[Vec<T>] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Total number of items across stages.
    pub fn len(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.stages.iter().flatten()
    }
}

impl<T> Default for ResolvedDependencies<T> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

/// Groups `items` into stages by a level-by-level topological sort.
///
/// Stage `n` holds the items whose longest chain of predecessors has length
/// `n`. Fails on duplicate ids and on cycles.
pub fn resolve<T: Dependent>(items: Vec<T>) -> Result<ResolvedDependencies<T>, ConfigError> {
    let ids: Vec<DependencyId> = items.iter().map(Dependent::dependency_id).collect();
    let mut index = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if index.insert(*id, i).is_some() {
            return Err(ConfigError::DuplicateFactory { name: id.name() });
        }
    }

    let count = items.len();
    let mut successors = vec![Vec::new(); count];
    let mut pending = vec![0usize; count];
    let mut add_edge = |from: usize, to: usize| {
        if !successors[from].contains(&to) {
            successors[from].push(to);
            pending[to] += 1;
        }
    };
    for (i, item) in items.iter().enumerate() {
        for after in item.runs_after() {
            if let Some(&j) = index.get(&after) {
                add_edge(j, i);
            }
        }
        for before in item.runs_before() {
            if let Some(&j) = index.get(&before) {
                add_edge(i, j);
            }
        }
    }

    let mut levels: Vec<Vec<usize>> = Vec::new();
    let mut ready: Vec<usize> = (0..count).filter(|&i| pending[i] == 0).collect();
    while !ready.is_empty() {
        let mut next = Vec::new();
        for &i in &ready {
            for &j in &successors[i] {
                pending[j] -= 1;
                if pending[j] == 0 {
                    next.push(j);
                }
            }
        }
        next.sort_unstable();
        levels.push(std::mem::replace(&mut ready, next));
    }

    if levels.iter().map(Vec::len).sum::<usize>() < count {
        let names = (0..count)
            .filter(|&i| pending[i] > 0)
            .map(|i| ids[i].name())
            .collect();
        return Err(ConfigError::DependencyCycle { names });
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let stages: Vec<Vec<T>> = levels
        .into_iter()
        .map(|level| level.into_iter().filter_map(|i| slots[i].take()).collect())
        .collect();
    log::debug!("resolved {count} items into {} stages", stages.len());
    Ok(ResolvedDependencies { stages })
}
