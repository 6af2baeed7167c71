use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::unionfind::UnionFind;

/// Partition a collection of identifier sets into maximal disjoint groups.
///
/// Two identifiers land in the same group when some chain of input sets
/// connects them. The output sets are pairwise disjoint and their union
/// equals the union of the inputs. Implemented as a union-find over
/// interned identifiers, so the partition converges in a single pass
/// regardless of input order.
pub fn merge(paths: &[BTreeSet<String>]) -> Vec<BTreeSet<String>> {
    let mut order: Vec<&str> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for path in paths {
        for id in path {
            if !index.contains_key(id.as_str()) {
                index.insert(id.as_str(), order.len());
                order.push(id.as_str());
            }
        }
    }

    let mut sets: UnionFind<usize> = UnionFind::new(order.len());
    for path in paths {
        let mut ids = path.iter();
        if let Some(first) = ids.next() {
            let root = index[first.as_str()];
            for id in ids {
                sets.union(root, index[id.as_str()]);
            }
        }
    }

    let labels = sets.into_labeling();
    let mut groups: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
    for (i, id) in order.iter().enumerate() {
        groups.entry(labels[i]).or_default().insert((*id).to_string());
    }
    groups.into_values().collect()
}
