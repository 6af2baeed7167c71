use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::groups;
use crate::view::{ClassView, MethodView};

/// Decorator that marks alternate constructors. Methods carrying it do
/// not contribute their own access path.
const ALTERNATE_CONSTRUCTOR: &str = "classmethod";

/// Selectable cohesion algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Lcom4,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Lcom4 => "LCOM4",
        }
    }

    pub fn calculate<C: ClassView>(&self, class: &C) -> usize {
        match self {
            Algorithm::Lcom4 => Lcom4.calculate(class),
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LCOM4" => Ok(Algorithm::Lcom4),
            _ => Err(anyhow::anyhow!("unknown algorithm: {s}")),
        }
    }
}

/// Lack of Cohesion of Methods, variant 4.
///
/// Builds one access path per eligible method (the closure of state and
/// method names reachable through direct use and transitive same-class
/// calls), then counts the disjoint groups those paths form. 0 means no
/// method contributed a path, 1 is fully cohesive, anything above 1
/// suggests the class holds more than one responsibility.
pub struct Lcom4;

impl Lcom4 {
    /// Pure function of the class's declared methods and state. Never
    /// fails on a well-formed view.
    pub fn calculate<C: ClassView>(&self, class: &C) -> usize {
        let paths: Vec<BTreeSet<String>> = access_paths(class).into_values().collect();
        groups::merge(&paths).len()
    }
}

/// One access path per eligible method, keyed by qualified method name.
///
/// Constructors, loose methods, and alternate constructors contribute no
/// path of their own; their state stays reachable transitively. A call
/// edge also records a back-edge into the callee's bucket, so a callee
/// that is itself excluded still merges with its caller.
fn access_paths<C: ClassView>(class: &C) -> BTreeMap<String, BTreeSet<String>> {
    let mut paths: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for method in class.methods() {
        if method.is_constructor()
            || method.is_loose()
            || method.has_decorator(ALTERNATE_CONSTRUCTOR)
        {
            continue;
        }

        let name = method.name();
        {
            let path = paths.entry(name.clone()).or_default();
            path.insert(name.clone());
            path.extend(method.vars());
        }

        for call in method.calls() {
            paths.entry(name.clone()).or_default().insert(call.clone());
            paths.entry(call.clone()).or_default().insert(name.clone());

            let mut visited = BTreeSet::new();
            let reached = follow_call(class, &call, &mut visited);
            paths.entry(name.clone()).or_default().extend(reached);
        }
    }

    paths
}

/// Transitively collect the vars and calls of a call target.
///
/// An unresolved target (not a method of this class) contributes nothing;
/// the call name itself was already recorded by the caller. The visited
/// set spans one top-level expansion and guards self-recursion and
/// mutual-recursion cycles alike.
fn follow_call<C: ClassView>(
    class: &C,
    call: &str,
    visited: &mut BTreeSet<String>,
) -> BTreeSet<String> {
    if !visited.insert(call.to_string()) {
        return BTreeSet::new();
    }

    let Ok(method) = class.method_by_name(bare_name(call)) else {
        return BTreeSet::new();
    };

    let mut reached = method.vars();
    reached.extend(method.calls());
    for next in method.calls() {
        reached.extend(follow_call(class, &next, visited));
    }
    reached
}

/// `pkg.Class::method` -> `method`
fn bare_name(qualified: &str) -> &str {
    qualified.rsplit("::").next().unwrap_or(qualified)
}
