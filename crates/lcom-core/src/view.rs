use std::collections::BTreeSet;

use thiserror::Error;

/// Failed facade lookup. Returned instead of a sentinel so callers must
/// handle absence explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown class {0}")]
    UnknownClass(String),
    #[error("unknown method {0}")]
    UnknownMethod(String),
}

/// Read-only view over one method declaration.
///
/// Qualified method names follow the `<module>.<Class>::<method>` scheme,
/// which keeps every name in an analysis run collision-free.
pub trait MethodView {
    /// Qualified method name.
    fn name(&self) -> String;

    /// True when the declared name is the reserved initializer name.
    fn is_constructor(&self) -> bool;

    /// True when the method touches no state and calls nothing through
    /// the receiver. Loose methods carry no cohesion signal.
    fn is_loose(&self) -> bool;

    /// True when the method's decorator list contains `name`.
    fn has_decorator(&self, name: &str) -> bool;

    /// Attribute accesses through the receiver parameter, minus anything
    /// that is itself a call target. Bare names.
    fn vars(&self) -> BTreeSet<String>;

    /// Qualified names of methods invoked through the receiver parameter.
    /// Calls through any other receiver are not visible here.
    fn calls(&self) -> BTreeSet<String>;
}

/// Read-only view over one class declaration.
pub trait ClassView {
    type Method: MethodView;

    /// Qualified class name, `<module>.<Class>`.
    fn name(&self) -> String;

    /// Class-body assignment targets plus receiver attribute accesses
    /// anywhere in the class body, minus method names.
    fn vars(&self) -> BTreeSet<String>;

    /// Methods in declaration order.
    fn methods(&self) -> Vec<Self::Method>;

    /// Look up a method by its bare declared name.
    fn method_by_name(&self, name: &str) -> Result<Self::Method, LookupError>;
}
