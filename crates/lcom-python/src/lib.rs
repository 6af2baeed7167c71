use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

use lcom_core::view::{ClassView, LookupError, MethodView};

/// Receiver identifiers through which state access and same-class calls
/// are recognized. Anything else (module functions, other objects) is
/// outside the facade's view.
const RECEIVERS: &[&str] = &["self", "cls"];

/// Reserved initializer name.
const CONSTRUCTOR_NAME: &str = "__init__";

/// Module segments stripped from the end of a dotted module name.
const PACKAGE_ENTRY_SEGMENTS: &[&str] = &["__init__", "__main__"];

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("syntax error in {name} at line {line}")]
    Syntax { name: String, line: usize },
    #[error("failed to read {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parser initialization failed: {0}")]
    Parser(String),
}

/// One parsed source file. Owns its tree; every facade derived from it
/// borrows the unit and cannot outlive it.
#[derive(Debug)]
pub struct SourceUnit {
    name: String,
    tree: Tree,
    content: String,
}

impl SourceUnit {
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            name: path.display().to_string(),
            source: e,
        })?;
        Self::from_source(&path.to_string_lossy(), &content)
    }

    /// Parse one source unit. The name is usually a file path; it is
    /// folded into the dotted module name that prefixes every qualified
    /// class and method name.
    pub fn from_source(name: &str, content: &str) -> Result<Self, SourceError> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| SourceError::Parser(e.to_string()))?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| SourceError::Parser("parse returned no tree".to_string()))?;

        if tree.root_node().has_error() {
            return Err(SourceError::Syntax {
                name: name.to_string(),
                line: first_error_line(tree.root_node()),
            });
        }

        Ok(Self {
            name: module_name(name),
            tree,
            content: content.to_string(),
        })
    }

    /// Dotted module name derived from the unit's path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All class declarations in the unit, nested ones included, in
    /// declaration order.
    pub fn classes(&self) -> Vec<ClassFacade<'_>> {
        let mut found = Vec::new();
        collect_classes(self.tree.root_node(), self, &mut found);
        found
    }

    /// Look up a class by its qualified name.
    pub fn class_by_name(&self, qualified: &str) -> Result<ClassFacade<'_>, LookupError> {
        self.classes()
            .into_iter()
            .find(|c| c.name() == qualified)
            .ok_or_else(|| LookupError::UnknownClass(qualified.to_string()))
    }
}

fn collect_classes<'unit>(
    node: Node<'unit>,
    unit: &'unit SourceUnit,
    found: &mut Vec<ClassFacade<'unit>>,
) {
    if node.kind() == "class_definition" {
        if let Some(name_node) = node.child_by_field_name("name") {
            found.push(ClassFacade {
                unit,
                node,
                name: format!("{}.{}", unit.name, node_text(name_node, &unit.content)),
            });
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_classes(child, unit, found);
    }
}

/// Read-only view over one class declaration within a unit.
#[derive(Debug)]
pub struct ClassFacade<'unit> {
    unit: &'unit SourceUnit,
    node: Node<'unit>,
    name: String,
}

impl<'unit> ClassFacade<'unit> {
    fn build_method(&self, node: Node<'unit>, decorators: Vec<String>) -> Option<MethodFacade<'unit>> {
        let name_node = node.child_by_field_name("name")?;
        Some(MethodFacade {
            unit: self.unit,
            node,
            class_name: self.name.clone(),
            method_name: node_text(name_node, &self.unit.content),
            decorators,
        })
    }
}

impl<'unit> ClassView for ClassFacade<'unit> {
    type Method = MethodFacade<'unit>;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn vars(&self) -> BTreeSet<String> {
        let mut attrs = BTreeSet::new();
        let mut calls = BTreeSet::new();
        collect_accesses(self.node, &self.unit.content, &mut attrs, &mut calls);

        let mut vars = attrs;
        if let Some(body) = self.node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                if child.kind() == "expression_statement" {
                    let mut inner = child.walk();
                    for expr in child.named_children(&mut inner) {
                        if expr.kind() == "assignment" {
                            assignment_targets(expr, &self.unit.content, &mut vars);
                        }
                    }
                }
            }
        }

        for method in self.methods() {
            vars.remove(&method.method_name);
        }
        vars
    }

    fn methods(&self) -> Vec<MethodFacade<'unit>> {
        let Some(body) = self.node.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    methods.extend(self.build_method(child, Vec::new()));
                }
                "decorated_definition" => {
                    let decorators = decorator_names(child, &self.unit.content);
                    if let Some(def) = child.child_by_field_name("definition") {
                        if def.kind() == "function_definition" {
                            methods.extend(self.build_method(def, decorators));
                        }
                    }
                }
                _ => {}
            }
        }
        methods
    }

    fn method_by_name(&self, name: &str) -> Result<MethodFacade<'unit>, LookupError> {
        self.methods()
            .into_iter()
            .find(|m| m.method_name == name)
            .ok_or_else(|| LookupError::UnknownMethod(name.to_string()))
    }
}

/// Read-only view over one method declaration within a class.
#[derive(Debug)]
pub struct MethodFacade<'unit> {
    unit: &'unit SourceUnit,
    node: Node<'unit>,
    class_name: String,
    method_name: String,
    decorators: Vec<String>,
}

impl MethodFacade<'_> {
    /// Receiver attribute accesses and receiver call targets in this
    /// method's body, as bare names. Call targets also appear among the
    /// attribute accesses; `vars()` subtracts them.
    fn accesses(&self) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut attrs = BTreeSet::new();
        let mut calls = BTreeSet::new();
        collect_accesses(self.node, &self.unit.content, &mut attrs, &mut calls);
        (attrs, calls)
    }
}

impl MethodView for MethodFacade<'_> {
    fn name(&self) -> String {
        format!("{}::{}", self.class_name, self.method_name)
    }

    fn is_constructor(&self) -> bool {
        self.method_name == CONSTRUCTOR_NAME
    }

    fn is_loose(&self) -> bool {
        let (attrs, calls) = self.accesses();
        attrs.is_empty() && calls.is_empty()
    }

    fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| d == name)
    }

    fn vars(&self) -> BTreeSet<String> {
        let (attrs, calls) = self.accesses();
        attrs.difference(&calls).cloned().collect()
    }

    fn calls(&self) -> BTreeSet<String> {
        let (_, calls) = self.accesses();
        calls
            .into_iter()
            .map(|c| format!("{}::{c}", self.class_name))
            .collect()
    }
}

/// Recursively walk a subtree for receiver attribute accesses and
/// receiver method calls.
fn collect_accesses(
    node: Node,
    source: &str,
    attrs: &mut BTreeSet<String>,
    calls: &mut BTreeSet<String>,
) {
    match node.kind() {
        "attribute" => {
            if let Some(name) = receiver_attribute(node, source) {
                attrs.insert(name);
            }
        }
        "call" => {
            if let Some(function) = node.child_by_field_name("function") {
                if function.kind() == "attribute" {
                    if let Some(name) = receiver_attribute(function, source) {
                        calls.insert(name);
                    }
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_accesses(child, source, attrs, calls);
    }
}

/// The attribute name of `<receiver>.<name>`, if the object is a plain
/// receiver identifier.
fn receiver_attribute(node: Node, source: &str) -> Option<String> {
    let object = node.child_by_field_name("object")?;
    let attribute = node.child_by_field_name("attribute")?;
    if object.kind() != "identifier" {
        return None;
    }
    if !RECEIVERS.contains(&node_text(object, source).as_str()) {
        return None;
    }
    Some(node_text(attribute, source))
}

/// Collect assignment target identifiers, following chained assignments
/// (`a = b = 1`) and tuple targets (`a, b = ...`).
fn assignment_targets(node: Node, source: &str, targets: &mut BTreeSet<String>) {
    if let Some(left) = node.child_by_field_name("left") {
        collect_pattern_identifiers(left, source, targets);
    }
    if let Some(right) = node.child_by_field_name("right") {
        if right.kind() == "assignment" {
            assignment_targets(right, source, targets);
        }
    }
}

fn collect_pattern_identifiers(node: Node, source: &str, targets: &mut BTreeSet<String>) {
    match node.kind() {
        "identifier" => {
            targets.insert(node_text(node, source));
        }
        "pattern_list" | "tuple_pattern" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_pattern_identifiers(child, source, targets);
            }
        }
        _ => {}
    }
}

/// Names of the decorators on a decorated definition. A decorator is
/// reduced to its last identifier: `@classmethod`, `@abc.abstractmethod`
/// and `@lru_cache()` yield `classmethod`, `abstractmethod`, `lru_cache`.
fn decorator_names(node: Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "decorator" {
            if let Some(expr) = child.named_child(0) {
                names.extend(decorator_label(expr, source));
            }
        }
    }
    names
}

fn decorator_label(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(node, source)),
        "attribute" => node
            .child_by_field_name("attribute")
            .map(|a| node_text(a, source)),
        "call" => node
            .child_by_field_name("function")
            .and_then(|f| decorator_label(f, source)),
        _ => None,
    }
}

/// Extract text from a tree-sitter node.
fn node_text(node: Node, source: &str) -> String {
    source[node.byte_range()].to_string()
}

/// Line of the first syntax error in a tree.
fn first_error_line(node: Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_line(child);
        }
    }
    node.start_position().row + 1
}

/// Derive a dotted module name from a path-like unit name. The final
/// segment loses its extension, whatever the scanned extension is.
/// `./tests/fixtures.py` -> `tests.fixtures`, `pkg/__init__.py` -> `pkg`.
fn module_name(path: &str) -> String {
    let normalized = path.replace('\\', "/");

    let mut segments: Vec<&str> = normalized
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    if let Some(last) = segments.last_mut() {
        if let Some((stem, _)) = last.rsplit_once('.') {
            if !stem.is_empty() {
                *last = stem;
            }
        }
    }
    if let Some(last) = segments.last() {
        if PACKAGE_ENTRY_SEGMENTS.contains(last) {
            segments.pop();
        }
    }
    segments.join(".")
}
