//! Selection-set document model
//!
//! A parsed query document reduced to what normalization needs: operations,
//! fragment definitions, and the selection sets inside them. Documents are
//! built in code with the constructors below; turning query text into a
//! `Document` is the job of whatever parser the caller uses.
//!
//! # Example
//!
//! ```
//! use graphcache_document::{Document, Field};
//!
//! // { node(id: "account1") { id name } }
//! let doc = Document::query([Field::new("node")
//!     .arg("id", "account1")
//!     .select([Field::new("id"), Field::new("name")])]);
//!
//! assert_eq!(doc.query_definition().unwrap().selection_set.len(), 1);
//! ```

use graphcache_core::{Error, Result, Value};
use serde::{Deserialize, Serialize};

/// A parsed document: operations plus fragment definitions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Top-level definitions, in document order
    pub definitions: Vec<Definition>,
}

/// One top-level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Definition {
    /// `query`, `mutation` or `subscription`
    Operation(OperationDefinition),
    /// `fragment Name on Type { ... }`
    Fragment(FragmentDefinition),
}

/// Kind of an operation definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Read
    Query,
    /// Write
    Mutation,
    /// Live updates
    Subscription,
}

/// An executable operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDefinition {
    /// Operation kind
    pub kind: OperationKind,
    /// Optional operation name
    pub name: Option<String>,
    /// Root selection set
    pub selection_set: SelectionSet,
}

/// A named fragment definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentDefinition {
    /// Fragment name
    pub name: String,
    /// Type the fragment applies to
    pub type_condition: String,
    /// Fragment body
    pub selection_set: SelectionSet,
}

/// The fields and fragments requested at one level of a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    /// Selections, in document order
    pub selections: Vec<Selection>,
}

/// One entry of a selection set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    /// A field, possibly with a nested selection set
    Field(Field),
    /// `... on Type { ... }` or `... { ... }`
    InlineFragment(InlineFragment),
    /// `...Name`
    FragmentSpread(FragmentSpread),
}

/// A field selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Alias the result is keyed by, if any
    pub alias: Option<String>,
    /// Field name
    pub name: String,
    /// Call arguments, in document order
    pub arguments: Vec<(String, InputValue)>,
    /// Directives applied to the field
    pub directives: Vec<Directive>,
    /// Nested selections for composite fields
    pub selection_set: Option<SelectionSet>,
}

/// An inline fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineFragment {
    /// Optional type condition
    pub type_condition: Option<String>,
    /// Directives applied to the fragment
    pub directives: Vec<Directive>,
    /// Fragment body
    pub selection_set: SelectionSet,
}

/// A spread of a named fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentSpread {
    /// Name of the spread fragment
    pub name: String,
    /// Directives applied to the spread
    pub directives: Vec<Directive>,
}

/// A directive such as `@skip(if: $flag)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    /// Name, without the `@`
    pub name: String,
    /// Arguments, in document order
    pub arguments: Vec<(String, InputValue)>,
}

/// An argument value as written in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    /// `$name`, resolved against the execution's variables
    Variable(String),
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    String(String),
    /// Enum literal
    Enum(String),
    /// List literal
    List(Vec<InputValue>),
    /// Object literal
    Object(Vec<(String, InputValue)>),
}

// ============================================================================
// Accessors
// ============================================================================

impl Document {
    /// Document holding a single anonymous query
    pub fn query<I, S>(selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        Document::operation_of(OperationKind::Query, selections)
    }

    /// Document holding a single anonymous operation of the given kind
    pub fn operation_of<I, S>(kind: OperationKind, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        Document {
            definitions: vec![Definition::Operation(OperationDefinition {
                kind,
                name: None,
                selection_set: SelectionSet::new(selections),
            })],
        }
    }

    /// Append a fragment definition
    pub fn with_fragment(mut self, fragment: FragmentDefinition) -> Self {
        self.definitions.push(Definition::Fragment(fragment));
        self
    }

    /// The first operation of the document
    pub fn operation(&self) -> Result<&OperationDefinition> {
        self.definitions
            .iter()
            .find_map(|definition| match definition {
                Definition::Operation(op) => Some(op),
                Definition::Fragment(_) => None,
            })
            .ok_or_else(|| Error::InvalidDocument("document contains no operation".to_string()))
    }

    /// The first operation of the document, which must be a query
    pub fn query_definition(&self) -> Result<&OperationDefinition> {
        let op = self.operation()?;
        if op.kind != OperationKind::Query {
            return Err(Error::InvalidDocument(format!(
                "expected a query operation, found {:?}",
                op.kind
            )));
        }
        Ok(op)
    }

    /// All fragment definitions of the document, in order
    pub fn fragment_definitions(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        })
    }
}

impl FragmentDefinition {
    /// Define a named fragment
    pub fn new<I, S>(name: impl Into<String>, type_condition: impl Into<String>, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        FragmentDefinition {
            name: name.into(),
            type_condition: type_condition.into(),
            selection_set: SelectionSet::new(selections),
        }
    }
}

impl SelectionSet {
    /// Build a selection set
    pub fn new<I, S>(selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        SelectionSet {
            selections: selections.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of selections at this level
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Check if there are no selections
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl Selection {
    /// Directives attached to this selection
    pub fn directives(&self) -> &[Directive] {
        match self {
            Selection::Field(field) => &field.directives,
            Selection::InlineFragment(fragment) => &fragment.directives,
            Selection::FragmentSpread(spread) => &spread.directives,
        }
    }
}

impl Field {
    /// A leaf field with no alias, arguments or directives
    pub fn new(name: impl Into<String>) -> Self {
        Field {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: None,
        }
    }

    /// Key the field's value has in a result object
    pub fn result_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Set the alias
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add an argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    /// Add a directive
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Give the field a nested selection set
    pub fn select<I, S>(mut self, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        self.selection_set = Some(SelectionSet::new(selections));
        self
    }
}

impl InlineFragment {
    /// Inline fragment with an optional type condition
    pub fn new<I, S>(type_condition: Option<&str>, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        InlineFragment {
            type_condition: type_condition.map(str::to_string),
            directives: Vec::new(),
            selection_set: SelectionSet::new(selections),
        }
    }

    /// Add a directive
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

impl FragmentSpread {
    /// Spread of the named fragment
    pub fn new(name: impl Into<String>) -> Self {
        FragmentSpread {
            name: name.into(),
            directives: Vec::new(),
        }
    }

    /// Add a directive
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

impl Directive {
    /// `@skip(if: <condition>)`
    pub fn skip(condition: impl Into<InputValue>) -> Self {
        Directive {
            name: "skip".to_string(),
            arguments: vec![("if".to_string(), condition.into())],
        }
    }

    /// `@include(if: <condition>)`
    pub fn include(condition: impl Into<InputValue>) -> Self {
        Directive {
            name: "include".to_string(),
            arguments: vec![("if".to_string(), condition.into())],
        }
    }

    /// Value of a named argument
    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }
}

impl InputValue {
    /// `$name`
    pub fn var(name: impl Into<String>) -> Self {
        InputValue::Variable(name.into())
    }

    /// Substitute variables, producing a plain value
    ///
    /// Unbound variables resolve to `None`; inside lists they become null
    /// and inside objects the entry is dropped.
    pub fn resolve(&self, variables: &graphcache_core::Variables) -> Option<Value> {
        Some(match self {
            InputValue::Variable(name) => return variables.get(name).cloned(),
            InputValue::Null => Value::Null,
            InputValue::Bool(b) => Value::Bool(*b),
            InputValue::Int(i) => Value::Int(*i),
            InputValue::Float(f) => Value::Float(*f),
            InputValue::String(s) | InputValue::Enum(s) => Value::String(s.clone()),
            InputValue::List(items) => Value::array(
                items
                    .iter()
                    .map(|item| item.resolve(variables).unwrap_or(Value::Null))
                    .collect(),
            ),
            InputValue::Object(entries) => Value::object(
                entries
                    .iter()
                    .filter_map(|(k, v)| v.resolve(variables).map(|v| (k.clone(), v))),
            ),
        })
    }
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Selection::Field(field)
    }
}

impl From<InlineFragment> for Selection {
    fn from(fragment: InlineFragment) -> Self {
        Selection::InlineFragment(fragment)
    }
}

impl From<FragmentSpread> for Selection {
    fn from(spread: FragmentSpread) -> Self {
        Selection::FragmentSpread(spread)
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::String(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::String(s)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

impl From<i64> for InputValue {
    fn from(i: i64) -> Self {
        InputValue::Int(i)
    }
}

impl From<i32> for InputValue {
    fn from(i: i32) -> Self {
        InputValue::Int(i64::from(i))
    }
}

impl From<f64> for InputValue {
    fn from(f: f64) -> Self {
        InputValue::Float(f)
    }
}
