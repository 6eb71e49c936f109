/*!

Read-only views of the store for diagnostic tooling.

Tooling can list the types that currently have a table ([`DataStore::registered_type_names`])
and render the contents of one of them as a tree ([`DataStore::describe_type`]). There is no
runtime reflection involved: a stored type opts in by implementing [`Entry::describe`] and
returning one [`Field`] per field it wants shown.

Each stored entry becomes a node labeled with its key. Its fields render as:

- `"name: value"` for scalars,
- `"name: NULL"` for absent values,
- `"name: [count]"` for sequences, with one child per element (`"[i]: value"` for scalar
  elements, `"i"` with the element's own fields as children for composite elements),
- `"name"` for composites, with the nested fields as children.

[`DataStore::registered_type_names`]: crate::DataStore::registered_type_names
[`DataStore::describe_type`]: crate::DataStore::describe_type
[`Entry::describe`]: crate::Entry::describe

*/

use std::fmt::{Display, Write};

use serde::Serialize;

use crate::entry::Entry;

/// One described field of an entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum FieldValue {
    Null,
    Scalar(String),
    Sequence(Vec<FieldValue>),
    Composite(Vec<Field>),
}

impl FieldValue {
    pub fn scalar(value: impl Display) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl Field {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Field {
            name: name.into(),
            value,
        }
    }

    pub fn scalar(name: impl Into<String>, value: impl Display) -> Self {
        Field::new(name, FieldValue::scalar(value))
    }

    /// A scalar that may be absent. `None` renders as `NULL`.
    pub fn optional<V: Display>(name: impl Into<String>, value: Option<V>) -> Self {
        let value = match value {
            Some(value) => FieldValue::scalar(value),
            None => FieldValue::Null,
        };
        Field::new(name, value)
    }

    /// A sequence of scalars.
    pub fn sequence<V: Display>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Field::new(
            name,
            FieldValue::Sequence(values.into_iter().map(FieldValue::scalar).collect()),
        )
    }

    pub fn composite(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Field::new(name, FieldValue::Composite(fields))
    }
}

/// A labeled node of a rendered tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    pub label: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(label: impl Into<String>) -> Self {
        Node {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            label: label.into(),
            children,
        }
    }

    /// Renders the tree as indented text, two spaces per level.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        // Writing to a `String` cannot fail.
        let _ = writeln!(out, "{:indent$}{}", "", self.label, indent = depth * 2);
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}

/// Renders one stored entry: a node labeled with its key whose children are its fields.
pub fn describe_entry(entry: &dyn Entry) -> Node {
    Node::with_children(
        entry.key(),
        entry.describe().iter().map(describe_field).collect(),
    )
}

fn describe_field(field: &Field) -> Node {
    let name = &field.name;
    match &field.value {
        FieldValue::Null => Node::leaf(format!("{name}: NULL")),
        FieldValue::Scalar(value) => Node::leaf(format!("{name}: {value}")),
        FieldValue::Sequence(elements) => Node::with_children(
            format!("{name}: [{}]", elements.len()),
            elements
                .iter()
                .enumerate()
                .map(|(index, element)| describe_element(index, element))
                .collect(),
        ),
        FieldValue::Composite(fields) => {
            Node::with_children(name.clone(), fields.iter().map(describe_field).collect())
        }
    }
}

fn describe_element(index: usize, element: &FieldValue) -> Node {
    match element {
        FieldValue::Composite(fields) => Node::with_children(
            index.to_string(),
            fields.iter().map(describe_field).collect(),
        ),
        _ => describe_field(&Field::new(format!("[{index}]"), element.clone())),
    }
}

/// The last path segment of a type name, keeping generic arguments intact:
/// `my_game::data::Enemy` becomes `Enemy`, `my_game::Wrapper<my_game::Item>` becomes
/// `Wrapper<my_game::Item>`.
pub(crate) fn short_type_name(full_name: &str) -> &str {
    let generics_start = full_name.find('<').unwrap_or(full_name.len());
    let path = &full_name[..generics_start];
    match path.rfind("::") {
        Some(separator) => &full_name[separator + 2..],
        None => full_name,
    }
}
