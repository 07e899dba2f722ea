//! Response document parsing helpers.
//!
//! Responses arrive as namespace-qualified documents. These helpers wrap
//! `roxmltree` lookups with the namespace handling the wire format uses,
//! and convert response subtrees back into [`Field`] trees.

use crate::error::XmlResult;
use crate::field::Field;
use roxmltree::{Document, Node};

/// Parses a response document.
pub fn parse_document(xml: &str) -> XmlResult<Document<'_>> {
    Ok(Document::parse(xml)?)
}

/// Finds the first descendant element with the given namespace and tag.
pub fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &str,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag && n.tag_name().namespace() == Some(namespace))
}

/// Returns the text of the first matching descendant element, if any.
pub fn descendant_text(node: Node<'_, '_>, namespace: &str, tag: &str) -> Option<String> {
    find_descendant(node, namespace, tag)
        .and_then(|n| n.text())
        .map(str::to_string)
}

/// Returns an attribute of the first matching descendant element, if any.
pub fn node_attribute<'a>(
    node: Node<'a, '_>,
    namespace: &str,
    tag: &str,
    attribute: &str,
) -> Option<&'a str> {
    find_descendant(node, namespace, tag).and_then(|n| n.attribute(attribute))
}

/// Converts a parsed element subtree into a [`Field`] tree.
///
/// Tags are stored unqualified; attributes keep document order; text made
/// up entirely of whitespace (indentation) is treated as no value.
pub fn field_from_node(node: Node<'_, '_>) -> Field {
    let mut field = Field::new(node.tag_name().name());

    for attribute in node.attributes() {
        field.add_attribute(attribute.name(), Some(attribute.value()));
    }

    match node.text() {
        Some(text) if !text.trim().is_empty() => field.set(text),
        _ => {}
    }

    for child in node.children().filter(Node::is_element) {
        field.push_child(field_from_node(child));
    }

    field
}
