//! Minimal XML document model for writing descriptors.
//!
//! Elements keep attributes in insertion order so generated files are
//! stable and diff cleanly.
//!
//! ```
//! use fontsmith_core::xml::{XmlDocument, XmlElement};
//!
//! let mut doc = XmlDocument::new("font");
//! let mut info = XmlElement::new("info");
//! info.set_attribute("size", 32);
//! doc.root_mut().add_child(info);
//!
//! assert!(doc.to_string_pretty().contains(r#"<info size="32"/>"#));
//! ```

use std::fmt::{self, Display};
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

// ============================================================================
// XmlDocument
// ============================================================================

/// An XML document: declaration plus a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Creates a document with an empty root element.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: XmlElement::new(root_name),
        }
    }

    /// Returns the root element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Returns the root element mutably.
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Converts the document to XML bytes, indented by two spaces.
    pub fn to_bytes_pretty(&self) -> Vec<u8> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_to(&mut writer);
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        bytes
    }

    /// Converts the document to an indented XML string.
    pub fn to_string_pretty(&self) -> String {
        String::from_utf8(self.to_bytes_pretty()).unwrap_or_default()
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) {
        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
        let _ = writer.write_event(Event::Decl(decl));
        self.root.write_to(writer);
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_pretty())
    }
}

// ============================================================================
// XmlElement
// ============================================================================

/// An element with ordered attributes and child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Returns all attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the child elements.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Appends a child element.
    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Gets the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            let _ = writer.write_event(Event::Empty(start));
        } else {
            let _ = writer.write_event(Event::Start(start));
            for child in &self.children {
                child.write_to(writer);
            }
            let _ = writer.write_event(Event::End(BytesEnd::new(self.name.as_str())));
        }
    }
}
