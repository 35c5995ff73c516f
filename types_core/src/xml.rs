//! Minimal element tree over `quick-xml`.
//!
//! Only what the types document needs is kept: element names, attributes in
//! document order, concatenated text and child elements. Comments,
//! processing instructions and the XML declaration are dropped on read.

use crate::error::{Result, TypesError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        XmlNode {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given element name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given element name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Parse a whole document and return its root element
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader.read_event().map_err(|e| TypesError::Xml {
                message: e.to_string(),
                position,
            })?;

            match event {
                Event::Start(ref e) => {
                    let node = Self::node_from_start(e, position)?;
                    if stack.is_empty() && root.is_some() {
                        return Err(multiple_roots(&node, position));
                    }
                    stack.push(node);
                }
                Event::Empty(ref e) => {
                    let node = Self::node_from_start(e, position)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(node),
                        None if root.is_some() => return Err(multiple_roots(&node, position)),
                        None => root = Some(node),
                    }
                }
                Event::End(_) => {
                    let Some(node) = stack.pop() else {
                        return Err(TypesError::Xml {
                            message: "unexpected closing tag".to_string(),
                            position,
                        });
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(node),
                        None => root = Some(node),
                    }
                }
                Event::Text(ref t) => {
                    let text = t.unescape().map_err(|e| TypesError::Xml {
                        message: e.to_string(),
                        position,
                    })?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Event::CData(ref c) => {
                    let text = std::str::from_utf8(c).map_err(|e| TypesError::Xml {
                        message: e.to_string(),
                        position,
                    })?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(TypesError::Xml {
                message: format!("element <{}> is never closed", open.name),
                position: reader.buffer_position() as u64,
            });
        }

        root.ok_or_else(|| TypesError::Xml {
            message: "document has no root element".to_string(),
            position: 0,
        })
    }

    fn node_from_start(start: &BytesStart, position: u64) -> Result<XmlNode> {
        let xml_err = |message: String| TypesError::Xml { message, position };

        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| xml_err(e.to_string()))?
            .to_string();
        let mut node = XmlNode::new(name);

        for attr in start.attributes() {
            let attr = attr.map_err(|e| xml_err(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| xml_err(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| xml_err(e.to_string()))?
                .into_owned();
            node.attributes.push((key, value));
        }

        Ok(node)
    }

    /// Render as an indented document with an XML declaration
    pub fn to_pretty_string(&self, indent: usize) -> io::Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        self.write_to(&mut writer)?;

        let mut out = String::from_utf8(writer.into_inner()).map_err(io::Error::other)?;
        out.push('\n');
        Ok(out)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> io::Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            return emit(writer, Event::Empty(start));
        }

        emit(writer, Event::Start(start))?;
        if !self.text.is_empty() {
            emit(writer, Event::Text(BytesText::new(&self.text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        emit(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> io::Result<()> {
    writer
        .write_event(event)
        .map_err(|e| io::Error::other(e.to_string()))
}

fn multiple_roots(node: &XmlNode, position: u64) -> TypesError {
    TypesError::Xml {
        message: format!("second root element <{}>", node.name),
        position,
    }
}
