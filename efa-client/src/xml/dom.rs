//! Element tree built from `quick-xml` events.
//!
//! Parsing never fails. A malformed or truncated document yields every
//! element read before the first error, with elements still open at that
//! point closed implicitly. The error is kept on the [`Document`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value, or `None` if the attribute is absent.
    ///
    /// An attribute present with an empty value returns `Some("")`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, or the empty string if absent.
    pub fn attr_or_empty(&self, key: &str) -> &str {
        self.attr(key).unwrap_or("")
    }

    /// Attribute parsed as an integer; absent or non-numeric values give 0.
    pub fn int_attr(&self, key: &str) -> i32 {
        self.attr(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Attribute parsed as a float; absent or non-numeric values give 0.0.
    pub fn float_attr(&self, key: &str) -> f64 {
        self.attr(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0)
    }

    /// Direct child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with the given name.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children().find(|c| c.name == name)
    }

    /// All descendant elements with the given name, in document order.
    ///
    /// The element itself is not included.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    /// Concatenated text of the element and all its descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }

    fn push_text(&mut self, text: String) {
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }
}

fn collect_descendants<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in element.children() {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

fn collect_text(element: &Element, text: &mut String) {
    for node in &element.children {
        match node {
            Node::Element(child) => collect_text(child, text),
            Node::Text(t) => text.push_str(t),
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    root: Option<Element>,
    error: Option<String>,
}

impl Document {
    /// Parse a document, keeping whatever was readable if it is malformed.
    ///
    /// The declared encoding is honoured, so ISO-8859-1 responses decode
    /// correctly.
    ///
    /// # Examples
    ///
    /// ```
    /// use efa_client::xml::Document;
    ///
    /// let doc = Document::parse(b"<a><b x=\"1\"/><b x=\"2\">text</b>");
    /// assert!(!doc.is_well_formed());
    /// assert_eq!(doc.elements_by_tag_name("b").len(), 2);
    /// ```
    pub fn parse(data: &[u8]) -> Self {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        let error = loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => break Some(format!("{e} at byte {}", reader.buffer_position())),
            };
            match event {
                Event::Start(start) => match element_from(&reader, &start) {
                    Ok(element) => stack.push(element),
                    Err(e) => break Some(e),
                },
                Event::Empty(start) => match element_from(&reader, &start) {
                    Ok(element) => attach(&mut stack, &mut root, element),
                    Err(e) => break Some(e),
                },
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => match text.unescape() {
                    Ok(text) => {
                        if let Some(parent) = stack.last_mut() {
                            parent.push_text(text.into_owned());
                        }
                    }
                    Err(e) => break Some(e.to_string()),
                },
                Event::CData(data) => match reader.decoder().decode(&data) {
                    Ok(text) => {
                        if let Some(parent) = stack.last_mut() {
                            parent.push_text(text.into_owned());
                        }
                    }
                    Err(e) => break Some(e.to_string()),
                },
                Event::Eof => break None,
                _ => {}
            }
            buf.clear();
        };

        let error = match (error, stack.is_empty()) {
            (None, false) => Some("unexpected end of document".to_string()),
            (error, _) => error,
        };
        if let Some(e) = &error {
            warn!(error = %e, open_elements = stack.len(), "malformed XML, keeping partial tree");
        }

        // Close elements left open by a truncated document.
        while let Some(element) = stack.pop() {
            attach(&mut stack, &mut root, element);
        }

        Self { root, error }
    }

    /// The root element, if any element was read.
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// All elements with the given name, root included, in document order.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Element> {
        match &self.root {
            Some(root) => {
                let mut found = Vec::new();
                if root.name == name {
                    found.push(root);
                }
                collect_descendants(root, name, &mut found);
                found
            }
            None => Vec::new(),
        }
    }

    /// The first element with the given name.
    pub fn first_element(&self, name: &str) -> Option<&Element> {
        self.elements_by_tag_name(name).into_iter().next()
    }

    /// Returns true if the whole input parsed without error.
    pub fn is_well_formed(&self) -> bool {
        self.error.is_none()
    }

    /// The parse error, if the input was malformed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

fn element_from(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, String> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(start.name().as_ref())
        .map_err(|e| e.to_string())?
        .into_owned();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = decoder
            .decode(attribute.key.as_ref())
            .map_err(|e| e.to_string())?
            .into_owned();
        let value = attribute
            .decode_and_unescape_value(decoder)
            .map_err(|e| e.to_string())?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
