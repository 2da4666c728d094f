//! Read-only access to a parsed XML document.
//!
//! The parser only ever talks to [`XmlNode`]. [`XmlDocument`] is the
//! built-in implementation, a small owned element tree assembled from
//! `quick-xml` events. With the `roxmltree` feature, `roxmltree::Node`
//! implements the trait as well.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, UrdfError};

/// Element lookup over some parsed document representation.
///
/// Implementors are cheap handles (`Copy`) borrowing from a document that
/// lives for `'a`. Text content and comments are not exposed.
pub trait XmlNode<'a>: Copy + 'a {
    /// The element's tag name.
    fn tag_name(self) -> &'a str;

    /// Value of an attribute, if present.
    fn attribute(self, name: &str) -> Option<&'a str>;

    /// Child elements in document order.
    fn child_elements(self) -> impl Iterator<Item = Self> + 'a;

    /// First child element with the given tag.
    fn child(self, tag: &str) -> Option<Self> {
        self.child_elements().find(|c| c.tag_name() == tag)
    }

    /// All child elements with the given tag, in document order.
    fn children_named(self, tag: &'a str) -> impl Iterator<Item = Self> + 'a {
        self.child_elements().filter(move |c| c.tag_name() == tag)
    }
}

/// An owned XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| UrdfError::XmlSyntax(format!("in <{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| UrdfError::XmlSyntax(format!("in <{name}> @{key}: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<'a> XmlNode<'a> for &'a XmlElement {
    fn tag_name(self) -> &'a str {
        &self.name
    }

    fn attribute(self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn child_elements(self) -> impl Iterator<Item = Self> + 'a {
        self.children.iter()
    }
}

/// Deepest element nesting [`XmlDocument::parse`] accepts, root included.
///
/// Matches the limit `roxmltree` enforces. Dropping, cloning and comparing
/// an element tree recurse once per level, so deeper input is refused while
/// it is still flat on the parse stack.
pub const MAX_DEPTH: usize = 1024;

/// A parsed XML document holding a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse XML text into an element tree.
    ///
    /// # Errors
    ///
    /// Returns [`UrdfError::XmlSyntax`] if the text is not well-formed, does
    /// not contain exactly one root element, or nests elements deeper than
    /// [`MAX_DEPTH`].
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                UrdfError::XmlSyntax(format!("at byte {}: {e}", reader.buffer_position()))
            })?;
            match event {
                Event::Start(ref e) => {
                    check_depth(&stack, e)?;
                    stack.push(XmlElement::from_start(e)?);
                }
                Event::Empty(ref e) => {
                    check_depth(&stack, e)?;
                    let element = XmlElement::from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| UrdfError::XmlSyntax("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(UrdfError::XmlSyntax(format!(
                "unexpected EOF inside <{}>",
                open.name
            )));
        }
        let root = root.ok_or_else(|| UrdfError::XmlSyntax("document has no root element".into()))?;
        Ok(Self { root })
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

fn check_depth(stack: &[XmlElement], start: &BytesStart) -> Result<()> {
    if stack.len() < MAX_DEPTH {
        return Ok(());
    }
    Err(UrdfError::XmlSyntax(format!(
        "<{}> nested deeper than {MAX_DEPTH} elements",
        String::from_utf8_lossy(start.name().as_ref())
    )))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(UrdfError::XmlSyntax(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(feature = "roxmltree")]
impl<'a, 'input: 'a> XmlNode<'a> for roxmltree::Node<'a, 'input> {
    fn tag_name(self) -> &'a str {
        roxmltree::Node::tag_name(&self).name()
    }

    fn attribute(self, name: &str) -> Option<&'a str> {
        roxmltree::Node::attribute(&self, name)
    }

    fn child_elements(self) -> impl Iterator<Item = Self> + 'a {
        self.children().filter(roxmltree::Node::is_element)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let doc = XmlDocument::parse(
            r#"<?xml version="1.0"?>
            <!-- header -->
            <robot name="r">
                <link name="a"><visual/></link>
                <link name="b"/>
            </robot>"#,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(root.tag_name(), "robot");
        assert_eq!(root.attribute("name"), Some("r"));
        assert_eq!(root.attribute("missing"), None);

        let links: Vec<_> = root.children_named("link").collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].attribute("name"), Some("b"));
        assert!(links[0].child("visual").is_some());
        assert!(links[1].child("visual").is_none());
    }

    #[test]
    fn unescapes_attribute_values() {
        let doc = XmlDocument::parse(r#"<robot name="a &amp; b"/>"#).unwrap();
        assert_eq!(doc.root().attribute("name"), Some("a & b"));
    }

    #[test]
    fn rejects_unclosed_element() {
        let err = XmlDocument::parse("<robot><link name='a'>").unwrap_err();
        assert!(matches!(err, UrdfError::XmlSyntax(_)));
    }

    fn nested(depth: usize) -> String {
        format!(
            r#"<robot name="r"><link name="a">{}{}</link></robot>"#,
            "<x>".repeat(depth),
            "</x>".repeat(depth)
        )
    }

    #[test]
    fn accepts_nesting_up_to_the_limit() {
        // robot and link take two levels.
        let doc = XmlDocument::parse(&nested(MAX_DEPTH - 2)).unwrap();
        assert_eq!(doc.root().child("link").unwrap().child_elements().count(), 1);
        assert!(XmlDocument::parse(&nested(MAX_DEPTH - 1)).is_err());
    }

    #[test]
    fn rejects_pathological_nesting_without_overflow() {
        let err = XmlDocument::parse(&nested(100_000)).unwrap_err();
        assert!(matches!(err, UrdfError::XmlSyntax(ref m) if m.contains("nested deeper")));
    }

    #[test]
    fn rejects_deep_self_closing_leaf() {
        let xml = format!("{}<leaf/>{}", "<x>".repeat(MAX_DEPTH), "</x>".repeat(MAX_DEPTH));
        assert!(XmlDocument::parse(&xml).is_err());
    }

    #[test]
    fn rejects_empty_and_multi_root_documents() {
        assert!(XmlDocument::parse("   ").is_err());
        assert!(XmlDocument::parse("<a/><b/>").is_err());
    }
}
