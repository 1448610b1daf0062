//! Definition parsing
//!
//! Parses raw definition XML into a [`ParsedRoot`]: the root element's name
//! and attributes plus its ordered direct children. Only the envelope
//! matters here; nested action bodies are a collaborator's format and are
//! skipped. Parsing is pure and has no side effects.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, malformed_definition};

/// A direct child element of the definition root
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    pub tag: String,
    attributes: Vec<(String, String)>,
}

impl ParsedNode {
    /// Look up an attribute by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The node's name attribute, its natural identifier
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// All attributes, in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

/// Parsed root of a definition document
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRoot {
    /// Root element tag (`workflow`, `coordinator`, `bundle`)
    pub tag: String,
    /// Root name attribute, the natural identifier of the definition
    pub name: String,
    attributes: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

impl ParsedRoot {
    /// Look up a root attribute by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Ordered direct children of the root
    pub fn children(&self) -> &[ParsedNode] {
        &self.children
    }
}

fn element_attributes(element: &BytesStart<'_>) -> std::result::Result<Vec<(String, String)>, String> {
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

fn element_tag(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Parse definition XML into a [`ParsedRoot`]
///
/// Fails with `MalformedDefinition` on syntax errors and when the root
/// element carries no `name` attribute.
pub fn parse_definition(xml: &str) -> Result<ParsedRoot> {
    // Text and comment events are ignored; only the element envelope matters
    let mut reader = Reader::from_str(xml);

    let mut root: Option<(String, Vec<(String, String)>)> = None;
    let mut children: Vec<ParsedNode> = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                collect_element(&element, depth, &mut root, &mut children)?;
                depth += 1;
            }
            Ok(Event::Empty(element)) => {
                collect_element(&element, depth, &mut root, &mut children)?;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(malformed_definition("definition", e.to_string()));
            }
        }
    }

    let (tag, attributes) = root
        .ok_or_else(|| malformed_definition("definition", "document has no root element"))?;
    let name = attributes
        .iter()
        .find(|(k, _)| k == "name")
        .map(|(_, v)| v.clone())
        .ok_or_else(|| {
            malformed_definition(&tag, "root element has no name attribute")
        })?;

    Ok(ParsedRoot {
        tag,
        name,
        attributes,
        children,
    })
}

fn collect_element(
    element: &BytesStart<'_>,
    depth: usize,
    root: &mut Option<(String, Vec<(String, String)>)>,
    children: &mut Vec<ParsedNode>,
) -> Result<()> {
    let tag = element_tag(element);
    let attributes = element_attributes(element)
        .map_err(|reason| malformed_definition(&tag, reason))?;

    match depth {
        0 => {
            if root.is_some() {
                return Err(malformed_definition(&tag, "multiple root elements"));
            }
            *root = Some((tag, attributes));
        }
        1 => children.push(ParsedNode { tag, attributes }),
        // Nested action bodies are another collaborator's format
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLEEP_WORKFLOW: &str = r#"
        <workflow name="sleep-test" xmlns="uri:jobseed:workflow:0.4">
            <action name="sleep-1" type="shell" ok="sleep-2" error="fail"/>
            <action name="sleep-2" type="shell" ok="end" error="fail"/>
            <kill name="fail"/>
        </workflow>
    "#;

    #[test]
    fn test_parse_root_name() {
        let root = parse_definition(SLEEP_WORKFLOW).unwrap();
        assert_eq!(root.tag, "workflow");
        assert_eq!(root.name, "sleep-test");
    }

    #[test]
    fn test_children_ordered() {
        let root = parse_definition(SLEEP_WORKFLOW).unwrap();
        let names: Vec<Option<&str>> = root.children().iter().map(ParsedNode::name).collect();
        assert_eq!(
            names,
            vec![Some("sleep-1"), Some("sleep-2"), Some("fail")]
        );
    }

    #[test]
    fn test_child_attribute_lookup() {
        let root = parse_definition(SLEEP_WORKFLOW).unwrap();
        let first = &root.children()[0];
        assert_eq!(first.attr("ok"), Some("sleep-2"));
        assert_eq!(first.attr("error"), Some("fail"));
        assert_eq!(first.attr("type"), Some("shell"));
        assert_eq!(first.attr("missing"), None);
    }

    #[test]
    fn test_nested_content_skipped() {
        let xml = r#"
            <workflow name="nested">
                <action name="run" type="spark">
                    <spark><jar>app.jar</jar></spark>
                </action>
            </workflow>
        "#;
        let root = parse_definition(xml).unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), Some("run"));
    }

    #[test]
    fn test_root_attribute_lookup() {
        let xml = r#"<coordinator name="daily" frequency="1440" timezone="UTC"/>"#;
        let root = parse_definition(xml).unwrap();
        assert_eq!(root.attr("frequency"), Some("1440"));
        assert_eq!(root.attr("timezone"), Some("UTC"));
    }

    #[test]
    fn test_syntax_error() {
        let result = parse_definition("<workflow name=\"broken\"><action</workflow>");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_root_name() {
        let result = parse_definition("<workflow><action name=\"a\"/></workflow>");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_definition("").is_err());
    }

    #[test]
    fn test_escaped_attribute_values() {
        let xml = r#"<workflow name="a &amp; b"/>"#;
        let root = parse_definition(xml).unwrap();
        assert_eq!(root.name, "a & b");
    }
}
