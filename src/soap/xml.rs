//! Minimal element tree over `quick-xml` events, plus the tag lookup
//! strategies used to cope with the backend's inconsistent namespace usage.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DecodeError;

/// Prefix SAP's SOAP runtime puts on response elements (`<n0:ZFM_PO_863Response>`).
pub const SAP_RESPONSE_PREFIX: &str = "n0";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written in the document, prefix included.
    pub name: String,
    /// Text and CDATA directly inside this element, unescaped.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Concatenated text of this element and everything below it, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Pre-order walk of all elements below `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// `self` followed by its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        std::iter::once(self).chain(self.descendants())
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

pub fn parse_document(xml: &str) -> Result<Element, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    fn attach(
        element: Element,
        stack: &mut [Element],
        root: &mut Option<Element>,
    ) -> Result<(), DecodeError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_some() => {
                return Err(DecodeError::Malformed(format!(
                    "second root element <{}>",
                    element.name
                )));
            }
            None => *root = Some(element),
        }
        Ok(())
    }

    loop {
        let event = reader.read_event().map_err(|e| {
            DecodeError::Malformed(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if stack.is_empty() && root.is_some() {
                    return Err(DecodeError::Malformed(format!("second root element <{name}>")));
                }
                stack.push(Element::new(name));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                attach(Element::new(name), &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    DecodeError::Malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(DecodeError::Malformed(
                            "text outside the root element".to_string(),
                        ));
                    }
                }
            }
            Event::CData(data) => {
                let data = data.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DecodeError::Malformed(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| DecodeError::Malformed("document has no root element".to_string()))
}

/// One way of finding elements called `tag` under a scope.
#[derive(Clone, Copy)]
pub struct Lookup {
    pub label: &'static str,
    matches: fn(&Element, &str) -> bool,
}

impl Lookup {
    pub fn first<'a>(&self, scope: &'a Element, tag: &str) -> Option<&'a Element> {
        scope.iter().find(|e| (self.matches)(e, tag))
    }

    pub fn all<'a>(&self, scope: &'a Element, tag: &str) -> Vec<&'a Element> {
        scope.iter().filter(|e| (self.matches)(e, tag)).collect()
    }
}

/// Exact, unprefixed name.
pub const BARE: Lookup = Lookup {
    label: "bare",
    matches: |e, tag| e.name == tag,
};

/// `n0:`-prefixed name.
pub const NAMESPACED: Lookup = Lookup {
    label: "namespaced",
    matches: |e, tag| e.prefix() == Some(SAP_RESPONSE_PREFIX) && e.local_name() == tag,
};

/// Local name match under any prefix.
pub const ANY_NAMESPACE: Lookup = Lookup {
    label: "any-namespace",
    matches: |e, tag| e.local_name() == tag,
};

pub const LOOKUP_ORDER: [Lookup; 3] = [BARE, NAMESPACED, ANY_NAMESPACE];

/// First element named `tag`, by the first lookup strategy that finds one.
pub fn find_first<'a>(scope: &'a Element, tag: &str) -> Option<&'a Element> {
    LOOKUP_ORDER.iter().find_map(|lookup| lookup.first(scope, tag))
}

/// First element named by any of `tags`, alternates tried in order.
pub fn find_first_of<'a>(scope: &'a Element, tags: &[&str]) -> Option<&'a Element> {
    tags.iter().find_map(|tag| find_first(scope, tag))
}

/// All elements named `tag` from the first lookup strategy that finds any.
pub fn find_all<'a>(scope: &'a Element, tag: &str) -> Vec<&'a Element> {
    LOOKUP_ORDER
        .iter()
        .map(|lookup| lookup.all(scope, tag))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Text content of the first `tag` under `scope`, `None` when absent.
pub fn field_text(scope: &Element, tag: &str) -> Option<String> {
    find_first(scope, tag).map(Element::text_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap-env:Envelope xmlns:soap-env="http://schemas.xmlsoap.org/soap/envelope/">
  <soap-env:Header/>
  <soap-env:Body>
    <n0:ZFM_PO_863Response xmlns:n0="urn:sap-com:document:sap:rfc:functions">
      <ET_PO>
        <item><PO_NUMBER>4500000001</PO_NUMBER><UNIT>EA</UNIT></item>
        <item><PO_NUMBER>4500000002</PO_NUMBER><!-- no unit --></item>
      </ET_PO>
      <n0:EV_STATUS>OK</n0:EV_STATUS>
      <ns2:EV_NOTE>A &amp; B</ns2:EV_NOTE>
    </n0:ZFM_PO_863Response>
  </soap-env:Body>
</soap-env:Envelope>"#;

    #[test]
    fn builds_tree_with_qualified_names() {
        let root = parse_document(RESPONSE).unwrap();

        assert_eq!(root.name, "soap-env:Envelope");
        assert_eq!(root.local_name(), "Envelope");
        assert_eq!(root.prefix(), Some("soap-env"));
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn finds_items_in_document_order() {
        let root = parse_document(RESPONSE).unwrap();
        let items = find_all(&root, "item");

        assert_eq!(items.len(), 2);
        assert_eq!(field_text(items[0], "PO_NUMBER").as_deref(), Some("4500000001"));
        assert_eq!(field_text(items[1], "PO_NUMBER").as_deref(), Some("4500000002"));
        assert_eq!(field_text(items[1], "UNIT"), None);
    }

    #[test]
    fn falls_back_through_lookup_strategies() {
        let root = parse_document(RESPONSE).unwrap();

        assert!(BARE.first(&root, "EV_STATUS").is_none());
        assert_eq!(field_text(&root, "EV_STATUS").as_deref(), Some("OK"));

        assert!(NAMESPACED.first(&root, "EV_NOTE").is_none());
        assert_eq!(field_text(&root, "EV_NOTE").as_deref(), Some("A & B"));
    }

    #[test]
    fn bare_match_wins_over_namespaced() {
        let xml = "<r><n0:CODE>ns</n0:CODE><CODE>bare</CODE></r>";
        let root = parse_document(xml).unwrap();
        assert_eq!(field_text(&root, "CODE").as_deref(), Some("bare"));
    }

    #[test]
    fn alternates_are_tried_in_order() {
        let root = parse_document("<r><IV_SUCCESS>X</IV_SUCCESS></r>").unwrap();
        let found = find_first_of(&root, &["SUCCESS", "IV_SUCCESS"]).unwrap();
        assert_eq!(found.name, "IV_SUCCESS");
    }

    #[test]
    fn reads_cdata_as_text() {
        let root = parse_document("<r><B64><![CDATA[JVBER i0=]]></B64></r>").unwrap();
        assert_eq!(field_text(&root, "B64").as_deref(), Some("JVBER i0="));
    }

    #[test]
    fn rejects_malformed_documents() {
        for bad in [
            "",
            "   ",
            "not xml at all",
            "<a><b></a>",
            "<a>",
            "<a/><b/>",
            "</a>",
        ] {
            assert!(
                matches!(parse_document(bad), Err(DecodeError::Malformed(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
