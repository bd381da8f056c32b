//! Pull-parsing helpers for SOAP response envelopes.
//!
//! Responses are parsed by local element name, ignoring namespace prefixes,
//! so the same helpers work against both service contracts regardless of
//! how a server prefixes the envelope.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;

/// Raw inner XML of every element with the given local name.
///
/// Empty elements (`<Value/>`) yield an empty string. Nested occurrences of
/// the same name inside a match are part of the match's block, not separate
/// results.
pub(crate) fn element_blocks(xml: &str, tag: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == tag.as_bytes() => {
                match reader.read_text(e.name()) {
                    Ok(text) => blocks.push(text.into_owned()),
                    Err(_) => break,
                }
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == tag.as_bytes() => {
                blocks.push(String::new());
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    blocks
}

/// Unescaped text content of the first element with the given local name.
pub(crate) fn first_text(xml: &str, tag: &str) -> Option<String> {
    element_blocks(xml, tag)
        .into_iter()
        .next()
        .map(|block| unescape_block(&block))
}

/// Unescaped text content of every element with the given local name.
pub(crate) fn all_texts(xml: &str, tag: &str) -> Vec<String> {
    element_blocks(xml, tag)
        .iter()
        .map(|block| unescape_block(block))
        .collect()
}

/// Value of the first occurrence of the given attribute on any element.
pub(crate) fn first_attr(xml: &str, attr: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attribute in e.attributes().flatten() {
                    if attribute.key.local_name().as_ref() == attr.as_bytes()
                        && let Ok(value) = attribute.unescape_value()
                    {
                        return Some(value.into_owned());
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Parse an xsd:boolean literal.
pub(crate) fn xsd_bool(text: &str) -> bool {
    matches!(text.trim(), "true" | "1")
}

fn unescape_block(block: &str) -> String {
    unescape(block)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| block.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <Envelope>
          <Body>
            <CatalogItems>
              <CatalogItem><Name>Sales</Name><Path>/Reports/Sales</Path><TypeName>Report</TypeName></CatalogItem>
              <CatalogItem><Name>Shared</Name><Path>/Data/Shared</Path><TypeName>DataSource</TypeName><Hidden>true</Hidden></CatalogItem>
            </CatalogItems>
          </Body>
        </Envelope>"#;

    #[test]
    fn test_element_blocks_returns_each_item() {
        let blocks = element_blocks(SAMPLE, "CatalogItem");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("<Name>Sales</Name>"));
        assert!(blocks[1].contains("<Hidden>true</Hidden>"));
    }

    #[test]
    fn test_first_text_unescapes() {
        let xml = "<a><Value>x &amp; y</Value></a>";
        assert_eq!(first_text(xml, "Value").as_deref(), Some("x & y"));
    }

    #[test]
    fn test_first_text_missing_element() {
        assert_eq!(first_text(SAMPLE, "Nope"), None);
    }

    #[test]
    fn test_empty_element_yields_empty_string() {
        let xml = "<a><Value/><Value>b</Value></a>";
        let texts = all_texts(xml, "Value");
        assert_eq!(texts, vec!["".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_local_name_matching_ignores_prefix() {
        let xml = "<soap:Body xmlns:soap=\"urn:x\"><rs:Name xmlns:rs=\"urn:y\">A</rs:Name></soap:Body>";
        assert_eq!(first_text(xml, "Name").as_deref(), Some("A"));
    }

    #[test]
    fn test_first_attr() {
        let xml = "<RptDataSource Name=\"AdventureWorks\"><ConnectionProperties/></RptDataSource>";
        assert_eq!(first_attr(xml, "Name").as_deref(), Some("AdventureWorks"));
        assert_eq!(first_attr(xml, "Missing"), None);
    }

    #[test]
    fn test_xsd_bool() {
        assert!(xsd_bool("true"));
        assert!(xsd_bool("1"));
        assert!(!xsd_bool("false"));
        assert!(!xsd_bool("False"));
    }
}
