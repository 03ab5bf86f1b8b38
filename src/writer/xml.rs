use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use super::document::XmlBody;

/// Name of the outer element shared by every XML document
pub const ROOT_ELEMENT: &str = "ekidata";

/// Render an XML body as a pretty printed document
///
/// Object keys become child elements in insertion order, arrays repeat
/// their element once per item, and `null` becomes an empty element.
pub fn render_xml(body: &XmlBody) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    root.push_attribute(("version", body.version.as_str()));
    writer.write_event(Event::Start(root))?;

    if let Value::Object(map) = &body.root {
        for (name, value) in map {
            write_field(&mut writer, name, value)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    String::from_utf8(writer.into_inner()).context("XML output is not valid UTF-8")
}

fn write_field(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_field(writer, name, item)?;
            }
        }
        Value::Object(map) if !map.is_empty() => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (child, value) in map {
                write_field(writer, child, value)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Object(_) | Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::String(s) => write_text(writer, name, s)?,
        Value::Number(n) => write_text(writer, name, &n.to_string())?,
        Value::Bool(b) => write_text(writer, name, &b.to_string())?,
    }
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(root: Value) -> XmlBody {
        XmlBody {
            version: "ekidata.jp pref api 1.0".to_string(),
            root,
        }
    }

    #[test]
    fn test_render_nested_document() {
        let xml = render_xml(&body(json!({
            "pref": { "code": 13, "name": "東京都" },
            "line": [
                { "line_cd": 11302, "line_name": "JR山手線" },
                { "line_cd": 11312, "line_name": "JR中央線(快速)" }
            ]
        })))
        .unwrap();

        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<ekidata version=\"ekidata.jp pref api 1.0\">
  <pref>
    <code>13</code>
    <name>東京都</name>
  </pref>
  <line>
    <line_cd>11302</line_cd>
    <line_name>JR山手線</line_name>
  </line>
  <line>
    <line_cd>11312</line_cd>
    <line_name>JR中央線(快速)</line_name>
  </line>
</ekidata>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_empty_list_and_null_fields() {
        let xml = render_xml(&body(json!({
            "pref": { "code": 1, "name": "北海道" },
            "line": [],
            "note": null
        })))
        .unwrap();

        assert!(!xml.contains("<line>"));
        assert!(xml.contains("<note/>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render_xml(&body(json!({ "name": "A&B <C>" }))).unwrap();
        assert!(xml.contains("<name>A&amp;B &lt;C&gt;</name>"));
    }
}
