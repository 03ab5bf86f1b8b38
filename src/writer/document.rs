use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::xml::render_xml;

/// XML payload of a document: the version attribute and the children of the root element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlBody {
    pub version: String,
    pub root: Value,
}

/// One generated API entity, ready to be written as a JSON/XML file pair
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Primary key used as the file stem
    pub key: u32,
    pub json: Value,
    pub xml: XmlBody,
}

impl Document {
    pub fn new(key: u32, api: &str, json: &impl Serialize, xml: &impl Serialize) -> Result<Self> {
        Ok(Self {
            key,
            json: serde_json::to_value(json).context("Failed to build JSON document")?,
            xml: XmlBody {
                version: version_string(api),
                root: serde_json::to_value(xml).context("Failed to build XML document")?,
            },
        })
    }

    /// Compact JSON; floats use serde_json's shortest round-trip form, so `139.0` stays `139.0`
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.json).context("Failed to serialize JSON")
    }

    pub fn to_xml_string(&self) -> Result<String> {
        render_xml(&self.xml)
    }
}

/// Version attribute carried by the XML root element
pub fn version_string(api: &str) -> String {
    format!("ekidata.jp {} api 1.0", api)
}

/// Destination for generated documents
pub trait DocumentSink {
    /// Called once before a generator emits its first document
    fn prepare(&mut self, _dir: &'static str) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, dir: &'static str, doc: Document) -> Result<()>;
}

/// Writes `{root}/{dir}/{key}.json` and `{root}/{dir}/{key}.xml`
pub struct DocumentWriter {
    root: PathBuf,
    created: HashSet<&'static str>,
}

impl DocumentWriter {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            created: HashSet::new(),
        }
    }

    fn ensure_dir(&mut self, dir: &'static str) -> Result<PathBuf> {
        let path = self.root.join(dir);
        if self.created.insert(dir) {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create output directory: {:?}", path))?;
        }
        Ok(path)
    }
}

impl DocumentSink for DocumentWriter {
    fn prepare(&mut self, dir: &'static str) -> Result<()> {
        self.ensure_dir(dir).map(|_| ())
    }

    fn write(&mut self, dir: &'static str, doc: Document) -> Result<()> {
        let dir_path = self.ensure_dir(dir)?;

        let json_path = dir_path.join(format!("{}.json", doc.key));
        fs::write(&json_path, doc.to_json_string()?)
            .with_context(|| format!("Failed to write: {:?}", json_path))?;

        let xml_path = dir_path.join(format!("{}.xml", doc.key));
        fs::write(&xml_path, doc.to_xml_string()?)
            .with_context(|| format!("Failed to write: {:?}", xml_path))?;

        Ok(())
    }
}

/// Keeps documents in memory instead of writing them out
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<(&'static str, Document)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dir: &str, key: u32) -> Option<&Document> {
        self.documents
            .iter()
            .find(|(d, doc)| *d == dir && doc.key == key)
            .map(|(_, doc)| doc)
    }

    /// Documents written to `dir`, in write order
    pub fn in_dir<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents
            .iter()
            .filter(move |(d, _)| *d == dir)
            .map(|(_, doc)| doc)
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, dir: &'static str, doc: Document) -> Result<()> {
        self.documents.push((dir, doc));
        Ok(())
    }
}

/// Renders every document and discards the output
#[derive(Debug, Default)]
pub struct DiscardSink {
    pub written: usize,
}

impl DocumentSink for DiscardSink {
    fn write(&mut self, _dir: &'static str, doc: Document) -> Result<()> {
        doc.to_json_string()?;
        doc.to_xml_string()?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document::new(
            13,
            "pref",
            &json!({ "line": [{ "line_cd": 11302, "line_name": "JR山手線" }] }),
            &json!({ "pref": { "code": 13, "name": "東京都" } }),
        )
        .unwrap()
    }

    #[test]
    fn test_whole_number_coordinates_keep_fraction() {
        let doc = Document::new(
            11302,
            "line",
            &json!({ "line_lon": 139.0_f64, "line_zoom": 12 }),
            &json!({ "line_lon": 139.0_f64 }),
        )
        .unwrap();
        assert_eq!(doc.to_json_string().unwrap(), r#"{"line_lon":139.0,"line_zoom":12}"#);
        assert!(doc.to_xml_string().unwrap().contains("<line_lon>139.0</line_lon>"));
    }

    #[test]
    fn test_version_string() {
        assert_eq!(version_string("station_join"), "ekidata.jp station_join api 1.0");
    }

    #[test]
    fn test_json_is_compact() {
        assert_eq!(
            sample().to_json_string().unwrap(),
            r#"{"line":[{"line_cd":11302,"line_name":"JR山手線"}]}"#
        );
    }

    #[test]
    fn test_writer_creates_file_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DocumentWriter::new(dir.path());
        writer.write("p", sample()).unwrap();

        let json = fs::read_to_string(dir.path().join("p/13.json")).unwrap();
        let xml = fs::read_to_string(dir.path().join("p/13.xml")).unwrap();
        assert!(json.contains("11302"));
        assert!(xml.contains("<ekidata version=\"ekidata.jp pref api 1.0\">"));
    }

    #[test]
    fn test_prepare_creates_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DocumentWriter::new(dir.path());
        writer.prepare("n").unwrap();
        assert!(dir.path().join("n").is_dir());
    }

    #[test]
    fn test_discard_sink_counts() {
        let mut sink = DiscardSink::default();
        sink.write("p", sample()).unwrap();
        sink.write("p", sample()).unwrap();
        assert_eq!(sink.written, 2);
    }

    #[test]
    fn test_unwritable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let mut writer = DocumentWriter::new(&blocker);
        assert!(writer.write("p", sample()).is_err());
    }
}
