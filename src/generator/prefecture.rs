use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::{active_lines, Endpoint};
use crate::reader::Tables;
use crate::ui::Ui;
use crate::writer::{Document, DocumentSink};

#[derive(Debug, Serialize)]
struct LineEntry<'a> {
    line_cd: u32,
    line_name: &'a str,
}

#[derive(Debug, Serialize)]
struct PrefHeader<'a> {
    code: u32,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct PrefJson<'a> {
    line: &'a [LineEntry<'a>],
}

#[derive(Debug, Serialize)]
struct PrefXml<'a> {
    pref: PrefHeader<'a>,
    line: &'a [LineEntry<'a>],
}

/// `p/{pref_cd}`: the active lines that have a station in each prefecture
pub fn generate_prefectures(
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<usize> {
    let endpoint = Endpoint::Pref;

    let mut lines_in_pref: HashMap<u32, HashSet<u32>> = HashMap::new();
    for station in &tables.stations {
        lines_in_pref
            .entry(station.pref_cd)
            .or_default()
            .insert(station.line_cd);
    }

    let ordered_lines = active_lines(&tables.lines);
    let total = tables.prefs.len() as u64;

    for (idx, pref) in tables.prefs.iter().enumerate() {
        let entries: Vec<LineEntry> = match lines_in_pref.get(&pref.pref_cd) {
            Some(codes) => ordered_lines
                .iter()
                .filter(|l| codes.contains(&l.line_cd))
                .map(|l| LineEntry {
                    line_cd: l.line_cd,
                    line_name: &l.line_name,
                })
                .collect(),
            None => Vec::new(),
        };

        let json = PrefJson { line: &entries };
        let xml = PrefXml {
            pref: PrefHeader {
                code: pref.pref_cd,
                name: &pref.pref_name,
            },
            line: &entries,
        };

        sink.write(
            endpoint.dir(),
            Document::new(pref.pref_cd, endpoint.api_name(), &json, &xml)?,
        )?;
        ui.set_progress(idx as u64 + 1, total, pref.pref_name.as_str());
        debug!(pref_cd = pref.pref_cd, lines = entries.len(), "prefecture generated");
    }

    Ok(tables.prefs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fixtures;
    use crate::ui::SilentUi;
    use crate::writer::MemorySink;
    use serde_json::json;

    fn run() -> MemorySink {
        let mut sink = MemorySink::new();
        generate_prefectures(&fixtures::tables(), &mut sink, &mut SilentUi::new()).unwrap();
        sink
    }

    #[test]
    fn test_lines_are_active_and_ordered() {
        let sink = run();
        let tokyo = sink.get("p", 13).unwrap();
        assert_eq!(
            tokyo.json,
            json!({ "line": [
                { "line_cd": 11301, "line_name": "JR東海道本線" },
                { "line_cd": 11302, "line_name": "JR山手線" }
            ]})
        );
    }

    #[test]
    fn test_xml_carries_prefecture_header() {
        let sink = run();
        let kanagawa = sink.get("p", 14).unwrap();
        assert_eq!(kanagawa.xml.version, "ekidata.jp pref api 1.0");
        assert_eq!(kanagawa.xml.root["pref"], json!({ "code": 14, "name": "神奈川県" }));
        assert_eq!(kanagawa.xml.root["line"][0]["line_cd"], json!(11301));
    }

    #[test]
    fn test_prefecture_without_stations_has_empty_line_list() {
        let sink = run();
        let okinawa = sink.get("p", 47).unwrap();
        assert_eq!(okinawa.json, json!({ "line": [] }));
    }

    #[test]
    fn test_every_prefecture_is_emitted_in_table_order() {
        let sink = run();
        let keys: Vec<u32> = sink.in_dir("p").map(|d| d.key).collect();
        assert_eq!(keys, vec![13, 14, 47]);
    }
}
