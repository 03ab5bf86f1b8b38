use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::{active_stations_by_code, station_order, Endpoint, LineIndex};
use crate::reader::Tables;
use crate::schema::RailwayStation;
use crate::ui::Ui;
use crate::writer::{Document, DocumentSink};

#[derive(Debug, Serialize)]
struct AnchorStation<'a> {
    line_cd: u32,
    line_name: Option<&'a str>,
    station_cd: u32,
    station_g_cd: u32,
    station_name: &'a str,
    lon: f64,
    lat: f64,
}

#[derive(Debug, Serialize)]
struct GroupMember<'a> {
    pref_cd: u32,
    line_cd: u32,
    line_name: Option<&'a str>,
    station_cd: u32,
    station_name: &'a str,
}

#[derive(Debug, Serialize)]
struct GroupJson<'a> {
    station_g: &'a [GroupMember<'a>],
}

#[derive(Debug, Serialize)]
struct GroupXml<'a> {
    station: AnchorStation<'a>,
    station_g: &'a [GroupMember<'a>],
}

/// Active stations per station_g_cd, each group in (e_sort, station_cd) order
fn active_groups(stations: &[RailwayStation]) -> HashMap<u32, Vec<&RailwayStation>> {
    let mut groups: HashMap<u32, Vec<&RailwayStation>> = HashMap::new();
    for station in stations.iter().filter(|s| s.is_active()) {
        groups.entry(station.station_g_cd).or_default().push(station);
    }
    for members in groups.values_mut() {
        members.sort_by_key(|s| station_order(s));
    }
    groups
}

/// `g/{station_cd}`: every active station anchoring its co-located group
pub fn generate_station_groups(
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<usize> {
    let endpoint = Endpoint::Group;
    let lines = LineIndex::new(&tables.lines);
    let anchors = active_stations_by_code(&tables.stations);
    let groups = active_groups(&tables.stations);
    let total = anchors.len() as u64;

    let line_name = |station: &RailwayStation| {
        let name = lines.name(station.line_cd);
        if name.is_none() {
            debug!(
                station_cd = station.station_cd,
                line_cd = station.line_cd,
                "line not found for station"
            );
        }
        name
    };

    for (idx, anchor) in anchors.iter().enumerate() {
        let members: Vec<GroupMember> = groups
            .get(&anchor.station_g_cd)
            .map(|group| {
                group
                    .iter()
                    .map(|s| GroupMember {
                        pref_cd: s.pref_cd,
                        line_cd: s.line_cd,
                        line_name: line_name(*s),
                        station_cd: s.station_cd,
                        station_name: &s.station_name,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let json = GroupJson { station_g: &members };
        let xml = GroupXml {
            station: AnchorStation {
                line_cd: anchor.line_cd,
                line_name: line_name(*anchor),
                station_cd: anchor.station_cd,
                station_g_cd: anchor.station_g_cd,
                station_name: &anchor.station_name,
                lon: anchor.lon,
                lat: anchor.lat,
            },
            station_g: &members,
        };

        sink.write(
            endpoint.dir(),
            Document::new(anchor.station_cd, endpoint.api_name(), &json, &xml)?,
        )?;
        ui.set_progress(idx as u64 + 1, total, anchor.station_name.as_str());
        debug!(
            station_cd = anchor.station_cd,
            members = members.len(),
            "station group generated"
        );
    }

    Ok(anchors.len())
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
        generate_station_groups(&fixtures::tables(), &mut sink, &mut SilentUi::new()).unwrap();
        sink
    }

    fn member_codes(doc: &Document) -> Vec<u64> {
        doc.json["station_g"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["station_cd"].as_u64().unwrap())
            .collect()
    }

    #[test]
    fn test_group_lists_every_member_once() {
        let sink = run();
        let expected = vec![1130101, 1130201, 2800101, 1130103];
        for anchor in [1130101, 1130201, 2800101, 1130103] {
            let doc = sink.get("g", anchor).unwrap();
            assert_eq!(member_codes(doc), expected, "anchor {}", anchor);
        }
    }

    #[test]
    fn test_members_resolve_their_own_lines() {
        let sink = run();
        let doc = sink.get("g", 1130201).unwrap();
        assert_eq!(
            doc.json["station_g"][0],
            json!({
                "pref_cd": 13,
                "line_cd": 11302,
                "line_name": "JR山手線",
                "station_cd": 1130101,
                "station_name": "東京"
            })
        );
        assert_eq!(doc.json["station_g"][1]["line_name"], json!("JR東海道本線"));
    }

    #[test]
    fn test_xml_anchor_summary() {
        let sink = run();
        let doc = sink.get("g", 1130201).unwrap();
        assert_eq!(doc.xml.version, "ekidata.jp station api 1.0");
        assert_eq!(
            doc.xml.root["station"],
            json!({
                "line_cd": 11301,
                "line_name": "JR東海道本線",
                "station_cd": 1130201,
                "station_g_cd": 1130101,
                "station_name": "東京",
                "lon": 139.5,
                "lat": 35.5
            })
        );
    }

    #[test]
    fn test_singleton_group() {
        let sink = run();
        let doc = sink.get("g", 1130208).unwrap();
        assert_eq!(member_codes(doc), vec![1130208]);
    }

    #[test]
    fn test_retired_station_is_neither_anchor_nor_member() {
        let sink = run();
        assert!(sink.get("g", 1130105).is_none());
        assert_eq!(sink.in_dir("g").count(), 6);
    }
}
