use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::{active_stations_by_code, Endpoint, LineIndex};
use crate::reader::Tables;
use crate::ui::Ui;
use crate::writer::{Document, DocumentSink};

#[derive(Debug, Serialize)]
struct StationDetail<'a> {
    pref_cd: u32,
    line_cd: u32,
    line_name: Option<&'a str>,
    station_cd: u32,
    station_g_cd: u32,
    station_name: &'a str,
    lon: f64,
    lat: f64,
}

#[derive(Debug, Serialize)]
struct StationJson<'a> {
    station: [&'a StationDetail<'a>; 1],
}

#[derive(Debug, Serialize)]
struct StationXml<'a> {
    station: &'a StationDetail<'a>,
}

/// `s/{station_cd}`: one document per active station with its line name resolved
pub fn generate_stations(
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<usize> {
    let endpoint = Endpoint::Station;
    let lines = LineIndex::new(&tables.lines);
    let stations = active_stations_by_code(&tables.stations);
    let total = stations.len() as u64;

    for (idx, station) in stations.iter().enumerate() {
        let line_name = lines.name(station.line_cd);
        if line_name.is_none() {
            debug!(
                station_cd = station.station_cd,
                line_cd = station.line_cd,
                "line not found for station"
            );
        }

        let detail = StationDetail {
            pref_cd: station.pref_cd,
            line_cd: station.line_cd,
            line_name,
            station_cd: station.station_cd,
            station_g_cd: station.station_g_cd,
            station_name: &station.station_name,
            lon: station.lon,
            lat: station.lat,
        };
        let json = StationJson { station: [&detail] };
        let xml = StationXml { station: &detail };

        sink.write(
            endpoint.dir(),
            Document::new(station.station_cd, endpoint.api_name(), &json, &xml)?,
        )?;
        ui.set_progress(idx as u64 + 1, total, station.station_name.as_str());
        debug!(station_cd = station.station_cd, "station generated");
    }

    Ok(stations.len())
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
        generate_stations(&fixtures::tables(), &mut sink, &mut SilentUi::new()).unwrap();
        sink
    }

    #[test]
    fn test_active_stations_in_code_order() {
        let sink = run();
        let keys: Vec<u32> = sink.in_dir("s").map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![1130101, 1130102, 1130103, 1130201, 1130208, 2800101]
        );
    }

    #[test]
    fn test_station_document() {
        let sink = run();
        let doc = sink.get("s", 1130208).unwrap();
        let expected = json!({
            "pref_cd": 14,
            "line_cd": 11301,
            "line_name": "JR東海道本線",
            "station_cd": 1130208,
            "station_g_cd": 1130208,
            "station_name": "横浜",
            "lon": 139.5,
            "lat": 35.5
        });
        assert_eq!(doc.json, json!({ "station": [expected.clone()] }));
        assert_eq!(doc.xml.root, json!({ "station": expected }));
        assert_eq!(doc.xml.version, "ekidata.jp station api 1.0");
    }

    #[test]
    fn test_line_name_resolves_against_inactive_line() {
        let sink = run();
        let doc = sink.get("s", 2800101).unwrap();
        assert_eq!(doc.json["station"][0]["line_name"], json!("廃止線"));
    }

    #[test]
    fn test_missing_line_yields_null_name() {
        let mut tables = fixtures::tables();
        tables.lines.clear();

        let mut sink = MemorySink::new();
        generate_stations(&tables, &mut sink, &mut SilentUi::new()).unwrap();
        let doc = sink.get("s", 1130101).unwrap();
        assert!(doc.json["station"][0]["line_name"].is_null());
        assert_eq!(doc.json["station"][0]["line_cd"], json!(11302));
    }
}
