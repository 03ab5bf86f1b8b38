use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::{active_lines, station_order, Endpoint};
use crate::reader::Tables;
use crate::schema::{RailwayLine, RailwayStation};
use crate::ui::Ui;
use crate::writer::{Document, DocumentSink};

#[derive(Debug, Serialize)]
struct StationSummary<'a> {
    station_cd: u32,
    station_g_cd: u32,
    station_name: &'a str,
    lon: f64,
    lat: f64,
}

#[derive(Debug, Serialize)]
struct LineHeader<'a> {
    line_cd: u32,
    line_name: &'a str,
    line_lon: f64,
    line_lat: f64,
    line_zoom: i32,
}

#[derive(Debug, Serialize)]
struct LineJson<'a> {
    #[serde(flatten)]
    line: &'a LineHeader<'a>,
    station_l: &'a [StationSummary<'a>],
}

#[derive(Debug, Serialize)]
struct LineXml<'a> {
    line: &'a LineHeader<'a>,
    station: &'a [StationSummary<'a>],
}

/// Active stations per line, each list in (e_sort, station_cd) order
fn stations_by_line(stations: &[RailwayStation]) -> HashMap<u32, Vec<&RailwayStation>> {
    let mut by_line: HashMap<u32, Vec<&RailwayStation>> = HashMap::new();
    for station in stations.iter().filter(|s| s.is_active()) {
        by_line.entry(station.line_cd).or_default().push(station);
    }
    for members in by_line.values_mut() {
        members.sort_by_key(|s| station_order(s));
    }
    by_line
}

fn line_header(line: &RailwayLine) -> LineHeader<'_> {
    LineHeader {
        line_cd: line.line_cd,
        line_name: &line.line_name,
        line_lon: line.lon,
        line_lat: line.lat,
        line_zoom: line.zoom,
    }
}

/// `l/{line_cd}`: each active line with its active stations
pub fn generate_lines(
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<usize> {
    let endpoint = Endpoint::Line;
    let lines = active_lines(&tables.lines);
    let by_line = stations_by_line(&tables.stations);
    let total = lines.len() as u64;

    for (idx, line) in lines.iter().enumerate() {
        let stations: Vec<StationSummary> = by_line
            .get(&line.line_cd)
            .map(|members| {
                members
                    .iter()
                    .map(|s| StationSummary {
                        station_cd: s.station_cd,
                        station_g_cd: s.station_g_cd,
                        station_name: &s.station_name,
                        lon: s.lon,
                        lat: s.lat,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let header = line_header(line);
        let json = LineJson {
            line: &header,
            station_l: &stations,
        };
        let xml = LineXml {
            line: &header,
            station: &stations,
        };

        sink.write(
            endpoint.dir(),
            Document::new(line.line_cd, endpoint.api_name(), &json, &xml)?,
        )?;
        ui.set_progress(idx as u64 + 1, total, line.line_name.as_str());
        debug!(line_cd = line.line_cd, stations = stations.len(), "line generated");
    }

    Ok(lines.len())
}
