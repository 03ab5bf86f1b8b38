use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::{active_lines, Endpoint, StationIndex};
use crate::reader::Tables;
use crate::schema::{RailwayStation, RailwayStationJoin};
use crate::ui::Ui;
use crate::writer::{Document, DocumentSink};

#[derive(Debug, Serialize)]
struct Edge<'a> {
    station_cd1: u32,
    station_cd2: u32,
    station_name1: Option<&'a str>,
    lat1: Option<f64>,
    lon1: Option<f64>,
    station_name2: Option<&'a str>,
    lat2: Option<f64>,
    lon2: Option<f64>,
}

#[derive(Debug, Serialize)]
struct JoinBody<'a> {
    station_join: &'a [Edge<'a>],
}

/// Joins per line, keeping their order in the source table
fn joins_by_line(joins: &[RailwayStationJoin]) -> HashMap<u32, Vec<&RailwayStationJoin>> {
    let mut by_line: HashMap<u32, Vec<&RailwayStationJoin>> = HashMap::new();
    for join in joins {
        by_line.entry(join.line_cd).or_default().push(join);
    }
    by_line
}

fn endpoint_station<'a>(
    stations: &StationIndex<'a>,
    join: &RailwayStationJoin,
    station_cd: u32,
) -> Option<&'a RailwayStation> {
    let station = stations.get(station_cd);
    if station.is_none() {
        debug!(line_cd = join.line_cd, station_cd, "join endpoint not found");
    }
    station
}

/// `n/{line_cd}`: the station adjacency edges of each active line
pub fn generate_connected_stations(
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<usize> {
    let endpoint = Endpoint::Join;
    let lines = active_lines(&tables.lines);
    let stations = StationIndex::new(&tables.stations);
    let by_line = joins_by_line(&tables.joins);
    let total = lines.len() as u64;

    for (idx, line) in lines.iter().enumerate() {
        let edges: Vec<Edge> = by_line
            .get(&line.line_cd)
            .map(|joins| {
                joins
                    .iter()
                    .map(|join| {
                        let s1 = endpoint_station(&stations, join, join.station_cd1);
                        let s2 = endpoint_station(&stations, join, join.station_cd2);
                        Edge {
                            station_cd1: join.station_cd1,
                            station_cd2: join.station_cd2,
                            station_name1: s1.map(|s| s.station_name.as_str()),
                            lat1: s1.map(|s| s.lat),
                            lon1: s1.map(|s| s.lon),
                            station_name2: s2.map(|s| s.station_name.as_str()),
                            lat2: s2.map(|s| s.lat),
                            lon2: s2.map(|s| s.lon),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let body = JoinBody {
            station_join: &edges,
        };

        sink.write(
            endpoint.dir(),
            Document::new(line.line_cd, endpoint.api_name(), &body, &body)?,
        )?;
        ui.set_progress(idx as u64 + 1, total, line.line_name.as_str());
        debug!(line_cd = line.line_cd, edges = edges.len(), "station joins generated");
    }

    Ok(lines.len())
}
