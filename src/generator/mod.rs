//! Denormalization of the loaded tables into per-entity API documents

pub mod connected;
pub mod group;
pub mod line;
pub mod prefecture;
pub mod station;

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::reader::Tables;
use crate::schema::{RailwayLine, RailwayStation};
use crate::ui::{Phase, Ui};
use crate::writer::DocumentSink;

pub use connected::generate_connected_stations;
pub use group::generate_station_groups;
pub use line::generate_lines;
pub use prefecture::generate_prefectures;
pub use station::generate_stations;

/// One family of generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Pref,
    Line,
    Station,
    Group,
    Join,
}

impl Endpoint {
    /// Every endpoint, in generation order
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Pref,
        Endpoint::Line,
        Endpoint::Station,
        Endpoint::Group,
        Endpoint::Join,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Pref => "pref",
            Endpoint::Line => "line",
            Endpoint::Station => "station",
            Endpoint::Group => "group",
            Endpoint::Join => "join",
        }
    }

    /// Output directory under the API root
    pub fn dir(&self) -> &'static str {
        match self {
            Endpoint::Pref => "p",
            Endpoint::Line => "l",
            Endpoint::Station => "s",
            Endpoint::Group => "g",
            Endpoint::Join => "n",
        }
    }

    /// API name in the XML version attribute; groups are served by the station API
    pub fn api_name(&self) -> &'static str {
        match self {
            Endpoint::Pref => "pref",
            Endpoint::Line => "line",
            Endpoint::Station | Endpoint::Group => "station",
            Endpoint::Join => "station_join",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.dir())
    }
}

impl FromStr for Endpoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match Endpoint::ALL
            .iter()
            .find(|e| e.name() == s || e.dir() == s)
        {
            Some(endpoint) => Ok(*endpoint),
            None => bail!(
                "Unknown endpoint: {} (expected one of pref, line, station, group, join)",
                s
            ),
        }
    }
}

/// Sort key for lines: display order, then line code
pub fn line_order(line: &RailwayLine) -> (i32, u32) {
    (line.e_sort, line.line_cd)
}

/// Sort key for stations: display order, then station code
pub fn station_order(station: &RailwayStation) -> (i32, u32) {
    (station.e_sort, station.station_cd)
}

/// Active lines in (e_sort, line_cd) order
pub fn active_lines(lines: &[RailwayLine]) -> Vec<&RailwayLine> {
    let mut active: Vec<&RailwayLine> = lines.iter().filter(|l| l.is_active()).collect();
    active.sort_by_key(|l| line_order(l));
    active
}

/// Active stations in station code order
pub fn active_stations_by_code(stations: &[RailwayStation]) -> Vec<&RailwayStation> {
    let mut active: Vec<&RailwayStation> = stations.iter().filter(|s| s.is_active()).collect();
    active.sort_by_key(|s| s.station_cd);
    active
}

/// Lines by line code; the first row wins when a code repeats
pub struct LineIndex<'a> {
    by_cd: HashMap<u32, &'a RailwayLine>,
}

impl<'a> LineIndex<'a> {
    pub fn new(lines: &'a [RailwayLine]) -> Self {
        let mut by_cd = HashMap::with_capacity(lines.len());
        for line in lines {
            by_cd.entry(line.line_cd).or_insert(line);
        }
        Self { by_cd }
    }

    pub fn get(&self, line_cd: u32) -> Option<&'a RailwayLine> {
        self.by_cd.get(&line_cd).copied()
    }

    pub fn name(&self, line_cd: u32) -> Option<&'a str> {
        self.get(line_cd).map(|l| l.line_name.as_str())
    }
}

/// Stations by station code; the first row wins when a code repeats
pub struct StationIndex<'a> {
    by_cd: HashMap<u32, &'a RailwayStation>,
}

impl<'a> StationIndex<'a> {
    pub fn new(stations: &'a [RailwayStation]) -> Self {
        let mut by_cd = HashMap::with_capacity(stations.len());
        for station in stations {
            by_cd.entry(station.station_cd).or_insert(station);
        }
        Self { by_cd }
    }

    pub fn get(&self, station_cd: u32) -> Option<&'a RailwayStation> {
        self.by_cd.get(&station_cd).copied()
    }
}

/// Run a single endpoint's generator
pub fn generate(
    endpoint: Endpoint,
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<usize> {
    ui.set_phase(Phase::Generating(endpoint));
    sink.prepare(endpoint.dir())?;

    let count = match endpoint {
        Endpoint::Pref => generate_prefectures(tables, sink, ui)?,
        Endpoint::Line => generate_lines(tables, sink, ui)?,
        Endpoint::Station => generate_stations(tables, sink, ui)?,
        Endpoint::Group => generate_station_groups(tables, sink, ui)?,
        Endpoint::Join => generate_connected_stations(tables, sink, ui)?,
    };

    info!(endpoint = endpoint.name(), documents = count, "generated");
    Ok(count)
}

/// Document counts per endpoint for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationSummary {
    pub counts: Vec<(Endpoint, usize)>,
}

impl GenerationSummary {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn count(&self, endpoint: Endpoint) -> Option<usize> {
        self.counts
            .iter()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, n)| *n)
    }
}

/// Run the selected endpoints one after another, always in `Endpoint::ALL` order
pub fn generate_all(
    endpoints: &[Endpoint],
    tables: &Tables,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<GenerationSummary> {
    let mut summary = GenerationSummary::default();

    for endpoint in Endpoint::ALL.iter().filter(|e| endpoints.contains(e)) {
        let count = generate(*endpoint, tables, sink, ui)?;
        summary.counts.push((*endpoint, count));
    }

    ui.set_phase(Phase::Complete);
    Ok(summary)
}
