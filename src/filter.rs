use crate::schema::{RailwayLine, RailwayStation};

/// Line codes at or below this are high-speed (shinkansen) lines
const SHINKANSEN_LINE_CD_MAX: u32 = 10000;
/// Line type of a shinkansen line
const SHINKANSEN_LINE_TYPE: i32 = 1;
/// Station codes at or below this belong to shinkansen lines
const SHINKANSEN_STATION_CD_MAX: u32 = 1000000;

/// Decides which loaded lines and stations take part in generation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Inclusion {
    pub include_shinkansen: bool,
}

impl Inclusion {
    pub fn new(include_shinkansen: bool) -> Self {
        Self { include_shinkansen }
    }

    pub fn includes_line(&self, line: &RailwayLine) -> bool {
        self.include_shinkansen
            || (line.line_cd > SHINKANSEN_LINE_CD_MAX && line.line_type != SHINKANSEN_LINE_TYPE)
    }

    pub fn includes_station(&self, station: &RailwayStation) -> bool {
        self.include_shinkansen || station.station_cd > SHINKANSEN_STATION_CD_MAX
    }
}
