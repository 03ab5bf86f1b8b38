//! Typed rows of the five ekidata tables

use crate::parser::{Fields, Record, RowError};

use super::tables::{COMPANY, JOIN, LINE, PREF, STATION};
use super::types::TableSchema;

/// `e_status` value of an entity that is currently in service
pub const ACTIVE: i32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Prefecture {
    pub pref_cd: u32,
    pub pref_name: String,
}

impl Record for Prefecture {
    fn schema() -> &'static TableSchema {
        &PREF
    }

    fn from_fields(f: &Fields<'_>) -> Result<Self, RowError> {
        Ok(Self {
            pref_cd: f.parse(0)?,
            pref_name: f.text(1),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailwayCompany {
    pub company_cd: u32,
    pub rr_cd: i32,
    pub company_name: String,
    pub company_name_k: String,
    pub company_name_h: String,
    pub company_name_r: String,
    pub company_url: String,
    pub company_type: i32,
    pub e_status: i32,
    pub e_sort: i32,
}

impl Record for RailwayCompany {
    fn schema() -> &'static TableSchema {
        &COMPANY
    }

    fn from_fields(f: &Fields<'_>) -> Result<Self, RowError> {
        Ok(Self {
            company_cd: f.parse(0)?,
            rr_cd: f.parse(1)?,
            company_name: f.text(2),
            company_name_k: f.text(3),
            company_name_h: f.text(4),
            company_name_r: f.text(5),
            company_url: f.text(6),
            company_type: f.parse(7)?,
            e_status: f.parse(8)?,
            e_sort: f.parse(9)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailwayLine {
    pub line_cd: u32,
    pub company_cd: u32,
    pub line_name: String,
    pub line_name_k: String,
    pub line_name_h: String,
    pub line_color_c: String,
    pub line_color_t: String,
    pub line_type: i32,
    pub lon: f64,
    pub lat: f64,
    pub zoom: i32,
    pub e_status: i32,
    pub e_sort: i32,
}

impl RailwayLine {
    pub fn is_active(&self) -> bool {
        self.e_status == ACTIVE
    }
}

impl Record for RailwayLine {
    fn schema() -> &'static TableSchema {
        &LINE
    }

    fn from_fields(f: &Fields<'_>) -> Result<Self, RowError> {
        Ok(Self {
            line_cd: f.parse(0)?,
            company_cd: f.parse(1)?,
            line_name: f.text(2),
            line_name_k: f.text(3),
            line_name_h: f.text(4),
            line_color_c: f.text(5),
            line_color_t: f.text(6),
            line_type: f.parse(7)?,
            lon: f.parse(8)?,
            lat: f.parse(9)?,
            zoom: f.parse(10)?,
            e_status: f.parse(11)?,
            e_sort: f.parse(12)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailwayStation {
    pub station_cd: u32,
    /// Shared by stations at the same physical location
    pub station_g_cd: u32,
    pub station_name: String,
    pub station_name_k: String,
    pub station_name_r: String,
    pub line_cd: u32,
    pub pref_cd: u32,
    pub post: String,
    pub address: String,
    pub lon: f64,
    pub lat: f64,
    pub open_ymd: String,
    pub close_ymd: String,
    pub e_status: i32,
    pub e_sort: i32,
}

impl RailwayStation {
    pub fn is_active(&self) -> bool {
        self.e_status == ACTIVE
    }
}

impl Record for RailwayStation {
    fn schema() -> &'static TableSchema {
        &STATION
    }

    fn from_fields(f: &Fields<'_>) -> Result<Self, RowError> {
        Ok(Self {
            station_cd: f.parse(0)?,
            station_g_cd: f.parse(1)?,
            station_name: f.text(2),
            station_name_k: f.text(3),
            station_name_r: f.text(4),
            line_cd: f.parse(5)?,
            pref_cd: f.parse(6)?,
            post: f.text(7),
            address: f.text(8),
            lon: f.parse(9)?,
            lat: f.parse(10)?,
            open_ymd: f.text(11),
            close_ymd: f.text(12),
            e_status: f.parse(13)?,
            e_sort: f.parse(14)?,
        })
    }
}

/// One adjacency edge between two stations on the same line
#[derive(Debug, Clone, PartialEq)]
pub struct RailwayStationJoin {
    pub line_cd: u32,
    pub station_cd1: u32,
    pub station_cd2: u32,
}

impl Record for RailwayStationJoin {
    fn schema() -> &'static TableSchema {
        &JOIN
    }

    fn from_fields(f: &Fields<'_>) -> Result<Self, RowError> {
        Ok(Self {
            line_cd: f.parse(0)?,
            station_cd1: f.parse(1)?,
            station_cd2: f.parse(2)?,
        })
    }
}
