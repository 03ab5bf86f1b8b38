use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::info;

use crate::filter::Inclusion;
use crate::parser::{is_header, parse_row, Record};
use crate::schema::{
    Prefecture, RailwayCompany, RailwayLine, RailwayStation, RailwayStationJoin,
};

/// In-memory snapshot of all source tables
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub prefs: Vec<Prefecture>,
    pub companies: Vec<RailwayCompany>,
    pub lines: Vec<RailwayLine>,
    pub stations: Vec<RailwayStation>,
    pub joins: Vec<RailwayStationJoin>,
}

impl Tables {
    /// Load every table from `input_dir`, applying the line/station inclusion filter
    pub fn load(input_dir: &Path, inclusion: Inclusion) -> Result<Self> {
        let prefs = load_table(input_dir, |_: &Prefecture| true)?;
        let companies = load_table(input_dir, |_: &RailwayCompany| true)?;
        let lines = load_table(input_dir, |l: &RailwayLine| inclusion.includes_line(l))?;
        let stations = load_table(input_dir, |s: &RailwayStation| inclusion.includes_station(s))?;
        let joins = load_table(input_dir, |_: &RailwayStationJoin| true)?;

        Ok(Self {
            prefs,
            companies,
            lines,
            stations,
            joins,
        })
    }
}

/// Read `{input_dir}/{source_file}` into typed records, keeping those accepted by `keep`
pub fn load_table<R: Record>(input_dir: &Path, keep: impl Fn(&R) -> bool) -> Result<Vec<R>> {
    let schema = R::schema();
    let file_path = input_dir.join(schema.source_file);

    let file = File::open(&file_path)
        .with_context(|| format!("Failed to open: {:?}", file_path))?;
    let records = read_records(file, keep)
        .with_context(|| format!("Failed to load table {}", schema.name))?;

    info!(table = schema.name, rows = records.len(), "loaded");
    Ok(records)
}

/// Parse CSV rows from any reader, skipping header and blank rows
pub fn read_records<R: Record>(source: impl Read, keep: impl Fn(&R) -> bool) -> Result<Vec<R>> {
    let schema = R::schema();
    let reader = BufReader::new(source);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() || is_header(&line, schema) {
            continue;
        }

        let record: R = parse_row(&line, idx + 1)?;
        if keep(&record) {
            records.push(record);
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const STATIONS: &str = "\
station_cd,station_g_cd,station_name,station_name_k,station_name_r,line_cd,pref_cd,post,address,lon,lat,open_ymd,close_ymd,e_status,e_sort
100201,100201,東京,,,1002,13,,,139.766,35.681,,,0,100201
1130101,1130101,東京,,,11302,13,,,139.766,35.681,,,0,1130101

1130102,1130102,有楽町,,,11302,13,,,139.763,35.675,,,0,1130102
";

    #[test]
    fn test_header_and_blank_rows_are_skipped() {
        let stations: Vec<RailwayStation> =
            read_records(Cursor::new(STATIONS), |_: &RailwayStation| true).unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[2].station_name, "有楽町");
    }

    #[test]
    fn test_filter_is_applied_while_reading() {
        let inclusion = Inclusion::default();
        let stations = read_records(Cursor::new(STATIONS), |s: &RailwayStation| {
            inclusion.includes_station(s)
        })
        .unwrap();
        let codes: Vec<u32> = stations.iter().map(|s| s.station_cd).collect();
        assert_eq!(codes, vec![1130101, 1130102]);
    }

    #[test]
    fn test_malformed_row_fails_the_load() {
        let input = "pref_cd,pref_name\n1,北海道\nx,青森県\n";
        let err = read_records(Cursor::new(input), |_: &Prefecture| true).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(dir.path(), |_: &Prefecture| true).unwrap_err();
        assert!(err.to_string().contains("pref.csv"));
    }
}
