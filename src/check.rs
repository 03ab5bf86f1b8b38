use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use crate::reader::Tables;
use crate::schema::{ForeignKey, ALL_TABLES};

/// Count of rows whose foreign key has no matching row
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingReference {
    pub table: &'static str,
    pub foreign_key: &'static ForeignKey,
    pub rows: usize,
}

/// Dangling foreign keys across the loaded tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceReport {
    pub dangling: Vec<DanglingReference>,
}

impl ReferenceReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.iter().all(|d| d.rows == 0)
    }

    pub fn rows(&self, table: &str, column: &str) -> usize {
        self.dangling
            .iter()
            .find(|d| d.table == table && d.foreign_key.column == column)
            .map(|d| d.rows)
            .unwrap_or(0)
    }
}

impl fmt::Display for ReferenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.dangling {
            writeln!(
                f,
                "  {}.{} -> {}.{}: {} dangling",
                d.table,
                d.foreign_key.column,
                d.foreign_key.references_table,
                d.foreign_key.references_column,
                d.rows
            )?;
        }
        Ok(())
    }
}

/// Values of an integer key column, or `None` for columns that are not keys
fn key_column(tables: &Tables, table: &str, column: &str) -> Option<Vec<u32>> {
    let values = match (table, column) {
        ("pref", "pref_cd") => tables.prefs.iter().map(|p| p.pref_cd).collect(),
        ("company", "company_cd") => tables.companies.iter().map(|c| c.company_cd).collect(),
        ("line", "line_cd") => tables.lines.iter().map(|l| l.line_cd).collect(),
        ("line", "company_cd") => tables.lines.iter().map(|l| l.company_cd).collect(),
        ("station", "station_cd") => tables.stations.iter().map(|s| s.station_cd).collect(),
        ("station", "line_cd") => tables.stations.iter().map(|s| s.line_cd).collect(),
        ("station", "pref_cd") => tables.stations.iter().map(|s| s.pref_cd).collect(),
        ("join", "line_cd") => tables.joins.iter().map(|j| j.line_cd).collect(),
        ("join", "station_cd1") => tables.joins.iter().map(|j| j.station_cd1).collect(),
        ("join", "station_cd2") => tables.joins.iter().map(|j| j.station_cd2).collect(),
        _ => return None,
    };
    Some(values)
}

/// Check every foreign key declared by the table schemas against the loaded rows
pub fn check_references(tables: &Tables) -> ReferenceReport {
    let mut report = ReferenceReport::default();

    for table in ALL_TABLES {
        for fk in table.foreign_keys {
            let (Some(values), Some(targets)) = (
                key_column(tables, table.name, fk.column),
                key_column(tables, fk.references_table, fk.references_column),
            ) else {
                continue;
            };

            let known: HashSet<u32> = targets.into_iter().collect();
            let rows = values.iter().filter(|v| !known.contains(*v)).count();
            if rows > 0 {
                warn!(
                    table = table.name,
                    column = fk.column,
                    references = fk.references_table,
                    rows,
                    "dangling references"
                );
            }

            report.dangling.push(DanglingReference {
                table: table.name,
                foreign_key: fk,
                rows,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fixtures;
    use crate::schema::RailwayCompany;

    fn company(company_cd: u32) -> RailwayCompany {
        RailwayCompany {
            company_cd,
            rr_cd: 11,
            company_name: "JR東日本".to_string(),
            company_name_k: String::new(),
            company_name_h: String::new(),
            company_name_r: String::new(),
            company_url: String::new(),
            company_type: 1,
            e_status: 0,
            e_sort: company_cd as i32,
        }
    }

    #[test]
    fn test_report_counts_missing_rows() {
        let mut tables = fixtures::tables();
        tables.companies = vec![company(1)];

        let report = check_references(&tables);
        assert_eq!(report.dangling.len(), 6);
        assert_eq!(report.rows("line", "company_cd"), 0);
        assert_eq!(report.rows("station", "line_cd"), 0);
        assert_eq!(report.rows("join", "station_cd2"), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_missing_companies_are_reported() {
        let report = check_references(&fixtures::tables());
        assert_eq!(report.rows("line", "company_cd"), 4);
    }

    #[test]
    fn test_display_names_both_sides() {
        let report = check_references(&fixtures::tables());
        let text = report.to_string();
        assert!(text.contains("join.station_cd2 -> station.station_cd: 1 dangling"));
    }
}
