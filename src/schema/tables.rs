//! Table schema definitions for the ekidata CSV sources

use super::types::*;

pub static PREF: TableSchema = TableSchema {
    name: "pref",
    source_file: "pref.csv",
    columns: &[Column::integer("pref_cd"), Column::text("pref_name")],
    foreign_keys: &[],
};

pub static COMPANY: TableSchema = TableSchema {
    name: "company",
    source_file: "company.csv",
    columns: &[
        Column::integer("company_cd"),
        Column::integer("rr_cd"),
        Column::text("company_name"),
        Column::text("company_name_k"),
        Column::text("company_name_h"),
        Column::text("company_name_r"),
        Column::text("company_url"),
        Column::integer("company_type"),
        Column::integer("e_status"),
        Column::integer("e_sort"),
    ],
    foreign_keys: &[],
};

pub static LINE: TableSchema = TableSchema {
    name: "line",
    source_file: "line.csv",
    columns: &[
        Column::integer("line_cd"),
        Column::integer("company_cd"),
        Column::text("line_name"),
        Column::text("line_name_k"),
        Column::text("line_name_h"),
        Column::text("line_color_c"),
        Column::text("line_color_t"),
        Column::integer("line_type"),
        Column::real("lon"),
        Column::real("lat"),
        Column::integer("zoom"),
        Column::integer("e_status"),
        Column::integer("e_sort"),
    ],
    foreign_keys: &[ForeignKey::new("company_cd", "company", "company_cd")],
};

pub static STATION: TableSchema = TableSchema {
    name: "station",
    source_file: "station.csv",
    columns: &[
        Column::integer("station_cd"),
        Column::integer("station_g_cd"),
        Column::text("station_name"),
        Column::text("station_name_k"),
        Column::text("station_name_r"),
        Column::integer("line_cd"),
        Column::integer("pref_cd"),
        Column::text("post"),
        Column::text("address"),
        Column::real("lon"),
        Column::real("lat"),
        Column::text("open_ymd"),
        Column::text("close_ymd"),
        Column::integer("e_status"),
        Column::integer("e_sort"),
    ],
    foreign_keys: &[
        ForeignKey::new("line_cd", "line", "line_cd"),
        ForeignKey::new("pref_cd", "pref", "pref_cd"),
    ],
};

pub static JOIN: TableSchema = TableSchema {
    name: "join",
    source_file: "join.csv",
    columns: &[
        Column::integer("line_cd"),
        Column::integer("station_cd1"),
        Column::integer("station_cd2"),
    ],
    foreign_keys: &[
        ForeignKey::new("line_cd", "line", "line_cd"),
        ForeignKey::new("station_cd1", "station", "station_cd"),
        ForeignKey::new("station_cd2", "station", "station_cd"),
    ],
};

/// All table schemas in load order
pub static ALL_TABLES: &[&TableSchema] = &[&PREF, &COMPANY, &LINE, &STATION, &JOIN];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sentinels() {
        assert_eq!(PREF.header_sentinel(), "pref_cd");
        assert_eq!(COMPANY.header_sentinel(), "company_cd");
        assert_eq!(LINE.header_sentinel(), "line_cd");
        assert_eq!(STATION.header_sentinel(), "station_cd");
        assert_eq!(JOIN.header_sentinel(), "line_cd");
    }

    #[test]
    fn test_foreign_keys_point_at_known_columns() {
        for table in ALL_TABLES {
            for fk in table.foreign_keys {
                assert!(table.column_index(fk.column).is_some(), "{}.{}", table.name, fk.column);
                let target = get_table(fk.references_table).expect("unknown referenced table");
                assert!(target.column_index(fk.references_column).is_some());
            }
        }
    }

    #[test]
    fn test_get_table() {
        assert_eq!(get_table("station").map(|t| t.columns.len()), Some(15));
        assert!(get_table("types").is_none());
        assert_eq!(table_names(), vec!["pref", "company", "line", "station", "join"]);
    }

    #[test]
    fn test_column_types() {
        let types: Vec<String> = LINE.columns[7..10].iter().map(|c| c.col_type.to_string()).collect();
        assert_eq!(types, vec!["integer", "real", "real"]);
        assert_eq!(STATION.columns[11].col_type, ColumnType::Text);
    }
}
