//! source::ddl
//!
//! Translation from SQL Server catalog types to the Snowflake column DDL
//! fragment embedded in the bootstrap job manifest.

use std::fmt::Write;

use super::ColumnInfo;

/// Snowflake type for one catalog column.
///
/// Unknown types degrade to `VARCHAR` rather than failing: the landing
/// tables only need a lossless textual representation.
pub fn snowflake_type(column: &ColumnInfo) -> String {
    match column.data_type.to_lowercase().as_str() {
        "int" | "bigint" | "smallint" | "tinyint" => "INT".to_string(),
        "decimal" | "numeric" => match (column.numeric_precision, column.numeric_scale) {
            (Some(precision), Some(scale)) => format!("NUMBER({precision},{scale})"),
            _ => "NUMBER".to_string(),
        },
        "float" | "real" => "FLOAT".to_string(),
        "bit" => "BOOLEAN".to_string(),
        "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" | "date" | "time" => {
            "TIMESTAMP_NTZ".to_string()
        }
        "char" | "nchar" | "varchar" | "nvarchar" => match column.char_max_length {
            // -1 is the catalog encoding for (max)
            Some(length) if length > 0 => format!("VARCHAR({length})"),
            _ => "VARCHAR".to_string(),
        },
        _ => "VARCHAR".to_string(),
    }
}

/// Column DDL fragment for the job template: one indented line per
/// column, each terminated by a comma and newline.
///
/// The fragment is spliced into two CREATE TABLE statements whose fixed
/// tail supplies the metadata columns, so the trailing comma on the last
/// business column is required.
pub fn build_column_ddl(columns: &[ColumnInfo]) -> String {
    let mut out = String::new();
    for column in columns {
        let nullability = if column.is_nullable { "NULL" } else { "NOT NULL" };
        let _ = writeln!(
            out,
            "      {} {} {},",
            column.name,
            snowflake_type(column),
            nullability
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_family_maps_to_int() {
        for ty in ["int", "bigint", "smallint", "tinyint", "INT", "BigInt"] {
            assert_eq!(snowflake_type(&ColumnInfo::new("C", ty, false)), "INT");
        }
    }

    #[test]
    fn exact_numerics_keep_precision_and_scale() {
        let col = ColumnInfo::new("PRICE", "decimal", true).with_precision(18, 4);
        assert_eq!(snowflake_type(&col), "NUMBER(18,4)");

        let bare = ColumnInfo::new("PRICE", "numeric", true);
        assert_eq!(snowflake_type(&bare), "NUMBER");
    }

    #[test]
    fn approximate_numerics_and_bit() {
        assert_eq!(snowflake_type(&ColumnInfo::new("F", "float", true)), "FLOAT");
        assert_eq!(snowflake_type(&ColumnInfo::new("R", "real", true)), "FLOAT");
        assert_eq!(snowflake_type(&ColumnInfo::new("B", "bit", true)), "BOOLEAN");
    }

    #[test]
    fn temporal_types_all_land_as_timestamp() {
        for ty in [
            "datetime",
            "datetime2",
            "smalldatetime",
            "datetimeoffset",
            "date",
            "time",
        ] {
            assert_eq!(
                snowflake_type(&ColumnInfo::new("TS", ty, false)),
                "TIMESTAMP_NTZ"
            );
        }
    }

    #[test]
    fn character_types_carry_length_except_max() {
        let sized = ColumnInfo::new("NAME", "nvarchar", true).with_length(120);
        assert_eq!(snowflake_type(&sized), "VARCHAR(120)");

        let max = ColumnInfo::new("BODY", "varchar", true).with_length(-1);
        assert_eq!(snowflake_type(&max), "VARCHAR");

        let unsized_ = ColumnInfo::new("CODE", "char", false);
        assert_eq!(snowflake_type(&unsized_), "VARCHAR");
    }

    #[test]
    fn unknown_types_degrade_to_varchar() {
        for ty in ["uniqueidentifier", "varbinary", "xml", "geography", "money"] {
            assert_eq!(snowflake_type(&ColumnInfo::new("C", ty, true)), "VARCHAR");
        }
    }

    #[test]
    fn ddl_fragment_indents_and_terminates_every_line() {
        let columns = vec![
            ColumnInfo::new("ID", "int", false),
            ColumnInfo::new("NAME", "nvarchar", true).with_length(50),
        ];
        assert_eq!(
            build_column_ddl(&columns),
            "      ID INT NOT NULL,\n      NAME VARCHAR(50) NULL,\n"
        );
    }

    #[test]
    fn ddl_fragment_is_empty_for_no_columns() {
        assert_eq!(build_column_ddl(&[]), "");
    }
}
