//! SQLite conversions for domain types
//!
//! Identifier newtypes and units are stored as plain integers and strings;
//! list-valued columns (tags, steps) are JSON arrays in a TEXT column.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::Row;

use super::{MaterialId, Nutrient, Nutrition, RecipeId};
use crate::nutrition::MeasureUnit;

impl ToSql for MaterialId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for MaterialId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(MaterialId)
    }
}

impl ToSql for RecipeId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for RecipeId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(RecipeId)
    }
}

impl ToSql for MeasureUnit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.canonical_unit()))
    }
}

impl FromSql for MeasureUnit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        MeasureUnit::from_str(raw)
            .ok_or_else(|| FromSqlError::Other(format!("unknown unit '{}'", raw).into()))
    }
}

/// Read a JSON array of strings stored in a TEXT column
pub(crate) fn string_list(row: &Row, column: &str) -> rusqlite::Result<Vec<String>> {
    let idx = row.as_ref().column_index(column)?;
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read the ten nutrient columns of a row
pub(crate) fn nutrition_columns(row: &Row) -> rusqlite::Result<Nutrition> {
    let mut values = [0.0; 10];
    for nutrient in Nutrient::ALL {
        values[nutrient.index()] = row.get(nutrient.key())?;
    }
    Ok(Nutrition::from_fn(|n| values[n.index()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unit_round_trips_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        let unit: MeasureUnit = conn
            .query_row("SELECT ?1", [MeasureUnit::Milliliters], |row| row.get(0))
            .unwrap();
        assert_eq!(unit, MeasureUnit::Milliliters);
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<MeasureUnit> =
            conn.query_row("SELECT 'cup'", [], |row| row.get(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_string_list_column() {
        let conn = Connection::open_in_memory().unwrap();
        let tags = conn
            .query_row(r#"SELECT '["doce","bolo"]' AS tags"#, [], |row| string_list(row, "tags"))
            .unwrap();
        assert_eq!(tags, vec!["doce".to_string(), "bolo".to_string()]);
    }
}
