/// Declared schema descriptors for delimited sources.
///
/// A `Schema` is an ordered list of logical fields, each with the source
/// header aliases it accepts. Resolving a schema against a header row happens
/// once per load and either yields a `ColumnMap` or a `SchemaViolation`
/// naming every required field that could not be found.
///
/// Header matching trims whitespace (and a leading UTF-8 BOM) and ignores
/// ASCII case. Aliases are tried in declaration order; the first one present
/// in the header wins.

use std::collections::HashMap;

use csv::StringRecord;
use log::warn;

use crate::model::{LoadError, RowRejected};

// ---------------------------------------------------------------------------
// Schema descriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: Vec<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub dataset: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(dataset: &'static str) -> Self {
        Self {
            dataset,
            fields: Vec::new(),
        }
    }

    pub fn required(self, name: &'static str, aliases: &[&str]) -> Self {
        self.field(name, aliases, true)
    }

    pub fn optional(self, name: &'static str, aliases: &[&str]) -> Self {
        self.field(name, aliases, false)
    }

    fn field(mut self, name: &'static str, aliases: &[&str], required: bool) -> Self {
        self.fields.push(FieldSpec {
            name,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            required,
        });
        self
    }

    /// Appends configured aliases (keyed by logical field name) after the
    /// declared ones. Keys that name no field are logged and ignored.
    pub fn with_extra_aliases(mut self, extra: &HashMap<String, Vec<String>>) -> Self {
        for (field_name, aliases) in extra {
            match self.fields.iter_mut().find(|f| f.name == field_name.as_str()) {
                Some(field) => field.aliases.extend(aliases.iter().cloned()),
                None => warn!(
                    "{}: ignoring aliases for unknown field '{}'",
                    self.dataset, field_name
                ),
            }
        }
        self
    }

    /// Maps every field onto a header position.
    ///
    /// # Errors
    /// `LoadError::SchemaViolation` listing all required fields with no
    /// matching header. Optional fields are simply left unmapped.
    pub fn resolve(&self, headers: &StringRecord) -> Result<ColumnMap, LoadError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();

        let mut columns = HashMap::new();
        let mut missing = Vec::new();

        for field in &self.fields {
            let position = field.aliases.iter().find_map(|alias| {
                let alias = alias.trim().to_ascii_lowercase();
                normalized.iter().position(|h| *h == alias)
            });

            match position {
                Some(idx) => {
                    columns.insert(field.name, idx);
                }
                None if field.required => missing.push(field.name),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(LoadError::SchemaViolation {
                dataset: self.dataset,
                missing,
            });
        }

        Ok(ColumnMap { columns })
    }
}

/// Logical field name -> column index, valid for one source.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: HashMap<&'static str, usize>,
}

impl ColumnMap {
    pub fn index(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }
}

// ---------------------------------------------------------------------------
// Row accessor
// ---------------------------------------------------------------------------

/// Typed, trimmed access to one data row through a resolved `ColumnMap`.
pub struct Row<'a> {
    record: &'a StringRecord,
    columns: &'a ColumnMap,
}

impl<'a> Row<'a> {
    pub fn new(record: &'a StringRecord, columns: &'a ColumnMap) -> Self {
        Self { record, columns }
    }

    fn raw(&self, field: &str) -> Option<&'a str> {
        self.columns
            .index(field)
            .and_then(|idx| self.record.get(idx))
            .map(str::trim)
    }

    /// Text value of a mapped column. Empty strings are allowed; a row too
    /// short to contain the column is rejected.
    pub fn text(&self, field: &'static str) -> Result<&'a str, RowRejected> {
        self.raw(field).ok_or(RowRejected::MissingField(field))
    }

    /// Text value of an optional column; unmapped or empty yields `None`.
    pub fn optional_text(&self, field: &str) -> Option<&'a str> {
        self.raw(field).filter(|s| !s.is_empty())
    }

    /// Finite numeric value of a mapped column.
    pub fn number(&self, field: &'static str) -> Result<f64, RowRejected> {
        let raw = self.text(field)?;
        if raw.is_empty() {
            return Err(RowRejected::MissingField(field));
        }

        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(RowRejected::NotNumeric {
                field,
                value: raw.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new("sample")
            .required("latitude", &["Latitude", "lat"])
            .required("name", &["Name"])
            .optional("rank", &["SizeRank"])
    }

    #[test]
    fn test_resolve_matches_aliases_case_insensitively() {
        let headers = StringRecord::from(vec!["NAME", " lat "]);
        let map = sample_schema().resolve(&headers).expect("schema should resolve");
        assert_eq!(map.index("latitude"), Some(1));
        assert_eq!(map.index("name"), Some(0));
        assert_eq!(map.index("rank"), None);
    }

    #[test]
    fn test_resolve_strips_byte_order_mark() {
        let headers = StringRecord::from(vec!["\u{feff}Latitude", "Name"]);
        let map = sample_schema().resolve(&headers).expect("schema should resolve");
        assert_eq!(map.index("latitude"), Some(0));
    }

    #[test]
    fn test_resolve_reports_every_missing_required_field() {
        let headers = StringRecord::from(vec!["SizeRank"]);
        match sample_schema().resolve(&headers) {
            Err(LoadError::SchemaViolation { dataset, missing }) => {
                assert_eq!(dataset, "sample");
                assert_eq!(missing, vec!["latitude", "name"]);
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_first_declared_alias_wins() {
        let headers = StringRecord::from(vec!["lat", "Latitude", "Name"]);
        let map = sample_schema().resolve(&headers).expect("schema should resolve");
        assert_eq!(map.index("latitude"), Some(1));
    }

    #[test]
    fn test_extra_aliases_extend_declared_fields() {
        let mut extra = HashMap::new();
        extra.insert("latitude".to_string(), vec!["LAT_DD".to_string()]);
        extra.insert("bogus".to_string(), vec!["whatever".to_string()]);

        let schema = sample_schema().with_extra_aliases(&extra);
        let headers = StringRecord::from(vec!["LAT_DD", "Name"]);
        let map = schema.resolve(&headers).expect("extra alias should resolve");
        assert_eq!(map.index("latitude"), Some(0));
    }

    #[test]
    fn test_row_number_coercion() {
        let headers = StringRecord::from(vec!["Latitude", "Name", "SizeRank"]);
        let map = sample_schema().resolve(&headers).expect("schema should resolve");

        let good = StringRecord::from(vec![" 40.5 ", "Peoria", ""]);
        let row = Row::new(&good, &map);
        assert_eq!(row.number("latitude"), Ok(40.5));
        assert_eq!(row.text("name"), Ok("Peoria"));
        assert_eq!(row.optional_text("rank"), None);

        let bad = StringRecord::from(vec!["north", "Peoria", "1"]);
        let row = Row::new(&bad, &map);
        assert_eq!(
            row.number("latitude"),
            Err(RowRejected::NotNumeric { field: "latitude", value: "north".to_string() })
        );
        assert_eq!(row.optional_text("rank"), Some("1"));

        let blank = StringRecord::from(vec!["", "Peoria"]);
        assert_eq!(
            Row::new(&blank, &map).number("latitude"),
            Err(RowRejected::MissingField("latitude"))
        );
    }

    #[test]
    fn test_row_rejects_non_finite_and_short_rows() {
        let headers = StringRecord::from(vec!["Latitude", "Name"]);
        let map = sample_schema().resolve(&headers).expect("schema should resolve");

        let nan = StringRecord::from(vec!["NaN", "x"]);
        assert!(matches!(
            Row::new(&nan, &map).number("latitude"),
            Err(RowRejected::NotNumeric { .. })
        ));

        let short = StringRecord::from(vec!["40.1"]);
        assert_eq!(
            Row::new(&short, &map).text("name"),
            Err(RowRejected::MissingField("name"))
        );
    }
}
