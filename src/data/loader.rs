use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    year_from_f64, DashboardData, PlayerSalaryRecord, Position, PositionRatioRecord, RatioLayout,
    SalaryTable, TopN, REQUIRED_COLUMNS, UNIQUE_NAME_COLUMN,
};
use crate::config::DashboardConfig;
use crate::error::{DataSourceError, LoadResult, SchemaMismatchError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the salary table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "Team": ..., "Year": 2007, ... }, ...]`
/// * `.parquet` – the same columns, any numeric type for the figures
pub fn load_table(path: &Path) -> LoadResult<SalaryTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(DataSourceError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.to_string(),
            }
            .into())
        }
    };

    let table = SalaryTable::from_records(records);
    report_data_quality(path, &table);
    log::info!(
        "Loaded {} salary rows covering {} seasons and {} teams from {}",
        table.len(),
        table.years.len(),
        table.teams.len(),
        path.display()
    );
    Ok(table)
}

/// Load an auxiliary position table (always CSV).
pub fn load_position_ratios(path: &Path, layout: RatioLayout) -> LoadResult<Vec<PositionRatioRecord>> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let indices = require_columns(path, headers.iter(), layout.columns())?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| csv_error(path, source))?;
        let field = |i: usize| record.get(indices[i]).unwrap_or("");

        let position: Position = field(0).to_string().into();
        let observed = parse_float(path, row_no, layout.columns()[1], field(1))?;
        let expected = match layout {
            RatioLayout::LeagueShare => None,
            RatioLayout::ObservedExpected => {
                Some(parse_float(path, row_no, layout.columns()[2], field(2))?)
            }
        };

        rows.push(PositionRatioRecord {
            position,
            observed,
            expected,
        });
    }

    log::info!("Loaded {} position rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load every table named by the config. Any failure aborts the whole load.
pub fn load_dashboard(config: &DashboardConfig) -> LoadResult<DashboardData> {
    Ok(DashboardData {
        salaries: load_table(&config.salaries_path())?,
        league_positions: load_position_ratios(
            &config.league_positions_path(),
            RatioLayout::LeagueShare,
        )?,
        top_ten_positions: load_position_ratios(
            &config.top_positions_path(TopN::Ten),
            RatioLayout::ObservedExpected,
        )?,
        top_twenty_five_positions: load_position_ratios(
            &config.top_positions_path(TopN::TwentyFive),
            RatioLayout::ObservedExpected,
        )?,
        top_fifty_positions: load_position_ratios(
            &config.top_positions_path(TopN::Fifty),
            RatioLayout::ObservedExpected,
        )?,
    })
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Return the index of each wanted column, or the first one missing.
fn require_columns<'a>(
    path: &Path,
    headers: impl Iterator<Item = &'a str>,
    wanted: &[&str],
) -> Result<Vec<usize>, SchemaMismatchError> {
    let headers: Vec<&str> = headers.map(str::trim).collect();
    wanted
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| SchemaMismatchError {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        })
        .collect()
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, DataSourceError> {
    let file = File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file))
}

fn csv_error(path: &Path, source: csv::Error) -> DataSourceError {
    DataSourceError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, row: usize, message: impl Into<String>) -> DataSourceError {
    DataSourceError::Malformed {
        path: path.to_path_buf(),
        row,
        message: message.into(),
    }
}

fn parse_float(path: &Path, row: usize, column: &str, value: &str) -> Result<f64, DataSourceError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(path, row, format!("{column}: '{value}' is not a number")))
}

/// Log the soft invariants of the salary table. Never fails.
fn report_data_quality(path: &Path, table: &SalaryTable) {
    let underpaid = table.records.iter().filter(|r| r.is_underpaid()).count();
    if underpaid > 0 {
        log::warn!(
            "{}: {underpaid} rows have Compensation below Base Salary",
            path.display()
        );
    }

    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    for record in &table.records {
        if !seen.insert((record.unique_name.as_str(), record.year)) {
            log::debug!("duplicate row for {} in {}", record.unique_name, record.year);
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        log::warn!(
            "{}: {duplicates} rows repeat a player within one season; tenure counts will include them",
            path.display()
        );
    }

    let unknown: HashSet<&str> = table
        .records
        .iter()
        .filter(|r| !r.position.is_known())
        .map(|r| r.position.code())
        .collect();
    if !unknown.is_empty() {
        log::warn!("{}: unrecognised position codes {unknown:?}", path.display());
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> LoadResult<Vec<PlayerSalaryRecord>> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    require_columns(path, headers.iter(), &REQUIRED_COLUMNS)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<PlayerSalaryRecord>().enumerate() {
        let record = result.map_err(|e| malformed(path, row_no, e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Team": "LA Galaxy", "Club": "LA", "Last Name": "Beckham",
///     "First Name": "David", "Pos": "M", "Year": 2008,
///     "Base Salary": 5500000.0, "Compensation": 6500000.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> LoadResult<Vec<PlayerSalaryRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataSourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let JsonValue::Array(rows) = root else {
        return Err(malformed(path, 0, "expected top-level JSON array").into());
    };

    if let Some(JsonValue::Object(first)) = rows.first() {
        require_columns(path, first.keys().map(String::as_str), &REQUIRED_COLUMNS)?;
    }

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.into_iter().enumerate() {
        let record: PlayerSalaryRecord =
            serde_json::from_value(row).map_err(|e| malformed(path, row_no, e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by **Pandas** (`df.to_parquet()`) or
/// **Polars** (`df.write_parquet()`).
///
/// Text columns may be Utf8 or LargeUtf8; `Year`, `Base Salary` and
/// `Compensation` may be any integer or float type.
fn load_parquet(path: &Path) -> LoadResult<Vec<PlayerSalaryRecord>> {
    let file = File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|source| {
        DataSourceError::Parquet {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let schema = builder.schema().clone();
    let names = schema.fields().iter().map(|f| f.name().as_str());
    require_columns(path, names, &REQUIRED_COLUMNS)?;
    let has_unique_name = schema.index_of(UNIQUE_NAME_COLUMN).is_ok();

    let reader = builder.build().map_err(|source| DataSourceError::Parquet {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| DataSourceError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        read_batch(path, &batch, has_unique_name, &mut records)?;
    }
    Ok(records)
}

fn read_batch(
    path: &Path,
    batch: &RecordBatch,
    has_unique_name: bool,
    out: &mut Vec<PlayerSalaryRecord>,
) -> LoadResult<()> {
    let text = |name: &str| column_as(path, batch, name, &DataType::Utf8);
    let number = |name: &str| column_as(path, batch, name, &DataType::Float64);

    let team_col = text("Team")?;
    let club_col = text("Club")?;
    let last_col = text("Last Name")?;
    let first_col = text("First Name")?;
    let pos_col = text("Pos")?;
    let year_col = number("Year")?;
    let base_col = number("Base Salary")?;
    let comp_col = number("Compensation")?;
    let unique_col = if has_unique_name {
        Some(text(UNIQUE_NAME_COLUMN)?)
    } else {
        None
    };

    let team = team_col.as_string::<i32>();
    let club = club_col.as_string::<i32>();
    let last = last_col.as_string::<i32>();
    let first = first_col.as_string::<i32>();
    let pos = pos_col.as_string::<i32>();
    let year = year_col.as_primitive::<Float64Type>();
    let base = base_col.as_primitive::<Float64Type>();
    let comp = comp_col.as_primitive::<Float64Type>();
    let unique = unique_col.as_ref().map(|c| c.as_string::<i32>());

    let offset = out.len();
    for row in 0..batch.num_rows() {
        let row_no = offset + row;
        let required: [(&str, &dyn Array); 8] = [
            ("Team", team),
            ("Club", club),
            ("Last Name", last),
            ("First Name", first),
            ("Pos", pos),
            ("Year", year),
            ("Base Salary", base),
            ("Compensation", comp),
        ];
        if let Some((name, _)) = required.iter().find(|(_, col)| col.is_null(row)) {
            return Err(malformed(path, row_no, format!("null value in '{name}'")).into());
        }

        let year_value = year.value(row);
        let year_value = year_from_f64(year_value)
            .ok_or_else(|| malformed(path, row_no, format!("'{year_value}' is not a valid year")))?;

        out.push(PlayerSalaryRecord {
            team: team.value(row).to_string(),
            club: club.value(row).to_string(),
            last_name: last.value(row).to_string(),
            first_name: first.value(row).to_string(),
            position: pos.value(row).to_string().into(),
            year: year_value,
            base_salary: base.value(row),
            compensation: comp.value(row),
            unique_name: unique
                .filter(|u| !u.is_null(row))
                .map(|u| u.value(row).to_string())
                .unwrap_or_default(),
        });
    }
    Ok(())
}

/// Fetch a column by name and cast it to the given type.
fn column_as(path: &Path, batch: &RecordBatch, name: &str, to: &DataType) -> LoadResult<ArrayRef> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| SchemaMismatchError {
            path: path.to_path_buf(),
            column: name.to_string(),
        })?;
    let casted = cast(column, to).map_err(|source| DataSourceError::Arrow {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(casted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "Team,Club,Last Name,First Name,Pos,Year,Base Salary,Compensation";

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_rows_become_typed_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.csv",
            &format!(
                "{HEADER}\n\
                 LA Galaxy,LA,Beckham,David,M,2008.0,5500000,6500000\n\
                 Toronto FC,TOR,Giovinco,Sebastian,F,2016,5600000,7115555.67\n"
            ),
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].year, 2008);
        assert_eq!(table.records[0].position, Position::Midfielder);
        assert_eq!(table.records[1].unique_name, "Giovinco_Sebastian");
        assert_eq!(table.years.iter().copied().collect::<Vec<_>>(), vec![2008, 2016]);
    }

    #[test]
    fn supplied_unique_name_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.csv",
            &format!("{HEADER},uniquename\nLA Galaxy,LA,Donovan,Landon,F,2010,2000000,2100000,Donovan_L\n"),
        );
        let table = load_table(&path).unwrap();
        assert_eq!(table.records[0].unique_name, "Donovan_L");
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.csv",
            "Team,Club,Last Name,First Name,Pos,Year,Base Salary\nA,B,C,D,M,2010,1\n",
        );
        let err = load_table(&path).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("Compensation"));
    }

    #[test]
    fn padded_header_names_still_match() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.csv",
            "Team, Club,Last Name,First Name,Pos,Year,Base Salary, Compensation \n\
             LA Galaxy,LA,Beckham,David,M,2010,1,2\n",
        );
        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].club, "LA");
        assert_eq!(table.records[0].compensation, 2.0);
    }

    #[test]
    fn missing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let err = load_table(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Source(DataSourceError::Io { .. })));
    }

    #[test]
    fn non_numeric_compensation_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.csv",
            &format!("{HEADER}\nA,B,C,D,M,2010,100,lots\n"),
        );
        let err = load_table(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Source(DataSourceError::Malformed { row: 0, .. })
        ));
    }

    #[test]
    fn unknown_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "mls.xlsx", "");
        let err = load_table(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Source(DataSourceError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn json_records_load() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.json",
            r#"[{"Team":"LA Galaxy","Club":"LA","Last Name":"Keane","First Name":"Robbie",
                 "Pos":"F","Year":2012,"Base Salary":3350000.0,"Compensation":4000000.0}]"#,
        );
        let table = load_table(&path).unwrap();
        assert_eq!(table.records[0].unique_name, "Keane_Robbie");
        assert_eq!(table.records[0].compensation, 4_000_000.0);
    }

    #[test]
    fn json_missing_column_is_schema_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "mls.json", r#"[{"Team":"LA Galaxy"}]"#);
        assert!(load_table(&path).unwrap_err().is_schema_mismatch());
    }

    #[test]
    fn reloading_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mls.csv",
            &format!("{HEADER}\nA,B,C,D,GK,2010,100,120\nE,F,G,H,D,2011,90,80\n"),
        );
        assert_eq!(load_table(&path).unwrap(), load_table(&path).unwrap());
    }

    #[test]
    fn observed_expected_table_loads() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "top.csv",
            "Pos,Observed_value,Expected_value\nF,60,40.5\nGK,5,14\n",
        );
        let rows = load_position_ratios(&path, RatioLayout::ObservedExpected).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, Position::Forward);
        assert_eq!(rows[0].expected, Some(40.5));
    }

    #[test]
    fn league_share_rejects_wrong_layout() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ratio.csv", "Pos,Observed_value\nF,60\n");
        let err = load_position_ratios(&path, RatioLayout::LeagueShare).unwrap_err();
        assert!(err.is_schema_mismatch());
    }
}
