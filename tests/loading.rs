use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use mls_salaries::config::{DashboardConfig, CONFIG_FILE_NAME};
use mls_salaries::data::loader::{load_dashboard, load_table};
use mls_salaries::data::model::{Position, TopN};
use mls_salaries::data::view::{DashboardView, SelectionParams};
use mls_salaries::error::{DataSourceError, LoadError};
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

const SALARIES: &str = "\
Team,Club,Last Name,First Name,Pos,Year,Base Salary,Compensation
LA Galaxy,LA,Beckham,David,M,2011,5500000,6500000
LA Galaxy,LA,Beckham,David,M,2012,5500000,6500000
LA Galaxy,LA,Donovan,Landon,F,2012,2000000,2125000
Toronto FC,TOR,Defoe,Jermain,F,2014,6000000,6180000
Real Salt Lake,RSL,Beckerman,Kyle,D-M,2014,400000,385000
Real Salt Lake,RSL,Rimando,Nick,GK,2012,350000,350000
";

fn write_fixture_dir(dir: &Path) {
    fs::write(dir.join("mls_clean.csv"), SALARIES).unwrap();
    fs::write(
        dir.join("player_ratio_pos_mls.csv"),
        "Pos,Pos ratio MLS\nD,0.33\nM,0.33\nF,0.2\nGK,0.14\n",
    )
    .unwrap();
    for name in [
        "top_ten_paid_obs_exp.csv",
        "top_twenty_five_paid_obs_exp.csv",
        "top_fifty_paid_obs_exp.csv",
    ] {
        fs::write(
            dir.join(name),
            "Pos,Observed_value,Expected_value\nD,1,2.0\nM,2,2.0\nF,3,1.2\nGK,0,0.8\n",
        )
        .unwrap();
    }
}

#[test]
fn dashboard_loads_from_data_dir() {
    let dir = TempDir::new().unwrap();
    write_fixture_dir(dir.path());

    let config = DashboardConfig::resolve(Some(dir.path()), None).unwrap();
    let data = load_dashboard(&config).unwrap();

    assert_eq!(data.salaries.len(), 6);
    assert_eq!(data.league_positions.len(), 4);
    assert_eq!(data.top_positions(TopN::Fifty)[2].position, Position::Forward);
    assert_eq!(data.top_positions(TopN::Ten)[0].expected, Some(2.0));
}

#[test]
fn missing_auxiliary_table_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_fixture_dir(dir.path());
    fs::remove_file(dir.path().join("top_fifty_paid_obs_exp.csv")).unwrap();

    let config = DashboardConfig::resolve(Some(dir.path()), None).unwrap();
    let err = load_dashboard(&config).unwrap_err();
    assert!(matches!(err, LoadError::Source(DataSourceError::Io { .. })));
}

#[test]
fn config_file_renames_tables() {
    let dir = TempDir::new().unwrap();
    write_fixture_dir(dir.path());
    fs::rename(dir.path().join("mls_clean.csv"), dir.path().join("salaries.csv")).unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[files]\nsalaries = \"salaries.csv\"\n",
    )
    .unwrap();

    let config = DashboardConfig::resolve(Some(dir.path()), None).unwrap();
    assert_eq!(load_dashboard(&config).unwrap().salaries.len(), 6);
}

#[test]
fn view_over_loaded_data() {
    let dir = TempDir::new().unwrap();
    write_fixture_dir(dir.path());
    let config = DashboardConfig::resolve(Some(dir.path()), None).unwrap();
    let data = load_dashboard(&config).unwrap();

    let params = SelectionParams {
        surname: "Beckham".into(),
        team_name: "Real Salt Lake".into(),
        team_year: Some(2012),
        ..SelectionParams::default()
    };
    let view = DashboardView::compute(&data, &params);

    // Latest season first: Defoe tops 2014.
    assert_eq!(view.top_ten_year, Some(2014));
    assert_eq!(view.top_ten.rows()[0].last_name, "Defoe");
    assert_eq!(view.player_rows.rows().len(), 2);
    assert_eq!(
        view.teams.unwrap().into_iter().collect::<Vec<_>>(),
        vec!["LA Galaxy".to_string(), "Real Salt Lake".to_string()]
    );
    let team_years: Vec<_> = view.team_rows.rows().iter().map(|r| r.year).collect();
    assert_eq!(team_years, vec![2012, 2014]);
    // Beckham played two seasons, the longest tenure here.
    assert_eq!(view.tenure.years_under_evaluation, 2);
    assert_eq!(view.tenure.players, vec!["Beckham_David"]);
}

fn text(values: &[&str]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

#[test]
fn parquet_with_integer_figures_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mls.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Team", DataType::Utf8, false),
        Field::new("Club", DataType::Utf8, false),
        Field::new("Last Name", DataType::Utf8, false),
        Field::new("First Name", DataType::Utf8, false),
        Field::new("Pos", DataType::Utf8, false),
        Field::new("Year", DataType::Int32, false),
        Field::new("Base Salary", DataType::Float64, false),
        Field::new("Compensation", DataType::Float64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        text(&["LAFC", "LAFC"]),
        text(&["LAFC", "LAFC"]),
        text(&["Vela", "Vela"]),
        text(&["Carlos", "Carlos"]),
        text(&["F", "F"]),
        Arc::new(Int32Array::from(vec![2018, 2019])),
        Arc::new(Float64Array::from(vec![4_500_000.0, 6_300_000.0])),
        Arc::new(Float64Array::from(vec![6_292_500.0, 6_300_000.0])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[1].year, 2019);
    assert_eq!(table.records[0].unique_name, "Vela_Carlos");
    assert!(table.records[1].base_salary == table.records[1].compensation);
}

#[test]
fn parquet_missing_column_is_schema_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.parquet");

    let schema = Arc::new(Schema::new(vec![Field::new("Team", DataType::Utf8, false)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(StringArray::from(vec!["LAFC"])) as ArrayRef],
    )
    .unwrap();
    let file = fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    assert!(load_table(&path).unwrap_err().is_schema_mismatch());
}
