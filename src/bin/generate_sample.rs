use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use mls_salaries::data::aggregate::top_n_per_year;
use mls_salaries::data::model::{PlayerSalaryRecord, Position, SalaryTable, TopN};
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: u16 = 2007;
const LAST_YEAR: u16 = 2022;
const PLAYERS: usize = 900;

const TEAMS: [(&str, &str); 12] = [
    ("LA Galaxy", "LA"),
    ("Real Salt Lake", "RSL"),
    ("Seattle Sounders FC", "SEA"),
    ("Toronto FC", "TOR"),
    ("New York Red Bulls", "NY"),
    ("Columbus Crew", "CLB"),
    ("Sporting Kansas City", "KC"),
    ("Chicago Fire", "CHI"),
    ("FC Dallas", "DAL"),
    ("Portland Timbers", "POR"),
    ("Colorado Rapids", "COL"),
    ("New England Revolution", "NE"),
];

const FIRST_NAMES: [&str; 16] = [
    "Kyle", "Nick", "Carlos", "Landon", "Chris", "Brad", "Michael", "Diego",
    "Sebastian", "Alejandro", "Jozy", "Darlington", "Graham", "Sean", "Tim", "Jordan",
];

const LAST_NAMES: [&str; 24] = [
    "Beckerman", "Rimando", "Vela", "Donovan", "Wondolowski", "Davis", "Bradley", "Valeri",
    "Giovinco", "Morales", "Altidore", "Nagbe", "Zusi", "Johnson", "Howard", "Morris",
    "Kljestan", "Besler", "Dempsey", "Feilhaber", "Gonzalez", "Wingert", "Olsen", "Cooper",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_records(rng: &mut SimpleRng) -> Vec<PlayerSalaryRecord> {
    let seasons = usize::from(LAST_YEAR - FIRST_YEAR) + 1;
    let mut records = Vec::new();

    for player in 0..PLAYERS {
        let first_name = FIRST_NAMES[rng.below(FIRST_NAMES.len())];
        // Suffix keeps surnames distinct enough for the long-tenure chart.
        let last_name = format!("{}{}", LAST_NAMES[player % LAST_NAMES.len()], player / LAST_NAMES.len());
        let position = Position::KNOWN[rng.below(Position::KNOWN.len())].clone();

        // A handful of players stay for every season.
        let career = if player % 97 == 0 { seasons } else { 1 + rng.below(seasons) };
        let start = FIRST_YEAR + rng.below(seasons - career + 1) as u16;
        let mut team = rng.below(TEAMS.len());
        // Log-normal pay centred near 150k, with a long tail of stars.
        let level = rng.gauss(11.9, 0.9);

        for offset in 0..career as u16 {
            if rng.next_f64() < 0.1 {
                team = rng.below(TEAMS.len());
            }
            let growth = 1.0 + 0.04 * f64::from(offset);
            let base_salary = (level.exp() * growth / 100.0).round() * 100.0;
            let bonus = if rng.next_f64() < 0.05 {
                // Occasional data-quality violation: compensation below base.
                -0.1
            } else {
                rng.next_f64() * 0.25
            };
            let compensation = ((base_salary * (1.0 + bonus)) * 100.0).round() / 100.0;

            records.push(PlayerSalaryRecord {
                team: TEAMS[team].0.to_string(),
                club: TEAMS[team].1.to_string(),
                last_name: last_name.clone(),
                first_name: first_name.to_string(),
                position: position.clone(),
                year: start + offset,
                base_salary,
                compensation,
                unique_name: PlayerSalaryRecord::derive_unique_name(&last_name, first_name),
            });
        }
    }
    records
}

fn write_csv(path: &Path, records: &[PlayerSalaryRecord]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    for record in records {
        writer.serialize(record).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(path: &Path, records: &[PlayerSalaryRecord]) {
    let text = |f: fn(&PlayerSalaryRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Team", DataType::Utf8, false),
        Field::new("Club", DataType::Utf8, false),
        Field::new("Last Name", DataType::Utf8, false),
        Field::new("First Name", DataType::Utf8, false),
        Field::new("Pos", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Base Salary", DataType::Float64, false),
        Field::new("Compensation", DataType::Float64, false),
        Field::new("uniquename", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.team.as_str()),
            text(|r| r.club.as_str()),
            text(|r| r.last_name.as_str()),
            text(|r| r.first_name.as_str()),
            text(|r| r.position.code()),
            Arc::new(Int64Array::from(
                records.iter().map(|r| i64::from(r.year)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.base_salary).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.compensation).collect::<Vec<_>>(),
            )),
            text(|r| r.unique_name.as_str()),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn position_counts<'a>(records: impl Iterator<Item = &'a PlayerSalaryRecord>) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.position.code().to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

/// League share per position, then observed vs expected for each top-N.
fn write_position_tables(dir: &Path, table: &SalaryTable) {
    let league = position_counts(table.records.iter());
    let total: f64 = league.values().sum();

    let mut writer = csv::Writer::from_path(dir.join("player_ratio_pos_mls.csv"))
        .expect("Failed to create ratio file");
    writer.write_record(["Pos", "Pos ratio MLS"]).expect("Failed to write header");
    for (pos, count) in &league {
        writer
            .write_record([pos.clone(), format!("{:.4}", count / total)])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush ratio file");

    for (top_n, name) in [
        (TopN::Ten, "top_ten_paid_obs_exp.csv"),
        (TopN::TwentyFive, "top_twenty_five_paid_obs_exp.csv"),
        (TopN::Fifty, "top_fifty_paid_obs_exp.csv"),
    ] {
        let top = top_n_per_year(table, top_n.size());
        let observed = position_counts(top.iter().copied());
        let picked = top.len() as f64;

        let mut writer = csv::Writer::from_path(dir.join(name)).expect("Failed to create top-N file");
        writer
            .write_record(["Pos", "Observed_value", "Expected_value"])
            .expect("Failed to write header");
        for (pos, count) in &league {
            let obs = observed.get(pos).copied().unwrap_or(0.0);
            writer
                .write_record([
                    pos.clone(),
                    format!("{obs}"),
                    format!("{:.2}", count / total * picked),
                ])
                .expect("Failed to write row");
        }
        writer.flush().expect("Failed to flush top-N file");
    }
}

fn main() {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let dir = Path::new(&dir);
    std::fs::create_dir_all(dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);
    let records = generate_records(&mut rng);
    let table = SalaryTable::from_records(records);

    write_csv(&dir.join("mls_clean.csv"), &table.records);
    write_parquet(&dir.join("mls_clean.parquet"), &table.records);
    write_position_tables(dir, &table);

    println!(
        "Wrote {} salary rows ({} seasons, {} teams) to {}",
        table.len(),
        table.years.len(),
        table.teams.len(),
        dir.display()
    );
}
