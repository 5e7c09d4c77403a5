//! Writes a synthetic `personality_dataset.csv` (and `.parquet`) to the
//! working directory. Classes are 0/1 codes unless `--labeled` is passed, in
//! which case they are written as `Extrovert` / `Introvert`.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 400;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Gaussian draw rounded and clamped to an integer scale `0..=max`.
    fn score(&mut self, mean: f64, std_dev: f64, max: f64) -> f64 {
        self.gauss(mean, std_dev).round().clamp(0.0, max)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Time_spent_Alone")]
    time_spent_alone: f64,
    #[serde(rename = "Stage_fear")]
    stage_fear: bool,
    #[serde(rename = "Social_event_attendance")]
    social_event_attendance: f64,
    #[serde(rename = "Going_outside")]
    going_outside: f64,
    #[serde(rename = "Drained_after_socializing")]
    drained_after_socializing: bool,
    #[serde(rename = "Friends_circle_size")]
    friends_circle_size: f64,
    #[serde(rename = "Post_frequency")]
    post_frequency: f64,
    #[serde(rename = "Personality")]
    personality: String,
}

fn generate_row(rng: &mut SimpleRng, introvert: bool, labeled: bool) -> Row {
    // (extrovert mean, introvert mean) per trait.
    let pick = |e: f64, i: f64| if introvert { i } else { e };

    let personality = match (labeled, introvert) {
        (true, false) => "Extrovert".to_string(),
        (true, true) => "Introvert".to_string(),
        (false, false) => "0".to_string(),
        (false, true) => "1".to_string(),
    };

    Row {
        time_spent_alone: rng.score(pick(2.5, 7.0), 2.0, 11.0),
        stage_fear: rng.chance(pick(0.15, 0.85)),
        social_event_attendance: rng.score(pick(6.5, 2.0), 2.0, 10.0),
        going_outside: rng.score(pick(5.0, 1.5), 1.5, 7.0),
        drained_after_socializing: rng.chance(pick(0.1, 0.9)),
        friends_circle_size: rng.score(pick(9.0, 3.5), 3.0, 15.0),
        post_frequency: rng.score(pick(6.0, 2.0), 2.0, 10.0),
        personality,
    }
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str, labeled: bool) -> Result<()> {
    let float_col = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let bool_col = |f: fn(&Row) -> bool| -> ArrayRef {
        Arc::new(BooleanArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let (personality_type, personality): (DataType, ArrayRef) = if labeled {
        let labels: Vec<&str> = rows.iter().map(|r| r.personality.as_str()).collect();
        (DataType::Utf8, Arc::new(StringArray::from(labels)))
    } else {
        let codes = rows
            .iter()
            .map(|r| r.personality.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .context("encoding class codes")?;
        (DataType::Int64, Arc::new(Int64Array::from(codes)))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Time_spent_Alone", DataType::Float64, false),
        Field::new("Stage_fear", DataType::Boolean, false),
        Field::new("Social_event_attendance", DataType::Float64, false),
        Field::new("Going_outside", DataType::Float64, false),
        Field::new("Drained_after_socializing", DataType::Boolean, false),
        Field::new("Friends_circle_size", DataType::Float64, false),
        Field::new("Post_frequency", DataType::Float64, false),
        Field::new("Personality", personality_type, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            float_col(|r| r.time_spent_alone),
            bool_col(|r| r.stage_fear),
            float_col(|r| r.social_event_attendance),
            float_col(|r| r.going_outside),
            bool_col(|r| r.drained_after_socializing),
            float_col(|r| r.friends_circle_size),
            float_col(|r| r.post_frequency),
            personality,
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let labeled = std::env::args().any(|a| a == "--labeled");
    let mut rng = SimpleRng::new(42);

    let rows: Vec<Row> = (0..ROWS)
        .map(|_| {
            let introvert = rng.chance(0.48);
            generate_row(&mut rng, introvert, labeled)
        })
        .collect();

    write_csv(&rows, "personality_dataset.csv")?;
    write_parquet(&rows, "personality_dataset.parquet", labeled)?;

    println!(
        "Wrote {} rows to personality_dataset.csv and personality_dataset.parquet ({} classes)",
        rows.len(),
        if labeled { "labeled" } else { "0/1-coded" }
    );
    Ok(())
}
