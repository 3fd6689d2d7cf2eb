//! End-to-end run on a synthetic listing export: clean, train, save, reload, predict.
//!
//! cargo run --example train_and_predict

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use homeprice::dataset::RawRecord;
use homeprice::preprocessing::CleaningPipeline;
use homeprice::serving::{ModelArtifacts, PriceQuery};
use homeprice::telemetry::init_tracing;
use homeprice::trainer::Trainer;

const LOCATIONS: [(&str, f64); 4] = [
    ("1st Phase JP Nagar", 7200.0),
    ("Electronic City", 4300.0),
    ("Hebbal", 8100.0),
    ("Whitefield", 5600.0),
];

fn synthetic_listings(n: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let (location, pps) = if i % 40 == 0 {
                ("Some Quiet Lane", 5000.0)
            } else {
                LOCATIONS[i % LOCATIONS.len()]
            };
            let bhk: u32 = rng.gen_range(1..=4);
            let sqft = f64::from(bhk) * rng.gen_range(450.0..700.0);
            let price = pps * sqft / 100_000.0 * rng.gen_range(0.92..1.08);
            let total_sqft = if i % 25 == 0 {
                format!("{:.0} - {:.0}", sqft - 100.0, sqft + 100.0)
            } else {
                format!("{sqft:.0}")
            };
            RawRecord {
                location: Some(location.to_string()),
                size: Some(format!("{bhk} BHK")),
                total_sqft: Some(total_sqft),
                bath: Some(bhk),
                price: Some((price * 100.0).round() / 100.0),
            }
        })
        .collect()
}

fn main() -> Result<()> {
    init_tracing("homeprice=info");

    let raw = synthetic_listings(2_000, 10);
    let cleaned = CleaningPipeline::new().run(&raw)?;
    println!("Cleaning report: {:#?}", cleaned.report);

    let outcome = Trainer::builder().build().fit(&cleaned.matrix)?;
    if let Some(test) = outcome.test {
        println!(
            "Held-out R² = {:.3}, MAE = {:.2} lakh, RMSE = {:.2} lakh",
            test.r_squared, test.mae, test.rmse
        );
    }

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.bin");
    ModelArtifacts::from_outcome(&outcome).save_to_file(&path)?;
    let predictor = ModelArtifacts::load_from_file(&path)?.into_predictor()?;

    println!("Known locations: {:?}", predictor.list_known_locations());
    for location in ["1st Phase JP Nagar", "Whitefield", "Nonexistent Area"] {
        let query = PriceQuery::new(location, 1000.0, 2, 2)?;
        let estimate = predictor.estimate(&query);
        println!("{location:>20}: {:.2} lakh", estimate.estimated_price);
    }
    Ok(())
}
