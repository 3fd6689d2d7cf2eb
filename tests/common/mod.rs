#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "area_type,availability,location,size,society,total_sqft,bath,balcony,price";

pub const LOCATIONS: [(&str, f64); 5] = [
    ("1st Phase JP Nagar", 7000.0),
    ("Electronic City Phase II", 4000.0),
    ("Hebbal", 8000.0),
    ("Uttarahalli", 4600.0),
    ("Whitefield", 5500.0),
];

/// A deterministic export in the shape of the Bengaluru dataset, including the
/// kinds of malformed rows the real file contains.
pub fn listings_csv() -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for (loc_idx, (location, pps)) in LOCATIONS.iter().enumerate() {
        for i in 0..40usize {
            let bhk = 1 + i % 3;
            let sqft = (bhk * 600 + (i % 5) * 25 + loc_idx * 10) as f64;
            let jitter = 1.0 + 0.02 * ((i % 7) as f64 - 3.0);
            let price = pps * jitter * sqft / 100_000.0;
            let size = if i % 4 == 0 {
                format!("{bhk} Bedroom")
            } else {
                format!("{bhk} BHK")
            };
            let _ = writeln!(
                csv,
                "Super built-up  Area,Ready To Move,{location},{size},Soc{i},{sqft},{bhk},1,{price:.2}"
            );
        }
    }
    csv.push_str("Plot  Area,Ready To Move,Hebbal,2 BHK,,2100 - 2850,2,1,190\n");
    csv.push_str("Plot  Area,Ready To Move,Hebbal,2 BHK,,34.46Sq. Meter,2,1,50\n");
    csv.push_str("Plot  Area,Ready To Move,Hebbal,2 BHK,,1200,,1,50\n");
    csv.push_str("Plot  Area,Ready To Move,Hebbal,,,1200,2,1,50\n");
    csv.push_str("Plot  Area,Ready To Move,Tiny Village,2 BHK,,1200,2,1,40\n");
    csv.push_str("Plot  Area,Ready To Move,Whitefield,6 Bedroom,,1020,6,,370\n");
    csv.push_str("Plot  Area,Ready To Move,Whitefield,2 BHK,,1200,5,1,66\n");
    csv
}

pub fn write_listings(dir: &Path) -> PathBuf {
    let path = dir.join("bengaluru_house_prices.csv");
    std::fs::write(&path, listings_csv()).unwrap();
    path
}
