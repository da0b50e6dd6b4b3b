use std::fs;
use std::path::Path;

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
}

/// Destination countries with a base annual export value (USD) and a rough
/// USD-per-kg price, loosely shaped like the real batik trade figures.
const DESTINATIONS: &[(&str, &str, f64, f64)] = &[
    ("United States", "USA", 7_800_000.0, 28.0),
    ("Japan", "JPN", 3_900_000.0, 31.0),
    ("Germany", "DEU", 2_600_000.0, 24.0),
    ("South Korea", "KOR", 1_900_000.0, 26.0),
    ("United Kingdom", "GBR", 1_500_000.0, 25.0),
    ("Malaysia", "MYS", 1_400_000.0, 14.0),
    ("Singapore", "SGP", 1_300_000.0, 18.0),
    ("Netherlands", "NLD", 1_100_000.0, 22.0),
    ("Australia", "AUS", 950_000.0, 23.0),
    ("United Arab Emirates", "ARE", 820_000.0, 17.0),
    ("France", "FRA", 760_000.0, 27.0),
    ("Italy", "ITA", 640_000.0, 26.0),
    ("Canada", "CAN", 580_000.0, 24.0),
    ("China", "CHN", 540_000.0, 12.0),
    ("Thailand", "THA", 470_000.0, 13.0),
    ("Saudi Arabia", "SAU", 430_000.0, 16.0),
    ("Belgium", "BEL", 380_000.0, 23.0),
    ("Spain", "ESP", 330_000.0, 25.0),
    ("India", "IND", 300_000.0, 9.0),
    ("Brunei", "BRN", 260_000.0, 15.0),
    ("Switzerland", "CHE", 230_000.0, 30.0),
    ("Sweden", "SWE", 200_000.0, 24.0),
    ("Turkey", "TUR", 180_000.0, 18.0),
    ("South Africa", "ZAF", 150_000.0, 15.0),
    ("Mexico", "MEX", 130_000.0, 19.0),
    ("Vietnam", "VNM", 110_000.0, 10.0),
    ("Philippines", "PHL", 95_000.0, 12.0),
    ("Nigeria", "NGA", 80_000.0, 11.0),
];

const FIRST_YEAR: i32 = 2010;
const LAST_YEAR: i32 = 2021;

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_dir = Path::new("data");
    fs::create_dir_all(output_dir).expect("Failed to create data directory");
    let output_path = output_dir.join("batik_exports.csv");

    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    writer
        .write_record(["Tahun", "Negara", "Iso-3", "Nilai", "Berat"])
        .expect("Failed to write header");

    let mut rows = 0usize;
    for year in FIRST_YEAR..=LAST_YEAR {
        let growth = 1.0 + 0.04 * (year - FIRST_YEAR) as f64;

        for &(country, iso3, base_value, price_per_kg) in DESTINATIONS {
            let value = (base_value * growth * rng.gauss(1.0, 0.18).max(0.2)).round();
            let weight = (value / price_per_kg * rng.gauss(1.0, 0.08).max(0.5)).round();

            // A small share of rows arrives with a blank value cell, the way
            // the real dataset does.
            let value_cell = if rng.next_f64() < 0.02 {
                String::new()
            } else {
                format!("{value:.0}")
            };

            writer
                .write_record([
                    year.to_string(),
                    country.to_string(),
                    iso3.to_string(),
                    value_cell,
                    format!("{weight:.0}"),
                ])
                .expect("Failed to write row");
            rows += 1;
        }

        // Aggregated remainder destinations carry no ISO3 code.
        let other_value = (450_000.0 * growth * rng.gauss(1.0, 0.25).max(0.2)).round();
        let other_weight = (other_value / 15.0 * rng.gauss(1.0, 0.1).max(0.5)).round();
        writer
            .write_record([
                year.to_string(),
                "Other countries".to_string(),
                String::new(),
                format!("{other_value:.0}"),
                format!("{other_weight:.0}"),
            ])
            .expect("Failed to write row");
        rows += 1;
    }

    writer.flush().expect("Failed to flush output");
    println!(
        "Wrote {rows} export rows ({FIRST_YEAR}-{LAST_YEAR}, {} destinations) to {}",
        DESTINATIONS.len() + 1,
        output_path.display()
    );
}
