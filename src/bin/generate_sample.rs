use anyhow::{Context, Result};

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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const HEADER: [&str; 13] = [
    "city",
    "area",
    "rooms",
    "bathroom",
    "parking spaces",
    "floor",
    "animal",
    "furniture",
    "hoa (R$)",
    "rent amount (R$)",
    "property tax (R$)",
    "fire insurance (R$)",
    "total (R$)",
];

/// City name and its mean rent per m² (BRL).
const CITIES: [(&str, f64); 5] = [
    ("São Paulo", 40.0),
    ("Rio de Janeiro", 34.0),
    ("Belo Horizonte", 26.0),
    ("Porto Alegre", 24.0),
    ("Campinas", 22.0),
];

const LISTINGS_PER_CITY: usize = 200;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_houses.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut n = 0usize;
    for &(city, per_m2) in &CITIES {
        for _ in 0..LISTINGS_PER_CITY {
            let rooms = rng.range(1, 5);
            let area = (rooms * 25 + rng.range(0, 40)) as f64;
            let bathroom = rng.range(1, rooms.max(1));
            let parking = rng.range(0, rooms.saturating_sub(1));
            let floor = if rng.chance(0.25) {
                "-".to_string()
            } else {
                rng.range(1, 20).to_string()
            };
            let animal = if rng.chance(0.7) { "acept" } else { "not acept" };
            let furniture = if rng.chance(0.3) { "furnished" } else { "not furnished" };

            let rent = (area * per_m2 * rng.gauss(1.0, 0.15).max(0.4)).round();
            let hoa = (area * rng.gauss(9.0, 3.0).max(0.0)).round();
            let tax = (rent * 0.1 * rng.next_f64()).round();
            let insurance = (rent * 0.013).round().max(3.0);
            let total = hoa + rent + tax + insurance;

            writer.write_record([
                city.to_string(),
                area.to_string(),
                rooms.to_string(),
                bathroom.to_string(),
                parking.to_string(),
                floor,
                animal.to_string(),
                furniture.to_string(),
                hoa.to_string(),
                rent.to_string(),
                tax.to_string(),
                insurance.to_string(),
                total.to_string(),
            ])?;
            n += 1;
        }
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {n} listings across {} cities to {output_path}", CITIES.len());
    Ok(())
}
