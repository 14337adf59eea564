use std::path::PathBuf;

use anyhow::{Context, Result};

/// Clear-sky shape: zero at night, a half-sine between sunrise and sunset.
fn daylight_fraction(minute_of_day: u32) -> f64 {
    const SUNRISE: f64 = 6.0 * 60.0;
    const SUNSET: f64 = 18.5 * 60.0;
    let m = minute_of_day as f64;
    if m <= SUNRISE || m >= SUNSET {
        return 0.0;
    }
    ((m - SUNRISE) / (SUNSET - SUNRISE) * std::f64::consts::PI).sin()
}

/// SplitMix64 stream with a polar-method normal sampler on top.
struct SiteNoise {
    state: u64,
    spare: Option<f64>,
}

impl SiteNoise {
    fn seeded(seed: u64) -> Self {
        SiteNoise {
            state: seed,
            spare: None,
        }
    }

    fn bits(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn uniform(&mut self) -> f64 {
        (self.bits() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Zero-mean normal sample with standard deviation `sigma`.
    fn normal(&mut self, sigma: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return sigma * z;
        }
        loop {
            let u = 2.0 * self.uniform() - 1.0;
            let v = 2.0 * self.uniform() - 1.0;
            let r2 = u * u + v * v;
            if r2 > 0.0 && r2 < 1.0 {
                let scale = (-2.0 * r2.ln() / r2).sqrt();
                self.spare = Some(v * scale);
                return sigma * u * scale;
            }
        }
    }
}

/// Per-country climate knobs.
struct Site {
    file: &'static str,
    seed: u64,
    /// Clear-sky GHI at solar noon, W/m².
    peak_ghi: f64,
    /// Share of GHI that arrives as diffuse light.
    diffuse_share: f64,
    /// Probability that a minute is under cloud.
    cloudiness: f64,
    mean_temp: f64,
}

const SITES: [Site; 3] = [
    Site {
        file: "sample_benin.csv",
        seed: 1,
        peak_ghi: 1010.0,
        diffuse_share: 0.28,
        cloudiness: 0.20,
        mean_temp: 28.0,
    },
    Site {
        file: "sample_sierra_leone.csv",
        seed: 2,
        peak_ghi: 880.0,
        diffuse_share: 0.38,
        cloudiness: 0.35,
        mean_temp: 26.0,
    },
    Site {
        file: "sample_togo.csv",
        seed: 3,
        peak_ghi: 960.0,
        diffuse_share: 0.31,
        cloudiness: 0.25,
        mean_temp: 27.0,
    },
];

const DAYS: u32 = 3;
const MINUTES_PER_DAY: u32 = 24 * 60;
/// One row in this many gets a missing GHI value.
const MISSING_EVERY: u64 = 500;

fn write_site(dir: &std::path::Path, site: &Site) -> Result<PathBuf> {
    let path = dir.join(site.file);
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Timestamp", "GHI", "DNI", "DHI", "Tamb"])?;

    let mut noise = SiteNoise::seeded(site.seed);
    for day in 0..DAYS {
        for minute in 0..MINUTES_PER_DAY {
            let clear = site.peak_ghi * daylight_fraction(minute);
            let cloud = if noise.chance(site.cloudiness) {
                0.3 + 0.4 * noise.uniform()
            } else {
                1.0
            };
            // Night-time sensor offset can read slightly negative.
            let ghi = clear * cloud + noise.normal(4.0);
            let dhi = (ghi * site.diffuse_share / cloud.max(0.5)).max(0.0);
            let dni = ((ghi - dhi).max(0.0) * 1.15).max(0.0);
            let temp = site.mean_temp + 4.0 * daylight_fraction(minute) + noise.normal(0.5);

            let timestamp = format!(
                "2021-08-{:02} {:02}:{:02}",
                9 + day,
                minute / 60,
                minute % 60
            );
            let ghi_field = if noise.bits() % MISSING_EVERY == 0 {
                String::new()
            } else {
                format!("{ghi:.1}")
            };

            writer.write_record([
                timestamp,
                ghi_field,
                format!("{dni:.1}"),
                format!("{dhi:.1}"),
                format!("{temp:.1}"),
            ])?;
        }
    }

    writer.flush()?;
    Ok(path)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for site in &SITES {
        let path = write_site(&out_dir, site)?;
        println!(
            "Wrote {} rows to {}",
            DAYS * MINUTES_PER_DAY,
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SiteNoise::seeded(7);
        let mut b = SiteNoise::seeded(7);
        for _ in 0..16 {
            assert_eq!(a.bits(), b.bits());
        }
        assert_ne!(SiteNoise::seeded(1).bits(), SiteNoise::seeded(2).bits());
    }

    #[test]
    fn normal_samples_are_centred() {
        let mut noise = SiteNoise::seeded(42);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| noise.normal(2.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

        assert!(mean.abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
        assert!((0..1000).all(|_| (0.0..1.0).contains(&noise.uniform())));
    }
}
