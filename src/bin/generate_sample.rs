//! Writes deterministic sample inputs for every supported format.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(about = "Write sample .nk, .dat and .csv material files")]
struct Args {
    /// Destination directory.
    #[arg(default_value = "sample_data")]
    out_dir: PathBuf,
}

/// Cauchy dispersion `n(λ) = A + B/λ² + C/λ⁴`, λ in µm.
fn cauchy(wl_nm: f64, (a, b, c): (f64, f64, f64)) -> f64 {
    let um = wl_nm / 1000.0;
    a + b / um.powi(2) + c / um.powi(4)
}

/// Exponential absorption tail below the band edge.
fn urbach_k(wl_nm: f64, edge_nm: f64, k0: f64, width_nm: f64) -> f64 {
    if wl_nm <= edge_nm {
        k0
    } else {
        k0 * (-(wl_nm - edge_nm) / width_nm).exp()
    }
}

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

/// (material, Cauchy coefficients, band edge nm, k at edge)
const OPTICAL: &[(&str, (f64, f64, f64), f64, f64)] = &[
    ("ZnO", (1.92, 0.0185, 0.0018), 375.0, 0.35),
    ("TiO2", (2.38, 0.0450, 0.0060), 380.0, 0.90),
    ("SiO2", (1.445, 0.0035, 0.0), 200.0, 0.0),
];

fn optical_table(
    (a, b, c): (f64, f64, f64),
    edge_nm: f64,
    k0: f64,
    rng: &mut SimpleRng,
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# synthetic optical constants")?;
    writeln!(out, "# wavelength_nm  n  k")?;
    // Descending on purpose: the parser sorts.
    for i in (0..=90).rev() {
        let wl = 300.0 + 10.0 * i as f64;
        let n = cauchy(wl, (a, b, c)) + rng.gauss(0.0, 5e-4);
        let k = (urbach_k(wl, edge_nm, k0, 12.0) + rng.gauss(0.0, 1e-4)).max(0.0);
        writeln!(out, "{wl:.1} {n:.5} {k:.5}")?;
    }
    writeln!(out, "# end of table")?;
    Ok(out)
}

const SILICON_DAT: &str = "\
# synthetic silicon parameters
[bandgap]
Eg_G = 1.12

[valenceband]
E_v = -5.17
m_dos = 0.81

[conductionband]
m_dos = 1.09   # 300 K

[permittivity]
permittivity = (11.7, 11.7)

[mobility/constant]
mu_max = (1417.0, 470.5)
";

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for &(material, coeffs, edge_nm, k0) in OPTICAL {
        let table = optical_table(coeffs, edge_nm, k0, &mut rng)?;
        let path = args.out_dir.join(format!("{material}_synthetic.nk"));
        std::fs::write(&path, table).with_context(|| format!("writing {}", path.display()))?;
    }

    let dat_path = args.out_dir.join("Si_tibercad.dat");
    std::fs::write(&dat_path, SILICON_DAT)
        .with_context(|| format!("writing {}", dat_path.display()))?;

    let csv_path = args.out_dir.join("GaAs_measured.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    writer.write_record([
        "Eg_eV",
        "chi_eV",
        "mobility_e_cm2_Vs",
        "mobility_h_cm2_Vs",
        "eps_r",
        "mdos_e",
        "mdos_h",
        "operator",
    ])?;
    for operator in ["Alice", "Bob", "Carol"] {
        let eg = format!("{:.3}", 1.424 + rng.gauss(0.0, 0.005));
        let mu_e = format!("{:.0}", 8500.0 + rng.gauss(0.0, 150.0));
        let mu_h = format!("{:.0}", 400.0 + rng.gauss(0.0, 10.0));
        // Only the first operator measured chi; later rows leave it blank.
        let chi = if operator == "Alice" { "4.07" } else { "" };
        writer.write_record([
            eg.as_str(),
            chi,
            mu_e.as_str(),
            mu_h.as_str(),
            "12.9",
            "0.067",
            "0.50",
            operator,
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} optical tables, 1 sectioned and 1 tabular electrical file to {}",
        OPTICAL.len(),
        args.out_dir.display()
    );
    Ok(())
}
