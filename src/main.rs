//! matprop command-line interface.
//!
//! ```sh
//! matprop ingest ZnO_ellipsometry.txt Si_tibercad.dat --output out/
//! matprop formats
//! matprop validate pipeline.toml
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use matprop::config::{load_config, PipelineConfig};
use matprop::data::loader::source_name;
use matprop::data::model::Entry;
use matprop::pipeline::process_file;

#[derive(Parser)]
#[command(name = "matprop")]
#[command(about = "Parse optical and electrical material property files into normalized records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, derive and resample each file, emitting one JSON record per file.
    Ingest {
        /// Input files (.txt, .nk, .dat, .csv).
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Pipeline configuration (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write `<stem>.json` files here instead of printing to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// List the recognized input formats and fields.
    Formats,
    /// Check a configuration file without processing any data.
    Validate {
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            files,
            config,
            output,
            pretty,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => PipelineConfig::default(),
            };
            if let Some(dir) = &output {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating output directory {}", dir.display()))?;
            }

            let mut failed = 0usize;
            for path in &files {
                match process_file(path, &config) {
                    Ok(entry) => {
                        log::info!(
                            "{}: material={}, reference={}",
                            path.display(),
                            entry.material(),
                            entry.reference().unwrap_or("-")
                        );
                        write_entry(&entry, path, output.as_deref(), pretty)?;
                    }
                    Err(e) => {
                        log::error!("Failed to ingest: {e:#}");
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                bail!("{failed} of {} file(s) failed", files.len());
            }
            Ok(())
        }
        Commands::Formats => {
            println!("Recognized formats:");
            println!();
            println!("  .txt, .nk   optical spectrum: 'wavelength n k' rows, '#' comments");
            println!("  .dat        sectioned electrical parameters:");
            println!("                [bandgap] Eg_G            -> Eg");
            println!("                [valenceband] E_v|Ev      -> Ev");
            println!("                [valenceband] m_dos       -> mdos_h");
            println!("                [conductionband] E_c|Ec|E_c0 -> Ec");
            println!("                [conductionband] m_dos    -> mdos_e");
            println!("                [permittivity] permittivity -> eps_r (pairs averaged)");
            println!("                [mobility/constant] mu_max -> (mu_e, mu_h)");
            println!("  .csv        tabular electrical parameters, first non-empty value per column:");
            println!("                Eg_eV, chi_eV, mobility_e_cm2_Vs, mobility_h_cm2_Vs,");
            println!("                Nc_cm-3, Nv_cm-3, eps_r, Ec_eV, Ev_eV, mdos_e, mdos_h");
            Ok(())
        }
        Commands::Validate { config } => {
            let parsed = load_config(&config)?;
            println!("Configuration is valid: {}", config.display());
            println!("  fixed points (nm): {:?}", parsed.target_wavelengths_nm);
            if let Some(grid) = &parsed.resample {
                println!(
                    "  resample grid: {} points over [{}, {}] nm",
                    grid.points, grid.range[0], grid.range[1]
                );
            }
            Ok(())
        }
    }
}

fn write_entry(entry: &Entry, input: &Path, out_dir: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(entry)
    } else {
        serde_json::to_string(entry)
    }
    .context("serializing entry")?;

    match out_dir {
        Some(dir) => {
            let out = dir.join(format!("{}.json", source_name(input)));
            std::fs::write(&out, json).with_context(|| format!("writing {}", out.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}
