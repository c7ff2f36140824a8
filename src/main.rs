//! cnj2csv CLI - flatten CNJ case-record JSON dumps into CSV.
//!
//! ```bash
//! cnj2csv ./data justica_trabalho                     # every subject, one CSV
//! cnj2csv ./data justica_trabalho --assuntos 864 899  # one CSV per subject
//! ```

use clap::Parser;
use cnj2csv::{run, ConvertOptions, CourtType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cnj2csv")]
#[command(about = "Flatten CNJ case-record JSON into semicolon-delimited CSV", long_about = None)]
#[command(
    after_help = "The JSON dumps must live under {root}/{court_type}/**/*.json, e.g.\n\
    ./justica_trabalho/processos-trt02/processos-trt02_1.json\n\
    The root folder must also hold the reference tables: sgt_assuntos.csv,\n\
    sgt_classes.csv, sgt_movimentos.csv, mpm_serventias.csv and ibge.csv\n\
    (plus the optional sgt_movimentos_{court_type}.csv). With --assuntos one\n\
    CSV is generated per subject code; without it a single CSV covers every\n\
    subject."
)]
struct Cli {
    /// Root folder holding the court-type folder and the reference tables
    root: PathBuf,

    /// Court category whose JSON dumps will be converted
    #[arg(value_enum)]
    court: CourtType,

    /// Subject codes used to split the output, one CSV per code
    #[arg(long = "assuntos", num_args = 0..)]
    assuntos: Vec<i64>,
}

fn main() {
    let cli = Cli::parse();

    let options = ConvertOptions {
        root: cli.root,
        court: cli.court,
        subjects: cli.assuntos,
    };

    match run(&options) {
        Ok(summary) => {
            eprintln!(
                "✨ Done! {} files, {} cases ({} without output), {} rows",
                summary.files, summary.cases, summary.skipped_cases, summary.rows
            );
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
