//! Data Directory Inventory
//!
//! Walks the served data directory and writes every file's absolute path to
//! a CSV for the alias ingestion step.
//!
//! Usage:
//!   list_files
//!   list_files --root /srv/dataset/data --output files.csv

use clap::Parser;
use dataset_server::inventory::{collect_files, write_csv};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

/// List every file under the data directory as CSV
#[derive(Parser, Debug)]
#[command(name = "list_files")]
#[command(about = "Write the absolute path of every file under a directory to CSV")]
struct Args {
    /// Directory to walk
    #[arg(long, default_value = "data")]
    root: PathBuf,

    /// CSV file to write
    #[arg(long, default_value = "data_dir_file_list.csv")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let files = match collect_files(&args.root) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Failed to walk {}: {}", args.root.display(), e);
            return ExitCode::from(1);
        }
    };

    let written = File::create(&args.output)
        .and_then(|f| write_csv(&files, BufWriter::new(f)));
    if let Err(e) = written {
        eprintln!("Failed to write {}: {}", args.output.display(), e);
        return ExitCode::from(1);
    }

    println!("Wrote {} paths to {}", files.len(), args.output.display());
    ExitCode::SUCCESS
}
