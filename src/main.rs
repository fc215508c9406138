//! csv-chew CLI - streaming CSV record reader

use clap::Parser;
use csv_chew::Reader;
use std::path::PathBuf;
use std::process::ExitCode;

/// Streaming CSV record reader.
///
/// Reads CSV files record by record with a configurable dialect
/// (delimiters, comment markers, whitespace trimming) and prints each
/// record, or just counts them.
#[derive(Parser, Debug)]
#[command(name = "csv-chew")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file(s) to read
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Delimiter characters (each character of the string is a delimiter)
    #[arg(short = 'd', long, default_value = ",")]
    delimiters: String,

    /// Comment-marker characters (lines starting with one are skipped)
    #[arg(short = 'c', long)]
    comment_chars: Option<String>,

    /// Trim whitespace from unquoted values
    #[arg(long)]
    trim_unquoted: bool,

    /// Trim whitespace from quoted values
    #[arg(long)]
    trim_quoted: bool,

    /// Trim whitespace from all values (implies both trim flags)
    #[arg(short = 't', long)]
    trim: bool,

    /// Only print the number of records per file
    #[arg(short = 'n', long)]
    count: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut exit_code = ExitCode::SUCCESS;

    for file in &args.files {
        if let Err(e) = read_file(file, &args) {
            eprintln!("Error processing {}: {}", file.display(), e);
            exit_code = ExitCode::FAILURE;
        }
    }

    exit_code
}

fn read_file(path: &PathBuf, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(path)?;

    let delimiters: Vec<char> = args.delimiters.chars().collect();
    reader.set_delimiters(&delimiters)?;

    if let Some(ref comment_chars) = args.comment_chars {
        let comment_chars: Vec<char> = comment_chars.chars().collect();
        reader.set_comment_chars(&comment_chars)?;
    }

    if args.trim {
        reader.trim_values(true);
    } else {
        reader
            .trim_unquoted_values(args.trim_unquoted)
            .trim_quoted_values(args.trim_quoted);
    }

    let mut count: u64 = 0;
    while let Some(record) = reader.read_record()? {
        count += 1;
        if !args.count {
            println!("{:?}", record);
        }
    }

    if args.count {
        println!("{}: {} records", path.display(), count);
    }

    Ok(())
}
