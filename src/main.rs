use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Yaml,
}

#[derive(Parser)]
#[command(name = "mmlc")]
#[command(about = "Compile MML into 32-byte perform blocks", long_about = None)]
struct Cli {
    /// Input MML file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a compilation summary to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn read_source(input: Option<&PathBuf>) -> io::Result<String> {
    let source = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(mmlc::source_until_nul(&source).to_string())
}

fn main() {
    let cli = Cli::parse();

    let source = match read_source(cli.input.as_ref()) {
        Ok(content) => content,
        Err(e) => {
            match &cli.input {
                Some(path) => eprintln!("Error reading file '{}': {}", path.display(), e),
                None => eprintln!("Error reading stdin: {}", e),
            }
            process::exit(1);
        }
    };

    let events = match mmlc::compile_events(&source) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(1);
        }
    };
    let segments = mmlc::segment(&events);

    if cli.verbose {
        let total_ms: u64 = segments.iter().map(|s| u64::from(s.duration_ms)).sum();
        eprintln!(
            "compiled {} events into {} segments, {} ms",
            events.len(),
            segments.len(),
            total_ms
        );
    }

    let report = match cli.format {
        Format::Csv => mmlc::report::to_csv(&segments),
        Format::Yaml => match mmlc::report::to_yaml(&segments) {
            Ok(yaml) => yaml,
            Err(e) => {
                eprintln!("Error rendering report: {}", e);
                process::exit(1);
            }
        },
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &report) {
                eprintln!("Error writing to '{}': {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Wrote {} segments to {}", segments.len(), path.display());
        }
        None => print!("{}", report),
    }
}
