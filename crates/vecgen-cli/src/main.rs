use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use vecgen_batch::{Batch, BatchInput, BatchReport, GenerateOptions, OutputBackend, VectorType};
use vecgen_core::Result;

#[derive(Debug, Parser)]
#[command(
    name = "vecgen",
    version,
    about = "Generate Compose and SwiftUI source code from SVG and vector drawable files"
)]
struct Args {
    /// A directory to walk, or one or more files.
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Name of the root group.
    #[arg(short, long, value_name = "NAME")]
    accessor: Option<String>,

    /// Base package of generated Compose sources.
    #[arg(short, long, value_name = "PKG")]
    package: Option<String>,

    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Input file type.
    #[arg(short = 't', long = "type", value_enum, value_name = "TYPE")]
    vector_type: Option<InputType>,

    /// Do not generate preview scaffolding.
    #[arg(long)]
    no_preview: bool,

    /// JSON options file; flags override its values.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Android color resources used to resolve `@color/` references.
    #[arg(long, value_name = "FILE")]
    colors: Option<PathBuf>,

    /// Write generated files here instead of printing them.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Log per-file progress.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Compose,
    Swiftui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputType {
    Svg,
    Xml,
}

impl Args {
    fn options(&self) -> Result<GenerateOptions> {
        let mut options = match &self.config {
            Some(path) => GenerateOptions::from_json_file(path)?,
            None => GenerateOptions::default(),
        };

        if let Some(accessor) = &self.accessor {
            options.accessor_name = accessor.clone();
        }
        if let Some(package) = &self.package {
            options.package = package.clone();
        }
        if let Some(backend) = self.backend {
            options.backend = match backend {
                Backend::Compose => OutputBackend::DeclarativeUi,
                Backend::Swiftui => OutputBackend::NativeShape,
            };
        }
        if let Some(vector_type) = self.vector_type {
            options.vector_type = match vector_type {
                InputType::Svg => VectorType::Svg,
                InputType::Xml => VectorType::DrawableXml,
            };
        }
        if self.no_preview {
            options.generate_preview = false;
        }
        if let Some(colors) = &self.colors {
            options.color_resources = Some(colors.clone());
        }

        Ok(options)
    }

    /// A single directory argument walks the tree; anything else is a file list.
    fn input(&self) -> BatchInput {
        match self.inputs.as_slice() {
            [dir] if dir.is_dir() => BatchInput::Directory(dir.clone()),
            files => BatchInput::Files(files.to_vec()),
        }
    }

    fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(args.log_level());
    }

    match run(&args) {
        Ok(report) => {
            if !report.failures.is_empty() {
                log::warn!(
                    "{} of {} files failed",
                    report.failures.len(),
                    report.failures.len() + report.artifacts.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<BatchReport> {
    let mut batch = Batch::new(args.options()?);
    if let Some(output) = &args.output {
        batch = batch.with_output_dir(output);
    }

    let report = batch.run(args.input())?;

    if args.output.is_none() {
        print_artifacts(&report);
    } else {
        for path in &report.written {
            log::info!("wrote {}", path.display());
        }
    }
    Ok(report)
}

fn print_artifacts(report: &BatchReport) {
    for (i, artifact) in report.artifacts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "// ===== {}.{} ({}) =====",
            artifact.group,
            artifact.name,
            artifact.file_path.display()
        );
        print!("{}", artifact.source_text);
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}): {}", target, args),
                log::Level::Warn => eprintln!("Warning (in {}): {}", target, args),
                log::Level::Info => eprintln!("Info (in {}): {}", target, args),
                log::Level::Debug => eprintln!("Debug (in {}): {}", target, args),
                log::Level::Trace => eprintln!("Trace (in {}): {}", target, args),
            }
        }
    }

    fn flush(&self) {}
}
