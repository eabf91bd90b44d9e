use anyhow::Context;
use clap::{CommandFactory, Parser};
use pixprep::cli::Args;
use pixprep::report::{self, Summary};
use pixprep::source;
use pixprep::{greet, logging, NormalizationParams, OutputFormat, ProcessError};
use std::path::{Path, PathBuf};

fn main() {
    logging::init();
    let args = Args::parse();

    if args.greet {
        println!("{}", greet());
        return;
    }

    if args.files.is_empty() {
        let _ = Args::command().print_help();
        println!();
        return;
    }

    let params = match args.params() {
        Ok(params) => params,
        Err(e) => {
            println!("Error: {e}");
            std::process::exit(2);
        }
    };

    let multiple_files = args.files.len() > 1;
    let mut any_failed = false;

    for (idx, file_path) in args.files.iter().enumerate() {
        if multiple_files {
            println!("{}", file_path.display());
        }

        match process_file(file_path, &args, &params) {
            Ok(Some(written)) => println!("Wrote {}", written.display()),
            Ok(None) => {}
            Err(e) => {
                log::debug!("{e:?}");
                println!("Error: {e}");
                any_failed = true;
            }
        }

        if multiple_files && idx < args.files.len() - 1 {
            println!();
        }
    }

    if any_failed {
        std::process::exit(1);
    }
}

/// Preprocess a single image file, returning the dump path if one was written
fn process_file(
    file_path: &Path,
    args: &Args,
    params: &NormalizationParams,
) -> Result<Option<PathBuf>, ProcessError> {
    // Stage 1: Decode and resize to the model input
    let image = source::load(file_path, args.dimensions()).map_err(ProcessError::LoadFailed)?;

    // Stage 2: Normalize
    let format = args.output_format();
    let output = image
        .normalized_bytes(params, format)
        .map_err(|source| ProcessError::NormalizeFailed {
            path: file_path.to_path_buf(),
            source,
        })?;

    // Stage 3: Verbose output
    if args.verbose {
        report::print_summary(&Summary::new(&image, format, *params, &output));
    }

    // Stage 4: Dump the raw buffer
    let Some(dir) = &args.output else {
        return Ok(None);
    };

    write_output(dir, file_path, format, &output)
        .map(Some)
        .map_err(ProcessError::WriteFailed)
}

fn write_output(dir: &Path, input: &Path, format: OutputFormat, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let stem = input
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    let path = dir.join(format!("{stem}.{}.bin", format.file_suffix()));

    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write output buffer: {}", path.display()))?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
