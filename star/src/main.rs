mod cli;
mod help;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use star_core::{ConsoleLogger, Logger, StarError};

use crate::cli::{Operation, ParsedArgs};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let parsed = match cli::parse(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            // No logger is constructed yet since we don't know --verbose;
            // usage errors always print regardless of verbosity.
            println!("error: {message}");
            println!("info: run \"star --help\" to see the available flags");
            return ExitCode::FAILURE;
        }
    };

    let logger = ConsoleLogger::new(parsed.verbose);
    run(parsed, &logger)
}

fn run(parsed: ParsedArgs, logger: &ConsoleLogger) -> ExitCode {
    if parsed.operation == Operation::Help {
        print!("{}", help::USAGE);
        return ExitCode::SUCCESS;
    }

    let Some(archive) = parsed.archive.clone() else {
        logger.error("No .tar file specified in arguments");
        return ExitCode::FAILURE;
    };

    let result = dispatch(parsed.operation, &archive, &parsed.files, logger);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger.error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn dispatch(
    operation: Operation,
    archive: &PathBuf,
    files: &[PathBuf],
    logger: &ConsoleLogger,
) -> Result<(), StarError> {
    match operation {
        Operation::Create => star_core::create(archive, files, logger),
        Operation::Extract => star_core::extract(archive, logger),
        Operation::List => {
            for name in star_core::list(archive, logger)? {
                println!("{name}");
            }
            Ok(())
        }
        Operation::Delete => {
            let names = files.iter().map(|p| p.to_string_lossy().into_owned()).collect::<Vec<_>>();
            star_core::delete(archive, &names, logger)
        }
        Operation::Update => star_core::update(archive, files, logger),
        Operation::Append => star_core::append(archive, files, logger),
        Operation::Pack => star_core::pack(archive, logger),
        Operation::Help | Operation::Unknown => Ok(()),
    }
}
