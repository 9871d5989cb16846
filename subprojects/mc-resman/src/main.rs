use std::{error::Error, io, process::ExitCode};

use mc_resman::{logger, topology};

fn main() -> ExitCode {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut mc = match topology::emulator() {
        Ok(mc) => mc,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    let mut out = io::stdout().lock();
    match mc_resman::run(&args, &mut mc, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Prints an error and its causes on one line.
fn report(err: &dyn Error) {
    eprint!("resman: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprint!(": {cause}");
        source = cause.source();
    }
    eprintln!();
}
