//!
//! The EF test debugger executable.
//!

pub(crate) mod arguments;

use std::time::Duration;
use std::time::Instant;

use colored::Colorize;

use self::arguments::Arguments;

/// The process exit code on success.
const EXIT_CODE_SUCCESS: i32 = 0;

/// The process exit code on failure.
const EXIT_CODE_FAILURE: i32 = 1;

///
/// The application entry point.
///
fn main() {
    dotenvy::dotenv_override().ok();

    let exit_code = match main_inner(Arguments::new()) {
        Ok(()) => EXIT_CODE_SUCCESS,
        Err(error) => {
            eprintln!("{error:?}");
            EXIT_CODE_FAILURE
        }
    };
    std::process::exit(exit_code);
}

///
/// The entry point wrapper used for proper error handling.
///
fn main_inner(arguments: Arguments) -> anyhow::Result<()> {
    let reporter = ef_debugger::ConsoleReporter::new(arguments.verbosity, arguments.quiet);

    let mut skip_list = ef_debugger::SkipList::default();
    for address in arguments.skip_addresses.into_iter() {
        skip_list.push(address);
    }

    let config = ef_debugger::Config {
        corpus: arguments.corpus,
        test_name: arguments.test_name,
        parent_folder: arguments.parent_folder,
        anvil: ef_debugger::AnvilConfig {
            binary: arguments.anvil,
            port: arguments.port,
            verbose: arguments.verbosity,
        },
        hardfork: arguments.hardfork,
        startup_delay: Duration::from_millis(arguments.startup_delay_ms),
        poll_interval: Duration::from_millis(arguments.poll_interval_ms),
        skip_list,
        stop_on_signal: true,
    };

    if !arguments.quiet {
        println!(
            "   {} `{}` from {}",
            "Debugging".bright_green().bold(),
            config.test_name,
            config.corpus.to_string_lossy(),
        );
    }

    let run_time_start = Instant::now();
    let debugger = ef_debugger::EfDebugger::new(config, reporter);
    let session = debugger.run()?;

    if !arguments.quiet {
        println!(
            "    {} replaying {} transactions in {}m{:02}s",
            "Finished".bright_green().bold(),
            session.result.receipts.len(),
            run_time_start.elapsed().as_secs() / 60,
            run_time_start.elapsed().as_secs() % 60,
        );
    }

    if arguments.trace {
        debugger.trace(&session);
    }
    if !arguments.no_wait {
        session.wait(&debugger.reporter)?;
    }

    Ok(())
}
