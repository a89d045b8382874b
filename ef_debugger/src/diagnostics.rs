//!
//! The follow-up debugging output.
//!

use std::process::Command;

use web3::types::H256;

use crate::reporter::Level;
use crate::reporter::Reporter;

/// The foundry transaction tracer.
const CAST: &str = "cast";

///
/// The `cast` command replaying the transaction in the interactive debugger.
///
pub fn debug_command(hash: &H256, rpc_url: &str) -> String {
    format!("{CAST} run {hash:?} --rpc-url {rpc_url} --debug")
}

///
/// Surfaces the debugging command of every confirmed transaction.
///
pub fn report_debug_commands(hashes: &[H256], rpc_url: &str, reporter: &dyn Reporter) {
    for (index, hash) in hashes.iter().enumerate() {
        reporter.report(
            Level::Info,
            &format!(
                "Run `{}` to debug transaction {}",
                debug_command(hash, rpc_url),
                index + 1
            ),
        );
    }
}

///
/// Prints the `cast run` trace of every confirmed transaction.
///
/// Skipped with a warning when `cast` is not installed.
///
pub fn trace(hashes: &[H256], rpc_url: &str, reporter: &dyn Reporter) {
    let cast = match which::which(CAST) {
        Ok(path) => path,
        Err(error) => {
            reporter.report(
                Level::Warning,
                &format!("Tracing skipped, `{CAST}` is not available: {error}"),
            );
            return;
        }
    };

    for hash in hashes.iter() {
        let status = Command::new(cast.as_path())
            .arg("run")
            .arg(format!("{hash:?}"))
            .arg("--rpc-url")
            .arg(rpc_url)
            .status();
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => reporter.report(
                Level::Warning,
                &format!("`{CAST} run {hash:?}` exited with {status}"),
            ),
            Err(error) => reporter.report(
                Level::Warning,
                &format!("`{CAST} run {hash:?}` could not be started: {error}"),
            ),
        }
    }
}
