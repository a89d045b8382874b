//!
//! The Ethereum test vector debugger library.
//!

pub(crate) mod block;
pub(crate) mod corpus;
pub(crate) mod diagnostics;
pub(crate) mod error;
pub(crate) mod hardfork;
pub(crate) mod node;
pub(crate) mod replayer;
pub(crate) mod reporter;
pub(crate) mod seeder;
#[cfg(test)]
pub(crate) mod testing;
pub(crate) mod utils;
pub(crate) mod vector;
pub(crate) mod verifier;

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

pub use crate::block::Block;
pub use crate::corpus::Corpus;
pub use crate::corpus::Lookup;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::hardfork::Hardfork;
pub use crate::node::process::AnvilConfig;
pub use crate::node::process::StopHandle;
pub use crate::node::AnvilProcess;
pub use crate::node::Node;
pub use crate::node::RpcNode;
pub use crate::replayer::ExecutionResult;
pub use crate::replayer::Replayer;
pub use crate::reporter::ConsoleReporter;
pub use crate::reporter::Level;
pub use crate::reporter::Reporter;
pub use crate::vector::TestVector;
pub use crate::verifier::Field;
pub use crate::verifier::SkipList;
pub use crate::verifier::Verifier;

///
/// The debugger configuration.
///
#[derive(Debug, Clone)]
pub struct Config {
    /// The parsed test vector directory.
    pub corpus: PathBuf,
    /// The test name.
    pub test_name: String,
    /// The parent folder disambiguator, empty when not set.
    pub parent_folder: String,
    /// The anvil launch parameters.
    pub anvil: AnvilConfig,
    /// Overrides the fork derived from the block header.
    pub hardfork: Option<Hardfork>,
    /// The delay between the node launch and the first call.
    pub startup_delay: Duration,
    /// The receipt polling interval.
    pub poll_interval: Duration,
    /// The addresses excluded from the post-state check.
    pub skip_list: SkipList,
    /// Whether SIGINT and SIGTERM stop the node before exiting.
    pub stop_on_signal: bool,
}

impl Config {
    /// The default parsed test vector directory.
    pub const DEFAULT_CORPUS: &'static str = "tests/ef_tests/test_data/parsed";

    /// The default node startup delay.
    pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(1000);
}

///
/// The debugging session kept alive after a successful replay.
///
#[derive(Debug)]
pub struct Session {
    /// The running node.
    pub anvil: AnvilProcess,
    /// The node endpoint.
    pub rpc_url: String,
    /// The replay result.
    pub result: ExecutionResult,
}

impl Session {
    ///
    /// Blocks until the operator presses Enter, then stops the node.
    ///
    pub fn wait(mut self, reporter: &dyn Reporter) -> anyhow::Result<()> {
        reporter.report(
            Level::Info,
            &format!(
                "Anvil is still running at {} (press Enter or Ctrl+C to stop)",
                self.rpc_url
            ),
        );
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        self.anvil.terminate();
        Ok(())
    }
}

///
/// The Ethereum test vector debugger.
///
pub struct EfDebugger<R> {
    /// The configuration.
    pub config: Config,
    /// The diagnostic sink.
    pub reporter: R,
}

impl<R> EfDebugger<R>
where
    R: Reporter,
{
    ///
    /// A shortcut constructor.
    ///
    pub fn new(config: Config, reporter: R) -> Self {
        Self { config, reporter }
    }

    ///
    /// Loads the test vector and decodes its first block.
    ///
    pub fn load(&self) -> crate::Result<(TestVector, Block)> {
        let corpus = Corpus::new(self.config.corpus.as_path());
        let vector = corpus.load(self.config.test_name.as_str(), self.config.parent_folder.as_str())?;
        let block = Block::from_vector(&vector)?;

        self.reporter.report(
            Level::Info,
            &format!(
                "Loaded `{}` from {}: {} pre-state accounts, {} transactions, {} post-state accounts",
                self.config.test_name,
                corpus.path().to_string_lossy(),
                vector.pre.len(),
                block.transactions.len(),
                vector.post_state.len(),
            ),
        );
        Ok((vector, block))
    }

    ///
    /// Seeds the node, replays the block and verifies the post-state.
    ///
    /// A block without transactions is seeded, then rejected by the replayer.
    ///
    pub fn execute<N>(
        &self,
        node: &N,
        vector: &TestVector,
        block: &Block,
    ) -> crate::Result<ExecutionResult>
    where
        N: Node + ?Sized,
    {
        seeder::seed(node, &vector.pre, block, &self.reporter)?;
        let result = Replayer::new(self.config.poll_interval).replay(node, block, &self.reporter)?;
        Verifier::new(self.config.skip_list.clone()).verify(
            node,
            &vector.post_state,
            &self.reporter,
        )?;
        Ok(result)
    }

    ///
    /// Launches anvil for the block and connects to it.
    ///
    pub fn launch(&self, vector: &TestVector, block: &Block) -> crate::Result<(AnvilProcess, RpcNode)> {
        let hardfork = self.config.hardfork.unwrap_or(block.header.hardfork);
        if let Some(network) = vector.network.as_deref() {
            if !network.eq_ignore_ascii_case(hardfork.to_string().as_str()) {
                self.reporter.report(
                    Level::Debug,
                    &format!("The fixture network is `{network}`, launching anvil with `{hardfork}`"),
                );
            }
        }

        let anvil = AnvilProcess::spawn(&self.config.anvil, block.header.timestamp, hardfork)?;
        if self.config.stop_on_signal {
            anvil.stop_on_signal()?;
        }
        self.reporter.report(
            Level::Info,
            &format!(
                "Launched {} (timestamp {}, hardfork {hardfork})",
                anvil.path().to_string_lossy(),
                block.header.timestamp,
            ),
        );
        std::thread::sleep(self.config.startup_delay);
        anvil.ensure_running()?;

        let node = RpcNode::connect(self.config.anvil.url().as_str())?;
        Ok((anvil, node))
    }

    ///
    /// Runs the whole pipeline against a freshly launched anvil.
    ///
    /// On failure the node is terminated before the error is returned.
    ///
    pub fn run(&self) -> crate::Result<Session> {
        let (vector, block) = self.load()?;
        if block.transactions.is_empty() {
            return Err(Error::EmptyBlock);
        }

        let (anvil, node) = self.launch(&vector, &block)?;
        let result = self.execute(&node, &vector, &block)?;

        diagnostics::report_debug_commands(result.hashes().as_slice(), node.url(), &self.reporter);
        Ok(Session {
            anvil,
            rpc_url: node.url().to_owned(),
            result,
        })
    }

    ///
    /// Prints the `cast run` trace of every replayed transaction.
    ///
    pub fn trace(&self, session: &Session) {
        diagnostics::trace(
            session.result.hashes().as_slice(),
            session.rpc_url.as_str(),
            &self.reporter,
        );
    }
}
