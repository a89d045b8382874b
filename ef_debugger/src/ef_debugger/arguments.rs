//!
//! The EF test debugger arguments.
//!

use structopt::StructOpt;
use web3::types::Address;

///
/// The EF test debugger arguments.
///
#[derive(Debug, StructOpt)]
#[structopt(
    name = "ef-debugger",
    about = "Replays a single Ethereum Foundation blockchain test on anvil"
)]
pub struct Arguments {
    /// The logging level.
    #[structopt(short = "v", long = "verbose")]
    pub verbosity: bool,

    /// Prints only warnings and errors.
    #[structopt(short = "q", long = "quiet")]
    pub quiet: bool,

    /// The test name, matched as a substring of the corpus file names.
    #[structopt(long = "test-name", env = "TEST_NAME")]
    pub test_name: String,

    /// The parent folder, used to disambiguate tests sharing a name.
    #[structopt(long = "parent-folder", env = "TEST_PARENT_FOLDER", default_value = "")]
    pub parent_folder: String,

    /// The directory with the parsed test vectors.
    #[structopt(
        long = "corpus",
        env = "EF_TESTS_PARSED_DIR",
        default_value = "tests/ef_tests/test_data/parsed"
    )]
    pub corpus: std::path::PathBuf,

    /// The anvil RPC port.
    #[structopt(long = "port", default_value = "8545")]
    pub port: u16,

    /// The anvil executable name or path.
    #[structopt(long = "anvil", default_value = "anvil")]
    pub anvil: String,

    /// Overrides the hardfork derived from the block header.
    /// Available arguments: `berlin`, `london`, `shanghai`, `cancun`, `prague`.
    #[structopt(long = "hardfork")]
    pub hardfork: Option<ef_debugger::Hardfork>,

    /// Excludes an extra address from the post-state check.
    #[structopt(long = "skip-address")]
    pub skip_addresses: Vec<Address>,

    /// The delay between the anvil launch and the first RPC call.
    #[structopt(long = "startup-delay-ms", default_value = "1000")]
    pub startup_delay_ms: u64,

    /// The transaction receipt polling interval.
    #[structopt(long = "poll-interval-ms", default_value = "100")]
    pub poll_interval_ms: u64,

    /// Stops anvil right after the post-state check.
    #[structopt(long = "no-wait")]
    pub no_wait: bool,

    /// Prints the `cast run` trace of every replayed transaction.
    #[structopt(long = "trace")]
    pub trace: bool,
}

impl Arguments {
    ///
    /// A shortcut constructor.
    ///
    pub fn new() -> Self {
        Self::from_args()
    }
}
