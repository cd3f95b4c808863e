//! `xmlconf`: inspect the W3C XML conformance suite and run parsers against it.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod logging;

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "xmlconf", version, about = "W3C XML conformance suite harness")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Configuration file (default: ./xmlconf.toml, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Flattened suite description
    #[arg(long, global = true)]
    suite: Option<String>,

    /// Directory or URL fixture paths are resolved against
    #[arg(long, global = true)]
    document_base: Option<String>,

    /// Tests decided or run concurrently
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// perfect, xmllint or quick-xml
    #[arg(long, global = true)]
    driver: Option<String>,

    /// base, sax, whatwg, xmllint or chrome
    #[arg(long, global = true)]
    selection: Option<String>,

    /// More logging; repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Frequency of each value of a test property
    Values {
        /// Property name (version, recommendation, editions, sections,
        /// productions, entities, testType) or, with --attribute, a raw
        /// attribute name
        name: String,

        /// Count raw attribute values instead of derived properties
        #[arg(long)]
        attribute: bool,
    },
    /// List tests whose fixture starts with a byte order mark
    FindBom {
        #[arg(long, value_enum, default_value_t = BomMethod::GetHasBom)]
        method: BomMethod,
    },
    /// Show one test
    Dump {
        id: String,

        #[arg(long, value_enum, default_value_t = DumpAspect::Definition)]
        aspect: DumpAspect,
    },
    /// Print the handling of every test for the configured selection
    Handling,
    /// Run the configured driver over the suite
    Run {
        /// Also write the results as JSON
        #[arg(long)]
        results: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BomMethod {
    /// Ask the test model
    GetHasBom,
    /// Read the first two bytes of the fixture file
    Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DumpAspect {
    /// The serialized test record, as JSON
    Definition,
    /// The fixture text
    File,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            suite: self.suite.clone(),
            document_base: self.document_base.clone(),
            batch_size: self.batch_size,
            driver: self.driver.clone(),
            selection: self.selection.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("xmlconf: {err}");
            return ExitCode::from(2);
        }
    };
    config.apply(cli.global.overrides());

    let level = match config.log_level() {
        Ok(level) => logging::level_for(cli.global.verbose, level),
        Err(err) => {
            eprintln!("xmlconf: {err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = logging::init(level) {
        eprintln!("xmlconf: {err}");
    }

    match commands::execute(cli.command, &config).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("xmlconf: {err}");
            ExitCode::from(2)
        }
    }
}
