use std::path::PathBuf;

use clap::Parser;
use konnect_common::{tracing::setup_tracing, BuildInfo};
use log::LevelFilter;

use crate::{error::CliResult, init::init_config};

mod info;
mod run;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory holding `config.*` files.
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Overrides `log_level` from the settings.
    #[clap(short('l'), long, value_name("LEVEL"))]
    pub log_level: Option<LevelFilter>,

    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Parser, Clone)]
pub enum Command {
    #[command(about = "Run the Konnect controllers", alias = "r")]
    Run(run::RunArgs),
    #[command(about = "Show build information and effective settings")]
    Info(info::InfoArgs),
}

pub async fn exec(build_info: BuildInfo) -> CliResult {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let cfg = init_config(&cli)?;

    let level = match (cli.verbose, cli.log_level) {
        (_, Some(level)) => level,
        (true, None) => LevelFilter::Debug,
        (false, None) => cfg.log_level,
    };
    setup_tracing(level)?;
    konnect_common::debug!(version = %build_info, "starting ksync");

    match cli.cmd {
        Command::Run(args) => run::run(args, cfg).await?,
        Command::Info(args) => info::run(args, cfg, build_info)?,
    }
    Ok(())
}
