use clap::Parser;
use konnect_common::{settings::Settings, BuildInfo};

use crate::error::CliResult;

#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Print settings as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InfoArgs, config: &Settings, build_info: BuildInfo) -> CliResult {
    println!("ksync {build_info}");

    let mut shown = config.clone();
    if !shown.konnect.token.is_empty() {
        shown.konnect.token = "<redacted>".to_string();
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        println!("server:    {}", shown.konnect.server_url);
        println!("namespace: {}", shown.operator.namespace.as_deref().unwrap_or("*"));
        println!("sync:      {}s", shown.operator.sync_period_secs);
        println!("log level: {}", shown.log_level);
    }
    Ok(())
}
