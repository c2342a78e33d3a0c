use clap::Parser;
use konnect_common::settings::Settings;

use crate::error::{CliError, CliResult};

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Watch a single namespace.
    #[arg(short, long)]
    pub namespace: Option<String>,
}

pub async fn run(args: RunArgs, config: &Settings) -> CliResult {
    if config.konnect.token.is_empty() {
        return Err(CliError::InitConfig(
            "konnect.token is not set (KSYNC__KONNECT__TOKEN)".to_string(),
        ));
    }

    let mut settings = config.clone();
    if args.namespace.is_some() {
        settings.operator.namespace = args.namespace;
    }
    konnect_operator::operator(&settings).await?;
    Ok(())
}
