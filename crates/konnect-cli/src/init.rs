use konnect_common::{
    error::CommonResult,
    settings::{set_config, Settings},
};

use crate::Cli;

/// `--settings` wins over `--root`; both default to the working directory.
pub fn init_config(cli: &Cli) -> CommonResult<&'static Settings> {
    let root = cli.settings.clone().or_else(|| cli.root.clone());
    set_config(Settings::from_root(root)?)
}
