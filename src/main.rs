use konnect_cli::exec;
use konnect_common::BuildInfo;

const BUILD_INFO: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    build_date: option_env!("VERGEN_BUILD_DATE"),
    git_sha: option_env!("VERGEN_GIT_SHA"),
};

#[tokio::main]
async fn main() {
    // Tracing may not be up yet if settings failed to load.
    if let Err(e) = exec(BUILD_INFO).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
