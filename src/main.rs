use clap::Parser;
use relcopy::format_error_with_help;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "relcopy")]
#[command(about = "Copy GitHub releases, with their assets, from one repository to another")]
#[command(version)]
struct Cli {
    /// Release tag to copy (omit with --all)
    tag: Option<String>,

    /// Source repository (owner/repo)
    #[arg(long, env = "RELCOPY_SOURCE_REPO")]
    source: Option<String>,

    /// Token used to read the source repository
    #[arg(long, env = "RELCOPY_SOURCE_TOKEN", hide_env_values = true)]
    source_token: Option<String>,

    /// Destination repository (owner/repo)
    #[arg(long, env = "RELCOPY_DEST_REPO")]
    dest: Option<String>,

    /// Token used to write the destination repository
    #[arg(long, env = "RELCOPY_DEST_TOKEN", hide_env_values = true)]
    dest_token: Option<String>,

    /// API base URL of the source host
    #[arg(long, env = "RELCOPY_SOURCE_API_URL")]
    source_api_url: Option<String>,

    /// Upload base URL of the source host
    #[arg(long, env = "RELCOPY_SOURCE_UPLOAD_URL")]
    source_upload_url: Option<String>,

    /// API base URL of the destination host
    #[arg(long, env = "RELCOPY_DEST_API_URL")]
    dest_api_url: Option<String>,

    /// Upload base URL of the destination host
    #[arg(long, env = "RELCOPY_DEST_UPLOAD_URL")]
    dest_upload_url: Option<String>,

    /// Directory assets are staged in between download and upload
    #[arg(long, env = "RELCOPY_STAGING_DIR")]
    staging_dir: Option<PathBuf>,

    /// Only copy assets whose name matches one of these patterns
    #[arg(short = 'f', long, env = "RELCOPY_ASSET_FILTER", value_delimiter = ',')]
    asset_filter: Vec<String>,

    /// Pattern to replace in the release notes
    #[arg(long, env = "RELCOPY_BODY_PATTERN")]
    body_pattern: Option<String>,

    /// Replacement for --body-pattern (matches are removed when omitted)
    ///
    /// `$1` or `${name}` inserts a capture group and `$$` a literal `$`.
    /// A group the pattern lacks, such as a bare `$5`, inserts nothing.
    #[arg(long, env = "RELCOPY_BODY_REPLACEMENT")]
    body_replacement: Option<String>,

    /// Copy every source release missing at the destination
    #[arg(short, long, env = "RELCOPY_COPY_ALL")]
    all: bool,

    /// Processing order for --all: semver or date
    #[arg(long, env = "RELCOPY_SORT")]
    sort: Option<String>,

    /// Check what would be copied without downloading or uploading
    #[arg(long, env = "RELCOPY_DRY_RUN")]
    dry_run: bool,

    /// YAML configuration file
    #[arg(short, long, env = "RELCOPY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_filter = if cli.verbose {
        "relcopy=debug"
    } else {
        "relcopy=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = cli::copy::run(cli::copy::CopyOptions {
        config_file: cli.config,
        tag: cli.tag,
        source: cli.source,
        source_token: cli.source_token,
        source_api_url: cli.source_api_url,
        source_upload_url: cli.source_upload_url,
        dest: cli.dest,
        dest_token: cli.dest_token,
        dest_api_url: cli.dest_api_url,
        dest_upload_url: cli.dest_upload_url,
        staging_dir: cli.staging_dir,
        asset_filter: cli.asset_filter,
        body_pattern: cli.body_pattern,
        body_replacement: cli.body_replacement,
        all: cli.all,
        sort: cli.sort,
        dry_run: cli.dry_run,
    })
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
