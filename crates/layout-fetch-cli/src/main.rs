mod commands;
mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use layout_fetch::{DEFAULT_GEOMETRY, InstallRequest, LayoutRef, ScratchMode};
use layout_fetch_oryx::{OryxClient, OryxClientConfig};

#[derive(Parser)]
#[command(name = "fetch-layout")]
#[command(about = "Fetch the latest revision of an Oryx layout and install it into a QMK firmware tree")]
struct Cli {
    /// Layout hash ID, as shown in the Oryx layout URL
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    hash_id: String,
    /// Path within keyboards/ up to the keymaps parent (e.g. ergodox_ez/shine)
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    keyboard_folder: String,
    /// Name of the keymap folder under keymaps/
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    keymap_folder: String,
    /// Layout geometry
    #[arg(long, default_value = DEFAULT_GEOMETRY)]
    geometry: String,
    /// Root of the QMK firmware checkout
    #[arg(long, env = "QMK_REPO_ROOT", default_value = ".")]
    repo_root: PathBuf,
    /// GraphQL endpoint of the layout service
    #[arg(long, env = "ORYX_GRAPHQL_URL")]
    endpoint: Option<String>,
    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
    /// Unpack into this directory and leave it behind instead of using a temporary one
    #[arg(long)]
    keep_scratch: Option<PathBuf>,
    /// Resolve the layout and print what would be installed, without downloading
    #[arg(long)]
    dry_run: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn install_request(&self) -> InstallRequest {
        let scratch = match &self.keep_scratch {
            Some(path) => ScratchMode::Keep(path.clone()),
            None => ScratchMode::Temporary,
        };

        InstallRequest::new(
            LayoutRef::latest(&self.hash_id, &self.geometry),
            &self.repo_root,
            &self.keyboard_folder,
            &self.keymap_folder,
        )
        .with_scratch(scratch)
    }

    fn client_config(&self) -> OryxClientConfig {
        OryxClientConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_json, telemetry::level_for(cli.verbose));

    let client = OryxClient::new(cli.client_config())?;
    let request = cli.install_request();

    if cli.dry_run {
        commands::plan::run(&client, &request).await
    } else {
        commands::install::run(&client, &request).await
    }
}
