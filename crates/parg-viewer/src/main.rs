use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use parg_host::asset::{AssetFetcher, AssetKind, FailurePolicy};
use parg_host::core::{capture_path, HostApp, HostConfig};
use parg_host::logging::{init_logging, LoggingConfig};
use parg_host::time::DrawPolicy;
use parg_host::window::Runtime;

mod pulse;

use pulse::Pulse;

/// Engine memory reserved by the demo engine.
const ENGINE_MEMORY: usize = 64 * 1024 * 1024;

/// Runs the demo engine in a window after loading the given assets.
#[derive(Debug, Parser)]
#[command(name = "parg-viewer", version)]
struct Args {
    /// Asset base: an http(s) URL prefix or a local directory prefix.
    #[arg(long, default_value = "parg/")]
    base: String,

    /// Image asset to load; decoded to RGBA8 before transfer. Repeatable.
    #[arg(long = "image", value_name = "ID")]
    images: Vec<String>,

    /// Binary asset to load verbatim. Repeatable.
    #[arg(long = "binary", value_name = "ID")]
    binaries: Vec<String>,

    /// Mirror input into a second engine.
    #[arg(long)]
    linked: bool,

    /// Refuse to start if any asset fails.
    #[arg(long)]
    abort_on_failure: bool,

    /// Only draw frames the engine asks for.
    #[arg(long)]
    draw_on_request: bool,

    /// Arguments passed through to the engine's init. `-capture <file>` also
    /// writes the first drawn frame to a PNG and exits.
    #[arg(last = true)]
    engine_args: Vec<String>,
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let args = Args::parse();

    let capture = capture_path(&args.engine_args);
    let mut config = HostConfig::new()
        .title("parg-viewer")
        .asset_base(args.base)
        .engine_args(args.engine_args)
        .failure_policy(if args.abort_on_failure {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Proceed
        })
        .draw_policy(if args.draw_on_request {
            DrawPolicy::OnRequest
        } else {
            DrawPolicy::Always
        });
    if let Some(path) = capture {
        config = config.capture(path);
    }

    let fetcher = AssetFetcher::new(config.asset_source());
    let mut app = HostApp::new(config, Pulse::new("primary", ENGINE_MEMORY));

    for id in args.images {
        app.declare(id, AssetKind::Image).context("invalid asset list")?;
    }
    for id in args.binaries {
        app.declare(id, AssetKind::Binary).context("invalid asset list")?;
    }

    let linked = args.linked.then(|| Rc::new(RefCell::new(Pulse::new("linked", 0))));
    if let Some(linked) = &linked {
        app.link(linked.clone());
    }

    Runtime::run(app, fetcher)?;

    if let Some(linked) = linked {
        log::info!("linked engine saw {} inputs", linked.borrow().inputs());
    }
    Ok(())
}
