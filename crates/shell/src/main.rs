//! Debug overlay shell: runs scripts against a blank page with the overlay
//! installed and prints what ended up in the document.

use anyhow::{Context, Result};
use clap::Parser;
use dom::Document;
use js_engine::ScriptHost;
use overlay::{OverlayConfig, OverlayContext};
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

/// Run scripts with the in-page debug overlay installed
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scripts to run, in order
    scripts: Vec<PathBuf>,

    /// Document URL
    #[arg(long, default_value = "about:blank")]
    url: String,

    /// Attach the panel before running scripts
    #[arg(long)]
    enable: bool,

    /// Slide the panel onscreen after attaching it
    #[arg(long, requires = "enable")]
    show: bool,

    /// Use the compact panel preset
    #[arg(long, conflicts_with = "config")]
    compact: bool,

    /// Overlay configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script to run before the overlay is installed
    #[arg(long)]
    prelude: Option<PathBuf>,

    /// Keep running scripts after an uncaught error
    #[arg(long)]
    keep_going: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Dump the document as HTML when done
    #[arg(long)]
    dump_dom: bool,
}

impl Args {
    fn overlay_config(&self) -> Result<OverlayConfig> {
        if let Some(path) = &self.config {
            return OverlayConfig::from_json_file(path)
                .with_context(|| format!("loading overlay config {}", path.display()));
        }
        Ok(if self.compact {
            OverlayConfig::compact()
        } else {
            OverlayConfig::default()
        })
    }
}

fn read_script(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout belongs to the page's console.
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.overlay_config()?;
    let url = Url::parse(&args.url).with_context(|| format!("invalid document URL {}", args.url))?;
    let document = Document::new(url).into_shared();
    let overlay = OverlayContext::try_new(document.clone(), config)?;

    let prelude = match &args.prelude {
        Some(path) => read_script(path)?,
        None => String::new(),
    };
    let mut host = ScriptHost::with_prelude(overlay.clone(), &prelude)?;

    if args.enable {
        overlay.enable();
        if args.show {
            overlay.show();
        }
    }

    for path in &args.scripts {
        let source = read_script(path)?;
        let name = path.display().to_string();
        debug!("running {}", name);
        if let Err(err) = host.execute(&source, &name) {
            error!("{}: {}", name, err);
            if !args.keep_going {
                return Err(err.into());
            }
        }
    }

    info!(
        attached = overlay.is_enabled(),
        lines = overlay.panel().line_count(),
        "done"
    );

    if args.dump_dom {
        println!("{}", document.read().to_html());
    }

    Ok(())
}
