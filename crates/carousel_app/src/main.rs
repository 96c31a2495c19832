mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Terminal news carousel for a site's page library.
#[derive(Debug, Parser)]
#[command(name = "news_carousel", version, about)]
pub struct Args {
    /// RON configuration file.
    #[arg(short, long, default_value = "news_carousel.ron")]
    pub config: PathBuf,

    /// Site URL, overriding the configuration file.
    #[arg(long)]
    pub site_url: Option<String>,

    /// Also log to the terminal.
    #[arg(long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    platform::run_app(Args::parse())
}
