use clap::Parser;
use event_harvest::output::DEFAULT_OUTPUT_FILE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "event-harvest")]
#[command(about = "Crawls event listing sites and extracts normalized event records")]
#[command(version)]
pub struct Args {
    /// Built-in site name (see --list-sites) or path to a site profile JSON file
    #[arg(required_unless_present = "list_sites")]
    pub site: Option<String>,

    /// Maximum number of pages rendered at the same time
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Override the crawl depth from the site profile
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Follow links to other hosts
    #[arg(long)]
    pub allow_external: bool,

    /// WebDriver server to render pages with
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// File the events are written to (they are also printed to stdout)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Print the built-in site names and exit
    #[arg(long)]
    pub list_sites: bool,
}
