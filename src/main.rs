use clap::Parser;
use event_harvest::{CrawlError, Harvest, SiteProfile, output};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if args.list_sites {
        for name in SiteProfile::builtin_names() {
            println!("{}", name);
        }
        return;
    }

    if let Err(e) = run(args).await {
        ::log::error!("Harvest failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CrawlError> {
    let site = args.site.as_deref().unwrap_or_default();
    let profile = SiteProfile::resolve(site)?;
    ::log::info!("Loaded site profile {}", profile.name);

    let mut harvest = Harvest::new(profile);
    if let Some(concurrency) = args.concurrency {
        harvest = harvest.with_max_concurrency(concurrency);
    }
    if let Some(max_depth) = args.max_depth {
        harvest = harvest.with_max_depth(max_depth);
    }
    if args.allow_external {
        harvest = harvest.with_allow_external(true);
    }
    if let Some(url) = args.webdriver_url.as_deref().filter(|url| !url.is_empty()) {
        harvest = harvest.with_webdriver_url(url);
    }

    let start_time = std::time::Instant::now();
    let summary = harvest.run().await?;
    ::log::info!(
        "Harvested {} event(s) in {:.2} seconds ({} page(s) failed)",
        summary.records.len(),
        start_time.elapsed().as_secs_f64(),
        summary.failures.len()
    );

    output::emit(&summary.records, &args.output)
}
