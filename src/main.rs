use clap::Parser;
use cookidump::prompt::LinePrompter;
use cookidump::{RunOptions, ScrapeConfig};
use log::info;
use std::path::PathBuf;

/// Dump Cookidoo recipes from a valid account
#[derive(Parser, Debug)]
#[command(name = "cookidump")]
#[command(about = "Dump Cookidoo recipes from a valid account", long_about = None)]
struct Args {
    /// The path to the Chrome WebDriver file
    webdriverfile: PathBuf,

    /// The output directory
    outputdir: PathBuf,

    /// Create a separate JSON file for each recipe; otherwise, a single data file will be generated
    #[arg(short, long)]
    separate_json: bool,

    /// Save each recipe as a PDF
    #[arg(short = 'p', long)]
    export_pdf: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ScrapeConfig::load()?;

    let options = RunOptions {
        webdriver: args.webdriverfile,
        outputdir: args.outputdir,
        separate_json: args.separate_json,
        export_pdf: args.export_pdf,
    };

    let mut prompter = LinePrompter::stdio();
    let summary = cookidump::run(&options, &config, &mut prompter).await?;

    info!("{}", summary);
    info!("Goodbye!");
    Ok(())
}
