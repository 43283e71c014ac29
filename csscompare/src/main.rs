use anyhow::Context;
use clap::{Parser, Subcommand};
use csscompare_lib::paths::{path_exists, reference_css_path, SASS_COMPILED_CSS_REFERENCE_DIR};
use csscompare_lib::release::download::download_file;
use csscompare_lib::release::http::{HttpClient, ReqwestClient};
use csscompare_lib::release::tag_data::{fetch_tag_data, TagData};
use csscompare_lib::style::normalize::normalize_file;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "csscompare")]
#[command(about = "Prepare Sass-compiled Bootstrap CSS for diffing against the Less port")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding `bootstrap-<version>.css`, with a trailing separator.
    #[arg(long, env = "CSSCOMPARE_REFERENCE_DIR", default_value = SASS_COMPILED_CSS_REFERENCE_DIR)]
    reference_dir: String,
}

#[derive(Subcommand)]
enum Command {
    /// Format the Sass-compiled CSS of a Bootstrap version in place
    Format {
        /// Bootstrap version, e.g. 4.5.0 (defaults to the latest tag)
        version: Option<String>,
    },
    /// Download the source archive of a Bootstrap version
    Download {
        /// Bootstrap version, e.g. 4.5.0 (defaults to the latest tag)
        version: Option<String>,

        /// Existing directory to save the archive in, with a trailing separator.
        #[arg(long, default_value = "./")]
        dir: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse the args given in terminal
    let args: Args = Args::parse();
    let client = ReqwestClient::new().context("Error creating HTTP client")?;

    match args.command {
        Command::Format { version } => format_css(&client, &args.reference_dir, version),
        Command::Download { version, dir } => download(&client, version, &dir),
    }
}

fn resolve_tag(client: &dyn HttpClient, version: Option<String>) -> anyhow::Result<TagData> {
    let tag = fetch_tag_data(client, version.as_deref()).with_context(|| {
        format!(
            "Error fetching Bootstrap tag data for version {}",
            version.as_deref().unwrap_or("latest")
        )
    })?;
    log::debug!("Resolved Bootstrap tag {}", tag.name);
    Ok(tag)
}

fn format_css(
    client: &dyn HttpClient,
    reference_dir: &str,
    version: Option<String>,
) -> anyhow::Result<ExitCode> {
    let tag = resolve_tag(client, version)?;
    let css_path = reference_css_path(reference_dir, &tag.name);

    if !path_exists(&css_path) {
        eprintln!(
            "Path \"{}\" does not exist. Have you copied the Bootstrap CSS file to the reference directory yet?",
            css_path.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    println!("Formatting Sass-compiled CSS...");
    normalize_file(&css_path)?;
    println!("Done.");

    Ok(ExitCode::SUCCESS)
}

fn download(client: &dyn HttpClient, version: Option<String>, dir: &str) -> anyhow::Result<ExitCode> {
    let tag = resolve_tag(client, version)?;
    let name = format!("bootstrap-{}", tag.name);

    let archive = download_file(client, &tag.zipball_url, dir, &name)
        .with_context(|| format!("Error downloading {}", tag.zipball_url))?;
    println!("{}", archive.display());

    Ok(ExitCode::SUCCESS)
}
