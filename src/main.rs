use clap::{Parser, Subcommand};
use folio::lightbox::Lightbox;
use folio::loader::{ContentLoader, HttpFetch};
use folio::location::Location;
use folio::{config, generate, output};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::Level;

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Photography portfolio site: content manifest, series lightbox, static pages")]
#[command(long_about = "\
Photography portfolio site: content manifest, series lightbox, static pages

The site is described by a single JSON manifest. Images and any other assets
sit next to it and are copied to the output as-is.

Source structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── content.json                 # Hero image, featured cards, series
  └── images/
      ├── cover/cover.jpg          # Fallback hero
      └── river/01.jpg             # Paths are relative to the site root

Generated pages:

  index.html                       # Hero + featured cards
  series.html                      # Series list, #<slug> opens the lightbox
  series/<n>/<i>.html              # Lightbox on image i of the n-th series
  404.html

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site source directory (manifest, config.toml, images)
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log manifest loading and lightbox activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the static site into the output directory
    Build,
    /// Load and validate the manifest without building
    Check,
    /// Step through a series in the terminal
    Browse {
        /// Series slug
        slug: String,
        /// 0-based image to start at
        #[arg(long, default_value_t = 0)]
        start: usize,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = generate::build(&cli.source, &cli.output, &site_config)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            let loader = manifest_loader(&cli.source, &site_config, "index.html")?;
            println!("==> Checking {}", loader.url());
            let manifest = loader.load()?;
            let issues = manifest.validate();
            output::print_check_output(manifest, &issues);
            if issues.is_empty() {
                println!("==> Content is valid");
            }
        }
        Command::Browse { slug, start } => {
            let site_config = config::load_config(&cli.source)?;
            let loader = manifest_loader(&cli.source, &site_config, "series.html")?;
            let manifest = loader.load()?;
            let series = manifest
                .find_series(&slug)
                .ok_or_else(|| format!("no series with slug '{slug}'"))?;

            let location = page_location(&cli.source, "series.html")?;
            let mut lightbox = Lightbox::bind(Some(output::TerminalView::stdout()), location)
                .ok_or("terminal lightbox could not be bound")?;
            lightbox.open(series, start)?;
            println!("{}", output::format_browse_help());

            for line in std::io::stdin().lock().lines() {
                match output::parse_browse_command(&line?) {
                    Some(event) => {
                        lightbox.handle(event);
                    }
                    None => println!("{}", output::format_browse_help()),
                }
                if !lightbox.is_open() {
                    break;
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Structured logs go to stderr so stdout stays the command's output.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Location of `page` inside the source directory. `base_href` is left out:
/// it names the published path, not a local one.
fn page_location(source: &std::path::Path, page: &str) -> Result<Location, Box<dyn std::error::Error>> {
    let source = std::path::absolute(source)?;
    Ok(Location::in_directory(&source, page)?)
}

fn manifest_loader(
    source: &std::path::Path,
    site_config: &config::SiteConfig,
    page: &str,
) -> Result<ContentLoader, Box<dyn std::error::Error>> {
    let location = page_location(source, page)?;
    let fetcher = HttpFetch::new(site_config.fetch.timeout())?;
    Ok(ContentLoader::for_location(fetcher, &location, &site_config.manifest)?)
}
