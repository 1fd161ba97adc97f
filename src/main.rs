use clap::{Parser, Subcommand};
use site_assembler::thumbnail::ConvertThumbnailer;
use site_assembler::{assemble, config, gallery, invocation, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(clap::Args, Clone)]
struct GalleryArgs {
    /// Directory holding the screenshots
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Actually rename files. Without it the plan is printed and nothing changes.
    #[arg(long)]
    confirm: bool,
}

#[derive(Parser)]
#[command(name = "site-assembler")]
#[command(about = "Assemble multi-language static pages and screenshot galleries")]
#[command(long_about = "\
Assemble multi-language static pages and screenshot galleries

Site structure:

  site/
  ├── site.toml                # Languages and paths (optional)
  ├── bits/
  │   ├── en/head.html         # Header, may use EN_URL, FR_URL, EN_TXT, FR_TXT
  │   ├── en/foot.html
  │   ├── fr/head.html
  │   └── fr/foot.html
  └── pages/
      ├── en/about.html        # → about.html (default language)
      └── fr/about.html        # → about.fr.html

Each output page is head + page + foot. In the header, <CODE>_URL becomes
the current page's name in that language and <CODE>_TXT its label.

Run 'site-assembler gen-config' to print a documented site.toml.")]
#[command(version = env!("SITE_ASSEMBLER_VERSION"))]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/site.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble every page of every language
    Pages,
    /// Validate the site layout and list the pages that would be written
    Check,
    /// Rename screenshots, create thumbnails and write the gallery fragment
    Gallery(GalleryArgs),
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Pages => {
            let site_config = prepare(&cli.root, cli.config.as_deref())?;
            println!("==> Assembling pages in {}", cli.root.display());
            let report = assemble::assemble(&cli.root, &site_config, |event| {
                output::print_assemble_event(&event)
            })?;
            output::print_assemble_summary(&report);
        }
        Command::Check => {
            let site_config = prepare(&cli.root, cli.config.as_deref())?;
            println!("==> Checking {}", cli.root.display());
            let planned = assemble::plan(&cli.root, &site_config)?;
            output::print_plan(&planned);
            println!("==> Site layout is valid");
        }
        Command::Gallery(args) => {
            let site_config = prepare(&cli.root, cli.config.as_deref())?;
            println!("==> Building gallery in {}", args.dir.display());
            let thumbnailer = ConvertThumbnailer::from_config(&site_config.gallery);
            let report = gallery::build(
                &args.dir,
                &site_config.gallery,
                &thumbnailer,
                args.confirm,
                |event| output::print_gallery_event(&event),
            )?;
            output::print_gallery_summary(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Refuse non-shell contexts, then load the site config.
///
/// The guard runs before any file is read.
fn prepare(
    root: &Path,
    config_override: Option<&Path>,
) -> Result<config::SiteConfig, Box<dyn std::error::Error>> {
    invocation::ensure_shell()?;
    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(config::CONFIG_FILE));
    Ok(config::load_config(&config_path)?)
}
