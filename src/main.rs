use clap::{Parser, Subcommand};
use qrstyle::config::{self, AppConfig};
use qrstyle::gallery::Gallery;
use qrstyle::output::{self, GenerateReport};
use qrstyle::render::RasterEngine;
use qrstyle::session::Session;
use qrstyle::store::{FileStore, RecordStore};
use qrstyle::types::{Color, ContentMode, CornerStyle, DotPattern};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "qrstyle")]
#[command(about = "Styled QR code generator with a local gallery")]
#[command(long_about = "\
Styled QR code generator with a local gallery

Encode text or a URL, style it (colours, module shapes, finder corners, size,
center logo), download it as a PNG and keep it in a gallery that persists in
the data directory.

Examples:

  qrstyle generate 'hello world' --download out/
  qrstyle generate https://example.com --url --dots rounded --fg '#1a73e8' --save
  qrstyle generate https://example.com --url --logo logo.png --preview preview.png
  qrstyle list
  qrstyle delete 1772884800000

Logging goes to stderr; set RUST_LOG=debug to see every render pass.

Run 'qrstyle gen-config' to generate a documented qrstyle.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "qrstyle.toml", global = true)]
    config: PathBuf,

    /// Directory holding the gallery store
    #[arg(long, default_value = ".qrstyle", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Text or URL to encode
    content: String,

    /// Treat the content as a URL
    #[arg(long)]
    url: bool,

    /// Foreground colour (#rgb or #rrggbb)
    #[arg(long)]
    fg: Option<Color>,

    /// Background colour (#rgb or #rrggbb)
    #[arg(long)]
    bg: Option<Color>,

    /// Requested edge length in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Dot pattern: square, dots, rounded, classy, classy-rounded, extra-rounded
    #[arg(long)]
    dots: Option<DotPattern>,

    /// Finder corner style: square, dot, extra-rounded
    #[arg(long)]
    corners: Option<CornerStyle>,

    /// Image to place in the center
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Preview container width in pixels
    #[arg(long)]
    viewport: Option<u32>,

    /// Write the PNG into this directory
    #[arg(long)]
    download: Option<PathBuf>,

    /// Save the result to the gallery
    #[arg(long)]
    save: bool,

    /// Mirror the render into this PNG file
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Render a styled QR code
    Generate(GenerateArgs),
    /// List the saved gallery
    List,
    /// Delete a saved QR code
    Delete {
        /// Id of the saved record
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print a stock qrstyle.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            let config = config::load_config(&cli.config)?;
            run_generate(&config, &cli.data_dir, args)?;
        }
        Command::List => {
            let config = config::load_config(&cli.config)?;
            let session = open_session(&config, &cli.data_dir, RasterEngine::new("."));
            output::print_gallery(&session.gallery_view());
        }
        Command::Delete { id, yes } => {
            let config = config::load_config(&cli.config)?;
            let mut session = open_session(&config, &cli.data_dir, RasterEngine::new("."));
            if session.request_delete(id).is_none() {
                return Err(format!("no saved QR code with id {id}").into());
            }
            let confirmed = yes || confirm(session.delete_prompt().as_deref().unwrap_or_default())?;
            let deleted = if confirmed {
                session.confirm_delete()?.is_some()
            } else {
                session.cancel_delete();
                false
            };
            println!("{}", output::format_delete_outcome(id, deleted));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn open_session(
    config: &AppConfig,
    data_dir: &Path,
    engine: RasterEngine,
) -> Session<RasterEngine, FileStore> {
    let store = FileStore::open(data_dir.join(&config.gallery.store_file));
    let gallery = Gallery::new(RecordStore::new(store, config.gallery.storage_key.clone()));
    Session::new(config, engine, gallery)
}

/// Apply every style flag while still idle, then generate once.
fn run_generate(
    config: &AppConfig,
    data_dir: &Path,
    args: GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let download_dir = args.download.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut engine = RasterEngine::new(&download_dir);
    if let Some(preview) = &args.preview {
        engine = engine.with_surface(preview);
    }
    let mut session = open_session(config, data_dir, engine);

    if args.url {
        session.switch_mode(ContentMode::Url);
    }
    session.set_input(args.content);
    if let Some(color) = args.fg {
        session.set_foreground(color)?;
    }
    if let Some(color) = args.bg {
        session.set_background(color)?;
    }
    if let Some(px) = args.size {
        session.set_size(px)?;
    }
    if let Some(pattern) = args.dots {
        session.set_dot_pattern(pattern)?;
    }
    if let Some(style) = args.corners {
        session.set_corner_style(style)?;
    }
    if let Some(width) = args.viewport {
        session.resize(width)?;
    }
    if let Some(logo) = &args.logo {
        session.select_logo(logo);
        session.wait_for_logo()?;
    }
    session.generate()?;

    let mut download = None;
    if args.download.is_some() {
        session.download();
        let path = download_dir.join(format!("{}.png", session.download_name()));
        if path.exists() {
            download = Some(path);
        }
    }
    let saved = if args.save {
        session.save_to_gallery()?
    } else {
        None
    };

    let report = GenerateReport {
        preview: args.preview.as_deref(),
        download: download.as_deref(),
        saved: saved.as_ref(),
    };
    output::print_generate_output(
        &session.style().render_options(),
        &report,
        config.gallery.label_chars,
    );
    Ok(())
}

/// Ask `Delete <label>? [y/N]` on stdout and read the answer from stdin.
fn confirm(label: &str) -> std::io::Result<bool> {
    print!("Delete {label}? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
