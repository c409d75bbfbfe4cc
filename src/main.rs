//! Headless probe: builds a preview node, loads its image and prints the draw calls.
//!
//! Usage examples:
//!   source-preview --image cat.png
//!   source-preview --source url --url https://example.com/a.png --width 512 --height 600
//!   source-preview --input-dir ./input --upload ~/Pictures/dog.jpg

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use node_host::{DisplayList, DrawCommand, NodeHooks, Size};
use web_time::Instant;

use source_preview::config::{ConfigError, LogLevel, PreviewConfig};
use source_preview::constants::{
    IMAGE_WIDGET, NODE_DISPLAY_NAME, SOURCE_WIDGET, UPLOAD_BUTTON, URL_WIDGET, is_image_filename,
};
use source_preview::extension::{DialogPicker, FilePicker, FixedPicker};
use source_preview::files::{FileService, HttpFileService, LocalFileService};
use source_preview::loader::{FetchThread, Fetcher};
use source_preview::node::standard_node;
use source_preview::validate::{InputError, validate_source};
use source_preview::{PreviewError, PreviewExtension, PreviewNode, SourceMode};

/// Preview a `LoadImageFileOrURL` node without an editor.
#[derive(Parser, Debug)]
#[command(name = "source-preview", version, about)]
struct CliArgs {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Editor server address
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Use this input directory instead of a server
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Source mode: file or url
    #[arg(long, default_value = "file")]
    source: String,

    /// Input file name (file mode)
    #[arg(long)]
    image: Option<String>,

    /// Image URL (url mode)
    #[arg(long)]
    url: Option<String>,

    /// Upload this file and preview it (file mode)
    #[arg(long, value_name = "FILE")]
    upload: Option<PathBuf>,

    /// Choose the file to upload in a native dialog (file mode)
    #[arg(long, conflicts_with = "upload")]
    pick: bool,

    /// Node width
    #[arg(long, default_value_t = 400.0)]
    width: f32,

    /// Node height
    #[arg(long, default_value_t = 500.0)]
    height: f32,

    /// Read timeout for fetches, and how long to wait for the image, in seconds
    /// (defaults to the configured read timeout)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("No image loaded (waited up to {0:?})")]
    NoImage(Duration),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &CliArgs) -> Result<PreviewConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => PreviewConfig::load(path)?,
        None => PreviewConfig::default_path()
            .map(|path| PreviewConfig::load_or_default(&path))
            .unwrap_or_default(),
    };

    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(dir) = &args.input_dir {
        config.server.input_dir = Some(dir.clone());
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(secs) = args.timeout_secs {
        config.server.read_timeout_secs = secs;
    }
    Ok(config)
}

fn run(args: &CliArgs, config: &PreviewConfig) -> Result<(), ProbeError> {
    let files: Arc<dyn FileService> = match &config.server.input_dir {
        Some(dir) => Arc::new(LocalFileService::new(dir)),
        None => Arc::new(HttpFileService::from_config(&config.server)),
    };

    let mode = SourceMode::from_selector(Some(&args.source));
    let uploading = args.upload.is_some() || args.pick;
    let inputs = match files.list_inputs() {
        Ok(names) => names.into_iter().filter(|n| is_image_filename(n)).collect(),
        Err(e) if mode == SourceMode::Url || uploading => {
            log::warn!("Could not list input files: {}", e);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let image = args.image.clone().or_else(|| inputs.first().cloned());
    if !uploading {
        validate_source(mode, image.as_deref(), args.url.as_deref(), &inputs)?;
    }

    let picker: Box<dyn FilePicker> = if args.pick {
        Box::new(DialogPicker)
    } else {
        Box::new(FixedPicker(args.upload.clone()))
    };

    let loader = FetchThread::spawn(Arc::clone(&files), Fetcher::from_config(&config.server))?;
    let extension = PreviewExtension::new(
        config,
        Box::new(loader),
        Arc::clone(&files),
        picker,
    );

    let mut node = standard_node(Size::new(args.width, args.height), inputs);
    node.widgets.set_value(SOURCE_WIDGET, mode.as_str());
    if let Some(image) = &image {
        node.widgets.set_value(IMAGE_WIDGET, image.as_str());
    }
    if let Some(url) = &args.url {
        node.widgets.set_value(URL_WIDGET, url.as_str());
    }

    log::info!("Probing {} node in {} mode", NODE_DISPLAY_NAME, mode);
    let mut preview = PreviewNode::new(node, NodeHooks::new(), extension);
    preview.create();
    if uploading {
        preview.click(UPLOAD_BUTTON);
    }

    let timeout = Duration::from_secs(config.server.read_timeout_secs);
    let deadline = Instant::now() + timeout;
    loop {
        preview.tick(Instant::now());

        let ext = preview.extension();
        let busy = ext.controller().state().cache.slot(preview.mode()).is_in_flight()
            || ext.uploads().pending_count() > 0;
        if !busy || Instant::now() >= deadline {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    let Some(image) = preview.current_image() else {
        return Err(ProbeError::NoImage(timeout));
    };
    log::info!(
        "{} image loaded: {}x{}",
        preview.mode(),
        image.width(),
        image.height()
    );

    let mut surface = DisplayList::new();
    preview.draw(&mut surface);
    for command in surface.commands() {
        print_command(command);
    }
    Ok(())
}

fn print_command(command: &DrawCommand) {
    match command {
        DrawCommand::Image { natural, rect } => println!(
            "image {}x{} -> ({:.1}, {:.1}) {:.1}x{:.1}",
            natural.0, natural.1, rect.x, rect.y, rect.width, rect.height
        ),
        DrawCommand::FillColor(color) => println!("fill {}", color.to_hex()),
        DrawCommand::Font(font) => println!("font {}", font),
        DrawCommand::TextAlign(align) => println!("align {:?}", align),
        DrawCommand::Text { text, position } => {
            println!("text {:?} at ({:.1}, {:.1})", text, position.x, position.y)
        }
    }
}
