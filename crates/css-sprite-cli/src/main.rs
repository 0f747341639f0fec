use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser};
use css_sprite_core::crush::{Compressor, PngCrush};
use css_sprite_core::{
    Direction, Sheet, SourceImage, SpriteConfig, pack_images, save_sheet, stats_json, to_css,
    to_json,
};
use handlebars::Handlebars;
use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

mod sources;

#[derive(Parser, Debug)]
#[command(
    name = "css-sprite",
    about = "CSS sprites generator: join images into one sheet and write the matching stylesheet",
    version,
    author
)]
struct Cli {
    // Input/Output
    /// Image files to join, in this order (used when neither --filelist nor --glob is given)
    #[arg(help_heading = "Input/Output")]
    files: Vec<PathBuf>,
    /// Read input image list from file (one path per line, order is kept)
    #[arg(short = 'f', long, value_name = "FILENAME", help_heading = "Input/Output")]
    filelist: Option<PathBuf>,
    /// File pattern like '*.png' (matches are sorted by path)
    #[arg(short = 'g', long, value_name = "PATTERN", help_heading = "Input/Output")]
    glob: Option<String>,
    /// Master output file name [default: master.png]
    #[arg(short = 'm', long, value_name = "FILENAME", help_heading = "Input/Output")]
    master: Option<String>,
    /// YAML config file path (overrides the options above)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Use vertically positioned images (default is horizontal)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    vertical: bool,

    // Export
    /// Crush master image file size (PNG only, runs pngcrush)
    #[arg(short = 'c', long, default_value_t = false, help_heading = "Export")]
    crush: bool,
    /// External stylesheet template file (handlebars) used instead of the built-in CSS rules
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Export sprite placements (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_json: Option<PathBuf>,
    /// Export sheet stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: load and pack the images but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,

    /// Show a progress bar while loading images (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    // No options at all: show usage and exit cleanly.
    if std::env::args_os().len() <= 1 {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    run_sprite(&cli, cli.progress && !cli.quiet)
}

fn run_sprite(cli: &Cli, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;
    cfg.validate()?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = sources::resolve_inputs(&cfg)?;
    if paths.is_empty() {
        info!("No input files. Exiting.");
        return Ok(());
    }

    let images = load_images_with_progress(&paths, show_progress)?;
    info!(count = images.len(), "joining {} images", images.len());
    let out = pack_images(&images, cfg.direction)?;
    info!(summary = %out.stats().summary(), "packed");

    // Render before touching the filesystem so a bad template leaves no half-written output.
    let css = render_stylesheet(cli.template.as_deref(), &out.sheet, &cfg.master_name)?;
    let master_path = cfg.master_path();
    let css_path = cfg.stylesheet_path();

    if cli.dry_run {
        for p in &out.sheet.placements {
            info!(name = %p.name, offset = p.offset, width = p.width, height = p.height, "placement");
        }
        info!(?master_path, ?css_path, "dry run, nothing written");
        return Ok(());
    }

    info!(?master_path, "saving master");
    save_sheet(&out.rgba, &master_path)
        .with_context(|| format!("write {}", master_path.display()))?;
    if let Ok(meta) = fs::metadata(&master_path) {
        info!(bytes = meta.len(), "final size is {} bytes", meta.len());
    }

    if cfg.crush {
        crush_master(&PngCrush::new(), &master_path);
    }

    info!(?css_path, "writing stylesheet");
    fs::write(&css_path, css).with_context(|| format!("write {}", css_path.display()))?;

    if let Some(json_path) = &cli.export_json {
        let value = to_json(&out.sheet, &cfg.master_name);
        fs::write(json_path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, "placements exported");
    }
    if let Some(stats_path) = &cli.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats_json(&out.sheet))?)
            .with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

/// Merge CLI flags and the optional YAML file into one immutable config.
fn build_config(cli: &Cli) -> anyhow::Result<SpriteConfig> {
    let mut builder = SpriteConfig::builder().files(cli.files.iter().cloned()).crush(cli.crush);
    if let Some(list) = &cli.filelist {
        builder = builder.filelist(list);
    }
    if let Some(pattern) = &cli.glob {
        builder = builder.glob(pattern);
    }
    if let Some(master) = &cli.master {
        builder = builder.master_name(master);
    }
    if cli.vertical {
        builder = builder.vertical();
    }
    let cfg = builder.build();

    match &cli.config {
        Some(path) => {
            let file = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            let y: YamlConfig = serde_yaml::from_str(&file)
                .with_context(|| format!("parse config {}", path.display()))?;
            y.into_sprite_config(cfg)
        }
        None => Ok(cfg),
    }
}

/// Run the crusher; any problem is a warning, the master is already complete.
fn crush_master(compressor: &dyn Compressor, master_path: &Path) {
    match compressor.run(master_path) {
        Ok(crushed) => {
            if let Some(diag) = &crushed.diagnostics {
                warn!("{}", diag);
            }
            match fs::metadata(&crushed.path) {
                Ok(meta) => info!(
                    path = ?crushed.path,
                    bytes = meta.len(),
                    "crushed size is {} bytes",
                    meta.len()
                ),
                Err(e) => warn!(path = ?crushed.path, error = %e, "crushed file missing"),
            }
        }
        Err(w) => warn!("{}", w),
    }
}

pub(crate) fn load_images_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<SourceImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        let loaded = load_image(p).with_context(|| format!("load image {}", p.display()));
        let image = match loaded {
            Ok(img) => img,
            Err(e) => {
                if let Some(b) = &bar {
                    b.abandon();
                }
                return Err(e);
            }
        };
        list.push(SourceImage::new(image_key(p), image));
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

/// Path key of a loaded image; `\` only separates directories on Windows.
fn image_key(p: &Path) -> String {
    let key = p.to_string_lossy();
    if cfg!(windows) {
        key.replace('\\', "/")
    } else {
        key.into_owned()
    }
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Serialize)]
struct TemplateSprite {
    name: String,
    offset: i64,
    /// background-position components (already negated)
    x: i64,
    y: i64,
    width: u32,
    height: u32,
}

#[derive(Serialize)]
struct TemplateContext {
    master: String,
    direction: String,
    width: u32,
    height: u32,
    sprites: Vec<TemplateSprite>,
}

fn build_template_context(sheet: &Sheet, master_name: &str) -> TemplateContext {
    let sprites = sheet
        .placements
        .iter()
        .map(|p| {
            let (x, y) = p.background_position(sheet.direction);
            TemplateSprite {
                name: p.name.clone(),
                offset: p.offset,
                x,
                y,
                width: p.width,
                height: p.height,
            }
        })
        .collect();
    TemplateContext {
        master: master_name.to_string(),
        direction: sheet.direction.to_string(),
        width: sheet.width,
        height: sheet.height,
        sprites,
    }
}

fn render_stylesheet(
    template: Option<&Path>,
    sheet: &Sheet,
    master_name: &str,
) -> anyhow::Result<String> {
    match template {
        None => Ok(to_css(sheet, master_name)),
        Some(path) => {
            let tpl = fs::read_to_string(path)
                .with_context(|| format!("read template {}", path.display()))?;
            render_template(&tpl, sheet, master_name)
        }
    }
}

fn render_template(tpl: &str, sheet: &Sheet, master_name: &str) -> anyhow::Result<String> {
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    // stylesheet output, not HTML
    reg.register_escape_fn(handlebars::no_escape);
    reg.register_template_string("stylesheet", tpl)?;
    let ctx = build_template_context(sheet, master_name);
    Ok(reg.render("stylesheet", &ctx)?)
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    filelist: Option<PathBuf>,
    glob: Option<String>,
    files: Option<Vec<PathBuf>>,
    direction: Option<String>,
    #[serde(alias = "master_name")]
    master: Option<String>,
    crush: Option<bool>,
}

impl YamlConfig {
    fn into_sprite_config(self, mut cfg: SpriteConfig) -> anyhow::Result<SpriteConfig> {
        if let Some(v) = self.filelist {
            cfg.filelist = Some(v);
        }
        if let Some(v) = self.glob {
            cfg.glob = Some(v);
        }
        if let Some(v) = self.files {
            cfg.files = v;
        }
        if let Some(v) = self.direction {
            cfg.direction = parse_direction(&v)?;
        }
        if let Some(v) = self.master {
            cfg.master_name = v;
        }
        if let Some(v) = self.crush {
            cfg.crush = v;
        }
        Ok(cfg)
    }
}

fn parse_direction(s: &str) -> anyhow::Result<Direction> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown direction: {} (expected vertical|horizontal)", s))
}
