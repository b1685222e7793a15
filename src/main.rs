use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use circuitkit::canvas::{
    canvas_pixel_size, Document, Drawable, PixmapSurface, RenderContext, SceneRenderer,
};
use circuitkit::demo;
use circuitkit::settings::Config;
use circuitkit::{event_bus, init_logging, EventFilter, BUILD_DATE};
use circuitkit_core::EventCategory;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML or JSON). Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the rendered PNG.
    #[arg(short, long, default_value = "board.png")]
    output: PathBuf,

    /// Zoom level, overriding the configured default.
    #[arg(short, long)]
    zoom: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = Args::parse();
    info!("CircuitKit {} (built {})", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let bus = event_bus();
    bus.subscribe(EventFilter::Categories(vec![EventCategory::Error]), |event| {
        warn!("{}", event.description());
    });

    let config = match &args.config {
        Some(path) => Config::load_and_notify(path, &bus)?,
        None => Config::default(),
    };
    config.validate()?;

    let mut renderer = SceneRenderer::from_config(&config, Arc::clone(&bus));
    if let Some(zoom) = args.zoom {
        renderer.set_zoom(zoom)?;
    }

    let document = Document::from_defaults("demo board", &config.document);
    let board = demo::demo_board();
    let components: Vec<&dyn Drawable> = board.iter().map(|c| c.as_ref()).collect();

    let (width, height) = canvas_pixel_size(&document, renderer.zoom());
    let mut surface = PixmapSurface::new(width, height)?;
    let ctx = RenderContext::new(renderer.default_options());

    let failed = renderer.render(&mut surface, &document, &components, &ctx);
    if !failed.is_empty() {
        warn!("{} components failed to draw", failed.len());
    }

    for (a, b) in demo::connections(&renderer, &components) {
        info!("Connected: #{} <-> #{}", a, b);
    }

    surface.to_rgb_image().save(&args.output)?;
    info!("Wrote {}x{} px to {}", width, height, args.output.display());
    Ok(())
}
