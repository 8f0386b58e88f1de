//! Pullkit Demo
//!
//! Simulates a pull-to-refresh session against an in-memory scroll view:
//! the user drags the content down, lets go, the app "loads" for a while,
//! and the control slides the content back to rest.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pullkit_control::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod arrow;

use arrow::ArrowProgressIndicator;

const FRAME: f32 = 1.0 / 60.0;

// A 3-column grid of 30 cells, 200pt tall with 1pt spacing
const ROWS: f32 = 10.0;
const ROW_HEIGHT: f32 = 200.0;
const ROW_SPACING: f32 = 1.0;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Top,
    Bottom,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Top => Layout::Top,
            LayoutArg::Bottom => Layout::Bottom,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TriggerArg {
    Dragging,
    Released,
}

impl From<TriggerArg> for TriggerEvent {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::Dragging => TriggerEvent::Dragging,
            TriggerArg::Released => TriggerEvent::Released,
        }
    }
}

#[derive(Parser)]
#[command(name = "pullkit-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Simulate a pull-to-refresh session", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Load the control configuration from a TOML file (overrides --layout, --trigger, --height)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the control sits
    #[arg(short, long, value_enum, default_value = "bottom")]
    layout: LayoutArg,

    /// When a pull starts refreshing
    #[arg(short, long, value_enum, default_value = "dragging")]
    trigger: TriggerArg,

    /// Trigger height; defaults to the indicator height
    #[arg(long)]
    height: Option<f32>,

    /// Top content inset of the scroll view
    #[arg(long, default_value = "0")]
    inset: f32,

    /// Top safe-area inset of the scroll view
    #[arg(long, default_value = "0")]
    safe_area: f32,

    /// How far the simulated finger pulls past rest
    #[arg(short, long, default_value = "120")]
    pull: f32,

    /// How long the simulated load takes, in seconds
    #[arg(long, default_value = "3.0")]
    load: f32,
}

impl Cli {
    fn configuration(&self) -> Result<Configuration> {
        if let Some(path) = &self.config {
            return Configuration::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()));
        }

        let mut trigger = Trigger {
            event: self.trigger.into(),
            ..Trigger::default()
        };
        if let Some(height) = self.height {
            trigger = trigger.with_height(height);
        }

        let configuration = Configuration::new(self.layout.into(), trigger);
        configuration
            .validate()
            .context("Invalid command line configuration")?;
        Ok(configuration)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let configuration = cli.configuration()?;
    info!(
        layout = ?configuration.layout,
        trigger = ?configuration.trigger.event,
        height = ?configuration.trigger.height,
        "Starting pull-to-refresh demo"
    );

    run(&cli, configuration);
    Ok(())
}

fn run(cli: &Cli, configuration: Configuration) {
    let content_height = ROWS * (ROW_HEIGHT + ROW_SPACING) - ROW_SPACING;
    let scroll_view = Rc::new(
        ScrollView::new(Size::new(390.0, 844.0), Size::new(390.0, content_height))
            .with_content_inset(EdgeInsets::top(cli.inset))
            .with_safe_area(EdgeInsets::top(cli.safe_area)),
    );

    let indicator = ArrowProgressIndicator::new();
    let mut controlling =
        RefreshControlling::new(Rc::clone(&scroll_view), indicator.clone(), configuration);

    let requested = Rc::new(Cell::new(false));
    controlling.on_value_changed({
        let requested = Rc::clone(&requested);
        move |_| {
            info!("Refresh requested, loading");
            requested.set(true);
        }
    });

    let control = controlling.control().clone();
    let rest = scroll_view.rest_offset_y();

    // Drag
    scroll_view.begin_pan();
    let steps = (cli.pull / 4.0).ceil().max(1.0) as usize;
    for step in 1..=steps {
        let distance = cli.pull * step as f32 / steps as f32;
        scroll_view.pan_to(rest - distance);
        indicator.tick(FRAME);
        log_frame(&control, &scroll_view, &indicator);
    }

    // Release
    scroll_view.end_pan();
    info!(
        refreshing = control.is_refreshing(),
        inset_top = scroll_view.content_inset().top,
        offset_y = scroll_view.content_offset().y,
        "Released"
    );

    if !requested.get() {
        warn!(
            progress = %control.progress(),
            "Pull did not reach the trigger height, nothing to refresh"
        );
        return;
    }

    // Native scrolling settles at the expanded rest position while loading
    scroll_view.set_content_offset_y(-scroll_view.adjusted_content_inset().top);

    let load_frames = (cli.load.max(0.0) / FRAME).round() as usize;
    for _ in 0..load_frames {
        indicator.tick(FRAME);
    }
    let frame = indicator.frame();
    debug!(
        animating = indicator.is_animating(),
        spinner_visible = frame.spinner_visible,
        spinner_rotation = frame.spinner_rotation,
        arrow_opacity = frame.arrow_opacity,
        "Loading finished"
    );

    controlling.control().end_refreshing();
    let mut frames = 0;
    while control.tick(FRAME) {
        frames += 1;
        log_frame(&control, &scroll_view, &indicator);
    }

    info!(
        frames,
        refreshing = control.is_refreshing(),
        hidden = control.is_hidden(),
        inset_top = scroll_view.content_inset().top,
        offset_y = scroll_view.content_offset().y,
        "Refresh finished"
    );
}

fn log_frame(control: &RefreshControl, scroll_view: &ScrollView, indicator: &ArrowProgressIndicator) {
    let frame = indicator.frame();
    debug!(
        offset_y = scroll_view.content_offset().y,
        progress = %control.progress(),
        hidden = control.is_hidden(),
        translation_y = control.translation_y(),
        control_frame = ?control.layout(),
        ring_visible = frame.ring_visible,
        ring = frame.ring_stroke_end,
        arrow_rotation = frame.arrow_rotation,
        "Frame"
    );
}
