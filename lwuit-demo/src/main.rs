//! LWUIT demo.
//!
//! Lays out a sample form, logs its geometry, presses its submit button
//! through the UI thread, and animates a transition to a second form on a
//! simulated clock. The final frame can be written to a PNG.

mod form;

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use image::RgbaImage;
use lwuit::{
    ActionEvent, Clock, Color, CommonTransition, ComponentId, EventDispatcher, Graphics,
    ManualClock, Rect, SlideOrientation, ToolkitConfig, Transition, TransitionKind, UiThread,
};
use tracing_subscriber::EnvFilter;

use crate::form::SampleForm;

/// Frames rendered before giving up on a transition that never settles.
const MAX_FRAMES: usize = 10_000;

#[derive(Debug, Parser)]
#[command(name = "lwuit-demo", about = "Lay out a sample form and animate a transition")]
struct Args {
    /// Screen width in pixels.
    #[arg(long, default_value_t = 240)]
    width: i32,

    /// Screen height in pixels.
    #[arg(long, default_value_t = 320)]
    height: i32,

    /// Lay out right to left.
    #[arg(long)]
    rtl: bool,

    /// Toolkit config (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = TransitionArg::Slide)]
    transition: TransitionArg,

    /// Simulated time between frames, in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Write the last frame to this PNG file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransitionArg {
    Fade,
    Slide,
    FastSlide,
}

impl From<TransitionArg> for TransitionKind {
    fn from(arg: TransitionArg) -> Self {
        match arg {
            TransitionArg::Fade => TransitionKind::Fade,
            TransitionArg::Slide => TransitionKind::Slide,
            TransitionArg::FastSlide => TransitionKind::FastSlide,
        }
    }
}

fn main() -> Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    ensure!(
        args.width > 0 && args.height > 0,
        "screen size must be positive, got {}x{}",
        args.width,
        args.height
    );

    let mut config = match &args.config {
        Some(path) => ToolkitConfig::load(path)?,
        None => ToolkitConfig::default(),
    };
    config.rtl |= args.rtl;
    tracing::info!(
        width = args.width,
        height = args.height,
        rtl = config.rtl,
        "Starting LWUIT demo"
    );

    let screen = Rect::new(0, 0, args.width, args.height);
    let mut sign_in = SampleForm::new("sign in", &["user", "password"], &config)?;
    sign_in.layout(screen);
    sign_in.log_geometry();

    let mut welcome = SampleForm::new("welcome", &["name", "email", "phone"], &config)?;
    welcome.layout(screen);

    let submitted = press(sign_in.submit)?;
    ensure!(submitted, "submit was not handled");

    let frame = run_transition(
        &args,
        &config,
        sign_in.into_surface(Color::WHITE, config.native_alpha),
        welcome.into_surface(Color::rgb(224, 236, 255), config.native_alpha),
    );

    if let Some(path) = &args.output {
        frame
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote final frame");
    }
    Ok(())
}

/// Fire the submit action from this thread. Listeners run on the UI thread.
fn press(submit: ComponentId) -> Result<bool> {
    let ui = Arc::new(UiThread::spawn().context("failed to start the UI thread")?);
    let dispatcher = EventDispatcher::new(ui.clone());

    let handled_on = Arc::new(Mutex::new(None));
    let sink = handled_on.clone();
    dispatcher.add_action_listener(move |event| {
        if event.command.as_deref() == Some("submit") {
            let thread = std::thread::current().name().map(str::to_owned);
            *sink.lock().unwrap_or_else(|p| p.into_inner()) = thread;
            event.consume();
        }
    });
    dispatcher.add_action_listener(|event| {
        tracing::warn!(command = ?event.command, "action reached the fallback listener");
    });

    let event = dispatcher.fire_action(ActionEvent::new(Some(submit)).with_command("submit"))?;
    let thread = handled_on.lock().unwrap_or_else(|p| p.into_inner()).take();
    tracing::info!(
        consumed = event.is_consumed(),
        thread = thread.as_deref().unwrap_or("-"),
        "submit pressed"
    );
    ui.shutdown();
    Ok(event.is_consumed())
}

/// Animate from `source` to `destination` and return the last frame.
fn run_transition(
    args: &Args,
    config: &ToolkitConfig,
    source: form::FormSurface,
    destination: form::FormSurface,
) -> RgbaImage {
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let mut transition = CommonTransition::from_config(args.transition.into(), config, shared)
        .orientation(SlideOrientation::Horizontal);
    transition.init_transition(Rc::new(source), Rc::new(destination));

    let mut screen = RgbaImage::new(args.width as u32, args.height as u32);
    let step = Duration::from_millis(args.frame_ms.max(1));
    let mut frames = 0;
    loop {
        clock.advance(step);
        let more = transition.animate();
        transition.paint(&mut Graphics::new(&mut screen));
        frames += 1;
        if !more || frames >= MAX_FRAMES {
            break;
        }
    }
    tracing::info!(
        kind = ?transition.kind(),
        frames,
        finished = transition.is_finished(),
        "transition complete"
    );
    transition.cleanup();
    screen
}
