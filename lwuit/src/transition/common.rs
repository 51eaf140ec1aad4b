//! The built-in transitions: empty, fade, slide and fast slide.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::config::ToolkitConfig;
use crate::graphics::{blend, Graphics};
use crate::motion::{Clock, Motion, MotionStyle, SystemClock};
use crate::primitives::{Point, Rect};

use super::{Surface, Transition};

/// Which effect a [`CommonTransition`] plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Switches immediately.
    #[default]
    Empty,
    /// Cross-fade from source to destination.
    Fade,
    /// Slide, repainting both surfaces every frame.
    Slide,
    /// Slide using snapshots taken at initialization.
    FastSlide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SlideOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Not yet initialized.
    Idle,
    Animating,
    /// The motion has finished and the final frame is being shown.
    Settling,
    Done,
    /// Buffers and surfaces released.
    Cleaned,
}

/// How a dialog takes part in a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogSlide {
    /// The destination is a dialog: its title and content slide in over the
    /// static source while its menu stays put.
    Entering { moving: Rect, menu: Rect },
    /// The source is a dialog sliding out over the static destination.
    Leaving { moving: Rect, start: i32 },
}

/// Fade, slide and fast-slide between two surfaces.
pub struct CommonTransition {
    kind: TransitionKind,
    orientation: SlideOrientation,
    forward: bool,
    rtl: bool,
    duration: Duration,
    style: MotionStyle,
    clock: Arc<dyn Clock>,

    phase: TransitionPhase,
    motion: Option<Motion>,
    /// Last sampled motion value: alpha for fades, offset for slides.
    position: i32,
    /// Source bounds; everything is painted inside it.
    viewport: Rect,
    source: Option<Rc<dyn Surface>>,
    destination: Option<Rc<dyn Surface>>,
    source_buffer: Option<RgbaImage>,
    destination_buffer: Option<RgbaImage>,
    /// Composition target when the surfaces lack alpha support.
    scratch: Option<RgbaImage>,
    dialog: Option<DialogSlide>,
}

impl CommonTransition {
    pub fn new(kind: TransitionKind, clock: Arc<dyn Clock>) -> Self {
        Self {
            kind,
            orientation: SlideOrientation::Horizontal,
            forward: true,
            rtl: false,
            duration: Duration::from_millis(300),
            style: MotionStyle::Spline,
            clock,
            phase: TransitionPhase::Idle,
            motion: None,
            position: 0,
            viewport: Rect::ZERO,
            source: None,
            destination: None,
            source_buffer: None,
            destination_buffer: None,
            scratch: None,
            dialog: None,
        }
    }

    /// A transition that switches immediately.
    pub fn empty() -> Self {
        Self::new(TransitionKind::Empty, Arc::new(SystemClock::new()))
    }

    pub fn fade(duration: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::new(TransitionKind::Fade, clock).duration(duration)
    }

    pub fn slide(
        orientation: SlideOrientation,
        forward: bool,
        duration: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(TransitionKind::Slide, clock)
            .orientation(orientation)
            .forward(forward)
            .duration(duration)
    }

    pub fn fast_slide(
        orientation: SlideOrientation,
        forward: bool,
        duration: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(TransitionKind::FastSlide, clock)
            .orientation(orientation)
            .forward(forward)
            .duration(duration)
    }

    /// Duration, motion style and RTL mode from the toolkit config.
    pub fn from_config(kind: TransitionKind, config: &ToolkitConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(kind, clock)
            .duration(config.transition_duration())
            .motion_style(config.motion)
            .rtl(config.rtl)
    }

    pub fn orientation(mut self, orientation: SlideOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn forward(mut self, forward: bool) -> Self {
        self.forward = forward;
        self
    }

    /// Mirror horizontal slides.
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Curve for slides. Fades always ease.
    pub fn motion_style(mut self, style: MotionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn slide_orientation(&self) -> SlideOrientation {
        self.orientation
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    pub fn transition_duration(&self) -> Duration {
        self.duration
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Alpha (fade) or offset (slide) of the current frame.
    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TransitionPhase::Done | TransitionPhase::Cleaned)
    }

    /// Whether any offscreen buffer is held.
    pub fn has_buffers(&self) -> bool {
        self.source_buffer.is_some() || self.destination_buffer.is_some() || self.scratch.is_some()
    }

    /// A fresh copy of the configuration. With `reverse` the slide runs the
    /// other way.
    pub fn copy(&self, reverse: bool) -> CommonTransition {
        Self::new(self.kind, self.clock.clone())
            .orientation(self.orientation)
            .forward(self.forward != reverse)
            .rtl(self.rtl)
            .duration(self.duration)
            .motion_style(self.style)
    }

    /// +1 when the destination enters from the bottom or the right.
    fn direction(&self) -> i32 {
        let mut sign = if self.forward { 1 } else { -1 };
        if self.orientation == SlideOrientation::Horizontal && self.rtl {
            sign = -sign;
        }
        sign
    }

    /// Extent of the viewport along the slide axis.
    fn extent(&self) -> i32 {
        match self.orientation {
            SlideOrientation::Horizontal => self.viewport.width,
            SlideOrientation::Vertical => self.viewport.height,
        }
    }

    fn along(&self, distance: i32) -> Point {
        match self.orientation {
            SlideOrientation::Horizontal => Point::new(distance, 0),
            SlideOrientation::Vertical => Point::new(0, distance),
        }
    }

    /// Distance a dialog block covers to get from its place to just
    /// outside the viewport on the side it enters from.
    fn travel(&self, moving: Rect) -> i32 {
        let v = self.viewport;
        let distance = match (self.orientation, self.direction() > 0) {
            (SlideOrientation::Vertical, true) => v.bottom() - moving.y,
            (SlideOrientation::Vertical, false) => moving.bottom() - v.y,
            (SlideOrientation::Horizontal, true) => v.right() - moving.x,
            (SlideOrientation::Horizontal, false) => moving.right() - v.x,
        };
        distance.clamp(0, self.extent())
    }

    /// Paint a surface into a new buffer the size of the viewport.
    fn snapshot(&self, surface: &dyn Surface) -> RgbaImage {
        let mut buffer = RgbaImage::new(self.viewport.width as u32, self.viewport.height as u32);
        let mut g = Graphics::new(&mut buffer);
        g.translate(-self.viewport.x, -self.viewport.y);
        surface.paint(&mut g);
        buffer
    }

    fn release(&mut self) {
        self.motion = None;
        self.source = None;
        self.destination = None;
        self.source_buffer = None;
        self.destination_buffer = None;
        self.scratch = None;
        self.dialog = None;
    }

    fn paint_fade(&mut self, g: &mut Graphics<'_>) {
        let (Some(source), Some(destination)) = (&self.source_buffer, &self.destination_buffer)
        else {
            return;
        };
        let alpha = self.position.clamp(0, 255) as u8;
        let at = self.viewport.origin();

        match &mut self.scratch {
            None => {
                g.draw_image(source, at);
                g.draw_image_alpha(destination, at, alpha);
            }
            Some(scratch) => {
                scratch.clone_from(source);
                for (out, px) in scratch.pixels_mut().zip(destination.pixels()) {
                    *out = blend(*out, *px, alpha);
                }
                g.draw_image(scratch, at);
            }
        }
    }

    fn paint_slide(&self, g: &mut Graphics<'_>) {
        let sign = self.direction();
        let extent = self.extent();
        let offset = self.position;
        let origin = self.viewport.origin();
        let to_buffer = Point::ORIGIN - origin;

        match self.dialog {
            None => {
                let source_at = self.along(-sign * offset);
                let destination_at = self.along(sign * (extent - offset));
                if let (Some(s), Some(d)) = (&self.source_buffer, &self.destination_buffer) {
                    g.draw_image(s, origin + source_at);
                    g.draw_image(d, origin + destination_at);
                } else if let (Some(s), Some(d)) = (&self.source, &self.destination) {
                    paint_shifted(g, s.as_ref(), source_at);
                    paint_shifted(g, d.as_ref(), destination_at);
                }
            }
            Some(DialogSlide::Entering { moving, menu }) => {
                let (Some(s), Some(d)) = (&self.source_buffer, &self.destination_buffer) else {
                    return;
                };
                g.draw_image(s, origin);
                g.draw_image_region(d, menu.translate(to_buffer), menu.origin(), u8::MAX);
                let shift = self.along(sign * (extent - offset));
                g.draw_image_region(d, moving.translate(to_buffer), moving.origin() + shift, u8::MAX);
            }
            Some(DialogSlide::Leaving { moving, start }) => {
                let (Some(s), Some(d)) = (&self.source_buffer, &self.destination_buffer) else {
                    return;
                };
                g.draw_image(d, origin);
                let shift = self.along(sign * (offset - start));
                g.draw_image_region(s, moving.translate(to_buffer), moving.origin() + shift, u8::MAX);
            }
        }
    }
}

fn paint_shifted(g: &mut Graphics<'_>, surface: &dyn Surface, by: Point) {
    let state = g.save();
    g.translate(by.x, by.y);
    surface.paint(g);
    g.restore(state);
}

impl Transition for CommonTransition {
    fn init_transition(&mut self, source: Rc<dyn Surface>, destination: Rc<dyn Surface>) {
        if self.phase != TransitionPhase::Idle {
            tracing::warn!(phase = ?self.phase, "transition re-initialized");
            self.release();
        }
        self.viewport = source.bounds();
        self.position = 0;

        if source.bounds().is_empty() || destination.bounds().is_empty() {
            tracing::debug!(
                source = ?source.bounds(),
                destination = ?destination.bounds(),
                "degenerate transition skipped"
            );
            self.phase = TransitionPhase::Done;
            return;
        }

        let motion = match self.kind {
            TransitionKind::Empty => None,
            TransitionKind::Fade => {
                self.destination_buffer = Some(self.snapshot(destination.as_ref()));
                self.source_buffer = Some(self.snapshot(source.as_ref()));
                if !(source.native_alpha() && destination.native_alpha()) {
                    let (w, h) = (self.viewport.width as u32, self.viewport.height as u32);
                    self.scratch = Some(RgbaImage::new(w, h));
                }
                Some(Motion::spline(0, 255, self.duration, self.clock.clone()))
            }
            TransitionKind::Slide | TransitionKind::FastSlide => {
                let extent = self.extent();
                self.dialog = match (destination.dialog_regions(), source.dialog_regions()) {
                    (Some(regions), _) => Some(DialogSlide::Entering {
                        moving: regions.moving(),
                        menu: regions.menu,
                    }),
                    (None, Some(regions)) => Some(DialogSlide::Leaving {
                        moving: regions.moving(),
                        start: extent - self.travel(regions.moving()),
                    }),
                    (None, None) => None,
                };
                let start = match self.dialog {
                    Some(DialogSlide::Entering { moving, .. }) => extent - self.travel(moving),
                    Some(DialogSlide::Leaving { start, .. }) => start,
                    None => 0,
                };
                if self.kind == TransitionKind::FastSlide || self.dialog.is_some() {
                    self.source_buffer = Some(self.snapshot(source.as_ref()));
                    self.destination_buffer = Some(self.snapshot(destination.as_ref()));
                }
                Some(Motion::with_style(
                    self.style,
                    start,
                    extent,
                    self.duration,
                    self.clock.clone(),
                ))
            }
        };

        self.source = Some(source);
        self.destination = Some(destination);
        self.phase = match motion {
            Some(mut motion) => {
                motion.start();
                self.position = motion.start_value();
                self.motion = Some(motion);
                TransitionPhase::Animating
            }
            None => TransitionPhase::Done,
        };
        tracing::debug!(
            kind = ?self.kind,
            viewport = ?self.viewport,
            dialog = self.dialog.is_some(),
            "transition initialized"
        );
    }

    fn animate(&mut self) -> bool {
        match self.phase {
            TransitionPhase::Animating => {
                if let Some(motion) = &self.motion {
                    self.position = motion.value();
                    tracing::trace!(position = self.position, "transition frame");
                    if motion.is_finished() {
                        self.phase = TransitionPhase::Settling;
                    }
                } else {
                    self.phase = TransitionPhase::Settling;
                }
                true
            }
            TransitionPhase::Settling => {
                self.phase = TransitionPhase::Done;
                false
            }
            TransitionPhase::Idle | TransitionPhase::Done | TransitionPhase::Cleaned => false,
        }
    }

    fn paint(&mut self, g: &mut Graphics<'_>) {
        if matches!(self.phase, TransitionPhase::Idle | TransitionPhase::Cleaned) {
            return;
        }
        let state = g.save();
        g.clip_rect(self.viewport);
        match self.kind {
            TransitionKind::Empty => {
                if let Some(destination) = &self.destination {
                    destination.paint(g);
                }
            }
            TransitionKind::Fade => self.paint_fade(g),
            TransitionKind::Slide | TransitionKind::FastSlide => self.paint_slide(g),
        }
        g.restore(state);
    }

    fn cleanup(&mut self) {
        self.release();
        self.phase = TransitionPhase::Cleaned;
        tracing::debug!(kind = ?self.kind, "transition cleaned up");
    }

    fn copy(&self, reverse: bool) -> Box<dyn Transition> {
        Box::new(CommonTransition::copy(self, reverse))
    }
}

impl std::fmt::Debug for CommonTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonTransition")
            .field("kind", &self.kind)
            .field("orientation", &self.orientation)
            .field("forward", &self.forward)
            .field("rtl", &self.rtl)
            .field("duration", &self.duration)
            .field("phase", &self.phase)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
