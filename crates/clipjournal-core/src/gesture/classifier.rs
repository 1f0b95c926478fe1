//! Touch classification for recording control.
//!
//! One touch (pointer-down to pointer-up) is handled by exactly one of two
//! mechanisms:
//!
//! - **Long press**: the pointer stays put for [`GestureConfig::long_press`].
//!   Emits a single [`GestureEvent::LongPressComplete`].
//! - **Zone drag**: while recording, the pointer moves past the drag slop.
//!   Emits [`GestureEvent::ZoneChanged`] per zone crossing and one
//!   [`GestureEvent::Action`] on release.
//!
//! Whichever engages first wins for the rest of the touch. Time is passed in
//! by the caller so the classifier can live on a single-threaded event loop
//! without owning a timer.

use crate::{CoreError, CoreResult, Zone, ZoneThresholds};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, trace};

/// Default hold time before a touch counts as a long press.
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(500);
/// Default movement, in logical pixels, before a touch counts as a drag.
pub const DEFAULT_DRAG_SLOP: f32 = 10.0;

/// Pointer position in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f32,
    /// Vertical offset from the top edge.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Output of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// The pointer crossed into a different zone. Drives haptic feedback.
    ZoneChanged(Zone),
    /// Terminal action for a zone drag: the zone held at release, or
    /// [`Zone::Hold`] when the touch was interrupted.
    Action(Zone),
    /// The long-press timer fired.
    LongPressComplete,
}

/// Classifier tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Zone boundaries.
    pub thresholds: ZoneThresholds,
    /// Hold time for a long press.
    pub long_press: Duration,
    /// Horizontal travel that turns a touch into a zone drag.
    pub drag_slop: f32,
    /// Width of the touch surface in logical pixels.
    pub screen_width: f32,
}

impl GestureConfig {
    /// Default tuning for a surface of `screen_width` logical pixels.
    pub fn for_width(screen_width: f32) -> Self {
        Self {
            thresholds: ZoneThresholds::default(),
            long_press: DEFAULT_LONG_PRESS,
            drag_slop: DEFAULT_DRAG_SLOP,
            screen_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Neither mechanism has engaged yet.
    Pending,
    /// Zone classification owns this touch.
    Dragging,
    /// The long-press timer fired; zones are suppressed.
    LongPressed,
}

/// State of one touch. Dropped on release or interruption.
#[derive(Debug)]
struct GestureSession {
    started_at: Instant,
    origin: Point,
    finger_position: Point,
    current_zone: Option<Zone>,
    mode: Mode,
}

/// Maps pointer trajectories to recording intents.
#[derive(Debug)]
pub struct GestureClassifier {
    config: GestureConfig,
    session: Option<GestureSession>,
}

impl GestureClassifier {
    /// Creates a classifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidThresholds`] if the screen width is not
    /// a positive finite number or the drag slop is negative.
    #[track_caller]
    pub fn new(config: GestureConfig) -> CoreResult<Self> {
        if !config.screen_width.is_finite() || config.screen_width <= 0.0 {
            return Err(CoreError::InvalidThresholds {
                reason: format!("screen width must be positive, got {}", config.screen_width),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !config.drag_slop.is_finite() || config.drag_slop < 0.0 {
            return Err(CoreError::InvalidThresholds {
                reason: format!("drag slop must be non-negative, got {}", config.drag_slop),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            config,
            session: None,
        })
    }

    /// Updates the surface width, e.g. after rotation.
    ///
    /// Non-positive widths are ignored.
    pub fn set_screen_width(&mut self, screen_width: f32) {
        if screen_width.is_finite() && screen_width > 0.0 {
            self.config.screen_width = screen_width;
        }
    }

    /// Whether a touch is in progress.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Zone held by the current drag, if one engaged.
    pub fn current_zone(&self) -> Option<Zone> {
        self.session.as_ref().and_then(|s| s.current_zone)
    }

    /// Last known pointer position of the current touch.
    pub fn finger_position(&self) -> Option<Point> {
        self.session.as_ref().map(|s| s.finger_position)
    }

    /// Classifies `point` against the configured thresholds.
    pub fn zone_at(&self, point: Point) -> Zone {
        self.config
            .thresholds
            .classify(point.x / self.config.screen_width)
    }

    /// Starts a touch and arms the long-press timer.
    ///
    /// A pointer-down during a touch replaces it; the previous touch emits
    /// nothing.
    pub fn pointer_down(&mut self, at: Point, now: Instant) {
        if self.session.is_some() {
            debug!("Pointer down during active touch, restarting gesture");
        }

        self.session = Some(GestureSession {
            started_at: now,
            origin: at,
            finger_position: at,
            current_zone: None,
            mode: Mode::Pending,
        });
    }

    /// Feeds a pointer move. Zones are only classified while `recording`.
    pub fn pointer_move(
        &mut self,
        at: Point,
        recording: bool,
        now: Instant,
    ) -> Option<GestureEvent> {
        if let Some(fired) = self.tick(now) {
            if let Some(session) = self.session.as_mut() {
                session.finger_position = at;
            }
            return Some(fired);
        }

        let zone = self.zone_at(at);
        let origin_zone = self.session.as_ref().map(|s| self.zone_at(s.origin))?;
        let slop = self.config.drag_slop;
        let session = self.session.as_mut()?;
        session.finger_position = at;

        match session.mode {
            Mode::LongPressed => None,
            Mode::Pending => {
                if !recording || (at.x - session.origin.x).abs() <= slop {
                    return None;
                }

                session.mode = Mode::Dragging;
                session.current_zone = Some(origin_zone);
                trace!(zone = %origin_zone, "Zone drag engaged");

                if zone != origin_zone {
                    session.current_zone = Some(zone);
                    debug!(zone = %zone, "Zone changed");
                    return Some(GestureEvent::ZoneChanged(zone));
                }
                None
            }
            Mode::Dragging => {
                if session.current_zone == Some(zone) {
                    return None;
                }
                session.current_zone = Some(zone);
                debug!(zone = %zone, "Zone changed");
                Some(GestureEvent::ZoneChanged(zone))
            }
        }
    }

    /// Fires the long-press timer if it is armed and has expired.
    pub fn tick(&mut self, now: Instant) -> Option<GestureEvent> {
        let long_press = self.config.long_press;
        let session = self.session.as_mut()?;

        if session.mode != Mode::Pending {
            return None;
        }

        if now.saturating_duration_since(session.started_at) < long_press {
            return None;
        }

        session.mode = Mode::LongPressed;
        debug!("Long press complete");
        Some(GestureEvent::LongPressComplete)
    }

    /// Ends the touch normally.
    ///
    /// Emits the terminal action for a zone drag, or the long press if its
    /// timer expired without being observed by [`tick`](Self::tick).
    pub fn pointer_up(&mut self, now: Instant) -> Option<GestureEvent> {
        if let Some(fired) = self.tick(now) {
            self.session = None;
            return Some(fired);
        }

        let session = self.session.take()?;

        match session.mode {
            Mode::Dragging => {
                let zone = session.current_zone.unwrap_or(Zone::Hold);
                debug!(zone = %zone, "Gesture released");
                Some(GestureEvent::Action(zone))
            }
            Mode::Pending | Mode::LongPressed => None,
        }
    }

    /// Ends the touch because the platform lost the pointer.
    ///
    /// A zone drag resolves to [`Zone::Hold`] so an ambiguous interruption
    /// never deletes or saves.
    pub fn pointer_lost(&mut self) -> Option<GestureEvent> {
        let session = self.session.take()?;

        match session.mode {
            Mode::Dragging => {
                debug!("Gesture interrupted, holding");
                Some(GestureEvent::Action(Zone::Hold))
            }
            Mode::Pending | Mode::LongPressed => None,
        }
    }
}
