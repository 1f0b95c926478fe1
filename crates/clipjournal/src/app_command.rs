use crate::AppError;

use clipjournal_core::PresentationSlot;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands read from stdin by the main application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start a new recording.
    Start,
    /// Stop the current recording and review it.
    Stop,
    /// Toggle the logical pause flag.
    Pause,
    /// Stop the current recording and throw it away.
    Cancel,
    /// Keep the clip under review.
    Save,
    /// Drop the clip under review.
    Discard,
    /// Acknowledge a failure.
    Acknowledge,
    /// Hand the camera to a presentation slot.
    Show(PresentationSlot),
    /// Mount the camera again after a mount failure.
    Remount,
    /// File future uploads under a chapter, or none.
    Chapter(Option<String>),
    /// Print the current state.
    State,
    /// List backups and uploads still pending.
    Pending,
    /// Drop pending backups whose files are gone.
    Cleanup,
    /// The uploader finished a backup; drop it from the pending list.
    Uploaded(String),
    /// Touch surface width changed, e.g. after rotation.
    Width(f32),
    /// Pointer pressed at a horizontal position.
    PointerDown(f32),
    /// Pointer moved to a horizontal position.
    PointerMove(f32),
    /// Pointer released.
    PointerUp,
    /// Pointer lost by the platform.
    PointerLost,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Quit,
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| AppError::CommandParse {
            input: line.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(fail("empty line"));
        };
        let arg = words.next();

        if words.next().is_some() {
            return Err(fail("too many arguments"));
        }

        let position = |arg: Option<&str>| -> Result<f32, AppError> {
            let raw = arg.ok_or_else(|| fail("missing x position"))?;
            match raw.parse::<f32>() {
                Ok(x) if x.is_finite() => Ok(x),
                _ => Err(fail("x position must be a number")),
            }
        };

        let width = |arg: Option<&str>| -> Result<f32, AppError> {
            let raw = arg.ok_or_else(|| fail("missing width"))?;
            match raw.parse::<f32>() {
                Ok(w) if w.is_finite() && w > 0.0 => Ok(w),
                _ => Err(fail("width must be a positive number")),
            }
        };

        let command = match (verb.to_ascii_lowercase().as_str(), arg) {
            ("start", None) => AppCommand::Start,
            ("stop", None) => AppCommand::Stop,
            ("pause", None) => AppCommand::Pause,
            ("cancel", None) => AppCommand::Cancel,
            ("save", None) => AppCommand::Save,
            ("discard", None) => AppCommand::Discard,
            ("ack", None) => AppCommand::Acknowledge,
            ("state", None) => AppCommand::State,
            ("pending", None) => AppCommand::Pending,
            ("cleanup", None) => AppCommand::Cleanup,
            ("remount", None) => AppCommand::Remount,
            ("up", None) => AppCommand::PointerUp,
            ("lost", None) => AppCommand::PointerLost,
            ("help", None) => AppCommand::Help,
            ("quit" | "exit", None) => AppCommand::Quit,
            ("show", Some("main")) => AppCommand::Show(PresentationSlot::Main),
            ("show", Some("overlay")) => AppCommand::Show(PresentationSlot::Overlay),
            ("show", _) => return Err(fail("expected 'main' or 'overlay'")),
            ("chapter", Some("none")) => AppCommand::Chapter(None),
            ("chapter", Some(name)) => AppCommand::Chapter(Some(name.to_string())),
            ("chapter", None) => return Err(fail("expected a chapter name or 'none'")),
            ("uploaded", Some(id)) => AppCommand::Uploaded(id.to_string()),
            ("uploaded", None) => return Err(fail("expected a backup id")),
            ("width", arg) => AppCommand::Width(width(arg)?),
            ("down", arg) => AppCommand::PointerDown(position(arg)?),
            ("move", arg) => AppCommand::PointerMove(position(arg)?),
            (_, Some(_)) => return Err(fail("unexpected argument")),
            (_, None) => return Err(fail("unknown command")),
        };

        Ok(command)
    }
}

/// One-line summary of every command, printed by `help`.
pub(crate) const HELP: &str = "\
start | stop | pause | cancel       recording intents
save | discard                      resolve the clip under review
ack                                 acknowledge a failure
show main|overlay | remount         move or remount the camera
chapter <name>|none                 file uploads under a chapter
uploaded <backup-id>                drop an uploaded backup from pending
down <x> | move <x> | up | lost     touch gestures
width <px>                          touch surface width
state | pending | cleanup | help | quit";
