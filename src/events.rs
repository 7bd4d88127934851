//! Events exchanged between the measurement plugin and the XR runtime.

use bevy::prelude::*;

use crate::measure::LabelId;
use crate::surface::HitTestRequest;
use crate::surface::HitTestSource;

// ============================================================================
// Session lifecycle (runtime -> plugin)
// ============================================================================

/// Starts a measuring session. Ignored while a session is already active.
#[derive(Event, Reflect, Debug, Clone, Default)]
#[reflect(Event, FromReflect)]
pub struct StartSession;

/// Ends the active session and tears down everything it created.
#[derive(Event, Reflect, Debug, Clone, Default)]
#[reflect(Event, FromReflect)]
pub struct EndSession;

/// The host cannot provide an AR session. Shown once to the user, never retried.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct SessionUnsupported {
    pub reason: String,
}

impl SessionUnsupported {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Input (runtime -> plugin)
// ============================================================================

/// One discrete confirmation gesture ("select")
#[derive(Event, Reflect, Debug, Clone, Default)]
#[reflect(Event, FromReflect)]
pub struct Select;

// ============================================================================
// Hit-test source (plugin <-> runtime)
// ============================================================================

/// Asks the runtime for a hit-test source. Issued at most once per session.
/// The runtime answers with `HitTestSourceReady` or `HitTestSourceFailed` carrying `request`.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct HitTestSourceRequested {
    pub request: HitTestRequest,
}

/// The runtime resolved a hit-test source request.
/// A handle for a request that is no longer outstanding is released again.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct HitTestSourceReady {
    pub request: HitTestRequest,
    pub source:  HitTestSource,
}

/// The runtime could not provide a hit-test source. Hit-testing stays inactive.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct HitTestSourceFailed {
    pub request: HitTestRequest,
}

/// The runtime may drop this source: its session ended, or nothing was waiting for it.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct HitTestSourceReleased {
    pub source: HitTestSource,
}

// ============================================================================
// Measurement output (plugin -> observers)
// ============================================================================

/// Fired when an edge is formed and its length label created.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct LabelCreated {
    pub label:  LabelId,
    pub anchor: Vec3,
    pub text:   String,
}

/// Fired when a fourth point closes a rectangle.
/// `index` addresses the rectangle in `RectangleStore`.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct RectangleCompleted {
    pub index: usize,
}
