// bevy_ar_measure
// Augmented-reality rectangle measuring for Bevy, providing:
// - Surface tracking from XR hit-test results, with an optional reticle
// - A four-point rectangle builder and an append-only rectangle store
// - Edge length labels projected onto the live view every frame

use bevy::prelude::*;
use bevy::window::WindowResized;

mod events;
mod geometry;
mod measure;
mod observers;
mod overlay;
pub mod prelude;
mod projection;
mod session;
mod surface;
#[cfg(feature = "visualization")]
mod visualization;

// Public API - Events
pub use events::EndSession;
pub use events::HitTestSourceFailed;
pub use events::HitTestSourceReady;
pub use events::HitTestSourceReleased;
pub use events::HitTestSourceRequested;
pub use events::LabelCreated;
pub use events::RectangleCompleted;
pub use events::Select;
pub use events::SessionUnsupported;
pub use events::StartSession;

// Public API - Measurement types
pub use geometry::Edge;
pub use geometry::format_length;
pub use measure::InProgressRectangle;
pub use measure::Label;
pub use measure::LabelId;
pub use measure::PointAdded;
pub use measure::Rectangle;
pub use measure::RectangleBuilder;
pub use measure::RectangleStore;

// Public API - Surface tracking
pub use surface::HitResults;
pub use surface::HitTestRequest;
pub use surface::HitTestSource;
pub use surface::Reticle;
pub use surface::SurfaceHit;
pub use surface::SurfaceTracker;

// Public API - Projection
pub use projection::MeasureCamera;
pub use projection::ViewProjection;
pub use projection::project_to_viewport;
pub use projection::view_projection;

// Public API - Session and overlay
pub use overlay::LabelOverlay;
pub use overlay::LabelStyle;
pub use session::SessionStatus;
pub use session::UnsupportedMessage;
pub use session::ViewportSize;

// Public API - Gizmo drawing
#[cfg(feature = "visualization")]
pub use visualization::MeasurementGizmo;
#[cfg(feature = "visualization")]
pub use visualization::MeasurementGizmoConfig;
#[cfg(feature = "visualization")]
pub use visualization::MeasurementVisualizationPlugin;

// Internal - used by plugin, not for external use
use observers::on_select;
use overlay::on_label_created;
use overlay::position_label_overlays;
use projection::project_labels;
use projection::sync_view_projection;
use session::on_end_session;
use session::on_session_unsupported;
use session::on_start_session;
use session::session_active;
use session::track_viewport_size;
use surface::follow_surface;
use surface::on_hit_test_source_failed;
use surface::on_hit_test_source_ready;
use surface::request_hit_test_source;
use surface::track_surface;

/// Plugin that adds rectangle measuring to an XR app
pub struct MeasurePlugin;

impl Plugin for MeasurePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<WindowResized>()
            // Initialize resources
            .init_resource::<SessionStatus>()
            .init_resource::<ViewportSize>()
            .init_resource::<ViewProjection>()
            .init_resource::<HitResults>()
            .init_resource::<SurfaceTracker>()
            .init_resource::<RectangleBuilder>()
            .init_resource::<RectangleStore>()
            .init_resource::<LabelStyle>()
            // Register observers for session lifecycle
            .add_observer(on_start_session)
            .add_observer(on_end_session)
            .add_observer(on_session_unsupported)
            // Register observers for runtime and user input
            .add_observer(on_hit_test_source_ready)
            .add_observer(on_hit_test_source_failed)
            .add_observer(on_select)
            .add_observer(on_label_created)
            // Per-frame tick, only while a session runs
            .add_systems(
                Update,
                (
                    track_viewport_size,
                    request_hit_test_source,
                    track_surface,
                    follow_surface,
                    sync_view_projection,
                    project_labels,
                    position_label_overlays,
                )
                    .chain()
                    .run_if(session_active),
            );
    }
}
