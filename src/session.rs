//! Session lifecycle: start, teardown, unsupported environments, and viewport tracking.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy::window::WindowResized;

use crate::events::EndSession;
use crate::events::HitTestSourceReleased;
use crate::events::SessionUnsupported;
use crate::events::StartSession;
use crate::measure::RectangleBuilder;
use crate::measure::RectangleStore;
use crate::overlay::LabelOverlay;
use crate::overlay::despawn_label_overlays;
use crate::surface::SurfaceTracker;

const UNSUPPORTED_FONT_SIZE: f32 = 20.0;

/// Whether a measuring session is running
#[derive(Resource, Reflect, Debug, Clone, PartialEq, Eq, Default)]
#[reflect(Resource)]
pub enum SessionStatus {
    #[default]
    Inactive,
    Active,
    /// The host cannot run an AR session
    Unsupported(String),
}

impl SessionStatus {
    pub const fn is_active(&self) -> bool { matches!(self, Self::Active) }
}

/// Logical size of the view labels are projected into
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource)]
pub struct ViewportSize(pub Vec2);

impl Default for ViewportSize {
    fn default() -> Self { Self(Vec2::new(1280.0, 720.0)) }
}

/// Marks the fallback message shown when no session can be provided
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct UnsupportedMessage;

/// Run condition: true while a session is active
pub fn session_active(status: Res<SessionStatus>) -> bool { status.is_active() }

/// System that follows primary window resizes while the session is active
pub fn track_viewport_size(
    mut resized: MessageReader<WindowResized>,
    mut viewport: ResMut<ViewportSize>,
    primary_query: Query<Entity, With<PrimaryWindow>>,
) {
    let primary = primary_query.single().ok();
    let last = resized
        .read()
        .filter(|event| Some(event.window) == primary)
        .last();

    if let Some(last) = last {
        viewport.0 = Vec2::new(last.width, last.height);
        debug!("Viewport resized to {}x{}", last.width, last.height);
    }
}

/// Observer for `StartSession` - activates tracking and projection
pub fn on_start_session(
    _start: On<StartSession>,
    mut status: ResMut<SessionStatus>,
    mut viewport: ResMut<ViewportSize>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    match *status {
        SessionStatus::Active => {
            debug!("StartSession: session already active");
            return;
        },
        SessionStatus::Unsupported(ref reason) => {
            debug!("StartSession: environment unsupported ({reason})");
            return;
        },
        SessionStatus::Inactive => {},
    }

    if let Ok(window) = window_query.single() {
        viewport.0 = Vec2::new(window.width(), window.height());
    }

    *status = SessionStatus::Active;
    info!("Measuring session started ({}x{})", viewport.0.x, viewport.0.y);
}

/// Observer for `EndSession` - releases the hit-test source and removes everything the
/// session created
pub fn on_end_session(
    _end: On<EndSession>,
    mut commands: Commands,
    mut status: ResMut<SessionStatus>,
    mut tracker: ResMut<SurfaceTracker>,
    mut builder: ResMut<RectangleBuilder>,
    mut store: ResMut<RectangleStore>,
    overlay_query: Query<Entity, With<LabelOverlay>>,
) {
    if !status.is_active() {
        return;
    }

    let (rectangles, overlays) = tear_down(
        &mut commands,
        &mut tracker,
        &mut builder,
        &mut store,
        &overlay_query,
    );
    *status = SessionStatus::Inactive;

    info!("Measuring session ended: {rectangles} rectangles, {overlays} labels removed");
}

/// Observer for `SessionUnsupported` - ends any running session and shows a single fallback
/// message
pub fn on_session_unsupported(
    unsupported: On<SessionUnsupported>,
    mut commands: Commands,
    mut status: ResMut<SessionStatus>,
    mut tracker: ResMut<SurfaceTracker>,
    mut builder: ResMut<RectangleBuilder>,
    mut store: ResMut<RectangleStore>,
    overlay_query: Query<Entity, With<LabelOverlay>>,
) {
    match *status {
        SessionStatus::Unsupported(_) => {
            debug!("SessionUnsupported: {} (already reported)", unsupported.reason);
            return;
        },
        SessionStatus::Active => {
            let (rectangles, overlays) = tear_down(
                &mut commands,
                &mut tracker,
                &mut builder,
                &mut store,
                &overlay_query,
            );
            info!("Measuring session aborted: {rectangles} rectangles, {overlays} labels removed");
        },
        SessionStatus::Inactive => {},
    }

    warn!("AR session unsupported: {}", unsupported.reason);
    *status = SessionStatus::Unsupported(unsupported.reason.clone());

    commands.spawn((
        Text::new(unsupported.reason.clone()),
        TextFont {
            font_size: UNSUPPORTED_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(16.0),
            ..default()
        },
        UnsupportedMessage,
    ));
}

/// Releases the hit-test source, despawns every label overlay, and drops all rectangles.
/// Returns the number of rectangles and overlays removed.
fn tear_down(
    commands: &mut Commands,
    tracker: &mut SurfaceTracker,
    builder: &mut RectangleBuilder,
    store: &mut RectangleStore,
    overlay_query: &Query<Entity, With<LabelOverlay>>,
) -> (usize, usize) {
    if let Some(source) = tracker.release() {
        commands.trigger(HitTestSourceReleased { source });
    }
    let overlays = despawn_label_overlays(commands, overlay_query);
    let rectangles = store.len();

    store.clear();
    builder.reset();

    (rectangles, overlays)
}
