//! Desktop stand-in for an AR session using `bevy_ar_measure`.
//!
//! The mouse plays the role of the XR hit-test: hovering the ground reports a surface pose and
//! moves the reticle, clicking confirms a point.
//!
//! - Left click: place a corner (four corners close a rectangle)
//! - Middle drag: orbit the viewpoint, shift+middle drag to pan
//! - Escape: end the session (removes all labels)
//! - Enter: start a new session

use std::f32::consts::PI;

use bevy::color::palettes::basic::SILVER;
use bevy::prelude::*;
use bevy_ar_measure::EndSession;
use bevy_ar_measure::HitResults;
use bevy_ar_measure::HitTestSource;
use bevy_ar_measure::HitTestSourceReady;
use bevy_ar_measure::HitTestSourceReleased;
use bevy_ar_measure::HitTestSourceRequested;
use bevy_ar_measure::MeasureCamera;
use bevy_ar_measure::MeasurePlugin;
use bevy_ar_measure::MeasurementVisualizationPlugin;
use bevy_ar_measure::RectangleCompleted;
use bevy_ar_measure::RectangleStore;
use bevy_ar_measure::Reticle;
use bevy_ar_measure::Select;
use bevy_ar_measure::StartSession;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use bevy_panorbit_camera::TrackpadBehavior;

const SIMULATED_SOURCE: HitTestSource = HitTestSource(1);
const GROUND_SIZE: f32 = 6.0;
const RETICLE_MINOR_RADIUS: f32 = 0.005;
const RETICLE_MAJOR_RADIUS: f32 = 0.05;

/// Surface pose under the mouse cursor, if any
#[derive(Resource, Default)]
struct GroundHover(Option<Mat4>);

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            PanOrbitCameraPlugin,
            MeshPickingPlugin,
            MeasurePlugin,
            MeasurementVisualizationPlugin,
            BrpExtrasPlugin::default(),
        ))
        .init_resource::<GroundHover>()
        .add_systems(Startup, (setup, start_session).chain())
        .add_systems(PreUpdate, publish_hit_results)
        .add_systems(Update, toggle_session)
        .add_observer(grant_hit_test_source)
        .add_observer(log_source_released)
        .add_observer(log_rectangle_completed)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Ground plane stands in for the sensed real-world surface
    commands
        .spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::from(SILVER),
                ..default()
            })),
        ))
        .observe(on_ground_hovered)
        .observe(on_ground_left)
        .observe(on_ground_clicked);

    // Reticle (hidden until the cursor is over the ground)
    commands.spawn((
        Mesh3d(meshes.add(Torus::new(
            RETICLE_MAJOR_RADIUS - RETICLE_MINOR_RADIUS,
            RETICLE_MAJOR_RADIUS,
        ))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        Reticle,
        Pickable::IGNORE,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 1500.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::ZYX, 0.0, PI / 4.0, -PI / 4.0)),
    ));

    // Camera (middle-click orbit, shift+middle pan, trackpad support)
    commands.spawn((
        PanOrbitCamera {
            button_orbit: MouseButton::Middle,
            button_pan: MouseButton::Middle,
            modifier_pan: Some(KeyCode::ShiftLeft),
            trackpad_behavior: TrackpadBehavior::BlenderLike {
                modifier_pan:  Some(KeyCode::ShiftLeft),
                modifier_zoom: Some(KeyCode::ControlLeft),
            },
            trackpad_pinch_to_zoom_enabled: true,
            focus: Vec3::ZERO,
            radius: Some(3.0),
            pitch: Some(0.7),
            ..default()
        },
        MeasureCamera,
    ));
}

fn start_session(mut commands: Commands) { commands.trigger(StartSession); }

/// Simulated runtime: resolves every hit-test source request immediately
fn grant_hit_test_source(requested: On<HitTestSourceRequested>, mut commands: Commands) {
    commands.trigger(HitTestSourceReady {
        request: requested.request,
        source:  SIMULATED_SOURCE,
    });
}

/// Simulated runtime: reports the hovered ground pose as this frame's only hit
fn publish_hit_results(hover: Res<GroundHover>, mut results: ResMut<HitResults>) {
    *results = HitResults::new(SIMULATED_SOURCE, hover.0.into_iter().collect());
}

fn on_ground_hovered(hovered: On<Pointer<Move>>, mut hover: ResMut<GroundHover>) {
    let Some(position) = hovered.hit.position else {
        return;
    };
    let normal = hovered.hit.normal.unwrap_or(Vec3::Y);
    let rotation = Quat::from_rotation_arc(Vec3::Y, normal.normalize_or(Vec3::Y));
    hover.0 = Some(Mat4::from_rotation_translation(rotation, position));
}

fn on_ground_left(_left: On<Pointer<Out>>, mut hover: ResMut<GroundHover>) { hover.0 = None; }

fn on_ground_clicked(click: On<Pointer<Click>>, mut commands: Commands) {
    if click.button == PointerButton::Primary {
        commands.trigger(Select);
    }
}

fn toggle_session(keyboard: Res<ButtonInput<KeyCode>>, mut commands: Commands) {
    if keyboard.just_pressed(KeyCode::Escape) {
        commands.trigger(EndSession);
    }
    if keyboard.just_pressed(KeyCode::Enter) {
        commands.trigger(StartSession);
    }
}

fn log_source_released(released: On<HitTestSourceReleased>) {
    info!("Simulated runtime: hit-test source {:?} released", released.source);
}

fn log_rectangle_completed(completed: On<RectangleCompleted>, store: Res<RectangleStore>) {
    let Some(rectangle) = store.get(completed.index) else {
        return;
    };
    let sides: Vec<&str> = rectangle
        .labels()
        .iter()
        .map(|label| label.text.as_str())
        .collect();
    info!("Rectangle {}: {}", completed.index, sides.join(", "));
}
