//! Gizmo drawing of placed points and measured edges
//!
//! Uses Bevy's GizmoConfigGroup pattern so the drawing can be toggled independently.
//! Toggle via `GizmoConfigStore::config_mut::<MeasurementGizmo>().enabled`

use bevy::prelude::*;

use crate::measure::RectangleBuilder;
use crate::measure::RectangleStore;

/// Gizmo config group for measurement drawing
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct MeasurementGizmo {}

/// Colors and sizes for measurement drawing
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct MeasurementGizmoConfig {
    pub completed_color:   Color,
    pub in_progress_color: Color,
    pub point_radius:      f32,
    pub line_width:        f32,
}

impl Default for MeasurementGizmoConfig {
    fn default() -> Self {
        Self {
            completed_color:   Color::WHITE,
            in_progress_color: Color::srgb(1.0, 1.0, 0.0), // Yellow
            point_radius:      0.01,
            line_width:        3.0,
        }
    }
}

/// Plugin that draws rectangles with gizmos
pub struct MeasurementVisualizationPlugin;

impl Plugin for MeasurementVisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<MeasurementGizmo>()
            .init_resource::<MeasurementGizmoConfig>()
            .add_systems(Update, (sync_gizmo_config, draw_measurements).chain());
    }
}

/// Keeps gizmo line width in step with the config resource
fn sync_gizmo_config(
    mut config_store: ResMut<GizmoConfigStore>,
    viz_config: Res<MeasurementGizmoConfig>,
) {
    let (config, _) = config_store.config_mut::<MeasurementGizmo>();
    config.line.width = viz_config.line_width;
}

/// Draws completed rectangles and the open polyline being built
fn draw_measurements(
    mut gizmos: Gizmos<MeasurementGizmo>,
    config: Res<MeasurementGizmoConfig>,
    builder: Res<RectangleBuilder>,
    store: Res<RectangleStore>,
) {
    for rectangle in store.iter() {
        for edge in rectangle.edges() {
            gizmos.line(edge.start, edge.end, config.completed_color);
        }
        for point in rectangle.points() {
            gizmos.sphere(
                Isometry3d::from_translation(*point),
                config.point_radius,
                config.completed_color,
            );
        }
    }

    let in_progress = builder.in_progress();
    for edge in in_progress.edges() {
        gizmos.line(edge.start, edge.end, config.in_progress_color);
    }
    for point in in_progress.points() {
        gizmos.sphere(
            Isometry3d::from_translation(*point),
            config.point_radius,
            config.in_progress_color,
        );
    }
}
