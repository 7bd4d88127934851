//! Observers that wire confirmation input to the rectangle builder.

use bevy::prelude::*;

use crate::events::LabelCreated;
use crate::events::RectangleCompleted;
use crate::events::Select;
use crate::measure::RectangleBuilder;
use crate::measure::RectangleStore;
use crate::surface::SurfaceTracker;

/// Observer for `Select` - places a point on the current surface hit.
/// Selecting while no surface is found is a silent no-op.
pub fn on_select(
    _select: On<Select>,
    mut commands: Commands,
    tracker: Res<SurfaceTracker>,
    mut builder: ResMut<RectangleBuilder>,
    mut store: ResMut<RectangleStore>,
) {
    let hit = tracker.hit();
    if !hit.valid {
        return;
    }

    let added = builder.add_point(hit.position, &mut store);
    debug!(
        "Point {:.3?} placed ({} in progress)",
        hit.position,
        builder.point_count()
    );

    for label in added.labels {
        commands.trigger(LabelCreated {
            label:  label.id,
            anchor: label.anchor,
            text:   label.text,
        });
    }

    if let Some(index) = added.completed {
        info!("Rectangle {index} completed ({} stored)", store.len());
        commands.trigger(RectangleCompleted { index });
    }
}
