//! Screen-space projection of label anchors.
//!
//! The camera moves every frame while label anchors stay fixed in the world, so every label is
//! re-projected every frame whether or not any geometry changed.

use bevy::prelude::*;

use crate::measure::RectangleBuilder;
use crate::measure::RectangleStore;
use crate::session::ViewportSize;

/// Marks the camera whose view drives label projection
#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component)]
pub struct MeasureCamera;

/// World-to-clip transform of the `MeasureCamera`, refreshed every frame
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct ViewProjection(pub Mat4);

impl Default for ViewProjection {
    fn default() -> Self { Self(Mat4::IDENTITY) }
}

/// Combines a camera projection with the camera's world transform
pub fn view_projection(clip_from_view: Mat4, camera_transform: &GlobalTransform) -> Mat4 {
    let view_from_world = Mat4::from(camera_transform.affine().inverse());
    clip_from_view * view_from_world
}

/// Maps a world-space anchor to pixel coordinates with the origin at the top-left.
///
/// Anchors behind the camera are not treated specially; they land off-screen or mirrored.
pub fn project_to_viewport(view_projection: Mat4, anchor: Vec3, viewport: Vec2) -> Vec2 {
    let ndc = view_projection.project_point3(anchor);
    Vec2::new(
        (ndc.x + 1.0) * viewport.x * 0.5,
        (-ndc.y + 1.0) * viewport.y * 0.5,
    )
}

/// System that captures the measure camera's view-projection for this frame
pub fn sync_view_projection(
    camera_query: Query<(&Camera, &GlobalTransform), With<MeasureCamera>>,
    mut view_projection_res: ResMut<ViewProjection>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    view_projection_res.0 = view_projection(camera.clip_from_view(), camera_transform);
}

/// System that re-projects every label, stored and in-progress
pub fn project_labels(
    view_projection_res: Res<ViewProjection>,
    viewport: Res<ViewportSize>,
    mut builder: ResMut<RectangleBuilder>,
    mut store: ResMut<RectangleStore>,
) {
    let view_projection = view_projection_res.0;
    let viewport = viewport.0;

    let labels = store
        .labels_mut()
        .chain(builder.in_progress_mut().labels_mut());
    for label in labels {
        label.screen_position = project_to_viewport(view_projection, label.anchor, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn perspective() -> Mat4 {
        Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, VIEWPORT.x / VIEWPORT.y, 0.1, 100.0)
    }

    #[test]
    fn anchor_on_forward_axis_projects_to_center() {
        let camera = GlobalTransform::from(Transform::from_xyz(1.0, 1.5, 2.0));
        let view_projection = view_projection(perspective(), &camera);

        let anchor = Vec3::new(1.0, 1.5, -3.0);
        let screen = project_to_viewport(view_projection, anchor, VIEWPORT);

        assert!((screen - VIEWPORT / 2.0).length() < 1e-3);
    }

    #[test]
    fn identity_maps_ndc_corners_to_pixel_corners() {
        let top_left = project_to_viewport(Mat4::IDENTITY, Vec3::new(-1.0, 1.0, 0.0), VIEWPORT);
        let bottom_right = project_to_viewport(Mat4::IDENTITY, Vec3::new(1.0, -1.0, 0.0), VIEWPORT);

        assert_eq!(top_left, Vec2::ZERO);
        assert_eq!(bottom_right, VIEWPORT);
    }

    #[test]
    fn screen_y_grows_downward() {
        let camera = GlobalTransform::IDENTITY;
        let view_projection = view_projection(perspective(), &camera);

        let above = project_to_viewport(view_projection, Vec3::new(0.0, 0.5, -2.0), VIEWPORT);
        let right = project_to_viewport(view_projection, Vec3::new(0.5, 0.0, -2.0), VIEWPORT);

        assert!(above.y < VIEWPORT.y / 2.0);
        assert!(right.x > VIEWPORT.x / 2.0);
    }

    #[test]
    fn moving_camera_moves_label_but_not_anchor() {
        let anchor = Vec3::new(0.0, 0.0, -2.0);
        let before = project_to_viewport(
            view_projection(perspective(), &GlobalTransform::IDENTITY),
            anchor,
            VIEWPORT,
        );
        let after = project_to_viewport(
            view_projection(
                perspective(),
                &GlobalTransform::from(Transform::from_xyz(0.5, 0.0, 0.0)),
            ),
            anchor,
            VIEWPORT,
        );

        assert!(after.x < before.x);
        assert!((after.y - before.y).abs() < 1e-3);
    }
}
