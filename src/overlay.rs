//! UI text nodes that display edge lengths over the live view.
//!
//! Each label gets one absolutely positioned `Text` node when it is created. The node is
//! re-centered on the label's projected screen position every frame and despawned when the
//! session ends.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::events::LabelCreated;
use crate::measure::LabelId;
use crate::measure::RectangleBuilder;
use crate::measure::RectangleStore;
use crate::session::SessionStatus;

/// Appearance of measurement labels
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct LabelStyle {
    pub font_size:        f32,
    pub text_color:       Color,
    pub background_color: Color,
    pub padding:          f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size:        16.0,
            text_color:       Color::WHITE,
            background_color: Color::srgba(0.0, 0.0, 0.0, 0.6),
            padding:          4.0,
        }
    }
}

/// Overlay node displaying one label
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct LabelOverlay {
    pub label: LabelId,
}

/// Observer for `LabelCreated` - spawns the label's overlay node.
/// Labels that no longer exist (the session ended before the event was delivered) get none.
pub fn on_label_created(
    created: On<LabelCreated>,
    mut commands: Commands,
    style: Res<LabelStyle>,
    status: Res<SessionStatus>,
    builder: Res<RectangleBuilder>,
    store: Res<RectangleStore>,
) {
    let label = created.label;
    if !status.is_active() || !(builder.owns_label(label) || store.owns_label(label)) {
        debug!("Label {label:?} no longer exists, skipping overlay");
        return;
    }
    debug!("Label {label:?} created: {}", created.text);

    commands.spawn((
        Text::new(created.text.clone()),
        TextFont {
            font_size: style.font_size,
            ..default()
        },
        TextColor(style.text_color),
        BackgroundColor(style.background_color),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::all(Val::Px(style.padding)),
            ..default()
        },
        LabelOverlay { label },
    ));
}

/// System that centers each overlay node on its label's screen position
pub fn position_label_overlays(
    builder: Res<RectangleBuilder>,
    store: Res<RectangleStore>,
    mut overlay_query: Query<(&LabelOverlay, &mut Node, Option<&ComputedNode>)>,
) {
    let positions: HashMap<LabelId, Vec2> = store
        .labels()
        .chain(builder.in_progress().labels())
        .map(|label| (label.id, label.screen_position))
        .collect();

    for (overlay, mut node, computed) in &mut overlay_query {
        let Some(screen_position) = positions.get(&overlay.label) else {
            continue;
        };
        let half_size = computed.map_or(Vec2::ZERO, |computed| {
            computed.size() * computed.inverse_scale_factor() * 0.5
        });
        let top_left = *screen_position - half_size;
        node.left = Val::Px(top_left.x);
        node.top = Val::Px(top_left.y);
    }
}

/// Despawns every label overlay node
pub fn despawn_label_overlays(
    commands: &mut Commands,
    overlay_query: &Query<Entity, With<LabelOverlay>>,
) -> usize {
    let mut despawned = 0;
    for entity in overlay_query {
        commands.entity(entity).despawn();
        despawned += 1;
    }
    despawned
}
