//! Presentation contract: the renderer reads a synced `Transform` and a
//! visual frame index per entity. No pixels are produced here.

use bevy::prelude::*;

use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::simulation::{CollisionTree, SimPosition, VisualFrame};

/// Seconds per animation frame exposed to the renderer.
const FRAME_TIME: f32 = 0.1;

/// Frames available per animation loop. Real frame counts live with the
/// renderer's assets; the core only promises a wrapping index.
const FRAME_WRAP: u32 = 8;

/// Copies simulation positions into render transforms.
pub fn sync_transforms(mut query: Query<(&SimPosition, &mut Transform)>) {
    for (pos, mut transform) in query.iter_mut() {
        let v = pos.0.to_vec2();
        transform.translation.x = v.x;
        transform.translation.y = v.y;
    }
}

/// Advances each entity's visual frame index on the render clock.
pub fn advance_visual_frames(mut query: Query<&mut VisualFrame>, time: Res<Time>) {
    let dt = time.delta_secs();
    for mut frame in query.iter_mut() {
        frame.timer += dt;
        while frame.timer >= FRAME_TIME {
            frame.timer -= FRAME_TIME;
            frame.index = (frame.index + 1) % FRAME_WRAP;
        }
    }
}

/// Optional broadphase diagnostics, toggled from the hot-reloadable config.
pub fn log_broadphase_stats(
    tree: Res<CollisionTree>,
    handle: Option<Res<GameConfigHandle>>,
    configs: Res<Assets<GameConfig>>,
) {
    let enabled = handle
        .and_then(|h| configs.get(&h.0))
        .map(|config| config.debug_log_broadphase)
        .unwrap_or(false);
    if enabled {
        info!("[BROADPHASE] Indexed entries: {}", tree.indexed_count());
    }
}
