//! Surface tracking from per-frame hit-test results.
//!
//! The XR runtime owns the actual hit-testing. This module requests a hit-test source once per
//! session, remembers the handle when the runtime resolves it, and each frame reduces that
//! source's hit records to the single best [`SurfaceHit`].
//!
//! Every request carries a fresh [`HitTestRequest`] id. A resolution is adopted only if it
//! answers the current session's request; any other handle is released straight back to the
//! runtime.

use bevy::prelude::*;

use crate::events::HitTestSourceFailed;
use crate::events::HitTestSourceReady;
use crate::events::HitTestSourceReleased;
use crate::events::HitTestSourceRequested;

/// Opaque handle to a hit-test source owned by the XR runtime
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestSource(pub u64);

/// Identifies one hit-test source request; never reused across sessions
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestRequest(pub u32);

/// Hit records for the current frame, best ranked first.
/// Written by the XR runtime every frame and consumed by [`track_surface`].
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct HitResults {
    pub source: Option<HitTestSource>,
    pub poses:  Vec<Mat4>,
}

impl HitResults {
    pub fn new(source: HitTestSource, poses: Vec<Mat4>) -> Self {
        Self {
            source: Some(source),
            poses,
        }
    }
}

/// Best surface pose for the current frame
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub position:  Vec3,
    pub transform: Mat4,
    pub valid:     bool,
}

impl SurfaceHit {
    /// No surface found
    pub const NONE: Self = Self {
        position:  Vec3::ZERO,
        transform: Mat4::IDENTITY,
        valid:     false,
    };

    pub fn from_pose(transform: Mat4) -> Self {
        Self {
            position: transform.w_axis.truncate(),
            transform,
            valid: true,
        }
    }
}

impl Default for SurfaceHit {
    fn default() -> Self { Self::NONE }
}

/// Hit-test source bookkeeping plus the latest surface hit
#[derive(Resource, Reflect, Debug, Default)]
#[reflect(Resource)]
pub struct SurfaceTracker {
    source:       Option<HitTestSource>,
    request:      Option<HitTestRequest>,
    next_request: u32,
    hit:          SurfaceHit,
}

impl SurfaceTracker {
    /// Latest surface hit, `valid == false` when nothing was found
    pub const fn hit(&self) -> &SurfaceHit { &self.hit }

    pub const fn source(&self) -> Option<HitTestSource> { self.source }

    /// The request issued this session, whether or not it resolved
    pub const fn request(&self) -> Option<HitTestRequest> { self.request }

    pub const fn is_requested(&self) -> bool { self.request.is_some() }

    /// Issues this session's source request.
    /// Returns `None` if one was already issued.
    pub fn request_source(&mut self) -> Option<HitTestRequest> {
        if self.request.is_some() {
            return None;
        }
        let request = HitTestRequest(self.next_request);
        self.next_request += 1;
        self.request = Some(request);
        Some(request)
    }

    /// Stores a resolved handle.
    /// Returns `false` when the caller should release `source`: it answers an older request, or
    /// a different handle was already adopted.
    pub fn source_ready(&mut self, request: HitTestRequest, source: HitTestSource) -> bool {
        if self.request != Some(request) {
            return false;
        }
        match self.source {
            None => {
                self.source = Some(source);
                true
            },
            Some(held) => held == source,
        }
    }

    /// Reduces one frame of hit records to the best hit.
    /// Records from any source other than ours are ignored.
    pub fn update(&mut self, source: Option<HitTestSource>, poses: &[Mat4]) -> &SurfaceHit {
        self.hit = match (self.source, source, poses.first()) {
            (Some(ours), Some(theirs), Some(best)) if ours == theirs => {
                SurfaceHit::from_pose(*best)
            },
            _ => SurfaceHit::NONE,
        };
        &self.hit
    }

    /// Forgets the handle and the latest hit, returning the handle so it can be released
    pub fn release(&mut self) -> Option<HitTestSource> {
        self.request = None;
        self.hit = SurfaceHit::NONE;
        self.source.take()
    }
}

/// Marks an entity that follows the current surface pose and hides when there is none
#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component)]
pub struct Reticle;

/// System that asks the runtime for a hit-test source once per session
pub fn request_hit_test_source(mut commands: Commands, mut tracker: ResMut<SurfaceTracker>) {
    if let Some(request) = tracker.request_source() {
        debug!("Requesting hit-test source ({request:?})");
        commands.trigger(HitTestSourceRequested { request });
    }
}

/// System that consumes this frame's hit records
pub fn track_surface(mut tracker: ResMut<SurfaceTracker>, mut results: ResMut<HitResults>) {
    let poses = std::mem::take(&mut results.poses);
    tracker.update(results.source, &poses);
}

/// System that moves reticles onto the current surface pose
pub fn follow_surface(
    tracker: Res<SurfaceTracker>,
    mut reticle_query: Query<(&mut Transform, &mut Visibility), With<Reticle>>,
) {
    let hit = tracker.hit();
    for (mut transform, mut visibility) in &mut reticle_query {
        if hit.valid {
            *transform = Transform::from_matrix(hit.transform);
            *visibility = Visibility::Inherited;
        } else {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Observer for `HitTestSourceReady` - stores the handle for later frames, or hands back one
/// nobody is waiting for
pub fn on_hit_test_source_ready(
    ready: On<HitTestSourceReady>,
    mut commands: Commands,
    mut tracker: ResMut<SurfaceTracker>,
) {
    let source = ready.source;
    if tracker.source_ready(ready.request, source) {
        info!("Hit-test source {source:?} ready");
    } else {
        debug!("Releasing hit-test source {source:?}: {:?} is not outstanding", ready.request);
        commands.trigger(HitTestSourceReleased { source });
    }
}

/// Observer for `HitTestSourceFailed` - hit-testing stays inactive for this session
pub fn on_hit_test_source_failed(failed: On<HitTestSourceFailed>, tracker: Res<SurfaceTracker>) {
    if tracker.request() == Some(failed.request) {
        warn!("Hit-test source request failed; surface tracking disabled for this session");
    } else {
        debug!("Ignoring failure of stale {:?}", failed.request);
    }
}
