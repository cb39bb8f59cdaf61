use bevy::prelude::*;

/// One sampled anchor position with its capture-time width vectors and age.
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    /// World-space sample location at capture time.
    pub position: Vec3,
    /// Seconds since capture, advanced every frame until eviction.
    pub age: f32,
    /// Side offset at the widest end: `right_axis * start_width` at capture time.
    pub width_outer: Vec3,
    /// Taper span interpolated against later: `right_axis * (start_width - end_width)`.
    pub width_span: Vec3,
}

/// Ordered, time-decaying sequence of trail points.
///
/// Points are stored oldest first and never reordered. The buffer grows
/// through motion-gated sampling and shrinks through lifespan eviction,
/// which keeps its size self-limiting under steady motion.
#[derive(Debug, Clone, Default)]
pub struct PointBuffer {
    points: Vec<TrailPoint>,
    /// Position of the last accepted sample, compared against the anchor
    /// each frame to decide whether it travelled far enough for a new point.
    last_sampled: Option<Vec3>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new point at the tail with age zero. Always succeeds;
    /// motion gating is the caller's job (see [`PointBuffer::sample`]).
    pub fn append_point(
        &mut self,
        position: Vec3,
        right_axis: Vec3,
        start_width: f32,
        end_width: f32,
    ) {
        debug_assert!(position.is_finite(), "point position must be finite");
        debug_assert!(right_axis.is_finite(), "right axis must be finite");

        let width_outer = right_axis * start_width;
        self.points.push(TrailPoint {
            position,
            age: 0.0,
            width_outer,
            width_span: width_outer - right_axis * end_width,
        });
    }

    /// Motion-gated sampling: appends only when the anchor moved strictly
    /// further than `motion_delta` (Euclidean, world space) from the last
    /// accepted sample. The first offer after a fresh or cleared buffer is
    /// always accepted. Returns whether a point was appended.
    pub fn sample(
        &mut self,
        position: Vec3,
        right_axis: Vec3,
        start_width: f32,
        end_width: f32,
        motion_delta: f32,
    ) -> bool {
        debug_assert!(motion_delta >= 0.0, "motion_delta must be non-negative");

        let moved = match self.last_sampled {
            Some(last) => last.distance(position) > motion_delta,
            None => true,
        };
        if moved {
            self.append_point(position, right_axis, start_width, end_width);
            self.last_sampled = Some(position);
        }
        moved
    }

    /// Age every point by `delta_time`, then drop the points whose age now
    /// exceeds `life_span`. A forward scan collecting survivors keeps the
    /// buffer densely packed and in order even when a frame hitch expires
    /// several points at once. Returns the number of points evicted.
    pub fn advance(&mut self, delta_time: f32, life_span: f32) -> usize {
        debug_assert!(delta_time >= 0.0, "delta_time must be non-negative");
        debug_assert!(life_span > 0.0, "life_span must be positive");

        for point in &mut self.points {
            point.age += delta_time;
        }
        let before = self.points.len();
        self.points.retain(|point| point.age <= life_span);
        before - self.points.len()
    }

    /// Empty the buffer and forget the sampling reference, so the next
    /// offered position starts a fresh trail. Idempotent.
    pub fn clear(&mut self) {
        self.points.clear();
        self.last_sampled = None;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Read-only snapshot for the strip builder and tests.
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&TrailPoint> {
        self.points.get(index)
    }
}
