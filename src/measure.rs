//! Rectangle builder state machine and the store of completed rectangles.
//!
//! Points arrive one at a time from confirmed selections. Each point after the first forms an
//! edge with its predecessor, so an in-progress rectangle is an open polyline. The fourth point
//! closes the shape back to the first point, freezes it into a [`Rectangle`], and resets the
//! builder.
//!
//! No geometric validation is performed: coincident, collinear, non-planar, or self-intersecting
//! corners are accepted as a rectangle like any other four points.

use bevy::prelude::*;

use crate::geometry::Edge;
use crate::geometry::RECTANGLE_CORNERS;
use crate::geometry::closed_edges;

/// Identifies a label (and its overlay node) for the lifetime of a session
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u32);

/// Length text anchored at an edge midpoint.
/// `anchor` and `text` are fixed at creation; `screen_position` is rewritten every frame.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct Label {
    pub id:              LabelId,
    pub anchor:          Vec3,
    pub text:            String,
    pub screen_position: Vec2,
}

impl Label {
    fn for_edge(id: LabelId, edge: &Edge) -> Self {
        Self {
            id,
            anchor: edge.midpoint(),
            text: edge.length_text(),
            screen_position: Vec2::ZERO,
        }
    }
}

/// A closed, labeled quadrilateral
#[derive(Reflect, Debug, Clone)]
pub struct Rectangle {
    points: [Vec3; RECTANGLE_CORNERS],
    edges:  [Edge; RECTANGLE_CORNERS],
    labels: [Label; RECTANGLE_CORNERS],
}

impl Rectangle {
    pub const fn points(&self) -> &[Vec3; RECTANGLE_CORNERS] { &self.points }

    /// `edges()[i]` runs from `points()[i]` to `points()[(i + 1) % 4]`
    pub const fn edges(&self) -> &[Edge; RECTANGLE_CORNERS] { &self.edges }

    /// One label per edge, in edge order
    pub const fn labels(&self) -> &[Label; RECTANGLE_CORNERS] { &self.labels }
}

/// Points, edges, and labels placed so far for the rectangle being built
#[derive(Reflect, Debug, Clone, Default)]
pub struct InProgressRectangle {
    points: Vec<Vec3>,
    edges:  Vec<Edge>,
    labels: Vec<Label>,
}

impl InProgressRectangle {
    pub fn points(&self) -> &[Vec3] { &self.points }

    pub fn edges(&self) -> &[Edge] { &self.edges }

    pub fn labels(&self) -> &[Label] { &self.labels }

    pub(crate) fn labels_mut(&mut self) -> impl Iterator<Item = &mut Label> {
        self.labels.iter_mut()
    }
}

/// What a call to [`RectangleBuilder::add_point`] produced
#[derive(Debug, Clone, Default)]
pub struct PointAdded {
    /// Labels created by this point (one per new edge)
    pub labels:    Vec<Label>,
    /// Store index of the rectangle this point completed
    pub completed: Option<usize>,
}

/// State machine turning confirmed points into rectangles.
///
/// `Empty -> Partial(1) -> Partial(2) -> Partial(3) -> (complete) -> Empty`
#[derive(Resource, Reflect, Debug, Default)]
#[reflect(Resource)]
pub struct RectangleBuilder {
    in_progress: InProgressRectangle,
    next_label:  u32,
}

impl RectangleBuilder {
    pub const fn in_progress(&self) -> &InProgressRectangle { &self.in_progress }

    pub(crate) fn in_progress_mut(&mut self) -> &mut InProgressRectangle {
        &mut self.in_progress
    }

    /// Number of points placed on the rectangle being built (0-3)
    pub fn point_count(&self) -> usize { self.in_progress.points.len() }

    /// Accepts `point` unconditionally.
    /// Completing a rectangle appends it to `store` and resets the builder.
    pub fn add_point(&mut self, point: Vec3, store: &mut RectangleStore) -> PointAdded {
        let mut added = PointAdded::default();

        self.in_progress.points.push(point);
        let count = self.in_progress.points.len();

        if count >= 2 {
            let edge = Edge::new(self.in_progress.points[count - 2], point);
            added.labels.push(self.push_edge(edge));
        }

        if count == RECTANGLE_CORNERS {
            let closing = Edge::new(point, self.in_progress.points[0]);
            added.labels.push(self.push_edge(closing));

            let finished = std::mem::take(&mut self.in_progress);
            added.completed = Some(store.push(Self::close(&finished)));
        }

        added
    }

    fn push_edge(&mut self, edge: Edge) -> Label {
        let label = Label::for_edge(LabelId(self.next_label), &edge);
        self.next_label += 1;
        self.in_progress.edges.push(edge);
        self.in_progress.labels.push(label.clone());
        label
    }

    /// Freezes a four-point polyline whose closing edge has been pushed.
    /// Only called from `add_point` once exactly four points and four labels exist.
    fn close(finished: &InProgressRectangle) -> Rectangle {
        let points: [Vec3; RECTANGLE_CORNERS] = std::array::from_fn(|i| finished.points[i]);
        let labels: [Label; RECTANGLE_CORNERS] =
            std::array::from_fn(|i| finished.labels[i].clone());

        Rectangle {
            edges: closed_edges(&points),
            points,
            labels,
        }
    }

    /// Drops the rectangle being built at session teardown.
    /// Label ids keep counting so a label from an ended session is never mistaken for a new one.
    pub(crate) fn reset(&mut self) { self.in_progress = InProgressRectangle::default(); }

    /// True if `id` belongs to the rectangle being built
    pub fn owns_label(&self, id: LabelId) -> bool {
        self.in_progress.labels.iter().any(|label| label.id == id)
    }
}

/// Append-only, ordered collection of completed rectangles
#[derive(Resource, Reflect, Debug, Default)]
#[reflect(Resource)]
pub struct RectangleStore {
    rectangles: Vec<Rectangle>,
}

impl RectangleStore {
    /// Appends a rectangle and returns its index
    pub fn push(&mut self, rectangle: Rectangle) -> usize {
        self.rectangles.push(rectangle);
        self.rectangles.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Rectangle> { self.rectangles.get(index) }

    pub fn iter(&self) -> impl Iterator<Item = &Rectangle> { self.rectangles.iter() }

    pub fn len(&self) -> usize { self.rectangles.len() }

    pub fn is_empty(&self) -> bool { self.rectangles.is_empty() }

    /// Every label owned by every stored rectangle
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.rectangles.iter().flat_map(|rectangle| rectangle.labels.iter())
    }

    pub(crate) fn labels_mut(&mut self) -> impl Iterator<Item = &mut Label> {
        self.rectangles.iter_mut().flat_map(|rectangle| rectangle.labels.iter_mut())
    }

    /// True if `id` belongs to a stored rectangle
    pub fn owns_label(&self, id: LabelId) -> bool { self.labels().any(|label| label.id == id) }

    /// Drops all rectangles at session teardown
    pub(crate) fn clear(&mut self) { self.rectangles.clear(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> [Vec3; 4] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn partial_rectangle_is_an_open_polyline() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        let first = builder.add_point(Vec3::ZERO, &mut store);
        assert!(first.labels.is_empty());
        assert_eq!(builder.in_progress().edges().len(), 0);

        builder.add_point(Vec3::X, &mut store);
        let third = builder.add_point(Vec3::new(1.0, 0.0, 1.0), &mut store);

        assert_eq!(third.labels.len(), 1);
        assert!(third.completed.is_none());
        assert_eq!(builder.point_count(), 3);
        // No closing edge from point 3 back to point 1 yet
        let edges = builder.in_progress().edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0], Edge::new(Vec3::ZERO, Vec3::X));
        assert_eq!(edges[1], Edge::new(Vec3::X, Vec3::new(1.0, 0.0, 1.0)));
        assert!(store.is_empty());
    }

    #[test]
    fn fourth_point_closes_and_stores_rectangle() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();
        let square = unit_square();

        let mut last = PointAdded::default();
        for point in square {
            last = builder.add_point(point, &mut store);
        }

        // Edge 3->4 and the closing edge 4->1
        assert_eq!(last.labels.len(), 2);
        assert_eq!(last.completed, Some(0));
        assert_eq!(builder.point_count(), 0);
        assert!(builder.in_progress().labels().is_empty());
        assert_eq!(store.len(), 1);

        let Some(rectangle) = store.get(0) else {
            panic!("rectangle should be stored");
        };
        assert_eq!(rectangle.points(), &square);
        for (i, edge) in rectangle.edges().iter().enumerate() {
            assert_eq!(edge.start, square[i]);
            assert_eq!(edge.end, square[(i + 1) % 4]);
            assert!((edge.length() - 1.0).abs() < 1e-6);
        }
        assert_eq!(rectangle.edges()[3], Edge::new(square[3], square[0]));
        for (label, edge) in rectangle.labels().iter().zip(rectangle.edges()) {
            assert_eq!(label.text, "100 cm");
            assert_eq!(label.anchor, edge.midpoint());
        }
    }

    #[test]
    fn labels_keep_their_ids_when_rectangle_completes() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        let mut created = Vec::new();
        for point in unit_square() {
            created.extend(builder.add_point(point, &mut store).labels);
        }

        let Some(rectangle) = store.get(0) else {
            panic!("rectangle should be stored");
        };
        let stored: Vec<LabelId> = rectangle.labels().iter().map(|label| label.id).collect();
        let emitted: Vec<LabelId> = created.iter().map(|label| label.id).collect();
        assert_eq!(stored, emitted);
        assert_eq!(stored, vec![LabelId(0), LabelId(1), LabelId(2), LabelId(3)]);
    }

    #[test]
    fn store_grows_by_one_per_four_points() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        for round in 1..=3 {
            for point in unit_square() {
                builder.add_point(point + Vec3::Y * round as f32, &mut store);
            }
            assert_eq!(store.len(), round);
            assert_eq!(builder.point_count(), 0);
        }

        let ids: Vec<LabelId> = store.labels().map(|label| label.id).collect();
        assert_eq!(ids.len(), 12);
        assert_eq!(ids.last(), Some(&LabelId(11)));
    }

    #[test]
    fn stored_points_are_copies() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        let mut source = Vec3::ZERO;
        builder.add_point(source, &mut store);
        source.x = 5.0;
        for point in &unit_square()[1..] {
            builder.add_point(*point, &mut store);
        }

        assert_eq!(source.x, 5.0);
        assert_eq!(store.get(0).map(|r| r.points()[0]), Some(Vec3::ZERO));
    }

    #[test]
    fn degenerate_points_still_form_a_rectangle() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        for _ in 0..4 {
            builder.add_point(Vec3::splat(2.0), &mut store);
        }

        assert_eq!(store.len(), 1);
        let Some(rectangle) = store.get(0) else {
            panic!("rectangle should be stored");
        };
        assert!(rectangle.edges().iter().all(|edge| edge.length() == 0.0));
        assert!(rectangle.labels().iter().all(|label| label.text == "0 cm"));
    }

    #[test]
    fn self_intersecting_quad_is_accepted() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        // Bow-tie ordering, one corner lifted off the plane
        let corners = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.3, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        for corner in corners {
            builder.add_point(corner, &mut store);
        }

        assert_eq!(store.get(0).map(Rectangle::points), Some(&corners));
    }

    #[test]
    fn reset_drops_partial_rectangle_but_not_label_ids() {
        let mut builder = RectangleBuilder::default();
        let mut store = RectangleStore::default();

        builder.add_point(Vec3::ZERO, &mut store);
        builder.add_point(Vec3::X, &mut store);
        assert!(builder.owns_label(LabelId(0)));

        builder.reset();
        assert_eq!(builder.point_count(), 0);
        assert!(!builder.owns_label(LabelId(0)));

        builder.add_point(Vec3::ZERO, &mut store);
        let added = builder.add_point(Vec3::Z, &mut store);
        assert_eq!(added.labels[0].id, LabelId(1));
        assert!(!builder.owns_label(LabelId(0)));
    }
}
