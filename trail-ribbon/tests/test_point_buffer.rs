// tests/test_point_buffer.rs — Integration tests for the point lifecycle buffer:
// motion-gated sampling, uniform aging, lifespan eviction, clearing.

use bevy::math::Vec3;
use trail_ribbon::PointBuffer;

const EPS: f32 = 1e-6;

/// Offer a position on the X axis through the motion gate with default widths.
fn offer(buffer: &mut PointBuffer, x: f32, motion_delta: f32) -> bool {
    buffer.sample(Vec3::new(x, 0.0, 0.0), Vec3::X, 0.5, 0.0, motion_delta)
}

// ===== Motion gate =====

#[test]
fn first_offer_always_appends() {
    let mut buffer = PointBuffer::new();
    assert!(offer(&mut buffer, 0.0, 0.1), "fresh buffer must accept the first offer");
    assert_eq!(buffer.len(), 1);
}

#[test]
fn gate_scenario_straight_line_motion() {
    // Positions 0.0, 0.2, 0.5 each exceed motion_delta = 0.1 from the last
    // accepted sample; 0.55 is only 0.05 past it and must be rejected.
    let mut buffer = PointBuffer::new();
    assert!(offer(&mut buffer, 0.0, 0.1));
    assert!(offer(&mut buffer, 0.2, 0.1));
    assert!(offer(&mut buffer, 0.5, 0.1));
    assert!(!offer(&mut buffer, 0.55, 0.1), "0.05 of travel must not pass a 0.1 gate");
    assert_eq!(buffer.len(), 3);
}

#[test]
fn gate_comparison_is_strict() {
    // Exactly motion_delta of travel is not enough. 0.25 is exact in f32,
    // so the distance comes out equal rather than merely close.
    let mut buffer = PointBuffer::new();
    assert!(offer(&mut buffer, 0.0, 0.25));
    assert!(!offer(&mut buffer, 0.25, 0.25), "gate must use strictly-greater comparison");
    assert_eq!(buffer.len(), 1);
}

#[test]
fn rejected_offers_do_not_move_the_reference() {
    let mut buffer = PointBuffer::new();
    assert!(offer(&mut buffer, 0.0, 0.1));
    assert!(!offer(&mut buffer, 0.05, 0.1));
    assert!(!offer(&mut buffer, 0.08, 0.1));
    // 0.12 clears the gate against the accepted sample at 0.0, not the
    // rejected offers in between.
    assert!(offer(&mut buffer, 0.12, 0.1));
    assert_eq!(buffer.len(), 2);
}

#[test]
fn no_two_samples_closer_than_motion_delta() {
    let mut buffer = PointBuffer::new();
    for step in 0..=10 {
        offer(&mut buffer, step as f32 * 0.03, 0.1);
    }
    for pair in buffer.points().windows(2) {
        let spacing = pair[0].position.distance(pair[1].position);
        assert!(
            spacing > 0.1,
            "adjacent samples {:?} and {:?} are only {spacing} apart",
            pair[0].position,
            pair[1].position
        );
    }
}

// ===== Width capture =====

#[test]
fn width_vectors_captured_at_append() {
    let mut buffer = PointBuffer::new();
    buffer.append_point(Vec3::ZERO, Vec3::Z, 0.5, 0.2);

    let point = buffer.get(0).expect("one point");
    assert!((point.width_outer - Vec3::new(0.0, 0.0, 0.5)).length() < EPS);
    assert!((point.width_span - Vec3::new(0.0, 0.0, 0.3)).length() < EPS);
    assert_eq!(point.age, 0.0);
}

// ===== Aging and eviction =====

#[test]
fn advance_ages_every_point_uniformly() {
    let mut buffer = PointBuffer::new();
    offer(&mut buffer, 0.0, 0.1);
    buffer.advance(0.25, 10.0);
    offer(&mut buffer, 0.5, 0.1);
    buffer.advance(0.25, 10.0);

    let ages: Vec<f32> = buffer.points().iter().map(|p| p.age).collect();
    assert_eq!(ages.len(), 2);
    assert!((ages[0] - 0.5).abs() < EPS);
    assert!((ages[1] - 0.25).abs() < EPS);
}

#[test]
fn eviction_scenario_leaves_survivors_in_order() {
    // Build ages (oldest first) 1.1, 0.9, 0.5, 0.2 without evicting, then a
    // zero-delta advance against life_span = 1.0 must drop exactly the 1.1
    // point and keep the rest densely packed in order.
    let mut buffer = PointBuffer::new();
    buffer.append_point(Vec3::new(0.0, 0.0, 0.0), Vec3::X, 0.5, 0.0);
    buffer.advance(0.2, 10.0);
    buffer.append_point(Vec3::new(1.0, 0.0, 0.0), Vec3::X, 0.5, 0.0);
    buffer.advance(0.4, 10.0);
    buffer.append_point(Vec3::new(2.0, 0.0, 0.0), Vec3::X, 0.5, 0.0);
    buffer.advance(0.3, 10.0);
    buffer.append_point(Vec3::new(3.0, 0.0, 0.0), Vec3::X, 0.5, 0.0);
    buffer.advance(0.2, 10.0);

    let evicted = buffer.advance(0.0, 1.0);
    assert_eq!(evicted, 1, "only the point aged past 1.0 is evicted");
    assert_eq!(buffer.len(), 3);
    let xs: Vec<f32> = buffer.points().iter().map(|p| p.position.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0], "survivors keep insertion order with no holes");
}

#[test]
fn frame_hitch_evicts_several_points_at_once() {
    // Points aged 0.9, 0.6, 0.3, 0.0; a 0.5s hitch pushes the two oldest
    // past a 1.0s lifespan in a single advance.
    let mut buffer = PointBuffer::new();
    for i in 0..3 {
        buffer.append_point(Vec3::new(i as f32, 0.0, 0.0), Vec3::X, 0.5, 0.0);
        buffer.advance(0.3, 10.0);
    }
    buffer.append_point(Vec3::new(3.0, 0.0, 0.0), Vec3::X, 0.5, 0.0);

    let evicted = buffer.advance(0.5, 1.0);
    assert_eq!(evicted, 2, "the hitch must not stop at the first expired point");
    assert_eq!(buffer.len(), 2);
    let xs: Vec<f32> = buffer.points().iter().map(|p| p.position.x).collect();
    assert_eq!(xs, vec![2.0, 3.0]);
}

#[test]
fn age_equal_to_lifespan_survives() {
    // Eviction is strictly age > life_span.
    let mut buffer = PointBuffer::new();
    buffer.append_point(Vec3::ZERO, Vec3::X, 0.5, 0.0);

    assert_eq!(buffer.advance(1.0, 1.0), 0);
    assert_eq!(buffer.len(), 1, "age exactly at the lifespan is not expired yet");

    assert_eq!(buffer.advance(0.1, 1.0), 1);
    assert!(buffer.is_empty());
}

// ===== Clearing =====

#[test]
fn clear_is_idempotent() {
    let mut buffer = PointBuffer::new();
    offer(&mut buffer, 0.0, 0.1);
    offer(&mut buffer, 0.5, 0.1);

    buffer.clear();
    assert!(buffer.is_empty());
    buffer.clear();
    assert!(buffer.is_empty());
}

#[test]
fn clear_resets_the_sampling_reference() {
    let mut buffer = PointBuffer::new();
    offer(&mut buffer, 0.0, 0.1);
    buffer.clear();

    // Without the reset this offer would sit inside the old gate radius.
    assert!(offer(&mut buffer, 0.01, 0.1), "cleared buffer must accept the next offer");
    assert_eq!(buffer.len(), 1);
}
