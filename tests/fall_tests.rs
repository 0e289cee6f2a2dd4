// Host-side tests for the timed fall of a released cable end.

use approx::assert_abs_diff_eq;
use glam::Vec2;
use rigging_core::{ease_out_cubic, FallAnimation, FallPhase};

fn fall() -> FallAnimation {
    // anchor at the origin, released end 100 to the right
    FallAnimation::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 100.0)
}

#[test]
fn easing_is_cubic_out() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert_abs_diff_eq!(ease_out_cubic(0.5), 0.875, epsilon = 1e-6);
    assert_eq!(ease_out_cubic(-1.0), 0.0);
    assert_eq!(ease_out_cubic(3.0), 1.0);
}

#[test]
fn resting_point_hangs_below_anchor() {
    let f = fall();
    assert_eq!(f.to, Vec2::new(0.0, 100.0));
    assert_eq!(f.phase(), FallPhase::Idle);
    assert_eq!(f.duration_ms, 1500.0);
}

#[test]
fn step_before_start_does_nothing() {
    let mut f = fall();
    assert!(f.step(10.0).is_none());
    assert_eq!(f.falling_point(), Vec2::new(100.0, 0.0));
}

#[test]
fn only_an_idle_fall_can_start() {
    let mut f = fall();
    assert!(f.start(0.0));
    assert!(!f.start(5.0));
    assert!(f.is_running());
}

#[test]
fn halfway_uses_eased_progress() {
    let mut f = fall();
    f.start(1000.0);
    let frame = f.step(1750.0).expect("running fall yields a frame");
    assert_abs_diff_eq!(frame.progress, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.falling.x, 12.5, epsilon = 1e-3);
    assert_abs_diff_eq!(frame.falling.y, 87.5, epsilon = 1e-3);
    // light sag: 5% of the vertical drop so far
    let mid = (frame.curve.start + frame.curve.end) * 0.5;
    assert_abs_diff_eq!(frame.curve.control.y - mid.y, 87.5 * 0.05, epsilon = 1e-3);
    assert!(f.is_running());
}

#[test]
fn fall_finishes_at_duration() {
    let mut f = fall();
    f.start(0.0);
    let last = f.step(1500.0).expect("final frame");
    assert_eq!(last.falling, Vec2::new(0.0, 100.0));
    assert!(f.is_done());
    assert!(f.step(1600.0).is_none());
}

#[test]
fn settle_jumps_to_rest() {
    let mut f = fall();
    f.start(0.0);
    f.step(100.0);
    let frame = f.settle();
    assert_eq!(frame.falling, f.to);
    assert_eq!(f.phase(), FallPhase::Done);
}

#[test]
fn zero_duration_finishes_on_first_step() {
    let mut f = fall().with_duration(0.0);
    f.start(0.0);
    let frame = f.step(0.0).expect("frame");
    assert_eq!(frame.progress, 1.0);
    assert!(f.is_done());
}
