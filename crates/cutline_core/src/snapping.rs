use crate::types::Clip;
use uuid::Uuid;

/// Default capture distance for edge snapping, in seconds.
pub const SNAP_THRESHOLD: f64 = 0.2;

/// Default grid step for precision snapping, in seconds.
pub const GRID_STEP: f64 = 1.0;

/// Snap a proposed start position against the edges of every other clip.
///
/// Both edges of the moving clip (start, and end = proposed + length) are
/// tested against both edges of each other clip. The single closest match
/// within `threshold` wins; an end-edge match shifts the returned start by
/// `target - length`. With no match the proposal passes through unchanged.
/// The result never goes below 0.
pub fn snap_move(
    moving_key: Uuid,
    proposed_start: f64,
    length: f64,
    clips: &[&Clip],
    threshold: f64,
) -> f64 {
    let mut best: Option<(f64, f64)> = None; // (distance, implied start)

    let mut consider = |distance: f64, implied_start: f64| {
        if distance <= threshold && best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, implied_start));
        }
    };

    for other in clips {
        if other.key == moving_key {
            continue;
        }
        for target in [other.start, other.end()] {
            consider((proposed_start - target).abs(), target);
            let moving_end = proposed_start + length;
            consider((moving_end - target).abs(), target - length);
        }
    }

    match best {
        Some((_, start)) => start.max(0.0),
        None => proposed_start,
    }
}

/// Round a position to the nearest grid tick.
pub fn snap_grid(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start: f64, length: f64) -> Clip {
        Clip {
            key: Uuid::new_v4(),
            source_ref: Uuid::new_v4(),
            source_duration: 60.0,
            start,
            source_in: 0.0,
            source_out: length,
        }
    }

    #[test]
    fn snaps_start_to_neighbor_end() {
        let fixed = clip(0.0, 5.0); // occupies [0, 5)
        let moving = clip(5.1, 3.0);
        let clips = vec![&fixed, &moving];

        let result = snap_move(moving.key, 5.1, 3.0, &clips, 0.2);
        assert_eq!(result, 5.0);
    }

    #[test]
    fn snaps_end_to_neighbor_start() {
        let fixed = clip(10.0, 5.0);
        let moving = clip(0.0, 3.0);
        let clips = vec![&fixed, &moving];

        // Moving end would land at 9.9; snapping pulls it to 10.0, so the
        // start shifts to 7.0.
        let result = snap_move(moving.key, 6.9, 3.0, &clips, 0.2);
        assert!((result - 7.0).abs() < 1e-9);
    }

    #[test]
    fn no_snap_beyond_threshold() {
        let fixed = clip(0.0, 5.0);
        let moving = clip(5.5, 3.0);
        let clips = vec![&fixed, &moving];

        let result = snap_move(moving.key, 5.5, 3.0, &clips, 0.2);
        assert_eq!(result, 5.5);
    }

    #[test]
    fn closest_candidate_wins() {
        let a = clip(0.0, 5.0); // end at 5.0
        let b = clip(5.15, 4.0); // start at 5.15
        let moving = clip(5.1, 3.0);
        let clips = vec![&a, &b, &moving];

        // 5.1 is 0.1 from a.end and 0.05 from b.start.
        let result = snap_move(moving.key, 5.1, 3.0, &clips, 0.2);
        assert!((result - 5.15).abs() < 1e-9);
    }

    #[test]
    fn own_edges_are_ignored() {
        let moving = clip(3.0, 3.0);
        let clips = vec![&moving];

        let result = snap_move(moving.key, 3.05, 3.0, &clips, 0.2);
        assert_eq!(result, 3.05);
    }

    #[test]
    fn snapped_start_clamps_to_zero() {
        let fixed = clip(0.05, 5.0);
        let moving = clip(2.0, 3.0);
        let clips = vec![&fixed, &moving];

        // End-edge match against fixed.start would imply start = 0.05 - 3.0.
        let result = snap_move(moving.key, -2.9, 3.0, &clips, 0.2);
        assert_eq!(result, 0.0);
    }

    #[test]
    fn empty_timeline_passes_through() {
        let moving = clip(0.0, 2.0);
        let result = snap_move(moving.key, 4.2, 2.0, &[], 0.2);
        assert_eq!(result, 4.2);
    }

    #[test]
    fn grid_rounds_to_nearest_tick() {
        assert_eq!(snap_grid(4.4, 1.0), 4.0);
        assert_eq!(snap_grid(4.5, 1.0), 5.0);
        assert_eq!(snap_grid(0.2, 1.0), 0.0);
        assert_eq!(snap_grid(3.3, 0.5), 3.5);
    }
}
