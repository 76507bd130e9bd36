use cutline_core::snapping::{snap_grid, snap_move, GRID_STEP, SNAP_THRESHOLD};
use cutline_core::timeline::TimelineModel;
use cutline_core::types::{ClipPatch, MIN_CLIP_LEN};
use uuid::Uuid;

/// Cumulative pointer travel below this is a click, not a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

// ---------------------------------------------------------------------------
// Pointer vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSide {
    Left,
    Right,
}

/// What the pointer went down on, as hit-tested by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Ruler,
    Clip(Uuid),
    ClipEdge(Uuid, TrimSide),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Precision modifier: snap to the one-second grid instead of clip edges.
    pub grid: bool,
}

/// What a pointer event asks the host to do beyond the model mutations the
/// controller already wrote itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEffect {
    None,
    /// Move the playhead to this timeline time.
    Scrub(f64),
    /// A click selected this clip.
    Select(Uuid),
}

// ---------------------------------------------------------------------------
// Gesture state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct DragScratch {
    key: Uuid,
    grab_x: f64,
    start: f64,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct TrimScratch {
    key: Uuid,
    side: TrimSide,
    grab_x: f64,
    start: f64,
    source_in: f64,
    source_out: f64,
    source_duration: f64,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Idle,
    Scrubbing,
    Dragging(DragScratch),
    Trimming(TrimScratch),
}

/// Read-only gesture summary for cursor and highlight feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Scrubbing,
    Dragging { key: Uuid },
    Trimming { key: Uuid, side: TrimSide },
}

// ---------------------------------------------------------------------------
// InteractionController
// ---------------------------------------------------------------------------

/// Pointer-gesture state machine for scrubbing, dragging and trimming.
///
/// At most one gesture is active at a time; a `pointer_down` while another
/// gesture owns the pointer is ignored, matching pointer-capture semantics.
/// The controller never stores clip state beyond the pre-gesture snapshot,
/// which is discarded (release) or restored (cancel) at gesture end.
pub struct InteractionController {
    gesture: Gesture,
    pixels_per_second: f64,
    scroll_offset_px: f64,
    selected: Option<Uuid>,
}

impl InteractionController {
    pub fn new(pixels_per_second: f64) -> Self {
        Self {
            gesture: Gesture::Idle,
            pixels_per_second,
            scroll_offset_px: 0.0,
            selected: None,
        }
    }

    pub fn set_scroll_offset(&mut self, pixels: f64) {
        self.scroll_offset_px = pixels;
    }

    pub fn set_pixels_per_second(&mut self, pps: f64) {
        self.pixels_per_second = pps;
    }

    pub fn state(&self) -> InteractionState {
        match self.gesture {
            Gesture::Idle => InteractionState::Idle,
            Gesture::Scrubbing => InteractionState::Scrubbing,
            Gesture::Dragging(s) => InteractionState::Dragging { key: s.key },
            Gesture::Trimming(s) => InteractionState::Trimming {
                key: s.key,
                side: s.side,
            },
        }
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Screen x to timeline time, clamped to >= 0.
    fn time_at(&self, x_px: f64) -> f64 {
        ((x_px + self.scroll_offset_px) / self.pixels_per_second).max(0.0)
    }

    // -----------------------------------------------------------------------
    // Pointer events
    // -----------------------------------------------------------------------

    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        x_px: f64,
        model: &TimelineModel,
    ) -> GestureEffect {
        if !matches!(self.gesture, Gesture::Idle) {
            return GestureEffect::None;
        }

        match target {
            PointerTarget::Ruler => {
                self.gesture = Gesture::Scrubbing;
                GestureEffect::Scrub(self.time_at(x_px))
            }
            PointerTarget::Clip(key) => {
                let Some(clip) = model.get(key) else {
                    return GestureEffect::None;
                };
                self.gesture = Gesture::Dragging(DragScratch {
                    key,
                    grab_x: x_px,
                    start: clip.start,
                    moved: false,
                });
                GestureEffect::None
            }
            PointerTarget::ClipEdge(key, side) => {
                let Some(clip) = model.get(key) else {
                    return GestureEffect::None;
                };
                self.gesture = Gesture::Trimming(TrimScratch {
                    key,
                    side,
                    grab_x: x_px,
                    start: clip.start,
                    source_in: clip.source_in,
                    source_out: clip.source_out,
                    source_duration: clip.source_duration,
                });
                GestureEffect::None
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        x_px: f64,
        modifiers: Modifiers,
        model: &mut TimelineModel,
    ) -> GestureEffect {
        match self.gesture {
            Gesture::Idle => GestureEffect::None,
            Gesture::Scrubbing => GestureEffect::Scrub(self.time_at(x_px)),
            Gesture::Dragging(mut scratch) => {
                let delta_px = x_px - scratch.grab_x;
                if !scratch.moved && delta_px.abs() < DRAG_THRESHOLD_PX {
                    return GestureEffect::None;
                }
                scratch.moved = true;
                self.gesture = Gesture::Dragging(scratch);

                let Some(length) = model.get(scratch.key).map(|c| c.length()) else {
                    // Clip vanished mid-gesture; nothing left to drag.
                    self.gesture = Gesture::Idle;
                    return GestureEffect::None;
                };

                let proposed = scratch.start + delta_px / self.pixels_per_second;
                // Grid and edge snapping never compete within one move event.
                let snapped = if modifiers.grid {
                    snap_grid(proposed, GRID_STEP)
                } else {
                    snap_move(
                        scratch.key,
                        proposed,
                        length,
                        &model.sorted_clips(),
                        SNAP_THRESHOLD,
                    )
                };

                if model
                    .mutate(scratch.key, ClipPatch::start(snapped.max(0.0)))
                    .is_err()
                {
                    self.gesture = Gesture::Idle;
                }
                GestureEffect::None
            }
            Gesture::Trimming(scratch) => {
                let delta_s = (x_px - scratch.grab_x) / self.pixels_per_second;
                let patch = match scratch.side {
                    TrimSide::Right => {
                        let mut next_out = scratch.source_out + delta_s;
                        if modifiers.grid {
                            next_out = snap_grid(next_out, GRID_STEP);
                        }
                        let next_out = next_out.clamp(
                            scratch.source_in + MIN_CLIP_LEN,
                            scratch.source_duration,
                        );
                        ClipPatch::source_out(next_out)
                    }
                    TrimSide::Left => {
                        let mut delta = delta_s;
                        if modifiers.grid {
                            // Snap the target start, then re-bound the delta:
                            // the grid must not push the window out of range.
                            let target = snap_grid(scratch.start + delta, GRID_STEP);
                            delta = target - scratch.start;
                        }
                        let lower = (-scratch.start).max(-scratch.source_in);
                        let upper = scratch.source_out - scratch.source_in - MIN_CLIP_LEN;
                        let delta = delta.clamp(lower, upper);
                        ClipPatch::left_trim(scratch.start + delta, scratch.source_in + delta)
                    }
                };

                if model.mutate(scratch.key, patch).is_err() {
                    self.gesture = Gesture::Idle;
                }
                GestureEffect::None
            }
        }
    }

    /// Release commits whatever the last move wrote. A drag that never
    /// crossed the movement threshold is a selection click instead.
    pub fn pointer_up(&mut self, _model: &mut TimelineModel) -> GestureEffect {
        let effect = match self.gesture {
            Gesture::Dragging(scratch) if !scratch.moved => {
                self.selected = Some(scratch.key);
                GestureEffect::Select(scratch.key)
            }
            _ => GestureEffect::None,
        };
        self.gesture = Gesture::Idle;
        effect
    }

    /// Cancel (lost capture) restores the pre-gesture snapshot and lands in
    /// `Idle` with no scratch left behind.
    pub fn pointer_cancel(&mut self, model: &mut TimelineModel) {
        match self.gesture {
            Gesture::Dragging(scratch) if scratch.moved => {
                let _ = model.mutate(scratch.key, ClipPatch::start(scratch.start));
            }
            Gesture::Trimming(scratch) => {
                let _ = model.mutate(
                    scratch.key,
                    ClipPatch {
                        start: Some(scratch.start),
                        source_in: Some(scratch.source_in),
                        source_out: Some(scratch.source_out),
                    },
                );
            }
            _ => {}
        }
        self.gesture = Gesture::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_core::types::Clip;

    const PPS: f64 = 10.0; // 10 px per second

    fn model_with(clips: &[(f64, f64, f64, f64)]) -> (TimelineModel, Vec<Uuid>) {
        // (start, source_in, source_out, source_duration)
        let mut model = TimelineModel::new();
        let mut keys = Vec::new();
        for &(start, source_in, source_out, source_duration) in clips {
            let key = model.add(Clip {
                key: Uuid::new_v4(),
                source_ref: Uuid::new_v4(),
                source_duration,
                start,
                source_in,
                source_out,
            });
            keys.push(key);
        }
        (model, keys)
    }

    #[test]
    fn scrub_converts_pixels_to_time() {
        let (model, _) = model_with(&[]);
        let mut ctl = InteractionController::new(PPS);

        assert_eq!(
            ctl.pointer_down(PointerTarget::Ruler, 50.0, &model),
            GestureEffect::Scrub(5.0)
        );
        assert_eq!(ctl.state(), InteractionState::Scrubbing);
    }

    #[test]
    fn scrub_honors_scroll_offset_and_clamps() {
        let (mut model, _) = model_with(&[]);
        let mut ctl = InteractionController::new(PPS);
        ctl.set_scroll_offset(20.0);

        assert_eq!(
            ctl.pointer_down(PointerTarget::Ruler, 10.0, &model),
            GestureEffect::Scrub(3.0)
        );
        // Scrolled left of time zero clamps to zero.
        assert_eq!(
            ctl.pointer_move(-40.0, Modifiers::default(), &mut model),
            GestureEffect::Scrub(0.0)
        );

        ctl.pointer_up(&mut model);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn second_pointer_down_is_ignored_while_gesture_active() {
        let (model, keys) = model_with(&[(0.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Ruler, 0.0, &model);
        let effect = ctl.pointer_down(PointerTarget::Clip(keys[0]), 10.0, &model);

        assert_eq!(effect, GestureEffect::None);
        assert_eq!(ctl.state(), InteractionState::Scrubbing);
    }

    #[test]
    fn click_without_movement_selects_and_does_not_move() {
        let (mut model, keys) = model_with(&[(2.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 100.0, &model);
        // 2 px of jitter stays below the drag threshold.
        ctl.pointer_move(102.0, Modifiers::default(), &mut model);
        let effect = ctl.pointer_up(&mut model);

        assert_eq!(effect, GestureEffect::Select(keys[0]));
        assert_eq!(ctl.selected(), Some(keys[0]));
        assert_eq!(model.get(keys[0]).unwrap().start, 2.0);
    }

    #[test]
    fn drag_beyond_threshold_moves_the_clip() {
        let (mut model, keys) = model_with(&[(2.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 100.0, &model);
        ctl.pointer_move(130.0, Modifiers::default(), &mut model);

        // 30 px at 10 px/s = +3 s.
        assert!((model.get(keys[0]).unwrap().start - 5.0).abs() < 1e-9);
        assert_eq!(ctl.state(), InteractionState::Dragging { key: keys[0] });
    }

    #[test]
    fn drag_snaps_to_neighbor_edge() {
        // Fixed clip occupies [0, 5); moving clip of length 3 proposed at 5.1.
        let (mut model, keys) = model_with(&[(0.0, 0.0, 5.0, 10.0), (9.0, 0.0, 3.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[1]), 0.0, &model);
        // 9.0 - 3.9 = 5.1 proposed.
        ctl.pointer_move(-39.0, Modifiers::default(), &mut model);

        assert!((model.get(keys[1]).unwrap().start - 5.0).abs() < 1e-9);
    }

    #[test]
    fn drag_with_grid_modifier_snaps_to_seconds() {
        let (mut model, keys) = model_with(&[(2.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 0.0, &model);
        // Proposed 2.0 + 1.4 = 3.4, grid rounds to 3.0.
        ctl.pointer_move(14.0, Modifiers { grid: true }, &mut model);

        assert!((model.get(keys[0]).unwrap().start - 3.0).abs() < 1e-9);
    }

    #[test]
    fn drag_clamps_start_at_zero() {
        let (mut model, keys) = model_with(&[(1.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 0.0, &model);
        ctl.pointer_move(-500.0, Modifiers::default(), &mut model);

        assert_eq!(model.get(keys[0]).unwrap().start, 0.0);
    }

    #[test]
    fn drag_cancel_rolls_back_to_snapshot() {
        let (mut model, keys) = model_with(&[(2.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 0.0, &model);
        ctl.pointer_move(80.0, Modifiers::default(), &mut model);
        assert!(model.get(keys[0]).unwrap().start > 2.0);

        ctl.pointer_cancel(&mut model);
        assert_eq!(model.get(keys[0]).unwrap().start, 2.0);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn drag_release_commits_last_position() {
        let (mut model, keys) = model_with(&[(2.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 0.0, &model);
        ctl.pointer_move(80.0, Modifiers::default(), &mut model);
        let effect = ctl.pointer_up(&mut model);

        assert_eq!(effect, GestureEffect::None);
        assert!((model.get(keys[0]).unwrap().start - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_down_on_unknown_clip_is_ignored() {
        let (model, _) = model_with(&[]);
        let mut ctl = InteractionController::new(PPS);

        let effect = ctl.pointer_down(PointerTarget::Clip(Uuid::new_v4()), 0.0, &model);
        assert_eq!(effect, GestureEffect::None);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn trim_right_moves_out_point_only() {
        let (mut model, keys) = model_with(&[(1.0, 2.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Right), 0.0, &model);
        ctl.pointer_move(20.0, Modifiers::default(), &mut model);

        let c = model.get(keys[0]).unwrap();
        assert!((c.source_out - 7.0).abs() < 1e-9);
        assert_eq!(c.source_in, 2.0);
        assert_eq!(c.start, 1.0);
    }

    #[test]
    fn trim_right_is_bounded_regardless_of_drag_distance() {
        let (mut model, keys) = model_with(&[(0.0, 2.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Right), 0.0, &model);
        ctl.pointer_move(100_000.0, Modifiers::default(), &mut model);
        assert_eq!(model.get(keys[0]).unwrap().source_out, 10.0);

        ctl.pointer_move(-100_000.0, Modifiers::default(), &mut model);
        let c = model.get(keys[0]).unwrap();
        assert!((c.source_out - (2.0 + MIN_CLIP_LEN)).abs() < 1e-9);
    }

    #[test]
    fn trim_left_shifts_start_and_in_together() {
        let (mut model, keys) = model_with(&[(3.0, 2.0, 8.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Left), 0.0, &model);
        ctl.pointer_move(10.0, Modifiers::default(), &mut model);

        let c = model.get(keys[0]).unwrap();
        assert!((c.start - 4.0).abs() < 1e-9);
        assert!((c.source_in - 3.0).abs() < 1e-9);
        assert_eq!(c.source_out, 8.0);
    }

    #[test]
    fn trim_left_bounded_by_source_start() {
        let (mut model, keys) = model_with(&[(5.0, 1.0, 8.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Left), 0.0, &model);
        ctl.pointer_move(-500.0, Modifiers::default(), &mut model);

        // source_in bottoms out at 0; start shifts by the same -1.0.
        let c = model.get(keys[0]).unwrap();
        assert_eq!(c.source_in, 0.0);
        assert!((c.start - 4.0).abs() < 1e-9);
    }

    #[test]
    fn trim_left_bounded_by_timeline_zero() {
        let (mut model, keys) = model_with(&[(0.5, 3.0, 8.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Left), 0.0, &model);
        ctl.pointer_move(-500.0, Modifiers::default(), &mut model);

        let c = model.get(keys[0]).unwrap();
        assert_eq!(c.start, 0.0);
        assert!((c.source_in - 2.5).abs() < 1e-9);
    }

    #[test]
    fn trim_left_respects_min_length() {
        let (mut model, keys) = model_with(&[(1.0, 0.0, 2.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Left), 0.0, &model);
        ctl.pointer_move(500.0, Modifiers::default(), &mut model);

        let c = model.get(keys[0]).unwrap();
        assert!((c.length() - MIN_CLIP_LEN).abs() < 1e-9);
        assert_eq!(c.source_out, 2.0);
    }

    #[test]
    fn trim_left_grid_snap_cannot_violate_bounds() {
        let (mut model, keys) = model_with(&[(0.4, 0.2, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Left), 0.0, &model);
        // Target start 0.4 - 1.0 = -0.6, grid snaps to -1.0; the rebound
        // pins the delta at max(-start, -source_in) = -0.2.
        ctl.pointer_move(-10.0, Modifiers { grid: true }, &mut model);

        let c = model.get(keys[0]).unwrap();
        assert!((c.start - 0.2).abs() < 1e-9);
        assert_eq!(c.source_in, 0.0);
    }

    #[test]
    fn trim_cancel_rolls_back_both_sides() {
        let (mut model, keys) = model_with(&[(3.0, 2.0, 8.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Left), 0.0, &model);
        ctl.pointer_move(15.0, Modifiers::default(), &mut model);
        ctl.pointer_cancel(&mut model);

        let c = model.get(keys[0]).unwrap();
        assert_eq!((c.start, c.source_in, c.source_out), (3.0, 2.0, 8.0));
        assert_eq!(ctl.state(), InteractionState::Idle);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Right), 0.0, &model);
        ctl.pointer_move(-20.0, Modifiers::default(), &mut model);
        assert!(model.get(keys[0]).unwrap().source_out < 8.0);
        ctl.pointer_cancel(&mut model);

        let c = model.get(keys[0]).unwrap();
        assert_eq!((c.start, c.source_in, c.source_out), (3.0, 2.0, 8.0));
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn trim_with_grid_modifier_rounds_out_point() {
        let (mut model, keys) = model_with(&[(0.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::ClipEdge(keys[0], TrimSide::Right), 0.0, &model);
        // 5.0 + 2.4 = 7.4 rounds to 7.0 on the grid.
        ctl.pointer_move(24.0, Modifiers { grid: true }, &mut model);

        assert!((model.get(keys[0]).unwrap().source_out - 7.0).abs() < 1e-9);
    }

    #[test]
    fn moves_apply_in_arrival_order() {
        let (mut model, keys) = model_with(&[(0.0, 0.0, 5.0, 10.0)]);
        let mut ctl = InteractionController::new(PPS);

        ctl.pointer_down(PointerTarget::Clip(keys[0]), 0.0, &model);
        for x in [40.0, 10.0, 25.0] {
            ctl.pointer_move(x, Modifiers::default(), &mut model);
        }
        // Last move wins: 0.0 + 25/10 = 2.5.
        assert!((model.get(keys[0]).unwrap().start - 2.5).abs() < 1e-9);
    }
}
