//! Velocity-modulated stroke width
//!
//! Fast movement gives thin lines, slow movement thick ones. The raw
//! velocity is smoothed with a single-pole filter so a noisy sample
//! interval does not make the width jump.

use sketchpad_config::PenParams;

/// Smoothing state carried from one segment to the next within a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeWidthState {
    /// Width at the end of the previous segment
    pub last_width: f32,
    /// Filtered velocity of the previous segment
    pub last_velocity: f32,
}

impl StrokeWidthState {
    /// Fresh state for a new stroke: no prior velocity, width halfway
    /// between the configured bounds
    pub fn new(pen: &PenParams) -> Self {
        Self {
            last_width: pen.initial_width(),
            last_velocity: 0.0,
        }
    }
}

/// Compute the width for the next segment and the updated state.
///
/// The result always lies within `[min_width, max_width]`.
pub fn next(
    velocity: f32,
    state: StrokeWidthState,
    pen: &PenParams,
) -> (f32, StrokeWidthState) {
    let velocity = sanitize(velocity);
    let weight = pen.velocity_filter_weight;
    let filtered = sanitize(weight * velocity + (1.0 - weight) * sanitize(state.last_velocity));

    let width = width_for_velocity(filtered, pen);

    (
        width,
        StrokeWidthState {
            last_width: width,
            last_velocity: filtered,
        },
    )
}

/// `max_width / (v + 1)`, floored at `min_width`
pub fn width_for_velocity(velocity: f32, pen: &PenParams) -> f32 {
    let velocity = sanitize(velocity);
    (pen.max_width / (velocity + 1.0))
        .max(pen.min_width)
        .min(pen.max_width)
}

#[inline]
fn sanitize(velocity: f32) -> f32 {
    if velocity.is_finite() && velocity > 0.0 {
        velocity
    } else {
        0.0
    }
}
