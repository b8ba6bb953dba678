/// Samples needed before a curve segment can be fitted.
pub const CURVE_WINDOW_LEN: usize = 4;

/// Chords used to estimate a segment's length (11 evaluations).
pub const CURVE_LENGTH_CHORDS: u32 = 10;

/// Shortest interval used for velocity; clamps zero or backwards clocks.
pub const MIN_SAMPLE_INTERVAL_MS: u64 = 1;

/// Upper bound on draw steps for one segment; longer segments are
/// resampled at this count.
pub const MAX_SEGMENT_STEPS: usize = 16_384;
