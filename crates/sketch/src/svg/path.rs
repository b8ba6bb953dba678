//! One `<path>` element: a run of connected segments sharing a width.

use std::fmt::{self, Write};

use super::point::SvgPoint;

/// A run of relative cubic commands starting at an absolute point
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    stroke_width: i32,
    start: SvgPoint,
    last: SvgPoint,
    commands: String,
    command_count: usize,
}

impl SvgPath {
    pub fn new(start: SvgPoint, stroke_width: i32) -> Self {
        Self {
            stroke_width,
            start,
            last: start,
            commands: String::new(),
            command_count: 0,
        }
    }

    pub fn stroke_width(&self) -> i32 {
        self.stroke_width
    }

    pub fn start(&self) -> SvgPoint {
        self.start
    }

    /// End point of the last emitted command (the start if none)
    pub fn last_point(&self) -> SvgPoint {
        self.last
    }

    pub fn command_count(&self) -> usize {
        self.command_count
    }

    pub fn is_empty(&self) -> bool {
        self.command_count == 0
    }

    /// Whether a segment starting at `start` with `stroke_width` continues
    /// this run
    pub fn continues(&self, start: SvgPoint, stroke_width: i32) -> bool {
        self.last == start && self.stroke_width == stroke_width
    }

    /// Append `c` relative to the last point.
    ///
    /// A command whose six numbers are all zero draws nothing and is
    /// skipped; returns whether a command was written.
    pub fn append(&mut self, control1: SvgPoint, control2: SvgPoint, end: SvgPoint) -> bool {
        let c1 = control1.relative_to(self.last);
        let c2 = control2.relative_to(self.last);
        let to = end.relative_to(self.last);

        if c1.is_zero() && c2.is_zero() && to.is_zero() {
            return false;
        }

        // Writing into a String cannot fail
        let _ = write!(self.commands, " c{} {} {}", c1, c2, to);
        self.last = end;
        self.command_count += 1;
        true
    }
}

impl fmt::Display for SvgPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<path stroke-width=\"{}\" d=\"M{}{}\"/>",
            self.stroke_width, self.start, self.commands
        )
    }
}
