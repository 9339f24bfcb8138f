use std::cell::Cell;

use crate::app::{Host, HostError, Input, InputState};
use crate::canvas::{Canvas, Color};
use crate::geom::{Rect, Vec2};

/// Canvas that records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub(crate) bounds: Rect,
    pub(crate) clears: Vec<Color>,
    pub(crate) polygons: Vec<(Vec<Vec2>, Color)>,
}

impl RecordingCanvas {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            ..Self::default()
        }
    }
}

impl Canvas for RecordingCanvas {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn clear(&mut self, color: Color) {
        self.clears.push(color);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.polygons.push((points.to_vec(), color));
    }
}

/// Host that closes on a schedule and counts presents.
#[derive(Debug, Default)]
pub(crate) struct ScriptedHost {
    pub(crate) canvas: RecordingCanvas,
    pub(crate) presents: usize,
    pub(crate) polls: usize,
    input: InputState,
    close_after_polls: Option<usize>,
    close_on_input_read: Option<usize>,
    input_reads: Cell<usize>,
    closed: Cell<bool>,
    fail_present: bool,
}

impl ScriptedHost {
    pub(crate) fn open() -> Self {
        Self {
            canvas: RecordingCanvas::new(640.0, 480.0),
            ..Self::default()
        }
    }

    /// Stays open for `polls` polls; `0` starts closed.
    pub(crate) fn closing_after_polls(polls: usize) -> Self {
        let host = Self {
            close_after_polls: Some(polls),
            ..Self::open()
        };
        host.closed.set(polls == 0);
        host
    }

    /// Closes while the scene reads input for the `reads`-th time.
    pub(crate) fn closing_on_input_read(reads: usize) -> Self {
        Self {
            close_on_input_read: Some(reads),
            ..Self::open()
        }
    }

    pub(crate) fn with_input(mut self, input: InputState) -> Self {
        self.input = input;
        self
    }

    pub(crate) fn failing_present(mut self) -> Self {
        self.fail_present = true;
        self
    }
}

impl Host for ScriptedHost {
    fn is_closed(&self) -> bool {
        self.closed.get()
    }

    fn poll(&mut self) {
        self.polls += 1;
        if matches!(self.close_after_polls, Some(limit) if self.polls > limit) {
            self.closed.set(true);
        }
    }

    fn input(&self) -> &dyn Input {
        let reads = self.input_reads.get() + 1;
        self.input_reads.set(reads);
        if self.close_on_input_read == Some(reads) {
            self.closed.set(true);
        }
        &self.input
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn present(&mut self) -> Result<(), HostError> {
        if self.fail_present {
            return Err(HostError::Present(pixels::Error::AdapterNotFound));
        }
        self.presents += 1;
        Ok(())
    }
}
