// Shared fakes for unit tests.

use std::cell::Cell;

use crate::error::Error;
use crate::surface::RasterSurface;
use crate::types::{Color, HandObservation, LANDMARK_COUNT, Landmark, ScreenPoint};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
    pub color: Color,
    pub width: f32,
}

/// Records segments instead of pixels; snapshots are the segment list.
#[derive(Debug)]
pub struct FakeSurface {
    pub width: u32,
    pub height: u32,
    pub segments: Vec<Segment>,
    pub serialize_calls: Cell<usize>,
    pub restore_calls: usize,
    pub fail_serialize: bool,
    pub fail_restore: bool,
}

impl FakeSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            segments: Vec::new(),
            serialize_calls: Cell::new(0),
            restore_calls: 0,
            fail_serialize: false,
            fail_restore: false,
        }
    }

    /// Replace the content with a single marker segment.
    pub fn mark(&mut self, n: u32) {
        let p = ScreenPoint::new(n as f32, n as f32);
        self.segments = vec![Segment { from: p, to: p, color: Color::rgb(0, 0, 0), width: 1.0 }];
    }

    pub fn serializations(&self) -> usize {
        self.serialize_calls.get()
    }
}

impl RasterSurface for FakeSurface {
    type Snapshot = Vec<Segment>;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_line_segment(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, width: f32) {
        self.segments.push(Segment { from, to, color, width });
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    fn serialize(&self) -> Result<Vec<Segment>, Error> {
        self.serialize_calls.set(self.serialize_calls.get() + 1);
        if self.fail_serialize {
            return Err(Error::Snapshot("out of memory".into()));
        }
        Ok(self.segments.clone())
    }

    fn restore(&mut self, snapshot: &Vec<Segment>) -> Result<(), Error> {
        self.restore_calls += 1;
        if self.fail_restore {
            return Err(Error::Restore("corrupt".into()));
        }
        self.segments = snapshot.clone();
        Ok(())
    }
}

/// A hand with everything at the origin except the two fingertips.
pub fn hand_with_tips(thumb: (f32, f32), index: (f32, f32)) -> HandObservation {
    let mut joints = [Landmark::default(); LANDMARK_COUNT];
    joints[4] = Landmark::new(thumb.0, thumb.1);
    joints[8] = Landmark::new(index.0, index.1);
    HandObservation::new(joints)
}

/// Index tip at `at`, thumb `gap` to its left.
pub fn hand_at(at: (f32, f32), gap: f32) -> HandObservation {
    hand_with_tips((at.0 - gap, at.1), at)
}
