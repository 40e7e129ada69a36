//! Landmark source abstraction.
//!
//! Video capture and pose estimation live outside this crate; whatever does
//! that work hands frames to the core through [`LandmarkSource`].

use std::collections::VecDeque;

use super::FrameInput;

/// Trait implemented by anything that can supply landmark frames in order.
pub trait LandmarkSource {
    /// Next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Option<FrameInput>;
}

/// In-memory source replaying a pre-recorded frame sequence.
#[derive(Debug, Clone, Default)]
pub struct RecordedSource {
    frames: VecDeque<FrameInput>,
}

impl RecordedSource {
    pub fn new(frames: Vec<FrameInput>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for RecordedSource {
    fn next_frame(&mut self) -> Option<FrameInput> {
        self.frames.pop_front()
    }
}

impl<I> LandmarkSource for std::iter::Fuse<I>
where
    I: Iterator<Item = FrameInput>,
{
    fn next_frame(&mut self) -> Option<FrameInput> {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::LandmarkFrame;

    #[test]
    fn test_recorded_source_preserves_order() {
        let mut source = RecordedSource::new(vec![
            FrameInput::detected(0.0, LandmarkFrame::standing(0.5, 0.9)),
            FrameInput::missing(0.1),
            FrameInput::detected(0.2, LandmarkFrame::standing(0.5, 0.8)),
        ]);

        assert_eq!(source.remaining(), 3);
        assert_eq!(source.next_frame().unwrap().timestamp, 0.0);
        assert!(source.next_frame().unwrap().landmarks.is_none());
        assert_eq!(source.next_frame().unwrap().timestamp, 0.2);
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_fused_iterator_is_a_source() {
        let frames = (0..3).map(|i| FrameInput::missing(i as f64));
        let mut source = frames.fuse();
        let mut seen = 0;
        while source.next_frame().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 3);
    }
}
