//! Time windows that rebase the global frame onto a local timeline.
//!
//! A sequence starting at `from` sees global frame `from` as its own frame 0,
//! the same offset arithmetic as `spring(frame - 20, ..)` done by hand.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sequence {
    /// Global frame at which the sequence starts.
    pub from: f64,
    /// Length of the window; `None` keeps it open until the end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_frames: Option<f64>,
}

impl Sequence {
    pub fn new(from: f64, duration_in_frames: Option<f64>) -> Self {
        Self {
            from,
            duration_in_frames,
        }
    }

    /// Open-ended sequence starting at `from`.
    pub fn starting_at(from: f64) -> Self {
        Self::new(from, None)
    }

    /// Whether `frame` falls inside `[from, from + duration)`.
    pub fn contains(&self, frame: f64) -> bool {
        if frame < self.from {
            return false;
        }
        match self.duration_in_frames {
            Some(duration) => frame < self.from + duration,
            None => true,
        }
    }

    /// Frame relative to the sequence start, or `None` while inactive.
    pub fn local_frame(&self, frame: f64) -> Option<f64> {
        self.contains(frame).then(|| frame - self.from)
    }

    /// Unconditional offset, for animations that should keep resolving
    /// (typically to their rest value) outside the window.
    pub fn offset(&self, frame: f64) -> f64 {
        frame - self.from
    }

    /// The sequence immediately following this one with the given length.
    ///
    /// Open-ended sequences have no end, so the follower starts where this
    /// one starts.
    pub fn then(&self, duration_in_frames: f64) -> Sequence {
        let from = self.from + self.duration_in_frames.unwrap_or(0.0);
        Sequence::new(from, Some(duration_in_frames))
    }
}
