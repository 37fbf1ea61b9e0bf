// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::collections::VecDeque;

use crate::probe::{PidState, Sample};

/// Maximum number of snapshots retained before FIFO eviction kicks in.
pub const MAX_SAMPLES: usize = 8192;

/// Outcome of recording one snapshot into the ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The snapshot was appended to history.
    Recorded,

    /// The snapshot announced a controller reset; all history was purged.
    Reset,
}

/// Bounded, time-ordered history of controller snapshots, newest at the tail.
///
/// Append is O(1) amortized and eviction is strictly FIFO. A controller reset
/// does not get recorded; it purges the whole ring instead, because history
/// from before a reset no longer describes the controller's current run.
#[derive(Debug)]
pub struct SampleRing {
    samples: VecDeque<PidState>,
    capacity: usize,
}

impl Default for SampleRing {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleRing {
    /// Creates a ring holding up to [`MAX_SAMPLES`] snapshots.
    pub fn new() -> Self {
        Self::with_capacity(MAX_SAMPLES)
    }

    /// Creates a ring with an explicit capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; a ring that cannot hold a single sample
    /// is a programming error.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "sample ring capacity must be positive");
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    /// Records one classified snapshot.
    ///
    /// A [`Sample::Valid`] snapshot is appended, evicting the oldest entries
    /// while the ring is over capacity. A [`Sample::ControllerReset`] purges
    /// the entire ring instead and reports [`RecordOutcome::Reset`] so the
    /// renderer can flag the event. Neither path can fail.
    pub fn record(&mut self, sample: Sample) -> RecordOutcome {
        match sample {
            Sample::ControllerReset => {
                log::debug!("controller reset; purging {} samples", self.samples.len());
                self.samples.clear();
                RecordOutcome::Reset
            }
            Sample::Valid(state) => {
                self.samples.push_back(state);
                while self.samples.len() > self.capacity {
                    self.samples.pop_front();
                }
                RecordOutcome::Recorded
            }
        }
    }

    /// Walks at most `n` snapshots from newest to oldest.
    ///
    /// Iteration stops early at a snapshot whose error derivative holds the
    /// NaN reset marker: history beyond a reset boundary is not valid to
    /// read. The classified ingestion path normally keeps such snapshots out
    /// of the ring, but the probe is external input, so the boundary check
    /// stays.
    pub fn iter_recent(&self, n: usize) -> impl Iterator<Item = &PidState> + '_ {
        self.samples
            .iter()
            .rev()
            .take(n)
            .take_while(|state| !state.deriv.is_nan())
    }

    /// The most recently recorded snapshot, if any.
    pub fn latest(&self) -> Option<&PidState> {
        self.samples.back()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the ring holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of snapshots this ring retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discards all retained snapshots.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
