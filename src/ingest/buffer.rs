//! Append-only session buffer with input validation.
//!
//! The buffer is the single mutation point of a session: one producer
//! appends, the classification core only ever reads a slice of it. The
//! validation policy lives here rather than in the pure core - a
//! non-finite reading is refused and counted, a timestamp that goes
//! backwards is refused loudly, never silently reordered.

use crate::ingest::types::{Sample, SampleError};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A growing, validated sample buffer for one monitoring session.
#[derive(Debug)]
pub struct SessionBuffer {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    samples: Vec<Sample>,
    rejected: u64,
}

impl SessionBuffer {
    /// Create an empty buffer with a fresh session id.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            samples: Vec::new(),
            rejected: 0,
        }
    }

    /// Append a sample, enforcing the validation policy.
    ///
    /// Equal timestamps are accepted; the ordering contract is
    /// non-decreasing, not strictly increasing.
    pub fn push(&mut self, sample: Sample) -> Result<(), SampleError> {
        if let Some(field) = sample.non_finite_field() {
            self.rejected += 1;
            return Err(SampleError::NonFinite {
                t_ms: sample.t_ms,
                field,
            });
        }

        if let Some(last) = self.samples.last() {
            if sample.t_ms < last.t_ms {
                self.rejected += 1;
                return Err(SampleError::OutOfOrder {
                    prev_ms: last.t_ms,
                    t_ms: sample.t_ms,
                });
            }
        }

        self.samples.push(sample);
        Ok(())
    }

    /// The accepted samples, in order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// How many samples the validation policy refused.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Elapsed session time covered by the accepted samples, in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (last.t_ms - first.t_ms) as f64 / 1000.0,
            _ => 0.0,
        }
    }
}

impl Default for SessionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
