//! Generic run-length segmentation of a sampled scalar against a threshold.
//!
//! One routine serves both detection passes: the clench pass extracts
//! raw EMG, the arousal pass extracts heart-rate activation. Only the
//! extractor, threshold, and minimum duration differ.

use crate::ingest::Sample;

/// A contiguous interval where the extracted scalar stayed at or above
/// the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunLength {
    pub start_ms: u64,
    pub end_ms: u64,
    /// Maximum extracted value observed inside the interval
    pub peak: f64,
}

impl RunLength {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Single forward pass over an ordered sample sequence.
///
/// An interval opens at the first sample at or above `threshold`, closes
/// at the timestamp of the first sample back below it (or at the last
/// sample's timestamp if the stream ends while open), and is kept only
/// if it lasted at least `min_duration_ms`. Intervals are disjoint and
/// returned in non-decreasing start order; an empty input yields an
/// empty list.
pub fn segment_above<F>(
    samples: &[Sample],
    extract: F,
    threshold: f64,
    min_duration_ms: u64,
) -> Vec<RunLength>
where
    F: Fn(&Sample) -> f64,
{
    let mut runs = Vec::new();
    let mut open: Option<RunLength> = None;

    for sample in samples {
        let value = extract(sample);
        if value >= threshold {
            match open.as_mut() {
                Some(run) => run.peak = run.peak.max(value),
                None => {
                    open = Some(RunLength {
                        start_ms: sample.t_ms,
                        end_ms: sample.t_ms,
                        peak: value,
                    })
                }
            }
        } else if let Some(mut run) = open.take() {
            run.end_ms = sample.t_ms;
            if run.duration_ms() >= min_duration_ms {
                runs.push(run);
            }
        }
    }

    // Stream ended while a run was still open
    if let (Some(mut run), Some(last)) = (open, samples.last()) {
        run.end_ms = last.t_ms;
        if run.duration_ms() >= min_duration_ms {
            runs.push(run);
        }
    }

    runs
}
