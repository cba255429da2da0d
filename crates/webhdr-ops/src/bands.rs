//! Log-luminance band partitioning.
//!
//! Pixels are grouped into bands of roughly one log10 unit (~3.32 f-stops)
//! of dynamic range, then bands whose mean log-luminance sits within
//! [`MERGE_THRESHOLD`] of the previous band's mean are folded into that
//! neighbor. Thin bands do not deserve their own compression parameter;
//! merging them reduces banding artifacts in the output.
//!
//! The merge loop is a fixed point over an exclusively owned label buffer:
//! each pass walks the distinct labels in ascending order and restarts from
//! scratch as soon as one merge happens, because band contents changed.
//! The loop is inherently sequential and terminates when a full pass makes
//! no merge.

use crate::{OpsError, OpsResult};
use tracing::{debug, trace};
use webhdr_core::{BandLabels, ScalarMap};

/// Minimum gap between the mean log-luminance of adjacent bands.
///
/// A band whose mean is closer than this to the previous band's mean is
/// merged into it. One log10 unit corresponds to about 3.32 f-stops.
pub const MERGE_THRESHOLD: f64 = 1.0;

/// Placeholder merge target used before any band has been visited.
///
/// The walk starts with a previous mean of negative infinity, so the
/// merge test `mean - prev_mean < 1.0` is always false for the first
/// (lowest) band with finite statistics and this sentinel is never
/// actually written. It exists to reproduce the reference behavior
/// literally; see the quirk test below.
pub const SENTINEL_LABEL: i32 = i32::MIN;

/// A stable partition of the image plane into log-luminance bands.
///
/// Produced by [`partition`]. Every pixel carries exactly one final band
/// label, and the mean log-luminance of adjacent surviving bands differs
/// by at least [`MERGE_THRESHOLD`].
#[derive(Debug, Clone)]
pub struct BandPartition {
    labels: BandLabels,
    log_luminance: ScalarMap,
}

impl BandPartition {
    /// Returns the per-pixel band labels.
    #[inline]
    pub fn labels(&self) -> &BandLabels {
        &self.labels
    }

    /// Returns the log10 luminance field the partition was built from.
    #[inline]
    pub fn log_luminance(&self) -> &ScalarMap {
        &self.log_luminance
    }

    /// Returns the surviving band labels in ascending order.
    pub fn distinct_labels(&self) -> Vec<i32> {
        self.labels.distinct_ascending()
    }

    /// Returns the number of surviving bands.
    pub fn band_count(&self) -> usize {
        self.distinct_labels().len()
    }

    /// Mean log-luminance over the pixels of one band.
    ///
    /// Returns `None` for labels not present in the partition.
    pub fn band_mean(&self, label: i32) -> Option<f64> {
        self.log_luminance.mean_where(&self.labels, label)
    }

    /// Returns `true` if re-running a merge pass would change nothing.
    ///
    /// Always true for partitions produced by [`partition`]; exposed so the
    /// fixed point can be asserted independently.
    pub fn is_stable(&self) -> bool {
        let mut labels = self.labels.clone();
        !merge_pass(&mut labels, &self.log_luminance)
    }
}

/// Partitions a luminance field into merged log-luminance bands.
///
/// Computes `log10(L)`, labels each pixel with `floor(log10(L))` truncated
/// to the `i8` value range, then merges bands until stable.
///
/// # Errors
///
/// Returns [`OpsError::NonFiniteLogLuminance`] when any pixel has zero or
/// negative luminance. Such inputs have no defined band structure and the
/// conversion aborts instead of propagating NaN into the output.
pub fn partition(luminance: &ScalarMap) -> OpsResult<BandPartition> {
    let log_luminance = luminance.log10();

    let non_finite = log_luminance.count_non_finite();
    if non_finite > 0 {
        return Err(OpsError::NonFiniteLogLuminance { count: non_finite });
    }

    let (width, height) = luminance.dimensions();
    let mut labels = BandLabels::new(width, height);
    for (label, llog) in labels.data_mut().iter_mut().zip(log_luminance.data()) {
        *label = initial_label(*llog);
    }

    let initial_bands = labels.distinct_ascending().len();

    let mut passes = 0usize;
    while merge_pass(&mut labels, &log_luminance) {
        passes += 1;
        trace!(passes, "band merge pass performed a merge");
    }

    debug!(
        initial_bands,
        final_bands = labels.distinct_ascending().len(),
        passes,
        "band partitioning converged"
    );

    Ok(BandPartition {
        labels,
        log_luminance,
    })
}

/// Initial band label: floor of the log-luminance, truncated to i8 range.
#[inline]
fn initial_label(llog: f32) -> i32 {
    (llog.floor() as i32).clamp(i8::MIN as i32, i8::MAX as i32)
}

/// One merge pass over the current distinct labels, ascending.
///
/// Merges the first band found whose mean log-luminance is within
/// [`MERGE_THRESHOLD`] of the previous band's mean, relabeling its pixels
/// to the previous band's label, and reports whether a merge happened.
/// The caller restarts the pass after every merge.
fn merge_pass(labels: &mut BandLabels, log_luminance: &ScalarMap) -> bool {
    let mut prev_mean = f64::NEG_INFINITY;
    let mut prev_label = SENTINEL_LABEL;

    for label in labels.distinct_ascending() {
        let Some(mean) = log_luminance.mean_where(labels, label) else {
            continue;
        };
        if mean - prev_mean < MERGE_THRESHOLD {
            trace!(from = label, into = prev_label, "merging band");
            labels.relabel(label, prev_label);
            return true;
        }
        prev_mean = mean;
        prev_label = label;
    }

    false
}
