//! Per-target filter jobs: readiness tracking, failure isolation and the
//! hand-off to a presentation adapter.
//!
//! A page of filtered elements becomes a slice of [`FilterTarget`]s taken
//! once up front. Each target resolves its own parameters, waits for its
//! source to load and is filtered at most once. A failure is reported for
//! that target only.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::warn;

use crate::error::Result;
use crate::filters::buffer::{load, Loaded, PixelBuffer, RasterSource};
use crate::filters::dispatch::{apply, FilterKind};
use crate::filters::params::{resolve, FilterConfig};

/// Receives filtered buffers, e.g. to re-encode them and swap them onto
/// the page.
pub trait Presenter {
    fn present(&mut self, buffer: PixelBuffer) -> Result<()>;
}

/// Readiness of a job's source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetState {
    /// Waiting for the source to report non-zero dimensions
    Pending,
    /// Filtered; further polls do nothing
    Ready,
    /// The source could not be loaded
    Failed,
}

/// One filter application waiting on one source.
#[derive(Clone, Debug)]
pub struct TargetJob {
    kind: Option<FilterKind>,
    config: FilterConfig,
    state: TargetState,
}

impl TargetJob {
    /// Create a job from a filter name and string overrides.
    ///
    /// An unknown filter name is accepted; the job then passes the buffer
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::error::Error::InvalidParameter)
    /// if an override does not parse.
    pub fn new<I, K, V>(filter: &str, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(TargetJob {
            kind: FilterKind::from_name(filter),
            config: resolve(overrides)?,
            state: TargetState::Pending,
        })
    }

    pub fn with_config(kind: FilterKind, config: FilterConfig) -> Self {
        TargetJob {
            kind: Some(kind),
            config,
            state: TargetState::Pending,
        }
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Try to run the job against `source`.
    ///
    /// While pending, a source that is not loaded yet leaves the job
    /// pending and returns `Ok(None)`. Once the source loads, the filter
    /// runs, the job becomes [`TargetState::Ready`] and the filtered buffer
    /// is returned. Polling a ready or failed job returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// A load failure moves the job to [`TargetState::Failed`] and is
    /// returned.
    pub fn poll<S: RasterSource + ?Sized>(&mut self, source: &S) -> Result<Option<PixelBuffer>> {
        if self.state != TargetState::Pending {
            return Ok(None);
        }

        let buffer = match load(source) {
            Ok(Loaded::Ready(buffer)) => buffer,
            Ok(Loaded::NotReady) => return Ok(None),
            Err(e) => {
                self.state = TargetState::Failed;
                return Err(e);
            }
        };

        self.state = TargetState::Ready;
        Ok(Some(match self.kind {
            Some(kind) => apply(kind, buffer, &self.config),
            None => buffer,
        }))
    }

    /// Poll and, if a buffer was produced, hand it to `presenter`.
    ///
    /// Returns `true` if something was presented.
    pub fn poll_and_present<S, P>(&mut self, source: &S, presenter: &mut P) -> Result<bool>
    where
        S: RasterSource + ?Sized,
        P: Presenter + ?Sized,
    {
        match self.poll(source)? {
            Some(buffer) => {
                presenter.present(buffer)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A filter request for one element: filter name, raw overrides and the
/// element's image source.
#[derive(Clone, Debug)]
pub struct FilterTarget<S> {
    pub filter: String,
    pub overrides: HashMap<String, String>,
    pub source: S,
}

/// Result for one target of [`run_batch`].
#[derive(Debug)]
pub enum TargetOutcome {
    Filtered(PixelBuffer),
    /// The source was not loaded yet
    Pending,
    Failed(crate::error::Error),
}

/// Run every target once, in parallel.
///
/// Outcomes are returned in target order. A bad override or a failing
/// source only affects its own target.
pub fn run_batch<S>(targets: &[FilterTarget<S>]) -> Vec<TargetOutcome>
where
    S: RasterSource + Sync,
{
    targets
        .par_iter()
        .enumerate()
        .map(|(index, target)| {
            let outcome = TargetJob::new(&target.filter, &target.overrides)
                .and_then(|mut job| job.poll(&target.source));
            match outcome {
                Ok(Some(buffer)) => TargetOutcome::Filtered(buffer),
                Ok(None) => TargetOutcome::Pending,
                Err(e) => {
                    warn!(index, filter = %target.filter, error = %e, "filter target failed");
                    TargetOutcome::Failed(e)
                }
            }
        })
        .collect()
}
