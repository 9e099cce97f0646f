//! In-memory selection adapter.
//!
//! Loads a whole series set from `series.json` in the configured directory
//! and answers queries from memory. Real storage engines with sampled file
//! hierarchies live behind the same port; this adapter is the shipped
//! reference implementation and the workhorse of the test suite.
//!
//! The adapter always answers at full resolution; the target resolution is
//! accepted for interface parity and left to richer providers.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{ProviderError, SelectionProvider};
use super::{AxisKind, AxisValue, Selection, XAxisSpec, YSeries};

/// File the adapter expects inside the series directory.
const SERIES_FILE: &str = "series.json";

/// On-disk shape of a series set.
#[derive(Debug, Deserialize)]
struct SeriesFile {
    /// X axis column.
    x: XColumn,
    /// Y-key to min/max series.
    ys: HashMap<String, YSeries>,
}

#[derive(Debug, Deserialize)]
struct XColumn {
    /// Column key, matched against the configured X axis.
    key: String,
    /// Ordered X values.
    values: Vec<AxisValue>,
}

/// Selection provider answering from memory.
#[derive(Debug)]
pub struct MemorySelector {
    x_kind: AxisKind,
    xs: Vec<AxisValue>,
    ys: HashMap<String, YSeries>,
}

impl MemorySelector {
    /// Open the series directory and load the requested Y-keys.
    pub fn open(
        dir: &Path,
        x: &XAxisSpec,
        y_keys: &[String],
        _resolution: usize,
    ) -> Result<Self, ProviderError> {
        let path = dir.join(SERIES_FILE);
        let raw = std::fs::read_to_string(&path)?;
        let file: SeriesFile = serde_json::from_str(&raw)?;

        if file.x.key != x.key {
            return Err(ProviderError::MissingSeries(x.key.clone()));
        }

        let mut ys = HashMap::with_capacity(y_keys.len());
        for key in y_keys {
            let series = file
                .ys
                .get(key)
                .cloned()
                .ok_or_else(|| ProviderError::MissingSeries(key.clone()))?;
            ys.insert(key.clone(), series);
        }

        let selector = Self::from_parts(x.kind, file.x.values, ys)?;
        debug!(
            path = %path.display(),
            points = selector.xs.len(),
            series = selector.ys.len(),
            "Loaded series set"
        );
        Ok(selector)
    }

    /// Build a selector from already-loaded data, validating its shape.
    pub fn from_parts(
        x_kind: AxisKind,
        xs: Vec<AxisValue>,
        ys: HashMap<String, YSeries>,
    ) -> Result<Self, ProviderError> {
        for x in &xs {
            if x.kind() != x_kind {
                return Err(ProviderError::AxisType {
                    expected: x_kind,
                    actual: x.kind(),
                });
            }
        }
        for (key, series) in &ys {
            if series.mins.len() != xs.len() || series.maxs.len() != xs.len() {
                return Err(ProviderError::Shape(format!(
                    "series '{key}' has {} mins and {} maxs for {} X values",
                    series.mins.len(),
                    series.maxs.len(),
                    xs.len()
                )));
            }
        }
        Ok(Self { x_kind, xs, ys })
    }

    fn check_bound(&self, bound: AxisValue) -> Result<f64, ProviderError> {
        if bound.kind() == self.x_kind {
            Ok(bound.as_seconds())
        } else {
            Err(ProviderError::AxisType {
                expected: self.x_kind,
                actual: bound.kind(),
            })
        }
    }

    fn slice(&self, keep: impl Fn(f64) -> bool) -> Selection {
        let indices: Vec<usize> = self
            .xs
            .iter()
            .enumerate()
            .filter(|(_, x)| keep(x.as_seconds()))
            .map(|(index, _)| index)
            .collect();

        let xs = indices.iter().map(|&index| self.xs[index]).collect();
        let ys = self
            .ys
            .iter()
            .map(|(key, series)| {
                let sliced = YSeries {
                    mins: indices.iter().map(|&index| series.mins[index]).collect(),
                    maxs: indices.iter().map(|&index| series.maxs[index]).collect(),
                };
                (key.clone(), sliced)
            })
            .collect();

        Selection { xs, ys }
    }
}

#[async_trait]
impl SelectionProvider for MemorySelector {
    fn x_kind(&self) -> AxisKind {
        self.x_kind
    }

    async fn select_all(&mut self) -> Result<Selection, ProviderError> {
        Ok(Selection {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
        })
    }

    async fn select_range(
        &mut self,
        start: AxisValue,
        stop: AxisValue,
    ) -> Result<Selection, ProviderError> {
        let start = self.check_bound(start)?;
        let stop = self.check_bound(stop)?;
        Ok(self.slice(|x| x >= start && x < stop))
    }

    async fn close(&mut self) -> Result<(), ProviderError> {
        self.xs.clear();
        self.ys.clear();
        debug!("Memory selector closed");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
