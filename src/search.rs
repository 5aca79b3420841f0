//! Exhaustive noise-scale grid search
//!
//! Every `(q, r)` cell of the Cartesian product of the two candidate lists runs
//! an independent [`TrackingRun`] with `Q = q·I₄`, `R = r·I₂`. Cells share no
//! mutable state, so with the `rayon` feature they are evaluated in parallel.
//!
//! Selection happens in one ordered reduction after all cells finish: cells are
//! visited in canonical order (outer loop over process scales, inner over
//! measurement scales) and a cell replaces the current winner only if its mean
//! error is strictly lower. Ties therefore keep the first cell, whatever order
//! the cells completed in.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::Serialize;

use crate::filter::errors::{Result, TrackingError};
use crate::filter::model::{MotionModel, NoiseScales};
use crate::tracking::input::TrackingInput;
use crate::tracking::run::{RunConfig, RunResult, TrackingRun};

/// How one grid cell ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellOutcome {
    Evaluated { mean_error: f64 },
    /// The run aborted; the cell takes no part in selection
    Failed { reason: String },
}

/// One cell of the grid, in canonical order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridEvaluation {
    /// Position in canonical order: `i_q * measurement_scales.len() + i_r`
    pub index: usize,
    pub scales: NoiseScales,
    pub outcome: CellOutcome,
}

impl GridEvaluation {
    pub fn mean_error(&self) -> Option<f64> {
        match self.outcome {
            CellOutcome::Evaluated { mean_error } => Some(mean_error),
            CellOutcome::Failed { .. } => None,
        }
    }
}

/// Winner of a grid search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Winning `(q, r)`
    pub scales: NoiseScales,
    /// Model built from the winning scales
    pub model: MotionModel,
    /// Full run with the winning model
    pub run: RunResult,
    /// Lowest mean error across the grid
    pub min_mean_error: f64,
    /// Every cell in canonical order
    pub grid: Vec<GridEvaluation>,
}

impl SearchResult {
    /// Number of cells whose run failed
    pub fn failed_cells(&self) -> usize {
        self.grid.iter().filter(|c| c.mean_error().is_none()).count()
    }
}

/// Grid search over process/measurement noise scales
#[derive(Debug, Clone)]
pub struct HyperparameterSearch {
    process_scales: Vec<f64>,
    measurement_scales: Vec<f64>,
    dt: f64,
    run_config: RunConfig,
}

impl HyperparameterSearch {
    /// # Errors
    /// [`TrackingError::Validation`] for an empty candidate list, a non-positive
    /// candidate or timestep, or an invalid run configuration.
    pub fn new(
        process_scales: Vec<f64>,
        measurement_scales: Vec<f64>,
        dt: f64,
        run_config: RunConfig,
    ) -> Result<Self> {
        validate_candidates("process_scales", &process_scales)?;
        validate_candidates("measurement_scales", &measurement_scales)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TrackingError::validation(format!(
                "timestep must be positive and finite, got {dt}"
            )));
        }
        run_config.validate()?;

        Ok(Self {
            process_scales,
            measurement_scales,
            dt,
            run_config,
        })
    }

    pub fn process_scales(&self) -> &[f64] {
        &self.process_scales
    }

    pub fn measurement_scales(&self) -> &[f64] {
        &self.measurement_scales
    }

    /// Number of grid cells
    pub fn len(&self) -> usize {
        self.process_scales.len() * self.measurement_scales.len()
    }

    /// Never true; candidate lists are validated non-empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells in canonical order
    pub fn cells(&self) -> Vec<NoiseScales> {
        self.process_scales
            .iter()
            .flat_map(|&q| {
                self.measurement_scales
                    .iter()
                    .map(move |&r| NoiseScales::new(q, r))
            })
            .collect()
    }

    /// Run one cell in isolation
    pub fn evaluate(&self, scales: NoiseScales, input: &TrackingInput) -> Result<RunResult> {
        let model = MotionModel::from_scales(scales.process, scales.measurement, self.dt)?;
        TrackingRun::new(model, self.run_config)?.run(input)
    }

    /// Evaluate the whole grid and select the lowest mean error
    ///
    /// # Errors
    /// Only if every cell fails; the first failure in canonical order is returned.
    pub fn run(&self, input: &TrackingInput) -> Result<SearchResult> {
        let cells = self.cells();
        log::debug!(
            "grid search: {} cells ({} process × {} measurement)",
            cells.len(),
            self.process_scales.len(),
            self.measurement_scales.len()
        );

        #[cfg(feature = "rayon")]
        let runs = self.evaluate_parallel(&cells, input);

        #[cfg(not(feature = "rayon"))]
        let runs = self.evaluate_sequential(&cells, input);

        select_best(cells, runs)
    }

    #[cfg(feature = "rayon")]
    fn evaluate_parallel(
        &self,
        cells: &[NoiseScales],
        input: &TrackingInput,
    ) -> Vec<Result<RunResult>> {
        // Indexed collect keeps canonical order
        cells
            .par_iter()
            .map(|&scales| self.evaluate(scales, input))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn evaluate_sequential(
        &self,
        cells: &[NoiseScales],
        input: &TrackingInput,
    ) -> Vec<Result<RunResult>> {
        cells
            .iter()
            .map(|&scales| self.evaluate(scales, input))
            .collect()
    }
}

fn validate_candidates(name: &str, candidates: &[f64]) -> Result<()> {
    if candidates.is_empty() {
        return Err(TrackingError::validation(format!("{name} is empty")));
    }
    if let Some(bad) = candidates.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(TrackingError::validation(format!(
            "{name} must contain positive finite values, got {bad}"
        )));
    }
    Ok(())
}

/// Ordered reduction over cell results
///
/// `cells` and `runs` are index-aligned in canonical order.
fn select_best(cells: Vec<NoiseScales>, runs: Vec<Result<RunResult>>) -> Result<SearchResult> {
    let mut grid = Vec::with_capacity(cells.len());
    let mut best: Option<(NoiseScales, RunResult)> = None;
    let mut first_error: Option<TrackingError> = None;

    for (index, (scales, run)) in cells.into_iter().zip(runs).enumerate() {
        match run {
            Ok(run) => {
                let mean_error = run.mean_error();
                grid.push(GridEvaluation {
                    index,
                    scales,
                    outcome: CellOutcome::Evaluated { mean_error },
                });

                let improves = match &best {
                    Some((_, current)) => mean_error < current.mean_error(),
                    None => true,
                };
                if improves {
                    best = Some((scales, run));
                }
            }
            Err(e) => {
                log::warn!(
                    "grid cell {index} (q = {}, r = {}) failed: {e}",
                    scales.process,
                    scales.measurement
                );
                grid.push(GridEvaluation {
                    index,
                    scales,
                    outcome: CellOutcome::Failed {
                        reason: e.to_string(),
                    },
                });
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match best {
        Some((scales, run)) => {
            log::debug!(
                "grid search winner: q = {}, r = {}, mean error {:.6}",
                scales.process,
                scales.measurement,
                run.mean_error()
            );
            Ok(SearchResult {
                scales,
                model: run.model.clone(),
                min_mean_error: run.mean_error(),
                run,
                grid,
            })
        }
        None => Err(first_error
            .unwrap_or_else(|| TrackingError::validation("search grid has no cells"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::input::Observation;

    fn input() -> TrackingInput {
        TrackingInput::new(vec![
            Observation::new([0.1, 0.0].into(), [0.0, 0.0].into()),
            Observation::new([0.9, 0.2].into(), [1.0, 0.0].into()),
            Observation::new([2.2, -0.1].into(), [2.0, 0.0].into()),
            Observation::new([2.9, 0.1].into(), [3.0, 0.0].into()),
        ])
        .unwrap()
    }

    fn search(q: Vec<f64>, r: Vec<f64>) -> HyperparameterSearch {
        HyperparameterSearch::new(q, r, 1.0, RunConfig::with_gate_threshold(1e6)).unwrap()
    }

    #[test]
    fn test_cells_canonical_order() {
        let cells = search(vec![1.0, 2.0], vec![10.0, 20.0, 30.0]).cells();
        let pairs: Vec<(f64, f64)> = cells.iter().map(|c| (c.process, c.measurement)).collect();
        assert_eq!(
            pairs,
            vec![
                (1.0, 10.0),
                (1.0, 20.0),
                (1.0, 30.0),
                (2.0, 10.0),
                (2.0, 20.0),
                (2.0, 30.0)
            ]
        );
    }

    #[test]
    fn test_validation() {
        let cfg = RunConfig::default();
        assert!(HyperparameterSearch::new(vec![], vec![1.0], 1.0, cfg).is_err());
        assert!(HyperparameterSearch::new(vec![1.0], vec![], 1.0, cfg).is_err());
        assert!(HyperparameterSearch::new(vec![1.0, -1.0], vec![1.0], 1.0, cfg).is_err());
        assert!(HyperparameterSearch::new(vec![1.0], vec![f64::NAN], 1.0, cfg).is_err());
        assert!(HyperparameterSearch::new(vec![1.0], vec![1.0], 0.0, cfg).is_err());
    }

    #[test]
    fn test_tie_keeps_first_cell() {
        // Duplicate candidates produce identical runs
        let result = search(vec![0.5, 0.5], vec![2.0, 2.0]).run(&input()).unwrap();

        assert_eq!(result.grid.len(), 4);
        let first = result.grid[0].mean_error().unwrap();
        assert!(result.grid.iter().all(|c| c.mean_error() == Some(first)));
        assert_eq!(result.scales, NoiseScales::new(0.5, 2.0));
        assert_eq!(result.min_mean_error, first);
    }

    #[test]
    fn test_select_best_skips_failed_cells() {
        let good = search(vec![1.0], vec![1.0]).evaluate(NoiseScales::new(1.0, 1.0), &input()).unwrap();
        let cells = vec![NoiseScales::new(9.0, 9.0), NoiseScales::new(1.0, 1.0)];
        let runs = vec![Err(TrackingError::invariant("boom")), Ok(good.clone())];

        let result = select_best(cells, runs).unwrap();

        assert_eq!(result.scales, NoiseScales::new(1.0, 1.0));
        assert_eq!(result.run, good);
        assert_eq!(result.failed_cells(), 1);
        assert!(matches!(result.grid[0].outcome, CellOutcome::Failed { .. }));
    }

    #[test]
    fn test_select_best_all_failed_returns_first_error() {
        let cells = vec![NoiseScales::new(1.0, 1.0), NoiseScales::new(2.0, 2.0)];
        let runs = vec![
            Err(TrackingError::invariant("first")),
            Err(TrackingError::invariant("second")),
        ];

        let err = select_best(cells, runs).unwrap_err();
        assert!(err.to_string().contains("first"));
    }
}
