//! Curve sampling for plotting a model over time.
//!
//! A [`Curve`] describes what to sample; [`Curve::samples`] hands out a fresh
//! lazy iterator over evenly spaced times in `[0, horizon]`, both ends
//! included.

use crate::error::DomainError;
use crate::guard::guard_positive;
use crate::{cooling, decay};
use serde::Serialize;

/// Default number of points per curve
pub const DEFAULT_SAMPLES: usize = 500;

/// A decay curve runs past the queried time by this factor
pub const DECAY_HORIZON_FACTOR: f64 = 1.2;

/// One sampled point of a curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub time: f64,
    pub value: f64,
}

/// The model function being sampled, with its fixed parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveModel {
    Decay { n0: f64, k: f64 },
    Cooling { ta: f64, t0: f64, k: f64 },
}

impl CurveModel {
    pub fn evaluate(&self, t: f64) -> f64 {
        match *self {
            CurveModel::Decay { n0, k } => decay::solve_final_quantity(n0, k, t),
            CurveModel::Cooling { ta, t0, k } => cooling::solve_final_temperature(ta, t0, k, t),
        }
    }
}

/// A model sampled at `samples` evenly spaced times over `[0, horizon]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
    model: CurveModel,
    horizon: f64,
    samples: usize,
}

impl Curve {
    /// Sample over `[0, horizon]`. Fewer than two samples are raised to two.
    pub fn new(model: CurveModel, horizon: f64, samples: usize) -> Result<Self, DomainError> {
        guard_positive(horizon, "horizon")?;
        Ok(Self {
            model,
            horizon,
            samples: samples.max(2),
        })
    }

    /// Decay curve over `[0, 1.2 * t_max]`
    pub fn decay(n0: f64, k: f64, t_max: f64, samples: usize) -> Result<Self, DomainError> {
        Self::decay_over(n0, k, t_max, DECAY_HORIZON_FACTOR, samples)
    }

    /// Decay curve over `[0, horizon_factor * t_max]`
    pub fn decay_over(
        n0: f64,
        k: f64,
        t_max: f64,
        horizon_factor: f64,
        samples: usize,
    ) -> Result<Self, DomainError> {
        guard_positive(t_max, "t")?;
        Self::new(CurveModel::Decay { n0, k }, t_max * horizon_factor, samples)
    }

    /// Cooling curve over `[0, horizon]`
    pub fn cooling(
        ta: f64,
        t0: f64,
        k: f64,
        horizon: f64,
        samples: usize,
    ) -> Result<Self, DomainError> {
        Self::new(CurveModel::Cooling { ta, t0, k }, horizon, samples)
    }

    pub fn model(&self) -> CurveModel {
        self.model
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    fn step(&self) -> f64 {
        self.horizon / (self.samples - 1) as f64
    }

    /// Index of the sample whose time is closest to `t`
    pub fn nearest_index(&self, t: f64) -> usize {
        // `as` saturates: negative and NaN land on 0
        let index = (t / self.step()).round() as usize;
        index.min(self.samples - 1)
    }

    /// A new iterator over the curve, independent of any earlier one
    pub fn samples(&self) -> Samples {
        Samples {
            model: self.model,
            horizon: self.horizon,
            count: self.samples,
            next: 0,
        }
    }
}

/// Lazy iterator over the points of a [`Curve`]
#[derive(Clone, Debug)]
pub struct Samples {
    model: CurveModel,
    horizon: f64,
    count: usize,
    next: usize,
}

impl Iterator for Samples {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<CurvePoint> {
        if self.next >= self.count {
            return None;
        }

        // Last point lands exactly on the horizon
        let time = if self.next + 1 == self.count {
            self.horizon
        } else {
            self.horizon * self.next as f64 / (self.count - 1) as f64
        };
        self.next += 1;

        Some(CurvePoint {
            time,
            value: self.model.evaluate(time),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violation;

    #[test]
    fn test_decay_curve_spans_extended_horizon() {
        let curve = Curve::decay(800.0, 0.015, 50.0, DEFAULT_SAMPLES).unwrap();
        let points: Vec<_> = curve.samples().collect();

        assert_eq!(points.len(), 500);
        assert_eq!(points[0].time, 0.0);
        assert_eq!(points[0].value, 800.0);
        assert_eq!(points[499].time, 60.0);
    }

    #[test]
    fn test_samples_are_evenly_spaced() {
        let curve = Curve::cooling(25.0, 100.0, 0.1, 10.0, 11).unwrap();
        let times: Vec<f64> = curve.samples().map(|p| p.time).collect();

        for (i, time) in times.iter().enumerate() {
            assert!((time - i as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cooling_curve_approaches_ambient() {
        let curve = Curve::cooling(25.0, 100.0, 0.1, 100.0, 50).unwrap();
        let values: Vec<f64> = curve.samples().map(|p| p.value).collect();

        assert!(values.windows(2).all(|w| w[1] < w[0]));
        assert!(values.iter().all(|v| *v > 25.0));
    }

    #[test]
    fn test_each_call_yields_fresh_sequence() {
        let curve = Curve::decay(10.0, 0.5, 4.0, 20).unwrap();
        let mut first = curve.samples();
        first.next();
        first.next();

        assert_eq!(first.len(), 18);
        assert_eq!(curve.samples().len(), 20);
        assert_eq!(curve.samples().next().unwrap().time, 0.0);
    }

    #[test]
    fn test_nearest_index() {
        let curve = Curve::cooling(0.0, 1.0, 1.0, 10.0, 11).unwrap();
        assert_eq!(curve.nearest_index(0.0), 0);
        assert_eq!(curve.nearest_index(4.4), 4);
        assert_eq!(curve.nearest_index(4.6), 5);
        assert_eq!(curve.nearest_index(-3.0), 0);
        assert_eq!(curve.nearest_index(500.0), 10);
    }

    #[test]
    fn test_non_positive_horizon_rejected() {
        let err = Curve::decay(800.0, 0.015, 0.0, 10).unwrap_err();
        assert_eq!((err.field, err.violation), ("t", Violation::NotPositive));

        assert!(Curve::cooling(25.0, 100.0, 0.1, -1.0, 10).is_err());
    }

    #[test]
    fn test_sample_count_floor() {
        let curve = Curve::cooling(25.0, 100.0, 0.1, 5.0, 0).unwrap();
        let points: Vec<_> = curve.samples().collect();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].time, 5.0);
    }
}
