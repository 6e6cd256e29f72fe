//! Mock field evaluators shared by the integration tests.
//!
//! Each batch `i` holds `points_per_batch` points along the line `x = i`,
//! at `y = 0, 0.5, 1.0, ...`. Face batches carry the unit normal `+x`.

use std::{
    convert::Infallible,
    sync::atomic::{AtomicUsize, Ordering},
};

use fieldpost_core::{
    FieldSamples, ScalarSamples, Tensor1, Tensor2, UpdateFlags, VectorSamples,
    export::{Batch, FieldEvaluator},
};
use nalgebra::{DVector, Matrix2, Vector2};

/// Counts the per-point samples an evaluator has computed.
#[derive(Debug, Default)]
pub struct WorkCounter {
    values: AtomicUsize,
    gradients: AtomicUsize,
    hessians: AtomicUsize,
    normals: AtomicUsize,
}

impl WorkCounter {
    pub fn values(&self) -> usize {
        self.values.load(Ordering::Relaxed)
    }

    pub fn gradients(&self) -> usize {
        self.gradients.load(Ordering::Relaxed)
    }

    pub fn hessians(&self) -> usize {
        self.hessians.load(Ordering::Relaxed)
    }

    pub fn normals(&self) -> usize {
        self.normals.load(Ordering::Relaxed)
    }

    fn record(&self, flags: UpdateFlags, points: usize, has_normals: bool) {
        if flags.contains(UpdateFlags::VALUES) {
            self.values.fetch_add(points, Ordering::Relaxed);
        }
        if flags.contains(UpdateFlags::GRADIENTS) {
            self.gradients.fetch_add(points, Ordering::Relaxed);
        }
        if flags.contains(UpdateFlags::HESSIANS) {
            self.hessians.fetch_add(points, Ordering::Relaxed);
        }
        if has_normals {
            self.normals.fetch_add(points, Ordering::Relaxed);
        }
    }
}

fn points(batch: &Batch, n: usize) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|k| Vector2::new(batch.index as f64, 0.5 * k as f64))
        .collect()
}

fn face_normals(batch: &Batch, flags: UpdateFlags, n: usize) -> Vec<Tensor1<2>> {
    match batch.origin {
        fieldpost_core::BatchOrigin::Face if flags.contains(UpdateFlags::NORMALS) => {
            vec![Vector2::x(); n]
        }
        _ => Vec::new(),
    }
}

/// The scalar field `u = x² + 3y²`, evaluated only as far as the flags ask.
#[derive(Debug)]
pub struct QuadraticField {
    pub points_per_batch: usize,
    pub work: WorkCounter,
}

impl QuadraticField {
    pub fn new(points_per_batch: usize) -> Self {
        Self {
            points_per_batch,
            work: WorkCounter::default(),
        }
    }
}

impl FieldEvaluator<2> for QuadraticField {
    type Error = Infallible;

    fn n_components(&self) -> usize {
        1
    }

    fn evaluate(&self, batch: &Batch, flags: UpdateFlags) -> Result<FieldSamples<2>, Infallible> {
        let n = self.points_per_batch;
        let xs = points(batch, n);
        let mut samples = ScalarSamples::new(n);

        if flags.contains(UpdateFlags::VALUES) {
            samples.values = xs.iter().map(|p| p.x * p.x + 3.0 * p.y * p.y).collect();
        }
        if flags.contains(UpdateFlags::GRADIENTS) {
            samples.gradients = xs.iter().map(|p| Vector2::new(2.0 * p.x, 6.0 * p.y)).collect();
        }
        if flags.contains(UpdateFlags::HESSIANS) {
            samples.hessians = vec![Matrix2::new(2.0, 0.0, 0.0, 6.0); n];
        }
        samples.normals = face_normals(batch, flags, n);

        self.work.record(flags, n, !samples.normals.is_empty());
        Ok(FieldSamples::Scalar(samples))
    }
}

/// The planar rotation `u = (-y, x)`, evaluated only as far as the flags ask.
#[derive(Debug)]
pub struct RotationField {
    pub points_per_batch: usize,
    pub work: WorkCounter,
}

impl RotationField {
    pub fn new(points_per_batch: usize) -> Self {
        Self {
            points_per_batch,
            work: WorkCounter::default(),
        }
    }
}

impl FieldEvaluator<2> for RotationField {
    type Error = Infallible;

    fn n_components(&self) -> usize {
        2
    }

    fn evaluate(&self, batch: &Batch, flags: UpdateFlags) -> Result<FieldSamples<2>, Infallible> {
        let n = self.points_per_batch;
        let xs = points(batch, n);
        let mut samples = VectorSamples::new(n, 2);

        if flags.contains(UpdateFlags::VALUES) {
            samples.values = xs
                .iter()
                .map(|p| DVector::from_vec(vec![-p.y, p.x]))
                .collect();
        }
        if flags.contains(UpdateFlags::GRADIENTS) {
            let gradient = vec![Vector2::new(0.0, -1.0), Vector2::new(1.0, 0.0)];
            samples.gradients = vec![gradient; n];
        }
        if flags.contains(UpdateFlags::HESSIANS) {
            samples.hessians = vec![vec![Tensor2::<2>::zeros(); 2]; n];
        }
        samples.normals = face_normals(batch, flags, n);

        self.work.record(flags, n, !samples.normals.is_empty());
        Ok(FieldSamples::Vector(samples))
    }
}
