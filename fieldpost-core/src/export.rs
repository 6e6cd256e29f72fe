//! A reference driver that runs a postprocessor over evaluated batches.
//!
//! The driver owns the collaboration protocol: it asks the postprocessor
//! which samples it needs, has the [`FieldEvaluator`] compute exactly those,
//! allocates the output rows, and calls the transform matching the field's
//! component structure. A pass either completes for every batch or fails as
//! a whole.

mod config;
mod derived;
mod evaluator;

pub use config::Config;
pub use derived::{DerivedBatch, DerivedData};
pub use evaluator::{Batch, FieldEvaluator};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{Error, FieldSamples, OutputBatch, Postprocessor, Result, Variant};

/// Runs `postprocessor` over every batch and collects the derived quantities.
///
/// Batches are returned in the order given. The postprocessor is shared by
/// reference for the whole pass.
///
/// # Errors
///
/// Returns an error raised by the evaluator, a sample shape check, the
/// transform, or the finite-value check. A serial pass reports the earliest
/// failing batch; a parallel pass reports whichever failure it meets first,
/// which need not be the earliest in batch order. No partial output is
/// returned.
pub fn export<const DIM: usize, P, E>(
    postprocessor: &P,
    evaluator: &E,
    batches: &[Batch],
    config: &Config,
) -> Result<DerivedData>
where
    P: Postprocessor<DIM> + Sync + ?Sized,
    E: FieldEvaluator<DIM>,
{
    let names = postprocessor.names();
    debug_assert_eq!(
        names.len(),
        postprocessor.n_output_variables(),
        "postprocessor declares {} names for {} output variables",
        names.len(),
        postprocessor.n_output_variables(),
    );

    debug!(
        quantities = ?names,
        flags = %postprocessor.update_flags(),
        batches = batches.len(),
        parallel = config.parallel,
        "starting export pass"
    );

    let run = |batch: &Batch| process_batch(postprocessor, evaluator, batch, config);
    let result: Result<Vec<DerivedBatch>> = if config.parallel {
        batches.par_iter().map(run).collect()
    } else {
        batches.iter().map(run).collect()
    };

    match result {
        Ok(batches) => {
            let data = DerivedData { names, batches };
            debug!(points = data.n_points(), "finished export pass");
            Ok(data)
        }
        Err(error) => {
            warn!(%error, "export pass aborted");
            Err(error)
        }
    }
}

/// Evaluates one batch and computes its derived quantities.
///
/// # Errors
///
/// Returns an error if the evaluator fails, the declared samples have the
/// wrong shape, the field's component count disagrees with the evaluator or
/// with the samples' variant (scalar iff one component), the transform
/// fails, or (when `config.require_finite` is set) a computed value is not
/// finite.
pub fn process_batch<const DIM: usize, P, E>(
    postprocessor: &P,
    evaluator: &E,
    batch: &Batch,
    config: &Config,
) -> Result<DerivedBatch>
where
    P: Postprocessor<DIM> + ?Sized,
    E: FieldEvaluator<DIM>,
{
    let flags = postprocessor.update_flags();
    let width = postprocessor.n_output_variables();

    let samples = evaluator
        .evaluate(batch, flags)
        .map_err(|error| Error::Evaluator(Box::new(error)))?;
    samples.check_shape(flags, batch.origin)?;

    let expected = evaluator.n_components();
    if samples.n_components() != expected {
        return Err(Error::ComponentCount {
            expected,
            found: samples.n_components(),
        });
    }

    let variant = match &samples {
        FieldSamples::Scalar(_) => Variant::Scalar,
        FieldSamples::Vector(_) => Variant::Vector,
    };
    if (variant == Variant::Scalar) != (expected == 1) {
        return Err(Error::FieldKind {
            variant,
            n_components: expected,
        });
    }

    let n_points = samples.n_points();
    let len = n_points.checked_mul(width).ok_or(Error::OutputShape {
        len: usize::MAX,
        n_points,
        width,
    })?;
    let mut data = vec![0.0; len];
    let mut computed = OutputBatch::new(&mut data, n_points, width)?;
    match &samples {
        FieldSamples::Scalar(samples) => postprocessor.compute_scalar(samples, &mut computed)?,
        FieldSamples::Vector(samples) => postprocessor.compute_vector(samples, &mut computed)?,
    }

    if config.require_finite {
        if let Some(position) = data.iter().position(|value| !value.is_finite()) {
            let variable = postprocessor
                .names()
                .get(position % width)
                .cloned()
                .unwrap_or_default();
            return Err(Error::NonFinite {
                batch: batch.index,
                point: position / width,
                variable,
            });
        }
    }

    trace!(
        batch = batch.index,
        origin = ?batch.origin,
        points = n_points,
        "processed batch"
    );

    Ok(DerivedBatch {
        batch: *batch,
        n_points,
        width,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    use crate::{ScalarSamples, UpdateFlags, VectorSamples};

    /// Scalar field `u = index + point` on each batch, three points per batch.
    struct Ramp;

    impl FieldEvaluator<1> for Ramp {
        type Error = Infallible;

        fn n_components(&self) -> usize {
            1
        }

        fn evaluate(
            &self,
            batch: &Batch,
            _flags: UpdateFlags,
        ) -> std::result::Result<FieldSamples<1>, Self::Error> {
            let values = (0..3).map(|i| (batch.index + i) as f64).collect();
            Ok(FieldSamples::Scalar(
                ScalarSamples::new(3).with_values(values),
            ))
        }
    }

    /// Computes `u` and `u^2`, or `1 / u` when `reciprocal` is set.
    struct Powers {
        reciprocal: bool,
    }

    impl Postprocessor<1> for Powers {
        fn update_flags(&self) -> UpdateFlags {
            UpdateFlags::VALUES
        }

        fn names(&self) -> Vec<String> {
            vec!["u".into(), "u_squared".into()]
        }

        fn n_output_variables(&self) -> usize {
            2
        }

        fn compute_scalar(
            &self,
            samples: &ScalarSamples<1>,
            computed: &mut OutputBatch<'_>,
        ) -> Result<()> {
            for (row, &u) in computed.rows_mut().zip(&samples.values) {
                row[0] = u;
                row[1] = if self.reciprocal { 1.0 / u } else { u * u };
            }
            Ok(())
        }
    }

    #[test]
    fn serial_and_parallel_passes_agree() {
        let batches: Vec<Batch> = (0..16).map(Batch::cell).collect();
        let postprocessor = Powers { reciprocal: false };

        let serial = export(
            &postprocessor,
            &Ramp,
            &batches,
            &Config {
                parallel: false,
                ..Config::default()
            },
        )
        .expect("serial pass succeeds");
        let parallel = export(&postprocessor, &Ramp, &batches, &Config::default())
            .expect("parallel pass succeeds");

        assert_eq!(serial, parallel);
        assert_eq!(serial.names, vec!["u", "u_squared"]);
        assert_eq!(serial.n_points(), 48);

        let last = &serial.batches[15];
        assert_eq!(last.batch, Batch::cell(15));
        assert_relative_eq!(last.row(2)[0], 17.0);
        assert_relative_eq!(last.row(2)[1], 289.0);
    }

    #[test]
    fn column_collects_values_by_name() {
        let batches = [Batch::cell(0), Batch::cell(10)];
        let data = export(
            &Powers { reciprocal: false },
            &Ramp,
            &batches,
            &Config::default(),
        )
        .expect("pass succeeds");

        assert_eq!(
            data.column("u"),
            Some(vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0])
        );
        assert_eq!(data.column("pressure"), None);
    }

    #[test]
    fn require_finite_reports_offending_slot() {
        let config = Config {
            require_finite: true,
            ..Config::default()
        };

        // Batch 0 starts at u = 0, so 1 / u is infinite at its first point.
        let result = export(
            &Powers { reciprocal: true },
            &Ramp,
            &[Batch::cell(3), Batch::cell(0)],
            &config,
        );

        match result {
            Err(Error::NonFinite {
                batch,
                point,
                variable,
            }) => {
                assert_eq!((batch, point), (0, 0));
                assert_eq!(variable, "u_squared");
            }
            other => panic!("expected a non-finite error, got {other:?}"),
        }

        // Without the check the infinity passes through.
        let data = export(
            &Powers { reciprocal: true },
            &Ramp,
            &[Batch::cell(0)],
            &Config::default(),
        )
        .expect("unchecked pass succeeds");
        assert!(data.batches[0].row(0)[1].is_infinite());
    }

    #[test]
    fn vector_field_on_scalar_postprocessor_is_rejected() {
        struct Planar;

        impl FieldEvaluator<1> for Planar {
            type Error = Infallible;

            fn n_components(&self) -> usize {
                2
            }

            fn evaluate(
                &self,
                _batch: &Batch,
                _flags: UpdateFlags,
            ) -> std::result::Result<FieldSamples<1>, Self::Error> {
                let values = vec![nalgebra::dvector![1.0, 2.0]];
                Ok(FieldSamples::Vector(
                    VectorSamples::new(1, 2).with_values(values),
                ))
            }
        }

        let result = export(
            &Powers { reciprocal: false },
            &Planar,
            &[Batch::cell(0)],
            &Config::default(),
        );

        assert!(matches!(
            result,
            Err(Error::NotImplemented {
                variant: crate::Variant::Vector
            })
        ));
    }

    #[test]
    fn component_count_must_match_evaluator() {
        struct Inconsistent;

        impl FieldEvaluator<1> for Inconsistent {
            type Error = Infallible;

            fn n_components(&self) -> usize {
                3
            }

            fn evaluate(
                &self,
                _batch: &Batch,
                _flags: UpdateFlags,
            ) -> std::result::Result<FieldSamples<1>, Self::Error> {
                Ok(FieldSamples::Scalar(
                    ScalarSamples::new(2).with_values(vec![0.0, 1.0]),
                ))
            }
        }

        let result = process_batch(
            &Powers { reciprocal: false },
            &Inconsistent,
            &Batch::cell(0),
            &Config::default(),
        );

        assert!(matches!(
            result,
            Err(Error::ComponentCount {
                expected: 3,
                found: 1
            })
        ));
    }

    /// One-point batches tagged scalar or vector regardless of the component count.
    struct Tagged {
        n_components: usize,
        vector: bool,
    }

    impl FieldEvaluator<1> for Tagged {
        type Error = Infallible;

        fn n_components(&self) -> usize {
            self.n_components
        }

        fn evaluate(
            &self,
            _batch: &Batch,
            _flags: UpdateFlags,
        ) -> std::result::Result<FieldSamples<1>, Self::Error> {
            let samples = if self.vector {
                let value = nalgebra::DVector::from_element(self.n_components, -3.0);
                FieldSamples::Vector(
                    VectorSamples::new(1, self.n_components).with_values(vec![value]),
                )
            } else {
                FieldSamples::Scalar(ScalarSamples::new(1).with_values(vec![-3.0]))
            };
            Ok(samples)
        }
    }

    /// Accepts both variants so only the driver can reject a batch.
    struct Sum;

    impl Postprocessor<1> for Sum {
        fn update_flags(&self) -> UpdateFlags {
            UpdateFlags::VALUES
        }

        fn names(&self) -> Vec<String> {
            vec!["sum".into()]
        }

        fn n_output_variables(&self) -> usize {
            1
        }

        fn compute_scalar(
            &self,
            samples: &ScalarSamples<1>,
            computed: &mut OutputBatch<'_>,
        ) -> Result<()> {
            for (row, &u) in computed.rows_mut().zip(&samples.values) {
                row[0] = u;
            }
            Ok(())
        }

        fn compute_vector(
            &self,
            samples: &VectorSamples<1>,
            computed: &mut OutputBatch<'_>,
        ) -> Result<()> {
            for (row, u) in computed.rows_mut().zip(&samples.values) {
                row[0] = u.sum();
            }
            Ok(())
        }
    }

    #[test]
    fn single_component_field_must_use_scalar_samples() {
        let one_as_vector = Tagged {
            n_components: 1,
            vector: true,
        };

        let result = export(&Sum, &one_as_vector, &[Batch::cell(0)], &Config::default());

        assert!(matches!(
            result,
            Err(Error::FieldKind {
                variant: crate::Variant::Vector,
                n_components: 1
            })
        ));
    }

    #[test]
    fn multi_component_field_must_use_vector_samples() {
        let none_as_scalar = Tagged {
            n_components: 0,
            vector: false,
        };

        let result = process_batch(&Sum, &none_as_scalar, &Batch::cell(0), &Config::default());

        // The count check runs first, since scalar samples always have one component.
        assert!(matches!(
            result,
            Err(Error::ComponentCount {
                expected: 0,
                found: 1
            })
        ));

        let pair = Tagged {
            n_components: 2,
            vector: true,
        };
        let data = process_batch(&Sum, &pair, &Batch::cell(0), &Config::default())
            .expect("vector samples of a two-component field");
        assert_relative_eq!(data.row(0)[0], -6.0);
    }

    #[test]
    fn oversized_batch_is_rejected_before_allocation() {
        struct Huge;

        impl FieldEvaluator<1> for Huge {
            type Error = Infallible;

            fn n_components(&self) -> usize {
                1
            }

            fn evaluate(
                &self,
                _batch: &Batch,
                _flags: UpdateFlags,
            ) -> std::result::Result<FieldSamples<1>, Self::Error> {
                Ok(FieldSamples::Scalar(ScalarSamples::new(usize::MAX)))
            }
        }

        struct Flagless;

        impl Postprocessor<1> for Flagless {
            fn update_flags(&self) -> UpdateFlags {
                UpdateFlags::NONE
            }

            fn names(&self) -> Vec<String> {
                vec!["a".into(), "b".into()]
            }

            fn n_output_variables(&self) -> usize {
                2
            }
        }

        let result = process_batch(&Flagless, &Huge, &Batch::cell(0), &Config::default());

        assert!(matches!(
            result,
            Err(Error::OutputShape {
                n_points: usize::MAX,
                width: 2,
                ..
            })
        ));
    }

    #[test]
    fn evaluator_errors_abort_the_pass() {
        #[derive(Debug, thiserror::Error)]
        #[error("face {0} is not on the boundary")]
        struct NotOnBoundary(usize);

        struct CellsOnly;

        impl FieldEvaluator<1> for CellsOnly {
            type Error = NotOnBoundary;

            fn n_components(&self) -> usize {
                1
            }

            fn evaluate(
                &self,
                batch: &Batch,
                _flags: UpdateFlags,
            ) -> std::result::Result<FieldSamples<1>, Self::Error> {
                match batch.origin {
                    crate::BatchOrigin::Cell => Ok(FieldSamples::Scalar(
                        ScalarSamples::new(1).with_values(vec![1.0]),
                    )),
                    crate::BatchOrigin::Face => Err(NotOnBoundary(batch.index)),
                }
            }
        }

        let result = export(
            &Powers { reciprocal: false },
            &CellsOnly,
            &[Batch::cell(0), Batch::face(4), Batch::cell(1)],
            &Config::default(),
        );

        let Err(Error::Evaluator(source)) = result else {
            panic!("expected an evaluator error");
        };
        assert_eq!(source.to_string(), "face 4 is not on the boundary");

        // A serial pass stops at the earliest failing batch.
        let serial = Config {
            parallel: false,
            ..Config::default()
        };
        let result = export(
            &Powers { reciprocal: false },
            &CellsOnly,
            &[Batch::cell(0), Batch::face(7), Batch::face(2)],
            &serial,
        );
        let Err(Error::Evaluator(source)) = result else {
            panic!("expected an evaluator error");
        };
        assert_eq!(source.to_string(), "face 7 is not on the boundary");
    }
}
