use fieldpost_core::{OutputBatch, Postprocessor, Result, UpdateFlags, VectorSamples};

use crate::expect_components;

/// Divergence of a vector field with one component per spatial dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Divergence;

impl<const DIM: usize> Postprocessor<DIM> for Divergence {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS
    }

    fn names(&self) -> Vec<String> {
        vec!["divergence".to_owned()]
    }

    fn n_output_variables(&self) -> usize {
        1
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        expect_components(DIM, samples.n_components)?;
        for (row, gradient) in computed.rows_mut().zip(&samples.gradients) {
            row[0] = (0..DIM).map(|i| gradient[i][i]).sum();
        }
        Ok(())
    }
}

/// Curl of a velocity field.
///
/// In two dimensions this is the scalar `vorticity`; in three dimensions the
/// outputs are `vorticity_x`, `vorticity_y` and `vorticity_z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vorticity;

impl Postprocessor<2> for Vorticity {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS
    }

    fn names(&self) -> Vec<String> {
        vec!["vorticity".to_owned()]
    }

    fn n_output_variables(&self) -> usize {
        1
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<2>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        expect_components(2, samples.n_components)?;
        for (row, g) in computed.rows_mut().zip(&samples.gradients) {
            row[0] = g[1][0] - g[0][1];
        }
        Ok(())
    }
}

impl Postprocessor<3> for Vorticity {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS
    }

    fn names(&self) -> Vec<String> {
        ["vorticity_x", "vorticity_y", "vorticity_z"]
            .map(String::from)
            .to_vec()
    }

    fn n_output_variables(&self) -> usize {
        3
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<3>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        expect_components(3, samples.n_components)?;
        for (row, g) in computed.rows_mut().zip(&samples.gradients) {
            row[0] = g[2][1] - g[1][2];
            row[1] = g[0][2] - g[2][0];
            row[2] = g[1][0] - g[0][1];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use fieldpost_core::{Error, Tensor1};
    use nalgebra::{Vector2, Vector3};

    fn run<P: Postprocessor<DIM>, const DIM: usize>(
        postprocessor: &P,
        samples: &VectorSamples<DIM>,
    ) -> Result<Vec<f64>> {
        let width = postprocessor.n_output_variables();
        let mut data = vec![f64::NAN; samples.n_points * width];
        let mut computed = OutputBatch::new(&mut data, samples.n_points, width)?;
        postprocessor.compute_vector(samples, &mut computed)?;
        Ok(data)
    }

    /// Gradient rows of the linear field `u = A x`.
    fn linear_gradient<const DIM: usize>(rows: [[f64; DIM]; DIM]) -> Vec<Tensor1<DIM>> {
        rows.iter().map(|row| Tensor1::<DIM>::from(*row)).collect()
    }

    #[test]
    fn divergence_of_expansion() {
        // u = (2x, 3y, -z)
        let gradient = linear_gradient([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, -1.0]]);
        let samples = VectorSamples::<3>::new(2, 3).with_gradients(vec![gradient; 2]);

        let data = run(&Divergence, &samples).expect("vector transform");

        assert_eq!(data.len(), 2);
        assert_relative_eq!(data[0], 4.0);
        assert_relative_eq!(data[1], 4.0);
    }

    #[test]
    fn divergence_requires_one_component_per_dimension() {
        let samples = VectorSamples::<2>::new(1, 3)
            .with_gradients(vec![vec![Vector2::zeros(); 3]]);

        let result = run(&Divergence, &samples);

        assert!(matches!(
            result,
            Err(Error::ComponentCount {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn planar_rigid_rotation() {
        // u = (-w y, w x) rotates with angular velocity w, vorticity 2w.
        let w = 1.5;
        let samples = VectorSamples::<2>::new(1, 2)
            .with_gradients(vec![vec![Vector2::new(0.0, -w), Vector2::new(w, 0.0)]]);

        let data = run(&Vorticity, &samples).expect("vector transform");

        assert_eq!(Postprocessor::<2>::names(&Vorticity), vec!["vorticity"]);
        assert_relative_eq!(data[0], 2.0 * w);
    }

    #[test]
    fn spatial_vorticity_components() {
        // u = (z, x, y): curl is (1, 1, 1).
        let gradient = vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let samples = VectorSamples::<3>::new(1, 3).with_gradients(vec![gradient]);

        let data = run(&Vorticity, &samples).expect("vector transform");

        assert_eq!(Postprocessor::<3>::n_output_variables(&Vorticity), 3);
        assert_eq!(
            Postprocessor::<3>::names(&Vorticity),
            vec!["vorticity_x", "vorticity_y", "vorticity_z"]
        );
        for value in data {
            assert_relative_eq!(value, 1.0);
        }
    }

    #[test]
    fn shear_flow_vorticity() {
        // u = (y, 0, 0): curl is (0, 0, -1).
        let gradient = linear_gradient([[0.0, 1.0, 0.0], [0.0; 3], [0.0; 3]]);
        let samples = VectorSamples::<3>::new(1, 3).with_gradients(vec![gradient]);

        let data = run(&Vorticity, &samples).expect("vector transform");

        assert_relative_eq!(data[0], 0.0);
        assert_relative_eq!(data[1], 0.0);
        assert_relative_eq!(data[2], -1.0);
    }
}
