//! Radiosity system solvers

use core_lib::matrix::*;
use core_lib::pbrt::*;
use core_lib::spectrum::*;

/// Smallest pivot magnitude accepted before a system is treated as singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// Per element radiosity, one vector per colour channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Radiosities {
    pub r: Vec<Float>,
    pub g: Vec<Float>,
    pub b: Vec<Float>,
}

impl Radiosities {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.r.len()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Returns the radiosity of an element.
    ///
    /// * `i` - Element index.
    pub fn get(&self, i: usize) -> RGBSpectrum {
        RGBSpectrum::from_rgb(self.r[i], self.g[i], self.b[i])
    }
}

/// Solves the radiosity system `B = E + ρ F B` for each colour channel.
pub trait Solver {
    /// Returns the radiosity of every element.
    ///
    /// * `ff`          - Form-factor matrix.
    /// * `reflectance` - Reflectance per element.
    /// * `emission`    - Emission per element.
    fn solve(
        &self,
        ff: &Matrix,
        reflectance: &[RGBSpectrum],
        emission: &[RGBSpectrum],
    ) -> Result<Radiosities, String>;
}

/// Direct solver using Gaussian elimination with partial pivoting on the
/// dense system `(I - ρ F) B = E`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DenseSolver;

impl Solver for DenseSolver {
    fn solve(
        &self,
        ff: &Matrix,
        reflectance: &[RGBSpectrum],
        emission: &[RGBSpectrum],
    ) -> Result<Radiosities, String> {
        let n = ff.size();
        if reflectance.len() != n || emission.len() != n {
            return Err(format!(
                "DenseSolver::solve(): Expected {} reflectances and emissions, got {} and {}",
                n,
                reflectance.len(),
                emission.len()
            ));
        }

        let mut channels: Vec<Vec<Float>> = Vec::with_capacity(RGB_SAMPLES);
        for ch in 0..RGB_SAMPLES {
            let a: Vec<Vec<f64>> = (0..n)
                .map(|i| {
                    let rho = reflectance[i][ch] as f64;
                    ff.row(i)
                        .iter()
                        .enumerate()
                        .map(|(j, &f)| {
                            let delta = if i == j { 1.0 } else { 0.0 };
                            delta - rho * f as f64
                        })
                        .collect()
                })
                .collect();
            let b: Vec<f64> = emission.iter().map(|e| e[ch] as f64).collect();

            let x = solve_dense(a, b).map_err(|e| format!("DenseSolver::solve(): Channel {}: {}", ch, e))?;
            channels.push(x.into_iter().map(|v| v as Float).collect());
        }

        let b = channels.pop().unwrap_or_default();
        let g = channels.pop().unwrap_or_default();
        let r = channels.pop().unwrap_or_default();
        debug!("Solved radiosity system with {} elements", n);
        Ok(Radiosities { r, g, b })
    }
}

/// Solves `A x = b` in place using Gaussian elimination with partial pivoting.
///
/// * `a` - Square matrix as rows.
/// * `b` - Right hand side.
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, String> {
    let n = a.len();

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_val = a[col][col].abs();
        for (r, row) in a.iter().enumerate().skip(col + 1) {
            let v = row[col].abs();
            if v > pivot_val {
                pivot_val = v;
                pivot_row = r;
            }
        }

        if !(pivot_val > PIVOT_EPSILON) {
            return Err(format!("Singular system at column {}", col));
        }

        if pivot_row != col {
            a.swap(pivot_row, col);
            b.swap(pivot_row, col);
        }

        let pivot = a[col][col];
        for r in (col + 1)..n {
            let factor = a[r][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            a[r][col] = 0.0;
            for c in (col + 1)..n {
                a[r][c] -= factor * a[col][c];
            }
            b[r] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut rhs = b[i];
        for j in (i + 1)..n {
            rhs -= a[i][j] * x[j];
        }
        x[i] = rhs / a[i][i];
    }

    match x.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(format!("Non-finite solution at element {}: {}", i, x[i])),
        None => Ok(x),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn uncoupled_elements_return_emission() {
        let ff = Matrix::zeros(2);
        let rho = [RGBSpectrum::new(0.5); 2];
        let e = [RGBSpectrum::from_rgb(1.0, 2.0, 3.0), RGBSpectrum::default()];
        let b = DenseSolver.solve(&ff, &rho, &e).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.get(0), e[0]);
        assert!(b.get(1).is_black());
    }

    #[test]
    fn two_facing_elements_exchange_light() {
        let mut ff = Matrix::zeros(2);
        ff[(0, 1)] = 0.5;
        ff[(1, 0)] = 0.5;
        let rho = [RGBSpectrum::new(0.5); 2];
        let e = [RGBSpectrum::new(1.0), RGBSpectrum::default()];
        let b = DenseSolver.solve(&ff, &rho, &e).unwrap();
        assert!(approx_eq!(f32, b.r[0], 16.0 / 15.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, b.r[1], 4.0 / 15.0, epsilon = 1e-6));
        assert_eq!(b.r, b.g);
        assert_eq!(b.g, b.b);
    }

    #[test]
    fn channels_are_solved_independently() {
        let mut ff = Matrix::zeros(2);
        ff[(0, 1)] = 1.0;
        ff[(1, 0)] = 1.0;
        let rho = [RGBSpectrum::from_rgb(0.0, 0.5, 0.5); 2];
        let e = [RGBSpectrum::new(1.0), RGBSpectrum::default()];
        let b = DenseSolver.solve(&ff, &rho, &e).unwrap();
        assert_eq!(b.r, vec![1.0, 0.0]);
        assert!(b.g[1] > 0.0);
    }

    #[test]
    fn singular_system_is_an_error() {
        let mut ff = Matrix::zeros(2);
        ff[(0, 1)] = 1.0;
        ff[(1, 0)] = 1.0;
        let rho = [RGBSpectrum::new(1.0); 2];
        let e = [RGBSpectrum::new(1.0); 2];
        assert!(DenseSolver.solve(&ff, &rho, &e).is_err());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let ff = Matrix::zeros(3);
        let rho = [RGBSpectrum::new(0.5); 2];
        let e = [RGBSpectrum::default(); 3];
        assert!(DenseSolver.solve(&ff, &rho, &e).is_err());
    }

    #[test]
    fn empty_system_solves() {
        let b = DenseSolver.solve(&Matrix::zeros(0), &[], &[]).unwrap();
        assert!(b.is_empty());
    }
}
