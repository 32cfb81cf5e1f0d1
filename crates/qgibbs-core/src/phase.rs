//! Rotation angles for the operator power.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{GibbsError, GibbsResult};

/// Largest accepted disagreement between the two solved angles.
pub const ANGLE_TOL: f64 = 1e-8;

/// The pair of Z-rotation angles realizing `cos(2φ) = ey`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseFactors {
    /// Angle of the first rotation.
    pub phi1: f64,
    /// Angle of the second rotation; equal to `phi1` within [`ANGLE_TOL`].
    pub phi2: f64,
}

/// Solve for the rotation angles that scale the ancilla-0 amplitude of the
/// squared block encoding to `ey`.
///
/// ```text
/// t    = sqrt((-1 - ey) / (-1 + ey))
/// phi1 = arg(((1 + t·i) + ey·(1 - t·i)) / 2)
/// phi2 = arg(sqrt(1/2) · sqrt(1 - ey) · (t + i))
/// ```
///
/// Both are `atan(1/t)`. Fails outside `(-1, 1)` and when the two angles
/// disagree by more than [`ANGLE_TOL`].
pub fn gen_phase_factors(ey: f64) -> GibbsResult<PhaseFactors> {
    if !ey.is_finite() || ey <= -1.0 || ey >= 1.0 {
        return Err(GibbsError::PhaseDomain { ey });
    }

    let t = ((-1.0 - ey) / (-1.0 + ey)).sqrt();
    let i = Complex64::i();
    let one = Complex64::new(1.0, 0.0);

    let phi1 = (((one + i * t) + (one - i * t) * ey) / 2.0).arg();
    let phi2 = (Complex64::new(0.5f64.sqrt() * (1.0 - ey).sqrt(), 0.0) * (i + t)).arg();

    if (phi1 - phi2).abs() > ANGLE_TOL || !phi1.is_finite() {
        return Err(GibbsError::AngleMismatch { phi1, phi2 });
    }
    Ok(PhaseFactors { phi1, phi2 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_target_is_quarter_turn() {
        let phases = gen_phase_factors(0.0).unwrap();
        assert!((phases.phi1 - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }

    #[test]
    fn test_domain_is_open_interval() {
        for ey in [-1.0, 1.0, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                gen_phase_factors(ey),
                Err(GibbsError::PhaseDomain { .. })
            ));
        }
    }

    #[test]
    fn test_dense_sweep_of_negative_targets() {
        let steps = 10_000;
        for k in 0..=steps {
            let ey = -0.999 + 0.998 * f64::from(k) / f64::from(steps);
            let phases = gen_phase_factors(ey).unwrap();
            assert!((phases.phi1 - phases.phi2).abs() <= ANGLE_TOL, "ey = {ey}");
        }
    }

    proptest! {
        #[test]
        fn cosine_of_double_angle_recovers_target(ey in -0.999f64..0.999) {
            let phases = gen_phase_factors(ey).unwrap();
            prop_assert!(((2.0 * phases.phi1).cos() - ey).abs() < 1e-12);
            prop_assert!((phases.phi1 - phases.phi2).abs() <= ANGLE_TOL);
        }
    }
}
