//! Sling leg tension from load weight and apex angle.

/// `k = 1 / (2·cos(α/2))`, `per_leg = P·k / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlingTension {
    pub k: f32,
    pub per_leg: f32,
}

/// Tension per leg for a load `load` (tonnes) hung at apex angle `alpha_deg`.
///
/// A zero angle is a single vertical leg carrying the whole load. Angles
/// outside (0, 180) and non-positive loads give `None`.
pub fn sling_tension(load: f32, alpha_deg: f32) -> Option<SlingTension> {
    if !load.is_finite() || load <= 0.0 || !alpha_deg.is_finite() {
        return None;
    }
    if alpha_deg == 0.0 {
        return Some(SlingTension {
            k: 1.0,
            per_leg: load,
        });
    }
    if alpha_deg <= 0.0 || alpha_deg >= 180.0 {
        return None;
    }
    let half = (alpha_deg / 2.0).to_radians();
    let k = 1.0 / (2.0 * half.cos());
    Some(SlingTension {
        k,
        per_leg: load * k / 2.0,
    })
}
