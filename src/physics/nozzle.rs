use crate::types::G0;

// ---------------------------------------------------------------------------
// Choked-flow relations (ideal gas, isentropic)
// ---------------------------------------------------------------------------

/// Choking term (2/(γ+1))^((γ+1)/(2(γ−1))) of the sonic mass-flow equation.
pub fn choke_factor(gamma: f64) -> f64 {
    (2.0 / (gamma + 1.0)).powf((gamma + 1.0) / (2.0 * (gamma - 1.0)))
}

/// Throat area A* (m^2) that passes `mass_flow` (kg/s) at sonic conditions.
///
///   mdot = A* · Pc/√Tc · √(γ/R) · choke(γ)
pub fn throat_area(
    mass_flow: f64,
    t_chamber: f64,
    pc_pa: f64,
    gamma: f64,
    r_specific: f64,
) -> f64 {
    mass_flow * t_chamber.sqrt() / (pc_pa * (gamma / r_specific).sqrt() * choke_factor(gamma))
}

/// Momentum thrust plus pressure thrust against ambient `pa` (Pa).
///
/// The pressure term uses chamber pressure over the exit area, matching
/// the sizing model used for the altitude sweep.
pub fn thrust_at(mass_flow: f64, isp_s: f64, pc_pa: f64, pa: f64, exit_area: f64) -> f64 {
    mass_flow * isp_s * G0 + (pc_pa - pa) * exit_area
}

/// Mach number for a static-to-total pressure ratio, by bisection on
/// p/p0 = (1 + (γ−1)/2·M²)^(−γ/(γ−1)) over [1e-6, 50].
pub fn solve_mach(p_ratio: f64, gamma: f64) -> f64 {
    let f = |m: f64| (1.0 + 0.5 * (gamma - 1.0) * m * m).powf(-gamma / (gamma - 1.0));
    let (mut lo, mut hi) = (1e-6, 50.0);
    for _ in 0..50 {
        let mid = 0.5 * (lo + hi);
        if f(mid) > p_ratio {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
