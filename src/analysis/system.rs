use serde::Serialize;
use tracing::info;

use crate::error::{CeaError, Result};
use crate::physics::{ambient_pressure, nozzle};
use crate::types::{CaseRecord, CaseTable, BAR_TO_PA, G0, R_UNIVERSAL};

// ---------------------------------------------------------------------------
// Sizing assumptions
// ---------------------------------------------------------------------------

/// Fixed engineering assumptions used to size the nozzle and vehicle.
///
/// `initial_mass` only feeds the delta-v estimate and is independent of
/// `vehicle_mass`.
#[derive(Debug, Clone)]
pub struct SystemAssumptions {
    pub vehicle_mass: f64,      // kg, sets the hover thrust
    pub propellant_mass: f64,   // kg
    pub initial_mass: f64,      // kg, rocket-equation m0
    pub gamma: f64,             // ratio of specific heats
    pub molecular_weight: f64,  // kg/mol
    pub altitude_max: f64,      // m, top of the thrust sweep
    pub altitude_steps: usize,
}

impl Default for SystemAssumptions {
    fn default() -> Self {
        Self {
            vehicle_mass: 1000.0,
            propellant_mass: 100.0,
            initial_mass: 200.0,
            gamma: 1.2,
            molecular_weight: 0.022,
            altitude_max: 10_000.0,
            altitude_steps: 20,
        }
    }
}

impl SystemAssumptions {
    /// Specific gas constant of the exhaust, J/(kg·K).
    pub fn r_specific(&self) -> f64 {
        R_UNIVERSAL / self.molecular_weight
    }

    /// Hover thrust F = m·g0 (N).
    pub fn hover_thrust(&self) -> f64 {
        self.vehicle_mass * G0
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Nozzle and flight figures derived from the best-Isp case of a table.
#[derive(Debug, Clone, Serialize)]
pub struct SystemResult {
    #[serde(skip)]
    pub best_index: usize,
    pub best: CaseRecord,
    #[serde(rename = "At")]
    pub throat_area: f64,       // m^2
    #[serde(rename = "Ae")]
    pub exit_area: f64,         // m^2
    pub alts: Vec<f64>,         // m
    #[serde(rename = "Fs")]
    pub thrusts: Vec<f64>,      // N
    #[serde(skip)]
    pub effective_isp: Vec<f64>, // s
    #[serde(rename = "mdot")]
    pub mass_flow: f64,         // kg/s
    #[serde(rename = "dv")]
    pub delta_v: f64,           // m/s
    #[serde(rename = "tb")]
    pub burn_time: f64,         // s
    pub throat_mach: f64,
}

impl SystemResult {
    pub fn expansion_ratio(&self) -> f64 {
        self.exit_area / self.throat_area
    }

    /// Throat radius of a circular section with area At (m).
    pub fn throat_radius(&self) -> f64 {
        (self.throat_area / std::f64::consts::PI).sqrt()
    }

    pub fn headline(&self) -> String {
        format!(
            "Max Isp: {:.2} s at O/F = {:.2}, Pc = {} bar",
            self.best.isp_s, self.best.of, self.best.pc
        )
    }

    pub fn recommendation(&self) -> String {
        format!(
            "Use O/F = {:.2} at Pc = {} bar for max Isp.",
            self.best.of, self.best.pc
        )
    }

    /// (altitude, thrust) pairs of the sweep.
    pub fn sweep(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.alts.iter().copied().zip(self.thrusts.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// System computation
// ---------------------------------------------------------------------------

/// Size the system around the best-Isp case with the default assumptions.
pub fn compute_system(table: &CaseTable) -> Result<SystemResult> {
    compute_system_with(table, &SystemAssumptions::default())
}

/// Size the system around the best-Isp case.
///
/// Fails with `MissingData` on an empty table and with `Validation` when the
/// selected case has no resolved expansion ratio; the caller must set one
/// (`CaseTable::set_expansion_ratio`) and retry.
pub fn compute_system_with(table: &CaseTable, a: &SystemAssumptions) -> Result<SystemResult> {
    if table.is_empty() {
        return Err(CeaError::MissingData("case table is empty".into()));
    }
    let best_index = table
        .best_index()
        .ok_or_else(|| CeaError::MissingData("no case has a numeric Isp".into()))?;
    let best = &table.records()[best_index];

    let expansion_ratio = best.resolved_expansion_ratio().ok_or(CeaError::Validation {
        index: best_index,
        of: best.of,
        pc: best.pc,
    })?;

    let isp_s = best.isp_s;
    let pc_pa = best.pc * BAR_TO_PA;

    // Hover thrust and the mass flow that sustains it
    let mass_flow = a.hover_thrust() / (isp_s * G0);

    let throat_area =
        nozzle::throat_area(mass_flow, best.t_chamber, pc_pa, a.gamma, a.r_specific());
    let exit_area = throat_area * expansion_ratio;

    let alts = linspace(0.0, a.altitude_max, a.altitude_steps);
    let thrusts: Vec<f64> = alts
        .iter()
        .map(|&h| nozzle::thrust_at(mass_flow, isp_s, pc_pa, ambient_pressure(h), exit_area))
        .collect();
    let effective_isp = thrusts.iter().map(|f| f / (mass_flow * G0)).collect();

    let burn_time = a.propellant_mass / mass_flow;
    let delta_v = isp_s * G0 * (a.initial_mass / (a.initial_mass - a.propellant_mass)).ln();

    info!(
        index = best_index,
        of = best.of,
        pc = best.pc,
        isp_s,
        "selected best case"
    );

    Ok(SystemResult {
        best_index,
        best: best.clone(),
        throat_area,
        exit_area,
        alts,
        thrusts,
        effective_isp,
        mass_flow,
        delta_v,
        burn_time,
        throat_mach: nozzle::solve_mach(best.pressure_ratio, a.gamma),
    })
}

/// `compute_system`, resolving a missing expansion ratio on the selected case
/// with `expansion_ratio` and retrying once. Without a fallback the
/// `Validation` error is returned unchanged.
pub fn compute_system_resolving(
    table: &mut CaseTable,
    expansion_ratio: Option<f64>,
) -> Result<SystemResult> {
    match (compute_system(table), expansion_ratio) {
        (Err(CeaError::Validation { index, .. }), Some(ar)) => {
            info!(index, expansion_ratio = ar, "resolving missing expansion ratio");
            table.set_expansion_ratio(index, ar);
            compute_system(table)
        }
        (result, _) => result,
    }
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut v: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            v[n - 1] = end;
            v
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
