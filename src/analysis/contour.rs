use super::system::{SystemAssumptions, SystemResult};

/// Characteristic lines requested from a contour generator.
pub const DEFAULT_CHARACTERISTICS: usize = 30;

/// Wall coordinates of a nozzle, throat at x = 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NozzleContour {
    pub upper: Vec<[f64; 2]>, // (x, r), m
    pub lower: Vec<[f64; 2]>, // (x, −r), m
}

/// Inputs for a divergent-section contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourRequest {
    pub area_ratio: f64,
    pub gamma: f64,
    pub characteristics: usize,
    pub throat_radius: f64, // m
}

impl ContourRequest {
    /// Request matching a sized system.
    pub fn from_system(system: &SystemResult, assumptions: &SystemAssumptions) -> Self {
        Self {
            area_ratio: system.expansion_ratio(),
            gamma: assumptions.gamma,
            characteristics: DEFAULT_CHARACTERISTICS,
            throat_radius: system.throat_radius(),
        }
    }

    pub fn exit_radius(&self) -> f64 {
        self.throat_radius * self.area_ratio.sqrt()
    }
}

/// Nozzle wall generator (e.g. a method-of-characteristics solver).
///
/// Implement this to plug a contour design method into the analysis.
pub trait ContourGenerator {
    fn contour(&self, request: &ContourRequest) -> NozzleContour;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Straight conical divergent section.
#[derive(Debug, Clone, Copy)]
pub struct ConicalContour {
    pub half_angle: f64, // rad
}

impl Default for ConicalContour {
    fn default() -> Self {
        Self { half_angle: 15f64.to_radians() }
    }
}

impl ContourGenerator for ConicalContour {
    fn contour(&self, req: &ContourRequest) -> NozzleContour {
        let r_t = req.throat_radius;
        let length = (req.exit_radius() - r_t) / self.half_angle.tan();
        let n = req.characteristics.max(1);

        let upper: Vec<[f64; 2]> = (0..=n)
            .map(|i| {
                let x = length * i as f64 / n as f64;
                [x, r_t + x * self.half_angle.tan()]
            })
            .collect();
        let lower = upper.iter().map(|&[x, r]| [x, -r]).collect();
        NozzleContour { upper, lower }
    }

    fn name(&self) -> &str {
        "conical"
    }
}
