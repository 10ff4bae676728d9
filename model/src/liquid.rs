//! Tuning of the animated hero background.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Colors used when a hero enables the animated background without choosing any.
pub const DEFAULT_LIQUID_COLORS: [&str; 3] = ["#e70d0d", "#850000", "#ea6d57"];

/// Per-hero overrides for the animated background simulation.
///
/// Every key is optional; unset keys take the built-in value when resolved.
/// Keys keep the camel-case wire names the front-end component expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidSettings {
    /// Force applied by pointer movement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse_force: Option<f64>,
    /// Pointer influence radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_size: Option<f64>,
    /// Simulation grid resolution as a fraction of the viewport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,
    /// Simulation time step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    /// Back-and-forth error compensation on advection.
    #[serde(rename = "BFECC", default, skip_serializing_if = "Option::is_none")]
    pub bfecc: Option<bool>,
    /// Enables viscosity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_viscous: Option<bool>,
    /// Viscosity coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscous: Option<f64>,
    /// Solver iterations for viscosity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations_viscous: Option<f64>,
    /// Solver iterations for pressure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations_poisson: Option<f64>,
    /// Bounce at the edges instead of wrapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bounce: Option<bool>,
    /// Animate without pointer input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_demo: Option<bool>,
    /// Speed of the automatic animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_speed: Option<f64>,
    /// Strength of the automatic animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_intensity: Option<f64>,
    /// Seconds to hand control from the animation to the pointer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takeover_duration: Option<f64>,
    /// Milliseconds of pointer inactivity before the animation resumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resume_delay: Option<f64>,
    /// Seconds over which the resumed animation ramps up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_ramp_duration: Option<f64>,
}

/// Fully resolved tuning, every key set. Field meanings match [`LiquidSettings`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ResolvedLiquid {
    pub mouse_force: f64,
    pub cursor_size: f64,
    pub resolution: f64,
    pub dt: f64,
    #[serde(rename = "BFECC")]
    pub bfecc: bool,
    pub is_viscous: bool,
    pub viscous: f64,
    pub iterations_viscous: f64,
    pub iterations_poisson: f64,
    pub is_bounce: bool,
    pub auto_demo: bool,
    pub auto_speed: f64,
    pub auto_intensity: f64,
    pub takeover_duration: f64,
    pub auto_resume_delay: f64,
    pub auto_ramp_duration: f64,
}

impl Default for ResolvedLiquid {
    fn default() -> Self {
        Self {
            mouse_force: 20.0,
            cursor_size: 100.0,
            resolution: 0.5,
            dt: 0.014,
            bfecc: true,
            is_viscous: false,
            viscous: 30.0,
            iterations_viscous: 32.0,
            iterations_poisson: 32.0,
            is_bounce: false,
            auto_demo: true,
            auto_speed: 0.5,
            auto_intensity: 2.2,
            takeover_duration: 0.25,
            auto_resume_delay: 1000.0,
            auto_ramp_duration: 0.6,
        }
    }
}

impl LiquidSettings {
    /// Reads the stored tuning object key by key. A key that is absent,
    /// `null` or of the wrong kind stays unset; numeric strings are accepted.
    #[must_use]
    pub fn from_record(r: &Record) -> Self {
        let number = |key: &str| r.number(key).filter(|n| n.is_finite());
        let flag = |key: &str| match r.get(key) {
            Some(value) if value.is_boolean() || value.is_number() => Some(r.flag(key)),
            _ => None,
        };
        Self {
            mouse_force: number("mouseForce"),
            cursor_size: number("cursorSize"),
            resolution: number("resolution"),
            dt: number("dt"),
            bfecc: flag("BFECC"),
            is_viscous: flag("isViscous"),
            viscous: number("viscous"),
            iterations_viscous: number("iterationsViscous"),
            iterations_poisson: number("iterationsPoisson"),
            is_bounce: flag("isBounce"),
            auto_demo: flag("autoDemo"),
            auto_speed: number("autoSpeed"),
            auto_intensity: number("autoIntensity"),
            takeover_duration: number("takeoverDuration"),
            auto_resume_delay: number("autoResumeDelay"),
            auto_ramp_duration: number("autoRampDuration"),
        }
    }

    /// Applies the built-in value to every unset key.
    #[must_use]
    pub fn resolved(&self) -> ResolvedLiquid {
        let d = ResolvedLiquid::default();
        ResolvedLiquid {
            mouse_force: self.mouse_force.unwrap_or(d.mouse_force),
            cursor_size: self.cursor_size.unwrap_or(d.cursor_size),
            resolution: self.resolution.unwrap_or(d.resolution),
            dt: self.dt.unwrap_or(d.dt),
            bfecc: self.bfecc.unwrap_or(d.bfecc),
            is_viscous: self.is_viscous.unwrap_or(d.is_viscous),
            viscous: self.viscous.unwrap_or(d.viscous),
            iterations_viscous: self.iterations_viscous.unwrap_or(d.iterations_viscous),
            iterations_poisson: self.iterations_poisson.unwrap_or(d.iterations_poisson),
            is_bounce: self.is_bounce.unwrap_or(d.is_bounce),
            auto_demo: self.auto_demo.unwrap_or(d.auto_demo),
            auto_speed: self.auto_speed.unwrap_or(d.auto_speed),
            auto_intensity: self.auto_intensity.unwrap_or(d.auto_intensity),
            takeover_duration: self.takeover_duration.unwrap_or(d.takeover_duration),
            auto_resume_delay: self.auto_resume_delay.unwrap_or(d.auto_resume_delay),
            auto_ramp_duration: self.auto_ramp_duration.unwrap_or(d.auto_ramp_duration),
        }
    }

    /// Returns true when no key is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == LiquidSettings::default()
    }
}
