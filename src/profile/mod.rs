//! Speed-profile seam of the expansion stage.
//!
//! The expansion engine never evaluates tags itself; it asks a `Profile`
//! for turn penalties and the fixed per-event penalties. Only the built-in
//! car profile ships today, its cost model follows the usual sigmoid
//! mapping from turn angle to delay with a right-turn bias.

use crate::error::{Error, Result};

/// Fixed penalties applied per event during expansion, in deciseconds.
#[derive(Debug, Clone, Copy)]
pub struct ProfileProperties {
    pub traffic_signal_penalty: i32,
    pub u_turn_penalty: i32,
}

pub trait Profile: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn properties(&self) -> ProfileProperties;

    /// Penalty for turning by `angle` degrees (positive right, negative
    /// left), in deciseconds.
    fn turn_penalty(&self, angle: f64) -> i32;
}

/// Looks up a built-in profile by name.
pub fn by_name(name: &str) -> Result<Box<dyn Profile>> {
    match name.to_ascii_lowercase().as_str() {
        "car" => Ok(Box::new(CarProfile::default())),
        other => Err(Error::ProfileError(format!("unknown profile '{other}'"))),
    }
}

#[derive(Debug)]
pub struct CarProfile {
    /// Maximum angle-dependent penalty in deciseconds.
    turn_penalty: f64,
    /// Right-turn preference for right-hand traffic.
    turn_bias: f64,
    properties: ProfileProperties,
}

impl Default for CarProfile {
    fn default() -> Self {
        Self {
            turn_penalty: 75.0,
            turn_bias: 1.075,
            properties: ProfileProperties {
                traffic_signal_penalty: 20,
                u_turn_penalty: 200,
            },
        }
    }
}

impl Profile for CarProfile {
    fn name(&self) -> &str {
        "car"
    }

    fn properties(&self) -> ProfileProperties {
        self.properties
    }

    fn turn_penalty(&self, angle: f64) -> i32 {
        // sigmoid over the turn angle: near zero when going straight,
        // saturating towards the maximum for sharp left turns
        let exponent = -((13.0 / self.turn_bias) * (-angle / 180.0) - 6.5 * self.turn_bias);
        let sigmoid = 1.0 / (1.0 + exponent.exp());
        (self.turn_penalty * sigmoid).round() as i32
    }
}
