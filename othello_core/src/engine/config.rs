use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named evaluation feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Coin,
    Mobility,
    Corners,
    Stability,
    Edges,
    DangerZones,
    Wedges,
}

impl Feature {
    pub const ALL: [Self; 7] = [
        Self::Coin,
        Self::Mobility,
        Self::Corners,
        Self::Stability,
        Self::Edges,
        Self::DangerZones,
        Self::Wedges,
    ];

    pub const BASE: [Self; 4] = [Self::Coin, Self::Mobility, Self::Corners, Self::Stability];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightCurve {
    /// Logistic, climbing towards `max_weight` as the board fills.
    Rising,
    /// Logistic, falling from `max_weight` towards zero.
    Falling,
    /// `max_weight + steepness * (placed - midpoint)`.
    Linear,
}

/// How much a feature counts at a given stage of the game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseWeight {
    pub max_weight: f64,
    pub midpoint: f64,
    pub steepness: f64,
    pub curve: WeightCurve,
    /// Used instead of the curve when dynamic weights are off.
    pub fixed_weight: f64,
}

impl PhaseWeight {
    pub const fn new(
        curve: WeightCurve,
        max_weight: f64,
        midpoint: f64,
        steepness: f64,
        fixed_weight: f64,
    ) -> Self {
        Self {
            max_weight,
            midpoint,
            steepness,
            curve,
            fixed_weight,
        }
    }

    pub const fn constant(weight: f64) -> Self {
        Self::new(WeightCurve::Linear, weight, 0.0, 0.0, weight)
    }

    /// Weight for a board with `placed_discs` discs on it.
    #[must_use]
    pub fn weight(&self, placed_discs: u32, dynamic: bool) -> f64 {
        if !dynamic {
            return self.fixed_weight;
        }
        let x = f64::from(placed_discs) - self.midpoint;
        match self.curve {
            WeightCurve::Rising => self.max_weight / (1.0 + (-self.steepness * x).exp()),
            WeightCurve::Falling => {
                self.max_weight - self.max_weight / (1.0 + (-self.steepness * x).exp())
            }
            WeightCurve::Linear => self.steepness.mul_add(x, self.max_weight),
        }
    }

    #[must_use]
    fn scaled(self, scale: Option<f64>) -> Self {
        scale.map_or(self, |s| Self {
            max_weight: self.max_weight * s,
            fixed_weight: self.fixed_weight * s,
            ..self
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub features: BTreeSet<Feature>,
    pub dynamic_weights: bool,
    pub coin: PhaseWeight,
    pub mobility: PhaseWeight,
    pub corners: PhaseWeight,
    pub stability: PhaseWeight,
    pub edges: PhaseWeight,
    pub danger_zones: PhaseWeight,
    pub wedges: PhaseWeight,

    // Search Parameters
    pub symmetry_disc_limit: u32, // Symmetric cache probes only up to this many discs
    pub default_depth: u8,
    pub time_check_interval: u32, // Nodes between clock reads
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            features: Feature::BASE.into_iter().collect(),
            dynamic_weights: true,
            coin: PhaseWeight::new(WeightCurve::Rising, 95.0, 45.0, 0.9, 25.0),
            mobility: PhaseWeight::new(WeightCurve::Falling, 50.0, 23.0, 0.3, 5.0),
            corners: PhaseWeight::new(WeightCurve::Falling, 100.0, 35.0, 0.5, 30.0),
            stability: PhaseWeight::new(WeightCurve::Falling, 50.0, 37.0, 0.15, 25.0),
            edges: PhaseWeight::new(WeightCurve::Linear, 2.0, 30.0, 0.004, 2.0),
            danger_zones: PhaseWeight::constant(10.0),
            wedges: PhaseWeight::constant(1.0),

            symmetry_disc_limit: 16,
            default_depth: 5,
            time_check_interval: 1024,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    features: Option<BTreeSet<Feature>>,
    dynamic_weights: Option<bool>,

    coin: Option<f64>,
    mobility: Option<f64>,
    corners: Option<f64>,
    stability: Option<f64>,
    edges: Option<f64>,
    danger_zones: Option<f64>,
    wedges: Option<f64>,

    symmetry_disc_limit: Option<u32>,
    default_depth: Option<u8>,
    time_check_interval: Option<u32>,
}

impl EngineConfig {
    /// Reads per-feature scale factors on top of the defaults.
    ///
    /// Feature keys multiply the default weight; the remaining keys replace
    /// the default outright. Missing keys keep their defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            features: json_config.features.unwrap_or(default.features),
            dynamic_weights: json_config
                .dynamic_weights
                .unwrap_or(default.dynamic_weights),
            coin: default.coin.scaled(json_config.coin),
            mobility: default.mobility.scaled(json_config.mobility),
            corners: default.corners.scaled(json_config.corners),
            stability: default.stability.scaled(json_config.stability),
            edges: default.edges.scaled(json_config.edges),
            danger_zones: default.danger_zones.scaled(json_config.danger_zones),
            wedges: default.wedges.scaled(json_config.wedges),

            symmetry_disc_limit: json_config
                .symmetry_disc_limit
                .unwrap_or(default.symmetry_disc_limit),
            default_depth: json_config.default_depth.unwrap_or(default.default_depth),
            time_check_interval: json_config
                .time_check_interval
                .unwrap_or(default.time_check_interval),
        })
    }

    /// Base features plus edges, danger zones and wedges.
    #[must_use]
    pub fn with_all_features() -> Self {
        Self {
            features: Feature::ALL.into_iter().collect(),
            ..Self::default()
        }
    }

    pub const fn weight_of(&self, feature: Feature) -> &PhaseWeight {
        match feature {
            Feature::Coin => &self.coin,
            Feature::Mobility => &self.mobility,
            Feature::Corners => &self.corners,
            Feature::Stability => &self.stability,
            Feature::Edges => &self.edges,
            Feature::DangerZones => &self.danger_zones,
            Feature::Wedges => &self.wedges,
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let json = "{}";
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.symmetry_disc_limit, 16);
        assert!(config.is_enabled(Feature::Coin));
        assert!(!config.is_enabled(Feature::Wedges));
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "coin": 2.0,
            "mobility": 0.5
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert!((config.coin.max_weight - 190.0).abs() < f64::EPSILON);
        assert!((config.coin.fixed_weight - 50.0).abs() < f64::EPSILON);
        assert!((config.mobility.max_weight - 25.0).abs() < f64::EPSILON);
        // Curve shape is untouched.
        assert!((config.coin.midpoint - 45.0).abs() < f64::EPSILON);
        assert_eq!(config.corners, EngineConfig::default().corners);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let json = "{ invalid json }";
        let result = EngineConfig::load_from_json(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_full() {
        let json = r#"{
            "features": ["coin", "edges", "danger_zones", "wedges"],
            "dynamic_weights": false,
            "coin": 1.1,
            "mobility": 1.2,
            "corners": 1.3,
            "stability": 1.4,
            "edges": 1.5,
            "danger_zones": 1.6,
            "wedges": 1.7,
            "symmetry_disc_limit": 12,
            "default_depth": 3,
            "time_check_interval": 256
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();

        assert_eq!(config.features.len(), 4);
        assert!(config.is_enabled(Feature::DangerZones));
        assert!(!config.is_enabled(Feature::Mobility));
        assert!(!config.dynamic_weights);
        assert!((config.wedges.max_weight - 1.7).abs() < 1e-12);
        assert_eq!(config.symmetry_disc_limit, 12);
        assert_eq!(config.default_depth, 3);
        assert_eq!(config.time_check_interval, 256);
    }

    #[test]
    fn test_unknown_feature_is_rejected() {
        let json = r#"{ "features": ["parity"] }"#;
        assert!(EngineConfig::load_from_json(json).is_err());
    }

    #[test]
    fn test_absolute_config_round_trip() {
        let config = EngineConfig::with_all_features();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let partial: EngineConfig = serde_json::from_str(r#"{ "default_depth": 7 }"#).unwrap();
        assert_eq!(partial.default_depth, 7);
        assert_eq!(partial.coin, config.coin);
    }

    #[test]
    fn test_weight_curves() {
        let config = EngineConfig::default();

        // Logistic curves sit at half weight on their midpoint.
        assert!((config.coin.weight(45, true) - 47.5).abs() < 1e-9);
        assert!((config.mobility.weight(23, true) - 25.0).abs() < 1e-9);

        // Coin matters more late, mobility and corners matter more early.
        assert!(config.coin.weight(60, true) > config.coin.weight(10, true));
        assert!(config.mobility.weight(10, true) > config.mobility.weight(60, true));
        assert!(config.corners.weight(10, true) > config.corners.weight(60, true));

        assert!((config.edges.weight(30, true) - 2.0).abs() < 1e-9);
        assert!((config.edges.weight(40, true) - 2.04).abs() < 1e-9);
        assert!((config.danger_zones.weight(50, true) - 10.0).abs() < 1e-9);

        assert!((config.coin.weight(60, false) - 25.0).abs() < f64::EPSILON);
    }
}
