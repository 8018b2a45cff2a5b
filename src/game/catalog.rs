//! Vehicle catalog - static per-vehicle tuning data, loaded and validated once

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::vehicle::DamageState;

/// Turn-rate response to normalized speed (0 = parked, 1 = top speed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TurnCurve {
    /// Same multiplier at every speed
    Constant { multiplier: f32 },
    /// Linear blend from `low_speed` when crawling to `high_speed` at the cap
    Falloff { low_speed: f32, high_speed: f32 },
}

impl TurnCurve {
    pub fn multiplier(&self, normalized_speed: f32) -> f32 {
        let s = normalized_speed.clamp(0.0, 1.0);
        match *self {
            TurnCurve::Constant { multiplier } => multiplier,
            TurnCurve::Falloff {
                low_speed,
                high_speed,
            } => high_speed + (1.0 - s) * (low_speed - high_speed),
        }
    }
}

/// Weapon families in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    DualCannons,
    HeavyMortar,
    RocketLauncher,
    Flamethrower,
}

impl WeaponKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            WeaponKind::DualCannons => "Dual Cannons",
            WeaponKind::HeavyMortar => "Heavy Mortar",
            WeaponKind::RocketLauncher => "Rocket Launcher",
            WeaponKind::Flamethrower => "Flamethrower",
        }
    }
}

/// How a projectile moves once spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Discrete shell on a three-phase arc, culled at ground contact
    Ballistic,
    /// Sustained emission that only expires by lifetime
    Beam,
}

/// How the fire input is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    /// One volley per press
    SingleShot,
    /// Fires whenever held and off cooldown
    Sustained,
}

/// Phase timings for the ballistic arc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcProfile {
    /// Full launch lift until this many ms after spawn
    pub ascent_ms: u64,
    /// Near-flat hold until this many ms after spawn
    pub apex_end_ms: u64,
    /// Fraction of launch lift applied during the apex hold
    pub apex_lift_factor: f32,
    /// Multiple of gravity accumulated during descent, which starts from rest
    pub descent_gravity_factor: f32,
}

impl Default for ArcProfile {
    fn default() -> Self {
        Self {
            ascent_ms: 500,
            apex_end_ms: 2000,
            apex_lift_factor: 0.1,
            descent_gravity_factor: 2.0,
        }
    }
}

/// Muzzle position in vehicle-local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// Positive to the vehicle's right
    pub lateral: f32,
    pub height: f32,
    /// Positive toward the nose
    pub forward: f32,
}

impl Emitter {
    pub const fn new(lateral: f32, height: f32, forward: f32) -> Self {
        Self {
            lateral,
            height,
            forward,
        }
    }
}

/// Weapon descriptor attached to a vehicle type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub projectile: ProjectileKind,
    pub fire_mode: FireMode,
    /// Damage per projectile
    pub damage: u32,
    pub cooldown_ms: u64,
    /// Units per second
    pub projectile_speed: f32,
    /// Nominal engagement range (informational, shown in vehicle selection)
    pub range: f32,
    pub lifetime_ms: u64,
    #[serde(default)]
    pub splash_radius: Option<f32>,
    /// Upward launch velocity for ballistic shells
    #[serde(default)]
    pub launch_lift: f32,
    #[serde(default)]
    pub arc: ArcProfile,
    pub emitters: Vec<Emitter>,
}

impl WeaponSpec {
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }
}

/// Closed integer health range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBand {
    pub min: u32,
    pub max: u32,
}

impl HealthBand {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, health: u32) -> bool {
        self.min <= health && health <= self.max
    }
}

/// The four damage-state bands, pristine highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBands {
    pub pristine: HealthBand,
    pub scratched: HealthBand,
    pub wrecked: HealthBand,
    pub critical: HealthBand,
}

impl DamageBands {
    pub fn band(&self, state: DamageState) -> HealthBand {
        match state {
            DamageState::Pristine => self.pristine,
            DamageState::Scratched => self.scratched,
            DamageState::Wrecked => self.wrecked,
            DamageState::Critical => self.critical,
        }
    }

    /// Band containing `health`. Bands are validated contiguous from zero at load,
    /// so anything not in a higher band is critical.
    pub fn classify(&self, health: u32) -> DamageState {
        [
            DamageState::Pristine,
            DamageState::Scratched,
            DamageState::Wrecked,
        ]
        .into_iter()
        .find(|state| self.band(*state).contains(health))
        .unwrap_or(DamageState::Critical)
    }

    fn validate(&self, max_health: u32) -> Result<(), String> {
        let ordered = [
            ("critical", self.critical),
            ("wrecked", self.wrecked),
            ("scratched", self.scratched),
            ("pristine", self.pristine),
        ];

        for (name, band) in ordered {
            if band.min > band.max {
                return Err(format!("{} band has min {} above max {}", name, band.min, band.max));
            }
        }
        if self.critical.min != 0 {
            return Err(format!("critical band must start at 0, starts at {}", self.critical.min));
        }
        for pair in ordered.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower.max.checked_add(1) != Some(upper.min) {
                return Err(format!(
                    "{} band ends at {} but {} band starts at {}",
                    lower_name, lower.max, upper_name, upper.min
                ));
            }
        }
        if self.pristine.max != max_health {
            return Err(format!(
                "pristine band ends at {} but max health is {}",
                self.pristine.max, max_health
            ));
        }
        Ok(())
    }
}

/// Immutable tuning record for one vehicle type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: String,
    pub name: String,
    pub category: String,
    pub max_health: u32,
    /// Units per nominal frame
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Radians per nominal frame at full steer
    pub turn_rate: f32,
    pub reverse_speed_factor: f32,
    pub rolling_resistance: f32,
    pub body_roll_factor: f32,
    pub suspension_stiffness: f32,
    pub boost_multiplier: f32,
    pub boost_acceleration_multiplier: f32,
    pub boost_turn_factor: f32,
    /// Grip the rear settles at while the handbrake is held
    pub drift_factor: f32,
    /// Grip regained per nominal frame after the handbrake is released
    pub drift_recovery: f32,
    pub hitbox_radius: f32,
    pub turn_curve: TurnCurve,
    pub weapon: WeaponSpec,
    pub damage_bands: DamageBands,
}

impl VehicleType {
    /// Reject tuning that would make the kinematic model misbehave silently
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidTuning {
            vehicle: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if self.max_health == 0 {
            return Err(invalid("max_health must be positive".to_string()));
        }

        let positive = [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("turn_rate", self.turn_rate),
            ("hitbox_radius", self.hitbox_radius),
            ("boost_multiplier", self.boost_multiplier),
            ("boost_acceleration_multiplier", self.boost_acceleration_multiplier),
            ("projectile_speed", self.weapon.projectile_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", field, value)));
            }
        }

        let unit_interval = [
            ("reverse_speed_factor", self.reverse_speed_factor),
            ("rolling_resistance", self.rolling_resistance),
            ("body_roll_factor", self.body_roll_factor),
            ("suspension_stiffness", self.suspension_stiffness),
            ("boost_turn_factor", self.boost_turn_factor),
            ("drift_factor", self.drift_factor),
            ("drift_recovery", self.drift_recovery),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} must be within [0, 1], got {}", field, value)));
            }
        }

        if self.weapon.emitters.is_empty() {
            return Err(invalid("weapon needs at least one emitter".to_string()));
        }
        if self.weapon.lifetime_ms == 0 {
            return Err(invalid("projectile lifetime must be positive".to_string()));
        }
        if self.weapon.arc.apex_end_ms < self.weapon.arc.ascent_ms {
            return Err(invalid("arc apex must end after ascent".to_string()));
        }
        if let Some(radius) = self.weapon.splash_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(invalid(format!("splash_radius must be positive, got {}", radius)));
            }
        }

        self.damage_bands
            .validate(self.max_health)
            .map_err(|reason| CatalogError::InvalidBands {
                vehicle: self.id.clone(),
                reason,
            })
    }
}

/// Catalog file layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    vehicles: Vec<VehicleType>,
}

/// All vehicle types available to a session, keyed by id
#[derive(Debug, Clone)]
pub struct VehicleCatalog {
    vehicles: Vec<Arc<VehicleType>>,
    index: HashMap<String, usize>,
}

impl VehicleCatalog {
    /// Build a catalog, validating every record
    pub fn new(vehicles: Vec<VehicleType>) -> Result<Self, CatalogError> {
        if vehicles.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(vehicles.len());
        let mut stored = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            vehicle.validate()?;
            if index.insert(vehicle.id.clone(), stored.len()).is_some() {
                return Err(CatalogError::DuplicateVehicle(vehicle.id));
            }
            stored.push(Arc::new(vehicle));
        }

        Ok(Self {
            vehicles: stored,
            index,
        })
    }

    /// The shipped roster
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin_roster())
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.vehicles)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up a vehicle type; unknown ids are an error, never a default
    pub fn get(&self, id: &str) -> Result<Arc<VehicleType>, CatalogError> {
        self.index
            .get(id)
            .map(|&i| self.vehicles[i].clone())
            .ok_or_else(|| CatalogError::UnknownVehicle(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<VehicleType>> {
        self.vehicles.iter()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown vehicle type: {0}")]
    UnknownVehicle(String),

    #[error("Invalid tuning for {vehicle}: {reason}")]
    InvalidTuning { vehicle: String, reason: String },

    #[error("Invalid damage bands for {vehicle}: {reason}")]
    InvalidBands { vehicle: String, reason: String },

    #[error("Duplicate vehicle id: {0}")]
    DuplicateVehicle(String),

    #[error("Vehicle catalog is empty")]
    Empty,

    #[error("Failed to parse vehicle catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read vehicle catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Razorback, Ironclad, Scorpion and Junkyard King
pub fn builtin_roster() -> Vec<VehicleType> {
    vec![
        VehicleType {
            id: "razorback".to_string(),
            name: "Razorback".to_string(),
            category: "Muscle Car".to_string(),
            max_health: 80,
            max_speed: 0.8,
            acceleration: 0.02,
            deceleration: 0.015,
            turn_rate: 0.04,
            reverse_speed_factor: 0.6,
            rolling_resistance: 0.01,
            body_roll_factor: 0.2,
            suspension_stiffness: 0.15,
            boost_multiplier: 2.0,
            boost_acceleration_multiplier: 1.75,
            boost_turn_factor: 0.7,
            drift_factor: 0.7,
            drift_recovery: 0.015,
            hitbox_radius: 2.5,
            // Holds its line at speed
            turn_curve: TurnCurve::Falloff {
                low_speed: 1.0,
                high_speed: 0.7,
            },
            weapon: WeaponSpec {
                kind: WeaponKind::DualCannons,
                projectile: ProjectileKind::Ballistic,
                fire_mode: FireMode::SingleShot,
                damage: 20,
                cooldown_ms: 5000,
                projectile_speed: 200.0,
                range: 25.0,
                lifetime_ms: 3000,
                splash_radius: None,
                launch_lift: 5.0,
                arc: ArcProfile::default(),
                emitters: vec![Emitter::new(0.75, 1.1, 2.5), Emitter::new(-0.75, 1.1, 2.5)],
            },
            damage_bands: DamageBands {
                pristine: HealthBand::new(61, 80),
                scratched: HealthBand::new(41, 60),
                wrecked: HealthBand::new(21, 40),
                critical: HealthBand::new(0, 20),
            },
        },
        VehicleType {
            id: "ironclad".to_string(),
            name: "Ironclad".to_string(),
            category: "Armored Truck".to_string(),
            max_health: 150,
            max_speed: 0.4,
            acceleration: 0.01,
            deceleration: 0.008,
            turn_rate: 0.02,
            reverse_speed_factor: 0.6,
            rolling_resistance: 0.02,
            body_roll_factor: 0.1,
            suspension_stiffness: 0.2,
            boost_multiplier: 1.75,
            boost_acceleration_multiplier: 1.5,
            boost_turn_factor: 0.7,
            drift_factor: 0.85,
            drift_recovery: 0.02,
            hitbox_radius: 3.5,
            turn_curve: TurnCurve::Constant { multiplier: 0.8 },
            weapon: WeaponSpec {
                kind: WeaponKind::HeavyMortar,
                projectile: ProjectileKind::Ballistic,
                fire_mode: FireMode::SingleShot,
                damage: 40,
                cooldown_ms: 8000,
                projectile_speed: 160.0,
                range: 40.0,
                lifetime_ms: 3000,
                splash_radius: Some(5.0),
                launch_lift: 5.0,
                arc: ArcProfile::default(),
                emitters: vec![Emitter::new(0.0, 2.75, 1.0)],
            },
            damage_bands: DamageBands {
                pristine: HealthBand::new(113, 150),
                scratched: HealthBand::new(76, 112),
                wrecked: HealthBand::new(38, 75),
                critical: HealthBand::new(0, 37),
            },
        },
        VehicleType {
            id: "scorpion".to_string(),
            name: "Scorpion".to_string(),
            category: "Sports Bike".to_string(),
            max_health: 50,
            max_speed: 1.0,
            acceleration: 0.025,
            deceleration: 0.02,
            turn_rate: 0.05,
            reverse_speed_factor: 0.6,
            rolling_resistance: 0.01,
            body_roll_factor: 0.25,
            suspension_stiffness: 0.08,
            boost_multiplier: 1.75,
            boost_acceleration_multiplier: 1.5,
            boost_turn_factor: 0.7,
            drift_factor: 0.85,
            drift_recovery: 0.02,
            hitbox_radius: 1.5,
            // Twitchy when slow, planted when fast
            turn_curve: TurnCurve::Falloff {
                low_speed: 1.0,
                high_speed: 0.4,
            },
            weapon: WeaponSpec {
                kind: WeaponKind::RocketLauncher,
                projectile: ProjectileKind::Ballistic,
                fire_mode: FireMode::SingleShot,
                damage: 30,
                cooldown_ms: 3000,
                projectile_speed: 280.0,
                range: 30.0,
                lifetime_ms: 3000,
                splash_radius: None,
                launch_lift: 5.0,
                arc: ArcProfile::default(),
                emitters: vec![Emitter::new(0.0, 2.0, 0.0)],
            },
            damage_bands: DamageBands {
                pristine: HealthBand::new(38, 50),
                scratched: HealthBand::new(26, 37),
                wrecked: HealthBand::new(13, 25),
                critical: HealthBand::new(0, 12),
            },
        },
        VehicleType {
            id: "junkyard_king".to_string(),
            name: "Junkyard King".to_string(),
            category: "Modified Van".to_string(),
            max_health: 100,
            max_speed: 0.6,
            acceleration: 0.012,
            deceleration: 0.015,
            turn_rate: 0.025,
            reverse_speed_factor: 0.6,
            rolling_resistance: 0.01,
            body_roll_factor: 0.18,
            suspension_stiffness: 0.12,
            boost_multiplier: 1.75,
            boost_acceleration_multiplier: 1.5,
            boost_turn_factor: 0.7,
            drift_factor: 0.85,
            drift_recovery: 0.02,
            hitbox_radius: 3.0,
            turn_curve: TurnCurve::Falloff {
                low_speed: 1.0,
                high_speed: 0.6,
            },
            weapon: WeaponSpec {
                kind: WeaponKind::Flamethrower,
                projectile: ProjectileKind::Beam,
                fire_mode: FireMode::Sustained,
                damage: 10,
                cooldown_ms: 1000,
                projectile_speed: 480.0,
                range: 7.5,
                lifetime_ms: 1500,
                splash_radius: None,
                launch_lift: 0.0,
                arc: ArcProfile::default(),
                // Large centre nozzle plus a smaller one offset right
                emitters: vec![Emitter::new(0.0, 1.8, 3.2), Emitter::new(1.0, 1.5, 3.0)],
            },
            damage_bands: DamageBands {
                pristine: HealthBand::new(76, 100),
                scratched: HealthBand::new(51, 75),
                wrecked: HealthBand::new(26, 50),
                critical: HealthBand::new(0, 25),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn razorback() -> VehicleType {
        builtin_roster().remove(0)
    }

    #[test]
    fn builtin_roster_validates() {
        let catalog = VehicleCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 4);
        for id in ["razorback", "ironclad", "scorpion", "junkyard_king"] {
            assert!(catalog.get(id).is_ok(), "missing {}", id);
        }
    }

    #[test]
    fn every_health_value_maps_to_exactly_one_band() {
        let catalog = VehicleCatalog::builtin().unwrap();
        for vehicle in catalog.iter() {
            let bands = vehicle.damage_bands;
            for health in 0..=vehicle.max_health {
                let containing = [
                    bands.pristine,
                    bands.scratched,
                    bands.wrecked,
                    bands.critical,
                ]
                .iter()
                .filter(|band| band.contains(health))
                .count();
                assert_eq!(containing, 1, "{} health {}", vehicle.id, health);
                assert!(bands.band(bands.classify(health)).contains(health));
            }
        }
    }

    #[test]
    fn unknown_vehicle_fails_fast() {
        let catalog = VehicleCatalog::builtin().unwrap();
        let err = catalog.get("monster_truck").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownVehicle(id) if id == "monster_truck"));
    }

    #[test]
    fn gap_between_bands_is_rejected() {
        let mut vehicle = razorback();
        vehicle.damage_bands.scratched = HealthBand::new(42, 60);
        let err = VehicleCatalog::new(vec![vehicle]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBands { .. }));
    }

    #[test]
    fn band_ending_at_u32_max_is_rejected_not_panicking() {
        let mut vehicle = razorback();
        vehicle.damage_bands.critical = HealthBand::new(0, u32::MAX);
        let json = serde_json::json!({ "vehicles": [vehicle] }).to_string();
        let err = VehicleCatalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBands { .. }));
    }

    #[test]
    fn overlapping_bands_are_rejected() {
        let mut vehicle = razorback();
        vehicle.damage_bands.wrecked = HealthBand::new(21, 41);
        assert!(matches!(
            VehicleCatalog::new(vec![vehicle]),
            Err(CatalogError::InvalidBands { .. })
        ));
    }

    #[test]
    fn pristine_must_reach_max_health() {
        let mut vehicle = razorback();
        vehicle.max_health = 90;
        assert!(matches!(
            VehicleCatalog::new(vec![vehicle]),
            Err(CatalogError::InvalidBands { .. })
        ));
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let mut vehicle = razorback();
        vehicle.max_speed = 0.0;
        assert!(matches!(
            VehicleCatalog::new(vec![vehicle]),
            Err(CatalogError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn weapon_without_emitters_is_rejected() {
        let mut vehicle = razorback();
        vehicle.weapon.emitters.clear();
        assert!(matches!(
            VehicleCatalog::new(vec![vehicle]),
            Err(CatalogError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = VehicleCatalog::new(vec![razorback(), razorback()]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateVehicle(id) if id == "razorback"));
    }

    #[test]
    fn catalog_loads_from_json() {
        let json = serde_json::json!({ "vehicles": [razorback()] }).to_string();
        let catalog = VehicleCatalog::from_json(&json).unwrap();
        let vehicle = catalog.get("razorback").unwrap();
        assert_eq!(vehicle.weapon.emitter_count(), 2);
        assert_eq!(vehicle.turn_curve, razorback().turn_curve);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            VehicleCatalog::from_json("{ \"vehicles\": 3 }"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn turn_curves_differ_between_vehicles() {
        let catalog = VehicleCatalog::builtin().unwrap();
        let scorpion = catalog.get("scorpion").unwrap();
        let ironclad = catalog.get("ironclad").unwrap();

        assert!((scorpion.turn_curve.multiplier(0.0) - 1.0).abs() < 1e-6);
        assert!((scorpion.turn_curve.multiplier(1.0) - 0.4).abs() < 1e-6);
        assert_eq!(ironclad.turn_curve.multiplier(0.0), ironclad.turn_curve.multiplier(1.0));
    }
}
