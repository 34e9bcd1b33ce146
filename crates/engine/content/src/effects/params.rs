//! Typed effect parameters, validated at construction.

use engine_core::ConfigError;

/// Level-scaled armor bonus: `base_bonus + level / per_levels`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorScalingParams {
    /// Flat bonus applied regardless of level. Valid range: 0..=20.
    base_bonus: i32,
    /// Levels per extra point of armor. Valid range: 1..=10.
    per_levels: u8,
}

impl ArmorScalingParams {
    pub fn new(base_bonus: i32, per_levels: u8) -> Result<Self, ConfigError> {
        if !(0..=20).contains(&base_bonus) {
            return Err(ConfigError::invalid_field(
                "base_bonus",
                format!("must be within 0..=20, got {base_bonus}"),
            ));
        }
        if !(1..=10).contains(&per_levels) {
            return Err(ConfigError::invalid_field(
                "per_levels",
                format!("must be within 1..=10, got {per_levels}"),
            ));
        }
        Ok(Self {
            base_bonus,
            per_levels,
        })
    }

    pub fn bonus_for_level(&self, level: u8) -> i32 {
        self.base_bonus + (level / self.per_levels) as i32
    }
}

/// Dice-rolled healing: `dice`d`sides` + `bonus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealingParams {
    /// Number of dice. Valid range: 1..=10.
    dice: u32,
    /// Faces per die. Valid range: 2..=20.
    sides: u32,
    /// Flat bonus. Valid range: 0..=50.
    bonus: i32,
    /// Whether drinking exposes the user to an opportunity attack.
    provokes: bool,
}

impl HealingParams {
    pub fn new(dice: u32, sides: u32, bonus: i32, provokes: bool) -> Result<Self, ConfigError> {
        if !(1..=10).contains(&dice) {
            return Err(ConfigError::invalid_field(
                "dice",
                format!("must be within 1..=10, got {dice}"),
            ));
        }
        if !(2..=20).contains(&sides) {
            return Err(ConfigError::invalid_field(
                "sides",
                format!("must be within 2..=20, got {sides}"),
            ));
        }
        if !(0..=50).contains(&bonus) {
            return Err(ConfigError::invalid_field(
                "bonus",
                format!("must be within 0..=50, got {bonus}"),
            ));
        }
        Ok(Self {
            dice,
            sides,
            bonus,
            provokes,
        })
    }

    pub fn dice(&self) -> u32 {
        self.dice
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn bonus(&self) -> i32 {
        self.bonus
    }

    pub fn provokes(&self) -> bool {
        self.provokes
    }
}

/// Bonus damage applied on a confirmed hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VenomParams {
    /// Valid range: 1..=20.
    bonus_damage: i32,
}

impl VenomParams {
    pub fn new(bonus_damage: i32) -> Result<Self, ConfigError> {
        if !(1..=20).contains(&bonus_damage) {
            return Err(ConfigError::invalid_field(
                "bonus_damage",
                format!("must be within 1..=20, got {bonus_damage}"),
            ));
        }
        Ok(Self { bonus_damage })
    }

    pub fn bonus_damage(&self) -> i32 {
        self.bonus_damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_scaling_rejects_out_of_range_fields() {
        assert!(ArmorScalingParams::new(21, 2).is_err());
        assert!(ArmorScalingParams::new(2, 0).is_err());
        assert!(ArmorScalingParams::new(2, 3).is_ok());
    }

    #[test]
    fn armor_scaling_math() {
        let params = ArmorScalingParams::new(1, 3).unwrap();
        assert_eq!(params.bonus_for_level(0), 1);
        assert_eq!(params.bonus_for_level(2), 1);
        assert_eq!(params.bonus_for_level(9), 4);
    }

    #[test]
    fn healing_rejects_degenerate_dice() {
        assert!(HealingParams::new(0, 8, 0, false).is_err());
        assert!(HealingParams::new(2, 1, 0, false).is_err());
        assert!(HealingParams::new(2, 8, 51, false).is_err());
        assert!(HealingParams::new(2, 8, 2, true).is_ok());
    }

    #[test]
    fn venom_rejects_zero_damage() {
        assert!(VenomParams::new(0).is_err());
        assert!(VenomParams::new(4).is_ok());
    }
}
