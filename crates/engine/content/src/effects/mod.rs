//! Concrete effect implementations dispatched by the engine.

mod combat;
mod item;
mod params;

pub use combat::{ArmorOfFaith, DeflectProjectiles, OffhandStrike, VenomFang, VigilantGuard};
pub use item::{HealingDraught, SealedCoffer};
pub use params::{ArmorScalingParams, HealingParams, VenomParams};
