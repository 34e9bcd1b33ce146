//! Animation catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use engine_core::{AnimationDescriptor, Vec2};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One animation entry as written in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub sprite_base: String,
    pub frame_count: u32,
    #[serde(default = "default_stride")]
    pub frame_stride: u32,
    pub frame_duration: f32,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub alpha_velocity: f32,
    #[serde(default)]
    pub velocity: (f32, f32),
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub looping: bool,
}

fn default_stride() -> u32 {
    1
}

fn default_alpha() -> f32 {
    1.0
}

impl AnimationSpec {
    fn into_descriptor(self) -> AnimationDescriptor {
        AnimationDescriptor {
            sprite_base: self.sprite_base,
            frame_count: self.frame_count,
            frame_stride: self.frame_stride,
            frame_duration: self.frame_duration,
            alpha: self.alpha,
            alpha_velocity: self.alpha_velocity,
            velocity: Vec2::new(self.velocity.0, self.velocity.1),
            duration: self.duration,
            looping: self.looping,
        }
    }
}

/// Named animation descriptors, validated at load.
#[derive(Debug, Clone, Default)]
pub struct AnimationCatalog {
    entries: BTreeMap<String, AnimationDescriptor>,
}

impl AnimationCatalog {
    pub fn get(&self, name: &str) -> Option<&AnimationDescriptor> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loader for animation catalogs from RON files.
pub struct AnimationLoader;

impl AnimationLoader {
    /// Load an animation catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<AnimationCatalog> {
        let content = read_file(path)?;
        Self::parse_str(&content)
    }

    /// Parse a catalog from RON text. Every descriptor is validated; one
    /// bad entry fails the whole load.
    pub fn parse_str(content: &str) -> LoadResult<AnimationCatalog> {
        let specs: BTreeMap<String, AnimationSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse animation catalog RON: {}", e))?;

        let mut entries = BTreeMap::new();
        for (name, spec) in specs {
            let descriptor = spec.into_descriptor();
            descriptor
                .validate()
                .map_err(|e| anyhow::anyhow!("animation '{}': {}", name, e))?;
            entries.insert(name, descriptor);
        }
        Ok(AnimationCatalog { entries })
    }
}
