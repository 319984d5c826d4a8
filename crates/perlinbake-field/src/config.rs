//! TOML bake configuration.
//!
//! ```toml
//! [texture]
//! width = 512
//! height = 512
//!
//! [noise]
//! frequency = 5.0
//! offset = [0.0, 0.0]
//! seed = 1337
//!
//! [fractal]
//! octaves = 6
//! persistence = 0.5
//! lacunarity = 2.0
//!
//! [fill]
//! chunk_len = 64
//! workers = 0
//!
//! [output]
//! path = "noise.png"
//! format = "gray"
//! ```
//!
//! Every key is optional; missing keys take the engine defaults.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::field::FillOptions;
use crate::primitive::DEFAULT_SEED;
use crate::settings::{DEFAULT_MAX_RESOLUTION, NoiseSettings};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BakeConfig {
    #[serde(default)]
    pub texture: Texture,
    #[serde(default)]
    pub noise: Noise,
    #[serde(default)]
    pub fractal: Fractal,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default)]
    pub output: Output,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Texture {
    #[serde(default = "default_resolution")]
    pub width: i32,
    #[serde(default = "default_resolution")]
    pub height: i32,
}
fn default_resolution() -> i32 {
    256
}
impl Default for Texture {
    fn default() -> Self {
        Self {
            width: default_resolution(),
            height: default_resolution(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Noise {
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default)]
    pub offset: [f32; 2],
    #[serde(default = "default_seed")]
    pub seed: i32,
}
fn default_frequency() -> f32 {
    5.0
}
fn default_seed() -> i32 {
    DEFAULT_SEED
}
impl Default for Noise {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            offset: [0.0, 0.0],
            seed: default_seed(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fractal {
    #[serde(default = "default_octaves")]
    pub octaves: i32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
}
fn default_octaves() -> i32 {
    1
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
impl Default for Fractal {
    fn default() -> Self {
        Self {
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fill {
    #[serde(default = "default_chunk_len")]
    pub chunk_len: usize,
    /// 0 selects rayon's global pool.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_max_resolution")]
    pub max_resolution: i32,
}
fn default_chunk_len() -> usize {
    64
}
fn default_max_resolution() -> i32 {
    DEFAULT_MAX_RESOLUTION
}
impl Default for Fill {
    fn default() -> Self {
        Self {
            chunk_len: default_chunk_len(),
            workers: 0,
            max_resolution: default_max_resolution(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelFormat {
    /// One byte per sample.
    #[default]
    Gray,
    /// Four bytes per sample, gray replicated into RGB, opaque alpha.
    Rgba,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Output {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub format: ChannelFormat,
}
fn default_output_path() -> PathBuf {
    PathBuf::from("perlin_noise.png")
}
impl Default for Output {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: ChannelFormat::default(),
        }
    }
}

impl BakeConfig {
    pub fn settings(&self) -> NoiseSettings {
        NoiseSettings {
            resolution: (self.texture.width, self.texture.height),
            offset: (self.noise.offset[0], self.noise.offset[1]),
            frequency: self.noise.frequency,
            octaves: self.fractal.octaves,
            persistence: self.fractal.persistence,
            lacunarity: self.fractal.lacunarity,
        }
    }

    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            chunk_len: self.fill.chunk_len,
            max_resolution: self.fill.max_resolution,
            workers: (self.fill.workers > 0).then_some(self.fill.workers),
        }
    }
}

pub fn parse_config(s: &str) -> Result<BakeConfig, toml::de::Error> {
    toml::from_str(s)
}

pub fn load_config_from_path(path: &Path) -> Result<BakeConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg = parse_config(&s)?;
    Ok(cfg)
}
