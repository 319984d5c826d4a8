//! Deterministic 2D noise-field baking: coordinate mapping, fractal octave
//! accumulation, 8-bit quantization and a parallel row-major fill.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod field;
pub mod primitive;
pub mod sampling;
pub mod settings;

pub use config::{BakeConfig, ChannelFormat, load_config_from_path};
pub use error::FieldError;
pub use field::{FieldStats, FillOptions, GrayField, NoiseField, RgbaField};
pub use primitive::{NoisePrimitive, PerlinNoise};
pub use settings::{MAX_OCTAVES, NoiseSettings};
