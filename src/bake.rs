use std::error::Error;
use std::time::{Duration, Instant};

use perlinbake_field::{
    BakeConfig, ChannelFormat, FieldStats, GrayField, NoiseField, PerlinNoise, RgbaField,
};

use crate::export;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Bake and write the texture file.
    Create,
    /// Bake and report only.
    Preview,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Baked {
    Gray(GrayField),
    Rgba(RgbaField),
}

impl Baked {
    pub fn stats(&self) -> FieldStats {
        match self {
            Baked::Gray(g) => g.stats(),
            Baked::Rgba(c) => c.stats(),
        }
    }
}

#[derive(Debug)]
pub struct BakeReport {
    pub baked: Baked,
    pub elapsed: Duration,
}

pub fn bake(cfg: &BakeConfig) -> Result<BakeReport, Box<dyn Error>> {
    let settings = cfg.settings();
    let field = NoiseField::with_options(PerlinNoise::with_seed(cfg.noise.seed), cfg.fill_options())?;
    let t0 = Instant::now();
    let baked = match cfg.output.format {
        ChannelFormat::Gray => Baked::Gray(field.fill_gray(&settings)?),
        ChannelFormat::Rgba => Baked::Rgba(field.fill_rgba(&settings)?),
    };
    Ok(BakeReport {
        baked,
        elapsed: t0.elapsed(),
    })
}

pub fn run(cfg: &BakeConfig, action: Action) -> Result<BakeReport, Box<dyn Error>> {
    let report = bake(cfg)?;
    let ms = report.elapsed.as_millis();
    match action {
        Action::Preview => {
            let s = report.baked.stats();
            log::info!("Noise texture preview was created. Took: {} milliseconds", ms);
            log::info!(
                "{}x{} octaves={} min={} max={} mean={:.2}",
                cfg.texture.width,
                cfg.texture.height,
                cfg.fractal.octaves,
                s.min,
                s.max,
                s.mean
            );
        }
        Action::Create => {
            export::write_png(&report.baked, &cfg.output.path)?;
            log::info!(
                "Noise texture created at {}. Took: {} milliseconds",
                cfg.output.path.display(),
                ms
            );
        }
    }
    Ok(report)
}
