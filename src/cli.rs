use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use perlinbake_field::{BakeConfig, ChannelFormat, load_config_from_path};

/// Bake Perlin / fractal noise into a PNG texture.
#[derive(Parser, Debug)]
#[command(name = "perlinbake", version)]
pub struct Cli {
    /// TOML bake configuration; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub width: Option<i32>,
    #[arg(long)]
    pub height: Option<i32>,
    #[arg(long)]
    pub frequency: Option<f32>,
    #[arg(long, allow_negative_numbers = true)]
    pub offset_x: Option<f32>,
    #[arg(long, allow_negative_numbers = true)]
    pub offset_y: Option<f32>,
    #[arg(long)]
    pub octaves: Option<i32>,
    #[arg(long)]
    pub persistence: Option<f32>,
    #[arg(long)]
    pub lacunarity: Option<f32>,
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Output PNG path (overwritten if it exists)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Dedicated fill threads; 0 uses the global pool
    #[arg(long)]
    pub workers: Option<usize>,
    #[arg(long)]
    pub chunk_len: Option<usize>,
    /// Bake and report statistics without writing a file
    #[arg(long)]
    pub preview: bool,
    /// Re-bake whenever the config file changes
    #[arg(long, requires = "config")]
    pub watch: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Gray,
    Rgba,
}

impl From<FormatArg> for ChannelFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Gray => ChannelFormat::Gray,
            FormatArg::Rgba => ChannelFormat::Rgba,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<BakeConfig, Box<dyn Error>> {
        let mut cfg = match &self.config {
            Some(path) => load_config_from_path(path)?,
            None => BakeConfig::default(),
        };
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    pub fn apply_overrides(&self, cfg: &mut BakeConfig) {
        if let Some(v) = self.width {
            cfg.texture.width = v;
        }
        if let Some(v) = self.height {
            cfg.texture.height = v;
        }
        if let Some(v) = self.frequency {
            cfg.noise.frequency = v;
        }
        if let Some(v) = self.offset_x {
            cfg.noise.offset[0] = v;
        }
        if let Some(v) = self.offset_y {
            cfg.noise.offset[1] = v;
        }
        if let Some(v) = self.seed {
            cfg.noise.seed = v;
        }
        if let Some(v) = self.octaves {
            cfg.fractal.octaves = v;
        }
        if let Some(v) = self.persistence {
            cfg.fractal.persistence = v;
        }
        if let Some(v) = self.lacunarity {
            cfg.fractal.lacunarity = v;
        }
        if let Some(v) = self.format {
            cfg.output.format = v.into();
        }
        if let Some(v) = &self.out {
            cfg.output.path = v.clone();
        }
        if let Some(v) = self.workers {
            cfg.fill.workers = v;
        }
        if let Some(v) = self.chunk_len {
            cfg.fill.chunk_len = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perlinbake_field::NoiseSettings;
    use std::io::Write;

    #[test]
    fn no_flags_gives_defaults() {
        let cli = Cli::try_parse_from(["perlinbake"]).unwrap();
        let cfg = cli.resolve_config().unwrap();
        assert_eq!(cfg.settings(), NoiseSettings::default());
        assert!(!cli.preview && !cli.watch);
    }

    #[test]
    fn flags_override_values() {
        let cli = Cli::try_parse_from([
            "perlinbake",
            "--width",
            "64",
            "--offset-x",
            "-2.5",
            "--octaves",
            "6",
            "--format",
            "rgba",
            "--out",
            "out/n.png",
            "--workers",
            "2",
        ])
        .unwrap();
        let cfg = cli.resolve_config().unwrap();
        let s = cfg.settings();
        assert_eq!(s.resolution, (64, 256));
        assert_eq!(s.offset, (-2.5, 0.0));
        assert_eq!(s.octaves, 6);
        assert_eq!(cfg.output.format, ChannelFormat::Rgba);
        assert_eq!(cfg.output.path, PathBuf::from("out/n.png"));
        assert_eq!(cfg.fill_options().workers, Some(2));
    }

    #[test]
    fn flags_win_over_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[texture]\nwidth = 32\nheight = 16\n[fractal]\noctaves = 3").unwrap();
        let path = file.path().to_str().unwrap().to_owned();
        let cli = Cli::try_parse_from(["perlinbake", "--config", &path, "--height", "8"]).unwrap();
        let s = cli.resolve_config().unwrap().settings();
        assert_eq!(s.resolution, (32, 8));
        assert_eq!(s.octaves, 3);
    }

    #[test]
    fn watch_requires_config() {
        assert!(Cli::try_parse_from(["perlinbake", "--watch"]).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["perlinbake", "--config", "/nonexistent/bake.toml"]).unwrap();
        assert!(cli.resolve_config().is_err());
    }
}
