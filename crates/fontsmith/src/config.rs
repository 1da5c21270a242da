//! Generation parameters from a TOML file and command line flags.
//!
//! The file mirrors [`GenerationParams`]; missing keys take their defaults:
//!
//! ```toml
//! pixel_height = 48
//! main_color = "#ffffff"
//! stroke_color = "#000000"
//! page_width = 512
//! page_height = 512
//! page_tint = "by_style"
//!
//! [style]
//! kind = "outlined"
//! thickness = 3
//! blur_radius = 1
//! ```
//!
//! Flags given on the command line replace the file's values.

use std::path::{Path, PathBuf};

use fontsmith_core::{GenerationParams, StyleParams};
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Read generation parameters from a TOML file.
pub fn load_params(path: &Path) -> CliResult<GenerationParams> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let params = toml::from_str(&content).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "fontsmith::config", path = %path.display(), "loaded config file");
    Ok(params)
}

/// Final parameters: the config file (or defaults) with flags applied.
pub fn resolve_params(cli: &Cli) -> CliResult<GenerationParams> {
    let mut params = match &cli.config {
        Some(path) => load_params(path)?,
        None => GenerationParams::default(),
    };
    apply_flags(&mut params, cli);
    Ok(params)
}

fn apply_flags(params: &mut GenerationParams, cli: &Cli) {
    if let Some(height) = cli.height {
        params.pixel_height = height;
    }
    if let Some(color) = cli.main_color {
        params.main_color = color;
    }
    if let Some(color) = cli.stroke_color {
        params.stroke_color = color;
    }
    if let Some(width) = cli.page_width {
        params.page_width = width;
    }
    if let Some(height) = cli.page_height {
        params.page_height = height;
    }
    if let Some(tint) = cli.page_tint {
        params.page_tint = tint;
    }

    if cli.style.is_none() && cli.value1.is_none() && cli.value2.is_none() {
        return;
    }

    // Switching style starts from that style's defaults; values not given
    // on the command line keep the current ones.
    let kind = cli.style.unwrap_or(params.style.kind());
    let base = if kind == params.style.kind() {
        params.style
    } else {
        StyleParams::default_for(kind)
    };
    let (value1, value2) = base.values();
    params.style = StyleParams::from_values(
        kind,
        cli.value1.unwrap_or_else(|| saturate(value1)),
        cli.value2.unwrap_or_else(|| saturate(value2)),
    );
}

fn saturate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Descriptor path: `--output`, or the font's file stem in the current
/// directory.
pub fn output_path(cli: &Cli) -> CliResult<PathBuf> {
    if let Some(output) = &cli.output {
        return Ok(output.clone());
    }
    cli.font
        .file_stem()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::NoOutputName(cli.font.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use fontsmith_core::{Color, PageTint, StyleKind};

    fn cli(args: &[&str]) -> Cli {
        let mut all = vec!["fontsmith", "fonts/Sample.ttf"];
        all.extend_from_slice(args);
        Cli::try_parse_from(all).unwrap()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(resolve_params(&cli(&[])).unwrap(), GenerationParams::default());
    }

    #[test]
    fn test_style_flag_uses_style_defaults() {
        let params = resolve_params(&cli(&["--style", "contour"])).unwrap();
        assert_eq!(params.style, StyleParams::default_for(StyleKind::Contour));
    }

    #[test]
    fn test_values_map_onto_style() {
        let params =
            resolve_params(&cli(&["--style", "sdf", "--value1", "6", "--value2", "-4"])).unwrap();
        assert_eq!(
            params.style,
            StyleParams::Sdf {
                max_distance: 6,
                supersample_scale: 4
            }
        );
    }

    #[test]
    fn test_single_value_keeps_the_other() {
        let params = resolve_params(&cli(&["--value2", "3"])).unwrap();
        assert_eq!(
            params.style,
            StyleParams::Sdf {
                max_distance: 10,
                supersample_scale: 3
            }
        );
    }

    #[test]
    fn test_config_file_with_overrides() {
        let file = write_config(
            r##"
            pixel_height = 48
            main_color = "#ff0000"
            page_tint = "main"

            [style]
            kind = "outlined"
            thickness = 3
            blur_radius = 1
            "##,
        );
        let path = file.path().to_str().unwrap();

        let params = resolve_params(&cli(&["--config", path])).unwrap();
        assert_eq!(params.pixel_height, 48);
        assert_eq!(params.main_color, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(params.page_tint, PageTint::Main);
        assert_eq!(
            params.style,
            StyleParams::Outlined {
                thickness: 3,
                blur_radius: 1
            }
        );
        assert_eq!(params.page_width, 1024);

        let params =
            resolve_params(&cli(&["--config", path, "--height", "20", "--value1", "5"])).unwrap();
        assert_eq!(params.pixel_height, 20);
        assert_eq!(
            params.style,
            StyleParams::Outlined {
                thickness: 5,
                blur_radius: 1
            }
        );
    }

    #[test]
    fn test_invalid_config_file() {
        let file = write_config("pixel_height = \"tall\"");
        let path = file.path().to_str().unwrap();
        let err = resolve_params(&cli(&["--config", path])).unwrap_err();
        assert!(matches!(err, CliError::ParseConfig { .. }));

        let err = resolve_params(&cli(&["--config", "/nonexistent/fontsmith.toml"])).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(&cli(&[])).unwrap(), PathBuf::from("Sample"));
        assert_eq!(
            output_path(&cli(&["-o", "out/atlas.fnt"])).unwrap(),
            PathBuf::from("out/atlas.fnt")
        );
    }
}
