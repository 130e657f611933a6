//! Loading of game tuning from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use debugger_core::GameConfig;

/// Reads, parses and validates the game configuration stored at `path`.
pub(crate) fn load(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid game config at {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse game config toml contents")?;
    config
        .validate()
        .context("game config failed validation")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn shipped_config() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/debugger.toml")
    }

    #[test]
    fn shipped_config_matches_built_in_defaults() {
        let config = load(&shipped_config()).expect("shipped config loads");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_files_override_only_what_they_name() {
        let config = parse("seed = 7\n[arena]\nwidth = 400.0\nheight = 300.0\n")
            .expect("partial config parses");
        assert_eq!(config.seed, 7);
        assert_eq!(config.arena.width(), 400.0);
        assert_eq!(config.weapons, GameConfig::default().weapons);
    }

    #[test]
    fn zero_sum_direction_weights_are_rejected() {
        let contents = r#"
            [[archetypes]]
            id = "ant"
            hp = 3
            speed = 1.0
            size = 32.0
            reward = 1
            score = 1
            path_change_chance = 0.15
            bias = { weighted = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] }
        "#;
        assert!(parse(contents).is_err());
    }

    #[test]
    fn validation_failures_surface_as_errors() {
        let error = parse("[powerups]\ndrop_chance = 1.5\n").expect_err("out of range");
        let chain = format!("{error:#}");
        assert!(chain.contains("validation"), "{chain}");
    }

    #[test]
    fn missing_files_report_their_path() {
        let error = load(Path::new("does/not/exist.toml")).expect_err("missing file");
        assert!(format!("{error}").contains("does/not/exist.toml"));
    }
}
