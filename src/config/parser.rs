//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::{EnvManager, ENV_FILE},
    error::{AppError, Result},
    models::Config,
};
use std::path::Path;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        self.cli.validate().map_err(AppError::config)?;

        let mut config = Config::default();

        if self.cli.debug {
            if let Some(warnings) = EnvManager::check_env_file(Path::new(ENV_FILE))? {
                for warning in warnings {
                    eprintln!("{}: {}", ENV_FILE, warning);
                }
            }
        }
        EnvManager::load_env_file(self.cli.debug)?;

        for warning in EnvManager::validate_current_env() {
            eprintln!("{}", warning);
        }
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        config.dirs = cli.dirs.clone();

        if let Some(ref subdir) = cli.subdir {
            config.subdir = subdir.trim().to_string();
        }

        if let Some(ref output_dir) = cli.output_dir {
            config.output_dir = output_dir.clone();
        }

        let resolvers: Vec<String> = cli
            .resolvers
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if !resolvers.is_empty() {
            config.resolvers = resolvers;
        }

        // Flags only ever switch behavior on
        config.allow_partial |= cli.allow_partial;
        config.per_protocol |= cli.per_protocol;
        if cli.no_charts {
            config.render_charts = false;
        }

        if let Some(step) = cli.bar_step {
            config.bar_step = step;
        }

        if let Some((width, height)) = cli.chart_size {
            config.chart_width = width;
            config.chart_height = height;
        }

        if let Some(ref x_label) = cli.x_label {
            config.x_label = x_label.clone();
        }

        if cli.summary_json.is_some() {
            config.summary_json = cli.summary_json.clone();
        }

        if cli.no_color {
            config.enable_color = false;
        } else if cli.color {
            config.enable_color = true;
        } else if !cli.use_colors() {
            // NO_COLOR, TERM=dumb and friends
            config.enable_color = false;
        }

        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if let Some(format) = cli.log_format {
            config.log_format = format;
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let dirs: Vec<String> = config.dirs.iter().map(|d| d.display().to_string()).collect();
    let resolvers = if config.resolvers.is_empty() {
        "(none)".to_string()
    } else {
        config.resolvers.join(", ")
    };

    let mut summary = vec![
        format!("Input Dirs: {}", dirs.join(", ")),
        format!("Subdir: {}", config.subdir),
        format!("Output Dir: {}", config.output_dir.display()),
        format!("Resolvers: {}", resolvers),
        format!("Allow Partial: {}", config.allow_partial),
        format!("Render Charts: {}", config.render_charts),
        format!("Per Protocol: {}", config.per_protocol),
        format!("Bar Step: {}", config.bar_step),
        format!("Chart Size: {}x{}", config.chart_width, config.chart_height),
    ];
    if let Some(ref path) = config.summary_json {
        summary.push(format!("Summary JSON: {}", path.display()));
    }
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use clap::Parser;
    use std::env;
    use std::path::PathBuf;

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        crate::config::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["rttplot"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_cli_overrides() {
        let cli = parse(&[
            "-d", "runs", "--subdir", "bench", "-o", "charts",
            "--resolvers", "1.1.1.1, ,8.8.8.8", "--bar-step", "4",
            "--chart-size", "800x600", "--no-charts", "--no-color",
            "--verbose", "--log-format", "compact",
        ]);
        let mut config = Config::default();
        ConfigParser::new(cli).apply_cli_overrides(&mut config);

        assert_eq!(config.dirs, vec![PathBuf::from("runs")]);
        assert_eq!(config.subdir, "bench");
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.resolvers, vec!["1.1.1.1", "8.8.8.8"]);
        assert_eq!(config.bar_step, 4.0);
        assert_eq!((config.chart_width, config.chart_height), (800, 600));
        assert!(!config.render_charts);
        assert!(!config.enable_color);
        assert!(config.verbose);
        assert!(!config.debug);
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_keeps_env_values_when_flags_absent() {
        let mut config = Config::default();
        config
            .merge_from_vars(|key| match key {
                "RTTPLOT_SUBDIR" => Some("bench".to_string()),
                "RTTPLOT_ALLOW_PARTIAL" => Some("true".to_string()),
                "RTTPLOT_RESOLVERS" => Some("9.9.9.9".to_string()),
                _ => None,
            })
            .unwrap();

        ConfigParser::new(parse(&["-d", "runs"])).apply_cli_overrides(&mut config);

        assert_eq!(config.subdir, "bench");
        assert!(config.allow_partial);
        assert_eq!(config.resolvers, vec!["9.9.9.9"]);
    }

    #[test]
    fn test_parse_with_environment() {
        let _guard = env_lock();
        env::set_var("RTTPLOT_SUBDIR", "bench");
        env::set_var("RTTPLOT_BAR_STEP", "2.5");

        let config = load_config(parse(&["-d", "runs", "--subdir", "cli"]));

        env::remove_var("RTTPLOT_SUBDIR");
        env::remove_var("RTTPLOT_BAR_STEP");

        let config = config.unwrap();
        assert_eq!(config.subdir, "cli");
        assert_eq!(config.bar_step, 2.5);
    }

    #[test]
    fn test_parse_rejects_invalid_environment() {
        let _guard = env_lock();
        env::set_var("RTTPLOT_ALLOW_PARTIAL", "sometimes");

        let result = load_config(parse(&["-d", "runs"]));

        env::remove_var("RTTPLOT_ALLOW_PARTIAL");

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_rejects_conflicting_flags() {
        let result = load_config(parse(&["-d", "runs", "--color", "--no-color"]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_color_follows_terminal_detection() {
        let _guard = env_lock();
        env::set_var("NO_COLOR", "1");

        let mut detected = Config::default();
        ConfigParser::new(parse(&["-d", "runs"])).apply_cli_overrides(&mut detected);
        let mut forced = Config::default();
        ConfigParser::new(parse(&["-d", "runs", "--color"])).apply_cli_overrides(&mut forced);

        env::remove_var("NO_COLOR");

        assert!(!detected.enable_color);
        assert!(forced.enable_color);
    }

    #[test]
    fn test_config_summary() {
        let mut config = Config::default();
        ConfigParser::new(parse(&["-d", "a", "b", "--summary-json", "s.json"]))
            .apply_cli_overrides(&mut config);

        let summary = display_config_summary(&config);
        assert!(summary.contains("Input Dirs: a, b"));
        assert!(summary.contains("Subdir: tests"));
        assert!(summary.contains("Resolvers: (none)"));
        assert!(summary.contains("Summary JSON: s.json"));
    }
}
