//! Command-line help system with examples and topic guidance

use crate::config::env::EnvManager;
use colored::*;

/// Help system for the CLI application
pub struct HelpSystem {
    platform: String,
}

impl HelpSystem {
    /// Create a new help system
    pub fn new() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Topics accepted by `--help-topic`
    pub fn topics() -> Vec<&'static str> {
        vec!["input", "charts", "config", "examples"]
    }

    /// Display the main help message with all available options
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_options_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_environment_section(use_colors));

        help
    }

    /// Display help for a specific topic
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "input" | "files" => Some(self.format_input_help(use_colors)),
            "charts" | "output" => Some(self.format_charts_help(use_colors)),
            "config" | "env" | "environment" => Some(self.format_config_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn section_header(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "DNS RTT Plotter";
        let subtitle = "Charts DNS-over-UDP and DNS-over-HTTPS benchmark round-trip times";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!("{}\n{}\nVersion: {} | Platform: {}\n", title, subtitle, version, self.platform)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let patterns = [
            "rttplot --dirs <DIRS>... [OPTIONS]",
            "rttplot --help-topic <TOPIC>",
        ];

        let mut usage = format!("{}\n", self.section_header("USAGE:", use_colors));
        for pattern in patterns {
            usage.push_str(&format!("  {}\n", pattern));
        }
        usage
    }

    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp { short: Some("d"), long: "dirs", value: "<DIRS>...", description: "Root directories to search (required)" },
            OptionHelp { short: None, long: "subdir", value: "<NAME>", description: "Directory name result files sit under (default: tests)" },
            OptionHelp { short: Some("o"), long: "output-dir", value: "<DIR>", description: "Where charts are written (default: .)" },
            OptionHelp { short: None, long: "resolvers", value: "<LIST>", description: "Split series by resolver words found in command lines" },
            OptionHelp { short: None, long: "allow-partial", value: "", description: "Chart missing protocols as gaps instead of failing" },
            OptionHelp { short: None, long: "per-protocol", value: "", description: "Also write one chart per protocol" },
            OptionHelp { short: None, long: "bar-step", value: "<N>", description: "Y tick step of single-protocol charts (default: 10)" },
            OptionHelp { short: None, long: "no-charts", value: "", description: "Only print statistics" },
            OptionHelp { short: None, long: "summary-json", value: "<PATH>", description: "Write aggregated statistics as JSON" },
            OptionHelp { short: None, long: "verbose", value: "", description: "Log progress" },
            OptionHelp { short: None, long: "debug", value: "", description: "Log every loaded file" },
            OptionHelp { short: None, long: "no-color", value: "", description: "Disable colored output" },
        ];

        let mut output = format!("{}\n", self.section_header("OPTIONS:", use_colors));
        for option in &options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Chart one benchmark run",
                command: "rttplot --dirs results/2024-05-01",
            },
            ExampleHelp {
                title: "Compare resolvers, charts into ./charts",
                command: "rttplot -d results --resolvers 1.1.1.1,8.8.8.8 -o charts",
            },
            ExampleHelp {
                title: "Statistics only, as JSON",
                command: "rttplot -d results --no-charts --summary-json summary.json",
            },
        ];

        let mut output = format!("{}\n", self.section_header("EXAMPLES:", use_colors));
        for example in &examples {
            output.push_str(&example.format(use_colors));
        }
        output
    }

    fn format_environment_section(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", self.section_header("ENVIRONMENT VARIABLES:", use_colors));
        output.push_str("Configuration priority: CLI arguments > Environment variables > .env file > Defaults\n\n");

        for (var_name, description, _example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                output.push_str(&format!("  {}: {}\n", var_name.bright_yellow().bold(), description));
            } else {
                output.push_str(&format!("  {}: {}\n", var_name, description));
            }
        }
        output
    }

    fn format_config_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", self.section_header("CONFIGURATION:", use_colors));
        help.push_str(&EnvManager::display_env_help());
        help.push('\n');
        help.push_str(&format!("{}\n", self.section_header("EXAMPLE .env:", use_colors)));
        help.push_str(&EnvManager::create_example_env_content());
        help
    }

    fn format_input_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", self.section_header("INPUT FILES:", use_colors));
        help.push_str("Every *.json file below a --dirs root whose path contains a directory\n");
        help.push_str("named like --subdir is read as line-delimited JSON:\n\n");
        help.push_str("  line 1       {\"cmdline\": \"dnsperf -P doh -M POST ...\"}\n");
        help.push_str("  lines 2..n   {\"period_response_avg_ms\": [12.1, 13.4]}\n");
        help.push_str("  last line    {\"total_response_avg_ms\": 12.7}\n\n");
        help.push_str("Protocol comes from -P (default udp) and, for doh, -M (default GET).\n");
        help.push_str("The test case is the first path component named test1 through test8.\n");
        help.push_str("Zero and NaN latencies are ignored.\n");
        help
    }

    fn format_charts_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", self.section_header("CHARTS:", use_colors));
        help.push_str("  <subdir>-combined-rtt-mean.png        UDP, HTTPS GET and HTTPS POST mean RTT per test\n");
        help.push_str("  <subdir>-combined-rtt-difference.png  HTTPS GET and POST minus UDP per test\n");
        help.push_str("  <subdir>-<protocol>-rtt-mean.png      single protocol (--per-protocol)\n\n");
        help.push_str("With --resolvers the resolver is inserted after <subdir>.\n");
        help.push_str("A protocol without results aborts the run unless --allow-partial is set.\n");
        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting individual options
struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let flags = match self.short {
            Some(short) => format!("  -{}, ", short),
            None => "      ".to_string(),
        };
        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            format!(
                "{}{} {}",
                flags.bright_cyan(),
                format!("{:<26}", long_with_value).bright_cyan(),
                self.description
            )
        } else {
            format!("{}{:<26} {}", flags, long_with_value, self.description)
        }
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n", self.title.bright_yellow().bold(), self.command.bright_white())
        } else {
            format!("  {}:\n    {}\n", self.title, self.command)
        }
    }
}
