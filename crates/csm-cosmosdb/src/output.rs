//! Structured output for command results

use serde::Serialize;

use crate::cli;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Structured format requested on the command line, or `None` for
    /// human-readable text
    pub fn from_cli(format: cli::OutputFormat) -> Option<Self> {
        match format {
            cli::OutputFormat::Auto => None,
            cli::OutputFormat::Json => Some(Self::Json),
            cli::OutputFormat::Yaml => Some(Self::Yaml),
        }
    }
}

pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };
    Ok(rendered.trim_end().to_string())
}

pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(data, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_json() {
        let data = json!({ "enabled": false });
        assert_eq!(
            render(&data, OutputFormat::Json).unwrap(),
            "{\n  \"enabled\": false\n}"
        );
    }

    #[test]
    fn test_render_yaml() {
        let data = json!({ "enabled": true });
        assert_eq!(render(&data, OutputFormat::Yaml).unwrap(), "enabled: true");
    }

    #[test]
    fn test_auto_is_human_readable() {
        assert_eq!(OutputFormat::from_cli(cli::OutputFormat::Auto), None);
        assert_eq!(
            OutputFormat::from_cli(cli::OutputFormat::Yaml),
            Some(OutputFormat::Yaml)
        );
    }
}
