//! Conversion from the `[logging]` config section.

use rampart_config::LoggingSection;

use crate::logging::{LogConfig, LogFormat};

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        // unknown formats map to the default
        let format: LogFormat = section.format.parse().unwrap_or_default();
        LogConfig {
            directives: section.directives.clone(),
            ..LogConfig::new(section.level.clone()).with_format(format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_logging_section() {
        let section = LoggingSection {
            level: "debug".to_owned(),
            format: "json".to_owned(),
            directives: vec!["rampart_boundary=trace".to_owned()],
        };

        let config = LogConfig::from(&section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directives, vec!["rampart_boundary=trace"]);
    }

    #[test]
    fn test_unknown_format_uses_default() {
        let section = LoggingSection {
            format: "xml".to_owned(),
            ..LoggingSection::default()
        };
        assert_eq!(LogConfig::from(&section).format, LogFormat::Pretty);
    }
}
