//! Subscriber setup for backup and restore runs.
//!
//! Guard rejections are emitted at `debug` under the `rampart_boundary`
//! target. [`LogConfig::with_guard_diagnostics`] raises that target without
//! making the rest of the run noisy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::Directive,
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Directive that surfaces one event per guard rejection.
const GUARD_DIAGNOSTICS: &str = "rampart_boundary=debug";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// How often a file target starts a new log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    /// One file per day.
    #[default]
    Daily,
    /// One file per hour.
    Hourly,
    /// A single file.
    Never,
}

impl From<FileRotation> for Rotation {
    fn from(rotation: FileRotation) -> Self {
        match rotation {
            FileRotation::Daily => Rotation::DAILY,
            FileRotation::Hourly => Rotation::HOURLY,
            FileRotation::Never => Rotation::NEVER,
        }
    }
}

/// Event rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored output for interactive runs.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event.
    Json,
    /// The `tracing-subscriber` default layout.
    Full,
}

impl std::str::FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::ConfigError(format!(
                "unknown log format: {other}"
            ))),
        }
    }
}

/// Where events are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTarget {
    /// Standard output.
    Stdout,
    /// Standard error, keeping stdout free for run output.
    #[default]
    Stderr,
    /// Rolling files named `{prefix}.{date}` inside `directory`.
    File {
        /// Directory holding the log files; created on setup.
        directory: PathBuf,
        /// File name prefix.
        prefix: String,
        /// Rotation schedule.
        #[serde(default)]
        rotation: FileRotation,
    },
}

/// Subscriber settings for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base filter, e.g. `info` or `warn,rampart_boundary=debug`.
    pub level: String,
    /// Event rendering.
    pub format: LogFormat,
    /// Output destination.
    pub target: LogTarget,
    /// Prefix events with a timestamp.
    pub timestamps: bool,
    /// Include source file and line.
    pub file_info: bool,
    /// Emit an event when a run span opens and closes.
    pub span_events: bool,
    /// Colorize output. Ignored for file targets.
    pub ansi: bool,
    /// Surface every guard rejection regardless of `level`.
    pub guard_diagnostics: bool,
    /// Extra filter directives, applied after `level`.
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            timestamps: true,
            file_info: false,
            span_events: false,
            ansi: true,
            guard_diagnostics: false,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Settings with the given base filter and everything else default.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Use `format`.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to `target`.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Write to rolling files in `directory`.
    #[must_use]
    pub fn with_file_logging(
        self,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        rotation: FileRotation,
    ) -> Self {
        self.with_target(LogTarget::File {
            directory: directory.into(),
            prefix: prefix.into(),
            rotation,
        })
    }

    /// Append a filter directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Surface every guard rejection.
    #[must_use]
    pub fn with_guard_diagnostics(mut self) -> Self {
        self.guard_diagnostics = true;
        self
    }

    /// Omit timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Report run span open and close.
    #[must_use]
    pub fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    /// Disable colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level).map_err(config_err)?;
        let extra = self.guard_diagnostics.then_some(GUARD_DIAGNOSTICS);
        for directive in extra
            .into_iter()
            .chain(self.directives.iter().map(String::as_str))
        {
            filter = filter.add_directive(directive.parse::<Directive>().map_err(config_err)?);
        }
        Ok(filter)
    }

    fn make_writer(&self) -> TelemetryResult<(BoxMakeWriter, bool)> {
        match &self.target {
            LogTarget::Stdout => Ok((BoxMakeWriter::new(std::io::stdout), self.ansi)),
            LogTarget::Stderr => Ok((BoxMakeWriter::new(std::io::stderr), self.ansi)),
            LogTarget::File {
                directory,
                prefix,
                rotation,
            } => {
                std::fs::create_dir_all(directory)?;
                let appender = RollingFileAppender::new((*rotation).into(), directory, prefix);
                Ok((BoxMakeWriter::new(appender), false))
            },
        }
    }

    fn build_layer(&self) -> TelemetryResult<BoxedLayer> {
        let (writer, ansi) = self.make_writer()?;
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_file(self.file_info)
            .with_line_number(self.file_info)
            .with_span_events(spans);

        Ok(match (self.format, self.timestamps) {
            (LogFormat::Json, true) => layer.json().boxed(),
            (LogFormat::Json, false) => layer.json().without_time().boxed(),
            (LogFormat::Pretty, true) => layer.pretty().boxed(),
            (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
            (LogFormat::Full, true) => layer.boxed(),
            (LogFormat::Full, false) => layer.without_time().boxed(),
        })
    }
}

fn config_err(e: impl std::fmt::Display) -> TelemetryError {
    TelemetryError::ConfigError(e.to_string())
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a filter directive is malformed, the log directory
/// cannot be created, or a global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;
    let layer = config.build_layer()?;

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Install a pretty `info` subscriber on stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}
