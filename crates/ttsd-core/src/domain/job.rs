//! Synthesis job types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How synthesized audio leaves the engine, chosen per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Engine writes audio to stdout; the response carries the bytes.
    #[default]
    Stream,
    /// Engine writes audio to a file; the response carries the path.
    File,
}

impl OutputMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::File => "file",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" | "stdout" => Ok(Self::Stream),
            "file" => Ok(Self::File),
            other => Err(format!("unknown output mode '{other}' (expected stream or file)")),
        }
    }
}

/// Where a single invocation should put its audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutput {
    Stdout,
    File(PathBuf),
}

/// One request's text mapped to one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisJob {
    pub text: String,
    pub output: SynthesisOutput,
}

impl SynthesisJob {
    /// Job that captures audio from the engine's stdout.
    pub fn to_stdout(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            output: SynthesisOutput::Stdout,
        }
    }

    /// Job that has the engine write audio to `path`.
    pub fn to_file(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            output: SynthesisOutput::File(path.into()),
        }
    }

    /// Output file path, if this is a file job.
    pub fn output_path(&self) -> Option<&PathBuf> {
        match &self.output {
            SynthesisOutput::File(path) => Some(path),
            SynthesisOutput::Stdout => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_parses_known_values() {
        assert_eq!("stream".parse::<OutputMode>().unwrap(), OutputMode::Stream);
        assert_eq!(" FILE ".parse::<OutputMode>().unwrap(), OutputMode::File);
        assert_eq!("stdout".parse::<OutputMode>().unwrap(), OutputMode::Stream);
        assert!("wav".parse::<OutputMode>().is_err());
    }

    #[test]
    fn job_output_path() {
        assert_eq!(SynthesisJob::to_stdout("hi").output_path(), None);
        let job = SynthesisJob::to_file("hi", "/tmp/a.wav");
        assert_eq!(job.output_path(), Some(&PathBuf::from("/tmp/a.wav")));
    }
}
