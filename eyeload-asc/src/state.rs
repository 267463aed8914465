use std::path::{Path, PathBuf};

use eyeload_core::{Result, SampleTable, SessionParameters, TrialTable};
use tracing::info;

use crate::config::ParserConfig;
use crate::session::{ParsedSession, load_file};

/// Holds the most recently loaded session.
///
/// Each successful `load_file` replaces every derived table at once; a failed
/// load leaves the previous session untouched.
#[derive(Debug, Clone, Default)]
pub struct EyeSession {
    config: ParserConfig,
    current: Option<ParsedSession>,
    source: Option<PathBuf>,
}

impl EyeSession {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            current: None,
            source: None,
        }
    }

    pub fn from_file(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self> {
        let mut session = Self::new(config);
        session.load_file(path)?;
        Ok(session)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&ParsedSession> {
        let path = path.as_ref();
        let parsed = load_file(path, &self.config)?;
        if let Some(previous) = &self.source {
            info!(previous = %previous.display(), next = %path.display(), "replacing session");
        }
        self.source = Some(path.to_path_buf());
        Ok(self.current.insert(parsed))
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn session(&self) -> Option<&ParsedSession> {
        self.current.as_ref()
    }

    pub fn params(&self) -> Option<&SessionParameters> {
        self.current.as_ref().map(|s| &s.params)
    }

    pub fn samples(&self) -> Option<&SampleTable> {
        self.current.as_ref().map(|s| &s.samples)
    }

    pub fn trials(&self) -> Option<&TrialTable> {
        self.current.as_ref().map(|s| &s.trials)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}
