//! Application context: unified state passed to every command handler.
//!
//! Adding a cross-cutting concern requires only one field change here; no
//! command signature changes.

use anyhow::Result;

use crate::infra::config::YamlConfigStore;
use crate::infra::state::StateManager;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Lease record persisted between `provision` and `cleanup`.
    pub state_mgr: StateManager,
    /// Configuration file.
    pub config_store: YamlConfigStore,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// Progress output is silenced in JSON mode so stdout stays parseable.
    ///
    /// # Errors
    ///
    /// Returns an error if `StateManager::new()` fails (home directory not found).
    pub fn new(flags: AppFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            state_mgr: StateManager::new()?,
            config_store: YamlConfigStore,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for application services.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
