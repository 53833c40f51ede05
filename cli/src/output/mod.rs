//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print an in-progress step prefixed with `→`. Suppressed when `quiet`.
    pub fn step(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "→".style(self.styles.step));
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠` to stderr. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Output renderer: dispatches to human or JSON rendering.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the hosts leased by `provision`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_record(&self, record: &crate::domain::LeaseRecord) -> anyhow::Result<()> {
        match self {
            Self::Human(r) => {
                r.render_record(record);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_record(record),
        }
    }

    /// Render the stored lease state for `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_status(&self, record: Option<&crate::domain::LeaseRecord>) -> anyhow::Result<()> {
        match self {
            Self::Human(r) => {
                r.render_status(record);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_status(record),
        }
    }

    /// Render the number of VMs handed back by `cleanup`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_released(&self, released: usize) -> anyhow::Result<()> {
        match self {
            Self::Human(r) => {
                r.render_released(released);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_released(released),
        }
    }

    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> anyhow::Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_version(version),
        }
    }
}
