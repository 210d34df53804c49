//! Binary runner utilities
//!
//! Start and stop banners shared by the binaries.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Commands requested on this run
    pub commands: Vec<String>,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Record a requested command
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Print startup banner
    pub fn print_banner(&self) {
        info!("");
        info!("========================================");
        info!("Starting {}", self.name);
        if !self.commands.is_empty() {
            info!("Commands: {}", self.commands.join(", "));
        }
        info!("========================================");
        info!("");
    }

    /// Print shutdown banner
    pub fn print_shutdown(&self, summary: Option<&str>) {
        info!("");
        info!("========================================");
        info!("{} finished", self.name);
        if let Some(summary) = summary {
            info!("{}", summary);
        }
        info!("========================================");
    }
}
