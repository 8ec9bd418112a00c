//! Era gating for operation samples.

/// Tracks whether the most recent era marker names the target era
#[derive(Debug, Clone)]
pub struct EraFilter {
    target: String,
    current: Option<String>,
    counting: bool,
}

impl EraFilter {
    /// Starts out not counting, before any marker is seen
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            current: None,
            counting: false,
        }
    }

    /// Enter era `name`. Each marker overwrites the previous one.
    pub fn enter(&mut self, name: &str) {
        self.counting = name == self.target;
        self.current = Some(name.to_string());
    }

    pub fn is_counting(&self) -> bool {
        self.counting
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}
