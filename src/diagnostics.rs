use tracing::{debug, warn};

/// Sink for recoverable problems met while loading, saving or creating a
/// tileset.
///
/// Each warning is forwarded to `tracing` and kept, so a caller can show the
/// complete list once the operation returns.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    verbose: bool,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Quiet sink: warnings are recorded, debug traces are skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that also emits step-by-step debug traces.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            warnings: Vec::new(),
        }
    }

    /// Whether step-by-step tracing is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Records a degrade-and-continue condition.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(target: "tileset", "{}", message);
        self.warnings.push(message);
    }

    pub(crate) fn trace(&self, message: impl AsRef<str>) {
        if self.verbose {
            debug!(target: "tileset", "{}", message.as_ref());
        }
    }

    /// Warnings recorded so far, oldest first.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True once any warning has been recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Forgets recorded warnings.
    pub fn clear(&mut self) {
        self.warnings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_warnings_in_order() {
        let mut diag = Diagnostics::new();
        diag.warn("first");
        diag.warn(String::from("second"));
        assert_eq!(diag.warnings(), ["first", "second"]);
        diag.clear();
        assert!(!diag.has_warnings());
    }
}
