pub mod fat;
pub mod macho;
pub mod pe;

use crate::Diagnostic;

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns a short human-readable name, e.g. "PE" or "Mach-O".
    fn format_name(&self) -> &'static str;

    /// Returns whether this is a 64-bit container, if the header says so.
    fn is_64(&self) -> Option<bool>;

    /// Diagnostics recorded while decoding, in the order they were produced.
    fn diagnostics(&self) -> &[Diagnostic];

    /// Returns true if decoding stopped before the end of the fixed header.
    fn is_partial(&self) -> bool {
        self.diagnostics().iter().any(Diagnostic::is_fatal)
    }
}
