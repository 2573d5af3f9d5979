/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Presentation seam for end-of-run notifications.
///
/// The matching and copying services only return structured results; the
/// binary decides how to surface them. Implementations can show an OS
/// dialog, print to a console, or swallow messages entirely in tests.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that writes to the console, errors and warnings on stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("{message}"),
            Severity::Warning => eprintln!("warning: {message}"),
            Severity::Error => eprintln!("error: {message}"),
        }
    }
}
