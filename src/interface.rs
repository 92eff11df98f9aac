use crate::action::ParseError;

/// The host parser's output convention.
/// Implement this to route messages somewhere other than the standard streams.
pub trait UserInterface {
    /// Print a regular message (ex: help text).
    fn print(&self, message: String);

    /// Print an error message.
    fn print_error(&self, error: ParseError);
}

/// A [`UserInterface`] over stdout/stderr.
pub struct ConsoleInterface {}

impl Default for ConsoleInterface {
    fn default() -> Self {
        Self {}
    }
}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }
}
