//! Colored output helpers for the command-line interface.

use colored::Colorize;

/// Print a success message in green with a checkmark
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message in red with an X mark
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message in yellow with a warning sign
pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Format a suite name with emphasis
pub fn suite_name(name: &str) -> String {
    name.cyan().to_string()
}

/// Format a count with emphasis
pub fn count(n: usize) -> String {
    n.to_string().bold().to_string()
}
