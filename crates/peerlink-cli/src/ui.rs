//! Terminal output helpers for subcommands.

use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "\u{2714}".bright_green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "\u{2718}".bright_red(), msg.bright_red());
}

/// Section header: ">> Title" in cyan.
pub fn section(title: &str) {
    println!("  {} {}", ">>".bright_cyan().bold(), title.bold());
}

/// Key-value display: "  Label:       value".
pub fn kv(label: &str, value: &str) {
    println!("  {:<13}{}", format!("{label}:"), value);
}

/// Hint line: "  hint: message" in dimmed text.
pub fn hint(msg: &str) {
    println!("  {} {}", "hint:".dimmed(), msg.dimmed());
}

/// One conversation line: "author: content", own messages highlighted.
pub fn chat_line(author: &str, content: &str, own: bool) {
    if own {
        println!("  {} {}", format!("{author}:").bright_cyan().bold(), content);
    } else {
        println!("  {} {}", format!("{author}:").bold(), content);
    }
}

/// Report an error and exit non-zero.
pub fn fail(msg: &str) -> ! {
    error(msg);
    std::process::exit(1);
}
