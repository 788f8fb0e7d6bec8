use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

use crate::wire::{ParsedResult, StyleExtension};

/// Strip ANSI escape sequences and control characters (except newline and
/// tab) from untrusted model output before it reaches the terminal.
pub fn sanitize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => {
                // CSI: ESC [ params final-byte; other escapes drop one char.
                if chars.peek() == Some(&'[') {
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&n) {
                            break;
                        }
                    }
                } else {
                    chars.next();
                }
            }
            '\n' | '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terminal rendering of a parsed result. `colored` drops the styling when
/// NO_COLOR is set or stdout is not a tty.
pub fn render_result(result: &ParsedResult, critique_label: &str) -> String {
    let mut out = String::new();
    if !result.critique.is_empty() {
        out.push_str(&format!(
            "\n{}\n{}\n",
            format!("┏━━ {} ━━", critique_label).bold(),
            indent(&sanitize(&result.critique), 2)
        ));
    }

    if result.transformations.is_empty() {
        out.push_str(&format!("\n{}\n", "No transformations returned.".yellow()));
        return out;
    }

    for (i, card) in result.transformations.iter().enumerate() {
        out.push_str(&format!(
            "\n{} {}\n{}\n",
            format!("[{}]", i + 1).cyan().bold(),
            sanitize(&card.title).bold(),
            indent(&sanitize(&card.content), 2)
        ));
    }
    out
}

pub fn print_result(result: &ParsedResult, critique_label: &str) {
    print!("{}", render_result(result, critique_label));
    println!();
}

pub fn print_styles(styles: &[StyleExtension]) {
    if styles.is_empty() {
        println!("{}", "No custom styles yet.".italic());
        return;
    }
    for (i, s) in styles.iter().enumerate() {
        println!("{}. {}  {}", i + 1, s.name.bold(), s.prompt.dimmed());
    }
}

/// Spinner on stderr while the request is in flight; hidden when stderr is not
/// a terminal or when disabled.
pub fn spinner(enabled: bool, message: &str) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
