use console::{strip_ansi_codes, Term};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::error::Result;

const CARD_WIDTH: usize = 64;

/// Terminal output helper
///
/// All user-facing printing goes through here so color support and
/// progress settings are decided in one place.
pub struct UI {
    color: bool,
    progress: bool,
}

impl UI {
    pub fn new(color: bool, progress: bool) -> Self {
        let term = Term::stdout();
        Self {
            color: color && term.features().colors_supported(),
            progress,
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            color: false,
            progress: false,
        }
    }

    // --- status lines ---

    pub fn success(&self, message: &str) {
        if self.color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[ok] {}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.color {
            eprintln!("{} {}", "✗".red().bold(), message);
        } else {
            eprintln!("[error] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.color {
            println!("{} {}", "!".yellow().bold(), message);
        } else {
            println!("[warn] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.color {
            println!("{} {}", "→".cyan(), message);
        } else {
            println!("[info] {}", message);
        }
    }

    pub fn line(&self, message: &str) {
        println!("{}", message);
    }

    pub fn blank(&self) {
        println!();
    }

    // --- structured output ---

    pub fn header(&self, title: &str) {
        println!();
        if self.color {
            println!("{}", title.bold().underline());
        } else {
            println!("{}", title);
            println!("{}", "=".repeat(display_width(title)));
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if self.color {
            println!("  {:<14} {}", format!("{}:", key).dimmed(), value);
        } else {
            println!("  {:<14} {}", format!("{}:", key), value);
        }
    }

    /// Boxed card with a title row and content lines
    pub fn card(&self, title: &str, lines: &[String]) {
        let inner = CARD_WIDTH - 2;
        println!("┌{}┐", "─".repeat(inner));
        println!("│ {} │", pad_to(title, inner - 2));
        println!("├{}┤", "─".repeat(inner));
        for line in lines {
            for wrapped in wrap_line(line, inner - 2) {
                println!("│ {} │", pad_to(&wrapped, inner - 2));
            }
        }
        println!("└{}┘", "─".repeat(inner));
    }

    /// Horizontal score bar, e.g. `[████████░░░░░░░░░░░░] 42%`
    pub fn score_bar(&self, label: &str, percent: u32) -> String {
        let percent = percent.min(100);
        let filled = (percent as usize * 20) / 100;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
        if self.color {
            match percent {
                80..=100 => format!("{:<12} [{}] {}%", label, bar.green(), percent),
                50..=79 => format!("{:<12} [{}] {}%", label, bar.yellow(), percent),
                _ => format!("{:<12} [{}] {}%", label, bar.red(), percent),
            }
        } else {
            format!("{:<12} [{}] {}%", label, bar, percent)
        }
    }

    // --- progress ---

    /// Per-unit progress bar (hidden when progress is disabled)
    pub fn progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:30.cyan/dim}] {pos}/{len} ({elapsed})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉ "),
        );
        bar.set_message(message.to_string());
        bar
    }

    /// Indeterminate spinner (hidden when progress is disabled)
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar
    }

    // --- prompts ---

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let answer = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }
}

fn display_width(s: &str) -> usize {
    strip_ansi_codes(s).width()
}

fn pad_to(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - current))
    }
}

/// Naive word wrap on display width
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if display_width(line) <= width {
        return vec![line.to_string()];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if display_width(&candidate) > width && !current.is_empty() {
            out.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
