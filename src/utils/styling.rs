//! Terminal styling for the cleaning run

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::PipelineConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SHIELD: Emoji<'_, '_> = Emoji("🛡️  ", "");
pub static WAVE: Emoji<'_, '_> = Emoji("🌊 ", "");

const CARD_WIDTH: usize = 56;

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ╺┳╸╻╺┳┓┏━╸╻ ╻┏━┓┏━┓╻ ╻
     ┃ ┃ ┃┃┣╸ ┃╻┃┣━┫┗━┓┣━┫
     ╹ ╹╺┻┛┗━╸┗┻┛╹ ╹┗━┛╹ ╹
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}{}",
        WAVE,
        style("Raw tables in, model-ready tables out").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

fn card_row(icon: &Emoji<'_, '_>, label: &str, value: &str) {
    println!(
        "    │  {}{:<16}{:<width$}│",
        icon,
        label,
        truncate_string(value, CARD_WIDTH - 24),
        width = CARD_WIDTH - 24
    );
}

/// Print configuration card
pub fn print_config(input: &Path, output_dir: &Path, config: &PipelineConfig) {
    let line = "─".repeat(CARD_WIDTH - 2);
    let none = "-".to_string();

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(CARD_WIDTH - 20)
    );
    println!("    ├{}┤", line);
    card_row(&FOLDER, "Input:", &truncate_path(input, CARD_WIDTH - 24));
    card_row(&TARGET, "Target:", &config.target_column);
    card_row(&SAVE, "Output dir:", &truncate_path(output_dir, CARD_WIDTH - 24));
    println!("    ├{}┤", line);
    card_row(
        &SHIELD,
        "Excluded:",
        &if config.exclusion_columns.is_empty() {
            none.clone()
        } else {
            config.exclusion_columns.join(", ")
        },
    );
    card_row(&INFO, "Types:", &config.type_policy.to_string());
    card_row(&INFO, "Outliers:", &config.outlier_policy.to_string());
    card_row(&INFO, "Zero variance:", &config.zero_variance.to_string());
    card_row(
        &INFO,
        "Bin column:",
        config.bin_target_column.as_ref().unwrap_or(&none),
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print a failure with the stage and state it halted at
pub fn print_failure(message: &str) {
    eprintln!();
    eprintln!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Tidewash cleaning complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(detail) = detail {
        println!(
            "      {} {} {}",
            style(count).yellow().bold(),
            description,
            style(detail).dim()
        );
    } else {
        println!("      {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
