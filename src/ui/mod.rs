//! Terminal presentation
//!
//! Listings, banners and error boxes. Nothing here affects control flow.

use crate::scripts::ScriptEntry;
use colored::Colorize;
use console::measure_text_width;

/// Label for a script in the interactive prompt
pub fn choice_label(script: &ScriptEntry) -> String {
    format!(
        "{} {}",
        script.name().green(),
        format!("({})", script.path().display()).dimmed()
    )
}

/// Plain-text listing of the available scripts
pub fn format_listing(scripts: &[ScriptEntry]) -> String {
    if scripts.is_empty() {
        return "\n📝 No scripts found in the scripts directory.\n".to_string();
    }

    let mut out = String::from("\n📝 Available scripts:\n\n");
    for script in scripts {
        out.push_str(&format!("  • {}\n", script.name()));
    }
    out.push_str("\n▶️  Run a script using: script-runner -s <script-name>\n");
    out
}

/// Print the available scripts to stdout
pub fn list_scripts(scripts: &[ScriptEntry]) {
    println!("{}", format_listing(scripts));
}

/// Draw `lines` inside a rounded box, with an optional title in the top edge.
/// Widths are measured in terminal columns, so emoji and wide characters
/// keep the edges aligned.
pub fn render_box(lines: &[&str], title: Option<&str>) -> String {
    let content_width = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);
    let title_width = title.map(|t| measure_text_width(t) + 2).unwrap_or(0);
    let width = content_width.max(title_width) + 2;

    let top = match title {
        Some(t) => {
            let fill = width - (measure_text_width(t) + 2);
            let left = fill / 2;
            format!("╭{} {} {}╮", "─".repeat(left), t, "─".repeat(fill - left))
        }
        None => format!("╭{}╮", "─".repeat(width)),
    };

    let mut out = top;
    out.push('\n');
    for line in lines {
        let pad = width - 2 - measure_text_width(line);
        out.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
    }
    out.push_str(&format!("╰{}╯", "─".repeat(width)));
    out
}

/// Banner shown before the interactive prompt
pub fn welcome_banner() {
    let banner = render_box(
        &[
            "Script Runner",
            "Select a script to run",
            "",
            "Tip: Use --help to see all available options",
        ],
        Some("Welcome"),
    );
    println!("\n{}\n", banner.blue());
}

/// Boxed error report on stderr
pub fn error_box(message: &str) {
    let mut lines = vec!["Error occurred:"];
    lines.extend(message.lines());
    eprintln!("{}", render_box(&lines, None).red());
}
