// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output for the apiscope CLI.
//!
//! Colors follow the terminal: OneDark on dark backgrounds, One Light on light
//! ones. `APISCOPE_THEME` wins if set, then the `COLORFGBG` hint some terminals
//! export, then macOS appearance, and dark otherwise. `NO_COLOR` and non-TTY
//! stdout turn colors off entirely, so piping into `grep` stays clean.
//!
//! Methods get the same colors API explorers use (GET green, POST blue,
//! DELETE red...), which makes a long result list scannable.

use apiscope::{Complexity, HttpMethod};
use std::sync::OnceLock;

/// Inner width of a box, between the two border characters.
pub const BOX_WIDTH: usize = 88;

// ═══════════════════════════════════════════════════════════════════════════
// THEME
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("APISCOPE_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // "fg;bg"; background 7 and up (except 8, dark gray) is a light terminal.
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(Ok(bg)) = colorfgbg.split(';').next_back().map(str::parse::<u8>) {
            if bg >= 7 && bg != 8 {
                return Theme::Light;
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            if output.status.success() && !String::from_utf8_lossy(&output.stdout).contains("Dark") {
                return Theme::Light;
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);
    pub const MAGENTA: (u8, u8, u8) = (166, 38, 164);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(GRAY);

// ═══════════════════════════════════════════════════════════════════════════
// STYLING
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// `text` in a theme color plus modifiers, or plain when colors are off.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

pub fn dim(text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", DIM, text, RESET)
    } else {
        text.to_string()
    }
}

/// Length as the terminal shows it, ANSI escapes excluded.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        match c {
            '\x1b' => in_escape = true,
            'm' if in_escape => in_escape = false,
            _ if !in_escape => len += 1,
            _ => {}
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Cut `text` to `max` characters, ending in `…` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

// ═══════════════════════════════════════════════════════════════════════════
// BOXES
// ═══════════════════════════════════════════════════════════════════════════

/// `┌─ LABEL ───┐`
pub fn section_top(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}┌{}{}{}{}┐{}", border, RESET, label_part, border, "─".repeat(remaining), RESET);
}

/// `├─ LABEL ───┤`
pub fn section_mid(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}├{}{}{}{}┤{}", border, RESET, label_part, border, "─".repeat(remaining), RESET);
}

/// `│ content     │`, truncated or padded to the box width.
pub fn row(content: &str) {
    let border = GRAY();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{}│{}{}{}{}│{}", border, RESET, content, " ".repeat(pad), border, RESET);
}

/// `│ label        value │`
pub fn stat_row(label: &str, value: &str) {
    row(&format!(" {} {}", pad_right(&dim(label), 28), value));
}

/// `└───────────┘`
pub fn section_bot() {
    println!("{}└{}┘{}", GRAY(), "─".repeat(BOX_WIDTH), RESET);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Fixed-width method label, colored by method.
pub fn method_badge(method: HttpMethod) -> String {
    let label = format!("{:<7}", method.as_str());
    if !use_colors() {
        return label;
    }
    let color = match method {
        HttpMethod::Get => GREEN(),
        HttpMethod::Post => BLUE(),
        HttpMethod::Put => YELLOW(),
        HttpMethod::Patch => MAGENTA(),
        HttpMethod::Delete => RED(),
        HttpMethod::Head | HttpMethod::Options | HttpMethod::Trace => CYAN(),
    };
    format!("{}{}{}{}", BOLD, color, label, RESET)
}

pub fn complexity_label(complexity: Complexity) -> String {
    let label = format!("{:<8}", complexity.as_str());
    match complexity {
        Complexity::Simple => themed(GREEN, &[], &label),
        Complexity::Moderate => themed(YELLOW, &[], &label),
        Complexity::Complex => themed(RED, &[], &label),
    }
}

pub fn deprecated_marker(deprecated: bool) -> String {
    if deprecated {
        themed(RED, &[DIM], "deprecated")
    } else {
        String::new()
    }
}

/// Milliseconds, green under 5, yellow under 20, red beyond.
pub fn timing_ms(value: f64) -> String {
    let text = format!("{:.3} ms", value);
    if value < 5.0 {
        themed(GREEN, &[], &text)
    } else if value < 20.0 {
        themed(YELLOW, &[], &text)
    } else {
        themed(RED, &[], &text)
    }
}

pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
