//! Output functions for consistent CLI formatting
//!
//! Every step goes through [`Marker`]: cliclack's log helpers when the
//! terminal is interactive, a bracketed tag on stdout otherwise.

use super::context::UiContext;
use console::{style, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Ok,
    Warn,
    Info,
}

impl Marker {
    fn tag(self) -> &'static str {
        match self {
            Marker::Ok => "[OK]",
            Marker::Warn => "[WARN]",
            Marker::Info => "[INFO]",
        }
    }

    fn color(self) -> Style {
        match self {
            Marker::Ok => Style::new().green(),
            Marker::Warn => Style::new().yellow(),
            Marker::Info => Style::new().cyan(),
        }
    }

    fn fancy(self, message: String) {
        let _ = match self {
            Marker::Ok => cliclack::log::success(message),
            Marker::Warn => cliclack::log::warning(message),
            Marker::Info => cliclack::log::info(message),
        };
    }
}

fn plain_line(marker: Marker, message: &str) -> String {
    format!("  {} {}", marker.color().apply_to(marker.tag()), message)
}

fn step(ctx: &UiContext, marker: Marker, fancy: String, plain: &str) {
    if ctx.use_fancy_output() {
        marker.fancy(fancy);
    } else {
        println!("{}", plain_line(marker, plain));
    }
}

/// Display intro banner
pub fn intro(ctx: &UiContext, title: &str) {
    let title = style(title).cyan().bold();
    if ctx.use_fancy_output() {
        cliclack::intro(title).ok();
    } else {
        println!("{}\n", title);
    }
}

/// Display success outro
pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!("\n{}", plain_line(Marker::Ok, message).trim_start());
    }
}

pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    step(ctx, Marker::Ok, message.to_string(), message);
}

/// Success with a dimmed detail, such as the path that was written
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(
        ctx,
        Marker::Ok,
        format!("{} ({})", message, style(detail).dim()),
        &format!("{} ({})", message, detail),
    );
}

pub fn step_warn(ctx: &UiContext, message: &str) {
    step(ctx, Marker::Warn, message.to_string(), message);
}

/// Warning followed by what to do about it
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    step(
        ctx,
        Marker::Warn,
        format!("{} - {}", message, style(hint).dim()),
        &format!("{} - {}", message, hint),
    );
}

pub fn step_info(ctx: &UiContext, message: &str) {
    step(ctx, Marker::Info, message.to_string(), message);
}

/// Dimmed aside, e.g. a follow-up command
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}

/// Print a `key: value` line
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Print a `key: value` line colored by whether the value is healthy
pub fn key_value_status(ctx: &UiContext, key: &str, value: &str, ok: bool) {
    let marker = if ok { Marker::Ok } else { Marker::Warn };
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), marker.color().apply_to(value));
    } else {
        println!("  {} {}: {}", marker.tag(), key, value);
    }
}
