//! Plain-text rendering for terminals.

use std::fmt::{Display, Write};

use landacq_navigation::BreadcrumbItem;

use crate::{ShellOutcome, ShellView};

/// Render a breadcrumb trail on one line. The last crumb is the current
/// page and is always shown as such, whatever its link state.
pub fn breadcrumb_line(crumbs: &[BreadcrumbItem]) -> String {
    let last = crumbs.len().saturating_sub(1);
    crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            if i == last {
                format!("[{}]", crumb.label)
            } else {
                crumb.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn render_view<T: Display>(view: &ShellView<T>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} | {}", view.title, view.subtitle);
    if view.notifications > 0 {
        let _ = write!(out, " | notifications [{}]", view.notifications);
    }
    out.push('\n');
    let _ = writeln!(out, "signed in as {}", view.user);
    out.push('\n');

    let mut pinned_started = false;
    for entry in &view.menu {
        if entry.pinned && !pinned_started {
            out.push_str("  --\n");
            pinned_started = true;
        }
        let marker = if entry.active { '*' } else { ' ' };
        let _ = write!(out, "  {marker} {}", entry.label);
        if let Some(n) = entry.badge {
            let _ = write!(out, " [{n}]");
        }
        out.push('\n');
    }

    out.push('\n');
    let _ = writeln!(out, "{}", breadcrumb_line(&view.breadcrumbs));
    out.push('\n');
    let _ = writeln!(out, "{}", view.content);
    out.push('\n');
    let _ = writeln!(out, "{}", view.footer);
    out
}

pub fn render_outcome<T: Display>(outcome: &ShellOutcome<T>) -> String {
    match outcome {
        ShellOutcome::Redirect { target } => format!("redirect -> {target}\n"),
        ShellOutcome::Public { content } => format!("{content}\n"),
        ShellOutcome::Page(view) => render_view(view),
    }
}
