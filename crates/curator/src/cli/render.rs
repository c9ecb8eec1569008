//! Plain-text rendering of items, view trees and validity reports.
//!
//! Every function here returns a `String`; printing happens in
//! `commands.rs`. Colors come from `console` and switch off by themselves
//! when stdout is not a terminal.

use console::Style;
use curatorapp::attributes::LeafValue;
use curatorapp::dispatch::{AttributeView, LeafHint, ViewBody};
use curatorapp::lookup::Lookup;
use curatorapp::model::Item;
use curatorapp::session::SessionView;
use curatorapp::validity::Validity;
use std::fmt::Write;

const INDENT: &str = "  ";

struct Styles {
    title: Style,
    muted: Style,
    faint: Style,
    error: Style,
    pending: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().bold(),
            muted: Style::new().dim(),
            faint: Style::new().dim().italic(),
            error: Style::new().red(),
            pending: Style::new().yellow(),
        }
    }
}

pub fn format_leaf(value: &LeafValue) -> String {
    match value {
        LeafValue::String(s) | LeafValue::Enum(s) => s.clone(),
        LeafValue::Numeric(n) => n.to_string(),
        LeafValue::Boolean(b) => (if *b { "yes" } else { "no" }).to_string(),
        LeafValue::DateTime(dt) => dt.to_rfc3339(),
        LeafValue::Measurement(m) => format!("{} {}", m.value, m.unit),
        LeafValue::Code(c) => match &c.display {
            Some(display) => format!("{}:{} ({})", c.scheme, c.code, display),
            None => format!("{}:{}", c.scheme, c.code),
        },
    }
}

pub fn render_items(items: &[Item]) -> String {
    let styles = Styles::new();
    if items.is_empty() {
        return format!("{}\n", styles.muted.apply_to("No items yet."));
    }
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}  {}  {}",
            i + 1,
            styles.title.apply_to(&item.name),
            item.kind,
            styles.muted.apply_to(item.uid),
        );
    }
    out
}

pub fn render_view(item: &Item, view: &SessionView) -> String {
    let styles = Styles::new();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        styles.title.apply_to(&item.name),
        styles.muted.apply_to(format!("[{}, {}]", item.kind, view.mode)),
    );
    if !view.breadcrumbs.is_empty() {
        let trail: Vec<&str> = view.breadcrumbs.iter().map(|b| b.label.as_str()).collect();
        let _ = writeln!(out, "{}", styles.faint.apply_to(trail.join(" > ")));
    }
    for node in &view.body {
        render_node(&mut out, node, 0, &styles);
    }
    out
}

fn render_node(out: &mut String, node: &AttributeView, depth: usize, styles: &Styles) {
    let indent = INDENT.repeat(depth);
    let marker = if node.valid {
        " ".to_string()
    } else {
        styles.error.apply_to("!").to_string()
    };
    let mut flags = Vec::new();
    if !node.editable {
        flags.push("read-only");
    }
    if node.optional {
        flags.push("optional");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" {}", styles.faint.apply_to(format!("({})", flags.join(", "))))
    };

    match &node.body {
        ViewBody::Leaf { value, hint } => {
            let shown = match value {
                Some(v) => format_leaf(v),
                None => styles.muted.apply_to("-").to_string(),
            };
            let _ = writeln!(
                out,
                "{}{} {}: {}{}",
                indent, marker, node.display_name, shown, flags
            );
            if let LeafHint::Text {
                suggestions: Some(suggestions),
                ..
            } = hint
            {
                match suggestions {
                    Lookup::Pending => {
                        let _ = writeln!(
                            out,
                            "{}{}{}",
                            indent,
                            INDENT,
                            styles.pending.apply_to("suggestions: loading")
                        );
                    }
                    Lookup::Ready(values) if !values.is_empty() => {
                        let _ = writeln!(
                            out,
                            "{}{}{}",
                            indent,
                            INDENT,
                            styles
                                .muted
                                .apply_to(format!("suggestions: {}", values.join(", ")))
                        );
                    }
                    Lookup::Ready(_) => {}
                }
            }
        }
        ViewBody::Object { children } => {
            let _ = writeln!(out, "{}{} {}:{}", indent, marker, node.display_name, flags);
            for child in children {
                render_node(out, child, depth + 1, styles);
            }
        }
        ViewBody::List { elements } => {
            let _ = writeln!(
                out,
                "{}{} {}: {}{}",
                indent,
                marker,
                node.display_name,
                styles.muted.apply_to(format!("{} element(s)", elements.len())),
                flags
            );
            for element in elements {
                render_node(out, element, depth + 1, styles);
            }
        }
        ViewBody::Union { branch } => match branch {
            Some(branch) => {
                let _ = writeln!(out, "{}{} {}:{}", indent, marker, node.display_name, flags);
                render_node(out, branch, depth + 1, styles);
            }
            None => {
                let _ = writeln!(
                    out,
                    "{}{} {}: {}{}",
                    indent,
                    marker,
                    node.display_name,
                    styles.muted.apply_to("none selected"),
                    flags
                );
            }
        },
    }

    if let Some(mapping) = &node.mapping {
        let line = match mapping {
            Lookup::Pending => styles.pending.apply_to("mapped by: loading".to_string()),
            Lookup::Ready(info) => styles.muted.apply_to(format!(
                "mapped by {}: {}",
                info.mapper_name, info.expression
            )),
        };
        let _ = writeln!(out, "{}{}{}", indent, INDENT, line);
    }
}

pub fn render_validity(item: &Item, validity: &Validity) -> String {
    let styles = Styles::new();
    if validity.is_valid() {
        return format!("{} is valid\n", styles.title.apply_to(&item.name));
    }
    let offending = validity.offending();
    let mut out = format!(
        "{} has {} invalid field(s):\n",
        styles.title.apply_to(&item.name),
        offending.len()
    );
    for node in offending {
        let reasons: Vec<String> = node.violations.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(
            out,
            "{}{}: {}",
            INDENT,
            styles.error.apply_to(&node.tag),
            reasons.join("; ")
        );
    }
    out
}
