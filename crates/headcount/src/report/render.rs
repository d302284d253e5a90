use std::fmt::Write as _;

use super::{ChangeEvent, ChangeKind, ChangeReport};

/// Render the report as the HTML email body.
///
/// Pure and deterministic: the same report renders byte-identical output
/// on every call. An empty report renders an explicit no-changes notice
/// instead of an empty list.
pub fn render_html(report: &ChangeReport) -> String {
    let mut html = String::new();
    writeln!(
        html,
        "<h1>Organizational changes for {}</h1>",
        report.report_date
    )
    .expect("write heading");
    writeln!(
        html,
        "<p>Comparing {} against {}.</p>",
        report.baseline_date, report.report_date
    )
    .expect("write comparison line");

    if report.is_empty() {
        writeln!(
            html,
            "<p>No changes detected between {} and {}.</p>",
            report.baseline_date, report.report_date
        )
        .expect("write no-changes notice");
        return html;
    }

    let totals = report.totals();
    writeln!(
        html,
        "<p>Added: {}, removed: {}, changed fields: {}.</p>",
        totals.added, totals.removed, totals.modified
    )
    .expect("write totals line");

    render_html_group(&mut html, "Added", report.events_of(ChangeKind::Added));
    render_html_group(&mut html, "Removed", report.events_of(ChangeKind::Removed));
    render_html_group(&mut html, "Changed", report.events_of(ChangeKind::Modified));

    html
}

/// Plaintext twin of [`render_html`], used by the CLI preview.
pub fn render_text(report: &ChangeReport) -> String {
    let mut text = String::new();
    writeln!(text, "Organizational changes for {}", report.report_date).expect("write heading");
    writeln!(
        text,
        "Comparing {} against {}.",
        report.baseline_date, report.report_date
    )
    .expect("write comparison line");

    if report.is_empty() {
        text.push('\n');
        writeln!(
            text,
            "No changes detected between {} and {}.",
            report.baseline_date, report.report_date
        )
        .expect("write no-changes notice");
        return text;
    }

    let totals = report.totals();
    text.push('\n');
    writeln!(
        text,
        "Added: {}, removed: {}, changed fields: {}.",
        totals.added, totals.removed, totals.modified
    )
    .expect("write totals line");

    render_text_group(&mut text, "Added", report.events_of(ChangeKind::Added));
    render_text_group(&mut text, "Removed", report.events_of(ChangeKind::Removed));
    render_text_group(&mut text, "Changed", report.events_of(ChangeKind::Modified));

    text
}

fn render_html_group<'a>(
    html: &mut String,
    heading: &str,
    events: impl Iterator<Item = &'a ChangeEvent>,
) {
    let events: Vec<&ChangeEvent> = events.collect();
    if events.is_empty() {
        return;
    }

    writeln!(html, "<h2>{} ({})</h2>", heading, events.len()).expect("write group heading");
    html.push_str("<ul>\n");
    for event in events {
        writeln!(html, "<li>{}</li>", html_item(event)).expect("write change item");
    }
    html.push_str("</ul>\n");
}

fn render_text_group<'a>(
    text: &mut String,
    heading: &str,
    events: impl Iterator<Item = &'a ChangeEvent>,
) {
    let events: Vec<&ChangeEvent> = events.collect();
    if events.is_empty() {
        return;
    }

    text.push('\n');
    writeln!(text, "{} ({}):", heading, events.len()).expect("write group heading");
    for event in events {
        writeln!(text, "  - {}", text_item(event)).expect("write change line");
    }
}

fn html_item(event: &ChangeEvent) -> String {
    let mut item = escape_html(&event.employee_id.to_string());
    if let Some(name) = &event.employee_name {
        write!(item, " ({})", escape_html(name)).expect("write employee name");
    }
    if let Some(field) = event.field {
        write!(
            item,
            ": {}: {} -> {}",
            field,
            html_value(event.old_value.as_deref()),
            html_value(event.new_value.as_deref())
        )
        .expect("write field change");
    }
    item
}

fn text_item(event: &ChangeEvent) -> String {
    let mut item = event.employee_id.to_string();
    if let Some(name) = &event.employee_name {
        write!(item, " ({})", name).expect("write employee name");
    }
    if let Some(field) = event.field {
        write!(
            item,
            ": {}: {} -> {}",
            field,
            text_value(event.old_value.as_deref()),
            text_value(event.new_value.as_deref())
        )
        .expect("write field change");
    }
    item
}

fn html_value(value: Option<&str>) -> String {
    match value {
        Some(value) => escape_html(value),
        None => "(none)".to_string(),
    }
}

fn text_value(value: Option<&str>) -> &str {
    value.unwrap_or("(none)")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
