//! Plain HTML rendering of preview controls.

use std::fmt::Write;

use super::{Control, PreviewView};

/// Render a complete preview page for `title`.
pub fn render_page(title: &str, view: &PreviewView) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\n<form class=\"preview\">\n",
        escape(title)
    );

    if view.controls.is_empty() {
        out.push_str("<p>No fields yet. Add components in the builder.</p>\n");
    }
    for control in &view.controls {
        render_control(&mut out, control);
    }
    out.push_str("</form>\n");

    if let Some(values) = &view.values {
        let pretty = serde_json::to_string_pretty(values).unwrap_or_default();
        let _ = write!(
            out,
            "<section class=\"values\"><h4>Form values (mock)</h4><pre>{}</pre></section>\n",
            escape(&pretty)
        );
    }
    out.push_str("</body></html>\n");
    out
}

fn render_control(out: &mut String, control: &Control) {
    let id = escape(control.field_id());
    let label = escape(control.label());
    let _ = write!(out, "<div class=\"field\">\n<label for=\"{id}\">{label}</label>\n");

    match control {
        Control::Input {
            kind,
            placeholder,
            value,
            ..
        } => {
            let placeholder = placeholder
                .as_deref()
                .map(|p| format!(" placeholder=\"{}\"", escape(p)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "<input type=\"{}\" id=\"{id}\" name=\"{id}\"{placeholder} value=\"{}\">",
                kind.as_str(),
                escape(value)
            );
        }
        Control::TextArea {
            placeholder,
            rows,
            value,
            ..
        } => {
            let _ = writeln!(
                out,
                "<textarea id=\"{id}\" name=\"{id}\" rows=\"{rows}\" placeholder=\"{}\">{}</textarea>",
                escape(placeholder),
                escape(value)
            );
        }
        Control::Checkbox { checked, .. } => {
            let checked = if *checked { " checked" } else { "" };
            let _ = writeln!(
                out,
                "<input type=\"checkbox\" id=\"{id}\" name=\"{id}\"{checked}> <span>{label}</span>"
            );
        }
        Control::Select {
            prompt,
            options,
            selected,
            ..
        } => {
            let _ = writeln!(out, "<select id=\"{id}\" name=\"{id}\">");
            let prompt_selected = if selected.is_none() { " selected" } else { "" };
            let _ = writeln!(
                out,
                "<option value=\"\" disabled{prompt_selected}>{}</option>",
                escape(prompt)
            );
            for option in options {
                let mark = if selected.as_deref() == Some(option.as_str()) {
                    " selected"
                } else {
                    ""
                };
                let option = escape(option);
                let _ = writeln!(out, "<option value=\"{option}\"{mark}>{option}</option>");
            }
            out.push_str("</select>\n");
        }
        Control::Radio {
            group,
            options,
            selected,
            ..
        } => {
            let group = escape(group);
            for option in options {
                let mark = if selected.as_deref() == Some(option.as_str()) {
                    " checked"
                } else {
                    ""
                };
                let option = escape(option);
                let _ = writeln!(
                    out,
                    "<label><input type=\"radio\" name=\"{group}\" value=\"{option}\"{mark}> <span>{option}</span></label>"
                );
            }
        }
    }
    out.push_str("</div>\n");
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
