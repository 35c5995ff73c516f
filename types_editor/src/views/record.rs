use super::{
    preview_line, preview_line_colored, render_field_line, render_list_field,
    render_section_header, render_suggestions,
};
use crate::app::App;
use crate::form::FormField;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use types_core::{Association, Flags, IntField, TypeRecord};

fn on_off(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub fn render_preview(record: &TypeRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            record.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        render_section_header("Spawn"),
    ];

    for field in IntField::ALL {
        let value = record
            .int(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(preview_line(field.label(), &value));
    }

    lines.push(Line::from(""));
    lines.push(render_section_header("Flags"));
    for key in Flags::KEYS {
        let on = record.flags.get(key).unwrap_or(false);
        let color = if on { Color::Green } else { Color::DarkGray };
        lines.push(preview_line_colored(key, on_off(on), color));
    }

    lines.push(Line::from(""));
    lines.push(preview_line_colored(
        "Category",
        record.category_name().unwrap_or("-"),
        Color::Cyan,
    ));
    for kind in Association::ALL {
        let entries = record.associations(kind);
        let value = if entries.is_empty() {
            "-".to_string()
        } else {
            entries.join(", ")
        };
        lines.push(preview_line(kind.label(), &value));
    }

    lines
}

pub fn render_edit_form(app: &App) -> Vec<Line<'static>> {
    let form = &app.form;
    let mut lines = Vec::new();

    for idx in 0..FormField::COUNT {
        let Some(field) = FormField::at(idx) else {
            continue;
        };
        let is_current = app.field_index == idx;

        match field {
            FormField::Name => {
                lines.push(render_field_line(field.label(), &form.name, idx, app));
                lines.push(Line::from(""));
            }
            FormField::Int(_) => {
                lines.push(render_field_line(field.label(), &form.text(field), idx, app));
            }
            FormField::Flags => {
                lines.push(Line::from(""));
                lines.extend(render_flags(app, is_current));
                lines.push(Line::from(""));
            }
            FormField::Category => {
                lines.push(render_field_line(field.label(), &form.category, idx, app));
                if is_current {
                    lines.push(render_suggestions(&app.suggestions(), app.suggestion_index));
                }
            }
            FormField::List(kind) => {
                lines.extend(render_list_field(field.label(), form.list(kind), idx, app));
                if is_current {
                    lines.push(render_suggestions(&app.suggestions(), app.suggestion_index));
                }
            }
        }
    }

    lines
}

fn render_flags(app: &App, is_current: bool) -> Vec<Line<'static>> {
    let focus_marker = if is_current { "> " } else { "  " };
    let mut lines = vec![Line::from(vec![
        Span::styled(focus_marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled("Flags:".to_string(), Style::default().fg(Color::Gray)),
    ])];

    for (i, key) in Flags::KEYS.iter().enumerate() {
        let on = app.form.flags.get(key).unwrap_or(false);
        let marker = if is_current && i == app.nested_index {
            "  >> "
        } else {
            "     "
        };
        let check = if on { "[x] " } else { "[ ] " };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(Color::Green)),
            Span::styled(
                check.to_string(),
                Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
            ),
            Span::raw(key.to_string()),
        ]));
    }

    if is_current {
        lines.push(Line::from(Span::styled(
            "     [Up/Down: move, Space: toggle]".to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}
