pub mod record;

use crate::app::App;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Helper to render a text field line in the edit form
pub fn render_field_line(label: &str, value: &str, field_idx: usize, app: &App) -> Line<'static> {
    let is_current = app.field_index == field_idx;

    let label_style = Style::default().fg(Color::Gray);
    let value_style = if is_current {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let focus_marker = if is_current { "> " } else { "  " };

    // The focused field shows the live input with its cursor
    let display_value = if is_current {
        app.text_input.display_with_cursor()
    } else {
        value.to_string()
    };

    Line::from(vec![
        Span::styled(focus_marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(display_value, value_style),
    ])
}

/// Helper to render a section header
pub fn render_section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

/// Helper to render a list field; the current one expands with its entries
pub fn render_list_field(
    label: &str,
    items: &[String],
    field_idx: usize,
    app: &App,
) -> Vec<Line<'static>> {
    let is_current = app.field_index == field_idx;

    let label_style = Style::default().fg(Color::Gray);
    let focus_marker = if is_current { "> " } else { "  " };

    let summary = if is_current {
        format!("[{} items]", items.len())
    } else if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(focus_marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(summary, Style::default().fg(Color::DarkGray)),
    ])];

    if is_current {
        for (i, item) in items.iter().enumerate() {
            let item_marker = if i == app.nested_index {
                "  >> "
            } else {
                "     "
            };
            lines.push(Line::from(vec![
                Span::styled(item_marker.to_string(), Style::default().fg(Color::Green)),
                Span::raw(item.clone()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("     add: ".to_string(), Style::default().fg(Color::Gray)),
            Span::styled(
                app.text_input.display_with_cursor(),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            "     [Enter: add, x: remove]".to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

/// Pick-list line with the highlighted suggestion bracketed
pub fn render_suggestions(suggestions: &[String], selected: usize) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "     pick: ".to_string(),
        Style::default().fg(Color::Gray),
    )];
    for (i, item) in suggestions.iter().enumerate() {
        if i == selected {
            spans.push(Span::styled(
                format!("[{}] ", item),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!("{} ", item),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    spans.push(Span::styled(
        "(PgUp/PgDn)".to_string(),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

/// Helper for preview key-value line
pub fn preview_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::raw(value.to_string()),
    ])
}

/// Helper for preview key-value line with colored value
pub fn preview_line_colored(label: &str, value: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(value.to_string(), Style::default().fg(color)),
    ])
}
