//! Variables pane rendering
//!
//! Lists every variable in declaration order with its type and value, followed
//! by the `Print.output` cache held by the runtime.

use crate::memory::{Environment, Value};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Format a value the way it would be written in source
fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("{:?}", s),
        Value::Number(n) => n.to_string(),
        Value::Boolean(b) => b.to_string(),
    }
}

pub(crate) fn variable_lines<'a>(
    environment: &'a Environment,
    last_output: Option<&'a str>,
) -> Vec<Line<'a>> {
    let name_width = environment
        .bindings()
        .iter()
        .map(|b| b.name.chars().count())
        .chain(std::iter::once("Print.output".len()))
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = environment
        .bindings()
        .iter()
        .map(|binding| {
            let value_style = match binding.value {
                Value::Str(_) => Style::default().fg(DEFAULT_THEME.string),
                _ => Style::default().fg(DEFAULT_THEME.number),
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$} ", binding.name, width = name_width),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                Span::styled(
                    format!("{:<7} ", binding.value.value_type()),
                    Style::default().fg(DEFAULT_THEME.type_name),
                ),
                Span::styled(format_value(&binding.value), value_style),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::styled(
            "(no variables)",
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    lines.push(Line::default());
    let cache = match last_output {
        Some(text) => Span::styled(format!("{:?}", text), Style::default().fg(DEFAULT_THEME.string)),
        None => Span::styled("(nothing printed)", Style::default().fg(DEFAULT_THEME.comment)),
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{:<width$} ", "Print.output", width = name_width),
            Style::default()
                .fg(DEFAULT_THEME.cache)
                .add_modifier(Modifier::BOLD),
        ),
        cache,
    ]));

    lines
}

/// Render the variables pane
pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    environment: &Environment,
    last_output: Option<&str>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = variable_lines(environment, last_output);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(lines.len().saturating_sub(visible_height));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
