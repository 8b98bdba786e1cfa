//! Output pane rendering
//!
//! Shows the transcript up to the current point in history. Text written as
//! an input prompt is tinted so it can be told apart from printed output.

use crate::snapshot::{SegmentKind, Transcript};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Split the transcript into display lines, keeping each segment's style
pub(crate) fn transcript_lines(transcript: &Transcript) -> Vec<Line<'_>> {
    let mut lines = vec![Line::default()];

    for segment in transcript.segments() {
        let style = match segment.kind {
            SegmentKind::Print => Style::default().fg(DEFAULT_THEME.fg),
            SegmentKind::Prompt => Style::default().fg(DEFAULT_THEME.prompt),
        };
        for (i, piece) in segment.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if !piece.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.spans.push(Span::styled(piece, style));
                }
            }
        }
    }

    // Remove trailing empty line if the text ended with a newline
    if lines.len() > 1 && lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    if lines.len() == 1 && lines[0].spans.is_empty() {
        lines.clear();
    }
    lines
}

/// Render the output pane
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    transcript: &Transcript,
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
        .title(format!(" Output ({} prints) ", transcript.prints().count()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = transcript_lines(transcript);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_segments_join_across_prints() {
        let loc = SourceLocation::new(1, 1);
        let mut transcript = Transcript::new();
        transcript.push("Hello".into(), SegmentKind::Print, loc);
        transcript.push(" World\nNext".into(), SegmentKind::Print, loc);
        transcript.push("Name? ".into(), SegmentKind::Prompt, loc);

        let lines = transcript_lines(&transcript);
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "Hello World");
        assert_eq!(text(&lines[1]), "NextName? ");
        assert_eq!(lines[1].spans[1].style.fg, Some(DEFAULT_THEME.prompt));
    }

    #[test]
    fn test_empty_and_trailing_newline() {
        let loc = SourceLocation::new(1, 1);
        let mut transcript = Transcript::new();
        assert!(transcript_lines(&transcript).is_empty());

        transcript.push("a\n".into(), SegmentKind::Print, loc);
        assert_eq!(transcript_lines(&transcript).len(), 1);
    }
}
