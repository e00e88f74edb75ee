use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use scrollstage_core::scroll::ScrollDirection;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let mode_str = match app.mode {
            Mode::Normal if app.needs_update() => "SCROLLING",
            Mode::Normal => "IDLE",
            Mode::Help => "HELP",
        };

        let state = app.scroll_state();
        let direction = match state.direction {
            ScrollDirection::Forward => "v",
            ScrollDirection::Backward => "^",
        };
        let frame_number = app.frame.as_ref().map(|f| f.number).unwrap_or(0);

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | {} {:.0}px -> {:.0}px | lag {:.0}px | frame {}",
                mode_str,
                direction,
                state.virtual_offset,
                state.physical_offset,
                state.lag(),
                frame_number
            )
        };

        let help_hint = " q:quit j/k:scroll g/G:ends ?:help ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
