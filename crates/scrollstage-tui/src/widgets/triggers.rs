use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use scrollstage_core::trigger::TriggerState;
use scrollstage_core::Positioning;

use crate::app::App;

/// Width of the progress gauge in cells
const GAUGE_WIDTH: usize = 10;

pub struct TriggersWidget;

impl TriggersWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let block = Block::default()
            .title(" Triggers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg0));

        let mut items: Vec<ListItem> = app
            .engine
            .registry()
            .iter()
            .map(|trigger| {
                let style = match trigger.state() {
                    TriggerState::Active => Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
                    TriggerState::Before => Style::default().fg(theme.grey2),
                    TriggerState::After => Style::default().fg(theme.released),
                };
                let pin_marker = if trigger.def().pin { "P " } else { "  " };
                let region = trigger.region();

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(pin_marker, Style::default().fg(theme.pinned)),
                        Span::styled(trigger.name().to_string(), style),
                    ]),
                    Line::from(vec![
                        Span::styled(
                            format!("  {} ", gauge(trigger.progress())),
                            Style::default().fg(theme.accent),
                        ),
                        Span::styled(
                            format!("{:.0}-{:.0}", region.start, region.end),
                            Style::default().fg(theme.grey0),
                        ),
                    ]),
                ])
            })
            .collect();

        // Pinned clusters and their current positioning
        if let Some(current) = app.frame.as_ref() {
            for cluster in &current.clusters {
                let Some(positioning) = cluster.positioning else {
                    continue;
                };
                let (label, color) = match positioning {
                    Positioning::Sticky { .. } => ("sticky", theme.pinned),
                    Positioning::Absolute { .. } => ("absolute", theme.released),
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", cluster.id), Style::default().fg(theme.fg0)),
                    Span::styled(label, Style::default().fg(color)),
                ])));
            }
        }

        frame.render_widget(List::new(items).block(block), area);
    }
}

/// Text gauge for a progress value in [0, 1]
fn gauge(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(GAUGE_WIDTH - filled),
        progress * 100.0
    )
}
