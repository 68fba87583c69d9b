use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::surface::{FOOTER_ROWS, HEADER_ROWS, HelpOverlay, STATUS_ROWS, Screen};

/// Columns left free on each side of the help window, in total.
const HELP_MARGIN: u16 = 15;

pub(crate) fn draw(f: &mut Frame, screen: &Screen) {
    let [header, main, footer, status] = Layout::vertical([
        Constraint::Length(HEADER_ROWS),
        Constraint::Min(0),
        Constraint::Length(FOOTER_ROWS),
        Constraint::Length(STATUS_ROWS),
    ])
    .areas(f.area());

    f.render_widget(&screen.header, header);
    f.render_widget(&screen.main, main);
    f.render_widget(&screen.footer, footer);
    f.render_widget(
        Paragraph::new(Line::from(screen.status.as_str()))
            .style(Style::default().fg(Color::DarkGray)),
        status,
    );

    if let Some(help) = screen.help.as_ref() {
        draw_help(f, help);
    }
}

fn draw_help(f: &mut Frame, help: &HelpOverlay) {
    let rows = u16::try_from(help.lines.len()).unwrap_or(u16::MAX);
    let area = help_rect(f.area(), rows.saturating_add(2));
    f.render_widget(Clear, area);

    let key_width = help
        .lines
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = help
        .lines
        .iter()
        .map(|(key, text)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<key_width$}  "),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(text.as_str()),
            ])
        })
        .collect();
    let block = modal_block(&help.title);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::REVERSED),
        ))
}

fn help_rect(r: Rect, height: u16) -> Rect {
    let width = r.width.saturating_sub(HELP_MARGIN).max(r.width.min(20));
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
