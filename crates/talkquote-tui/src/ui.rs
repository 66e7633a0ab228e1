use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use talkquote_core::{Category, ConfigField, NotificationKind};
use crate::app::{App, EditTarget, FocusPane, InputMode};

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", title))
}

/// Mask a secret, keeping its length visible
fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    let [left_area, quote_area] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(body_area);

    let [config_area, custom_area] = Layout::vertical([
        Constraint::Length(ConfigField::all().len() as u16 * 2 + 2),
        Constraint::Min(0),
    ])
    .areas(left_area);

    render_config_form(app, frame, config_area);
    render_custom_quotes(app, frame, custom_area);
    render_quote_panel(app, frame, quote_area);
    render_footer(app, frame, footer_area);
    render_toast(app, frame, body_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Nextcloud Talk ", Style::default().fg(Color::White).bold()),
        Span::styled("Quote Bot", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_config_form(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Config;
    let block = pane_block("Nextcloud Configuration", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = app.selected_config_field();
    let config = app.session.config();
    let mut lines = Vec::new();
    let mut cursor = None;

    for (row, field) in ConfigField::all().into_iter().enumerate() {
        let is_selected = focused && field == selected;
        let editing = app.edit_target == Some(EditTarget::Config(field));
        let label_style = if is_selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        let value = config.get(field);
        let value_line = if value.is_empty() && !editing {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else if field.is_secret() {
            Span::styled(mask(value), Style::default().fg(Color::Cyan))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::Cyan))
        };
        lines.push(Line::from(vec![Span::raw("  "), value_line]));

        if editing {
            let x = inner.x + 2 + app.edit_cursor.min(inner.width.saturating_sub(3) as usize) as u16;
            cursor = Some((x, inner.y + row as u16 * 2 + 1));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

fn render_custom_quotes(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Custom;
    let block = pane_block("Custom Quotes", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, list_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .areas(inner);

    // Add form
    let inputs = [
        (EditTarget::CustomQuote, "Quote", &app.custom_quote_input, "The best way to predict the future is to invent it."),
        (EditTarget::CustomAuthor, "Author", &app.custom_author_input, "Alan Kay"),
    ];
    let mut lines = Vec::new();
    let mut cursor = None;
    for (row, (target, label, value, placeholder)) in inputs.iter().enumerate() {
        let editing = app.edit_target == Some(*target);
        let label_style = if editing {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_span = if value.is_empty() && !editing {
            Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::Cyan))
        };
        let prefix = format!("{:<7} ", label);
        if editing {
            let offset = prefix.chars().count() + app.edit_cursor;
            let x = form_area.x + offset.min(form_area.width.saturating_sub(1) as usize) as u16;
            cursor = Some((x, form_area.y + row as u16));
        }
        lines.push(Line::from(vec![Span::styled(prefix, label_style), value_span]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "a: add custom quote",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines), form_area);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }

    // Saved list
    let quotes = app.session.custom_quotes();
    if quotes.is_empty() {
        let empty = Paragraph::new("No custom quotes yet.")
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
        frame.render_widget(empty, list_area);
        return;
    }

    let items: Vec<ListItem> = quotes
        .iter()
        .map(|q| {
            ListItem::new(Text::from(vec![
                Line::from(format!("\"{}\"", q.quote)),
                Line::from(Span::styled(format!("  - {}", q.author), Style::default().fg(Color::DarkGray))),
            ]))
        })
        .collect();

    let highlight = if focused {
        Style::default().bg(Color::Cyan).fg(Color::Black)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items).highlight_style(highlight).highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut app.custom_state);
}

fn render_quote_panel(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Quote;
    let block = pane_block("Quote of the Day", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [category_area, quote_area, status_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(inner);

    // Category selector
    let current = app.session.category();
    let mut spans = vec![Span::styled("Category: ", Style::default().fg(Color::Gray))];
    for category in Category::all() {
        let style = if category == current {
            Style::default().bg(Color::Cyan).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", category.display_name()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), category_area);

    // Quote display
    let dots = ".".repeat(app.animation_frame as usize + 1);
    let body = if app.session.is_generating() {
        Text::from(Line::from(Span::styled(
            format!("Generating{}", dots),
            Style::default().fg(Color::Yellow),
        )))
    } else if let Some(quote) = app.session.current_quote() {
        Text::from(vec![
            Line::from(Span::styled(
                format!("\u{201c}{}\u{201d}", quote.quote),
                Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("- {}", quote.author),
                Style::default().fg(Color::Cyan).bold(),
            )),
        ])
    } else {
        Text::from(Line::from(Span::styled(
            "Generate a quote or select a custom one to get started.",
            Style::default().fg(Color::DarkGray),
        )))
    };
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }), quote_area);

    // Action status
    let generate_label = if app.session.is_generating() { "Generating..." } else { "Generate Quote" };
    let post_label = if app.session.is_posting() {
        format!("Posting{}", dots)
    } else {
        "Post to Nextcloud Talk".to_string()
    };
    let can_post = app.session.current_quote().is_some() && !app.session.is_posting();
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let status = Line::from(vec![
        Span::styled(" g ", key_style),
        Span::raw(format!(" {}  ", generate_label)),
        Span::styled(" p ", key_style),
        Span::styled(
            format!(" {}", post_label),
            if can_post { Style::default().fg(Color::Green) } else { Style::default().fg(Color::DarkGray) },
        ),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = match (app.input_mode, app.focus) {
        (InputMode::Editing, _) => vec![("Enter", "next"), ("Esc", "done")],
        (InputMode::Normal, FocusPane::Config) => {
            vec![("j/k", "field"), ("Enter", "edit"), ("x", "clear")]
        }
        (InputMode::Normal, FocusPane::Quote) => vec![("Enter", "generate"), ("l", "category")],
        (InputMode::Normal, FocusPane::Custom) => {
            vec![("j/k", "nav"), ("a", "add"), ("Enter", "use"), ("d", "delete")]
        }
    };

    let mut hints = vec![Span::styled(mode_text, mode_style)];
    for (key, label) in pairs {
        hints.push(Span::styled(format!(" {} ", key), key_style));
        hints.push(Span::styled(format!(" {} ", label), label_style));
    }
    if app.input_mode == InputMode::Normal {
        for (key, label) in [("g", "generate"), ("p", "post"), ("c", "category"), ("Tab", "focus"), ("q", "quit")] {
            hints.push(Span::styled(format!(" {} ", key), key_style));
            hints.push(Span::styled(format!(" {} ", label), label_style));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_toast(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notification) = app.session.notification() else {
        return;
    };

    let width = (notification.message.chars().count() as u16 + 4)
        .min(60)
        .min(area.width.saturating_sub(2));
    let inner_width = width.saturating_sub(2).max(1);
    let lines = (notification.message.chars().count() as u16 / inner_width) + 1;
    let height = (lines + 2).min(area.height);

    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    );

    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(notification.message.as_str())
        .style(Style::default().bg(color).fg(Color::White).bold())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color).bg(color)))
        .wrap(Wrap { trim: true });
    frame.render_widget(toast, toast_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_length() {
        assert_eq!(mask("pass"), "••••");
        assert_eq!(mask(""), "");
    }
}
