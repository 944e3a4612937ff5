use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField, RecoveryStep, RegisterField},
    ui::{components::centered_box, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = centered_box(40, 7, area);
    frame.render_widget(Clear, card_area);

    let block = form_block(" tally · login ", theme);
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Username
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Password
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;
    render_input(
        frame,
        rows[0],
        "user",
        &login.username,
        false,
        login.focus == LoginField::Username,
        theme,
    );
    render_input(
        frame,
        rows[2],
        "pass",
        &login.password,
        true,
        login.focus == LoginField::Password,
        theme,
    );

    let status = if login.pending {
        Some(Span::styled("Signing in…", Style::default().fg(theme.dim)))
    } else {
        login
            .message
            .as_deref()
            .map(|message| Span::styled(message.to_string(), Style::default().fg(theme.error)))
    };
    render_below(frame, card_area, area, status, theme, "Enter sign in · Ctrl+R register · Ctrl+F forgot password · Esc quit");
}

pub fn render_register(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let height = RegisterField::ALL.len() as u16 * 2 + 3;
    let card_area = centered_box(56, height, area);
    frame.render_widget(Clear, card_area);

    let block = form_block(" tally · register ", theme);
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); RegisterField::ALL.len()])
        .margin(1)
        .split(inner);

    let register = &state.register;
    for (row, field) in rows.iter().zip(RegisterField::ALL) {
        render_input(
            frame,
            *row,
            field.label(),
            register.value(field),
            field.is_secret(),
            register.focus == field,
            theme,
        );
    }

    let status = register
        .message
        .as_deref()
        .map(|message| Span::styled(message.to_string(), Style::default().fg(theme.error)));
    render_below(frame, card_area, area, status, theme, "Tab next · Enter create · Esc back");
}

pub fn render_recovery(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let recovery = &state.recovery;
    let card_area = centered_box(56, 9, area);
    frame.render_widget(Clear, card_area);

    let title = format!(" tally · reset password · step {} of 3 ", recovery.step.number());
    let block = form_block(&title, theme);
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    match recovery.step {
        RecoveryStep::Username => {
            render_input(frame, rows[0], "user", &recovery.username, false, true, theme);
        }
        RecoveryStep::Answer => {
            let question = Line::from(vec![
                Span::styled("question: ", Style::default().fg(theme.dim)),
                Span::styled(recovery.question.as_str(), Style::default().fg(theme.text)),
            ]);
            frame.render_widget(Paragraph::new(question), rows[0]);
            render_input(frame, rows[2], "answer", &recovery.answer, false, true, theme);
        }
        RecoveryStep::NewPassword => {
            render_input(
                frame,
                rows[0],
                "new password",
                &recovery.new_password,
                true,
                !recovery.confirm_focused,
                theme,
            );
            render_input(
                frame,
                rows[2],
                "confirm",
                &recovery.confirm,
                true,
                recovery.confirm_focused,
                theme,
            );
        }
    }

    let status = if recovery.pending {
        Some(Span::styled("Verifying…", Style::default().fg(theme.dim)))
    } else {
        recovery
            .message
            .as_deref()
            .map(|message| Span::styled(message.to_string(), Style::default().fg(theme.error)))
    };
    render_below(frame, card_area, area, status, theme, "Enter continue · Tab next · Esc back to login");
}

fn form_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface_bright))
}

/// Status line and key hints under the form box.
fn render_below(
    frame: &mut Frame<'_>,
    card_area: Rect,
    area: Rect,
    status: Option<Span<'static>>,
    theme: &Theme,
    hint: &'static str,
) {
    let y = card_area.y + card_area.height + 1;
    if y + 2 > area.y + area.height {
        return;
    }
    let lines = vec![
        Line::from(status.unwrap_or_default()),
        Line::from(Span::styled(hint, Style::default().fg(theme.dim))),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 2,
        },
    );
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_secret: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let shown = if is_secret {
        mask(value)
    } else {
        value.to_string()
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.dim)),
        Span::styled(format!("{shown}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One bullet per character.
fn mask(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_counts_characters() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("pä55"), "••••");
    }
}
