use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::theme::Theme;

const MAX_VISIBLE: usize = 4;
const WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn duration(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(3),
            Self::Warning => Duration::from_secs(5),
            Self::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: Option<String>,
    pub message: String,
    pub level: ToastLevel,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Toasts on screen, newest last.
#[derive(Debug, Default)]
pub struct ToastStack {
    entries: Vec<(Toast, Instant)>,
}

impl ToastStack {
    pub fn push(&mut self, toast: Toast, now: Instant) {
        let expires_at = now + toast.level.duration();
        self.entries.push((toast, expires_at));
    }

    pub fn expire(&mut self, now: Instant) {
        self.entries.retain(|(_, expires_at)| *expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.entries.iter().map(|(toast, _)| toast)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn render(frame: &mut Frame<'_>, area: Rect, toasts: &ToastStack, theme: &Theme) {
    let width = WIDTH.min(area.width);
    let mut bottom = area.y + area.height.saturating_sub(1);
    let skip = toasts.len().saturating_sub(MAX_VISIBLE);

    for toast in toasts.iter().skip(skip).collect::<Vec<_>>().into_iter().rev() {
        let text_width = usize::from(width.saturating_sub(2)).max(1);
        let lines = toast.message.chars().count().div_ceil(text_width).max(1) as u16;
        let height = lines + 2;
        if bottom < area.y + height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: bottom - height,
            width,
            height,
        };
        bottom = rect.y;

        let color = match toast.level {
            ToastLevel::Info => theme.text,
            ToastLevel::Success => theme.positive,
            ToastLevel::Warning => theme.warning,
            ToastLevel::Error => theme.error,
        };
        let style = Style::default().fg(color);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style);
        if let Some(title) = &toast.title {
            block = block.title(format!(" {title} "));
        }
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::from(toast.message.as_str()))
                .style(style)
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_by_level() {
        let start = Instant::now();
        let mut stack = ToastStack::default();
        stack.push(Toast::success("saved"), start);
        stack.push(Toast::error("failed"), start);

        stack.expire(start + Duration::from_secs(4));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.iter().next().unwrap().level, ToastLevel::Error);

        stack.expire(start + Duration::from_secs(6));
        assert!(stack.is_empty());
    }
}
