//! Create/edit overlay driving a [`DialogViewModel`].
//!
//! Text fields are edited as strings and parsed into the draft on submit.
//! Toggles and the owner selector write to the draft directly.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use wishstore_core::{CoreError, DialogViewModel, Entity, EventBus, Owned, SaveCommand};

use crate::record::{FieldKind, Record};
use crate::theme;

/// What a key press asks of the panel hosting the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Handled,
    Submit,
    Dismiss,
}

pub struct FormOverlay<T: Record> {
    dialog: DialogViewModel<T>,
    buffers: Vec<String>,
    field_idx: usize,
    input_error: Option<String>,
    ticket: u64,
}

impl<T: Record> FormOverlay<T> {
    pub fn new(entity: T, ticket: u64) -> Self {
        let buffers = T::FIELDS
            .iter()
            .enumerate()
            .map(|(idx, field)| match field.kind {
                FieldKind::Text => entity.field_text(idx),
                FieldKind::Toggle | FieldKind::Owner => String::new(),
            })
            .collect();
        Self {
            dialog: DialogViewModel::new(entity),
            buffers,
            field_idx: 0,
            input_error: None,
            ticket,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    #[cfg(test)]
    pub fn dialog(&self) -> &DialogViewModel<T> {
        &self.dialog
    }

    pub fn set_owners(&mut self, owners: &[T::Owner]) {
        self.dialog.set_owner_options(owners);
    }

    fn kind(&self) -> FieldKind {
        T::FIELDS
            .get(self.field_idx)
            .map_or(FieldKind::Text, |f| f.kind)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Esc => return FormInput::Dismiss,
            KeyCode::Enter => return FormInput::Submit,
            _ => {}
        }
        if self.dialog.is_saving() {
            return FormInput::Handled;
        }

        let count = T::FIELDS.len();
        match (key.code, self.kind()) {
            (KeyCode::Tab | KeyCode::Down, _) => self.field_idx = (self.field_idx + 1) % count,
            (KeyCode::BackTab | KeyCode::Up, _) => {
                self.field_idx = (self.field_idx + count - 1) % count;
            }
            (KeyCode::Char(' '), FieldKind::Toggle) => {
                let idx = self.field_idx;
                if let Some(draft) = self.dialog.draft_mut() {
                    draft.toggle(idx);
                }
            }
            (KeyCode::Char(' ') | KeyCode::Right, FieldKind::Owner) => self.cycle_owner(true),
            (KeyCode::Left, FieldKind::Owner) => self.cycle_owner(false),
            (KeyCode::Char(ch), FieldKind::Text) => {
                if let Some(buf) = self.buffers.get_mut(self.field_idx) {
                    buf.push(ch);
                }
            }
            (KeyCode::Backspace, FieldKind::Text) => {
                if let Some(buf) = self.buffers.get_mut(self.field_idx) {
                    buf.pop();
                }
            }
            _ => {}
        }
        FormInput::Handled
    }

    /// Step through the owner options; the slot after the last one is "none".
    fn cycle_owner(&mut self, forward: bool) {
        let len = self.dialog.owner_options().len();
        if len == 0 {
            return;
        }
        let slots = len + 1;
        let current = self.dialog.selected_owner().unwrap_or(len);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        let id = self.dialog.owner_options().get(next).map(|o| o.id);
        self.dialog.select_owner(id);
    }

    /// Copy the text fields into the draft and start the save.
    ///
    /// `None` when a field does not parse, validation fails, or a save is
    /// already in flight; the reason is kept for rendering.
    pub fn submit(&mut self) -> Option<SaveCommand<T>> {
        if let Some(draft) = self.dialog.draft_mut() {
            for (idx, field) in T::FIELDS.iter().enumerate() {
                if field.kind != FieldKind::Text {
                    continue;
                }
                let raw = self.buffers.get(idx).map_or("", String::as_str);
                if let Err(reason) = draft.apply_text(idx, raw) {
                    self.input_error = Some(format!("{}: {reason}", field.label));
                    self.field_idx = idx;
                    return None;
                }
            }
        }
        self.input_error = None;

        match self.dialog.begin_submit() {
            Ok(command) => command,
            Err(err) => {
                self.input_error = Some(err.to_string());
                None
            }
        }
    }

    /// Apply the save result. Returns true once the dialog has closed.
    pub fn finish(&mut self, result: Result<T, CoreError>, bus: &EventBus) -> bool {
        self.dialog.finish(result, bus);
        self.dialog.is_closed()
    }

    pub fn dismiss(&mut self) {
        self.dialog.dismiss();
    }

    fn owner_text(&self) -> String {
        let options = self.dialog.owner_options();
        match self.dialog.selected_owner().and_then(|i| options.get(i)) {
            Some(option) => option.label.clone(),
            None => match self.dialog.draft().owner_id() {
                Some(id) if options.is_empty() => format!("#{id}"),
                _ => "-".into(),
            },
        }
    }

    fn display_value(&self, idx: usize, kind: FieldKind) -> String {
        match kind {
            FieldKind::Text => self.buffers.get(idx).cloned().unwrap_or_default(),
            FieldKind::Toggle => self.dialog.draft().field_text(idx),
            FieldKind::Owner => self.owner_text(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let field_count = T::FIELDS.len() as u16;
        let overlay_w = 56u16.min(area.width.saturating_sub(4));
        let overlay_h = (field_count + 7).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay_area);

        let title = match self.dialog.draft().id() {
            Some(id) => format!(" Edit {} {id} ", T::TITLE),
            None => format!(" Create a new {} ", T::TITLE),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::form_title())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme::form_border());

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let focused_label = theme::focused_label();
        let field_errors = self.dialog.field_errors();

        let mut lines = Vec::new();
        for (idx, field) in T::FIELDS.iter().enumerate() {
            let is_focused = idx == self.field_idx;
            let lbl_style = if is_focused { focused_label } else { theme::label() };
            let marker = if is_focused { "▸ " } else { "  " };
            let cursor = if is_focused && field.kind == FieldKind::Text { "▎" } else { "" };
            let invalid = field_errors.iter().any(|e| e.field == field.key);

            lines.push(Line::from(vec![
                Span::styled(marker, lbl_style),
                Span::styled(format!("{:<12}", field.label), lbl_style),
                Span::styled(
                    self.display_value(idx, field.kind),
                    if invalid { theme::error_text() } else { theme::value() },
                ),
                Span::styled(cursor, theme::pending()),
            ]));
        }

        lines.push(Line::from(""));
        let status = if self.dialog.is_saving() {
            Some(Span::styled(" Saving...", theme::pending()))
        } else if let Some(reason) = &self.input_error {
            Some(Span::styled(format!(" {reason}"), theme::error_text()))
        } else {
            self.dialog
                .last_error()
                .map(|err| Span::styled(format!(" {err}"), theme::error_text()))
        };
        lines.push(status.map_or_else(|| Line::from(""), Line::from));

        lines.push(Line::from(vec![
            Span::styled(" Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("Space", theme::key_hint_key()),
            Span::styled(" toggle/pick  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
