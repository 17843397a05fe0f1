//! Delete confirmation overlay.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use wishstore_core::{CoreError, DeleteViewModel, Entity, ModalOutcome};

use crate::theme;

pub struct DeleteOverlay<T: Entity> {
    vm: DeleteViewModel<T>,
    ticket: u64,
}

impl<T: Entity> DeleteOverlay<T> {
    pub fn new(entity: T, ticket: u64) -> Self {
        Self {
            vm: DeleteViewModel::new(entity),
            ticket,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Id to delete, if the delete may start now.
    pub fn begin(&mut self) -> Option<i64> {
        let id = self.vm.entity().id()?;
        self.vm.begin_delete().then_some(id)
    }

    /// Apply the server result. Returns true once the entity is gone.
    pub fn finish(&mut self, result: Result<(), CoreError>) -> bool {
        self.vm.finish(result);
        self.vm.outcome().is_some_and(ModalOutcome::is_closed)
    }

    pub fn cancel(&mut self) {
        self.vm.clear();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let overlay_w = 52u16.min(area.width.saturating_sub(4));
        let overlay_h = 7u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .title(" Confirm delete operation ")
            .title_style(theme::destructive())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme::destructive());

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let entity = self.vm.entity();
        let id = entity.id().map_or_else(|| "?".into(), |id| id.to_string());
        let mut lines = vec![
            Line::from(Span::styled(
                format!(" Are you sure you want to delete {} {id}?", T::TITLE),
                theme::value(),
            )),
            Line::from(""),
        ];

        if self.vm.is_deleting() {
            lines.push(Line::from(Span::styled(
                " Deleting...",
                theme::pending(),
            )));
        } else if let Some(err) = self.vm.last_error() {
            lines.push(Line::from(Span::styled(format!(" {err}"), theme::error_text())));
        } else {
            lines.push(Line::from(vec![
                Span::styled(" y", theme::key_hint_key()),
                Span::styled(" delete  ", theme::key_hint()),
                Span::styled("n/Esc", theme::key_hint_key()),
                Span::styled(" cancel", theme::key_hint()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use wishstore_core::{Entity, Wish};

    use super::*;

    fn wish(id: i64) -> Wish {
        let mut wish = Wish::blank();
        wish.id = Some(id);
        wish
    }

    #[test]
    fn second_confirm_is_refused_while_deleting() {
        let mut overlay = DeleteOverlay::new(wish(4), 1);
        assert_eq!(overlay.begin(), Some(4));
        assert_eq!(overlay.begin(), None);
        assert!(overlay.finish(Ok(())));
    }

    #[test]
    fn failed_delete_stays_open_for_retry() {
        let mut overlay = DeleteOverlay::new(wish(4), 1);
        overlay.begin();
        let err = CoreError::InvalidTransition {
            message: "boom".into(),
        };
        assert!(!overlay.finish(Err(err)));
        assert_eq!(overlay.begin(), Some(4));
    }

    #[test]
    fn unsaved_entity_cannot_be_deleted() {
        let mut overlay = DeleteOverlay::new(Wish::blank(), 1);
        assert_eq!(overlay.begin(), None);
    }
}
