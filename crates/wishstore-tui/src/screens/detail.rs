//! Detail view over one resolved entity. Rebinds on its update event.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use wishstore_core::{DetailViewModel, EventBus, PreviousState};

use crate::record::Record;
use crate::theme;

pub struct DetailScreen<T: Record> {
    vm: DetailViewModel<T>,
}

impl<T: Record> DetailScreen<T> {
    pub fn new(entity: T, previous_state: PreviousState, bus: &EventBus) -> Self {
        Self {
            vm: DetailViewModel::new(entity, previous_state, bus),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.vm.current().id()
    }

    /// Where Back leads.
    pub fn previous_state(&self) -> &PreviousState {
        self.vm.previous_state()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let entity = self.vm.current();
        let block = Block::default()
            .title(format!(" {} {} ", T::TITLE, entity.label()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let rows = entity.detail_rows();
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 4;
        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {}", T::TITLE),
                theme::brand(),
            )),
            Line::from(Span::styled(
                " ─────────────────────────────────────────",
                theme::rule(),
            )),
        ];
        lines.extend(rows.into_iter().map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("  {key:<width$}"), theme::label()),
                Span::styled(value, theme::value()),
            ])
        }));
        frame.render_widget(Paragraph::new(lines), layout[0]);

        let hints = Line::from(vec![
            Span::styled("  e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled(
                format!("back to {}", self.previous_state().url),
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

impl<T: Record> Drop for DetailScreen<T> {
    fn drop(&mut self) {
        self.vm.destroy();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wishstore_core::{Entity, Wishlist};

    use super::*;

    #[test]
    fn detail_follows_update_events_until_dropped() {
        let bus = EventBus::new("storeApp");
        let mut original = Wishlist::blank();
        original.id = Some(3);
        original.name = Some("Books".into());

        let detail = DetailScreen::new(original.clone(), PreviousState::default(), &bus);
        let topic = bus.topic::<Wishlist>();
        assert_eq!(bus.listener_count(&topic), 1);

        let mut renamed = original;
        renamed.name = Some("Novels".into());
        bus.publish(&renamed);
        assert_eq!(detail.vm.current().name.as_deref(), Some("Novels"));

        drop(detail);
        assert_eq!(bus.listener_count(&topic), 0);
    }
}
