//! Entity table: the full collection with a movable selection.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use wishstore_core::{CoreError, ListViewModel};

use crate::record::Record;
use crate::theme;

pub struct ListScreen<T: Record> {
    vm: ListViewModel<T>,
    table_state: TableState,
    loaded: bool,
}

impl<T: Record> ListScreen<T> {
    pub fn new() -> Self {
        Self {
            vm: ListViewModel::new(),
            table_state: TableState::default(),
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn begin_load(&mut self) {
        self.vm.begin_load();
    }

    /// Apply a fetch result, keeping the selection on the same row index.
    pub fn apply(&mut self, result: Result<Vec<T>, CoreError>) {
        self.vm.apply(result);
        self.loaded = true;
        let len = self.vm.items().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(idx) if idx >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.vm.items().get(self.table_state.selected()?)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.vm.items().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.vm.items().is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.vm.items().len();
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let count = self.vm.items().len();
        let block = Block::default()
            .title(format!(" {} ({count}) ", T::PLURAL))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if let Some(err) = self.vm.error() {
            let line = Line::from(Span::styled(format!("  {err}"), theme::error_text()));
            frame.render_widget(Paragraph::new(line), layout[0]);
        } else if self.vm.is_loading() && count == 0 {
            let line = Line::from(Span::styled("  Loading...", theme::key_hint()));
            frame.render_widget(Paragraph::new(line), layout[0]);
        } else if count == 0 {
            let line = Line::from(Span::styled(
                format!("  No {} found", T::PLURAL.to_lowercase()),
                theme::key_hint(),
            ));
            frame.render_widget(Paragraph::new(line), layout[0]);
        } else {
            let header = Row::new(
                T::COLUMNS
                    .iter()
                    .map(|(name, _)| Cell::from(*name).style(theme::table_header())),
            );
            let rows = self
                .vm
                .items()
                .iter()
                .map(|item| Row::new(item.cells()).style(theme::table_row()));
            let widths = T::COLUMNS.iter().map(|(_, w)| Constraint::Min(*w));

            let table = Table::new(rows, widths)
                .header(header)
                .row_highlight_style(theme::table_selected())
                .highlight_symbol("▸ ");

            let mut state = self.table_state.clone();
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        let hints = Line::from(vec![
            Span::styled("  Enter ", theme::key_hint_key()),
            Span::styled("view  ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("new  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reload", theme::key_hint()),
            Span::styled(
                if self.vm.is_loading() { "  ◐" } else { "" },
                theme::pending(),
            ),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}
