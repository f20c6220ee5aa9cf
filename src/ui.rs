// src/ui.rs
use crate::app::App;
use crate::display::{LaneDisplayState, PostEntry, sanitize};
use crate::manager::Lane;
use crate::render::EMPTY_NOTICE;
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::rc::Rc;

const HINT_TEXT: &str =
    "[a] Add | [r] Refresh | [R] Refresh all | [d] Delete | [←/→] Lane | [↑/↓] Post | [o] Open | [q] Quit";

pub struct LayoutChunks {
    pub title_chunk: Rect,
    pub lanes_chunk: Rect,
    pub hint_chunk: Rect,
}

pub fn compute_layout(frame_size: Rect) -> LayoutChunks {
    let main_chunks: Rc<[Rect]> = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(frame_size);

    LayoutChunks {
        title_chunk: main_chunks[0],
        lanes_chunk: main_chunks[1],
        hint_chunk: main_chunks[2],
    }
}

/// Splits the lane area into equal columns, one per lane.
pub fn lane_columns(area: Rect, count: usize) -> Rc<[Rect]> {
    let count = u32::try_from(count.max(1)).unwrap_or(u32::MAX);
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area)
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = u16::try_from(u32::from(area.width) * u32::from(width_percent) / 100)
        .unwrap_or(area.width);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}

fn post_item(entry: &PostEntry) -> ListItem<'static> {
    let headline = Line::from(vec![
        Span::styled(format!("▲ {:>5} ", entry.score), Style::default().fg(Color::LightRed)),
        Span::styled(entry.title.clone(), Style::default().fg(Color::White)),
    ]);
    let meta = Line::from(Span::styled(
        format!("        by {} • {} comments", entry.author, entry.num_comments),
        Style::default().fg(Color::DarkGray),
    ));
    ListItem::new(vec![headline, meta])
}

fn lane_title(lane: &Lane) -> String {
    let name = sanitize(lane.id().as_str());
    match lane.refreshed_at() {
        Some(at) => format!(" r/{} · {} ", name, at.with_timezone(&Local).format("%H:%M")),
        None => format!(" r/{} ", name),
    }
}

fn draw_lane(f: &mut Frame, lane: &Lane, area: Rect, focused: bool, selected: Option<usize>) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let block = Block::default().title(lane_title(lane)).borders(Borders::ALL).border_style(border_style);

    match lane.view().state() {
        LaneDisplayState::Idle | LaneDisplayState::Loading => {
            let loader = Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray)).block(block);
            f.render_widget(loader, area);
        }
        LaneDisplayState::Empty => {
            f.render_widget(Paragraph::new(EMPTY_NOTICE).block(block), area);
        }
        LaneDisplayState::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(error, area);
        }
        LaneDisplayState::Populated(entries) => {
            let items: Vec<ListItem> = entries.iter().map(post_item).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .highlight_symbol(if focused { ">" } else { " " });
            let mut state = ListState::default();
            if focused {
                state.select(selected.map(|i| i.min(entries.len().saturating_sub(1))));
            }
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn draw_modal(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(50, 5, area);
    let footer = if app.add_flow.is_pending() {
        Line::from(Span::styled("Checking...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(Span::styled("[Enter] Add | [Esc] Cancel", Style::default().fg(Color::DarkGray)))
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("r/", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}_", sanitize(app.add_flow.input()))),
        ]),
        Line::from(""),
        footer,
    ];
    let modal = Paragraph::new(lines).block(
        Block::default()
            .title(" Add subreddit ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(modal, popup);
}

pub fn ui(f: &mut Frame, app: &App) {
    let layout_chunks: LayoutChunks = compute_layout(f.size());

    let title = Paragraph::new(Line::from(Span::styled(
        "redlanes",
        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, layout_chunks.title_chunk);

    let lanes = app.manager.regions();
    if lanes.is_empty() {
        let placeholder = Paragraph::new("No lanes. Press [a] to add a subreddit.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(placeholder, layout_chunks.lanes_chunk);
    } else {
        let columns = lane_columns(layout_chunks.lanes_chunk, lanes.len());
        for (i, (lane, area)) in lanes.iter().zip(columns.iter()).enumerate() {
            let focused = i == app.focused_lane;
            draw_lane(f, lane, *area, focused, app.selected_post);
        }
    }

    // Notices take over the hint bar until the next key press
    let hint_widget = match &app.notice {
        Some(notice) => Paragraph::new(sanitize(notice)).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(HINT_TEXT).style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(hint_widget.alignment(Alignment::Center), layout_chunks.hint_chunk);

    if app.add_flow.is_open() {
        draw_modal(f, app, layout_chunks.lanes_chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_split_evenly() {
        let area = Rect::new(0, 0, 90, 20);
        let columns = lane_columns(area, 3);
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|c| c.width == 30));
    }

    #[test]
    fn modal_is_centered() {
        let popup = centered_rect(50, 5, Rect::new(0, 0, 100, 21));
        assert_eq!(popup, Rect::new(25, 8, 50, 5));
    }
}
