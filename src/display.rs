// src/display.rs
use crate::feed::PostSummary;

/// One rendered post. Text fields are already sanitized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEntry {
    pub score: i64,
    pub title: String,
    pub author: String,
    pub num_comments: u64,
    pub url: String,
}

impl PostEntry {
    pub fn from_post(post: &PostSummary) -> Self {
        Self {
            score: post.score(),
            title: sanitize(post.title()),
            author: sanitize(post.author()),
            num_comments: post.num_comments(),
            url: post.url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneStatus {
    Loading,
    Empty,
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LaneDisplayState {
    #[default]
    Idle,
    Loading,
    Populated(Vec<PostEntry>),
    Empty,
    Error(String),
}

/// A place a lane can draw into.
pub trait DisplayRegion {
    fn clear(&mut self);
    fn append_item(&mut self, entry: PostEntry);
    fn set_status(&mut self, status: LaneStatus);
}

/// Headless region; the terminal UI draws whatever state it holds.
#[derive(Debug, Default, Clone)]
pub struct LaneView {
    state: LaneDisplayState,
}

impl LaneView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LaneDisplayState {
        &self.state
    }

    pub fn entries(&self) -> &[PostEntry] {
        match &self.state {
            LaneDisplayState::Populated(entries) => entries,
            _ => &[],
        }
    }
}

impl DisplayRegion for LaneView {
    fn clear(&mut self) {
        self.state = LaneDisplayState::Idle;
    }

    fn append_item(&mut self, entry: PostEntry) {
        match &mut self.state {
            LaneDisplayState::Populated(entries) => entries.push(entry),
            other => *other = LaneDisplayState::Populated(vec![entry]),
        }
    }

    fn set_status(&mut self, status: LaneStatus) {
        self.state = match status {
            LaneStatus::Loading => LaneDisplayState::Loading,
            LaneStatus::Empty => LaneDisplayState::Empty,
            LaneStatus::Error(message) => LaneDisplayState::Error(message),
        };
    }
}

/// Escapes fetched text for the terminal: control characters (ESC included)
/// are shown as their `\u{..}` escape so they can never reach the terminal raw.
/// Newlines and tabs collapse to a space.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_markup_literal() {
        assert_eq!(sanitize("<script>alert(1)</script>"), "<script>alert(1)</script>");
        assert_eq!(sanitize("Tom & Jerry"), "Tom & Jerry");
    }

    #[test]
    fn sanitize_neutralizes_terminal_escapes() {
        let cleaned = sanitize("red\u{1b}[31mtext\u{7}\nnext");
        assert!(!cleaned.contains('\u{1b}'));
        assert!(!cleaned.contains('\u{7}'));
        assert_eq!(cleaned, "red\\u{1b}[31mtext\\u{7} next");
    }

    #[test]
    fn view_tracks_region_calls() {
        let mut view = LaneView::new();
        view.set_status(LaneStatus::Loading);
        assert_eq!(view.state(), &LaneDisplayState::Loading);

        view.clear();
        let entry = PostEntry {
            score: 1,
            title: "t".to_string(),
            author: "a".to_string(),
            num_comments: 0,
            url: "https://reddit.com/x".to_string(),
        };
        view.append_item(entry.clone());
        view.append_item(entry);
        assert_eq!(view.entries().len(), 2);

        view.set_status(LaneStatus::Error("boom".to_string()));
        assert!(view.entries().is_empty());
    }
}
