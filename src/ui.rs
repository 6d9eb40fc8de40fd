pub mod header;
pub mod highlight;
pub mod list;
pub mod modal;
pub mod search_prompt;
pub mod spinner;
pub mod status_line;
pub mod text_input;
pub mod viewport;
pub mod yank;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use header::Header;
pub use list::{Table, TableEvent, YankMode};
pub use modal::{InputModal, ModalEvent, ModalKind, ModalState, SelectModal};
pub use search_prompt::{SearchEvent, SearchPrompt};
pub use spinner::Spinner;
pub use status_line::Keybinding;
pub use viewport::{Viewport, ViewportEvent};

/// What a component did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Not handled; the caller may try something else.
    Ignored,
    /// Handled without anything for the caller to do.
    Consumed,
    /// Handled and produced an event for the caller.
    Event(E),
}

impl<E> EventResult<E> {
    /// True unless the key was ignored.
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Transform the carried event, keeping `Ignored` and `Consumed` as is.
    pub fn map<F, T>(self, f: F) -> EventResult<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Ignored => EventResult::Ignored,
            Self::Consumed => EventResult::Consumed,
            Self::Event(e) => EventResult::Event(f(e)),
        }
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
///
/// Components know nothing about Alibaba Cloud: pages wrap them and turn
/// their outputs into page events.
pub trait Component {
    /// The output type produced by this component.
    type Output;

    /// Keys the component does not know come back as `Ignored`.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Animation step; ticks arrive a few times per second.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_result_map_keeps_consumption() {
        let ignored: EventResult<u8> = EventResult::Ignored;
        assert!(!ignored.map(u16::from).is_consumed());
        assert!(EventResult::<u8>::Consumed.map(u16::from).is_consumed());
        assert_eq!(EventResult::from(7u8).map(u16::from), EventResult::Event(7u16));
    }
}
