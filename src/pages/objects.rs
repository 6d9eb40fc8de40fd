//! OSS objects of one bucket, one marker page at a time.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::config::{KeyResolver, ResourceAction};
use crate::model::{ObjectPage, Payload};
use crate::nav::Page;
use crate::pages::PageEvent;
use crate::pages::resources::ResourceList;
use crate::ui::{Component, EventResult, Keybinding, Result};

/// Objects requested per page.
pub const OBJECT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next,
    Prev,
    First,
}

pub struct ObjectList {
    bucket: String,
    list: ResourceList,
    /// Markers of the pages before the current one, oldest first.
    history: Vec<Option<String>>,
    marker: Option<String>,
    next_marker: Option<String>,
    pending: Option<(Step, Option<String>)>,
    resolver: Arc<KeyResolver>,
}

impl ObjectList {
    pub fn new(bucket: impl Into<String>, page: ObjectPage, resolver: Arc<KeyResolver>) -> Self {
        let mut list = Self {
            bucket: bucket.into(),
            list: ResourceList::new(Page::OssObjects, Vec::new(), resolver.clone()),
            history: Vec::new(),
            marker: None,
            next_marker: None,
            pending: None,
            resolver,
        };
        list.show(page);
        list
    }

    #[cfg(test)]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// 1-based number of the page on screen.
    pub const fn page_number(&self) -> usize {
        self.history.len() + 1
    }

    pub const fn has_next(&self) -> bool {
        self.next_marker.is_some()
    }

    pub const fn list(&self) -> &ResourceList {
        &self.list
    }

    pub const fn list_mut(&mut self) -> &mut ResourceList {
        &mut self.list
    }

    fn show(&mut self, page: ObjectPage) {
        let payloads: Vec<Payload> = page.objects.into_iter().map(Payload::from).collect();
        self.list = ResourceList::new(Page::OssObjects, payloads, self.resolver.clone());
        self.next_marker = page.next_marker;
        let more = if self.has_next() { ", more" } else { "" };
        let title = format!(
            "{} [{}] page {}{more}",
            Page::OssObjects.title(),
            self.bucket,
            self.page_number()
        );
        self.list.table_mut().set_title(title);
    }

    fn request(&mut self, step: Step) -> EventResult<PageEvent> {
        let marker = match step {
            Step::Next => match &self.next_marker {
                Some(next) => Some(next.clone()),
                None => return EventResult::Consumed,
            },
            Step::Prev => match self.history.last() {
                Some(prev) => prev.clone(),
                None => return EventResult::Consumed,
            },
            Step::First => {
                if self.history.is_empty() {
                    return EventResult::Consumed;
                }
                None
            }
        };
        self.pending = Some((step, marker.clone()));
        PageEvent::LoadObjects { marker }.into()
    }

    /// Show a page fetched for the last paging request.
    pub fn apply(&mut self, page: ObjectPage) {
        match self.pending.take() {
            Some((Step::Next, marker)) => {
                let previous = std::mem::replace(&mut self.marker, marker);
                self.history.push(previous);
            }
            Some((Step::Prev, marker)) => {
                self.history.pop();
                self.marker = marker;
            }
            Some((Step::First, _)) => {
                self.history.clear();
                self.marker = None;
            }
            None => {}
        }
        self.show(page);
    }

    /// Forget a paging request whose fetch failed.
    pub fn abort(&mut self) {
        self.pending = None;
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut hints = self.list.hints();
        if self.has_next() {
            hints.push(Keybinding::new(r.display_resource(ResourceAction::NextPage), "Next page"));
        }
        if !self.history.is_empty() {
            hints.extend([
                Keybinding::new(r.display_resource(ResourceAction::PrevPage), "Prev page"),
                Keybinding::new(r.display_resource(ResourceAction::FirstPage), "First page"),
            ]);
        }
        hints
    }
}

impl Component for ObjectList {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = self.resolver.clone();
        if r.matches_resource(&key, ResourceAction::NextPage) {
            return Ok(self.request(Step::Next));
        }
        if r.matches_resource(&key, ResourceAction::PrevPage) {
            return Ok(self.request(Step::Prev));
        }
        if r.matches_resource(&key, ResourceAction::FirstPage) {
            return Ok(self.request(Step::First));
        }
        self.list.handle_key(key)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.list.render(frame, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectSummary;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn page(keys: &[&str], next: Option<&str>) -> ObjectPage {
        ObjectPage {
            objects: keys
                .iter()
                .map(|k| ObjectSummary {
                    key: (*k).to_string(),
                    ..ObjectSummary::default()
                })
                .collect(),
            next_marker: next.map(str::to_string),
        }
    }

    fn load_marker(result: EventResult<PageEvent>) -> Option<String> {
        match result {
            EventResult::Event(PageEvent::LoadObjects { marker }) => marker,
            _ => panic!("expected a page load"),
        }
    }

    #[test]
    fn test_paging_walks_markers() {
        let mut objects =
            ObjectList::new("logs", page(&["a", "b"], Some("b")), Arc::new(KeyResolver::default()));
        assert!(matches!(objects.handle_key(key('[')).unwrap(), EventResult::Consumed));

        assert_eq!(load_marker(objects.handle_key(key(']')).unwrap()), Some("b".to_string()));
        objects.apply(page(&["c", "d"], Some("d")));
        assert_eq!(objects.page_number(), 2);

        assert_eq!(load_marker(objects.handle_key(key(']')).unwrap()), Some("d".to_string()));
        objects.apply(page(&["e"], None));
        assert_eq!(objects.page_number(), 3);
        assert!(!objects.has_next());
        assert!(matches!(objects.handle_key(key(']')).unwrap(), EventResult::Consumed));

        assert_eq!(load_marker(objects.handle_key(key('[')).unwrap()), Some("b".to_string()));
        objects.apply(page(&["c", "d"], Some("d")));
        assert_eq!(objects.page_number(), 2);

        assert_eq!(load_marker(objects.handle_key(key('0')).unwrap()), None);
        objects.apply(page(&["a", "b"], Some("b")));
        assert_eq!(objects.page_number(), 1);
    }

    #[test]
    fn test_paging_hints_follow_position() {
        let descriptions = |objects: &ObjectList| -> Vec<String> {
            objects.hints().into_iter().map(|h| h.description).collect()
        };
        let mut objects =
            ObjectList::new("logs", page(&["a"], Some("a")), Arc::new(KeyResolver::default()));
        let first = descriptions(&objects);
        assert!(first.contains(&"Next page".to_string()));
        assert!(!first.contains(&"Prev page".to_string()));

        load_marker(objects.handle_key(key(']')).unwrap());
        objects.apply(page(&["b"], None));
        let last = descriptions(&objects);
        assert!(!last.contains(&"Next page".to_string()));
        assert!(last.contains(&"Prev page".to_string()));
        assert!(last.contains(&"First page".to_string()));
    }

    #[test]
    fn test_failed_request_keeps_position() {
        let mut objects =
            ObjectList::new("logs", page(&["a"], Some("a")), Arc::new(KeyResolver::default()));
        load_marker(objects.handle_key(key(']')).unwrap());
        objects.abort();
        assert_eq!(objects.page_number(), 1);
        assert!(objects.has_next());
    }
}
