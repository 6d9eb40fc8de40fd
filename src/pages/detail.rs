use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::config::{DetailAction, KeyResolver};
use crate::model::Payload;
use crate::nav::Page;
use crate::pages::PageEvent;
use crate::pages::resources::{link_for, link_hints};
use crate::ui::{Component, EventResult, Keybinding, Result, Viewport, ViewportEvent};

/// Pretty-printed record with the drill-down keys of its kind.
pub struct JsonDetail {
    page: Page,
    payload: Payload,
    viewport: Viewport,
    resolver: Arc<KeyResolver>,
}

impl JsonDetail {
    pub fn new(page: Page, payload: Payload, resolver: Arc<KeyResolver>) -> Self {
        let title = format!("{} ({})", page.title(), payload.kind());
        Self {
            page,
            viewport: Viewport::new(title, &payload, resolver.clone()),
            payload,
            resolver,
        }
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut hints = link_hints(self.page, r);
        hints.extend([
            Keybinding::new(r.display_yank(), "Copy"),
            Keybinding::new(r.display_detail(DetailAction::Edit), "Editor"),
            Keybinding::new(r.display_detail(DetailAction::Pager), "Pager"),
        ]);
        hints
    }
}

impl Component for JsonDetail {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let result = self.viewport.handle_key(key)?.map(|event| match event {
            ViewportEvent::Yanked(text) => PageEvent::Copy(text),
            ViewportEvent::Edit(text) => PageEvent::Edit(text),
            ViewportEvent::Page(text) => PageEvent::Pager(text),
        });
        if result.is_consumed() {
            return Ok(result);
        }
        Ok(link_for(self.page, &key, &self.resolver).map_or(EventResult::Ignored, |target| {
            PageEvent::Navigate {
                page: target,
                payload: Some(self.payload.clone()),
            }
            .into()
        }))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.viewport.render(frame, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoadBalancer;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn detail() -> JsonDetail {
        let lb = LoadBalancer {
            load_balancer_id: "lb-1".to_string(),
            ..LoadBalancer::default()
        };
        JsonDetail::new(Page::SlbDetail, lb.into(), Arc::new(KeyResolver::default()))
    }

    #[test]
    fn test_viewport_keys_win_over_links() {
        let mut detail = detail();
        let result = detail.handle_key(key('v')).unwrap();
        assert!(matches!(result, EventResult::Event(PageEvent::Pager(text)) if text.contains("lb-1")));
    }

    #[test]
    fn test_link_carries_the_record() {
        let mut detail = detail();
        let result = detail.handle_key(key('l')).unwrap();
        let EventResult::Event(PageEvent::Navigate { page, payload }) = result else {
            panic!("expected navigation");
        };
        assert_eq!(page, Page::SlbListeners);
        assert!(matches!(payload, Some(Payload::LoadBalancer(lb)) if lb.load_balancer_id == "lb-1"));
    }
}
