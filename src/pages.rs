//! Pages: what each navigation target shows and how it reacts to keys.
//!
//! Every page is a [`View`]. Pages that list remote data are built from a
//! [`PageData`] once its fetch completes; menu and detail pages are built
//! straight from the record they were opened with.

mod detail;
mod finder;
mod instance;
mod menu;
mod objects;
mod resources;
mod sections;

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use serde_json::Value;

pub use detail::JsonDetail;
pub use finder::FinderResults;
pub use instance::InstanceDetail;
pub use menu::Menu;
pub use objects::{OBJECT_PAGE_SIZE, ObjectList};
pub use resources::ResourceList;

use crate::Theme;
use crate::config::KeyResolver;
use crate::finder::FindResult;
use crate::model::{ObjectPage, Payload};
use crate::nav::Page;
use crate::ui::{Component, EventResult, Keybinding, Result};

/// What a page asks the router to do.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// Open `page`, scoped to `payload` when it needs a parent record.
    Navigate { page: Page, payload: Option<Payload> },
    Copy(String),
    /// Open the text in the external editor.
    Edit(String),
    /// Open the text in the external pager.
    Pager(String),
    OpenFinder,
    /// Fetch another page of the current bucket's objects.
    LoadObjects { marker: Option<String> },
}

/// Fetched content of a page.
#[derive(Debug, Clone)]
pub enum PageData {
    Records(Vec<Payload>),
    Objects(ObjectPage),
    Found(FindResult),
}

pub enum View {
    Menu(Menu),
    List(ResourceList),
    Objects(ObjectList),
    Json(JsonDetail),
    Instance(InstanceDetail),
    Finder(FinderResults),
}

impl View {
    /// Page built from fetched data.
    pub fn loaded(page: Page, context: Option<&Payload>, data: PageData, resolver: Arc<KeyResolver>) -> Self {
        match data {
            PageData::Found(result) => Self::Finder(FinderResults::new(result, resolver)),
            PageData::Objects(objects) => {
                let bucket = context.map_or("", Payload::label);
                Self::Objects(ObjectList::new(bucket, objects, resolver))
            }
            PageData::Records(records) => {
                let mut list = ResourceList::new(page, records, resolver);
                if let Some(label) = context.map(Payload::label).filter(|l| !l.is_empty()) {
                    list.table_mut().set_title(format!("{} [{label}]", page.title()));
                }
                Self::List(list)
            }
        }
    }

    /// Page that needs no fetch: the menu or a detail of `payload`.
    pub fn immediate(page: Page, payload: Option<Payload>, resolver: Arc<KeyResolver>) -> Self {
        match (page, payload) {
            (Page::Menu, _) => Self::Menu(Menu::new(resolver)),
            (Page::EcsDetail, Some(Payload::Instance(instance))) => {
                Self::Instance(InstanceDetail::new(instance, resolver))
            }
            (Page::EcsJson, Some(payload @ Payload::Instance(_))) => {
                Self::Json(JsonDetail::new(page, payload, resolver))
            }
            (Page::EcsDetail | Page::EcsJson, Some(payload)) => {
                Self::Json(JsonDetail::new(Page::Detail, payload, resolver))
            }
            (_, Some(payload)) => Self::Json(JsonDetail::new(page, payload, resolver)),
            (_, None) => Self::Json(JsonDetail::new(Page::Detail, Payload::Raw(Value::Null), resolver)),
        }
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        match self {
            Self::Menu(menu) => menu.hints(),
            Self::List(list) => list.hints(),
            Self::Objects(objects) => objects.hints(),
            Self::Json(detail) => detail.hints(),
            Self::Instance(detail) => detail.hints(),
            Self::Finder(results) => results.hints(),
        }
    }

    /// Whether the page supports `/` search.
    pub const fn searchable(&self) -> bool {
        matches!(self, Self::List(_) | Self::Objects(_) | Self::Json(_))
    }

    /// Highlight `query` and jump to the first match. Returns whether
    /// anything matched.
    pub fn search(&mut self, query: &str) -> bool {
        match self {
            Self::List(list) => list.table_mut().state_mut().search(query),
            Self::Objects(objects) => objects.list_mut().table_mut().state_mut().search(query),
            Self::Json(detail) => detail.viewport_mut().state_mut().search(query) > 0,
            Self::Menu(_) | Self::Instance(_) | Self::Finder(_) => false,
        }
    }

    pub fn clear_search(&mut self) {
        match self {
            Self::List(list) => list.table_mut().state_mut().clear_search(),
            Self::Objects(objects) => objects.list_mut().table_mut().state_mut().clear_search(),
            Self::Json(detail) => detail.viewport_mut().state_mut().clear_search(),
            Self::Menu(_) | Self::Instance(_) | Self::Finder(_) => {}
        }
    }

    pub fn next_match(&mut self) {
        match self {
            Self::List(list) => list.table_mut().state_mut().next_match(),
            Self::Objects(objects) => objects.list_mut().table_mut().state_mut().next_match(),
            Self::Json(detail) => detail.viewport_mut().state_mut().next_match(),
            Self::Menu(_) | Self::Instance(_) | Self::Finder(_) => {}
        }
    }

    pub fn prev_match(&mut self) {
        match self {
            Self::List(list) => list.table_mut().state_mut().prev_match(),
            Self::Objects(objects) => objects.list_mut().table_mut().state_mut().prev_match(),
            Self::Json(detail) => detail.viewport_mut().state_mut().prev_match(),
            Self::Menu(_) | Self::Instance(_) | Self::Finder(_) => {}
        }
    }

    /// "match 2/5" style summary of the active search.
    pub fn search_summary(&self) -> Option<String> {
        match self {
            Self::List(list) => list.table().state().search_summary(),
            Self::Objects(objects) => objects.list().table().state().search_summary(),
            Self::Json(detail) => detail.viewport().state().search_summary(),
            Self::Menu(_) | Self::Instance(_) | Self::Finder(_) => None,
        }
    }
}

impl Component for View {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        match self {
            Self::Menu(menu) => menu.handle_key(key),
            Self::List(list) => list.handle_key(key),
            Self::Objects(objects) => objects.handle_key(key),
            Self::Json(detail) => detail.handle_key(key),
            Self::Instance(detail) => detail.handle_key(key),
            Self::Finder(results) => results.handle_key(key),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        match self {
            Self::Menu(menu) => menu.render(frame, area, theme),
            Self::List(list) => list.render(frame, area, theme),
            Self::Objects(objects) => objects.render(frame, area, theme),
            Self::Json(detail) => detail.render(frame, area, theme),
            Self::Instance(detail) => detail.render(frame, area, theme),
            Self::Finder(results) => results.render(frame, area, theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bucket, Instance, LoadBalancer};

    fn resolver() -> Arc<KeyResolver> {
        Arc::new(KeyResolver::default())
    }

    fn instance() -> Payload {
        Instance {
            instance_id: "i-1".to_string(),
            ..Instance::default()
        }
        .into()
    }

    #[test]
    fn test_ecs_detail_uses_formatted_view() {
        assert!(matches!(
            View::immediate(Page::EcsDetail, Some(instance()), resolver()),
            View::Instance(_)
        ));
        assert!(matches!(
            View::immediate(Page::EcsJson, Some(instance()), resolver()),
            View::Json(_)
        ));
    }

    #[test]
    fn test_mismatched_record_falls_back_to_json() {
        let view = View::immediate(Page::EcsDetail, Some(LoadBalancer::default().into()), resolver());
        assert!(matches!(view, View::Json(_)));
        assert!(view.searchable());
    }

    #[test]
    fn test_records_build_titled_list() {
        let view = View::loaded(
            Page::EcsDisks,
            Some(&instance()),
            PageData::Records(Vec::new()),
            resolver(),
        );
        let View::List(list) = view else {
            panic!("expected list");
        };
        assert_eq!(list.table().state().len(), 0);
    }

    #[test]
    fn test_objects_take_bucket_from_context() {
        let bucket = Payload::from(Bucket {
            name: "logs".to_string(),
            ..Bucket::default()
        });
        let view = View::loaded(
            Page::OssObjects,
            Some(&bucket),
            PageData::Objects(ObjectPage::default()),
            resolver(),
        );
        let View::Objects(objects) = view else {
            panic!("expected objects");
        };
        assert_eq!(objects.bucket(), "logs");
    }

    #[test]
    fn test_menu_is_not_searchable() {
        let mut view = View::immediate(Page::Menu, None, resolver());
        assert!(!view.searchable());
        assert!(!view.search("ecs"));
    }
}
