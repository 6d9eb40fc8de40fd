//! Page routing: the current page, back history and everything global.
//!
//! Input goes to the visible modal first, then to an active search prompt,
//! then to the global shortcuts and finally to the page. Fetches are tagged
//! with a ticket; a completion whose ticket is no longer current is dropped.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Theme;
use crate::commands::{Command, CopyToClipboardCmd, FetchPageCmd, FindCmd, RegionsCmd, SharedClipboard};
use crate::config::{AppConfig, GlobalAction, KeyResolver};
use crate::finder::Limits;
use crate::model::{ObjectPage, Payload};
use crate::nav::{NavigationStack, Page};
use crate::pages::{PageData, PageEvent, View};
use crate::provider::aliyun::config::CliConfig;
use crate::provider::{HostResolver, ResourceApi};
use crate::region_cache::RegionCache;
use crate::ui::modal::remember;
use crate::ui::status_line::{render_hints, split};
use crate::ui::{
    Component, EventResult, Header, InputModal, Keybinding, ModalEvent, ModalKind, ModalState,
    SearchEvent, SearchPrompt, SelectModal, Spinner,
};

const SPINNER_WIDTH: u16 = 32;

/// What a dialog was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Profile,
    Region,
    Finder,
}

/// Work the App has to do after a key.
pub enum Outcome {
    Idle,
    Run(Vec<Box<dyn Command>>),
    /// Hand the terminal to `program` with `content` in a temporary file.
    HandOff { program: String, content: String },
    Quit,
}

impl Outcome {
    fn run(command: impl Command) -> Self {
        let command: Box<dyn Command> = Box::new(command);
        Self::Run(vec![command])
    }
}

/// A page together with the record it was opened for and its built state.
struct Screen {
    page: Page,
    context: Option<Payload>,
    view: Option<View>,
}

impl Screen {
    fn menu(keys: Arc<KeyResolver>) -> Self {
        Self {
            page: Page::Menu,
            context: None,
            view: Some(View::immediate(Page::Menu, None, keys)),
        }
    }
}

pub struct Router {
    api: Arc<dyn ResourceApi>,
    host_resolver: Arc<dyn HostResolver>,
    profiles: CliConfig,
    config: Arc<AppConfig>,
    keys: Arc<KeyResolver>,
    region_cache: Option<RegionCache>,
    clipboard: SharedClipboard,
    current: Screen,
    loading: bool,
    stack: NavigationStack<Screen>,
    modal: ModalState<Purpose>,
    search: SearchPrompt,
    spinner: Spinner,
    finder_history: Vec<String>,
    finder_cancel: CancellationToken,
    ticket: u64,
    region_ticket: u64,
}

impl Router {
    pub fn new(
        api: Arc<dyn ResourceApi>,
        host_resolver: Arc<dyn HostResolver>,
        profiles: CliConfig,
        config: Arc<AppConfig>,
        keys: Arc<KeyResolver>,
        region_cache: Option<RegionCache>,
    ) -> Self {
        Self {
            api,
            host_resolver,
            profiles,
            config,
            current: Screen::menu(keys.clone()),
            modal: ModalState::new(keys.clone()),
            search: SearchPrompt::new(keys.clone()),
            keys,
            region_cache,
            clipboard: SharedClipboard::default(),
            loading: false,
            stack: NavigationStack::default(),
            spinner: Spinner::default(),
            finder_history: Vec::new(),
            finder_cancel: CancellationToken::new(),
            ticket: 0,
            region_ticket: 0,
        }
    }

    #[cfg(test)]
    pub const fn page(&self) -> Page {
        self.current.page
    }

    #[cfg(test)]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> color_eyre::Result<Outcome> {
        if self.modal.is_visible() {
            return Ok(match self.modal.handle_key(key)? {
                EventResult::Event(event) => self.on_modal(event),
                EventResult::Consumed | EventResult::Ignored => Outcome::Idle,
            });
        }

        if self.search.is_active() {
            if let EventResult::Event(event) = self.search.handle_key(key)? {
                self.on_search(event);
            }
            return Ok(Outcome::Idle);
        }

        let keys = self.keys.clone();
        if keys.matches_global(&key, GlobalAction::Quit) {
            return Ok(Outcome::Quit);
        }
        if keys.matches_global(&key, GlobalAction::Back) {
            self.go_back();
            return Ok(Outcome::Idle);
        }
        if keys.matches_global(&key, GlobalAction::Profile) {
            self.open_profiles();
            return Ok(Outcome::Idle);
        }
        if keys.matches_global(&key, GlobalAction::Region) {
            return Ok(self.open_regions());
        }
        if self.loading {
            return Ok(Outcome::Idle);
        }

        let Some(view) = self.current.view.as_mut() else {
            return Ok(Outcome::Idle);
        };
        if view.searchable() {
            if keys.matches_global(&key, GlobalAction::Search) {
                self.search.open();
                return Ok(Outcome::Idle);
            }
            if keys.matches_global(&key, GlobalAction::NextMatch) {
                view.next_match();
                return Ok(Outcome::Idle);
            }
            if keys.matches_global(&key, GlobalAction::PrevMatch) {
                view.prev_match();
                return Ok(Outcome::Idle);
            }
        }

        Ok(match view.handle_key(key)? {
            EventResult::Event(event) => self.on_page_event(event),
            EventResult::Consumed | EventResult::Ignored => Outcome::Idle,
        })
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.spinner.handle_tick();
        }
    }

    fn on_search(&mut self, event: SearchEvent) {
        let Some(view) = self.current.view.as_mut() else {
            return;
        };
        match event {
            SearchEvent::Submitted(query) if query.is_empty() => view.clear_search(),
            SearchEvent::Submitted(query) => {
                let found = view.search(&query);
                debug!(query = %query, found, "Search");
            }
            SearchEvent::Cancelled => view.clear_search(),
        }
    }

    fn on_page_event(&mut self, event: PageEvent) -> Outcome {
        match event {
            PageEvent::Navigate { page, payload } => self.navigate(page, payload),
            PageEvent::Copy(text) => Outcome::run(CopyToClipboardCmd::new(self.clipboard.clone(), text)),
            PageEvent::Edit(content) => Outcome::HandOff {
                program: self.config.external.editor_command(),
                content,
            },
            PageEvent::Pager(content) => Outcome::HandOff {
                program: self.config.external.pager_command(),
                content,
            },
            PageEvent::OpenFinder => {
                self.modal.show(ModalKind::Input(
                    InputModal::new(
                        Purpose::Finder,
                        "Find resource by IP or domain",
                        self.finder_history.clone(),
                    )
                    .with_placeholder("10.0.0.1 or api.example.com"),
                ));
                Outcome::Idle
            }
            PageEvent::LoadObjects { marker } => {
                self.ticket += 1;
                self.loading = true;
                self.spinner.set_label("Loading objects...");
                Outcome::run(FetchPageCmd::new(
                    self.api.clone(),
                    self.current.page,
                    self.current.context.clone(),
                    marker,
                    self.ticket,
                ))
            }
        }
    }

    fn on_modal(&mut self, event: ModalEvent<Purpose>) -> Outcome {
        match event {
            ModalEvent::Selected {
                purpose: Purpose::Profile,
                value,
            } => {
                self.switch_profile(&value);
                Outcome::Idle
            }
            ModalEvent::Selected {
                purpose: Purpose::Region,
                value,
            } => {
                self.switch_region(&value);
                Outcome::Idle
            }
            ModalEvent::Submitted {
                purpose: Purpose::Finder,
                value,
            } => self.find(value),
            ModalEvent::Cancelled(Purpose::Region) => {
                // Results of the pending region load have nowhere to go.
                self.region_ticket += 1;
                Outcome::Idle
            }
            ModalEvent::Selected { .. }
            | ModalEvent::Submitted { .. }
            | ModalEvent::Cancelled(_)
            | ModalEvent::Dismissed => Outcome::Idle,
        }
    }

    /// Open `page`, parking the current one on the back stack.
    pub fn navigate(&mut self, page: Page, payload: Option<Payload>) -> Outcome {
        self.park(page, payload);
        if page.needs_fetch() {
            self.loading = true;
            self.spinner.set_label(format!("Loading {}...", page.title()));
            Outcome::run(FetchPageCmd::new(
                self.api.clone(),
                page,
                self.current.context.clone(),
                None,
                self.ticket,
            ))
        } else {
            self.loading = false;
            self.current.view = Some(View::immediate(page, self.current.context.clone(), self.keys.clone()));
            Outcome::Idle
        }
    }

    fn park(&mut self, page: Page, payload: Option<Payload>) {
        debug!(?page, from = ?self.current.page, "Navigate");
        let previous = std::mem::replace(
            &mut self.current,
            Screen {
                page,
                context: payload,
                view: None,
            },
        );
        self.stack.push(previous);
        self.ticket += 1;
    }

    pub fn go_back(&mut self) {
        if self.current.page == Page::Menu {
            return;
        }
        let Some(previous) = self.stack.pop() else {
            return;
        };
        if self.loading {
            self.finder_cancel.cancel();
        }
        debug!(from = ?self.current.page, to = ?previous.page, "Back");
        self.current = previous;
        self.loading = false;
        self.ticket += 1;
    }

    fn find(&mut self, query: String) -> Outcome {
        remember(&mut self.finder_history, &query);
        info!(query = %query, "Finder query");

        self.park(Page::FinderResults, None);
        self.loading = true;
        self.finder_cancel = CancellationToken::new();
        self.spinner.set_label(format!("Finding {query}..."));
        let limits = Limits {
            timeout: self.config.finder.timeout(),
            cancel: self.finder_cancel.clone(),
        };
        Outcome::run(FindCmd::new(
            self.api.clone(),
            self.host_resolver.clone(),
            query,
            limits,
            self.ticket,
        ))
    }

    /// Apply the result of a page fetch.
    pub fn on_loaded(&mut self, ticket: u64, result: Result<PageData, String>) {
        if ticket != self.ticket {
            debug!(ticket, current = self.ticket, "Dropping stale result");
            return;
        }
        self.loading = false;

        match result {
            Ok(PageData::Objects(page)) => {
                if let Some(View::Objects(objects)) = self.current.view.as_mut() {
                    objects.apply(page);
                } else {
                    self.set_loaded(PageData::Objects(page));
                }
            }
            Ok(data) => self.set_loaded(data),
            Err(message) => {
                match self.current.view.as_mut() {
                    Some(View::Objects(objects)) => objects.abort(),
                    Some(_) => {}
                    None if self.current.page == Page::OssObjects => {
                        self.set_loaded(PageData::Objects(ObjectPage::default()));
                    }
                    None => self.set_loaded(PageData::Records(Vec::new())),
                }
                self.show_error(message);
            }
        }
    }

    fn set_loaded(&mut self, data: PageData) {
        self.current.view = Some(View::loaded(
            self.current.page,
            self.current.context.as_ref(),
            data,
            self.keys.clone(),
        ));
    }

    fn open_profiles(&mut self) {
        let names = self.profiles.profile_names();
        let current = self.api.profile().to_string();
        self.modal.show(ModalKind::Select(SelectModal::new(
            Purpose::Profile,
            "Select Profile",
            names,
            Some(&current),
        )));
    }

    fn open_regions(&mut self) -> Outcome {
        self.region_ticket += 1;
        self.modal
            .show(ModalKind::Select(SelectModal::loading(Purpose::Region, "Select Region")));
        Outcome::run(RegionsCmd::new(
            self.api.clone(),
            self.region_cache.clone(),
            self.region_ticket,
        ))
    }

    /// Fill the region picker, if it is still open for this load.
    pub fn on_regions_loaded(&mut self, ticket: u64, result: Result<Vec<String>, String>) {
        if ticket != self.region_ticket {
            return;
        }
        let current = self.api.region().to_string();
        match result {
            Ok(regions) => {
                if let Some(ModalKind::Select(select)) = self.modal.kind_mut()
                    && *select.purpose() == Purpose::Region
                {
                    select.set_items(regions, Some(&current));
                }
            }
            Err(e) => self.show_error(format!("Failed to load regions: {e}")),
        }
    }

    fn switch_profile(&mut self, profile: &str) {
        let region = self
            .profiles
            .profile(profile)
            .map_or_else(|| self.api.region().to_string(), |p| p.region().to_string());
        info!(profile, region = %region, "Switching profile");
        self.api = self.api.scoped(profile, &region);
        self.reset();
        self.show_success(format!("Switched to profile {profile} ({region})"));
    }

    fn switch_region(&mut self, region: &str) {
        let profile = self.api.profile().to_string();
        info!(profile = %profile, region, "Switching region");
        self.api = self.api.scoped(&profile, region);
        self.reset();
        self.show_success(format!("Switched to region {region}"));
    }

    /// Back to a fresh menu. Every parked page was loaded for the old session.
    fn reset(&mut self) {
        self.finder_cancel.cancel();
        self.stack.clear();
        self.current = Screen::menu(self.keys.clone());
        self.loading = false;
        self.ticket += 1;
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.modal.show(ModalKind::Info(message.into()));
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.modal.show(ModalKind::Success(message.into()));
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Showing error");
        self.modal.show(ModalKind::Error(message));
    }

    fn breadcrumbs(&self) -> Vec<String> {
        self.stack
            .iter()
            .map(|screen| screen.page)
            .chain(std::iter::once(self.current.page))
            .filter(|page| *page != Page::Menu)
            .map(|page| page.title().to_string())
            .collect()
    }

    fn hints(&self) -> Vec<Keybinding> {
        let keys = &self.keys;
        let mut hints = self.current.view.as_ref().map(View::hints).unwrap_or_default();
        if self.current.view.as_ref().is_some_and(View::searchable) {
            hints.push(Keybinding::new(keys.display_global(GlobalAction::Search), "Search"));
        }
        if self.current.page != Page::Menu {
            hints.push(Keybinding::new(keys.display_global(GlobalAction::Back), "Back"));
        }
        hints.extend([
            Keybinding::new(keys.display_global(GlobalAction::Profile), "Profile"),
            Keybinding::new(keys.display_global(GlobalAction::Region), "Region"),
            Keybinding::new(keys.display_global(GlobalAction::Quit), "Quit"),
        ]);
        hints
    }

    pub fn render(&mut self, frame: &mut Frame, theme: &Theme) {
        let [header_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let crumbs = self.breadcrumbs();
        Header {
            profile: self.api.profile(),
            region: self.api.region(),
            breadcrumbs: &crumbs,
        }
        .render(frame, header_area, theme);

        match self.current.view.as_mut() {
            Some(view) => view.render(frame, body_area, theme),
            None => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_type(theme.border_type)
                    .border_style(Style::default().fg(theme.border()))
                    .title(format!(" {} ", self.current.page.title()));
                frame.render_widget(
                    Paragraph::new(Line::styled("Loading...", Style::default().fg(theme.overlay0())))
                        .block(block),
                    body_area,
                );
            }
        }

        self.render_status(frame, status_area, theme);
        self.modal.render(frame, frame.area(), theme);
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Block::default().style(Style::default().bg(theme.mantle())), area);
        if self.search.is_active() {
            self.search.render(frame, area, theme);
            return;
        }
        let (left, right) = split(area, SPINNER_WIDTH);
        if self.loading {
            self.spinner.render(frame, left, theme);
        } else if let Some(summary) = self.current.view.as_ref().and_then(View::search_summary) {
            frame.render_widget(
                Paragraph::new(Line::styled(summary, Style::default().fg(theme.warning()))),
                left,
            );
        }
        render_hints(frame, right, &self.hints(), theme);
    }
}
