use crate::config::actions::{
    DetailAction, DialogAction, FinderAction, GlobalAction, NavAction, ResourceAction,
    SearchAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;
use crossterm::event::KeyEvent;
use std::sync::Arc;

/// Maps key events to configured actions.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Back => &kb.back,
            GlobalAction::Profile => &kb.profile,
            GlobalAction::Region => &kb.region,
            GlobalAction::Search => &kb.search,
            GlobalAction::NextMatch => &kb.next_match,
            GlobalAction::PrevMatch => &kb.prev_match,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Submit => kb.submit.matches(event),
            SearchAction::Exit => kb.exit.matches(event),
        }
    }

    fn detail(&self, action: DetailAction) -> &KeyBinding {
        let kb = &self.keybindings.detail;
        match action {
            DetailAction::Yank => &kb.yank,
            DetailAction::Edit => &kb.edit,
            DetailAction::Pager => &kb.pager,
        }
    }

    pub fn matches_detail(&self, event: &KeyEvent, action: DetailAction) -> bool {
        self.detail(action).matches(event)
    }

    pub fn display_detail(&self, action: DetailAction) -> String {
        self.detail(action).display()
    }

    /// Copy hint; the yank key is a double press everywhere.
    pub fn display_yank(&self) -> String {
        self.detail(DetailAction::Yank).display_doubled()
    }

    fn finder(&self, action: FinderAction) -> &KeyBinding {
        let kb = &self.keybindings.finder;
        match action {
            FinderAction::Open => &kb.open,
            FinderAction::NextSection => &kb.next_section,
            FinderAction::PrevSection => &kb.prev_section,
        }
    }

    pub fn matches_finder(&self, event: &KeyEvent, action: FinderAction) -> bool {
        self.finder(action).matches(event)
    }

    pub fn display_finder(&self, action: FinderAction) -> String {
        self.finder(action).display()
    }

    fn resource(&self, action: ResourceAction) -> &KeyBinding {
        let kb = &self.keybindings.resources;
        match action {
            ResourceAction::SecurityGroups => &kb.security_groups,
            ResourceAction::Instances => &kb.instances,
            ResourceAction::Disks => &kb.disks,
            ResourceAction::Interfaces => &kb.interfaces,
            ResourceAction::Json => &kb.json,
            ResourceAction::Listeners => &kb.listeners,
            ResourceAction::VServerGroups => &kb.vserver_groups,
            ResourceAction::Databases => &kb.databases,
            ResourceAction::Accounts => &kb.accounts,
            ResourceAction::Topics => &kb.topics,
            ResourceAction::Groups => &kb.groups,
            ResourceAction::NextPage => &kb.next_page,
            ResourceAction::PrevPage => &kb.prev_page,
            ResourceAction::FirstPage => &kb.first_page,
        }
    }

    pub fn matches_resource(&self, event: &KeyEvent, action: ResourceAction) -> bool {
        self.resource(action).matches(event)
    }

    pub fn display_resource(&self, action: ResourceAction) -> String {
        self.resource(action).display()
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.matches(event),
            DialogAction::Cancel => kb.cancel.matches(event),
            DialogAction::Dismiss => kb.dismiss.matches(event),
            DialogAction::HistoryPrev => kb.history_prev.matches(event),
            DialogAction::HistoryNext => kb.history_next.matches(event),
        }
    }
}
