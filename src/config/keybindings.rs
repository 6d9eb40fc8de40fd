use serde::{Deserialize, Serialize};

use crate::config::key::KeyBinding;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub back: KeyBinding,
    pub profile: KeyBinding,
    pub region: KeyBinding,
    pub search: KeyBinding,
    pub next_match: KeyBinding,
    pub prev_match: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub submit: KeyBinding,
    pub exit: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailKeybindings {
    pub yank: KeyBinding,
    pub edit: KeyBinding,
    pub pager: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderKeybindings {
    pub open: KeyBinding,
    pub next_section: KeyBinding,
    pub prev_section: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceKeybindings {
    pub security_groups: KeyBinding,
    pub instances: KeyBinding,
    pub disks: KeyBinding,
    pub interfaces: KeyBinding,
    pub json: KeyBinding,
    pub listeners: KeyBinding,
    pub vserver_groups: KeyBinding,
    pub databases: KeyBinding,
    pub accounts: KeyBinding,
    pub topics: KeyBinding,
    pub groups: KeyBinding,
    pub next_page: KeyBinding,
    pub prev_page: KeyBinding,
    pub first_page: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub confirm: KeyBinding,
    pub cancel: KeyBinding,
    pub dismiss: KeyBinding,
    pub history_prev: KeyBinding,
    pub history_next: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub search: SearchKeybindings,
    pub detail: DetailKeybindings,
    pub finder: FinderKeybindings,
    pub resources: ResourceKeybindings,
    pub dialog: DialogKeybindings,
}
