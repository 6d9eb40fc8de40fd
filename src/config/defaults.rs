use crate::config::key::{Key, KeyBinding};
use crate::config::keybindings::{
    DetailKeybindings, DialogKeybindings, FinderKeybindings, GlobalKeybindings,
    NavigationKeybindings, ResourceKeybindings, SearchKeybindings,
};
use crossterm::event::KeyCode;

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('Q').into(),
            back: KeyBinding::multiple(vec![Key::char('q'), Key::new(KeyCode::Esc)]),
            profile: Key::char('P').into(),
            region: Key::char('R').into(),
            search: Key::char('/').into(),
            next_match: Key::char('n').into(),
            prev_match: Key::char('N').into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::char('k'), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::char('j'), Key::new(KeyCode::Down)]),
            page_up: KeyBinding::multiple(vec![
                Key::new(KeyCode::PageUp),
                Key::with_ctrl(KeyCode::Char('u')),
                Key::with_ctrl(KeyCode::Char('b')),
            ]),
            page_down: KeyBinding::multiple(vec![
                Key::new(KeyCode::PageDown),
                Key::with_ctrl(KeyCode::Char('d')),
                Key::with_ctrl(KeyCode::Char('f')),
            ]),
            home: KeyBinding::multiple(vec![Key::char('g'), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::char('G'), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            submit: Key::new(KeyCode::Enter).into(),
            exit: KeyBinding::multiple(vec![
                Key::new(KeyCode::Esc),
                Key::with_ctrl(KeyCode::Char('c')),
            ]),
        }
    }
}

impl Default for DetailKeybindings {
    fn default() -> Self {
        Self {
            yank: Key::char('y').into(),
            edit: Key::char('e').into(),
            pager: Key::char('v').into(),
        }
    }
}

impl Default for FinderKeybindings {
    fn default() -> Self {
        Self {
            open: Key::char('f').into(),
            next_section: Key::new(KeyCode::Tab).into(),
            prev_section: Key::new(KeyCode::BackTab).into(),
        }
    }
}

impl Default for ResourceKeybindings {
    fn default() -> Self {
        Self {
            security_groups: Key::char('S').into(),
            instances: Key::char('s').into(),
            disks: Key::char('d').into(),
            interfaces: Key::char('i').into(),
            json: Key::char('J').into(),
            listeners: Key::char('l').into(),
            vserver_groups: Key::char('v').into(),
            databases: Key::char('D').into(),
            accounts: Key::char('A').into(),
            topics: Key::char('T').into(),
            groups: Key::char('M').into(),
            next_page: Key::char(']').into(),
            prev_page: Key::char('[').into(),
            first_page: Key::char('0').into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            confirm: Key::new(KeyCode::Enter).into(),
            cancel: Key::new(KeyCode::Esc).into(),
            dismiss: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::char(' '),
                Key::char('q'),
            ]),
            history_prev: Key::with_ctrl(KeyCode::Char('p')).into(),
            history_next: Key::with_ctrl(KeyCode::Char('n')).into(),
        }
    }
}
