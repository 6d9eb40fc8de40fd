#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Back,
    Profile,
    Region,
    Search,
    NextMatch,
    PrevMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Submit,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Yank,
    Edit,
    Pager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderAction {
    Open,
    NextSection,
    PrevSection,
}

/// Page-specific shortcuts on resource lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    SecurityGroups,
    Instances,
    Disks,
    Interfaces,
    Json,
    Listeners,
    VServerGroups,
    Databases,
    Accounts,
    Topics,
    Groups,
    NextPage,
    PrevPage,
    FirstPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Confirm,
    Cancel,
    Dismiss,
    HistoryPrev,
    HistoryNext,
}
