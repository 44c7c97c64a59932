//! Panel - A single stackable view

use crate::compositor::Placement;
use crate::events::{Effect, Event};
use crate::widgets::TextBlock;

/// Every kind of panel that can stack over the base view
///
/// Declared in descending priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelKind {
    /// Blocking yes/no confirmation
    Confirm,
    /// Failure report from the domain layer
    Error,
    Help,
    Edit,
    Detail,
    QuickAdd,
    Search,
    Command,
}

impl PanelKind {
    pub const ALL: [PanelKind; 8] = [
        PanelKind::Confirm,
        PanelKind::Error,
        PanelKind::Help,
        PanelKind::Edit,
        PanelKind::Detail,
        PanelKind::QuickAdd,
        PanelKind::Search,
        PanelKind::Command,
    ];

    /// Fixed focus rank (higher wins)
    pub const fn priority_rank(self) -> u8 {
        match self {
            PanelKind::Confirm => 80,
            PanelKind::Error => 70,
            PanelKind::Help => 60,
            PanelKind::Edit => 50,
            PanelKind::Detail => 40,
            PanelKind::QuickAdd => 30,
            PanelKind::Search => 20,
            PanelKind::Command => 10,
        }
    }

    /// How the panel's block is laid over the base view
    pub const fn placement(self) -> Placement {
        match self {
            PanelKind::Search | PanelKind::Command => Placement::BottomBar,
            _ => Placement::Centered,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PanelKind::Confirm => "confirm",
            PanelKind::Error => "error",
            PanelKind::Help => "help",
            PanelKind::Edit => "edit",
            PanelKind::Detail => "detail",
            PanelKind::QuickAdd => "quick-add",
            PanelKind::Search => "search",
            PanelKind::Command => "command",
        }
    }
}

/// The contract shared by the base view and every panel
pub trait Surface {
    /// Called at startup and on every terminal resize
    fn set_size(&mut self, width: u16, height: u16);

    /// Handle one event, optionally requesting follow-up work
    fn update(&mut self, event: &Event) -> Option<Effect>;

    /// Render the current state
    fn view(&self) -> TextBlock;
}

/// A surface that stacks over the base view when visible
pub trait Panel: Surface {
    fn kind(&self) -> PanelKind;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_declaration_order() {
        for pair in PanelKind::ALL.windows(2) {
            assert!(pair[0].priority_rank() > pair[1].priority_rank());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_bars_are_bottom_placed() {
        assert_eq!(PanelKind::Search.placement(), Placement::BottomBar);
        assert_eq!(PanelKind::Command.placement(), Placement::BottomBar);
        assert_eq!(PanelKind::Confirm.placement(), Placement::Centered);
        assert_eq!(PanelKind::QuickAdd.placement(), Placement::Centered);
    }
}
