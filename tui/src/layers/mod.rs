//! Layer Registry
//!
//! Holds every panel in fixed priority order and decides which one owns
//! input. Only visibility changes at runtime; the order never does.
//!
//! Focus is recomputed from the visibility flags on every call. A panel that
//! hides itself hands focus to the next visible panel (or the base view) on
//! the very next event.

mod panel;

pub use panel::{Panel, PanelKind, Surface};

/// Who receives the next input event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Focus {
    Base,
    Panel(PanelKind),
}

/// Panels sorted by descending priority rank
#[derive(Default)]
pub struct LayerRegistry {
    panels: Vec<Box<dyn Panel>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a panel, keeping priority order
    ///
    /// Each kind may be registered once; a duplicate is ignored and `false`
    /// is returned.
    pub fn register(&mut self, panel: Box<dyn Panel>) -> bool {
        let kind = panel.kind();
        if self.panels.iter().any(|p| p.kind() == kind) {
            tracing::warn!(panel = kind.name(), "Panel kind already registered, ignoring");
            return false;
        }
        self.panels.push(panel);
        self.panels
            .sort_by_key(|p| std::cmp::Reverse(p.kind().priority_rank()));
        true
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_panel(mut self, panel: Box<dyn Panel>) -> Self {
        self.register(panel);
        self
    }

    /// The highest-priority visible panel, or the base view
    pub fn owner(&self) -> Focus {
        self.panels
            .iter()
            .find(|p| p.is_visible())
            .map_or(Focus::Base, |p| Focus::Panel(p.kind()))
    }

    /// The panel that owns focus, if any
    pub fn owner_panel(&self) -> Option<&dyn Panel> {
        self.panels.iter().find(|p| p.is_visible()).map(|p| p.as_ref())
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&dyn Panel> {
        self.panels
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_ref())
    }

    pub fn panel_mut(&mut self, kind: PanelKind) -> Option<&mut (dyn Panel + 'static)> {
        self.panels
            .iter_mut()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_mut())
    }

    /// Make a panel visible; `false` if the kind is not registered
    pub fn show(&mut self, kind: PanelKind) -> bool {
        self.set_visible(kind, true)
    }

    /// Hide a panel; `false` if the kind is not registered
    pub fn hide(&mut self, kind: PanelKind) -> bool {
        self.set_visible(kind, false)
    }

    fn set_visible(&mut self, kind: PanelKind, visible: bool) -> bool {
        match self.panel_mut(kind) {
            Some(panel) => {
                panel.set_visible(visible);
                true
            }
            None => false,
        }
    }

    pub fn hide_all(&mut self) {
        for panel in &mut self.panels {
            panel.set_visible(false);
        }
    }

    /// Visible panels, highest priority first
    pub fn visible_kinds(&self) -> Vec<PanelKind> {
        self.panels
            .iter()
            .filter(|p| p.is_visible())
            .map(|p| p.kind())
            .collect()
    }

    /// Registered kinds, highest priority first
    pub fn kinds(&self) -> Vec<PanelKind> {
        self.panels.iter().map(|p| p.kind()).collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Panel>> {
        self.panels.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Effect, Event};
    use crate::widgets::TextBlock;

    struct Stub {
        kind: PanelKind,
        visible: bool,
    }

    impl Surface for Stub {
        fn set_size(&mut self, _width: u16, _height: u16) {}

        fn update(&mut self, _event: &Event) -> Option<Effect> {
            None
        }

        fn view(&self) -> TextBlock {
            TextBlock::from(self.kind.name())
        }
    }

    impl Panel for Stub {
        fn kind(&self) -> PanelKind {
            self.kind
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
    }

    fn stub(kind: PanelKind) -> Box<dyn Panel> {
        Box::new(Stub {
            kind,
            visible: false,
        })
    }

    fn full_registry() -> LayerRegistry {
        // Registered out of order on purpose
        let mut registry = LayerRegistry::new();
        for kind in PanelKind::ALL.iter().rev() {
            registry.register(stub(*kind));
        }
        registry
    }

    #[test]
    fn test_nothing_visible_is_base() {
        assert_eq!(full_registry().owner(), Focus::Base);
        assert_eq!(LayerRegistry::new().owner(), Focus::Base);
    }

    #[test]
    fn test_registration_sorts_by_priority() {
        assert_eq!(full_registry().kinds(), PanelKind::ALL.to_vec());
    }

    #[test]
    fn test_confirm_wins_over_everything() {
        let mut registry = full_registry();
        for kind in PanelKind::ALL {
            registry.show(kind);
        }
        assert_eq!(registry.owner(), Focus::Panel(PanelKind::Confirm));
    }

    #[test]
    fn test_each_kind_beats_all_lower_kinds() {
        for (i, top) in PanelKind::ALL.iter().enumerate() {
            let mut registry = full_registry();
            for kind in &PanelKind::ALL[i..] {
                registry.show(*kind);
            }
            assert_eq!(registry.owner(), Focus::Panel(*top));
        }
    }

    #[test]
    fn test_hiding_hands_focus_down_immediately() {
        let mut registry = full_registry();
        registry.show(PanelKind::Confirm);
        registry.show(PanelKind::Edit);
        registry.show(PanelKind::Command);

        registry.hide(PanelKind::Confirm);
        assert_eq!(registry.owner(), Focus::Panel(PanelKind::Edit));
        registry.hide(PanelKind::Edit);
        assert_eq!(registry.owner(), Focus::Panel(PanelKind::Command));
        registry.hide_all();
        assert_eq!(registry.owner(), Focus::Base);
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut registry = LayerRegistry::new();
        assert!(registry.register(stub(PanelKind::Help)));
        assert!(!registry.register(stub(PanelKind::Help)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_show_unregistered_kind() {
        let mut registry = LayerRegistry::new().with_panel(stub(PanelKind::Search));
        assert!(!registry.show(PanelKind::Confirm));
        assert_eq!(registry.owner(), Focus::Base);
    }

    #[test]
    fn test_visible_kinds_and_owner_panel() {
        let mut registry = full_registry();
        registry.show(PanelKind::Search);
        registry.show(PanelKind::Detail);
        assert_eq!(
            registry.visible_kinds(),
            vec![PanelKind::Detail, PanelKind::Search]
        );
        let owner = registry.owner_panel().map(|p| p.view().to_string());
        assert_eq!(owner.as_deref(), Some("detail"));
    }
}
