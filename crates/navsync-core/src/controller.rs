#![forbid(unsafe_code)]

//! Navigation state machine.
//!
//! Two modes:
//!
//! - **Idle**: passive scroll observation is live; the resolver's output
//!   drives the active link and replaces the current history entry.
//! - **ProgrammaticScroll**: a click-initiated smooth scroll is in flight;
//!   resolver output is dropped so the navbar does not flicker through every
//!   section the animation passes.
//!
//! ```text
//!            on_link_click / on_history_navigate
//!   ┌──────┐ ───────────────────────────────────► ┌────────────────────┐
//!   │ Idle │                                      │ ProgrammaticScroll │ ◄┐ on_scroll
//!   └──────┘ ◄─────────────────────────────────── └────────────────────┘ ─┘ (re-arm)
//!                  on_settle(live token)
//! ```
//!
//! # Invariants
//!
//! 1. After [`on_load`](NavigationController::on_load) with a non-empty
//!    registry, exactly one link is active.
//! 2. A click's activation and the switch to ProgrammaticScroll both happen
//!    before the handler returns, so no resolver-driven activation can
//!    overtake it.
//! 3. Only the live settle token ends ProgrammaticScroll.
//!
//! Handlers never touch the page. They return [`NavCmd`]s for the host to
//! apply in order.

use std::time::Duration;

use crate::active::LinkPatch;
use crate::config::NavConfig;
use crate::debounce::{SettleDebounce, SettleToken};
use crate::history::{AddressBar, HistoryMode};
use crate::registry::LinkRegistry;
use crate::resolver::ScrollResolver;
use crate::section::{Section, SectionId, find_section};

/// Current scroll-observation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Idle,
    ProgrammaticScroll,
}

/// A side effect requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum NavCmd {
    /// Apply active class and `aria-current` to these links.
    SetLinks(Vec<LinkPatch>),
    /// Smooth-scroll the window so its top edge lands at `top`.
    ScrollTo { top: f64 },
    /// Write the fragment for `id` into the address bar.
    SyncUrl { id: SectionId, mode: HistoryMode },
    /// Start (or restart) the settle timer; call
    /// [`NavigationController::on_settle`] with `token` after `delay`.
    ArmSettleTimer { token: SettleToken, delay: Duration },
}

/// The page-lifetime navigation record.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    is_auto_scrolling: bool,
    pending_target: Option<SectionId>,
    debounce: SettleDebounce,
}

impl NavigationState {
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            is_auto_scrolling: false,
            pending_target: None,
            debounce: SettleDebounce::new(settle_delay),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_auto_scrolling(&self) -> bool {
        self.is_auto_scrolling
    }

    /// Where the in-flight programmatic scroll is headed.
    #[inline]
    #[must_use]
    pub fn pending_target(&self) -> Option<&SectionId> {
        self.pending_target.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> NavMode {
        if self.is_auto_scrolling {
            NavMode::ProgrammaticScroll
        } else {
            NavMode::Idle
        }
    }

    fn begin_auto_scroll(&mut self, destination: SectionId) -> NavCmd {
        if !self.is_auto_scrolling {
            crate::logging::debug!(%destination, "entering programmatic scroll");
        }
        self.is_auto_scrolling = true;
        self.pending_target = Some(destination);
        self.rearm()
    }

    fn rearm(&mut self) -> NavCmd {
        NavCmd::ArmSettleTimer {
            token: self.debounce.arm(),
            delay: self.debounce.delay(),
        }
    }

    fn settle(&mut self, token: SettleToken) -> bool {
        if !self.debounce.fire(token) {
            crate::logging::trace!(token = token.get(), "stale settle token ignored");
            return false;
        }
        crate::logging::debug!(pending = ?self.pending_target, "programmatic scroll settled");
        self.is_auto_scrolling = false;
        self.pending_target = None;
        true
    }
}

/// Orchestrates clicks, passive scroll resolution, and history sync.
#[derive(Debug, Clone)]
pub struct NavigationController {
    registry: LinkRegistry,
    resolver: ScrollResolver,
    scroll_padding: f64,
    state: NavigationState,
    address_bar: AddressBar,
}

impl NavigationController {
    #[must_use]
    pub fn new(registry: LinkRegistry, config: &NavConfig) -> Self {
        Self {
            registry,
            resolver: ScrollResolver::new(config.header_offset),
            scroll_padding: config.scroll_padding,
            state: NavigationState::new(config.settle_delay()),
            address_bar: AddressBar::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &LinkRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> NavMode {
        self.state.mode()
    }

    #[inline]
    #[must_use]
    pub fn address_bar(&self) -> &AddressBar {
        &self.address_bar
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&SectionId> {
        self.registry.active_id()
    }

    /// Window offset that puts `section` just below the fixed header.
    #[must_use]
    pub fn scroll_target(&self, section: &Section) -> f64 {
        (section.top - self.resolver.header_offset() - self.scroll_padding).max(0.0)
    }

    /// Page load.
    ///
    /// Pre: nothing active. Post: the fragment's section is active if the
    /// registry knows it, otherwise the first section (or first link). The
    /// returned `SetLinks` covers every link so stale markup is overwritten.
    /// Does not write history.
    pub fn on_load(&mut self, fragment: Option<&str>, sections: &[Section]) -> Vec<NavCmd> {
        self.address_bar = AddressBar::with_fragment(fragment);

        let initial = fragment
            .filter(|id| self.registry.contains(id))
            .map(SectionId::new)
            .or_else(|| {
                sections
                    .first()
                    .filter(|s| self.registry.contains(s.id.as_str()))
                    .map(|s| s.id.clone())
            })
            .or_else(|| self.registry.first_id().cloned());

        let Some(initial) = initial else {
            crate::logging::debug!("no navigation links; nothing to activate");
            return Vec::new();
        };
        if let Err(err) = self.registry.set_active(initial.as_str()) {
            crate::logging::debug!(%err, "initial activation skipped");
            return Vec::new();
        }
        crate::logging::debug!(id = %initial, "initial section");
        vec![NavCmd::SetLinks(self.registry.snapshot())]
    }

    /// Navbar link click.
    ///
    /// Pre: any mode. Post (target exists): `id` active, ProgrammaticScroll,
    /// `pending_target == id`, settle timer armed. If the section is missing
    /// nothing changes and no commands are returned; the host must then let
    /// the browser's default action through.
    pub fn on_link_click(&mut self, id: &str, sections: &[Section]) -> Vec<NavCmd> {
        let Some(target) = find_section(sections, id) else {
            crate::logging::debug!(%id, "click on link without section ignored");
            return Vec::new();
        };
        let patches = match self.registry.set_active(id) {
            Ok(patches) => patches,
            Err(err) => {
                crate::logging::debug!(%err, "click ignored");
                return Vec::new();
            }
        };

        let top = self.scroll_target(target);
        let id = target.id.clone();
        let arm = self.state.begin_auto_scroll(id.clone());
        self.address_bar.sync(&id, HistoryMode::Push);

        let mut cmds = Vec::with_capacity(4);
        if !patches.is_empty() {
            cmds.push(NavCmd::SetLinks(patches));
        }
        cmds.push(NavCmd::ScrollTo { top });
        cmds.push(NavCmd::SyncUrl {
            id,
            mode: HistoryMode::Push,
        });
        cmds.push(arm);
        cmds
    }

    /// Coalesced scroll signal at window offset `offset`.
    ///
    /// In ProgrammaticScroll this only re-arms the settle timer. In Idle it
    /// resolves the current section and, if it changed, activates it and
    /// replaces the history entry.
    pub fn on_scroll(&mut self, offset: f64, sections: &[Section]) -> Vec<NavCmd> {
        if self.state.is_auto_scrolling() {
            return vec![self.state.rearm()];
        }
        let Some(id) = self.resolver.resolve(offset, sections) else {
            return Vec::new();
        };
        self.on_resolved(id.as_str())
    }

    /// Resolver output. Dropped entirely during ProgrammaticScroll.
    pub fn on_resolved(&mut self, id: &str) -> Vec<NavCmd> {
        if self.state.is_auto_scrolling() {
            crate::logging::trace!(%id, "resolver activation dropped during programmatic scroll");
            return Vec::new();
        }
        let patches = match self.registry.set_active(id) {
            Ok(patches) => patches,
            Err(_) => return Vec::new(),
        };
        if patches.is_empty() {
            return Vec::new();
        }
        let mut cmds = vec![NavCmd::SetLinks(patches)];
        let id = SectionId::new(id);
        if self.address_bar.sync(&id, HistoryMode::Replace) {
            cmds.push(NavCmd::SyncUrl {
                id,
                mode: HistoryMode::Replace,
            });
        }
        cmds
    }

    /// Settle timer fired. Returns `true` if this ended ProgrammaticScroll.
    pub fn on_settle(&mut self, token: SettleToken) -> bool {
        self.state.settle(token)
    }

    /// Back/forward navigation changed the fragment.
    ///
    /// A known section becomes active immediately and passive tracking is
    /// suppressed while the browser restores the scroll position. History is
    /// not written.
    pub fn on_history_navigate(
        &mut self,
        fragment: Option<&str>,
        sections: &[Section],
    ) -> Vec<NavCmd> {
        self.address_bar.observe(fragment);
        let Some(id) = fragment.filter(|id| find_section(sections, id).is_some()) else {
            return Vec::new();
        };
        let patches = match self.registry.set_active(id) {
            Ok(patches) => patches,
            Err(_) => return Vec::new(),
        };
        let arm = self.state.begin_auto_scroll(SectionId::new(id));
        let mut cmds = Vec::with_capacity(2);
        if !patches.is_empty() {
            cmds.push(NavCmd::SetLinks(patches));
        }
        cmds.push(arm);
        cmds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AnchorSpec;
    use pretty_assertions::assert_eq;

    fn sections() -> Vec<Section> {
        vec![
            Section::new("a", 0.0, 500.0),
            Section::new("b", 500.0, 500.0),
            Section::new("c", 1000.0, 800.0),
        ]
    }

    fn controller() -> NavigationController {
        let registry = LinkRegistry::build(["#a", "#b", "#c"].map(AnchorSpec::new));
        NavigationController::new(registry, &NavConfig::default())
    }

    fn active(ctl: &NavigationController) -> Option<&str> {
        ctl.active_id().map(SectionId::as_str)
    }

    fn armed_token(cmds: &[NavCmd]) -> SettleToken {
        cmds.iter()
            .find_map(|c| match c {
                NavCmd::ArmSettleTimer { token, .. } => Some(*token),
                _ => None,
            })
            .expect("settle timer armed")
    }

    #[test]
    fn load_with_known_fragment() {
        let mut ctl = controller();
        let cmds = ctl.on_load(Some("b"), &sections());
        assert_eq!(active(&ctl), Some("b"));
        match &cmds[..] {
            [NavCmd::SetLinks(all)] => assert_eq!(all.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn load_with_unknown_fragment_falls_back_to_first_section() {
        let mut ctl = controller();
        ctl.on_load(Some("missing"), &sections());
        assert_eq!(active(&ctl), Some("a"));
        ctl = controller();
        ctl.on_load(None, &sections());
        assert_eq!(active(&ctl), Some("a"));
    }

    #[test]
    fn load_without_sections_uses_first_link() {
        let mut ctl = controller();
        ctl.on_load(None, &[]);
        assert_eq!(active(&ctl), Some("a"));
    }

    #[test]
    fn click_emits_ordered_commands() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        let cmds = ctl.on_link_click("c", &sections());
        let token = armed_token(&cmds);
        assert_eq!(
            cmds,
            vec![
                NavCmd::SetLinks(vec![
                    LinkPatch {
                        id: SectionId::new("a"),
                        dom_index: 0,
                        active: false
                    },
                    LinkPatch {
                        id: SectionId::new("c"),
                        dom_index: 2,
                        active: true
                    },
                ]),
                NavCmd::ScrollTo { top: 928.0 },
                NavCmd::SyncUrl {
                    id: SectionId::new("c"),
                    mode: HistoryMode::Push
                },
                NavCmd::ArmSettleTimer {
                    token,
                    delay: Duration::from_millis(120)
                },
            ]
        );
        assert_eq!(ctl.mode(), NavMode::ProgrammaticScroll);
        assert_eq!(ctl.state().pending_target().map(SectionId::as_str), Some("c"));
    }

    #[test]
    fn click_target_never_scrolls_above_page_top() {
        let mut ctl = controller();
        let cmds = ctl.on_link_click("a", &sections());
        assert!(cmds.contains(&NavCmd::ScrollTo { top: 0.0 }));
    }

    #[test]
    fn click_on_missing_section_is_noop() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        let cmds = ctl.on_link_click("zzz", &sections());
        assert!(cmds.is_empty());
        assert_eq!(ctl.mode(), NavMode::Idle);
        assert_eq!(active(&ctl), Some("a"));
    }

    #[test]
    fn resolver_dropped_while_auto_scrolling() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        ctl.on_link_click("c", &sections());

        // Animation passes over "a".
        let cmds = ctl.on_scroll(0.0, &sections());
        assert!(matches!(cmds.as_slice(), [NavCmd::ArmSettleTimer { .. }]));
        assert!(ctl.on_resolved("a").is_empty());
        assert_eq!(active(&ctl), Some("c"));
        assert!(ctl.state().is_auto_scrolling());
    }

    #[test]
    fn settle_resumes_passive_tracking() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        let first = armed_token(&ctl.on_link_click("c", &sections()));
        let last = armed_token(&ctl.on_scroll(900.0, &sections()));

        assert!(!ctl.on_settle(first), "stale token must not settle");
        assert!(ctl.state().is_auto_scrolling());
        assert!(ctl.on_settle(last));
        assert_eq!(ctl.mode(), NavMode::Idle);
        assert!(ctl.state().pending_target().is_none());

        let cmds = ctl.on_scroll(0.0, &sections());
        assert_eq!(active(&ctl), Some("a"));
        assert!(cmds.contains(&NavCmd::SyncUrl {
            id: SectionId::new("a"),
            mode: HistoryMode::Replace
        }));
    }

    #[test]
    fn passive_scroll_within_same_section_is_silent() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        assert!(ctl.on_scroll(10.0, &sections()).is_empty());
        assert!(ctl.on_scroll(200.0, &sections()).is_empty());
    }

    #[test]
    fn second_click_retargets() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        let t1 = armed_token(&ctl.on_link_click("c", &sections()));
        let t2 = armed_token(&ctl.on_link_click("b", &sections()));
        assert_eq!(ctl.state().pending_target().map(SectionId::as_str), Some("b"));
        assert_eq!(active(&ctl), Some("b"));
        assert!(!ctl.on_settle(t1));
        assert!(ctl.on_settle(t2));
    }

    #[test]
    fn history_navigation_activates_without_writing_url() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        let cmds = ctl.on_history_navigate(Some("b"), &sections());
        assert_eq!(active(&ctl), Some("b"));
        assert!(ctl.state().is_auto_scrolling());
        assert!(!cmds.iter().any(|c| matches!(c, NavCmd::SyncUrl { .. })));
    }

    #[test]
    fn history_navigation_to_unknown_fragment_is_noop() {
        let mut ctl = controller();
        ctl.on_load(None, &sections());
        assert!(ctl.on_history_navigate(None, &sections()).is_empty());
        assert_eq!(ctl.mode(), NavMode::Idle);
    }
}
