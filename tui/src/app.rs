//! Orchestrator
//!
//! The event loop that ties the stack together:
//! - Resolves the focus owner through the [`LayerRegistry`] on every event
//! - Forwards the event to that single owner (or the base view)
//! - Applies the returned [`Effect`]
//! - Renders a frame through the [`Compositor`] after each event
//!
//! Exactly one event is processed start to finish before the next one is
//! taken. Deferred work runs on the [`TaskRunner`] and its result re-enters
//! through the same queue, so nothing here ever waits on domain I/O.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::compositor::{CompositionRequest, Compositor, Placement};
use crate::config::{Config, StaleResultPolicy};
use crate::error::RunError;
use crate::events::{DomainResult, Effect, Event, Target};
use crate::geometry::Viewport;
use crate::layers::{Focus, LayerRegistry, Surface};
use crate::tasks::{EventSender, TaskRunner};
use crate::terminal::RenderSink;
use crate::theme::Theme;
use crate::widgets::Frame;

pub struct Orchestrator {
    // === Views ===
    /// Owns input whenever no panel is visible
    base: Box<dyn Surface>,
    layers: LayerRegistry,

    // === Rendering ===
    compositor: Compositor,
    /// Dim the base view behind centered panels
    dim_backdrop: bool,

    // === Event Plumbing ===
    stale_results: StaleResultPolicy,
    tasks: TaskRunner,
    /// Held between events only, so the queue closes when input goes away
    tx: Option<EventSender>,
    rx: mpsc::UnboundedReceiver<Event>,
    /// Results emitted by effects, handled before the next channel event
    queued: VecDeque<Event>,

    running: bool,
}

impl Orchestrator {
    pub fn new(
        mut base: Box<dyn Surface>,
        mut layers: LayerRegistry,
        viewport: Viewport,
        config: &Config,
        theme: Arc<Theme>,
    ) -> Self {
        base.set_size(viewport.width, viewport.height);
        for panel in layers.iter_mut() {
            panel.set_size(viewport.width, viewport.height);
        }

        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            base,
            layers,
            compositor: Compositor::new(viewport, theme),
            dim_backdrop: config.dim_backdrop,
            stale_results: config.stale_results,
            tasks: TaskRunner::new(&tx),
            tx: Some(tx),
            rx,
            queued: VecDeque::new(),
            running: true,
        }
    }

    /// A handle for feeding events into [`run`](Self::run)
    ///
    /// `None` once the queue has closed.
    pub fn sender(&self) -> Option<EventSender> {
        self.tx.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.compositor.viewport()
    }

    /// Who receives the next key event
    pub fn focus(&self) -> Focus {
        self.layers.owner()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerRegistry {
        &mut self.layers
    }

    /// Events emitted by effects and not yet handled
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Deferred tasks still running
    pub fn tasks_in_flight(&self) -> usize {
        self.tasks.in_flight()
    }

    // ========================================================================
    // Event Handling
    // ========================================================================

    /// Process a single event start to finish
    ///
    /// Results emitted while handling it are queued, not handled inline.
    pub fn handle_event(&mut self, event: Event) {
        match &event {
            Event::Resize { width, height } => self.resize(*width, *height),
            Event::Key(key) => {
                let owner = Target::from(self.focus());
                tracing::debug!(%owner, code = ?key.code, "Routing key");
                self.deliver(owner, &event);
            }
            Event::DomainResult(result) => {
                if let Some(target) = self.route_result(result) {
                    self.deliver(target, &event);
                }
            }
        }
    }

    /// Handle queued events until none are left or the loop quits
    pub fn drain_queued(&mut self) {
        while self.running {
            let Some(event) = self.queued.pop_front() else {
                break;
            };
            self.handle_event(event);
        }
    }

    /// Decide who receives a domain result
    ///
    /// A result without an origin, or from the current owner, goes to the
    /// owner. Anything else is stale and handled per the configured policy.
    pub fn route_result(&self, result: &DomainResult) -> Option<Target> {
        let owner = Target::from(self.focus());
        match result.origin {
            None => Some(owner),
            Some(origin) if origin == owner => Some(owner),
            Some(origin) => match self.stale_results {
                StaleResultPolicy::Base => {
                    tracing::debug!(%origin, %owner, "Stale result, refreshing base view");
                    Some(Target::Base)
                }
                StaleResultPolicy::Route => {
                    tracing::debug!(%origin, %owner, "Stale result, routing to focus owner");
                    Some(owner)
                }
                StaleResultPolicy::Drop => {
                    tracing::debug!(%origin, %owner, "Stale result dropped");
                    None
                }
            },
        }
    }

    fn deliver(&mut self, target: Target, event: &Event) {
        let effect = match target {
            Target::Base => self.base.update(event),
            Target::Panel(kind) => match self.layers.panel_mut(kind) {
                Some(panel) => panel.update(event),
                None => {
                    tracing::warn!(panel = kind.name(), "Event for unregistered panel");
                    return;
                }
            },
        };

        if let Some(effect) = effect {
            self.apply_effect(target, effect);
        }
    }

    /// Carry out an effect requested by `origin`
    pub fn apply_effect(&mut self, origin: Target, effect: Effect) {
        match effect {
            Effect::Open(kind) => {
                if self.layers.show(kind) {
                    tracing::debug!(%origin, panel = kind.name(), "Panel opened");
                } else {
                    tracing::warn!(%origin, panel = kind.name(), "Cannot open unregistered panel");
                }
            }
            Effect::Close(kind) => {
                if self.layers.hide(kind) {
                    tracing::debug!(%origin, panel = kind.name(), "Panel closed");
                }
            }
            Effect::Emit(result) => self.queued.push_back(Event::DomainResult(result)),
            Effect::Spawn(task) => self.tasks.spawn(origin, task),
            Effect::Batch(effects) => {
                for effect in effects {
                    self.apply_effect(origin, effect);
                }
            }
            Effect::Quit => {
                tracing::debug!(%origin, "Quit requested");
                self.running = false;
            }
        }
    }

    /// Update the viewport and tell every view its new size
    pub fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "Resize");
        self.compositor.resize(Viewport::new(width, height));
        self.base.set_size(width, height);
        for panel in self.layers.iter_mut() {
            panel.set_size(width, height);
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Compose the base view and the focus owner into one frame
    pub fn render(&self) -> Frame {
        let base = self.base.view();
        let request = match self.layers.owner_panel() {
            None => CompositionRequest::base(base),
            Some(panel) => {
                let placement = panel.kind().placement();
                CompositionRequest {
                    base,
                    overlay: Some(panel.view()),
                    dim: self.dim_backdrop && placement == Placement::Centered,
                    placement,
                }
            }
        };
        self.compositor.frame(request)
    }

    /// Main event loop
    ///
    /// Presents an initial frame, then one frame per handled event until an
    /// effect requests quit. Also returns once every sender is gone and no
    /// deferred task is left to report back.
    pub async fn run<S: RenderSink>(&mut self, sink: &mut S) -> Result<(), RunError> {
        sink.present(&self.render())?;

        while self.running {
            let event = match self.queued.pop_front() {
                Some(event) => event,
                None => match self.next_event().await {
                    Some(event) => event,
                    None => {
                        tracing::debug!("Event queue closed");
                        break;
                    }
                },
            };

            self.handle_event(event);
            sink.present(&self.render())?;
        }

        tracing::debug!("Event loop stopped");
        Ok(())
    }

    /// Next event from the channel, `None` once it is closed and drained
    async fn next_event(&mut self) -> Option<Event> {
        if let Ok(event) = self.rx.try_recv() {
            return Some(event);
        }

        // Wait without a sender of our own
        let own = self.tx.take().map(|tx| tx.downgrade());
        let event = self.rx.recv().await;
        self.tx = own.and_then(|weak| weak.upgrade());
        event
    }
}
