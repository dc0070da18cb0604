#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! A [`Guide`] owns an ordered list of [`Step`]s, a shared [`Overlay`], the
//! navigation [`Controller`], and a [`Roller`]. It moves between steps one
//! at a time; every transition is an `async fn` taking `&mut self`, so two
//! transitions can never overlap.
//!
//! # Invariants
//!
//! 1. `current_step() < len()` whenever the guide is non-empty.
//! 2. At most one step is highlighted at a time ([`Guide::active_step`]).
//! 3. A step without an overlay of its own is given the shared overlay when
//!    the guide first moves to it; a step with its own keeps it.
//! 4. [`Guide::move_to`] with an out-of-range index changes nothing and
//!    returns `Ok(false)`.
//! 5. Moving between two steps that show the same overlay leaves it on the
//!    page instead of fading it out and back in.
//!
//! # Example
//!
//! ```ignore
//! let mut guide = Guide::new(&page, steps, GuideOptions::default().on_done(callback(|| {})))?;
//! guide.start(&page).await?;
//! // host loop
//! guide.handle_event(&page, &event).await?;
//! ```

use std::fmt;
use std::rc::Rc;

use roller_backend::{Page, PageEvent};
use roller_widgets::{
    Callback, Controller, ControllerOptions, NavAction, Overlay, OverlayOptions, Tip, TipAction,
    TipOptions,
};

use crate::Result;
use crate::roller::{OverlayClickPolicy, Roller, RollerOptions};
use crate::step::Step;

/// Guide configuration.
pub struct GuideOptions {
    /// Shared overlay for steps that bring none. Created with default
    /// options when absent.
    pub overlay: Option<Rc<Overlay>>,
    /// Entry tip shown by [`Guide::start`]; its OK button starts the tour.
    pub tip: Option<TipOptions>,
    pub on_done: Option<Callback>,
    pub on_skip: Option<Callback>,
    pub controller: ControllerOptions,
    /// Defaults to [`OverlayClickPolicy::Ignore`].
    pub overlay_click: OverlayClickPolicy,
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self {
            overlay: None,
            tip: None,
            on_done: None,
            on_skip: None,
            controller: ControllerOptions::default(),
            overlay_click: OverlayClickPolicy::Ignore,
        }
    }
}

impl fmt::Debug for GuideOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideOptions")
            .field("overlay", &self.overlay)
            .field("tip", &self.tip)
            .field("on_done", &self.on_done.is_some())
            .field("on_skip", &self.on_skip.is_some())
            .field("controller", &self.controller)
            .field("overlay_click", &self.overlay_click)
            .finish()
    }
}

impl GuideOptions {
    #[must_use]
    pub fn overlay(mut self, overlay: Rc<Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    #[must_use]
    pub fn tip(mut self, tip: TipOptions) -> Self {
        self.tip = Some(tip);
        self
    }

    #[must_use]
    pub fn on_done(mut self, callback: Callback) -> Self {
        self.on_done = Some(callback);
        self
    }

    #[must_use]
    pub fn on_skip(mut self, callback: Callback) -> Self {
        self.on_skip = Some(callback);
        self
    }

    #[must_use]
    pub fn controller(mut self, options: ControllerOptions) -> Self {
        self.controller = options;
        self
    }

    #[must_use]
    pub fn overlay_click(mut self, policy: OverlayClickPolicy) -> Self {
        self.overlay_click = policy;
        self
    }
}

/// Sequences [`Step`]s through a [`Roller`].
pub struct Guide {
    steps: Vec<Step>,
    current: usize,
    active: Option<usize>,
    overlay: Rc<Overlay>,
    controller: Controller,
    roller: Roller,
    tip: Option<Tip>,
    on_done: Option<Callback>,
    on_skip: Option<Callback>,
}

impl fmt::Debug for Guide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guide")
            .field("steps", &self.steps.len())
            .field("current", &self.current)
            .field("active", &self.active)
            .field("overlay", &self.overlay)
            .field("controller", &self.controller)
            .field("tip", &self.tip)
            .finish_non_exhaustive()
    }
}

impl Guide {
    /// Build the guide's widgets. Nothing is shown until [`Guide::start`].
    ///
    /// # Errors
    ///
    /// Fails when a configured style cannot be applied.
    pub fn new<P: Page>(page: &P, steps: Vec<Step>, options: GuideOptions) -> Result<Self> {
        let GuideOptions {
            overlay,
            tip,
            on_done,
            on_skip,
            controller,
            overlay_click,
        } = options;

        let overlay = match overlay {
            Some(overlay) => overlay,
            None => Rc::new(Overlay::new(page, OverlayOptions::default())?),
        };
        let controller = Controller::new(page, controller, steps.len())?;
        let tip = tip.map(|tip| Tip::new(page, tip)).transpose()?;
        tracing::debug!(steps = steps.len(), tip = tip.is_some(), "guide.new");

        Ok(Self {
            steps,
            current: 0,
            active: None,
            overlay,
            controller,
            roller: Roller::new(RollerOptions::default().overlay_click(overlay_click)),
            tip,
            on_done,
            on_skip,
        })
    }

    /// Replace the navigation buttons' labels and styles.
    ///
    /// # Errors
    ///
    /// Fails when a configured style cannot be applied.
    pub fn configure<P: Page>(&mut self, page: &P, options: ControllerOptions) -> Result<&mut Self> {
        self.controller.remove(page);
        self.controller = Controller::new(page, options, self.steps.len())?;
        self.controller.update_position(page, self.current)?;
        if let Some(popover) = self.active.and_then(|i| self.steps[i].popover.as_ref()) {
            popover.attach_controller(page, &self.controller);
        }
        Ok(self)
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    /// The step currently highlighted, if any.
    pub fn active_step(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// The overlay given to steps without one.
    pub fn overlay(&self) -> &Rc<Overlay> {
        &self.overlay
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn tip(&self) -> Option<&Tip> {
        self.tip.as_ref()
    }

    /// Show the entry tip, or go straight to the first step.
    ///
    /// # Errors
    ///
    /// Fails when the first step's target cannot be resolved or a tip
    /// style cannot be applied.
    pub async fn start<P: Page>(&mut self, page: &P) -> Result<()> {
        tracing::debug!(steps = self.steps.len(), "guide.start");
        match self.tip.as_mut() {
            Some(tip) => tip.show(page).await?,
            None => {
                self.move_to(page, 0).await?;
            }
        }
        Ok(())
    }

    /// Highlight step `step`, unhighlighting the active one first.
    ///
    /// Returns `Ok(false)` without touching anything when `step` is out of
    /// range.
    ///
    /// # Errors
    ///
    /// Fails when the step's target cannot be resolved. The step stays
    /// active so [`Guide::cancel`] can clear what was already shown.
    pub async fn move_to<P: Page>(&mut self, page: &P, step: usize) -> Result<bool> {
        if step >= self.steps.len() {
            tracing::debug!(step, steps = self.steps.len(), "guide.move out of range");
            return Ok(false);
        }
        let incoming = match self.steps[step].overlay.as_ref() {
            Some(own) => Rc::clone(own),
            None => Rc::clone(&self.overlay),
        };
        self.leave(page, Some(&incoming)).await;
        tracing::debug!(from = self.current, to = step, "guide.move");
        self.current = step;

        let target = &mut self.steps[step];
        target.overlay.get_or_insert(incoming);
        self.controller.update_position(page, step)?;
        if let Some(popover) = target.popover.as_ref() {
            popover.attach_controller(page, &self.controller);
        }
        self.active = Some(step);
        self.roller.highlight(page, target).await?;
        Ok(true)
    }

    /// Unhighlight the active step. Does nothing when no step is active.
    pub async fn cancel<P: Page>(&mut self, page: &P) {
        self.leave(page, None).await;
    }

    /// Unhighlight the active step. Its overlay stays up when it is the
    /// same one `next_overlay` is about to show.
    async fn leave<P: Page>(&mut self, page: &P, next_overlay: Option<&Rc<Overlay>>) {
        let Some(index) = self.active.take() else {
            tracing::trace!("guide.cancel with nothing active");
            return;
        };
        let Some(step) = self.steps.get_mut(index) else {
            return;
        };
        let shared = match (step.overlay.as_ref(), next_overlay) {
            (Some(current), Some(next)) => Rc::ptr_eq(current, next),
            _ => false,
        };
        tracing::debug!(step = index, keep_overlay = shared, "guide.cancel");
        if shared {
            self.roller.hand_off(page, step).await;
        } else {
            self.roller.unhighlight(page, step).await;
        }
    }

    /// Next button: advance, or run `on_done` on the last step.
    ///
    /// # Errors
    ///
    /// Fails when the next step's target cannot be resolved.
    pub async fn next<P: Page>(&mut self, page: &P) -> Result<()> {
        if self.current + 1 >= self.steps.len() {
            self.cancel(page).await;
            tracing::debug!(step = self.current, "guide.done");
            if let Some(on_done) = self.on_done.as_mut() {
                on_done();
            }
            return Ok(());
        }
        self.move_to(page, self.current + 1).await?;
        Ok(())
    }

    /// Previous button: step back unless already on the first step.
    ///
    /// # Errors
    ///
    /// Fails when the previous step's target cannot be resolved.
    pub async fn prev<P: Page>(&mut self, page: &P) -> Result<()> {
        match self.current.checked_sub(1) {
            Some(step) => {
                self.move_to(page, step).await?;
            }
            None => self.cancel(page).await,
        }
        Ok(())
    }

    /// Skip button: end the tour early and run `on_skip`.
    pub async fn skip<P: Page>(&mut self, page: &P) {
        self.cancel(page).await;
        tracing::debug!(step = self.current, "guide.skip");
        if let Some(on_skip) = self.on_skip.as_mut() {
            on_skip();
        }
    }

    /// Route one page event to whichever part of the guide subscribed to
    /// it. Returns whether the event was consumed.
    ///
    /// # Errors
    ///
    /// Propagates failures of the transition the event triggered.
    pub async fn handle_event<P: Page>(&mut self, page: &P, event: &PageEvent) -> Result<bool> {
        if let Some(tip) = self.tip.as_mut()
            && let Some(action) = tip.handle_event(page, event).await
        {
            if action == TipAction::Ok {
                self.move_to(page, 0).await?;
            }
            return Ok(true);
        }

        if let Some(action) = self.controller.action_for(event) {
            tracing::debug!(?action, "guide.navigate");
            match action {
                NavAction::Skip => self.skip(page).await,
                NavAction::Prev => self.prev(page).await?,
                NavAction::Next => self.next(page).await?,
            }
            return Ok(true);
        }

        let Some(index) = self.active else {
            return Ok(false);
        };
        let step = &mut self.steps[index];
        if step.popover.as_ref().is_some_and(|p| p.handle_event(page, event)) {
            return Ok(true);
        }
        if self.roller.handle_event(page, step, event).await {
            self.active = None;
            return Ok(true);
        }
        Ok(false)
    }
}
