//! DOM bindings for the roulette page
//!
//! Looks up the minigame elements once. If any are missing the feature is
//! left unwired and the rest of the page keeps working.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use super::style::{actor_transform_css, hand_transform_css};
use crate::consts::HURT_FLASH_MS;
use crate::sim::{OutcomeKind, SessionCounters, Stage, StageMetrics, ThrowEvent};

const HURT_CLASS: &str = "hurt";

/// Handles to every element the minigame touches
#[derive(Clone)]
pub struct RouletteDom {
    actor: HtmlElement,
    hand: HtmlElement,
    ground: Element,
    button: HtmlButtonElement,
    falls: Element,
    pokes: Element,
    successes: Element,
}

fn find<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    let element = document.query_selector(selector).ok().flatten();
    let found = element.and_then(|el| el.dyn_into::<T>().ok());
    if found.is_none() {
        log::warn!("Roulette element {} not found", selector);
    }
    found
}

impl RouletteDom {
    /// Find all elements; None disables the minigame
    pub fn query(document: &Document) -> Option<Self> {
        Some(Self {
            actor: find(document, ".f_asset")?,
            hand: find(document, ".hand-img")?,
            ground: find(document, "#ground")?,
            button: find(document, "#throwBtn")?,
            falls: find(document, "#fall-count")?,
            pokes: find(document, "#poke-count")?,
            successes: find(document, "#success-count")?,
        })
    }

    pub fn button(&self) -> &HtmlButtonElement {
        &self.button
    }

    /// Measure the actor and ground marker
    pub fn metrics(&self) -> StageMetrics {
        let actor = self.actor.get_bounding_client_rect();
        let ground = self.ground.get_bounding_client_rect();
        StageMetrics {
            actor_bottom: actor.bottom() as f32,
            actor_height: actor.height() as f32,
            ground_top: ground.top() as f32,
        }
    }

    /// Write the current stage transforms to inline styles
    pub fn render(&self, stage: &Stage) {
        let actor_style = self.actor.style();
        let _ = actor_style.set_property("transform", &actor_transform_css(&stage.actor));
        let _ = actor_style.set_property("opacity", &format!("{:.3}", stage.actor.opacity));
        let _ = self
            .hand
            .style()
            .set_property("transform", &hand_transform_css(&stage.hand));
    }

    /// React to a sequencer event
    pub fn apply(&self, event: &ThrowEvent) {
        match event {
            ThrowEvent::Landed(outcome) => {
                let _ = self.actor.class_list().add_1(outcome.kind.tag());
            }
            ThrowEvent::TagsCleared => self.clear_tags(),
            ThrowEvent::CountersChanged(counters) => self.show_counters(counters),
            ThrowEvent::HurtFlash => self.flash_hurt(),
            ThrowEvent::Ready => self.set_trigger_enabled(true),
            ThrowEvent::PhaseEntered(_) => {}
        }
    }

    pub fn set_trigger_enabled(&self, enabled: bool) {
        self.button.set_disabled(!enabled);
    }

    pub fn show_counters(&self, counters: &SessionCounters) {
        self.falls.set_text_content(Some(&counters.falls.to_string()));
        self.pokes.set_text_content(Some(&counters.pokes.to_string()));
        self.successes
            .set_text_content(Some(&counters.successes.to_string()));
    }

    fn clear_tags(&self) {
        let classes = self.actor.class_list();
        for kind in OutcomeKind::ALL {
            let _ = classes.remove_1(kind.tag());
        }
    }

    /// Restart the hand's hurt animation, then drop the class
    fn flash_hurt(&self) {
        let classes = self.hand.class_list();
        let _ = classes.remove_1(HURT_CLASS);
        // Force reflow so the CSS animation restarts
        let _ = self.hand.offset_width();
        let _ = classes.add_1(HURT_CLASS);

        let Some(window) = web_sys::window() else {
            return;
        };
        let hand = self.hand.clone();
        let closure = Closure::<dyn FnMut()>::once(move || {
            let _ = hand.class_list().remove_1(HURT_CLASS);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            HURT_FLASH_MS,
        );
        closure.forget();
    }
}
