//! Firey's Roulette entry point
//!
//! On the web, wires the page and runs the animation-frame loop.
//! Natively, plays a seeded batch of throws headlessly.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use firey_roulette::Settings;
    use firey_roulette::consts::SIM_DT;
    use firey_roulette::platform::dom::RouletteDom;
    use firey_roulette::sim::{ThrowPhase, ThrowSequencer};

    /// Minigame instance holding all state
    struct Game {
        sequencer: ThrowSequencer,
        dom: RouletteDom,
        rng: Pcg32,
        last_time: f64,
    }

    impl Game {
        fn new(settings: &Settings, dom: RouletteDom, seed: u64) -> Self {
            Self {
                sequencer: ThrowSequencer::from_settings(settings),
                dom,
                rng: Pcg32::seed_from_u64(seed),
                last_time: 0.0,
            }
        }

        /// Handle the throw trigger (button or Space)
        fn throw(&mut self) {
            let metrics = self.dom.metrics();
            if self.sequencer.start_throw(&mut self.rng, &metrics) {
                self.dom.set_trigger_enabled(false);
            }
        }

        fn is_idle(&self) -> bool {
            self.sequencer.phase() == ThrowPhase::Idle
        }

        /// Advance the throw and push changes to the page
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                SIM_DT
            };
            self.last_time = time;

            let was_idle = self.is_idle();
            let events = self.sequencer.tick(dt);
            if !was_idle || !events.is_empty() {
                self.dom.render(self.sequencer.stage());
            }
            for event in &events {
                self.dom.apply(event);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("No document, roulette disabled");
            return;
        };
        let Some(dom) = RouletteDom::query(&document) else {
            log::warn!("Roulette elements missing, minigame disabled");
            return;
        };

        let settings = match Settings::load() {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Invalid roulette settings, minigame disabled: {}", e);
                dom.set_trigger_enabled(false);
                return;
            }
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Roulette initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(&settings, dom, seed)));
        {
            let g = game.borrow();
            g.dom.show_counters(&g.sequencer.counters());
            g.dom.render(g.sequencer.stage());
        }

        setup_trigger_handlers(game.clone());
        request_animation_frame(game);

        log::info!("🔥 Firey's Roulette loaded! Click 'Throw!' or press Space to play.");
    }

    fn setup_trigger_handlers(game: Rc<RefCell<Game>>) {
        // Throw button
        {
            let game = game.clone();
            let button = game.borrow().dom.button().clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().throw();
            });
            let _ = button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space key
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() != "Space" {
                    return;
                }
                let mut g = game.borrow_mut();
                if g.is_idle() {
                    event.prevent_default();
                    g.throw();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use firey_roulette::Settings;
    use firey_roulette::consts::SIM_DT;
    use firey_roulette::sim::{StageMetrics, ThrowEvent, ThrowSequencer};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Firey's Roulette (native) starting...");
    log::info!("Native mode plays headlessly - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let throws: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Invalid roulette settings: {}", e);
            return;
        }
    };
    let mut sequencer = ThrowSequencer::from_settings(&settings);
    let mut rng = Pcg32::seed_from_u64(seed);
    // A 96px actor resting 360px above the ground marker
    let metrics = StageMetrics {
        actor_bottom: 320.0,
        actor_height: 96.0,
        ground_top: 680.0,
    };

    log::info!("Playing {} throws with seed {}", throws, seed);
    for n in 1..=throws {
        if !sequencer.start_throw(&mut rng, &metrics) {
            log::warn!("Throw {} rejected", n);
            continue;
        }
        let mut elapsed = 0.0;
        loop {
            let events = sequencer.tick(SIM_DT);
            elapsed += SIM_DT;
            for event in &events {
                if let ThrowEvent::Landed(outcome) = event {
                    println!("#{:<3} {:<12} at {:.2}s", n, outcome.kind.as_str(), elapsed);
                }
            }
            if events.contains(&ThrowEvent::Ready) {
                break;
            }
        }
    }

    let counters = sequencer.counters();
    println!(
        "\nfalls: {}  pokes: {}  successes: {}",
        counters.falls, counters.pokes, counters.successes
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
