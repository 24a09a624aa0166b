use crate::connections::{prelude::*, *};
use js_sys::Promise;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use super::{HttpPuzzleSource, JsTimer, LocalStorage, NavigatorShare};

#[cfg(debug_assertions)]
const LOG_LEVEL: log::Level = log::Level::Debug;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: log::Level = log::Level::Info;

#[wasm_bindgen(start)]
pub fn start() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    wasm_logger::init(wasm_logger::Config::new(LOG_LEVEL));
    log::info!("connections {}", crate::GIT_VERSION);
}

#[wasm_bindgen]
pub fn version() -> String {
    crate::GIT_VERSION.to_string()
}

type Source = CachedSource<RetryingSource<HttpPuzzleSource, JsTimer>, LocalStorage>;

struct State {
    controller: SessionController,
    store: SnapshotStore<LocalStorage>,
}

/// What the UI renders for the active session
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    date: PuzzleDate,
    puzzle_number: Option<u32>,
    tiles: Vec<String>,
    solved: Vec<Category>,
    guesses: Vec<Guess>,
    mistakes: usize,
    mistakes_remaining: usize,
    status: GameStatus,
    game_over: bool,
}

impl SessionView {
    fn with_controller(controller: &SessionController) -> Option<Self> {
        let session = controller.session()?;
        Some(Self {
            date: session.date(),
            puzzle_number: session.date().puzzle_number(),
            tiles: controller.tiles().to_vec(),
            solved: session.solved_categories().cloned().collect(),
            guesses: session.submitted_guesses().to_vec(),
            mistakes: session.mistakes(),
            mistakes_remaining: session.mistakes_remaining(),
            status: session.status(),
            game_over: session.is_game_over(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadView {
    /// "restored" | "fresh" | "stale" | "corrupt"
    restore: &'static str,
    fallback: bool,
    session: Option<SessionView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GuessView {
    /// "correct" | "oneAway" | "incorrect"
    verdict: &'static str,
    category: Option<Category>,
    session: Option<SessionView>,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let raw = serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    js_sys::JSON::parse(&raw)
}

fn restore_name(outcome: &RestoreOutcome) -> &'static str {
    match outcome {
        RestoreOutcome::Restored => "restored",
        RestoreOutcome::Fresh => "fresh",
        RestoreOutcome::Stale => "stale",
        RestoreOutcome::Corrupt(_) => "corrupt",
    }
}

/// The local calendar date (the puzzle changes at local midnight, not UTC)
fn today() -> Result<PuzzleDate, JsValue> {
    let now = js_sys::Date::new_0();
    PuzzleDate::new(now.get_full_year() as i32, (now.get_month() + 1) as u8, now.get_date() as u8)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

///
/// The object the page holds on to. Every method either returns synchronously or hands back a
/// Promise; the session itself never leaves Rust.
///
#[wasm_bindgen]
pub struct GameHandle {
    state: Rc<RefCell<State>>,
    source: Rc<Source>,
    link: Option<String>,
}

#[wasm_bindgen]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: Option<String>, link: Option<String>) -> Result<GameHandle, JsValue> {
        let storage = LocalStorage::open().ok_or_else(|| JsValue::from_str("localStorage is not available"))?;
        let http = api_base.map(HttpPuzzleSource::new).unwrap_or_default();
        let source = CachedSource::new(RetryingSource::new(http, JsTimer), storage.clone());

        Ok(Self {
            state: Rc::new(RefCell::new(State {
                controller: SessionController::new(GameConfig::default()),
                store: SnapshotStore::new(storage),
            })),
            source: Rc::new(source),
            link,
        })
    }

    ///
    /// Loads the puzzle for a date (ISO or M/D/YYYY, today when missing) and resolves with a
    /// LoadView. When nothing can be retrieved the embedded puzzle for that date is used instead.
    /// Rejects if another load started in the meantime.
    ///
    pub fn load(&self, date: Option<String>) -> Promise {
        let state = self.state.clone();
        let source = self.source.clone();
        future_to_promise(async move {
            let today = today()?;
            let date = match date {
                Some(raw) => raw.parse::<PuzzleDate>().map_err(|err| JsValue::from_str(&err.to_string()))?,
                None => today,
            };
            if !date.is_valid_game_date(today) {
                return Err(JsValue::from_str(&format!("there is no game for {}", date)));
            }

            let ticket = state.borrow_mut().controller.begin_load(date);
            let started = instant::Instant::now();
            let result = source.fetch_puzzle_for_date(date).await;
            log::debug!("retrieval for {} took {}ms", date, started.elapsed().as_millis());

            let mut state = state.borrow_mut();
            let State { controller, store } = &mut *state;
            let (outcome, fallback) = match controller.finish_load(ticket, result, store) {
                Ok(outcome) => (outcome, false),
                Err(LoadErr::Stale(date)) => {
                    return Err(JsValue::from_str(&format!("load for {} was superseded", date)));
                }
                Err(err) => {
                    log::warn!("couldn't load the puzzle for {}: {}", date, err);
                    let outcome = controller
                        .finish_with_fallback(ticket, store)
                        .map_err(|err| JsValue::from_str(&err.to_string()))?;
                    (outcome, true)
                }
            };

            to_js(&LoadView {
                restore: restore_name(&outcome),
                fallback,
                session: SessionView::with_controller(controller),
            })
        })
    }

    /// Submits a guess, resolving with a GuessView or throwing the reason it was rejected
    #[wasm_bindgen(js_name = submitGuess)]
    pub fn submit_guess(&self, words: Vec<String>) -> Result<JsValue, JsValue> {
        let mut state = self.state.borrow_mut();
        let State { controller, store } = &mut *state;
        let outcome = controller
            .submit_guess(&words, store)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let (verdict, category) = match outcome.verdict {
            Verdict::Correct(category) => ("correct", Some(category)),
            Verdict::OneAway => ("oneAway", None),
            Verdict::Incorrect => ("incorrect", None),
        };
        to_js(&GuessView {
            verdict,
            category,
            session: SessionView::with_controller(controller),
        })
    }

    pub fn shuffle(&self) -> Result<JsValue, JsValue> {
        let tiles = self.state.borrow_mut().controller.shuffle_tiles().to_vec();
        to_js(&tiles)
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&SessionView::with_controller(&self.state.borrow().controller))
    }

    #[wasm_bindgen(js_name = shareText)]
    pub fn share_text(&self) -> Option<String> {
        self.state.borrow().controller.share_text(self.link.as_deref())
    }

    /// Shares the result, resolving with "native" or "clipboard"
    pub fn share(&self) -> Promise {
        let text = self.share_text();
        future_to_promise(async move {
            let text = text.ok_or_else(|| JsValue::from_str("no puzzle is loaded"))?;
            let backend = NavigatorShare::open().ok_or_else(|| JsValue::from_str("no navigator"))?;

            let outcome = Cell::new(None);
            share_result(
                &text,
                &backend,
                &DeviceAllowList,
                |method| outcome.set(Some(Ok(method))),
                |err| outcome.set(Some(Err(err))),
            )
            .await;

            match outcome.take() {
                Some(Ok(ShareMethod::Native)) => Ok(JsValue::from_str("native")),
                Some(Ok(ShareMethod::Clipboard)) => Ok(JsValue::from_str("clipboard")),
                Some(Err(err)) => Err(JsValue::from_str(&err.to_string())),
                None => Err(JsValue::from_str(&ShareErr::Unavailable.to_string())),
            }
        })
    }

    /// Every date with saved progress and whether it was completed/failed
    pub fn archive(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().store.list_statuses())
    }

    #[wasm_bindgen(js_name = saveStats)]
    pub fn save_stats(&self, raw: String) -> Result<(), JsValue> {
        let stats: serde_json::Value = serde_json::from_str(&raw).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.state
            .borrow_mut()
            .store
            .save_stats(&stats)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = loadStats)]
    pub fn load_stats(&self) -> Option<String> {
        self.state.borrow().store.load_stats().map(|stats| stats.to_string())
    }
}
