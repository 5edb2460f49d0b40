//! # Effect Runtime
//!
//! Executes the `Effect`s returned by `core::action::update()`.
//!
//! Every effect becomes a tokio task that reports back by sending an
//! `Action` on the channel the event loop drains. The event loop stays the
//! only place state is mutated.
//!
//! The debounce timer is the only cancellable task: starting a new timer
//! aborts the previous one. HTTP calls always run to completion; whether
//! their result still matters is decided by `update()`.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use crate::api::WeatherApi;
use crate::core::action::{Action, Effect, update};
use crate::core::state::App;

pub struct Runtime {
    api: Arc<dyn WeatherApi>,
    tx: UnboundedSender<Action>,
    search_timer: Option<AbortHandle>,
}

impl Runtime {
    pub fn new(api: Arc<dyn WeatherApi>, tx: UnboundedSender<Action>) -> Self {
        Self {
            api,
            tx,
            search_timer: None,
        }
    }

    /// Run one effect. Returns true when the app should quit.
    pub fn execute(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::None => {}
            Effect::Quit => {
                self.cancel_search_timer();
                return true;
            }
            Effect::StartSearchTimer { generation, delay } => {
                self.cancel_search_timer();
                let tx = self.tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    send(&tx, Action::SearchTimerElapsed { generation });
                });
                self.search_timer = Some(handle.abort_handle());
            }
            Effect::CancelSearchTimer => self.cancel_search_timer(),
            Effect::Search { seq, query } => {
                // The timer that produced this effect has already fired.
                self.search_timer = None;
                self.spawn(move |api| async move {
                    let result = api.search_places(&query).await;
                    Action::SearchCompleted { seq, result }
                });
            }
            Effect::LoadWeather { city, location } => {
                self.spawn(move |api| async move {
                    let result = api.current_weather(&city, location.as_ref()).await;
                    Action::WeatherLoaded { city, result }
                });
            }
            Effect::Login(credentials) => {
                self.spawn(move |api| async move {
                    Action::LoginCompleted(api.login(&credentials).await)
                });
            }
            Effect::Register(credentials) => {
                self.spawn(move |api| async move {
                    Action::RegisterCompleted(api.register(&credentials).await)
                });
            }
            Effect::AddFavorite(location) => {
                self.spawn(move |api| async move {
                    let result = api.add_favorite(&location).await;
                    Action::FavoriteSaved { location, result }
                });
            }
            Effect::LoadFavorites => {
                self.spawn(|api| async move {
                    Action::FavoritesLoaded(api.favorite_locations().await)
                });
            }
        }
        false
    }

    fn cancel_search_timer(&mut self) {
        if let Some(handle) = self.search_timer.take() {
            debug!("Cancelling debounce timer");
            handle.abort();
        }
    }

    /// Spawn a backend call whose outcome is turned into an action.
    fn spawn<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<dyn WeatherApi>) -> Fut,
        Fut: std::future::Future<Output = Action> + Send + 'static,
    {
        let future = call(self.api.clone());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = future.await;
            send(&tx, action);
        });
    }
}

fn send(tx: &UnboundedSender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to deliver action: receiver dropped");
    }
}

/// `update()` followed by `execute()`. Returns true when the app should quit.
pub fn dispatch(app: &mut App, runtime: &mut Runtime, action: Action) -> bool {
    debug!("Dispatching {:?}", action);
    let effect = update(app, action);
    if effect != Effect::None {
        info!("Effect: {:?}", effect);
    }
    runtime.execute(effect)
}
