//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the composed
//! route view, and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Loads
//!
//! Every navigation returns `Effect::SpawnLoads`. The loop aborts the tasks
//! of the previous navigation and spawns one tokio task per request; each
//! task reports back as `Action::LoaderSettled`. Results that still arrive
//! from an aborted or superseded navigation are discarded by the navigator.
//! Scroll position is kept while a layout below the root stays mounted.
//!
//! ## Redraw Strategy
//!
//! While loads are pending the loop redraws every ~80ms to animate the
//! spinner. Idle, it sleeps up to 500ms and only redraws on events.

mod component;
mod components;
mod event;
mod ui;
pub mod view_lines;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::routing::{History, LoadRequest, RouteTree};
use crate::tui::component::EventHandler;
use crate::tui::components::{AddressBar, AddressEvent, HistoryEvent, HistoryPanelState, RouteViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Tab through links, Enter follows, arrows scroll.
    Browse,
    /// Editing the address bar. Enter navigates, Esc returns to Browse.
    Address,
}

/// TUI-specific presentation state (not part of core state)
pub struct TuiState {
    pub route_view: RouteViewState,
    pub address_bar: AddressBar,
    pub input_mode: InputMode,
    /// History overlay (None = hidden)
    pub history_panel: Option<HistoryPanelState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            route_view: RouteViewState::new(),
            address_bar: AddressBar::new(),
            input_mode: InputMode::Browse,
            history_panel: None,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Show);
    }
}

pub fn run(config: ResolvedConfig, tree: Arc<RouteTree>) -> std::io::Result<()> {
    let mut app = App::from_config(tree, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;
    execute!(stdout(), Hide)?;

    // Channel for actions from loader tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the loads of the current navigation
    let mut active_loads: Vec<tokio::task::AbortHandle> = Vec::new();

    let effect = update(&mut app, Action::Start);
    apply_effect(effect, &app, &mut tui, &mut active_loads, &tx);

    let start_time = Instant::now();
    let mut needs_redraw = true;

    loop {
        let animating = app.navigator.is_pending();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                break;
            }

            let action = match handle_event(&event, &app, &mut tui) {
                Some(action) => action,
                None => continue,
            };
            let effect = update(&mut app, action);
            if matches!(effect, Effect::Quit) {
                should_quit = true;
                break;
            }
            apply_effect(effect, &app, &mut tui, &mut active_loads, &tx);
        }

        if should_quit {
            break;
        }

        // Loader results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            apply_effect(effect, &app, &mut tui, &mut active_loads, &tx);
        }
    }

    for handle in active_loads.drain(..) {
        handle.abort();
    }
    ratatui::restore();
    Ok(())
}

/// Maps a terminal event to an action, handling TUI-local events in place.
fn handle_event(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    if let Some(panel) = tui.history_panel.as_mut() {
        return match panel.handle_event(event)? {
            HistoryEvent::Open(index) => {
                tui.history_panel = None;
                let entry = app.navigator.history().entries().get(index)?;
                Some(Action::Navigate(entry.path.clone()))
            }
            HistoryEvent::Dismiss => {
                tui.history_panel = None;
                None
            }
        };
    }

    match tui.input_mode {
        InputMode::Address => match tui.address_bar.handle_event(event)? {
            AddressEvent::Submit(path) => {
                tui.address_bar.editing = false;
                tui.input_mode = InputMode::Browse;
                Some(Action::Navigate(path))
            }
            AddressEvent::Cancel => {
                tui.address_bar.editing = false;
                tui.input_mode = InputMode::Browse;
                None
            }
            AddressEvent::ContentChanged => None,
        },
        InputMode::Browse => {
            if tui.route_view.handle_event(event).is_some() {
                return None;
            }
            match event {
                TuiEvent::NextLink => Some(Action::FocusNext),
                TuiEvent::PrevLink => Some(Action::FocusPrev),
                TuiEvent::Submit => Some(Action::FollowFocused),
                TuiEvent::Back | TuiEvent::CursorLeft | TuiEvent::Backspace => Some(Action::Back),
                TuiEvent::Forward | TuiEvent::CursorRight => Some(Action::Forward),
                TuiEvent::OpenAddress | TuiEvent::InputChar('/') => {
                    tui.input_mode = InputMode::Address;
                    tui.address_bar.editing = true;
                    if matches!(event, TuiEvent::InputChar('/')) {
                        tui.address_bar.set("/");
                    }
                    None
                }
                TuiEvent::ToggleHistory | TuiEvent::InputChar('h') => {
                    let history = app.navigator.history();
                    tui.history_panel = Some(HistoryPanelState::new(
                        history.entries().len(),
                        history.position(),
                    ));
                    None
                }
                TuiEvent::InputChar('q') | TuiEvent::Escape => Some(Action::Quit),
                _ => None,
            }
        }
    }
}

fn apply_effect(
    effect: Effect,
    app: &App,
    tui: &mut TuiState,
    active_loads: &mut Vec<tokio::task::AbortHandle>,
    tx: &mpsc::Sender<Action>,
) {
    if let Effect::SpawnLoads {
        loads,
        reset_scroll,
    } = effect
    {
        for handle in active_loads.drain(..) {
            handle.abort();
        }
        if reset_scroll {
            tui.route_view.reset();
        }
        *active_loads = spawn_loads(loads, app.loader_timeout, tx);
    }
}

fn spawn_loads(
    loads: Vec<LoadRequest>,
    timeout: Duration,
    tx: &mpsc::Sender<Action>,
) -> Vec<tokio::task::AbortHandle> {
    if !loads.is_empty() {
        info!("Spawning {} loader task(s)", loads.len());
    }
    loads
        .into_iter()
        .map(|request| {
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = request.run(timeout).await;
                let action = Action::LoaderSettled {
                    generation: request.generation,
                    instance: request.instance,
                    result,
                };
                if tx.send(action).is_err() {
                    warn!(
                        "Failed to deliver load for {}: receiver dropped",
                        request.context.path
                    );
                }
            })
            .abort_handle()
        })
        .collect()
}
