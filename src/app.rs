//! Application state and the frame loop that drives it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::{
    config::{AppConfig, ResultDisplay},
    geometry::Viewport,
    params::{ParamField, ParameterStore, Parameters},
    render::{draw_scene, Frame, FrameRecorder, Scene},
    solver::{CropProblem, LpOracle, SolveResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    S,
    B,
    N,
    Space,
}

/// What a key press does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Adjust { field: ParamField, delta: f64 },
    Solve,
}

impl Key {
    pub fn action(self) -> Action {
        let adjust = |field, delta| Action::Adjust { field, delta };
        match self {
            Key::Up => adjust(ParamField::Land, 1.0),
            Key::Down => adjust(ParamField::Land, -1.0),
            Key::Right => adjust(ParamField::Labor, 1.0),
            Key::Left => adjust(ParamField::Labor, -1.0),
            Key::W => adjust(ParamField::WheatProfit, 1.0),
            Key::S => adjust(ParamField::WheatProfit, -1.0),
            Key::B => adjust(ParamField::BarleyProfit, 1.0),
            Key::N => adjust(ParamField::BarleyProfit, -1.0),
            Key::Space => Action::Solve,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown key '{0}' (expected up, down, left, right, w, s, b, n or space)")]
pub struct KeyParseError(String);

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "w" => Ok(Key::W),
            "s" => Ok(Key::S),
            "b" => Ok(Key::B),
            "n" => Ok(Key::N),
            "space" => Ok(Key::Space),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyTyped { key: Key },
    CloseRequested,
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        InputEvent::KeyTyped { key }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Close,
}

/// Everything the screen shows that is not derived from something else.
#[derive(Debug, Clone)]
pub struct AppState {
    pub params: ParameterStore,
    pub last_result: Option<SolveResult>,
}

impl AppState {
    pub fn new(initial: Parameters) -> Self {
        Self {
            params: ParameterStore::new(initial),
            last_result: None,
        }
    }

    /// True once a solve happened and no parameter changed since.
    pub fn is_solved(&self) -> bool {
        self.last_result.is_some() && !self.params.is_dirty()
    }

    pub fn solve(&mut self, oracle: &dyn LpOracle) -> SolveResult {
        let problem = CropProblem::from(self.params.values());
        let result = oracle.solve(&problem);
        tracing::info!(
            solver = oracle.name(),
            land = problem.land,
            labor = problem.labor,
            wheat_profit = problem.wheat_profit,
            barley_profit = problem.barley_profit,
            optimal = result.is_optimal(),
            "solved crop plan"
        );
        self.last_result = Some(result);
        self.params.mark_solved();
        result
    }

    pub fn press(&mut self, key: Key, oracle: &dyn LpOracle) {
        match key.action() {
            Action::Adjust { field, delta } => {
                let value = self.params.adjust(field, delta);
                tracing::debug!(%key, %field, value, "parameter adjusted");
            }
            Action::Solve => {
                self.solve(oracle);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub solves: u64,
}

pub struct App {
    state: AppState,
    oracle: Box<dyn LpOracle + Send>,
    title: String,
    window_width: i32,
    window_height: i32,
    graph: Viewport,
    result_display: ResultDisplay,
    solves: u64,
}

impl App {
    pub fn new(config: &AppConfig, oracle: Box<dyn LpOracle + Send>) -> Self {
        Self {
            state: AppState::new(config.initial),
            oracle,
            title: config.title.clone(),
            window_width: config.window.width,
            window_height: config.window.height,
            graph: config.graph,
            result_display: config.result_display,
            solves: 0,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config, config.solver.build())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Applies one batch of input in arrival order.
    pub fn process(&mut self, events: &[InputEvent]) -> LoopControl {
        for event in events {
            match *event {
                InputEvent::KeyTyped { key } => {
                    if key == Key::Space {
                        self.solves += 1;
                    }
                    self.state.press(key, self.oracle.as_ref());
                }
                InputEvent::CloseRequested => return LoopControl::Close,
            }
        }
        LoopControl::Continue
    }

    pub fn visible_result(&self) -> Option<&SolveResult> {
        match self.result_display {
            ResultDisplay::KeepStale => self.state.last_result.as_ref(),
            ResultDisplay::HideStale if self.state.is_solved() => self.state.last_result.as_ref(),
            ResultDisplay::HideStale => None,
        }
    }

    pub fn render(&self) -> Frame {
        let mut recorder = FrameRecorder::new(&self.title, self.window_width, self.window_height);
        draw_scene(
            &mut recorder,
            &Scene {
                title: &self.title,
                params: self.state.params.values(),
                result: self.visible_result(),
                graph: &self.graph,
            },
        );
        recorder.present()
    }
}

/// Runs the frame loop until a close request arrives or every input sender
/// is gone. Blocks the calling thread; call it from a plain thread or
/// `spawn_blocking`, never from inside an async task.
///
/// Each iteration waits for input, drains whatever else is already queued,
/// applies the batch and publishes the new frame.
pub fn run_event_loop(
    mut app: App,
    mut input: mpsc::Receiver<InputEvent>,
    frames: watch::Sender<Frame>,
) -> LoopSummary {
    frames.send_replace(app.render());
    let mut summary = LoopSummary {
        frames: 1,
        solves: 0,
    };

    while let Some(first) = input.blocking_recv() {
        let mut batch = vec![first];
        while let Ok(event) = input.try_recv() {
            batch.push(event);
        }

        let control = app.process(&batch);
        if control == LoopControl::Close {
            tracing::info!("close requested");
            break;
        }
        frames.send_replace(app.render());
        summary.frames += 1;
    }

    summary.solves = app.solves;
    tracing::info!(frames = summary.frames, solves = summary.solves, "frame loop stopped");
    summary
}
