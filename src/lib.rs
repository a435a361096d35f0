pub mod app;
pub mod config;
pub mod geometry;
pub mod params;
pub mod render;
pub mod solver;
pub mod web;

pub use app::{App, AppState, InputEvent, Key};
pub use config::{AppConfig, ConfigLoader};
pub use geometry::{plot_constraints, ConstraintPlot, Viewport};
pub use params::{ParamField, ParameterStore, Parameters};
pub use solver::{CropProblem, GoodLpOracle, LpOracle, SolveResult, VertexOracle};
