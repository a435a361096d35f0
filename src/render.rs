//! Drawing primitives and the layout of the crop-planning screen.
//!
//! Nothing in here rasterizes. A [`DisplaySurface`] receives primitives in
//! painter's order; [`FrameRecorder`] keeps them as a serializable [`Frame`]
//! for the browser client to replay on a canvas.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{plot_constraints, ConstraintPlot, ScreenPoint, Viewport},
    params::{ParamField, Parameters},
    solver::SolveResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const LIGHT_GREEN: Color = Color::rgb(144, 238, 144);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Text {
        text: String,
        color: Color,
        x: i32,
        y: i32,
    },
    Line {
        color: Color,
        from: ScreenPoint,
        to: ScreenPoint,
    },
    FillRect {
        color: Color,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    StrokeRect {
        color: Color,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    FillTriangle {
        color: Color,
        vertices: [ScreenPoint; 3],
    },
}

/// The primitive operations a window or canvas has to offer.
pub trait DisplaySurface {
    fn clear(&mut self, color: Color);
    fn draw_text(&mut self, text: &str, color: Color, x: i32, y: i32);
    fn draw_line(&mut self, color: Color, from: ScreenPoint, to: ScreenPoint);
    fn fill_rectangle(&mut self, color: Color, x: i32, y: i32, width: i32, height: i32);
    fn draw_rectangle(&mut self, color: Color, x: i32, y: i32, width: i32, height: i32);
    fn fill_triangle(&mut self, color: Color, vertices: [ScreenPoint; 3]);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[ScreenPoint; 3]> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillTriangle { vertices, .. } => Some(vertices),
            _ => None,
        })
    }
}

/// Records primitives instead of drawing them.
pub struct FrameRecorder {
    frame: Frame,
}

impl FrameRecorder {
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            frame: Frame {
                title: title.into(),
                width,
                height,
                commands: Vec::new(),
            },
        }
    }

    /// Ends the frame and hands it over for presentation.
    pub fn present(self) -> Frame {
        self.frame
    }

    fn push(&mut self, command: DrawCommand) {
        self.frame.commands.push(command);
    }
}

impl DisplaySurface for FrameRecorder {
    fn clear(&mut self, color: Color) {
        // everything drawn before a clear is invisible
        self.frame.commands.clear();
        self.push(DrawCommand::Clear { color });
    }

    fn draw_text(&mut self, text: &str, color: Color, x: i32, y: i32) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            color,
            x,
            y,
        });
    }

    fn draw_line(&mut self, color: Color, from: ScreenPoint, to: ScreenPoint) {
        self.push(DrawCommand::Line { color, from, to });
    }

    fn fill_rectangle(&mut self, color: Color, x: i32, y: i32, width: i32, height: i32) {
        self.push(DrawCommand::FillRect {
            color,
            x,
            y,
            width,
            height,
        });
    }

    fn draw_rectangle(&mut self, color: Color, x: i32, y: i32, width: i32, height: i32) {
        self.push(DrawCommand::StrokeRect {
            color,
            x,
            y,
            width,
            height,
        });
    }

    fn fill_triangle(&mut self, color: Color, vertices: [ScreenPoint; 3]) {
        self.push(DrawCommand::FillTriangle { color, vertices });
    }
}

const TEXT_X: i32 = 50;
const RESULT_TOP: i32 = 450;
const LINE_SPACING: i32 = 30;

pub const INSTRUCTIONS: [&str; 5] = [
    "Use Up/Down arrows to adjust land values.",
    "Use Left/Right arrows to adjust labor values.",
    "Use W/S arrows to wheat profit values.",
    "Use B/N arrows to barley profit values.",
    "Press SPACE to optimise.",
];

/// What one frame shows.
pub struct Scene<'a> {
    pub title: &'a str,
    pub params: &'a Parameters,
    pub result: Option<&'a SolveResult>,
    pub graph: &'a Viewport,
}

pub fn draw_scene(surface: &mut impl DisplaySurface, scene: &Scene<'_>) {
    surface.clear(Color::WHITE);

    surface.draw_text(scene.title, Color::BLACK, TEXT_X, 50);
    for (row, line) in (0..).zip(INSTRUCTIONS) {
        surface.draw_text(line, Color::BLUE, TEXT_X, 80 + row * LINE_SPACING);
    }

    for (row, field) in (0..).zip(ParamField::ALL) {
        let text = format!("{}: {}", field.label(), scene.params.get(field));
        surface.draw_text(&text, Color::BLACK, TEXT_X, 260 + row * LINE_SPACING);
    }

    if let Some(result) = scene.result {
        for (row, line) in (0..).zip(result.lines()) {
            surface.draw_text(&line, Color::BLACK, TEXT_X, RESULT_TOP + row * LINE_SPACING);
        }
    }

    let plot = plot_constraints(scene.params.land, scene.params.labor, scene.graph);
    draw_plot(surface, &plot, scene.params);
}

/// Graph background, axes, labels, both constraint lines and, when the
/// lines cross in the first quadrant, the feasible triangle.
pub fn draw_plot(surface: &mut impl DisplaySurface, plot: &ConstraintPlot, params: &Parameters) {
    let vp = &plot.viewport;

    surface.fill_rectangle(Color::LIGHT_GRAY, vp.origin_x, vp.origin_y, vp.width, vp.height);
    surface.draw_rectangle(Color::BLACK, vp.origin_x, vp.origin_y, vp.width, vp.height);

    surface.draw_line(
        Color::BLACK,
        vp.bottom_left(),
        ScreenPoint::new(vp.right(), vp.bottom()),
    );
    surface.draw_line(
        Color::BLACK,
        ScreenPoint::new(vp.origin_x, vp.origin_y),
        vp.bottom_left(),
    );

    surface.draw_text(
        &format!("Wheat (x <= {})", params.land),
        Color::BLACK,
        vp.origin_x + vp.width / 2 - 50,
        vp.bottom() + 10,
    );
    surface.draw_text(
        &format!("Barley (y <= {})", params.labor / 2.0),
        Color::BLACK,
        vp.origin_x - 150,
        vp.origin_y + vp.height / 2 - 10,
    );

    surface.draw_text(
        &format!("Land: x + y <= {}", params.land),
        Color::BLUE,
        vp.origin_x + 10,
        vp.origin_y + 10,
    );
    surface.draw_text(
        &format!("Labor: x + 2y <= {}", params.labor),
        Color::RED,
        vp.origin_x + 10,
        vp.origin_y + 30,
    );

    surface.draw_line(Color::BLUE, plot.land_line.start, plot.land_line.end);
    surface.draw_line(Color::RED, plot.labor_line.start, plot.labor_line.end);

    if let Some(region) = &plot.feasible_region {
        surface.fill_triangle(Color::LIGHT_GREEN, region.vertices);
    }
}
