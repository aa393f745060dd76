use crate::display::DisplaySink;
use crate::prediction::Predictions;
use crate::relative_time::RelativeTime;
use crate::result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        return Color { r: r, g: g, b: b };
    }
}

pub const COLOR_NEUTRAL: Color = Color::new(255, 255, 255);
pub const COLOR_ALERT: Color = Color::new(255, 0, 0);

// WMATA line codes.
const LINE_COLORS: [(&str, Color); 6] = [
    ("RD", Color::new(191, 13, 62)),
    ("BL", Color::new(0, 158, 222)),
    ("OR", Color::new(237, 139, 0)),
    ("GR", Color::new(0, 177, 64)),
    ("YL", Color::new(255, 209, 0)),
    ("SV", Color::new(145, 157, 157)),
];

pub fn line_color(line: &str) -> Color {
    return LINE_COLORS.iter()
        .find(|(code, _)| *code == line)
        .map(|(_, color)| *color)
        .unwrap_or(COLOR_NEUTRAL);
}

pub const NO_TRAINS_TEXT: &str = "No trains";
pub const ERROR_INDICATOR_TEXT: &str = "ERR - !";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    pub text: String,
    pub color: Color,
}

impl LayoutLine {
    fn new(text: &str, color: Color) -> LayoutLine {
        return LayoutLine { text: text.to_string(), color: color };
    }
}

/// What the 64x32 panel should show, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub first: LayoutLine,
    pub second: Option<LayoutLine>,
    pub updated: Option<LayoutLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub active: bool,
    pub message: String,
}

/// The trains and error flag currently on screen.
pub struct PresentationState {
    trains: Predictions,
    error: ErrorState,
}

impl PresentationState {
    pub fn new() -> PresentationState {
        return PresentationState {
            trains: Predictions::new(),
            error: ErrorState::default(),
        };
    }

    pub fn set_trains(&mut self, trains: &Predictions) {
        self.trains = trains.clone();
    }

    pub fn trains(&self) -> &Predictions {
        return &self.trains;
    }

    pub fn set_error(&mut self, message: &str) {
        self.error = ErrorState { active: true, message: message.to_string() };
    }

    pub fn clear_error(&mut self) {
        self.error = ErrorState::default();
    }

    pub fn error(&self) -> &ErrorState {
        return &self.error;
    }

    /// The poll loop reports an empty fetch through the error state, so it
    /// never reaches the line-1 placeholder; that only covers a state with
    /// no trains and no error set.
    pub fn layout(&self, updated: Option<RelativeTime>) -> Layout {
        let updated = updated.map(|t| LayoutLine::new(&t.to_string(), COLOR_NEUTRAL));

        if self.error.active {
            return Layout {
                first: LayoutLine::new(ERROR_INDICATOR_TEXT, COLOR_ALERT),
                second: Some(LayoutLine::new(&self.error.message, COLOR_ALERT)),
                updated: updated,
            };
        }

        let first = match self.trains.get(0).filter(|train| !train.is_absent()) {
            Some(train) => LayoutLine::new(&train.label(), line_color(&train.line)),
            None => LayoutLine::new(NO_TRAINS_TEXT, COLOR_NEUTRAL),
        };

        return Layout {
            first: first,
            second: self.trains.get(1).map(|train| LayoutLine::new(&train.label(), line_color(&train.line))),
            updated: updated,
        };
    }

    pub fn render(&self, sink: &mut dyn DisplaySink, elapsed_ms: Option<u64>) -> result::MetroDashResult<()> {
        let layout = self.layout(elapsed_ms.map(RelativeTime::from_elapsed_ms));
        return sink.show(&layout);
    }
}
