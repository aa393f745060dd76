use crate::presentation::Layout;
use crate::result;

/// Somewhere a layout can be shown.
pub trait DisplaySink {
    fn show(&mut self, layout: &Layout) -> result::MetroDashResult<()>;
}

/// Writes layouts to the log. Train lines changing is worth an info line;
/// the ticking "ago" line only shows up at debug.
pub struct LogDisplay {
    last_layout: Option<Layout>,
}

impl LogDisplay {
    pub fn new() -> LogDisplay {
        return LogDisplay { last_layout: None };
    }
}

impl DisplaySink for LogDisplay {
    fn show(&mut self, layout: &Layout) -> result::MetroDashResult<()> {
        let changed = match self.last_layout {
            Some(ref last) => last.first != layout.first || last.second != layout.second,
            None => true,
        };

        let second = layout.second.as_ref().map(|l| l.text.as_str()).unwrap_or("");
        let updated = layout.updated.as_ref().map(|l| l.text.as_str()).unwrap_or("");

        if changed {
            info!("Display: [{}] [{}] [{}]", layout.first.text, second, updated);
        } else {
            debug!("Display: [{}] [{}] [{}]", layout.first.text, second, updated);
        }

        self.last_layout = Some(layout.clone());
        return Ok(());
    }
}

/// Shows every layout on each of its sinks. A failing sink doesn't stop
/// the others; the first error is returned.
pub struct FanOutDisplay {
    sinks: Vec<Box<dyn DisplaySink>>,
}

impl FanOutDisplay {
    pub fn new(sinks: Vec<Box<dyn DisplaySink>>) -> FanOutDisplay {
        return FanOutDisplay { sinks: sinks };
    }
}

impl DisplaySink for FanOutDisplay {
    fn show(&mut self, layout: &Layout) -> result::MetroDashResult<()> {
        let mut first_err = None;
        for sink in self.sinks.iter_mut() {
            if let Err(err) = sink.show(layout) {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }

        match first_err {
            Some(err) => return Err(err),
            None => return Ok(()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingDisplay;
    use super::{DisplaySink, FanOutDisplay, LogDisplay};
    use crate::presentation::PresentationState;
    use crate::result;

    struct BrokenDisplay;

    impl DisplaySink for BrokenDisplay {
        fn show(&mut self, _layout: &crate::presentation::Layout) -> result::MetroDashResult<()> {
            return Err(result::make_error("panel unplugged"));
        }
    }

    #[test]
    fn fan_out_reaches_every_sink() {
        let recorder = RecordingDisplay::new();
        let mut display = FanOutDisplay::new(vec![
            Box::new(BrokenDisplay),
            Box::new(LogDisplay::new()),
            Box::new(recorder.clone()),
        ]);

        let layout = PresentationState::new().layout(None);
        assert!(display.show(&layout).is_err());
        assert_eq!(1, recorder.count());
        assert_eq!(layout, recorder.last());
    }
}
