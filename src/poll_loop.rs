use crate::clock::Clock;
use crate::display::DisplaySink;
use crate::presentation::{PresentationState, NO_TRAINS_TEXT};
use crate::result::FetchErrorKind;
use crate::wmata::{ArrivalSource, FetchOutcome};

pub const DEFAULT_REFRESH_MS: u64 = 30_000;
pub const DEFAULT_REDRAW_MS: u64 = 1_000;

pub const TRANSPORT_ERROR_TEXT: &str = "API ERR";
pub const PARSE_ERROR_TEXT: &str = "PARSE ERR";
pub const OTHER_ERROR_TEXT: &str = "ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Polling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Refetch,
    Redraw,
}

/// Drives fetching and drawing.
///
/// Each `tick` is either a refetch (first tick, or `refresh_ms` since the
/// last attempt) or a plain redraw of the "ago" line. Both end by
/// re-rendering. A fetch blocks the tick it runs in, so nothing is ever
/// drawn from a half-finished fetch.
pub struct PollLoop {
    source: ArrivalSource,
    presentation: PresentationState,
    display: Box<dyn DisplaySink>,
    clock: Box<dyn Clock>,

    refresh_ms: u64,
    redraw_ms: u64,

    state: LoopState,
    // Scheduling only. Unlike the source's fetch time, this also moves when
    // the request never got an answer.
    last_attempt_ms: Option<u64>,
}

impl PollLoop {
    pub fn new(source: ArrivalSource,
               display: Box<dyn DisplaySink>,
               clock: Box<dyn Clock>,
               refresh_ms: u64,
               redraw_ms: u64) -> PollLoop {
        return PollLoop {
            source: source,
            presentation: PresentationState::new(),
            display: display,
            clock: clock,
            refresh_ms: refresh_ms,
            redraw_ms: redraw_ms,
            state: LoopState::Initializing,
            last_attempt_ms: None,
        };
    }

    pub fn state(&self) -> LoopState {
        return self.state;
    }

    pub fn presentation(&self) -> &PresentationState {
        return &self.presentation;
    }

    fn refetch_due(&self, now_ms: u64) -> bool {
        match self.last_attempt_ms {
            None => return true,
            Some(last) => return now_ms.saturating_sub(last) >= self.refresh_ms,
        }
    }

    pub fn tick(&mut self) -> TickKind {
        let now_ms = self.clock.now_ms();

        let kind = if self.refetch_due(now_ms) {
            self.refetch(now_ms);
            TickKind::Refetch
        } else {
            TickKind::Redraw
        };

        self.state = LoopState::Polling;
        self.redraw();

        return kind;
    }

    fn refetch(&mut self, now_ms: u64) {
        self.last_attempt_ms = Some(now_ms);
        let was_ok = self.source.last_fetch_ok();

        match self.source.fetch(self.clock.as_ref()) {
            Ok(FetchOutcome::Trains(_)) => {
                for i in 0..self.source.train_count() {
                    let train = self.source.train_at(i);
                    debug!("  Train {}: {} (Line {})", i + 1, train.label(), train.line);
                }
                self.presentation.set_trains(self.source.trains());
                self.presentation.clear_error();
            },
            Ok(FetchOutcome::NoTrains) => {
                info!("No trains for station {}", self.source.station_code());
                self.presentation.set_trains(self.source.trains());
                self.presentation.set_error(NO_TRAINS_TEXT);
            },
            Err(err) => {
                let message = match err.kind() {
                    FetchErrorKind::Transport => TRANSPORT_ERROR_TEXT,
                    FetchErrorKind::Parse => PARSE_ERROR_TEXT,
                    FetchErrorKind::Other => OTHER_ERROR_TEXT,
                };
                if was_ok {
                    error!("Fetch failed, will retry in {} ms: {}", self.refresh_ms, err);
                } else {
                    warn!("Fetch still failing, will retry in {} ms: {}", self.refresh_ms, err);
                }
                self.presentation.set_error(message);
            },
        }
    }

    fn redraw(&mut self) {
        let now_ms = self.clock.now_ms();
        let elapsed_ms = self.source.last_fetch_ms().map(|t| now_ms.saturating_sub(t));

        if let Err(err) = self.presentation.render(self.display.as_mut(), elapsed_ms) {
            warn!("Display update failed: {}", err);
        }
    }

    /// Redraw cadence, cut short so a refetch is never late.
    pub fn millis_until_next_tick(&self) -> u64 {
        match self.last_attempt_ms {
            None => return 0,
            Some(last) => {
                let until_refetch = last.saturating_add(self.refresh_ms)
                    .saturating_sub(self.clock.now_ms());
                return std::cmp::min(self.redraw_ms, until_refetch);
            }
        }
    }

    pub fn run(&mut self, one_shot: bool) {
        info!("Polling station {} every {} ms", self.source.station_code(), self.refresh_ms);

        loop {
            self.tick();

            if one_shot {
                break;
            }

            std::thread::sleep(std::time::Duration::from_millis(self.millis_until_next_tick()));
        }
    }
}
