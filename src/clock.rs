/// Monotonic millisecond counter.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since this clock was created.
pub struct MonotonicClock {
    start: std::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> MonotonicClock {
        return MonotonicClock {
            start: std::time::Instant::now(),
        };
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        return self.start.elapsed().as_millis() as u64;
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::Cell;
    use std::rc::Rc;

    /// Hand-cranked clock; clones share the same time.
    #[derive(Clone)]
    pub struct FakeClock {
        now: Rc<Cell<u64>>,
    }

    impl FakeClock {
        pub fn new(start_ms: u64) -> FakeClock {
            return FakeClock { now: Rc::new(Cell::new(start_ms)) };
        }

        pub fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl super::Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            return self.now.get();
        }
    }
}
