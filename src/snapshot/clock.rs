use chrono::{DateTime, Local};

/// Wall-clock source used to name snapshot files
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
