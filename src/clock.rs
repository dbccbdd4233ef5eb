use time::{Date, OffsetDateTime, UtcOffset};

/// Source of the calendar date handlers treat as "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Wall clock, read on every call, in a fixed UTC offset
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

/// Always reports the same date
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
