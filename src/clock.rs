use gba_dns::GameTime;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Stand-in for the cartridge RTC: advances game minutes as frames elapse.
pub struct SimClock {
    pub minute_of_day: u32,
    pub frames_per_minute: u32,
    frame_counter: u32,
    pub paused: bool,
}

impl SimClock {
    pub fn new(start: GameTime, frames_per_minute: u32) -> Self {
        SimClock {
            minute_of_day: (start.hour as u32 * 60 + start.minute as u32) % MINUTES_PER_DAY,
            frames_per_minute: frames_per_minute.max(1),
            frame_counter: 0,
            paused: false,
        }
    }

    pub fn now(&self) -> GameTime {
        GameTime::new((self.minute_of_day / 60) as u8, (self.minute_of_day % 60) as u8)
    }

    /// Called once per frame. Returns true when the hour rolled over.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.frame_counter += 1;
        if self.frame_counter < self.frames_per_minute {
            return false;
        }
        self.frame_counter = 0;
        self.advance_minutes(1)
    }

    pub fn advance_minutes(&mut self, minutes: u32) -> bool {
        let old_hour = self.minute_of_day / 60;
        self.minute_of_day = (self.minute_of_day + minutes) % MINUTES_PER_DAY;
        self.minute_of_day / 60 != old_hour
    }

    pub fn advance_hours(&mut self, hours: u32) {
        self.advance_minutes(hours * 60);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_after_frames() {
        let mut clock = SimClock::new(GameTime::new(5, 58), 3);
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert_eq!(clock.now(), GameTime::new(5, 59));
        clock.tick();
        clock.tick();
        assert!(clock.tick());
        assert_eq!(clock.now(), GameTime::new(6, 0));
    }

    #[test]
    fn test_wraps_at_midnight() {
        let mut clock = SimClock::new(GameTime::new(23, 30), 1);
        clock.advance_hours(1);
        assert_eq!(clock.now(), GameTime::new(0, 30));
    }

    #[test]
    fn test_paused_clock_holds() {
        let mut clock = SimClock::new(GameTime::new(12, 0), 1);
        clock.paused = true;
        for _ in 0..100 {
            clock.tick();
        }
        assert_eq!(clock.now(), GameTime::new(12, 0));
    }
}
