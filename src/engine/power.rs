use crate::constants::GHOST_BASE_BOUNTY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerTick {
    Idle,
    Running,
    Expired,
}

/// Session-wide power-mode countdown plus the per-window ghost bounty chain.
#[derive(Clone, Debug, Default)]
pub struct PowerTimer {
    remaining: u32,
    ghosts_eaten: u32,
}

impl PowerTimer {
    /// (Re)starts the window at full length and resets the bounty chain.
    pub fn start(&mut self, duration_ticks: u32) {
        self.remaining = duration_ticks;
        self.ghosts_eaten = 0;
    }

    pub fn tick(&mut self) -> PowerTick {
        if self.remaining == 0 {
            return PowerTick::Idle;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            PowerTick::Expired
        } else {
            PowerTick::Running
        }
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
        self.ghosts_eaten = 0;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_warning(&self, warning_ticks: u32) -> bool {
        self.is_active() && self.remaining <= warning_ticks
    }

    /// Records one more ghost eaten in this window: 200, 400, 800, 1600, ...
    pub fn claim_bounty(&mut self) -> u32 {
        self.ghosts_eaten += 1;
        let doublings = (self.ghosts_eaten - 1).min(16);
        GHOST_BASE_BOUNTY.saturating_mul(1 << doublings)
    }
}
