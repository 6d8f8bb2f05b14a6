use std::time::{Duration, Instant};

/// Session statistics shown next to the board. Kept in memory only.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    paused_at: Option<Instant>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            paused_at: None,
        }
    }

    /// Refresh the elapsed time; frozen while paused
    pub fn update(&mut self) {
        if self.paused_at.is_none() {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paused_at = None;
    }

    pub fn on_pause(&mut self) {
        self.update();
        self.paused_at = Some(Instant::now());
    }

    /// Shift the start time so the pause does not count as play time
    pub fn on_resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.start_time += paused_at.elapsed();
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.paused_at = Some(Instant::now());
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
