use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{Action, GameConfig, GameEngine, GameState, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Periodic tick source for the game loop
///
/// Mirrors the engine's tick schedule: stopped while the game is not
/// running, and restarted from scratch whenever the period changes.
pub struct GameClock {
    timer: Option<Interval>,
    period: Option<Duration>,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            timer: None,
            period: None,
        }
    }

    /// Match the requested period. Returns true if the clock was rebuilt.
    pub fn sync(&mut self, period: Option<Duration>) -> bool {
        if period == self.period {
            return false;
        }

        self.timer = period.map(|period| {
            // First firing one full period from now, not immediately
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        });
        self.period = period;
        true
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick; never resolves while stopped
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.new_game();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut clock = GameClock::new();
        clock.sync(self.engine.tick_interval(&self.state));

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        log::info!(
            "starting {}x{} game, tick {:?}",
            self.state.columns(),
            self.state.rows(),
            self.state.tick_delay()
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = clock.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // Game over, pause and speed changes all show up here
            if clock.sync(self.engine.tick_interval(&self.state)) {
                log::trace!("tick clock now {:?}", clock.period());
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(action) => self.apply(action),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn apply(&mut self, action: Action) {
        let before = self.state.phase();
        if self.engine.handle(&mut self.state, action) {
            self.track_phase_change(before);
        }
    }

    fn update_game(&mut self) {
        let before = self.state.phase();
        self.engine.on_tick(&mut self.state);
        self.track_phase_change(before);
    }

    fn track_phase_change(&mut self, before: Phase) {
        match (before, self.state.phase()) {
            (Phase::Running, Phase::Paused) => self.metrics.on_pause(),
            (Phase::Paused, Phase::Running) => self.metrics.on_resume(),
            (Phase::Welcome | Phase::GameOver, Phase::Running) => self.metrics.on_game_start(),
            (Phase::Running, Phase::GameOver) => self.metrics.on_game_over(self.state.score()),
            _ => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default());
        assert_eq!(mode.state.phase(), Phase::Running);
        assert_eq!(mode.state.score(), 0);
    }

    #[test]
    fn test_welcome_then_start() {
        let mut mode = HumanMode::new(GameConfig {
            show_welcome: true,
            ..GameConfig::small()
        });
        assert_eq!(mode.state.phase(), Phase::Welcome);

        mode.apply(Action::Turn(Direction::Up));
        assert_eq!(mode.state.phase(), Phase::Welcome);

        mode.apply(Action::Start);
        assert_eq!(mode.state.phase(), Phase::Running);
    }

    #[test]
    fn test_game_over_is_recorded_once() {
        let mut mode = HumanMode::new(GameConfig::small());

        // Small board: head starts mid-row, the right wall is five moves away
        for _ in 0..10 {
            mode.update_game();
        }

        assert_eq!(mode.state.phase(), Phase::GameOver);
        assert_eq!(mode.metrics.games_played, 1);

        mode.apply(Action::Restart);
        assert_eq!(mode.state.phase(), Phase::Running);
        assert_eq!(mode.state.score(), 0);
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut mode = HumanMode::new(GameConfig::small());
        mode.apply(Action::TogglePause);
        let head = mode.state.head();

        mode.update_game();
        assert_eq!(mode.state.head(), head);
        assert_eq!(mode.engine.tick_interval(&mode.state), None);

        mode.apply(Action::TogglePause);
        assert_eq!(mode.state.phase(), Phase::Running);
    }

    #[tokio::test]
    async fn test_clock_follows_schedule() {
        let mut clock = GameClock::new();
        assert_eq!(clock.period(), None);

        assert!(clock.sync(Some(Duration::from_millis(150))));
        assert!(!clock.sync(Some(Duration::from_millis(150))));
        assert_eq!(clock.period(), Some(Duration::from_millis(150)));

        assert!(clock.sync(Some(Duration::from_millis(140))));
        assert!(clock.sync(None));
        assert_eq!(clock.period(), None);
    }

    #[tokio::test]
    async fn test_stopped_clock_never_fires() {
        let mut clock = GameClock::new();
        let fired = tokio::time::timeout(Duration::from_millis(20), clock.tick()).await;
        assert!(fired.is_err());

        clock.sync(Some(Duration::from_millis(5)));
        let fired = tokio::time::timeout(Duration::from_millis(500), clock.tick()).await;
        assert!(fired.is_ok());
    }
}
