use core::fmt::Debug;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

use super::input::InputMonitor;
use super::presenter::Presenter;
use super::task_client::TaskClient;
use crate::domain::entity::ButtonEvent;
use crate::domain::ports::{DisplaySurface, HttpTransport};

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Pause at the end of every tick.
    pub tick_delay_ms: u32,
    pub scroll_step_px: i32,
    pub scroll_step_delay_ms: u32,
    pub completion_step_px: i32,
    pub completion_step_delay_ms: u32,
    /// Re-query the list after this many ticks without a fetch. Zero disables it.
    pub poll_interval_ticks: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tick_delay_ms: 1000,
            scroll_step_px: 4,
            scroll_step_delay_ms: 100,
            completion_step_px: 4,
            completion_step_delay_ms: 25,
            poll_interval_ticks: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A completion sequence is running; new presses do not start another.
    Animating,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A press completed the current task.
    Completed,
    /// A press with no task held refreshed the list.
    Refreshed,
    /// One full scroll sweep ran without a press.
    Scrolled,
    /// The "no tasks" screen was drawn.
    Idle,
}

enum SweepEnd {
    Finished,
    Interrupted,
}

/// The device's main loop in normal mode.
pub struct Orchestrator<T, S, P, D>
where
    T: HttpTransport,
    S: DisplaySurface,
    P: InputPin,
    D: DelayNs,
{
    client: TaskClient<T>,
    presenter: Presenter<S>,
    input: InputMonitor<P>,
    delay: D,
    config: OrchestratorConfig,
    phase: Phase,
    ticks_since_fetch: u32,
}

impl<T, S, P, D> Orchestrator<T, S, P, D>
where
    T: HttpTransport,
    S: DisplaySurface,
    P: InputPin,
    D: DelayNs,
{
    pub fn new(
        client: TaskClient<T>,
        presenter: Presenter<S>,
        input: InputMonitor<P>,
        delay: D,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            client,
            presenter,
            input,
            delay,
            config,
            phase: Phase::Idle,
            ticks_since_fetch: 0,
        }
    }

    /// First fetch and first paint.
    pub async fn start(&mut self) {
        self.fetch().await;
        self.settle();
    }

    pub async fn run(mut self) -> ! {
        self.start().await;
        loop {
            self.tick().await;
        }
    }

    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = if self.input.poll() == ButtonEvent::Pressed {
            self.handle_press().await
        } else if !self.client.tasks_done() {
            match self.sweep_task().await {
                SweepEnd::Finished => TickOutcome::Scrolled,
                SweepEnd::Interrupted => self.handle_press().await,
            }
        } else {
            report(self.presenter.show_idle());
            TickOutcome::Idle
        };

        match outcome {
            TickOutcome::Completed | TickOutcome::Refreshed => self.ticks_since_fetch = 0,
            TickOutcome::Scrolled | TickOutcome::Idle => self.poll_if_due().await,
        }

        self.delay.delay_ms(self.config.tick_delay_ms).await;
        outcome
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn client(&self) -> &TaskClient<T> {
        &self.client
    }

    pub fn presenter(&self) -> &Presenter<S> {
        &self.presenter
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    async fn handle_press(&mut self) -> TickOutcome {
        if self.client.tasks_done() {
            info!("orchestrator: press without a task, refreshing");
            self.fetch().await;
            self.settle();
            return TickOutcome::Refreshed;
        }
        self.complete_current().await;
        TickOutcome::Completed
    }

    /// Mark done, play the banner, fetch the next task, then settle.
    async fn complete_current(&mut self) {
        self.phase = Phase::Animating;

        let task_id = self.client.current().id.clone();
        let marked = self.client.mark_done(&task_id).await;
        if let Err(e) = &marked {
            warn!("orchestrator: could not mark {} done: {:?}", task_id, e);
        }

        self.play_completion().await;

        let fetched = self.client.fetch_next().await;
        if marked.is_ok() && fetched.is_err() {
            self.client.echo_completed();
        }
        self.ticks_since_fetch = 0;

        self.settle();
        self.phase = Phase::Idle;
    }

    async fn sweep_task(&mut self) -> SweepEnd {
        for x in self.presenter.scroll_sweep(self.config.scroll_step_px) {
            report(self.presenter.draw_scroll_frame(self.client.current(), x));
            if self.input.poll() == ButtonEvent::Pressed {
                return SweepEnd::Interrupted;
            }
            self.delay.delay_ms(self.config.scroll_step_delay_ms).await;
        }
        SweepEnd::Finished
    }

    async fn play_completion(&mut self) {
        for x in self.presenter.completion_sweep(self.config.completion_step_px) {
            report(self.presenter.draw_completion_frame(x));
            // Keeps the latch in step; a second completion cannot start here.
            let _ = self.input.poll();
            self.delay.delay_ms(self.config.completion_step_delay_ms).await;
        }
    }

    async fn poll_if_due(&mut self) {
        self.ticks_since_fetch += 1;
        if self.config.poll_interval_ticks == 0
            || self.ticks_since_fetch < self.config.poll_interval_ticks
        {
            return;
        }
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        self.ticks_since_fetch = 0;
        if let Err(e) = self.client.fetch_next().await {
            warn!("orchestrator: fetch failed: {:?}", e);
        }
    }

    fn settle(&mut self) {
        report(
            self.presenter
                .show_settled(self.client.current(), self.client.tasks_done()),
        );
    }
}

fn report<E: Debug>(result: Result<(), E>) {
    if let Err(e) = result {
        warn!("orchestrator: display update failed: {:?}", e);
    }
}
