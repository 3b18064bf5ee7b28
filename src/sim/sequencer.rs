//! Scripted progression of the show.
//!
//! A pure state machine: it reads taps and the clock and answers with
//! [`Cue`]s. Delayed steps are a single `(deadline, step)` pair on the
//! simulation clock, so pausing the clock pauses the script.

use crate::config::{ShowConfig, Timing};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Warmup,
    GreetingFormation,
    WishCycle,
    Credits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    LaunchGreeting,
    ShowContinueHint,
    StartWishes,
    NextWish,
    RevealCredits,
}

/// Side effects requested by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    LaunchSound,
    ClickCount(u32),
    /// Rocket toward a tap while warming up, aimed a little above it
    WarmupRocket(Point),
    /// Gold rocket straight at a tap once the warmup is over
    FreeRocket(Point),
    /// Spell `text` in the sky with finale rockets
    LaunchText(String),
    /// Let the text currently in the sky fade out
    FadeText,
    StartMusic,
    ShowHint(String),
    HideHint,
    RevealClickCount,
    WishProgress { shown: usize, total: usize },
    ShowCredits,
}

#[derive(Debug)]
pub struct Sequencer {
    phase: Phase,
    target_clicks: u32,
    warmup_clicks: u32,
    total_clicks: u32,
    greeting: String,
    continue_hint: String,
    wishes: Vec<String>,
    next_wish: usize,
    timing: Timing,
    pending: Option<(f64, Step)>,
    music_started: bool,
}

impl Sequencer {
    pub fn new(config: &ShowConfig) -> Self {
        Self {
            phase: Phase::Idle,
            target_clicks: config.target_clicks,
            warmup_clicks: 0,
            total_clicks: 0,
            greeting: config.greeting.clone(),
            continue_hint: config.continue_hint.clone(),
            wishes: config.wishes.clone(),
            next_wish: 0,
            timing: config.timing,
            pending: None,
            music_started: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn warmup_clicks(&self) -> u32 {
        self.warmup_clicks
    }

    pub fn total_clicks(&self) -> u32 {
        self.total_clicks
    }

    pub fn wishes_shown(&self) -> usize {
        self.next_wish
    }

    pub fn music_started(&self) -> bool {
        self.music_started
    }

    /// Clock time of the next scripted step, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.map(|(deadline, _)| deadline)
    }

    /// Handles one user interaction at `at`.
    pub fn tap(&mut self, now: f64, at: Point, cues: &mut Vec<Cue>) {
        cues.push(Cue::LaunchSound);
        self.total_clicks += 1;
        cues.push(Cue::ClickCount(self.total_clicks));

        if self.phase == Phase::Idle {
            self.enter(Phase::Warmup);
        }

        if self.warmup_clicks >= self.target_clicks {
            self.start_music(cues);
            cues.push(Cue::HideHint);
            cues.push(Cue::FreeRocket(at));
            return;
        }

        self.warmup_clicks += 1;
        cues.push(Cue::WarmupRocket(at));

        if self.warmup_clicks == self.target_clicks {
            self.enter(Phase::GreetingFormation);
            self.schedule(now + self.timing.greeting_delay, Step::LaunchGreeting);
        }
    }

    /// Runs every scripted step whose deadline is at or before `now`.
    pub fn poll(&mut self, now: f64, cues: &mut Vec<Cue>) {
        while let Some((deadline, step)) = self.pending {
            if now < deadline {
                break;
            }
            self.pending = None;
            self.run(step, deadline, cues);
        }
    }

    /// Stops the wish timer. Other pending steps wait for the clock to resume.
    pub fn suspend(&mut self) {
        if let Some((_, Step::NextWish)) = self.pending {
            log::debug!("Wish timer cancelled");
            self.pending = None;
        }
    }

    /// Restarts the wish timer with a full period if it was cancelled.
    pub fn resume(&mut self, now: f64) {
        if self.phase == Phase::WishCycle
            && self.pending.is_none()
            && self.next_wish < self.wishes.len()
        {
            self.schedule(now + self.timing.wish_period, Step::NextWish);
        }
    }

    fn run(&mut self, step: Step, at: f64, cues: &mut Vec<Cue>) {
        match step {
            Step::LaunchGreeting => {
                cues.push(Cue::HideHint);
                cues.push(Cue::LaunchText(self.greeting.clone()));
                self.schedule(at + self.timing.hint_delay, Step::ShowContinueHint);
            }
            Step::ShowContinueHint => {
                cues.push(Cue::ShowHint(self.continue_hint.clone()));
                let rest = self.timing.wishes_delay - self.timing.hint_delay;
                self.schedule(at + rest, Step::StartWishes);
            }
            Step::StartWishes => {
                cues.push(Cue::HideHint);
                self.start_music(cues);
                cues.push(Cue::RevealClickCount);
                self.enter(Phase::WishCycle);
                if self.wishes.is_empty() {
                    log::warn!("No wishes configured, going straight to credits");
                    self.schedule(at + self.timing.credits_delay, Step::RevealCredits);
                } else {
                    self.schedule(at + self.timing.wish_period, Step::NextWish);
                }
            }
            Step::NextWish => {
                let Some(text) = self.wishes.get(self.next_wish).cloned() else {
                    self.schedule(at + self.timing.credits_delay, Step::RevealCredits);
                    return;
                };
                cues.push(Cue::FadeText);
                cues.push(Cue::LaunchText(text));
                self.next_wish += 1;
                cues.push(Cue::WishProgress {
                    shown: self.next_wish,
                    total: self.wishes.len(),
                });

                if self.next_wish >= self.wishes.len() {
                    self.schedule(at + self.timing.credits_delay, Step::RevealCredits);
                } else {
                    self.schedule(at + self.timing.wish_period, Step::NextWish);
                }
            }
            Step::RevealCredits => {
                self.enter(Phase::Credits);
                cues.push(Cue::ShowCredits);
            }
        }
    }

    fn schedule(&mut self, deadline: f64, step: Step) {
        log::debug!("Scheduled {step:?} at t={deadline:.3}");
        self.pending = Some((deadline, step));
    }

    fn start_music(&mut self, cues: &mut Vec<Cue>) {
        if !self.music_started {
            self.music_started = true;
            cues.push(Cue::StartMusic);
        }
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
