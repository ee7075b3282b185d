//! # Animation Module
//!
//! The explode/implode timeline: two scalar channels (`scale`, `animate`)
//! driven through a repeating 4-segment cycle with independently timed
//! delays, durations, and easing curves.
//!
//! The timeline is a plain state machine sampled from the outside, either
//! frame-by-frame via [`ExplodeTimeline::advance`] or at arbitrary absolute
//! times via [`ExplodeTimeline::sample_at`]. That makes it testable without
//! a live timer, and it restarts itself forever without an external driver.

use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};

/// Supported easing functions for timeline transitions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
}

impl EasingFunction for EasingType {
    fn y(&self, x: f64) -> f64 {
        match self {
            EasingType::Linear => keyframe::functions::Linear.y(x),
            EasingType::EaseIn => keyframe::functions::EaseIn.y(x),
            EasingType::EaseOut => keyframe::functions::EaseOut.y(x),
            EasingType::EaseInOut => keyframe::functions::EaseInOut.y(x),
            // keyframe 1.1 ships no exponential family, so these are
            // computed inline with exact 0/1 endpoints.
            EasingType::ExpoIn => {
                if x <= 0.0 {
                    0.0
                } else if x >= 1.0 {
                    1.0
                } else {
                    (2.0f64).powf(10.0 * x - 10.0)
                }
            }
            EasingType::ExpoOut => {
                if x <= 0.0 {
                    0.0
                } else if x >= 1.0 {
                    1.0
                } else {
                    1.0 - (2.0f64).powf(-10.0 * x)
                }
            }
            EasingType::ExpoInOut => {
                if x <= 0.0 {
                    0.0
                } else if x >= 1.0 {
                    1.0
                } else if x < 0.5 {
                    (2.0f64).powf(20.0 * x - 10.0) * 0.5
                } else {
                    1.0 - (2.0f64).powf(-20.0 * x + 10.0) * 0.5
                }
            }
        }
    }
}

impl EasingType {
    /// Evaluates the easing curve at `x` in `[0, 1]`.
    pub fn eval(&self, x: f32) -> f32 {
        self.y(x as f64) as f32
    }
}

/// One scheduled transition of a scalar channel.
///
/// Times are measured from the start of the owning cycle. A non-positive
/// duration degenerates to an instantaneous jump at `delay` rather than a
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub delay: f32,
    pub duration: f32,
    pub ease: EasingType,
}

impl Tween {
    /// The channel value at cycle-local time `t`: the start value before the
    /// window opens, the eased interpolation inside it, the target after.
    pub fn value_at(&self, t: f32) -> f32 {
        if t < self.delay {
            return self.from;
        }
        if self.duration <= 0.0 {
            return self.to;
        }
        let progress = ((t - self.delay) / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.ease.eval(progress)
    }

    pub fn end_time(&self) -> f32 {
        self.delay + self.duration.max(0.0)
    }
}

/// Durations and curves for one explode/implode cycle.
///
/// The defaults reproduce the reference choreography: assemble over 3 s with
/// an exponential in-out, grow over 2 s, hold until the 4 s mark, then
/// shrink and disperse over 2.5 s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// `animate` 0→1 duration at cycle start.
    pub explode_duration: f32,
    pub explode_ease: EasingType,
    /// `scale` 0→1 duration at cycle start.
    pub scale_in_duration: f32,
    pub scale_in_ease: EasingType,
    /// Cycle time at which the teardown transitions begin.
    pub hold_interval: f32,
    /// `scale` 1→0 duration.
    pub scale_out_duration: f32,
    pub scale_out_ease: EasingType,
    /// `animate` 1→0 duration; its completion restarts the cycle.
    pub implode_duration: f32,
    pub implode_ease: EasingType,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            explode_duration: 3.0,
            explode_ease: EasingType::ExpoInOut,
            scale_in_duration: 2.0,
            scale_in_ease: EasingType::ExpoOut,
            hold_interval: 4.0,
            scale_out_duration: 2.5,
            scale_out_ease: EasingType::ExpoIn,
            implode_duration: 2.5,
            implode_ease: EasingType::ExpoOut,
        }
    }
}

/// Current values of both channels, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSample {
    pub scale: f32,
    pub animate: f32,
}

/// Where in the cycle the timeline currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelinePhase {
    /// Pieces flying in and growing toward the assembled shape.
    Assembling,
    /// Fully assembled, waiting out the hold interval.
    Holding,
    /// Shrinking and dispersing back out.
    Dispersing,
}

/// One scalar channel: its two scheduled tweens for the cycle plus the value
/// captured by the last `advance` call.
#[derive(Debug, Clone, Copy)]
struct Channel {
    assemble: Tween,
    disperse: Tween,
    value: f32,
}

impl Channel {
    fn new(assemble: Tween, disperse: Tween) -> Self {
        let value = assemble.from;
        Self {
            assemble,
            disperse,
            value,
        }
    }

    /// The later-scheduled tween wins once its window opens.
    fn value_at(&self, u: f32) -> f32 {
        if u < self.disperse.delay {
            self.assemble.value_at(u)
        } else {
            self.disperse.value_at(u)
        }
    }
}

/// The perpetual explode/implode state machine.
///
/// One instance drives one visual's uniforms; independent visuals get
/// independent instances. External events (resize and the like) never touch
/// the phase clock.
#[derive(Debug, Clone)]
pub struct ExplodeTimeline {
    config: TimelineConfig,
    /// Time into the current cycle.
    elapsed: f32,
    scale: Channel,
    animate: Channel,
}

impl ExplodeTimeline {
    pub fn new(config: TimelineConfig) -> Self {
        let scale = Channel::new(
            Tween {
                from: 0.0,
                to: 1.0,
                delay: 0.0,
                duration: config.scale_in_duration,
                ease: config.scale_in_ease,
            },
            Tween {
                from: 1.0,
                to: 0.0,
                delay: config.hold_interval,
                duration: config.scale_out_duration,
                ease: config.scale_out_ease,
            },
        );
        let animate = Channel::new(
            Tween {
                from: 0.0,
                to: 1.0,
                delay: 0.0,
                duration: config.explode_duration,
                ease: config.explode_ease,
            },
            Tween {
                from: 1.0,
                to: 0.0,
                delay: config.hold_interval,
                duration: config.implode_duration,
                ease: config.implode_ease,
            },
        );
        Self {
            config,
            elapsed: 0.0,
            scale,
            animate,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Length of one full cycle: the implode completing restarts everything.
    pub fn cycle_duration(&self) -> f32 {
        (self.config.hold_interval + self.config.implode_duration.max(0.0)).max(0.0)
    }

    /// Pure sampling at an absolute time since the timeline started, with
    /// the infinite restart folded in.
    pub fn sample_at(&self, t: f32) -> TimelineSample {
        let u = self.cycle_time(t);
        TimelineSample {
            scale: self.scale.value_at(u),
            animate: self.animate.value_at(u),
        }
    }

    /// Advances the frame clock by `dt` seconds and returns the new values.
    pub fn advance(&mut self, dt: f32) -> TimelineSample {
        let cycle = self.cycle_duration();
        self.elapsed += dt.max(0.0);
        if cycle > 0.0 && self.elapsed >= cycle {
            self.elapsed = self.elapsed.rem_euclid(cycle);
        }
        let sample = self.sample_at(self.elapsed);
        self.scale.value = sample.scale;
        self.animate.value = sample.animate;
        sample
    }

    /// Values captured by the last `advance` call.
    pub fn current(&self) -> TimelineSample {
        TimelineSample {
            scale: self.scale.value,
            animate: self.animate.value,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn phase(&self) -> TimelinePhase {
        let u = self.cycle_time(self.elapsed);
        if u >= self.config.hold_interval {
            TimelinePhase::Dispersing
        } else if u >= self.animate.assemble.end_time().max(self.scale.assemble.end_time()) {
            TimelinePhase::Holding
        } else {
            TimelinePhase::Assembling
        }
    }

    fn cycle_time(&self, t: f32) -> f32 {
        let cycle = self.cycle_duration();
        if cycle <= 0.0 {
            0.0
        } else {
            t.rem_euclid(cycle)
        }
    }
}
