//! Runtime task
//!
//! Owns the face runtime and every output it drives: the segment LCD, the
//! buzzer and the LED. Each wake-up feeds one input to the runtime, runs a
//! pass, then pushes whatever changed back out to the hardware and the
//! other tasks.
//!
//! The LCD controller has no blink or animation engine, so both are
//! emulated here on a 250 ms display timer.

use core::future::pending;

use defmt::*;
use embassy_futures::select::{select, select4, Either, Either4};
use embassy_time::{Delay, Duration, Ticker};

use movement_core::buzzer::{BuzzerOutput, TICK_HZ as SEQUENCER_HZ};
use movement_core::power::PowerState;
use movement_core::{Movement, Runtime};
use movement_hal::{Ht1621, PwmOutput};
use movement_hal_rp2040::gpio::OutputLine;
use movement_hal_rp2040::pwm::PwmChannel;

use crate::channels::{
    TickMode, BUTTON_EDGES, FAST_TICKS, FAST_TICK_ENABLE, FLUSH_FILES, RTC_TICK, SAVE_SETTINGS, TICK_MODE,
};
use crate::{clock, files};

/// Display timer step; the blink phase flips on every step
const DISPLAY_STEP_MS: u32 = 250;

pub type Lcd = Ht1621<OutputLine<'static>, OutputLine<'static>, OutputLine<'static>, Delay>;

/// Hardware driven by the runtime
pub struct Outputs {
    pub lcd: Lcd,
    pub buzzer: PwmChannel<'static>,
    /// Red, green, blue
    pub led: [PwmChannel<'static>; 3],
}

/// Timer that woke the task
enum Timed {
    Sequencer,
    Display,
}

/// Blink phase and sleep animation progress
struct DisplayTimer {
    blink_visible: bool,
    animation_ms: u32,
    redraw: bool,
}

impl DisplayTimer {
    fn new() -> Self {
        Self {
            blink_visible: true,
            animation_ms: 0,
            redraw: true,
        }
    }

    fn needed(movement: &Movement<'_>) -> bool {
        movement.display.sleep_animation().is_some() || movement.display.blink_mask().iter().any(|m| *m != 0)
    }

    fn step(&mut self, movement: &mut Movement<'_>) {
        if movement.display.blink_mask().iter().any(|m| *m != 0) {
            self.blink_visible = !self.blink_visible;
            self.redraw = true;
        } else {
            self.blink_visible = true;
        }
        if let Some(animation) = movement.display.sleep_animation() {
            self.animation_ms += DISPLAY_STEP_MS;
            if self.animation_ms >= animation.period_ms {
                self.animation_ms = 0;
                movement.display.advance_animation();
            }
        } else {
            self.animation_ms = 0;
        }
    }
}

/// What was last handed to the hardware and the other tasks
struct Published {
    power: PowerState,
    face: u8,
    tick_mode: Option<TickMode>,
    fast_tick: bool,
    buzzer: BuzzerOutput,
    led: (u8, u8, u8),
}

/// Tick source for a power state: once a minute unless active
pub fn tick_mode(power: PowerState, hz: u8) -> TickMode {
    match power {
        PowerState::Active => TickMode::Hz(hz),
        PowerState::LowEnergy | PowerState::BackupSleep => TickMode::Minute,
    }
}

/// Duty in 1/255 steps from a percentage
pub fn duty_from_percent(percent: u8) -> u8 {
    (u16::from(percent.min(100)) * 255 / 100) as u8
}

fn drive_buzzer(buzzer: &mut PwmChannel<'static>, output: BuzzerOutput) {
    match output {
        BuzzerOutput::Silent => buzzer.disable(),
        BuzzerOutput::Tone { period_us, duty_percent } => {
            buzzer.set_period_us(u32::from(period_us));
            buzzer.set_duty(duty_from_percent(duty_percent));
            buzzer.enable();
        }
    }
}

fn drive_led(led: &mut [PwmChannel<'static>; 3], (red, green, blue): (u8, u8, u8)) {
    for (channel, level) in led.iter_mut().zip([red, green, blue]) {
        if level == 0 {
            channel.disable();
        } else {
            channel.set_duty(level);
            channel.enable();
        }
    }
}

/// Push a pass's results out
fn publish(runtime: &mut Runtime<'static>, out: &mut Outputs, last: &mut Published, display: &mut DisplayTimer) {
    if let Some(utc) = runtime.take_rtc_update() {
        clock::set(utc);
        info!("Clock set to {:?}", utc);
    }

    let face = runtime.movement().current_face();
    if face != last.face {
        info!("Face {} -> {} ({})", last.face, face, runtime.registry().name(face));
        last.face = face;
    }

    let power = runtime.power_state();
    if power != last.power {
        info!("Power {:?} -> {:?}", last.power, power);
        if power == PowerState::BackupSleep {
            out.lcd.power_down();
        } else if last.power == PowerState::BackupSleep {
            out.lcd.init();
            display.redraw = true;
        }
        last.power = power;
    }

    let movement = runtime.movement_mut();
    if movement.display.take_dirty() || display.redraw {
        display.redraw = false;
        if power != PowerState::BackupSleep {
            out.lcd.write_frame(&movement.display.rendered(display.blink_visible));
        }
    }

    if movement.take_settings_dirty() {
        SAVE_SETTINGS.signal(movement.settings().to_record());
    }
    if files::is_dirty() {
        FLUSH_FILES.signal(());
    }

    let mode = tick_mode(power, runtime.tick_frequency());
    if last.tick_mode != Some(mode) {
        TICK_MODE.signal(mode);
        last.tick_mode = Some(mode);
    }

    let fast_tick = runtime.fast_tick_enabled();
    if fast_tick != last.fast_tick {
        FAST_TICK_ENABLE.signal(fast_tick);
        last.fast_tick = fast_tick;
    }

    let buzzer = runtime.buzzer_output();
    if buzzer != last.buzzer {
        drive_buzzer(&mut out.buzzer, buzzer);
        last.buzzer = buzzer;
    }

    let led = runtime.led_rgb();
    if led != last.led {
        drive_led(&mut out.led, led);
        last.led = led;
    }
}

#[embassy_executor::task]
pub async fn runtime_task(runtime: &'static mut Runtime<'static>, mut out: Outputs) {
    info!("Runtime task started");

    out.lcd.init();
    let mut last = Published {
        power: runtime.power_state(),
        face: runtime.movement().current_face(),
        tick_mode: None,
        fast_tick: false,
        buzzer: BuzzerOutput::Silent,
        led: (0, 0, 0),
    };
    let mut display = DisplayTimer::new();
    let mut sequencer = Ticker::every(Duration::from_hz(u64::from(SEQUENCER_HZ)));
    let mut display_timer = Ticker::every(Duration::from_millis(u64::from(DISPLAY_STEP_MS)));
    let mut buzzing = false;
    let mut animating = false;

    loop {
        runtime.run();
        publish(runtime, &mut out, &mut last, &mut display);

        // Restart idle timers so they do not burst to catch up
        let now_buzzing = runtime.movement().buzzer.is_active();
        if now_buzzing && !buzzing {
            sequencer.reset();
        }
        buzzing = now_buzzing;
        let now_animating = DisplayTimer::needed(runtime.movement());
        if now_animating && !animating {
            display_timer.reset();
        }
        animating = now_animating;

        let timers = async {
            let sequencer_tick = async {
                if buzzing {
                    sequencer.next().await
                } else {
                    pending().await
                }
            };
            let display_tick = async {
                if animating {
                    display_timer.next().await
                } else {
                    pending().await
                }
            };
            match select(sequencer_tick, display_tick).await {
                Either::First(()) => Timed::Sequencer,
                Either::Second(()) => Timed::Display,
            }
        };

        let woke = select4(BUTTON_EDGES.receive(), RTC_TICK.wait(), FAST_TICKS.receive(), timers).await;
        match woke {
            Either4::First(edge) => runtime.button_edge(edge.button, edge.pressed),
            Either4::Second(now) => runtime.rtc_tick(now),
            Either4::Third(()) => runtime.fast_tick(),
            Either4::Fourth(Timed::Sequencer) => runtime.buzzer_tick(),
            Either4::Fourth(Timed::Display) => display.step(runtime.movement_mut()),
        }
    }
}
