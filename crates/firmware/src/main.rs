//! Pico Player firmware - entry point (RP2040).
//!
//! Core 0 runs a high-priority interrupt executor (encoder edges, UI tick)
//! and the thread executor (LED, player). Core 1 runs the UI task alone.

#![no_std]
#![no_main]

use embassy_executor::{Executor, InterruptExecutor};
use embassy_futures::select::select;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{I2C0, UART1};
use embassy_rp::uart::{self, Uart};
use embassy_time::Instant;
use platform::UartConfig;
use playback::MediaSource;
use static_cell::StaticCell;

use firmware::boot::OLED_I2C_FREQUENCY_HZ;
use firmware::config::{PlayerTiming, UiTiming, UI_STACK_HEADROOM_MIN, UI_STACK_SIZE, UI_TICK_PERIOD};
use firmware::hal::{uart_config, PlayerUart};
use firmware::panel::GpioButtons;
use firmware::supervisor::{halt_and_signal, paint_stack, FatalError, StackMonitor, StackRegion};
use firmware::{error, info};
use firmware::{PanelInput, PhaseLevels, SubsystemContext};

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UART1_IRQ => uart::InterruptHandler<UART1>;
});

type Context = SubsystemContext<PlayerUart, Output<'static>>;
type Oled = firmware::Oled<I2c<'static, I2C0, i2c::Blocking>>;

static mut CORE1_STACK: Stack<UI_STACK_SIZE> = Stack::new();
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();
static CONTEXT: StaticCell<Context> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    // SAFETY: SWI_IRQ_1 is reserved for EXECUTOR_HIGH and started below.
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[embassy_executor::task]
async fn encoder_edge_task(ctx: &'static Context, mut a: Input<'static>, mut b: Input<'static>) -> ! {
    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        let levels = PhaseLevels::new(a.is_high(), b.is_high());
        ctx.encoder.on_edge(levels, Instant::now().as_micros());
    }
}

#[embassy_executor::task]
async fn ui_timer_task(ctx: &'static Context) -> ! {
    firmware::timer::run(&ctx.ui_tick, UI_TICK_PERIOD).await
}

#[embassy_executor::task]
async fn ui_task(
    ctx: &'static Context,
    panel: PanelInput<'static, GpioButtons>,
    oled: Oled,
    monitor: StackMonitor,
) -> ! {
    firmware::ui_task::run(ctx, panel, oled, Some(monitor), UiTiming::default()).await
}

#[embassy_executor::task]
async fn led_task(ctx: &'static Context) {
    ctx.led.set_lit(true);
    info!("led: status on");
}

#[embassy_executor::task]
async fn player_task(ctx: &'static Context) -> ! {
    firmware::player::run(&ctx.commands, &ctx.player, PlayerTiming::default()).await
}

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("{} v{}", platform::config::APP_NAME, platform::config::APP_VERSION);
    let p = embassy_rp::init(Default::default());
    let mut led = Output::new(p.PIN_25, Level::Low);

    // SAFETY: `main` runs once and nothing else names CORE1_STACK; the
    // reference is handed to core 1 below and never used here again.
    let stack: &'static mut Stack<UI_STACK_SIZE> =
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) };
    paint_stack(&mut stack.mem);
    // SAFETY: the stack is static and was just painted.
    let region = unsafe { StackRegion::new(stack.mem.as_ptr().cast(), stack.mem.len()) };
    let monitor = StackMonitor::new(region, UI_STACK_HEADROOM_MIN);

    let uart = Uart::new(
        p.UART1,
        p.PIN_4,
        p.PIN_5,
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config(&UartConfig::default()),
    );
    let Some(slot) = CONTEXT.try_uninit() else {
        halt_and_signal(&mut led, FatalError::SyncPrimitives)
    };
    let ctx: &'static Context =
        slot.write(SubsystemContext::new(PlayerUart(uart), MediaSource::TfCard, led));
    info!("boot: shared context ready");

    let enc_a = Input::new(p.PIN_16, Pull::Up);
    let enc_b = Input::new(p.PIN_17, Pull::Up);
    ctx.encoder.reset(PhaseLevels::new(enc_a.is_high(), enc_b.is_high()));
    ctx.encoder.enable();

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    if high.spawn(encoder_edge_task(ctx, enc_a, enc_b)).is_err() {
        ctx.led.halt(FatalError::TaskSpawn);
    }
    if high.spawn(ui_timer_task(ctx)).is_err() {
        ctx.led.halt(FatalError::Timer);
    }

    let buttons = GpioButtons {
        enter: Input::new(p.PIN_12, Pull::Up),
        back: Input::new(p.PIN_13, Pull::Up),
        up: Input::new(p.PIN_14, Pull::Up),
        down: Input::new(p.PIN_15, Pull::Up),
    };
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = OLED_I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, i2c_config);

    spawn_core1(p.CORE1, stack, move || {
        let mut oled = Oled::new(i2c);
        if let Err(e) = oled.init() {
            error!("boot: oled init failed: {}", e.label());
        }
        let panel = PanelInput::new(buttons, &ctx.encoder);
        let executor1 = EXECUTOR1.init(Executor::new());
        executor1.run(|spawner| {
            if spawner.spawn(ui_task(ctx, panel, oled, monitor)).is_err() {
                ctx.led.halt(FatalError::TaskSpawn);
            }
        })
    });

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        if spawner.spawn(led_task(ctx)).is_err() || spawner.spawn(player_task(ctx)).is_err() {
            ctx.led.halt(FatalError::TaskSpawn);
        }
        info!("boot: all tasks spawned");
    })
}
