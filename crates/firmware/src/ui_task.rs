//! UI task: sample the panel every tick, queue commands, redraw on change.

use embassy_time::with_timeout;
use platform::{FlushTarget, InputSource, StatusLed, UartPeripheral};
use ui::{GestureMapper, NowPlayingView};

use crate::channel::{ChannelFull, CommandChannel};
use crate::config::UiTiming;
use crate::context::SubsystemContext;
use crate::guard::Guard;
use crate::player::PlayerLink;
use crate::supervisor::StackMonitor;

/// What one UI tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Commands accepted by the channel.
    pub sent: usize,
    /// A command was refused because the channel was full.
    pub dropped: bool,
    /// The view changed and was pushed to the panel.
    pub redrawn: bool,
}

/// UI state carried between ticks.
#[derive(Debug, Default)]
pub struct UiLoop {
    mapper: GestureMapper,
    shown: Option<NowPlayingView>,
}

impl UiLoop {
    /// Nothing drawn yet.
    pub const fn new() -> Self {
        Self {
            mapper: GestureMapper::new(),
            shown: None,
        }
    }

    /// One tick: poll input, queue the resulting commands, refresh the view.
    ///
    /// A full channel drops the command and everything after it in this
    /// tick; the user repeats the input. The view is refreshed only when the
    /// player guard is free right now, never by waiting for it.
    pub fn tick<I, U, D>(
        &mut self,
        input: &mut I,
        commands: &CommandChannel,
        player: &Guard<PlayerLink<U>>,
        display: &mut D,
    ) -> TickReport
    where
        I: InputSource,
        U: UartPeripheral,
        D: FlushTarget,
    {
        let mut report = TickReport::default();
        for command in self.mapper.on_tick(input.poll()) {
            if let Err(ChannelFull(refused)) = commands.try_send(command) {
                debug!("ui: command queue full, dropping {}", refused.label());
                report.dropped = true;
                break;
            }
            report.sent = report.sent.saturating_add(1);
        }

        let Some(view) = player
            .try_acquire()
            .map(|link| NowPlayingView::from_state(&link.state()))
        else {
            return report;
        };
        if self.shown == Some(view) {
            return report;
        }
        let region = match view.render_changes(self.shown.as_ref(), display) {
            Ok(Some(region)) => region,
            Ok(None) => {
                self.shown = Some(view);
                return report;
            }
            Err(_) => {
                warn!("ui: display draw failed");
                self.shown = None;
                return report;
            }
        };
        match display.flush_region(region) {
            Ok(()) => {
                self.shown = Some(view);
                report.redrawn = true;
            }
            Err(err) => {
                // Whatever reached the panel is unknown; repaint all of it.
                warn!("ui: display flush failed: {}", err.label());
                self.shown = None;
            }
        }
        report
    }
}

/// UI task body. `monitor` watches this task's own stack.
pub async fn run<I, U, L, D>(
    ctx: &SubsystemContext<U, L>,
    mut input: I,
    mut display: D,
    monitor: Option<StackMonitor>,
    timing: UiTiming,
) -> !
where
    I: InputSource,
    U: UartPeripheral,
    L: StatusLed,
    D: FlushTarget,
{
    let mut ui = UiLoop::new();
    info!("ui: started");
    loop {
        if with_timeout(timing.tick_timeout, ctx.ui_tick.wait()).await.is_err() {
            trace!("ui: tick late");
        }
        ui.tick(&mut input, &ctx.commands, &ctx.player, &mut display);
        if let Some(monitor) = &monitor {
            if let Err(fatal) = monitor.check() {
                ctx.led.halt(fatal);
            }
        }
    }
}
