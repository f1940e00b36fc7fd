//! Task table, fatal error signalling and the UI stack monitor.
//!
//! Every resource the tasks share is created before the first task is
//! spawned. A creation failure is not retried: the supervisor halts and
//! blinks the status LED with a count that identifies the failing site.

use core::mem::MaybeUninit;

use embassy_time::Duration;
use platform::StatusLed;
use thiserror_no_std::Error;

/// LED on-time of one blink.
pub const BLINK_ON: Duration = Duration::from_millis(500);
/// LED off-time after each blink.
pub const BLINK_OFF: Duration = Duration::from_millis(500);
/// Pause between two repetitions of a blink code.
pub const BLINK_GAP: Duration = Duration::from_millis(2_000);

/// Byte written over the UI stack before core 1 starts.
pub const STACK_PAINT: u8 = 0xA5;

/// Unrecoverable start-up or runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalError {
    /// Shared context could not be created.
    #[error("sync primitive creation failed")]
    SyncPrimitives,
    /// UI tick timer could not be started.
    #[error("ui timer creation failed")]
    Timer,
    /// A task could not be spawned.
    #[error("task spawn failed")]
    TaskSpawn,
    /// UI stack headroom fell below the threshold.
    #[error("ui stack exhausted")]
    StackHeadroom,
}

impl FatalError {
    /// Number of LED blinks identifying this failure.
    pub const fn blink_count(self) -> u8 {
        match self {
            Self::SyncPrimitives => 2,
            Self::Timer => 3,
            Self::TaskSpawn => 5,
            Self::StackHeadroom => 7,
        }
    }

    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::SyncPrimitives => "sync-primitives",
            Self::Timer => "timer",
            Self::TaskSpawn => "task-spawn",
            Self::StackHeadroom => "stack-headroom",
        }
    }
}

/// Blink `count` times, then wait out the gap. `delay` blocks for the given
/// duration.
pub fn blink_code<L, D>(led: &mut L, count: u8, mut delay: D)
where
    L: StatusLed + ?Sized,
    D: FnMut(Duration),
{
    for _ in 0..count {
        led.set_lit(true);
        delay(BLINK_ON);
        led.set_lit(false);
        delay(BLINK_OFF);
    }
    delay(BLINK_GAP);
}

/// Stop doing anything but blinking the code for `error`.
///
/// Busy-waits so it works with the executors stalled or not yet running.
pub fn halt_and_signal<L: StatusLed + ?Sized>(led: &mut L, error: FatalError) -> ! {
    error!(
        "supervisor: fatal {} (blink code {})",
        error.label(),
        error.blink_count()
    );
    loop {
        blink_code(led, error.blink_count(), embassy_time::block_for);
    }
}

/// Unwrap a start-up result or halt with `error`.
pub fn require<T, E, L>(result: Result<T, E>, error: FatalError, led: &mut L) -> T
where
    L: StatusLed + ?Sized,
{
    match result {
        Ok(value) => value,
        Err(_) => halt_and_signal(led, error),
    }
}

/// Core a task is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Core {
    /// Player, LED and interrupt-driven tasks.
    Core0,
    /// UI.
    Core1,
}

/// Scheduling class, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    /// Runs only when nothing else is ready.
    Background,
    /// Thread-mode executor.
    Thread,
    /// Interrupt executor; preempts thread-mode tasks.
    Interrupt,
}

/// One entry of the fixed task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Name used in logs.
    pub name: &'static str,
    /// Core affinity.
    pub core: Core,
    /// Scheduling class.
    pub priority: Priority,
    /// Task exits after its first run.
    pub one_shot: bool,
}

/// Tasks spawned at boot, in spawn order.
pub const TASKS: [TaskSpec; 5] = [
    TaskSpec {
        name: "encoder-edge",
        core: Core::Core0,
        priority: Priority::Interrupt,
        one_shot: false,
    },
    TaskSpec {
        name: "ui-timer",
        core: Core::Core0,
        priority: Priority::Interrupt,
        one_shot: false,
    },
    TaskSpec {
        name: "ui",
        core: Core::Core1,
        priority: Priority::Thread,
        one_shot: false,
    },
    TaskSpec {
        name: "led",
        core: Core::Core0,
        priority: Priority::Background,
        one_shot: true,
    },
    TaskSpec {
        name: "player",
        core: Core::Core0,
        priority: Priority::Thread,
        one_shot: false,
    },
];

/// Fill a stack with [`STACK_PAINT`] before anything runs on it.
pub fn paint_stack(memory: &mut [MaybeUninit<u8>]) {
    for byte in memory {
        byte.write(STACK_PAINT);
    }
}

/// Painted stack region whose untouched bottom can be measured while the
/// stack is in use.
pub struct StackRegion {
    base: *const u8,
    len: usize,
}

// SAFETY: the region is only ever read with volatile byte loads; a torn or
// stale read can only under-report usage by one byte.
unsafe impl Send for StackRegion {}
// SAFETY: as above; `headroom` takes `&self` and never writes.
unsafe impl Sync for StackRegion {}

impl StackRegion {
    /// Region over a painted stack that lives for the rest of the program.
    ///
    /// # Safety
    ///
    /// `base..base + len` must stay valid for reads while the region exists
    /// and must have been painted with [`paint_stack`].
    pub const unsafe fn new(base: *const u8, len: usize) -> Self {
        Self { base, len }
    }

    /// Size of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes at the low end still holding the paint pattern. The stack grows
    /// downwards, so this is the headroom that was never used.
    pub fn headroom(&self) -> usize {
        let mut untouched = 0;
        while untouched < self.len {
            // SAFETY: `untouched < len`, and the constructor contract makes the
            // whole range readable.
            let byte = unsafe { self.base.add(untouched).read_volatile() };
            if byte != STACK_PAINT {
                break;
            }
            untouched = untouched.saturating_add(1);
        }
        untouched
    }
}

/// Compares the UI stack headroom against a floor.
pub struct StackMonitor {
    region: StackRegion,
    minimum: usize,
}

impl StackMonitor {
    /// Monitor `region`, failing once headroom drops below `minimum` bytes.
    pub const fn new(region: StackRegion, minimum: usize) -> Self {
        Self { region, minimum }
    }

    /// Current headroom, or [`FatalError::StackHeadroom`] below the floor.
    pub fn check(&self) -> Result<usize, FatalError> {
        let headroom = self.region.headroom();
        if headroom < self.minimum {
            return Err(FatalError::StackHeadroom);
        }
        Ok(headroom)
    }
}
