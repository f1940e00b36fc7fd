//! Cortex-M0+ fault handling.
//!
//! The M0+ has no MemManage, BusFault or UsageFault exceptions; every fault
//! escalates to HardFault. A fault is the stack-exhaustion path of last
//! resort: the UI stack monitor catches slow growth, a runaway write past the
//! stack ends up here.

/// Marker checked by the architecture tests so a missing handler module fails
/// the host build.
pub const HARDFAULT_DEFINED: bool = true;

/// HardFault handler (hardware target only).
///
/// Logs the stacked frame over RTT and halts. Returning from HardFault is
/// undefined, hence `-> !`.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault: pc=0x{:08X} lr=0x{:08X} xpsr=0x{:08X}",
        ef.pc(),
        ef.lr(),
        ef.xpsr()
    );
}
