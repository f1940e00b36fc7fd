use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

/// Step contributed by each `(previous << 2) | current` phase pair.
///
/// Phase code is `A << 1 | B`. Staying put and jumping diagonally
/// (00↔11, 01↔10, a missed edge) contribute 0. One full detent of a clockwise
/// turn walks 00 → 10 → 11 → 01 → 00 and sums to +4.
pub const TRANSITION_TABLE: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0, //
];

/// Sampled level of both encoder lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseLevels(u8);

impl PhaseLevels {
    /// Levels of line A and line B (`true` = high).
    pub const fn new(a: bool, b: bool) -> Self {
        PhaseLevels(((a as u8) << 1) | b as u8)
    }

    /// From a 2-bit phase code; higher bits are ignored.
    pub const fn from_code(code: u8) -> Self {
        PhaseLevels(code & 0b11)
    }

    /// 2-bit phase code `A << 1 | B`.
    pub const fn code(self) -> u8 {
        self.0
    }
}

/// Table step for moving from `previous` to `current`.
pub fn step(previous: PhaseLevels, current: PhaseLevels) -> i8 {
    let index = usize::from((previous.code() << 2) | current.code());
    TRANSITION_TABLE.get(index).copied().unwrap_or(0)
}

#[derive(Clone, Copy)]
struct EdgeState {
    count: i32,
    previous: PhaseLevels,
    last_accepted_us: Option<u64>,
}

/// Interrupt-side quadrature decoder.
///
/// [`on_edge`](Self::on_edge) is called from the GPIO edge handler. It never
/// blocks, allocates or fails: the whole update runs inside one short
/// critical section. Edges closer than the debounce window to the last
/// accepted edge are discarded entirely, so contact bounce neither counts nor
/// moves the reference phase.
pub struct QuadratureDecoder {
    state: Mutex<Cell<EdgeState>>,
    enabled: AtomicBool,
    debounce_us: u64,
}

impl QuadratureDecoder {
    /// Disabled decoder with phase reference 00.
    pub const fn new(debounce_us: u64) -> Self {
        Self {
            state: Mutex::new(Cell::new(EdgeState {
                count: 0,
                previous: PhaseLevels(0),
                last_accepted_us: None,
            })),
            enabled: AtomicBool::new(false),
            debounce_us,
        }
    }

    /// Re-seed the phase reference from the actual line levels and drop any
    /// pending count.
    pub fn reset(&self, levels: PhaseLevels) {
        critical_section::with(|cs| {
            self.state.borrow(cs).set(EdgeState {
                count: 0,
                previous: levels,
                last_accepted_us: None,
            });
        });
    }

    /// Start counting edges.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    /// Ignore edges until [`enable`](Self::enable).
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Whether edges are counted.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Handle one edge on either line, sampled at `now_us`.
    pub fn on_edge(&self, levels: PhaseLevels, now_us: u64) {
        if !self.is_enabled() {
            return;
        }
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            if let Some(last) = state.last_accepted_us {
                if now_us.saturating_sub(last) < self.debounce_us {
                    return;
                }
            }
            state.count = state
                .count
                .saturating_add(i32::from(step(state.previous, levels)));
            state.previous = levels;
            state.last_accepted_us = Some(now_us);
            cell.set(state);
        });
    }

    /// Atomically read the accumulated count and reset it to zero.
    pub fn take_count(&self) -> i32 {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let count = state.count;
            state.count = 0;
            cell.set(state);
            count
        })
    }

    /// Accumulated count without resetting it.
    pub fn pending(&self) -> i32 {
        critical_section::with(|cs| self.state.borrow(cs).get().count)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    const CW: [u8; 4] = [0b10, 0b11, 0b01, 0b00];
    const CCW: [u8; 4] = [0b01, 0b11, 0b10, 0b00];

    fn decoder() -> QuadratureDecoder {
        let d = QuadratureDecoder::new(100);
        d.reset(PhaseLevels::from_code(0));
        d.enable();
        d
    }

    fn feed(d: &QuadratureDecoder, codes: &[u8], start_us: u64, spacing_us: u64) -> u64 {
        let mut t = start_us;
        for &c in codes {
            d.on_edge(PhaseLevels::from_code(c), t);
            t += spacing_us;
        }
        t
    }

    #[test]
    fn clockwise_detent_counts_four() {
        let d = decoder();
        feed(&d, &CW, 0, 200);
        assert_eq!(d.take_count(), 4);
    }

    #[test]
    fn counter_clockwise_detent_counts_minus_four() {
        let d = decoder();
        feed(&d, &CCW, 0, 200);
        assert_eq!(d.take_count(), -4);
    }

    #[test]
    fn same_state_and_diagonal_pairs_are_zero() {
        for s in 0u8..4 {
            assert_eq!(step(PhaseLevels::from_code(s), PhaseLevels::from_code(s)), 0);
            assert_eq!(
                step(PhaseLevels::from_code(s), PhaseLevels::from_code(s ^ 0b11)),
                0
            );
        }
    }

    #[test]
    fn table_is_antisymmetric() {
        for prev in 0u8..4 {
            for cur in 0u8..4 {
                assert_eq!(
                    step(PhaseLevels::from_code(prev), PhaseLevels::from_code(cur)),
                    -step(PhaseLevels::from_code(cur), PhaseLevels::from_code(prev))
                );
            }
        }
    }

    #[test]
    fn bounce_inside_window_is_discarded() {
        let d = decoder();
        d.on_edge(PhaseLevels::from_code(0b10), 1_000);
        // bounce back and forth 40 µs later
        d.on_edge(PhaseLevels::from_code(0b00), 1_040);
        d.on_edge(PhaseLevels::from_code(0b10), 1_080);
        assert_eq!(d.pending(), 1);
        // outside the window the next legal edge counts from the last accepted phase
        d.on_edge(PhaseLevels::from_code(0b11), 1_100);
        assert_eq!(d.pending(), 2);
    }

    #[test]
    fn first_edge_is_always_accepted() {
        let d = decoder();
        d.on_edge(PhaseLevels::from_code(0b10), 0);
        assert_eq!(d.pending(), 1);
    }

    #[test]
    fn disabled_decoder_ignores_edges_and_keeps_timestamp() {
        let d = decoder();
        d.on_edge(PhaseLevels::from_code(0b10), 0);
        d.disable();
        d.on_edge(PhaseLevels::from_code(0b11), 500);
        assert_eq!(d.pending(), 1);
        d.enable();
        // 50 µs after the last *accepted* edge would be bounce; 500 µs is not
        d.on_edge(PhaseLevels::from_code(0b11), 600);
        assert_eq!(d.pending(), 2);
    }

    #[test]
    fn take_count_resets() {
        let d = decoder();
        feed(&d, &CW, 0, 200);
        assert_eq!(d.take_count(), 4);
        assert_eq!(d.take_count(), 0);
    }

    #[test]
    fn reset_seeds_phase_reference() {
        let d = decoder();
        d.reset(PhaseLevels::from_code(0b11));
        // 11 -> 01 is a clockwise step
        d.on_edge(PhaseLevels::from_code(0b01), 0);
        assert_eq!(d.pending(), 1);
    }
}
