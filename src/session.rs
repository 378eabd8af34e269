//! Single-consumer session driver
//!
//! Owns the engine, the clock and the consumer side of the intent queue. Each
//! [`Session::pump`] applies every queued intent in send order and then runs
//! one frame, all at the same timestamp, so commands and frames never overlap.

use rand::RngCore;
use rand_pcg::Pcg32;

use crate::engine::Engine;
use crate::platform::input::{IntentQueue, IntentSender};
use crate::platform::time::Clock;

#[derive(Debug)]
pub struct Session<C, R = Pcg32> {
    engine: Engine<R>,
    clock: C,
    intents: IntentQueue,
}

impl<C: Clock, R: RngCore> Session<C, R> {
    pub fn new(engine: Engine<R>, clock: C) -> Self {
        Self {
            engine,
            clock,
            intents: IntentQueue::new(),
        }
    }

    /// Producer handle for input sources
    pub fn sender(&self) -> IntentSender {
        self.intents.sender()
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Apply pending intents, then advance one frame.
    ///
    /// Returns whether the frame loop should keep running.
    pub fn pump(&mut self) -> bool {
        let now_ms = self.clock.now_ms();
        for intent in self.intents.drain() {
            log::trace!("Applying {:?} at {}ms", intent, now_ms);
            self.engine.apply(intent, now_ms);
        }
        self.engine.advance(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::Intent;
    use crate::platform::time::ManualClock;
    use crate::settings::Settings;
    use crate::sim::state::{GameEvent, GamePhase};
    use rand::SeedableRng;

    fn session(clock: &ManualClock) -> Session<&ManualClock> {
        let engine = Engine::with_rng(Settings::default(), Pcg32::seed_from_u64(3));
        Session::new(engine, clock)
    }

    #[test]
    fn test_pump_without_start_does_nothing() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        assert!(!session.pump());
        assert_eq!(session.engine().state().phase, GamePhase::Ready);
    }

    #[test]
    fn test_intents_applied_in_order_before_frame() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let input = session.sender();
        assert!(input.send(Intent::Start));
        assert!(session.pump());

        clock.advance(16);
        input.send(Intent::Jump);
        input.send(Intent::ReleaseJump);
        assert!(session.pump());

        let events = session.engine_mut().drain_events();
        assert_eq!(events[0], GameEvent::Started);
        assert!(events.contains(&GameEvent::Jumped { double: false }));
        assert!(session.engine().state().character.is_jumping);
    }

    #[test]
    fn test_sender_from_other_thread() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let input = session.sender();
        std::thread::spawn(move || {
            input.send(Intent::Start);
            input.send(Intent::SetDifficulty(4));
        })
        .join()
        .unwrap();

        session.pump();
        assert!(session.engine().state().is_playing());
        assert_eq!(session.engine().state().difficulty_index, 4);
    }
}
