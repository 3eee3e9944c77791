//! Hierarchical sub-state-machines.
//!
//! A [`SubStateMachine`] is a state whose behaviour is a nested
//! [`StateMachine`]. The outer machine treats it like any other state; while it
//! is current, every outer tick also ticks the nested machine.
//!
//! # Re-entry contract
//!
//! - On exit the nested machine is reset to "no current state"
//! - On enter the nested machine is explicitly set to the entry state
//!
//! Re-entering a sub-machine therefore never resumes a stale nested state.

use crate::{DebugColor, State, StateId, StateMachine};

pub struct SubStateMachine<S: StateId, C> {
    machine: StateMachine<S, C>,
    entry: S,
    color: DebugColor,
}

impl<S: StateId, C> SubStateMachine<S, C> {
    /// Wraps `machine`, entering `entry` every time this state is entered.
    pub fn new(machine: StateMachine<S, C>, entry: S) -> Self {
        Self {
            machine,
            entry,
            color: DebugColor::DEFAULT,
        }
    }

    /// Colour reported while the nested machine has no current state.
    pub fn with_color(mut self, color: DebugColor) -> Self {
        self.color = color;
        self
    }

    pub fn entry(&self) -> S {
        self.entry
    }

    pub fn machine(&self) -> &StateMachine<S, C> {
        &self.machine
    }

    /// Current state of the nested machine.
    pub fn current_state(&self) -> Option<S> {
        self.machine.current()
    }
}

impl<S: StateId, C> State<S, C> for SubStateMachine<S, C> {
    fn on_enter(&mut self, ctx: &mut C) {
        debug_assert!(
            self.machine.current().is_none(),
            "sub-state-machine entered while nested state {:?} is still active",
            self.machine.current()
        );
        self.machine.set_state(self.entry, ctx);
    }

    fn tick(&mut self, ctx: &mut C, dt: f32) {
        self.machine.tick(ctx, dt);
    }

    fn on_exit(&mut self, ctx: &mut C) {
        self.machine.reset(ctx);
    }

    fn debug_color(&self) -> DebugColor {
        match self.machine.current() {
            Some(_) => self.machine.debug_color(),
            None => self.color,
        }
    }

    fn nested(&self) -> Option<&StateMachine<S, C>> {
        Some(&self.machine)
    }
}
