//! Core state trait.
//!
//! This module defines the [`State`] trait, the unit of behaviour a
//! [`StateMachine`] switches between. The trait is generic over the state
//! identifier `S` and a context type `C`, allowing states to read and update
//! the data owned by their controller.

use std::fmt::Debug;
use std::hash::Hash;

use crate::{DebugColor, StateMachine};

/// Identifier of a state inside a machine (usually a fieldless enum).
pub trait StateId: Copy + Eq + Hash + Debug + 'static {
    /// Human-readable name used for diagnostics.
    fn name(&self) -> &'static str;
}

/// Lifecycle hooks for a single state.
///
/// Every hook has an empty default so leaf states only implement what they
/// need.
pub trait State<S: StateId, C> {
    /// Called once when the machine switches into this state.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Called every tick while this state is current, after transitions
    /// have been resolved for that tick.
    fn tick(&mut self, _ctx: &mut C, _dt: f32) {}

    /// Called once when the machine switches away from this state.
    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Colour used when drawing this state for debugging.
    fn debug_color(&self) -> DebugColor {
        DebugColor::DEFAULT
    }

    /// The nested machine if this state is a sub-state-machine.
    ///
    /// Leaf states return `None`.
    fn nested(&self) -> Option<&StateMachine<S, C>> {
        None
    }
}

/// Blanket implementation for boxed states.
impl<S: StateId, C> State<S, C> for Box<dyn State<S, C>> {
    #[inline]
    fn on_enter(&mut self, ctx: &mut C) {
        (**self).on_enter(ctx)
    }

    #[inline]
    fn tick(&mut self, ctx: &mut C, dt: f32) {
        (**self).tick(ctx, dt)
    }

    #[inline]
    fn on_exit(&mut self, ctx: &mut C) {
        (**self).on_exit(ctx)
    }

    #[inline]
    fn debug_color(&self) -> DebugColor {
        (**self).debug_color()
    }

    #[inline]
    fn nested(&self) -> Option<&StateMachine<S, C>> {
        (**self).nested()
    }
}
