//! Guarded transitions.

use crate::StateId;

/// Guard evaluated against the machine context.
///
/// Predicates are expected to be pure. A panicking predicate propagates out of
/// [`StateMachine::tick`](crate::StateMachine::tick).
pub type Predicate<C> = Box<dyn Fn(&C) -> bool>;

/// An edge to `to`, taken when `predicate` holds.
///
/// The source state is implied by the list the transition is stored in.
pub struct Transition<S, C> {
    pub to: S,
    predicate: Predicate<C>,
}

impl<S: StateId, C> Transition<S, C> {
    pub fn new(to: S, predicate: impl Fn(&C) -> bool + 'static) -> Self {
        Self {
            to,
            predicate: Box::new(predicate),
        }
    }

    #[inline]
    pub fn is_satisfied(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }
}

/// Returns the target of the first satisfied transition, in list order.
pub(crate) fn first_match<S: StateId, C>(transitions: &[Transition<S, C>], ctx: &C) -> Option<S> {
    transitions
        .iter()
        .find(|transition| transition.is_satisfied(ctx))
        .map(|transition| transition.to)
}
