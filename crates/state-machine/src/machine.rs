//! The finite state machine engine.
//!
//! [`StateMachine`] holds one current state, an ordered transition list per
//! source state and a global list of any-transitions.
//!
//! # Tick semantics
//!
//! Each call to [`StateMachine::tick`]:
//! 1. Scans any-transitions in insertion order and takes the first match
//! 2. Otherwise scans the current state's transitions in insertion order
//! 3. Applies the match (if any) through [`StateMachine::set_state`]
//! 4. Ticks whichever state is current afterwards
//!
//! Any-transitions therefore act as interrupts: they win over every local
//! transition that would also fire on the same tick.

use std::collections::HashMap;

use crate::transition::first_match;
use crate::{DebugColor, State, StateId, Transition};

/// View over the current state of a machine.
pub enum Node<'a, S: StateId, C> {
    /// A state without a nested machine.
    Leaf(S),
    /// A sub-state-machine together with its nested machine.
    Composite(S, &'a StateMachine<S, C>),
}

impl<S: StateId, C> Node<'_, S, C> {
    pub fn id(&self) -> S {
        match self {
            Node::Leaf(id) | Node::Composite(id, _) => *id,
        }
    }
}

pub struct StateMachine<S: StateId, C> {
    current: Option<S>,
    states: HashMap<S, Box<dyn State<S, C>>>,
    transitions: HashMap<S, Vec<Transition<S, C>>>,
    any_transitions: Vec<Transition<S, C>>,
    /// Seconds spent in the current state. Reset to 0.0 on each switch.
    elapsed: f32,
}

impl<S: StateId, C> StateMachine<S, C> {
    /// Creates an empty machine with no current state.
    pub fn new() -> Self {
        Self {
            current: None,
            states: HashMap::new(),
            transitions: HashMap::new(),
            any_transitions: Vec::new(),
            elapsed: 0.0,
        }
    }

    /// Registers the behaviour that runs while `id` is current.
    ///
    /// Ids without a registered behaviour are still valid targets; their hooks
    /// are simply skipped.
    pub fn add_state(&mut self, id: S, state: impl State<S, C> + 'static) -> &mut Self {
        self.states.insert(id, Box::new(state));
        self
    }

    /// Appends a transition from `from` to `to`.
    ///
    /// No duplicate detection is performed; insertion order is the tie-break
    /// order at evaluation time.
    pub fn add_transition(
        &mut self,
        from: S,
        to: S,
        predicate: impl Fn(&C) -> bool + 'static,
    ) -> &mut Self {
        self.transitions
            .entry(from)
            .or_default()
            .push(Transition::new(to, predicate));
        self
    }

    /// Appends a transition to `to` that is checked regardless of the current state.
    pub fn add_any_transition(&mut self, to: S, predicate: impl Fn(&C) -> bool + 'static) -> &mut Self {
        self.any_transitions.push(Transition::new(to, predicate));
        self
    }

    /// Switches to `state`.
    ///
    /// Switching to the state that is already current is a no-op: neither
    /// `on_exit` nor `on_enter` runs and the elapsed timer keeps counting.
    pub fn set_state(&mut self, state: S, ctx: &mut C) {
        if self.current == Some(state) {
            return;
        }

        if let Some(previous) = self.current
            && let Some(behaviour) = self.states.get_mut(&previous)
        {
            behaviour.on_exit(ctx);
        }

        self.current = Some(state);
        self.elapsed = 0.0;

        if let Some(behaviour) = self.states.get_mut(&state) {
            behaviour.on_enter(ctx);
        }
    }

    /// Resolves transitions, then ticks the current state.
    pub fn tick(&mut self, ctx: &mut C, dt: f32) {
        if let Some(next) = self.select_transition(ctx) {
            self.set_state(next, ctx);
        }

        if let Some(current) = self.current
            && let Some(behaviour) = self.states.get_mut(&current)
        {
            behaviour.tick(ctx, dt);
        }
        self.elapsed += dt;
    }

    /// Exits the current state and leaves the machine with no current state.
    pub fn reset(&mut self, ctx: &mut C) {
        if let Some(previous) = self.current.take()
            && let Some(behaviour) = self.states.get_mut(&previous)
        {
            behaviour.on_exit(ctx);
        }
        self.elapsed = 0.0;
    }

    fn select_transition(&self, ctx: &C) -> Option<S> {
        if let Some(target) = first_match(&self.any_transitions, ctx) {
            return Some(target);
        }

        let current = self.current?;
        let local = self
            .transitions
            .get(&current)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        first_match(local, ctx)
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    /// Name of the current state, for diagnostics.
    pub fn current_name(&self) -> Option<&'static str> {
        self.current.map(|id| id.name())
    }

    /// Seconds spent in the current state.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Colour of the current state, or [`DebugColor::DEFAULT`] if none is set.
    pub fn debug_color(&self) -> DebugColor {
        self.current
            .and_then(|id| self.states.get(&id))
            .map(|behaviour| behaviour.debug_color())
            .unwrap_or(DebugColor::DEFAULT)
    }

    pub fn current_node(&self) -> Option<Node<'_, S, C>> {
        let id = self.current?;
        let node = match self.states.get(&id).and_then(|behaviour| behaviour.nested()) {
            Some(inner) => Node::Composite(id, inner),
            None => Node::Leaf(id),
        };
        Some(node)
    }

    /// Deepest active state, unwrapping nested machines.
    ///
    /// A composite whose nested machine has no current state resolves to the
    /// composite itself.
    pub fn resolve_leaf(&self) -> Option<S> {
        match self.current_node()? {
            Node::Leaf(id) => Some(id),
            Node::Composite(id, inner) => Some(inner.resolve_leaf().unwrap_or(id)),
        }
    }

    /// Active states from this machine down to the deepest leaf.
    pub fn active_path(&self) -> Vec<S> {
        let mut path = Vec::new();
        let mut node = self.current_node();
        while let Some(current) = node {
            path.push(current.id());
            node = match current {
                Node::Leaf(_) => None,
                Node::Composite(_, inner) => inner.current_node(),
            };
        }
        path
    }

    pub fn has_state(&self, id: S) -> bool {
        self.states.contains_key(&id)
    }

    /// Number of local transitions registered from `from`.
    pub fn transition_count(&self, from: S) -> usize {
        self.transitions.get(&from).map_or(0, Vec::len)
    }

    pub fn any_transition_count(&self) -> usize {
        self.any_transitions.len()
    }
}

impl<S: StateId, C> Default for StateMachine<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Id {
        A,
        B,
        C,
        Unknown,
    }

    impl StateId for Id {
        fn name(&self) -> &'static str {
            match self {
                Id::A => "A",
                Id::B => "B",
                Id::C => "C",
                Id::Unknown => "Unknown",
            }
        }
    }

    #[derive(Default)]
    struct TestContext {
        log: Vec<String>,
        go_b: bool,
        go_c: bool,
        interrupt: bool,
    }

    struct Recorder {
        name: &'static str,
        color: DebugColor,
    }

    impl Recorder {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                color: DebugColor::DEFAULT,
            }
        }
    }

    impl State<Id, TestContext> for Recorder {
        fn on_enter(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("enter {}", self.name));
        }

        fn tick(&mut self, ctx: &mut TestContext, _dt: f32) {
            ctx.log.push(format!("tick {}", self.name));
        }

        fn on_exit(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("exit {}", self.name));
        }

        fn debug_color(&self) -> DebugColor {
            self.color
        }
    }

    fn machine() -> StateMachine<Id, TestContext> {
        let mut fsm = StateMachine::new();
        fsm.add_state(Id::A, Recorder::new("A"))
            .add_state(Id::B, Recorder::new("B"))
            .add_state(
                Id::C,
                Recorder {
                    name: "C",
                    color: DebugColor::RED,
                },
            );
        fsm
    }

    #[test]
    fn set_state_same_state_is_noop() {
        let mut fsm = machine();
        let mut ctx = TestContext::default();

        fsm.set_state(Id::A, &mut ctx);
        fsm.set_state(Id::A, &mut ctx);

        assert_eq!(ctx.log, vec!["enter A"]);
        assert_eq!(fsm.current(), Some(Id::A));
    }

    #[test]
    fn exit_precedes_enter() {
        let mut fsm = machine();
        let mut ctx = TestContext::default();

        fsm.set_state(Id::A, &mut ctx);
        fsm.set_state(Id::B, &mut ctx);

        assert_eq!(ctx.log, vec!["enter A", "exit A", "enter B"]);
    }

    #[test]
    fn transition_applies_before_tick() {
        let mut fsm = machine();
        fsm.add_transition(Id::A, Id::B, |ctx| ctx.go_b);
        let mut ctx = TestContext::default();
        fsm.set_state(Id::A, &mut ctx);

        ctx.go_b = true;
        ctx.log.clear();
        fsm.tick(&mut ctx, 0.016);

        assert_eq!(ctx.log, vec!["exit A", "enter B", "tick B"]);
    }

    #[test]
    fn ticks_current_state_without_transition() {
        let mut fsm = machine();
        fsm.add_transition(Id::A, Id::B, |ctx| ctx.go_b);
        let mut ctx = TestContext::default();
        fsm.set_state(Id::A, &mut ctx);

        fsm.tick(&mut ctx, 0.5);
        fsm.tick(&mut ctx, 0.25);

        assert_eq!(ctx.log, vec!["enter A", "tick A", "tick A"]);
        assert!((fsm.elapsed() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn any_transition_has_priority_over_local() {
        let mut fsm = machine();
        fsm.add_transition(Id::A, Id::B, |ctx| ctx.go_b);
        fsm.add_any_transition(Id::C, |ctx| ctx.interrupt);
        let mut ctx = TestContext::default();
        fsm.set_state(Id::A, &mut ctx);

        ctx.go_b = true;
        ctx.interrupt = true;
        fsm.tick(&mut ctx, 0.016);

        assert_eq!(fsm.current(), Some(Id::C));
    }

    #[test]
    fn first_matching_local_transition_wins() {
        let mut fsm = machine();
        fsm.add_transition(Id::A, Id::C, |ctx| ctx.go_c);
        fsm.add_transition(Id::A, Id::B, |ctx| ctx.go_b);
        let mut ctx = TestContext::default();
        fsm.set_state(Id::A, &mut ctx);

        ctx.go_b = true;
        ctx.go_c = true;
        fsm.tick(&mut ctx, 0.016);

        assert_eq!(fsm.current(), Some(Id::C));
    }

    #[test]
    fn any_transition_to_current_state_blocks_local_transitions() {
        let mut fsm = machine();
        fsm.add_any_transition(Id::A, |ctx| ctx.interrupt);
        fsm.add_transition(Id::A, Id::B, |ctx| ctx.go_b);
        let mut ctx = TestContext::default();
        fsm.set_state(Id::A, &mut ctx);

        ctx.interrupt = true;
        ctx.go_b = true;
        ctx.log.clear();
        fsm.tick(&mut ctx, 0.016);

        assert_eq!(fsm.current(), Some(Id::A));
        assert_eq!(ctx.log, vec!["tick A"]);
    }

    #[test]
    fn unknown_state_has_no_hooks_or_transitions() {
        let mut fsm = machine();
        let mut ctx = TestContext::default();
        fsm.set_state(Id::A, &mut ctx);

        fsm.set_state(Id::Unknown, &mut ctx);
        fsm.tick(&mut ctx, 0.016);

        assert_eq!(fsm.current(), Some(Id::Unknown));
        assert_eq!(ctx.log, vec!["enter A", "exit A"]);
        assert_eq!(fsm.transition_count(Id::Unknown), 0);
    }

    #[test]
    fn tick_without_state_only_checks_any_transitions() {
        let mut fsm = machine();
        fsm.add_any_transition(Id::B, |ctx| ctx.interrupt);
        let mut ctx = TestContext::default();

        fsm.tick(&mut ctx, 0.016);
        assert_eq!(fsm.current(), None);

        ctx.interrupt = true;
        fsm.tick(&mut ctx, 0.016);
        assert_eq!(fsm.current(), Some(Id::B));
    }

    #[test]
    fn debug_color_follows_current_state() {
        let mut fsm = machine();
        let mut ctx = TestContext::default();
        assert_eq!(fsm.debug_color(), DebugColor::DEFAULT);
        assert_eq!(fsm.current_name(), None);

        fsm.set_state(Id::C, &mut ctx);
        assert_eq!(fsm.debug_color(), DebugColor::RED);
        assert_eq!(fsm.current_name(), Some("C"));
    }

    #[test]
    fn reset_exits_and_clears_current() {
        let mut fsm = machine();
        let mut ctx = TestContext::default();
        fsm.set_state(Id::B, &mut ctx);

        fsm.reset(&mut ctx);

        assert_eq!(fsm.current(), None);
        assert_eq!(ctx.log, vec!["enter B", "exit B"]);
        assert_eq!(fsm.resolve_leaf(), None);
    }
}
