//! Round-robin turn scheduler.
//!
//! [`AuthorityManager`] is the scheduler of record. It owns the roster, the
//! current holder and the turn timer, and publishes every change on its
//! [`EventBus`].
//!
//! # Invariants
//!
//! - At most one entity holds authority at any instant
//! - While rotating, the next index is a valid roster index
//! - A roster of one or zero entities never rotates
//! - `LastEntityRemaining` is published at most once per match: when a
//!   removal first leaves one or zero entities

use super::{AuthorityError, TimerTick, TurnTimer};
use crate::EntityHandle;
use crate::config::TurnConfig;
use crate::events::{EventBus, GameEvent, SubscriptionId};

pub type Result<T> = std::result::Result<T, AuthorityError>;

/// Where the round-robin pointer stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rotation {
    NotStarted,
    Next(usize),
    /// Game over: no next entity.
    Frozen,
}

/// Conceptual state of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum AuthorityPhase {
    /// Nobody holds authority (between turns, or before the match starts).
    Idle,
    /// One entity holds authority and its timer runs.
    EntityActive,
    /// Roster reduced to one or zero entities; rotation frozen.
    GameOver,
}

/// What [`AuthorityManager::unregister_entity`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Removal {
    /// Roster index the entity occupied.
    pub index: usize,
    pub was_holder: bool,
    /// This removal decided the match and published `LastEntityRemaining`.
    pub game_over: bool,
    /// Holder after the removal.
    pub holder: Option<EntityHandle>,
}

#[derive(Debug)]
pub struct AuthorityManager {
    roster: Vec<EntityHandle>,
    holder: Option<EntityHandle>,
    rotation: Rotation,
    /// `LastEntityRemaining` already went out for this match.
    decided: bool,
    timer: TurnTimer,
    events: EventBus,
}

impl AuthorityManager {
    pub fn new(config: &TurnConfig, events: EventBus) -> Self {
        Self {
            roster: Vec::new(),
            holder: None,
            rotation: Rotation::NotStarted,
            decided: false,
            timer: TurnTimer::new(config.duration_secs),
            events,
        }
    }

    /// Binds `roster` and grants authority to the entity at `start_index`.
    ///
    /// On error nothing changes. A roster of one starts with rotation already
    /// frozen; no `LastEntityRemaining` is published for it since the roster
    /// never shrank. Removing that entity later publishes the no-winner event.
    pub fn initialize(
        &mut self,
        roster: impl IntoIterator<Item = EntityHandle>,
        start_index: usize,
    ) -> Result<EntityHandle> {
        let roster: Vec<EntityHandle> = roster.into_iter().collect();
        if roster.is_empty() {
            return Err(AuthorityError::EmptyRoster);
        }
        if start_index >= roster.len() {
            return Err(AuthorityError::InvalidStartIndex {
                index: start_index,
                len: roster.len(),
            });
        }
        for (i, entity) in roster.iter().enumerate() {
            if roster[..i].contains(entity) {
                return Err(AuthorityError::DuplicateEntity(*entity));
            }
        }

        self.revoke_current();
        self.roster = roster;
        self.decided = false;
        for entity in self.roster.clone() {
            self.emit(GameEvent::EntitySpawned(entity));
        }

        if self.roster.len() == 1 {
            self.rotation = Rotation::Frozen;
            let entity = self.roster[0];
            self.holder = Some(entity);
            self.emit(GameEvent::AuthorityGained(entity));
            return Ok(entity);
        }

        self.rotation = Rotation::Next(start_index);
        self.give_next_entity_authority()
    }

    /// Grants authority to the entity at the next index and advances it.
    ///
    /// An entity still holding authority is revoked first.
    pub fn give_next_entity_authority(&mut self) -> Result<EntityHandle> {
        let index = match self.rotation {
            Rotation::NotStarted => return Err(AuthorityError::NotInitialized),
            Rotation::Frozen => return Err(AuthorityError::RotationFrozen),
            Rotation::Next(index) => index,
        };
        let entity = *self
            .roster
            .get(index)
            .ok_or(AuthorityError::StaleNextIndex {
                index,
                len: self.roster.len(),
            })?;

        self.grant(index, entity);
        Ok(entity)
    }

    /// Ends `entity`'s turn. Only the current holder may do so.
    pub fn reset_authority(&mut self, entity: EntityHandle) -> Result<()> {
        if self.holder != Some(entity) {
            return Err(AuthorityError::NotHolder {
                entity,
                holder: self.holder,
            });
        }
        self.revoke_current();
        Ok(())
    }

    /// Removes `entity` from the roster.
    ///
    /// 1. Entities after the removal point shift left, so the next index
    ///    follows them when the removed slot was before it
    /// 2. A roster of one or zero freezes rotation. The first removal that
    ///    gets there publishes `LastEntityRemaining`, with no survivor when
    ///    the roster is empty
    /// 3. If the removed entity held authority it is revoked and the turn
    ///    passes on: to the next entity while rotating, or to the sole
    ///    survivor once frozen
    ///
    /// Only an unknown entity is an error; once the roster changed the
    /// removal always completes.
    pub fn unregister_entity(&mut self, entity: EntityHandle) -> Result<Removal> {
        let index = self
            .roster
            .iter()
            .position(|candidate| *candidate == entity)
            .ok_or(AuthorityError::NotRegistered(entity))?;
        let was_holder = self.holder == Some(entity);

        self.roster.remove(index);

        if let Rotation::Next(next) = &mut self.rotation {
            if index < *next {
                *next = next.saturating_sub(1);
            }
            // The tail slot was next; wrap to the front of the cycle.
            if *next >= self.roster.len() {
                *next = 0;
            }
        }
        self.emit(GameEvent::EntityDied(entity));

        let mut game_over = false;
        if self.roster.len() <= 1 {
            if self.rotation != Rotation::Frozen {
                self.rotation = Rotation::Frozen;
                self.timer.stop();
            }
            if !self.decided {
                self.decided = true;
                game_over = true;
                let survivor = self.roster.first().copied();
                self.emit(GameEvent::LastEntityRemaining { survivor });
            }
        }

        if was_holder {
            self.revoke_current();
            match self.rotation {
                Rotation::Frozen => {
                    if let Some(&survivor) = self.roster.first() {
                        self.holder = Some(survivor);
                        self.emit(GameEvent::AuthorityGained(survivor));
                    }
                }
                Rotation::Next(next) => {
                    if let Some(&entity) = self.roster.get(next) {
                        self.grant(next, entity);
                    }
                }
                Rotation::NotStarted => {}
            }
        }

        Ok(Removal {
            index,
            was_holder,
            game_over,
            holder: self.holder,
        })
    }

    /// Advances the turn timer for the current holder.
    pub fn tick(&mut self, dt: f32) -> TimerTick {
        let Some(entity) = self.holder else {
            return TimerTick::Idle;
        };

        let tick = self.timer.tick(dt);
        match tick {
            TimerTick::Idle => {}
            TimerTick::Running { remaining } => {
                self.emit(GameEvent::TurnTimerUpdated { entity, remaining });
            }
            TimerTick::Expired => {
                self.emit(GameEvent::TurnTimerUpdated {
                    entity,
                    remaining: 0.0,
                });
                self.emit(GameEvent::TurnTimerExpired(entity));
            }
        }
        tick
    }

    /// True iff `entity` is exactly the current holder.
    pub fn has_authority(&self, entity: EntityHandle) -> bool {
        self.holder == Some(entity)
    }

    pub fn current_holder(&self) -> Option<EntityHandle> {
        self.holder
    }

    pub fn roster(&self) -> &[EntityHandle] {
        &self.roster
    }

    pub fn is_registered(&self, entity: EntityHandle) -> bool {
        self.roster.contains(&entity)
    }

    /// Index of the entity that receives authority next, `None` when frozen or
    /// not started.
    pub fn next_index(&self) -> Option<usize> {
        match self.rotation {
            Rotation::Next(index) => Some(index),
            Rotation::NotStarted | Rotation::Frozen => None,
        }
    }

    pub fn next_entity(&self) -> Option<EntityHandle> {
        self.next_index().and_then(|index| self.roster.get(index).copied())
    }

    pub fn is_rotation_frozen(&self) -> bool {
        self.rotation == Rotation::Frozen
    }

    /// `LastEntityRemaining` has been published for this match.
    pub fn is_decided(&self) -> bool {
        self.decided
    }

    pub fn phase(&self) -> AuthorityPhase {
        if self.rotation == Rotation::Frozen {
            AuthorityPhase::GameOver
        } else if self.holder.is_some() {
            AuthorityPhase::EntityActive
        } else {
            AuthorityPhase::Idle
        }
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Clears the match state. Subscribers are kept; use
    /// [`EventBus::reset`] through [`Self::events_mut`] to drop them too.
    pub fn reset(&mut self) {
        self.roster.clear();
        self.holder = None;
        self.rotation = Rotation::NotStarted;
        self.decided = false;
        self.timer.stop();
    }

    /// Hands authority to the roster entity at `index` and advances rotation.
    fn grant(&mut self, index: usize, entity: EntityHandle) {
        self.revoke_current();
        self.rotation = Rotation::Next((index + 1) % self.roster.len());
        self.holder = Some(entity);
        self.timer.restart();
        self.emit(GameEvent::AuthorityGained(entity));
    }

    fn revoke_current(&mut self) {
        if let Some(previous) = self.holder.take() {
            self.timer.stop();
            self.emit(GameEvent::AuthorityRevoked(previous));
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.publish(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityAllocator;
    use crate::events::EventMailbox;

    struct Fixture {
        manager: AuthorityManager,
        mailbox: EventMailbox,
        allocator: EntityAllocator,
    }

    impl Fixture {
        fn new() -> Self {
            let mailbox = EventMailbox::new();
            let mut bus = EventBus::new();
            bus.subscribe(mailbox.sink());
            Self {
                manager: AuthorityManager::new(&TurnConfig { duration_secs: 1.0 }, bus),
                mailbox,
                allocator: EntityAllocator::new(),
            }
        }

        fn entities(&mut self, count: usize) -> Vec<EntityHandle> {
            (0..count).map(|_| self.allocator.allocate()).collect()
        }

        fn started(count: usize) -> (Self, Vec<EntityHandle>) {
            let mut fixture = Self::new();
            let roster = fixture.entities(count);
            fixture
                .manager
                .initialize(roster.clone(), 0)
                .expect("valid roster");
            fixture.mailbox.drain();
            (fixture, roster)
        }

        fn last_remaining_count(events: &[GameEvent]) -> usize {
            events
                .iter()
                .filter(|event| matches!(event, GameEvent::LastEntityRemaining { .. }))
                .count()
        }
    }

    #[test]
    fn initialize_rejects_empty_roster() {
        let mut fixture = Fixture::new();

        let result = fixture.manager.initialize(Vec::new(), 0);

        assert_eq!(result, Err(AuthorityError::EmptyRoster));
        assert_eq!(fixture.manager.phase(), AuthorityPhase::Idle);
        assert!(fixture.mailbox.is_empty());
    }

    #[test]
    fn initialize_rejects_invalid_start_index() {
        let mut fixture = Fixture::new();
        let roster = fixture.entities(2);

        let result = fixture.manager.initialize(roster, 2);

        assert_eq!(
            result,
            Err(AuthorityError::InvalidStartIndex { index: 2, len: 2 })
        );
        assert!(fixture.manager.roster().is_empty());
    }

    #[test]
    fn initialize_rejects_duplicates() {
        let mut fixture = Fixture::new();
        let a = fixture.allocator.allocate();

        let result = fixture.manager.initialize([a, a], 0);

        assert_eq!(result, Err(AuthorityError::DuplicateEntity(a)));
    }

    #[test]
    fn initialize_spawns_roster_and_grants_start_entity() {
        let mut fixture = Fixture::new();
        let roster = fixture.entities(3);

        let holder = fixture.manager.initialize(roster.clone(), 1).unwrap();

        assert_eq!(holder, roster[1]);
        assert!(fixture.manager.has_authority(roster[1]));
        assert_eq!(fixture.manager.next_index(), Some(2));
        assert_eq!(fixture.manager.phase(), AuthorityPhase::EntityActive);
        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::EntitySpawned(roster[0]),
                GameEvent::EntitySpawned(roster[1]),
                GameEvent::EntitySpawned(roster[2]),
                GameEvent::AuthorityGained(roster[1]),
            ]
        );
    }

    #[test]
    fn give_next_before_initialize_fails() {
        let mut fixture = Fixture::new();

        assert_eq!(
            fixture.manager.give_next_entity_authority(),
            Err(AuthorityError::NotInitialized)
        );
    }

    #[test]
    fn round_robin_follows_roster_order_and_wraps() {
        let (mut fixture, roster) = Fixture::started(3);

        let mut order = vec![fixture.manager.current_holder().unwrap()];
        for _ in 0..6 {
            order.push(fixture.manager.give_next_entity_authority().unwrap());
        }

        let expected: Vec<_> = roster.iter().cycle().take(7).copied().collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn basic_rotation_with_turn_ending() {
        let (mut fixture, roster) = Fixture::started(3);
        let [a, b, c] = [roster[0], roster[1], roster[2]];
        assert!(fixture.manager.has_authority(a));

        for (current, next) in [(a, b), (b, c), (c, a)] {
            fixture.manager.reset_authority(current).unwrap();
            assert_eq!(fixture.manager.phase(), AuthorityPhase::Idle);
            assert_eq!(fixture.manager.give_next_entity_authority().unwrap(), next);
        }

        assert_eq!(
            fixture.mailbox.drain()[..2],
            [GameEvent::AuthorityRevoked(a), GameEvent::AuthorityGained(b)]
        );
    }

    #[test]
    fn give_next_revokes_lingering_holder() {
        let (mut fixture, roster) = Fixture::started(2);

        fixture.manager.give_next_entity_authority().unwrap();

        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::AuthorityRevoked(roster[0]),
                GameEvent::AuthorityGained(roster[1]),
            ]
        );
    }

    #[test]
    fn reset_authority_by_non_holder_is_rejected() {
        let (mut fixture, roster) = Fixture::started(3);

        let result = fixture.manager.reset_authority(roster[1]);

        assert_eq!(
            result,
            Err(AuthorityError::NotHolder {
                entity: roster[1],
                holder: Some(roster[0]),
            })
        );
        assert!(fixture.manager.has_authority(roster[0]));
        assert!(fixture.mailbox.is_empty());
    }

    #[test]
    fn removal_before_next_index_shifts_it_down() {
        let (mut fixture, roster) = Fixture::started(4);
        fixture.manager.give_next_entity_authority().unwrap();
        assert_eq!(fixture.manager.next_index(), Some(2));

        fixture.manager.unregister_entity(roster[0]).unwrap();

        assert_eq!(fixture.manager.next_index(), Some(1));
        assert_eq!(fixture.manager.next_entity(), Some(roster[2]));
    }

    #[test]
    fn removal_at_or_after_next_index_keeps_it() {
        let (mut fixture, roster) = Fixture::started(4);
        assert_eq!(fixture.manager.next_index(), Some(1));

        fixture.manager.unregister_entity(roster[3]).unwrap();
        assert_eq!(fixture.manager.next_index(), Some(1));

        fixture.manager.unregister_entity(roster[1]).unwrap();
        assert_eq!(fixture.manager.next_index(), Some(1));
        assert_eq!(fixture.manager.next_entity(), Some(roster[2]));
    }

    #[test]
    fn removing_tail_that_was_next_wraps_to_front() {
        let (mut fixture, roster) = Fixture::started(3);
        fixture.manager.give_next_entity_authority().unwrap();
        assert_eq!(fixture.manager.next_entity(), Some(roster[2]));

        fixture.manager.unregister_entity(roster[2]).unwrap();

        assert_eq!(fixture.manager.next_index(), Some(0));
        assert_eq!(
            fixture.manager.give_next_entity_authority().unwrap(),
            roster[0]
        );
    }

    #[test]
    fn removing_holder_passes_turn_on() {
        let (mut fixture, roster) = Fixture::started(4);

        let removal = fixture.manager.unregister_entity(roster[0]).unwrap();

        assert!(removal.was_holder);
        assert!(!removal.game_over);
        assert_eq!(removal.holder, Some(roster[1]));
        assert_eq!(fixture.manager.next_entity(), Some(roster[2]));
        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::EntityDied(roster[0]),
                GameEvent::AuthorityRevoked(roster[0]),
                GameEvent::AuthorityGained(roster[1]),
            ]
        );
    }

    #[test]
    fn mid_rotation_removal_scenario() {
        let (mut fixture, roster) = Fixture::started(3);
        let [a, b, c] = [roster[0], roster[1], roster[2]];
        assert_eq!(fixture.manager.next_index(), Some(1));

        fixture.manager.unregister_entity(c).unwrap();
        assert_eq!(fixture.manager.next_index(), Some(1));
        assert_eq!(fixture.manager.next_entity(), Some(b));

        let removal = fixture.manager.unregister_entity(a).unwrap();

        assert!(removal.game_over);
        assert_eq!(fixture.manager.current_holder(), Some(b));
        assert_eq!(fixture.manager.roster(), &[b]);
    }

    #[test]
    fn last_entity_wins_when_opponent_removed() {
        let (mut fixture, roster) = Fixture::started(2);
        let [a, b] = [roster[0], roster[1]];

        let removal = fixture.manager.unregister_entity(b).unwrap();

        assert!(removal.game_over);
        assert!(fixture.manager.has_authority(a));
        assert_eq!(fixture.manager.phase(), AuthorityPhase::GameOver);
        assert_eq!(fixture.manager.next_index(), None);
        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::EntityDied(b),
                GameEvent::LastEntityRemaining { survivor: Some(a) },
            ]
        );
        assert_eq!(
            fixture.manager.give_next_entity_authority(),
            Err(AuthorityError::RotationFrozen)
        );
    }

    #[test]
    fn last_entity_fires_once_then_no_winner_removal_is_silent() {
        let (mut fixture, roster) = Fixture::started(3);

        fixture.manager.unregister_entity(roster[2]).unwrap();
        fixture.manager.unregister_entity(roster[1]).unwrap();
        let first = fixture.mailbox.drain();
        assert_eq!(Fixture::last_remaining_count(&first), 1);

        let removal = fixture.manager.unregister_entity(roster[0]).unwrap();
        let second = fixture.mailbox.drain();

        assert!(!removal.game_over);
        assert_eq!(removal.holder, None);
        assert_eq!(Fixture::last_remaining_count(&second), 0);
        assert!(fixture.manager.roster().is_empty());
        assert_eq!(fixture.manager.phase(), AuthorityPhase::GameOver);
    }

    #[test]
    fn unregister_unknown_entity_is_rejected() {
        let (mut fixture, _roster) = Fixture::started(2);
        let stranger = fixture.allocator.allocate();

        assert_eq!(
            fixture.manager.unregister_entity(stranger),
            Err(AuthorityError::NotRegistered(stranger))
        );
        assert_eq!(fixture.manager.roster().len(), 2);
        assert!(fixture.mailbox.is_empty());
    }

    #[test]
    fn stale_handle_never_has_authority() {
        let mut fixture = Fixture::new();
        let a = fixture.allocator.allocate();
        let b = fixture.allocator.allocate();
        fixture.manager.initialize([a, b], 0).unwrap();

        fixture.allocator.free(a);
        let recycled = fixture.allocator.allocate();

        assert_eq!(recycled.index(), a.index());
        assert!(fixture.manager.has_authority(a));
        assert!(!fixture.manager.has_authority(recycled));
    }

    #[test]
    fn removing_sole_entity_publishes_no_winner() {
        let mut fixture = Fixture::new();
        let roster = fixture.entities(1);
        fixture.manager.initialize(roster.clone(), 0).unwrap();
        fixture.mailbox.drain();

        let removal = fixture.manager.unregister_entity(roster[0]).unwrap();

        assert!(removal.was_holder);
        assert!(removal.game_over);
        assert_eq!(removal.holder, None);
        assert!(fixture.manager.is_decided());
        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::EntityDied(roster[0]),
                GameEvent::LastEntityRemaining { survivor: None },
                GameEvent::AuthorityRevoked(roster[0]),
            ]
        );
    }

    #[test]
    fn removing_holder_at_tail_hands_turn_to_front() {
        let (mut fixture, roster) = Fixture::started(3);
        fixture.manager.give_next_entity_authority().unwrap();
        fixture.manager.give_next_entity_authority().unwrap();
        assert!(fixture.manager.has_authority(roster[2]));
        assert_eq!(fixture.manager.next_index(), Some(0));
        fixture.mailbox.drain();

        let removal = fixture.manager.unregister_entity(roster[2]).unwrap();

        assert_eq!(removal.holder, Some(roster[0]));
        assert_eq!(fixture.manager.next_entity(), Some(roster[1]));
        assert!(fixture.manager.timer().is_running());
        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::EntityDied(roster[2]),
                GameEvent::AuthorityRevoked(roster[2]),
                GameEvent::AuthorityGained(roster[0]),
            ]
        );
    }

    #[test]
    fn single_entity_roster_starts_frozen() {
        let mut fixture = Fixture::new();
        let roster = fixture.entities(1);

        fixture.manager.initialize(roster.clone(), 0).unwrap();

        assert!(fixture.manager.has_authority(roster[0]));
        assert_eq!(fixture.manager.phase(), AuthorityPhase::GameOver);
        assert_eq!(Fixture::last_remaining_count(&fixture.mailbox.drain()), 0);
    }

    #[test]
    fn timer_reports_updates_and_expires_once() {
        let (mut fixture, roster) = Fixture::started(2);

        fixture.manager.tick(0.5);
        fixture.manager.tick(0.5);
        fixture.manager.tick(0.5);

        assert_eq!(
            fixture.mailbox.drain(),
            vec![
                GameEvent::TurnTimerUpdated {
                    entity: roster[0],
                    remaining: 0.5,
                },
                GameEvent::TurnTimerUpdated {
                    entity: roster[0],
                    remaining: 0.0,
                },
                GameEvent::TurnTimerExpired(roster[0]),
            ]
        );
        // Expiry is advisory; the holder keeps authority.
        assert!(fixture.manager.has_authority(roster[0]));
    }

    #[test]
    fn timer_restarts_for_each_turn() {
        let (mut fixture, _roster) = Fixture::started(2);
        fixture.manager.tick(0.75);

        fixture.manager.give_next_entity_authority().unwrap();

        assert_eq!(fixture.manager.timer().remaining(), 1.0);
        assert!(fixture.manager.timer().is_running());
    }

    #[test]
    fn timer_idle_between_turns() {
        let (mut fixture, roster) = Fixture::started(2);
        fixture.manager.reset_authority(roster[0]).unwrap();
        fixture.mailbox.drain();

        assert_eq!(fixture.manager.tick(0.5), TimerTick::Idle);
        assert!(fixture.mailbox.is_empty());
    }

    #[test]
    fn reset_returns_to_unstarted() {
        let (mut fixture, roster) = Fixture::started(2);

        fixture.manager.reset();

        assert!(fixture.manager.roster().is_empty());
        assert!(!fixture.manager.has_authority(roster[0]));
        assert_eq!(
            fixture.manager.give_next_entity_authority(),
            Err(AuthorityError::NotInitialized)
        );
    }
}
