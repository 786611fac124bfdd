/// ActorRegistry: owns every non-player actor.
///
/// Insertion order is iteration order, and the per-tick update walks the
/// registry in that order. Dead actors stay in place until `purge_dead`,
/// which the step function calls once per tick after every actor has
/// acted.

use crate::domain::entity::{Actor, ActorId, ActorKind};

#[derive(Clone, Debug, Default)]
pub struct ActorRegistry {
    actors: Vec<Actor>,
    next_id: u32,
}

impl ActorRegistry {
    pub fn new() -> Self {
        ActorRegistry { actors: Vec::new(), next_id: 1 }
    }

    /// Register an actor and hand back its id.
    pub fn insert(&mut self, mut actor: Actor) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        actor.id = id;
        self.actors.push(actor);
        id
    }

    /// Drop every dead actor. Returns how many were removed.
    pub fn purge_dead(&mut self) -> usize {
        let before = self.actors.len();
        self.actors.retain(|a| a.alive);
        before - self.actors.len()
    }

    pub fn clear(&mut self) {
        self.actors.clear();
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn as_slice(&self) -> &[Actor] {
        &self.actors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn get(&self, idx: usize) -> Option<&Actor> {
        self.actors.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Actor> {
        self.actors.get_mut(idx)
    }

    /// Current index of the actor with `id`, if it is still registered.
    pub fn index_of(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    pub fn find(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Live actors matching `pred`.
    pub fn count_live(&self, pred: impl Fn(ActorKind) -> bool) -> usize {
        self.actors.iter().filter(|a| a.alive && pred(a.kind)).count()
    }
}
