use hecs::Entity;

/// A notification that two colliders overlapped during this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    /// True if either collider was a trigger, in which case nothing was pushed apart.
    pub is_trigger: bool,
}

impl CollisionEvent {
    #[inline]
    pub fn involves(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }

    /// The other entity in the event, if `entity` is one of the two.
    #[inline]
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Collision events of the current tick, in the order they were detected.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<CollisionEvent>,
}

impl EventBuffer {
    #[inline]
    pub(crate) fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    pub fn events_involving(&self, entity: Entity) -> impl '_ + Iterator<Item = &CollisionEvent> {
        self.events.iter().filter(move |ev| ev.involves(entity))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
