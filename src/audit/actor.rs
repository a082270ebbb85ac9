use uuid::Uuid;

/// Principal a unit of work is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorId {
    User(Uuid),
    /// No authenticated principal: seeding, background work, anonymous calls.
    Unspecified,
}

impl ActorId {
    /// Stored form. `Unspecified` is the nil UUID.
    pub fn as_uuid(&self) -> Uuid {
        match self {
            ActorId::User(id) => *id,
            ActorId::Unspecified => Uuid::nil(),
        }
    }

    pub fn from_uuid(id: Uuid) -> Self {
        if id.is_nil() {
            ActorId::Unspecified
        } else {
            ActorId::User(id)
        }
    }
}

/// Supplies the actor for a unit of work. Never fails.
pub trait ActorResolver: Send + Sync {
    fn resolve(&self) -> ActorId;
}

impl ActorResolver for ActorId {
    fn resolve(&self) -> ActorId {
        *self
    }
}

impl<R: ActorResolver> ActorResolver for Option<R> {
    fn resolve(&self) -> ActorId {
        self.as_ref()
            .map(ActorResolver::resolve)
            .unwrap_or(ActorId::Unspecified)
    }
}

/// Resolver for writes that happen outside any request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemActor;

impl ActorResolver for SystemActor {
    fn resolve(&self) -> ActorId {
        ActorId::Unspecified
    }
}
