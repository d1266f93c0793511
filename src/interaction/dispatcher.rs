use super::picking::{HitInfo, PickTarget};

/// What a click asks the scene to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractEvent {
    /// Flip the tree between chaos and formed
    Toggle,
    /// Focus or release a photo
    Activate(usize),
}

impl InteractEvent {
    /// Event for a pick result. Empty space produces nothing.
    pub fn from_hit(hit: Option<&HitInfo>) -> Option<Self> {
        hit.map(|h| Self::from_target(h.target))
    }

    pub fn from_target(target: PickTarget) -> Self {
        match target {
            PickTarget::Photo(id) => InteractEvent::Activate(id),
            PickTarget::Tree => InteractEvent::Toggle,
        }
    }
}

/// Receiver of dispatched events
pub trait Interactive {
    fn interact(&mut self, event: InteractEvent);
}

/// Forward a pick result to `target`. Returns the event that was dispatched, if any.
pub fn dispatch<T: Interactive + ?Sized>(target: &mut T, hit: Option<&HitInfo>) -> Option<InteractEvent> {
    let event = InteractEvent::from_hit(hit)?;
    log::debug!("dispatching {:?}", event);
    target.interact(event);
    Some(event)
}
