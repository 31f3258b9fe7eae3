//! Fire-and-forget interface sound contract.

use std::{cell::RefCell, rc::Rc};

/// Host service that plays short named interface sounds.
///
/// Playback is fire-and-forget: failures are swallowed by the adapter, and
/// callers never wait on completion.
pub trait SoundService {
    /// Plays the named sound.
    fn play(&self, name: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// Silent sound service for unsupported targets and baseline tests.
pub struct NoopSoundService;

impl SoundService for NoopSoundService {
    fn play(&self, _name: &str) {}
}

#[derive(Debug, Clone, Default)]
/// Recording sound service for tests.
pub struct MemorySoundService {
    played: Rc<RefCell<Vec<String>>>,
}

impl MemorySoundService {
    /// Names played so far, in order.
    pub fn played(&self) -> Vec<String> {
        self.played.borrow().clone()
    }
}

impl SoundService for MemorySoundService {
    fn play(&self, name: &str) {
        self.played.borrow_mut().push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_sound_service_records_in_order() {
        let service = MemorySoundService::default();
        let service_obj: &dyn SoundService = &service;
        service_obj.play("trash");
        service_obj.play("empty-trash");
        assert_eq!(service.played(), vec!["trash", "empty-trash"]);
    }
}
