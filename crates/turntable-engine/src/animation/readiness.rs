use std::cell::Cell;
use std::rc::Rc;

/// Shared "ok to draw" flag.
///
/// Cloned handles observe the same flag. The loop and the asset callback run
/// on the event-loop thread, so a plain `Cell` is enough.
#[derive(Debug, Clone, Default)]
pub struct Readiness(Rc<Cell<bool>>);

impl Readiness {
    /// Starts closed; the loop skips every tick until [`mark_ready`](Self::mark_ready).
    pub fn pending() -> Self {
        Self(Rc::new(Cell::new(false)))
    }

    /// Starts open; used when nothing is loaded asynchronously.
    pub fn ready() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_ready(&self) -> bool {
        self.0.get()
    }

    pub fn mark_ready(&self) {
        self.0.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let gate = Readiness::pending();
        let loader_side = gate.clone();
        assert!(!gate.is_ready());
        loader_side.mark_ready();
        assert!(gate.is_ready());
    }

    #[test]
    fn ready_starts_open() {
        assert!(Readiness::ready().is_ready());
        assert!(!Readiness::default().is_ready());
    }
}
