use std::collections::VecDeque;

use crate::model::ActivationEvent;

/// Lifecycle of the single-instance pipeline within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Uninitialized,
    AcquiringLock,
    Ready,
}

/// Coordination state machine for activation delivery.
///
/// Activation events can race pipeline initialization: anything offered
/// before the pipeline is ready is buffered (never dropped) and handed back
/// in arrival order once [`Coordinator::mark_ready`] is called.
#[derive(Debug, Default)]
pub struct Coordinator {
    phase: GatePhase,
    buffer: VecDeque<ActivationEvent>,
}

impl Default for GatePhase {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Number of buffered events awaiting readiness.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Record that lock acquisition has started. Events keep buffering.
    pub fn begin_acquire(&mut self) {
        if self.phase == GatePhase::Uninitialized {
            self.phase = GatePhase::AcquiringLock;
        }
    }

    /// Offer an activation event. Returns the event back when the pipeline is
    /// ready for direct delivery; otherwise it is buffered.
    pub fn offer(&mut self, event: ActivationEvent) -> Option<ActivationEvent> {
        match self.phase {
            GatePhase::Ready => Some(event),
            GatePhase::Uninitialized | GatePhase::AcquiringLock => {
                self.buffer.push_back(event);
                None
            }
        }
    }

    /// Enter the ready phase and drain everything buffered so far, FIFO.
    pub fn mark_ready(&mut self) -> Vec<ActivationEvent> {
        self.phase = GatePhase::Ready;
        self.buffer.drain(..).collect()
    }
}

/// Extract a custom-scheme URL from a process argument vector, as delivered
/// by a second launch. Returns the first argument starting with `scheme://`.
pub fn scheme_url_from_argv<'a, I>(args: I, scheme: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("{scheme}://");
    args.into_iter()
        .find(|arg| arg.starts_with(&prefix))
        .map(ToOwned::to_owned)
}
