/// Single-slot preview state. Opening replaces whatever was shown before.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewOverlay {
    slot: Option<String>,
}

impl PreviewOverlay {
    pub(crate) fn open(&mut self, reference: impl Into<String>) {
        self.slot = Some(reference.into());
    }

    pub(crate) fn close(&mut self) -> Option<String> {
        self.slot.take()
    }

    pub fn current(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }
}
