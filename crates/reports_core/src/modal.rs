/// Phase of the generation modal, derived from its visibility and the
/// generating flag of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Generating,
    ShowingResults,
}

/// Visibility of the generation modal. Hiding it never touches the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationModal {
    visible: bool,
}

impl GenerationModal {
    pub(crate) fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    pub(crate) fn close(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn phase(&self, generating: bool) -> ModalPhase {
        match (self.visible, generating) {
            (false, _) => ModalPhase::Closed,
            (true, true) => ModalPhase::Generating,
            (true, false) => ModalPhase::ShowingResults,
        }
    }
}
