use crate::domain::ports::{Notifier, Proposal, ProposalKind};

/// Lets everything through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Notifier for AllowAll {
    fn notify(&mut self, proposal: &Proposal<'_>) -> bool {
        tracing::debug!("{:?} allowed", proposal.kind());
        false
    }
}

/// Records every proposal it sees and vetoes the kinds it was told to.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Vec<ProposalKind>,
    veto: Vec<ProposalKind>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vetoing(kinds: &[ProposalKind]) -> Self {
        Self {
            seen: Vec::new(),
            veto: kinds.to_vec(),
        }
    }

    pub fn seen(&self) -> &[ProposalKind] {
        &self.seen
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, proposal: &Proposal<'_>) -> bool {
        let kind = proposal.kind();
        self.seen.push(kind);
        self.veto.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Realm;

    #[test]
    fn test_recording_notifier_vetoes_selected_kinds() {
        let mut notifier = RecordingNotifier::vetoing(&[ProposalKind::DestroyPortals]);
        let destroy = Proposal::DestroyPortals {
            realm: Realm::Nether,
            portals: &[],
        };

        assert!(notifier.notify(&destroy));
        assert_eq!(notifier.seen(), &[ProposalKind::DestroyPortals]);
        assert!(!AllowAll.notify(&destroy));
    }

    #[test]
    fn test_closures_are_notifiers() {
        let mut calls = 0;
        let mut counting = |_: &Proposal<'_>| {
            calls += 1;
            true
        };

        let destroy = Proposal::DestroyPortals {
            realm: Realm::Overworld,
            portals: &[],
        };
        assert!(counting.notify(&destroy));
        assert_eq!(calls, 1);
    }
}
