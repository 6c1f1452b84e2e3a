//! Cosmetic agent status pacing.
//!
//! The three agents are shown as queued, then flipped to running after a fixed
//! delay regardless of what the network call is doing. Completion is marked by
//! the caller when the real call returns.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(1_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    CulturalRadar,
    CompetitivePlaybook,
    DtcAudit,
}

impl Agent {
    pub const ALL: [Agent; 3] = [
        Agent::CulturalRadar,
        Agent::CompetitivePlaybook,
        Agent::DtcAudit,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Agent::CulturalRadar => "Cultural Radar Agent",
            Agent::CompetitivePlaybook => "Competitive Playbook Agent",
            Agent::DtcAudit => "DTC Audit Agent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    Queued,
    Running,
    Complete,
}

/// Shared display state for the three agents.
#[derive(Debug)]
pub struct AgentBoard {
    tx: watch::Sender<AgentPhase>,
    pacing: Option<JoinHandle<()>>,
}

impl AgentBoard {
    /// Starts a board in `Queued` and schedules the move to `Running` after
    /// `delay`. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn start(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(AgentPhase::Queued);
        let pacer = tx.clone();
        let pacing = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pacer.send_if_modified(|phase| {
                if *phase == AgentPhase::Queued {
                    *phase = AgentPhase::Running;
                    true
                } else {
                    false
                }
            });
        });
        Self {
            tx,
            pacing: Some(pacing),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AgentPhase> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn phase(&self) -> AgentPhase {
        *self.tx.borrow()
    }

    /// Marks every agent complete. A pending pacing step is cancelled.
    pub fn complete(&mut self) {
        if let Some(pacing) = self.pacing.take() {
            pacing.abort();
        }
        self.tx.send_replace(AgentPhase::Complete);
    }

    /// One status line per agent, e.g. `Cultural Radar Agent: running`.
    #[must_use]
    pub fn status_lines(&self) -> Vec<String> {
        let phase = match self.phase() {
            AgentPhase::Queued => "queued",
            AgentPhase::Running => "running",
            AgentPhase::Complete => "complete",
        };
        Agent::ALL
            .iter()
            .map(|agent| format!("{}: {phase}", agent.label()))
            .collect()
    }
}

impl Drop for AgentBoard {
    fn drop(&mut self) {
        if let Some(pacing) = self.pacing.take() {
            pacing.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn moves_from_queued_to_running_after_delay() {
        let board = AgentBoard::start(Duration::from_millis(20));
        let mut rx = board.subscribe();
        assert_eq!(board.phase(), AgentPhase::Queued);

        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("pacing should fire")
            .expect("sender alive");
        assert_eq!(*rx.borrow(), AgentPhase::Running);
    }

    #[tokio::test]
    async fn complete_before_delay_is_final() {
        let mut board = AgentBoard::start(Duration::from_millis(50));
        board.complete();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(board.phase(), AgentPhase::Complete);
    }

    #[tokio::test]
    async fn status_lines_name_every_agent() {
        let mut board = AgentBoard::start(Duration::from_secs(60));
        let lines = board.status_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Cultural Radar Agent: queued");

        board.complete();
        assert!(board.status_lines().iter().all(|l| l.ends_with("complete")));
    }
}
