use crate::{Snapshot, TraceError};
use serde::{Deserialize, Serialize};

/// One logged step: who acted, what the code meant, what it did to the
/// table, and the table state afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepRecord {
    /// 1-based step number within the episode.
    pub step: usize,
    /// 1-based player number.
    pub player: usize,
    pub description: String,
    pub effects: Vec<String>,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed { score: i64 },
    Failed { error: TraceError },
}

/// Full trace of one episode. `steps` holds every step completed before
/// the outcome was reached; on failure the failing step is absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeTrace {
    /// 0-based episode index within the dataset.
    pub episode: usize,
    pub steps: Vec<StepRecord>,
    pub outcome: ReplayOutcome,
}

impl EpisodeTrace {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!(
                "=============== HANABI GAME {} TRACE ===============",
                self.episode + 1
            ),
            String::new(),
        ];
        for step in &self.steps {
            lines.push(format!(
                "Step {}: Player {} — {}",
                step.step, step.player, step.description
            ));
            for effect in &step.effects {
                lines.push(format!("   -> {effect}"));
            }
            push_snapshot(&mut lines, &step.snapshot);
            lines.push(String::new());
        }
        match &self.outcome {
            ReplayOutcome::Completed { score } => {
                lines.push(format!("Final Score: {score}"));
                lines.push("=============== END OF GAME TRACE ===============".to_string());
            }
            ReplayOutcome::Failed { error } => {
                lines.push(format!("Error tracing game {}: {error}", self.episode));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn push_snapshot(lines: &mut Vec<String>, snapshot: &Snapshot) {
    for (player, hand) in snapshot.hands.iter().enumerate() {
        lines.push(format!(
            "      Player {} hand: [{}]",
            player + 1,
            hand.join(", ")
        ));
    }
    lines.push(format!(
        "      Discard pile: [{}]",
        snapshot.discard_pile.join(", ")
    ));
    let played = snapshot
        .played
        .iter()
        .map(|stack| {
            if stack.height > 0 {
                format!("{} {}", stack.color, stack.height)
            } else {
                format!("{} _", stack.color)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("      Played pile:  {played}"));
}
