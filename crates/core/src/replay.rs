use crate::{
    decode_step, ActionKind, ActionTable, Card, ColorMap, Decoded, EpisodeTrace, GameState,
    ReplayOutcome, StepRecord, TraceError,
};

/// One recorded game, as stored in the dataset: a step-by-step action
/// matrix plus the shuffled deck it was played from. The score is the
/// recorded ground truth and is only displayed, never recomputed.
#[derive(Debug, Clone)]
pub struct Episode {
    pub index: usize,
    pub actions: Vec<Vec<i64>>,
    pub deck: Vec<Card>,
    pub num_actions: usize,
    pub num_players: usize,
    pub score: i64,
}

/// Replays one episode against a fresh [`GameState`], producing a step
/// trace. Failure is part of the return value: a bad episode yields the
/// steps completed so far plus a [`ReplayOutcome::Failed`], so callers
/// can keep batch-processing the remaining episodes.
pub fn trace_episode(episode: &Episode, actions: &ActionTable, colors: &ColorMap) -> EpisodeTrace {
    let mut steps = Vec::new();
    let outcome = match replay(episode, actions, colors, &mut steps) {
        Ok(()) => ReplayOutcome::Completed {
            score: episode.score,
        },
        Err(error) => ReplayOutcome::Failed { error },
    };
    EpisodeTrace {
        episode: episode.index,
        steps,
        outcome,
    }
}

fn replay(
    episode: &Episode,
    descriptions: &ActionTable,
    colors: &ColorMap,
    steps: &mut Vec<StepRecord>,
) -> Result<(), TraceError> {
    if episode.num_actions > episode.actions.len() {
        return Err(TraceError::TruncatedEpisode {
            declared: episode.num_actions,
            available: episode.actions.len(),
        });
    }
    let mut state = GameState::deal(episode.deck.clone(), episode.num_players, colors)?;

    for (step, codes) in episode
        .actions
        .iter()
        .take(episode.num_actions)
        .enumerate()
    {
        let (player, code, kind) = match decode_step(step, codes)? {
            Decoded::Skip => continue,
            Decoded::Act { player, code, kind } => (player, code, kind),
        };
        let description = descriptions.describe(code)?.to_string();

        let mut effects = Vec::new();
        match kind {
            ActionKind::Discard { idx } => {
                let result = state.discard(player, idx)?;
                effects.push(format!("Discarded {}", result.card.render(colors)?));
                if let Some(card) = result.drawn {
                    effects.push(format!("Drew {}", card.render(colors)?));
                }
            }
            ActionKind::Play { idx } => {
                let result = state.play(player, idx)?;
                effects.push(format!("Played {}", result.card.render(colors)?));
                if let Some(card) = result.drawn {
                    effects.push(format!("Drew {}", card.render(colors)?));
                }
            }
            ActionKind::Hint => {
                effects.push("Hint action (no change to hands)".to_string());
            }
        }

        steps.push(StepRecord {
            step: step + 1,
            player: player + 1,
            description,
            effects,
            snapshot: state.snapshot(colors)?,
        });
    }
    Ok(())
}
