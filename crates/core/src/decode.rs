use crate::TraceError;

/// Code carried by every player who is not acting in a step.
pub const NO_ACTION: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Discard { idx: usize },
    Play { idx: usize },
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// Every entry is the sentinel; the step touches nothing.
    Skip,
    Act {
        player: usize,
        code: i64,
        kind: ActionKind,
    },
}

/// Identifies the acting player of one step vector and classifies their
/// code. Exactly one entry may differ from the sentinel; zero means the
/// step is skipped, two or more cannot name a single actor.
pub fn decode_step(step: usize, codes: &[i64]) -> Result<Decoded, TraceError> {
    let mut acting = codes
        .iter()
        .enumerate()
        .filter(|(_, &code)| code != NO_ACTION);
    let Some((player, &code)) = acting.next() else {
        return Ok(Decoded::Skip);
    };
    let extra = acting.count();
    if extra > 0 {
        return Err(TraceError::AmbiguousStep {
            step,
            actors: extra + 1,
        });
    }
    Ok(Decoded::Act {
        player,
        code,
        kind: classify(code)?,
    })
}

/// Splits the raw code space: 0-4 discard by slot, 5-9 play by slot,
/// 10-29 hint. The derived slot is not checked against the hand here;
/// `GameState` rejects it if it is out of range.
pub fn classify(code: i64) -> Result<ActionKind, TraceError> {
    match code {
        0..=4 => Ok(ActionKind::Discard { idx: code as usize }),
        5..=9 => Ok(ActionKind::Play {
            idx: (code - 5) as usize,
        }),
        10..=29 => Ok(ActionKind::Hint),
        _ => Err(TraceError::InvalidActionValue(code)),
    }
}
