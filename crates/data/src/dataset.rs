use anyhow::{bail, Context};
use hanatrace_core::{Card, Episode};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::fs;
use std::path::Path;

/// A batch of recorded episodes loaded from one safetensors file.
///
/// Expected tensors: `actions [games, steps, players]`,
/// `decks [games, deck, 2]`, `num_actions [games]`, `scores [games]` and
/// the scalar `num_players`. Integer payloads are normalized to `i64` up
/// front so episodes can be sliced out without touching the file again.
#[derive(Debug, Clone)]
pub struct GameDataset {
    games: usize,
    steps: usize,
    players: usize,
    deck_size: usize,
    actions: Vec<i64>,
    decks: Vec<i64>,
    num_actions: Vec<i64>,
    scores: Vec<i64>,
    num_players: usize,
}

impl GameDataset {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let buffer = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_bytes(&buffer).with_context(|| format!("load {}", path.display()))
    }

    pub fn from_bytes(buffer: &[u8]) -> anyhow::Result<Self> {
        let file = SafeTensors::deserialize(buffer).context("parse safetensors")?;

        let actions = file.tensor("actions").context("tensor actions")?;
        let decks = file.tensor("decks").context("tensor decks")?;
        let num_actions = file.tensor("num_actions").context("tensor num_actions")?;
        let scores = file.tensor("scores").context("tensor scores")?;
        let num_players = file.tensor("num_players").context("tensor num_players")?;

        let [games, steps, players] = dims::<3>(&actions, "actions")?;
        let [deck_games, deck_size, pair] = dims::<3>(&decks, "decks")?;
        if pair != 2 {
            bail!("decks tensor holds {pair}-tuples, expected (color, rank) pairs");
        }
        let [action_count_games] = dims::<1>(&num_actions, "num_actions")?;
        let [score_games] = dims::<1>(&scores, "scores")?;
        if deck_games != games || action_count_games != games || score_games != games {
            bail!(
                "tensor game counts disagree: actions={games} decks={deck_games} \
                 num_actions={action_count_games} scores={score_games}"
            );
        }

        let num_players = scalar(&num_players, "num_players")?;
        let num_players = usize::try_from(num_players)
            .ok()
            .filter(|&n| n > 0)
            .with_context(|| format!("num_players {num_players} is not a valid player count"))?;
        if players != num_players {
            bail!("actions tensor is {players} players wide but num_players is {num_players}");
        }

        Ok(Self {
            games,
            steps,
            players,
            deck_size,
            actions: int_values(&actions)?,
            decks: int_values(&decks)?,
            num_actions: int_values(&num_actions)?,
            scores: int_values(&scores)?,
            num_players,
        })
    }

    pub fn len(&self) -> usize {
        self.games
    }

    pub fn is_empty(&self) -> bool {
        self.games == 0
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn max_steps(&self) -> usize {
        self.steps
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    /// Slices episode `idx` out of the batch.
    pub fn episode(&self, idx: usize) -> anyhow::Result<Episode> {
        if idx >= self.games {
            bail!(
                "game index {idx} is out of bounds, the dataset contains {} games",
                self.games
            );
        }

        let step_stride = self.steps * self.players;
        let actions: Vec<Vec<i64>> = self.actions[idx * step_stride..(idx + 1) * step_stride]
            .chunks(self.players)
            .map(<[i64]>::to_vec)
            .collect();

        let deck_stride = self.deck_size * 2;
        let mut deck = Vec::with_capacity(self.deck_size);
        for pair in self.decks[idx * deck_stride..(idx + 1) * deck_stride].chunks(2) {
            deck.push(Card::new(
                card_field(pair[0], idx, "color")?,
                card_field(pair[1], idx, "rank")?,
            ));
        }

        let num_actions = usize::try_from(self.num_actions[idx]).with_context(|| {
            format!(
                "game {idx} declares a negative action count {}",
                self.num_actions[idx]
            )
        })?;

        Ok(Episode {
            index: idx,
            actions,
            deck,
            num_actions,
            num_players: self.num_players,
            score: self.scores[idx],
        })
    }
}

fn card_field(value: i64, game: usize, field: &str) -> anyhow::Result<u8> {
    u8::try_from(value)
        .with_context(|| format!("game {game} deck holds an out-of-range card {field} {value}"))
}

fn dims<const N: usize>(view: &TensorView, name: &str) -> anyhow::Result<[usize; N]> {
    <[usize; N]>::try_from(view.shape())
        .map_err(|_| anyhow::anyhow!("tensor {name} has shape {:?}, expected {N} dims", view.shape()))
}

fn scalar(view: &TensorView, name: &str) -> anyhow::Result<i64> {
    let values = int_values(view)?;
    match values.as_slice() {
        [value] => Ok(*value),
        _ => bail!("tensor {name} holds {} values, expected a scalar", values.len()),
    }
}

/// Decodes a little-endian integer tensor of any supported width into i64.
pub(crate) fn int_values(view: &TensorView) -> anyhow::Result<Vec<i64>> {
    fn read<const N: usize>(data: &[u8], decode: fn([u8; N]) -> i64) -> Vec<i64> {
        data.chunks_exact(N)
            .map(|chunk| {
                let mut buf = [0u8; N];
                buf.copy_from_slice(chunk);
                decode(buf)
            })
            .collect()
    }
    Ok(match view.dtype() {
        Dtype::I64 => read::<8>(view.data(), i64::from_le_bytes),
        Dtype::I32 => read::<4>(view.data(), |buf| i64::from(i32::from_le_bytes(buf))),
        Dtype::I16 => read::<2>(view.data(), |buf| i64::from(i16::from_le_bytes(buf))),
        Dtype::I8 => view.data().iter().map(|&b| i64::from(b as i8)).collect(),
        Dtype::U8 => view.data().iter().map(|&b| i64::from(b)).collect(),
        other => bail!("unsupported tensor dtype {other:?}, expected an integer type"),
    })
}
