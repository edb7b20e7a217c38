use crate::{Card, ColorMap, TraceError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HAND_SIZE: usize = 5;

/// Result of a discard: the removed card plus the replacement draw, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    pub card: Card,
    pub drawn: Option<Card>,
}

/// Result of a play. `advanced` is false when the card did not beat the
/// stack height for its color; the card is still consumed from the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Played {
    pub card: Card,
    pub advanced: bool,
    pub drawn: Option<Card>,
}

/// Read-only rendering of the table, suitable for logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub hands: Vec<Vec<String>>,
    pub discard_pile: Vec<String>,
    pub played: Vec<StackHeight>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackHeight {
    pub color: String,
    pub height: u8,
}

/// Per-episode mutable table state: one hand per player, the discard
/// pile, the played stacks, and a cursor into the undrawn deck.
#[derive(Debug, Clone)]
pub struct GameState {
    deck: Vec<Card>,
    hands: Vec<Vec<Card>>,
    discard_pile: Vec<Card>,
    played: BTreeMap<u8, u8>,
    draw_ptr: usize,
    cards_played: usize,
}

impl GameState {
    /// Deals `HAND_SIZE` cards per player in deck order: player 0 takes
    /// the first block, player 1 the next, and so on. The draw cursor
    /// starts just past the dealt cards.
    pub fn deal(deck: Vec<Card>, num_players: usize, colors: &ColorMap) -> Result<Self, TraceError> {
        let needed = HAND_SIZE * num_players;
        if needed > deck.len() {
            return Err(TraceError::DeckTooShort {
                len: deck.len(),
                needed,
                players: num_players,
            });
        }
        let hands = (0..num_players)
            .map(|player| deck[player * HAND_SIZE..(player + 1) * HAND_SIZE].to_vec())
            .collect();
        Ok(Self {
            deck,
            hands,
            discard_pile: Vec::new(),
            played: colors.indices().map(|color| (color, 0)).collect(),
            draw_ptr: needed,
            cards_played: 0,
        })
    }

    pub fn hands(&self) -> &[Vec<Card>] {
        &self.hands
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn stack_height(&self, color: u8) -> u8 {
        self.played.get(&color).copied().unwrap_or(0)
    }

    pub fn draw_ptr(&self) -> usize {
        self.draw_ptr
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Cards consumed by play actions so far, successful or not.
    pub fn cards_played(&self) -> usize {
        self.cards_played
    }

    /// Moves the next undrawn deck card into the player's hand. Once the
    /// draw pile is exhausted this silently does nothing; the game keeps
    /// going with shrinking hands.
    pub fn draw_if_available(&mut self, player: usize) -> Option<Card> {
        if self.draw_ptr >= self.deck.len() || player >= self.hands.len() {
            return None;
        }
        let card = self.deck[self.draw_ptr];
        self.draw_ptr += 1;
        self.hands[player].push(card);
        Some(card)
    }

    pub fn discard(&mut self, player: usize, idx: usize) -> Result<Discarded, TraceError> {
        let card = self.take_from_hand(player, idx)?;
        self.discard_pile.push(card);
        let drawn = self.draw_if_available(player);
        Ok(Discarded { card, drawn })
    }

    pub fn play(&mut self, player: usize, idx: usize) -> Result<Played, TraceError> {
        let card = self.take_from_hand(player, idx)?;
        self.cards_played += 1;
        let height = self.played.entry(card.color).or_insert(0);
        let advanced = card.face_rank() > *height;
        if advanced {
            *height = card.face_rank();
        }
        let drawn = self.draw_if_available(player);
        Ok(Played {
            card,
            advanced,
            drawn,
        })
    }

    pub fn snapshot(&self, colors: &ColorMap) -> Result<Snapshot, TraceError> {
        let mut hands = Vec::with_capacity(self.hands.len());
        for hand in &self.hands {
            hands.push(render_all(hand, colors)?);
        }
        let discard_pile = render_all(&self.discard_pile, colors)?;
        let played = colors
            .iter()
            .map(|(idx, name)| StackHeight {
                color: name.to_string(),
                height: self.stack_height(idx),
            })
            .collect();
        Ok(Snapshot {
            hands,
            discard_pile,
            played,
        })
    }

    fn take_from_hand(&mut self, player: usize, idx: usize) -> Result<Card, TraceError> {
        let players = self.hands.len();
        let hand = self
            .hands
            .get_mut(player)
            .ok_or(TraceError::UnknownPlayer { player, players })?;
        if idx >= hand.len() {
            return Err(TraceError::HandIndexOutOfRange {
                player,
                idx,
                len: hand.len(),
            });
        }
        Ok(hand.remove(idx))
    }
}

fn render_all(cards: &[Card], colors: &ColorMap) -> Result<Vec<String>, TraceError> {
    cards.iter().map(|card| card.render(colors)).collect()
}
