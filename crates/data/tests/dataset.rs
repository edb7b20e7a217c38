use hanatrace_data::GameDataset;
use safetensors::tensor::{Dtype, TensorView};
use std::collections::HashMap;

const GAMES: usize = 2;
const STEPS: usize = 3;
const PLAYERS: usize = 2;
const DECK: usize = 10;

fn le_bytes(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Two tiny recorded games in the exact tensor layout the real datasets
/// use, serialized through the safetensors crate itself.
fn fixture() -> Vec<u8> {
    // Game 0: player 0 discards slot 3, player 1 hints, then padding.
    // Game 1: a single out-of-range code.
    let actions: Vec<i64> = vec![
        3, 30, 30, 12, 30, 30, // game 0
        31, 30, 30, 30, 30, 30, // game 1
    ];
    let decks: Vec<i64> = (0..(GAMES * DECK) as i64)
        .flat_map(|i| [i % 5, (i / 5) % 5])
        .collect();
    let num_actions: Vec<i64> = vec![2, 1];
    let scores: Vec<i64> = vec![7, 0];
    let num_players: Vec<i64> = vec![PLAYERS as i64];

    let actions_data = le_bytes(&actions);
    let decks_data = le_bytes(&decks);
    let num_actions_data = le_bytes(&num_actions);
    let scores_data = le_bytes(&scores);
    let num_players_data = le_bytes(&num_players);

    let tensors = HashMap::from([
        (
            "actions",
            TensorView::new(Dtype::I64, vec![GAMES, STEPS, PLAYERS], &actions_data).unwrap(),
        ),
        (
            "decks",
            TensorView::new(Dtype::I64, vec![GAMES, DECK, 2], &decks_data).unwrap(),
        ),
        (
            "num_actions",
            TensorView::new(Dtype::I64, vec![GAMES], &num_actions_data).unwrap(),
        ),
        (
            "scores",
            TensorView::new(Dtype::I64, vec![GAMES], &scores_data).unwrap(),
        ),
        (
            "num_players",
            TensorView::new(Dtype::I64, vec![], &num_players_data).unwrap(),
        ),
    ]);
    safetensors::serialize(&tensors, &None).unwrap()
}

#[test]
fn reads_the_batch_dimensions() {
    let dataset = GameDataset::from_bytes(&fixture()).unwrap();
    assert_eq!(dataset.len(), GAMES);
    assert_eq!(dataset.num_players(), PLAYERS);
    assert_eq!(dataset.max_steps(), STEPS);
    assert_eq!(dataset.deck_size(), DECK);
}

#[test]
fn slices_an_episode_out_of_the_batch() {
    let dataset = GameDataset::from_bytes(&fixture()).unwrap();
    let episode = dataset.episode(0).unwrap();
    assert_eq!(episode.index, 0);
    assert_eq!(
        episode.actions,
        vec![vec![3, 30], vec![30, 12], vec![30, 30]]
    );
    assert_eq!(episode.num_actions, 2);
    assert_eq!(episode.num_players, PLAYERS);
    assert_eq!(episode.score, 7);
    assert_eq!(episode.deck.len(), DECK);
    assert_eq!(episode.deck[3].color, 3);
    assert_eq!(episode.deck[3].rank, 0);

    let second = dataset.episode(1).unwrap();
    assert_eq!(second.actions[0], vec![31, 30]);
    // Game 1's deck continues the global counter, not game 0's cards.
    assert_eq!(second.deck[0].color, (DECK % 5) as u8);
}

#[test]
fn out_of_bounds_game_index_is_reported() {
    let dataset = GameDataset::from_bytes(&fixture()).unwrap();
    let err = dataset.episode(GAMES).unwrap_err();
    assert!(err.to_string().contains("out of bounds"));
}

#[test]
fn missing_tensor_is_reported_by_name() {
    let scores = le_bytes(&[1]);
    let tensors = HashMap::from([(
        "scores",
        TensorView::new(Dtype::I64, vec![1], &scores).unwrap(),
    )]);
    let buffer = safetensors::serialize(&tensors, &None).unwrap();
    let err = GameDataset::from_bytes(&buffer).unwrap_err();
    assert!(format!("{err:#}").contains("actions"));
}

#[test]
fn int32_tensors_are_accepted() {
    let actions: Vec<i32> = vec![3, 30];
    let decks: Vec<i32> = (0..10).flat_map(|i| [i % 5, (i / 5) % 5]).collect();
    let num_actions: Vec<i32> = vec![1];
    let scores: Vec<i32> = vec![4];
    let num_players: Vec<i32> = vec![1];

    fn le32(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
    let actions_data = le32(&actions);
    let decks_data = le32(&decks);
    let num_actions_data = le32(&num_actions);
    let scores_data = le32(&scores);
    let num_players_data = le32(&num_players);

    let tensors = HashMap::from([
        (
            "actions",
            TensorView::new(Dtype::I32, vec![1, 2, 1], &actions_data).unwrap(),
        ),
        (
            "decks",
            TensorView::new(Dtype::I32, vec![1, 10, 2], &decks_data).unwrap(),
        ),
        (
            "num_actions",
            TensorView::new(Dtype::I32, vec![1], &num_actions_data).unwrap(),
        ),
        (
            "scores",
            TensorView::new(Dtype::I32, vec![1], &scores_data).unwrap(),
        ),
        (
            "num_players",
            TensorView::new(Dtype::I32, vec![], &num_players_data).unwrap(),
        ),
    ]);
    let buffer = safetensors::serialize(&tensors, &None).unwrap();
    let dataset = GameDataset::from_bytes(&buffer).unwrap();
    assert_eq!(dataset.episode(0).unwrap().score, 4);
}

#[test]
fn player_width_mismatch_is_rejected() {
    // actions say 2 players per step, num_players says 3.
    let actions = le_bytes(&[3, 30]);
    let decks = le_bytes(&(0..10i64).flat_map(|i| [i % 5, (i / 5) % 5]).collect::<Vec<i64>>());
    let num_actions = le_bytes(&[1]);
    let scores = le_bytes(&[0]);
    let num_players = le_bytes(&[3]);
    let tensors = HashMap::from([
        (
            "actions",
            TensorView::new(Dtype::I64, vec![1, 1, 2], &actions).unwrap(),
        ),
        (
            "decks",
            TensorView::new(Dtype::I64, vec![1, 10, 2], &decks).unwrap(),
        ),
        (
            "num_actions",
            TensorView::new(Dtype::I64, vec![1], &num_actions).unwrap(),
        ),
        (
            "scores",
            TensorView::new(Dtype::I64, vec![1], &scores).unwrap(),
        ),
        (
            "num_players",
            TensorView::new(Dtype::I64, vec![], &num_players).unwrap(),
        ),
    ]);
    let buffer = safetensors::serialize(&tensors, &None).unwrap();
    let err = GameDataset::from_bytes(&buffer).unwrap_err();
    assert!(format!("{err:#}").contains("num_players"));
}
