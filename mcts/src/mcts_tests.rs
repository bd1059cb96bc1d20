use assert_approx_eq::assert_approx_eq;

use crate::counting_game::{
    CountingAction, CountingAnalyzer, CountingGameEngine, CountingGameState,
};
use crate::{ConstantCPUCT, MCTSOptions, NoTemp, TemperatureConstant, MCTS};

const POLICY: [f32; 3] = [0.3, 0.3, 0.4];

#[tokio::test]
async fn test_mcts_is_deterministic() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mut mcts = MCTS::new(
        CountingGameState::new(50),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(3.0),
        NoTemp::new(),
    );

    let mut mcts2 = MCTS::new(
        CountingGameState::new(50),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(3.0),
        NoTemp::new(),
    );

    mcts.search_playouts(800).await.unwrap();
    mcts2.search_playouts(800).await.unwrap();

    assert_eq!(
        mcts.get_root_node_metrics().unwrap(),
        mcts2.get_root_node_metrics().unwrap()
    );
}

#[tokio::test]
async fn test_mcts_visits_add_up() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mut mcts = MCTS::new(
        CountingGameState::new(50),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(1.0),
        NoTemp::new(),
    );

    let max_depth = mcts.search_playouts(300).await.unwrap();
    let metrics = mcts.get_root_node_metrics().unwrap();

    assert!(max_depth >= 1);
    assert_eq!(metrics.visits, 301);
    assert_eq!(metrics.children.iter().map(|c| c.visits).sum::<usize>(), 300);
}

#[tokio::test]
async fn test_mcts_chooses_winning_p1_move() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mut mcts = MCTS::new(
        CountingGameState::new(99),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(1.0),
        NoTemp::new(),
    );

    mcts.search_playouts(200).await.unwrap();

    let metrics = mcts.get_root_node_metrics().unwrap();
    let best = metrics.child_max_visits().unwrap();

    assert_eq!(best.action, CountingAction::Increment);
    assert_approx_eq!(best.Qsa, 1.0, 0.0001);
    assert_eq!(mcts.select_action().unwrap(), CountingAction::Increment);
}

#[tokio::test]
async fn test_mcts_chooses_winning_p2_move() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);
    let game_state = CountingGameState {
        p1_turn: false,
        count: 1,
    };

    let mut mcts = MCTS::new(
        game_state,
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(1.0),
        NoTemp::new(),
    );

    mcts.search_playouts(200).await.unwrap();

    assert_eq!(mcts.select_action().unwrap(), CountingAction::Decrement);
}

#[tokio::test]
async fn test_no_temp_probabilities_are_one_hot() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mut mcts = MCTS::new(
        CountingGameState::new(99),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(1.0),
        NoTemp::new(),
    );

    mcts.search_playouts(100).await.unwrap();

    let probabilities = mcts.action_probabilities().unwrap();

    assert_eq!(probabilities.len(), 3);
    for (action, probability) in probabilities {
        let expected = if action == CountingAction::Increment { 1.0 } else { 0.0 };
        assert_approx_eq!(probability, expected, 0.0001);
    }
}

#[tokio::test]
async fn test_unit_temperature_probabilities_follow_visits() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mut mcts = MCTS::new(
        CountingGameState::new(50),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(3.0),
        TemperatureConstant::new(1.0),
    );

    mcts.search_playouts(400).await.unwrap();

    let metrics = mcts.get_root_node_metrics().unwrap();
    let probabilities = mcts.action_probabilities().unwrap();

    assert_approx_eq!(probabilities.iter().map(|(_, p)| p).sum::<f32>(), 1.0, 0.0001);

    for (edge, (action, probability)) in metrics.children.iter().zip(probabilities) {
        assert_eq!(edge.action, action);
        assert_approx_eq!(probability, edge.visits as f32 / 400.0, 0.0001);
    }
}

#[tokio::test]
async fn test_terminal_root_has_no_actions() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mut mcts = MCTS::new(
        CountingGameState::new(100),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(1.0),
        NoTemp::new(),
    );

    assert_eq!(mcts.search_playouts(10).await.unwrap(), 0);
    assert!(mcts.action_probabilities().is_err());
    assert!(mcts.select_action().is_err());
}

#[test]
fn test_probabilities_require_search() {
    let game_engine = CountingGameEngine::new();
    let analyzer = CountingAnalyzer::new(POLICY);

    let mcts = MCTS::new(
        CountingGameState::new(50),
        &game_engine,
        &analyzer,
        MCTSOptions::default(),
        ConstantCPUCT::new(1.0),
        NoTemp::new(),
    );

    assert!(mcts.action_probabilities().is_err());
}
