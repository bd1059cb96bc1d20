use std::fmt::Debug;

use anyhow::{anyhow, Result};
use common::softmax;
use engine::engine::GameEngine;
use engine::value::Value;
use generational_arena::{Arena, Index};
use log::warn;
use model::analytics::GameAnalyzer;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::{thread_rng, Rng};

use super::cpuct::CPUCT;
use super::node::MCTSNode;
use super::node_metrics::{EdgeMetrics, NodeMetrics};
use super::options::MCTSOptions;
use super::temp::Temperature;

pub struct MCTS<'a, S, A, E, M, C, T, V> {
    options: MCTSOptions,
    game_engine: &'a E,
    analyzer: &'a M,
    cpuct: C,
    temp: T,
    starting_game_state: Option<S>,
    root: Option<Index>,
    arena: Arena<MCTSNode<S, A, V>>,
}

#[allow(non_snake_case)]
impl<'a, S, A, E, M, C, T, V> MCTS<'a, S, A, E, M, C, T, V>
where
    A: Clone + Eq + Debug,
    V: Value,
    E: 'a + GameEngine<State = S, Action = A, Value = V>,
    M: 'a + GameAnalyzer<State = S, Action = A, Value = V>,
    C: CPUCT<State = S>,
    T: Temperature<State = S>,
{
    pub fn new(
        game_state: S,
        game_engine: &'a E,
        analyzer: &'a M,
        options: MCTSOptions,
        cpuct: C,
        temp: T,
    ) -> Self {
        MCTS {
            options,
            game_engine,
            analyzer,
            cpuct,
            temp,
            starting_game_state: Some(game_state),
            root: None,
            arena: Arena::new(),
        }
    }

    /// Runs exactly `playouts` playouts from the root. Returns the deepest path searched.
    pub async fn search_playouts(&mut self, playouts: usize) -> Result<usize> {
        self.search(|searches| searches < playouts).await
    }

    /// Runs playouts while `alive` returns true. `alive` receives the number of playouts
    /// completed by this call so far.
    pub async fn search<F: FnMut(usize) -> bool>(&mut self, mut alive: F) -> Result<usize> {
        let root_index = self.get_or_create_root_node().await?;
        let mut max_depth = 0;
        let mut searches = 0;

        while alive(searches) {
            let depth = self.playout(root_index).await?;
            max_depth = max_depth.max(depth);
            searches += 1;
        }

        Ok(max_depth)
    }

    pub fn get_root_node_metrics(&self) -> Result<NodeMetrics<A>> {
        let root = self.root_node()?;

        Ok(NodeMetrics {
            visits: root.visits,
            children: root
                .children
                .iter()
                .map(|e| EdgeMetrics {
                    action: e.action.clone(),
                    visits: e.visits,
                    Qsa: e.Qsa().unwrap_or(0.0),
                })
                .collect(),
        })
    }

    /// Probability of playing each root action, from visit counts shaped by the temperature:
    /// `softmax(ln(visits) / temp)`. A temperature of zero puts all weight on the most
    /// visited action.
    pub fn action_probabilities(&self) -> Result<Vec<(A, f32)>> {
        let root = self.root_node()?;

        if root.is_terminal() {
            return Err(anyhow!(
                "Node has no children. The root position is already decided."
            ));
        }

        let temp = self.temp.temp(&root.game_state);
        let visits = root.children.iter().map(|e| e.visits).collect::<Vec<_>>();

        let probabilities = if temp <= 0.0 {
            let best = visits
                .iter()
                .enumerate()
                .max_by_key(|(_, visits)| **visits)
                .map(|(i, _)| i)
                .unwrap_or(0);

            (0..visits.len())
                .map(|i| if i == best { 1.0 } else { 0.0 })
                .collect::<Vec<_>>()
        } else {
            let logits = visits
                .iter()
                .map(|v| (*v as f32 + 1e-10).ln())
                .collect::<Vec<_>>();

            softmax(&logits, temp)
        };

        Ok(root
            .children
            .iter()
            .map(|e| e.action.clone())
            .zip(probabilities)
            .collect())
    }

    pub fn select_action(&self) -> Result<A> {
        let action_probabilities = self.action_probabilities()?;
        let chosen_index = Self::select_action_using_probabilities(&action_probabilities);

        Ok(action_probabilities[chosen_index].0.clone())
    }

    fn select_action_using_probabilities(action_probabilities: &[(A, f32)]) -> usize {
        let weighted_index = WeightedIndex::new(action_probabilities.iter().map(|(_, p)| *p));

        match weighted_index {
            Err(_) => {
                warn!("Invalid action probabilities. Move will be randomly selected.");
                warn!("{:?}", action_probabilities);
                thread_rng().gen_range(0..action_probabilities.len())
            }
            Ok(weighted_index) => weighted_index.sample(&mut thread_rng()),
        }
    }

    async fn playout(&mut self, root_index: Index) -> Result<usize> {
        let mut path: Vec<(Index, usize)> = vec![];
        let mut node_index = root_index;

        let value = loop {
            let node = &self.arena[node_index];

            if node.is_terminal() {
                break node.value_score.clone();
            }

            let child_index = self.select_path(node_index, path.is_empty());
            path.push((node_index, child_index));

            let (child_node, action) = {
                let edge = &self.arena[node_index].children[child_index];
                (edge.node, edge.action.clone())
            };

            match child_node {
                Some(child_node) => node_index = child_node,
                None => {
                    let game_state = self
                        .game_engine
                        .take_action(&self.arena[node_index].game_state, &action);
                    let node =
                        Self::analyse_and_create_node(game_state, self.game_engine, self.analyzer)
                            .await;
                    let value = node.value_score.clone();
                    let new_index = self.arena.insert(node);
                    self.arena[node_index].children[child_index].node = Some(new_index);

                    break value;
                }
            }
        };

        let depth = path.len();

        for (node_index, child_index) in path {
            let node = &mut self.arena[node_index];
            let player_to_move = self.game_engine.player_to_move(&node.game_state);
            let edge = node
                .children
                .get_mut(child_index)
                .ok_or_else(|| anyhow!("Selected child {} does not exist", child_index))?;

            edge.visits += 1;
            edge.W += value.get_value_for_player(player_to_move);
            node.visits += 1;
        }

        Ok(depth)
    }

    fn select_path(&self, node_index: Index, is_root: bool) -> usize {
        let node = &self.arena[node_index];
        let fpu = if is_root {
            self.options.fpu_root
        } else {
            self.options.fpu
        };
        let Nsb = node.visits;
        let root_Nsb = (Nsb as f32).sqrt();
        let cpuct = self.cpuct.cpuct(&node.game_state, Nsb, is_root);

        let mut best_child_index = 0;
        let mut best_puct = f32::MIN;

        for (i, child) in node.children.iter().enumerate() {
            let Nsa = child.visits;
            let Psa = child.policy_score;
            let Usa = cpuct * Psa * root_Nsb / (1 + Nsa) as f32;
            let Qsa = child.Qsa().unwrap_or(fpu);

            let PUCT = Qsa + Usa;

            if PUCT > best_puct {
                best_puct = PUCT;
                best_child_index = i;
            }
        }

        best_child_index
    }

    async fn get_or_create_root_node(&mut self) -> Result<Index> {
        if let Some(root_index) = self.root {
            return Ok(root_index);
        }

        let starting_game_state = self
            .starting_game_state
            .take()
            .ok_or_else(|| anyhow!("Starting game state was already consumed"))?;

        let root_node =
            Self::analyse_and_create_node(starting_game_state, self.game_engine, self.analyzer)
                .await;

        let root_index = self.arena.insert(root_node);
        self.root = Some(root_index);

        Ok(root_index)
    }

    fn root_node(&self) -> Result<&MCTSNode<S, A, V>> {
        let root_index = self
            .root
            .ok_or_else(|| anyhow!("Root node does not exist. Run search first."))?;

        Ok(&self.arena[root_index])
    }

    async fn analyse_and_create_node(
        game_state: S,
        game_engine: &E,
        analyzer: &M,
    ) -> MCTSNode<S, A, V> {
        if let Some(value_score) = game_engine.terminal_state(&game_state) {
            return MCTSNode::terminal(game_state, value_score);
        }

        let analysis = analyzer.get_state_analysis(&game_state).await;

        MCTSNode::new(game_state, analysis.value_score, analysis.policy_scores)
    }
}
