use super::sim::{SimMove, SimState};
use crate::eval::HandEvaluator;
use crate::strategy::AiConfig;
use guandan_core::belief::CardTracker;
use guandan_core::game::GameState;
use guandan_core::model::player::{Seat, Team};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

const EXPLORATION: f64 = std::f64::consts::SQRT_2;
/// Independent sampled worlds per search; root statistics are summed across them.
const WORLDS: u32 = 4;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("seat {0:?} has no candidate moves")]
    NoCandidates(Seat),
    #[error("search ended before any root move was visited")]
    EmptyTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub iterations: u32,
    pub max_depth: u32,
    pub rollout_plies: u32,
    pub time_budget: Duration,
}

impl SearchLimits {
    pub fn from_config(config: &AiConfig, hand_len: usize) -> Self {
        Self {
            iterations: config.mcts_iterations.max(1),
            max_depth: config.mcts_depth,
            rollout_plies: config.rollout_plies,
            time_budget: Duration::from_millis(config.time_budget_ms(hand_len)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub mv: SimMove,
    pub visits: u32,
    /// Mean reward of the chosen move for the searching team.
    pub value: f64,
    pub iterations: u32,
    pub elapsed: Duration,
}

struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
    mv: Option<SimMove>,
    state: SimState,
    visits: u32,
    wins: f64,
    untried: Vec<SimMove>,
    depth: u32,
}

impl Node {
    fn root(state: SimState) -> Self {
        let untried = state.legal_moves();
        Self {
            parent: None,
            children: Vec::new(),
            mv: None,
            state,
            visits: 0,
            wins: 0.0,
            untried,
            depth: 0,
        }
    }

    fn ucb(&self, parent_visits: u32) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let n = self.visits as f64;
        self.wins / n + EXPLORATION * ((parent_visits.max(1) as f64).ln() / n).sqrt()
    }
}

/// Determinized UCT search over the remainder of a round.
pub struct Mcts {
    limits: SearchLimits,
    rng: SmallRng,
    evaluator: HandEvaluator,
}

impl Mcts {
    pub fn new(limits: SearchLimits, seed: u64) -> Self {
        Self {
            limits,
            rng: SmallRng::seed_from_u64(seed),
            evaluator: HandEvaluator::new(),
        }
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Searches from `seat`'s point of view; hidden hands are sampled, never read.
    pub fn search(
        &mut self,
        state: &GameState,
        seat: Seat,
        tracker: Option<&CardTracker>,
    ) -> Result<SearchOutcome, SearchError> {
        let started = Instant::now();
        let deadline = started + self.limits.time_budget;

        let first = SimState::determinize(state, seat, tracker, &mut self.rng);
        let root_moves = first.legal_moves();
        if root_moves.is_empty() {
            return Err(SearchError::NoCandidates(seat));
        }

        let mut totals = vec![(0u32, 0.0f64); root_moves.len()];
        let per_world = (self.limits.iterations / WORLDS).max(1);
        let mut iterations = 0;
        let mut world = Some(first);
        for round in 0..WORLDS {
            if round > 0 && Instant::now() >= deadline {
                break;
            }
            let sim = match world.take() {
                Some(sim) => sim,
                None => SimState::determinize(state, seat, tracker, &mut self.rng),
            };
            let tree = self.grow(sim, seat.team(), per_world, deadline, &mut iterations);
            for &child in &tree[0].children {
                let node = &tree[child];
                let slot = node
                    .mv
                    .as_ref()
                    .and_then(|mv| root_moves.iter().position(|candidate| candidate == mv));
                if let Some(index) = slot {
                    totals[index].0 += node.visits;
                    totals[index].1 += node.wins;
                }
            }
        }

        let (best, (visits, wins)) = totals
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, (visits, _))| *visits)
            .ok_or(SearchError::EmptyTree)?;
        if visits == 0 {
            return Err(SearchError::EmptyTree);
        }
        let outcome = SearchOutcome {
            mv: root_moves[best].clone(),
            visits,
            value: wins / visits as f64,
            iterations,
            elapsed: started.elapsed(),
        };
        debug!(
            target: "guandan_bot::mcts",
            seat = seat.index(),
            iterations,
            candidates = root_moves.len(),
            visits,
            value = outcome.value,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "search finished"
        );
        Ok(outcome)
    }

    fn grow(
        &mut self,
        root: SimState,
        team: Team,
        budget: u32,
        deadline: Instant,
        iterations: &mut u32,
    ) -> Vec<Node> {
        let mut tree = vec![Node::root(root)];
        let mut done = 0;
        while done < budget && (done == 0 || Instant::now() < deadline) {
            let leaf = self.select(&tree);
            let leaf = self.expand(&mut tree, leaf);
            let reward = self.rollout(&tree[leaf].state, team);
            backpropagate(&mut tree, leaf, reward);
            done += 1;
        }
        *iterations += done;
        tree
    }

    fn select(&self, tree: &[Node]) -> usize {
        let mut current = 0;
        loop {
            let node = &tree[current];
            if !node.untried.is_empty() || node.children.is_empty() {
                return current;
            }
            let parent_visits = node.visits;
            let best = node.children.iter().copied().max_by(|a, b| {
                tree[*a]
                    .ucb(parent_visits)
                    .total_cmp(&tree[*b].ucb(parent_visits))
            });
            match best {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    fn expand(&mut self, tree: &mut Vec<Node>, index: usize) -> usize {
        if tree[index].untried.is_empty() || tree[index].depth >= self.limits.max_depth {
            return index;
        }
        let pick = self.rng.gen_range(0..tree[index].untried.len());
        let mv = tree[index].untried.swap_remove(pick);
        // Same step as rollouts: three passes hand the lead back with the trick
        // cleared, so a child never has to beat its own seat's play.
        let state = tree[index].state.apply(&mv);
        let untried = state.legal_moves();
        let child = Node {
            parent: Some(index),
            children: Vec::new(),
            mv: Some(mv),
            state,
            visits: 0,
            wins: 0.0,
            untried,
            depth: tree[index].depth + 1,
        };
        tree.push(child);
        let child_index = tree.len() - 1;
        tree[index].children.push(child_index);
        child_index
    }

    fn rollout(&mut self, start: &SimState, team: Team) -> f64 {
        let mut state = start.clone();
        for _ in 0..self.limits.rollout_plies {
            let Some(mv) = state.rollout_move(&mut self.rng) else {
                break;
            };
            state = state.apply(&mv);
        }
        self.score(&state, team)
    }

    /// 1.0 or 0.0 once a hand is empty, otherwise the team's share of hand strength.
    fn score(&self, state: &SimState, team: Team) -> f64 {
        match state.finished() {
            Some(winner) if winner == team => return 1.0,
            Some(_) => return 0.0,
            None => {}
        }
        let trump = state.trump();
        let strength = |team: Team| {
            team.seats()
                .iter()
                .map(|seat| self.evaluator.evaluate(state.hand(*seat), trump).score.max(0))
                .sum::<i32>() as f64
        };
        let (own, opp) = (strength(team), strength(team.other()));
        if own + opp > 0.0 { own / (own + opp) } else { 0.5 }
    }
}

/// Adds the reward to every node on the path; all seats share the root team's view.
fn backpropagate(tree: &mut [Node], leaf: usize, reward: f64) {
    let mut current = Some(leaf);
    while let Some(index) = current {
        let node = &mut tree[index];
        node.visits += 1;
        node.wins += reward;
        current = node.parent;
    }
}
