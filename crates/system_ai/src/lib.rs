//! AI system: agents cycling through behaviour states on a decision timer.

use system_api::{export_system, System};

/// Seconds between decisions.
const DECISION_INTERVAL: f64 = 0.5;
const AGENT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Idle,
    Patrol,
    Chase,
}

impl Behaviour {
    fn next(self) -> Self {
        match self {
            Behaviour::Idle => Behaviour::Patrol,
            Behaviour::Patrol => Behaviour::Chase,
            Behaviour::Chase => Behaviour::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Agent {
    pub behaviour: Behaviour,
    /// Seconds until the next decision.
    pub cooldown: f64,
}

#[derive(Debug, Default)]
pub struct AiSystem {
    agents: Vec<Agent>,
    decisions: u64,
}

impl AiSystem {
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn decisions(&self) -> u64 {
        self.decisions
    }
}

impl System for AiSystem {
    fn name(&self) -> &str {
        "AISystem"
    }

    fn initialize(&mut self) -> bool {
        // Stagger the agents so they do not all decide on the same tick.
        self.agents = (0..AGENT_COUNT)
            .map(|i| Agent {
                behaviour: Behaviour::Idle,
                cooldown: DECISION_INTERVAL * (i + 1) as f64 / AGENT_COUNT as f64,
            })
            .collect();
        self.decisions = 0;
        true
    }

    fn update(&mut self, delta_time: f64) {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            return;
        }

        for agent in &mut self.agents {
            agent.cooldown -= delta_time;
            if agent.cooldown > 0.0 {
                continue;
            }

            // Every interval that fully elapsed is one decision; the
            // remainder carries into the next cooldown.
            let overdue = -agent.cooldown;
            let decisions = (overdue / DECISION_INTERVAL).floor() as u64 + 1;
            for _ in 0..decisions % 3 {
                agent.behaviour = agent.behaviour.next();
            }
            agent.cooldown = DECISION_INTERVAL - overdue.rem_euclid(DECISION_INTERVAL);
            self.decisions = self.decisions.saturating_add(decisions);
        }
    }

    fn shutdown(&mut self) {
        self.agents.clear();
    }
}

export_system!(AiSystem);
