//! Player records and the two candidate pools the model is built over.

use std::collections::HashMap;

use crate::config::ContestConfig;
use crate::error::{LineupError, PoolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Captain,
    Flex,
}

/// One role-tagged row of the merged input table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    /// Upload label, e.g. "Jane Doe (12345678)".
    pub label: String,
    pub role: Role,
    pub salary: u32,
    /// `None` when the projection sheet has no value for this player.
    pub projection: Option<f64>,
    /// Shared by the captain row and the flex row of the same person.
    pub identity_key: String,
}

impl PlayerRecord {
    pub fn new(name: &str, label: &str, role: Role, salary: u32, projection: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            role,
            salary,
            projection,
            identity_key: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position inside its own pool.
    pub index: usize,
    pub label: String,
    pub salary: u32,
    /// Projection after the positional multiplier.
    pub effective_score: f64,
    pub identity_key: String,
}

#[derive(Debug, Clone)]
pub struct CandidatePool {
    captains: Vec<Candidate>,
    flex: Vec<Candidate>,
    /// For each captain candidate, the flex candidates that are the same person.
    linked_flex: Vec<Vec<usize>>,
}

impl CandidatePool {
    /// Splits `players` by role, drops rows without a usable projection and boosts captain
    /// scores once. Fails when either pool cannot fill its slots.
    pub fn build(players: &[PlayerRecord], contest: &ContestConfig) -> Result<Self, LineupError> {
        let mut captains = Vec::new();
        let mut flex = Vec::new();

        for player in players {
            let Some(projection) = player.projection.filter(|p| p.is_finite()) else {
                continue;
            };
            let (pool, score) = match player.role {
                Role::Captain => (&mut captains, projection * contest.captain_multiplier),
                Role::Flex => (&mut flex, projection),
            };
            pool.push(Candidate {
                index: pool.len(),
                label: player.label.clone(),
                salary: player.salary,
                effective_score: score,
                identity_key: player.identity_key.clone(),
            });
        }

        check_pool_size(PoolKind::Captain, captains.len(), contest.captain_slots)?;
        check_pool_size(PoolKind::Flex, flex.len(), contest.flex_slots)?;

        let linked_flex = link_identities(&captains, &flex);

        Ok(Self {
            captains,
            flex,
            linked_flex,
        })
    }

    pub fn captains(&self) -> &[Candidate] {
        &self.captains
    }

    pub fn flex(&self) -> &[Candidate] {
        &self.flex
    }

    pub fn linked_flex(&self, captain: usize) -> &[usize] {
        &self.linked_flex[captain]
    }

    /// Number of binary variables: captain pool followed by flex pool.
    pub fn len(&self) -> usize {
        self.captains.len() + self.flex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate behind a position of the concatenated selection vector.
    pub fn candidate(&self, position: usize) -> (Role, &Candidate) {
        if position < self.captains.len() {
            (Role::Captain, &self.captains[position])
        } else {
            (Role::Flex, &self.flex[position - self.captains.len()])
        }
    }
}

fn check_pool_size(pool: PoolKind, available: usize, required: usize) -> Result<(), LineupError> {
    if available == 0 || available < required {
        return Err(LineupError::MalformedCandidatePool {
            pool,
            available,
            required,
        });
    }
    Ok(())
}

fn link_identities(captains: &[Candidate], flex: &[Candidate]) -> Vec<Vec<usize>> {
    let mut by_identity: HashMap<&str, Vec<usize>> = HashMap::new();
    for candidate in flex {
        by_identity
            .entry(candidate.identity_key.as_str())
            .or_default()
            .push(candidate.index);
    }
    captains
        .iter()
        .map(|captain| {
            by_identity
                .get(captain.identity_key.as_str())
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}
