//! Tag registry - build-time validation and ordering
//!
//! Registration is a configuration step, not a runtime one: duplicate
//! names, unknown prerequisites, phase inversions, and prerequisite cycles
//! are rejected when the registry is built, before any port runs. The
//! execution order is computed once: first pass before second pass, and
//! within each phase a stable topological sort over the declared
//! prerequisite edges, ties broken by registration order.

use std::collections::HashMap;

use portmon_core::{PortError, PortResult};

use crate::{Phase, PortContext, Tag};

/// Collects tags, then validates and orders them
#[derive(Default)]
pub struct RegistryBuilder {
    tags: Vec<Box<dyn Tag>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    pub fn register(mut self, tag: impl Tag + 'static) -> Self {
        self.tags.push(Box::new(tag));
        self
    }

    pub fn build(self) -> PortResult<TagRegistry> {
        let tags = self.tags;

        let mut by_name: HashMap<&'static str, usize> = HashMap::with_capacity(tags.len());
        for (i, tag) in tags.iter().enumerate() {
            if by_name.insert(tag.name(), i).is_some() {
                return Err(PortError::DuplicateTag(tag.name().to_string()));
            }
        }

        // Validate edges: prerequisites must exist and must not live in a
        // later phase than their dependent.
        for tag in &tags {
            for &prereq in tag.prerequisites() {
                let Some(&p) = by_name.get(prereq) else {
                    return Err(PortError::UnknownPrerequisite {
                        tag: tag.name().to_string(),
                        prerequisite: prereq.to_string(),
                    });
                };
                if tags[p].phase() == Phase::Second && tag.phase() == Phase::First {
                    return Err(PortError::PhaseInversion {
                        tag: tag.name().to_string(),
                        prerequisite: prereq.to_string(),
                    });
                }
            }
        }

        let mut order = Vec::with_capacity(tags.len());
        for phase in [Phase::First, Phase::Second] {
            order.extend(Self::sort_phase(&tags, &by_name, phase)?);
        }

        Ok(TagRegistry { tags, order })
    }

    /// Stable Kahn's algorithm over intra-phase edges: always take the
    /// lowest registration index among tags whose prerequisites are done.
    fn sort_phase(
        tags: &[Box<dyn Tag>],
        by_name: &HashMap<&'static str, usize>,
        phase: Phase,
    ) -> PortResult<Vec<usize>> {
        let members: Vec<usize> = (0..tags.len())
            .filter(|&i| tags[i].phase() == phase)
            .collect();

        let mut done = vec![false; tags.len()];
        let mut out = Vec::with_capacity(members.len());
        while out.len() < members.len() {
            // cross-phase edges are satisfied by phase ordering
            let next = members.iter().copied().find(|&i| {
                !done[i]
                    && tags[i]
                        .prerequisites()
                        .iter()
                        .all(|&p| tags[by_name[p]].phase() != phase || done[by_name[p]])
            });
            let Some(i) = next else {
                let stuck = members
                    .iter()
                    .copied()
                    .find(|&i| !done[i])
                    .map(|i| tags[i].name().to_string())
                    .unwrap_or_default();
                return Err(PortError::PrerequisiteCycle(stuck));
            };
            done[i] = true;
            out.push(i);
        }
        Ok(out)
    }
}

/// A validated, ordered set of converters for one target format
pub struct TagRegistry {
    tags: Vec<Box<dyn Tag>>,
    order: Vec<usize>,
}

impl TagRegistry {
    /// Run every converter of `phase`, in the precomputed order
    pub fn run_phase(&self, phase: Phase, ctx: &mut PortContext<'_>) -> PortResult<()> {
        for &i in &self.order {
            let tag = &self.tags[i];
            if tag.phase() == phase {
                tracing::debug!(tag = tag.name(), phase = ?phase, "running converter");
                tag.run(ctx)?;
            }
        }
        Ok(())
    }

    /// Execution order by name (diagnostics and tests)
    pub fn order(&self) -> Vec<&'static str> {
        self.order.iter().map(|&i| self.tags[i].name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
