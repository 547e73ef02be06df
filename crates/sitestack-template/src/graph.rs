//! Resource dependency graph.
//!
//! The engine derives creation order from `DependsOn` and from every `Ref` or
//! `Fn::GetAtt` between resources. [`Template::apply_order`] computes the
//! same order explicitly so it can be checked without deploying, and
//! [`Template::teardown_order`] is its reverse.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{TemplateError, TemplateResult};
use crate::template::Template;

impl Template {
    /// Resource-to-resource dependency edges, keyed by dependent.
    ///
    /// References to parameters are not edges.
    ///
    /// # Errors
    /// Returns [`TemplateError::UnknownReference`] if a resource refers to a
    /// logical ID that is neither a resource nor a parameter.
    pub fn dependency_graph(&self) -> TemplateResult<BTreeMap<&str, BTreeSet<&str>>> {
        let mut graph = BTreeMap::new();
        for (id, resource) in &self.resources {
            let mut edges = BTreeSet::new();
            for dep in resource.dependencies() {
                if let Some((target, _)) = self.resources.get_key_value(dep.as_str()) {
                    edges.insert(target.as_str());
                } else if !self.parameters.contains_key(&dep) {
                    return Err(TemplateError::UnknownReference {
                        from: id.clone(),
                        to: dep,
                    });
                }
            }
            graph.insert(id.as_str(), edges);
        }
        Ok(graph)
    }

    /// Logical IDs in an order where every resource follows its dependencies.
    ///
    /// Among resources that are ready at the same time, logical IDs are taken
    /// in lexical order, so the result is deterministic.
    ///
    /// # Errors
    /// Returns [`TemplateError::DependencyCycle`] if no such order exists, or
    /// [`TemplateError::UnknownReference`] for a dangling reference.
    pub fn apply_order(&self) -> TemplateResult<Vec<&str>> {
        let graph = self.dependency_graph()?;

        let mut pending: BTreeMap<&str, usize> =
            graph.iter().map(|(id, deps)| (*id, deps.len())).collect();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (id, deps) in &graph {
            for dep in deps {
                dependents.entry(*dep).or_default().push(*id);
            }
        }

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(graph.len());

        while let Some(id) = ready.pop_first() {
            order.push(id);
            pending.remove(id);
            for dependent in dependents.get(id).into_iter().flatten() {
                if let Some(n) = pending.get_mut(dependent) {
                    *n -= 1;
                    if *n == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        if !pending.is_empty() {
            let stuck = pending.keys().map(|id| (*id).to_owned()).collect();
            return Err(TemplateError::DependencyCycle(stuck));
        }
        Ok(order)
    }

    /// Logical IDs in the order the engine deletes them: dependents first.
    ///
    /// # Errors
    /// Same as [`Template::apply_order`].
    pub fn teardown_order(&self) -> TemplateResult<Vec<&str>> {
        let mut order = self.apply_order()?;
        order.reverse();
        Ok(order)
    }
}
