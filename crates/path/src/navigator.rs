//! Applies path steps to candidates.
//!
//! Navigation is read-only: probing a field never creates it. Each step's
//! expansion reads a sequence through one snapshot so that its length check and
//! indexed reads agree.

use crate::ast::Step;
use crate::candidate::Candidate;
use arbor_value::{Location, Value};
use std::collections::{HashSet, VecDeque};

/// All candidates reachable from the variable at `start` by applying `steps`
/// left to right.
///
/// The seed is the sequence named by the last segment of `start`, positioned at
/// that segment's index. An absent, empty or too-short sequence yields nothing.
pub fn navigate(root: &Value, start: &Location, steps: &[Step]) -> Vec<Candidate> {
    match seed(root, start) {
        Some(candidate) => apply_steps(vec![candidate], steps),
        None => {
            log::trace!("navigation start '{}' does not resolve", start);
            Vec::new()
        }
    }
}

/// Like [`navigate`], starting from an already bound candidate.
pub fn navigate_from(candidate: &Candidate, steps: &[Step]) -> Vec<Candidate> {
    apply_steps(vec![candidate.clone()], steps)
}

fn seed(root: &Value, start: &Location) -> Option<Candidate> {
    let vector = start.resolve_vector(root)?;
    let position = start.last()?.position();
    if vector.len() <= position {
        return None;
    }
    Some(Candidate::new(vector, position, start.clone()))
}

fn apply_steps(mut candidates: Vec<Candidate>, steps: &[Step]) -> Vec<Candidate> {
    for step in steps {
        if candidates.is_empty() {
            break;
        }
        let mut expanded = Vec::new();
        for candidate in &candidates {
            expand_step(step, candidate, &mut expanded);
        }
        log::trace!(
            "step '{}' expanded {} candidate(s) into {}",
            step,
            candidates.len(),
            expanded.len()
        );
        candidates = expanded;
    }
    candidates
}

fn expand_step(step: &Step, candidate: &Candidate, results: &mut Vec<Candidate>) {
    match step {
        Step::Field(name) => collect_field(candidate, name, results),
        Step::FieldWildcard => collect_field_wildcard(candidate, results),
        Step::ArrayIndex(index) => collect_index(candidate, *index, results),
        Step::ArrayWildcard => collect_all_indexes(candidate, results),
        Step::RecursiveField(name) => collect_recursive(candidate, Some(name), results),
        Step::RecursiveWildcard => collect_recursive(candidate, None, results),
    }
}

fn collect_field(candidate: &Candidate, name: &str, results: &mut Vec<Candidate>) {
    let Some(node) = candidate.value() else {
        return;
    };
    if let Some(vector) = node.child_vector(name)
        && !vector.is_empty()
    {
        let location = candidate.location().clone().with_field(name);
        results.push(Candidate::new(vector, 0, location));
    }
}

fn collect_field_wildcard(candidate: &Candidate, results: &mut Vec<Candidate>) {
    let Some(node) = candidate.value() else {
        return;
    };
    for (name, vector) in node.field_entries() {
        let location = candidate.location().clone().with_field(name);
        results.push(Candidate::new(vector, 0, location));
    }
}

fn collect_index(candidate: &Candidate, index: usize, results: &mut Vec<Candidate>) {
    if index < candidate.len() {
        let location = candidate.location().clone().with_last_index(index);
        results.push(Candidate::new(candidate.vector().clone(), index, location));
    }
}

fn collect_all_indexes(candidate: &Candidate, results: &mut Vec<Candidate>) {
    let length = candidate.vector().snapshot().len();
    for index in 0..length {
        let location = candidate.location().clone().with_last_index(index);
        results.push(Candidate::new(candidate.vector().clone(), index, location));
    }
}

/// Breadth-first search below the candidate's node. Matches closer to the
/// start come first; within one node, fields in order, then positions
/// ascending. Each node is expanded at most once, so aliased cycles terminate.
fn collect_recursive(candidate: &Candidate, name: Option<&str>, results: &mut Vec<Candidate>) {
    let Some(start) = candidate.value() else {
        return;
    };
    let mut seen = HashSet::new();
    seen.insert(start.id());
    let mut queue = VecDeque::from([(start, candidate.location().clone())]);

    while let Some((node, location)) = queue.pop_front() {
        for (field, vector) in node.field_entries() {
            let field_location = location.clone().with_field(field.as_str());
            if name.is_none_or(|wanted| wanted == field) {
                results.push(Candidate::new(vector.clone(), 0, field_location.clone()));
            }
            for (index, child) in vector.snapshot().into_iter().enumerate() {
                if seen.insert(child.id()) {
                    queue.push_back((child, field_location.clone().with_last_index(index)));
                }
            }
        }
    }
}
