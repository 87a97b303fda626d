//! Point sensitivities to curve zero rates.
//!
//! A [`CurveSensitivity`] maps a curve name to `(time, amount)` pairs, where
//! `amount` is the derivative of a value with respect to the continuously
//! compounded zero rate at `time`. Pairs are additive: two cash flows paying
//! on the same date contribute two entries with the same time, and consumers
//! must sum them. [`CurveSensitivity::cleaned`] does that summation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Zero-rate point sensitivities grouped by curve name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSensitivity {
    sensitivities: BTreeMap<String, Vec<(f64, f64)>>,
}

impl CurveSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity with one curve.
    #[must_use]
    pub fn of(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert(name.into(), points);
        Self { sensitivities }
    }

    /// Appends one `(time, amount)` pair to curve `name`.
    pub fn add(&mut self, name: &str, time: f64, amount: f64) {
        match self.sensitivities.get_mut(name) {
            Some(points) => points.push((time, amount)),
            None => {
                self.sensitivities
                    .insert(name.to_string(), vec![(time, amount)]);
            }
        }
    }

    /// Appends all pairs of `other`, curve by curve.
    pub fn merge(&mut self, other: &CurveSensitivity) {
        for (name, points) in &other.sensitivities {
            self.sensitivities
                .entry(name.clone())
                .or_default()
                .extend_from_slice(points);
        }
    }

    /// Returns the concatenation of `self` and `other`.
    #[must_use]
    pub fn plus(mut self, other: &CurveSensitivity) -> Self {
        self.merge(other);
        self
    }

    /// Returns a copy with every amount multiplied by `factor`.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(name, points)| {
                let scaled = points.iter().map(|&(t, v)| (t, v * factor)).collect();
                (name.clone(), scaled)
            })
            .collect();
        Self { sensitivities }
    }

    /// Returns a copy where each curve's pairs are sorted by time and pairs
    /// with the same time are summed.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(name, points)| {
                let mut sorted = points.clone();
                sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut merged: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
                for (t, v) in sorted {
                    match merged.last_mut() {
                        Some(last) if last.0 == t => last.1 += v,
                        _ => merged.push((t, v)),
                    }
                }
                (name.clone(), merged)
            })
            .collect();
        Self { sensitivities }
    }

    /// Pairs of curve `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[(f64, f64)]> {
        self.sensitivities.get(name).map(Vec::as_slice)
    }

    /// Summed amount at exactly `time` on curve `name`.
    #[must_use]
    pub fn at(&self, name: &str, time: f64) -> f64 {
        self.get(name).map_or(0.0, |points| {
            points
                .iter()
                .filter(|(t, _)| *t == time)
                .map(|(_, v)| v)
                .sum()
        })
    }

    /// Sum of all amounts on curve `name`: the sensitivity to a parallel
    /// shift of that curve.
    #[must_use]
    pub fn total(&self, name: &str) -> f64 {
        self.get(name)
            .map_or(0.0, |points| points.iter().map(|(_, v)| v).sum())
    }

    /// First-order value change for a zero-rate shift `shift(name, time)`.
    pub fn impact<F>(&self, shift: F) -> f64
    where
        F: Fn(&str, f64) -> f64,
    {
        let shift = &shift;
        self.sensitivities
            .iter()
            .flat_map(|(name, points)| {
                points
                    .iter()
                    .map(move |&(t, v)| v * shift(name.as_str(), t))
            })
            .sum()
    }

    /// Curve names in sorted order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.sensitivities.keys().map(String::as_str)
    }

    /// Iterates over `(curve name, pairs)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(f64, f64)])> {
        self.sensitivities
            .iter()
            .map(|(name, points)| (name.as_str(), points.as_slice()))
    }

    /// True if no curve carries any pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.values().all(Vec::is_empty)
    }
}
