// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Query cost analysis: depth, field count, and a weighted score.
//!
//! The walk is cycle-safe via a per-path visited set (enter on descend, leave
//! on ascend). Fragment spreads count as one field plus a flat score bump and
//! are not expanded; the structure itself cannot cycle.

use std::collections::HashSet;

use serde_json::Value;

use crate::model::{ArgValue, FieldNode, InlineFragment};
use crate::validate::PAGINATION_ARG_NAMES;

pub const MAX_DEPTH: usize = 12;
pub const MAX_FIELD_COUNT: usize = 200;
pub const MAX_COMPLEXITY_SCORE: f64 = 2500.0;

const DEPTH_WARNING_RATIO: f64 = 0.8;
const SCORE_WARNING_RATIO: f64 = 0.7;
const DEPTH_MULTIPLIER: f64 = 1.2;
const FRAGMENT_SPREAD_SCORE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexityReport {
    pub depth: usize,
    pub field_count: usize,
    pub score: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ComplexityReport {
    pub fn within_limits(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Analyzes the selection tree hanging off the operation root.
pub fn analyze_structure(root: &FieldNode) -> ComplexityReport {
    let mut walker = Walker::default();
    walker.walk_selections(root, "", 0);
    walker.finish()
}

#[derive(Debug, Default)]
struct Walker {
    max_depth: usize,
    field_count: usize,
    score: f64,
    depth_exceeded: bool,
    fields_exceeded: bool,
    score_exceeded: bool,
    visited: HashSet<String>,
}

impl Walker {
    fn walk_selections(&mut self, node: &FieldNode, path: &str, depth: usize) {
        for child in node.fields().values() {
            let child_path = if path.is_empty() {
                child.selection_key().to_owned()
            } else {
                format!("{path}.{}", child.selection_key())
            };
            self.enter_field(child, &child_path, depth + 1);
        }

        let spreads = node.fragment_spreads().len();
        self.field_count += spreads;
        self.score += FRAGMENT_SPREAD_SCORE * spreads as f64;

        for inline in node.inline_fragments() {
            self.walk_inline(inline, path, depth);
        }
    }

    fn walk_inline(&mut self, inline: &InlineFragment, path: &str, depth: usize) {
        for child in inline.selections.values() {
            let child_path = format!("{path}...{}.{}", inline.on_type, child.selection_key());
            self.enter_field(child, &child_path, depth + 1);
        }
    }

    fn enter_field(&mut self, node: &FieldNode, path: &str, depth: usize) {
        if !self.visited.insert(path.to_owned()) {
            return;
        }

        if depth > MAX_DEPTH {
            self.depth_exceeded = true;
            self.max_depth = self.max_depth.max(depth);
            self.visited.remove(path);
            return;
        }

        self.max_depth = self.max_depth.max(depth);
        self.field_count += 1;
        if self.field_count > MAX_FIELD_COUNT {
            self.fields_exceeded = true;
            self.visited.remove(path);
            return;
        }

        self.score += field_score(node, depth);
        if self.score > MAX_COMPLEXITY_SCORE {
            self.score_exceeded = true;
            self.visited.remove(path);
            return;
        }

        self.walk_selections(node, path, depth);
        self.visited.remove(path);
    }

    fn finish(self) -> ComplexityReport {
        let mut errors = Vec::new();
        if self.depth_exceeded {
            errors.push(format!(
                "Query depth {} exceeds maximum depth of {MAX_DEPTH}",
                self.max_depth
            ));
        }
        if self.fields_exceeded {
            errors.push(format!(
                "Query selects {} fields, exceeding the maximum of {MAX_FIELD_COUNT}",
                self.field_count
            ));
        }
        if self.score_exceeded {
            errors.push(format!(
                "Complexity score {:.1} exceeds the maximum of {MAX_COMPLEXITY_SCORE}",
                self.score
            ));
        }

        let mut warnings = Vec::new();
        if !self.depth_exceeded && self.max_depth as f64 > MAX_DEPTH as f64 * DEPTH_WARNING_RATIO {
            warnings.push(format!(
                "Query depth {} is approaching the maximum of {MAX_DEPTH}",
                self.max_depth
            ));
        }
        if !self.score_exceeded && self.score > MAX_COMPLEXITY_SCORE * SCORE_WARNING_RATIO {
            warnings.push(format!(
                "Complexity score {:.1} is approaching the maximum of {MAX_COMPLEXITY_SCORE}",
                self.score
            ));
        }

        ComplexityReport {
            depth: self.max_depth,
            field_count: self.field_count,
            score: self.score,
            errors,
            warnings,
        }
    }
}

/// Local score: base 1, half a point per argument, a log penalty for large
/// pagination values, 0.3 per directive, all scaled by `1.2^depth` (a
/// top-level field sits at depth 1).
fn field_score(node: &FieldNode, depth: usize) -> f64 {
    let mut local = 1.0;
    local += 0.5 * node.args().len() as f64;

    for (arg_name, arg_value) in node.args() {
        if !PAGINATION_ARG_NAMES.contains(&arg_name.as_str()) {
            continue;
        }
        if let Some(number) = numeric_arg_value(arg_value) {
            if number > 100.0 {
                local += number.log10() * 2.0;
            }
        }
    }

    local += 0.3 * node.directives().len() as f64;
    local * DEPTH_MULTIPLIER.powi(depth as i32)
}

fn numeric_arg_value(value: &ArgValue) -> Option<f64> {
    let raw = match value {
        ArgValue::Typed { value, .. } | ArgValue::Raw { value } => value,
        _ => return None,
    };
    match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse::<f64>().ok(),
        _ => None,
    }
}
