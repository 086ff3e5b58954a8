//! Header row detection

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::model::{CellType, Row, Value};

/// Tunables for the header guesser
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderGuessConfig {
    /// Non-blank cells a row may miss relative to the modal width and still qualify
    pub tolerance: usize,
    /// Candidate rows scored, counted from the first qualifying row
    pub window: usize,
    /// Reward for cells that read as text rather than numbers
    pub string_weight: f64,
    /// Reward for mutually distinct values within the row
    pub uniqueness_weight: f64,
    /// Reward for cells whose kind differs from the rest of their column
    pub contrast_weight: f64,
    /// Penalty for values that recur elsewhere in their column
    pub recurrence_weight: f64,
    /// Penalty per row after the first qualifying row
    pub position_decay: f64,
}

impl Default for HeaderGuessConfig {
    fn default() -> Self {
        Self {
            tolerance: 1,
            window: 10,
            string_weight: 1.0,
            uniqueness_weight: 1.0,
            contrast_weight: 1.0,
            recurrence_weight: 1.0,
            position_decay: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Number,
    Text,
}

/// Non-blank cell text and kind for one row
struct Profile {
    cells: Vec<Option<(String, Kind)>>,
    filled: usize,
}

impl Profile {
    fn new(row: &Row) -> Self {
        let cells: Vec<_> = row.iter().map(|cell| classify(cell.raw())).collect();
        let filled = cells.iter().filter(|c| c.is_some()).count();
        Self { cells, filled }
    }
}

fn classify(raw: &Value) -> Option<(String, Kind)> {
    if raw.is_blank() {
        return None;
    }
    let text = raw.display().trim().to_string();
    let kind = if raw.is_numeric() || CellType::Float.parse(raw).is_some() {
        Kind::Number
    } else {
        Kind::Text
    };
    Some((text, kind))
}

/// Guess the header row of a sample with default tunables.
///
/// Returns the zero-based offset of the header row and its labels,
/// stringified but otherwise verbatim. An empty sample, or one without any
/// filled row, yields `(0, [])`.
pub fn headers_guess(rows: &[Row]) -> (usize, Vec<String>) {
    headers_guess_with(rows, &HeaderGuessConfig::default())
}

/// Guess the header row of a sample
pub fn headers_guess_with(rows: &[Row], config: &HeaderGuessConfig) -> (usize, Vec<String>) {
    let profiles: Vec<Profile> = rows.iter().map(Profile::new).collect();

    let Some(modal) = modal_width(&profiles) else {
        return (0, Vec::new());
    };
    let threshold = modal.saturating_sub(config.tolerance).max(1);
    let qualifies = |p: &Profile| p.filled >= threshold && !(p.filled == 1 && modal > 1);

    let Some(first) = profiles.iter().position(qualifies) else {
        return (0, Vec::new());
    };

    let occurrences = column_occurrences(&profiles);

    let mut best: Option<(usize, f64)> = None;
    for (i, profile) in profiles
        .iter()
        .enumerate()
        .skip(first)
        .take(config.window.max(1))
    {
        if !qualifies(profile) {
            continue;
        }
        let score = score_row(i, profile, &profiles, &occurrences, config)
            - config.position_decay * (i - first) as f64;
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((i, score));
        }
    }

    let (offset, score) = best.unwrap_or((first, 0.0));
    debug!(offset, score, modal, "guessed header row");

    let labels = rows[offset]
        .iter()
        .map(|cell| cell.raw().display().into_owned())
        .collect();
    (offset, labels)
}

/// Most common non-blank cell count; ties go to the wider count
fn modal_width(profiles: &[Profile]) -> Option<usize> {
    let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
    for profile in profiles.iter().filter(|p| p.filled > 0) {
        *counts.entry(profile.filled).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(width, freq)| (freq, width))
        .map(|(width, _)| width)
}

/// Per column: how often each value appears across the sample
fn column_occurrences(profiles: &[Profile]) -> Vec<FxHashMap<&str, usize>> {
    let mut columns: Vec<FxHashMap<&str, usize>> = Vec::new();
    for profile in profiles {
        if columns.len() < profile.cells.len() {
            columns.resize_with(profile.cells.len(), FxHashMap::default);
        }
        for (col, cell) in profile.cells.iter().enumerate() {
            if let Some((text, _)) = cell {
                *columns[col].entry(text.as_str()).or_insert(0) += 1;
            }
        }
    }
    columns
}

fn score_row(
    index: usize,
    profile: &Profile,
    profiles: &[Profile],
    occurrences: &[FxHashMap<&str, usize>],
    config: &HeaderGuessConfig,
) -> f64 {
    let filled = profile.filled as f64;
    let mut text = 0usize;
    let mut recurring = 0usize;
    let mut contrasting = 0usize;
    let mut distinct: FxHashSet<&str> = FxHashSet::default();

    for (col, cell) in profile.cells.iter().enumerate() {
        let Some((value, kind)) = cell else { continue };
        if *kind == Kind::Text {
            text += 1;
        }
        distinct.insert(value.as_str());
        if occurrences[col].get(value.as_str()).copied().unwrap_or(0) > 1 {
            recurring += 1;
        }
        if majority_kind_below(profiles, index, col).is_some_and(|below| below != *kind) {
            contrasting += 1;
        }
    }

    config.string_weight * text as f64 / filled
        + config.uniqueness_weight * distinct.len() as f64 / filled
        + config.contrast_weight * contrasting as f64 / filled
        - config.recurrence_weight * recurring as f64 / filled
}

/// Dominant cell kind of a column in the rows after `index`
fn majority_kind_below(profiles: &[Profile], index: usize, col: usize) -> Option<Kind> {
    let (mut numbers, mut texts) = (0usize, 0usize);
    for profile in &profiles[index + 1..] {
        match profile.cells.get(col) {
            Some(Some((_, Kind::Number))) => numbers += 1,
            Some(Some((_, Kind::Text))) => texts += 1,
            _ => {}
        }
    }
    match (numbers, texts) {
        (0, 0) => None,
        (n, t) if n > t => Some(Kind::Number),
        _ => Some(Kind::Text),
    }
}
