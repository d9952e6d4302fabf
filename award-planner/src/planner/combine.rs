//! End-to-end combination search.
//!
//! Segments form layers of an implicit graph: legs are nodes and feasible
//! connections between consecutive segments are edges. A backward pass marks
//! which legs can still reach the final layer, then a depth-first walk from
//! the first layer enumerates every complete path without exploring dead
//! branches.

use tracing::{debug, warn};

use crate::domain::{Airport, Combination, Leg, Segment, StopoverSpec};

use super::config::PlannerConfig;

/// Returns true if a passenger arriving on `arriving` can take `departing`
/// from `connecting_at`.
///
/// At the stopover airport the gap must be between `days` and `days + 1`
/// whole days; elsewhere it must lie within the configured connection bounds.
/// Both ranges are inclusive.
pub fn is_feasible_connection(
    arriving: &Leg,
    departing: &Leg,
    connecting_at: Airport,
    stopover: Option<&StopoverSpec>,
    config: &PlannerConfig,
) -> bool {
    let gap = arriving.connection_minutes_to(departing);

    match stopover {
        Some(spec) if spec.is_at(connecting_at) => {
            let min = i64::from(spec.days) * 1440;
            (min..=min + 1440).contains(&gap)
        }
        _ => (config.min_connection_mins..=config.max_connection_mins).contains(&gap),
    }
}

/// The contiguous run of segments the search covers, as inclusive indices.
///
/// Leading and trailing empty segments are skipped. An empty segment inside
/// the run cuts it short just before the gap.
fn searchable_range(segments: &[Segment]) -> Option<(usize, usize)> {
    let first = segments.iter().position(|s| !s.is_empty())?;
    let last = segments.iter().rposition(|s| !s.is_empty())?;

    // Policy: a hole between the first and last non-empty segments narrows the
    // search to the run before it instead of failing the route. Whether the
    // route should fail outright instead is an open decision; keep this as is
    // until it is made.
    match segments[first..=last].iter().position(Segment::is_empty) {
        Some(offset) => {
            let gap = first + offset;
            warn!(
                segment = %segments[gap].label(),
                index = gap,
                "no flights on interior segment, narrowing combinations to segments {first}..{gap}"
            );
            Some((first, gap - 1))
        }
        None => Some((first, last)),
    }
}

/// Enumerate every feasible end-to-end combination.
///
/// Combinations are returned in depth-first order: by first leg, then by
/// second leg, and so on, each in segment leg order.
pub fn compute_combinations(
    segments: &[Segment],
    stopover: Option<&StopoverSpec>,
    config: &PlannerConfig,
) -> Vec<Combination> {
    let Some((first, last)) = searchable_range(segments) else {
        return Vec::new();
    };
    let layers = &segments[first..=last];

    if layers.len() == 1 {
        return layers[0]
            .legs()
            .iter()
            .filter_map(|leg| Combination::new(vec![leg.clone()]).ok())
            .collect();
    }

    let reaches_end = reachability(layers, stopover, config);

    let mut combinations = Vec::new();
    let mut path: Vec<&Leg> = Vec::with_capacity(layers.len());
    for (idx, leg) in layers[0].legs().iter().enumerate() {
        if reaches_end[0][idx] {
            path.push(leg);
            extend(layers, &reaches_end, stopover, config, &mut path, &mut combinations);
            path.pop();
        }
    }

    debug!(
        first_segment = first,
        last_segment = last,
        combinations = combinations.len(),
        "combination search complete"
    );
    combinations
}

/// `reaches_end[k][j]`: leg `j` of layer `k` starts at least one complete path.
fn reachability(
    layers: &[Segment],
    stopover: Option<&StopoverSpec>,
    config: &PlannerConfig,
) -> Vec<Vec<bool>> {
    let mut reaches_end: Vec<Vec<bool>> = layers
        .iter()
        .map(|s| vec![false; s.legs().len()])
        .collect();

    if let Some(last) = reaches_end.last_mut() {
        last.fill(true);
    }

    for k in (0..layers.len().saturating_sub(1)).rev() {
        let connecting_at = layers[k + 1].origin;
        let (head, tail) = reaches_end.split_at_mut(k + 1);
        let next_reach = &tail[0];

        for (j, leg) in layers[k].legs().iter().enumerate() {
            head[k][j] = layers[k + 1]
                .legs()
                .iter()
                .zip(next_reach)
                .any(|(next, &ok)| {
                    ok && is_feasible_connection(leg, next, connecting_at, stopover, config)
                });
        }
    }

    reaches_end
}

fn extend<'a>(
    layers: &'a [Segment],
    reaches_end: &[Vec<bool>],
    stopover: Option<&StopoverSpec>,
    config: &PlannerConfig,
    path: &mut Vec<&'a Leg>,
    out: &mut Vec<Combination>,
) {
    let depth = path.len();
    if depth == layers.len() {
        let legs: Vec<Leg> = path.iter().map(|&l| l.clone()).collect();
        match Combination::new(legs) {
            Ok(combination) => out.push(combination),
            Err(e) => debug!(error = %e, "dropping malformed combination"),
        }
        return;
    }

    let Some(&previous) = path.last() else {
        return;
    };
    let connecting_at = layers[depth].origin;

    for (idx, leg) in layers[depth].legs().iter().enumerate() {
        if reaches_end[depth][idx]
            && is_feasible_connection(previous, leg, connecting_at, stopover, config)
        {
            path.push(leg);
            extend(layers, reaches_end, stopover, config, path, out);
            path.pop();
        }
    }
}

/// Legs to show for each segment, in segment then leg order.
///
/// With combinations, a leg is shown if it appears at its own position in any
/// of them. With none, every leg of every segment is shown unfiltered.
pub fn displayed_legs(segments: &[Segment], combinations: &[Combination]) -> Vec<Leg> {
    let all = segments.iter().flat_map(|s| s.legs().iter());

    if combinations.is_empty() {
        return all.cloned().collect();
    }

    all.filter(|leg| {
        combinations.iter().any(|c| {
            c.leg_at(leg.segment_index)
                .is_some_and(|at| at.same_flight(leg))
        })
    })
    .cloned()
    .collect()
}
