//! Daily mock batches sampled from fixed template pools.
//!
//! Both generators follow the same shape: draw a batch size, shuffle the pool
//! with the same generator, then walk the shuffled pool (cycling with suffixed
//! ids when the batch is larger than the pool).

pub mod recommendations;
pub mod timelines;

use crate::error::GenerationError;
use crate::random::SeededRandom;
use std::collections::HashSet;

/// Batch size bounds: `count = max(min, next_int(min, max_exclusive))`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CountBounds {
    pub min: usize,
    pub max_exclusive: usize,
}

#[derive(Debug)]
pub(crate) struct Pick<'t, T> {
    pub template: &'t T,
    /// 1-based.
    pub display_order: u32,
    /// 0 on the first pass over the pool, 1 on the second, ...
    pub cycle: usize,
}

pub(crate) fn pick_from_pool<'t, T>(
    rng: &mut SeededRandom,
    pool: &'t [T],
    bounds: CountBounds,
    kind: &'static str,
) -> Result<Vec<Pick<'t, T>>, GenerationError> {
    if pool.is_empty() {
        return Err(GenerationError::EmptyTemplatePool { kind });
    }

    let drawn = rng.next_int(bounds.min as i64, bounds.max_exclusive as i64);
    let count = usize::try_from(drawn).unwrap_or(0).max(bounds.min);

    let mut order: Vec<usize> = (0..pool.len()).collect();
    rng.shuffle(&mut order);

    let picks = (0..count)
        .map(|i| Pick {
            template: &pool[order[i % pool.len()]],
            display_order: (i + 1) as u32,
            cycle: i / pool.len(),
        })
        .collect();

    tracing::trace!(kind, count, pool_len = pool.len(), "picked mock templates");
    Ok(picks)
}

pub(crate) fn cycled_id(base: &str, cycle: usize) -> String {
    if cycle == 0 {
        base.to_string()
    } else {
        format!("{base}-{cycle}")
    }
}

/// Keeps the first item for every id, preserving order.
pub fn dedupe_by_id<T>(items: Vec<T>, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(id_of(&item).to_string()) {
            out.push(item);
        }
    }
    out
}

/// De-duplicates and refuses to hand back a batch shorter than `bounds.min`.
pub(crate) fn dedupe_to_minimum<T>(
    items: Vec<T>,
    id_of: impl Fn(&T) -> &str,
    bounds: CountBounds,
    kind: &'static str,
) -> Result<Vec<T>, GenerationError> {
    let items = dedupe_by_id(items, id_of);
    if items.len() < bounds.min {
        return Err(GenerationError::BelowMinimum {
            kind,
            min: bounds.min,
            got: items.len(),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn empty_pool_is_a_configuration_error() {
        let mut rng = SeededRandom::new(1);
        let empty: [&str; 0] = [];
        let err = pick_from_pool(
            &mut rng,
            &empty,
            CountBounds {
                min: 5,
                max_exclusive: 9,
            },
            "test",
        )
        .unwrap_err();
        assert_eq!(err, GenerationError::EmptyTemplatePool { kind: "test" });
    }

    #[test]
    fn cycles_when_batch_exceeds_pool() {
        let mut rng = SeededRandom::new(1);
        let picks = pick_from_pool(
            &mut rng,
            &POOL,
            CountBounds {
                min: 7,
                max_exclusive: 8,
            },
            "test",
        )
        .unwrap();
        assert_eq!(picks.len(), 7);
        let cycles: Vec<usize> = picks.iter().map(|p| p.cycle).collect();
        assert_eq!(cycles, vec![0, 0, 0, 1, 1, 1, 2]);
        let orders: Vec<u32> = picks.iter().map(|p| p.display_order).collect();
        assert_eq!(orders, (1..=7).collect::<Vec<_>>());

        let ids: HashSet<String> = picks
            .iter()
            .map(|p| cycled_id(p.template, p.cycle))
            .collect();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn cycled_id_suffixes_only_after_first_pass() {
        assert_eq!(cycled_id("tl-daily-spend", 0), "tl-daily-spend");
        assert_eq!(cycled_id("tl-daily-spend", 1), "tl-daily-spend-1");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let items = vec![("x", 1), ("y", 2), ("x", 3), ("z", 4), ("y", 5)];
        let out = dedupe_by_id(items, |(id, _)| *id);
        assert_eq!(out, vec![("x", 1), ("y", 2), ("z", 4)]);
    }

    #[test]
    fn short_batch_after_dedupe_is_an_error() {
        let bounds = CountBounds {
            min: 3,
            max_exclusive: 5,
        };
        let err = dedupe_to_minimum(vec!["a", "a", "b", "a"], |id| *id, bounds, "test").unwrap_err();
        assert_eq!(
            err,
            GenerationError::BelowMinimum {
                kind: "test",
                min: 3,
                got: 2
            }
        );

        let ok = dedupe_to_minimum(vec!["a", "b", "a", "c"], |id| *id, bounds, "test").unwrap();
        assert_eq!(ok, vec!["a", "b", "c"]);
    }
}
