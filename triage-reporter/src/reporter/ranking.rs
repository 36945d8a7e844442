// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, deterministic "top N" selection over buckets and timings.

use super::aggregator::{LineBucket, SiteBucket, SuiteTiming};
use super::outcome::TestRecord;
use std::{cmp::Reverse, collections::HashMap, hash::Hash, time::Duration};

/// A bucket that counts the members clustered into it.
pub trait BucketCount {
    /// Returns the number of members.
    fn count(&self) -> usize;
}

impl BucketCount for LineBucket {
    fn count(&self) -> usize {
        self.count
    }
}

impl BucketCount for SiteBucket {
    fn count(&self) -> usize {
        self.count
    }
}

/// Whether buckets with a single member take part in a ranking.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SingletonPolicy {
    /// Singleton buckets are ranked like any other.
    Include,

    /// Singleton buckets are dropped before ranking.
    #[default]
    Exclude,
}

/// Returns at most `n` buckets, largest first.
///
/// Buckets with equal counts are ordered by key, ascending, so the result never depends on map
/// iteration order.
pub fn top_n<K, B>(buckets: &HashMap<K, B>, n: usize, singletons: SingletonPolicy) -> Vec<(&K, &B)>
where
    K: Ord + Hash,
    B: BucketCount,
{
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<_> = buckets
        .iter()
        .filter(|(_, bucket)| singletons == SingletonPolicy::Include || bucket.count() != 1)
        .collect();
    ranked.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    // Must be stable to keep the key order among equal counts.
    ranked.sort_by_key(|(_, bucket)| Reverse(bucket.count()));
    ranked.truncate(n);
    ranked
}

/// Something with a duration that can show up in a "slowest" list.
pub trait Timed {
    /// Returns how long this took.
    fn duration(&self) -> Duration;
}

impl Timed for TestRecord {
    fn duration(&self) -> Duration {
        self.duration
    }
}

impl Timed for SuiteTiming {
    fn duration(&self) -> Duration {
        self.duration
    }
}

/// Returns the `n` slowest items, then drops those faster than `threshold`.
///
/// Truncation happens before filtering: an item in the top `n` that is too fast is removed, not
/// replaced by the next slowest one. Items with equal durations keep their input order.
pub fn top_slowest<T: Timed>(items: &[T], n: usize, threshold: Duration) -> Vec<&T> {
    let mut slowest: Vec<_> = items.iter().collect();
    slowest.sort_by_key(|item| Reverse(item.duration()));
    slowest.truncate(n);
    slowest.retain(|item| item.duration() >= threshold);
    slowest
}
