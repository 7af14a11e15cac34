use geo::algorithm::haversine_distance::HaversineDistance;
use geo_types;
use indicatif::ProgressBar;

use std::cmp::Ordering;
use std::slice;

use super::feature_collection::FeatureCollection;
use super::geo_diff_types::{label_a, label_b, Match, MatchEntry, MatchKind, MatchSummary};
use super::normalized_record::NormalizedRecord;

use log::{debug, info};

pub const DEFAULT_TOLERANCE_METERS: f64 = 100.0;

/// Great-circle distance in meters (mean Earth radius 6371.0088 km).
#[inline]
pub fn surface_distance(from: &geo_types::Point<f64>, to: &geo_types::Point<f64>) -> f64 {
    from.haversine_distance(to)
}

/// One entry per record of A, in A's order.
#[derive(Debug, PartialEq)]
pub struct MatchTable {
    entries: Vec<MatchEntry>,
    summary: MatchSummary,
}

impl MatchTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index_a: usize) -> Option<&Match> {
        self.entries.get(index_a).and_then(Option::as_ref)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<MatchEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn summary(&self) -> &MatchSummary {
        &self.summary
    }
}

#[derive(Clone, Debug)]
pub struct Matcher {
    tolerance: f64,
}

impl Default for Matcher {
    fn default() -> Matcher {
        Matcher::new(DEFAULT_TOLERANCE_METERS)
    }
}

impl Matcher {
    pub fn new(tolerance: f64) -> Matcher {
        Matcher { tolerance }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Matches every record of `a` against all of `b`. O(|A|·|B|).
    pub fn compute(
        &self,
        a: &FeatureCollection,
        b: &FeatureCollection,
        progress_bar: &ProgressBar,
    ) -> MatchTable {
        let mut entries: Vec<MatchEntry> = Vec::with_capacity(a.len());

        for (index_a, record_a) in a.iter().enumerate() {
            let entry = self.best_match(record_a, b);

            match &entry {
                Some(found) => debug!(
                    "{} -> {} {:?} ({:.2} m)",
                    label_a(index_a),
                    label_b(found.b_index),
                    found.kind,
                    found.distance
                ),
                None => debug!("{} -> no match", label_a(index_a)),
            }

            entries.push(entry);
            progress_bar.inc(1);
        }

        progress_bar.finish();

        let summary = summarize(&entries, a, b);
        info!("Match summary: {:?}", summary);

        MatchTable { entries, summary }
    }

    fn best_match(&self, record_a: &NormalizedRecord, b: &FeatureCollection) -> MatchEntry {
        let coordinate_a = record_a.coordinate()?;

        let mut exact: Option<usize> = None;
        let mut candidates: Vec<(f64, usize)> = Vec::new();

        for (index_b, record_b) in b.iter().enumerate() {
            let coordinate_b = match record_b.coordinate() {
                Some(coordinate) => coordinate,
                None => continue,
            };

            if record_a == record_b || coordinate_a == coordinate_b {
                // First exact hit in B's order wins, later ones are ignored.
                if exact.is_none() {
                    exact = Some(index_b);
                }
                continue;
            }

            let distance = surface_distance(&coordinate_a, &coordinate_b);
            if distance <= self.tolerance {
                candidates.push((distance, index_b));
            }
        }

        if let Some(b_index) = exact {
            return Some(Match {
                b_index,
                kind: MatchKind::Exact,
                distance: 0.0,
                alternates: None,
            });
        }

        if candidates.is_empty() {
            return None;
        }

        // Alternates keep B's order; only the best pick depends on the sort.
        let alternates = if candidates.len() > 1 {
            Some(candidates.iter().map(|&(_, index_b)| label_b(index_b)).collect())
        } else {
            None
        };

        // Stable, so equal distances keep the lower B index first.
        candidates.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(Ordering::Equal));
        let (distance, b_index) = candidates[0];

        Some(Match {
            b_index,
            kind: MatchKind::Near,
            distance,
            alternates,
        })
    }
}

fn summarize(entries: &[MatchEntry], a: &FeatureCollection, b: &FeatureCollection) -> MatchSummary {
    let mut summary = MatchSummary {
        total_a: a.len(),
        total_b: b.len(),
        unusable_a: a.unusable_count(),
        unusable_b: b.unusable_count(),
        ..MatchSummary::default()
    };

    for entry in entries {
        match entry {
            Some(Match { kind: MatchKind::Exact, .. }) => summary.exact += 1,
            Some(Match { kind: MatchKind::Near, .. }) => summary.near += 1,
            None => summary.unmatched += 1,
        }
    }

    summary
}
