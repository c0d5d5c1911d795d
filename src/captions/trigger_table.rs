use crate::error::ConfigError;
use crate::math;
use crate::path::{PathSettings, TravelDirection};

/// One scripted caption: where on the path it becomes eligible and what to show.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrigger<P> {
    /// Progress value at which the caption becomes eligible.
    pub threshold: f32,
    /// Content handle owned by the presentation layer.
    pub payload: P,
    fired: bool,
}

/// Captions with their reveal thresholds.
///
/// Storage order is the script order, which need not match threshold order.
/// Every lookup scans all unfired entries; the first match in storage order
/// wins and is marked fired before it is returned, so an entry can never be
/// handed out twice.
#[derive(Debug)]
pub struct TriggerTable<P> {
    triggers: Vec<CaptionTrigger<P>>,
}

impl<P: PartialEq> TriggerTable<P> {
    /// Builds the table from `(payload, pinned_threshold)` pairs.
    ///
    /// Entries without a pinned threshold are spaced evenly between the path
    /// origin and destination by their index (see [`math::even_threshold`]).
    pub fn build(entries: Vec<(P, Option<f32>)>, path: &PathSettings) -> Result<Self, ConfigError> {
        path.validate()?;

        let count = entries.len();
        let mut triggers: Vec<CaptionTrigger<P>> = Vec::with_capacity(count);

        for (index, (payload, pinned)) in entries.into_iter().enumerate() {
            let threshold = match pinned {
                Some(at) if !at.is_finite() || !path.contains(at) => {
                    return Err(ConfigError::ThresholdOutOfPath {
                        index,
                        threshold: at,
                    });
                }
                Some(at) => at,
                None => math::even_threshold(index, count, path.origin(), path.destination()),
            };
            if triggers.iter().any(|t| t.payload == payload) {
                return Err(ConfigError::DuplicatePayload { index });
            }
            triggers.push(CaptionTrigger {
                threshold,
                payload,
                fired: false,
            });
        }

        Ok(Self { triggers })
    }
}

impl<P> TriggerTable<P> {
    /// Total number of captions, fired or not.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// `true` for a table built from an empty script.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Captions not yet handed out.
    pub fn remaining(&self) -> usize {
        self.triggers.iter().filter(|t| !t.fired).count()
    }

    /// Takes the first unfired caption whose threshold lies in the closed
    /// interval between `prev` and `curr`, in either order.
    pub fn find_eligible(&mut self, prev: f32, curr: f32) -> Option<&CaptionTrigger<P>> {
        let (lo, hi) = if prev <= curr { (prev, curr) } else { (curr, prev) };
        let trigger = self
            .triggers
            .iter_mut()
            .find(|t| !t.fired && (lo..=hi).contains(&t.threshold))?;
        trigger.fired = true;
        Some(trigger)
    }

    /// Takes the unfired caption closest to the path origin.
    ///
    /// Equal thresholds resolve in storage order.
    pub fn take_next(&mut self, direction: TravelDirection) -> Option<&CaptionTrigger<P>> {
        let mut best: Option<usize> = None;
        for (i, t) in self.triggers.iter().enumerate() {
            if t.fired {
                continue;
            }
            let closer = match best.map(|b| self.triggers[b].threshold) {
                None => true,
                Some(b) => match direction {
                    TravelDirection::Ascending => t.threshold < b,
                    TravelDirection::Descending => t.threshold > b,
                },
            };
            if closer {
                best = Some(i);
            }
        }
        let trigger = &mut self.triggers[best?];
        trigger.fired = true;
        Some(trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathAxis;

    fn script(n: u32) -> Vec<(u32, Option<f32>)> {
        (0..n).map(|i| (i, None)).collect()
    }

    fn scenario_table() -> TriggerTable<u32> {
        TriggerTable::build(script(7), &PathSettings::default()).unwrap()
    }

    /// Sweeps progress from `from` to `to` in `step` increments, collecting
    /// every trigger handed out as `(payload, threshold)`.
    fn sweep(table: &mut TriggerTable<u32>, from: f32, to: f32, step: f32) -> Vec<(u32, f32)> {
        let mut out = Vec::new();
        let mut prev = from;
        let dir = (to - from).signum();
        let steps = ((to - from) / step).abs().ceil() as usize;
        for i in 1..=steps {
            let curr = if i == steps { to } else { from + dir * step * i as f32 };
            if let Some(t) = table.find_eligible(prev, curr) {
                out.push((t.payload, t.threshold));
            }
            prev = curr;
        }
        out
    }

    // ── build ───────────────────────────────────────────────────────

    #[test]
    fn empty_script_builds_empty_table() {
        let mut table = TriggerTable::<u32>::build(vec![], &PathSettings::default()).unwrap();
        assert!(table.is_empty());
        assert!(table.find_eligible(-1000.0, 1000.0).is_none());
        assert!(table.take_next(TravelDirection::Ascending).is_none());
    }

    #[test]
    fn scenario_thresholds_are_evenly_spaced() {
        let table = scenario_table();
        let thresholds: Vec<f32> = table.triggers.iter().map(|t| t.threshold).collect();
        assert_eq!(
            thresholds,
            vec![-62.5, -25.0, 12.5, 50.0, 87.5, 125.0, 162.5]
        );
        assert!(table.triggers.iter().all(|t| !t.fired));
    }

    #[test]
    fn invalid_path_is_rejected() {
        let path = PathSettings {
            start: 200.0,
            end: -100.0,
            ..PathSettings::default()
        };
        let err = TriggerTable::build(script(3), &path).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPath {
                start: 200.0,
                end: -100.0
            }
        );
    }

    #[test]
    fn pinned_threshold_outside_path_is_rejected() {
        let entries = vec![(0, None), (1, Some(500.0))];
        let err = TriggerTable::build(entries, &PathSettings::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThresholdOutOfPath {
                index: 1,
                threshold: 500.0
            }
        );
    }

    #[test]
    fn duplicate_payload_is_rejected() {
        let entries = vec![(4, None), (5, None), (4, None)];
        let err = TriggerTable::build(entries, &PathSettings::default()).unwrap_err();
        assert_eq!(err, ConfigError::DuplicatePayload { index: 2 });
    }

    // ── find_eligible ───────────────────────────────────────────────

    #[test]
    fn unit_sweep_fires_all_seven_in_order() {
        let mut table = scenario_table();
        let fired = sweep(&mut table, -100.0, 200.0, 1.0);
        let payloads: Vec<u32> = fired.iter().map(|(p, _)| *p).collect();
        assert_eq!(payloads, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(table.remaining(), 0);
    }

    #[test]
    fn fine_sweep_yields_each_trigger_exactly_once() {
        for n in [1, 2, 5, 13] {
            let mut table = TriggerTable::build(script(n), &PathSettings::default()).unwrap();
            let fired = sweep(&mut table, -100.0, 200.0, 0.25);
            let mut payloads: Vec<u32> = fired.iter().map(|(p, _)| *p).collect();
            payloads.sort_unstable();
            assert_eq!(payloads, (0..n).collect::<Vec<_>>(), "n = {n}");
        }
    }

    #[test]
    fn fired_trigger_is_never_returned_again() {
        let mut table = scenario_table();
        let first = table.find_eligible(-100.0, -60.0).map(|t| t.payload);
        assert_eq!(first, Some(0));
        assert!(table.find_eligible(-100.0, -60.0).is_none());
        // A huge interval still only hands out the others.
        let mut rest = Vec::new();
        while let Some(t) = table.find_eligible(-1e6, 1e6) {
            rest.push(t.payload);
        }
        assert!(!rest.contains(&0));
        assert_eq!(rest.len(), 6);
    }

    #[test]
    fn large_step_returns_one_trigger_per_call() {
        let mut table = scenario_table();
        let hit = table.find_eligible(-100.0, 60.0).map(|t| t.payload);
        assert_eq!(hit, Some(0));
        assert_eq!(table.remaining(), 6);
        // The other thresholds inside the interval are still eligible.
        assert_eq!(table.find_eligible(-100.0, 60.0).map(|t| t.payload), Some(1));
    }

    #[test]
    fn interval_is_closed_at_both_ends() {
        let mut table = scenario_table();
        assert_eq!(table.find_eligible(-70.0, -62.5).map(|t| t.payload), Some(0));
        assert_eq!(table.find_eligible(-25.0, -20.0).map(|t| t.payload), Some(1));
    }

    #[test]
    fn interval_is_direction_agnostic() {
        let mut table = scenario_table();
        assert_eq!(table.find_eligible(60.0, 40.0).map(|t| t.payload), Some(3));
    }

    #[test]
    fn out_of_range_query_returns_nothing() {
        let mut table = scenario_table();
        assert!(table.find_eligible(300.0, 400.0).is_none());
        assert_eq!(table.remaining(), 7);
    }

    #[test]
    fn descending_sweep_fires_in_non_increasing_order() {
        let path = PathSettings {
            axis: PathAxis::Z,
            direction: TravelDirection::Descending,
            ..PathSettings::default()
        };
        let mut table = TriggerTable::build(script(7), &path).unwrap();
        let fired = sweep(&mut table, 200.0, -100.0, 1.0);
        assert_eq!(fired.len(), 7);
        for w in fired.windows(2) {
            assert!(w[0].1 >= w[1].1, "{:?} fired before {:?}", w[0], w[1]);
        }
        assert_eq!(fired[0].0, 0);
    }

    #[test]
    fn unsorted_storage_still_fires_in_sweep_order() {
        let entries = vec![(10, Some(150.0)), (11, Some(-50.0)), (12, Some(40.0))];
        let mut table = TriggerTable::build(entries, &PathSettings::default()).unwrap();
        let fired = sweep(&mut table, -100.0, 200.0, 1.0);
        let payloads: Vec<u32> = fired.iter().map(|(p, _)| *p).collect();
        assert_eq!(payloads, vec![11, 12, 10]);
    }

    #[test]
    fn shared_threshold_prefers_storage_order() {
        let entries = vec![(1, Some(10.0)), (2, Some(10.0))];
        let mut table = TriggerTable::build(entries, &PathSettings::default()).unwrap();
        assert_eq!(table.find_eligible(0.0, 20.0).map(|t| t.payload), Some(1));
        assert_eq!(table.find_eligible(0.0, 20.0).map(|t| t.payload), Some(2));
        assert!(table.find_eligible(0.0, 20.0).is_none());
    }

    // ── take_next ───────────────────────────────────────────────────

    #[test]
    fn take_next_pops_from_origin_side() {
        let entries = vec![(10, Some(150.0)), (11, Some(-50.0)), (12, Some(40.0))];
        let mut asc = TriggerTable::build(entries.clone(), &PathSettings::default()).unwrap();
        let order: Vec<u32> =
            std::iter::from_fn(|| asc.take_next(TravelDirection::Ascending).map(|t| t.payload))
                .collect();
        assert_eq!(order, vec![11, 12, 10]);

        let mut desc = TriggerTable::build(entries, &PathSettings::default()).unwrap();
        let first = desc.take_next(TravelDirection::Descending).map(|t| t.payload);
        assert_eq!(first, Some(10));
    }

    #[test]
    fn take_next_skips_swept_triggers() {
        let mut table = scenario_table();
        table.find_eligible(-100.0, -60.0);
        let next = table.take_next(TravelDirection::Ascending).map(|t| t.payload);
        assert_eq!(next, Some(1));
        assert_eq!(table.len(), 7);
        assert_eq!(table.remaining(), 5);
    }
}
