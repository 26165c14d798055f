use crate::models::{
    CalendarEntry, Observation, StatTotals, Timeframe, TimelinePoint, TimelineStats,
};
use crate::normalize::date_key;
use std::collections::{BTreeMap, HashMap};

/// Calendar id to canonical date key.
pub struct CalendarIndex {
    dates: HashMap<i64, String>,
}

impl CalendarIndex {
    pub fn new(calendar: &[CalendarEntry]) -> Self {
        Self {
            dates: calendar
                .iter()
                .map(|entry| (entry.id, date_key(&entry.date_value)))
                .collect(),
        }
    }

    /// Resolved date of an observation, empty when it cannot be placed.
    pub fn resolve(&self, observation: &Observation) -> String {
        observation
            .id_calendar
            .and_then(|id| self.dates.get(&id).cloned())
            .or_else(|| observation.date.as_deref().map(date_key))
            .unwrap_or_default()
    }
}

/// How per-record totals fold into a summary.
#[derive(Clone, Copy)]
enum TotalsMode {
    /// Every field is summed.
    Sum,
    /// `total_*` are cumulative counters (maximum), `new_*` are summed.
    Cumulative,
}

pub fn resolve_global_stats(
    observations: &[Observation],
    calendar: &[CalendarEntry],
    pandemic_id: i64,
) -> TimelineStats {
    let selected: Vec<&Observation> = observations
        .iter()
        .filter(|observation| observation.id_pandemic == Some(pandemic_id))
        .collect();
    summarize(&selected, &CalendarIndex::new(calendar), TotalsMode::Sum)
}

pub fn resolve_location_stats(
    observations: &[Observation],
    calendar: &[CalendarEntry],
    location_id: i64,
    pandemic_id: i64,
) -> TimelineStats {
    let selected: Vec<&Observation> = observations
        .iter()
        .filter(|observation| {
            observation.id_pandemic == Some(pandemic_id)
                && observation.id_location == Some(location_id)
        })
        .collect();
    summarize(&selected, &CalendarIndex::new(calendar), TotalsMode::Cumulative)
}

/// Totals cover every selected observation; the timeline only those whose
/// date resolves.
fn summarize(selected: &[&Observation], index: &CalendarIndex, mode: TotalsMode) -> TimelineStats {
    let mut totals = StatTotals::default();
    let mut by_date: BTreeMap<String, TimelinePoint> = BTreeMap::new();

    for observation in selected {
        match mode {
            TotalsMode::Sum => {
                totals.total_cases = totals.total_cases.saturating_add(observation.total_cases);
                totals.total_deaths = totals.total_deaths.saturating_add(observation.total_deaths);
            }
            TotalsMode::Cumulative => {
                totals.total_cases = totals.total_cases.max(observation.total_cases);
                totals.total_deaths = totals.total_deaths.max(observation.total_deaths);
            }
        }
        totals.new_cases = totals.new_cases.saturating_add(observation.new_cases);
        totals.new_deaths = totals.new_deaths.saturating_add(observation.new_deaths);

        let date = index.resolve(observation);
        if date.is_empty() {
            continue;
        }
        let point = by_date.entry(date.clone()).or_insert_with(|| TimelinePoint {
            date,
            ..TimelinePoint::default()
        });
        point.total_cases = point.total_cases.saturating_add(observation.total_cases);
        point.total_deaths = point.total_deaths.saturating_add(observation.total_deaths);
        point.new_cases = point.new_cases.saturating_add(observation.new_cases);
        point.new_deaths = point.new_deaths.saturating_add(observation.new_deaths);
    }

    TimelineStats {
        totals,
        timeline: by_date.into_values().collect(),
    }
}

/// Slices a date-ordered timeline by relative position.
pub fn select_timeframe<T>(timeline: &[T], timeframe: Timeframe) -> &[T] {
    let len = timeline.len();
    let quarter = len.div_ceil(4);
    match timeframe {
        Timeframe::All => timeline,
        Timeframe::Early => &timeline[..quarter],
        Timeframe::Peak => {
            let start = len * 3 / 8;
            &timeline[start..(start + quarter).min(len)]
        }
        Timeframe::Decline => &timeline[len * 3 / 4..],
    }
}

pub fn last_non_zero(series: &[u64]) -> u64 {
    series
        .iter()
        .rev()
        .copied()
        .find(|value| *value != 0)
        .unwrap_or(0)
}

/// The "current" figures shown for a timeline slice.
pub fn current_statistics(timeline: &[TimelinePoint]) -> StatTotals {
    let latest = |pick: fn(&TimelinePoint) -> u64| {
        let series: Vec<u64> = timeline.iter().map(pick).collect();
        last_non_zero(&series)
    };
    StatTotals {
        total_cases: latest(|point| point.total_cases),
        total_deaths: latest(|point| point.total_deaths),
        new_cases: latest(|point| point.new_cases),
        new_deaths: latest(|point| point.new_deaths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(pandemic: i64, location: i64, calendar: i64, total: u64, new: u64) -> Observation {
        Observation {
            total_cases: total,
            total_deaths: total / 10,
            new_cases: new,
            new_deaths: new / 10,
            id_pandemic: Some(pandemic),
            id_location: Some(location),
            id_calendar: Some(calendar),
            ..Observation::default()
        }
    }

    fn calendar() -> Vec<CalendarEntry> {
        vec![
            CalendarEntry { id: 1, date_value: "2020-03-02".into() },
            CalendarEntry { id: 2, date_value: "2020-03-01".into() },
            CalendarEntry { id: 3, date_value: "2020-03-03T00:00:00".into() },
        ]
    }

    #[test]
    fn global_totals_sum_matching_pandemic() {
        let observations = vec![
            obs(1, 10, 1, 100, 10),
            obs(1, 11, 1, 50, 5),
            obs(1, 10, 2, 80, 8),
            obs(2, 10, 1, 999, 99),
        ];

        let stats = resolve_global_stats(&observations, &calendar(), 1);
        assert_eq!(stats.totals.total_cases, 230);
        assert_eq!(stats.totals.new_cases, 23);
        assert_eq!(stats.totals.total_deaths, 10 + 5 + 8);
    }

    #[test]
    fn global_timeline_groups_by_date_in_order() {
        let observations = vec![
            obs(1, 10, 1, 100, 10),
            obs(1, 11, 1, 50, 5),
            obs(1, 10, 2, 80, 8),
            obs(1, 10, 3, 120, 20),
        ];

        let stats = resolve_global_stats(&observations, &calendar(), 1);
        let dates: Vec<&str> = stats.timeline.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, ["2020-03-01", "2020-03-02", "2020-03-03"]);
        assert_eq!(stats.timeline[1].total_cases, 150);
        assert_eq!(stats.timeline[1].new_cases, 15);
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let stats = resolve_global_stats(&[], &calendar(), 1);
        assert_eq!(stats.totals, StatTotals::default());
        assert!(stats.timeline.is_empty());

        let stats = resolve_location_stats(&[], &[], 1, 1);
        assert_eq!(stats, TimelineStats::default());
    }

    #[test]
    fn unresolved_dates_count_in_totals_only() {
        let observations = vec![obs(1, 10, 1, 100, 10), obs(1, 10, 42, 7, 7)];

        let global = resolve_global_stats(&observations, &calendar(), 1);
        assert_eq!(global.totals.total_cases, 107);
        assert_eq!(global.totals.new_cases, 17);
        assert_eq!(global.timeline.len(), 1);
        assert_eq!(global.timeline[0].total_cases, 100);

        let local = resolve_location_stats(&observations, &calendar(), 10, 1);
        assert_eq!(local.totals.new_cases, 17);
        assert_eq!(local.timeline.len(), 1);
    }

    #[test]
    fn inline_date_used_when_calendar_misses() {
        let mut observation = obs(1, 10, 42, 5, 5);
        observation.date = Some("2020-04-01".into());

        let stats = resolve_global_stats(&[observation], &calendar(), 1);
        assert_eq!(stats.timeline[0].date, "2020-04-01");
    }

    #[test]
    fn location_totals_are_cumulative() {
        let observations = vec![
            obs(1, 10, 2, 80, 8),
            obs(1, 10, 1, 100, 20),
            obs(1, 10, 3, 90, 0),
            obs(1, 11, 3, 5000, 500),
        ];

        let stats = resolve_location_stats(&observations, &calendar(), 10, 1);
        assert_eq!(stats.totals.total_cases, 100);
        assert_eq!(stats.totals.total_deaths, 10);
        assert_eq!(stats.totals.new_cases, 28);
        assert_eq!(stats.timeline.len(), 3);
    }

    #[test]
    fn timeframe_all_is_identity() {
        let timeline: Vec<u32> = (0..7).collect();
        assert_eq!(select_timeframe(&timeline, Timeframe::All), &timeline[..]);
    }

    #[test]
    fn timeframe_slices_of_one_hundred() {
        let timeline: Vec<u32> = (0..100).collect();

        let early = select_timeframe(&timeline, Timeframe::Early);
        assert_eq!(early, &timeline[0..25]);

        let peak = select_timeframe(&timeline, Timeframe::Peak);
        assert_eq!(peak.len(), 25);
        assert_eq!(peak[0], 37);

        let decline = select_timeframe(&timeline, Timeframe::Decline);
        assert_eq!(decline, &timeline[75..100]);
    }

    #[test]
    fn timeframe_rounding_on_short_timelines() {
        let timeline: Vec<u32> = (0..5).collect();
        assert_eq!(select_timeframe(&timeline, Timeframe::Early), &[0, 1]);
        assert_eq!(select_timeframe(&timeline, Timeframe::Peak), &[1, 2]);
        assert_eq!(select_timeframe(&timeline, Timeframe::Decline), &[3, 4]);

        let single = [9u32];
        assert_eq!(select_timeframe(&single, Timeframe::Peak), &[9]);
        assert_eq!(select_timeframe(&single, Timeframe::Decline), &[9]);
    }

    #[test]
    fn timeframe_on_empty_timeline() {
        let empty: Vec<u32> = Vec::new();
        for timeframe in [Timeframe::All, Timeframe::Early, Timeframe::Peak, Timeframe::Decline] {
            assert!(select_timeframe(&empty, timeframe).is_empty());
        }
    }

    #[test]
    fn last_non_zero_scans_from_the_end() {
        assert_eq!(last_non_zero(&[0, 0, 5, 0]), 5);
        assert_eq!(last_non_zero(&[]), 0);
        assert_eq!(last_non_zero(&[0, 0]), 0);
        assert_eq!(last_non_zero(&[3, 4]), 4);
    }

    #[test]
    fn current_statistics_per_field() {
        let timeline = vec![
            TimelinePoint { date: "a".into(), total_cases: 10, total_deaths: 1, new_cases: 4, new_deaths: 1 },
            TimelinePoint { date: "b".into(), total_cases: 12, total_deaths: 0, new_cases: 2, new_deaths: 0 },
        ];

        let current = current_statistics(&timeline);
        assert_eq!(current.total_cases, 12);
        assert_eq!(current.total_deaths, 1);
        assert_eq!(current.new_cases, 2);
        assert_eq!(current.new_deaths, 1);
    }
}
