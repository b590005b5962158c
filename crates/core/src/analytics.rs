//! Aggregation reducers for the three telemetry views.
//!
//! All reducers are single-pass over an already-filtered sequence. Group-by
//! results keep first-encounter order, and top/bottom selection breaks ties
//! in favour of the entry encountered first.

use indexmap::IndexMap;
use serde::Serialize;

use crate::records::{AiAlert, OfflineReport, SpeedEvent};
use crate::status::{OverrideMap, VehicleStatus};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Speeds at or above this are warnings (km/h).
pub const WARNING_SPEED: f64 = 75.0;
/// Speeds at or above this are alarms (km/h).
pub const ALARM_SPEED: f64 = 90.0;
/// How many vehicles the "top vehicles" lists carry.
pub const TOP_VEHICLE_LIMIT: usize = 10;
/// Hours in a day histogram.
pub const HOURS_PER_DAY: usize = 24;
/// Label used when an alert has no alarm type.
pub const UNKNOWN_ALERT_TYPE: &str = "Unknown";

// ---------------------------------------------------------------------------
// Generic reducers
// ---------------------------------------------------------------------------

/// Count occurrences of `key(item)`, in first-encounter order.
pub fn count_by<T, F>(items: &[T], key: F) -> IndexMap<String, usize>
where
    F: Fn(&T) -> &str,
{
    let mut counts = IndexMap::new();
    for item in items {
        *counts.entry(key(item).to_string()).or_insert(0) += 1;
    }
    counts
}

/// A grouping key with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleCount {
    pub vehicle: String,
    pub count: usize,
}

/// Entry with the highest count; the first one encountered wins ties.
pub fn top_entry(counts: &IndexMap<String, usize>) -> Option<VehicleCount> {
    select_entry(counts, |candidate, best| candidate > best)
}

/// Entry with the lowest count; the first one encountered wins ties.
pub fn bottom_entry(counts: &IndexMap<String, usize>) -> Option<VehicleCount> {
    select_entry(counts, |candidate, best| candidate < best)
}

fn select_entry<F>(counts: &IndexMap<String, usize>, better: F) -> Option<VehicleCount>
where
    F: Fn(usize, usize) -> bool,
{
    let mut best: Option<(&String, usize)> = None;
    for (key, &count) in counts {
        match best {
            Some((_, best_count)) if !better(count, best_count) => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, count)| VehicleCount {
        vehicle: key.clone(),
        count,
    })
}

/// The `n` highest counts, stable-sorted descending.
pub fn top_n(counts: &IndexMap<String, usize>, n: usize) -> Vec<VehicleCount> {
    let mut entries: Vec<_> = counts
        .iter()
        .map(|(key, &count)| VehicleCount {
            vehicle: key.clone(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

/// Hour of day from a time string such as `"07:45"` or
/// `"2024-08-25 07:45:00"`.
///
/// Uses the text before the first `:`, taking its last whitespace-separated
/// word, and parses its leading digits. Anything unparseable or outside
/// `0..=23` maps to hour 0.
pub fn hour_of_day(time: &str) -> usize {
    let head = time.split(':').next().unwrap_or("");
    let token = head.split_whitespace().last().unwrap_or("");
    let digits: String = token.chars().take_while(char::is_ascii_digit).collect();

    digits
        .parse::<usize>()
        .ok()
        .filter(|hour| *hour < HOURS_PER_DAY)
        .unwrap_or(0)
}

/// Count items per hour of day.
pub fn hourly_histogram<T, F>(items: &[T], time: F) -> [usize; HOURS_PER_DAY]
where
    F: Fn(&T) -> &str,
{
    let mut buckets = [0; HOURS_PER_DAY];
    for item in items {
        buckets[hour_of_day(time(item))] += 1;
    }
    buckets
}

/// Mean rounded to the nearest integer; `0.0` for an empty input.
pub fn rounded_mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        (sum / count as f64).round()
    }
}

// ---------------------------------------------------------------------------
// AI alerts
// ---------------------------------------------------------------------------

/// Alerts that fell in one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyAlerts {
    pub hour: usize,
    pub alerts: usize,
}

/// Summary figures for the AI alerts view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertAnalytics {
    pub total_alerts: usize,
    pub unique_vehicles: usize,
    pub top_vehicle: Option<VehicleCount>,
    pub least_alert_vehicle: Option<VehicleCount>,
    pub alert_types: IndexMap<String, usize>,
    pub company_distribution: IndexMap<String, usize>,
    /// Hours with at least one alert.
    pub hourly_distribution: Vec<HourlyAlerts>,
    pub avg_alerts_per_vehicle: f64,
    pub top_vehicles: Vec<VehicleCount>,
}

impl AlertAnalytics {
    pub fn compute(alerts: &[AiAlert]) -> Self {
        let by_vehicle = count_by(alerts, |a| a.plate_no.as_str());
        let alert_types = count_by(alerts, |a| {
            if a.alarm_type.is_empty() {
                UNKNOWN_ALERT_TYPE
            } else {
                a.alarm_type.as_str()
            }
        });
        let company_distribution = count_by(alerts, |a| a.company.as_str());

        let hourly_distribution = hourly_histogram(alerts, |a| a.starting_time.as_str())
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(hour, &alerts)| HourlyAlerts { hour, alerts })
            .collect();

        let unique_vehicles = by_vehicle.len();

        Self {
            total_alerts: alerts.len(),
            unique_vehicles,
            top_vehicle: top_entry(&by_vehicle),
            least_alert_vehicle: bottom_entry(&by_vehicle),
            alert_types,
            company_distribution,
            hourly_distribution,
            avg_alerts_per_vehicle: rounded_mean(alerts.len() as f64, unique_vehicles),
            top_vehicles: top_n(&by_vehicle, TOP_VEHICLE_LIMIT),
        }
    }
}

// ---------------------------------------------------------------------------
// Speed events
// ---------------------------------------------------------------------------

/// Severity band of a single speed reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedCategory {
    Normal,
    Warning,
    Alarm,
}

impl SpeedCategory {
    pub fn of(speed: f64) -> Self {
        if speed >= ALARM_SPEED {
            Self::Alarm
        } else if speed >= WARNING_SPEED {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// Per-vehicle speed figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpeedStats {
    pub vehicle: String,
    pub violations: usize,
    pub max_speed: f64,
    pub warnings: usize,
    pub alarms: usize,
}

/// A labelled speed band with its event count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeCount {
    pub label: &'static str,
    pub count: usize,
}

/// Violations and mean speed for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySpeed {
    pub hour: usize,
    pub violations: usize,
    pub avg_speed: f64,
}

/// Summary figures for the speed view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedAnalytics {
    pub total_violations: usize,
    pub warnings: usize,
    pub alarms: usize,
    pub max_speed: f64,
    pub avg_speed: f64,
    pub unique_vehicles: usize,
    pub top_violator: Option<String>,
    pub highest_speed_vehicle: Option<String>,
    /// Top vehicles by violation count.
    pub vehicle_stats: Vec<VehicleSpeedStats>,
    pub speed_bands: Vec<RangeCount>,
    pub speed_ranges: Vec<RangeCount>,
    pub company_distribution: IndexMap<String, usize>,
    pub hourly_pattern: Vec<HourlySpeed>,
}

/// Coarse bands: warning, high warning, alarm.
const SPEED_BANDS: [(&str, f64, f64); 3] = [
    ("75-84", 75.0, 85.0),
    ("85-89", 85.0, 90.0),
    ("90+", 90.0, f64::INFINITY),
];

/// Five km/h buckets from the warning threshold up.
const SPEED_RANGES: [(&str, f64, f64); 6] = [
    ("75-79", 75.0, 80.0),
    ("80-84", 80.0, 85.0),
    ("85-89", 85.0, 90.0),
    ("90-94", 90.0, 95.0),
    ("95-99", 95.0, 100.0),
    ("100+", 100.0, f64::INFINITY),
];

fn count_ranges(events: &[SpeedEvent], ranges: &[(&'static str, f64, f64)]) -> Vec<RangeCount> {
    ranges
        .iter()
        .map(|&(label, low, high)| RangeCount {
            label,
            count: events
                .iter()
                .filter(|e| e.speed >= low && e.speed < high)
                .count(),
        })
        .filter(|range| range.count > 0)
        .collect()
}

fn vehicle_speed_stats(events: &[SpeedEvent]) -> IndexMap<String, VehicleSpeedStats> {
    let mut stats: IndexMap<String, VehicleSpeedStats> = IndexMap::new();
    for event in events {
        let entry = stats
            .entry(event.plate_no.clone())
            .or_insert_with(|| VehicleSpeedStats {
                vehicle: event.plate_no.clone(),
                violations: 0,
                max_speed: 0.0,
                warnings: 0,
                alarms: 0,
            });
        entry.violations += 1;
        entry.max_speed = entry.max_speed.max(event.speed);
        match SpeedCategory::of(event.speed) {
            SpeedCategory::Alarm => entry.alarms += 1,
            SpeedCategory::Warning => entry.warnings += 1,
            SpeedCategory::Normal => {}
        }
    }
    stats
}

fn hourly_speed(events: &[SpeedEvent]) -> Vec<HourlySpeed> {
    let mut counts = [0usize; HOURS_PER_DAY];
    let mut sums = [0f64; HOURS_PER_DAY];
    for event in events {
        let hour = hour_of_day(&event.starting_time);
        counts[hour] += 1;
        sums[hour] += event.speed;
    }

    (0..HOURS_PER_DAY)
        .filter(|&hour| counts[hour] > 0)
        .map(|hour| HourlySpeed {
            hour,
            violations: counts[hour],
            avg_speed: rounded_mean(sums[hour], counts[hour]),
        })
        .collect()
}

impl SpeedAnalytics {
    pub fn compute(events: &[SpeedEvent]) -> Self {
        let warnings = events
            .iter()
            .filter(|e| SpeedCategory::of(e.speed) == SpeedCategory::Warning)
            .count();
        let alarms = events
            .iter()
            .filter(|e| SpeedCategory::of(e.speed) == SpeedCategory::Alarm)
            .count();
        let max_speed = events.iter().map(|e| e.speed).fold(0.0, f64::max);
        let total_speed: f64 = events.iter().map(|e| e.speed).sum();

        let highest_speed_vehicle = events
            .iter()
            .find(|e| e.speed == max_speed)
            .map(|e| e.plate_no.clone());

        let per_vehicle = vehicle_speed_stats(events);
        let mut vehicle_stats: Vec<_> = per_vehicle.into_values().collect();
        vehicle_stats.sort_by(|a, b| b.violations.cmp(&a.violations));
        let unique_vehicles = vehicle_stats.len();
        let top_violator = vehicle_stats.first().map(|s| s.vehicle.clone());
        vehicle_stats.truncate(TOP_VEHICLE_LIMIT);

        Self {
            total_violations: events.len(),
            warnings,
            alarms,
            max_speed,
            avg_speed: rounded_mean(total_speed, events.len()),
            unique_vehicles,
            top_violator,
            highest_speed_vehicle,
            vehicle_stats,
            speed_bands: count_ranges(events, &SPEED_BANDS),
            speed_ranges: count_ranges(events, &SPEED_RANGES),
            company_distribution: count_by(events, |e| e.company.as_str()),
            hourly_pattern: hourly_speed(events),
        }
    }
}

// ---------------------------------------------------------------------------
// Offline reports
// ---------------------------------------------------------------------------

/// Number of offline vehicles carrying one override status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: VehicleStatus,
    pub count: usize,
}

/// Summary figures for the offline view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineAnalytics {
    pub total_offline: usize,
    /// Every status, including those with a zero count.
    pub status_distribution: Vec<StatusCount>,
    /// Offline vehicles with no override.
    pub unannotated: usize,
    /// Mean `offline_since` in hours, rounded; 0 when empty.
    pub avg_offline_hours: f64,
    /// Counts keyed by the first two characters of the vehicle number.
    pub region_distribution: IndexMap<String, usize>,
}

/// Region prefix of a vehicle number.
pub fn region_of(vehicle_number: &str) -> String {
    vehicle_number.chars().take(2).collect()
}

impl OfflineAnalytics {
    pub fn compute(reports: &[OfflineReport], overrides: &OverrideMap) -> Self {
        let status_of = |report: &OfflineReport| {
            overrides
                .get(&report.vehicle_number)
                .map(|o| o.current_status)
        };

        let status_distribution = VehicleStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: reports
                    .iter()
                    .filter(|r| status_of(r) == Some(status))
                    .count(),
            })
            .collect();

        let unannotated = reports.iter().filter(|r| status_of(r).is_none()).count();

        let mut region_distribution = IndexMap::new();
        for report in reports {
            *region_distribution
                .entry(region_of(&report.vehicle_number))
                .or_insert(0) += 1;
        }

        let total_hours: f64 = reports.iter().map(|r| r.offline_since).sum();

        Self {
            total_offline: reports.len(),
            status_distribution,
            unannotated,
            avg_offline_hours: rounded_mean(total_hours, reports.len()),
            region_distribution,
        }
    }
}
