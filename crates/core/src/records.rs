//! Typed telemetry records and the positional row mappers that build them.
//!
//! Each mapper discards the header row, reads fixed column positions,
//! defaults missing values, applies the record kind's row filter and keeps
//! source order.

use serde::{Deserialize, Serialize};

use crate::csv::{field, parse_number};

// ---------------------------------------------------------------------------
// Column positions
// ---------------------------------------------------------------------------

mod offline_col {
    pub const CLIENT: usize = 0;
    pub const VEHICLE_NUMBER: usize = 1;
    pub const LAST_ONLINE: usize = 2;
    pub const OFFLINE_HOURS: usize = 3;
    pub const RN: usize = 4;
    pub const REMARKS: usize = 5;
}

mod speed_col {
    pub const PLATE_NO: usize = 1;
    pub const COMPANY: usize = 2;
    pub const STARTING_TIME: usize = 3;
    pub const SPEED: usize = 6;
}

mod alert_col {
    pub const PLATE_NO: usize = 1;
    pub const COMPANY: usize = 2;
    pub const ALARM_TYPE: usize = 3;
    pub const STARTING_TIME: usize = 4;
    pub const IMAGE_LINK: usize = 8;
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A vehicle whose telemetry device has not reported for a while.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineReport {
    pub client: String,
    pub vehicle_number: String,
    pub last_online: String,
    /// Hours since the device last reported.
    pub offline_since: f64,
    pub rn: String,
    pub remarks: String,
}

/// A vehicle exceeding the speed threshold at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedEvent {
    pub plate_no: String,
    pub company: String,
    pub starting_time: String,
    pub speed: f64,
}

/// A driver-behavior alert raised by the in-cab camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAlert {
    pub plate_no: String,
    pub company: String,
    pub alarm_type: String,
    pub starting_time: String,
    pub image_link: String,
}

// ---------------------------------------------------------------------------
// Offline filter
// ---------------------------------------------------------------------------

/// Default client substring an offline row must contain.
pub const DEFAULT_OFFLINE_CLIENT: &str = "g4s";
/// Default minimum offline duration in hours.
pub const DEFAULT_OFFLINE_MIN_HOURS: f64 = 24.0;

/// Row-level filter for offline reports.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineFilter {
    /// Case-insensitive substring the client column must contain.
    pub client_contains: String,
    /// Rows below this many offline hours are dropped.
    pub min_hours: f64,
}

impl Default for OfflineFilter {
    fn default() -> Self {
        Self {
            client_contains: DEFAULT_OFFLINE_CLIENT.to_string(),
            min_hours: DEFAULT_OFFLINE_MIN_HOURS,
        }
    }
}

impl OfflineFilter {
    pub fn new(client_contains: impl Into<String>, min_hours: f64) -> Self {
        Self {
            client_contains: client_contains.into().to_lowercase(),
            min_hours,
        }
    }

    /// Whether a mapped report passes the filter.
    pub fn accepts(&self, report: &OfflineReport) -> bool {
        report
            .client
            .to_lowercase()
            .contains(&self.client_contains)
            && report.offline_since >= self.min_hours
    }
}

// ---------------------------------------------------------------------------
// Mappers
// ---------------------------------------------------------------------------

fn data_rows(rows: &[Vec<String>]) -> &[Vec<String>] {
    rows.get(1..).unwrap_or(&[])
}

fn text(row: &[String], index: usize) -> String {
    field(row, index).to_string()
}

/// Map offline export rows (header included) to filtered reports.
pub fn map_offline_reports(rows: &[Vec<String>], filter: &OfflineFilter) -> Vec<OfflineReport> {
    data_rows(rows)
        .iter()
        .map(|row| OfflineReport {
            client: text(row, offline_col::CLIENT),
            vehicle_number: text(row, offline_col::VEHICLE_NUMBER),
            last_online: text(row, offline_col::LAST_ONLINE),
            offline_since: parse_number(field(row, offline_col::OFFLINE_HOURS)),
            rn: text(row, offline_col::RN),
            remarks: text(row, offline_col::REMARKS),
        })
        .filter(|report| filter.accepts(report))
        .collect()
}

/// Map speed export rows (header included) to events with a plate and a
/// positive speed.
pub fn map_speed_events(rows: &[Vec<String>]) -> Vec<SpeedEvent> {
    data_rows(rows)
        .iter()
        .map(|row| SpeedEvent {
            plate_no: text(row, speed_col::PLATE_NO),
            company: text(row, speed_col::COMPANY),
            starting_time: text(row, speed_col::STARTING_TIME),
            speed: parse_number(field(row, speed_col::SPEED)),
        })
        .filter(|event| !event.plate_no.is_empty() && event.speed > 0.0)
        .collect()
}

/// Map AI alert export rows (header included) to alerts with both a plate
/// and an alarm type.
pub fn map_ai_alerts(rows: &[Vec<String>]) -> Vec<AiAlert> {
    data_rows(rows)
        .iter()
        .map(|row| AiAlert {
            plate_no: text(row, alert_col::PLATE_NO),
            company: text(row, alert_col::COMPANY),
            alarm_type: text(row, alert_col::ALARM_TYPE),
            starting_time: text(row, alert_col::STARTING_TIME),
            image_link: text(row, alert_col::IMAGE_LINK),
        })
        .filter(|alert| !alert.plate_no.is_empty() && !alert.alarm_type.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv;

    const OFFLINE_HEADER: &str = "Client,Vehicle,Last Online,Offline Hours,RN,Remarks";

    fn offline(body: &str) -> Vec<OfflineReport> {
        let rows = parse_csv(&format!("{OFFLINE_HEADER}\n{body}"));
        map_offline_reports(&rows, &OfflineFilter::default())
    }

    // -- offline --

    #[test]
    fn offline_g4s_row_over_threshold_is_kept() {
        let reports = offline("G4S Transport,KBX123A,2024-08-20 10:00,30,RN1,check");
        assert_eq!(reports.len(), 1);
        let r = &reports[0];
        assert_eq!(r.client, "G4S Transport");
        assert_eq!(r.vehicle_number, "KBX123A");
        assert_eq!(r.last_online, "2024-08-20 10:00");
        assert_eq!(r.offline_since, 30.0);
        assert_eq!(r.rn, "RN1");
        assert_eq!(r.remarks, "check");
    }

    #[test]
    fn offline_row_under_threshold_is_dropped() {
        assert!(offline("G4S Transport,KBX123A,x,10,,").is_empty());
    }

    #[test]
    fn offline_row_for_other_client_is_dropped() {
        assert!(offline("Other Co,KBX123A,x,300,,").is_empty());
    }

    #[test]
    fn offline_threshold_is_inclusive() {
        assert_eq!(offline("g4s kenya,A,x,24,,").len(), 1);
    }

    #[test]
    fn offline_missing_columns_default_to_empty() {
        let reports = offline("G4S,KBX1,x,48");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].rn, "");
        assert_eq!(reports[0].remarks, "");
    }

    #[test]
    fn offline_custom_filter_applies() {
        let rows = parse_csv(&format!("{OFFLINE_HEADER}\nAcme Logistics,A,x,5,,"));
        let filter = OfflineFilter::new("ACME", 2.0);
        assert_eq!(map_offline_reports(&rows, &filter).len(), 1);
    }

    #[test]
    fn header_only_input_yields_nothing() {
        let rows = parse_csv(OFFLINE_HEADER);
        assert!(map_offline_reports(&rows, &OfflineFilter::default()).is_empty());
        assert!(map_offline_reports(&[], &OfflineFilter::default()).is_empty());
    }

    // -- speed --

    #[test]
    fn speed_rows_map_columns_and_filter() {
        let csv = "No,Plate,Company,Start,End,Location,Speed\n\
                   1,KAA111A,Acme,07:45:00,07:50:00,\"Nairobi, KE\",82\n\
                   2,,Acme,08:00:00,08:01:00,x,90\n\
                   3,KAA222B,Acme,09:00:00,09:01:00,x,0\n\
                   4,KAA333C,Beta,10:00:00,10:01:00,x,abc";
        let events = map_speed_events(&parse_csv(csv));
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SpeedEvent {
                plate_no: "KAA111A".into(),
                company: "Acme".into(),
                starting_time: "07:45:00".into(),
                speed: 82.0,
            }
        );
    }

    // -- alerts --

    #[test]
    fn alert_rows_map_columns_and_filter() {
        let csv = "No,Plate,Company,Type,Start,a,b,c,Image\n\
                   1,KAA111A,Acme,Drowsiness,07:45:00,,,,http://img/1\n\
                   2,KAA111A,Acme,,07:46:00,,,,\n\
                   3,,Acme,Distraction,07:47:00,,,,";
        let alerts = map_ai_alerts(&parse_csv(csv));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alarm_type, "Drowsiness");
        assert_eq!(alerts[0].image_link, "http://img/1");
    }

    #[test]
    fn source_order_is_preserved() {
        let csv = "h\n1,B,c,t,0:00\n2,A,c,t,0:00\n3,C,c,t,0:00";
        let plates: Vec<_> = map_ai_alerts(&parse_csv(csv))
            .into_iter()
            .map(|a| a.plate_no)
            .collect();
        assert_eq!(plates, vec!["B", "A", "C"]);
    }

    #[test]
    fn records_serialize_camel_case() {
        let json = serde_json::to_value(SpeedEvent {
            plate_no: "P".into(),
            company: "C".into(),
            starting_time: "T".into(),
            speed: 80.0,
        })
        .unwrap();
        assert_eq!(json["plateNo"], "P");
        assert_eq!(json["startingTime"], "T");
    }
}
