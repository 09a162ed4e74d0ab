// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BackendClient, BackendConfig, ClientError};
use rollcall_domain::ReportingPeriod;

fn client() -> BackendClient {
    BackendClient::new(&BackendConfig::new("http://backend.local/")).unwrap()
}

fn august() -> ReportingPeriod {
    ReportingPeriod::new(2026, 8).unwrap()
}

#[test]
fn test_statistics_url_carries_year_and_month() {
    let url = client().statistics_url(august(), None).unwrap();

    assert_eq!(url.path(), "/api/attendance/statistics");
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert!(pairs.contains(&(String::from("year"), String::from("2026"))));
    assert!(pairs.contains(&(String::from("month"), String::from("8"))));
    assert!(!pairs.iter().any(|(k, _)| k == "department"));
}

#[test]
fn test_statistics_url_includes_department_when_given() {
    let url = client()
        .statistics_url(august(), Some("field ops"))
        .unwrap();

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert!(pairs.contains(&(String::from("department"), String::from("field ops"))));
}

#[test]
fn test_hierarchy_url_has_no_query() {
    let url = client().hierarchy_url().unwrap();

    assert_eq!(url.path(), "/api/attendance/hierarchy");
    assert!(url.query().is_none());
}

#[test]
fn test_new_rejects_unparseable_base_url() {
    let result = BackendClient::new(&BackendConfig::new("not a url"));

    assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
}
