#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use redata::{
        ApiFault, Error, QueryParams, ReDataClient, Route, TimeTrunc, assemble, navigate,
    };
    use serde_json::{Value, json};

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    // Helper to build a terminal object with the REData series shape
    fn terminal(name: &str, points: &[(&str, f64)]) -> Value {
        let values: Vec<Value> = points
            .iter()
            .map(|(datetime, value)| json!({"datetime": datetime, "value": value}))
            .collect();
        json!({"type": name, "attributes": {"values": values}})
    }

    // A realistic balance-electrico response: series grouped by category
    // under included[].attributes.content
    fn balance_response() -> Value {
        json!({
            "data": {"type": "Balance de energía eléctrica", "id": "bal1"},
            "included": [
                {
                    "type": "Renovable",
                    "attributes": {
                        "content": [
                            terminal("Hidráulica", &[("2023-01-01T00:00:00.000+01:00", 120.5)]),
                            terminal("Eólica", &[("2023-01-01T00:00:00.000+01:00", 310.2)]),
                        ]
                    }
                },
                {
                    "type": "No-Renovable",
                    "attributes": {
                        "content": [
                            terminal("Nuclear", &[("2023-01-01T00:00:00.000+01:00", 170.9)]),
                        ]
                    }
                }
            ]
        })
    }

    // ===== Route Navigator Tests =====

    #[test]
    fn test_navigate_yields_all_terminals_in_document_order() {
        let response = balance_response();
        let route = Route::from_keys(&[&["included"], &["attributes", "content"]]);

        let terminals = navigate(&response, &route).unwrap();
        let names: Vec<_> = terminals
            .iter()
            .map(|t| t["type"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Hidráulica", "Eólica", "Nuclear"]);
    }

    #[test]
    fn test_navigate_is_invariant_under_singleton_list_wrapping() {
        let bare = json!({
            "included": {"attributes": {"content": terminal("demand", &[])}}
        });
        let wrapped = json!({
            "included": [{"attributes": {"content": [terminal("demand", &[])]}}]
        });
        let route = Route::from_keys(&[&["included"], &["attributes", "content"]]);

        assert_eq!(
            navigate(&bare, &route).unwrap(),
            navigate(&wrapped, &route).unwrap()
        );
    }

    #[test]
    fn test_navigate_empty_route_returns_input() {
        let response = balance_response();
        let route = Route::from_keys(&[]);
        let terminals = navigate(&response, &route).unwrap();
        assert_eq!(terminals, [&response]);
    }

    #[test]
    fn test_navigate_surfaces_route_drift() {
        let response = json!({"included": [{"attributes": {"renamed": []}}]});
        let route = Route::from_keys(&[&["included"], &["attributes", "content"]]);
        let err = navigate(&response, &route).unwrap_err();
        assert!(matches!(err, Error::MissingKey { step: 1, .. }));
    }

    // ===== Table Assembler Tests =====

    #[test]
    fn test_assemble_empty_is_empty_table() {
        let table = assemble(&[]).unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 0);
    }

    #[test]
    fn test_shared_timestamps_round_trip_without_missing_markers() {
        // K = 3 columns, M = 2 shared timestamps
        let points_a = [("2023-01-01T00:00:00", 1.0), ("2023-01-02T00:00:00", 2.0)];
        let points_b = [("2023-01-01T00:00:00", 3.0), ("2023-01-02T00:00:00", 4.0)];
        let points_c = [("2023-01-01T00:00:00", 5.0), ("2023-01-02T00:00:00", 6.0)];
        let a = terminal("a", &points_a);
        let b = terminal("b", &points_b);
        let c = terminal("c", &points_c);

        let table = assemble(&[&a, &b, &c]).unwrap();
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.num_rows(), 2);
        for (_, cells) in table.rows() {
            assert!(cells.iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_disjoint_timestamps_outer_join_with_explicit_gaps() {
        let a = terminal("a", &[("2023-01-01T00:00:00", 1.0)]);
        let b = terminal("b", &[("2023-01-02T00:00:00", 2.0)]);

        let table = assemble(&[&a, &b]).unwrap();
        assert_eq!(table.index(), [ts(1, 0), ts(2, 0)]);
        assert_eq!(table.column("a").unwrap(), [Some(1.0), None]);
        assert_eq!(table.column("b").unwrap(), [None, Some(2.0)]);
    }

    #[test]
    fn test_duplicate_type_names_fail_the_whole_query() {
        let a = terminal("demand", &[("2023-01-01T00:00:00", 1.0)]);
        let b = terminal("demand", &[("2023-01-02T00:00:00", 2.0)]);
        let err = assemble(&[&a, &b]).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(name) if name == "demand"));
    }

    #[test]
    fn test_one_malformed_terminal_fails_everything() {
        let good = terminal("a", &[("2023-01-01T00:00:00", 1.0)]);
        let bad = json!({"type": "b", "attributes": {}});
        assert!(matches!(
            assemble(&[&good, &bad]),
            Err(Error::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_column_order_follows_discovery_order() {
        let route = Route::from_keys(&[&["included"], &["attributes", "content"]]);
        let response = balance_response();
        let table = assemble(&navigate(&response, &route).unwrap()).unwrap();
        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, ["Hidráulica", "Eólica", "Nuclear"]);
    }

    // ===== End-to-End Scenario Tests =====

    #[test]
    fn test_spec_demand_scenario() {
        let response = json!({
            "included": [{
                "attributes": {
                    "content": [{
                        "type": "demand",
                        "attributes": {
                            "values": [{"datetime": "2023-01-01T00:00:00", "value": 100}]
                        }
                    }]
                }
            }]
        });
        let route = Route::from_keys(&[&["included"], &["attributes", "content"]]);

        let terminals = navigate(&response, &route).unwrap();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0]["type"], "demand");

        let table = assemble(&terminals).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.index(), [ts(1, 0)]);
        assert_eq!(table.get(ts(1, 0), "demand"), Some(100.0));
    }

    #[test]
    fn test_parse_response_full_balance_fixture() {
        let client = ReDataClient::new("balance", "balance-electrico").unwrap();
        let table = client.parse_response(&balance_response()).unwrap();

        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.num_rows(), 1);
        // The +01:00 offset is dropped, the wall time kept
        assert_eq!(table.get(ts(1, 0), "Eólica"), Some(310.2));
    }

    // ===== Error Envelope Tests =====

    #[test]
    fn test_api_error_envelope_preserves_title_and_detail() {
        let client = ReDataClient::new("demanda", "evolucion").unwrap();
        let response = json!({
            "errors": [{"title": "Bad Request", "detail": "invalid date range"}]
        });

        let err = client.parse_response(&response).unwrap_err();
        match err {
            Error::Api(faults) => {
                assert_eq!(
                    faults,
                    [ApiFault {
                        title: "Bad Request".to_string(),
                        detail: "invalid date range".to_string(),
                    }]
                );
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_envelope_aggregates_all_errors() {
        // Policy decision: every reported error is surfaced, not just the
        // first one the envelope lists.
        let client = ReDataClient::new("demanda", "evolucion").unwrap();
        let response = json!({
            "errors": [
                {"title": "Bad Request", "detail": "invalid date range"},
                {"title": "Bad Request", "detail": "unknown time_trunc"}
            ]
        });

        let err = client.parse_response(&response).unwrap_err();
        match err {
            Error::Api(faults) => {
                assert_eq!(faults.len(), 2);
                assert_eq!(faults[1].detail, "unknown time_trunc");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_error_envelope_wins_over_navigation() {
        // The envelope check runs before any navigation is attempted, so
        // an error body that also fails to match the route reports Api.
        let client = ReDataClient::new("balance", "balance-electrico").unwrap();
        let response = json!({
            "errors": [{"title": "Gateway Timeout", "detail": "upstream unavailable"}]
        });
        assert!(matches!(
            client.parse_response(&response),
            Err(Error::Api(_))
        ));
    }

    // ===== Registry / Client Tests =====

    #[test]
    fn test_unregistered_widget_fails_before_any_network_call() {
        let err = ReDataClient::new("bogus", "none").unwrap_err();
        match err {
            Error::UnsupportedWidget { category, widget } => {
                assert_eq!(category, "bogus");
                assert_eq!(widget, "none");
            }
            other => panic!("expected UnsupportedWidget, got {other:?}"),
        }
    }

    #[test]
    fn test_query_params_serialization_matches_api_contract() {
        let params = QueryParams::new(ts(1, 0), ts(31, 23), TimeTrunc::Hour);
        let pairs = params.to_query();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("start_date", "2023-01-01T00:00".to_string()));
        assert_eq!(pairs[1], ("end_date", "2023-01-31T23:00".to_string()));
        assert_eq!(pairs[2], ("time_trunc", "hour".to_string()));
    }
}
