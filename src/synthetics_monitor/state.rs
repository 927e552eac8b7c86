// This file is part of the terraform-provider-newrelic project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueNumber, ValueSet, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{SyntheticsMonitor, SyntheticsMonitorOptions};
use crate::utils::{attribute, default_if_null, optional_string, WithNormalize, WithSchema, WithValidate};
use crate::validate::{int_in_slice, string_in_slice};

pub(super) const MONITOR_TYPES: [&str; 4] = ["SIMPLE", "BROWSER", "SCRIPT_API", "SCRIPT_BROWSER"];
pub(super) const STATUSES: [&str; 3] = ["ENABLED", "MUTED", "DISABLED"];
/// Minutes between two checks
pub(super) const FREQUENCIES: [i64; 9] = [1, 5, 10, 15, 30, 60, 360, 720, 1440];
pub(super) const DEFAULT_SLA_THRESHOLD: f64 = 7.0;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsMonitorState<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    #[serde(rename = "type")]
    pub monitor_type: ValueString<'a>,
    pub frequency: ValueNumber,
    pub uri: ValueString<'a>,
    pub locations: ValueSet<ValueString<'a>>,
    pub status: ValueString<'a>,
    pub sla_threshold: Value<f64>,
    pub validation_string: ValueString<'a>,
    pub verify_ssl: ValueBool,
    pub bypass_head_request: ValueBool,
    pub treat_redirect_as_failure: ValueBool,
}

impl WithSchema for SyntheticsMonitorState<'_> {
    fn schema() -> Schema {
        let optional = |attr_type, description: &str| {
            attribute(attr_type, AttributeConstraint::Optional, description)
        };
        Schema {
            version: 1,
            block: Block {
                description: Description::plain("New Relic synthetics monitor"),
                attributes: HashMap::from([
                    (
                        "id".into(),
                        attribute(AttributeType::String, AttributeConstraint::Computed, "Monitor UUID"),
                    ),
                    (
                        "name".into(),
                        attribute(AttributeType::String, AttributeConstraint::Required, "Name of the monitor"),
                    ),
                    (
                        "type".into(),
                        attribute(
                            AttributeType::String,
                            AttributeConstraint::Required,
                            "SIMPLE, BROWSER, SCRIPT_API or SCRIPT_BROWSER, changing it recreates the monitor",
                        ),
                    ),
                    (
                        "frequency".into(),
                        attribute(
                            AttributeType::Number,
                            AttributeConstraint::Required,
                            "Minutes between checks: 1, 5, 10, 15, 30, 60, 360, 720 or 1440",
                        ),
                    ),
                    (
                        "uri".into(),
                        optional(AttributeType::String, "URI checked by SIMPLE and BROWSER monitors"),
                    ),
                    (
                        "locations".into(),
                        attribute(
                            AttributeType::Set(Box::new(AttributeType::String)),
                            AttributeConstraint::Required,
                            "Locations the monitor runs from",
                        ),
                    ),
                    (
                        "status".into(),
                        attribute(
                            AttributeType::String,
                            AttributeConstraint::Required,
                            "ENABLED, MUTED or DISABLED",
                        ),
                    ),
                    (
                        "sla_threshold".into(),
                        attribute(
                            AttributeType::Number,
                            AttributeConstraint::OptionalComputed,
                            "Seconds a check may take before it counts against the SLA, defaults to 7",
                        ),
                    ),
                    (
                        "validation_string".into(),
                        optional(AttributeType::String, "Text the response must contain (SIMPLE and BROWSER)"),
                    ),
                    (
                        "verify_ssl".into(),
                        optional(AttributeType::Bool, "Check the TLS certificate (SIMPLE and BROWSER)"),
                    ),
                    (
                        "bypass_head_request".into(),
                        optional(AttributeType::Bool, "Skip the HEAD request and GET directly (SIMPLE)"),
                    ),
                    (
                        "treat_redirect_as_failure".into(),
                        optional(AttributeType::Bool, "Fail the check on a redirect (SIMPLE)"),
                    ),
                ]),
                ..Default::default()
            },
        }
    }
}

impl WithValidate for SyntheticsMonitorState<'_> {
    fn validate(&self, diags: &mut Diagnostics) {
        string_in_slice(
            diags,
            &self.monitor_type,
            &MONITOR_TYPES,
            false,
            AttributePath::new("type"),
        );
        string_in_slice(diags, &self.status, &STATUSES, false, AttributePath::new("status"));
        int_in_slice(diags, &self.frequency, &FREQUENCIES, AttributePath::new("frequency"));

        if let Value::Value(locations) = &self.locations {
            if locations.is_empty() {
                diags.error(
                    "Missing monitor location",
                    "`locations` needs at least one location.",
                    AttributePath::new("locations"),
                );
            }
        }

        // Remaining checks depend on a known type
        let Value::Value(monitor_type) = &self.monitor_type else {
            return;
        };
        let monitor_type: &str = monitor_type;
        let checks_uri = matches!(monitor_type, "SIMPLE" | "BROWSER");
        let simple = monitor_type == "SIMPLE";

        if checks_uri && self.uri.is_null() {
            diags.error(
                "Missing monitor URI",
                format!("`uri` is required for {monitor_type} monitors."),
                AttributePath::new("uri"),
            );
        }
        let restricted = [
            ("validation_string", !self.validation_string.is_null(), checks_uri),
            ("verify_ssl", !self.verify_ssl.is_null(), checks_uri),
            ("bypass_head_request", !self.bypass_head_request.is_null(), simple),
            ("treat_redirect_as_failure", !self.treat_redirect_as_failure.is_null(), simple),
        ];
        for (name, set, allowed) in restricted {
            if set && !allowed {
                diags.error(
                    "Unsupported monitor option",
                    format!("`{name}` is not supported by {monitor_type} monitors."),
                    AttributePath::new(name),
                );
            }
        }
    }
}

impl WithNormalize for SyntheticsMonitorState<'_> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        default_if_null(&mut self.sla_threshold, DEFAULT_SLA_THRESHOLD);
    }
}

/// Flags the API reports as false stay null unless configured so
fn flag(prior: &ValueBool, remote: Option<bool>) -> ValueBool {
    match remote {
        Some(true) => Value::Value(true),
        _ if *prior == Value::Value(false) => Value::Value(false),
        _ => Value::Null,
    }
}

impl<'a> SyntheticsMonitorState<'a> {
    pub(super) fn expand(&self) -> SyntheticsMonitor {
        SyntheticsMonitor {
            id: self.id.as_ref_option().map(|id| id.to_string()).unwrap_or_default(),
            name: self.name.as_str().to_string(),
            monitor_type: self.monitor_type.as_str().to_string(),
            frequency: self.frequency.unwrap_or_default(),
            uri: self.uri.as_ref_option().map(|uri| uri.to_string()),
            locations: self
                .locations
                .iter()
                .flatten()
                .filter_map(|location| location.as_ref_option())
                .map(|location| location.to_string())
                .collect(),
            status: self.status.as_str().to_string(),
            sla_threshold: self.sla_threshold.unwrap_or(DEFAULT_SLA_THRESHOLD),
            options: SyntheticsMonitorOptions {
                validation_string: self.validation_string.as_ref_option().map(|s| s.to_string()),
                verify_ssl: self.verify_ssl.as_ref_option().copied(),
                bypass_head_request: self.bypass_head_request.as_ref_option().copied(),
                treat_redirect_as_failure: self.treat_redirect_as_failure.as_ref_option().copied(),
            },
        }
    }

    pub(super) fn flatten(monitor: &SyntheticsMonitor, prior: &Self) -> Self {
        let options = &monitor.options;
        Self {
            id: Value::Value(Cow::Owned(monitor.id.clone())),
            name: Value::Value(Cow::Owned(monitor.name.clone())),
            monitor_type: Value::Value(Cow::Owned(monitor.monitor_type.clone())),
            frequency: Value::Value(monitor.frequency),
            uri: optional_string(monitor.uri.clone()),
            locations: Value::Value(
                monitor
                    .locations
                    .iter()
                    .map(|location| Value::Value(Cow::Owned(location.clone())))
                    .collect(),
            ),
            status: Value::Value(Cow::Owned(monitor.status.clone())),
            sla_threshold: Value::Value(monitor.sla_threshold),
            validation_string: optional_string(options.validation_string.clone()),
            verify_ssl: flag(&prior.verify_ssl, options.verify_ssl),
            bypass_head_request: flag(&prior.bypass_head_request, options.bypass_head_request),
            treat_redirect_as_failure: flag(
                &prior.treat_redirect_as_failure,
                options.treat_redirect_as_failure,
            ),
        }
    }
}

/// State of the `synthetics_monitor` data source
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticsMonitorLookup<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub monitor_id: ValueString<'a>,
}

impl WithSchema for SyntheticsMonitorLookup<'_> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Look up a New Relic synthetics monitor by name"),
                attributes: HashMap::from([
                    (
                        "id".into(),
                        attribute(AttributeType::String, AttributeConstraint::Computed, "Monitor UUID"),
                    ),
                    (
                        "name".into(),
                        attribute(AttributeType::String, AttributeConstraint::Required, "Name of the monitor"),
                    ),
                    (
                        "monitor_id".into(),
                        attribute(AttributeType::String, AttributeConstraint::Computed, "Monitor UUID"),
                    ),
                ]),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_matches_schema;

    fn text(s: &'static str) -> ValueString<'static> {
        Value::Value(Cow::Borrowed(s))
    }

    fn simple() -> SyntheticsMonitorState<'static> {
        SyntheticsMonitorState {
            name: text("homepage"),
            monitor_type: text("SIMPLE"),
            frequency: Value::Value(5),
            uri: text("https://example.com"),
            locations: Value::Value([text("AWS_US_EAST_1"), text("AWS_EU_WEST_1")].into()),
            status: text("ENABLED"),
            ..Default::default()
        }
    }

    #[test]
    fn state_matches_schema() {
        assert_matches_schema::<SyntheticsMonitorState>(SyntheticsMonitorState::schema());
        assert_matches_schema::<SyntheticsMonitorLookup>(SyntheticsMonitorLookup::schema());
    }

    #[test]
    fn valid_simple_monitor() {
        let mut diags = Diagnostics::default();
        let monitor = SyntheticsMonitorState {
            verify_ssl: Value::Value(true),
            bypass_head_request: Value::Value(true),
            ..simple()
        };
        monitor.validate(&mut diags);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn invalid_values() {
        let mut diags = Diagnostics::default();
        let monitor = SyntheticsMonitorState {
            monitor_type: text("PING"),
            frequency: Value::Value(3),
            status: text("enabled"),
            locations: Value::Value(Default::default()),
            ..simple()
        };
        monitor.validate(&mut diags);
        let paths: Vec<_> = diags.errors.iter().map(|err| err.attribute.clone()).collect();
        assert_eq!(
            paths,
            [
                AttributePath::new("type"),
                AttributePath::new("status"),
                AttributePath::new("frequency"),
                AttributePath::new("locations"),
            ]
        );
    }

    #[test]
    fn type_specific_attributes() {
        let mut diags = Diagnostics::default();
        SyntheticsMonitorState {
            uri: Value::Null,
            treat_redirect_as_failure: Value::Value(true),
            ..SyntheticsMonitorState {
                monitor_type: text("BROWSER"),
                ..simple()
            }
        }
        .validate(&mut diags);
        let paths: Vec<_> = diags.errors.iter().map(|err| err.attribute.clone()).collect();
        assert_eq!(
            paths,
            [AttributePath::new("uri"), AttributePath::new("treat_redirect_as_failure")]
        );

        let mut diags = Diagnostics::default();
        SyntheticsMonitorState {
            monitor_type: text("SCRIPT_API"),
            uri: Value::Null,
            validation_string: text("ok"),
            ..simple()
        }
        .validate(&mut diags);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("validation_string"));

        // Unknown type: nothing type specific is checked
        let mut diags = Diagnostics::default();
        SyntheticsMonitorState {
            monitor_type: Value::Unknown,
            uri: Value::Null,
            bypass_head_request: Value::Value(false),
            ..simple()
        }
        .validate(&mut diags);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn expand_options() {
        let mut state = SyntheticsMonitorState {
            validation_string: text("Welcome"),
            verify_ssl: Value::Value(false),
            ..simple()
        };
        state.normalize(&mut Diagnostics::default());
        let monitor = state.expand();

        assert!(monitor.id.is_empty());
        assert_eq!(monitor.sla_threshold, DEFAULT_SLA_THRESHOLD);
        assert_eq!(monitor.locations, ["AWS_EU_WEST_1", "AWS_US_EAST_1"]);
        assert_eq!(monitor.options.validation_string.as_deref(), Some("Welcome"));
        assert_eq!(monitor.options.verify_ssl, Some(false));
        assert_eq!(monitor.options.bypass_head_request, None);
    }

    #[test]
    fn flatten_false_flags() {
        let prior = SyntheticsMonitorState {
            verify_ssl: Value::Value(false),
            ..simple()
        };
        let monitor = SyntheticsMonitor {
            id: "0a1b".into(),
            options: SyntheticsMonitorOptions {
                verify_ssl: Some(false),
                bypass_head_request: Some(false),
                treat_redirect_as_failure: Some(true),
                ..Default::default()
            },
            ..prior.expand()
        };
        let state = SyntheticsMonitorState::flatten(&monitor, &prior);

        assert_eq!(state.id.as_str(), "0a1b");
        assert_eq!(state.verify_ssl, Value::Value(false));
        assert!(state.bypass_head_request.is_null());
        assert_eq!(state.treat_redirect_as_failure, Value::Value(true));
        assert_eq!(state.locations, prior.locations);
        assert!(state.validation_string.is_null());
    }
}
