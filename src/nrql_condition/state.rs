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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{self, Value, ValueBool, ValueList, ValueNumber, ValueString};

use crate::client::NrqlConditionType;
use crate::utils::{attribute, WithSchema};

pub(super) const OPERATORS: [&str; 3] = ["above", "below", "equals"];
pub(super) const PRIORITIES: [&str; 2] = ["critical", "warning"];
pub(super) const THRESHOLD_OCCURRENCES: [&str; 2] = ["all", "at_least_once"];
pub(super) const TIME_FUNCTIONS: [&str; 2] = ["all", "any"];
pub(super) const VALUE_FUNCTIONS: [&str; 2] = ["single_value", "sum"];
pub(super) const BASELINE_DIRECTIONS: [&str; 3] = ["lower_only", "upper_and_lower", "upper_only"];
pub(super) const FILL_OPTIONS: [&str; 3] = ["none", "last_value", "static"];

pub(super) const DEFAULT_VIOLATION_TIME_LIMIT_SECONDS: i64 = 259200;

/// Deprecated `violation_time_limit` values and their duration in seconds
pub(super) const VIOLATION_TIME_LIMITS: [(&str, i64); 6] = [
    ("ONE_HOUR", 3600),
    ("TWO_HOURS", 7200),
    ("FOUR_HOURS", 14400),
    ("EIGHT_HOURS", 28800),
    ("TWELVE_HOURS", 43200),
    ("TWENTY_FOUR_HOURS", 86400),
];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct NrqlConditionState<'a> {
    pub id: ValueString<'a>,
    pub account_id: ValueNumber,
    pub policy_id: ValueNumber,
    pub name: ValueString<'a>,
    #[serde(rename = "type")]
    pub condition_type: ValueString<'a>,
    pub description: ValueString<'a>,
    pub runbook_url: ValueString<'a>,
    pub enabled: ValueBool,
    pub value_function: ValueString<'a>,
    pub baseline_direction: ValueString<'a>,
    pub expected_groups: ValueNumber,
    pub open_violation_on_group_overlap: ValueBool,
    pub violation_time_limit_seconds: ValueNumber,
    pub violation_time_limit: ValueString<'a>,
    pub fill_option: ValueString<'a>,
    pub fill_value: Value<f64>,
    pub aggregation_window: ValueNumber,
    pub expiration_duration: ValueNumber,
    pub open_violation_on_expiration: ValueBool,
    pub close_violations_on_expiration: ValueBool,
    pub nrql: Value<NrqlState<'a>>,
    #[serde(with = "value::serde_as_vec")]
    pub critical: Value<ThresholdState<'a>>,
    #[serde(with = "value::serde_as_vec")]
    pub warning: Value<ThresholdState<'a>>,
    pub term: ValueList<Value<TermState<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrqlState<'a> {
    pub query: ValueString<'a>,
    pub evaluation_offset: ValueNumber,
    pub since_value: ValueString<'a>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdState<'a> {
    pub operator: ValueString<'a>,
    pub threshold: Value<f64>,
    pub threshold_duration: ValueNumber,
    pub threshold_occurrences: ValueString<'a>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermState<'a> {
    /// Minutes
    pub duration: ValueNumber,
    pub operator: ValueString<'a>,
    pub priority: ValueString<'a>,
    pub threshold: Value<f64>,
    pub time_function: ValueString<'a>,
}

impl NrqlConditionState<'_> {
    /// Condition kind, `None` while the type is not known yet
    pub(super) fn kind(&self) -> Option<NrqlConditionType> {
        match &self.condition_type {
            Value::Value(kind) => kind.parse().ok(),
            Value::Null => Some(NrqlConditionType::default()),
            Value::Unknown => None,
        }
    }

    /// The deprecated `term` blocks are in use
    pub(super) fn uses_terms(&self) -> bool {
        self.term
            .as_ref_option()
            .is_some_and(|terms| !terms.is_empty())
    }
}

fn deprecated(attr: Attribute) -> Attribute {
    Attribute {
        deprecated: true,
        ..attr
    }
}

impl WithSchema for NrqlConditionState<'_> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};
        use AttributeType::{Bool, Number, String};

        let threshold = |priority: &str| Block {
            description: Description::plain(format!(
                "Threshold opening {priority} violations"
            )),
            attributes: HashMap::from([
                (
                    "operator".into(),
                    attribute(String, OptionalComputed, "above, below or equals (default equals)"),
                ),
                ("threshold".into(), attribute(Number, Required, "Value the query result is compared to")),
                (
                    "threshold_duration".into(),
                    attribute(
                        Number,
                        OptionalComputed,
                        "Seconds the threshold must be crossed to open a violation",
                    ),
                ),
                (
                    "threshold_occurrences".into(),
                    attribute(String, OptionalComputed, "all or at_least_once (default all)"),
                ),
            ]),
            ..Default::default()
        };

        let nrql = Block {
            description: Description::plain("NRQL query evaluated by the condition"),
            attributes: HashMap::from([
                ("query".into(), attribute(String, Required, "NRQL query")),
                (
                    "evaluation_offset".into(),
                    attribute(
                        Number,
                        OptionalComputed,
                        "Number of aggregation windows the evaluation is delayed by",
                    ),
                ),
                (
                    "since_value".into(),
                    deprecated(attribute(
                        String,
                        Optional,
                        "Minutes of delay of the evaluation, use evaluation_offset instead",
                    )),
                ),
            ]),
            ..Default::default()
        };

        let term = Block {
            description: Description::plain("Threshold term, use critical and warning instead"),
            deprecated: true,
            attributes: HashMap::from([
                ("duration".into(), attribute(Number, Required, "Minutes, between 1 and 120")),
                (
                    "operator".into(),
                    attribute(String, OptionalComputed, "above, below or equals (default equals)"),
                ),
                (
                    "priority".into(),
                    attribute(String, OptionalComputed, "critical or warning (default critical)"),
                ),
                ("threshold".into(), attribute(Number, Required, "Threshold value")),
                ("time_function".into(), attribute(String, Required, "all or any")),
            ]),
            ..Default::default()
        };

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("New Relic NRQL alert condition"),
                attributes: HashMap::from([
                    (
                        "id".into(),
                        attribute(String, Computed, "`<policy_id>:<condition_id>`"),
                    ),
                    (
                        "account_id".into(),
                        attribute(
                            Number,
                            OptionalComputed,
                            "Account owning the condition, defaults to the provider account",
                        ),
                    ),
                    ("policy_id".into(), attribute(Number, Required, "Policy holding the condition")),
                    ("name".into(), attribute(String, Required, "Name of the condition")),
                    (
                        "type".into(),
                        attribute(String, OptionalComputed, "static, baseline or outlier (default static)"),
                    ),
                    ("description".into(), attribute(String, Optional, "Description of the condition")),
                    ("runbook_url".into(), attribute(String, Optional, "Runbook URL shown in incidents")),
                    (
                        "enabled".into(),
                        attribute(Bool, OptionalComputed, "Whether the condition is evaluated (default true)"),
                    ),
                    (
                        "value_function".into(),
                        attribute(String, OptionalComputed, "Static conditions only: single_value or sum"),
                    ),
                    (
                        "baseline_direction".into(),
                        attribute(
                            String,
                            Optional,
                            "Baseline conditions only: lower_only, upper_and_lower or upper_only",
                        ),
                    ),
                    (
                        "expected_groups".into(),
                        attribute(Number, Optional, "Outlier conditions only: number of expected groups"),
                    ),
                    (
                        "open_violation_on_group_overlap".into(),
                        attribute(
                            Bool,
                            OptionalComputed,
                            "Outlier conditions only: open violations when groups overlap",
                        ),
                    ),
                    (
                        "violation_time_limit_seconds".into(),
                        attribute(
                            Number,
                            OptionalComputed,
                            "Seconds after which open violations are closed (default 259200)",
                        ),
                    ),
                    (
                        "violation_time_limit".into(),
                        deprecated(attribute(
                            String,
                            Optional,
                            "ONE_HOUR to TWENTY_FOUR_HOURS, use violation_time_limit_seconds instead",
                        )),
                    ),
                    (
                        "fill_option".into(),
                        attribute(String, OptionalComputed, "Gap filling: none, last_value or static"),
                    ),
                    ("fill_value".into(), attribute(Number, Optional, "Value used by the static fill option")),
                    (
                        "aggregation_window".into(),
                        attribute(Number, OptionalComputed, "Seconds of data aggregated in each window"),
                    ),
                    (
                        "expiration_duration".into(),
                        attribute(Number, Optional, "Seconds without data before the signal is lost"),
                    ),
                    (
                        "open_violation_on_expiration".into(),
                        attribute(Bool, OptionalComputed, "Open a violation when the signal is lost"),
                    ),
                    (
                        "close_violations_on_expiration".into(),
                        attribute(Bool, OptionalComputed, "Close open violations when the signal is lost"),
                    ),
                ]),
                blocks: HashMap::from([
                    ("nrql".into(), NestedBlock::Single(nrql)),
                    ("critical".into(), NestedBlock::Optional(threshold("critical"))),
                    ("warning".into(), NestedBlock::Optional(threshold("warning"))),
                    ("term".into(), NestedBlock::List(term)),
                ]),
                ..Default::default()
            },
        }
    }
}
