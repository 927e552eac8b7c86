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

//! Request and response payloads of the New Relic APIs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

fn is_zero(value: &i64) -> bool {
    *value == 0
}

// REST v2 dashboards

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub editable: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ui_url: String,
    #[serde(default)]
    pub metadata: DashboardMetadata,
    #[serde(default)]
    pub widgets: Vec<DashboardWidget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    pub version: i64,
}

impl Default for DashboardMetadata {
    fn default() -> Self {
        Self { version: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardWidget {
    pub visualization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<i64>,
    #[serde(default)]
    pub data: Vec<DashboardWidgetData>,
    #[serde(default)]
    pub presentation: DashboardWidgetPresentation,
    #[serde(default)]
    pub layout: DashboardWidgetLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardWidgetData {
    #[serde(default)]
    pub nrql: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardWidgetPresentation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardWidgetLayout {
    pub row: i64,
    pub column: i64,
    pub width: i64,
    pub height: i64,
}

// NerdGraph alert policies

/// Determines how incidents are created for critical violations of the
/// conditions contained in a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertsIncidentPreference {
    /// One condition-level incident per violating condition
    PerCondition,
    /// One entity-level incident per violating target of each condition
    PerConditionAndTarget,
    /// Violations of all conditions are grouped into a policy-level incident
    #[default]
    PerPolicy,
}

impl AlertsIncidentPreference {
    pub const ALL: [&'static str; 3] = ["PER_POLICY", "PER_CONDITION", "PER_CONDITION_AND_TARGET"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerCondition => "PER_CONDITION",
            Self::PerConditionAndTarget => "PER_CONDITION_AND_TARGET",
            Self::PerPolicy => "PER_POLICY",
        }
    }
}

impl FromStr for AlertsIncidentPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PER_CONDITION" => Ok(Self::PerCondition),
            "PER_CONDITION_AND_TARGET" => Ok(Self::PerConditionAndTarget),
            "PER_POLICY" => Ok(Self::PerPolicy),
            _ => Err(format!("`{s}` is not a valid incident preference")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicy {
    pub account_id: i64,
    pub id: String,
    pub incident_preference: AlertsIncidentPreference,
    pub name: String,
}

/// Used both for policy creation and policy update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicyInput {
    pub incident_preference: AlertsIncidentPreference,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPoliciesSearchResultSet {
    /// Null on the final page
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub policies: Vec<AlertsPolicy>,
    #[serde(default)]
    pub total_count: i64,
}

// NerdGraph NRQL conditions

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NrqlConditionType {
    #[default]
    Static,
    Baseline,
    Outlier,
}

impl NrqlConditionType {
    pub const ALL: [&'static str; 3] = ["static", "baseline", "outlier"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Baseline => "baseline",
            Self::Outlier => "outlier",
        }
    }

    /// Suffix of the NerdGraph mutations and input types for this kind
    pub(crate) fn graphql_name(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Baseline => "Baseline",
            Self::Outlier => "Outlier",
        }
    }
}

impl FromStr for NrqlConditionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "baseline" => Ok(Self::Baseline),
            "outlier" => Ok(Self::Outlier),
            _ => Err(format!("`{s}` is not a valid NRQL condition type")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionTerm {
    pub operator: String,
    pub priority: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_occurrences: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionExpiration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_violations_on_expiration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_violation_on_expiration: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionSignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_window: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<f64>,
}

/// Condition fields shared by the static, baseline and outlier inputs.
///
/// Fields that do not apply to a condition type are left to `None` and are
/// not sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionInput {
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
    pub nrql: NrqlConditionQuery,
    #[serde(default)]
    pub terms: Vec<NrqlConditionTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_groups: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_violation_on_group_overlap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_time_limit_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NrqlConditionExpiration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<NrqlConditionSignal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlCondition {
    pub id: String,
    pub policy_id: String,
    #[serde(rename = "type")]
    pub condition_type: NrqlConditionType,
    #[serde(flatten)]
    pub input: NrqlConditionInput,
}

// Synthetics REST v3 monitors

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticsMonitor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub frequency: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    pub status: String,
    #[serde(default)]
    pub sla_threshold: f64,
    #[serde(default)]
    pub options: SyntheticsMonitorOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyntheticsMonitorOptions {
    #[serde(rename = "validationString", default, skip_serializing_if = "Option::is_none")]
    pub validation_string: Option<String>,
    #[serde(rename = "verifySSL", default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,
    #[serde(rename = "bypassHEADRequest", default, skip_serializing_if = "Option::is_none")]
    pub bypass_head_request: Option<bool>,
    #[serde(rename = "treatRedirectAsFailure", default, skip_serializing_if = "Option::is_none")]
    pub treat_redirect_as_failure: Option<bool>,
}

/// One page of `GET /monitors`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyntheticsMonitorList {
    #[serde(default)]
    pub monitors: Vec<SyntheticsMonitor>,
    /// Number of monitors in the account
    #[serde(default)]
    pub count: i64,
}
