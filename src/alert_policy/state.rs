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
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{AlertsIncidentPreference, AlertsPolicy, AlertsPolicyInput};
use crate::utils::{attribute, ReportDiagnostics, WithNormalize, WithSchema, WithValidate};
use crate::validate::string_in_slice;

/// State of both the `alert_policy` resource and data source
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicyState<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub incident_preference: ValueString<'a>,
    pub account_id: ValueNumber,
}

impl WithSchema for AlertPolicyState<'_> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                description: Description::plain("New Relic alert policy"),
                attributes: HashMap::from([
                    (
                        "id".into(),
                        attribute(AttributeType::String, AttributeConstraint::Computed, "Policy ID"),
                    ),
                    (
                        "name".into(),
                        attribute(AttributeType::String, AttributeConstraint::Required, "Name of the policy"),
                    ),
                    (
                        "incident_preference".into(),
                        attribute(
                            AttributeType::String,
                            AttributeConstraint::OptionalComputed,
                            "Rollup strategy of the policy: PER_POLICY, PER_CONDITION or PER_CONDITION_AND_TARGET",
                        ),
                    ),
                    (
                        "account_id".into(),
                        attribute(
                            AttributeType::Number,
                            AttributeConstraint::OptionalComputed,
                            "Account owning the policy, defaults to the provider account",
                        ),
                    ),
                ]),
                ..Default::default()
            },
        }
    }
}

impl AlertPolicyState<'_> {
    pub(super) fn data_source_schema() -> Schema {
        let mut schema = Self::schema();
        schema.block.description = Description::plain("Look up a New Relic alert policy by name");
        if let Some(attr) = schema.block.attributes.get_mut("incident_preference") {
            attr.constraint = AttributeConstraint::Computed;
        }
        schema
    }
}

impl WithValidate for AlertPolicyState<'_> {
    fn validate(&self, diags: &mut Diagnostics) {
        string_in_slice(
            diags,
            &self.incident_preference,
            &AlertsIncidentPreference::ALL,
            false,
            AttributePath::new("incident_preference"),
        );
    }
}

impl WithNormalize for AlertPolicyState<'_> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.incident_preference.is_null() {
            self.incident_preference =
                Value::Value(Cow::Borrowed(AlertsIncidentPreference::default().as_str()));
        }
    }
}

impl<'a> AlertPolicyState<'a> {
    pub(super) fn expand(&self, diags: &mut Diagnostics) -> Option<AlertsPolicyInput> {
        let incident_preference = match self.incident_preference.as_ref_option() {
            Some(preference) => preference
                .parse::<AlertsIncidentPreference>()
                .report(diags, "Invalid incident preference")?,
            None => Default::default(),
        };
        Some(AlertsPolicyInput {
            incident_preference,
            name: self.name.as_str().to_string(),
        })
    }

    pub(super) fn flatten(policy: &AlertsPolicy) -> Self {
        Self {
            id: Value::Value(Cow::Owned(policy.id.clone())),
            name: Value::Value(Cow::Owned(policy.name.clone())),
            incident_preference: Value::Value(Cow::Borrowed(policy.incident_preference.as_str())),
            account_id: Value::Value(policy.account_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_matches_schema;

    #[test]
    fn default_incident_preference() {
        let mut state = AlertPolicyState {
            name: Value::Value(Cow::Borrowed("p")),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        assert_eq!(state.incident_preference.as_str(), "PER_POLICY");

        let input = state.expand(&mut Diagnostics::default()).unwrap();
        assert_eq!(input.incident_preference, AlertsIncidentPreference::PerPolicy);
        assert_eq!(input.name, "p");
    }

    #[test]
    fn incident_preference_is_case_sensitive() {
        let state = AlertPolicyState {
            incident_preference: Value::Value(Cow::Borrowed("per_condition")),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags);
        assert_eq!(diags.errors.len(), 1);

        let mut diags = Diagnostics::default();
        assert!(state.expand(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn flatten_policy() {
        let state = AlertPolicyState::flatten(&AlertsPolicy {
            account_id: 12,
            id: "345".into(),
            incident_preference: AlertsIncidentPreference::PerConditionAndTarget,
            name: "p".into(),
        });
        assert_eq!(state.id.as_str(), "345");
        assert_eq!(state.incident_preference.as_str(), "PER_CONDITION_AND_TARGET");
        assert_eq!(state.account_id, Value::Value(12));
    }

    #[test]
    fn state_matches_schema() {
        assert_matches_schema::<AlertPolicyState>(AlertPolicyState::schema());
        assert_matches_schema::<AlertPolicyState>(AlertPolicyState::data_source_schema());
    }

    #[test]
    fn data_source_schema_is_read_only() {
        let schema = AlertPolicyState::data_source_schema();
        assert_eq!(
            schema.block.attributes["incident_preference"].constraint,
            AttributeConstraint::Computed
        );
        assert_eq!(
            schema.block.attributes["name"].constraint,
            AttributeConstraint::Required
        );
    }
}
