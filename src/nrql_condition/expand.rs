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

//! Mapping between the condition state and the NerdGraph payloads.
//!
//! Enumerations are sent upper-case. When they come back, the configured
//! spelling is kept as long as it matches ignoring case.

use std::borrow::Cow;

use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{
    NrqlCondition, NrqlConditionExpiration, NrqlConditionInput, NrqlConditionQuery,
    NrqlConditionSignal, NrqlConditionTerm, NrqlConditionType,
};
use crate::id::serialize_hashed_ids;
use crate::utils::{optional_string, preserve_case, ReportDiagnostics};

use super::normalize::{violation_time_limit, violation_time_limit_seconds};
use super::state::{NrqlConditionState, NrqlState, TermState, ThresholdState};

fn upper(value: &ValueString, default: &str) -> String {
    value
        .as_ref_option()
        .map_or(default, |value| &**value)
        .to_ascii_uppercase()
}

fn upper_option(value: &ValueString) -> Option<String> {
    value
        .as_ref_option()
        .map(|value| value.to_ascii_uppercase())
}

fn text(value: &ValueString) -> Option<String> {
    value.as_ref_option().map(|value| value.to_string())
}

impl ThresholdState<'_> {
    fn expand(&self, priority: &str) -> NrqlConditionTerm {
        NrqlConditionTerm {
            operator: upper(&self.operator, "equals"),
            priority: priority.to_string(),
            threshold: self.threshold.unwrap_or_default(),
            threshold_duration: self.threshold_duration.as_ref_option().copied(),
            threshold_occurrences: Some(upper(&self.threshold_occurrences, "all")),
        }
    }

    fn flatten<'a>(term: &NrqlConditionTerm, prior: &Value<ThresholdState<'a>>) -> ThresholdState<'a> {
        let prior = prior.as_ref_option();
        ThresholdState {
            operator: preserve_case(
                prior.map_or(&Value::Null, |prior| &prior.operator),
                &term.operator,
            ),
            threshold: Value::Value(term.threshold),
            threshold_duration: term.threshold_duration.into(),
            threshold_occurrences: preserve_case(
                prior.map_or(&Value::Null, |prior| &prior.threshold_occurrences),
                term.threshold_occurrences.as_deref().unwrap_or("ALL"),
            ),
        }
    }
}

impl TermState<'_> {
    fn expand(&self) -> NrqlConditionTerm {
        let occurrences = match self.time_function.as_ref_option() {
            Some(function) if function.eq_ignore_ascii_case("any") => "AT_LEAST_ONCE",
            _ => "ALL",
        };
        NrqlConditionTerm {
            operator: upper(&self.operator, "equals"),
            priority: upper(&self.priority, "critical"),
            threshold: self.threshold.unwrap_or_default(),
            threshold_duration: self.duration.as_ref_option().map(|minutes| minutes * 60),
            threshold_occurrences: Some(occurrences.to_string()),
        }
    }

    fn flatten<'a>(term: &NrqlConditionTerm, prior: Option<&TermState<'a>>) -> TermState<'a> {
        let time_function = match term.threshold_occurrences.as_deref() {
            Some("AT_LEAST_ONCE") => "any",
            _ => "all",
        };
        TermState {
            duration: term.threshold_duration.map(|seconds| seconds / 60).into(),
            operator: preserve_case(prior.map_or(&Value::Null, |prior| &prior.operator), &term.operator),
            priority: preserve_case(prior.map_or(&Value::Null, |prior| &prior.priority), &term.priority),
            threshold: Value::Value(term.threshold),
            time_function: preserve_case(
                prior.map_or(&Value::Null, |prior| &prior.time_function),
                time_function,
            ),
        }
    }
}

impl<'a> NrqlConditionState<'a> {
    /// Build the NerdGraph input of the condition
    pub(super) fn expand(
        &self,
        diags: &mut Diagnostics,
    ) -> Option<(NrqlConditionType, NrqlConditionInput)> {
        let Some(kind) = self.kind() else {
            diags.error_short("Invalid condition type", AttributePath::new("type"));
            return None;
        };
        let Value::Value(nrql) = &self.nrql else {
            diags.error_short("Missing nrql block", AttributePath::new("nrql"));
            return None;
        };

        let evaluation_offset = match &nrql.since_value {
            Value::Value(since) => Some(
                since
                    .trim()
                    .parse::<i64>()
                    .report(diags, "Invalid since_value")?,
            ),
            _ => nrql.evaluation_offset.as_ref_option().copied(),
        };

        let terms = if self.uses_terms() {
            self.term
                .iter()
                .flatten()
                .flatten()
                .map(TermState::expand)
                .collect()
        } else {
            [(&self.critical, "CRITICAL"), (&self.warning, "WARNING")]
                .into_iter()
                .filter_map(|(threshold, priority)| {
                    Some(threshold.as_ref_option()?.expand(priority))
                })
                .collect()
        };

        let time_limit = match self.violation_time_limit.as_ref_option() {
            Some(limit) => violation_time_limit_seconds(limit),
            None => self.violation_time_limit_seconds.as_ref_option().copied(),
        };

        let input = NrqlConditionInput {
            name: self.name.as_str().to_string(),
            enabled: self.enabled.unwrap_or(true),
            description: text(&self.description),
            runbook_url: text(&self.runbook_url),
            nrql: NrqlConditionQuery {
                query: nrql.query.as_str().to_string(),
                evaluation_offset,
            },
            terms,
            value_function: match kind {
                NrqlConditionType::Static => Some(upper(&self.value_function, "single_value")),
                _ => None,
            },
            baseline_direction: match kind {
                NrqlConditionType::Baseline => upper_option(&self.baseline_direction),
                _ => None,
            },
            expected_groups: match kind {
                NrqlConditionType::Outlier => self.expected_groups.as_ref_option().copied(),
                _ => None,
            },
            open_violation_on_group_overlap: match kind {
                NrqlConditionType::Outlier => {
                    self.open_violation_on_group_overlap.as_ref_option().copied()
                }
                _ => None,
            },
            violation_time_limit_seconds: time_limit,
            expiration: Some(NrqlConditionExpiration {
                close_violations_on_expiration: self
                    .close_violations_on_expiration
                    .as_ref_option()
                    .copied(),
                expiration_duration: self.expiration_duration.as_ref_option().copied(),
                open_violation_on_expiration: self
                    .open_violation_on_expiration
                    .as_ref_option()
                    .copied(),
            }),
            signal: Some(NrqlConditionSignal {
                aggregation_window: self.aggregation_window.as_ref_option().copied(),
                fill_option: upper_option(&self.fill_option),
                fill_value: self.fill_value.as_ref_option().copied(),
            }),
        };

        Some((kind, input))
    }

    /// Build the state from the API response.
    ///
    /// `prior` decides between the deprecated and current attributes, and
    /// provides the configured spelling of the enumerations.
    pub(super) fn flatten(
        diags: &mut Diagnostics,
        account_id: i64,
        condition: &NrqlCondition,
        prior: &NrqlConditionState<'a>,
    ) -> Option<Self> {
        let policy_id = condition
            .policy_id
            .parse::<i64>()
            .report(diags, "Invalid policy ID returned by New Relic")?;
        let condition_id = condition
            .id
            .parse::<i64>()
            .report(diags, "Invalid condition ID returned by New Relic")?;
        let input = &condition.input;
        let kind = condition.condition_type;
        let expiration = input.expiration.clone().unwrap_or_default();
        let signal = input.signal.clone().unwrap_or_default();

        let time_limit = match (&prior.violation_time_limit, input.violation_time_limit_seconds) {
            (Value::Value(configured), Some(seconds)) => match violation_time_limit(seconds) {
                Some(limit) if limit.eq_ignore_ascii_case(configured) => {
                    Value::Value(configured.clone())
                }
                Some(limit) => Value::Value(Cow::Borrowed(limit)),
                None => Value::Null,
            },
            _ => Value::Null,
        };

        let prior_nrql = prior.nrql.as_ref_option();
        let since_value = match (prior_nrql.map(|nrql| &nrql.since_value), input.nrql.evaluation_offset) {
            (Some(Value::Value(since)), Some(offset)) => {
                if since.trim().parse::<i64>() == Ok(offset) {
                    Value::Value(since.clone())
                } else {
                    Value::Value(Cow::Owned(offset.to_string()))
                }
            }
            _ => Value::Null,
        };

        let find = |priority: &str| {
            input
                .terms
                .iter()
                .find(|term| term.priority.eq_ignore_ascii_case(priority))
        };
        let (critical, warning, term) = if prior.uses_terms() {
            let prior_terms = prior.term.as_ref_option();
            let terms = input
                .terms
                .iter()
                .enumerate()
                .map(|(i, term)| {
                    let prior = prior_terms
                        .and_then(|terms| terms.get(i))
                        .and_then(|term| term.as_ref_option());
                    Value::Value(TermState::flatten(term, prior))
                })
                .collect();
            (Value::Null, Value::Null, Value::Value(terms))
        } else {
            (
                find("CRITICAL")
                    .map(|term| ThresholdState::flatten(term, &prior.critical))
                    .into(),
                find("WARNING")
                    .map(|term| ThresholdState::flatten(term, &prior.warning))
                    .into(),
                Value::Value(vec![]),
            )
        };

        Some(Self {
            id: Value::Value(Cow::Owned(serialize_hashed_ids(&[policy_id, condition_id]))),
            account_id: Value::Value(account_id),
            policy_id: Value::Value(policy_id),
            name: Value::Value(Cow::Owned(input.name.clone())),
            condition_type: preserve_case(&prior.condition_type, kind.as_str()),
            description: optional_string(input.description.clone()),
            runbook_url: optional_string(input.runbook_url.clone()),
            enabled: Value::Value(input.enabled),
            value_function: match kind {
                NrqlConditionType::Static => preserve_case(
                    &prior.value_function,
                    input.value_function.as_deref().unwrap_or_default(),
                ),
                _ => Value::Null,
            },
            baseline_direction: match kind {
                NrqlConditionType::Baseline => preserve_case(
                    &prior.baseline_direction,
                    input.baseline_direction.as_deref().unwrap_or_default(),
                ),
                _ => Value::Null,
            },
            expected_groups: match kind {
                NrqlConditionType::Outlier => input.expected_groups.into(),
                _ => Value::Null,
            },
            open_violation_on_group_overlap: match kind {
                NrqlConditionType::Outlier => {
                    Value::Value(input.open_violation_on_group_overlap.unwrap_or_default())
                }
                _ => Value::Null,
            },
            violation_time_limit_seconds: input.violation_time_limit_seconds.into(),
            violation_time_limit: time_limit,
            fill_option: preserve_case(
                &prior.fill_option,
                signal.fill_option.as_deref().unwrap_or("none"),
            ),
            fill_value: signal.fill_value.into(),
            aggregation_window: signal.aggregation_window.into(),
            expiration_duration: expiration.expiration_duration.into(),
            open_violation_on_expiration: Value::Value(
                expiration.open_violation_on_expiration.unwrap_or_default(),
            ),
            close_violations_on_expiration: Value::Value(
                expiration.close_violations_on_expiration.unwrap_or_default(),
            ),
            nrql: Value::Value(NrqlState {
                query: Value::Value(Cow::Owned(input.nrql.query.clone())),
                evaluation_offset: input.nrql.evaluation_offset.into(),
                since_value,
            }),
            critical,
            warning,
            term,
        })
    }
}
