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

use tf_provider::{value::Value, Diagnostics};

use crate::client::NrqlConditionType;
use crate::utils::{default_if_null, reset_if_unset, unknown_if_null, WithNormalize};

use super::state::{
    NrqlConditionState, ThresholdState, DEFAULT_VIOLATION_TIME_LIMIT_SECONDS,
    VIOLATION_TIME_LIMITS,
};

pub(super) fn violation_time_limit_seconds(limit: &str) -> Option<i64> {
    VIOLATION_TIME_LIMITS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(limit))
        .map(|(_, seconds)| *seconds)
}

pub(super) fn violation_time_limit(seconds: i64) -> Option<&'static str> {
    VIOLATION_TIME_LIMITS
        .iter()
        .find(|(_, limit)| *limit == seconds)
        .map(|(name, _)| *name)
}

impl ThresholdState<'_> {
    fn normalize(&mut self) {
        default_if_null(&mut self.operator, Cow::Borrowed("equals"));
        default_if_null(&mut self.threshold_occurrences, Cow::Borrowed("all"));
        unknown_if_null(&mut self.threshold_duration);
    }
}

impl NrqlConditionState<'_> {
    /// Drop the planned values of defaulted attributes missing from `config`
    pub(super) fn reset_unset(&mut self, config: &Self) {
        reset_if_unset(&mut self.condition_type, &config.condition_type);
        reset_if_unset(&mut self.enabled, &config.enabled);
        reset_if_unset(&mut self.value_function, &config.value_function);
        reset_if_unset(
            &mut self.open_violation_on_group_overlap,
            &config.open_violation_on_group_overlap,
        );
        reset_if_unset(
            &mut self.violation_time_limit_seconds,
            &config.violation_time_limit_seconds,
        );
        reset_if_unset(&mut self.fill_option, &config.fill_option);
        reset_if_unset(
            &mut self.open_violation_on_expiration,
            &config.open_violation_on_expiration,
        );
        reset_if_unset(
            &mut self.close_violations_on_expiration,
            &config.close_violations_on_expiration,
        );

        for (threshold, configured) in [
            (&mut self.critical, &config.critical),
            (&mut self.warning, &config.warning),
        ] {
            if let (Value::Value(threshold), Value::Value(configured)) = (threshold, configured) {
                reset_if_unset(&mut threshold.operator, &configured.operator);
                reset_if_unset(
                    &mut threshold.threshold_occurrences,
                    &configured.threshold_occurrences,
                );
            }
        }

        if let (Value::Value(terms), Value::Value(configured)) = (&mut self.term, &config.term) {
            for (term, configured) in terms.iter_mut().zip(configured) {
                if let (Value::Value(term), Value::Value(configured)) = (term, configured) {
                    reset_if_unset(&mut term.operator, &configured.operator);
                    reset_if_unset(&mut term.priority, &configured.priority);
                }
            }
        }
    }
}

/// Fill the values the API defaults so the plan matches the applied state
impl WithNormalize for NrqlConditionState<'_> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        let kind = self.kind();

        default_if_null(
            &mut self.condition_type,
            Cow::Borrowed(NrqlConditionType::default().as_str()),
        );
        default_if_null(&mut self.enabled, true);

        // The deprecated limit drives the seconds whenever it is set
        match &self.violation_time_limit {
            Value::Value(limit) => {
                self.violation_time_limit_seconds = violation_time_limit_seconds(limit).into();
            }
            Value::Unknown => self.violation_time_limit_seconds = Value::Unknown,
            Value::Null => default_if_null(
                &mut self.violation_time_limit_seconds,
                DEFAULT_VIOLATION_TIME_LIMIT_SECONDS,
            ),
        }

        match kind {
            Some(NrqlConditionType::Static) => {
                default_if_null(&mut self.value_function, Cow::Borrowed("single_value"));
            }
            Some(NrqlConditionType::Outlier) => {
                default_if_null(&mut self.open_violation_on_group_overlap, false);
            }
            Some(NrqlConditionType::Baseline) => (),
            None => {
                unknown_if_null(&mut self.value_function);
                unknown_if_null(&mut self.open_violation_on_group_overlap);
            }
        }

        default_if_null(&mut self.fill_option, Cow::Borrowed("none"));
        unknown_if_null(&mut self.aggregation_window);
        default_if_null(&mut self.open_violation_on_expiration, false);
        default_if_null(&mut self.close_violations_on_expiration, false);

        if let Value::Value(nrql) = &mut self.nrql {
            match &nrql.since_value {
                Value::Value(since) => {
                    if let Ok(offset) = since.trim().parse::<i64>() {
                        nrql.evaluation_offset = Value::Value(offset);
                    }
                }
                Value::Unknown => nrql.evaluation_offset = Value::Unknown,
                Value::Null => unknown_if_null(&mut nrql.evaluation_offset),
            }
        }

        for threshold in [&mut self.critical, &mut self.warning] {
            if let Value::Value(threshold) = threshold {
                threshold.normalize();
            }
        }

        if let Value::Value(terms) = &mut self.term {
            for term in terms.iter_mut().flatten() {
                default_if_null(&mut term.operator, Cow::Borrowed("equals"));
                default_if_null(&mut term.priority, Cow::Borrowed("critical"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nrql_condition::state::{NrqlState, TermState};

    #[test]
    fn deprecated_time_limit() {
        assert_eq!(violation_time_limit_seconds("TWO_HOURS"), Some(7200));
        assert_eq!(violation_time_limit_seconds("two_hours"), Some(7200));
        assert_eq!(violation_time_limit_seconds("THREE_HOURS"), None);
        assert_eq!(violation_time_limit(86400), Some("TWENTY_FOUR_HOURS"));
        assert_eq!(violation_time_limit(259200), None);
    }

    #[test]
    fn time_limit_overrides_carried_seconds() {
        let mut state = NrqlConditionState {
            violation_time_limit: Value::Value(Cow::Borrowed("TWO_HOURS")),
            violation_time_limit_seconds: Value::Value(3600),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        assert_eq!(state.violation_time_limit_seconds, Value::Value(7200));

        state.violation_time_limit = Value::Null;
        state.normalize(&mut Diagnostics::default());
        assert_eq!(state.violation_time_limit_seconds, Value::Value(7200));
    }

    #[test]
    fn static_defaults() {
        let mut state = NrqlConditionState {
            nrql: Value::Value(NrqlState {
                query: Value::Value(Cow::Borrowed("SELECT count(*) FROM Transaction")),
                ..Default::default()
            }),
            critical: Value::Value(ThresholdState {
                threshold: Value::Value(1.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());

        assert_eq!(state.condition_type.as_str(), "static");
        assert_eq!(state.enabled, Value::Value(true));
        assert_eq!(state.value_function.as_str(), "single_value");
        assert_eq!(state.violation_time_limit_seconds, Value::Value(259200));
        assert_eq!(state.fill_option.as_str(), "none");
        assert!(state.aggregation_window.is_unknown());
        assert!(state.baseline_direction.is_null());
        assert!(state.open_violation_on_group_overlap.is_null());

        let nrql = state.nrql.as_ref_option().unwrap();
        assert!(nrql.evaluation_offset.is_unknown());

        let critical = state.critical.as_ref_option().unwrap();
        assert_eq!(critical.operator.as_str(), "equals");
        assert_eq!(critical.threshold_occurrences.as_str(), "all");
        assert!(critical.threshold_duration.is_unknown());
        assert!(state.warning.is_null());
    }

    #[test]
    fn deprecated_attributes() {
        let mut state = NrqlConditionState {
            condition_type: Value::Value(Cow::Borrowed("Outlier")),
            violation_time_limit: Value::Value(Cow::Borrowed("ONE_HOUR")),
            nrql: Value::Value(NrqlState {
                query: Value::Value(Cow::Borrowed("SELECT 1")),
                since_value: Value::Value(Cow::Borrowed("5")),
                ..Default::default()
            }),
            term: Value::Value(vec![Value::Value(TermState {
                duration: Value::Value(5),
                threshold: Value::Value(1.0),
                time_function: Value::Value(Cow::Borrowed("all")),
                ..Default::default()
            })]),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());

        assert_eq!(state.condition_type.as_str(), "Outlier");
        assert_eq!(state.violation_time_limit_seconds, Value::Value(3600));
        assert!(state.value_function.is_null());
        assert_eq!(state.open_violation_on_group_overlap, Value::Value(false));
        assert_eq!(
            state.nrql.as_ref_option().unwrap().evaluation_offset,
            Value::Value(5)
        );

        let term = state.term.iter().flatten().next().unwrap().as_ref_option().unwrap();
        assert_eq!(term.operator.as_str(), "equals");
        assert_eq!(term.priority.as_str(), "critical");
    }
}
