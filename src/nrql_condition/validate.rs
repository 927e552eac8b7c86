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

use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::client::NrqlConditionType;
use crate::utils::{DisplayJoinable, WithValidate};
use crate::validate::{conflicts_with, int_between, string_in_slice};

use super::state::{
    NrqlConditionState, ThresholdState, BASELINE_DIRECTIONS, FILL_OPTIONS, OPERATORS, PRIORITIES,
    THRESHOLD_OCCURRENCES, TIME_FUNCTIONS, VALUE_FUNCTIONS, VIOLATION_TIME_LIMITS,
};

/// Accepted `threshold_duration` range, in seconds
fn threshold_duration_range(kind: NrqlConditionType) -> (i64, i64) {
    match kind {
        NrqlConditionType::Static => (60, 86400),
        NrqlConditionType::Baseline | NrqlConditionType::Outlier => (120, 3600),
    }
}

impl ThresholdState<'_> {
    fn validate(
        &self,
        diags: &mut Diagnostics,
        kind: Option<NrqlConditionType>,
        path: AttributePath,
    ) {
        string_in_slice(
            diags,
            &self.operator,
            &OPERATORS,
            true,
            path.clone().attribute("operator"),
        );
        string_in_slice(
            diags,
            &self.threshold_occurrences,
            &THRESHOLD_OCCURRENCES,
            true,
            path.clone().attribute("threshold_occurrences"),
        );
        if let Some(kind) = kind {
            let (min, max) = threshold_duration_range(kind);
            int_between(
                diags,
                &self.threshold_duration,
                min,
                max,
                path.attribute("threshold_duration"),
            );
        }
    }
}

impl NrqlConditionState<'_> {
    /// Attributes reserved to one condition type
    fn validate_kind(&self, diags: &mut Diagnostics, kind: NrqlConditionType) {
        let mut only_for = |set: bool, name: &'static str, expected: NrqlConditionType| {
            if set && kind != expected {
                diags.error(
                    "Invalid attribute for condition type",
                    format!(
                        "`{name}` is only valid for {} conditions, not {}",
                        expected.as_str(),
                        kind.as_str()
                    ),
                    AttributePath::new(name),
                );
            }
        };
        only_for(
            !self.value_function.is_null(),
            "value_function",
            NrqlConditionType::Static,
        );
        only_for(
            !self.baseline_direction.is_null(),
            "baseline_direction",
            NrqlConditionType::Baseline,
        );
        only_for(
            !self.expected_groups.is_null(),
            "expected_groups",
            NrqlConditionType::Outlier,
        );
        only_for(
            !self.open_violation_on_group_overlap.is_null(),
            "open_violation_on_group_overlap",
            NrqlConditionType::Outlier,
        );

        let mut required = |missing: bool, name: &'static str| {
            if missing {
                diags.error(
                    "Missing required argument",
                    format!(
                        "`{name}` is required for {} conditions",
                        kind.as_str()
                    ),
                    AttributePath::new(name),
                );
            }
        };
        match kind {
            NrqlConditionType::Baseline => {
                required(self.baseline_direction.is_null(), "baseline_direction")
            }
            NrqlConditionType::Outlier => {
                required(self.expected_groups.is_null(), "expected_groups")
            }
            NrqlConditionType::Static => (),
        }
    }

    fn validate_terms(&self, diags: &mut Diagnostics, kind: Option<NrqlConditionType>) {
        let terms = self.term.as_ref_option().map(Vec::as_slice).unwrap_or_default();

        if !terms.is_empty() {
            conflicts_with(diags, &self.term, &self.critical, "term", "critical");
            conflicts_with(diags, &self.term, &self.warning, "term", "warning");
        }

        for (i, term) in terms.iter().enumerate() {
            let Value::Value(term) = term else {
                continue;
            };
            let path = AttributePath::new("term").index(i as i64);
            int_between(diags, &term.duration, 1, 120, path.clone().attribute("duration"));
            string_in_slice(
                diags,
                &term.operator,
                &OPERATORS,
                true,
                path.clone().attribute("operator"),
            );
            string_in_slice(
                diags,
                &term.priority,
                &PRIORITIES,
                true,
                path.clone().attribute("priority"),
            );
            string_in_slice(
                diags,
                &term.time_function,
                &TIME_FUNCTIONS,
                true,
                path.attribute("time_function"),
            );
        }

        for (threshold, name) in [(&self.critical, "critical"), (&self.warning, "warning")] {
            if let Value::Value(threshold) = threshold {
                threshold.validate(diags, kind, AttributePath::new(name).index(0));
            }
        }

        let critical_term = terms.iter().any(|term| match term {
            Value::Value(term) => match &term.priority {
                Value::Value(priority) => priority.eq_ignore_ascii_case("critical"),
                Value::Null => true,
                Value::Unknown => true,
            },
            _ => true,
        });
        if self.critical.is_null() && !critical_term {
            diags.root_error(
                "Missing critical threshold",
                "One of `critical` or a `term` with priority `critical` must be configured.",
            );
        }
    }
}

impl WithValidate for NrqlConditionState<'_> {
    fn validate(&self, diags: &mut Diagnostics) {
        string_in_slice(
            diags,
            &self.condition_type,
            &NrqlConditionType::ALL,
            true,
            AttributePath::new("type"),
        );
        string_in_slice(
            diags,
            &self.value_function,
            &VALUE_FUNCTIONS,
            true,
            AttributePath::new("value_function"),
        );
        string_in_slice(
            diags,
            &self.baseline_direction,
            &BASELINE_DIRECTIONS,
            true,
            AttributePath::new("baseline_direction"),
        );
        string_in_slice(
            diags,
            &self.fill_option,
            &FILL_OPTIONS,
            true,
            AttributePath::new("fill_option"),
        );

        let limits = VIOLATION_TIME_LIMITS.map(|(name, _)| name);
        string_in_slice(
            diags,
            &self.violation_time_limit,
            &limits,
            true,
            AttributePath::new("violation_time_limit"),
        );
        conflicts_with(
            diags,
            &self.violation_time_limit,
            &self.violation_time_limit_seconds,
            "violation_time_limit",
            "violation_time_limit_seconds",
        );
        int_between(
            diags,
            &self.violation_time_limit_seconds,
            300,
            2592000,
            AttributePath::new("violation_time_limit_seconds"),
        );
        int_between(
            diags,
            &self.aggregation_window,
            30,
            900,
            AttributePath::new("aggregation_window"),
        );
        int_between(
            diags,
            &self.expiration_duration,
            30,
            172800,
            AttributePath::new("expiration_duration"),
        );

        if let Value::Value(nrql) = &self.nrql {
            if let Value::Value(since) = &nrql.since_value {
                let valid = since.trim().parse::<i64>().is_ok_and(|v| (1..=20).contains(&v));
                if !valid {
                    diags.error(
                        "Invalid value",
                        format!(
                            "`since_value` must be one of [{}], got `{since}`",
                            (1..=20).join_with(", ")
                        ),
                        AttributePath::new("nrql").attribute("since_value"),
                    );
                }
                if !nrql.evaluation_offset.is_null() {
                    diags.error(
                        "Conflicting configuration arguments",
                        "`since_value` conflicts with `evaluation_offset`",
                        AttributePath::new("nrql").attribute("since_value"),
                    );
                }
            }
        }

        let kind = self.kind();
        if let Some(kind) = kind {
            self.validate_kind(diags, kind);
        }
        self.validate_terms(diags, kind);
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::nrql_condition::state::{NrqlState, TermState};

    fn text(s: &'static str) -> tf_provider::value::ValueString<'static> {
        Value::Value(Cow::Borrowed(s))
    }

    fn base(kind: &'static str) -> NrqlConditionState<'static> {
        NrqlConditionState {
            policy_id: Value::Value(1),
            name: text("cpu"),
            condition_type: text(kind),
            nrql: Value::Value(NrqlState {
                query: text("SELECT average(cpuPercent) FROM SystemSample"),
                ..Default::default()
            }),
            critical: Value::Value(ThresholdState {
                operator: text("above"),
                threshold: Value::Value(90.0),
                threshold_duration: Value::Value(300),
                threshold_occurrences: text("ALL"),
            }),
            ..Default::default()
        }
    }

    fn errors(state: &NrqlConditionState) -> usize {
        let mut diags = Diagnostics::default();
        state.validate(&mut diags);
        diags.errors.len()
    }

    #[test]
    fn valid_static_condition() {
        assert_eq!(errors(&base("static")), 0);
        assert_eq!(errors(&base("STATIC")), 0);
    }

    #[test]
    fn threshold_duration_depends_on_type() {
        let mut state = base("baseline");
        state.baseline_direction = text("lower_only");
        assert_eq!(errors(&state), 0);

        for duration in [60, 7200] {
            if let Value::Value(critical) = &mut state.critical {
                critical.threshold_duration = Value::Value(duration);
            }
            assert_eq!(errors(&state), 1, "duration {duration}");
        }

        let mut state = base("static");
        if let Value::Value(critical) = &mut state.critical {
            critical.threshold_duration = Value::Value(60);
        }
        assert_eq!(errors(&state), 0);
    }

    #[test]
    fn type_specific_attributes() {
        let mut state = base("baseline");
        assert_eq!(errors(&state), 1);

        state.baseline_direction = text("upper_only");
        state.value_function = text("sum");
        assert_eq!(errors(&state), 1);

        let mut state = base("outlier");
        state.expected_groups = Value::Value(2);
        state.open_violation_on_group_overlap = Value::Value(true);
        assert_eq!(errors(&state), 0);
    }

    #[test]
    fn term_conflicts_with_critical() {
        let term = TermState {
            duration: Value::Value(5),
            operator: text("above"),
            priority: text("critical"),
            threshold: Value::Value(1.0),
            time_function: text("all"),
        };

        let mut state = base("static");
        state.term = Value::Value(vec![Value::Value(term.clone())]);
        assert_eq!(errors(&state), 1);

        state.critical = Value::Null;
        assert_eq!(errors(&state), 0);

        state.term = Value::Value(vec![Value::Value(TermState {
            priority: text("warning"),
            ..term
        })]);
        assert_eq!(errors(&state), 1);

        state.term = Value::Value(vec![]);
        assert_eq!(errors(&state), 1);
    }

    #[test]
    fn deprecated_arguments() {
        let mut state = base("static");
        state.violation_time_limit = text("one_hour");
        assert_eq!(errors(&state), 0);

        state.violation_time_limit_seconds = Value::Value(3600);
        assert_eq!(errors(&state), 1);

        let mut state = base("static");
        if let Value::Value(nrql) = &mut state.nrql {
            nrql.since_value = text("21");
        }
        assert_eq!(errors(&state), 1);
    }

    #[test]
    fn ranges() {
        let mut state = base("static");
        state.aggregation_window = Value::Value(15);
        state.expiration_duration = Value::Value(172801);
        state.violation_time_limit_seconds = Value::Value(299);
        assert_eq!(errors(&state), 3);
    }
}
