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

//! Attribute constraints.
//!
//! Unknown and null values are accepted: they are checked again once known.

use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::DisplayJoinable;

pub(crate) fn string_in_slice(
    diags: &mut Diagnostics,
    value: &ValueString,
    allowed: &[&str],
    ignore_case: bool,
    path: AttributePath,
) {
    if let Value::Value(value) = value {
        let found = allowed.iter().any(|candidate| {
            if ignore_case {
                candidate.eq_ignore_ascii_case(value)
            } else {
                *candidate == &**value
            }
        });
        if !found {
            diags.error(
                "Invalid value",
                format!(
                    "expected one of [{}], got `{value}`",
                    allowed.iter().join_with(", ")
                ),
                path,
            );
        }
    }
}

pub(crate) fn int_between(
    diags: &mut Diagnostics,
    value: &ValueNumber,
    min: i64,
    max: i64,
    path: AttributePath,
) {
    if let Value::Value(value) = value {
        if !(min..=max).contains(value) {
            diags.error(
                "Value out of range",
                format!("expected to be in the range ({min} - {max}), got {value}"),
                path,
            );
        }
    }
}

pub(crate) fn int_in_slice(
    diags: &mut Diagnostics,
    value: &ValueNumber,
    allowed: &[i64],
    path: AttributePath,
) {
    if let Value::Value(value) = value {
        if !allowed.contains(value) {
            diags.error(
                "Invalid value",
                format!(
                    "expected one of [{}], got {value}",
                    allowed.iter().join_with(", ")
                ),
                path,
            );
        }
    }
}

/// Report `name` when it is set while `other` is set too
pub(crate) fn conflicts_with<T, U>(
    diags: &mut Diagnostics,
    value: &Value<T>,
    other: &Value<U>,
    name: &'static str,
    other_name: &'static str,
) {
    if !value.is_null() && !other.is_null() {
        diags.error(
            "Conflicting configuration arguments",
            format!("`{name}` conflicts with `{other_name}`"),
            AttributePath::new(name),
        );
    }
}
