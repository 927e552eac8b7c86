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
use std::cell::RefCell;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::Diagnostics;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

pub(crate) trait WithValidate {
    fn validate(&self, diags: &mut Diagnostics);
}

pub(crate) trait WithNormalize {
    fn normalize(&mut self, diags: &mut Diagnostics);
}

pub(crate) fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

/// Report a failed API call into the diagnostics
pub(crate) trait ReportDiagnostics<T> {
    fn report(self, diags: &mut Diagnostics, summary: &'static str) -> Option<T>;
}

impl<T, E: std::fmt::Display> ReportDiagnostics<T> for Result<T, E> {
    fn report(self, diags: &mut Diagnostics, summary: &'static str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                diags.root_error(summary, err.to_string());
                None
            }
        }
    }
}

/// Empty API strings are stored as null so unset optional attributes do not diff
pub(crate) fn optional_string<'a>(value: impl Into<Option<String>>) -> ValueString<'a> {
    match value.into() {
        Some(s) if !s.is_empty() => Value::Value(Cow::Owned(s)),
        _ => Value::Null,
    }
}

/// Keep the configured spelling of an enum value when the API echoes it back
/// with another case.
pub(crate) fn preserve_case<'a>(previous: &ValueString<'a>, remote: &str) -> ValueString<'a> {
    match previous {
        Value::Value(prev) if prev.eq_ignore_ascii_case(remote) => Value::Value(prev.clone()),
        _ if remote.is_empty() => Value::Null,
        _ => Value::Value(Cow::Owned(remote.to_ascii_lowercase())),
    }
}

/// Set `value` to unknown when it is null: the API fills it on apply
pub(crate) fn unknown_if_null<T>(value: &mut Value<T>) {
    if value.is_null() {
        *value = Value::Unknown;
    }
}

/// Set `value` to `default` when it is null
pub(crate) fn default_if_null<T>(value: &mut Value<T>, default: T) {
    if value.is_null() {
        *value = Value::Value(default);
    }
}

/// Clear a planned value the configuration leaves unset.
///
/// Terraform proposes the prior value of an optional computed attribute that
/// was removed from the configuration, normalizing afterwards restores its
/// default.
pub(crate) fn reset_if_unset<T, U>(value: &mut Value<T>, config: &Value<U>) {
    if config.is_null() {
        *value = Value::Null;
    }
}

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}
