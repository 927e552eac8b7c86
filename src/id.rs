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

//! Resource identifiers
//!
//! New Relic identifies objects with integers. Terraform stores them as
//! strings, and objects that live under another one use a `:` separated
//! composite identifier (`<policy_id>:<condition_id>`).

use std::num::ParseIntError;

use tf_provider::value::ValueString;
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::DisplayJoinable;

/// Parse the `id` attribute of a resource state
pub(crate) fn parse_id(diags: &mut Diagnostics, id: &ValueString) -> Option<i64> {
    match id.as_str().parse::<i64>() {
        Ok(id) => Some(id),
        Err(err) => {
            diags.error(
                "Invalid resource ID",
                format!("`{}` is not a numeric ID: {err}", id.as_str()),
                AttributePath::new("id"),
            );
            None
        }
    }
}

/// Split a composite identifier and parse each part
pub(crate) fn parse_hashed_ids(id: &str) -> Result<Vec<i64>, ParseIntError> {
    id.split(':').map(|part| part.parse::<i64>()).collect()
}

pub(crate) fn serialize_hashed_ids(ids: &[i64]) -> String {
    ids.iter().join_with(":").to_string()
}

/// Parse a composite identifier made of exactly `N` integers
pub(crate) fn parse_composite_id<const N: usize>(
    diags: &mut Diagnostics,
    id: &ValueString,
) -> Option<[i64; N]> {
    let raw = id.as_str();
    let parsed = match parse_hashed_ids(raw) {
        Ok(ids) => <[i64; N]>::try_from(ids).map_err(|ids| {
            format!("expected {N} `:` separated parts, found {}", ids.len())
        }),
        Err(err) => Err(err.to_string()),
    };
    match parsed {
        Ok(ids) => Some(ids),
        Err(err) => {
            diags.error(
                "Invalid resource ID",
                format!("`{raw}` is not a valid composite ID: {err}"),
                AttributePath::new("id"),
            );
            None
        }
    }
}
