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

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as Json;

use crate::utils::DisplayJoinable;

use super::{ApiError, ApiResult, NrqlConditionType};

const POLICY_FIELDS: &str = "accountId id incidentPreference name";

const CONDITION_FIELDS: &str = "id policyId type name enabled description runbookUrl \
nrql { query evaluationOffset } \
terms { operator priority threshold thresholdDuration thresholdOccurrences } \
violationTimeLimitSeconds \
expiration { closeViolationsOnExpiration expirationDuration openViolationOnExpiration } \
signal { aggregationWindow fillOption fillValue }";

pub(super) const POLICY_CREATE: &str = "mutation($accountId: Int!, $policy: AlertsPolicyInput!) { \
alertsPolicyCreate(accountId: $accountId, policy: $policy) { accountId id incidentPreference name } }";

pub(super) const POLICY_UPDATE: &str = "mutation($accountId: Int!, $id: ID!, $policy: AlertsPolicyUpdateInput!) { \
alertsPolicyUpdate(accountId: $accountId, id: $id, policy: $policy) { accountId id incidentPreference name } }";

pub(super) const POLICY_DELETE: &str = "mutation($accountId: Int!, $id: ID!) { \
alertsPolicyDelete(accountId: $accountId, id: $id) { id } }";

pub(super) const CONDITION_DELETE: &str = "mutation($accountId: Int!, $id: ID!) { \
alertsConditionDelete(accountId: $accountId, id: $id) { id } }";

pub(super) fn policy_get() -> String {
    format!(
        "query($accountId: Int!, $id: ID!) {{ actor {{ account(id: $accountId) {{ alerts {{ \
policy(id: $id) {{ {POLICY_FIELDS} }} }} }} }} }}"
    )
}

pub(super) fn policies_search() -> String {
    format!(
        "query($accountId: Int!, $cursor: String) {{ actor {{ account(id: $accountId) {{ alerts {{ \
policiesSearch(cursor: $cursor) {{ nextCursor totalCount policies {{ {POLICY_FIELDS} }} }} }} }} }} }}"
    )
}

/// Fields only some condition kinds carry
fn specific_fields(kind: NrqlConditionType) -> &'static str {
    match kind {
        NrqlConditionType::Static => "valueFunction",
        NrqlConditionType::Baseline => "baselineDirection",
        NrqlConditionType::Outlier => "expectedGroups openViolationOnGroupOverlap",
    }
}

pub(super) fn condition_get() -> String {
    let fragments = [
        NrqlConditionType::Static,
        NrqlConditionType::Baseline,
        NrqlConditionType::Outlier,
    ]
    .iter()
    .map(|kind| {
        format!(
            "... on AlertsNrql{}Condition {{ {} }}",
            kind.graphql_name(),
            specific_fields(*kind)
        )
    })
    .join_with(" ")
    .to_string();

    format!(
        "query($accountId: Int!, $id: ID!) {{ actor {{ account(id: $accountId) {{ alerts {{ \
nrqlCondition(id: $id) {{ {CONDITION_FIELDS} {fragments} }} }} }} }} }}"
    )
}

pub(super) fn condition_create(kind: NrqlConditionType) -> (String, String) {
    let name = kind.graphql_name();
    let mutation = format!("alertsNrqlCondition{name}Create");
    let query = format!(
        "mutation($accountId: Int!, $policyId: ID!, $condition: AlertsNrqlCondition{name}Input!) {{ \
{mutation}(accountId: $accountId, policyId: $policyId, condition: $condition) {{ {CONDITION_FIELDS} {} }} }}",
        specific_fields(kind)
    );
    (query, mutation)
}

pub(super) fn condition_update(kind: NrqlConditionType) -> (String, String) {
    let name = kind.graphql_name();
    let mutation = format!("alertsNrqlCondition{name}Update");
    let query = format!(
        "mutation($accountId: Int!, $id: ID!, $condition: AlertsNrqlConditionUpdate{name}Input!) {{ \
{mutation}(accountId: $accountId, id: $id, condition: $condition) {{ {CONDITION_FIELDS} {} }} }}",
        specific_fields(kind)
    );
    (query, mutation)
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Json>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Turn the response errors into an [`ApiError`]
    pub fn into_data(self) -> ApiResult<Json> {
        if !self.errors.is_empty() {
            let missing = self.errors.iter().any(|err| {
                let message = err.message.to_ascii_lowercase();
                message.contains("not found") || message.contains("does not exist")
            });
            if missing {
                return Err(ApiError::NotFound);
            }
            let messages = self.errors.iter().map(|err| &err.message).join_with("; ");
            return Err(ApiError::GraphQl(messages.to_string()));
        }
        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(ApiError::GraphQl("empty response".into())),
        }
    }
}

/// Decode the object found at `path` within `data`.
///
/// A null or missing object means the requested entity does not exist.
pub(super) fn extract<T: DeserializeOwned>(mut data: Json, path: &[&str]) -> ApiResult<T> {
    for key in path {
        data = match data {
            Json::Object(mut object) => object.remove(*key).unwrap_or(Json::Null),
            _ => Json::Null,
        };
        if data.is_null() {
            return Err(ApiError::NotFound);
        }
    }
    Ok(serde_json::from_value(data)?)
}
