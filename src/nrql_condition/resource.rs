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

use async_trait::async_trait;
use tracing::info;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::client::{resolve_account_id, Api, ApiError, ClientSlot, NrqlConditionType};
use crate::id::{parse_composite_id, serialize_hashed_ids};
use crate::utils::{unknown_if_null, ReportDiagnostics, WithNormalize, WithSchema, WithValidate};

use super::state::NrqlConditionState;

#[derive(Debug)]
pub struct NrqlConditionResource<T: Api> {
    pub(super) client: ClientSlot<T>,
}

impl<T: Api> NrqlConditionResource<T> {
    pub fn new(client: ClientSlot<T>) -> Self {
        Self { client }
    }
}

fn parse_import_id(id: &str) -> Option<(i64, i64, Option<NrqlConditionType>)> {
    let mut parts = id.splitn(3, ':');
    let policy_id = parts.next()?.parse().ok()?;
    let condition_id = parts.next()?.parse().ok()?;
    let kind = match parts.next() {
        Some(kind) => Some(kind.parse().ok()?),
        None => None,
    };
    Some((policy_id, condition_id, kind))
}

fn same_kind(a: &NrqlConditionState, b: &NrqlConditionState) -> bool {
    a.condition_type.as_str().eq_ignore_ascii_case(b.condition_type.as_str())
}

#[async_trait]
impl<T: Api> Resource for NrqlConditionResource<T> {
    type State<'a> = NrqlConditionState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(NrqlConditionState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let [policy_id, condition_id] = parse_composite_id::<2>(diags, &state.id)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &state.account_id)?;

        match client.get_nrql_condition(account_id, condition_id).await {
            Ok(condition) => {
                let state = NrqlConditionState::flatten(diags, account_id, &condition, &state)?;
                Some((state, private_state))
            }
            Err(ApiError::NotFound) => {
                info!("NRQL condition {condition_id} of policy {policy_id} not found, removing it from state");
                None
            }
            Err(err) => {
                diags.root_error("Failed to read NRQL alert condition", err.to_string());
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = Value::Unknown;
        unknown_if_null(&mut state.account_id);
        state.normalize(diags);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut state = proposed_state;
        state.id = prior_state.id.clone();
        state.reset_unset(&config_state);
        state.normalize(diags);
        if state.account_id.is_null() {
            state.account_id = prior_state.account_id;
        }

        let mut trigger_replace = Vec::new();
        if state.account_id != prior_state.account_id {
            trigger_replace.push(AttributePath::new("account_id"));
        }
        if state.policy_id != prior_state.policy_id {
            trigger_replace.push(AttributePath::new("policy_id"));
        }
        if !same_kind(&state, &prior_state) {
            trigger_replace.push(AttributePath::new("type"));
        }
        if !trigger_replace.is_empty() {
            state.id = Value::Unknown;
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(Default::default())
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &config_state.account_id)?;
        let Value::Value(policy_id) = planned_state.policy_id else {
            diags.error_short("Missing policy ID", AttributePath::new("policy_id"));
            return None;
        };
        let (kind, condition) = planned_state.expand(diags)?;

        let created = client
            .create_nrql_condition(account_id, policy_id, kind, &condition)
            .await
            .report(diags, "Failed to create NRQL alert condition")?;

        let state = NrqlConditionState::flatten(diags, account_id, &created, &planned_state)?;
        Some((state, planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let [_, condition_id] = parse_composite_id::<2>(diags, &prior_state.id)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &prior_state.account_id)?;
        let (kind, condition) = planned_state.expand(diags)?;

        let updated = client
            .update_nrql_condition(account_id, condition_id, kind, &condition)
            .await
            .report(diags, "Failed to update NRQL alert condition")?;

        let state = NrqlConditionState::flatten(diags, account_id, &updated, &planned_state)?;
        Some((state, planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let [_, condition_id] = parse_composite_id::<2>(diags, &prior_state.id)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &prior_state.account_id)?;

        match client.delete_condition(account_id, condition_id).await {
            Ok(()) | Err(ApiError::NotFound) => Some(()),
            Err(err) => {
                diags.root_error("Failed to delete NRQL alert condition", err.to_string());
                None
            }
        }
    }

    /// Import id is `<policy_id>:<condition_id>`, optionally followed by `:<type>`
    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some((policy_id, condition_id, kind)) = parse_import_id(&id) else {
            diags.root_error(
                "Invalid import ID",
                format!("expected `<policy_id>:<condition_id>[:<type>]`, got `{id}`"),
            );
            return None;
        };

        let state = NrqlConditionState {
            id: Value::Value(Cow::Owned(serialize_hashed_ids(&[policy_id, condition_id]))),
            policy_id: Value::Value(policy_id),
            condition_type: kind
                .map(|kind| Cow::Borrowed(kind.as_str()))
                .into(),
            ..Default::default()
        };

        Some((state, Default::default()))
    }
}
