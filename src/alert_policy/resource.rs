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

use crate::client::{resolve_account_id, Api, ApiError, ClientSlot};
use crate::id::{parse_hashed_ids, parse_id};
use crate::utils::{
    reset_if_unset, unknown_if_null, ReportDiagnostics, WithNormalize, WithSchema, WithValidate,
};

use super::state::AlertPolicyState;

#[derive(Debug)]
pub struct AlertPolicyResource<T: Api> {
    pub(super) client: ClientSlot<T>,
}

impl<T: Api> AlertPolicyResource<T> {
    pub fn new(client: ClientSlot<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Api> Resource for AlertPolicyResource<T> {
    type State<'a> = AlertPolicyState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(AlertPolicyState::schema())
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
        let id = parse_id(diags, &state.id)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &state.account_id)?;

        match client.get_policy(account_id, id).await {
            Ok(policy) => Some((AlertPolicyState::flatten(&policy), private_state)),
            // A null state tells Terraform the policy is gone
            Err(ApiError::NotFound) => {
                info!("Alert policy {id} not found, removing it from state");
                None
            }
            Err(err) => {
                diags.root_error("Failed to read alert policy", err.to_string());
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
        reset_if_unset(&mut state.incident_preference, &config_state.incident_preference);
        state.normalize(diags);
        if state.account_id.is_null() {
            state.account_id = prior_state.account_id;
        }

        let mut trigger_replace = Vec::new();
        if state.account_id != prior_state.account_id {
            trigger_replace.push(AttributePath::new("account_id"));
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
        let policy = planned_state.expand(diags)?;

        let created = client
            .create_policy(account_id, &policy)
            .await
            .report(diags, "Failed to create alert policy")?;

        Some((AlertPolicyState::flatten(&created), planned_private_state))
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
        let id = parse_id(diags, &prior_state.id)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &prior_state.account_id)?;
        let policy = planned_state.expand(diags)?;

        let updated = client
            .update_policy(account_id, id, &policy)
            .await
            .report(diags, "Failed to update alert policy")?;

        Some((AlertPolicyState::flatten(&updated), planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let id = parse_id(diags, &prior_state.id)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &prior_state.account_id)?;

        match client.delete_policy(account_id, id).await {
            Ok(()) | Err(ApiError::NotFound) => Some(()),
            Err(err) => {
                diags.root_error("Failed to delete alert policy", err.to_string());
                None
            }
        }
    }

    /// Import id is `<policy_id>` or `<policy_id>:<account_id>`
    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let ids = match parse_hashed_ids(&id) {
            Ok(ids) if ids.len() <= 2 => ids,
            _ => {
                diags.root_error(
                    "Invalid import ID",
                    format!("expected `<policy_id>` or `<policy_id>:<account_id>`, got `{id}`"),
                );
                return None;
            }
        };

        let state = AlertPolicyState {
            id: Value::Value(Cow::Owned(ids[0].to_string())),
            account_id: ids.get(1).copied().into(),
            ..Default::default()
        };

        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{configured_slot, ACCOUNT_ID};

    fn config(name: &'static str) -> AlertPolicyState<'static> {
        AlertPolicyState {
            name: Value::Value(Cow::Borrowed(name)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn lifecycle() {
        let (slot, api) = configured_slot();
        let resource = AlertPolicyResource::new(slot);
        let mut diags = Diagnostics::default();

        let (planned, _) = resource
            .plan_create(&mut diags, config("ops"), config("ops"), Default::default())
            .await
            .unwrap();
        assert!(planned.account_id.is_unknown());
        assert_eq!(planned.incident_preference.as_str(), "PER_POLICY");

        let (state, _) = resource
            .create(
                &mut diags,
                planned,
                config("ops"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(state.account_id, Value::Value(ACCOUNT_ID));
        assert_eq!(state.incident_preference.as_str(), "PER_POLICY");

        let mut renamed = config("ops-renamed");
        renamed.incident_preference = Value::Value(Cow::Borrowed("PER_CONDITION"));
        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                state.clone(),
                renamed.clone(),
                renamed.clone(),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
        let (updated, _) = resource
            .update(
                &mut diags,
                state.clone(),
                planned,
                renamed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, state.id);
        assert_eq!(updated.name.as_str(), "ops-renamed");
        assert_eq!(updated.incident_preference.as_str(), "PER_CONDITION");

        let (read, _) = resource
            .read(&mut diags, updated.clone(), Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(read, updated);

        resource
            .destroy(&mut diags, updated.clone(), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(api.store().policies.is_empty());

        let gone = resource
            .read(&mut diags, updated, Default::default(), Default::default())
            .await;
        assert!(gone.is_none());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn removed_preference_restores_default() {
        let (slot, api) = configured_slot();
        let resource = AlertPolicyResource::new(slot);
        let mut diags = Diagnostics::default();

        let mut per_condition = config("ops");
        per_condition.incident_preference = Value::Value(Cow::Borrowed("PER_CONDITION"));
        let (planned, _) = resource
            .plan_create(&mut diags, per_condition.clone(), per_condition.clone(), Default::default())
            .await
            .unwrap();
        let (state, _) = resource
            .create(
                &mut diags,
                planned,
                per_condition,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                state.clone(),
                state.clone(),
                config("ops"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
        assert_eq!(planned.incident_preference.as_str(), "PER_POLICY");

        let (updated, _) = resource
            .update(
                &mut diags,
                state,
                planned.clone(),
                config("ops"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(updated, planned);
        let stored: Vec<_> = api
            .store()
            .policies
            .values()
            .map(|policy| policy.incident_preference.as_str())
            .collect();
        assert_eq!(stored, ["PER_POLICY"]);
    }

    #[tokio::test]
    async fn moving_account_replaces() {
        let (slot, _) = configured_slot();
        let resource = AlertPolicyResource::new(slot);
        let mut diags = Diagnostics::default();

        let prior = AlertPolicyState {
            id: Value::Value(Cow::Borrowed("1")),
            account_id: Value::Value(ACCOUNT_ID),
            ..config("ops")
        };
        let moved = AlertPolicyState {
            account_id: Value::Value(42),
            ..config("ops")
        };
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior,
                moved.clone(),
                moved,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace, [AttributePath::new("account_id")]);
    }

    #[tokio::test]
    async fn import_ids() {
        let (slot, _) = configured_slot();
        let resource = AlertPolicyResource::new(slot);
        let mut diags = Diagnostics::default();

        let (state, _) = resource.import(&mut diags, "12".into()).await.unwrap();
        assert_eq!(state.id.as_str(), "12");
        assert!(state.account_id.is_null());

        let (state, _) = resource.import(&mut diags, "12:34".into()).await.unwrap();
        assert_eq!(state.account_id, Value::Value(34));

        assert!(resource.import(&mut diags, "1:2:3".into()).await.is_none());
        assert!(resource.import(&mut diags, "policy".into()).await.is_none());
        assert_eq!(diags.errors.len(), 2);
    }
}
