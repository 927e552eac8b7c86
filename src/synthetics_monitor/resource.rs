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

use crate::client::{Api, ApiError, ClientSlot};
use crate::utils::{reset_if_unset, ReportDiagnostics, WithNormalize, WithSchema, WithValidate};

use super::state::SyntheticsMonitorState;

#[derive(Debug)]
pub struct SyntheticsMonitorResource<T: Api> {
    pub(super) client: ClientSlot<T>,
}

impl<T: Api> SyntheticsMonitorResource<T> {
    pub fn new(client: ClientSlot<T>) -> Self {
        Self { client }
    }
}

fn monitor_id<'b>(diags: &mut Diagnostics, state: &'b SyntheticsMonitorState) -> Option<&'b str> {
    match state.id.as_ref_option() {
        Some(id) if !id.is_empty() => Some(id),
        _ => {
            diags.error_short("Missing monitor ID", AttributePath::new("id"));
            None
        }
    }
}

#[async_trait]
impl<T: Api> Resource for SyntheticsMonitorResource<T> {
    type State<'a> = SyntheticsMonitorState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(SyntheticsMonitorState::schema())
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
        let id = monitor_id(diags, &state)?;

        match client.get_monitor(id).await {
            Ok(monitor) => Some((SyntheticsMonitorState::flatten(&monitor, &state), private_state)),
            // A null state tells Terraform the monitor is gone
            Err(ApiError::NotFound) => {
                info!("Synthetics monitor {id} not found, removing it from state");
                None
            }
            Err(err) => {
                diags.root_error("Failed to read synthetics monitor", err.to_string());
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
        state.id = prior_state.id;
        reset_if_unset(&mut state.sla_threshold, &config_state.sla_threshold);
        state.normalize(diags);

        let mut trigger_replace = Vec::new();
        if state.monitor_type != prior_state.monitor_type {
            trigger_replace.push(AttributePath::new("type"));
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
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let monitor = planned_state.expand();

        let created = client
            .create_monitor(&monitor)
            .await
            .report(diags, "Failed to create synthetics monitor")?;

        Some((
            SyntheticsMonitorState::flatten(&created, &planned_state),
            planned_private_state,
        ))
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
        let mut monitor = planned_state.expand();
        monitor.id = monitor_id(diags, &prior_state)?.to_string();

        let updated = client
            .update_monitor(&monitor)
            .await
            .report(diags, "Failed to update synthetics monitor")?;

        Some((
            SyntheticsMonitorState::flatten(&updated, &planned_state),
            planned_private_state,
        ))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let id = monitor_id(diags, &prior_state)?;

        match client.delete_monitor(id).await {
            Ok(()) | Err(ApiError::NotFound) => Some(()),
            Err(err) => {
                diags.root_error("Failed to delete synthetics monitor", err.to_string());
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = id.trim();
        if id.is_empty() || id.contains('/') {
            diags.root_error(
                "Invalid import ID",
                format!("expected the UUID of a monitor, got `{id}`"),
            );
            return None;
        }

        let state = SyntheticsMonitorState {
            id: Value::Value(Cow::Owned(id.to_string())),
            ..Default::default()
        };

        Some((state, Default::default()))
    }
}
