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
use crate::id::parse_id;
use crate::utils::{reset_if_unset, ReportDiagnostics, WithNormalize, WithSchema, WithValidate};

use super::state::DashboardState;

#[derive(Debug)]
pub struct DashboardResource<T: Api> {
    pub(super) client: ClientSlot<T>,
}

impl<T: Api> DashboardResource<T> {
    pub fn new(client: ClientSlot<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Api> Resource for DashboardResource<T> {
    type State<'a> = DashboardState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DashboardState::schema())
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

        match client.get_dashboard(id).await {
            Ok(dashboard) => Some((DashboardState::flatten(&dashboard), private_state)),
            // A null state tells Terraform the dashboard is gone
            Err(ApiError::NotFound) => {
                info!("Dashboard {id} not found, removing it from state");
                None
            }
            Err(err) => {
                diags.root_error("Failed to read dashboard", err.to_string());
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
        state.dashboard_url = Value::Unknown;
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
        state.dashboard_url = prior_state.dashboard_url;
        reset_if_unset(&mut state.icon, &config_state.icon);
        reset_if_unset(&mut state.visibility, &config_state.visibility);
        reset_if_unset(&mut state.editable, &config_state.editable);
        // Widget sizes default again when removed
        state.widget = config_state.widget;
        state.normalize(diags);

        Some((state, prior_private_state, vec![]))
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
        let dashboard = planned_state.expand();

        let created = client
            .create_dashboard(&dashboard)
            .await
            .report(diags, "Failed to create dashboard")?;

        Some((DashboardState::flatten(&created), planned_private_state))
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
        let mut dashboard = planned_state.expand();
        dashboard.id = parse_id(diags, &prior_state.id)?;

        let updated = client
            .update_dashboard(&dashboard)
            .await
            .report(diags, "Failed to update dashboard")?;

        Some((DashboardState::flatten(&updated), planned_private_state))
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

        match client.delete_dashboard(id).await {
            Ok(()) | Err(ApiError::NotFound) => Some(()),
            Err(err) => {
                diags.root_error("Failed to delete dashboard", err.to_string());
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = DashboardState {
            id: Value::Value(Cow::Owned(id)),
            ..Default::default()
        };
        parse_id(diags, &state.id)?;

        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::state::WidgetState;
    use crate::testing::configured_slot;

    fn config(title: &'static str) -> DashboardState<'static> {
        DashboardState {
            title: Value::Value(Cow::Borrowed(title)),
            widget: Value::Value(
                [WidgetState {
                    title: Value::Value(Cow::Borrowed("Throughput")),
                    visualization: Value::Value(Cow::Borrowed("line_chart")),
                    row: Value::Value(1),
                    column: Value::Value(1),
                    nrql: Value::Value(Cow::Borrowed("SELECT count(*) FROM Transaction TIMESERIES")),
                    ..Default::default()
                }]
                .into_iter()
                .map(Value::Value)
                .collect(),
            ),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn lifecycle() {
        let (slot, api) = configured_slot();
        let resource = DashboardResource::new(slot);
        let mut diags = Diagnostics::default();

        let (planned, _) = resource
            .plan_create(&mut diags, config("Ops"), config("Ops"), Default::default())
            .await
            .unwrap();
        assert!(planned.id.is_unknown());
        assert_eq!(planned.icon.as_str(), "bar-chart");

        let (state, _) = resource
            .create(
                &mut diags,
                planned.clone(),
                config("Ops"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert!(state.dashboard_url.as_str().ends_with(state.id.as_str()));
        assert_eq!(
            DashboardState {
                id: Value::Unknown,
                dashboard_url: Value::Unknown,
                ..state.clone()
            },
            planned
        );

        let (read, _) = resource
            .read(&mut diags, state.clone(), Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(read, state);

        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                state.clone(),
                config("Ops v2"),
                config("Ops v2"),
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
                config("Ops v2"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, state.id);
        assert_eq!(updated.title.as_str(), "Ops v2");
        assert_eq!(updated.dashboard_url, state.dashboard_url);

        resource
            .destroy(&mut diags, updated.clone(), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(api.store().dashboards.is_empty());

        // Gone remotely: dropped from the state without error
        let gone = resource
            .read(&mut diags, updated.clone(), Default::default(), Default::default())
            .await;
        assert!(gone.is_none());
        assert!(diags.errors.is_empty());

        resource
            .destroy(&mut diags, updated, Default::default(), Default::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn removed_attributes_restore_defaults() {
        let (slot, api) = configured_slot();
        let resource = DashboardResource::new(slot);
        let mut diags = Diagnostics::default();

        let restricted = DashboardState {
            visibility: Value::Value(Cow::Borrowed("owner")),
            editable: Value::Value(Cow::Borrowed("read_only")),
            ..config("Ops")
        };
        let (planned, _) = resource
            .plan_create(&mut diags, restricted.clone(), restricted.clone(), Default::default())
            .await
            .unwrap();
        let (state, _) = resource
            .create(
                &mut diags,
                planned,
                restricted,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(state.visibility.as_str(), "owner");

        // Terraform proposes the prior values of the removed attributes
        let (planned, _, _) = resource
            .plan_update(
                &mut diags,
                state.clone(),
                state.clone(),
                config("Ops"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(planned.visibility.as_str(), "all");
        assert_eq!(planned.editable.as_str(), "editable_by_all");
        assert_eq!(planned.icon.as_str(), "bar-chart");
        for widget in planned.widget.as_ref_option().unwrap() {
            let widget = widget.as_ref_option().unwrap();
            assert_eq!((widget.width, widget.height), (Value::Value(1), Value::Value(1)));
        }

        let (updated, _) = resource
            .update(
                &mut diags,
                state.clone(),
                planned.clone(),
                config("Ops"),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(updated, planned);

        let id = state.id.as_str().parse::<i64>().unwrap();
        let stored = api.store().dashboards[&id].clone();
        assert_eq!(stored.visibility, "all");
        assert_eq!(stored.editable, "editable_by_all");
    }

    #[tokio::test]
    async fn import_requires_numeric_id() {
        let (slot, _) = configured_slot();
        let resource = DashboardResource::new(slot);

        let mut diags = Diagnostics::default();
        let (state, _) = resource.import(&mut diags, "129507".into()).await.unwrap();
        assert_eq!(state.id.as_str(), "129507");

        assert!(resource.import(&mut diags, "dash".into()).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn unconfigured_provider() {
        let resource = DashboardResource::<crate::testing::FakeApi>::new(Default::default());
        let mut diags = Diagnostics::default();
        let state = DashboardState {
            id: Value::Value(Cow::Borrowed("1")),
            ..config("Ops")
        };
        let read = resource
            .read(&mut diags, state, Default::default(), Default::default())
            .await;
        assert!(read.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
