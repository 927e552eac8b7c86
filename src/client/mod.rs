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

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tf_provider::value::{Value, ValueNumber};
use tf_provider::{AttributePath, Diagnostics};

mod http;
mod nerdgraph;
pub mod types;

pub use http::NewRelicClient;
pub use types::{
    AlertsIncidentPreference, AlertsPoliciesSearchResultSet, AlertsPolicy, AlertsPolicyInput,
    Dashboard, DashboardMetadata, DashboardWidget, DashboardWidgetData, DashboardWidgetLayout,
    DashboardWidgetPresentation, NrqlCondition, NrqlConditionExpiration, NrqlConditionInput,
    NrqlConditionQuery, NrqlConditionSignal, NrqlConditionTerm, NrqlConditionType,
    SyntheticsMonitor, SyntheticsMonitorList, SyntheticsMonitorOptions,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("NerdGraph error: {0}")]
    GraphQl(String),

    #[error("could not decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("the created monitor has no Location header")]
    MissingLocation,
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Authenticated access to the New Relic REST, Synthetics and NerdGraph APIs
#[async_trait]
pub trait Api: Send + Sync + 'static {
    /// Account used when a resource does not set its own `account_id`
    fn account_id(&self) -> Option<i64>;

    async fn create_dashboard(&self, dashboard: &Dashboard) -> ApiResult<Dashboard>;
    async fn get_dashboard(&self, id: i64) -> ApiResult<Dashboard>;
    async fn update_dashboard(&self, dashboard: &Dashboard) -> ApiResult<Dashboard>;
    async fn delete_dashboard(&self, id: i64) -> ApiResult<()>;

    async fn create_policy(
        &self,
        account_id: i64,
        policy: &AlertsPolicyInput,
    ) -> ApiResult<AlertsPolicy>;
    async fn get_policy(&self, account_id: i64, id: i64) -> ApiResult<AlertsPolicy>;
    async fn update_policy(
        &self,
        account_id: i64,
        id: i64,
        policy: &AlertsPolicyInput,
    ) -> ApiResult<AlertsPolicy>;
    async fn delete_policy(&self, account_id: i64, id: i64) -> ApiResult<()>;
    /// One page of the account's policies, starting at `cursor`
    async fn search_policies(
        &self,
        account_id: i64,
        cursor: Option<String>,
    ) -> ApiResult<AlertsPoliciesSearchResultSet>;

    async fn create_nrql_condition(
        &self,
        account_id: i64,
        policy_id: i64,
        condition_type: NrqlConditionType,
        condition: &NrqlConditionInput,
    ) -> ApiResult<NrqlCondition>;
    async fn get_nrql_condition(&self, account_id: i64, id: i64) -> ApiResult<NrqlCondition>;
    async fn update_nrql_condition(
        &self,
        account_id: i64,
        id: i64,
        condition_type: NrqlConditionType,
        condition: &NrqlConditionInput,
    ) -> ApiResult<NrqlCondition>;
    async fn delete_condition(&self, account_id: i64, id: i64) -> ApiResult<()>;

    async fn create_monitor(&self, monitor: &SyntheticsMonitor) -> ApiResult<SyntheticsMonitor>;
    async fn get_monitor(&self, id: &str) -> ApiResult<SyntheticsMonitor>;
    async fn update_monitor(&self, monitor: &SyntheticsMonitor) -> ApiResult<SyntheticsMonitor>;
    async fn delete_monitor(&self, id: &str) -> ApiResult<()>;
    /// Monitors `offset..offset + limit`
    async fn list_monitors(&self, offset: i64, limit: i64) -> ApiResult<SyntheticsMonitorList>;
}

/// Client shared between the provider and its resources.
///
/// Resources are instantiated when the plugin starts, the client only exists
/// once Terraform has sent the provider configuration.
pub struct ClientSlot<T>(Arc<RwLock<Option<Arc<T>>>>);

impl<T> Clone for ClientSlot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for ClientSlot<T> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<T> std::fmt::Debug for ClientSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = self.0.read().map(|c| c.is_some()).unwrap_or(false);
        f.debug_struct("ClientSlot")
            .field("configured", &configured)
            .finish()
    }
}

impl<T: Api> ClientSlot<T> {
    pub fn set(&self, diags: &mut Diagnostics, client: T) -> Option<()> {
        match self.0.write() {
            Ok(mut slot) => {
                *slot = Some(Arc::new(client));
                Some(())
            }
            Err(_) => {
                diags.root_error_short("New Relic client lock is poisoned");
                None
            }
        }
    }

    pub fn get(&self, diags: &mut Diagnostics) -> Option<Arc<T>> {
        match self.0.read() {
            Ok(slot) => {
                if let Some(client) = slot.as_ref() {
                    Some(client.clone())
                } else {
                    diags.root_error(
                        "Provider not configured",
                        "The New Relic client is used before the provider has been configured.",
                    );
                    None
                }
            }
            Err(_) => {
                diags.root_error_short("New Relic client lock is poisoned");
                None
            }
        }
    }
}

/// Account of a NerdGraph resource: its own `account_id`, or the provider one
pub(crate) fn resolve_account_id<T: Api>(
    diags: &mut Diagnostics,
    client: &T,
    account_id: &ValueNumber,
) -> Option<i64> {
    match account_id {
        Value::Value(id) => Some(*id),
        _ => match client.account_id() {
            Some(id) => Some(id),
            None => {
                diags.error(
                    "Missing New Relic account ID",
                    "Set `account_id` on the resource, or on the provider block (env NEWRELIC_ACCOUNT_ID).",
                    AttributePath::new("account_id"),
                );
                None
            }
        },
    }
}
