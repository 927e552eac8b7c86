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

//! In-memory New Relic account used by the resource tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;
use tf_provider::schema::Schema;
use tf_provider::Diagnostics;

use crate::client::{
    AlertsPoliciesSearchResultSet, AlertsPolicy, AlertsPolicyInput, Api, ApiError, ApiResult,
    ClientSlot, Dashboard, NrqlCondition, NrqlConditionInput, NrqlConditionType, SyntheticsMonitor,
    SyntheticsMonitorList,
};

pub(crate) const ACCOUNT_ID: i64 = 1234;

#[derive(Debug, Default)]
pub(crate) struct Store {
    next_id: i64,
    pub dashboards: BTreeMap<i64, Dashboard>,
    /// Keyed by `(account_id, policy_id)`
    pub policies: BTreeMap<(i64, i64), AlertsPolicy>,
    /// Keyed by `(account_id, condition_id)`
    pub conditions: BTreeMap<(i64, i64), NrqlCondition>,
    /// Keyed by UUID
    pub monitors: BTreeMap<String, SyntheticsMonitor>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug)]
pub(crate) struct FakeApi {
    account_id: Option<i64>,
    page_size: usize,
    store: Mutex<Store>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            account_id: Some(ACCOUNT_ID),
            page_size: 2,
            store: Default::default(),
        }
    }
}

impl FakeApi {
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    /// Values NerdGraph fills in when the input leaves them out
    fn with_server_defaults(mut input: NrqlConditionInput) -> NrqlConditionInput {
        input.nrql.evaluation_offset.get_or_insert(3);
        for term in &mut input.terms {
            term.threshold_duration.get_or_insert(60);
        }
        let signal = input.signal.get_or_insert_with(Default::default);
        signal.aggregation_window.get_or_insert(60);
        input
    }
}

/// Check the state serializes exactly the attributes and blocks of `schema`
pub(crate) fn assert_matches_schema<T: Serialize + Default>(schema: Schema) {
    let state = serde_json::to_value(T::default()).unwrap();
    let fields: BTreeSet<_> = state.as_object().unwrap().keys().cloned().collect();
    let declared: BTreeSet<_> = schema
        .block
        .attributes
        .into_keys()
        .chain(schema.block.blocks.into_keys())
        .collect();
    assert_eq!(fields, declared);
}

/// Slot already holding a fake client, and a handle on that client
pub(crate) fn configured_slot() -> (ClientSlot<FakeApi>, std::sync::Arc<FakeApi>) {
    let slot = ClientSlot::default();
    let mut diags = Diagnostics::default();
    slot.set(&mut diags, FakeApi::default()).unwrap();
    let api = slot.get(&mut diags).unwrap();
    (slot, api)
}

#[async_trait]
impl Api for FakeApi {
    fn account_id(&self) -> Option<i64> {
        self.account_id
    }

    async fn create_dashboard(&self, dashboard: &Dashboard) -> ApiResult<Dashboard> {
        let mut store = self.store();
        let id = store.next_id();
        let mut created = dashboard.clone();
        created.id = id;
        created.ui_url = format!("https://insights.newrelic.com/accounts/{ACCOUNT_ID}/dashboards/{id}");
        for widget in &mut created.widgets {
            widget.widget_id = Some(store.next_id());
        }
        store.dashboards.insert(id, created.clone());
        Ok(created)
    }

    async fn get_dashboard(&self, id: i64) -> ApiResult<Dashboard> {
        self.store()
            .dashboards
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn update_dashboard(&self, dashboard: &Dashboard) -> ApiResult<Dashboard> {
        let mut store = self.store();
        let Some(existing) = store.dashboards.get_mut(&dashboard.id) else {
            return Err(ApiError::NotFound);
        };
        let ui_url = std::mem::take(&mut existing.ui_url);
        *existing = Dashboard {
            ui_url,
            ..dashboard.clone()
        };
        Ok(existing.clone())
    }

    async fn delete_dashboard(&self, id: i64) -> ApiResult<()> {
        self.store()
            .dashboards
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn create_policy(
        &self,
        account_id: i64,
        policy: &AlertsPolicyInput,
    ) -> ApiResult<AlertsPolicy> {
        let mut store = self.store();
        let id = store.next_id();
        let created = AlertsPolicy {
            account_id,
            id: id.to_string(),
            incident_preference: policy.incident_preference,
            name: policy.name.clone(),
        };
        store.policies.insert((account_id, id), created.clone());
        Ok(created)
    }

    async fn get_policy(&self, account_id: i64, id: i64) -> ApiResult<AlertsPolicy> {
        self.store()
            .policies
            .get(&(account_id, id))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn update_policy(
        &self,
        account_id: i64,
        id: i64,
        policy: &AlertsPolicyInput,
    ) -> ApiResult<AlertsPolicy> {
        let mut store = self.store();
        let existing = store
            .policies
            .get_mut(&(account_id, id))
            .ok_or(ApiError::NotFound)?;
        existing.name = policy.name.clone();
        existing.incident_preference = policy.incident_preference;
        Ok(existing.clone())
    }

    async fn delete_policy(&self, account_id: i64, id: i64) -> ApiResult<()> {
        self.store()
            .policies
            .remove(&(account_id, id))
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn search_policies(
        &self,
        account_id: i64,
        cursor: Option<String>,
    ) -> ApiResult<AlertsPoliciesSearchResultSet> {
        let offset = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| ApiError::GraphQl(format!("invalid cursor `{cursor}`")))?,
            None => 0,
        };
        let store = self.store();
        let all: Vec<_> = store
            .policies
            .values()
            .filter(|policy| policy.account_id == account_id)
            .cloned()
            .collect();
        let end = (offset + self.page_size).min(all.len());
        Ok(AlertsPoliciesSearchResultSet {
            next_cursor: (end < all.len()).then(|| end.to_string()),
            policies: all[offset.min(end)..end].to_vec(),
            total_count: all.len() as i64,
        })
    }

    async fn create_nrql_condition(
        &self,
        account_id: i64,
        policy_id: i64,
        condition_type: NrqlConditionType,
        condition: &NrqlConditionInput,
    ) -> ApiResult<NrqlCondition> {
        let mut store = self.store();
        if !store.policies.contains_key(&(account_id, policy_id)) {
            return Err(ApiError::GraphQl(format!("policy {policy_id} does not exist")));
        }
        let id = store.next_id();
        let created = NrqlCondition {
            id: id.to_string(),
            policy_id: policy_id.to_string(),
            condition_type,
            input: Self::with_server_defaults(condition.clone()),
        };
        store.conditions.insert((account_id, id), created.clone());
        Ok(created)
    }

    async fn get_nrql_condition(&self, account_id: i64, id: i64) -> ApiResult<NrqlCondition> {
        self.store()
            .conditions
            .get(&(account_id, id))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn update_nrql_condition(
        &self,
        account_id: i64,
        id: i64,
        condition_type: NrqlConditionType,
        condition: &NrqlConditionInput,
    ) -> ApiResult<NrqlCondition> {
        let mut store = self.store();
        let existing = store
            .conditions
            .get_mut(&(account_id, id))
            .ok_or(ApiError::NotFound)?;
        existing.condition_type = condition_type;
        existing.input = Self::with_server_defaults(condition.clone());
        Ok(existing.clone())
    }

    async fn delete_condition(&self, account_id: i64, id: i64) -> ApiResult<()> {
        self.store()
            .conditions
            .remove(&(account_id, id))
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn create_monitor(&self, monitor: &SyntheticsMonitor) -> ApiResult<SyntheticsMonitor> {
        let mut store = self.store();
        let id = format!("00000000-0000-4000-8000-{:012}", store.next_id());
        let created = SyntheticsMonitor {
            id: id.clone(),
            ..monitor.clone()
        };
        store.monitors.insert(id, created.clone());
        Ok(created)
    }

    async fn get_monitor(&self, id: &str) -> ApiResult<SyntheticsMonitor> {
        self.store()
            .monitors
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn update_monitor(&self, monitor: &SyntheticsMonitor) -> ApiResult<SyntheticsMonitor> {
        let mut store = self.store();
        let existing = store
            .monitors
            .get_mut(&monitor.id)
            .ok_or(ApiError::NotFound)?;
        *existing = monitor.clone();
        Ok(existing.clone())
    }

    async fn delete_monitor(&self, id: &str) -> ApiResult<()> {
        self.store()
            .monitors
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn list_monitors(&self, offset: i64, limit: i64) -> ApiResult<SyntheticsMonitorList> {
        let store = self.store();
        let limit = limit.min(self.page_size as i64);
        let monitors: Vec<_> = store
            .monitors
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(SyntheticsMonitorList {
            count: store.monitors.len() as i64,
            monitors,
        })
    }
}
