//! In-memory gateway used by the orchestrator tests

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use freeze_client::{ClientError, CodefreshGateway, Result};
use freeze_core::domain::annotation::{Annotation, EntityType};
use freeze_core::domain::pipeline::{Pipeline, PipelineMetadata, PipelineSpec, SpecTrigger};
use freeze_core::domain::trigger::TriggerRegistration;
use freeze_core::dto::pipeline::{ListPipelinesParams, Pipelines};
use serde_json::{Map, Value, json};

/// A gateway call, as recorded by [`FakeGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetPipeline(String),
    ReplacePipeline(String),
    ListPipelines {
        project_id: Option<String>,
        offset: u64,
        limit: u64,
    },
    ListTriggers(String, bool),
    DeleteTrigger {
        event: String,
        pipeline: String,
    },
    CreateTrigger {
        event: String,
        pipeline: String,
        with_payload: bool,
    },
    ListAnnotations(String),
    CreateAnnotation {
        entity: String,
        key: String,
    },
    DeleteAnnotation {
        entity: String,
        key: String,
    },
}

impl Call {
    fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::ReplacePipeline(_)
                | Call::DeleteTrigger { .. }
                | Call::CreateTrigger { .. }
                | Call::CreateAnnotation { .. }
                | Call::DeleteAnnotation { .. }
        )
    }
}

#[derive(Default)]
struct State {
    pipelines: BTreeMap<String, Pipeline>,
    registrations: HashMap<String, Vec<TriggerRegistration>>,
    annotations: Vec<Annotation>,
    calls: Vec<Call>,
    failing_annotation_keys: HashSet<String>,
    failing_trigger_deletes: HashSet<String>,
    failing_trigger_creates: HashSet<String>,
    failing_replaces: HashSet<String>,
    null_trigger_lists: HashSet<String>,
    page_cap: Option<usize>,
}

/// Gateway backed by in-memory maps
///
/// Behaves like the remote service for the orchestrator's purposes and
/// records every call in order.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
}

/// Builds a pipeline with the given `(id, disabled)` git and cron triggers
pub fn pipeline(id: &str, git: &[(&str, bool)], cron: Option<&[(&str, bool)]>) -> Pipeline {
    let triggers = |list: &[(&str, bool)]| {
        list.iter()
            .map(|(trigger_id, disabled)| SpecTrigger {
                id: trigger_id.to_string(),
                name: Some(format!("{}-name", trigger_id)),
                disabled: *disabled,
                extra: Map::new(),
            })
            .collect::<Vec<_>>()
    };

    Pipeline {
        metadata: PipelineMetadata {
            id: id.to_string(),
            name: Some(format!("pipeline-{}", id)),
            project_id: None,
            extra: Map::new(),
        },
        spec: PipelineSpec {
            triggers: triggers(git),
            cron_triggers: cron.map(triggers),
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake gateway state poisoned")
    }

    fn record(&self, call: Call) {
        self.state().calls.push(call);
    }

    pub fn add_pipeline(&self, pipeline: Pipeline) {
        self.state()
            .pipelines
            .insert(pipeline.id().to_string(), pipeline);
    }

    pub fn pipeline(&self, id: &str) -> Pipeline {
        self.state().pipelines[id].clone()
    }

    /// Builds a registration with event data, without storing it
    pub fn registration(&self, pipeline_id: &str, event: &str) -> TriggerRegistration {
        serde_json::from_value(json!({
            "event": event,
            "pipeline": pipeline_id,
            "event-data": {
                "uri": event,
                "type": "registry",
                "kind": "dockerhub",
                "secret": format!("secret-{}", event)
            }
        }))
        .expect("valid registration")
    }

    pub fn add_registration(&self, pipeline_id: &str, event: &str) -> TriggerRegistration {
        let registration = self.registration(pipeline_id, event);
        self.state()
            .registrations
            .entry(pipeline_id.to_string())
            .or_default()
            .push(registration.clone());
        registration
    }

    pub fn registrations(&self, pipeline_id: &str) -> Vec<TriggerRegistration> {
        self.state()
            .registrations
            .get(pipeline_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn put_annotation(&self, entity_id: &str, key: &str, value: Value) {
        let mut state = self.state();
        state
            .annotations
            .retain(|a| !(a.entity_id == entity_id && a.key == key));
        state.annotations.push(Annotation {
            id: None,
            account_id: None,
            entity_id: entity_id.to_string(),
            entity_type: EntityType::Pipeline,
            key: key.to_string(),
            value,
            value_type: None,
        });
    }

    pub fn annotation_value(&self, entity_id: &str, key: &str) -> Option<Value> {
        self.state()
            .annotations
            .iter()
            .find(|a| a.entity_id == entity_id && a.key == key)
            .map(|a| a.value.clone())
    }

    pub fn fail_annotation(&self, key: &str) {
        self.state().failing_annotation_keys.insert(key.to_string());
    }

    pub fn fail_trigger_delete(&self, event: &str) {
        self.state().failing_trigger_deletes.insert(event.to_string());
    }

    pub fn fail_trigger_create(&self, event: &str) {
        self.state().failing_trigger_creates.insert(event.to_string());
    }

    pub fn fail_replace(&self, pipeline_id: &str) {
        self.state().failing_replaces.insert(pipeline_id.to_string());
    }

    pub fn answer_null_triggers(&self, pipeline_id: &str) {
        self.state()
            .null_trigger_lists
            .insert(pipeline_id.to_string());
    }

    /// Never return more than `cap` documents per page, whatever the limit
    pub fn cap_page_size(&self, cap: usize) {
        self.state().page_cap = Some(cap);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn mutating_calls(&self) -> usize {
        self.state().calls.iter().filter(|c| c.is_mutating()).count()
    }
}

fn server_error() -> ClientError {
    ClientError::api_error(500, "Internal Server Error")
}

#[async_trait]
impl CodefreshGateway for FakeGateway {
    async fn get_pipeline(&self, id: &str) -> Result<Pipeline> {
        self.record(Call::GetPipeline(id.to_string()));
        self.state()
            .pipelines
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Pipeline #{} was not found", id)))
    }

    async fn replace_pipeline(&self, id: &str, pipeline: &Pipeline) -> Result<Pipeline> {
        self.record(Call::ReplacePipeline(id.to_string()));
        let mut state = self.state();
        if state.failing_replaces.contains(id) {
            return Err(server_error());
        }
        match state.pipelines.get_mut(id) {
            Some(stored) => {
                *stored = pipeline.clone();
                Ok(pipeline.clone())
            }
            None => Err(ClientError::NotFound(format!(
                "Pipeline #{} was not found",
                id
            ))),
        }
    }

    async fn list_pipelines(&self, params: &ListPipelinesParams) -> Result<Pipelines> {
        self.record(Call::ListPipelines {
            project_id: params.project_id.clone(),
            offset: params.offset,
            limit: params.limit,
        });
        let state = self.state();
        let matching: Vec<&Pipeline> = state
            .pipelines
            .values()
            .filter(|p| params.project_id.is_none() || p.metadata.project_id == params.project_id)
            .collect();

        let mut take = if params.limit == 0 {
            usize::MAX
        } else {
            params.limit as usize
        };
        if let Some(cap) = state.page_cap {
            take = take.min(cap);
        }

        Ok(Pipelines {
            docs: matching
                .iter()
                .skip(params.offset as usize)
                .take(take)
                .map(|p| (*p).clone())
                .collect(),
            count: matching.len() as u64,
        })
    }

    async fn list_pipeline_triggers(
        &self,
        pipeline_id: &str,
        with_event: bool,
    ) -> Result<Option<Vec<TriggerRegistration>>> {
        self.record(Call::ListTriggers(pipeline_id.to_string(), with_event));
        let state = self.state();
        if state.null_trigger_lists.contains(pipeline_id) {
            return Ok(None);
        }
        Ok(Some(
            state
                .registrations
                .get(pipeline_id)
                .cloned()
                .unwrap_or_default(),
        ))
    }

    async fn delete_trigger(&self, event: &str, pipeline_id: &str) -> Result<()> {
        self.record(Call::DeleteTrigger {
            event: event.to_string(),
            pipeline: pipeline_id.to_string(),
        });
        let mut state = self.state();
        if state.failing_trigger_deletes.contains(event) {
            return Err(server_error());
        }
        let registrations = state
            .registrations
            .get_mut(pipeline_id)
            .ok_or_else(|| ClientError::NotFound(format!("Event \"{}\" was not found", event)))?;
        let before = registrations.len();
        registrations.retain(|r| r.event != event);
        if registrations.len() == before {
            return Err(ClientError::NotFound(format!(
                "Event \"{}\" was not found",
                event
            )));
        }
        Ok(())
    }

    async fn create_trigger(
        &self,
        event: &str,
        pipeline_id: &str,
        payload: Option<&TriggerRegistration>,
    ) -> Result<()> {
        self.record(Call::CreateTrigger {
            event: event.to_string(),
            pipeline: pipeline_id.to_string(),
            with_payload: payload.is_some(),
        });
        if self.state().failing_trigger_creates.contains(event) {
            return Err(server_error());
        }
        let registration = payload.cloned().unwrap_or_else(|| TriggerRegistration {
            event: event.to_string(),
            pipeline: pipeline_id.to_string(),
            event_data: None,
            extra: Map::new(),
        });
        self.state()
            .registrations
            .entry(pipeline_id.to_string())
            .or_default()
            .push(registration);
        Ok(())
    }

    async fn list_annotations(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<Vec<Annotation>> {
        self.record(Call::ListAnnotations(entity_id.to_string()));
        Ok(self
            .state()
            .annotations
            .iter()
            .filter(|a| a.entity_id == entity_id && a.entity_type == entity_type)
            .cloned()
            .collect())
    }

    async fn create_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
        value: Value,
    ) -> Result<Annotation> {
        self.record(Call::CreateAnnotation {
            entity: entity_id.to_string(),
            key: key.to_string(),
        });
        if self.state().failing_annotation_keys.contains(key) {
            return Err(server_error());
        }
        self.put_annotation(entity_id, key, value.clone());
        Ok(Annotation {
            id: Some(format!("{}-{}", entity_id, key)),
            account_id: None,
            entity_id: entity_id.to_string(),
            entity_type,
            key: key.to_string(),
            value,
            value_type: None,
        })
    }

    async fn delete_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Value> {
        self.record(Call::DeleteAnnotation {
            entity: entity_id.to_string(),
            key: key.to_string(),
        });
        let mut state = self.state();
        let position = state
            .annotations
            .iter()
            .position(|a| a.entity_id == entity_id && a.entity_type == entity_type && a.key == key)
            .ok_or_else(|| ClientError::NotFound(format!("Entity #{} was not found", entity_id)))?;
        Ok(state.annotations.remove(position).value)
    }
}
