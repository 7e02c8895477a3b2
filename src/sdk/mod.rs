//! API resource types and protocol constants

mod model;

pub use model::{
    Group, MODEL_TYPE_DOCKER, MODEL_TYPE_OPENSTACK, Model, ModelDocker, ModelVirtualMachine,
};

/// Response header naming the workflow created or updated by a push
pub const RESPONSE_WORKFLOW_NAME_HEADER: &str = "X-Api-Workflow-Name";
