//! Worker model descriptor
//!
//! Mirrors the JSON the API returns for a worker model. Every field defaults
//! when absent so partial payloads still decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MODEL_TYPE_DOCKER: &str = "docker";
pub const MODEL_TYPE_OPENSTACK: &str = "openstack";

/// Group owning a worker model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// Docker specific part of a worker model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelDocker {
    pub image: String,
    pub shell: String,
    pub cmd: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub envs: BTreeMap<String, String>,
    pub private: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub registry: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

/// Virtual machine part of a worker model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelVirtualMachine {
    pub image: String,
    pub flavor: String,
    pub pre_cmd: String,
    pub cmd: String,
    pub post_cmd: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

/// Worker model as stored by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    pub disabled: bool,
    pub restricted: bool,
    pub need_registration: bool,
    pub is_deprecated: bool,
    pub is_official: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pattern_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_docker: Option<ModelDocker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_virtual_machine: Option<ModelVirtualMachine>,
}

impl Model {
    pub fn is_docker(&self) -> bool {
        self.model_type == MODEL_TYPE_DOCKER
    }

    /// Fully qualified `group/name`, or the bare name when the group is unknown
    pub fn path(&self) -> String {
        match &self.group {
            Some(group) if !group.name.is_empty() => format!("{}/{}", group.name, self.name),
            _ => self.name.clone(),
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.path(), self.model_type)
    }
}
