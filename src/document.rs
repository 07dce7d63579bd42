//! Compiled output model.
//!
//! One `CodeConnectDocument` per declaration call. Documents are transient:
//! each parse pass regenerates them in full, and they leave the crate as
//! JSON for stdout, files or an upload collaborator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::intrinsics::PropMapping;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nestable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeConnectDocument {
    pub figma_node_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<IndexMap<String, serde_json::Value>>,
    pub template: String,
    pub template_data: TemplateData,
    pub language: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    pub source: String,
    pub source_location: SourceLocation,
}

impl CodeConnectDocument {
    pub const LANGUAGE: &'static str = "typescript";
}
