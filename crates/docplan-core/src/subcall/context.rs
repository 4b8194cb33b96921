//! Recursion context for sub-calls

use crate::error::{DocplanError, DocplanResult};
use serde::{Deserialize, Serialize};

/// Position of a call in the delegation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCallContext {
    pub depth: u32,
    pub max_depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl SubCallContext {
    /// Context of a top-level invocation
    pub fn root(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            parent_path: None,
            task_id: None,
        }
    }

    pub fn with_parent_path(mut self, path: impl Into<String>) -> Self {
        self.parent_path = Some(path.into());
        self
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Context handed to a call made from inside this one. Depth goes up by
    /// one; budget, task id and parent path are kept as they are. Use
    /// [`child_for_item`](Self::child_for_item) to record the item index.
    pub fn child(&self) -> Self {
        Self {
            depth: self.depth.saturating_add(1),
            ..self.clone()
        }
    }

    /// Context for the nested call handling the item at `index`
    pub fn child_for_item(&self, index: usize) -> Self {
        let segment = index.to_string();
        let parent_path = match &self.parent_path {
            Some(path) => format!("{path}/{segment}"),
            None => segment,
        };
        Self {
            parent_path: Some(parent_path),
            ..self.child()
        }
    }

    pub fn can_delegate(&self) -> bool {
        self.depth < self.max_depth
    }

    /// Fail with [`DocplanError::DepthLimit`] once the budget is spent
    pub fn ensure_can_delegate(&self) -> DocplanResult<()> {
        if self.can_delegate() {
            Ok(())
        } else {
            Err(DocplanError::depth_limit(self.max_depth, self.depth))
        }
    }
}
