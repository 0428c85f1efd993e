use crate::adapter::AmlToolAdapter;
use crate::screening_tools::{CryptoScreeningTool, IpScreeningTool, SanctionsScreeningTool};
use crate::traits::Tool;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding `crypto_screening`, `sanctions_screening` and `ip_screening`.
    pub fn with_screening_tools(adapter: AmlToolAdapter) -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(CryptoScreeningTool::new(adapter.clone())))
            .register(Arc::new(SanctionsScreeningTool::new(adapter.clone())))
            .register(Arc::new(IpScreeningTool::new(adapter)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// MCP `tools/list` entries, sorted by name.
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        self.list()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.schema()
                })
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
