//! Page plan types

use crate::types::{JsonValue, Metadata};
use serde::{Deserialize, Serialize};

/// One archive page, fully specified.
///
/// Created once per build pass from a collection and a route kind, then
/// turned into a `PageRecord` for emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    /// Canonical path of this page
    pub path: String,
    /// 1-based page number
    pub page_number: usize,
    /// Number of pages in the collection
    pub total_pages: usize,
    /// Position of the first item of this page in the collection
    pub offset: usize,
    /// Items per page
    pub page_size: usize,
    /// Path of the next page, absent on the last page
    pub next_path: Option<String>,
    /// Path of the previous page, absent on the first page
    pub previous_path: Option<String>,
    /// Caller-provided metadata, threaded through unchanged
    pub metadata: Metadata,
}

impl PagePlan {
    /// Check if this is the first page
    pub fn is_first(&self) -> bool {
        self.page_number == 1
    }

    /// Check if this is the last page
    pub fn is_last(&self) -> bool {
        self.page_number == self.total_pages
    }

    /// Attach a template component and produce the record to emit.
    ///
    /// The context is the metadata followed by the pagination keys the
    /// archive templates read. Pagination keys win over metadata keys of the
    /// same name.
    pub fn into_record(self, component: impl Into<String>) -> PageRecord {
        let mut context = self.metadata;
        context.insert("offset".to_string(), self.offset.into());
        context.insert("postsPerPage".to_string(), self.page_size.into());
        context.insert("pageNumber".to_string(), self.page_number.into());
        context.insert("numberOfPages".to_string(), self.total_pages.into());
        context.insert("nextPagePath".to_string(), option_to_value(self.next_path));
        context.insert(
            "previousPagePath".to_string(),
            option_to_value(self.previous_path),
        );

        PageRecord {
            path: self.path,
            component: component.into(),
            context,
        }
    }
}

fn option_to_value(opt: Option<String>) -> JsonValue {
    opt.map_or(JsonValue::Null, JsonValue::String)
}

/// A page-generation instruction: register `path`, render it with
/// `component`, and hand `context` to the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL path of the page
    pub path: String,
    /// Template component that renders the page
    pub component: String,
    /// Data made available to the template
    pub context: Metadata,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(path: impl Into<String>, component: impl Into<String>, context: Metadata) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
            context,
        }
    }

    /// Look up a context value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.context.get(key)
    }
}
