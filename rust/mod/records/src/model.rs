use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

/// The kind of work a task spec describes. Fixed set; anything else is
/// rejected at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Write,
    Code,
    Analyze,
    Plan,
    Translate,
    Summarize,
    Rag,
    Classify,
    Extract,
    Critique,
}

/// Allowed `family` values, in wire form.
pub const FAMILIES: &[&str] = &[
    "write",
    "code",
    "analyze",
    "plan",
    "translate",
    "summarize",
    "rag",
    "classify",
    "extract",
    "critique",
];

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Code => "code",
            Self::Analyze => "analyze",
            Self::Plan => "plan",
            Self::Translate => "translate",
            Self::Summarize => "summarize",
            Self::Rag => "rag",
            Self::Classify => "classify",
            Self::Extract => "extract",
            Self::Critique => "critique",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "write" => Some(Self::Write),
            "code" => Some(Self::Code),
            "analyze" => Some(Self::Analyze),
            "plan" => Some(Self::Plan),
            "translate" => Some(Self::Translate),
            "summarize" => Some(Self::Summarize),
            "rag" => Some(Self::Rag),
            "classify" => Some(Self::Classify),
            "extract" => Some(Self::Extract),
            "critique" => Some(Self::Critique),
            _ => None,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RunStatus
// ---------------------------------------------------------------------------

/// Outcome state of a run. Client-asserted at creation time and never
/// transitioned afterward; callers record a later state by posting a new
/// run row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

/// Allowed `status` values, in wire form.
pub const RUN_STATUSES: &[&str] = &["queued", "running", "succeeded", "failed"];

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::Succeeded
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entities — wire representations, polymorphic fields fully decoded
// ---------------------------------------------------------------------------

/// A structured description of a work goal, its inputs, constraints, and
/// acceptance criteria. Owned by one user, scoped to one organization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub id: i64,
    pub user_id: String,
    pub org_id: i64,
    pub family: Family,
    pub goal: String,
    pub context: Option<String>,
    pub inputs: Value,
    pub constraints: Value,
    pub audience: Option<String>,
    pub format: Option<String>,
    pub acceptance_criteria: Value,
    pub privacy: Value,
    pub user_prefs: Value,
    pub created_at: String,
    pub updated_at: String,
}

/// A reusable, taggable wrapper around a task spec. The `task_spec_id`
/// reference is weak: validated at write time, never cascade-deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub user_id: String,
    pub org_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub task_spec_id: Option<i64>,
    pub tags: Vec<String>,
    pub proven: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A recorded execution outcome against a task spec.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: i64,
    pub user_id: String,
    pub org_id: i64,
    pub task_spec_id: i64,
    pub model: String,
    pub tokens: i64,
    pub cost_usd: f64,
    pub latency_ms: i64,
    pub output: String,
    pub verdict: Value,
    pub learn: Value,
    pub status: RunStatus,
    pub created_at: String,
}

/// Shared bullet-point learnings. Not user- or org-scoped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub bullets: Vec<String>,
    pub next_time_try: Vec<String>,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Creation payloads — deserialized after the validator has passed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskSpec {
    pub family: Family,
    pub goal: String,
    #[serde(default)]
    pub context: Option<String>,
    pub inputs: Value,
    pub constraints: Value,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    pub acceptance_criteria: Value,
    #[serde(default)]
    pub privacy: Value,
    #[serde(default)]
    pub user_prefs: Value,
    #[serde(default)]
    pub org_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub task_spec_id: Option<i64>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub org_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRun {
    pub task_spec_id: i64,
    pub model: String,
    pub tokens: i64,
    pub cost_usd: f64,
    pub latency_ms: i64,
    pub output: String,
    #[serde(default)]
    pub verdict: Value,
    #[serde(default)]
    pub learn: Value,
    #[serde(default)]
    pub status: Option<RunStatus>,
    #[serde(default)]
    pub org_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLesson {
    pub title: String,
    pub bullets: Vec<String>,
    pub next_time_try: Vec<String>,
}

// ---------------------------------------------------------------------------
// Update patches — only fields present in the body; `Some(None)` clears
// an optional column, absence leaves it untouched
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TaskSpecPatch {
    pub family: Option<Family>,
    pub goal: Option<String>,
    pub context: Option<Option<String>>,
    pub inputs: Option<Value>,
    pub constraints: Option<Value>,
    pub audience: Option<Option<String>>,
    pub format: Option<Option<String>>,
    pub acceptance_criteria: Option<Value>,
    pub privacy: Option<Value>,
    pub user_prefs: Option<Value>,
}

impl TaskSpecPatch {
    /// Pull recognized fields out of a validated body. Unrecognized keys
    /// are ignored, not rejected — deliberate, see DESIGN.md.
    pub fn from_body(body: &serde_json::Map<String, Value>) -> Self {
        Self {
            family: body
                .get("family")
                .and_then(Value::as_str)
                .and_then(Family::parse),
            goal: body.get("goal").and_then(Value::as_str).map(String::from),
            context: clearable_text(body, "context"),
            inputs: present(body, "inputs"),
            constraints: present(body, "constraints"),
            audience: clearable_text(body, "audience"),
            format: clearable_text(body, "format"),
            acceptance_criteria: present(body, "acceptanceCriteria"),
            privacy: present(body, "privacy"),
            user_prefs: present(body, "userPrefs"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub task_spec_id: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub proven: Option<bool>,
}

impl TemplatePatch {
    pub fn from_body(body: &serde_json::Map<String, Value>) -> Self {
        Self {
            title: body.get("title").and_then(Value::as_str).map(String::from),
            description: clearable_text(body, "description"),
            task_spec_id: body
                .get("taskSpecId")
                .map(|v| v.as_i64().filter(|id| *id > 0)),
            tags: body.get("tags").and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            }),
            proven: body.get("proven").and_then(Value::as_bool),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub bullets: Option<Vec<String>>,
    pub next_time_try: Option<Vec<String>>,
}

impl LessonPatch {
    pub fn from_body(body: &serde_json::Map<String, Value>) -> Self {
        Self {
            title: body.get("title").and_then(Value::as_str).map(String::from),
            bullets: string_list(body, "bullets"),
            next_time_try: string_list(body, "nextTimeTry"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.bullets.is_none() && self.next_time_try.is_none()
    }
}

fn present(body: &serde_json::Map<String, Value>, key: &str) -> Option<Value> {
    body.get(key).cloned()
}

fn clearable_text(body: &serde_json::Map<String, Value>, key: &str) -> Option<Option<String>> {
    body.get(key)
        .map(|v| v.as_str().map(String::from))
}

fn string_list(body: &serde_json::Map<String, Value>, key: &str) -> Option<Vec<String>> {
    body.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
}

// ---------------------------------------------------------------------------
// List queries
// ---------------------------------------------------------------------------

/// Sort direction for list endpoints that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpecListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub org_id: Option<i64>,
    /// Substring match on `goal`.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub org_id: Option<i64>,
    /// Substring match on `title`.
    pub search: Option<String>,
    /// Containment match against the tag set.
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub org_id: Option<i64>,
    /// Exact status match; validated against [`RUN_STATUSES`].
    pub status: Option<String>,
    /// Substring match on `model`.
    pub model: Option<String>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Substring match on `title`.
    pub search: Option<String>,
}

/// Org scope for single-record operations: `?orgId=`, default 1.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub org_id: Option<i64>,
}

impl ScopeQuery {
    pub fn org_id(&self) -> i64 {
        self.org_id.unwrap_or(promptdeck_core::DEFAULT_ORG_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_round_trip() {
        for name in FAMILIES {
            let family = Family::parse(name).unwrap();
            assert_eq!(family.as_str(), *name);
        }
        assert!(Family::parse("poetry").is_none());
    }

    #[test]
    fn run_status_defaults_to_succeeded() {
        assert_eq!(RunStatus::default(), RunStatus::Succeeded);
        for name in RUN_STATUSES {
            assert_eq!(RunStatus::parse(name).unwrap().as_str(), *name);
        }
        assert!(RunStatus::parse("bogus").is_none());
    }

    #[test]
    fn patch_only_captures_present_fields() {
        let body = serde_json::json!({
            "goal": "new goal",
            "context": null,
            "unknownField": 42,
        });
        let patch = TaskSpecPatch::from_body(body.as_object().unwrap());
        assert_eq!(patch.goal.as_deref(), Some("new goal"));
        assert_eq!(patch.context, Some(None));
        assert!(patch.inputs.is_none());
        assert!(patch.family.is_none());
    }

    #[test]
    fn template_patch_clears_reference_on_null() {
        let body = serde_json::json!({"taskSpecId": null});
        let patch = TemplatePatch::from_body(body.as_object().unwrap());
        assert_eq!(patch.task_spec_id, Some(None));

        let body = serde_json::json!({"taskSpecId": 7});
        let patch = TemplatePatch::from_body(body.as_object().unwrap());
        assert_eq!(patch.task_spec_id, Some(Some(7)));
    }
}
