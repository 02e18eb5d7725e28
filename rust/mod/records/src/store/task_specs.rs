use promptdeck_core::{clamp_limit, now_rfc3339, offset_or_default, ServiceError, DEFAULT_ORG_ID};
use promptdeck_sql::{Row, Value};

use crate::codec;
use crate::model::{CreateTaskSpec, Family, TaskSpec, TaskSpecListQuery, TaskSpecPatch};
use crate::store::{
    like_pattern, opt_text, opt_value, req_i64, req_text, storage, RecordStore,
};

impl RecordStore {
    /// Insert a new task spec, stamping ownership and timestamps
    /// server-side, and return the stored row fully decoded.
    pub fn insert_task_spec(
        &self,
        user_id: &str,
        input: CreateTaskSpec,
    ) -> Result<TaskSpec, ServiceError> {
        let now = now_rfc3339();
        let id = self
            .db()
            .insert(
                "INSERT INTO task_specs (user_id, org_id, family, goal, context, inputs, \
                 constraints, audience, format, acceptance_criteria, privacy, user_prefs, \
                 created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                &[
                    Value::Text(user_id.to_string()),
                    Value::Integer(input.org_id.unwrap_or(DEFAULT_ORG_ID)),
                    Value::Text(input.family.as_str().to_string()),
                    Value::Text(input.goal.trim().to_string()),
                    opt_value(trimmed(input.context)),
                    Value::Text(codec::encode(&input.inputs)),
                    Value::Text(codec::encode(&input.constraints)),
                    opt_value(trimmed(input.audience)),
                    opt_value(trimmed(input.format)),
                    Value::Text(codec::encode(&input.acceptance_criteria)),
                    opt_value(codec::encode_optional(&input.privacy)),
                    opt_value(codec::encode_optional(&input.user_prefs)),
                    Value::Text(now.clone()),
                    Value::Text(now),
                ],
            )
            .map_err(storage)?;

        self.get_task_spec(id)?
            .ok_or_else(|| ServiceError::Internal(format!("task spec {id} vanished after insert")))
    }

    /// Fetch a task spec by id, unscoped. Scope decisions belong to the
    /// guard, not the query.
    pub fn get_task_spec(&self, id: i64) -> Result<Option<TaskSpec>, ServiceError> {
        let rows = self
            .db()
            .query(
                "SELECT * FROM task_specs WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(storage)?;

        rows.first().map(row_to_task_spec).transpose()
    }

    /// Cheap existence probe for reference validation.
    pub fn task_spec_exists(&self, id: i64) -> Result<bool, ServiceError> {
        let rows = self
            .db()
            .query(
                "SELECT id FROM task_specs WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(storage)?;
        Ok(!rows.is_empty())
    }

    /// List task specs in one org, newest first.
    pub fn list_task_specs(
        &self,
        query: &TaskSpecListQuery,
    ) -> Result<Vec<TaskSpec>, ServiceError> {
        let mut where_clauses = vec!["org_id = ?1".to_string()];
        let mut params = vec![Value::Integer(query.org_id.unwrap_or(DEFAULT_ORG_ID))];
        let mut idx = 2;

        if let Some(ref search) = query.search {
            where_clauses.push(format!("goal LIKE ?{idx}"));
            params.push(Value::Text(like_pattern(search)));
            idx += 1;
        }

        let sql = format!(
            "SELECT * FROM task_specs WHERE {} ORDER BY created_at DESC LIMIT ?{idx} OFFSET ?{}",
            where_clauses.join(" AND "),
            idx + 1
        );
        params.push(Value::Integer(clamp_limit(query.limit)));
        params.push(Value::Integer(offset_or_default(query.offset)));

        let rows = self.db().query(&sql, &params).map_err(storage)?;
        rows.iter().map(row_to_task_spec).collect()
    }

    /// Apply a partial update, scoped to `(id, org_id, user_id)` in one
    /// statement, and return the refreshed row. Zero matched rows means
    /// the record was deleted out from under the caller.
    pub fn update_task_spec(
        &self,
        id: i64,
        org_id: i64,
        user_id: &str,
        patch: &TaskSpecPatch,
    ) -> Result<TaskSpec, ServiceError> {
        let mut sets = vec!["updated_at = ?1".to_string()];
        let mut params = vec![Value::Text(now_rfc3339())];
        let mut idx = 2;

        let mut pending: Vec<(&str, Value)> = Vec::new();
        if let Some(family) = patch.family {
            pending.push(("family", Value::Text(family.as_str().to_string())));
        }
        if let Some(ref goal) = patch.goal {
            pending.push(("goal", Value::Text(goal.clone())));
        }
        if let Some(ref context) = patch.context {
            pending.push(("context", opt_value(context.clone())));
        }
        if let Some(ref inputs) = patch.inputs {
            pending.push(("inputs", Value::Text(codec::encode(inputs))));
        }
        if let Some(ref constraints) = patch.constraints {
            pending.push(("constraints", Value::Text(codec::encode(constraints))));
        }
        if let Some(ref audience) = patch.audience {
            pending.push(("audience", opt_value(audience.clone())));
        }
        if let Some(ref format) = patch.format {
            pending.push(("format", opt_value(format.clone())));
        }
        if let Some(ref criteria) = patch.acceptance_criteria {
            pending.push(("acceptance_criteria", Value::Text(codec::encode(criteria))));
        }
        if let Some(ref privacy) = patch.privacy {
            pending.push(("privacy", opt_value(codec::encode_optional(privacy))));
        }
        if let Some(ref prefs) = patch.user_prefs {
            pending.push(("user_prefs", opt_value(codec::encode_optional(prefs))));
        }
        for (column, value) in pending {
            sets.push(format!("{column} = ?{idx}"));
            params.push(value);
            idx += 1;
        }

        let sql = format!(
            "UPDATE task_specs SET {} WHERE id = ?{idx} AND org_id = ?{} AND user_id = ?{}",
            sets.join(", "),
            idx + 1,
            idx + 2
        );
        params.push(Value::Integer(id));
        params.push(Value::Integer(org_id));
        params.push(Value::Text(user_id.to_string()));

        let affected = self.db().exec(&sql, &params).map_err(storage)?;
        if affected == 0 {
            return Err(ServiceError::NotFound("Task spec not found".to_string()));
        }

        self.get_task_spec(id)?
            .ok_or_else(|| ServiceError::Internal(format!("task spec {id} vanished after update")))
    }

    /// Delete a task spec, scoped to `(id, org_id, user_id)`. Returns the
    /// matched-row count; zero means already gone.
    pub fn delete_task_spec(
        &self,
        id: i64,
        org_id: i64,
        user_id: &str,
    ) -> Result<u64, ServiceError> {
        self.db()
            .exec(
                "DELETE FROM task_specs WHERE id = ?1 AND org_id = ?2 AND user_id = ?3",
                &[
                    Value::Integer(id),
                    Value::Integer(org_id),
                    Value::Text(user_id.to_string()),
                ],
            )
            .map_err(storage)
    }
}

fn trimmed(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn row_to_task_spec(row: &Row) -> Result<TaskSpec, ServiceError> {
    let family_raw = req_text(row, "family")?;
    let family = Family::parse(&family_raw).ok_or_else(|| {
        ServiceError::Integrity(format!("stored family '{family_raw}' is not a known value"))
    })?;

    Ok(TaskSpec {
        id: req_i64(row, "id")?,
        user_id: req_text(row, "user_id")?,
        org_id: req_i64(row, "org_id")?,
        family,
        goal: req_text(row, "goal")?,
        context: opt_text(row, "context"),
        inputs: codec::decode_required("inputs", &req_text(row, "inputs")?)?,
        constraints: codec::decode_required("constraints", &req_text(row, "constraints")?)?,
        audience: opt_text(row, "audience"),
        format: opt_text(row, "format"),
        acceptance_criteria: codec::decode_required(
            "acceptanceCriteria",
            &req_text(row, "acceptance_criteria")?,
        )?,
        privacy: codec::decode_optional(row.get_str("privacy")),
        user_prefs: codec::decode_optional(row.get_str("user_prefs")),
        created_at: req_text(row, "created_at")?,
        updated_at: req_text(row, "updated_at")?,
    })
}
