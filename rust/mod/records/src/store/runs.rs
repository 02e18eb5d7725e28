use promptdeck_core::{clamp_limit, now_rfc3339, offset_or_default, ServiceError, DEFAULT_ORG_ID};
use promptdeck_sql::{Row, Value};

use crate::codec;
use crate::model::{CreateRun, Run, RunListQuery, RunStatus, SortOrder};
use crate::store::{
    like_pattern, opt_value, req_f64, req_i64, req_text, storage, RecordStore,
};

impl RecordStore {
    /// Record a run. Runs are immutable after creation; a later outcome
    /// against the same task spec is a new row.
    pub fn insert_run(&self, user_id: &str, input: CreateRun) -> Result<Run, ServiceError> {
        let id = self
            .db()
            .insert(
                "INSERT INTO runs (user_id, org_id, task_spec_id, model, tokens, cost_usd, \
                 latency_ms, output, verdict, learn, status, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                &[
                    Value::Text(user_id.to_string()),
                    Value::Integer(input.org_id.unwrap_or(DEFAULT_ORG_ID)),
                    Value::Integer(input.task_spec_id),
                    Value::Text(input.model.trim().to_string()),
                    Value::Integer(input.tokens),
                    Value::Real(input.cost_usd),
                    Value::Integer(input.latency_ms),
                    Value::Text(input.output),
                    opt_value(codec::encode_optional(&input.verdict)),
                    opt_value(codec::encode_optional(&input.learn)),
                    Value::Text(input.status.unwrap_or_default().as_str().to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(storage)?;

        self.get_run(id)?
            .ok_or_else(|| ServiceError::Internal(format!("run {id} vanished after insert")))
    }

    pub fn get_run(&self, id: i64) -> Result<Option<Run>, ServiceError> {
        let rows = self
            .db()
            .query("SELECT * FROM runs WHERE id = ?1", &[Value::Integer(id)])
            .map_err(storage)?;

        rows.first().map(row_to_run).transpose()
    }

    pub fn list_runs(&self, query: &RunListQuery) -> Result<Vec<Run>, ServiceError> {
        let mut where_clauses = vec!["org_id = ?1".to_string()];
        let mut params = vec![Value::Integer(query.org_id.unwrap_or(DEFAULT_ORG_ID))];
        let mut idx = 2;

        if let Some(ref status) = query.status {
            where_clauses.push(format!("status = ?{idx}"));
            params.push(Value::Text(status.clone()));
            idx += 1;
        }
        if let Some(ref model) = query.model {
            where_clauses.push(format!("model LIKE ?{idx}"));
            params.push(Value::Text(like_pattern(model)));
            idx += 1;
        }

        let direction = match query.order {
            Some(SortOrder::Asc) => "ASC",
            _ => "DESC",
        };
        let sql = format!(
            "SELECT * FROM runs WHERE {} ORDER BY created_at {direction} LIMIT ?{idx} OFFSET ?{}",
            where_clauses.join(" AND "),
            idx + 1
        );
        params.push(Value::Integer(clamp_limit(query.limit)));
        params.push(Value::Integer(offset_or_default(query.offset)));

        let rows = self.db().query(&sql, &params).map_err(storage)?;
        rows.iter().map(row_to_run).collect()
    }

    pub fn delete_run(&self, id: i64, org_id: i64, user_id: &str) -> Result<u64, ServiceError> {
        self.db()
            .exec(
                "DELETE FROM runs WHERE id = ?1 AND org_id = ?2 AND user_id = ?3",
                &[
                    Value::Integer(id),
                    Value::Integer(org_id),
                    Value::Text(user_id.to_string()),
                ],
            )
            .map_err(storage)
    }
}

fn row_to_run(row: &Row) -> Result<Run, ServiceError> {
    let status_raw = req_text(row, "status")?;
    let status = RunStatus::parse(&status_raw).ok_or_else(|| {
        ServiceError::Integrity(format!("stored status '{status_raw}' is not a known value"))
    })?;

    Ok(Run {
        id: req_i64(row, "id")?,
        user_id: req_text(row, "user_id")?,
        org_id: req_i64(row, "org_id")?,
        task_spec_id: req_i64(row, "task_spec_id")?,
        model: req_text(row, "model")?,
        tokens: req_i64(row, "tokens")?,
        cost_usd: req_f64(row, "cost_usd")?,
        latency_ms: req_i64(row, "latency_ms")?,
        output: req_text(row, "output")?,
        verdict: codec::decode_optional(row.get_str("verdict")),
        learn: codec::decode_optional(row.get_str("learn")),
        status,
        created_at: req_text(row, "created_at")?,
    })
}
