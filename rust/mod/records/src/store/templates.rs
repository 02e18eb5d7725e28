use promptdeck_core::{clamp_limit, now_rfc3339, offset_or_default, ServiceError, DEFAULT_ORG_ID};
use promptdeck_sql::{Row, Value};

use crate::codec;
use crate::model::{CreateTemplate, Template, TemplateListQuery, TemplatePatch};
use crate::store::{
    like_pattern, opt_text, opt_value, req_i64, req_text, storage, RecordStore,
};

impl RecordStore {
    pub fn insert_template(
        &self,
        user_id: &str,
        input: CreateTemplate,
    ) -> Result<Template, ServiceError> {
        let now = now_rfc3339();
        let id = self
            .db()
            .insert(
                "INSERT INTO templates (user_id, org_id, title, description, task_spec_id, \
                 tags, proven, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
                &[
                    Value::Text(user_id.to_string()),
                    Value::Integer(input.org_id.unwrap_or(DEFAULT_ORG_ID)),
                    Value::Text(input.title.trim().to_string()),
                    opt_value(
                        input
                            .description
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty()),
                    ),
                    match input.task_spec_id {
                        Some(ref_id) => Value::Integer(ref_id),
                        None => Value::Null,
                    },
                    Value::Text(codec::encode_string_list(&input.tags)),
                    Value::Text(now.clone()),
                    Value::Text(now),
                ],
            )
            .map_err(storage)?;

        self.get_template(id)?
            .ok_or_else(|| ServiceError::Internal(format!("template {id} vanished after insert")))
    }

    pub fn get_template(&self, id: i64) -> Result<Option<Template>, ServiceError> {
        let rows = self
            .db()
            .query(
                "SELECT * FROM templates WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(storage)?;

        rows.first().map(row_to_template).transpose()
    }

    /// List templates in one org, newest first. Tag filtering matches a
    /// JSON-quoted element inside the stored array text.
    pub fn list_templates(
        &self,
        query: &TemplateListQuery,
    ) -> Result<Vec<Template>, ServiceError> {
        let mut where_clauses = vec!["org_id = ?1".to_string()];
        let mut params = vec![Value::Integer(query.org_id.unwrap_or(DEFAULT_ORG_ID))];
        let mut idx = 2;

        if let Some(ref search) = query.search {
            where_clauses.push(format!("title LIKE ?{idx}"));
            params.push(Value::Text(like_pattern(search)));
            idx += 1;
        }
        if let Some(ref tag) = query.tag {
            where_clauses.push(format!("tags LIKE ?{idx}"));
            params.push(Value::Text(like_pattern(&format!("\"{tag}\""))));
            idx += 1;
        }

        let sql = format!(
            "SELECT * FROM templates WHERE {} ORDER BY created_at DESC LIMIT ?{idx} OFFSET ?{}",
            where_clauses.join(" AND "),
            idx + 1
        );
        params.push(Value::Integer(clamp_limit(query.limit)));
        params.push(Value::Integer(offset_or_default(query.offset)));

        let rows = self.db().query(&sql, &params).map_err(storage)?;
        rows.iter().map(row_to_template).collect()
    }

    pub fn update_template(
        &self,
        id: i64,
        org_id: i64,
        user_id: &str,
        patch: &TemplatePatch,
    ) -> Result<Template, ServiceError> {
        let mut sets = vec!["updated_at = ?1".to_string()];
        let mut params = vec![Value::Text(now_rfc3339())];
        let mut idx = 2;

        if let Some(ref title) = patch.title {
            sets.push(format!("title = ?{idx}"));
            params.push(Value::Text(title.clone()));
            idx += 1;
        }
        if let Some(ref description) = patch.description {
            sets.push(format!("description = ?{idx}"));
            params.push(opt_value(description.clone()));
            idx += 1;
        }
        if let Some(task_spec_id) = patch.task_spec_id {
            sets.push(format!("task_spec_id = ?{idx}"));
            params.push(match task_spec_id {
                Some(ref_id) => Value::Integer(ref_id),
                None => Value::Null,
            });
            idx += 1;
        }
        if let Some(ref tags) = patch.tags {
            sets.push(format!("tags = ?{idx}"));
            params.push(Value::Text(codec::encode_string_list(tags)));
            idx += 1;
        }
        if let Some(proven) = patch.proven {
            sets.push(format!("proven = ?{idx}"));
            params.push(Value::Integer(i64::from(proven)));
            idx += 1;
        }

        let sql = format!(
            "UPDATE templates SET {} WHERE id = ?{idx} AND org_id = ?{} AND user_id = ?{}",
            sets.join(", "),
            idx + 1,
            idx + 2
        );
        params.push(Value::Integer(id));
        params.push(Value::Integer(org_id));
        params.push(Value::Text(user_id.to_string()));

        let affected = self.db().exec(&sql, &params).map_err(storage)?;
        if affected == 0 {
            return Err(ServiceError::NotFound("Template not found".to_string()));
        }

        self.get_template(id)?
            .ok_or_else(|| ServiceError::Internal(format!("template {id} vanished after update")))
    }

    pub fn delete_template(
        &self,
        id: i64,
        org_id: i64,
        user_id: &str,
    ) -> Result<u64, ServiceError> {
        self.db()
            .exec(
                "DELETE FROM templates WHERE id = ?1 AND org_id = ?2 AND user_id = ?3",
                &[
                    Value::Integer(id),
                    Value::Integer(org_id),
                    Value::Text(user_id.to_string()),
                ],
            )
            .map_err(storage)
    }
}

fn row_to_template(row: &Row) -> Result<Template, ServiceError> {
    Ok(Template {
        id: req_i64(row, "id")?,
        user_id: req_text(row, "user_id")?,
        org_id: req_i64(row, "org_id")?,
        title: req_text(row, "title")?,
        description: opt_text(row, "description"),
        task_spec_id: row.get_i64("task_spec_id"),
        tags: codec::decode_string_list(row.get_str("tags")),
        proven: req_i64(row, "proven")? != 0,
        created_at: req_text(row, "created_at")?,
        updated_at: req_text(row, "updated_at")?,
    })
}
