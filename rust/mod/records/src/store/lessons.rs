use promptdeck_core::{clamp_limit, now_rfc3339, offset_or_default, ServiceError};
use promptdeck_sql::{Row, Value};

use crate::codec;
use crate::model::{CreateLesson, Lesson, LessonListQuery, LessonPatch};
use crate::store::{like_pattern, req_i64, req_text, storage, RecordStore};

impl RecordStore {
    pub fn insert_lesson(&self, input: CreateLesson) -> Result<Lesson, ServiceError> {
        let id = self
            .db()
            .insert(
                "INSERT INTO lessons (title, bullets, next_time_try, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    Value::Text(input.title.trim().to_string()),
                    Value::Text(codec::encode_string_list(&input.bullets)),
                    Value::Text(codec::encode_string_list(&input.next_time_try)),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(storage)?;

        self.get_lesson(id)?
            .ok_or_else(|| ServiceError::Internal(format!("lesson {id} vanished after insert")))
    }

    pub fn get_lesson(&self, id: i64) -> Result<Option<Lesson>, ServiceError> {
        let rows = self
            .db()
            .query("SELECT * FROM lessons WHERE id = ?1", &[Value::Integer(id)])
            .map_err(storage)?;

        rows.first().map(row_to_lesson).transpose()
    }

    pub fn list_lessons(&self, query: &LessonListQuery) -> Result<Vec<Lesson>, ServiceError> {
        let mut where_clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref search) = query.search {
            where_clauses.push(format!("title LIKE ?{idx}"));
            params.push(Value::Text(like_pattern(search)));
            idx += 1;
        }

        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", where_clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM lessons {where_sql}ORDER BY created_at DESC LIMIT ?{idx} OFFSET ?{}",
            idx + 1
        );
        params.push(Value::Integer(clamp_limit(query.limit)));
        params.push(Value::Integer(offset_or_default(query.offset)));

        let rows = self.db().query(&sql, &params).map_err(storage)?;
        rows.iter().map(row_to_lesson).collect()
    }

    /// Lessons carry no ownership columns, so updates match on id alone.
    /// Callers reject empty patches before getting here.
    pub fn update_lesson(&self, id: i64, patch: &LessonPatch) -> Result<Lesson, ServiceError> {
        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref title) = patch.title {
            sets.push(format!("title = ?{idx}"));
            params.push(Value::Text(title.clone()));
            idx += 1;
        }
        if let Some(ref bullets) = patch.bullets {
            sets.push(format!("bullets = ?{idx}"));
            params.push(Value::Text(codec::encode_string_list(bullets)));
            idx += 1;
        }
        if let Some(ref next_time_try) = patch.next_time_try {
            sets.push(format!("next_time_try = ?{idx}"));
            params.push(Value::Text(codec::encode_string_list(next_time_try)));
            idx += 1;
        }

        let sql = format!("UPDATE lessons SET {} WHERE id = ?{idx}", sets.join(", "));
        params.push(Value::Integer(id));

        let affected = self.db().exec(&sql, &params).map_err(storage)?;
        if affected == 0 {
            return Err(ServiceError::NotFound("Lesson not found".to_string()));
        }

        self.get_lesson(id)?
            .ok_or_else(|| ServiceError::Internal(format!("lesson {id} vanished after update")))
    }

    pub fn delete_lesson(&self, id: i64) -> Result<u64, ServiceError> {
        self.db()
            .exec("DELETE FROM lessons WHERE id = ?1", &[Value::Integer(id)])
            .map_err(storage)
    }
}

fn row_to_lesson(row: &Row) -> Result<Lesson, ServiceError> {
    Ok(Lesson {
        id: req_i64(row, "id")?,
        title: req_text(row, "title")?,
        bullets: codec::decode_string_list(row.get_str("bullets")),
        next_time_try: codec::decode_string_list(row.get_str("next_time_try")),
        created_at: req_text(row, "created_at")?,
    })
}
