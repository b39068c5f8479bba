//! Generic create/list/update/remove over the closed set of entity kinds.
//!
//! Field values arrive as an optional bag ([`FieldArgs`]); each entity kind
//! validates its own required set explicitly instead of applying arbitrary
//! key/value pairs.

use chrono::{DateTime, Utc};
use db::models::{grade, group, student, subject, teacher};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel};
use strum::{Display, EnumString};
use tracing::info;

use crate::error::ServiceError;

/// The entity kinds the CRUD surface operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ModelKind {
    Group,
    Student,
    Teacher,
    Subject,
    Grade,
}

/// Optional field values collected from the command line. Each operation
/// consumes the subset its entity kind understands.
#[derive(Debug, Clone, Default)]
pub struct FieldArgs {
    pub name: Option<String>,
    pub grade: Option<i32>,
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub group_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub date_received: Option<DateTime<Utc>>,
}

fn require<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, ServiceError> {
    value.ok_or(ServiceError::MissingField(field))
}

fn require_str<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ServiceError> {
    value.as_deref().ok_or(ServiceError::MissingField(field))
}

/// Builds a new row of the given kind from the supplied fields and persists it.
pub async fn create(
    db: &DatabaseConnection,
    kind: ModelKind,
    args: &FieldArgs,
) -> Result<(), ServiceError> {
    match kind {
        ModelKind::Group => {
            let name = require_str(&args.name, "name")?;
            let row = group::Model::create(db, name).await?;
            info!("Group created successfully: id={}, name='{}'", row.id, row.name);
        }
        ModelKind::Student => {
            let name = require_str(&args.name, "name")?;
            let group_id = require(args.group_id, "group_id")?;
            let row = student::Model::create(db, name, group_id).await?;
            info!(
                "Student created successfully: id={}, name='{}', group_id={}",
                row.id, row.name, row.group_id
            );
        }
        ModelKind::Teacher => {
            let name = require_str(&args.name, "name")?;
            let row = teacher::Model::create(db, name).await?;
            info!("Teacher created successfully: id={}, name='{}'", row.id, row.name);
        }
        ModelKind::Subject => {
            let name = require_str(&args.name, "name")?;
            let row = subject::Model::create(db, name).await?;
            info!("Subject created successfully: id={}, name='{}'", row.id, row.name);
        }
        ModelKind::Grade => {
            let value = require(args.grade, "grade")?;
            let student_id = require(args.student_id, "student_id")?;
            let subject_id = require(args.subject_id, "subject_id")?;
            let date_received = args.date_received.unwrap_or_else(Utc::now);
            grade::validate_date_received(date_received)
                .map_err(|e| ServiceError::Validation(e.to_string()))?;

            let row = grade::Model::create(
                db,
                student_id,
                subject_id,
                args.teacher_id,
                value,
                date_received,
            )
            .await?;
            info!(
                "Grade created successfully: id={}, student_id={}, subject_id={}, grade={}",
                row.id, row.student_id, row.subject_id, row.grade
            );
        }
    }
    Ok(())
}

/// Deletes the row with the given id. A missing row is logged, not an error.
pub async fn remove(db: &DatabaseConnection, kind: ModelKind, id: i64) -> Result<(), ServiceError> {
    let affected = match kind {
        ModelKind::Group => group::Model::delete_by_id(db, id).await?,
        ModelKind::Student => student::Model::delete_by_id(db, id).await?,
        ModelKind::Teacher => teacher::Model::delete_by_id(db, id).await?,
        ModelKind::Subject => subject::Model::delete_by_id(db, id).await?,
        ModelKind::Grade => grade::Model::delete_by_id(db, id).await?,
    };

    if affected == 0 {
        info!("{kind} ID {id} not found, nothing deleted.");
    } else {
        info!("{kind} ID {id} deleted successfully!");
    }
    Ok(())
}

/// Applies every supplied field to the row with the given id. A missing row
/// is logged and left alone; unsupplied fields keep their values.
pub async fn update(
    db: &DatabaseConnection,
    kind: ModelKind,
    id: i64,
    args: &FieldArgs,
) -> Result<(), ServiceError> {
    let now = Utc::now();
    match kind {
        ModelKind::Group => {
            let Some(row) = group::Model::get_by_id(db, id).await? else {
                info!("{kind} ID {id} not found.");
                return Ok(());
            };
            let mut active = row.into_active_model();
            if let Some(name) = &args.name {
                active.name = Set(name.clone());
            }
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        ModelKind::Student => {
            let Some(row) = student::Model::get_by_id(db, id).await? else {
                info!("{kind} ID {id} not found.");
                return Ok(());
            };
            let mut active = row.into_active_model();
            if let Some(name) = &args.name {
                active.name = Set(name.clone());
            }
            if let Some(group_id) = args.group_id {
                active.group_id = Set(group_id);
            }
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        ModelKind::Teacher => {
            let Some(row) = teacher::Model::get_by_id(db, id).await? else {
                info!("{kind} ID {id} not found.");
                return Ok(());
            };
            let mut active = row.into_active_model();
            if let Some(name) = &args.name {
                active.name = Set(name.clone());
            }
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        ModelKind::Subject => {
            let Some(row) = subject::Model::get_by_id(db, id).await? else {
                info!("{kind} ID {id} not found.");
                return Ok(());
            };
            let mut active = row.into_active_model();
            if let Some(name) = &args.name {
                active.name = Set(name.clone());
            }
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        ModelKind::Grade => {
            let Some(row) = grade::Model::get_by_id(db, id).await? else {
                info!("{kind} ID {id} not found.");
                return Ok(());
            };
            let mut active = row.into_active_model();
            if let Some(value) = args.grade {
                active.grade = Set(value);
            }
            if let Some(student_id) = args.student_id {
                active.student_id = Set(student_id);
            }
            if let Some(subject_id) = args.subject_id {
                active.subject_id = Set(subject_id);
            }
            if let Some(teacher_id) = args.teacher_id {
                active.teacher_id = Set(Some(teacher_id));
            }
            if let Some(date_received) = args.date_received {
                grade::validate_date_received(date_received)
                    .map_err(|e| ServiceError::Validation(e.to_string()))?;
                active.date_received = Set(date_received);
            }
            active.updated_at = Set(now);
            active.update(db).await?;
        }
    }
    info!("{kind} ID {id} updated successfully.");
    Ok(())
}

/// Reads every row of the given kind as field-name to value mappings.
pub async fn list(
    db: &DatabaseConnection,
    kind: ModelKind,
) -> Result<Vec<serde_json::Value>, ServiceError> {
    let rows = match kind {
        ModelKind::Group => group::Model::get_all(db)
            .await?
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?,
        ModelKind::Student => student::Model::get_all(db)
            .await?
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?,
        ModelKind::Teacher => teacher::Model::get_all(db)
            .await?
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?,
        ModelKind::Subject => subject::Model::get_all(db)
            .await?
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?,
        ModelKind::Grade => grade::Model::get_all(db)
            .await?
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?,
    };

    for row in &rows {
        info!("{row}");
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_model_kind_parses_case_insensitively() {
        assert_eq!(ModelKind::from_str("teacher").unwrap(), ModelKind::Teacher);
        assert_eq!(ModelKind::from_str("GRADE").unwrap(), ModelKind::Grade);
        assert!(ModelKind::from_str("classroom").is_err());
    }

    #[tokio::test]
    async fn test_create_then_list_shows_row() {
        let db = setup_test_db().await;

        let args = FieldArgs {
            name: Some("CS-800".into()),
            ..Default::default()
        };
        create(&db, ModelKind::Group, &args).await.unwrap();

        let rows = list(&db, ModelKind::Group).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "CS-800");
    }

    #[tokio::test]
    async fn test_create_missing_field_is_rejected() {
        let db = setup_test_db().await;

        let err = create(&db, ModelKind::Student, &FieldArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("name")));
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_noop() {
        let db = setup_test_db().await;

        create(
            &db,
            ModelKind::Teacher,
            &FieldArgs {
                name: Some("John McCarthy".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        remove(&db, ModelKind::Teacher, 999).await.unwrap();
        assert_eq!(list(&db, ModelKind::Teacher).await.unwrap().len(), 1);

        let id = list(&db, ModelKind::Teacher).await.unwrap()[0]["id"]
            .as_i64()
            .unwrap();
        remove(&db, ModelKind::Teacher, id).await.unwrap();
        assert!(list(&db, ModelKind::Teacher).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_referenced_group_surfaces_db_error() {
        let db = setup_test_db().await;

        create(
            &db,
            ModelKind::Group,
            &FieldArgs {
                name: Some("CS-803".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create(
            &db,
            ModelKind::Student,
            &FieldArgs {
                name: Some("Grace Hopper".into()),
                group_id: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // students reference their group without a cascade, so the delete
        // must fail and leave the row in place
        let err = remove(&db, ModelKind::Group, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert_eq!(list(&db, ModelKind::Group).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_touches_only_supplied_fields() {
        let db = setup_test_db().await;

        create(
            &db,
            ModelKind::Group,
            &FieldArgs {
                name: Some("CS-801".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create(
            &db,
            ModelKind::Student,
            &FieldArgs {
                name: Some("Old Name".into()),
                group_id: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        update(
            &db,
            ModelKind::Student,
            1,
            &FieldArgs {
                name: Some("New Name".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let rows = list(&db, ModelKind::Student).await.unwrap();
        assert_eq!(rows[0]["name"], "New Name");
        assert_eq!(rows[0]["group_id"], 1);
    }

    #[tokio::test]
    async fn test_update_missing_id_changes_nothing() {
        let db = setup_test_db().await;

        update(
            &db,
            ModelKind::Subject,
            42,
            &FieldArgs {
                name: Some("Topology".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(list(&db, ModelKind::Subject).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grade_create_rejects_future_date() {
        let db = setup_test_db().await;

        create(
            &db,
            ModelKind::Group,
            &FieldArgs {
                name: Some("CS-802".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create(
            &db,
            ModelKind::Student,
            &FieldArgs {
                name: Some("Leslie Lamport".into()),
                group_id: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create(
            &db,
            ModelKind::Subject,
            &FieldArgs {
                name: Some("Distributed Systems".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = create(
            &db,
            ModelKind::Grade,
            &FieldArgs {
                grade: Some(95),
                student_id: Some(1),
                subject_id: Some(1),
                date_received: Some(Utc::now() + chrono::Duration::hours(2)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(list(&db, ModelKind::Grade).await.unwrap().is_empty());
    }
}
