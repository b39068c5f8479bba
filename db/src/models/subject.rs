use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// A subject. Subject names are unique; teachers are attached through the
/// `teacher_subjects` join table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grade::Entity")]
    Grade,
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        super::teacher_subject::Relation::Teacher.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::teacher_subject::Relation::Subject.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(db: &C, name: &str) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let subject = ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        subject.insert(db).await
    }

    pub async fn get_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_all<C>(db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find().all(db).await
    }

    pub async fn delete_by_id<C>(db: &C, id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::Model as SubjectModel;
    use crate::models::{teacher, teacher_subject};
    use crate::test_utils::setup_test_db;
    use sea_orm::{EntityTrait, ModelTrait};

    #[tokio::test]
    async fn test_subject_name_must_be_unique() {
        let db = setup_test_db().await;

        SubjectModel::create(&db, "Mathematics").await.unwrap();
        assert!(SubjectModel::create(&db, "Mathematics").await.is_err());
    }

    #[tokio::test]
    async fn test_subject_teachers_via_join_table() {
        let db = setup_test_db().await;

        let subject = SubjectModel::create(&db, "Physics").await.unwrap();
        let t1 = teacher::Model::create(&db, "Marie Curie").await.unwrap();
        let t2 = teacher::Model::create(&db, "Richard Feynman").await.unwrap();
        teacher_subject::Model::link(&db, t1.id, subject.id)
            .await
            .unwrap();
        teacher_subject::Model::link(&db, t2.id, subject.id)
            .await
            .unwrap();

        let teachers = subject
            .find_related(teacher::Entity)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(teachers.len(), 2);

        // deleting the subject clears its join rows
        SubjectModel::delete_by_id(&db, subject.id).await.unwrap();
        let links = teacher_subject::Entity::find().all(&db).await.unwrap();
        assert!(links.is_empty());
    }
}
