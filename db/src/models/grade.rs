use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// A single grade a student received for a subject, optionally attributed to
/// the teacher who recorded it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub grade: i32,
    pub date_received: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,

    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A grade may be backdated but never postdated.
pub fn validate_date_received(value: DateTime<Utc>) -> Result<(), DbErr> {
    if value > Utc::now() {
        return Err(DbErr::Custom(
            "date_received must not be in the future".to_owned(),
        ));
    }
    Ok(())
}

impl Model {
    pub async fn create<C>(
        db: &C,
        student_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
        grade: i32,
        date_received: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        validate_date_received(date_received)?;

        let now = Utc::now();
        let record = ActiveModel {
            student_id: Set(student_id),
            subject_id: Set(subject_id),
            teacher_id: Set(teacher_id),
            grade: Set(grade),
            date_received: Set(date_received),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        record.insert(db).await
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
    use super::Model as GradeModel;
    use crate::models::{group, student, subject, teacher};
    use crate::test_utils::setup_test_db;
    use chrono::{Duration, Utc};
    use sea_orm::DatabaseConnection;

    async fn fixture(db: &DatabaseConnection) -> (student::Model, subject::Model, teacher::Model) {
        let grp = group::Model::create(db, "CS-401").await.unwrap();
        let stu = student::Model::create(db, "Edsger Dijkstra", grp.id)
            .await
            .unwrap();
        let sub = subject::Model::create(db, "Algorithms").await.unwrap();
        let tea = teacher::Model::create(db, "Donald Knuth").await.unwrap();
        (stu, sub, tea)
    }

    #[tokio::test]
    async fn test_grade_rejects_future_date() {
        let db = setup_test_db().await;
        let (stu, sub, tea) = fixture(&db).await;

        let future = Utc::now() + Duration::hours(1);
        let res = GradeModel::create(&db, stu.id, sub.id, Some(tea.id), 90, future).await;
        assert!(res.is_err());

        let all = GradeModel::get_all(&db).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_grade_accepts_past_date() {
        let db = setup_test_db().await;
        let (stu, sub, tea) = fixture(&db).await;

        let past = Utc::now() - Duration::days(30);
        let grade = GradeModel::create(&db, stu.id, sub.id, Some(tea.id), 77, past)
            .await
            .unwrap();
        assert_eq!(grade.grade, 77);
        assert_eq!(grade.teacher_id, Some(tea.id));
    }

    #[tokio::test]
    async fn test_deleting_student_cascades_grades() {
        let db = setup_test_db().await;
        let (stu, sub, tea) = fixture(&db).await;

        let received = Utc::now() - Duration::days(1);
        for value in [55, 65, 75] {
            GradeModel::create(&db, stu.id, sub.id, Some(tea.id), value, received)
                .await
                .unwrap();
        }
        assert_eq!(GradeModel::get_all(&db).await.unwrap().len(), 3);

        student::Model::delete_by_id(&db, stu.id).await.unwrap();
        assert!(GradeModel::get_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_teacher_cascades_grades() {
        let db = setup_test_db().await;
        let (stu, sub, tea) = fixture(&db).await;

        let received = Utc::now() - Duration::days(2);
        GradeModel::create(&db, stu.id, sub.id, Some(tea.id), 88, received)
            .await
            .unwrap();

        teacher::Model::delete_by_id(&db, tea.id).await.unwrap();
        assert!(GradeModel::get_all(&db).await.unwrap().is_empty());
    }
}
