use db::models::{Grade, Group, Student, Subject, Teacher, TeacherSubject};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

/// True only when every entity table and the join table holds at least one
/// row. Used as the gate before seeding, nothing more.
pub async fn all_tables_populated(db: &DatabaseConnection) -> Result<bool, DbErr> {
    Ok(Group::find().count(db).await? > 0
        && Teacher::find().count(db).await? > 0
        && Subject::find().count(db).await? > 0
        && TeacherSubject::find().count(db).await? > 0
        && Student::find().count(db).await? > 0
        && Grade::find().count(db).await? > 0)
}

#[cfg(test)]
mod tests {
    use super::all_tables_populated;
    use db::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_empty_db_is_not_populated() {
        let db = setup_test_db().await;
        assert!(!all_tables_populated(&db).await.unwrap());
    }

    #[tokio::test]
    async fn test_partial_data_is_not_populated() {
        let db = setup_test_db().await;
        db::models::group::Model::create(&db, "CS-500").await.unwrap();
        assert!(!all_tables_populated(&db).await.unwrap());
    }
}
