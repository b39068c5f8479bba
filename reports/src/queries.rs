//! The ten reporting queries. Every query is a pure read; queries that need
//! a random subject/teacher/group/student fail with
//! [`ReportError::EmptyTable`] when there is nothing to pick from.

use db::models::{grade, group, student, subject, teacher, teacher_subject};
use rand::Rng;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, ModelTrait, Order,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use tracing::{info, warn};

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct StudentAvg {
    pub name: String,
    pub avg_grade: f64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct GroupAvg {
    pub name: String,
    pub avg_grade: f64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct SubjectAvg {
    pub name: String,
    pub avg_grade: f64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct StudentGrade {
    pub name: String,
    pub grade: i32,
}

#[derive(Debug)]
pub struct BestStudentReport {
    pub subject: String,
    pub best: Option<StudentAvg>,
}

#[derive(Debug)]
pub struct GroupAvgReport {
    pub subject: String,
    pub rows: Vec<GroupAvg>,
}

#[derive(Debug)]
pub struct TeacherSubjectsReport {
    pub teacher: String,
    pub subjects: Vec<String>,
}

#[derive(Debug)]
pub struct GroupStudentsReport {
    pub group: String,
    pub students: Vec<String>,
}

#[derive(Debug)]
pub struct GroupSubjectGradesReport {
    pub group: String,
    pub subject: String,
    pub rows: Vec<StudentGrade>,
}

#[derive(Debug)]
pub struct TeacherAveragesReport {
    pub teacher: String,
    pub rows: Vec<SubjectAvg>,
}

#[derive(Debug)]
pub struct StudentSubjectsReport {
    pub student: String,
    pub subjects: Vec<String>,
}

#[derive(Debug)]
pub struct StudentTeacherSubjectsReport {
    pub student: String,
    pub teacher: String,
    pub subjects: Vec<String>,
}

fn avg_grade() -> Expr {
    Expr::expr(Func::avg(Expr::col((grade::Entity, grade::Column::Grade))))
}

/// Uniform choice; the precondition error names the empty table.
fn pick<T>(mut rows: Vec<T>, table: &'static str) -> Result<T, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::EmptyTable(table));
    }
    let idx = rand::thread_rng().gen_range(0..rows.len());
    Ok(rows.swap_remove(idx))
}

/// 1. Top 5 students by mean grade across all subjects, descending.
pub async fn top_students_by_avg(db: &DatabaseConnection) -> Result<Vec<StudentAvg>, ReportError> {
    let rows = student::Entity::find()
        .select_only()
        .column(student::Column::Name)
        .column_as(avg_grade(), "avg_grade")
        .join(JoinType::InnerJoin, student::Relation::Grade.def())
        .group_by(student::Column::Id)
        .group_by(student::Column::Name)
        .order_by(avg_grade(), Order::Desc)
        .limit(5)
        .into_model::<StudentAvg>()
        .all(db)
        .await?;

    info!("Top 5 students by average grade:");
    for row in &rows {
        info!("Student: '{}', Avg. grade: '{}'", row.name, row.avg_grade);
    }
    Ok(rows)
}

/// 2. For one random subject, the student with the highest mean grade in it.
pub async fn best_student_for_random_subject(
    db: &DatabaseConnection,
) -> Result<BestStudentReport, ReportError> {
    let subject = pick(subject::Entity::find().all(db).await?, "subjects")?;

    let best = student::Entity::find()
        .select_only()
        .column(student::Column::Name)
        .column_as(avg_grade(), "avg_grade")
        .join(JoinType::InnerJoin, student::Relation::Grade.def())
        .filter(grade::Column::SubjectId.eq(subject.id))
        .group_by(student::Column::Id)
        .group_by(student::Column::Name)
        .order_by(avg_grade(), Order::Desc)
        .limit(1)
        .into_model::<StudentAvg>()
        .one(db)
        .await?;

    match &best {
        Some(row) => info!(
            "Student with highest average grade on subject '{}': '{}' ({})",
            subject.name, row.name, row.avg_grade
        ),
        None => info!("Subject '{}' has no grades yet", subject.name),
    }
    Ok(BestStudentReport {
        subject: subject.name,
        best,
    })
}

/// 3. For one random subject, the mean grade per group.
pub async fn group_averages_for_random_subject(
    db: &DatabaseConnection,
) -> Result<GroupAvgReport, ReportError> {
    let subject = pick(subject::Entity::find().all(db).await?, "subjects")?;

    let rows = group::Entity::find()
        .select_only()
        .column(group::Column::Name)
        .column_as(avg_grade(), "avg_grade")
        .join(JoinType::InnerJoin, group::Relation::Student.def())
        .join(JoinType::InnerJoin, student::Relation::Grade.def())
        .filter(grade::Column::SubjectId.eq(subject.id))
        .group_by(group::Column::Id)
        .group_by(group::Column::Name)
        .into_model::<GroupAvg>()
        .all(db)
        .await?;

    info!("Groups with average grades on subject '{}':", subject.name);
    for row in &rows {
        info!("Group: '{}', Avg. grade: '{}'", row.name, row.avg_grade);
    }
    Ok(GroupAvgReport {
        subject: subject.name,
        rows,
    })
}

/// 4. The mean grade across the entire grade table. `None` when no grades exist.
pub async fn overall_average(db: &DatabaseConnection) -> Result<Option<f64>, ReportError> {
    #[derive(FromQueryResult)]
    struct AvgRow {
        avg_grade: Option<f64>,
    }

    let row = grade::Entity::find()
        .select_only()
        .column_as(avg_grade(), "avg_grade")
        .into_model::<AvgRow>()
        .one(db)
        .await?;

    let overall = row.and_then(|r| r.avg_grade);
    match overall {
        Some(avg) => info!("Overall average grade: '{}'", avg),
        None => info!("No grades recorded yet"),
    }
    Ok(overall)
}

/// 5. For one random teacher, the distinct subjects they teach.
pub async fn subjects_for_random_teacher(
    db: &DatabaseConnection,
) -> Result<TeacherSubjectsReport, ReportError> {
    let tchr = pick(teacher::Entity::find().all(db).await?, "teachers")?;

    let subjects: Vec<String> = tchr
        .find_related(subject::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();

    info!("Courses taught by '{}': {:?}", tchr.name, subjects);
    Ok(TeacherSubjectsReport {
        teacher: tchr.name,
        subjects,
    })
}

/// 6. For one random group, all student names in it, ascending.
pub async fn students_in_random_group(
    db: &DatabaseConnection,
) -> Result<GroupStudentsReport, ReportError> {
    let grp = pick(group::Entity::find().all(db).await?, "groups")?;

    let students: Vec<String> = student::Entity::find()
        .select_only()
        .column(student::Column::Name)
        .filter(student::Column::GroupId.eq(grp.id))
        .order_by_asc(student::Column::Name)
        .into_tuple()
        .all(db)
        .await?;

    info!("Students in group '{}': {:?}", grp.name, students);
    Ok(GroupStudentsReport {
        group: grp.name,
        students,
    })
}

/// 7. For one random subject and one random group, each student's grades in
///    that subject, ordered by student name.
pub async fn grades_for_random_group_and_subject(
    db: &DatabaseConnection,
) -> Result<GroupSubjectGradesReport, ReportError> {
    let subject = pick(subject::Entity::find().all(db).await?, "subjects")?;
    let grp = pick(group::Entity::find().all(db).await?, "groups")?;

    let rows = student::Entity::find()
        .select_only()
        .column(student::Column::Name)
        .column(grade::Column::Grade)
        .join(JoinType::InnerJoin, student::Relation::Grade.def())
        .filter(student::Column::GroupId.eq(grp.id))
        .filter(grade::Column::SubjectId.eq(subject.id))
        .order_by_asc(student::Column::Name)
        .into_model::<StudentGrade>()
        .all(db)
        .await?;

    info!(
        "Students' grades from group '{}' on subject '{}':",
        grp.name, subject.name
    );
    for row in &rows {
        info!("Student: '{}', Grade: '{}'", row.name, row.grade);
    }
    Ok(GroupSubjectGradesReport {
        group: grp.name,
        subject: subject.name,
        rows,
    })
}

/// 8. For one random teacher, the mean grade per subject they teach.
pub async fn subject_averages_for_random_teacher(
    db: &DatabaseConnection,
) -> Result<TeacherAveragesReport, ReportError> {
    let tchr = pick(teacher::Entity::find().all(db).await?, "teachers")?;

    let rows = subject::Entity::find()
        .select_only()
        .column(subject::Column::Name)
        .column_as(avg_grade(), "avg_grade")
        .join(
            JoinType::InnerJoin,
            teacher_subject::Relation::Subject.def().rev(),
        )
        .join(JoinType::InnerJoin, subject::Relation::Grade.def())
        .filter(teacher_subject::Column::TeacherId.eq(tchr.id))
        .group_by(subject::Column::Id)
        .group_by(subject::Column::Name)
        .into_model::<SubjectAvg>()
        .all(db)
        .await?;

    info!("Average grades for subjects by teacher '{}':", tchr.name);
    for row in &rows {
        info!("Subject: '{}', Grade: '{}'", row.name, row.avg_grade);
    }
    Ok(TeacherAveragesReport {
        teacher: tchr.name,
        rows,
    })
}

/// 9. For one random student, the distinct subjects they have grades in.
pub async fn subjects_for_random_student(
    db: &DatabaseConnection,
) -> Result<StudentSubjectsReport, ReportError> {
    let stu = pick(student::Entity::find().all(db).await?, "students")?;

    let subjects: Vec<String> = subject::Entity::find()
        .select_only()
        .column(subject::Column::Name)
        .join(JoinType::InnerJoin, subject::Relation::Grade.def())
        .filter(grade::Column::StudentId.eq(stu.id))
        .group_by(subject::Column::Id)
        .group_by(subject::Column::Name)
        .into_tuple()
        .all(db)
        .await?;

    info!("Student '{}' attends subjects: {:?}", stu.name, subjects);
    Ok(StudentSubjectsReport {
        student: stu.name,
        subjects,
    })
}

/// 10. For one random student and one random teacher, the distinct subjects
///     in which that teacher recorded a grade for that student.
pub async fn subjects_for_random_student_and_teacher(
    db: &DatabaseConnection,
) -> Result<StudentTeacherSubjectsReport, ReportError> {
    let stu = pick(student::Entity::find().all(db).await?, "students")?;
    let tchr = pick(teacher::Entity::find().all(db).await?, "teachers")?;

    let subjects: Vec<String> = subject::Entity::find()
        .select_only()
        .column(subject::Column::Name)
        .join(JoinType::InnerJoin, subject::Relation::Grade.def())
        .filter(grade::Column::StudentId.eq(stu.id))
        .filter(grade::Column::TeacherId.eq(tchr.id))
        .group_by(subject::Column::Id)
        .group_by(subject::Column::Name)
        .into_tuple()
        .all(db)
        .await?;

    info!(
        "Student '{}' attends subjects: {:?}, taught by teacher '{}'",
        stu.name, subjects, tchr.name
    );
    Ok(StudentTeacherSubjectsReport {
        student: stu.name,
        teacher: tchr.name,
        subjects,
    })
}

/// Runs reports 1 through 10 in order. Every report is independent; a failed
/// one (usually an empty-table precondition) is logged and the rest still run.
pub async fn run_all(db: &DatabaseConnection) {
    if let Err(e) = top_students_by_avg(db).await {
        warn!("top students report failed: {e}");
    }
    if let Err(e) = best_student_for_random_subject(db).await {
        warn!("best student report failed: {e}");
    }
    if let Err(e) = group_averages_for_random_subject(db).await {
        warn!("group averages report failed: {e}");
    }
    if let Err(e) = overall_average(db).await {
        warn!("overall average report failed: {e}");
    }
    if let Err(e) = subjects_for_random_teacher(db).await {
        warn!("teacher subjects report failed: {e}");
    }
    if let Err(e) = students_in_random_group(db).await {
        warn!("group students report failed: {e}");
    }
    if let Err(e) = grades_for_random_group_and_subject(db).await {
        warn!("group subject grades report failed: {e}");
    }
    if let Err(e) = subject_averages_for_random_teacher(db).await {
        warn!("teacher subject averages report failed: {e}");
    }
    if let Err(e) = subjects_for_random_student(db).await {
        warn!("student subjects report failed: {e}");
    }
    if let Err(e) = subjects_for_random_student_and_teacher(db).await {
        warn!("student teacher subjects report failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use db::models::{grade, group, student, subject, teacher, teacher_subject};
    use db::test_utils::setup_test_db;

    async fn add_grade(db: &DatabaseConnection, stu: i64, sub: i64, tchr: i64, value: i32) {
        let received = Utc::now() - Duration::days(1);
        grade::Model::create(db, stu, sub, Some(tchr), value, received)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_overall_average_matches_fixture() {
        let db = setup_test_db().await;

        let grp = group::Model::create(&db, "CS-700").await.unwrap();
        let stu = student::Model::create(&db, "Barbara Liskov", grp.id)
            .await
            .unwrap();
        let sub = subject::Model::create(&db, "Databases").await.unwrap();
        let tchr = teacher::Model::create(&db, "Edgar Codd").await.unwrap();

        for value in [10, 20, 30] {
            add_grade(&db, stu.id, sub.id, tchr.id, value).await;
        }

        let avg = overall_average(&db).await.unwrap();
        assert_eq!(avg, Some(20.0));
    }

    #[tokio::test]
    async fn test_overall_average_empty_table_is_none() {
        let db = setup_test_db().await;
        assert_eq!(overall_average(&db).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_top_students_bounded_and_descending() {
        let db = setup_test_db().await;

        let grp = group::Model::create(&db, "CS-701").await.unwrap();
        let sub = subject::Model::create(&db, "Compilers").await.unwrap();
        let tchr = teacher::Model::create(&db, "Niklaus Wirth").await.unwrap();

        for i in 0..7 {
            let stu = student::Model::create(&db, &format!("Student {i}"), grp.id)
                .await
                .unwrap();
            add_grade(&db, stu.id, sub.id, tchr.id, 50 + i * 5).await;
        }
        // one student with no grades at all must never appear
        student::Model::create(&db, "No Grades", grp.id)
            .await
            .unwrap();

        let rows = top_students_by_avg(&db).await.unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0].avg_grade >= w[1].avg_grade));
        assert!(rows.iter().all(|r| r.name != "No Grades"));
    }

    #[tokio::test]
    async fn test_random_subject_precondition_failure() {
        let db = setup_test_db().await;

        let err = best_student_for_random_subject(&db).await.unwrap_err();
        assert!(matches!(err, ReportError::EmptyTable("subjects")));
    }

    #[tokio::test]
    async fn test_students_in_group_sorted_ascending() {
        let db = setup_test_db().await;

        let grp = group::Model::create(&db, "CS-702").await.unwrap();
        for name in ["Charlie", "Alice", "Bob"] {
            student::Model::create(&db, name, grp.id).await.unwrap();
        }

        let report = students_in_random_group(&db).await.unwrap();
        assert_eq!(report.students, vec!["Alice", "Bob", "Charlie"]);
    }

    #[tokio::test]
    async fn test_teacher_reports_follow_join_table() {
        let db = setup_test_db().await;

        let grp = group::Model::create(&db, "CS-703").await.unwrap();
        let stu = student::Model::create(&db, "Ken Thompson", grp.id)
            .await
            .unwrap();
        let sub_taught = subject::Model::create(&db, "Operating Systems").await.unwrap();
        let sub_other = subject::Model::create(&db, "Networks").await.unwrap();
        let tchr = teacher::Model::create(&db, "Dennis Ritchie").await.unwrap();
        teacher_subject::Model::link(&db, tchr.id, sub_taught.id)
            .await
            .unwrap();

        add_grade(&db, stu.id, sub_taught.id, tchr.id, 80).await;
        add_grade(&db, stu.id, sub_taught.id, tchr.id, 100).await;
        add_grade(&db, stu.id, sub_other.id, tchr.id, 10).await;

        let taught = subjects_for_random_teacher(&db).await.unwrap();
        assert_eq!(taught.subjects, vec!["Operating Systems"]);

        let averages = subject_averages_for_random_teacher(&db).await.unwrap();
        assert_eq!(averages.rows.len(), 1);
        assert_eq!(averages.rows[0].name, "Operating Systems");
        assert_eq!(averages.rows[0].avg_grade, 90.0);

        let by_teacher = subjects_for_random_student_and_teacher(&db).await.unwrap();
        assert_eq!(by_teacher.subjects.len(), 2);
    }
}
