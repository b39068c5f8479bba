pub mod grade;
pub mod group;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod teacher_subject;
