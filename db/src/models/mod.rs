pub mod grade;
pub mod group;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod teacher_subject;

pub use grade::Entity as Grade;
pub use group::Entity as Group;
pub use student::Entity as Student;
pub use subject::Entity as Subject;
pub use teacher::Entity as Teacher;
pub use teacher_subject::Entity as TeacherSubject;
